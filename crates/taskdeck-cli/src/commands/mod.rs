pub mod config;
pub mod stats;
pub mod task;

use taskdeck_core::Config;

/// Owner id for a command: the explicit `--owner` flag when given,
/// otherwise the configured default.
pub(crate) fn resolve_owner(owner: Option<String>) -> String {
    owner.unwrap_or_else(|| Config::load_or_default().default_owner)
}
