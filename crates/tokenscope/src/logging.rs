//! Logging facilities for tokenscope.
//!
//! tokenscope uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("tokenscope::geometry=debug")
//!     .init();
//! ```
//!
//! Sheet registration is logged at `info`, recoverable CSS errors at `warn`,
//! and best-effort fallbacks (unexpandable shorthands, unsupported
//! properties, alias cycles) at `debug`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Umbrella target.
    pub const CORE: &str = "tokenscope";
    /// Session lifecycle and index rebuilds.
    pub const SESSION: &str = "tokenscope::session";
    /// Highlight geometry.
    pub const GEOMETRY: &str = "tokenscope::geometry";
    /// Token search.
    pub const SEARCH: &str = "tokenscope::search";
    /// Tracked edits.
    pub const CHANGES: &str = "tokenscope::changes";
    /// Element and token inspection.
    pub const INSPECT: &str = "tokenscope::inspect";
    /// Editor state machine.
    pub const EDITOR: &str = "tokenscope::editor";
}

#[cfg(test)]
mod tests {
    use super::targets;

    #[test]
    fn targets_share_the_crate_prefix() {
        for target in [
            targets::SESSION,
            targets::GEOMETRY,
            targets::SEARCH,
            targets::CHANGES,
            targets::INSPECT,
            targets::EDITOR,
        ] {
            assert!(target.starts_with(targets::CORE));
        }
    }
}
