/// Result of a single invocation of the external packet-filter tool. A
/// nonzero exit is data, not a Rust error — `Err` is reserved for failure to
/// spawn the process at all.
#[derive(Debug, Clone)]
pub struct FirewallCommandOutcome {
    pub success: bool,
    pub diagnostic: String,
}

impl FirewallCommandOutcome {
    pub fn ok(diagnostic: impl Into<String>) -> Self {
        Self {
            success: true,
            diagnostic: diagnostic.into(),
        }
    }

    pub fn failed(diagnostic: impl Into<String>) -> Self {
        Self {
            success: false,
            diagnostic: diagnostic.into(),
        }
    }
}
