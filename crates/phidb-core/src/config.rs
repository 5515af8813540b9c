/// Default hard limit on distinct groups per run.
pub const DEFAULT_MAX_GROUPS: u64 = 10_000;

///
/// EngineConfig
///
/// Hard limits applied by the engine during one run.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    max_groups: u64,
}

impl EngineConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_groups: DEFAULT_MAX_GROUPS,
        }
    }

    /// Replace the distinct-group limit.
    #[must_use]
    pub const fn with_max_groups(mut self, max_groups: u64) -> Self {
        self.max_groups = max_groups;
        self
    }

    #[must_use]
    pub const fn max_groups(self) -> u64 {
        self.max_groups
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
