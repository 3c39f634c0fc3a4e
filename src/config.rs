//! Configuration for a [`BindContext`](crate::BindContext).

/// Options applied when a binding context is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    /// Label attached to every log event emitted by the context.
    pub name: Option<String>,
    /// Warn on drop if bindings are still live.
    pub report_leaks: bool,
    /// Number of native types to reserve registry slots for.
    pub capacity_hint: usize,
}

impl ContextConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    // === Builder Methods ===

    /// Set the context label used in log events.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Enable or disable leak reporting on drop.
    pub fn with_leak_reporting(mut self, enabled: bool) -> Self {
        self.report_leaks = enabled;
        self
    }

    /// Reserve registry slots for `capacity` native types up front.
    pub fn with_capacity_hint(mut self, capacity: usize) -> Self {
        self.capacity_hint = capacity;
        self
    }

    /// The label used in log events; empty if unnamed.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            name: None,
            report_leaks: true,
            capacity_hint: 0,
        }
    }
}
