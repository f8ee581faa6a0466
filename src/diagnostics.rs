//! Warning collection threaded through the parse pipeline.
//!
//! Every component that can raise an advisory receives a `&mut Diagnostics`
//! instead of reaching for shared logger state. Each warning is recorded for
//! the caller and mirrored to `tracing` at the point it is raised.

use tracing::warn;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
/// Ordered, human-readable warnings gathered during one parse.
pub struct Diagnostics {
    warnings: Vec<String>,
}

impl Diagnostics {
    #[must_use]
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning and emits it as a `tracing` event.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.warnings.push(message);
    }

    /// Appends warnings produced elsewhere (for example while reading input).
    pub fn extend(&mut self, warnings: impl IntoIterator<Item = String>) {
        self.warnings.extend(warnings);
    }

    #[must_use]
    /// Warnings recorded so far, in order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    #[must_use]
    /// Whether no warning has been recorded.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    #[must_use]
    /// Consumes the collector, yielding its warnings.
    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}
