//! Blocking yes/no gate shown before destructive actions.

/// Synchronous confirmation prompt.
pub trait Confirm: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Answers every prompt the same way without asking (e.g. `--yes`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, message: &str) -> bool {
        tracing::debug!(message, answer = self.0, "Auto-answering confirmation");
        self.0
    }
}
