//! Counters kept over a watch session.

use crate::compiler::CompileOutcome;

/// What happened during a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Compilations attempted, including the startup one.
    pub compilations: usize,
    pub succeeded: usize,
    pub compile_failures: usize,
    pub write_failures: usize,
    /// Change events taken off the queue.
    pub changes: usize,
    /// Change events folded into a compilation triggered by an earlier one.
    pub coalesced: usize,
}

impl SessionStats {
    pub fn record_change(&mut self) {
        self.changes = self.changes.saturating_add(1);
    }

    pub fn record_coalesced(&mut self) {
        self.record_change();
        self.coalesced = self.coalesced.saturating_add(1);
    }

    pub fn record_outcome(&mut self, outcome: &CompileOutcome) {
        self.compilations = self.compilations.saturating_add(1);
        match outcome {
            CompileOutcome::Compiled { .. } => {
                self.succeeded = self.succeeded.saturating_add(1);
            }
            CompileOutcome::CompileFailed(_) => {
                self.compile_failures = self.compile_failures.saturating_add(1);
            }
            CompileOutcome::WriteFailed(_) => {
                self.write_failures = self.write_failures.saturating_add(1);
            }
        }
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.compile_failures + self.write_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CompileError, WriteError, WrittenOutputs};
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_record_outcomes() {
        let mut stats = SessionStats::default();
        stats.record_outcome(&CompileOutcome::Compiled {
            outputs: WrittenOutputs {
                css: PathBuf::from("style.css"),
                map: None,
            },
            duration: Duration::from_millis(5),
        });
        stats.record_outcome(&CompileOutcome::CompileFailed(CompileError::Failed {
            message: "bad".to_string(),
            trace: None,
        }));
        stats.record_outcome(&CompileOutcome::WriteFailed(WriteError {
            path: PathBuf::from("style.css"),
            source: std::io::Error::other("disk full"),
        }));

        assert_eq!(stats.compilations, 3);
        assert_eq!(stats.succeeded, 1);
        assert_eq!(stats.compile_failures, 1);
        assert_eq!(stats.write_failures, 1);
        assert_eq!(stats.failed(), 2);
    }

    #[test]
    fn test_coalesced_counts_as_change() {
        let mut stats = SessionStats::default();
        stats.record_change();
        stats.record_coalesced();
        assert_eq!(stats.changes, 2);
        assert_eq!(stats.coalesced, 1);
    }
}
