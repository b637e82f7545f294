use crate::{AcceptedSet, Outcome, RejectReason};

/// Aggregate of one filter run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterReport {
    pub accepted: AcceptedSet,
    pub rejected: Vec<(String, RejectReason)>,
    pub skipped_blank: usize,
}

impl FilterReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one probe outcome into the report.
    pub fn record(&mut self, identity: String, outcome: Outcome) {
        match outcome {
            Outcome::Accepted => self.accepted.push(identity),
            Outcome::Rejected(reason) => self.rejected.push((identity, reason)),
        }
    }

    pub fn skip_blank(&mut self) {
        self.skipped_blank += 1;
    }

    pub fn probed(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    pub fn accepted(&self) -> &[String] {
        self.accepted.as_slice()
    }

    /// Number of rejections matching `predicate`, for summaries.
    pub fn count_rejected(&self, predicate: impl Fn(&RejectReason) -> bool) -> usize {
        self.rejected
            .iter()
            .filter(|(_, reason)| predicate(reason))
            .count()
    }
}
