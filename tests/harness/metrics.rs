// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome tally for abuse simulation results.

use guestbook::submission::SubmissionOutcome;
use std::collections::HashMap;

/// Counts pipeline outcomes by label.
#[derive(Debug, Default)]
pub struct OutcomeTally {
    outcomes: HashMap<&'static str, usize>,
}

impl OutcomeTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one outcome.
    pub fn record(&mut self, outcome: &SubmissionOutcome) {
        *self.outcomes.entry(outcome.label()).or_insert(0) += 1;
    }

    /// Get count for an outcome label.
    pub fn count(&self, label: &str) -> usize {
        self.outcomes.get(label).copied().unwrap_or(0)
    }

    /// Get total submission count.
    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }
}
