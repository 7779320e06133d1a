//! Counters collected while the controller runs

use super::types::Approach;

/// Running totals for one intersection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalStats {
    /// Transitions that reached their green phase
    pub transitions_completed: u64,
    /// Reset commands applied
    pub resets: u64,
    /// Greens shown per approach, indexed by rotation order (start green excluded)
    greens: [u64; 4],
}

impl SignalStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the end of a transition
    pub fn record_green(&mut self, approach: Approach) {
        self.transitions_completed += 1;
        self.greens[approach.index()] += 1;
    }

    pub fn record_reset(&mut self) {
        self.resets += 1;
    }

    pub fn greens_for(&self, approach: Approach) -> u64 {
        self.greens[approach.index()]
    }

    /// Get a summary string for display
    pub fn summary(&self) -> String {
        let per_approach: Vec<String> = Approach::ROTATION
            .iter()
            .map(|approach| format!("{}={}", approach, self.greens_for(*approach)))
            .collect();
        format!(
            "Transitions: {} | Resets: {} | Greens: {}",
            self.transitions_completed,
            self.resets,
            per_approach.join(" ")
        )
    }
}
