//! Tally / score counters

use serde::{Deserialize, Serialize};

use crate::consts::MAX_COUNTERS;
use crate::settings::BeadColor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counter {
    pub label: String,
    pub count: u32,
    pub color: BeadColor,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tally {
    counters: Vec<Counter>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two counters, the usual home/away scoreboard
    pub fn scoreboard() -> Self {
        let mut tally = Self::new();
        tally.add_counter("Player 1");
        tally.add_counter("Player 2");
        tally
    }

    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Add a counter; returns its index, or None when the board is full
    pub fn add_counter(&mut self, label: impl Into<String>) -> Option<usize> {
        if self.counters.len() >= MAX_COUNTERS {
            return None;
        }
        let index = self.counters.len();
        self.counters.push(Counter {
            label: label.into(),
            count: 0,
            color: BeadColor::for_rod(index),
        });
        Some(index)
    }

    pub fn remove_counter(&mut self, index: usize) -> Option<Counter> {
        (index < self.counters.len()).then(|| self.counters.remove(index))
    }

    pub fn increment(&mut self, index: usize) -> Option<u32> {
        let c = self.counters.get_mut(index)?;
        c.count = c.count.saturating_add(1);
        Some(c.count)
    }

    /// Decrement, stopping at zero. `None` if the counter is missing or already 0.
    pub fn decrement(&mut self, index: usize) -> Option<u32> {
        let c = self.counters.get_mut(index)?;
        c.count = c.count.checked_sub(1)?;
        Some(c.count)
    }

    pub fn reset(&mut self) {
        for c in &mut self.counters {
            c.count = 0;
        }
    }

    pub fn total(&self) -> u32 {
        self.counters.iter().map(|c| c.count).sum()
    }

    /// Share of the total held by counter `index`, in percent
    pub fn percentage(&self, index: usize) -> f32 {
        let total = self.total();
        match self.counters.get(index) {
            Some(c) if total > 0 => c.count as f32 * 100.0 / total as f32,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_decrement() {
        let mut t = Tally::scoreboard();
        assert_eq!(t.increment(0), Some(1));
        assert_eq!(t.increment(0), Some(2));
        assert_eq!(t.decrement(1), None);
        assert_eq!(t.counters()[1].count, 0);
        assert_eq!(t.decrement(0), Some(1));
        assert_eq!(t.decrement(0), Some(0));
        assert_eq!(t.decrement(0), None);
        assert_eq!(t.increment(5), None);
    }

    #[test]
    fn test_percentages() {
        let mut t = Tally::scoreboard();
        assert_eq!(t.percentage(0), 0.0);
        t.increment(0);
        t.increment(0);
        t.increment(0);
        t.increment(1);
        assert_eq!(t.total(), 4);
        assert_eq!(t.percentage(0), 75.0);
        assert_eq!(t.percentage(1), 25.0);
        assert_eq!(t.percentage(7), 0.0);
    }

    #[test]
    fn test_counter_limit_and_removal() {
        let mut t = Tally::new();
        for i in 0..MAX_COUNTERS {
            assert_eq!(t.add_counter(format!("C{i}")), Some(i));
        }
        assert_eq!(t.add_counter("extra"), None);
        let removed = t.remove_counter(0).unwrap();
        assert_eq!(removed.label, "C0");
        assert_eq!(t.len(), MAX_COUNTERS - 1);
        assert!(t.remove_counter(100).is_none());
    }

    #[test]
    fn test_reset() {
        let mut t = Tally::scoreboard();
        t.increment(0);
        t.increment(1);
        t.reset();
        assert_eq!(t.total(), 0);
        assert_eq!(t.len(), 2);
    }
}
