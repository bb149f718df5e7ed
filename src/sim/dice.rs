//! Dice roller and shake-to-roll detection

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::RngState;
use crate::consts::*;

/// A set of six-sided dice rolled together
#[derive(Debug, Clone)]
pub struct DiceRoller {
    faces: Vec<u8>,
    /// Sums of previous rolls, newest first
    history: Vec<u32>,
    rng: Pcg32,
}

impl DiceRoller {
    pub fn new(seed: u64, count: usize) -> Self {
        let count = count.clamp(MIN_DICE, MAX_DICE);
        Self {
            faces: vec![1; count],
            history: Vec::with_capacity(ROLL_HISTORY_LEN),
            rng: RngState::new(seed).to_rng(),
        }
    }

    pub fn count(&self) -> usize {
        self.faces.len()
    }

    /// Change how many dice are on the table; new dice show 1
    pub fn set_count(&mut self, count: usize) {
        let count = count.clamp(MIN_DICE, MAX_DICE);
        self.faces.resize(count, 1);
    }

    pub fn faces(&self) -> &[u8] {
        &self.faces
    }

    /// Roll every die and record the sum
    pub fn roll(&mut self) -> &[u8] {
        for face in &mut self.faces {
            *face = self.rng.random_range(1..=DIE_FACES);
        }
        let sum = self.sum();
        self.history.insert(0, sum);
        self.history.truncate(ROLL_HISTORY_LEN);
        log::debug!("Rolled {:?} (sum {sum})", self.faces);
        &self.faces
    }

    pub fn sum(&self) -> u32 {
        self.faces.iter().map(|&f| f as u32).sum()
    }

    pub fn history(&self) -> &[u32] {
        &self.history
    }
}

/// Detects a deliberate shake from accelerometer samples
#[derive(Debug, Clone)]
pub struct ShakeDetector {
    /// Acceleration magnitude (m/s², gravity excluded) that counts as a shake
    pub threshold: f32,
    /// Minimum seconds between two shakes
    pub cooldown: f64,
    last_fire: Option<f64>,
}

impl Default for ShakeDetector {
    fn default() -> Self {
        Self::new(SHAKE_THRESHOLD, SHAKE_COOLDOWN)
    }
}

impl ShakeDetector {
    pub fn new(threshold: f32, cooldown: f64) -> Self {
        Self {
            threshold,
            cooldown,
            last_fire: None,
        }
    }

    /// Feed one sample taken at `time` seconds; true when it counts as a shake
    pub fn sample(&mut self, accel: Vec3, time: f64) -> bool {
        if !accel.is_finite() || accel.length() < self.threshold {
            return false;
        }
        if let Some(last) = self.last_fire
            && time - last < self.cooldown
        {
            return false;
        }
        self.last_fire = Some(time);
        true
    }
}
