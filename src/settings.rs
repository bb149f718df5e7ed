//! User preferences and bead palette
//!
//! Settings come from a JSON blob supplied by the host page (the canvas
//! `data-settings` attribute on the web). Nothing is written back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::rod::{ContactMode, RodLayout};

/// Bead / counter colours offered by the colour picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BeadColor {
    #[default]
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Wood,
}

impl BeadColor {
    pub const ALL: [BeadColor; 7] = [
        BeadColor::Red,
        BeadColor::Orange,
        BeadColor::Yellow,
        BeadColor::Green,
        BeadColor::Blue,
        BeadColor::Purple,
        BeadColor::Wood,
    ];

    /// Default colour of rod `index`, cycling through the palette
    pub fn for_rod(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BeadColor::Red => "Red",
            BeadColor::Orange => "Orange",
            BeadColor::Yellow => "Yellow",
            BeadColor::Green => "Green",
            BeadColor::Blue => "Blue",
            BeadColor::Purple => "Purple",
            BeadColor::Wood => "Wood",
        }
    }

    pub fn rgba(&self) -> [f32; 4] {
        match self {
            BeadColor::Red => [0.90, 0.25, 0.25, 1.0],
            BeadColor::Orange => [0.95, 0.55, 0.15, 1.0],
            BeadColor::Yellow => [0.95, 0.85, 0.25, 1.0],
            BeadColor::Green => [0.30, 0.75, 0.35, 1.0],
            BeadColor::Blue => [0.25, 0.50, 0.90, 1.0],
            BeadColor::Purple => [0.60, 0.35, 0.85, 1.0],
            BeadColor::Wood => [0.65, 0.45, 0.25, 1.0],
        }
    }
}

impl FromStr for BeadColor {
    type Err = UnknownColor;

    /// Case-insensitive colour name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

/// A colour name outside the palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown bead colour '{}'", self.0)
    }
}

impl std::error::Error for UnknownColor {}

/// App settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Abacus ===
    /// Whether dragged beads push their neighbours or stop against them
    pub contact: ContactMode,
    pub beads_per_rod: usize,
    pub rod_count: usize,

    // === Dice ===
    pub dice_count: usize,
    /// Roll when the device is shaken
    pub shake_to_roll: bool,

    // === Feedback ===
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Vibrate on bead clicks and rolls
    pub haptics: bool,

    // === Accessibility ===
    /// Skip roll and reset animations
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            contact: ContactMode::Push,
            beads_per_rod: BEADS_PER_ROD,
            rod_count: ROD_COUNT,

            dice_count: 2,
            shake_to_roll: true,

            sound: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            haptics: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse settings if provided, falling back to defaults on any problem
    pub fn load(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Ignoring malformed settings: {e}");
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Rod geometry these settings ask for
    pub fn rod_layout(&self) -> RodLayout {
        RodLayout {
            bead_count: self.beads_per_rod,
            contact: self.contact,
            ..RodLayout::default()
        }
    }

    /// Volume actually used for sound effects (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.sound {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
