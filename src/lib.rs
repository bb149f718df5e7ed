//! Bead Board - abacus, dice roller and tally counter mini-apps
//!
//! Core modules:
//! - `sim`: Deterministic app state (bead solver, gestures, dice, tally, animation)
//! - `renderer`: Vertex generation and the WebGPU pipeline
//! - `audio`: Fire-and-forget sound cues
//! - `settings`: User-facing configuration

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{BeadColor, Settings};

/// Layout and interaction constants
pub mod consts {
    /// Beads per rod
    pub const BEADS_PER_ROD: usize = 10;
    /// Rods on the abacus screen
    pub const ROD_COUNT: usize = 10;

    /// Bead geometry (logical pixels)
    pub const BEAD_WIDTH: f32 = 20.0;
    pub const BEAD_HEIGHT: f32 = 28.0;
    pub const BEAD_SPACING: f32 = 2.0;
    pub const TRACK_LENGTH: f32 = 400.0;

    /// Vertical distance between rod centerlines
    pub const ROD_GAP: f32 = 36.0;
    /// Top-left corner of the first rod's track
    pub const ABACUS_ORIGIN: (f32, f32) = (40.0, 60.0);

    /// Minimum travel (in track units) for a drag to count as "bead moved"
    pub const MOVE_THRESHOLD: f32 = 1.0;

    /// Dice
    pub const MIN_DICE: usize = 1;
    pub const MAX_DICE: usize = 6;
    pub const DIE_FACES: u8 = 6;
    pub const ROLL_HISTORY_LEN: usize = 20;

    /// Shake-to-roll: acceleration magnitude (m/s²) and cooldown (seconds)
    pub const SHAKE_THRESHOLD: f32 = 15.0;
    pub const SHAKE_COOLDOWN: f64 = 1.0;

    /// Dice screen layout
    pub const DIE_SIZE: f32 = 64.0;
    pub const DIE_GAP: f32 = 12.0;
    pub const DICE_Y: f32 = 200.0;

    /// Tally
    pub const MAX_COUNTERS: usize = 8;
    pub const TALLY_TOP: f32 = 60.0;
    pub const TALLY_ROW_HEIGHT: f32 = 48.0;

    /// Animation timing (seconds)
    pub const DICE_ROLL_DURATION: f32 = 0.6;
    pub const DICE_STAGGER: f32 = 0.08;
    pub const RESET_DURATION: f32 = 0.35;
    pub const RESET_STAGGER: f32 = 0.03;

    /// Tab bar across the top of every screen
    pub const TAB_BAR_HEIGHT: f32 = 40.0;

    /// Logical canvas size the scene is laid out in
    pub const VIEW_WIDTH: f32 = 480.0;
    pub const VIEW_HEIGHT: f32 = 480.0;
}

/// Ease-out cubic on [0, 1]
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
