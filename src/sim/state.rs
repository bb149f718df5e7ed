//! App state shared by the three screens
//!
//! Owned by the event loop: input handlers write it through `tick`, the
//! renderer reads it once per frame.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::abacus::{Abacus, AbacusEvent};
use super::anim::{
    AnimationClock, Transform, bead_reset_position, dice_roll_transform, staggered_duration,
};
use super::dice::{DiceRoller, ShakeDetector};
use super::rod::LayoutError;
use super::tally::Tally;
use crate::consts::*;
use crate::settings::Settings;

/// Tabs of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Abacus,
    Dice,
    Tally,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Abacus, Screen::Dice, Screen::Tally];

    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Abacus => "Abacus",
            Screen::Dice => "Dice",
            Screen::Tally => "Tally",
        }
    }

    /// Tab under a layout-space point, if it lies in the tab bar
    pub fn at(point: Vec2) -> Option<Self> {
        if !(0.0..TAB_BAR_HEIGHT).contains(&point.y) || !(0.0..VIEW_WIDTH).contains(&point.x) {
            return None;
        }
        let slot = (point.x / (VIEW_WIDTH / Self::ALL.len() as f32)) as usize;
        Self::ALL.get(slot).copied()
    }

    /// Tab to the right, wrapping
    pub fn next(&self) -> Self {
        match self {
            Screen::Abacus => Screen::Dice,
            Screen::Dice => Screen::Tally,
            Screen::Tally => Screen::Abacus,
        }
    }
}

/// Things that happened during a tick, for sound and haptics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    ScreenChanged(Screen),
    BeadMoved { rod: usize, bead: usize },
    EdgeBump { rod: usize },
    AbacusReset,
    DiceRolled { sum: u32 },
    TallyChanged {
        counter: usize,
        count: u32,
        increased: bool,
    },
    TallyReset,
}

impl AppEvent {
    /// Whether this event should buzz the device
    pub fn haptic(&self) -> bool {
        matches!(
            self,
            AppEvent::BeadMoved { .. } | AppEvent::DiceRolled { .. } | AppEvent::TallyChanged { .. }
        )
    }
}

impl From<AbacusEvent> for AppEvent {
    fn from(event: AbacusEvent) -> Self {
        match event {
            AbacusEvent::BeadMoved { rod, bead } => AppEvent::BeadMoved { rod, bead },
            AbacusEvent::EdgeBump { rod } => AppEvent::EdgeBump { rod },
        }
    }
}

/// RNG seed wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete app state
#[derive(Debug, Clone)]
pub struct AppState {
    pub seed: u64,
    pub screen: Screen,
    pub settings: Settings,
    pub abacus: Abacus,
    pub dice: DiceRoller,
    pub tally: Tally,
    pub shake: ShakeDetector,
    /// Seconds since start
    pub time: f64,
    dice_clock: AnimationClock,
    reset_clock: AnimationClock,
    /// Bead positions just before the last reset, for the slide-home animation
    reset_from: Vec<Vec<f32>>,
    events: Vec<AppEvent>,
}

impl AppState {
    pub fn new(seed: u64, settings: Settings) -> Result<Self, LayoutError> {
        let abacus = Abacus::new(
            settings.rod_count,
            settings.rod_layout(),
            Vec2::new(ABACUS_ORIGIN.0, ABACUS_ORIGIN.1),
            ROD_GAP,
        )?;
        Ok(Self {
            seed,
            screen: Screen::Abacus,
            dice: DiceRoller::new(seed, settings.dice_count),
            settings,
            abacus,
            tally: Tally::scoreboard(),
            shake: ShakeDetector::default(),
            time: 0.0,
            dice_clock: AnimationClock::default(),
            reset_clock: AnimationClock::default(),
            reset_from: Vec::new(),
            events: Vec::new(),
        })
    }

    pub fn push_event(&mut self, event: AppEvent) {
        self.events.push(event);
    }

    /// Drain the events produced since the last call
    pub fn take_events(&mut self) -> Vec<AppEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        if screen == self.screen {
            return;
        }
        self.abacus.cancel_drags();
        self.screen = screen;
        log::info!("Switched to {} screen", screen.as_str());
        self.push_event(AppEvent::ScreenChanged(screen));
    }

    pub fn roll_dice(&mut self) {
        self.dice.roll();
        if !self.settings.reduced_motion {
            self.dice_clock.start(staggered_duration(
                self.dice.count(),
                DICE_STAGGER,
                DICE_ROLL_DURATION,
            ));
        }
        let sum = self.dice.sum();
        self.push_event(AppEvent::DiceRolled { sum });
    }

    pub fn reset_abacus(&mut self) {
        self.reset_from = self
            .abacus
            .rods()
            .iter()
            .map(|rod| rod.positions().collect())
            .collect();
        self.abacus.reset();
        if !self.settings.reduced_motion {
            self.reset_clock.start(staggered_duration(
                self.settings.beads_per_rod,
                RESET_STAGGER,
                RESET_DURATION,
            ));
        }
        self.push_event(AppEvent::AbacusReset);
    }

    /// Advance animation clocks
    pub fn advance_clocks(&mut self, dt: f32) {
        self.dice_clock.tick(dt);
        self.reset_clock.tick(dt);
    }

    pub fn is_animating(&self) -> bool {
        self.dice_clock.is_running() || self.reset_clock.is_running()
    }

    /// Where to draw a bead this frame (follows the reset slide when active)
    pub fn displayed_bead_position(&self, rod: usize, bead: usize) -> Option<f32> {
        let actual = self.abacus.rod(rod)?.position(bead)?;
        if !self.reset_clock.is_running() {
            return Some(actual);
        }
        let from = self
            .reset_from
            .get(rod)
            .and_then(|r| r.get(bead))
            .copied()
            .unwrap_or(actual);
        Some(bead_reset_position(
            bead,
            self.reset_clock.elapsed(),
            from,
            actual,
        ))
    }

    pub fn dice_transform(&self, index: usize) -> Transform {
        if self.dice_clock.is_running() {
            dice_roll_transform(index, self.dice_clock.elapsed())
        } else {
            Transform::IDENTITY
        }
    }

    /// Centre of die `index` in layout space
    pub fn die_center(&self, index: usize) -> Vec2 {
        let n = self.dice.count() as f32;
        let row = n * DIE_SIZE + (n - 1.0) * DIE_GAP;
        let left = (VIEW_WIDTH - row) / 2.0 + DIE_SIZE / 2.0;
        Vec2::new(left + index as f32 * (DIE_SIZE + DIE_GAP), DICE_Y)
    }

    /// Tally row under a point and whether it hit the increment half
    pub fn tally_hit(&self, point: Vec2) -> Option<(usize, bool)> {
        if point.y < TALLY_TOP || !(0.0..=VIEW_WIDTH).contains(&point.x) {
            return None;
        }
        let row = ((point.y - TALLY_TOP) / TALLY_ROW_HEIGHT) as usize;
        (row < self.tally.len()).then_some((row, point.x >= VIEW_WIDTH / 2.0))
    }
}
