//! Deterministic app model
//!
//! Everything the screens show lives here. This module must stay pure:
//! - Seeded RNG only
//! - Time comes in through `tick`, never from a global clock
//! - No rendering or platform dependencies

pub mod abacus;
pub mod anim;
pub mod dice;
pub mod gesture;
pub mod rod;
pub mod state;
pub mod tally;
pub mod tick;

pub use abacus::{Abacus, AbacusEvent};
pub use anim::{AnimationClock, Transform};
pub use dice::{DiceRoller, ShakeDetector};
pub use gesture::{DragGesture, DragTracker, PointerId};
pub use rod::{Bead, ContactMode, DragOutcome, LayoutError, Rod, RodLayout};
pub use state::{AppEvent, AppState, Screen};
pub use tally::{Counter, Tally};
pub use tick::{FrameInput, PointerInput, TallyCommand, tick};
