//! Per-frame input dispatch
//!
//! Platform code collects whatever happened since the last frame into a
//! `FrameInput`; `tick` applies it to the active screen and advances the
//! animation clocks.

use glam::{Vec2, Vec3};

use super::gesture::PointerId;
use super::state::{AppEvent, AppState, Screen};
use crate::settings::BeadColor;

/// A pointer event in layout coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down { id: PointerId, pos: Vec2 },
    Move { id: PointerId, pos: Vec2 },
    Up { id: PointerId },
    /// The platform took the pointer away (scroll, palm rejection, ...)
    Cancel { id: PointerId },
}

/// Commands for the tally screen
#[derive(Debug, Clone, PartialEq)]
pub enum TallyCommand {
    Increment(usize),
    Decrement(usize),
    Add(String),
    Remove(usize),
}

/// Everything the user did since the previous frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Tab to show
    pub switch_to: Option<Screen>,
    pub pointers: Vec<PointerInput>,
    /// Roll button / space bar
    pub roll: bool,
    /// Reset the active screen
    pub reset: bool,
    /// Latest accelerometer reading (m/s², gravity excluded)
    pub motion: Option<Vec3>,
    pub tally: Vec<TallyCommand>,
    /// Colour picker selection for a rod
    pub rod_color: Option<(usize, BeadColor)>,
    pub dice_count: Option<usize>,
}

/// Apply one frame of input and advance clocks by `dt` seconds
pub fn tick(state: &mut AppState, input: &FrameInput, dt: f32) {
    state.time += dt.max(0.0) as f64;

    // Presses on the tab bar switch screens and go no further
    let mut switch_to = input.switch_to;
    let pointers: Vec<PointerInput> = input
        .pointers
        .iter()
        .copied()
        .filter(|p| match p {
            PointerInput::Down { pos, .. } => match Screen::at(*pos) {
                Some(screen) => {
                    switch_to = Some(screen);
                    false
                }
                None => true,
            },
            _ => true,
        })
        .collect();

    if let Some(screen) = switch_to {
        state.switch_screen(screen);
    }

    match state.screen {
        Screen::Abacus => tick_abacus(state, input, &pointers),
        Screen::Dice => tick_dice(state, input, &pointers),
        Screen::Tally => tick_tally(state, input, &pointers),
    }

    state.advance_clocks(dt);
}

fn tick_abacus(state: &mut AppState, input: &FrameInput, pointers: &[PointerInput]) {
    if let Some((rod, color)) = input.rod_color {
        state.abacus.set_rod_color(rod, color);
    }

    for pointer in pointers {
        let event = match *pointer {
            PointerInput::Down { id, pos } => {
                state.abacus.pointer_down(id, pos);
                None
            }
            PointerInput::Move { id, pos } => state.abacus.pointer_move(id, pos),
            PointerInput::Up { id } => state.abacus.pointer_up(id),
            PointerInput::Cancel { id } => {
                state.abacus.pointer_cancel(id);
                None
            }
        };
        if let Some(event) = event {
            state.push_event(event.into());
        }
    }

    if input.reset {
        state.reset_abacus();
    }
}

fn tick_dice(state: &mut AppState, input: &FrameInput, pointers: &[PointerInput]) {
    if let Some(count) = input.dice_count {
        state.dice.set_count(count);
    }

    let tapped = pointers
        .iter()
        .any(|p| matches!(p, PointerInput::Down { .. }));
    let shaken = match input.motion {
        Some(accel) if state.settings.shake_to_roll => state.shake.sample(accel, state.time),
        _ => false,
    };

    if input.roll || tapped || shaken {
        state.roll_dice();
    }
}

fn tick_tally(state: &mut AppState, input: &FrameInput, pointers: &[PointerInput]) {
    let mut commands = input.tally.clone();
    for pointer in pointers {
        if let PointerInput::Down { pos, .. } = pointer
            && let Some((row, up)) = state.tally_hit(*pos)
        {
            commands.push(if up {
                TallyCommand::Increment(row)
            } else {
                TallyCommand::Decrement(row)
            });
        }
    }

    for command in commands {
        match command {
            TallyCommand::Increment(i) => {
                if let Some(count) = state.tally.increment(i) {
                    state.push_event(AppEvent::TallyChanged {
                        counter: i,
                        count,
                        increased: true,
                    });
                }
            }
            TallyCommand::Decrement(i) => {
                if let Some(count) = state.tally.decrement(i) {
                    state.push_event(AppEvent::TallyChanged {
                        counter: i,
                        count,
                        increased: false,
                    });
                }
            }
            TallyCommand::Add(label) => {
                if state.tally.add_counter(label).is_none() {
                    log::warn!("Tally is full");
                }
            }
            TallyCommand::Remove(i) => {
                state.tally.remove_counter(i);
            }
        }
    }

    if input.reset {
        state.tally.reset();
        state.push_event(AppEvent::TallyReset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Settings;

    const DT: f32 = 1.0 / 60.0;

    fn state() -> AppState {
        AppState::new(12345, Settings::default()).unwrap()
    }

    #[test]
    fn test_drag_through_tick() {
        let mut s = state();
        let frames = [
            vec![PointerInput::Down {
                id: 1,
                pos: Vec2::new(240.0, 60.0),
            }],
            vec![PointerInput::Move {
                id: 1,
                pos: Vec2::new(280.0, 60.0),
            }],
            vec![PointerInput::Up { id: 1 }],
        ];
        for pointers in frames {
            let input = FrameInput {
                pointers,
                ..Default::default()
            };
            tick(&mut s, &input, DT);
        }
        assert_eq!(s.abacus.rod(0).unwrap().position(9), Some(238.0));
        assert_eq!(s.take_events(), vec![AppEvent::BeadMoved { rod: 0, bead: 9 }]);
    }

    #[test]
    fn test_cancelled_drag_is_silent() {
        let mut s = state();
        let frames = [
            vec![PointerInput::Down {
                id: 1,
                pos: Vec2::new(240.0, 60.0),
            }],
            vec![PointerInput::Move {
                id: 1,
                pos: Vec2::new(280.0, 60.0),
            }],
            vec![PointerInput::Cancel { id: 1 }],
        ];
        for pointers in frames {
            let input = FrameInput {
                pointers,
                ..Default::default()
            };
            tick(&mut s, &input, DT);
        }
        assert_eq!(s.abacus.rod(0).unwrap().position(9), Some(238.0));
        assert!(!s.abacus.is_dragging());
        assert!(s.take_events().is_empty());
    }

    #[test]
    fn test_pointer_input_ignored_on_other_screens() {
        let mut s = state();
        let input = FrameInput {
            switch_to: Some(Screen::Tally),
            pointers: vec![PointerInput::Down {
                id: 1,
                pos: Vec2::new(240.0, 60.0),
            }],
            ..Default::default()
        };
        tick(&mut s, &input, DT);
        assert!(!s.abacus.is_dragging());
    }

    #[test]
    fn test_switching_tabs_cancels_drag() {
        let mut s = state();
        let down = FrameInput {
            pointers: vec![PointerInput::Down {
                id: 1,
                pos: Vec2::new(240.0, 60.0),
            }],
            ..Default::default()
        };
        tick(&mut s, &down, DT);
        assert!(s.abacus.is_dragging());

        let switch = FrameInput {
            switch_to: Some(Screen::Dice),
            ..Default::default()
        };
        tick(&mut s, &switch, DT);
        assert!(!s.abacus.is_dragging());
    }

    #[test]
    fn test_roll_and_shake() {
        let mut s = state();
        s.switch_screen(Screen::Dice);
        s.take_events();

        let roll = FrameInput {
            roll: true,
            ..Default::default()
        };
        tick(&mut s, &roll, DT);
        let events = s.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], AppEvent::DiceRolled { .. }));
        assert!(s.is_animating());

        // Gentle motion does nothing, a hard shake rolls
        let calm = FrameInput {
            motion: Some(Vec3::new(1.0, 0.0, 0.0)),
            ..Default::default()
        };
        tick(&mut s, &calm, DT);
        assert!(s.take_events().is_empty());

        let shake = FrameInput {
            motion: Some(Vec3::new(30.0, 0.0, 0.0)),
            ..Default::default()
        };
        tick(&mut s, &shake, DT);
        assert_eq!(s.take_events().len(), 1);
        assert_eq!(s.dice.history().len(), 2);
    }

    #[test]
    fn test_shake_disabled_in_settings() {
        let settings = Settings {
            shake_to_roll: false,
            ..Settings::default()
        };
        let mut s = AppState::new(1, settings).unwrap();
        s.switch_screen(Screen::Dice);
        let shake = FrameInput {
            motion: Some(Vec3::new(30.0, 0.0, 0.0)),
            ..Default::default()
        };
        tick(&mut s, &shake, DT);
        assert!(s.dice.history().is_empty());
    }

    #[test]
    fn test_tally_commands_and_taps() {
        let mut s = state();
        s.switch_screen(Screen::Tally);
        s.take_events();

        let input = FrameInput {
            tally: vec![
                TallyCommand::Increment(0),
                TallyCommand::Increment(0),
                TallyCommand::Add("Player 3".into()),
            ],
            pointers: vec![PointerInput::Down {
                id: 1,
                pos: Vec2::new(VIEW_WIDTH - 10.0, TALLY_TOP + TALLY_ROW_HEIGHT + 4.0),
            }],
            ..Default::default()
        };
        tick(&mut s, &input, DT);
        assert_eq!(s.tally.counters()[0].count, 2);
        assert_eq!(s.tally.counters()[1].count, 1);
        assert_eq!(s.tally.len(), 3);
        assert_eq!(s.take_events().len(), 3);

        let reset = FrameInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut s, &reset, DT);
        assert_eq!(s.tally.total(), 0);
        assert_eq!(s.take_events(), vec![AppEvent::TallyReset]);
    }

    #[test]
    fn test_decrement_at_zero_is_silent() {
        let mut s = state();
        s.switch_screen(Screen::Tally);
        s.take_events();
        let input = FrameInput {
            tally: vec![TallyCommand::Decrement(0)],
            pointers: vec![PointerInput::Down {
                id: 1,
                pos: Vec2::new(10.0, TALLY_TOP + TALLY_ROW_HEIGHT + 4.0),
            }],
            ..Default::default()
        };
        tick(&mut s, &input, DT);
        assert_eq!(s.tally.total(), 0);
        assert!(s.take_events().is_empty());
    }

    #[test]
    fn test_tab_bar_press_switches_without_rolling() {
        let mut s = state();
        s.switch_screen(Screen::Dice);
        s.take_events();
        let input = FrameInput {
            pointers: vec![PointerInput::Down {
                id: 1,
                pos: Vec2::new(VIEW_WIDTH / 2.0, 10.0),
            }],
            ..Default::default()
        };
        tick(&mut s, &input, DT);
        assert!(s.dice.history().is_empty());

        let input = FrameInput {
            pointers: vec![PointerInput::Down {
                id: 1,
                pos: Vec2::new(VIEW_WIDTH - 5.0, 10.0),
            }],
            ..Default::default()
        };
        tick(&mut s, &input, DT);
        assert_eq!(s.screen, Screen::Tally);
        assert_eq!(s.take_events(), vec![AppEvent::ScreenChanged(Screen::Tally)]);
    }

    #[test]
    fn test_reset_abacus_via_input() {
        let mut s = state();
        s.abacus.pointer_down(1, Vec2::new(45.0, 96.0));
        s.abacus.pointer_move(1, Vec2::new(145.0, 96.0));
        s.abacus.pointer_up(1);

        let reset = FrameInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut s, &reset, DT);
        assert_eq!(s.abacus.rod(1).unwrap().position(0), Some(0.0));
        assert_eq!(s.take_events(), vec![AppEvent::AbacusReset]);
    }
}
