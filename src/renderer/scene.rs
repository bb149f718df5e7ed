//! Turns the app state into a flat triangle list in layout space

use glam::Vec2;

use super::shapes::{circle, die_pips, place, rect, rounded_rect};
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::sim::{AppState, Screen};

/// Corner resolution for beads and dice
pub const CORNER_SEGMENTS: u32 = 4;
const PIP_SEGMENTS: u32 = 12;
const HISTORY_TOP: f32 = 360.0;
const HISTORY_HEIGHT: f32 = 80.0;

/// Build every vertex for the current frame
pub fn build(state: &AppState) -> Vec<Vertex> {
    let mut vertices = tab_bar(state.screen);
    match state.screen {
        Screen::Abacus => abacus(state, &mut vertices),
        Screen::Dice => dice(state, &mut vertices),
        Screen::Tally => tally(state, &mut vertices),
    }
    vertices
}

fn tab_bar(active: Screen) -> Vec<Vertex> {
    let width = VIEW_WIDTH / Screen::ALL.len() as f32;
    Screen::ALL
        .iter()
        .enumerate()
        .flat_map(|(i, screen)| {
            let color = if *screen == active {
                colors::TAB_ACTIVE
            } else {
                colors::TAB
            };
            let x = i as f32 * width;
            rect(
                Vec2::new(x + 2.0, 4.0),
                Vec2::new(x + width - 2.0, TAB_BAR_HEIGHT - 4.0),
                color,
            )
        })
        .collect()
}

fn abacus(state: &AppState, out: &mut Vec<Vertex>) {
    let abacus = &state.abacus;
    let Some(first) = abacus.rod(0) else { return };
    let track = first.layout().track_length;
    let last_y = abacus.rod_y(abacus.rods().len() - 1);

    out.extend(rect(
        Vec2::new(abacus.origin.x - 8.0, abacus.rod_y(0) - abacus.rod_gap / 2.0),
        Vec2::new(abacus.origin.x + track + 8.0, last_y + abacus.rod_gap / 2.0),
        colors::FRAME,
    ));

    for (r, rod) in abacus.rods().iter().enumerate() {
        let y = abacus.rod_y(r);
        out.extend(rect(
            Vec2::new(abacus.origin.x, y - 1.5),
            Vec2::new(abacus.origin.x + track, y + 1.5),
            colors::ROD,
        ));

        let half = Vec2::new(rod.layout().bead_width / 2.0, BEAD_HEIGHT / 2.0);
        let color = abacus.color(r).rgba();
        for bead in rod.beads() {
            let x = state
                .displayed_bead_position(r, bead.index)
                .unwrap_or(bead.position);
            let center = Vec2::new(abacus.origin.x + x + half.x, y);
            out.extend(rounded_rect(center, half, 6.0, color, CORNER_SEGMENTS));
        }
    }
}

fn dice(state: &AppState, out: &mut Vec<Vertex>) {
    let half = DIE_SIZE / 2.0;
    let pip_spread = DIE_SIZE * 0.28;

    for (i, face) in state.dice.faces().iter().enumerate() {
        let mut die = rounded_rect(
            Vec2::ZERO,
            Vec2::splat(half),
            10.0,
            colors::DIE_FACE,
            CORNER_SEGMENTS,
        );
        for (u, v) in die_pips(*face) {
            die.extend(circle(
                Vec2::new(*u, *v) * pip_spread,
                DIE_SIZE * 0.08,
                colors::DIE_PIP,
                PIP_SEGMENTS,
            ));
        }
        place(&mut die, state.die_center(i), &state.dice_transform(i));
        out.extend(die);
    }

    // Recent sums, newest on the left
    let max_sum = (MAX_DICE * DIE_FACES as usize) as f32;
    let bar = 16.0;
    let gap = 4.0;
    let history = state.dice.history();
    let left = (VIEW_WIDTH - history.len() as f32 * (bar + gap)) / 2.0;
    for (k, sum) in history.iter().enumerate() {
        let x = left + k as f32 * (bar + gap);
        let h = HISTORY_HEIGHT * (*sum as f32 / max_sum).min(1.0);
        out.extend(rect(
            Vec2::new(x, HISTORY_TOP + HISTORY_HEIGHT - h),
            Vec2::new(x + bar, HISTORY_TOP + HISTORY_HEIGHT),
            colors::HISTORY_BAR,
        ));
    }
}

fn tally(state: &AppState, out: &mut Vec<Vertex>) {
    let button = 40.0;
    let margin = 16.0;

    for (i, counter) in state.tally.counters().iter().enumerate() {
        let top = TALLY_TOP + i as f32 * TALLY_ROW_HEIGHT + 4.0;
        let bottom = top + TALLY_ROW_HEIGHT - 8.0;

        out.extend(rect(
            Vec2::new(margin, top),
            Vec2::new(VIEW_WIDTH - margin, bottom),
            colors::ROW,
        ));
        out.extend(rect(
            Vec2::new(margin, top),
            Vec2::new(margin + button, bottom),
            colors::BUTTON_MINUS,
        ));
        out.extend(rect(
            Vec2::new(VIEW_WIDTH - margin - button, top),
            Vec2::new(VIEW_WIDTH - margin, bottom),
            colors::BUTTON_PLUS,
        ));

        let bar_left = margin + button + 8.0;
        let bar_span = VIEW_WIDTH - 2.0 * bar_left;
        let share = state.tally.percentage(i) / 100.0;
        if share > 0.0 {
            out.extend(rect(
                Vec2::new(bar_left, top + 8.0),
                Vec2::new(bar_left + bar_span * share, bottom - 8.0),
                counter.color.rgba(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::shapes::rounded_rect_len;
    use crate::settings::Settings;

    fn state_with(settings: Settings) -> AppState {
        AppState::new(7, settings).unwrap()
    }

    #[test]
    fn test_abacus_vertices_scale_with_rods() {
        let full = build(&state_with(Settings::default()));
        let small = build(&state_with(Settings {
            rod_count: 4,
            ..Settings::default()
        }));
        let per_rod = 6 + BEADS_PER_ROD * rounded_rect_len(CORNER_SEGMENTS);
        assert_eq!(full.len() - small.len(), 6 * per_rod);
    }

    #[test]
    fn test_settled_dice_stay_in_view() {
        let mut s = state_with(Settings {
            dice_count: MAX_DICE,
            reduced_motion: true,
            ..Settings::default()
        });
        s.switch_screen(Screen::Dice);
        s.roll_dice();
        for v in build(&s) {
            assert!((0.0..=VIEW_WIDTH).contains(&v.position[0]));
            assert!((0.0..=VIEW_HEIGHT).contains(&v.position[1]));
        }
    }

    #[test]
    fn test_tally_bars_follow_counts() {
        let mut s = state_with(Settings::default());
        s.switch_screen(Screen::Tally);
        let empty = build(&s).len();
        s.tally.increment(0);
        // One share bar appears for the only non-zero counter
        assert_eq!(build(&s).len(), empty + 6);
    }
}
