//! Sound cues
//!
//! Procedurally generated with the Web Audio API, no sample files. Playback is
//! fire-and-forget: any failure is logged and dropped, never reaching the app
//! state. Native builds only log what would have played.

use crate::sim::AppEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bead settled after a drag
    BeadClick,
    /// Bead chain hit the end of the rod
    EdgeKnock,
    /// All beads slid home
    Reset,
    /// Dice tumbling
    DiceRoll,
    /// Counter went up
    TallyUp,
    /// Counter went down
    TallyDown,
    /// Tab switch
    Tab,
}

impl SoundEffect {
    /// Cue for an app event, if it has one
    pub fn for_event(event: &AppEvent) -> Option<Self> {
        match event {
            AppEvent::ScreenChanged(_) => Some(SoundEffect::Tab),
            AppEvent::BeadMoved { .. } => Some(SoundEffect::BeadClick),
            AppEvent::EdgeBump { .. } => Some(SoundEffect::EdgeKnock),
            AppEvent::AbacusReset | AppEvent::TallyReset => Some(SoundEffect::Reset),
            AppEvent::DiceRolled { .. } => Some(SoundEffect::DiceRoll),
            AppEvent::TallyChanged {
                increased: true, ..
            } => Some(SoundEffect::TallyUp),
            AppEvent::TallyChanged { .. } => Some(SoundEffect::TallyDown),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(not(target_arch = "wasm32"))]
pub use native::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    /// Audio manager backed by an `AudioContext`
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new(0.8)
        }
    }

    impl AudioManager {
        pub fn new(volume: f32) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: volume.clamp(0.0, 1.0),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let played = match effect {
                SoundEffect::BeadClick => self.play_bead_click(ctx, vol),
                SoundEffect::EdgeKnock => self.play_edge_knock(ctx, vol),
                SoundEffect::Reset => self.play_reset(ctx, vol),
                SoundEffect::DiceRoll => self.play_dice_roll(ctx, vol),
                SoundEffect::TallyUp => self.play_blip(ctx, vol, 660.0, 880.0),
                SoundEffect::TallyDown => self.play_blip(ctx, vol, 520.0, 390.0),
                SoundEffect::Tab => self.play_blip(ctx, vol * 0.5, 900.0, 900.0),
            };
            if played.is_none() {
                log::warn!("Could not play {effect:?}");
            }
        }

        /// Create an oscillator routed through a gain node
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Wooden bead tap - short, bright, quickly damped
        fn play_bead_click(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
            let t = ctx.current_time();

            let (osc, gain) = self.create_osc(ctx, 1800.0, OscillatorType::Triangle)?;
            gain.gain().set_value_at_time(vol * 0.4, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.04)
                .ok()?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(900.0, t + 0.04)
                .ok()?;
            osc.start().ok()?;
            osc.stop_with_when(t + 0.05).ok()?;

            // Body
            let (osc, gain) = self.create_osc(ctx, 320.0, OscillatorType::Sine)?;
            gain.gain().set_value_at_time(vol * 0.25, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                .ok()?;
            osc.start().ok()?;
            osc.stop_with_when(t + 0.08).ok()
        }

        /// Dull knock against the frame
        fn play_edge_knock(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
            let (osc, gain) = self.create_osc(ctx, 140.0, OscillatorType::Sine)?;
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.5, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.09)
                .ok()?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(70.0, t + 0.09)
                .ok()?;
            osc.start().ok()?;
            osc.stop_with_when(t + 0.12).ok()
        }

        /// Rattle of beads sliding home
        fn play_reset(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
            for (i, freq) in [1600.0, 1400.0, 1500.0, 1300.0, 1200.0].iter().enumerate() {
                let t = ctx.current_time() + i as f64 * 0.035;
                let (osc, gain) = self.create_osc(ctx, *freq, OscillatorType::Triangle)?;
                gain.gain().set_value_at_time(vol * 0.2, t).ok()?;
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.03)
                    .ok()?;
                osc.start_with_when(t).ok()?;
                osc.stop_with_when(t + 0.04).ok()?;
            }
            Some(())
        }

        /// Dice clattering on the table
        fn play_dice_roll(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
            let t = ctx.current_time();

            let (osc, gain) = self.create_osc(ctx, 200.0, OscillatorType::Square)?;
            gain.gain().set_value_at_time(vol * 0.15, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.45)
                .ok()?;
            for (i, freq) in [200.0, 900.0, 300.0, 1100.0, 250.0, 800.0, 180.0]
                .iter()
                .enumerate()
            {
                osc.frequency()
                    .set_value_at_time(*freq, t + i as f64 * 0.06)
                    .ok()?;
            }
            osc.start().ok()?;
            osc.stop_with_when(t + 0.5).ok()?;

            // Final landing thud
            let (osc, gain) = self.create_osc(ctx, 90.0, OscillatorType::Sine)?;
            let land = t + 0.45;
            gain.gain().set_value_at_time(vol * 0.4, land).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, land + 0.12)
                .ok()?;
            osc.start_with_when(land).ok()?;
            osc.stop_with_when(land + 0.15).ok()
        }

        /// Short pitched blip, gliding from `from` to `to`
        fn play_blip(&self, ctx: &AudioContext, vol: f32, from: f32, to: f32) -> Option<()> {
            let (osc, gain) = self.create_osc(ctx, from, OscillatorType::Sine)?;
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok()?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + 0.08)
                .ok()?;
            osc.start().ok()?;
            osc.stop_with_when(t + 0.12).ok()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::SoundEffect;

    /// Stand-in that logs cues instead of playing them
    #[derive(Debug, Default)]
    pub struct AudioManager {
        volume: f32,
    }

    impl AudioManager {
        pub fn new(volume: f32) -> Self {
            Self {
                volume: volume.clamp(0.0, 1.0),
            }
        }

        pub fn resume(&self) {}

        pub fn play(&self, effect: SoundEffect) {
            if self.volume > 0.0 {
                log::debug!("sound: {effect:?} at {:.2}", self.volume);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Screen;

    #[test]
    fn test_event_sounds() {
        assert_eq!(
            SoundEffect::for_event(&AppEvent::BeadMoved { rod: 0, bead: 1 }),
            Some(SoundEffect::BeadClick)
        );
        assert_eq!(
            SoundEffect::for_event(&AppEvent::TallyChanged {
                counter: 0,
                count: 3,
                increased: false,
            }),
            Some(SoundEffect::TallyDown)
        );
        assert_eq!(
            SoundEffect::for_event(&AppEvent::ScreenChanged(Screen::Dice)),
            Some(SoundEffect::Tab)
        );
    }
}
