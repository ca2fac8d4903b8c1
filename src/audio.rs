//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Playback is fire-and-forget: one request per event, nothing awaited.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, OscillatorType};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player ran into a barrier
    BarrierHit,
    /// Hit limit reached
    GameOver,
}

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
}

/// One oscillator burst inside a sound effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Seconds after the effect starts
    pub delay: f64,
    /// Seconds until the oscillator stops
    pub length: f64,
    pub wave: Wave,
    pub from_hz: f32,
    pub to_hz: f32,
    /// Peak gain before the volume settings apply
    pub level: f32,
}

impl Tone {
    const fn new(delay: f64, length: f64, wave: Wave, from_hz: f32, to_hz: f32) -> Self {
        Self {
            delay,
            length,
            wave,
            from_hz,
            to_hz,
            level: 0.3,
        }
    }
}

/// Buzzy downward thud
const BARRIER_HIT: [Tone; 1] = [Tone::new(0.0, 0.2, Wave::Square, 220.0, 70.0)];

/// Four falling notes
const GAME_OVER: [Tone; 4] = [
    Tone::new(0.0, 0.4, Wave::Sine, 400.0, 400.0),
    Tone::new(0.2, 0.4, Wave::Sine, 350.0, 350.0),
    Tone::new(0.4, 0.4, Wave::Sine, 300.0, 300.0),
    Tone::new(0.6, 0.4, Wave::Sine, 200.0, 200.0),
];

impl SoundEffect {
    pub fn tones(self) -> &'static [Tone] {
        match self {
            SoundEffect::BarrierHit => &BARRIER_HIT,
            SoundEffect::GameOver => &GAME_OVER,
        }
    }

    /// Sound to play for a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::BarrierHit { .. } => Some(SoundEffect::BarrierHit),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::PlatformReflected { .. } => None,
        }
    }
}

/// Plays hit and game-over cues
#[cfg(target_arch = "wasm32")]
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// Master times effects volume, already clamped
    volume: f32,
    muted: bool,
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    /// Audio stays silent when the page cannot open an `AudioContext`
    pub fn new(settings: &crate::Settings) -> Self {
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_sfx_volume(),
            muted: false,
        }
    }

    /// Browsers keep the context suspended until a user gesture
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Fire one cue; nothing waits on it
    pub fn play(&self, effect: SoundEffect) {
        if self.muted || self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        self.resume();

        for tone in effect.tones() {
            if play_tone(ctx, tone, self.volume).is_none() {
                log::debug!("Dropped {:?} tone", effect);
            }
        }
    }
}

/// Schedule one tone: pitch and volume both glide down over its length
#[cfg(target_arch = "wasm32")]
fn play_tone(ctx: &AudioContext, tone: &Tone, volume: f32) -> Option<()> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    osc.set_type(match tone.wave {
        Wave::Sine => OscillatorType::Sine,
        Wave::Square => OscillatorType::Square,
    });

    let start = ctx.current_time() + tone.delay;
    let fade = start + tone.length * 0.8;
    osc.frequency().set_value_at_time(tone.from_hz, start).ok()?;
    if tone.to_hz != tone.from_hz {
        osc.frequency()
            .exponential_ramp_to_value_at_time(tone.to_hz, fade)
            .ok()?;
    }
    gain.gain().set_value_at_time(volume * tone.level, start).ok()?;
    gain.gain().exponential_ramp_to_value_at_time(0.01, fade).ok()?;

    osc.start_with_when(start).ok()?;
    osc.stop_with_when(start + tone.length).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Axis;

    #[test]
    fn test_every_hit_gets_a_sound() {
        let events = [
            GameEvent::BarrierHit {
                platform: 0,
                barrier: 0,
                hits: 1,
            },
            GameEvent::PlatformReflected {
                platform: 1,
                axis: Axis::X,
            },
            GameEvent::BarrierHit {
                platform: 2,
                barrier: 0,
                hits: 2,
            },
        ];
        let sounds: Vec<SoundEffect> = events.iter().filter_map(SoundEffect::for_event).collect();
        assert_eq!(sounds, vec![SoundEffect::BarrierHit, SoundEffect::BarrierHit]);
    }

    #[test]
    fn test_tones_are_playable() {
        for effect in [SoundEffect::BarrierHit, SoundEffect::GameOver] {
            let tones = effect.tones();
            assert!(!tones.is_empty());
            for tone in tones {
                // Exponential ramps need strictly positive targets
                assert!(tone.from_hz > 0.0 && tone.to_hz > 0.0);
                assert!(tone.length > 0.0 && tone.delay >= 0.0);
                assert!(tone.level > 0.01 && tone.level <= 1.0);
            }
        }
        // The hit cue is short enough to repeat on consecutive hits
        assert!(SoundEffect::BarrierHit.tones().iter().all(|t| t.delay + t.length <= 0.25));
    }

    #[test]
    fn test_game_over_sound() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::GameOver { hits: 3 }),
            Some(SoundEffect::GameOver)
        );
    }
}
