//! Audio cues using the Web Audio API
//!
//! Procedurally generated - no sound files. One `AudioOutput` is created per
//! session and handed to whatever plays cues; dropping it closes the context.

use web_sys::{AudioContext, BiquadFilterType, GainNode, OscillatorNode, OscillatorType};

use crate::game::Cue;
use crate::settings::Settings;

/// Owned audio output for the session
pub struct AudioOutput {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl AudioOutput {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume(),
        }
    }

    /// Resume the context (browsers require a user gesture first)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    pub fn play(&self, cue: Cue) {
        if self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            Cue::Success => self.play_success(ctx, self.volume),
            Cue::Fail => self.play_fail(ctx, self.volume),
            Cue::FallingVoice => self.play_falling_voice(ctx, self.volume),
        }
    }

    /// Oscillator routed through a gain node to the destination
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

    /// Rising C5-E5-G5 arpeggio
    fn play_success(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        let notes: [(f32, f64, f64, f32); 3] = [
            (523.25, 0.0, 0.2, 0.2),
            (659.25, 0.15, 0.35, 0.2),
            (783.99, 0.3, 0.6, 0.25),
        ];

        for (freq, start, end, level) in notes {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
                continue;
            };
            osc.frequency().set_value_at_time(freq, t + start).ok();
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain().set_value_at_time(vol * level, t + start).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + end)
                .ok();
            osc.start_with_when(t + start).ok();
            osc.stop_with_when(t + end).ok();
        }
    }

    /// Descending sawtooth buzz
    fn play_fail(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(100.0, t + 0.5)
            .ok();
        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.5)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.5).ok();
    }

    /// Falling "scream": filtered sawtooth sweeping down
    fn play_falling_voice(&self, ctx: &AudioContext, vol: f32) {
        let (Ok(osc), Ok(filter), Ok(gain)) = (
            ctx.create_oscillator(),
            ctx.create_biquad_filter(),
            ctx.create_gain(),
        ) else {
            return;
        };
        if osc.connect_with_audio_node(&filter).is_err()
            || filter.connect_with_audio_node(&gain).is_err()
            || gain.connect_with_audio_node(&ctx.destination()).is_err()
        {
            return;
        }
        let t = ctx.current_time();

        osc.set_type(OscillatorType::Sawtooth);
        filter.set_type(BiquadFilterType::Lowpass);

        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(150.0, t + 1.0)
            .ok();
        filter.frequency().set_value_at_time(2000.0, t).ok();
        filter.frequency()
            .exponential_ramp_to_value_at_time(500.0, t + 1.0)
            .ok();
        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 1.0)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 1.0).ok();
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            let _ = ctx.close();
            log::info!("Audio context closed");
        }
    }
}
