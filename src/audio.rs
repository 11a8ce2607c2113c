//! Audio system using Web Audio API
//!
//! Procedurally generated tone cues - no external files needed!
//!
//! Each cue expands into a list of [`Tone`]s (pure data, testable natively);
//! [`ToneSynth`] turns those into oscillator bursts on the web and is silent
//! everywhere else. Audio is decoration: every failure is swallowed here.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, BiquadFilterType, GainNode, OscillatorNode, OscillatorType};

/// Tone cues keyed to phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneCue {
    /// Mystical rising tone
    Summon,
    /// Quick filtered sweep as the cards emerge
    Whoosh,
    /// Scattered blips building intensity
    Chaos,
    /// Sharp magical snap
    Draw,
    /// Triumphant shimmer
    Reveal,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A single oscillator burst, relative to the moment its cue fires
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    /// Seconds after the cue fires
    pub delay: f64,
    pub freq: f32,
    /// Exponential frequency sweep target, reached at the end of the burst
    pub sweep_to: Option<f32>,
    /// Seconds
    pub duration: f64,
    pub waveform: Waveform,
    /// Peak gain before the exponential fade
    pub volume: f32,
    /// Low-pass cutoff in Hz
    pub lowpass: Option<f32>,
}

impl Tone {
    fn new(delay: f64, freq: f32, duration: f64, waveform: Waveform, volume: f32) -> Self {
        Self {
            delay,
            freq,
            sweep_to: None,
            duration,
            waveform,
            volume,
            lowpass: None,
        }
    }

    /// Seconds from the cue firing until this burst is silent
    pub fn end(&self) -> f64 {
        self.delay + self.duration
    }
}

/// Notes of the reveal shimmer: C5, E5, G5, C6
const REVEAL_NOTES: [f32; 4] = [523.0, 659.0, 784.0, 1047.0];

/// Number of blips in the chaos cue
const CHAOS_BLIPS: usize = 10;

impl ToneCue {
    /// Expand the cue into its oscillator bursts
    pub fn tones(self, rng: &mut impl Rng) -> Vec<Tone> {
        match self {
            ToneCue::Summon => vec![
                Tone::new(0.0, 150.0, 0.5, Waveform::Sine, 0.2),
                Tone::new(0.1, 200.0, 0.4, Waveform::Sine, 0.15),
                Tone::new(0.2, 250.0, 0.3, Waveform::Sine, 0.1),
            ],
            ToneCue::Whoosh => vec![Tone {
                sweep_to: Some(200.0),
                lowpass: Some(1000.0),
                ..Tone::new(0.0, 800.0, 0.15, Waveform::Sawtooth, 0.1)
            }],
            ToneCue::Chaos => (0..CHAOS_BLIPS)
                .map(|i| {
                    let freq = 200.0 + rng.random::<f32>() * 400.0;
                    Tone::new(i as f64 * 0.1, freq, 0.1, Waveform::Triangle, 0.08)
                })
                .collect(),
            ToneCue::Draw => vec![
                Tone::new(0.0, 800.0, 0.1, Waveform::Square, 0.15),
                Tone::new(0.05, 1200.0, 0.15, Waveform::Sine, 0.2),
            ],
            ToneCue::Reveal => REVEAL_NOTES
                .iter()
                .enumerate()
                .map(|(i, &freq)| Tone::new(i as f64 * 0.08, freq, 0.4, Waveform::Sine, 0.15))
                .collect(),
        }
    }
}

/// Tone synthesizer owned by one widget instance
///
/// The audio context is created on the first cue, not at construction, and
/// released by [`ToneSynth::close`] (also run on drop). Randomised cues draw
/// from the synth's own generator, never from the caller's.
pub struct ToneSynth {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    rng: Pcg32,
    /// Context creation failed once; stop retrying
    unavailable: bool,
    master_volume: f32,
    muted: bool,
    cues_played: usize,
}

impl Default for ToneSynth {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ToneSynth {
    pub fn new(seed: u64) -> Self {
        Self {
            #[cfg(target_arch = "wasm32")]
            ctx: None,
            rng: Pcg32::seed_from_u64(seed),
            unavailable: false,
            master_volume: 0.8,
            muted: false,
            cues_played: 0,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all cues
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Number of cues that reached the backend since construction
    pub fn cues_played(&self) -> usize {
        self.cues_played
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a cue. Never fails outward.
    pub fn play(&mut self, cue: ToneCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 || self.unavailable {
            return;
        }

        let tones = cue.tones(&mut self.rng);
        self.cues_played += 1;
        log::debug!("Tone cue {:?} ({} bursts)", cue, tones.len());
        self.play_tones(&tones, vol);
    }

    #[cfg(target_arch = "wasm32")]
    fn context(&mut self) -> Option<&AudioContext> {
        if self.ctx.is_none() && !self.unavailable {
            // May fail outside a secure context or without a user gesture
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(_) => {
                    log::warn!("Failed to create AudioContext - sound disabled");
                    self.unavailable = true;
                }
            }
        }
        self.ctx.as_ref()
    }

    #[cfg(target_arch = "wasm32")]
    fn play_tones(&mut self, tones: &[Tone], vol: f32) {
        let Some(ctx) = self.context() else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let now = ctx.current_time();
        for tone in tones {
            play_tone(ctx, tone, now, vol);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn play_tones(&mut self, _tones: &[Tone], _vol: f32) {}

    /// Release the audio context
    pub fn close(&mut self) {
        #[cfg(target_arch = "wasm32")]
        if let Some(ctx) = self.ctx.take() {
            let _ = ctx.close();
            log::debug!("AudioContext closed");
        }
    }
}

impl Drop for ToneSynth {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(target_arch = "wasm32")]
fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    }
}

/// Create an oscillator with gain envelope, optionally through a low-pass
#[cfg(target_arch = "wasm32")]
fn create_osc(ctx: &AudioContext, tone: &Tone) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(oscillator_type(tone.waveform));
    osc.frequency().set_value(tone.freq);

    match tone.lowpass {
        Some(cutoff) => {
            let filter = ctx.create_biquad_filter().ok()?;
            filter.set_type(BiquadFilterType::Lowpass);
            filter.frequency().set_value(cutoff);
            osc.connect_with_audio_node(&filter).ok()?;
            filter.connect_with_audio_node(&gain).ok()?;
        }
        None => {
            osc.connect_with_audio_node(&gain).ok()?;
        }
    }
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}

#[cfg(target_arch = "wasm32")]
fn play_tone(ctx: &AudioContext, tone: &Tone, now: f64, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, tone) else {
        return;
    };
    let t = now + tone.delay;

    gain.gain().set_value_at_time(tone.volume * vol, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + tone.duration)
        .ok();
    if let Some(target) = tone.sweep_to {
        osc.frequency().set_value_at_time(tone.freq, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(target, t + tone.duration)
            .ok();
    }

    osc.start_with_when(t).ok();
    osc.stop_with_when(t + tone.duration).ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summon_rises() {
        let mut rng = Pcg32::seed_from_u64(1);
        let tones = ToneCue::Summon.tones(&mut rng);
        assert_eq!(tones.len(), 3);
        assert!(tones.windows(2).all(|w| w[1].freq > w[0].freq));
        assert!(tones.windows(2).all(|w| w[1].delay > w[0].delay));
    }

    #[test]
    fn test_whoosh_is_filtered_sweep() {
        let mut rng = Pcg32::seed_from_u64(1);
        let tones = ToneCue::Whoosh.tones(&mut rng);
        assert_eq!(tones.len(), 1);
        assert_eq!(tones[0].waveform, Waveform::Sawtooth);
        assert_eq!(tones[0].sweep_to, Some(200.0));
        assert_eq!(tones[0].lowpass, Some(1000.0));
    }

    #[test]
    fn test_chaos_blips_stay_in_band() {
        let mut rng = Pcg32::seed_from_u64(7);
        let tones = ToneCue::Chaos.tones(&mut rng);
        assert_eq!(tones.len(), CHAOS_BLIPS);
        for tone in &tones {
            assert!((200.0..600.0).contains(&tone.freq));
            assert_eq!(tone.waveform, Waveform::Triangle);
        }
        // Last blip starts 0.9s in
        assert!((tones[CHAOS_BLIPS - 1].delay - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_reveal_is_major_arpeggio() {
        let mut rng = Pcg32::seed_from_u64(1);
        let freqs: Vec<f32> = ToneCue::Reveal.tones(&mut rng).iter().map(|t| t.freq).collect();
        assert_eq!(freqs, REVEAL_NOTES.to_vec());
    }

    #[test]
    fn test_muted_synth_plays_nothing() {
        let mut synth = ToneSynth::new(1);
        synth.set_muted(true);
        assert!(synth.is_muted());
        synth.play(ToneCue::Draw);
        assert_eq!(synth.cues_played(), 0);

        synth.set_muted(false);
        synth.play(ToneCue::Draw);
        assert_eq!(synth.cues_played(), 1);
    }

    #[test]
    fn test_volume_clamped() {
        let mut synth = ToneSynth::new(1);
        synth.set_master_volume(3.0);
        assert_eq!(synth.effective_volume(), 1.0);
        synth.set_master_volume(-1.0);
        assert_eq!(synth.effective_volume(), 0.0);
    }
}
