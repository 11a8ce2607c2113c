//! The reveal widget
//!
//! `RollReveal` wires the simulation, the tone synth and the result view to a
//! caller's candidate list. Callers drive it with `tick(dt)` once per frame
//! and forward the two result actions (accept, reroll) plus close requests.

use glam::Vec2;

use crate::audio::ToneSynth;
use crate::error::{Result, RevealError};
use crate::renderer::{DrawCmd, scene};
use crate::settings::Settings;
use crate::sim::{self, Phase, RevealEvent, RevealState};

/// Per-invocation options
#[derive(Debug, Clone, PartialEq)]
pub struct RevealOptions {
    /// Offer "Roll Again" on the result
    pub allow_reroll: bool,
    /// Play tone cues
    pub sound_enabled: bool,
    pub title: String,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            allow_reroll: true,
            sound_enabled: true,
            title: "The Fates Decide...".to_string(),
        }
    }
}

/// What the result pane shows once settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub title: String,
    /// Caller-rendered chosen candidate
    pub content: String,
    pub can_reroll: bool,
}

type AcceptFn<T> = Box<dyn FnMut(&T)>;
type RenderFn<T> = Box<dyn Fn(&T) -> String>;

/// Animated random draw over a list of candidates
pub struct RollReveal<T> {
    items: Vec<T>,
    options: RevealOptions,
    on_accept: AcceptFn<T>,
    render: RenderFn<T>,
    state: RevealState,
    synth: ToneSynth,
    open: bool,
    /// Seconds since the widget opened (drives visual pulses)
    time: f32,
}

impl<T> RollReveal<T> {
    pub fn new(
        items: Vec<T>,
        options: RevealOptions,
        on_accept: impl FnMut(&T) + 'static,
        render: impl Fn(&T) -> String + 'static,
        seed: u64,
    ) -> Self {
        Self {
            items,
            options,
            on_accept: Box::new(on_accept),
            render: Box::new(render),
            state: RevealState::new(seed),
            synth: ToneSynth::new(seed),
            open: false,
            time: 0.0,
        }
    }

    /// Apply user preferences; `platform_reduced_motion` is what the OS reports
    pub fn apply_settings(&mut self, settings: &Settings, platform_reduced_motion: bool) {
        self.state.reduced_motion = settings.effective_reduced_motion(platform_reduced_motion);
        self.state.particles.max_particles = settings.max_particles();
        self.synth.set_master_volume(settings.master_volume);
        self.synth.set_muted(!settings.sound_enabled);
    }

    /// Particle spawn centre in canvas coordinates
    pub fn set_center(&mut self, center: Vec2) {
        self.state.particles.center = center;
    }

    /// Follow the caller's open flag
    pub fn set_open(&mut self, open: bool) -> Result<()> {
        match (open, self.open) {
            (true, false) => self.open().map(|_| ()),
            (false, true) => {
                self.close();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Open the widget and start a run. Already open: nothing happens, a new
    /// draw goes through `reroll`.
    pub fn open(&mut self) -> Result<bool> {
        if self.items.is_empty() {
            return Err(RevealError::NoCandidates);
        }
        if self.open {
            return Ok(false);
        }
        log::info!("Reveal opened with {} candidates", self.items.len());
        self.open = true;
        self.time = 0.0;
        let started = sim::start(&mut self.state, self.items.len())?;
        self.handle_events();
        Ok(started)
    }

    /// Close from any phase; every pending transition is dropped
    pub fn close(&mut self) {
        sim::reset(&mut self.state);
        self.handle_events();
        if self.open {
            log::info!("Reveal closed");
        }
        self.open = false;
    }

    /// Backdrop click: only dismisses a settled result
    pub fn backdrop_click(&mut self) {
        if self.phase() == Phase::Settled {
            self.close();
        }
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if !self.open {
            return;
        }
        self.time += dt;
        sim::tick(&mut self.state, dt);
        self.handle_events();
    }

    /// Deliver a timer for schedule entry `step` of `run`, for hosts that
    /// schedule real timers instead of ticking. Stale timers are ignored.
    pub fn fire_timer(&mut self, run: u32, step: usize) -> bool {
        let fired = sim::fire_step(&mut self.state, run, step);
        self.handle_events();
        fired
    }

    /// Hand the chosen candidate to the accept callback and close.
    ///
    /// Does nothing unless a result is showing.
    pub fn accept(&mut self) -> bool {
        if !self.open || !self.state.is_settled() {
            return false;
        }
        let Some(item) = self.state.chosen_index.and_then(|i| self.items.get(i)) else {
            return false;
        };
        log::info!("Accepted #{:?}", self.state.chosen_index);
        (self.on_accept)(item);
        self.close();
        true
    }

    /// Draw again from the same candidates. Ignored mid-run or when the
    /// caller disabled rerolls.
    pub fn reroll(&mut self) -> Result<bool> {
        if !self.options.allow_reroll || !self.open {
            return Ok(false);
        }
        let rerolled = sim::reroll(&mut self.state)?;
        self.handle_events();
        Ok(rerolled)
    }

    fn handle_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                RevealEvent::Cue(cue) => {
                    if self.options.sound_enabled {
                        self.synth.play(cue);
                    }
                }
                RevealEvent::PhaseChanged { run, phase } => {
                    log::debug!("Reveal run {} now {}", run, phase.as_str());
                }
                RevealEvent::RunStarted { .. } => {}
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Current run number
    pub fn run(&self) -> u32 {
        self.state.run
    }

    pub fn chosen_index(&self) -> Option<usize> {
        self.state.chosen_index
    }

    pub fn chosen(&self) -> Option<&T> {
        self.state.chosen_index.and_then(|i| self.items.get(i))
    }

    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    pub fn synth(&self) -> &ToneSynth {
        &self.synth
    }

    /// Title overlay shows while the animation runs
    pub fn title_visible(&self) -> bool {
        self.state.phase.is_animating()
    }

    /// Result pane contents, once settled
    pub fn result_view(&self) -> Option<ResultView> {
        if !self.open || !self.state.is_settled() {
            return None;
        }
        let item = self.chosen()?;
        Some(ResultView {
            title: self.options.title.clone(),
            content: (self.render)(item),
            can_reroll: self.options.allow_reroll,
        })
    }

    /// Draw commands for the current frame
    pub fn scene(&self, center: Vec2) -> Vec<DrawCmd> {
        if !self.open {
            return Vec::new();
        }
        scene(&self.state, center, self.time)
    }
}
