//! Page composition
//!
//! One reveal plus an optional table roll sharing the host's frame loop. The
//! host keeps requesting frames while [`Stage::is_animating`] holds.

use crate::error::Result;
use crate::reveal::RollReveal;
use crate::settings::Settings;
use crate::sim::SlotRoll;

pub struct Stage<T> {
    pub reveal: RollReveal<T>,
    pub slot: Option<SlotRoll>,
    settings: Settings,
    /// What the OS reports for reduced motion
    platform_reduced_motion: bool,
}

impl<T> Stage<T> {
    pub fn new(
        mut reveal: RollReveal<T>,
        settings: Settings,
        platform_reduced_motion: bool,
    ) -> Self {
        reveal.apply_settings(&settings, platform_reduced_motion);
        Self {
            reveal,
            slot: None,
            settings,
            platform_reduced_motion,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Change preferences, push them into the reveal and persist them
    pub fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) -> Result<()> {
        change(&mut self.settings);
        self.reveal.apply_settings(&self.settings, self.platform_reduced_motion);
        self.settings.save()
    }

    pub fn open_reveal(&mut self) -> Result<bool> {
        self.reveal.open()
    }

    pub fn close_reveal(&mut self) {
        self.reveal.close();
    }

    /// Start a table roll, replacing any previous one
    pub fn roll_table(&mut self, slot: SlotRoll) {
        log::info!("Rolling on {}", slot.table_name);
        self.slot = Some(slot);
    }

    pub fn close_table_roll(&mut self) {
        self.slot = None;
    }

    /// Close everything on the page (Escape)
    pub fn dismiss(&mut self) {
        self.close_reveal();
        self.close_table_roll();
    }

    /// Advance by `dt` seconds. The reveal clamps motion itself; its schedule
    /// clock always sees the real time.
    pub fn tick(&mut self, dt: f32) {
        self.reveal.tick(dt);
        if let Some(slot) = self.slot.as_mut() {
            slot.tick(dt);
        }
    }

    pub fn is_animating(&self) -> bool {
        self.reveal.is_open() || self.slot.as_ref().is_some_and(|s| !s.is_done())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RevealOptions;
    use crate::consts::FRAME_DT;
    use crate::settings::QualityPreset;
    use crate::sim::Phase;

    fn stage(settings: Settings) -> Stage<&'static str> {
        let reveal = RollReveal::new(
            vec!["Goblin Ambush", "Bridge Troll"],
            RevealOptions::default(),
            |_: &&'static str| {},
            |s: &&'static str| s.to_string(),
            4,
        );
        Stage::new(reveal, settings, false)
    }

    fn table_roll() -> SlotRoll {
        SlotRoll::new("Weather", 3, "Hail", "d6", 1)
    }

    #[test]
    fn test_closing_reveal_keeps_spinning_roll_alive() {
        let mut stage = stage(Settings::default());
        stage.open_reveal().unwrap();
        stage.roll_table(table_roll());
        stage.tick(FRAME_DT);

        stage.close_reveal();
        assert!(stage.is_animating());

        for _ in 0..300 {
            stage.tick(FRAME_DT);
        }
        assert!(stage.slot.as_ref().unwrap().is_done());
        assert!(!stage.is_animating());
    }

    #[test]
    fn test_dismiss_closes_everything() {
        let mut stage = stage(Settings::default());
        stage.open_reveal().unwrap();
        stage.roll_table(table_roll());
        stage.tick(FRAME_DT);

        stage.dismiss();
        assert!(!stage.is_animating());
        assert!(stage.slot.is_none());
        assert_eq!(stage.reveal.phase(), Phase::Closed);
    }

    #[test]
    fn test_long_frame_advances_schedule_fully() {
        let mut stage = stage(Settings::default());
        stage.open_reveal().unwrap();
        // One stalled second of wall time still reaches Emerge (600ms)
        stage.tick(1.0);
        assert_eq!(stage.reveal.phase(), Phase::Emerge);
    }

    #[test]
    fn test_settings_flow_into_reveal() {
        let mut stage = stage(Settings::default());
        assert!(!stage.reveal.synth().is_muted());

        stage.update_settings(|s| s.sound_enabled = false).unwrap();
        assert!(stage.reveal.synth().is_muted());

        stage
            .update_settings(|s| {
                s.reduced_motion = Some(true);
                s.quality = QualityPreset::Low;
            })
            .unwrap();
        assert_eq!(stage.settings().quality, QualityPreset::Low);
        stage.open_reveal().unwrap();
        assert_eq!(stage.reveal.phase(), Phase::Settled);
    }
}
