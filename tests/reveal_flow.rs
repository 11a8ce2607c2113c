use std::cell::RefCell;
use std::rc::Rc;

use roll_reveal::consts::FRAME_DT;
use roll_reveal::sim::{PHASE_SCHEDULE, Phase, SlotPhase, SlotRoll};
use roll_reveal::{RevealError, RevealOptions, RollReveal, Settings};

const ENCOUNTERS: [&str; 3] = ["Goblin Ambush", "Merchant Encounter", "Bridge Troll"];

fn encounter_reveal(seed: u64) -> (RollReveal<&'static str>, Rc<RefCell<Vec<String>>>) {
    let accepted = Rc::new(RefCell::new(Vec::new()));
    let sink = accepted.clone();
    let reveal = RollReveal::new(
        ENCOUNTERS.to_vec(),
        RevealOptions::default(),
        move |item: &&'static str| sink.borrow_mut().push(item.to_string()),
        |item: &&'static str| item.to_string(),
        seed,
    );
    (reveal, accepted)
}

/// Tick at 60fps until the result shows, returning the phases seen in order
fn run_to_settled(reveal: &mut RollReveal<&'static str>) -> Vec<Phase> {
    let mut seen = vec![reveal.phase()];
    for _ in 0..600 {
        reveal.tick(FRAME_DT);
        if seen.last() != Some(&reveal.phase()) {
            seen.push(reveal.phase());
        }
        if reveal.phase() == Phase::Settled {
            break;
        }
    }
    seen
}

#[test]
fn test_full_reveal_then_accept() {
    let (mut reveal, accepted) = encounter_reveal(11);
    assert!(reveal.open().unwrap());
    assert!(reveal.title_visible());

    let phases = run_to_settled(&mut reveal);
    assert_eq!(
        phases,
        vec![
            Phase::Summon,
            Phase::Emerge,
            Phase::Chaos,
            Phase::Draw,
            Phase::Reveal,
            Phase::Settled
        ]
    );

    let view = reveal.result_view().expect("result shows once settled");
    assert!(ENCOUNTERS.contains(&view.content.as_str()));
    assert!(view.can_reroll);

    assert!(reveal.accept());
    assert_eq!(*accepted.borrow(), vec![view.content]);
    assert!(!reveal.is_open());
    assert_eq!(reveal.phase(), Phase::Closed);

    // A second accept has nothing to hand over
    assert!(!reveal.accept());
    assert_eq!(accepted.borrow().len(), 1);
}

#[test]
fn test_reroll_restarts_and_settles_again() {
    let (mut reveal, accepted) = encounter_reveal(5);
    reveal.open().unwrap();
    run_to_settled(&mut reveal);
    let first_run = reveal.run();

    assert!(reveal.reroll().unwrap());
    assert_eq!(reveal.phase(), Phase::Summon);
    assert!(reveal.run() > first_run);
    assert!(reveal.result_view().is_none());

    // Rerolling mid-run is ignored
    reveal.tick(1.0);
    assert!(!reveal.reroll().unwrap());

    run_to_settled(&mut reveal);
    let chosen = reveal.chosen().copied().expect("settled run has a pick");
    assert!(ENCOUNTERS.contains(&chosen));
    assert!(accepted.borrow().is_empty());
}

#[test]
fn test_close_mid_run_is_final() {
    let (mut reveal, accepted) = encounter_reveal(3);
    reveal.open().unwrap();
    reveal.tick(1.5);
    assert_eq!(reveal.phase(), Phase::Chaos);
    let run = reveal.run();

    reveal.close();
    assert_eq!(reveal.phase(), Phase::Closed);
    assert!(reveal.chosen_index().is_none());

    // Neither ticks nor late timers from the cancelled run move it again
    for _ in 0..600 {
        reveal.tick(FRAME_DT);
    }
    for step in 0..PHASE_SCHEDULE.len() {
        assert!(!reveal.fire_timer(run, step));
    }
    assert_eq!(reveal.phase(), Phase::Closed);
    assert!(reveal.scene(glam::Vec2::ZERO).is_empty());
    assert!(accepted.borrow().is_empty());
}

#[test]
fn test_host_driven_timers() {
    let (mut reveal, _) = encounter_reveal(9);
    reveal.open().unwrap();
    let run = reveal.run();

    for (i, step) in PHASE_SCHEDULE.iter().enumerate().skip(1) {
        assert!(reveal.fire_timer(run, i));
        assert_eq!(reveal.phase(), step.phase);
    }
    assert!(reveal.result_view().is_some());

    // Old run's timers are rejected after a reroll
    reveal.reroll().unwrap();
    assert!(!reveal.fire_timer(run, 1));
    assert_eq!(reveal.phase(), Phase::Summon);
}

#[test]
fn test_reduced_motion_settles_immediately() {
    let (mut reveal, accepted) = encounter_reveal(21);
    reveal.apply_settings(&Settings::default(), true);
    reveal.open().unwrap();

    assert_eq!(reveal.phase(), Phase::Settled);
    assert!(reveal.scene(glam::Vec2::ZERO).is_empty());
    assert_eq!(reveal.synth().cues_played(), 0);

    assert!(reveal.accept());
    assert_eq!(accepted.borrow().len(), 1);
}

#[test]
fn test_empty_candidates_rejected() {
    let mut reveal = RollReveal::new(
        Vec::<String>::new(),
        RevealOptions::default(),
        |_: &String| {},
        |s: &String| s.clone(),
        0,
    );
    assert_eq!(reveal.open(), Err(RevealError::NoCandidates));
    assert!(!reveal.is_open());
}

#[test]
fn test_table_roll_lands_on_value() {
    let mut slot = SlotRoll::new("Weather", 6, "Light rain", "d8", 2);
    assert_eq!(slot.die_size, 8);
    assert!(!slot.backdrop_closes());

    let mut saw_slowing = false;
    for _ in 0..600 {
        slot.tick(FRAME_DT);
        assert!((1..=8).contains(&slot.display));
        saw_slowing |= slot.phase == SlotPhase::Slowing;
        if slot.is_done() {
            break;
        }
    }

    assert!(saw_slowing);
    assert!(slot.is_done());
    assert_eq!(slot.display, 6);
    assert!(slot.backdrop_closes());
    assert_eq!(slot.copy_text(), "Weather: Light rain (rolled 6)");
}
