//! Car level progression and round tracking

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Levels at which box speed steps up (+5% each)
const SPEED_THRESHOLDS: [u32; 5] = [3, 5, 8, 11, 14];
const SPEED_STEP: f32 = 0.05;
const MAX_SPEED_MULTIPLIER: f32 = 1.25;

/// Levels at which handling steps up (+10% each)
const HANDLING_THRESHOLDS: [u32; 6] = [2, 4, 6, 9, 12, 14];
const HANDLING_STEP: f32 = 0.1;
const MAX_HANDLING_MULTIPLIER: f32 = 1.6;

const SPOILER_LEVEL: u32 = 5;
const UNDERGLOW_LEVEL: u32 = 8;
const NITRO_LEVEL: u32 = 11;
const ARMOR_LEVEL: u32 = 14;

/// Upgrades derived from car level
///
/// Pure function of the level; every field is non-decreasing in it. Nothing
/// changes past the last threshold (14).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarUpgrades {
    pub speed_multiplier: f32,
    pub handling_multiplier: f32,
    pub spoiler: bool,
    pub underglow: bool,
    pub nitro: bool,
    pub armor_plating: bool,
}

impl CarUpgrades {
    pub fn for_level(level: u32) -> Self {
        let reached =
            |thresholds: &[u32]| thresholds.iter().filter(|&&t| level >= t).count() as f32;
        Self {
            speed_multiplier: (1.0 + reached(&SPEED_THRESHOLDS[..]) * SPEED_STEP)
                .min(MAX_SPEED_MULTIPLIER),
            handling_multiplier: (1.0 + reached(&HANDLING_THRESHOLDS[..]) * HANDLING_STEP)
                .min(MAX_HANDLING_MULTIPLIER),
            spoiler: level >= SPOILER_LEVEL,
            underglow: level >= UNDERGLOW_LEVEL,
            nitro: level >= NITRO_LEVEL,
            armor_plating: level >= ARMOR_LEVEL,
        }
    }
}

/// Highest difficulty tier unlocked at a car level
pub fn difficulty_ceiling(car_level: u32) -> u8 {
    let tier = 1 + car_level.saturating_sub(1) / LEVELS_PER_TIER;
    tier.min(MAX_DIFFICULTY_TIER as u32) as u8
}

/// Raise the car level by one
///
/// Returns false when the call is rejected: the level is capped, or another
/// level-up happened within the debounce window.
pub fn level_up(state: &mut GameState) -> bool {
    if let Some(last) = state.last_level_up_tick {
        if state.time_ticks.saturating_sub(last) < LEVEL_UP_DEBOUNCE_TICKS {
            log::warn!(
                "Level-up ignored: {} ticks since last",
                state.time_ticks.saturating_sub(last)
            );
            return false;
        }
    }
    if state.car_level >= MAX_CAR_LEVEL {
        return false;
    }

    state.car_level += 1;
    state.last_level_up_tick = Some(state.time_ticks);

    let previous = state.upgrades;
    state.upgrades = CarUpgrades::for_level(state.car_level);
    state.events.push(GameEvent::LevelUp {
        level: state.car_level,
    });
    if state.upgrades.speed_multiplier != previous.speed_multiplier {
        state.events.push(GameEvent::SpeedChanged(state.box_speed()));
    }
    log::info!("Car level {}", state.car_level);
    true
}

/// Count a correct answer toward the round; completes the round at the threshold
pub fn record_correct_answer(state: &mut GameState) {
    state.questions_answered += 1;
    if state.questions_answered < ROUND_QUESTION_COUNT || state.phase != GamePhase::Running {
        return;
    }
    if let Some(round_id) = state.round_id.clone() {
        state.phase = GamePhase::RoundComplete;
        log::info!(
            "Round '{}' complete with score {}",
            round_id,
            state.score
        );
        state.events.push(GameEvent::RoundComplete { round_id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::SessionConfig;
    use crate::vocab::Vocabulary;
    use proptest::prelude::*;

    fn running(round_id: Option<&str>) -> GameState {
        let config = SessionConfig {
            round_id: round_id.map(str::to_string),
            ..Default::default()
        };
        let mut state = GameState::new(config, &Vocabulary::builtin());
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_level_one_upgrades() {
        let base = CarUpgrades::for_level(1);
        assert_eq!(base.speed_multiplier, 1.0);
        assert_eq!(base.handling_multiplier, 1.0);
        assert!(!base.spoiler && !base.underglow && !base.nitro && !base.armor_plating);
    }

    #[test]
    fn test_no_upgrades_past_last_threshold() {
        let top = CarUpgrades::for_level(14);
        assert_eq!(CarUpgrades::for_level(30), top);
        assert_eq!(CarUpgrades::for_level(MAX_CAR_LEVEL), top);
        assert!(top.armor_plating);
        assert!(top.speed_multiplier <= MAX_SPEED_MULTIPLIER);
        assert!(top.handling_multiplier <= MAX_HANDLING_MULTIPLIER);
    }

    #[test]
    fn test_difficulty_ceiling() {
        assert_eq!(difficulty_ceiling(1), 1);
        assert_eq!(difficulty_ceiling(3), 1);
        assert_eq!(difficulty_ceiling(4), 2);
        assert_eq!(difficulty_ceiling(7), 3);
        assert_eq!(difficulty_ceiling(MAX_CAR_LEVEL), MAX_DIFFICULTY_TIER);
    }

    #[test]
    fn test_level_up_debounce() {
        let mut state = running(None);
        state.time_ticks = 100;
        assert!(level_up(&mut state));
        assert_eq!(state.car_level, 2);

        state.time_ticks += LEVEL_UP_DEBOUNCE_TICKS - 1;
        assert!(!level_up(&mut state));
        assert_eq!(state.car_level, 2);

        state.time_ticks += 1;
        assert!(level_up(&mut state));
        assert_eq!(state.car_level, 3);
    }

    #[test]
    fn test_level_up_rejected_when_clock_is_behind_last_level_up() {
        let mut state = running(None);
        state.last_level_up_tick = Some(500);
        state.time_ticks = 10;
        assert!(!level_up(&mut state));
        assert_eq!(state.car_level, START_CAR_LEVEL);
    }

    #[test]
    fn test_level_cap() {
        let mut state = running(None);
        state.car_level = MAX_CAR_LEVEL;
        assert!(!level_up(&mut state));
        assert_eq!(state.car_level, MAX_CAR_LEVEL);
    }

    #[test]
    fn test_speed_change_event_on_threshold() {
        let mut state = running(None);
        state.car_level = 2;
        state.upgrades = CarUpgrades::for_level(2);
        assert!(level_up(&mut state));
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::LevelUp { level: 3 }));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::SpeedChanged(s) if *s > BOX_BASE_SPEED))
        );
    }

    #[test]
    fn test_round_completes_once_at_threshold() {
        let mut state = running(Some("r1"));
        for _ in 0..ROUND_QUESTION_COUNT - 1 {
            record_correct_answer(&mut state);
        }
        assert_eq!(state.phase, GamePhase::Running);
        record_correct_answer(&mut state);
        assert_eq!(state.phase, GamePhase::RoundComplete);
        record_correct_answer(&mut state);

        let completions = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::RoundComplete { .. }))
            .count();
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_endless_mode_never_completes() {
        let mut state = running(None);
        for _ in 0..ROUND_QUESTION_COUNT * 3 {
            record_correct_answer(&mut state);
        }
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.questions_answered, ROUND_QUESTION_COUNT * 3);
    }

    proptest! {
        #[test]
        fn prop_upgrades_monotonic(level in 1u32..MAX_CAR_LEVEL) {
            let a = CarUpgrades::for_level(level);
            let b = CarUpgrades::for_level(level + 1);
            prop_assert!(b.speed_multiplier >= a.speed_multiplier);
            prop_assert!(b.handling_multiplier >= a.handling_multiplier);
            prop_assert!(b.spoiler >= a.spoiler);
            prop_assert!(b.underglow >= a.underglow);
            prop_assert!(b.nitro >= a.nitro);
            prop_assert!(b.armor_plating >= a.armor_plating);
        }

        #[test]
        fn prop_level_rises_at_most_one_per_window(
            gaps in proptest::collection::vec(0u64..40, 1..30),
        ) {
            let mut state = running(None);
            let mut last = state.car_level;
            for gap in gaps {
                state.time_ticks += gap;
                level_up(&mut state);
                prop_assert!(state.car_level >= last);
                prop_assert!(state.car_level <= last + 1);
                last = state.car_level;
            }
        }
    }
}
