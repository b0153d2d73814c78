//! Fixed timestep simulation tick
//!
//! Per frame: lane input, visual approach, scheduler, box movement,
//! collision check, survival points.

use super::lane::{approach_lane, change_lane};
use super::resolve::check_collisions;
use super::scheduler::{advance_boxes, spawn_due_boxes, try_activate};
use super::state::{GameEvent, GamePhase, GameState, Lane};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Target lane, already normalized from keys/touch/tilt/click
    pub lane: Option<Lane>,
    /// Start the countdown (Idle only)
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.pause();
                return;
            }
            GamePhase::Paused => state.resume(),
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Idle => {
            if input.start {
                state.start();
            }
        }

        GamePhase::Countdown => {
            state.time_ticks += 1;
            if state.time_ticks >= state.countdown_until {
                state.phase = GamePhase::Running;
                state.next_question_tick = state.time_ticks + QUESTION_COOLDOWN_TICKS;
                state.events.push(GameEvent::RunStarted);
                log::info!(
                    "Run started: chapter '{}', round {:?}",
                    state.chapter_id,
                    state.round_id
                );
            }
        }

        GamePhase::Running => {
            state.time_ticks += 1;

            if let Some(lane) = input.lane {
                change_lane(state, lane);
            }
            approach_lane(state);

            try_activate(state);
            spawn_due_boxes(state);
            advance_boxes(state, dt);
            check_collisions(state);

            // Game over / round complete end the frame without survival points
            if state.phase == GamePhase::Running {
                state.score += SURVIVAL_POINTS_PER_TICK;
            }
        }

        GamePhase::Paused | GamePhase::GameOver | GamePhase::RoundComplete => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{QuestionSlot, SessionConfig};
    use crate::vocab::Vocabulary;

    fn new_state(seed: u64, round_id: Option<&str>) -> GameState {
        let config = SessionConfig {
            seed,
            round_id: round_id.map(str::to_string),
            ..Default::default()
        };
        GameState::new(config, &Vocabulary::builtin())
    }

    fn run_until<F: Fn(&GameState) -> bool>(
        state: &mut GameState,
        input: &TickInput,
        max_ticks: usize,
        done: F,
    ) {
        for _ in 0..max_ticks {
            if done(state) {
                return;
            }
            tick(state, input, SIM_DT);
        }
        assert!(done(state), "condition not reached in {} ticks", max_ticks);
    }

    fn start_running(state: &mut GameState) {
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(state, &start, SIM_DT);
        assert_eq!(state.phase, GamePhase::Countdown);
        run_until(state, &TickInput::default(), COUNTDOWN_TICKS as usize + 1, |s| {
            s.phase == GamePhase::Running
        });
    }

    /// Lane holding the correct box of the current question
    fn correct_lane(state: &GameState) -> Option<Lane> {
        state.current_question().map(|q| q.correct_lane)
    }

    #[test]
    fn test_idle_to_countdown_to_running() {
        let mut state = new_state(1, None);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Idle);
        start_running(&mut state);
        assert_eq!(state.time_ticks, COUNTDOWN_TICKS);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_survival_points_per_tick() {
        let mut state = new_state(2, None);
        start_running(&mut state);
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.score, 30 * SURVIVAL_POINTS_PER_TICK);
    }

    #[test]
    fn test_first_question_waits_for_cooldown() {
        let mut state = new_state(3, None);
        start_running(&mut state);
        let started = state.time_ticks;
        run_until(&mut state, &TickInput::default(), 1000, |s| s.is_question_active());
        assert_eq!(state.time_ticks - started, QUESTION_COOLDOWN_TICKS);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = new_state(4, None);
        start_running(&mut state);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let frozen = (state.time_ticks, state.score);
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!((state.time_ticks, state.score), frozen);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.time_ticks, frozen.0 + 1);
    }

    #[test]
    fn test_steering_into_correct_box_scores() {
        let mut state = new_state(5, None);
        start_running(&mut state);
        run_until(&mut state, &TickInput::default(), 1000, |s| s.is_question_active());

        let lane = correct_lane(&state).expect("question");
        let input = TickInput {
            lane: Some(lane),
            ..Default::default()
        };
        let before = state.score;
        let mut ticks = 0;
        while state.is_question_active() {
            tick(&mut state, &input, SIM_DT);
            ticks += 1;
            assert!(ticks < 2000);
        }
        assert_eq!(state.score, before + CORRECT_ANSWER_REWARD + ticks * SURVIVAL_POINTS_PER_TICK);
        assert_eq!(state.car_level, 2);
        assert_eq!(state.combo, 1);
        assert_eq!(state.health, MAX_HEALTH);
    }

    #[test]
    fn test_steering_into_wrong_box_costs_health() {
        let mut state = new_state(6, None);
        start_running(&mut state);
        run_until(&mut state, &TickInput::default(), 1000, |s| s.is_question_active());

        let lane = correct_lane(&state).expect("question").other();
        let input = TickInput {
            lane: Some(lane),
            ..Default::default()
        };
        run_until(&mut state, &input, 2000, |s| !s.is_question_active());
        assert_eq!(state.health, MAX_HEALTH - 1);
        assert_eq!(state.combo, 0);
        assert_eq!(state.car_level, 1);
    }

    #[test]
    fn test_game_over_stops_scoring() {
        let mut state = new_state(7, None);
        start_running(&mut state);
        for _ in 0..MAX_HEALTH {
            run_until(&mut state, &TickInput::default(), 1000, |s| {
                s.is_question_active() || s.phase == GamePhase::GameOver
            });
            if let Some(lane) = correct_lane(&state) {
                let input = TickInput {
                    lane: Some(lane.other()),
                    ..Default::default()
                };
                run_until(&mut state, &input, 2000, |s| !s.is_question_active());
            }
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.health, 0);

        let final_score = state.score;
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameOver { score: final_score }));

        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.score, final_score);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_round_completes_after_ten_correct() {
        let mut state = new_state(8, Some("round-1"));
        start_running(&mut state);

        let mut answered = 0;
        while state.phase == GamePhase::Running {
            run_until(&mut state, &TickInput::default(), 1000, |s| s.is_question_active());
            let input = TickInput {
                lane: correct_lane(&state),
                ..Default::default()
            };
            run_until(&mut state, &input, 2000, |s| !s.is_question_active());
            answered += 1;
            assert!(answered <= ROUND_QUESTION_COUNT);
        }
        assert_eq!(state.phase, GamePhase::RoundComplete);
        assert_eq!(state.questions_answered, ROUND_QUESTION_COUNT);
        assert_eq!(state.car_level, 1 + ROUND_QUESTION_COUNT);

        let completions = state
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::RoundComplete { round_id: "round-1".into() })
            .count();
        assert_eq!(completions, 1);

        for _ in 0..1000 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(!state.is_question_active());
        assert_eq!(state.question, QuestionSlot::Idle);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut a = new_state(99999, None);
        let mut b = new_state(99999, None);
        start_running(&mut a);
        start_running(&mut b);

        for i in 0..1500 {
            let input = TickInput {
                lane: Some(if (i / 90) % 2 == 0 { Lane::First } else { Lane::Second }),
                ..Default::default()
            };
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }

        assert_eq!(a.score, b.score);
        assert_eq!(a.health, b.health);
        assert_eq!(a.car_level, b.car_level);
        assert_eq!(a.question, b.question);
        assert_eq!(a.drain_events(), b.drain_events());
    }
}
