//! Collision and outcome resolution
//!
//! Contact is decided by lane identity: the box in the player's current lane
//! touches the car when its progress is inside the player band. The animated
//! car position plays no part in it.
//!
//! A question resolves through exactly one path, `resolve_question`, which
//! takes the whole question slot out of the state before touching score or
//! health. Anything that checks again afterwards finds an idle slot.

use super::progress::{level_up, record_correct_answer};
use super::state::{GameEvent, GamePhase, GameState, QuestionSlot, ShakeStrength};
use crate::consts::*;

/// What a tick's collision check found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Player's lane box reached the band
    Hit { correct: bool },
    /// Every box passed the far boundary untouched
    Miss,
}

/// Result of a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub question_id: u64,
    pub correct: bool,
    pub missed: bool,
}

/// Check the live boxes against the player's lane
pub fn detect_contact(state: &GameState) -> Option<Contact> {
    let QuestionSlot::Live { boxes, .. } = &state.question else {
        return None;
    };

    if let Some(lane_box) = boxes.iter().find(|b| b.lane == state.lane) {
        if lane_box.in_player_band() {
            return Some(Contact::Hit {
                correct: lane_box.is_correct,
            });
        }
    }

    if boxes.iter().all(|b| b.past_miss_boundary()) {
        return Some(Contact::Miss);
    }

    None
}

/// Resolve the active question once
///
/// Returns `None` if there is no live question to resolve.
pub fn resolve_question(state: &mut GameState, contact: Contact) -> Option<Resolution> {
    let question = match std::mem::take(&mut state.question) {
        QuestionSlot::Live { question, .. } => question,
        pending => {
            state.question = pending;
            return None;
        }
    };

    let (correct, missed) = match contact {
        Contact::Hit { correct } => (correct, false),
        Contact::Miss => (false, true),
    };

    if missed {
        state.events.push(GameEvent::Missed {
            question_id: question.id,
        });
    } else {
        state.events.push(GameEvent::Answered {
            question_id: question.id,
            correct,
        });
    }

    if correct {
        apply_correct(state);
    } else {
        apply_wrong(state);
    }

    state.next_question_tick = state.time_ticks + QUESTION_COOLDOWN_TICKS;

    log::info!(
        "Question {} ('{}') {}: score={} health={} level={} combo={}",
        question.id,
        question.word.english,
        if missed {
            "missed"
        } else if correct {
            "correct"
        } else {
            "wrong"
        },
        state.score,
        state.health,
        state.car_level,
        state.combo
    );

    Some(Resolution {
        question_id: question.id,
        correct,
        missed,
    })
}

fn apply_correct(state: &mut GameState) {
    state.score += CORRECT_ANSWER_REWARD;
    state.combo += 1;
    level_up(state);
    state.events.push(GameEvent::Shake(ShakeStrength::Mild));
    state.events.push(GameEvent::Particles { correct: true });
    record_correct_answer(state);
}

fn apply_wrong(state: &mut GameState) {
    let was_alive = state.health > 0;
    state.health = state.health.saturating_sub(1);
    state.combo = 0;
    state.events.push(GameEvent::Shake(ShakeStrength::Strong));
    state.events.push(GameEvent::Particles { correct: false });

    if was_alive && state.health == 0 {
        state.phase = GamePhase::GameOver;
        log::info!("Game over with score {}", state.score);
        state.events.push(GameEvent::GameOver { score: state.score });
    }
}

/// Detect and resolve in one step
pub fn check_collisions(state: &mut GameState) -> Option<Resolution> {
    let contact = detect_contact(state)?;
    resolve_question(state, contact)
}
