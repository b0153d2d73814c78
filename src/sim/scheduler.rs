//! Question scheduler
//!
//! Activation is gated on an idle question slot and the cooldown tick. The
//! answer boxes spawn a fixed delay later so the prompt can be read first.

use glam::Vec2;
use rand::Rng;

use super::progress::difficulty_ceiling;
use super::state::{
    AnswerBox, BoxColor, GameEvent, GamePhase, GameState, Lane, Question, QuestionSlot,
};
use crate::consts::*;
use crate::vocab::{VocabularyWord, filter_by_max_difficulty, pick_random, same_category_excluding};

/// Whether a new question may be activated this tick
pub fn can_activate(state: &GameState) -> bool {
    state.phase == GamePhase::Running
        && !state.is_question_active()
        && state.time_ticks >= state.next_question_tick
}

/// Choose the prompt word for the current car level
///
/// Falls back to the whole deck when no word is easy enough.
pub fn select_word<R: Rng + ?Sized>(
    deck: &[VocabularyWord],
    car_level: u32,
    rng: &mut R,
) -> Option<VocabularyWord> {
    let ceiling = difficulty_ceiling(car_level);
    let mut candidates = filter_by_max_difficulty(deck, ceiling);
    if candidates.is_empty() {
        log::debug!("No words at tier <= {}, using full chapter", ceiling);
        candidates = deck.iter().collect();
    }
    pick_random(&candidates, rng).cloned()
}

/// Choose a wrong answer from the same category, else the chapter's first word
pub fn select_distractor<R: Rng + ?Sized>(
    deck: &[VocabularyWord],
    word: &VocabularyWord,
    rng: &mut R,
) -> Option<VocabularyWord> {
    let same = same_category_excluding(deck, word);
    pick_random(&same, rng).or_else(|| deck.first()).cloned()
}

/// Activate a question if the gate allows it
///
/// Returns the new question id. An empty deck is a silent no-op.
pub fn try_activate(state: &mut GameState) -> Option<u64> {
    if !can_activate(state) {
        return None;
    }

    let word = select_word(&state.deck, state.car_level, &mut state.rng)?;
    let distractor = select_distractor(&state.deck, &word, &mut state.rng)?;
    let correct_lane = if state.rng.random_bool(0.5) {
        Lane::First
    } else {
        Lane::Second
    };

    let id = state.next_question_id();
    log::debug!(
        "Question {}: '{}' -> '{}' (distractor '{}', correct lane {:?})",
        id,
        word.vietnamese,
        word.english,
        distractor.english,
        correct_lane
    );
    state.events.push(GameEvent::QuestionActivated {
        question_id: id,
        prompt: word.vietnamese.clone(),
    });
    state.question = QuestionSlot::Presenting {
        question: Question {
            id,
            word,
            distractor,
            correct_lane,
        },
        spawn_at_tick: state.time_ticks + PRESENTATION_DELAY_TICKS,
    };
    Some(id)
}

/// Build the answer box for one lane of a question
fn make_box(state: &mut GameState, question: &Question, lane: Lane) -> AnswerBox {
    let is_correct = lane == question.correct_lane;
    let text = if is_correct {
        question.word.english.clone()
    } else {
        question.distractor.english.clone()
    };
    AnswerBox {
        id: state.next_box_id(),
        lane,
        progress: 0.0,
        size: Vec2::new(BOX_SIZE.0, BOX_SIZE.1),
        text,
        is_correct,
        color: BoxColor::for_lane(lane),
    }
}

/// Spawn the boxes of a presenting question once its delay has elapsed
pub fn spawn_due_boxes(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }
    let due = matches!(
        state.question,
        QuestionSlot::Presenting { spawn_at_tick, .. } if state.time_ticks >= spawn_at_tick
    );
    if !due {
        return false;
    }
    let QuestionSlot::Presenting { question, .. } = std::mem::take(&mut state.question) else {
        return false;
    };

    let boxes = Lane::BOTH.map(|lane| make_box(state, &question, lane));
    state.events.push(GameEvent::BoxesSpawned {
        question_id: question.id,
    });
    state.question = QuestionSlot::Live { question, boxes };
    true
}

/// Move live boxes toward the player
pub fn advance_boxes(state: &mut GameState, dt: f32) {
    let step = state.box_speed() * dt;
    if let QuestionSlot::Live { boxes, .. } = &mut state.question {
        for answer in boxes.iter_mut() {
            answer.progress += step;
        }
    }
}
