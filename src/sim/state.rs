//! Session state and core simulation types
//!
//! Everything the frame loop mutates lives in `GameState`. Mutation goes
//! through the named transitions in `lane`, `scheduler`, `resolve` and
//! `progress`; this module only defines the data and its constructors.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::lane::Orientation;
use super::progress::CarUpgrades;
use crate::consts::*;
use crate::vocab::{Vocabulary, VocabularyWord};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed, waiting for the start input
    Idle,
    /// Pre-run countdown
    Countdown,
    /// Active gameplay
    Running,
    /// Frozen, resumable
    Paused,
    /// Health ran out (terminal)
    GameOver,
    /// Round threshold reached (terminal)
    RoundComplete,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::RoundComplete)
    }
}

/// One of the two discrete cross-axis positions
///
/// `First` is the left lane in the vertical layout and the top lane in the
/// horizontal layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    First,
    Second,
}

impl Lane {
    pub const BOTH: [Lane; 2] = [Lane::First, Lane::Second];

    pub fn other(self) -> Lane {
        match self {
            Lane::First => Lane::Second,
            Lane::Second => Lane::First,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Lane::First => 0,
            Lane::Second => 1,
        }
    }
}

/// Box color tag, fixed per lane so color never hints at correctness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoxColor {
    Cyan,
    Magenta,
}

impl BoxColor {
    pub fn for_lane(lane: Lane) -> Self {
        match lane {
            Lane::First => BoxColor::Cyan,
            Lane::Second => BoxColor::Magenta,
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            BoxColor::Cyan => "#00f0ff",
            BoxColor::Magenta => "#ff2bd6",
        }
    }
}

/// One live answer choice
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerBox {
    pub id: u32,
    pub lane: Lane,
    /// Progress along the travel axis (0 = spawn boundary)
    pub progress: f32,
    /// Size in normalized screen units (travel, cross)
    pub size: Vec2,
    pub text: String,
    pub is_correct: bool,
    pub color: BoxColor,
}

impl AnswerBox {
    /// Whether the box sits inside the player's contact band
    pub fn in_player_band(&self) -> bool {
        (PLAYER_BAND_START..=PLAYER_BAND_END).contains(&self.progress)
    }

    pub fn past_miss_boundary(&self) -> bool {
        self.progress > MISS_BOUNDARY
    }
}

/// A selected prompt word and its distractor
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// Sequence number within the session
    pub id: u64,
    pub word: VocabularyWord,
    pub distractor: VocabularyWord,
    pub correct_lane: Lane,
}

/// Question lifecycle
///
/// `Presenting` covers the delay between activation and box spawn. Resolving
/// a question replaces the slot with `Idle` before any scoring happens, so a
/// second check in the same or a later tick finds nothing to resolve.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum QuestionSlot {
    #[default]
    Idle,
    Presenting { question: Question, spawn_at_tick: u64 },
    Live { question: Question, boxes: [AnswerBox; 2] },
}

impl QuestionSlot {
    pub fn is_active(&self) -> bool {
        !matches!(self, QuestionSlot::Idle)
    }

    pub fn question(&self) -> Option<&Question> {
        match self {
            QuestionSlot::Idle => None,
            QuestionSlot::Presenting { question, .. } | QuestionSlot::Live { question, .. } => {
                Some(question)
            }
        }
    }

    pub fn boxes(&self) -> &[AnswerBox] {
        match self {
            QuestionSlot::Live { boxes, .. } => boxes.as_slice(),
            _ => &[],
        }
    }
}

/// Screen shake intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShakeStrength {
    Mild,
    Strong,
}

/// Events emitted during a tick, drained by the session layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    CountdownStarted,
    RunStarted,
    Paused,
    Resumed,
    LaneChanged(Lane),
    QuestionActivated { question_id: u64, prompt: String },
    BoxesSpawned { question_id: u64 },
    Answered { question_id: u64, correct: bool },
    Missed { question_id: u64 },
    LevelUp { level: u32 },
    SpeedChanged(f32),
    Shake(ShakeStrength),
    Particles { correct: bool },
    GameOver { score: u64 },
    RoundComplete { round_id: String },
}

/// Vehicle stats chosen on the car selection screen (display only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub speed: f32,
    pub handling: f32,
    pub shield: f32,
}

impl Default for VehicleProfile {
    fn default() -> Self {
        Self {
            speed: 5.0,
            handling: 5.0,
            shield: 5.0,
        }
    }
}

/// Inputs a session is constructed from
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub seed: u64,
    pub chapter_id: String,
    /// Round context; `None` plays endlessly
    pub round_id: Option<String>,
    pub orientation: Orientation,
    pub vehicle: VehicleProfile,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            chapter_id: crate::vocab::DEFAULT_CHAPTER.to_string(),
            round_id: None,
            orientation: Orientation::Vertical,
            vehicle: VehicleProfile::default(),
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter (advances during Countdown and Running only)
    pub time_ticks: u64,
    /// Tick at which the countdown ends
    pub countdown_until: u64,

    pub score: u64,
    pub health: u8,
    pub car_level: u32,
    pub upgrades: CarUpgrades,
    pub combo: u32,
    /// Correct answers in the current round
    pub questions_answered: u32,

    pub lane: Lane,
    /// Player cross-axis position (0..1), converges toward the lane target
    pub player_pos: f32,
    pub orientation: Orientation,

    pub question: QuestionSlot,
    /// Earliest tick the scheduler may activate the next question
    pub next_question_tick: u64,
    /// Tick of the last accepted level-up
    pub last_level_up_tick: Option<u64>,

    pub chapter_id: String,
    pub round_id: Option<String>,
    /// Word list for the selected chapter
    pub deck: Vec<VocabularyWord>,
    pub vehicle: VehicleProfile,

    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    next_question_id: u64,
    next_box_id: u32,
}

impl GameState {
    /// Create a session for the configured chapter
    pub fn new(config: SessionConfig, vocab: &Vocabulary) -> Self {
        let deck = vocab.words_for(&config.chapter_id).to_vec();
        if deck.is_empty() {
            log::warn!(
                "Chapter '{}' has no words; no questions will be asked",
                config.chapter_id
            );
        }
        let lane = Lane::First;
        Self {
            seed: config.seed,
            rng: Pcg32::seed_from_u64(config.seed),
            phase: GamePhase::Idle,
            time_ticks: 0,
            countdown_until: 0,
            score: 0,
            health: MAX_HEALTH,
            car_level: START_CAR_LEVEL,
            upgrades: CarUpgrades::for_level(START_CAR_LEVEL),
            combo: 0,
            questions_answered: 0,
            lane,
            player_pos: config.orientation.lane_target(lane),
            orientation: config.orientation,
            question: QuestionSlot::Idle,
            next_question_tick: 0,
            last_level_up_tick: None,
            chapter_id: config.chapter_id,
            round_id: config.round_id,
            deck,
            vehicle: config.vehicle,
            events: Vec::new(),
            next_question_id: 1,
            next_box_id: 1,
        }
    }

    /// Allocate a question sequence number
    pub fn next_question_id(&mut self) -> u64 {
        let id = self.next_question_id;
        self.next_question_id += 1;
        id
    }

    /// Allocate a box ID
    pub fn next_box_id(&mut self) -> u32 {
        let id = self.next_box_id;
        self.next_box_id += 1;
        id
    }

    pub fn is_question_active(&self) -> bool {
        self.question.is_active()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.question.question()
    }

    pub fn answer_boxes(&self) -> &[AnswerBox] {
        self.question.boxes()
    }

    /// Box speed in progress units per second
    pub fn box_speed(&self) -> f32 {
        BOX_BASE_SPEED * self.upgrades.speed_multiplier
    }

    /// Screen position of a box center in normalized coordinates
    pub fn box_screen_pos(&self, answer: &AnswerBox) -> Vec2 {
        self.orientation.screen_pos(answer.lane, answer.progress)
    }

    /// Screen position of the player car in normalized coordinates
    pub fn player_screen_pos(&self) -> Vec2 {
        self.orientation.player_screen_pos(self.player_pos)
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Move to the countdown (Idle only)
    pub fn start(&mut self) {
        if self.phase != GamePhase::Idle {
            return;
        }
        self.phase = GamePhase::Countdown;
        self.countdown_until = self.time_ticks + COUNTDOWN_TICKS;
        self.events.push(GameEvent::CountdownStarted);
        log::info!("Countdown started");
    }

    /// Running -> Paused
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
            self.events.push(GameEvent::Paused);
            log::info!("Paused at tick {}", self.time_ticks);
        }
    }

    /// Paused -> Running
    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
            self.events.push(GameEvent::Resumed);
            log::info!("Resumed at tick {}", self.time_ticks);
        }
    }
}
