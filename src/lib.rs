//! Neon Drift - a lane-switching vocabulary racer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, questions, collisions, progression)
//! - `session`: Lifecycle boundary that turns simulation events into callbacks
//! - `vocab`: Vocabulary tables keyed by chapter
//! - `settings`: Player preferences

pub mod session;
pub mod settings;
pub mod sim;
pub mod vocab;

pub use session::{Session, SessionHooks};
pub use settings::{LayoutPreference, Settings};
pub use vocab::{Vocabulary, VocabularyWord};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Convert milliseconds to whole simulation ticks
    pub const fn ms_to_ticks(ms: u32) -> u64 {
        (ms as u64 * SIM_HZ as u64) / 1000
    }

    /// Countdown before the run starts (3 seconds)
    pub const COUNTDOWN_TICKS: u64 = ms_to_ticks(3000);
    /// Minimum gap between a resolution and the next question (2 seconds)
    pub const QUESTION_COOLDOWN_TICKS: u64 = ms_to_ticks(2000);
    /// Time the prompt is shown before the answer boxes appear (2 seconds)
    pub const PRESENTATION_DELAY_TICKS: u64 = ms_to_ticks(2000);
    /// Minimum gap between two level-ups (300 ms)
    pub const LEVEL_UP_DEBOUNCE_TICKS: u64 = ms_to_ticks(300);

    /// Starting (and maximum) health
    pub const MAX_HEALTH: u8 = 3;
    /// Points awarded for every simulated frame survived
    pub const SURVIVAL_POINTS_PER_TICK: u64 = 1;
    /// Points awarded for a correct answer
    pub const CORRECT_ANSWER_REWARD: u64 = 100;

    /// Car level bounds
    pub const START_CAR_LEVEL: u32 = 1;
    pub const MAX_CAR_LEVEL: u32 = 50;

    /// Correct answers needed to finish a round
    pub const ROUND_QUESTION_COUNT: u32 = 10;

    /// Difficulty tiers unlock every few car levels
    pub const LEVELS_PER_TIER: u32 = 3;
    pub const MAX_DIFFICULTY_TIER: u8 = 3;

    /// Answer box travel, in normalized progress units (0 = spawn boundary)
    pub const BOX_BASE_SPEED: f32 = 0.35;
    /// Player band along the travel axis (contact zone)
    pub const PLAYER_BAND_START: f32 = 0.80;
    pub const PLAYER_BAND_END: f32 = 0.92;
    /// Far boundary; boxes past this without contact count as a miss
    pub const MISS_BOUNDARY: f32 = 1.05;
    /// Answer box size in normalized screen units (travel, cross)
    pub const BOX_SIZE: (f32, f32) = (0.12, 0.36);

    /// Fraction of the remaining distance the player car covers per tick
    pub const LANE_APPROACH_RATE: f32 = 0.18;
    /// Device tilt (gamma, degrees) needed to switch lanes
    pub const TILT_THRESHOLD_DEG: f32 = 15.0;
}
