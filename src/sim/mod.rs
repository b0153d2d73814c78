//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Timers counted in ticks, never wall-clock time
//! - No rendering or platform dependencies

pub mod lane;
pub mod progress;
pub mod resolve;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use lane::{LaneInput, Orientation, approach_lane, change_lane};
pub use progress::{CarUpgrades, difficulty_ceiling, level_up};
pub use resolve::{Contact, Resolution, check_collisions, detect_contact, resolve_question};
pub use scheduler::{select_distractor, select_word, try_activate};
pub use state::{
    AnswerBox, BoxColor, GameEvent, GamePhase, GameState, Lane, Question, QuestionSlot,
    SessionConfig, ShakeStrength, VehicleProfile,
};
pub use tick::{TickInput, tick};
