//! Lane controller
//!
//! Every input source (keys, touch, tilt, mouse click) is normalized to a
//! single target lane before it reaches the simulation. The discrete `lane`
//! field is what collision uses; `player_pos` only chases it for display.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState, Lane};
use crate::consts::*;

/// Screen axis assignment
///
/// `Vertical` is the mobile layout: lanes left/right, boxes fall top to bottom.
/// `Horizontal` is the desktop layout: lanes top/bottom, boxes travel right to left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Cross-axis lane centers (normalized)
const LANE_CENTERS: [f32; 2] = [0.25, 0.75];

impl Orientation {
    /// Pick a layout from viewport shape and touch support
    pub fn detect(width: f32, height: f32, touch_capable: bool) -> Self {
        if touch_capable || height > width {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    /// Cross-axis coordinate of a lane center
    pub fn lane_target(self, lane: Lane) -> f32 {
        LANE_CENTERS[lane.index()]
    }

    /// Map (cross, travel) to screen space
    fn to_screen(self, cross: f32, travel: f32) -> Vec2 {
        match self {
            Orientation::Vertical => Vec2::new(cross, travel),
            Orientation::Horizontal => Vec2::new(1.0 - travel, cross),
        }
    }

    /// Box center for a lane and travel progress
    pub fn screen_pos(self, lane: Lane, progress: f32) -> Vec2 {
        self.to_screen(self.lane_target(lane), progress)
    }

    /// Player car center for a cross-axis position
    pub fn player_screen_pos(self, cross: f32) -> Vec2 {
        let band_center = (PLAYER_BAND_START + PLAYER_BAND_END) / 2.0;
        self.to_screen(cross, band_center)
    }

    /// Which lane a point on screen (normalized) selects
    pub fn lane_at(self, point: Vec2) -> Lane {
        let cross = match self {
            Orientation::Vertical => point.x,
            Orientation::Horizontal => point.y,
        };
        if cross < 0.5 { Lane::First } else { Lane::Second }
    }

    pub fn lane_label(self, lane: Lane) -> &'static str {
        match (self, lane) {
            (Orientation::Vertical, Lane::First) => "left",
            (Orientation::Vertical, Lane::Second) => "right",
            (Orientation::Horizontal, Lane::First) => "top",
            (Orientation::Horizontal, Lane::Second) => "bottom",
        }
    }
}

/// Raw lane-change inputs from the platform layer
#[derive(Debug, Clone, PartialEq)]
pub enum LaneInput<'a> {
    /// `KeyboardEvent.key` value
    Key(&'a str),
    /// Touch start at a normalized screen point
    Touch(Vec2),
    /// Mouse click at a normalized screen point
    Click(Vec2),
    /// Device orientation gamma angle in degrees
    Tilt { gamma: f32, threshold: f32 },
}

impl LaneInput<'_> {
    /// Normalize to a target lane, if the input selects one
    pub fn to_lane(&self, orientation: Orientation) -> Option<Lane> {
        match *self {
            LaneInput::Key(key) => key_lane(key, orientation),
            LaneInput::Touch(point) | LaneInput::Click(point) => Some(orientation.lane_at(point)),
            LaneInput::Tilt { gamma, threshold } => {
                if gamma < -threshold {
                    Some(Lane::First)
                } else if gamma > threshold {
                    Some(Lane::Second)
                } else {
                    None
                }
            }
        }
    }
}

fn key_lane(key: &str, orientation: Orientation) -> Option<Lane> {
    match orientation {
        Orientation::Vertical => match key {
            "ArrowLeft" | "a" | "A" => Some(Lane::First),
            "ArrowRight" | "d" | "D" => Some(Lane::Second),
            _ => None,
        },
        Orientation::Horizontal => match key {
            "ArrowUp" | "w" | "W" => Some(Lane::First),
            "ArrowDown" | "s" | "S" => Some(Lane::Second),
            _ => None,
        },
    }
}

/// Set the discrete lane immediately
pub fn change_lane(state: &mut GameState, lane: Lane) {
    if state.lane != lane {
        state.lane = lane;
        state.events.push(GameEvent::LaneChanged(lane));
    }
}

/// Move the visual position a fraction of the way toward the lane center
pub fn approach_lane(state: &mut GameState) {
    let target = state.orientation.lane_target(state.lane);
    let rate = (LANE_APPROACH_RATE * state.upgrades.handling_multiplier).min(1.0);
    state.player_pos += (target - state.player_pos) * rate;
    if (target - state.player_pos).abs() < 1e-4 {
        state.player_pos = target;
    }
}
