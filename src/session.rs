//! Session lifecycle
//!
//! Wraps a `GameState` with the fixed-timestep accumulator and turns the
//! simulation's events into the outward notifications the screen-flow layer
//! listens for. Inputs arrive here in raw form and are normalized before they
//! reach the simulation.

use crate::consts::*;
use crate::sim::{GameEvent, GamePhase, GameState, Lane, LaneInput, SessionConfig, TickInput, tick};
use crate::vocab::Vocabulary;

/// Callbacks supplied by the surrounding screen-flow layer
pub trait SessionHooks {
    /// Health reached zero
    fn on_game_end(&mut self, final_score: u64);

    /// Round threshold reached
    fn on_round_complete(&mut self, round_id: &str);

    /// The session was paused (Escape or UI)
    fn on_pause(&mut self) {}

    /// Box speed changed after a level-up
    fn on_speed_change(&mut self, _speed: f32) {}

    /// Every simulation event, for cosmetic reactions
    fn on_event(&mut self, _event: &GameEvent) {}
}

/// One gameplay attempt
pub struct Session<H: SessionHooks> {
    state: GameState,
    hooks: H,
    input: TickInput,
    accumulator: f32,
    torn_down: bool,
}

impl<H: SessionHooks> Session<H> {
    pub fn new(config: SessionConfig, vocab: &Vocabulary, hooks: H) -> Self {
        Self {
            state: GameState::new(config, vocab),
            hooks,
            input: TickInput::default(),
            accumulator: 0.0,
            torn_down: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Whether the session reached GameOver/RoundComplete or was torn down
    pub fn is_finished(&self) -> bool {
        self.torn_down || self.state.phase.is_terminal()
    }

    /// Begin the countdown
    pub fn start(&mut self) {
        self.input.start = true;
    }

    /// Toggle pause (Escape, pause button, tab hidden)
    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    /// Request a pause only if the run is active
    pub fn pause(&mut self) {
        if self.state.phase == GamePhase::Running {
            self.input.pause = true;
        }
    }

    /// Resume only if paused
    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.input.pause = true;
        }
    }

    /// Feed a raw lane input; returns the lane it selected, if any
    pub fn lane_input(&mut self, input: LaneInput<'_>) -> Option<Lane> {
        let lane = input.to_lane(self.state.orientation)?;
        self.input.lane = Some(lane);
        Some(lane)
    }

    /// Keyboard routing: lane keys, Escape, Enter/Space
    pub fn key_down(&mut self, key: &str) {
        match key {
            "Escape" => self.toggle_pause(),
            " " | "Enter" => self.start(),
            _ => {
                self.lane_input(LaneInput::Key(key));
            }
        }
    }

    /// Advance by a variable frame delta; returns the number of ticks run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if self.torn_down {
            return 0;
        }
        // Time beyond MAX_SUBSTEPS ticks is dropped, never carried as debt
        let max_backlog = SIM_DT * MAX_SUBSTEPS as f32;
        self.accumulator = (self.accumulator + frame_dt.min(0.1)).min(max_backlog);

        let substeps = ((self.accumulator / SIM_DT) as u32).min(MAX_SUBSTEPS);
        for _ in 0..substeps {
            self.step();
        }
        self.accumulator -= substeps as f32 * SIM_DT;
        substeps
    }

    /// Run exactly one tick and dispatch its events
    pub fn step(&mut self) {
        if self.torn_down {
            return;
        }
        tick(&mut self.state, &self.input, SIM_DT);

        // Clear one-shot inputs after processing
        self.input.start = false;
        self.input.pause = false;

        self.dispatch_events();
    }

    /// Stop the session; later frames and pending timers do nothing
    pub fn teardown(&mut self) {
        if !self.torn_down {
            self.torn_down = true;
            log::info!("Session torn down at score {}", self.state.score);
        }
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            self.hooks.on_event(&event);
            match &event {
                GameEvent::GameOver { score } => self.hooks.on_game_end(*score),
                GameEvent::RoundComplete { round_id } => self.hooks.on_round_complete(round_id),
                GameEvent::Paused => self.hooks.on_pause(),
                GameEvent::SpeedChanged(speed) => self.hooks.on_speed_change(*speed),
                _ => {}
            }
        }
    }
}
