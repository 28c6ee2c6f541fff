//! One play session: a world plus the bookkeeping around it
//!
//! Records are written when a run ends, when a paused run is restarted and
//! when a paused run is abandoned. Each run is recorded at most once.
//! Autopilot demo runs are never recorded.

use crate::persistence::{RecordStore, save_record};
use crate::renderer::Scenery;
use crate::sim::{GameEvent, GamePhase, TickInput, World, tick};

pub struct GameSession {
    pub world: World,
    pub player_name: String,
    pub scenery: Scenery,
    /// Autopilot flies and nothing is recorded
    pub demo: bool,
    /// Leaderboard rank of the last recorded run
    pub rank: Option<usize>,
    last_phase: GamePhase,
    recorded: bool,
}

impl GameSession {
    pub fn new(world: World, player_name: impl Into<String>, demo: bool) -> Self {
        let scenery = Scenery::new(world.seed);
        let last_phase = world.phase;
        Self {
            world,
            player_name: player_name.into(),
            scenery,
            demo,
            rank: None,
            last_phase,
            recorded: false,
        }
    }

    /// Hide or show the background clouds (quality setting)
    pub fn with_clouds(mut self, show: bool) -> Self {
        self.scenery.show_clouds = show;
        self
    }

    /// Run one simulation tick and return what happened
    pub fn step(&mut self, input: &TickInput, store: &dyn RecordStore) -> Vec<GameEvent> {
        let input = TickInput {
            idle_mode: input.idle_mode || self.demo,
            ..input.clone()
        };
        tick(&mut self.world, &input);

        if self.world.phase == GamePhase::Playing {
            self.scenery.advance();
        }

        let phase = self.world.phase;
        if phase != self.last_phase {
            if phase.is_over() {
                self.record(store);
            }
            self.last_phase = phase;
        }

        self.world.drain_events()
    }

    /// Restart if the current phase allows it
    pub fn restart(&mut self, store: &dyn RecordStore) -> bool {
        if !self.world.can_restart() {
            return false;
        }
        self.record(store);
        self.world.reset();
        self.scenery = Scenery::new(self.world.seed).with_clouds(self.scenery.show_clouds);
        self.last_phase = self.world.phase;
        self.recorded = false;
        self.rank = None;
        true
    }

    /// Leave to the menu; a paused or finished run keeps its record
    pub fn leave(&mut self, store: &dyn RecordStore) {
        if self.world.can_restart() {
            self.record(store);
        }
    }

    pub fn toggle_pause(&mut self) {
        self.world.toggle_pause();
        self.last_phase = self.world.phase;
    }

    pub fn is_recorded(&self) -> bool {
        self.recorded
    }

    fn record(&mut self, store: &dyn RecordStore) {
        if self.recorded || self.demo {
            return;
        }
        self.recorded = true;
        let (score, distance) = (self.world.score(), self.world.distance);
        self.rank = save_record(store, &self.player_name, score, distance);
        log::info!(
            "Recorded {} with score {} over {} (rank {:?})",
            self.player_name,
            score,
            distance,
            self.rank
        );
    }
}
