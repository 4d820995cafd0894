//! Game lifecycle: start / playing / game-over
//!
//! [`Game`] owns the world, buffers input between frames and relays final
//! scores to the high score store. Platform code only talks to this type.

use crate::config::GameConfig;
use crate::highscores::HighScoreTracker;
use crate::persistence::HighScoreStore;
use crate::sim::autopilot;
use crate::sim::{Command, GameEvent, GamePhase, TickInput, World, tick};

/// What the overlay shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub phase: GamePhase,
    /// Floored depth score
    pub score: u64,
    /// Best score known
    pub best: u64,
    /// The current run has beaten a best that existed when it started
    pub new_record: bool,
}

impl Hud {
    pub fn score_text(&self) -> String {
        format!("{}m", self.score)
    }

    pub fn best_text(&self) -> String {
        format!("{}m", self.best)
    }
}

/// A running game session
pub struct Game {
    world: World,
    /// Taps since the last frame; only the parity matters
    pending_flips: u32,
    autopilot: bool,
    tracker: HighScoreTracker,
    /// Best at the start of the current run
    baseline: HighScoreTracker,
    store: Box<dyn HighScoreStore>,
}

impl Game {
    /// Build a session on the title screen, loading the best score from `store`
    pub fn new(
        config: GameConfig,
        width: f32,
        height: f32,
        seed: u64,
        store: Box<dyn HighScoreStore>,
    ) -> Self {
        let best = store.load();
        log::info!("Game created ({}x{}, seed {}), best {}", width, height, seed, best);
        let tracker = HighScoreTracker::new(best);
        Self {
            world: World::new(config, width, height, seed),
            pending_flips: 0,
            autopilot: false,
            tracker,
            baseline: tracker,
            store,
        }
    }

    /// Leave the title screen. No-op (returning `false`) from any other phase.
    pub fn start(&mut self) -> bool {
        self.begin_run(Command::Start)
    }

    /// Play again after a game over. No-op (returning `false`) otherwise.
    pub fn restart(&mut self) -> bool {
        self.begin_run(Command::Restart)
    }

    /// Start or restart, whichever the current phase allows
    pub fn start_or_restart(&mut self) -> bool {
        match self.world.phase {
            GamePhase::Start => self.start(),
            GamePhase::GameOver => self.restart(),
            GamePhase::Playing => false,
        }
    }

    fn begin_run(&mut self, command: Command) -> bool {
        if !self.world.apply(command) {
            log::debug!("Ignored {:?} in {:?}", command, self.world.phase);
            return false;
        }
        self.pending_flips = 0;
        self.baseline = self.tracker;
        log::info!("Run started ({:?}), best {}", command, self.tracker.best());
        true
    }

    /// Queue a direction toggle for the next frame; ignored unless playing
    pub fn flip(&mut self) {
        if self.world.phase == GamePhase::Playing {
            self.pending_flips = self.pending_flips.saturating_add(1);
        }
    }

    /// Let the autopilot steer. Manual taps are ignored while it is on.
    pub fn set_autopilot(&mut self, enabled: bool) {
        if self.autopilot != enabled {
            log::info!("Autopilot {}", if enabled { "on" } else { "off" });
        }
        self.autopilot = enabled;
    }

    pub fn toggle_autopilot(&mut self) {
        self.set_autopilot(!self.autopilot);
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Viewport changed
    pub fn resize(&mut self, width: f32, height: f32) {
        log::debug!("Resize to {}x{}", width, height);
        self.world.resize(width, height);
    }

    /// Advance one display frame of `dt` seconds
    pub fn frame(&mut self, dt: f32) -> Vec<GameEvent> {
        // Skipped ticks keep the taps for the next valid one
        if !self.world.has_valid_area() {
            return Vec::new();
        }
        let flip = if self.autopilot {
            autopilot::should_flip(&self.world)
        } else {
            self.pending_flips % 2 == 1
        };
        self.pending_flips = 0;

        let events = tick(&mut self.world, &TickInput { flip }, dt);
        for event in &events {
            if let GameEvent::GameOver { score, .. } = *event {
                self.finish_run(score);
            }
        }
        events
    }

    fn finish_run(&mut self, score: u64) {
        if let Some(best) = self.tracker.offer(score) {
            log::info!("New high score: {}", best);
            self.store.save(best);
        }
    }

    /// Re-read the store (e.g. once a remote fetch has landed) and fold the
    /// result into the known best
    pub fn refresh_high_score(&mut self) {
        let best = self.store.load();
        self.tracker.merge(best);
        if self.world.phase != GamePhase::GameOver {
            self.baseline.merge(best);
        }
    }

    /// Let background persistence finish before the process exits
    pub fn shutdown(&self) {
        self.store.flush();
    }

    pub fn hud(&self) -> Hud {
        let score = self.world.score();
        Hud {
            phase: self.world.phase,
            score,
            best: self.tracker.best(),
            new_record: self.baseline.is_new_record(score),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn phase(&self) -> GamePhase {
        self.world.phase
    }

    pub fn score(&self) -> u64 {
        self.world.score()
    }

    pub fn high_score(&self) -> u64 {
        self.tracker.best()
    }
}
