/// One play session: state, scheduler and RNG behind a single handle.
///
/// Front-ends feed key events and voice commands in, call `advance` with the
/// wall-clock time that passed, and read `snapshot` to draw.
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Settings;
use crate::entities::{GameStatus, ShipType};
use crate::input::{self, KeyEvent};
use crate::scheduler::{Rules, Scheduler, TickSummary};
use crate::services::VoiceCommand;
use crate::state::{GameState, Snapshot};

pub struct Session<R: Rng = StdRng> {
    settings: Settings,
    state: GameState,
    scheduler: Scheduler,
    rng: R,
}

impl Session<StdRng> {
    /// Seeded from `settings.seed`, or from entropy when unset.
    pub fn new(settings: Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        info!("Session seed: {seed}");
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(settings: Settings, rng: R) -> Self {
        let mut state = GameState::new(settings.arena(), settings.game_duration);
        state.entitled = !settings.features.in_app_payments;
        let scheduler = Scheduler::new(Rules::from(&settings));
        Self {
            settings,
            state,
            scheduler,
            rng,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for front-ends and tests that stage a scenario.  Call
    /// [`Session::sync`] afterwards if the status changed.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Re-arm or cancel streams to match the current status.
    pub fn sync(&mut self) {
        self.scheduler.sync(&self.state);
    }

    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        let changed = input::handle_key(&mut self.state, event, self.settings.orientation);
        self.scheduler.sync(&self.state);
        changed
    }

    /// Apply a voice command.  Ignored when the voice feature is off.
    pub fn apply_voice(&mut self, command: VoiceCommand) -> bool {
        if !self.settings.features.voice_commands {
            debug!("Voice command {command:?} ignored: feature disabled");
            return false;
        }
        let before = self.state.status;
        match command {
            VoiceCommand::StartGame => {
                if matches!(before, GameStatus::SelectingShip | GameStatus::Ready) {
                    // Starting by voice confirms whatever ship is highlighted.
                    self.state.confirm_ship();
                    self.state.start();
                }
            }
            VoiceCommand::PauseGame => self.state.pause(),
            VoiceCommand::ResumeGame => self.state.resume(),
            VoiceCommand::RestartGame | VoiceCommand::NewGame => self.state.reset(),
        }
        self.scheduler.sync(&self.state);
        self.state.status != before
            || matches!(
                command,
                VoiceCommand::RestartGame | VoiceCommand::NewGame
            )
    }

    /// Record the outcome of the entitlement check.  A locked ship that is
    /// still only highlighted falls back to the free one.
    pub fn set_entitled(&mut self, entitled: bool) {
        let entitled = entitled || !self.settings.features.in_app_payments;
        self.state.entitled = entitled;
        if !entitled
            && self.state.status == GameStatus::SelectingShip
            && self.state.ship.kind.is_premium()
        {
            self.state.ship.kind = ShipType::One;
        }
        info!("Entitlement: {}", if entitled { "unlocked" } else { "free tier" });
    }

    /// Pause a running game; every stream stops until [`Session::resume`].
    pub fn pause(&mut self) -> bool {
        let changed = self.state.status == GameStatus::Playing;
        self.state.pause();
        self.scheduler.sync(&self.state);
        changed
    }

    pub fn resume(&mut self) -> bool {
        let changed = self.state.status == GameStatus::Paused;
        self.state.resume();
        self.scheduler.sync(&self.state);
        changed
    }

    /// Full reset back to the ship selector; every stream stops.
    pub fn reset(&mut self) {
        self.state.reset();
        self.scheduler.sync(&self.state);
    }

    pub fn advance(&mut self, elapsed_ms: u64) -> TickSummary {
        self.scheduler
            .advance(&mut self.state, elapsed_ms, &mut self.rng)
    }
}
