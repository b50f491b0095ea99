/// The authoritative game state container.
///
/// Every stream and the input mapper mutate this one value through `&mut`,
/// so each read-modify-write is serialized by construction.
use std::collections::HashSet;

use log::info;
use serde::Serialize;

use crate::consts::PLAYER_SIZE;
use crate::entities::{Bullet, Enemy, GameStatus, Position, Ship, Velocity};
use crate::geometry::Arena;
use crate::input::Key;
use crate::spawner::IdAllocator;

#[derive(Clone, Debug)]
pub struct GameState {
    pub arena: Arena,
    /// Seconds a fresh run starts with.
    pub game_duration: u32,

    pub player: Position,
    pub velocity: Velocity,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,

    pub score: u32,
    pub time_left: u32,
    /// Spawn ticks since the run started.
    pub wave_timer: u32,

    pub status: GameStatus,
    pub ship: Ship,
    /// Ship faces down; bullets leave from the bottom edge.
    pub flipped: bool,
    /// Premium ships unlocked.  Survives resets.
    pub entitled: bool,

    /// Keys currently held down.
    pub held: HashSet<Key>,
    /// Fire key held; the fire-repeat stream is armed.
    pub firing: bool,

    /// Survives resets.
    pub ids: IdAllocator,
}

/// Spawn point: the player centred in the arena.
pub fn player_start(arena: Arena) -> Position {
    Position::new(
        arena.width / 2.0 - PLAYER_SIZE / 2.0,
        arena.height / 2.0 - PLAYER_SIZE / 2.0,
    )
}

impl GameState {
    pub fn new(arena: Arena, game_duration: u32) -> Self {
        Self {
            arena,
            game_duration,
            player: player_start(arena),
            velocity: Velocity::ZERO,
            enemies: Vec::new(),
            bullets: Vec::new(),
            score: 0,
            time_left: game_duration,
            wave_timer: 0,
            status: GameStatus::SelectingShip,
            ship: Ship::default(),
            flipped: false,
            entitled: false,
            held: HashSet::new(),
            firing: false,
            ids: IdAllocator::new(),
        }
    }

    /// Streams run only in this state.
    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Playing
    }

    pub fn ship_selected(&self) -> bool {
        self.status != GameStatus::SelectingShip
    }

    // ── Lifecycle transitions ────────────────────────────────────────────────

    pub fn confirm_ship(&mut self) {
        if self.status == GameStatus::SelectingShip {
            self.status = GameStatus::Ready;
            info!(
                "Ship confirmed: type {} {:?}",
                self.ship.kind.number(),
                self.ship.color
            );
        }
    }

    pub fn start(&mut self) {
        if self.status == GameStatus::Ready {
            self.status = GameStatus::Playing;
            info!("Run started ({}s on the clock)", self.time_left);
        }
    }

    pub fn pause(&mut self) {
        if self.status == GameStatus::Playing {
            self.status = GameStatus::Paused;
            info!("Paused");
        }
    }

    /// A fire key still held from before the pause resumes repeating.
    pub fn resume(&mut self) {
        if self.status == GameStatus::Paused {
            self.status = GameStatus::Playing;
            info!("Resumed");
        }
    }

    /// Countdown expired.
    pub fn clear(&mut self) {
        if !self.status.is_terminal() {
            self.status = GameStatus::Cleared;
            self.firing = false;
            info!("Game cleared with score {}", self.score);
        }
    }

    /// Player collided under the game-over policy.
    pub fn game_over(&mut self) {
        if !self.status.is_terminal() {
            self.status = GameStatus::GameOver;
            self.firing = false;
            info!("Game over with score {}", self.score);
        }
    }

    /// Back to the ship selector with an empty field.  The ship choice,
    /// entitlement and id counter carry over.
    pub fn reset(&mut self) {
        self.player = player_start(self.arena);
        self.velocity = Velocity::ZERO;
        self.enemies.clear();
        self.bullets.clear();
        self.score = 0;
        self.time_left = self.game_duration;
        self.wave_timer = 0;
        self.status = GameStatus::SelectingShip;
        self.flipped = false;
        self.held.clear();
        self.firing = false;
        info!("Game reset");
    }

    // ── Mutations used by the streams ────────────────────────────────────────

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Fire one bullet from the ship's leading edge.
    pub fn fire_bullet(&mut self) {
        let id = self.ids.next_id();
        let bullet = crate::compute::create_bullet(self.player, self.flipped, id);
        self.bullets.push(bullet);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: self.player,
            ship: self.ship,
            flipped: self.flipped,
            enemies: self.enemies.clone(),
            bullets: self.bullets.clone(),
            score: self.score,
            time_left: self.time_left,
            wave_timer: self.wave_timer,
            status: self.status,
            flags: Flags::from_status(self.status),
            entitled: self.entitled,
        }
    }
}

/// Boolean view of [`GameStatus`] for renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Flags {
    pub started: bool,
    pub paused: bool,
    pub over: bool,
    pub cleared: bool,
    pub ship_selected: bool,
}

impl Flags {
    pub fn from_status(status: GameStatus) -> Self {
        Self {
            started: matches!(
                status,
                GameStatus::Playing
                    | GameStatus::Paused
                    | GameStatus::GameOver
                    | GameStatus::Cleared
            ),
            paused: status == GameStatus::Paused,
            over: status == GameStatus::GameOver,
            cleared: status == GameStatus::Cleared,
            ship_selected: status != GameStatus::SelectingShip,
        }
    }
}

/// Read-only view handed to the renderer every frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub player: Position,
    pub ship: Ship,
    pub flipped: bool,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub score: u32,
    pub time_left: u32,
    pub wave_timer: u32,
    pub status: GameStatus,
    pub flags: Flags,
    pub entitled: bool,
}
