/// Fixed-cadence update streams on a virtual millisecond clock.
///
/// Each stream keeps its own next deadline.  `advance` fires every deadline
/// that falls inside the elapsed window in time order; streams due at the same
/// instant run in `Stream::ALL` order, so the collision pass always sees the
/// positions motion produced for that instant.  All streams mutate the one
/// `GameState` through `&mut`, one event at a time.
use log::{debug, info, trace};
use rand::Rng;

use crate::compute::{
    advance_bullets, advance_enemies, player_collides, resolve_bullet_hits, update_player,
};
use crate::config::{CollisionPolicy, Orientation, Settings};
use crate::consts::*;
use crate::input::target_velocity;
use crate::spawner::spawn_enemies;
use crate::state::GameState;
use crate::waves::wave_pattern;

const STREAM_COUNT: usize = 7;

/// Update streams in intra-instant phase order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stream {
    PlayerMotion,
    EnemyMotion,
    BulletMotion,
    FireRepeat,
    Spawn,
    Collision,
    Countdown,
}

impl Stream {
    pub const ALL: [Stream; STREAM_COUNT] = [
        Stream::PlayerMotion,
        Stream::EnemyMotion,
        Stream::BulletMotion,
        Stream::FireRepeat,
        Stream::Spawn,
        Stream::Collision,
        Stream::Countdown,
    ];

    pub fn period_ms(&self) -> u64 {
        match self {
            Stream::PlayerMotion => PLAYER_MOTION_MS,
            Stream::EnemyMotion => ENEMY_MOTION_MS,
            Stream::BulletMotion => BULLET_MOTION_MS,
            Stream::FireRepeat => FIRE_REPEAT_MS,
            Stream::Spawn => SPAWN_MS,
            Stream::Collision => COLLISION_MS,
            Stream::Countdown => COUNTDOWN_MS,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }

    /// Whether this stream can move the player or change the enemy set.
    fn touches_player_contact(&self) -> bool {
        matches!(
            self,
            Stream::PlayerMotion | Stream::EnemyMotion | Stream::Spawn
        )
    }
}

/// The slice of [`Settings`] the streams consult.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rules {
    pub orientation: Orientation,
    pub collision_policy: CollisionPolicy,
    pub max_enemies: usize,
    pub wave_phase_ticks: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for Rules {
    fn from(settings: &Settings) -> Self {
        Self {
            orientation: settings.orientation,
            collision_policy: settings.collision_policy,
            max_enemies: settings.max_enemies,
            wave_phase_ticks: settings.wave_phase_ticks,
        }
    }
}

/// What happened during an `advance` or a single stream run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Stream events fired.
    pub events: usize,
    pub enemies_spawned: usize,
    pub enemies_destroyed: usize,
    pub score_gained: u32,
    /// The player touched an enemy and the run ended.
    pub player_hit: bool,
}

impl TickSummary {
    fn merge(&mut self, other: TickSummary) {
        self.events += other.events;
        self.enemies_spawned += other.enemies_spawned;
        self.enemies_destroyed += other.enemies_destroyed;
        self.score_gained += other.score_gained;
        self.player_hit |= other.player_hit;
    }
}

#[derive(Clone, Debug)]
pub struct Scheduler {
    rules: Rules,
    now_ms: u64,
    deadlines: [Option<u64>; STREAM_COUNT],
}

impl Scheduler {
    pub fn new(rules: Rules) -> Self {
        Self {
            rules,
            now_ms: 0,
            deadlines: [None; STREAM_COUNT],
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn deadline(&self, stream: Stream) -> Option<u64> {
        self.deadlines[stream.index()]
    }

    pub fn is_armed(&self, stream: Stream) -> bool {
        self.deadline(stream).is_some()
    }

    /// Drop every pending deadline.
    pub fn cancel_all(&mut self) {
        self.deadlines = [None; STREAM_COUNT];
    }

    /// Bring the armed set in line with the state.  Streams that should be
    /// running but are idle get their first deadline one period from now;
    /// everything is cancelled while the run is not active.
    pub fn sync(&mut self, state: &GameState) {
        if !state.is_running() {
            self.cancel_all();
            return;
        }
        let now = self.now_ms;
        for stream in Stream::ALL {
            let wanted = stream != Stream::FireRepeat || state.firing;
            let slot = &mut self.deadlines[stream.index()];
            match (wanted, *slot) {
                (true, None) => *slot = Some(now + stream.period_ms()),
                (false, Some(_)) => *slot = None,
                _ => {}
            }
        }
    }

    fn next_due(&self) -> Option<(u64, Stream)> {
        Stream::ALL
            .iter()
            .filter_map(|s| self.deadlines[s.index()].map(|due| (due, *s)))
            .min()
    }

    /// Move the clock forward by `elapsed_ms`, firing every stream event that
    /// falls due on the way.
    pub fn advance(
        &mut self,
        state: &mut GameState,
        elapsed_ms: u64,
        rng: &mut impl Rng,
    ) -> TickSummary {
        let target = self.now_ms + elapsed_ms;
        let mut summary = TickSummary::default();

        loop {
            // Re-checked before every event: nothing fires once the run stops.
            self.sync(state);
            let Some((due, stream)) = self.next_due() else {
                break;
            };
            if due > target {
                break;
            }
            self.now_ms = due;
            self.deadlines[stream.index()] = Some(due + stream.period_ms());
            summary.merge(self.run_stream(stream, state, rng));
        }

        self.now_ms = target;
        summary
    }

    /// Run one event of `stream` against the state, ignoring the clock.
    pub fn run_stream(
        &self,
        stream: Stream,
        state: &mut GameState,
        rng: &mut impl Rng,
    ) -> TickSummary {
        let mut summary = TickSummary {
            events: 1,
            ..TickSummary::default()
        };
        trace!("{:?} @ {}ms", stream, self.now_ms);

        match stream {
            Stream::PlayerMotion => {
                let target = target_velocity(&state.held, self.rules.orientation);
                let (player, velocity) = update_player(
                    state.player,
                    state.velocity,
                    target,
                    state.arena.width,
                    state.arena.height,
                );
                state.player = player;
                state.velocity = velocity;
            }
            Stream::EnemyMotion => {
                state.enemies = advance_enemies(&state.enemies, state.arena.height);
            }
            Stream::BulletMotion => {
                state.bullets = advance_bullets(&state.bullets, state.arena.height);
            }
            Stream::FireRepeat => {
                if state.firing {
                    state.fire_bullet();
                }
            }
            Stream::Spawn => {
                state.wave_timer += 1;
                let pattern = wave_pattern(state.wave_timer, self.rules.wave_phase_ticks);
                let spawned = spawn_enemies(
                    &state.enemies,
                    &pattern,
                    state.arena,
                    self.rules.max_enemies,
                    &mut state.ids,
                    rng,
                );
                summary.enemies_spawned = spawned.len();
                state.enemies.extend(spawned);
            }
            Stream::Collision => {
                let report = resolve_bullet_hits(&state.bullets, &state.enemies);
                if report.enemies_destroyed > 0 {
                    debug!(
                        "{} enemies destroyed by {} bullets (+{})",
                        report.enemies_destroyed, report.bullets_spent, report.score_gain
                    );
                }
                state.enemies = report.enemies;
                state.bullets = report.bullets;
                state.add_score(report.score_gain);
                summary.enemies_destroyed = report.enemies_destroyed;
                summary.score_gained = report.score_gain;
            }
            Stream::Countdown => {
                if state.time_left <= 1 {
                    state.time_left = 0;
                    state.clear();
                } else {
                    state.time_left -= 1;
                }
            }
        }

        if stream.touches_player_contact() && player_collides(state.player, &state.enemies) {
            summary.player_hit = true;
            match self.rules.collision_policy {
                CollisionPolicy::Reset => {
                    info!("Player hit; resetting run");
                    state.reset();
                }
                CollisionPolicy::GameOver => state.game_over(),
            }
        }

        summary
    }
}
