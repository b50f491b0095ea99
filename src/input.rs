/// Key codes to intents.
///
/// Two modes: while the ship selector is up the directional keys cycle the
/// ship; once a ship is confirmed they steer.  In a terminal state only the
/// confirm key does anything.
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::Orientation;
use crate::consts::{keys, MAX_SPEED};
use crate::entities::{GameStatus, ShipType, Velocity};
use crate::state::GameState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    /// Play/pause button.
    Fire,
    /// Rewind button.
    Flip,
    /// Fast-forward button.
    Unflip,
}

impl Key {
    /// `None` for codes outside the fixed set; those are ignored.
    pub fn from_code(code: u32) -> Option<Key> {
        match code {
            keys::UP => Some(Key::Up),
            keys::DOWN => Some(Key::Down),
            keys::LEFT => Some(Key::Left),
            keys::RIGHT => Some(Key::Right),
            keys::CENTER => Some(Key::Confirm),
            keys::PLAY_PAUSE => Some(Key::Fire),
            keys::REWIND => Some(Key::Flip),
            keys::FAST_FORWARD => Some(Key::Unflip),
            _ => None,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            Key::Up => keys::UP,
            Key::Down => keys::DOWN,
            Key::Left => keys::LEFT,
            Key::Right => keys::RIGHT,
            Key::Confirm => keys::CENTER,
            Key::Fire => keys::PLAY_PAUSE,
            Key::Flip => keys::REWIND,
            Key::Unflip => keys::FAST_FORWARD,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: u32,
    pub action: KeyAction,
}

impl KeyEvent {
    pub fn down(code: u32) -> Self {
        Self {
            code,
            action: KeyAction::Down,
        }
    }

    pub fn up(code: u32) -> Self {
        Self {
            code,
            action: KeyAction::Up,
        }
    }
}

/// Screen-space direction a directional key stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

pub fn heading(key: Key, orientation: Orientation) -> Option<Heading> {
    let heading = match (orientation, key) {
        (Orientation::Upright, Key::Up) => Heading::Up,
        (Orientation::Upright, Key::Down) => Heading::Down,
        (Orientation::Upright, Key::Left) => Heading::Left,
        (Orientation::Upright, Key::Right) => Heading::Right,
        // Pad rotated a quarter turn to the left.
        (Orientation::Sideways, Key::Up) => Heading::Left,
        (Orientation::Sideways, Key::Down) => Heading::Right,
        (Orientation::Sideways, Key::Left) => Heading::Down,
        (Orientation::Sideways, Key::Right) => Heading::Up,
        _ => return None,
    };
    Some(heading)
}

/// Per-axis target velocity for the held directional keys.  Opposite keys
/// cancel to zero, which lets that axis decay.
pub fn target_velocity(held: &HashSet<Key>, orientation: Orientation) -> Velocity {
    let mut target = Velocity::ZERO;
    for key in held {
        match heading(*key, orientation) {
            Some(Heading::Up) => target.y -= MAX_SPEED,
            Some(Heading::Down) => target.y += MAX_SPEED,
            Some(Heading::Left) => target.x -= MAX_SPEED,
            Some(Heading::Right) => target.x += MAX_SPEED,
            None => {}
        }
    }
    target
}

/// Apply one key event to the state.  Returns `true` if it changed anything.
pub fn handle_key(state: &mut GameState, event: KeyEvent, orientation: Orientation) -> bool {
    let Some(key) = Key::from_code(event.code) else {
        return false;
    };
    match event.action {
        KeyAction::Down => press(state, key, orientation),
        KeyAction::Up => release(state, key),
    }
}

fn press(state: &mut GameState, key: Key, orientation: Orientation) -> bool {
    match state.status {
        GameStatus::GameOver | GameStatus::Cleared => {
            if key == Key::Confirm {
                state.reset();
                true
            } else {
                false
            }
        }
        GameStatus::SelectingShip => select_ship(state, key, orientation),
        GameStatus::Paused => {
            if key == Key::Confirm {
                state.resume();
                true
            } else {
                false
            }
        }
        GameStatus::Ready | GameStatus::Playing => {
            // Any key starts the run once a ship is confirmed.
            state.held.insert(key);
            state.start();
            match key {
                // Repeat key-downs while held do not re-trigger.
                Key::Fire if !state.firing => {
                    state.firing = true;
                    state.fire_bullet();
                }
                Key::Flip => state.flipped = true,
                Key::Unflip => state.flipped = false,
                _ => {}
            }
            true
        }
    }
}

fn release(state: &mut GameState, key: Key) -> bool {
    let was_held = state.held.remove(&key);
    if key == Key::Fire && state.firing {
        state.firing = false;
        return true;
    }
    was_held
}

fn select_ship(state: &mut GameState, key: Key, orientation: Orientation) -> bool {
    if key == Key::Confirm {
        state.confirm_ship();
        return true;
    }
    let Some(heading) = heading(key, orientation) else {
        return false;
    };
    match heading {
        Heading::Up => state.ship.kind = next_unlocked(state.ship.kind, state.entitled, ShipType::prev),
        Heading::Down => state.ship.kind = next_unlocked(state.ship.kind, state.entitled, ShipType::next),
        Heading::Left => state.ship.color = state.ship.color.prev(),
        Heading::Right => state.ship.color = state.ship.color.next(),
    }
    true
}

/// Step through ship types, skipping premium ones without entitlement.
fn next_unlocked(current: ShipType, entitled: bool, step: fn(ShipType) -> ShipType) -> ShipType {
    let mut kind = step(current);
    while !entitled && kind.is_premium() {
        kind = step(kind);
    }
    kind
}
