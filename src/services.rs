/// External collaborators: the payment entitlement check and the voice
/// command channel.  Both only feed the same narrow intents the keyboard does.
use std::path::{Path, PathBuf};

use log::warn;
use serde::Deserialize;

use crate::error::GameError;

// ── Entitlement ───────────────────────────────────────────────────────────────

/// A source for the "entitled" flag that unlocks premium ships.
pub trait EntitlementCheck: Send {
    fn check(&self) -> Result<bool, GameError>;
}

/// Payments switched off: everything is unlocked.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlocked;

impl EntitlementCheck for Unlocked {
    fn check(&self) -> Result<bool, GameError> {
        Ok(true)
    }
}

/// Payments switched on but no service reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl EntitlementCheck for Offline {
    fn check(&self) -> Result<bool, GameError> {
        Err(GameError::Entitlement("no payment service configured".into()))
    }
}

/// Payment status record as the service returns it.
#[derive(Debug, Clone, Deserialize)]
struct PaymentStatus {
    #[serde(rename = "isPaid", default)]
    is_paid: bool,
}

/// Reads a payment status record from a local JSON file.
#[derive(Debug, Clone)]
pub struct EntitlementFile {
    path: PathBuf,
}

impl EntitlementFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl EntitlementCheck for EntitlementFile {
    fn check(&self) -> Result<bool, GameError> {
        let json = std::fs::read_to_string(&self.path)
            .map_err(|e| GameError::Entitlement(format!("{}: {e}", self.path.display())))?;
        let status: PaymentStatus = serde_json::from_str(&json)
            .map_err(|e| GameError::Entitlement(format!("{}: {e}", self.path.display())))?;
        Ok(status.is_paid)
    }
}

/// Run a check once.  Any failure counts as "not entitled"; there is no retry.
pub fn resolve_entitlement(check: &dyn EntitlementCheck) -> bool {
    match check.check() {
        Ok(entitled) => entitled,
        Err(e) => {
            warn!("{e}; treating player as not entitled");
            false
        }
    }
}

// ── Voice commands ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceCommand {
    StartGame,
    PauseGame,
    ResumeGame,
    RestartGame,
    NewGame,
}

impl VoiceCommand {
    /// Match a recognised phrase, ignoring case, surrounding whitespace and a
    /// leading wake word.
    pub fn parse(phrase: &str) -> Option<Self> {
        let phrase = phrase.trim().to_lowercase();
        let phrase = phrase
            .strip_prefix("alexa")
            .map(|rest| rest.trim_start_matches([',', ' ']))
            .unwrap_or(&phrase);
        match phrase.trim() {
            "start game" => Some(VoiceCommand::StartGame),
            "pause game" => Some(VoiceCommand::PauseGame),
            "resume game" => Some(VoiceCommand::ResumeGame),
            "restart game" => Some(VoiceCommand::RestartGame),
            "new game" => Some(VoiceCommand::NewGame),
            _ => None,
        }
    }
}
