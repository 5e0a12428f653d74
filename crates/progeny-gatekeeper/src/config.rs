//! Gatekeeper configuration

use serde::{Deserialize, Serialize};

/// Extra components salted into identity keys
///
/// Salting is opt-in: it separates namesakes from different states or
/// sessions, but also stops the same person from being merged across them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Disambiguation {
    /// Name only
    #[default]
    None,
    /// Name + state
    State,
    /// Name + session/assembly
    Session,
    /// Name + state + session/assembly
    StateAndSession,
}

impl Disambiguation {
    /// Whether the state label is part of the key
    pub fn uses_state(&self) -> bool {
        matches!(self, Disambiguation::State | Disambiguation::StateAndSession)
    }

    /// Whether the session label is part of the key
    pub fn uses_session(&self) -> bool {
        matches!(self, Disambiguation::Session | Disambiguation::StateAndSession)
    }
}

/// Configuration for validation rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Identity key salting
    pub disambiguate: Disambiguation,

    /// Treat blank count strings as absent instead of invalid
    pub blank_as_absent: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            disambiguate: Disambiguation::None,
            blank_as_absent: true,
        }
    }
}

impl ValidationConfig {
    /// Key by name and state (state assembly datasets)
    pub fn by_state() -> Self {
        Self {
            disambiguate: Disambiguation::State,
            ..Self::default()
        }
    }

    /// Salt with everything and reject blank counts
    pub fn strict() -> Self {
        Self {
            disambiguate: Disambiguation::StateAndSession,
            blank_as_absent: false,
        }
    }
}
