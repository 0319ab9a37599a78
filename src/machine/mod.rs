//! The session state machine.
//!
//! A session is driven by a declarative table of states loaded from
//! `states.json`. Each state names the screen to show, the action its handler
//! performs, the state to move to afterwards, and whether it fires without
//! waiting for a screen. The table is validated once at load: it must contain
//! at least one state for each required action kind, and construction fails
//! naming whichever kinds are missing.

use crate::constants::TERMINAL_STATE;
use crate::errors::{AppError, AppResult, NavigationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of actions a state can require.
///
/// Handlers are dispatched by matching on this enum exhaustively; an
/// unrecognized action in `states.json` is rejected at deserialization time
/// rather than discovered mid-session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Await acknowledgment, then move on.
    Advance,
    /// Collect new prayer entries.
    CollectNew,
    /// Review past entries.
    ReviewPast,
    /// End the session.
    Terminate,
}

impl Action {
    /// All action kinds a well-formed state table must represent.
    pub const REQUIRED: [Action; 4] = [
        Action::Advance,
        Action::CollectNew,
        Action::ReviewPast,
        Action::Terminate,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Advance => "advance",
            Action::CollectNew => "collect_new",
            Action::ReviewPast => "review_past",
            Action::Terminate => "terminate",
        };
        f.write_str(label)
    }
}

/// One row of the state table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// State name; doubles as the screen name for non-auto states.
    pub name: String,
    /// The handler this state requires.
    pub action: Action,
    /// Target state name; `None` transitions to the terminal state.
    #[serde(default)]
    pub next: Option<String>,
    /// Fires without presenting a screen first.
    #[serde(default)]
    pub auto: bool,
}

/// A finite-state machine over an ordered table of [`State`] records.
///
/// The machine starts at the first record. [`StateMachine::transition`] is a
/// pure function of (current state name, event): it finds the row matching
/// both and moves to that row's target. The distinguished terminal name
/// (`"done"`) has no row of its own; reaching it ends the session.
#[derive(Debug)]
pub struct StateMachine {
    states: Vec<State>,
    current: String,
}

impl StateMachine {
    /// Builds a machine from the loaded table, validating the required repertoire.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the table is empty, any state has an
    /// empty name, or one of the four required action kinds has no state,
    /// naming the specific missing kind(s).
    pub fn new(states: Vec<State>) -> AppResult<Self> {
        if states.is_empty() {
            return Err(AppError::Config("state table is empty".to_string()));
        }

        if let Some(unnamed) = states.iter().position(|s| s.name.trim().is_empty()) {
            return Err(AppError::Config(format!(
                "state table row {} has an empty name",
                unnamed
            )));
        }

        let missing: Vec<String> = Action::REQUIRED
            .iter()
            .filter(|kind| !states.iter().any(|s| s.action == **kind))
            .map(|kind| kind.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Config(format!(
                "state table missing required action kind(s): {}",
                missing.join(", ")
            )));
        }

        let current = states[0].name.clone();
        Ok(StateMachine { states, current })
    }

    /// The name of the current state.
    pub fn current_name(&self) -> &str {
        &self.current
    }

    /// Whether the machine has reached the terminal state.
    pub fn is_done(&self) -> bool {
        self.current == TERMINAL_STATE
    }

    /// The full record for the current state.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::UnknownState` if the current name has no
    /// row. This cannot happen with a well-formed table whose targets all
    /// exist, but the driver defends against it.
    pub fn current_state(&self) -> AppResult<&State> {
        self.states
            .iter()
            .find(|s| s.name == self.current)
            .ok_or_else(|| NavigationError::UnknownState(self.current.clone()).into())
    }

    /// Applies the event returned by the just-executed handler.
    ///
    /// Finds the state whose name equals the current name and whose action
    /// equals `event`, and moves to that state's target (the terminal state
    /// when the target is `None`). Returns the new current name.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NoTransition` if no row matches the
    /// (current state, event) pair.
    pub fn transition(&mut self, event: Action) -> AppResult<&str> {
        let row = self
            .states
            .iter()
            .find(|s| s.name == self.current && s.action == event)
            .ok_or_else(|| NavigationError::NoTransition {
                state: self.current.clone(),
                event: event.to_string(),
            })?;

        self.current = row
            .next
            .clone()
            .unwrap_or_else(|| TERMINAL_STATE.to_string());
        Ok(&self.current)
    }
}

/// The built-in state table written to a fresh data directory.
pub fn default_states() -> Vec<State> {
    let row = |name: &str, action: Action, next: Option<&str>, auto: bool| State {
        name: name.to_string(),
        action,
        next: next.map(str::to_string),
        auto,
    };

    vec![
        row("WELCOME", Action::Advance, Some("HONOR"), false),
        row("HONOR", Action::Advance, Some("CONCERNS"), false),
        row("CONCERNS", Action::CollectNew, Some("REVIEW"), false),
        row("REVIEW", Action::ReviewPast, Some("GODS_WILL"), true),
        row("GODS_WILL", Action::Advance, Some("CLOSING"), false),
        row("CLOSING", Action::Terminate, None, false),
    ]
}
