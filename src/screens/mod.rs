//! Devotional screens and the panel-set rotation.
//!
//! `screens.json` holds an ordered list of panel sets. Each set carries one
//! screen per non-auto state, looked up by the state's name. A session
//! activates the set after the one shown last time, so the devotional content
//! rotates across sessions; the marker is persisted with the rest of the
//! carryover at shutdown.

use crate::errors::{AppError, AppResult, NavigationError};
use serde::{Deserialize, Serialize};

/// A paragraph of devotional text, optionally anchored to a verse reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    /// Bible book chapter:verse reference, when the paragraph quotes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse: Option<String>,
}

/// One screen of a session, bound to a state by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    /// Matches the name of the state that displays this screen.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    pub paragraphs: Vec<Paragraph>,
}

/// A complete set of screens for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSet {
    pub id: String,
    pub screens: Vec<Screen>,
}

/// The loaded panel sets plus the one active for this session.
#[derive(Debug)]
pub struct ScreenBook {
    sets: Vec<PanelSet>,
    active: usize,
}

impl ScreenBook {
    /// Rotates to the set after `last_panel_set` and makes it active.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if no panel sets are defined.
    pub fn new(sets: Vec<PanelSet>, last_panel_set: usize) -> AppResult<Self> {
        if sets.is_empty() {
            return Err(AppError::Config("screens.json defines no panel sets".to_string()));
        }
        let active = (last_panel_set + 1) % sets.len();
        Ok(ScreenBook { sets, active })
    }

    /// Index of the active set, persisted as the next session's rotation marker.
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Looks up a screen in the active set by state name.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::ScreenNotFound` if the active set has no
    /// screen with that name.
    pub fn find_screen(&self, name: &str) -> AppResult<&Screen> {
        self.sets[self.active]
            .screens
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| NavigationError::ScreenNotFound(name.to_string()).into())
    }
}

/// The built-in devotional content written to a fresh data directory.
pub fn default_panel_sets() -> Vec<PanelSet> {
    let screen = |name: &str, header: &str, paragraphs: Vec<Paragraph>| Screen {
        name: name.to_string(),
        header: Some(header.to_string()),
        paragraphs,
    };
    let plain = |text: &str| Paragraph {
        text: text.to_string(),
        verse: None,
    };
    let versed = |text: &str, verse: &str| Paragraph {
        text: text.to_string(),
        verse: Some(verse.to_string()),
    };

    vec![
        PanelSet {
            id: "morning".to_string(),
            screens: vec![
                screen(
                    "WELCOME",
                    "WELCOME",
                    vec![plain("Welcome back. Take a breath and set this time apart.")],
                ),
                screen(
                    "HONOR",
                    "HONOR",
                    vec![versed(
                        "Great is the Lord, and greatly to be praised; his greatness is unsearchable.",
                        "Psalm 145:3",
                    )],
                ),
                screen(
                    "CONCERNS",
                    "MY CONCERNS",
                    vec![plain(
                        "Bring what weighs on you. Add each concern as a prayer, one at a time.",
                    )],
                ),
                screen(
                    "GODS_WILL",
                    "GOD'S WILL",
                    vec![versed(
                        "Your kingdom come, your will be done, on earth as it is in heaven.",
                        "Matthew 6:10",
                    )],
                ),
                screen(
                    "CLOSING",
                    "CLOSING",
                    vec![plain("Go in peace. These prayers are kept for next time.")],
                ),
            ],
        },
        PanelSet {
            id: "evening".to_string(),
            screens: vec![
                screen(
                    "WELCOME",
                    "WELCOME",
                    vec![plain("The day is ending. Set it down here for a while.")],
                ),
                screen(
                    "HONOR",
                    "HONOR",
                    vec![versed(
                        "From the rising of the sun to its setting, the name of the Lord is to be praised.",
                        "Psalm 113:3",
                    )],
                ),
                screen(
                    "CONCERNS",
                    "MY CONCERNS",
                    vec![plain("What is still unsettled from today? Name it as a prayer.")],
                ),
                screen(
                    "GODS_WILL",
                    "GOD'S WILL",
                    vec![versed(
                        "Not my will, but yours, be done.",
                        "Luke 22:42",
                    )],
                ),
                screen(
                    "CLOSING",
                    "CLOSING",
                    vec![plain("Rest well. Tomorrow the journal opens where you left it.")],
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_advances_and_wraps() {
        let sets = default_panel_sets();
        assert_eq!(sets.len(), 2);

        let book = ScreenBook::new(sets.clone(), 0).unwrap();
        assert_eq!(book.active_index(), 1);

        let book = ScreenBook::new(sets, 1).unwrap();
        assert_eq!(book.active_index(), 0);
    }

    #[test]
    fn test_stale_marker_still_lands_in_range() {
        // A marker from a screens.json that used to have more sets
        let book = ScreenBook::new(default_panel_sets(), 7).unwrap();
        assert!(book.active_index() < 2);
    }

    #[test]
    fn test_empty_book_is_a_config_error() {
        let err = ScreenBook::new(vec![], 0).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_find_screen_by_state_name() {
        let book = ScreenBook::new(default_panel_sets(), 1).unwrap();
        let screen = book.find_screen("CONCERNS").unwrap();
        assert_eq!(screen.header.as_deref(), Some("MY CONCERNS"));

        let err = book.find_screen("NO_SUCH").unwrap_err();
        assert!(format!("{}", err).contains("NO_SUCH"));
    }

    #[test]
    fn test_default_sets_cover_every_non_auto_state() {
        let states = crate::machine::default_states();
        for set in default_panel_sets() {
            let book = ScreenBook::new(vec![set], 0).unwrap();
            for state in states.iter().filter(|s| !s.auto) {
                assert!(
                    book.find_screen(&state.name).is_ok(),
                    "missing screen for {}",
                    state.name
                );
            }
        }
    }

    #[test]
    fn test_screen_round_trips_through_json() {
        let sets = default_panel_sets();
        let json = serde_json::to_string_pretty(&sets).unwrap();
        let back: Vec<PanelSet> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sets);
    }
}
