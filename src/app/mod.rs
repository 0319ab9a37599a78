//! The session driver and its handlers.
//!
//! The driver walks the state machine: for each non-auto state it renders the
//! screen bound to the state's name, runs the handler for the state's action,
//! and feeds the handler's event back into the machine. Handlers mutate the
//! repository only through its discrete mutation methods, so the selection
//! logic underneath stays pure.
//!
//! A fatal error inside the loop still takes the orderly-shutdown path: the
//! repository is persisted best-effort before the error propagates out.

use crate::console::Console;
use crate::constants::EXPORT_COMMAND;
use crate::errors::AppResult;
use crate::machine::{Action, StateMachine};
use crate::model::{max_weight, tag_index, Entry, Session};
use crate::screens::ScreenBook;
use crate::selector::{next_tier, select_batch};
use crate::store::Store;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// One guided prayer session over a loaded repository.
pub struct App<C: Console> {
    store: Store,
    machine: StateMachine,
    screens: ScreenBook,
    console: C,
    session: Session,
    shown: HashSet<Uuid>,
    weights: HashMap<String, u32>,
    batch_size: usize,
    fallback_tag: String,
    tier: u32,
    max_tier: u32,
    today: NaiveDate,
    rng: StdRng,
}

impl<C: Console> App<C> {
    /// Wires a session together: state machine, rotated screens, weights,
    /// streak carryover and the RNG.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for an invalid state table or screen bank,
    /// and `AppError::Storage` when either cannot be loaded.
    pub fn new(
        mut store: Store,
        console: C,
        seed: Option<u64>,
        today: NaiveDate,
    ) -> AppResult<Self> {
        let machine = StateMachine::new(store.load_states()?)?;
        let screens = ScreenBook::new(store.load_panel_sets()?, store.params().last_panel_set)?;
        store.params_mut().last_panel_set = screens.active_index();
        store.params_mut().update_streak(today);

        let weights: HashMap<String, u32> = store
            .tags()
            .iter()
            .map(|t| (t.name.clone(), t.weight))
            .collect();
        let max_tier = max_weight(store.tags());
        let batch_size = store.params().batch_size;
        let fallback_tag = store.params().fallback_tag.clone();

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(App {
            store,
            machine,
            screens,
            console,
            session: Session::default(),
            shown: HashSet::new(),
            weights,
            batch_size,
            fallback_tag,
            tier: max_tier,
            max_tier,
            today,
            rng,
        })
    }

    /// Runs the session to completion and persists the repository.
    ///
    /// The repository is written even when the loop aborts on a fatal error;
    /// the original error still propagates afterwards.
    pub fn run(&mut self) -> AppResult<()> {
        let outcome = self.drive();
        if let Err(err) = &outcome {
            error!(error = %err, "Session aborted; attempting orderly shutdown");
        }

        match self.store.persist() {
            Ok(()) => outcome,
            Err(persist_err) => {
                if outcome.is_err() {
                    // Report the original failure; the persist failure is logged
                    error!(error = %persist_err, "Persist during abort also failed");
                    outcome
                } else {
                    Err(persist_err)
                }
            }
        }
    }

    fn drive(&mut self) -> AppResult<()> {
        while !self.machine.is_done() {
            let state = self.machine.current_state()?.clone();
            debug!(state = %state.name, action = %state.action, "Entering state");

            if !state.auto {
                let screen = self.screens.find_screen(&state.name)?;
                self.console.render(screen);
            }

            let event = self.handle(state.action)?;
            self.machine.transition(event)?;
        }
        Ok(())
    }

    /// Runs the handler for `action` and returns the event to transition on.
    fn handle(&mut self, action: Action) -> AppResult<Action> {
        match action {
            Action::Advance => self.advance()?,
            Action::CollectNew => self.collect_new()?,
            Action::ReviewPast => self.review_past()?,
            Action::Terminate => self.terminate()?,
        }
        Ok(action)
    }

    /// Waits for acknowledgment. Recognizes the `export` special response.
    fn advance(&mut self) -> AppResult<()> {
        let response = self.console.prompt("Press Enter to continue")?;
        if response == EXPORT_COMMAND {
            let path = self.store.export()?;
            self.console
                .say(&format!("Exported entries to {}", path.display()));
        }
        Ok(())
    }

    /// Collects new prayers until the user submits a blank line.
    fn collect_new(&mut self) -> AppResult<()> {
        while let Some((content, tag)) = self.console.prompt_new_entry()? {
            let tag = if tag.is_empty() {
                self.fallback_tag.clone()
            } else {
                tag
            };
            self.store.append_entry(Entry::new(content, tag, self.today));
            self.session.added += 1;
        }
        debug!(added = self.session.added, "Intake finished");
        Ok(())
    }

    /// Surfaces past prayers in batches until the user stops or the pool runs dry.
    fn review_past(&mut self) -> AppResult<()> {
        loop {
            let round_tier = self.tier;
            self.tier = next_tier(self.tier, self.max_tier);

            let batch = select_batch(
                self.store.entries(),
                &self.weights,
                self.batch_size,
                round_tier,
                &mut self.shown,
                self.today,
                &mut self.rng,
            );
            debug!(tier = round_tier, picked = batch.len(), "Review round");

            if batch.is_empty() {
                self.console.say("");
                self.console.say("Nothing more to review.");
                return Ok(());
            }

            let full_batch = batch.len() == self.batch_size;
            for id in batch {
                let Some(entry) = self.store.entry(id).cloned() else {
                    warn!(%id, "Selected entry missing from the store");
                    continue;
                };
                self.console.show_entry(&entry);
                self.store.record_display(id);
                self.session.reviewed += 1;

                if let Some(answer) = self.console.prompt_resolution()? {
                    self.store.resolve(id, answer, self.today);
                    self.session.resolved += 1;
                }
            }

            // A short batch already means the pool is exhausted
            if !full_batch {
                return Ok(());
            }
            let more = self.console.prompt("Review more? (y/n)")?;
            if !matches!(more.to_lowercase().as_str(), "y" | "yes") {
                return Ok(());
            }
        }
    }

    /// Prints the closing summary before the machine reaches the terminal state.
    fn terminate(&mut self) -> AppResult<()> {
        let open = tag_index(self.store.entries());
        let open_count: usize = open.values().map(Vec::len).sum();

        self.console.say("");
        self.console.say(&format!(
            "This session: {} added, {} reviewed, {} answered.",
            self.session.added, self.session.reviewed, self.session.resolved
        ));
        self.console
            .say(&format!("Day streak: {}.", self.store.params().streak));
        if open_count > 0 {
            self.console.say(&format!(
                "Still carrying {} open prayers across {} categories.",
                open_count,
                open.len()
            ));
        }

        info!(
            added = self.session.added,
            reviewed = self.session.reviewed,
            resolved = self.session.resolved,
            "Session closing"
        );
        Ok(())
    }

    /// The per-run counters, for inspection after `run`.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The repository, for inspection after `run`.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The console, for inspection after `run`.
    pub fn console(&self) -> &C {
        &self.console
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::testing::ScriptedConsole;
    use crate::constants::{PARAMS_FILE, SCREENS_FILE, STATES_FILE};
    use crate::errors::AppError;
    use crate::model::Params;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 6, 15)
    }

    fn seeded_store(dir: &std::path::Path, past_entries: usize) -> Store {
        let mut store = Store::open(dir).unwrap();
        for i in 0..past_entries {
            store.append_entry(Entry::new(
                format!("past prayer {}", i),
                "General",
                date(2024, 1, 1),
            ));
        }
        store
    }

    #[test]
    fn test_full_session_with_intake_scenario() {
        let dir = tempdir().unwrap();
        let store = seeded_store(dir.path(), 0);

        // WELCOME, HONOR acks; one new prayer; blank line ends intake;
        // remaining prompts ride on script exhaustion (blank responses).
        let console = ScriptedConsole::with_responses(&["", "", "Pray for family", "Family", ""]);
        let mut app = App::new(store, console, Some(1), today()).unwrap();
        app.run().unwrap();

        assert_eq!(app.session().added, 1);
        let entries = app.store().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, "Pray for family");
        assert_eq!(entries[0].tag, "Family");
        assert_eq!(entries[0].display_count, 0);

        // Same-day entries are not re-surfaced
        assert_eq!(app.session().reviewed, 0);
        assert!(app
            .console()
            .transcript()
            .contains("Nothing more to review."));
    }

    #[test]
    fn test_blank_tag_falls_back_to_configured_default() {
        let dir = tempdir().unwrap();
        let store = seeded_store(dir.path(), 0);

        let console = ScriptedConsole::with_responses(&["", "", "Pray for peace", "", ""]);
        let mut app = App::new(store, console, Some(1), today()).unwrap();
        app.run().unwrap();

        assert_eq!(app.store().entries()[0].tag, "General");
    }

    #[test]
    fn test_review_round_touches_batch_size_entries() {
        let dir = tempdir().unwrap();
        let store = seeded_store(dir.path(), 5);

        // Two acks, end intake, three skipped resolutions, decline more
        let console = ScriptedConsole::with_responses(&["", "", "", "", "", "", "n", ""]);
        let mut app = App::new(store, console, Some(1), today()).unwrap();
        app.run().unwrap();

        assert_eq!(app.session().reviewed, 3);
        assert_eq!(app.session().resolved, 0);
        let displayed = app
            .store()
            .entries()
            .iter()
            .filter(|e| e.display_count == 1)
            .count();
        assert_eq!(displayed, 3);
    }

    #[test]
    fn test_review_continues_through_pool_without_repeats() {
        let dir = tempdir().unwrap();
        let store = seeded_store(dir.path(), 5);

        // Keep answering "y"; rounds of 3 + 2 drain the pool, and the short
        // second batch stops the loop without a continue prompt.
        let console =
            ScriptedConsole::with_responses(&["", "", "", "", "", "", "y", "", "", ""]);
        let mut app = App::new(store, console, Some(1), today()).unwrap();
        app.run().unwrap();

        assert_eq!(app.session().reviewed, 5);
        assert!(app.store().entries().iter().all(|e| e.display_count == 1));
    }

    #[test]
    fn test_resolution_marks_entry_answered() {
        let dir = tempdir().unwrap();
        let store = seeded_store(dir.path(), 1);

        let console = ScriptedConsole::with_responses(&["", "", "", "God provided", ""]);
        let mut app = App::new(store, console, Some(1), today()).unwrap();
        app.run().unwrap();

        assert_eq!(app.session().resolved, 1);
        let entry = &app.store().entries()[0];
        assert_eq!(entry.resolution.as_deref(), Some("God provided"));
        assert_eq!(entry.resolved_on, Some(today()));
        assert_eq!(entry.display_count, 1);
    }

    #[test]
    fn test_export_command_at_continue_prompt() {
        let dir = tempdir().unwrap();
        let store = seeded_store(dir.path(), 1);

        let console = ScriptedConsole::with_responses(&["export", ""]);
        let mut app = App::new(store, console, Some(1), today()).unwrap();
        app.run().unwrap();

        assert!(dir.path().join("export.json").exists());
        assert!(app.console().transcript().contains("Exported entries"));
    }

    #[test]
    fn test_streak_extends_from_carryover() {
        let dir = tempdir().unwrap();
        Store::open(dir.path()).unwrap();
        let params = Params {
            streak: 6,
            last_prayer_date: Some(date(2024, 6, 14)),
            ..Params::default()
        };
        fs::write(
            dir.path().join(PARAMS_FILE),
            serde_json::to_string_pretty(&params).unwrap(),
        )
        .unwrap();

        let store = Store::open(dir.path()).unwrap();
        let console = ScriptedConsole::with_responses(&[]);
        let mut app = App::new(store, console, Some(1), today()).unwrap();
        app.run().unwrap();

        assert_eq!(app.store().params().streak, 7);
        assert!(app.console().transcript().contains("Day streak: 7."));
    }

    #[test]
    fn test_panel_set_rotation_is_persisted() {
        let dir = tempdir().unwrap();

        let store = seeded_store(dir.path(), 0);
        assert_eq!(store.params().last_panel_set, 0);
        let console = ScriptedConsole::with_responses(&[]);
        let mut app = App::new(store, console, Some(1), today()).unwrap();
        app.run().unwrap();
        assert_eq!(app.store().params().last_panel_set, 1);

        // Next session wraps back to the first set
        let store = Store::open(dir.path()).unwrap();
        let console = ScriptedConsole::with_responses(&[]);
        let app = App::new(store, console, Some(1), today()).unwrap();
        assert_eq!(app.store().params().last_panel_set, 0);
    }

    #[test]
    fn test_missing_screen_aborts_with_navigation_error() {
        let dir = tempdir().unwrap();
        Store::open(dir.path()).unwrap();

        // Rename the opening state to one no screen is bound to
        let states = fs::read_to_string(dir.path().join(STATES_FILE)).unwrap();
        fs::write(
            dir.path().join(STATES_FILE),
            states.replace("WELCOME", "INTRO"),
        )
        .unwrap();

        let store = Store::open(dir.path()).unwrap();
        let console = ScriptedConsole::with_responses(&[]);
        let mut app = App::new(store, console, Some(1), today()).unwrap();
        let err = app.run().unwrap_err();
        assert!(matches!(err, AppError::Navigation(_)));
    }

    #[test]
    fn test_auto_state_skips_screen_lookup() {
        let dir = tempdir().unwrap();
        Store::open(dir.path()).unwrap();

        // The REVIEW state is auto and deliberately has no screen bound to it
        let screens = fs::read_to_string(dir.path().join(SCREENS_FILE)).unwrap();
        assert!(!screens.contains("\"REVIEW\""));

        let store = seeded_store(dir.path(), 0);
        let console = ScriptedConsole::with_responses(&[]);
        let mut app = App::new(store, console, Some(1), today()).unwrap();
        app.run().unwrap();
    }

    #[test]
    fn test_closing_summary_counts_open_prayers() {
        let dir = tempdir().unwrap();
        let store = seeded_store(dir.path(), 2);

        let console = ScriptedConsole::with_responses(&["", "", "", "", "", ""]);
        let mut app = App::new(store, console, Some(1), today()).unwrap();
        app.run().unwrap();

        assert!(app
            .console()
            .transcript()
            .contains("Still carrying 2 open prayers across 1 categories."));
    }
}
