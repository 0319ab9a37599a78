//! The console seam between the session core and the user.
//!
//! The driver and handlers talk to a [`Console`] trait rather than stdin and
//! stdout directly, so handler behavior can be tested against a scripted
//! implementation. The structured prompts (new entry, resolution) are
//! provided methods built on the two primitives, `say` and `prompt`.

use crate::errors::AppResult;
use crate::model::Entry;
use crate::screens::Screen;
use std::io::{self, BufRead, Write};

/// Blocking console I/O as the session core sees it.
pub trait Console {
    /// Writes one line of output.
    fn say(&mut self, line: &str);

    /// Writes a prompt and blocks for one line of input, trimmed.
    /// End of input is reported as an empty response.
    fn prompt(&mut self, text: &str) -> AppResult<String>;

    /// Renders a devotional screen: header, then paragraphs with their verses.
    fn render(&mut self, screen: &Screen) {
        self.say("");
        if let Some(header) = &screen.header {
            self.say(header);
            self.say("");
        }
        for paragraph in &screen.paragraphs {
            self.say(&paragraph.text);
            if let Some(verse) = &paragraph.verse {
                self.say(&format!("    {}", verse));
            }
        }
    }

    /// Shows one past prayer ahead of its review prompt.
    fn show_entry(&mut self, entry: &Entry) {
        self.say("");
        self.say(&entry.content);
        self.say(&format!("    ({}, {})", entry.tag, entry.created_on));
    }

    /// Collects one new prayer: content first, then its category.
    /// A blank content line means the user is done.
    fn prompt_new_entry(&mut self) -> AppResult<Option<(String, String)>> {
        let content = self.prompt("Enter a prayer request (press Enter when done):")?;
        if content.is_empty() {
            return Ok(None);
        }
        let tag = self.prompt("Category?")?;
        Ok(Some((content, tag)))
    }

    /// Asks for an optional resolution; blank means "not yet answered".
    fn prompt_resolution(&mut self) -> AppResult<Option<String>> {
        let answer = self.prompt("How was this prayer answered? (press Enter to skip)")?;
        Ok(if answer.is_empty() { None } else { Some(answer) })
    }
}

/// The stdin/stdout console used by the binary.
#[derive(Debug, Default)]
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        StdConsole
    }
}

impl Console for StdConsole {
    fn say(&mut self, line: &str) {
        println!("{}", line);
    }

    fn prompt(&mut self, text: &str) -> AppResult<String> {
        print!("{} ", text);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }
}
