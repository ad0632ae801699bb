//! Interactive prompts with positional-argument pre-fill.

pub mod fuzzy;
pub mod picker;

use std::collections::VecDeque;

use anyhow::Result;
use crossterm::style::Stylize;

/// A run of prompts sharing the positional-argument queue.
///
/// Each prompt first pops the queue: an argument that fuzzy-matches one of
/// the choices answers the prompt without showing it. An argument that
/// matches nothing is consumed anyway and the prompt falls back to the
/// interactive picker.
pub struct PromptSession {
    args: VecDeque<String>,
}

impl PromptSession {
    pub fn new(args: Vec<String>) -> Self {
        Self { args: args.into() }
    }

    /// Ask for one choice. `last` floats the previously chosen answer to the
    /// top of the list. Returns `None` when the operator cancels.
    pub fn ask(
        &mut self,
        message: &str,
        choices: &[String],
        last: Option<&str>,
    ) -> Result<Option<String>> {
        if let Some(arg) = self.args.pop_front() {
            if let Some(found) = choices.iter().find(|choice| fuzzy::is_match(choice, &arg)) {
                println!("{} {}", message.bold(), found.as_str().cyan());
                return Ok(Some(found.clone()));
            }
        }
        let ordered = reorder_for_last(choices, last);
        match picker::pick_one(message, &ordered)? {
            Some(choice) => {
                println!("{} {}", message.bold(), choice.as_str().cyan());
                Ok(Some(choice))
            }
            None => Ok(None),
        }
    }

    /// Ask for any number of choices. A queued argument pre-fills the filter
    /// with all its matches checked.
    pub fn ask_many(&mut self, message: &str, choices: &[String]) -> Result<Vec<String>> {
        let initial = self.args.pop_front();
        let selected = picker::pick_many(message, choices, initial.as_deref())?;
        if !selected.is_empty() {
            let joined = selected.join(", ");
            println!("{} {}", message.bold(), joined.as_str().cyan());
        }
        Ok(selected)
    }
}

/// Move the remembered answer to the front so it sits under the cursor.
fn reorder_for_last(choices: &[String], last: Option<&str>) -> Vec<String> {
    let mut ordered = choices.to_vec();
    if let Some(last) = last {
        if let Some(pos) = ordered.iter().position(|choice| choice == last) {
            let hit = ordered.remove(pos);
            ordered.insert(0, hit);
        }
    }
    ordered
}
