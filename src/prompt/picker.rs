//! Full-screen fuzzy picker dialogs.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use super::fuzzy;
use crate::ui;

/// Shared state for the single- and multi-select pickers.
pub struct PickerState {
    pub title: String,
    pub items: Vec<String>,
    pub input: String,
    /// Indices into `items` that pass the current filter, in display order.
    pub filtered: Vec<usize>,
    /// Cursor position within `filtered`.
    pub cursor: usize,
    /// Checked item indices (multi-select only).
    pub checked: HashSet<usize>,
    pub multi: bool,
}

impl PickerState {
    fn new(title: &str, items: &[String], multi: bool, initial_input: Option<&str>) -> Self {
        let mut state = Self {
            title: format!(" {} ", title),
            items: items.to_vec(),
            input: initial_input.unwrap_or("").to_string(),
            filtered: Vec::new(),
            cursor: 0,
            checked: HashSet::new(),
            multi,
        };
        state.refilter();
        if multi && initial_input.is_some() {
            // Positional-argument pre-fill: every match starts checked, the
            // dialog is only there to confirm or adjust.
            state.checked = state.filtered.iter().copied().collect();
        }
        state
    }

    fn refilter(&mut self) {
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| fuzzy::is_match(item, &self.input))
            .map(|(i, _)| i)
            .collect();
        if self.cursor >= self.filtered.len() {
            self.cursor = self.filtered.len().saturating_sub(1);
        }
    }

    fn current(&self) -> Option<usize> {
        self.filtered.get(self.cursor).copied()
    }

    fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    fn move_down(&mut self) {
        if !self.filtered.is_empty() && self.cursor < self.filtered.len() - 1 {
            self.cursor += 1;
        }
    }

    fn toggle_current(&mut self) {
        if let Some(idx) = self.current() {
            if !self.checked.remove(&idx) {
                self.checked.insert(idx);
            }
        }
    }

    fn toggle_visible(&mut self) {
        if self.filtered.iter().all(|idx| self.checked.contains(idx)) {
            for idx in &self.filtered {
                self.checked.remove(idx);
            }
        } else {
            self.checked.extend(self.filtered.iter().copied());
        }
    }
}

enum Outcome {
    Pending,
    Accept,
    Cancel,
}

fn handle_key(state: &mut PickerState, key: KeyEvent) -> Outcome {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => return Outcome::Cancel,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Outcome::Cancel,
        (KeyCode::Enter, _) => {
            if state.multi || state.current().is_some() {
                return Outcome::Accept;
            }
        }
        (KeyCode::Up, _) => state.move_up(),
        (KeyCode::Down, _) => state.move_down(),
        (KeyCode::Char('p'), KeyModifiers::CONTROL) => state.move_up(),
        (KeyCode::Char('n'), KeyModifiers::CONTROL) => state.move_down(),
        (KeyCode::Tab, _) if state.multi => state.toggle_current(),
        (KeyCode::Char('a'), KeyModifiers::CONTROL) if state.multi => state.toggle_visible(),
        (KeyCode::Backspace, _) => {
            state.input.pop();
            state.refilter();
        }
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            state.input.push(c);
            state.refilter();
        }
        _ => {}
    }
    Outcome::Pending
}

fn run(mut state: PickerState) -> Result<Option<PickerState>> {
    ui::with_terminal(move |terminal| {
        loop {
            terminal.draw(|frame| ui::picker_view::render(frame, &state))?;
            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    match handle_key(&mut state, key) {
                        Outcome::Accept => return Ok(Some(state)),
                        Outcome::Cancel => return Ok(None),
                        Outcome::Pending => {}
                    }
                }
            }
        }
    })
}

/// Single-choice picker. Returns `None` when the operator cancels.
pub fn pick_one(title: &str, choices: &[String]) -> Result<Option<String>> {
    let done = run(PickerState::new(title, choices, false, None))?;
    Ok(done.and_then(|state| state.current().map(|idx| state.items[idx].clone())))
}

/// Multi-choice picker. `initial_filter` pre-fills the filter line and
/// checks every match. Enter with nothing checked selects the highlighted
/// item; an empty result means the operator cancelled.
pub fn pick_many(
    title: &str,
    choices: &[String],
    initial_filter: Option<&str>,
) -> Result<Vec<String>> {
    let done = run(PickerState::new(title, choices, true, initial_filter))?;
    let Some(state) = done else {
        return Ok(Vec::new());
    };
    let picked: Vec<usize> = if state.checked.is_empty() {
        state.current().into_iter().collect()
    } else {
        let mut indices: Vec<usize> = state.checked.iter().copied().collect();
        indices.sort_unstable();
        indices
    };
    Ok(picked
        .into_iter()
        .map(|idx| state.items[idx].clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_refilter_narrows_and_clamps_cursor() {
        let mut state = PickerState::new(
            "Select a pod:",
            &items(&["api-1", "api-2", "worker-1"]),
            false,
            None,
        );
        assert_eq!(state.filtered.len(), 3);

        state.cursor = 2;
        state.input.push_str("api");
        state.refilter();
        assert_eq!(state.filtered, vec![0, 1]);
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn test_initial_filter_prechecks_matches() {
        let state = PickerState::new(
            "Select pods:",
            &items(&["api-1", "api-2", "worker-1"]),
            true,
            Some("api"),
        );
        assert_eq!(state.filtered, vec![0, 1]);
        assert_eq!(state.checked, [0, 1].into_iter().collect());
    }

    #[test]
    fn test_toggle_visible_flips_all_then_none() {
        let mut state = PickerState::new("Select pods:", &items(&["a", "b", "c"]), true, None);
        state.toggle_visible();
        assert_eq!(state.checked.len(), 3);
        state.toggle_visible();
        assert!(state.checked.is_empty());
    }

    #[test]
    fn test_typing_updates_filter() {
        let mut state = PickerState::new("Select:", &items(&["default", "kube-system"]), false, None);
        let key = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE);
        assert!(matches!(handle_key(&mut state, key), Outcome::Pending));
        assert_eq!(state.input, "k");
        assert_eq!(state.filtered, vec![1]);
    }

    #[test]
    fn test_enter_without_match_is_ignored_in_single_mode() {
        let mut state = PickerState::new("Select:", &items(&["default"]), false, None);
        state.input.push_str("zzz");
        state.refilter();
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert!(matches!(handle_key(&mut state, key), Outcome::Pending));
    }
}
