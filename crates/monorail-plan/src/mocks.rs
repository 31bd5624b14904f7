//! Scripted prompt providers for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use monorail_core::BumpKeyword;

use crate::error::Result;
use crate::prompt::{PromptProvider, TextContract, TextInput, VersionChoice, VersionSelection};

#[derive(Debug, Clone)]
enum Step {
    Bump(BumpKeyword),
    SelectCustomPrerelease,
    SelectCustomVersion,
    Text(String),
    Cancel,
}

/// A [`PromptProvider`] that replays a scripted sequence of answers.
///
/// Panics on an unscripted prompt, so a test that issues more prompts
/// than expected fails loudly.
pub struct MockPromptProvider {
    script: Mutex<VecDeque<Step>>,
    select_messages: Mutex<Vec<String>>,
    text_attempts: Mutex<usize>,
}

impl Default for MockPromptProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPromptProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            select_messages: Mutex::new(Vec::new()),
            text_attempts: Mutex::new(0),
        }
    }

    /// Scripts selecting the given bump from the menu.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn choose_bump(self, keyword: BumpKeyword) -> Self {
        self.push(Step::Bump(keyword));
        self
    }

    /// Scripts selecting the custom-version choice and answering the text
    /// prompt with `input`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn choose_custom_version(self, input: &str) -> Self {
        self.push(Step::SelectCustomVersion);
        self.push(Step::Text(input.to_string()));
        self
    }

    /// Scripts selecting the prerelease choice and answering with `id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn choose_custom_prerelease(self, id: &str) -> Self {
        self.push(Step::SelectCustomPrerelease);
        self.push(Step::Text(id.to_string()));
        self
    }

    /// Scripts an additional text answer, for re-prompt scenarios.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn then_text(self, input: &str) -> Self {
        self.push(Step::Text(input.to_string()));
        self
    }

    /// Scripts declining the next prompt.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn cancel(self) -> Self {
        self.push(Step::Cancel);
        self
    }

    /// Number of selection prompts issued so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn select_calls(&self) -> usize {
        self.select_messages.lock().expect("lock poisoned").len()
    }

    /// Messages of the selection prompts issued so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn select_messages(&self) -> Vec<String> {
        self.select_messages.lock().expect("lock poisoned").clone()
    }

    /// Number of text inputs consumed, including rejected ones.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn text_attempts(&self) -> usize {
        *self.text_attempts.lock().expect("lock poisoned")
    }

    fn push(&self, step: Step) {
        self.script.lock().expect("lock poisoned").push_back(step);
    }

    fn pop(&self) -> Option<Step> {
        self.script.lock().expect("lock poisoned").pop_front()
    }
}

impl PromptProvider for MockPromptProvider {
    fn select_version(&self, message: &str, choices: &[VersionChoice]) -> Result<VersionSelection> {
        self.select_messages
            .lock()
            .expect("lock poisoned")
            .push(message.to_string());

        match self.pop() {
            Some(Step::Bump(keyword)) => {
                let choice = choices
                    .iter()
                    .find(
                        |c| matches!(c, VersionChoice::Bump { keyword: k, .. } if *k == keyword),
                    )
                    .unwrap_or_else(|| panic!("menu offers no '{keyword}' choice"))
                    .clone();
                Ok(VersionSelection::Selected(choice))
            }
            Some(Step::SelectCustomPrerelease) => {
                Ok(VersionSelection::Selected(VersionChoice::CustomPrerelease))
            }
            Some(Step::SelectCustomVersion) => {
                Ok(VersionSelection::Selected(VersionChoice::CustomVersion))
            }
            Some(Step::Cancel) => Ok(VersionSelection::Cancelled),
            Some(Step::Text(_)) | None => panic!("unscripted selection prompt: {message}"),
        }
    }

    fn input_text(&self, message: &str, contract: &TextContract<'_>) -> Result<TextInput> {
        loop {
            match self.pop() {
                Some(Step::Text(raw)) => {
                    *self.text_attempts.lock().expect("lock poisoned") += 1;
                    let filtered = (contract.filter)(&raw);
                    if (contract.validate)(&filtered).is_ok() {
                        return Ok(TextInput::Provided(filtered));
                    }
                    // Rejected input: a real provider would re-prompt, so
                    // consume the next scripted answer.
                }
                Some(Step::Cancel) => return Ok(TextInput::Cancelled),
                Some(_) | None => panic!("unscripted text prompt: {message}"),
            }
        }
    }
}
