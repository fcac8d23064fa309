//! The seam to whatever runs scripts and presents text and sound

use super::action::ActionScript;

/// Receives scripts, text boxes and sounds from overworld entities
pub trait ScriptHost {
    /// Hand a script to the interpreter
    fn start_script(&mut self, script: &ActionScript);

    /// Open a text box. `~` is a line break and `%a|b%` a choice prompt.
    fn show_text(&mut self, text: &str);

    fn play_sound(&mut self, sound: &str);
}

/// One recorded host call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Script(String),
    Text(String),
    Sound(String),
}

/// Host that records every call and logs it (used by the CLI and tests)
#[derive(Debug, Default)]
pub struct ScriptLog {
    calls: Vec<HostCall>,
}

impl ScriptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Rendered scripts, oldest first
    pub fn scripts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Script(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The last rendered script
    pub fn last_script(&self) -> Option<&str> {
        self.scripts().pop()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Text(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn sounds(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Sound(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl ScriptHost for ScriptLog {
    fn start_script(&mut self, script: &ActionScript) {
        let rendered = script.to_string();
        log::debug!("Script started:\n{}", rendered);
        self.calls.push(HostCall::Script(rendered));
    }

    fn show_text(&mut self, text: &str) {
        log::debug!("Text: {}", text);
        self.calls.push(HostCall::Text(text.to_string()));
    }

    fn play_sound(&mut self, sound: &str) {
        log::debug!("Sound: {}", sound);
        self.calls.push(HostCall::Sound(sound.to_string()));
    }
}
