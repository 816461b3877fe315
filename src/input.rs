//! Key event to intent mapping
//!
//! A pure lookup from key codes to the engine's closed intent set. The
//! engine itself has no auto-repeat logic; terminal key repeat delivers
//! repeated intents as independent events, which is exactly what it expects.

use crate::game::Intent;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press means to the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Forward to the engine as this tick's intent
    Play(Intent),
    /// Leave the application (a driver concern, not an engine intent)
    Quit,
}

/// Key bindings resolved from settings strings
#[derive(Debug, Clone)]
pub struct InputMap {
    move_left: Vec<KeyCode>,
    move_right: Vec<KeyCode>,
    soft_drop: Vec<KeyCode>,
    rotate: Vec<KeyCode>,
    hard_drop: Vec<KeyCode>,
    quit: Vec<KeyCode>,
}

impl InputMap {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: parse_keys(&settings.keys.move_left),
            move_right: parse_keys(&settings.keys.move_right),
            soft_drop: parse_keys(&settings.keys.soft_drop),
            rotate: parse_keys(&settings.keys.rotate),
            hard_drop: parse_keys(&settings.keys.hard_drop),
            quit: parse_keys(&settings.keys.quit),
        }
    }

    /// Map one key press; unbound keys map to nothing
    pub fn map_key(&self, key: &KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let code = normalize_key(key.code);
        if self.move_left.contains(&code) {
            Some(Command::Play(Intent::Left))
        } else if self.move_right.contains(&code) {
            Some(Command::Play(Intent::Right))
        } else if self.soft_drop.contains(&code) {
            Some(Command::Play(Intent::Down))
        } else if self.rotate.contains(&code) {
            Some(Command::Play(Intent::Rotate))
        } else if self.hard_drop.contains(&code) {
            Some(Command::Play(Intent::HardDrop))
        } else if self.quit.contains(&code) {
            Some(Command::Quit)
        } else {
            None
        }
    }
}

impl Default for InputMap {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Parse a key string from settings into a KeyCode
fn parse_key(s: &str) -> KeyCode {
    match s.to_lowercase().as_str() {
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "space" => KeyCode::Char(' '),
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "esc" | "escape" => KeyCode::Esc,
        s if s.chars().count() == 1 => KeyCode::Char(s.chars().next().unwrap()),
        _ => KeyCode::Null,
    }
}

fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
    keys.iter().map(|s| parse_key(s)).collect()
}

/// Normalize key codes so bindings are case-insensitive
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings() {
        let map = InputMap::default();
        assert_eq!(map.map_key(&press(KeyCode::Left)), Some(Command::Play(Intent::Left)));
        assert_eq!(map.map_key(&press(KeyCode::Right)), Some(Command::Play(Intent::Right)));
        assert_eq!(map.map_key(&press(KeyCode::Down)), Some(Command::Play(Intent::Down)));
        assert_eq!(map.map_key(&press(KeyCode::Up)), Some(Command::Play(Intent::Rotate)));
        assert_eq!(
            map.map_key(&press(KeyCode::Char(' '))),
            Some(Command::Play(Intent::HardDrop))
        );
        assert_eq!(map.map_key(&press(KeyCode::Char('q'))), Some(Command::Quit));
    }

    #[test]
    fn test_unbound_key_maps_to_nothing() {
        let map = InputMap::default();
        assert_eq!(map.map_key(&press(KeyCode::Char('w'))), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let map = InputMap::default();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map.map_key(&key), Some(Command::Quit));
    }

    #[test]
    fn test_bindings_are_case_insensitive() {
        let map = InputMap::default();
        assert_eq!(map.map_key(&press(KeyCode::Char('Q'))), Some(Command::Quit));
    }

    #[test]
    fn test_parse_key_strings() {
        assert_eq!(parse_key("Space"), KeyCode::Char(' '));
        assert_eq!(parse_key("escape"), KeyCode::Esc);
        assert_eq!(parse_key("x"), KeyCode::Char('x'));
        assert_eq!(parse_key("not-a-key"), KeyCode::Null);
    }
}
