use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

use crate::error::Error;

/// The single key that counts as a reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionKey(KeyCode);

impl ActionKey {
    pub fn code(&self) -> KeyCode {
        self.0
    }

    pub fn matches(&self, code: KeyCode) -> bool {
        match (self.0, code) {
            (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        }
    }
}

impl Default for ActionKey {
    fn default() -> Self {
        Self(KeyCode::Char(' '))
    }
}

impl FromStr for ActionKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        match name.to_ascii_lowercase().as_str() {
            "space" => return Ok(Self(KeyCode::Char(' '))),
            "enter" | "return" => return Ok(Self(KeyCode::Enter)),
            "tab" => return Ok(Self(KeyCode::Tab)),
            _ => {}
        }

        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Ok(Self(KeyCode::Char(c.to_ascii_lowercase()))),
            _ => Err(Error::InvalidKey(s.to_string())),
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            KeyCode::Char(' ') => write!(f, "SPACE"),
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::Enter => write!(f, "ENTER"),
            KeyCode::Tab => write!(f, "TAB"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionSource {
    Key,
    Pointer,
}

/// One discrete "react now" from the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interaction {
    pub source: InteractionSource,
}

/// Turns raw terminal input into interactions.
///
/// Only presses of the action key and pointer presses count. When the
/// terminal reports key releases, a held key yields a single interaction
/// until it is released; otherwise every press event counts and only
/// explicit repeat events are dropped.
#[derive(Debug, Clone)]
pub struct InputFilter {
    action_key: ActionKey,
    pointer: bool,
    tracks_release: bool,
    held: bool,
}

impl InputFilter {
    pub fn new(action_key: ActionKey, pointer: bool, tracks_release: bool) -> Self {
        Self {
            action_key,
            pointer,
            tracks_release,
            held: false,
        }
    }

    pub fn action_key(&self) -> ActionKey {
        self.action_key
    }

    pub fn on_key(&mut self, key: &KeyEvent) -> Option<Interaction> {
        if !self.action_key.matches(key.code)
            || key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return None;
        }

        match key.kind {
            KeyEventKind::Press => {
                if self.held {
                    return None;
                }
                self.held = self.tracks_release;
                Some(Interaction {
                    source: InteractionSource::Key,
                })
            }
            KeyEventKind::Repeat => None,
            KeyEventKind::Release => {
                self.held = false;
                None
            }
        }
    }

    pub fn on_mouse(&mut self, mouse: &MouseEvent) -> Option<Interaction> {
        match mouse.kind {
            MouseEventKind::Down(_) if self.pointer => Some(Interaction {
                source: InteractionSource::Pointer,
            }),
            _ => None,
        }
    }

    /// Forget a held key, e.g. when focus is lost and its release may never arrive
    pub fn reset(&mut self) {
        self.held = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseButton};

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn space(kind: KeyEventKind) -> KeyEvent {
        key(KeyCode::Char(' '), kind)
    }

    #[test]
    fn test_parse_action_keys() {
        assert_eq!("space".parse::<ActionKey>().unwrap().code(), KeyCode::Char(' '));
        assert_eq!("SPACE".parse::<ActionKey>().unwrap().code(), KeyCode::Char(' '));
        assert_eq!("enter".parse::<ActionKey>().unwrap().code(), KeyCode::Enter);
        assert_eq!("return".parse::<ActionKey>().unwrap().code(), KeyCode::Enter);
        assert_eq!("tab".parse::<ActionKey>().unwrap().code(), KeyCode::Tab);
        assert_eq!("X".parse::<ActionKey>().unwrap().code(), KeyCode::Char('x'));
    }

    #[test]
    fn test_parse_invalid_action_keys() {
        assert!(matches!("".parse::<ActionKey>(), Err(Error::InvalidKey(_))));
        assert!(matches!("ctrl".parse::<ActionKey>(), Err(Error::InvalidKey(_))));
        assert!(matches!("\u{7}".parse::<ActionKey>(), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_action_key_display() {
        assert_eq!(ActionKey::default().to_string(), "SPACE");
        assert_eq!("enter".parse::<ActionKey>().unwrap().to_string(), "ENTER");
        assert_eq!("j".parse::<ActionKey>().unwrap().to_string(), "J");
    }

    #[test]
    fn test_char_keys_match_either_case() {
        let k: ActionKey = "j".parse().unwrap();
        assert!(k.matches(KeyCode::Char('j')));
        assert!(k.matches(KeyCode::Char('J')));
        assert!(!k.matches(KeyCode::Char('k')));
    }

    #[test]
    fn test_press_of_action_key_interacts() {
        let mut filter = InputFilter::new(ActionKey::default(), true, false);
        assert_eq!(
            filter.on_key(&space(KeyEventKind::Press)),
            Some(Interaction {
                source: InteractionSource::Key
            })
        );
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut filter = InputFilter::new(ActionKey::default(), true, false);
        assert_eq!(filter.on_key(&key(KeyCode::Char('a'), KeyEventKind::Press)), None);
        assert_eq!(filter.on_key(&key(KeyCode::Enter, KeyEventKind::Press)), None);
    }

    #[test]
    fn test_modified_action_key_ignored() {
        let mut filter = InputFilter::new(ActionKey::default(), true, false);
        let mut ev = space(KeyEventKind::Press);
        ev.modifiers = KeyModifiers::CONTROL;
        assert_eq!(filter.on_key(&ev), None);
    }

    #[test]
    fn test_repeat_events_ignored() {
        let mut filter = InputFilter::new(ActionKey::default(), true, false);
        assert!(filter.on_key(&space(KeyEventKind::Press)).is_some());
        assert_eq!(filter.on_key(&space(KeyEventKind::Repeat)), None);
        assert_eq!(filter.on_key(&space(KeyEventKind::Repeat)), None);
    }

    #[test]
    fn test_held_key_yields_one_interaction_until_release() {
        let mut filter = InputFilter::new(ActionKey::default(), true, true);
        assert!(filter.on_key(&space(KeyEventKind::Press)).is_some());
        // some terminals resend presses while a key is held
        assert_eq!(filter.on_key(&space(KeyEventKind::Press)), None);
        assert_eq!(filter.on_key(&space(KeyEventKind::Repeat)), None);
        assert_eq!(filter.on_key(&space(KeyEventKind::Release)), None);
        assert!(filter.on_key(&space(KeyEventKind::Press)).is_some());
    }

    #[test]
    fn test_reset_clears_held_key() {
        let mut filter = InputFilter::new(ActionKey::default(), true, true);
        assert!(filter.on_key(&space(KeyEventKind::Press)).is_some());
        filter.reset();
        assert!(filter.on_key(&space(KeyEventKind::Press)).is_some());
    }

    #[test]
    fn test_pointer_press_interacts() {
        let mut filter = InputFilter::new(ActionKey::default(), true, false);
        assert_eq!(
            filter.on_mouse(&mouse(MouseEventKind::Down(MouseButton::Left))),
            Some(Interaction {
                source: InteractionSource::Pointer
            })
        );
        assert_eq!(filter.on_mouse(&mouse(MouseEventKind::Up(MouseButton::Left))), None);
        assert_eq!(filter.on_mouse(&mouse(MouseEventKind::Moved)), None);
    }

    #[test]
    fn test_pointer_disabled() {
        let mut filter = InputFilter::new(ActionKey::default(), false, false);
        assert_eq!(
            filter.on_mouse(&mouse(MouseEventKind::Down(MouseButton::Left))),
            None
        );
    }
}
