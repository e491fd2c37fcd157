//! Input injection: the injector seam, a logging no-op driver, a confirmation
//! decorator and the `enigo`-backed driver.

use crate::candidate::Point;
use crate::trace::trace_debug;
use crate::util::{ScreenSearchError, ScreenSearchResult};

/// Performs mouse and keyboard input against the live screen.
pub trait InputInjector {
    /// Left-clicks at a screen coordinate.
    fn click(&mut self, at: Point) -> ScreenSearchResult<()>;

    /// Presses and releases one named key (`"delete"`, `"enter"`, ...).
    fn press_key(&mut self, key: &str) -> ScreenSearchResult<()>;

    /// Presses the keys in order, then releases them in reverse.
    fn hotkey(&mut self, keys: &[String]) -> ScreenSearchResult<()>;

    /// Types text verbatim.
    fn type_text(&mut self, text: &str) -> ScreenSearchResult<()>;
}

impl<I: InputInjector + ?Sized> InputInjector for Box<I> {
    fn click(&mut self, at: Point) -> ScreenSearchResult<()> {
        (**self).click(at)
    }

    fn press_key(&mut self, key: &str) -> ScreenSearchResult<()> {
        (**self).press_key(key)
    }

    fn hotkey(&mut self, keys: &[String]) -> ScreenSearchResult<()> {
        (**self).hotkey(keys)
    }

    fn type_text(&mut self, text: &str) -> ScreenSearchResult<()> {
        (**self).type_text(text)
    }
}

/// One injected action, as seen by a [`ConfirmPolicy`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputAction {
    Click(Point),
    Key(String),
    Hotkey(Vec<String>),
    Text(String),
}

/// Logs every action and performs nothing.
#[derive(Debug, Default)]
pub struct NoOpInjector;

impl InputInjector for NoOpInjector {
    fn click(&mut self, at: Point) -> ScreenSearchResult<()> {
        trace_debug!("noop_click", x = at.x, y = at.y);
        Ok(())
    }

    fn press_key(&mut self, key: &str) -> ScreenSearchResult<()> {
        trace_debug!("noop_key", key = key);
        Ok(())
    }

    fn hotkey(&mut self, keys: &[String]) -> ScreenSearchResult<()> {
        trace_debug!("noop_hotkey", keys = keys.join("+").as_str());
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> ScreenSearchResult<()> {
        trace_debug!("noop_type", len = text.chars().count());
        Ok(())
    }
}

/// Decides whether an action may be injected.
pub trait ConfirmPolicy {
    fn approve(&mut self, action: &InputAction) -> bool;
}

impl<F> ConfirmPolicy for F
where
    F: FnMut(&InputAction) -> bool,
{
    fn approve(&mut self, action: &InputAction) -> bool {
        self(action)
    }
}

/// Wraps any injector and asks a policy before each action.
///
/// A refused action fails with [`ScreenSearchError::InjectionFailure`], which a
/// search session degrades to an error outcome like any other failure.
pub struct ConfirmingInjector<I, P> {
    inner: I,
    policy: P,
}

impl<I: InputInjector, P: ConfirmPolicy> ConfirmingInjector<I, P> {
    pub fn new(inner: I, policy: P) -> Self {
        Self { inner, policy }
    }

    /// Returns the wrapped injector.
    pub fn into_inner(self) -> I {
        self.inner
    }

    fn check(&mut self, action: InputAction) -> ScreenSearchResult<()> {
        if self.policy.approve(&action) {
            Ok(())
        } else {
            Err(ScreenSearchError::InjectionFailure {
                reason: format!("action refused: {action:?}"),
            })
        }
    }
}

impl<I: InputInjector, P: ConfirmPolicy> InputInjector for ConfirmingInjector<I, P> {
    fn click(&mut self, at: Point) -> ScreenSearchResult<()> {
        self.check(InputAction::Click(at))?;
        self.inner.click(at)
    }

    fn press_key(&mut self, key: &str) -> ScreenSearchResult<()> {
        self.check(InputAction::Key(key.to_owned()))?;
        self.inner.press_key(key)
    }

    fn hotkey(&mut self, keys: &[String]) -> ScreenSearchResult<()> {
        self.check(InputAction::Hotkey(keys.to_vec()))?;
        self.inner.hotkey(keys)
    }

    fn type_text(&mut self, text: &str) -> ScreenSearchResult<()> {
        self.check(InputAction::Text(text.to_owned()))?;
        self.inner.type_text(text)
    }
}

/// Presses `keys` in order and releases them in reverse.
///
/// A failed press releases the keys already held before returning, so a
/// modifier is never left down for the rest of a batch.
#[cfg_attr(not(feature = "input-enigo"), allow(dead_code))]
pub(crate) fn press_chord<K: Copy>(
    keys: &[K],
    mut send: impl FnMut(K, bool) -> ScreenSearchResult<()>,
) -> ScreenSearchResult<()> {
    for (idx, &key) in keys.iter().enumerate() {
        if let Err(err) = send(key, true) {
            for &held in keys[..idx].iter().rev() {
                let _ = send(held, false);
            }
            return Err(err);
        }
    }
    let mut first_err = None;
    for &key in keys.iter().rev() {
        if let Err(err) = send(key, false) {
            first_err.get_or_insert(err);
        }
    }
    first_err.map_or(Ok(()), Err)
}

/// Real mouse/keyboard input via `enigo`.
///
/// macOS needs the Accessibility permission; Linux needs X11 or uinput access.
#[cfg(feature = "input-enigo")]
pub struct EnigoInjector {
    enigo: enigo::Enigo,
}

#[cfg(feature = "input-enigo")]
impl EnigoInjector {
    pub fn new() -> ScreenSearchResult<Self> {
        let enigo = enigo::Enigo::new(&enigo::Settings::default()).map_err(|e| {
            ScreenSearchError::InjectionFailure {
                reason: format!("input driver init failed: {e}"),
            }
        })?;
        Ok(Self { enigo })
    }

    fn parse_key(key: &str) -> ScreenSearchResult<enigo::Key> {
        use enigo::Key;
        let parsed = match key.to_lowercase().as_str() {
            "enter" | "return" => Key::Return,
            "tab" => Key::Tab,
            "escape" | "esc" => Key::Escape,
            "backspace" => Key::Backspace,
            "delete" | "del" => Key::Delete,
            "space" => Key::Space,
            "home" => Key::Home,
            "end" => Key::End,
            "ctrl" | "control" => Key::Control,
            "shift" => Key::Shift,
            "alt" | "option" => Key::Alt,
            "meta" | "command" | "cmd" | "super" | "win" => Key::Meta,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Key::Unicode(ch),
                    _ => {
                        return Err(ScreenSearchError::InjectionFailure {
                            reason: format!("unknown key '{key}'"),
                        })
                    }
                }
            }
        };
        Ok(parsed)
    }

    fn key(&mut self, key: enigo::Key, direction: enigo::Direction) -> ScreenSearchResult<()> {
        use enigo::Keyboard;
        self.enigo
            .key(key, direction)
            .map_err(|e| ScreenSearchError::InjectionFailure {
                reason: format!("key {direction:?} failed: {e}"),
            })
    }
}

#[cfg(feature = "input-enigo")]
impl InputInjector for EnigoInjector {
    fn click(&mut self, at: Point) -> ScreenSearchResult<()> {
        use enigo::Mouse;
        trace_debug!("enigo_click", x = at.x, y = at.y);
        self.enigo
            .move_mouse(at.x, at.y, enigo::Coordinate::Abs)
            .map_err(|e| ScreenSearchError::InjectionFailure {
                reason: format!("mouse move failed: {e}"),
            })?;
        self.enigo
            .button(enigo::Button::Left, enigo::Direction::Click)
            .map_err(|e| ScreenSearchError::InjectionFailure {
                reason: format!("mouse click failed: {e}"),
            })
    }

    fn press_key(&mut self, key: &str) -> ScreenSearchResult<()> {
        trace_debug!("enigo_key", key = key);
        let key = Self::parse_key(key)?;
        self.key(key, enigo::Direction::Click)
    }

    fn hotkey(&mut self, keys: &[String]) -> ScreenSearchResult<()> {
        trace_debug!("enigo_hotkey", keys = keys.join("+").as_str());
        let parsed = keys
            .iter()
            .map(|k| Self::parse_key(k))
            .collect::<ScreenSearchResult<Vec<_>>>()?;
        press_chord(&parsed, |key, down| {
            let direction = if down {
                enigo::Direction::Press
            } else {
                enigo::Direction::Release
            };
            self.key(key, direction)
        })
    }

    fn type_text(&mut self, text: &str) -> ScreenSearchResult<()> {
        use enigo::Keyboard;
        trace_debug!("enigo_type", len = text.chars().count());
        self.enigo
            .text(text)
            .map_err(|e| ScreenSearchError::InjectionFailure {
                reason: format!("text input failed: {e}"),
            })
    }
}
