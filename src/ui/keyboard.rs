//! Keyboard controls from crossterm key events

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::ControlVector;

/// How long a key counts as held after its last press or repeat when the
/// terminal never reports releases. Covers the gap before auto-repeat starts.
pub const LATCH_WINDOW: Duration = Duration::from_millis(150);

/// Non-movement key actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Restart,
}

/// Held state of one key
#[derive(Debug, Clone, Copy, Default)]
struct KeyLatch {
    down: bool,
    last_press: Option<Instant>,
}

impl KeyLatch {
    fn press(&mut self, now: Instant) {
        self.down = true;
        self.last_press = Some(now);
    }

    fn release(&mut self) {
        self.down = false;
        self.last_press = None;
    }

    fn is_held(&self, exact: bool, now: Instant) -> bool {
        if exact {
            return self.down;
        }
        self.last_press
            .is_some_and(|at| now.saturating_duration_since(at) < LATCH_WINDOW)
    }
}

/// Tracks movement and fire keys.
///
/// Starts in latch mode unless the terminal is known to report releases;
/// the first release event switches to exact press/release tracking.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    exact: bool,
    left: KeyLatch,
    right: KeyLatch,
    fire: KeyLatch,
}

impl KeyboardState {
    pub fn new(reports_release: bool) -> Self {
        Self {
            exact: reports_release,
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn is_exact(&self) -> bool {
        self.exact
    }

    /// Fold a key event; returns an action for quit/restart keys
    pub fn handle(&mut self, event: &KeyEvent, now: Instant) -> Option<KeyAction> {
        let is_press = matches!(event.kind, KeyEventKind::Press | KeyEventKind::Repeat);
        let is_release = event.kind == KeyEventKind::Release;
        if is_release {
            self.exact = true;
        }

        let latch = match event.code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(&mut self.left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(&mut self.right),
            KeyCode::Char(' ') => Some(&mut self.fire),
            _ => None,
        };
        if let Some(latch) = latch {
            if is_press {
                latch.press(now);
            } else if is_release {
                latch.release();
            }
            return None;
        }

        if event.kind != KeyEventKind::Press {
            return None;
        }

        match event.code {
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(KeyAction::Quit)
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(KeyAction::Quit),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(KeyAction::Restart),
            _ => None,
        }
    }

    /// Keyboard control flags at `now`
    pub fn controls(&self, now: Instant) -> ControlVector {
        ControlVector {
            left: self.left.is_held(self.exact, now),
            right: self.right.is_held(self.exact, now),
            fire: self.fire.is_held(self.exact, now),
        }
    }

    /// Forget every held key, e.g. after a restart
    pub fn clear(&mut self) {
        self.left.release();
        self.right.release();
        self.fire.release();
    }
}
