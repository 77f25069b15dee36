//! Per-button debounce and heartbeat state machine

use crate::link::protocol::{ButtonState, Channel, InputEvent};
use crate::util::time::Millis;

/// Raw level must hold this long before it is trusted
pub const DEBOUNCE_MS: u32 = 25;

/// Cadence of HELD announcements while a button stays pressed
pub const HELD_INTERVAL_MS: u32 = 200;

/// One physical button.
///
/// Levels are expressed as "pressed" rather than electrical high/low; the
/// controller does the active-low translation.
#[derive(Debug, Clone)]
pub struct ButtonChannel {
    channel: Channel,
    last_raw: bool,
    last_change: Millis,
    stable: bool,
    pressed_at: Option<Millis>,
    last_held: Option<Millis>,
}

impl ButtonChannel {
    /// Start tracking with the level sampled at boot taken as stable
    pub fn new(channel: Channel, pressed: bool, now: Millis) -> Self {
        Self {
            channel,
            last_raw: pressed,
            last_change: now,
            stable: pressed,
            pressed_at: None,
            last_held: None,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Debounced level
    pub fn is_pressed(&self) -> bool {
        self.stable
    }

    /// How long the current press has lasted, if one is being tracked
    #[cfg(test)]
    pub fn press_duration(&self, now: Millis) -> Option<u32> {
        self.pressed_at.map(|start| now.since(start))
    }

    /// Feed one raw sample. Returns the event to announce, if any.
    pub fn update(&mut self, pressed: bool, now: Millis) -> Option<InputEvent> {
        if pressed != self.last_raw {
            self.last_raw = pressed;
            self.last_change = now;
        }

        let mut state = None;

        if now.since(self.last_change) >= DEBOUNCE_MS && pressed != self.stable {
            self.stable = pressed;
            if pressed {
                self.pressed_at = Some(now);
                self.last_held = Some(now);
                state = Some(ButtonState::Down);
            } else {
                self.pressed_at = None;
                self.last_held = None;
                state = Some(ButtonState::Up);
            }
        }

        if self.stable && self.pressed_at.is_some() {
            if let Some(last) = self.last_held {
                if now.since(last) >= HELD_INTERVAL_MS {
                    self.last_held = Some(now);
                    state = Some(ButtonState::Held);
                }
            }
        }

        state.map(|state| InputEvent::new(self.channel, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: u32 = 10;

    /// Feed `samples` at 10 ms spacing starting at `start`, collecting
    /// (time, state) for every event.
    fn run(
        button: &mut ButtonChannel,
        start: u32,
        samples: &[bool],
    ) -> Vec<(u32, ButtonState)> {
        samples
            .iter()
            .enumerate()
            .filter_map(|(i, &pressed)| {
                let now = start + i as u32 * TICK;
                button.update(pressed, Millis(now)).map(|e| (now, e.state))
            })
            .collect()
    }

    fn released(channel: Channel) -> ButtonChannel {
        ButtonChannel::new(channel, false, Millis(0))
    }

    #[test]
    fn press_commits_after_quiet_window() {
        let mut button = released(Channel::A);
        // Pressed from t=100; t=100,110,120 are inside the window, t=130 is 30ms in
        let events = run(&mut button, 100, &[true, true, true, true, true]);
        assert_eq!(events, vec![(130, ButtonState::Down)]);
        assert!(button.is_pressed());
    }

    #[test]
    fn exact_window_boundary_commits() {
        let mut button = released(Channel::A);
        assert_eq!(button.update(true, Millis(1000)), None);
        assert_eq!(button.update(true, Millis(1024)), None);
        assert_eq!(
            button.update(true, Millis(1025)),
            Some(InputEvent::new(Channel::A, ButtonState::Down))
        );
    }

    #[test]
    fn bouncing_inside_window_emits_nothing() {
        let mut button = released(Channel::B);
        let bounce = [true, false, true, false, true, false, true, false];
        assert!(run(&mut button, 100, &bounce).is_empty());
        assert!(!button.is_pressed());
    }

    #[test]
    fn bounce_restarts_window() {
        let mut button = released(Channel::B);
        // Two quiet samples, a glitch, then steady
        let samples = [true, true, false, true, true, true, true];
        let events = run(&mut button, 0, &samples);
        // Last raw change at t=30, so commit at t=60 rather than t=30
        assert_eq!(events, vec![(60, ButtonState::Down)]);
    }

    #[test]
    fn release_emits_up_and_stops_heartbeat() {
        let mut button = released(Channel::C);
        let mut samples = vec![true; 10];
        samples.extend([false; 40]);
        let events = run(&mut button, 0, &samples);
        assert_eq!(events, vec![(30, ButtonState::Down), (130, ButtonState::Up)]);
        assert_eq!(button.press_duration(Millis(500)), None);
    }

    #[test]
    fn held_heartbeat_spacing() {
        let mut button = released(Channel::A);
        let events = run(&mut button, 0, &[true; 100]);

        let down_at = events[0];
        assert_eq!(down_at, (30, ButtonState::Down));

        let held: Vec<u32> = events[1..]
            .iter()
            .map(|&(t, state)| {
                assert_eq!(state, ButtonState::Held);
                t
            })
            .collect();
        assert_eq!(held, vec![230, 430, 630, 830]);

        let mut previous = down_at.0;
        for t in held {
            assert!(t - previous >= HELD_INTERVAL_MS);
            previous = t;
        }
        assert_eq!(button.press_duration(Millis(990)), Some(960));
    }

    #[test]
    fn at_most_one_transition_per_stable_change() {
        let mut button = released(Channel::A);
        let samples: Vec<bool> = (0..200).map(|i| (i / 20) % 2 == 0).collect();
        let events = run(&mut button, 0, &samples);
        let transitions: Vec<ButtonState> = events
            .iter()
            .map(|&(_, s)| s)
            .filter(|s| *s != ButtonState::Held)
            .collect();
        // Ten runs of 200ms, alternating, starting pressed
        assert_eq!(transitions.len(), 10);
        for pair in transitions.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn boot_level_is_stable_without_event() {
        // Held at boot: no DOWN, no HELD, but a release is still reported
        let mut button = ButtonChannel::new(Channel::A, true, Millis(0));
        assert!(run(&mut button, 0, &[true; 50]).is_empty());
        let events = run(&mut button, 500, &[false; 5]);
        assert_eq!(events, vec![(530, ButtonState::Up)]);
    }

    #[test]
    fn survives_tick_counter_rollover() {
        let start = u32::MAX - 15;
        let mut button = ButtonChannel::new(Channel::B, false, Millis(start));
        assert_eq!(button.update(true, Millis(start)), None);
        assert_eq!(button.update(true, Millis(start).add(20)), None);
        assert_eq!(
            button.update(true, Millis(start).add(30)).map(|e| e.state),
            Some(ButtonState::Down)
        );
        assert_eq!(
            button.update(true, Millis(start).add(230)).map(|e| e.state),
            Some(ButtonState::Held)
        );
    }
}
