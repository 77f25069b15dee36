//! Frame loop tying the pad link, keyboard, simulation and renderer together

use std::future::Future;
use std::io;
use std::time::Instant;

use crossterm::event::{
    Event, EventStream, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};
use futures::{Stream, StreamExt};
use ratatui::backend::Backend;
use ratatui::{Frame, Terminal};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::game::{ControlVector, GameEvent, GameSession};
use crate::link::{SerialLineReader, Transport};
use crate::ui::{self, KeyAction, KeyboardState, LinkView};
use crate::util::time::{frame_delta, frame_duration};

/// Whether the loop keeps going after an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The running game
pub struct App<T> {
    session: GameSession,
    reader: SerialLineReader<T>,
    keyboard: KeyboardState,
    frame_rate: u32,
}

impl<T: Transport> App<T> {
    pub fn new(
        session: GameSession,
        reader: SerialLineReader<T>,
        keyboard: KeyboardState,
        frame_rate: u32,
    ) -> Self {
        Self {
            session,
            reader,
            keyboard,
            frame_rate,
        }
    }

    /// Run until quit, shutdown or the end of the event stream
    pub async fn run<B, E, S>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut events: E,
        shutdown: S,
    ) -> anyhow::Result<()>
    where
        B: Backend,
        E: Stream<Item = io::Result<Event>> + Unpin,
        S: Future<Output = ()>,
    {
        info!(
            frame_rate = self.frame_rate,
            port = self.reader.port(),
            link = ?self.reader.status(),
            "Game loop started"
        );

        let mut ticker = interval(frame_duration(self.frame_rate));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                event = events.next() => match event {
                    Some(Ok(Event::Key(key))) => {
                        if self.handle_key(&key, Instant::now()) == Flow::Quit {
                            info!(score = self.session.score(), "Quit requested");
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err.into()),
                    None => {
                        warn!("Terminal event stream closed");
                        break;
                    }
                },
                _ = ticker.tick() => {
                    self.step(Instant::now());
                    terminal.draw(|frame| self.render(frame))?;
                }
            }
        }

        Ok(())
    }

    /// Apply a key event
    pub fn handle_key(&mut self, key: &crossterm::event::KeyEvent, now: Instant) -> Flow {
        match self.keyboard.handle(key, now) {
            Some(KeyAction::Quit) => Flow::Quit,
            Some(KeyAction::Restart) if self.session.is_over() => {
                self.session.restart();
                self.keyboard.clear();
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    /// One frame: read the pad, then advance the simulation
    pub fn step(&mut self, now: Instant) -> Vec<GameEvent> {
        self.reader.poll();

        if self.session.is_over() {
            // Presses made on the game-over screen don't carry into the next run
            self.reader.consume_shot();
            return Vec::new();
        }

        let controls = ControlVector::merge(self.keyboard.controls(now), &mut self.reader);
        let events = self.session.tick(controls, frame_delta(self.frame_rate));
        if self.session.is_over() {
            debug!(elapsed = self.session.elapsed(), "Run ended this frame");
        }
        events
    }

    pub fn render(&self, frame: &mut Frame) {
        ui::draw(
            frame,
            &self.session,
            LinkView {
                status: self.reader.status(),
                port: self.reader.port(),
            },
        );
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn reader(&self) -> &SerialLineReader<T> {
        &self.reader
    }
}

/// Take over the terminal, run the game, and hand the terminal back
pub async fn run_in_terminal<T, S>(app: &mut App<T>, shutdown: S) -> anyhow::Result<()>
where
    T: Transport,
    S: Future<Output = ()>,
{
    let mut terminal = ratatui::try_init()?;

    let enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true));
    if enhanced {
        execute!(
            io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    app.keyboard = KeyboardState::new(enhanced);
    debug!(enhanced, "Keyboard release reporting");

    let result = app.run(&mut terminal, EventStream::new(), shutdown).await;

    if enhanced {
        if let Err(err) = execute!(io::stdout(), PopKeyboardEnhancementFlags) {
            warn!(error = %err, "Failed to restore keyboard flags");
        }
    }
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tuning::Tuning;
    use crate::link::TransportError;
    use bytes::BytesMut;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::time::Duration;

    /// Hands out queued chunks, one per read; clones share the queue
    #[derive(Default, Clone)]
    struct Feed(Rc<RefCell<VecDeque<&'static [u8]>>>);

    impl Feed {
        fn with(chunks: &[&'static [u8]]) -> Self {
            let feed = Feed::default();
            for &chunk in chunks {
                feed.push(chunk);
            }
            feed
        }

        fn push(&self, chunk: &'static [u8]) {
            self.0.borrow_mut().push_back(chunk);
        }
    }

    impl Transport for Feed {
        fn read_available(&mut self, buf: &mut BytesMut) -> Result<usize, TransportError> {
            let Some(chunk) = self.0.borrow_mut().pop_front() else {
                return Ok(0);
            };
            buf.extend_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    fn quiet_app(feed: Feed) -> App<Feed> {
        let tuning = Tuning {
            spawn_interval_ms: 1.0e9,
            min_spawn_interval_ms: 1.0e9,
            ..Tuning::default()
        };
        App::new(
            GameSession::with_tuning(5, tuning),
            SerialLineReader::new("test", feed),
            KeyboardState::new(true),
            60,
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn pad_input_drives_the_player() {
        let mut app = quiet_app(Feed::with(&[b"B DOWN\nC DOWN\n", b"B UP\n"]));
        let start = app.session().player().rect.x;
        let now = Instant::now();

        let events = app.step(now);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Shot { .. })));
        assert!(app.session().player().rect.x > start);

        let moved = app.session().player().rect.x;
        app.step(now);
        assert_eq!(app.session().player().rect.x, moved);
        assert!(!app.reader().state().shoot_pending());
    }

    #[test]
    fn keyboard_and_pad_combine() {
        let mut app = quiet_app(Feed::with(&[b"A DOWN\n"]));
        let now = Instant::now();
        app.handle_key(&press(KeyCode::Right), now);
        let start = app.session().player().rect.x;

        app.step(now);
        assert_eq!(app.session().player().rect.x, start);
    }

    #[test]
    fn restart_only_after_game_over() {
        let mut app = quiet_app(Feed::default());
        let now = Instant::now();
        for _ in 0..30 {
            app.step(now);
        }
        let elapsed = app.session().elapsed();

        assert_eq!(app.handle_key(&press(KeyCode::Char('r')), now), Flow::Continue);
        assert_eq!(app.session().elapsed(), elapsed);

        assert_eq!(app.handle_key(&press(KeyCode::Char('q')), now), Flow::Quit);
    }

    #[test]
    fn game_over_discards_pad_shots() {
        let feed = Feed::default();
        let mut app = App::new(
            GameSession::new(11),
            SerialLineReader::new("test", feed.clone()),
            KeyboardState::new(true),
            60,
        );
        let now = Instant::now();
        for _ in 0..100_000 {
            if app.session().is_over() {
                break;
            }
            app.step(now);
        }
        assert!(app.session().is_over());

        feed.push(b"C DOWN\n");
        assert!(app.step(now).is_empty());
        assert!(!app.reader().state().shoot_pending());

        app.handle_key(&press(KeyCode::Char('r')), now);
        assert!(!app.session().is_over());
        assert_eq!(app.session().score(), 0);
    }

    #[tokio::test]
    async fn run_stops_on_quit_key() {
        let mut app = quiet_app(Feed::default());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let events = futures::stream::iter(vec![Ok(Event::Key(press(KeyCode::Char('q'))))])
            .chain(futures::stream::pending());

        tokio::time::timeout(
            Duration::from_secs(5),
            app.run(&mut terminal, Box::pin(events), std::future::pending()),
        )
        .await
        .unwrap()
        .unwrap();
    }

    #[tokio::test]
    async fn run_ticks_until_shutdown() {
        let mut app = quiet_app(Feed::default());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let events = futures::stream::pending::<io::Result<Event>>();

        app.run(
            &mut terminal,
            events,
            tokio::time::sleep(Duration::from_millis(120)),
        )
        .await
        .unwrap();

        assert!(app.session().elapsed() > 0.0);
        let screen: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("connected (test)"));
    }

    #[test]
    fn held_key_latch_respects_mode() {
        let mut app = quiet_app(Feed::default());
        app.keyboard = KeyboardState::new(false);
        let now = Instant::now();
        app.handle_key(&press(KeyCode::Left), now);

        let start = app.session().player().rect.x;
        app.step(now + Duration::from_millis(500));
        assert_eq!(app.session().player().rect.x, start);
    }
}
