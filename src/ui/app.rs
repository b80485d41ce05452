//! Interactive scene player state and event loop

use super::View;
use crate::errors::SceneError;
use crate::scene::layout::PanelId;
use crate::scene::Scene;
use crate::timeline::player::Player;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Frame, Terminal};
use std::io;
use std::time::{Duration, Instant};

const MIN_SPEED: f32 = 0.25;
const MAX_SPEED: f32 = 4.0;

/// Shortest pause between beats while playing
const MIN_BEAT: Duration = Duration::from_millis(50);

/// The main application state
pub struct App {
    pub scene: Scene,
    pub player: Player,

    /// Focus and per-panel scroll offsets
    pub view: View,

    /// Redraw and input poll interval
    pub tick: Duration,

    /// Playback speed multiplier
    pub speed: f32,

    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a beat was played in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(scene: Scene, player: Player, tick: Duration) -> Self {
        let now = Instant::now();
        App {
            scene,
            player,
            view: View {
                focused: Some(PanelId::Code),
                ..View::default()
            },
            tick,
            speed: 1.0,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: now,
            last_space_press: now.checked_sub(Duration::from_secs(1)).unwrap_or(now),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= self.current_beat_delay() {
                if self.player.step_forward().is_ok() {
                    self.status_message = "Playing...".to_string();
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Poll with timeout so autoplay keeps running without input
            if event::poll(self.tick)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Time the beat leaving the current position takes at the current speed
    fn current_beat_delay(&self) -> Duration {
        let beat = self.player.beat_duration(self.player.history_position());
        beat.div_f32(self.speed).max(MIN_BEAT)
    }

    fn render(&mut self, frame: &mut Frame) {
        super::render_frame(
            frame,
            &self.scene,
            &self.player,
            &self.view,
            &self.status_message,
            self.speed,
            self.is_playing,
        );
    }

    fn next_focus(&self) -> Option<PanelId> {
        let current = self.view.focused.map_or(0, |id| id as usize + 1);
        (0..PanelId::COUNT)
            .map(|offset| PanelId::ALL[(current + offset) % PanelId::COUNT])
            .find(|id| self.player.state().is_panel_visible(*id))
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.view.focused = self.next_focus();
            }
            KeyCode::Left => {
                self.is_playing = false;
                let result = self.player.step_backward();
                self.report(result, "Stepped backward", "Cannot step backward");
            }
            KeyCode::Right => {
                self.is_playing = false;
                let result = self.player.step_forward();
                self.report(result, "Stepped forward", "Cannot step forward");
            }
            KeyCode::Up => {
                if let Some(id) = self.view.focused {
                    let offset = &mut self.view.scroll[id as usize];
                    *offset = offset.saturating_sub(1);
                }
            }
            KeyCode::Down => {
                if let Some(id) = self.view.focused {
                    let limit = self.scroll_limit(id);
                    let offset = &mut self.view.scroll[id as usize];
                    *offset = offset.saturating_add(1).min(limit);
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.speed = (self.speed * 2.0).min(MAX_SPEED);
                self.status_message = format!("Speed {:.2}x", self.speed);
            }
            KeyCode::Char('-') => {
                self.speed = (self.speed / 2.0).max(MIN_SPEED);
                self.status_message = format!("Speed {:.2}x", self.speed);
            }
            KeyCode::Char(' ') => {
                // 200ms debounce against key repeat
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    if self.is_playing {
                        self.is_playing = false;
                        self.status_message = "Paused".to_string();
                    } else {
                        // Playing from the last beat starts over
                        let result = if self.player.is_at_end() {
                            self.player.rewind_to_start()
                        } else {
                            Ok(())
                        };
                        self.is_playing = result.is_ok();
                        self.last_play_time = Instant::now();
                        self.report(result, "Playing...", "Cannot play");
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                let result = self.player.jump_to_end();
                self.report(result, "Jumped to end", "Cannot jump");
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                let result = self.player.rewind_to_start();
                self.report(result, "Jumped to start", "Cannot rewind");
            }
            _ => {}
        }
    }

    /// Rows a panel can scroll past
    fn scroll_limit(&self, id: PanelId) -> usize {
        let state = self.player.state();
        match id {
            PanelId::Code => self.scene.config.code_lines.len(),
            PanelId::Registry => state.registry().len(),
            PanelId::Stack => state.stack().len(),
            PanelId::Heap => state.heap().len(),
            _ => 0,
        }
        .saturating_sub(1)
    }

    fn report(&mut self, result: Result<(), SceneError>, done: &str, failed: &str) {
        self.status_message = match result {
            Ok(()) => done.to_string(),
            Err(SceneError::History(message)) => format!("{}: {}", failed, message),
            Err(e) => format!("Error: {}", e),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::config::{SceneConfig, SceneName};
    use crate::scene::constants::SNAPSHOT_LIMIT;
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        let scene = Scene::build(SceneConfig::preset(SceneName::HeapBasics)).unwrap();
        let player = scene.player(SNAPSHOT_LIMIT).unwrap();
        App::new(scene, player, Duration::from_millis(50))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_arrow_keys_move_through_history() {
        let mut app = app();
        press(&mut app, KeyCode::Left);
        assert_eq!(app.player.history_position(), 0);
        assert!(app.status_message.starts_with("Cannot step backward"));

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.player.history_position(), 2);

        press(&mut app, KeyCode::Enter);
        assert!(app.player.is_at_end());
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.player.history_position(), 0);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut app = app();
        for _ in 0..10 {
            press(&mut app, KeyCode::Char('+'));
        }
        assert_eq!(app.speed, MAX_SPEED);
        for _ in 0..10 {
            press(&mut app, KeyCode::Char('-'));
        }
        assert_eq!(app.speed, MIN_SPEED);
    }

    #[test]
    fn test_tab_skips_hidden_panels() {
        let mut app = app();
        // Only the narration panel is visible before the intro beat
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.view.focused, Some(PanelId::Narration));
    }

    #[test]
    fn test_space_at_end_replays_from_start() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert!(app.player.is_at_end());

        press(&mut app, KeyCode::Char(' '));
        assert!(app.is_playing);
        assert_eq!(app.player.history_position(), 0);
        assert_eq!(app.status_message, "Playing...");

        app.last_space_press = Instant::now() - Duration::from_secs(1);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.is_playing);
        assert_eq!(app.status_message, "Paused");
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
