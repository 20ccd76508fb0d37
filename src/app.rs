use color_eyre::Result;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::time::Instant;
use tracing::info;

use crate::audio::AudioManager;
use crate::config;
use crate::input::InputManager;
use crate::renderer::{GameRenderer, RenderView};
use crate::scores::ScoreStore;
use crate::session::{Flow, Session};

/// The main application: owns the session and the I/O collaborators
/// around it and runs the frame loop.
pub struct App {
    session: Session,
    store: Box<dyn ScoreStore>,
    input_manager: InputManager,
    renderer: GameRenderer,
    audio_manager: AudioManager,
    started: Instant,
}

impl App {
    pub fn new(store: Box<dyn ScoreStore>, input_manager: InputManager) -> Self {
        Self {
            session: Session::new(0),
            store,
            input_manager,
            renderer: GameRenderer::new(),
            audio_manager: AudioManager::new(&config::assets_dir()),
            started: Instant::now(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        let frame_interval = config::frame_interval();
        let mut rng = rand::rng();
        info!(fps = config::frame_rate(), "frame loop started");

        loop {
            let frame_start = Instant::now();
            let now = self.started.elapsed().as_millis() as u64;

            let input = self.input_manager.poll(now)?;
            if self.session.update(now, &input, self.store.as_mut(), &mut rng) == Flow::Quit {
                break;
            }
            self.audio_manager.play_cues(&self.session.drain_cues());

            terminal.draw(|frame| {
                let view = RenderView {
                    session: &self.session,
                    now,
                    area: frame.area(),
                };
                self.renderer.render(frame, &view);
            })?;

            // Hold the frame rate
            if let Some(rest) = frame_interval.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }

        info!(score = self.session.score(), "frame loop stopped");
        Ok(())
    }
}
