//! Headless rendering
//!
//! Draws every snapshot of a played scene into an in-memory ratatui
//! [`TestBackend`] and writes the result as plain text frames plus a JSON
//! manifest:
//!
//! ```text
//! out/
//!   frame_0000.txt
//!   frame_0001.txt
//!   ...
//!   manifest.json
//! ```

use crate::errors::Result;
use crate::scene::Scene;
use crate::timeline::player::Player;
use crate::ui::{render_frame, View};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Output size and redraw rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

impl Quality {
    /// Headless frame size in terminal cells
    pub fn frame_size(self) -> (u16, u16) {
        match self {
            Quality::Low => (100, 30),
            Quality::Medium => (140, 40),
            Quality::High => (200, 56),
        }
    }

    /// TUI redraw tick
    pub fn tick(self) -> Duration {
        match self {
            Quality::Low => Duration::from_millis(100),
            Quality::Medium => Duration::from_millis(50),
            Quality::High => Duration::from_millis(16),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Low => write!(f, "low"),
            Quality::Medium => write!(f, "medium"),
            Quality::High => write!(f, "high"),
        }
    }
}

/// One manifest entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub index: usize,
    pub file: String,
    /// Beat that produced the frame; `None` for the opening frame
    pub beat: Option<usize>,
    pub phase: String,
    pub caption: String,
    pub elapsed_ms: u64,
    /// How long the frame stays on screen before the next beat
    pub duration_ms: u64,
}

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    scene: &'a str,
    quality: String,
    width: u16,
    height: u16,
    total_duration_ms: u64,
    frames: &'a [FrameRecord],
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Plain text of a rendered buffer, one line per row, trailing spaces trimmed
pub fn buffer_to_text(buffer: &Buffer) -> String {
    let width = buffer.area.width.max(1) as usize;
    let mut text = String::new();
    for row in buffer.content().chunks(width) {
        let line: String = row.iter().map(|cell| cell.symbol()).collect();
        text.push_str(line.trim_end());
        text.push('\n');
    }
    text
}

/// Render the frame for every snapshot, in order, without touching the disk
pub fn render_to_strings(
    scene: &Scene,
    player: &mut Player,
    quality: Quality,
) -> Result<Vec<String>> {
    let (width, height) = quality.frame_size();
    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    let view = View::default();

    player.rewind_to_start()?;
    let mut frames = Vec::with_capacity(player.total_snapshots());
    loop {
        let current: &Player = player;
        terminal.draw(|f| render_frame(f, scene, current, &view, &scene.config.title, 1.0, false))?;
        frames.push(buffer_to_text(terminal.backend().buffer()));
        if player.is_at_end() {
            break;
        }
        player.step_forward()?;
    }
    player.rewind_to_start()?;

    Ok(frames)
}

/// Write every frame and the manifest into `dir`
pub fn render_frames(
    scene: &Scene,
    player: &mut Player,
    quality: Quality,
    dir: &Path,
) -> Result<Vec<FrameRecord>> {
    fs::create_dir_all(dir)?;
    let frames = render_to_strings(scene, player, quality)?;

    let mut records = Vec::with_capacity(frames.len());
    for (index, text) in frames.iter().enumerate() {
        let file = format!("frame_{:04}.txt", index);
        fs::write(dir.join(&file), text)?;

        let (beat, phase, caption) = match player.snapshot(index) {
            Some(snapshot) => (
                snapshot.beat,
                snapshot.state.phase.to_string(),
                snapshot.state.caption.clone(),
            ),
            None => (None, String::new(), String::new()),
        };
        records.push(FrameRecord {
            index,
            file,
            beat,
            phase,
            caption,
            elapsed_ms: millis(player.elapsed(index)),
            duration_ms: millis(player.beat_duration(index)),
        });
    }

    let (width, height) = quality.frame_size();
    let manifest = Manifest {
        scene: &scene.config.title,
        quality: quality.to_string(),
        width,
        height,
        total_duration_ms: millis(player.total_duration()),
        frames: &records,
    };
    fs::write(dir.join("manifest.json"), serde_json::to_string_pretty(&manifest)?)?;

    log::info!(
        "wrote {} frames of '{}' to {}",
        records.len(),
        scene.config.title,
        dir.display()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_sizes_grow() {
        let sizes: Vec<(u16, u16)> = [Quality::Low, Quality::Medium, Quality::High]
            .iter()
            .map(|q| q.frame_size())
            .collect();
        assert!(sizes.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 < w[1].1));
        assert!(Quality::High.tick() < Quality::Low.tick());
    }
}
