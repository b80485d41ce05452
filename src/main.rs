// vmscene: virtual memory explainer scenes in the terminal

use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use ratatui::{backend::CrosstermBackend, Terminal};

use vmscene::render::{render_frames, Quality};
use vmscene::scene::config::{SceneConfig, SceneName};
use vmscene::scene::constants::SNAPSHOT_LIMIT;
use vmscene::scene::Scene;
use vmscene::ui::App;

#[derive(Parser, Debug)]
#[command(version, about = "Virtual memory explainer scenes", long_about = None)]
struct Cli {
    /// Built-in scene to play
    #[arg(value_enum, default_value_t = SceneName::HeapBasics)]
    scene: SceneName,

    /// Frame size for --render and redraw rate for the TUI
    #[arg(short, long, value_enum, default_value_t = Quality::Medium)]
    quality: Quality,

    /// Load the scene description from a JSON file instead of a preset
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write every frame to DIR instead of starting the TUI
    #[arg(short, long, value_name = "DIR")]
    render: Option<PathBuf>,

    /// Send log output to FILE
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// List the built-in scenes and exit
    #[arg(short, long)]
    list: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn init_logger(cli: &Cli) -> io::Result<()> {
    let mut builder = env_logger::builder();
    builder
        .format_timestamp(None)
        .format_level(true)
        .format_target(false)
        .filter_level(level_for(cli.verbose));

    if let Some(path) = &cli.log_file {
        builder.target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
    } else if cli.render.is_none() && !cli.list {
        // stderr would draw over the alternate screen
        builder.filter_level(LevelFilter::Off);
    }

    builder.init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logger(&cli)?;

    if cli.list {
        for name in SceneName::ALL {
            println!("{:<14} {}", name.name(), name.description());
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::preset(cli.scene),
    };

    let scene = Scene::build(config)?;
    let mut player = scene.player(SNAPSHOT_LIMIT)?;
    log::info!(
        "'{}': {} snapshots, {:.1}s",
        scene.config.title,
        player.total_snapshots(),
        player.total_duration().as_secs_f32()
    );

    if let Some(dir) = &cli.render {
        let frames = render_frames(&scene, &mut player, cli.quality, dir)?;
        println!("Wrote {} frames to {}", frames.len(), dir.display());
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(scene, player, cli.quality.tick());
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
