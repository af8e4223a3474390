pub mod app_dirs;
pub mod audio;
pub mod config;
pub mod game;
pub mod leaderboard;
pub mod runtime;
pub mod session;
pub mod target;
pub mod ui;
pub mod util;

use crate::audio::TerminalBell;
use crate::config::{Config, ConfigStore, FileConfigStore};
use crate::game::{Game, GameState};
use crate::leaderboard::{FileScoreStore, Leaderboard};
use crate::runtime::{InputEvent, Runner, TerminalEventSource};
use crate::session::SessionConfig;
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::{Duration, Instant},
};

const TICK_RATE_MS: u64 = 33;

/// snappy aim trainer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A snappy aim trainer TUI: click the targets with your mouse before the clock runs out, watch your accuracy, and climb the local leaderboard."
)]
pub struct Cli {
    /// number of seconds per session
    #[clap(short = 's', long)]
    number_of_secs: Option<u64>,

    /// number of simultaneous targets
    #[clap(short = 't', long)]
    number_of_targets: Option<usize>,

    /// target size preset
    #[clap(short = 'd', long, value_enum, default_value_t = Difficulty::Standard)]
    difficulty: Difficulty,

    /// start with sound off
    #[clap(long)]
    mute: bool,

    /// wipe the saved leaderboard and exit
    #[clap(long)]
    clear_scores: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum Difficulty {
    Casual,
    Standard,
    Pro,
}

impl Difficulty {
    fn target_radius(&self) -> f64 {
        match self {
            Difficulty::Casual => 90.0,
            Difficulty::Standard => session::TARGET_RADIUS,
            Difficulty::Pro => 40.0,
        }
    }
}

impl Cli {
    /// Effective session settings: CLI flags override the saved config.
    fn to_session_config(&self, cfg: &Config) -> SessionConfig {
        SessionConfig {
            duration_secs: self.number_of_secs.unwrap_or(cfg.number_of_secs) as f64,
            target_count: self.number_of_targets.unwrap_or(cfg.number_of_targets),
            target_radius: self.difficulty.target_radius(),
            ..SessionConfig::default()
        }
    }
}

pub struct App {
    pub game: Game,
    pub show_leaderboard: bool,
    pub difficulty: Difficulty,
    config: Config,
    config_store: FileConfigStore,
}

impl App {
    pub fn new(cli: &Cli) -> Self {
        let config_store = FileConfigStore::new();
        let mut config = config_store.load();
        if cli.mute {
            config.sound = false;
        }

        let leaderboard = Leaderboard::with_capacity(
            config.leaderboard_capacity,
            Box::new(FileScoreStore::new()),
        );
        let mut game = Game::new(
            cli.to_session_config(&config),
            leaderboard,
            Box::new(TerminalBell),
        );
        game.set_sound(config.sound);

        Self {
            game,
            show_leaderboard: false,
            difficulty: cli.difficulty,
            config,
            config_store,
        }
    }

    fn toggle_sound(&mut self) {
        self.config.sound = self.game.toggle_sound();
        let _ = self.config_store.save(&self.config);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.clear_scores {
        let mut board = Leaderboard::new(Box::new(FileScoreStore::new()));
        board.clear();
        println!("leaderboard cleared");
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&cli);
    let res = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    res
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        TerminalEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        match runner.step() {
            InputEvent::Tick => {
                let dt = last_frame.elapsed().as_secs_f64();
                last_frame = Instant::now();
                app.game.advance(dt);
            }
            InputEvent::Resize => {
                let (width, height) = surface_bounds(terminal)?;
                app.game.resize(width, height);
            }
            InputEvent::Click { column, row } => {
                let rect = ui::playfield_rect(whole_area(terminal)?);
                if let Some((x, y)) = ui::cell_to_surface(rect, column, row) {
                    app.game.pointer_down(x, y);
                }
            }
            InputEvent::Key(key) => {
                if handle_key(terminal, app, key)? {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn whole_area<B: Backend>(terminal: &Terminal<B>) -> Result<Rect, Box<dyn Error>> {
    let size = terminal.size()?;
    Ok(Rect::new(0, 0, size.width, size.height))
}

fn surface_bounds<B: Backend>(terminal: &Terminal<B>) -> Result<(f64, f64), Box<dyn Error>> {
    Ok(ui::surface_size(ui::playfield_rect(whole_area(terminal)?)))
}

fn start_session<B: Backend>(terminal: &Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let (width, height) = surface_bounds(terminal)?;
    app.show_leaderboard = false;
    app.game.start(width, height);
    Ok(())
}

fn handle_key<B: Backend>(
    terminal: &Terminal<B>,
    app: &mut App,
    key: KeyEvent,
) -> Result<bool, Box<dyn Error>> {
    // ctrl+c quits from any state
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }

    match app.game.state() {
        GameState::Menu => match key.code {
            KeyCode::Enter => start_session(terminal, app)?,
            KeyCode::Char('l') => app.show_leaderboard = !app.show_leaderboard,
            KeyCode::Char('s') => app.toggle_sound(),
            KeyCode::Char('c') => app.game.leaderboard_mut().clear(),
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            _ => {}
        },
        GameState::Playing => {
            if key.code == KeyCode::Esc {
                app.game.return_to_menu();
            }
        }
        GameState::GameOver => match key.code {
            KeyCode::Enter | KeyCode::Char('r') => start_session(terminal, app)?,
            KeyCode::Char('m') => app.game.return_to_menu(),
            KeyCode::Char('l') => app.show_leaderboard = !app.show_leaderboard,
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            _ => {}
        },
    }

    Ok(false)
}
