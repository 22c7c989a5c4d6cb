use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{info, warn};
use numdrill::{
    app::{App, Flow},
    catalog::GameKind,
    config::{reset_config, ConfigStore, FileConfigStore},
    logging,
    position::PositionConfig,
    results_log::ResultsLog,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, GameEventSource, Runner, Ticker},
    sum::SumConfig,
    timer::Moment,
    ui,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

const TICK_RATE_MS: u64 = 50;

/// number memory and estimation mini-games for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Two quick number drills: remember a stream of numbers and add them up, or place numbers on a range bar by feel."
)]
pub struct Cli {
    /// game to open directly instead of the menu
    #[clap(subcommand)]
    game: Option<GameCommand>,

    /// directory holding saved game settings
    #[clap(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// forget saved settings for both games before starting
    #[clap(long)]
    reset: bool,

    /// seed the number generator for repeatable sessions
    #[clap(long, value_name = "N")]
    seed: Option<u64>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum GameCommand {
    /// Sum Memory: watch the numbers, then enter their total
    Sum,
    /// Position the Number: place each number on the range bar
    Position,
}

impl From<GameCommand> for GameKind {
    fn from(cmd: GameCommand) -> Self {
        match cmd {
            GameCommand::Sum => GameKind::SumMemory,
            GameCommand::Position => GameKind::PositionNumber,
        }
    }
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config_dir {
            Some(dir) => FileConfigStore::with_dir(dir),
            None => FileConfigStore::new(),
        }
    }
}

fn reset_saved_settings<S: ConfigStore>(store: &S) -> Result<(), Box<dyn Error>> {
    reset_config::<SumConfig, _>(store)?;
    reset_config::<PositionConfig, _>(store)?;
    info!("saved settings cleared");
    Ok(())
}

fn build_app(cli: &Cli) -> Result<App, Box<dyn Error>> {
    let store = cli.config_store();
    if cli.reset {
        reset_saved_settings(&store)?;
    }
    let mut app = App::new(store, ResultsLog::new(), cli.seed);
    if let Some(game) = cli.game {
        app.open(game.into());
    }
    Ok(app)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = logging::init() {
        info!("debug log at {}", path.display());
    }

    let mut app = build_app(&cli)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let res = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        warn!("terminal loop failed: {e}");
    }
    res
}

fn start_tui<B: Backend, E: GameEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        let flow = match runner.step() {
            GameEvent::Key(key) => app.handle_key(key, Moment::now()),
            GameEvent::Mouse(mouse) => {
                app.handle_mouse(mouse, Moment::now());
                Flow::Continue
            }
            GameEvent::Resize | GameEvent::Tick => Flow::Continue,
        };
        if flow == Flow::Quit {
            return Ok(());
        }
        // a steady stream of input must not starve the timers
        app.on_tick(Moment::now());
    }
}
