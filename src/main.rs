pub mod ui;

use chronotrack::{
    app_dirs::AppDirs,
    clock::{Clock, SystemClock},
    config::{Config, ConfigStore, FileConfigStore},
    format::format_time,
    logging,
    persist::{Persistence, RecoveryPolicy},
    runtime::{AppEvent, CrosstermEventSource, Runner, TickScheduler},
    stopwatch::{EngineEvent, StopwatchEngine},
    store::{KeyValueStore, SqliteStore},
};
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::{
    error::Error,
    fs::File,
    io::{self, stdin, Stdout, Write},
    ops::{Deref, DerefMut},
    path::PathBuf,
    time::{Duration, Instant},
};

const TOAST_DURATION: Duration = Duration::from_secs(3);

/// precise terminal stopwatch with laps, goals, and session history
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A precise terminal stopwatch. Record laps, set a time goal, and keep a history of every finished run. State survives restarts, even mid-run."
)]
pub struct Cli {
    /// sqlite database holding the stopwatch state
    #[clap(long, global = true)]
    state_db: Option<PathBuf>,

    /// config file to use instead of the default location
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// sampling interval in milliseconds while running
    #[clap(short = 't', long)]
    tick_ms: Option<u64>,

    /// goal in seconds; anything not positive clears the goal
    #[clap(short = 'g', long)]
    goal: Option<String>,

    /// wipe history and goal too when the saved timer state is corrupted
    #[clap(long, global = true)]
    wipe_on_corruption: bool,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// print the session history, newest first
    History,
    /// write the session history as CSV
    Export {
        /// output file (stdout when omitted)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// delete the whole session history
    ClearHistory,
}

impl Cli {
    /// Layer command line flags over the loaded config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if let Some(path) = &self.state_db {
            config.state_db = Some(path.clone());
        }
        if self.wipe_on_corruption {
            config.recovery_policy = RecoveryPolicy::WipeAll;
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, strum_macros::Display)]
pub enum AppState {
    Stopwatch,
    #[strum(to_string = "Goal")]
    GoalEntry,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub shown_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App<C: Clock, S: KeyValueStore> {
    pub engine: StopwatchEngine<C, S>,
    pub state: AppState,
    pub goal_input: String,
    pub history_scroll: usize,
    pub toast: Option<Toast>,
}

impl<C: Clock, S: KeyValueStore> App<C, S> {
    pub fn new(engine: StopwatchEngine<C, S>) -> Self {
        let mut app = Self {
            engine,
            state: AppState::Stopwatch,
            goal_input: String::new(),
            history_scroll: 0,
            toast: None,
        };
        app.absorb_events();
        app
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        // ctrl+c to quit from anywhere
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return self.quit();
        }

        match self.state {
            AppState::Stopwatch => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return self.quit(),
                KeyCode::Char(' ') | KeyCode::Enter => {
                    self.engine.start_or_stop();
                }
                KeyCode::Char('l') => {
                    self.engine.record_lap();
                }
                KeyCode::Char('r') => {
                    self.engine.reset_and_archive();
                }
                KeyCode::Char('g') => {
                    self.goal_input = self
                        .engine
                        .goal_ms()
                        .map(format_goal_seconds)
                        .unwrap_or_default();
                    self.state = AppState::GoalEntry;
                }
                KeyCode::Char('h') => {
                    self.history_scroll = 0;
                    self.state = AppState::History;
                }
                _ => {}
            },
            AppState::GoalEntry => match key.code {
                KeyCode::Esc => {
                    self.state = AppState::Stopwatch;
                }
                KeyCode::Enter => {
                    let goal = self.engine.set_goal(&self.goal_input);
                    let message = match goal {
                        Some(ms) => format!("Goal set to {}", format_time(ms)),
                        None => "Goal cleared".to_string(),
                    };
                    self.show_toast(message, ToastLevel::Info);
                    self.state = AppState::Stopwatch;
                }
                KeyCode::Backspace => {
                    self.goal_input.pop();
                }
                KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                    self.goal_input.push(c);
                }
                _ => {}
            },
            AppState::History => match key.code {
                KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => {
                    self.state = AppState::Stopwatch;
                }
                KeyCode::Char('q') => return self.quit(),
                KeyCode::Char('c') => {
                    self.engine.clear_history();
                    self.history_scroll = 0;
                }
                KeyCode::Up => {
                    self.history_scroll = self.history_scroll.saturating_sub(1);
                }
                KeyCode::Down => {
                    // clamped at render time
                    self.history_scroll += 1;
                }
                KeyCode::Home => {
                    self.history_scroll = 0;
                }
                _ => {}
            },
        }

        self.absorb_events();
        Flow::Continue
    }

    /// Save everything once more on the way out
    fn quit(&mut self) -> Flow {
        self.engine.flush();
        Flow::Quit
    }

    pub fn on_tick(&mut self) {
        self.engine.tick();
        self.absorb_events();
    }

    /// Turn engine notifications into toasts
    pub fn absorb_events(&mut self) {
        for event in self.engine.drain_events() {
            let (message, level) = match event {
                EngineEvent::GoalReached { goal_ms, .. } => (
                    format!("Goal reached: {}", format_time(goal_ms)),
                    ToastLevel::Success,
                ),
                EngineEvent::SessionArchived {
                    total_ms,
                    lap_count,
                    ..
                } => (
                    format!(
                        "Session saved: {} ({} laps)",
                        format_time(total_ms),
                        lap_count
                    ),
                    ToastLevel::Info,
                ),
                EngineEvent::HistoryCleared => ("History cleared".to_string(), ToastLevel::Info),
                EngineEvent::StateRecovered { key, .. } => (
                    format!("Saved {key} was unreadable and has been reset"),
                    ToastLevel::Warning,
                ),
                EngineEvent::StateUnreadable { key, .. } => (
                    format!("Could not read saved {key}, leaving it untouched"),
                    ToastLevel::Warning,
                ),
            };
            self.show_toast(message, level);
        }
    }

    pub fn show_toast(&mut self, message: String, level: ToastLevel) {
        self.toast = Some(Toast {
            message,
            level,
            shown_at: Instant::now(),
        });
    }

    pub fn expire_toast(&mut self) {
        if let Some(toast) = &self.toast {
            if toast.shown_at.elapsed() >= TOAST_DURATION {
                self.toast = None;
            }
        }
    }
}

fn format_goal_seconds(ms: u64) -> String {
    if ms % 1000 == 0 {
        (ms / 1000).to_string()
    } else {
        format!("{:.3}", ms as f64 / 1000.0)
    }
}

/// Raw mode + alternate screen, undone on drop whichever way we leave
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Deref for TerminalGuard {
    type Target = Terminal<CrosstermBackend<Stdout>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for TerminalGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let _log_guard = logging::init(AppDirs::log_dir().as_deref());

    let config_store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let config = cli.apply(config_store.load_or_create());

    let db_path = config
        .state_db
        .clone()
        .or_else(AppDirs::db_path)
        .unwrap_or_else(|| PathBuf::from("chronotrack_state.db"));
    let store = SqliteStore::open(&db_path)?;

    let scheduler = TickScheduler::new(Duration::from_millis(config.tick_interval_ms.max(1)));
    let mut engine = StopwatchEngine::restore(
        SystemClock,
        Persistence::new(store, config.recovery_policy),
        scheduler.clone(),
        config.engine_options(),
    );
    if let Some(goal) = &cli.goal {
        engine.set_goal(goal);
    }

    match &cli.command {
        Some(Command::History) => print_history(&engine, &mut io::stdout())?,
        Some(Command::Export { output }) => match output {
            Some(path) => engine.archive().write_csv(File::create(path)?)?,
            None => engine.archive().write_csv(io::stdout())?,
        },
        Some(Command::ClearHistory) => {
            let count = engine.sessions().len();
            engine.clear_history();
            println!("cleared {count} sessions");
        }
        None => {
            if !stdin().is_tty() {
                let mut cmd = Cli::command();
                cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
            }
            let mut app = App::new(engine);
            start_tui(&mut app, scheduler)?;
        }
    }

    Ok(())
}

fn print_history<C: Clock, S: KeyValueStore, W: Write>(
    engine: &StopwatchEngine<C, S>,
    out: &mut W,
) -> io::Result<()> {
    let archive = engine.archive();
    if archive.is_empty() {
        writeln!(out, "no sessions yet")?;
        return Ok(());
    }

    for (idx, session) in archive.sessions().iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {}  {:>12}  {} laps",
            idx + 1,
            session.date,
            format_time(session.total_time),
            session.laps.len()
        )?;
    }
    writeln!(
        out,
        "{} sessions, {} tracked",
        archive.len(),
        format_time(archive.total_tracked_ms())
    )?;
    Ok(())
}

fn start_tui<C: Clock, S: KeyValueStore>(
    app: &mut App<C, S>,
    scheduler: TickScheduler,
) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalGuard::enter()?;
    let runner = Runner::new(CrosstermEventSource::new(), scheduler);

    loop {
        terminal.draw(|f| ui(app, f))?;

        match runner.step() {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Idle | AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    break;
                }
            }
        }
        app.expire_toast();
    }

    Ok(())
}

fn ui<C: Clock, S: KeyValueStore>(app: &mut App<C, S>, f: &mut Frame) {
    match app.state {
        AppState::Stopwatch => {
            f.render_widget(&*app, f.area());
        }
        AppState::GoalEntry => {
            f.render_widget(&*app, f.area());
            ui::goal::render_goal_prompt(app, f);
        }
        AppState::History => {
            ui::history::render_history(app, f);
        }
    }
}
