mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, KeyCode,
        KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags, MouseEvent,
        MouseEventKind, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    tty::IsTty,
};
use lightsout::{
    board::Board,
    clock::MonotonicClock,
    config::{Config, ConfigStore, FileConfigStore, Settings, Theme},
    game::ReflexGame,
    input::{InputFilter, Interaction},
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};

const TICK_RATE_MS: u64 = 50;

/// starting-lights reaction timer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Five columns of lights come on one per second, then go out after a random hold. React as soon as they go out; reacting before that is a jump start."
)]
pub struct Cli {
    /// key used to react: space, enter, tab or a single character
    #[clap(short = 'k', long)]
    key: Option<String>,

    /// colour theme
    #[clap(short = 't', long, value_enum)]
    theme: Option<Theme>,

    /// ignore mouse clicks and react with the keyboard only
    #[clap(long)]
    no_mouse: bool,

    /// read preferences from this file instead of the default location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// write the effective preferences back to the config file
    #[clap(long)]
    save_config: bool,

    /// write logs to this file instead of the state directory
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Command line flags take precedence over the config file
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(key) = &self.key {
            cfg.action_key = key.clone();
        }
        if let Some(theme) = self.theme {
            cfg.theme = theme;
        }
        if self.no_mouse {
            cfg.mouse = false;
        }
        cfg
    }
}

fn idle_prompt(settings: &Settings) -> String {
    if settings.mouse {
        format!("Press {} or click when ready.", settings.action_key)
    } else {
        format!("Press {} when ready.", settings.action_key)
    }
}

pub struct App {
    pub game: ReflexGame<MonotonicClock, Board>,
    pub input: InputFilter,
    pub theme: Theme,
    /// Last drawn frame area, used to hit-test the theme button
    pub area: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Dispatch {
    Continue,
    Quit,
}

impl App {
    pub fn new(settings: Settings, tracks_release: bool) -> Self {
        Self {
            game: ReflexGame::new(MonotonicClock, Board::new())
                .with_idle_prompt(idle_prompt(&settings)),
            input: InputFilter::new(settings.action_key, settings.mouse, tracks_release),
            theme: settings.theme,
            area: Rect::default(),
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        log::debug!("theme switched to {}", self.theme);
    }

    fn on_event(&mut self, event: AppEvent) -> Dispatch {
        match event {
            AppEvent::Tick => self.game.advance(),
            AppEvent::Resize => {}
            AppEvent::FocusLost => self.input.reset(),
            AppEvent::Key(key, at) => return self.handle_key(key, at),
            AppEvent::Mouse(mouse, at) => self.handle_mouse(mouse, at),
        }
        Dispatch::Continue
    }

    /// Shell keys (quit, theme) are handled first and never reach the game
    fn handle_key(&mut self, key: KeyEvent, at: Instant) -> Dispatch {
        if key.kind == KeyEventKind::Press {
            // ctrl+c to quit
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Dispatch::Quit;
            }

            if !self.input.action_key().matches(key.code) {
                match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => return Dispatch::Quit,
                    KeyCode::Char('t') => {
                        self.toggle_theme();
                        return Dispatch::Continue;
                    }
                    _ => {}
                }
            }
        }

        if let Some(interaction) = self.input.on_key(&key) {
            self.interact(interaction, at);
        }
        Dispatch::Continue
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, at: Instant) {
        if let MouseEventKind::Down(_) = mouse.kind {
            if ui::hit(ui::theme_button_area(self.area), mouse.column, mouse.row) {
                self.toggle_theme();
                return;
            }
        }

        if let Some(interaction) = self.input.on_mouse(&mouse) {
            self.interact(interaction, at);
        }
    }

    fn interact(&mut self, interaction: Interaction, at: Instant) {
        log::trace!("{:?} interaction in {}", interaction.source, self.game.state());
        self.game.interact_at(at);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = cli.config_store();
    let cfg = cli.apply(store.load()?);
    let settings = Settings::try_from(&cfg)?;
    if cli.save_config {
        store.save(&cfg)?;
    }

    let log_path = lightsout::logging::init(cli.log_file.clone())?;
    log::info!(
        "starting with {settings:?} from {}, logging to {}",
        store.path().display(),
        log_path.display()
    );
    if cli.save_config {
        log::info!("saved preferences to {}", store.path().display());
    }

    enable_raw_mode()?;

    // needs raw mode, and must run before the event reader thread owns stdin
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    let tracks_release = tracks_key_release(enhanced);
    log::debug!("keyboard enhancement: {enhanced}, key releases reported: {tracks_release}");

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    if settings.mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(settings, tracks_release);
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    if settings.mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    log::info!(
        "session over after {} attempts, best {:?}",
        app.game.attempt(),
        app.game.best_time()
    );
    result
}

/// Whether key releases will be reported, so a held key can be told apart
/// from a fresh press. The Windows console always reports releases (and sends
/// auto-repeat as plain presses) without any enhancement flags.
fn tracks_key_release(enhanced: bool) -> bool {
    cfg!(windows) || enhanced
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(app, f))?;

        let event = runner.step_until(app.game.next_deadline());
        if app.on_event(event) == Dispatch::Quit {
            break;
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    app.area = f.area();
    f.render_widget(&*app, f.area());
}
