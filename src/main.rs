#![warn(clippy::all, clippy::pedantic)]

use std::io;
use std::os::fd::AsRawFd;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, error, info, warn};
use ratatui::{Terminal, prelude::*};
use reaction_speed::Time;
use reaction_speed::app::{App, AppResult};
use reaction_speed::config::{self, Config};
use reaction_speed::sound::AudioState;
use reaction_speed::store::{BestScore, FileStore, MemoryStore};
use reaction_speed::ui;

// Scheduler granularity; every timer in the game is a multiple of this
const GAME_TICK_RATE: Duration = Duration::from_millis(10);

fn main() -> AppResult<()> {
    // Create log file and redirect stderr to it
    let log_path = "reaction_speed.log";
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    let stderr_handle = std::io::stderr();
    let stderr_fd = stderr_handle.as_raw_fd();
    let log_file_fd = log_file.as_raw_fd();

    // Safety: We're redirecting stderr to our log file using standard POSIX operations
    unsafe {
        libc::dup2(log_file_fd, stderr_fd);
    }

    // Configure the logger to use stderr (which is now redirected to our file)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    info!("Starting Reaction Speed");

    let config = match config::loader::load_config_from_file() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {e:?}");
            Config::default()
        }
    };
    Config::install(config.clone());

    let best_score = open_best_score(&config);
    let audio = AudioState::from_config(&config.audio);
    let app = App::new(best_score, config.gameplay.play_area(), audio);

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let frame_rate = Duration::from_millis(config.display.frame_interval_ms.max(1));
    let res = run_app(&mut terminal, app, frame_rate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Game error: {err:?}");
    }

    // Persist sound settings changed from the keyboard
    let settings = Config::current();
    if settings != config {
        match config::loader::save_config_to_file(&settings) {
            Ok(()) => info!("Configuration saved"),
            Err(e) => error!("Failed to save configuration: {e:?}"),
        }
    }

    Ok(())
}

// Best score is optional: an unreadable store just means nothing is remembered
fn open_best_score(config: &Config) -> BestScore {
    let path = config.storage.best_score_path();
    match FileStore::open(&path) {
        Ok(store) => {
            let best = BestScore::load(Box::new(store));
            info!("Best score {} from {}", best.value(), path.display());
            best
        }
        Err(e) => {
            warn!("Score store at {} unavailable: {e:?}", path.display());
            BestScore::load(Box::new(MemoryStore::new()))
        }
    }
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    frame_rate: Duration,
) -> AppResult<()> {
    let mut last_render = Instant::now();
    let mut last_game_tick = Instant::now();
    let mut time = Time::new();

    // Flush anything typed before the game started
    while event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    debug!("Entering main loop");

    let mut audio_error_logged = false;

    loop {
        if last_render.elapsed() >= frame_rate {
            terminal.draw(|f| ui::render(f, &mut app))?;
            last_render = Instant::now();
        }

        if last_game_tick.elapsed() >= GAME_TICK_RATE {
            last_game_tick = Instant::now();
            let elapsed_ms = time.update();
            app.on_tick(elapsed_ms);

            let audio_unavailable = {
                let audio_state = app.world.resource::<AudioState>();
                audio_state.is_sound_enabled() && !audio_state.is_audio_available()
            };
            if audio_unavailable && !audio_error_logged {
                error!("Audio device is unavailable. Continuing without sound.");
                audio_error_logged = true;
            }
        }

        if app.should_quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(5))? {
            match event::read()? {
                Event::Key(key) => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
            }
        }
    }
}
