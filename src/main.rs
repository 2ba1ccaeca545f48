use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::thread_rng;

use star_shooter::config::GameConfig;
use star_shooter::display::terminal::TerminalCanvas;
use star_shooter::engine::Scene;
use star_shooter::error::Result;
use star_shooter::game::Game;
use star_shooter::input::InputTracker;

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the game, so records go to a file or nowhere.
fn init_logging(config: &GameConfig) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    env_logger::Builder::new()
        .filter_level(config.level_filter()?)
        .parse_env("RUST_LOG")
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Frame loop ────────────────────────────────────────────────────────────────

/// Drive `scene` until the player quits: drain input, update, present, sleep.
fn run<W: Write, S: Scene>(
    out: &mut W,
    scene: &mut S,
    config: &GameConfig,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut canvas = TerminalCanvas::new(cols, rows, config.window_width, config.window_height);
    let mut input = InputTracker::new(cols, rows, config.window_width);
    let frame_time = config.frame_duration();

    scene.init();
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            if let Event::Resize(c, r) = ev {
                canvas.resize(c, r);
            }
            input.handle_event(&ev);
        }
        if input.quit_requested() {
            break;
        }

        let dt = frame_start.duration_since(last).as_secs_f32();
        last = frame_start;

        let frame = input.frame_input(dt);
        scene.update(&frame, &mut canvas);
        canvas.present(out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }

    scene.exit();
    Ok(())
}

// ── Terminal session ──────────────────────────────────────────────────────────

/// Switch `out` into game mode, run `body`, then put the terminal back.
/// Restoration happens whether setup, `body`, or neither failed.
fn with_terminal<W, F>(out: &mut W, body: F) -> Result<()>
where
    W: Write,
    F: FnOnce(&mut W) -> Result<()>,
{
    let mut keyboard_enhanced = false;
    let result = enter_game_mode(out, &mut keyboard_enhanced).and_then(|()| body(out));
    restore(out, keyboard_enhanced);
    result
}

fn enter_game_mode<W: Write>(out: &mut W, keyboard_enhanced: &mut bool) -> Result<()> {
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(EnableMouseCapture)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    *keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    if !*keyboard_enhanced {
        warn!("terminal does not report key releases, falling back to hold window");
    }
    Ok(())
}

fn restore<W: Write>(out: &mut W, keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(terminal::LeaveAlternateScreen);
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config = GameConfig::load()?;
    init_logging(&config)?;

    let mut out = BufWriter::new(stdout());

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the frame loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    terminal::enable_raw_mode()?;
    let result = with_terminal(&mut out, |out| {
        let mut game = Game::new(&config, thread_rng());
        run(out, &mut game, &config, &rx)
    });
    let _ = terminal::disable_raw_mode();

    info!("terminal restored");
    result
}
