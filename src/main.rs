mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::info;

use meteor_patrol::consts::keys;
use meteor_patrol::input::KeyEvent as RemoteKey;
use meteor_patrol::entities::GameStatus;
use meteor_patrol::services::{
    resolve_entitlement, EntitlementCheck, EntitlementFile, Offline, Unlocked,
};
use meteor_patrol::{Session, Settings};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Top-down arcade shooter in the terminal.
#[derive(Parser, Debug)]
#[command(name = "meteor_patrol", version, about)]
struct Cli {
    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// RNG seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON payment status file (`{"isPaid": true}`)
    #[arg(long)]
    entitlement: Option<PathBuf>,

    /// Write the log here; the terminal UI otherwise runs without logging
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run without a terminal for this many seconds and print the final snapshot as JSON
    #[arg(long, value_name = "SECONDS")]
    headless: Option<u64>,
}

fn init_logging(log_file: Option<&Path>, headless: bool) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        // Log lines would tear the alternate screen.
        None if !headless => {
            builder.filter_level(log::LevelFilter::Off);
        }
        None => {}
    }
    builder.init();
    Ok(())
}

// ── Terminal key → remote code ────────────────────────────────────────────────

fn remote_code(code: &KeyCode) -> Option<u32> {
    match code {
        KeyCode::Up | KeyCode::Char('w') => Some(keys::UP),
        KeyCode::Down | KeyCode::Char('s') => Some(keys::DOWN),
        KeyCode::Left | KeyCode::Char('a') => Some(keys::LEFT),
        KeyCode::Right | KeyCode::Char('d') => Some(keys::RIGHT),
        KeyCode::Enter => Some(keys::CENTER),
        KeyCode::Char(' ') => Some(keys::PLAY_PAUSE),
        KeyCode::Char('z') => Some(keys::REWIND),
        KeyCode::Char('x') => Some(keys::FAST_FORWARD),
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: the session expects key-down / key-up pairs.  Terminals that
/// report releases deliver them directly; for the rest a key counts as held
/// while press/repeat events keep arriving within `HOLD_WINDOW` frames, and a
/// synthetic key-up is sent once it goes stale.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    rx: &mpsc::Receiver<Event>,
    entitlement_rx: &mpsc::Receiver<bool>,
) -> Result<()> {
    // Remote code → frame it was last seen (press or repeat).
    let mut key_frame: HashMap<u32, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        if let Ok(entitled) = entitlement_rx.try_recv() {
            session.set_entitled(entitled);
        }

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };

            match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(())
                }
                KeyCode::Char('p') if kind == KeyEventKind::Press => {
                    if session.state().status == GameStatus::Paused {
                        session.resume();
                    } else {
                        session.pause();
                    }
                    continue;
                }
                KeyCode::Char('n') if kind == KeyEventKind::Press => {
                    session.reset();
                    key_frame.clear();
                    continue;
                }
                _ => {}
            }

            let Some(remote) = remote_code(&code) else {
                continue;
            };
            match kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    if key_frame.insert(remote, frame).is_none() {
                        session.handle_key(RemoteKey::down(remote));
                    }
                }
                KeyEventKind::Release => {
                    if key_frame.remove(&remote).is_some() {
                        session.handle_key(RemoteKey::up(remote));
                    }
                }
            }
        }

        // ── Release keys that went quiet ──────────────────────────────────────
        let stale: Vec<u32> = key_frame
            .iter()
            .filter(|(_, seen)| frame.saturating_sub(**seen) > HOLD_WINDOW)
            .map(|(code, _)| *code)
            .collect();
        for code in stale {
            key_frame.remove(&code);
            session.handle_key(RemoteKey::up(code));
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last).as_millis() as u64;
        last = now;
        session.advance(elapsed);

        display::render(out, &session.snapshot(), session.settings().arena())?;

        let spent = frame_start.elapsed();
        if spent < FRAME {
            thread::sleep(FRAME - spent);
        }
    }
}

// ── Headless run ──────────────────────────────────────────────────────────────

/// Confirm the default ship, hold fire and sweep side to side, then print the
/// final snapshot.
fn run_headless(session: &mut Session, seconds: u64) -> Result<()> {
    session.handle_key(RemoteKey::down(keys::CENTER));
    session.handle_key(RemoteKey::up(keys::CENTER));
    session.handle_key(RemoteKey::down(keys::PLAY_PAUSE));

    let step_ms = 16;
    let total_ms = seconds * 1000;
    let mut elapsed = 0;
    let mut heading = keys::LEFT;
    session.handle_key(RemoteKey::down(heading));

    while elapsed < total_ms && !session.state().status.is_terminal() {
        if elapsed % 2000 == 0 && elapsed > 0 {
            session.handle_key(RemoteKey::up(heading));
            heading = if heading == keys::LEFT {
                keys::RIGHT
            } else {
                keys::LEFT
            };
            session.handle_key(RemoteKey::down(heading));
        }
        let summary = session.advance(step_ms);
        if summary.player_hit {
            info!("Headless pilot collided at {}ms", elapsed);
            break;
        }
        elapsed += step_ms;
    }

    let json = serde_json::to_string_pretty(&session.snapshot())?;
    println!("{json}");
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), cli.headless.is_some())?;

    let mut settings = match &cli.settings {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }
    let payments = settings.features.in_app_payments;
    let mut session = Session::new(settings);

    // The entitlement check runs off the game thread and reports back once.
    let check: Box<dyn EntitlementCheck> = match (payments, cli.entitlement.clone()) {
        (false, _) => Box::new(Unlocked),
        (true, Some(path)) => Box::new(EntitlementFile::new(path)),
        (true, None) => Box::new(Offline),
    };
    let (ent_tx, ent_rx) = mpsc::channel::<bool>();
    thread::spawn(move || {
        let _ = ent_tx.send(resolve_entitlement(check.as_ref()));
    });

    if let Some(seconds) = cli.headless {
        if let Ok(entitled) = ent_rx.recv() {
            session.set_entitled(entitled);
        }
        return run_headless(&mut session, seconds);
    }

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
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

    let result = game_loop(&mut out, &mut session, &rx, &ent_rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("Final score: {}", session.state().score);
    result
}
