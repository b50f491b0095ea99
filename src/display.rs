/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable snapshot of the
/// game.  No game logic is performed; this module only translates the
/// snapshot into terminal commands, scaling arena coordinates onto the
/// terminal grid.
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use meteor_patrol::entities::{
    BulletDirection, Enemy, EnemyKind, GameStatus, ShipColor, ShipType,
};
use meteor_patrol::geometry::Arena;
use meteor_patrol::Snapshot;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_TIME: Color = Color::Cyan;
const C_ENEMY_NORMAL: Color = Color::Green;
const C_ENEMY_FAST: Color = Color::Red;
const C_METEOR: Color = Color::DarkYellow;
const C_BULLET: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Terminal cells available to the arena.
struct Viewport {
    width: u16,
    height: u16,
    scale_x: f32,
    scale_y: f32,
}

impl Viewport {
    fn new(width: u16, height: u16, arena: Arena) -> Self {
        // Row 0 HUD, row 1 top border, row h-2 bottom border, row h-1 hints.
        let cols = width.saturating_sub(2).max(1) as f32;
        let rows = height.saturating_sub(4).max(1) as f32;
        Self {
            width,
            height,
            scale_x: cols / arena.width.max(1.0),
            scale_y: rows / arena.height.max(1.0),
        }
    }

    /// Arena point to a terminal cell, or `None` outside the play area.
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let col = (x * self.scale_x).floor() as i32 + 1;
        let row = (y * self.scale_y).floor() as i32 + 2;
        let inside = col >= 1
            && col < self.width as i32 - 1
            && row >= 2
            && row < self.height as i32 - 2;
        inside.then_some((col as u16, row as u16))
    }
}

fn ship_color(color: ShipColor) -> Color {
    match color {
        ShipColor::Blue => Color::Blue,
        ShipColor::Green => Color::Green,
        ShipColor::Orange => Color::DarkYellow,
        ShipColor::Red => Color::Red,
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, snap: &Snapshot, arena: Arena) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport::new(width, height, arena);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_hud(out, snap, &view)?;

    if snap.status == GameStatus::SelectingShip {
        draw_ship_selector(out, snap, &view)?;
    } else {
        for enemy in &snap.enemies {
            draw_enemy(out, enemy, &view)?;
        }
        for bullet in &snap.bullets {
            if let Some((col, row)) = view.cell(bullet.x, bullet.y) {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(style::SetForegroundColor(C_BULLET))?;
                out.queue(Print(match bullet.direction {
                    BulletDirection::Up => "║",
                    BulletDirection::Down => "┃",
                }))?;
            }
        }
        draw_player(out, snap, &view)?;
    }

    draw_controls_hint(out, &view)?;

    match snap.status {
        GameStatus::Ready => draw_banner(
            out,
            &view,
            &[
                ("READY", Color::Green),
                ("Press any key to start", Color::White),
            ],
        )?,
        GameStatus::Paused => draw_banner(
            out,
            &view,
            &[
                ("PAUSED", Color::Yellow),
                ("ENTER to resume", Color::White),
            ],
        )?,
        GameStatus::GameOver => {
            let score_line = format!("Final Score: {}", snap.score);
            let lines: &[(&str, Color)] = &[
                ("╔══════════════════╗", Color::Red),
                ("║    GAME  OVER    ║", Color::Red),
                ("╚══════════════════╝", Color::Red),
                (&score_line, Color::Yellow),
                ("ENTER - Play Again  Q - Quit", Color::White),
            ];
            draw_banner(out, &view, lines)?
        }
        GameStatus::Cleared => {
            let score_line = format!("Final Score: {}", snap.score);
            let lines: &[(&str, Color)] = &[
                ("╔══════════════════╗", Color::Green),
                ("║  GAME  CLEARED!  ║", Color::Green),
                ("╚══════════════════╝", Color::Green),
                (&score_line, Color::Yellow),
                ("ENTER - Play Again  Q - Quit", Color::White),
            ];
            draw_banner(out, &view, lines)?
        }
        GameStatus::SelectingShip | GameStatus::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, snap: &Snapshot, view: &Viewport) -> std::io::Result<()> {
    if !snap.flags.ship_selected {
        return Ok(());
    }

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", snap.score)))?;

    let time_str = format!("{:>2}s", snap.time_left);
    let rx = view
        .width
        .saturating_sub(time_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TIME))?;
    out.queue(Print(&time_str))?;

    Ok(())
}

// ── Ship selector ─────────────────────────────────────────────────────────────

fn draw_ship_selector<W: Write>(
    out: &mut W,
    snap: &Snapshot,
    view: &Viewport,
) -> std::io::Result<()> {
    let title = "Choose Your Ship";
    let cx = view.width / 2;
    let top = (view.height / 2).saturating_sub(4);

    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        top,
    ))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(title))?;

    for (row, kind) in ShipType::ALL.iter().enumerate() {
        let y = top + 2 + row as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(12), y))?;
        let locked = kind.is_premium() && !snap.entitled;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(format!("{} ", kind.number())))?;
        for color in ShipColor::ALL {
            let selected = snap.ship.kind == *kind && snap.ship.color == color;
            let glyph = match (locked, selected) {
                (true, _) => " ✕ ",
                (false, true) => "[▲]",
                (false, false) => " ▲ ",
            };
            out.queue(style::SetForegroundColor(if locked {
                C_HINT
            } else {
                ship_color(color)
            }))?;
            out.queue(Print(format!("{glyph} ")))?;
        }
    }

    let hint = "↑↓ type  ←→ colour  ENTER select";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(hint.chars().count() as u16 / 2),
        top + 6,
    ))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, snap: &Snapshot, view: &Viewport) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(snap.player.x, snap.player.y) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(ship_color(snap.ship.color)))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print(if snap.flipped { "▼" } else { "▲" }))?;
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, enemy: &Enemy, view: &Viewport) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(enemy.x, enemy.y) else {
        return Ok(());
    };
    let (sprite, color) = match enemy.kind {
        EnemyKind::Normal => ("«▼»", C_ENEMY_NORMAL),
        EnemyKind::Fast => ("«▽»", C_ENEMY_FAST),
        EnemyKind::Meteor { rotation, .. } => {
            // Four-frame spin from the meteor's rotation.
            let frame = ((rotation.rem_euclid(360.0)) / 90.0) as usize % 4;
            (["(◐)", "(◓)", "(◑)", "(◒)"][frame], C_METEOR)
        }
    };
    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print(sprite))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "Arrows: Move  SPACE: Shoot  Z/X: Flip  P: Pause  N: New  Q: Quit",
    ))?;
    Ok(())
}

// ── Centered overlays ─────────────────────────────────────────────────────────

fn draw_banner<W: Write>(
    out: &mut W,
    view: &Viewport,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let cx = view.width / 2;
    let start_row = (view.height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
