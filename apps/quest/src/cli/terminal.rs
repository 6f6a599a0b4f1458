//! # Terminal Confetti
//!
//! Plays celebration batches in a truecolor terminal. The renderer draws into
//! a pixel [`Canvas`] sized to the configured viewport, and each frame is
//! downsampled into a grid of colored block characters.

use quest_core::{Canvas, CelebrationRenderer, QuestError, RenderSurface, Rgb};
use std::io::Write;
use std::time::Duration;

/// Width of the character grid.
pub const TERMINAL_COLUMNS: usize = 80;

const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";
const CLEAR_SCREEN: &str = "\x1b[2J";
const CURSOR_HOME: &str = "\x1b[H";
const RESET_STYLE: &str = "\x1b[0m";

/// Character grid dimensions for a canvas. Cells are about twice as tall as
/// they are wide.
#[must_use]
pub fn grid_for(canvas: &Canvas) -> (usize, usize) {
    let width = canvas.width().max(1);
    let columns = TERMINAL_COLUMNS.min(width);
    let rows = (canvas.height() * columns / width / 2).max(1);
    (columns, rows)
}

/// Color of the first painted pixel in each cell, row-major.
#[must_use]
pub fn downsample(canvas: &Canvas, columns: usize, rows: usize) -> Vec<Option<Rgb>> {
    let columns = columns.max(1);
    let rows = rows.max(1);
    let cell_w = canvas.width().div_ceil(columns).max(1);
    let cell_h = canvas.height().div_ceil(rows).max(1);

    let mut cells = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        for column in 0..columns {
            let x0 = column * cell_w;
            let y0 = row * cell_h;
            let color = (y0..y0 + cell_h)
                .flat_map(|y| (x0..x0 + cell_w).map(move |x| (x, y)))
                .find_map(|(x, y)| canvas.pixel(x, y));
            cells.push(color);
        }
    }
    cells
}

/// One frame as ANSI text, starting at the top-left corner.
#[must_use]
pub fn render_frame(canvas: &Canvas) -> String {
    let (columns, rows) = grid_for(canvas);
    let cells = downsample(canvas, columns, rows);

    let mut out = String::with_capacity(columns * rows * 4);
    out.push_str(CURSOR_HOME);
    for line in cells.chunks(columns) {
        for cell in line {
            match cell {
                Some(rgb) => {
                    out.push_str(&format!("\x1b[38;2;{};{};{}m\u{2588}", rgb.r, rgb.g, rgb.b));
                }
                None => out.push(' '),
            }
        }
        out.push_str(RESET_STYLE);
        out.push('\n');
    }
    out
}

/// Drive `renderer` to completion, writing frames to stdout at `fps`.
///
/// Returns the number of frames shown.
pub async fn play(
    renderer: &mut CelebrationRenderer,
    canvas: &mut Canvas,
    fps: u32,
) -> Result<u32, QuestError> {
    let period = Duration::from_millis(1000 / u64::from(fps.max(1)));
    let mut ticker = tokio::time::interval(period);
    let mut frames = 0;

    write_stdout(&format!("{HIDE_CURSOR}{CLEAR_SCREEN}"))?;
    while renderer.is_active() {
        ticker.tick().await;
        renderer.frame(canvas);
        frames += 1;
        write_stdout(&render_frame(canvas))?;
    }
    canvas.clear();
    write_stdout(&format!("{CLEAR_SCREEN}{CURSOR_HOME}{SHOW_CURSOR}"))?;

    Ok(frames)
}

/// Drive `renderer` to completion without output. Returns the frame count.
pub fn run_headless(renderer: &mut CelebrationRenderer, canvas: &mut Canvas) -> u32 {
    let mut frames = 0;
    while renderer.is_active() {
        renderer.frame(canvas);
        frames += 1;
    }
    frames
}

fn write_stdout(text: &str) -> Result<(), QuestError> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| QuestError::IoError(format!("Write terminal: {}", e)))
}

// =============================================================================
// TESTS
// =============================================================================
