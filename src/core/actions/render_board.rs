use std::time::Instant;

use rayon::prelude::*;

use crate::core::actions::cancellation::{CancelToken, Cancelled, NeverCancel};
use crate::core::data::board::Board;
use crate::core::data::complex_point::ORIGIN;
use crate::core::data::render_config::{FractalKind, RenderConfig};
use crate::core::errors::RenderError;
use crate::core::fractals::orbit::escape_iterations;
use crate::core::util::map_pixel::map_pixel;

/// Normalized intensity of pixel `(px, py)`: `1 - iterations / max_iterations`.
#[inline]
fn pixel_intensity(px: usize, py: usize, config: &RenderConfig) -> f64 {
    let point = map_pixel(px, py, config);
    let (z0, c) = match config.kind() {
        FractalKind::Mandelbrot { .. } => (ORIGIN, point),
        FractalKind::Julia { constant } => (point, constant),
    };

    let iterations = escape_iterations(z0, c, config.max_iterations(), config.escape_threshold());

    1.0 - f64::from(iterations) / f64::from(config.max_iterations())
}

fn render_row(py: usize, row: &mut [f64], config: &RenderConfig) {
    for (px, cell) in row.iter_mut().enumerate() {
        *cell = pixel_intensity(px, py, config);
    }
}

/// Renders a fresh board for `config`, rows in parallel.
///
/// Two calls with the same config return bit-identical boards.
/// For cancel-aware rendering, use [`render_cancelable`].
pub fn render(config: &RenderConfig) -> Result<Board, RenderError> {
    render_cancelable(config, &NeverCancel)
}

/// Like [`render`], but polls `cancel` once at the start of every row.
///
/// Returns [`RenderError::Cancelled`] if cancellation was requested; the partially
/// filled board is dropped.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(kind = config.kind().display_name(), dimension = config.dimension())
)]
pub fn render_cancelable<C: CancelToken>(
    config: &RenderConfig,
    cancel: &C,
) -> Result<Board, RenderError> {
    config.validate()?;

    let start = Instant::now();
    let dimension = config.dimension();
    let mut board = Board::new(dimension);

    // Each row is an exclusive slice of the board, so workers never share a cell.
    board
        .intensities_mut()
        .par_chunks_mut(dimension)
        .enumerate()
        .try_for_each(|(py, row)| {
            if cancel.is_cancelled() {
                return Err(Cancelled);
            }

            render_row(py, row, config);
            Ok(())
        })?;

    tracing::debug!(
        max_iterations = config.max_iterations(),
        elapsed = ?start.elapsed(),
        "board rendered"
    );

    Ok(board)
}

/// Single-threaded reference renderer. Produces exactly the same board as [`render`].
pub fn render_serial(config: &RenderConfig) -> Result<Board, RenderError> {
    config.validate()?;

    let dimension = config.dimension();
    let mut board = Board::new(dimension);

    for (py, row) in board.intensities_mut().chunks_mut(dimension).enumerate() {
        render_row(py, row, config);
    }

    Ok(board)
}
