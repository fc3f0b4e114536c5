use std::io::Write;
use std::sync::LazyLock;

use crate::core::data::board::Board;

/// Largest channel value written in the header.
pub const MAX_CHANNEL: u8 = 255;

/// Widest encoded cell, `"255 255 255 "`.
const MAX_CELL_BYTES: usize = 12;

/// `"v v v "` for every grey level, indexed by level.
static CELLS: LazyLock<Vec<String>> = LazyLock::new(|| {
    (0..=MAX_CHANNEL)
        .map(|v| format!("{v} {v} {v} "))
        .collect()
});

fn encoded_cell(level: u8) -> &'static str {
    &CELLS[usize::from(level)]
}

/// Converts an intensity to a grey level by truncating `intensity * 255` toward zero.
#[inline]
#[must_use]
pub fn pixel_value(intensity: f64) -> u8 {
    // NaN saturates to 0 under `as`.
    (intensity * f64::from(MAX_CHANNEL)).clamp(0.0, f64::from(MAX_CHANNEL)) as u8
}

/// Encodes `board` as a plain-text (P3) PPM image.
///
/// Every cell becomes an `"v v v "` triplet and every row ends with a newline.
#[must_use]
pub fn serialize(board: &Board) -> Vec<u8> {
    let dimension = board.dimension();
    let body = dimension
        .saturating_mul(MAX_CELL_BYTES)
        .saturating_add(1)
        .saturating_mul(dimension);
    let mut bytes = Vec::with_capacity(body);

    // Writing into a Vec cannot fail.
    let _ = writeln!(bytes, "P3");
    let _ = writeln!(bytes, "{dimension} {dimension}");
    let _ = writeln!(bytes, "{MAX_CHANNEL}");

    for row in board.rows() {
        for &intensity in row {
            bytes.extend_from_slice(encoded_cell(pixel_value(intensity)).as_bytes());
        }
        bytes.push(b'\n');
    }

    bytes
}

/// Serializes `board` and hands the bytes to `out` in a single `write_all`.
///
/// I/O errors are returned as-is. A sink that fails part way may already hold a
/// truncated image; callers needing all-or-nothing output should write to a
/// temporary location and rename.
pub fn write_ppm<W: Write>(board: &Board, out: &mut W) -> std::io::Result<()> {
    out.write_all(&serialize(board))?;
    out.flush()
}
