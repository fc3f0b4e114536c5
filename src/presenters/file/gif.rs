use std::io::Write;

use image::codecs::gif::{GifEncoder, Repeat};
use image::error::{ImageError, LimitError, LimitErrorKind};
use image::{Delay, DynamicImage, GrayImage, Luma};

use crate::core::data::board::{Board, UNRENDERED};
use crate::presenters::file::ppm::pixel_value;

/// Milliseconds each frame is shown, per frame in the sequence.
const DELAY_MS_PER_FRAME: u64 = 100;

/// A rendered frame reduced to the grey levels its PPM encodes.
#[derive(Debug, Clone, PartialEq)]
pub struct GreyFrame {
    pub name: String,
    pub image: GrayImage,
}

impl GreyFrame {
    pub fn from_board(name: impl Into<String>, board: &Board) -> Result<Self, ImageError> {
        let side = u32::try_from(board.dimension()).map_err(|_| {
            ImageError::Limits(LimitError::from_kind(LimitErrorKind::DimensionError))
        })?;

        let image = GrayImage::from_fn(side, side, |x, y| {
            let intensity = board.get(y as usize, x as usize).unwrap_or(UNRENDERED);
            Luma([pixel_value(intensity)])
        });

        Ok(Self {
            name: name.into(),
            image,
        })
    }
}

/// Encodes `frames` as a looping GIF that plays forward and then backward.
///
/// Frames are ordered by name first, so the result does not depend on render order.
/// Each frame stays up for `frames.len() / 10` seconds. Returns the number of GIF
/// frames written, twice the input count.
pub fn write_gif<W: Write>(frames: &[GreyFrame], out: W) -> Result<usize, ImageError> {
    let mut ordered: Vec<&GreyFrame> = frames.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));

    let delay_ms = u32::try_from(frames.len() as u64 * DELAY_MS_PER_FRAME).unwrap_or(u32::MAX);
    let delay = Delay::from_numer_denom_ms(delay_ms, 1);

    let sequence: Vec<&GreyFrame> = ordered
        .iter()
        .chain(ordered.iter().rev())
        .copied()
        .collect();

    let mut encoder = GifEncoder::new(out);
    encoder.set_repeat(Repeat::Infinite)?;
    encoder.encode_frames(sequence.iter().map(|frame| {
        let rgba = DynamicImage::ImageLuma8(frame.image.clone()).into_rgba8();
        image::Frame::from_parts(rgba, 0, 0, delay)
    }))?;

    tracing::debug!(frames = sequence.len(), delay_ms, "gif encoded");

    Ok(sequence.len())
}
