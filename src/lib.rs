//! Escape-time fractal rendering: Mandelbrot and Julia sets as grayscale PPM images.
//!
//! A [`RenderConfig`] describes one image. [`render`] turns it into a [`Board`] of
//! normalized intensities and [`serialize`] encodes that board as a P3 PPM. Batches of
//! frames go through [`run_sequence`] into any [`OutputSink`]; [`run_animation`] also keeps
//! the frames so [`write_gif`] can loop them as an animated GIF.

mod controllers;
mod core;
mod presenters;
mod storage;

pub use crate::controllers::ports::output_sink::{MemorySink, OutputSink};
pub use crate::controllers::sequence::{
    DEFAULT_SEQUENCE_DIMENSION, DEFAULT_SWEEP_DIRECTORY, DEFAULT_ZOOM_CENTER,
    DEFAULT_ZOOM_DIRECTORY, Frame, JuliaSweep, MAX_SEQUENCE_FRAMES, SequenceError, ZoomSequence,
    run_animation, run_sequence,
};
pub use crate::core::actions::cancellation::{CancelToken, Cancelled, NeverCancel};
pub use crate::core::actions::render_board::{render, render_cancelable, render_serial};
pub use crate::core::data::board::{Board, UNRENDERED};
pub use crate::core::data::complex_point::{ComplexPoint, ORIGIN};
pub use crate::core::data::render_config::{
    DEFAULT_ESCAPE_THRESHOLD, DEFAULT_JULIA_CONSTANT, DEFAULT_JULIA_MAX_ITERATIONS,
    DEFAULT_MANDELBROT_MAX_ITERATIONS, FractalKind, MIN_DIMENSION, RenderConfig,
};
pub use crate::core::errors::RenderError;
pub use crate::core::fractals::orbit::escape_iterations;
pub use crate::core::util::map_pixel::{PlaneWindow, map_pixel};
pub use crate::presenters::file::gif::{GreyFrame, write_gif};
pub use crate::presenters::file::ppm::{MAX_CHANNEL, pixel_value, serialize, write_ppm};
pub use crate::storage::directory_sink::DirectorySink;
