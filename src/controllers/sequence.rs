use std::time::Instant;

use crate::controllers::ports::output_sink::OutputSink;
use crate::core::actions::cancellation::{CancelToken, Cancelled};
use crate::core::actions::render_board::render_cancelable;
use crate::core::data::board::Board;
use crate::core::data::complex_point::ComplexPoint;
use crate::core::data::render_config::RenderConfig;
use crate::core::errors::RenderError;
use crate::presenters::file::gif::GreyFrame;
use crate::presenters::file::ppm::serialize;

pub const DEFAULT_SEQUENCE_DIMENSION: usize = 300;
pub const DEFAULT_ZOOM_DIRECTORY: &str = "mandelbrot_set";
pub const DEFAULT_SWEEP_DIRECTORY: &str = "julia_set";

/// Upper bound on the frames one sequence may describe.
pub const MAX_SEQUENCE_FRAMES: usize = 100_000;

/// A point worth zooming into near the seahorse valley.
pub const DEFAULT_ZOOM_CENTER: ComplexPoint = ComplexPoint::new(-0.7004, -0.1);

#[derive(thiserror::Error, Debug)]
pub enum SequenceError {
    #[error("step must be positive and finite, got {step}")]
    InvalidStep { step: f64 },

    #[error("start zoom {start} must not be below end zoom {end}")]
    InvalidRange { start: f64, end: f64 },

    #[error("sequence would exceed {limit} frames")]
    TooManyFrames { limit: usize },

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("gif error: {0}")]
    Gif(#[from] image::ImageError),

    #[error("failed to write frame '{name}'")]
    Write {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<Cancelled> for SequenceError {
    fn from(cancelled: Cancelled) -> Self {
        Self::Render(RenderError::Cancelled(cancelled))
    }
}

/// One render of a sequence and the name its image is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub name: String,
    pub config: RenderConfig,
}

/// Mandelbrot frames at shrinking zoom factors around a fixed center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSequence {
    pub dimension: usize,
    pub start_zoom: f64,
    pub end_zoom: f64,
    pub step: f64,
    pub center: ComplexPoint,
    pub max_iterations: Option<u32>,
}

impl Default for ZoomSequence {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_SEQUENCE_DIMENSION,
            start_zoom: 1.0,
            end_zoom: 0.1,
            step: 0.05,
            center: DEFAULT_ZOOM_CENTER,
            max_iterations: None,
        }
    }
}

impl ZoomSequence {
    /// Zoom factors `start, start - step, ...` down to `end` inclusive.
    ///
    /// The factor is decremented repeatedly rather than computed as `start - i * step`,
    /// so frame names follow the accumulated value. A step too small to change the
    /// factor is a [`SequenceError::InvalidStep`]; more than [`MAX_SEQUENCE_FRAMES`]
    /// factors is [`SequenceError::TooManyFrames`].
    pub fn zoom_factors(&self) -> Result<Vec<f64>, SequenceError> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(SequenceError::InvalidStep { step: self.step });
        }

        if self.start_zoom < self.end_zoom {
            return Err(SequenceError::InvalidRange {
                start: self.start_zoom,
                end: self.end_zoom,
            });
        }

        let mut factors = Vec::new();
        let mut zoom = self.start_zoom;
        while zoom >= self.end_zoom {
            if factors.len() == MAX_SEQUENCE_FRAMES {
                return Err(SequenceError::TooManyFrames {
                    limit: MAX_SEQUENCE_FRAMES,
                });
            }
            factors.push(zoom);

            let next = zoom - self.step;
            if next >= zoom {
                return Err(SequenceError::InvalidStep { step: self.step });
            }
            zoom = next;
        }

        Ok(factors)
    }

    pub fn frames(&self) -> Result<Vec<Frame>, SequenceError> {
        self.zoom_factors()?
            .into_iter()
            .map(|zoom| -> Result<Frame, SequenceError> {
                let config = RenderConfig::mandelbrot(self.dimension, zoom, self.center)?;
                Ok(Frame {
                    name: format!("output_scaling_{zoom:.6}.ppm"),
                    config: apply_max_iterations(config, self.max_iterations)?,
                })
            })
            .collect()
    }
}

/// Julia frames whose constant walks the diagonal `(i * step, -i * step)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JuliaSweep {
    pub dimension: usize,
    pub frames: usize,
    pub step: f64,
    pub max_iterations: Option<u32>,
}

impl Default for JuliaSweep {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_SEQUENCE_DIMENSION,
            frames: 10,
            step: 0.1,
            max_iterations: None,
        }
    }
}

impl JuliaSweep {
    #[must_use]
    pub fn constant(&self, index: usize) -> ComplexPoint {
        let offset = index as f64 * self.step;
        ComplexPoint::new(0.0 + offset, 0.0 - offset)
    }

    pub fn frames(&self) -> Result<Vec<Frame>, SequenceError> {
        if !self.step.is_finite() {
            return Err(SequenceError::InvalidStep { step: self.step });
        }

        if self.frames > MAX_SEQUENCE_FRAMES {
            return Err(SequenceError::TooManyFrames {
                limit: MAX_SEQUENCE_FRAMES,
            });
        }

        (0..self.frames)
            .map(|index| -> Result<Frame, SequenceError> {
                let constant = self.constant(index);
                let config = RenderConfig::julia(self.dimension, constant)?;
                Ok(Frame {
                    name: format!("{:.6}_{:.6}.ppm", constant.real, constant.imag),
                    config: apply_max_iterations(config, self.max_iterations)?,
                })
            })
            .collect()
    }
}

fn apply_max_iterations(
    config: RenderConfig,
    max_iterations: Option<u32>,
) -> Result<RenderConfig, RenderError> {
    match max_iterations {
        Some(max_iterations) => config.with_max_iterations(max_iterations),
        None => Ok(config),
    }
}

/// Renders `frames` one after another and hands each image to `sink`.
///
/// Only one board is alive at a time. `cancel` is checked before every frame and on every
/// row inside a render. Returns the number of frames written.
pub fn run_sequence<S, C>(frames: &[Frame], sink: &mut S, cancel: &C) -> Result<usize, SequenceError>
where
    S: OutputSink,
    C: CancelToken,
{
    run_frames(frames, sink, cancel, |_, _| Ok(()))
}

/// Like [`run_sequence`], and also keeps every frame's grey levels for
/// [`write_gif`](crate::write_gif).
pub fn run_animation<S, C>(
    frames: &[Frame],
    sink: &mut S,
    cancel: &C,
) -> Result<Vec<GreyFrame>, SequenceError>
where
    S: OutputSink,
    C: CancelToken,
{
    let mut grey_frames = Vec::with_capacity(frames.len());

    run_frames(frames, sink, cancel, |frame, board| {
        grey_frames.push(GreyFrame::from_board(frame.name.clone(), board)?);
        Ok(())
    })?;

    Ok(grey_frames)
}

fn run_frames<S, C, F>(
    frames: &[Frame],
    sink: &mut S,
    cancel: &C,
    mut on_board: F,
) -> Result<usize, SequenceError>
where
    S: OutputSink,
    C: CancelToken,
    F: FnMut(&Frame, &Board) -> Result<(), SequenceError>,
{
    let start = Instant::now();

    for (index, frame) in frames.iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(Cancelled.into());
        }

        let board = render_cancelable(&frame.config, cancel)?;
        let bytes = serialize(&board);
        on_board(frame, &board)?;
        drop(board);

        sink.accept(&frame.name, &bytes)
            .map_err(|source| SequenceError::Write {
                name: frame.name.clone(),
                source,
            })?;

        tracing::info!(
            frame = index + 1,
            total = frames.len(),
            name = %frame.name,
            "frame written"
        );
    }

    tracing::info!(frames = frames.len(), elapsed = ?start.elapsed(), "sequence complete");

    Ok(frames.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::ports::output_sink::MemorySink;
    use crate::core::actions::cancellation::NeverCancel;
    use crate::core::actions::render_board::render;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RejectingSink;

    impl OutputSink for RejectingSink {
        fn accept(&mut self, _: &str, _: &[u8]) -> std::io::Result<()> {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            ))
        }
    }

    #[test]
    fn test_default_zoom_sequence_frame_names() {
        let frames = ZoomSequence::default().frames().unwrap();

        assert_eq!(frames.first().unwrap().name, "output_scaling_1.000000.ppm");
        assert_eq!(frames[1].name, "output_scaling_0.950000.ppm");
        assert!(frames.iter().all(|f| f.config.dimension() == 300));
    }

    #[test]
    fn test_zoom_factors_accumulate_down_to_end() {
        let sequence = ZoomSequence {
            start_zoom: 1.0,
            end_zoom: 0.5,
            step: 0.25,
            ..ZoomSequence::default()
        };

        assert_eq!(sequence.zoom_factors().unwrap(), vec![1.0, 0.75, 0.5]);
    }

    #[test]
    fn test_zoom_step_must_be_positive() {
        let sequence = ZoomSequence {
            step: 0.0,
            ..ZoomSequence::default()
        };

        assert!(matches!(
            sequence.frames(),
            Err(SequenceError::InvalidStep { .. })
        ));
    }

    #[test]
    fn test_zoom_step_lost_to_rounding_is_rejected() {
        let sequence = ZoomSequence {
            start_zoom: 1e17,
            end_zoom: 0.0,
            step: 1.0,
            ..ZoomSequence::default()
        };

        assert!(matches!(
            sequence.zoom_factors(),
            Err(SequenceError::InvalidStep { step }) if step == 1.0
        ));
    }

    #[test]
    fn test_zoom_sequence_frame_count_is_capped() {
        let sequence = ZoomSequence {
            step: 1e-12,
            ..ZoomSequence::default()
        };

        assert!(matches!(
            sequence.zoom_factors(),
            Err(SequenceError::TooManyFrames {
                limit: MAX_SEQUENCE_FRAMES
            })
        ));
    }

    #[test]
    fn test_julia_sweep_frame_count_is_capped() {
        let sweep = JuliaSweep {
            frames: MAX_SEQUENCE_FRAMES + 1,
            ..JuliaSweep::default()
        };

        assert!(matches!(
            sweep.frames(),
            Err(SequenceError::TooManyFrames { .. })
        ));
    }

    #[test]
    fn test_zoom_range_must_descend() {
        let sequence = ZoomSequence {
            start_zoom: 0.1,
            end_zoom: 1.0,
            ..ZoomSequence::default()
        };

        assert!(matches!(
            sequence.frames(),
            Err(SequenceError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_julia_sweep_walks_diagonal() {
        let sweep = JuliaSweep {
            frames: 3,
            step: 0.5,
            ..JuliaSweep::default()
        };
        let frames = sweep.frames().unwrap();

        let names: Vec<&str> = frames.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "0.000000_0.000000.ppm",
                "0.500000_-0.500000.ppm",
                "1.000000_-1.000000.ppm"
            ]
        );
        assert_eq!(sweep.constant(2), ComplexPoint::new(1.0, -1.0));
    }

    #[test]
    fn test_invalid_dimension_surfaces_as_render_error() {
        let sweep = JuliaSweep {
            dimension: 1,
            ..JuliaSweep::default()
        };

        assert!(matches!(
            sweep.frames(),
            Err(SequenceError::Render(RenderError::InvalidDimension { dimension: 1 }))
        ));
    }

    #[test]
    fn test_max_iterations_override_applies_to_every_frame() {
        let sweep = JuliaSweep {
            frames: 2,
            max_iterations: Some(7),
            ..JuliaSweep::default()
        };

        let frames = sweep.frames().unwrap();

        assert!(frames.iter().all(|f| f.config.max_iterations() == 7));
    }

    #[test]
    fn test_run_sequence_writes_every_frame_in_order() {
        let sweep = JuliaSweep {
            dimension: 8,
            frames: 3,
            ..JuliaSweep::default()
        };
        let frames = sweep.frames().unwrap();
        let mut sink = MemorySink::new();

        let written = run_sequence(&frames, &mut sink, &NeverCancel).unwrap();

        assert_eq!(written, 3);
        assert_eq!(
            sink.names(),
            frames.iter().map(|f| f.name.as_str()).collect::<Vec<_>>()
        );
        let expected = serialize(&render(&frames[2].config).unwrap());
        assert_eq!(sink.frames()[2].1, expected);
    }

    #[test]
    fn test_run_animation_keeps_frames_and_writes_files() {
        let frames = JuliaSweep {
            dimension: 6,
            frames: 3,
            ..JuliaSweep::default()
        }
        .frames()
        .unwrap();
        let mut sink = MemorySink::new();

        let grey_frames = run_animation(&frames, &mut sink, &NeverCancel).unwrap();

        assert_eq!(sink.frames().len(), 3);
        assert_eq!(grey_frames.len(), 3);
        assert_eq!(grey_frames[1].name, frames[1].name);
        let board = render(&frames[1].config).unwrap();
        assert_eq!(grey_frames[1], GreyFrame::from_board(&frames[1].name, &board).unwrap());
    }

    #[test]
    fn test_run_sequence_stops_when_cancelled() {
        let frames = JuliaSweep {
            dimension: 4,
            frames: 5,
            ..JuliaSweep::default()
        }
        .frames()
        .unwrap();
        let polls = AtomicUsize::new(0);
        // Allow the first frame check and its four row checks, then cancel.
        let cancel_token = || polls.fetch_add(1, Ordering::SeqCst) >= 5;
        let mut sink = MemorySink::new();

        let result = run_sequence(&frames, &mut sink, &cancel_token);

        assert!(matches!(
            result,
            Err(SequenceError::Render(RenderError::Cancelled(_)))
        ));
        assert_eq!(sink.frames().len(), 1);
    }

    #[test]
    fn test_run_sequence_reports_failing_sink() {
        let frames = JuliaSweep {
            dimension: 4,
            frames: 2,
            ..JuliaSweep::default()
        }
        .frames()
        .unwrap();

        let result = run_sequence(&frames, &mut RejectingSink, &NeverCancel);

        match result {
            Err(SequenceError::Write { name, source }) => {
                assert_eq!(name, "0.000000_0.000000.ppm");
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected write error, got {other:?}"),
        }
    }
}
