use crate::core::data::complex_point::ComplexPoint;
use crate::core::data::render_config::{FractalKind, RenderConfig};

// Unzoomed Mandelbrot window: 2.48 x 2.26 plane units, top-left at (-2.0, -1.13) from the center.
const MANDELBROT_SPAN_REAL: f64 = 2.48;
const MANDELBROT_SPAN_IMAG: f64 = 2.26;
const MANDELBROT_OFFSET_REAL: f64 = 2.0;
const MANDELBROT_OFFSET_IMAG: f64 = 1.13;

// Julia sets for |c| <= 2 fit inside [-2, 2] x [-2, 2], so the window never zooms.
const JULIA_SPAN: f64 = 4.0;
const JULIA_ORIGIN: f64 = -2.0;

/// Affine map from pixel indices to the complex plane.
///
/// `axis_scale_*` are plane units per pixel, `origin_*` is the plane coordinate of pixel `(0, 0)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlaneWindow {
    pub axis_scale_real: f64,
    pub axis_scale_imag: f64,
    pub origin_real: f64,
    pub origin_imag: f64,
}

impl PlaneWindow {
    /// Window for `kind` on a `dimension`-pixel square board.
    ///
    /// `dimension` must be at least 2; [`RenderConfig`] enforces that before calling this.
    #[must_use]
    pub fn for_kind(kind: FractalKind, dimension: usize) -> Self {
        let last_pixel = (dimension - 1) as f64;

        match kind {
            FractalKind::Mandelbrot { zoom, center } => Self {
                axis_scale_real: MANDELBROT_SPAN_REAL * zoom / last_pixel,
                axis_scale_imag: MANDELBROT_SPAN_IMAG * zoom / last_pixel,
                origin_real: center.real - MANDELBROT_OFFSET_REAL * zoom,
                origin_imag: center.imag - MANDELBROT_OFFSET_IMAG * zoom,
            },
            FractalKind::Julia { .. } => Self {
                axis_scale_real: JULIA_SPAN / last_pixel,
                axis_scale_imag: JULIA_SPAN / last_pixel,
                origin_real: JULIA_ORIGIN,
                origin_imag: JULIA_ORIGIN,
            },
        }
    }
}

/// Maps pixel `(px, py)` to its point on the complex plane.
///
/// Total for any index; callers iterate `0..dimension` on both axes.
#[inline]
#[must_use]
pub fn map_pixel(px: usize, py: usize, config: &RenderConfig) -> ComplexPoint {
    let window = config.window();

    ComplexPoint {
        real: px as f64 * window.axis_scale_real + window.origin_real,
        imag: py as f64 * window.axis_scale_imag + window.origin_imag,
    }
}
