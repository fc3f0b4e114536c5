use crate::core::data::complex_point::{ComplexPoint, ORIGIN};
use crate::core::errors::RenderError;
use crate::core::util::map_pixel::PlaneWindow;

/// Squared-modulus escape bound, i.e. escape radius 2.
pub const DEFAULT_ESCAPE_THRESHOLD: f64 = 4.0;
pub const DEFAULT_MANDELBROT_MAX_ITERATIONS: u32 = 300;
pub const DEFAULT_JULIA_MAX_ITERATIONS: u32 = 100;
pub const DEFAULT_JULIA_CONSTANT: ComplexPoint = ComplexPoint::new(0.3, -0.45);
pub const MIN_DIMENSION: usize = 2;

/// Widest encoded cell, `"255 255 255 "`.
const MAX_ENCODED_CELL_BYTES: usize = 12;

/// True when `dimension` is at least [`MIN_DIMENSION`] and both the board
/// (`dimension²` cells) and its encoded image fit in `usize`.
fn dimension_is_addressable(dimension: usize) -> bool {
    dimension >= MIN_DIMENSION
        && dimension
            .checked_mul(MAX_ENCODED_CELL_BYTES)
            .and_then(|row| row.checked_add(1))
            .and_then(|row| row.checked_mul(dimension))
            .is_some()
}

fn threshold_is_valid(threshold: f64) -> bool {
    threshold.is_finite() && threshold > 0.0
}

/// Which argument of the orbit varies per pixel, plus the data that shapes the plane window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FractalKind {
    /// `c` varies per pixel, `z0` is the origin. `zoom` multiplies the window size.
    Mandelbrot { zoom: f64, center: ComplexPoint },
    /// `z0` varies per pixel, `c` is fixed.
    Julia { constant: ComplexPoint },
}

impl Default for FractalKind {
    fn default() -> Self {
        Self::Mandelbrot {
            zoom: 1.0,
            center: ORIGIN,
        }
    }
}

impl FractalKind {
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Mandelbrot { .. } => "Mandelbrot",
            Self::Julia { .. } => "Julia",
        }
    }

    #[must_use]
    pub const fn default_max_iterations(self) -> u32 {
        match self {
            Self::Mandelbrot { .. } => DEFAULT_MANDELBROT_MAX_ITERATIONS,
            Self::Julia { .. } => DEFAULT_JULIA_MAX_ITERATIONS,
        }
    }
}

/// Everything a single render needs. Only constructible through validating constructors.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderConfig {
    dimension: usize,
    kind: FractalKind,
    window: PlaneWindow,
    max_iterations: u32,
    escape_threshold: f64,
}

impl RenderConfig {
    pub fn new(dimension: usize, kind: FractalKind) -> Result<Self, RenderError> {
        if !dimension_is_addressable(dimension) {
            return Err(RenderError::InvalidDimension { dimension });
        }

        Ok(Self {
            dimension,
            kind,
            window: PlaneWindow::for_kind(kind, dimension),
            max_iterations: kind.default_max_iterations(),
            escape_threshold: DEFAULT_ESCAPE_THRESHOLD,
        })
    }

    pub fn mandelbrot(
        dimension: usize,
        zoom: f64,
        center: ComplexPoint,
    ) -> Result<Self, RenderError> {
        Self::new(dimension, FractalKind::Mandelbrot { zoom, center })
    }

    pub fn julia(dimension: usize, constant: ComplexPoint) -> Result<Self, RenderError> {
        Self::new(dimension, FractalKind::Julia { constant })
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Result<Self, RenderError> {
        if max_iterations == 0 {
            return Err(RenderError::ZeroMaxIterations);
        }

        self.max_iterations = max_iterations;
        Ok(self)
    }

    pub fn with_escape_threshold(mut self, escape_threshold: f64) -> Result<Self, RenderError> {
        if !threshold_is_valid(escape_threshold) {
            return Err(RenderError::InvalidEscapeThreshold {
                threshold: escape_threshold,
            });
        }

        self.escape_threshold = escape_threshold;
        Ok(self)
    }

    /// Re-checks the invariants the constructors establish.
    pub fn validate(&self) -> Result<(), RenderError> {
        if !dimension_is_addressable(self.dimension) {
            return Err(RenderError::InvalidDimension {
                dimension: self.dimension,
            });
        }

        if self.max_iterations == 0 {
            return Err(RenderError::ZeroMaxIterations);
        }

        if !threshold_is_valid(self.escape_threshold) {
            return Err(RenderError::InvalidEscapeThreshold {
                threshold: self.escape_threshold,
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn kind(&self) -> FractalKind {
        self.kind
    }

    #[must_use]
    pub fn window(&self) -> PlaneWindow {
        self.window
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    #[must_use]
    pub fn escape_threshold(&self) -> f64 {
        self.escape_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_below_two_is_rejected() {
        assert_eq!(
            RenderConfig::mandelbrot(1, 1.0, ORIGIN),
            Err(RenderError::InvalidDimension { dimension: 1 })
        );
        assert_eq!(
            RenderConfig::julia(0, DEFAULT_JULIA_CONSTANT),
            Err(RenderError::InvalidDimension { dimension: 0 })
        );
    }

    #[test]
    fn test_smallest_dimension_is_accepted() {
        let config = RenderConfig::julia(MIN_DIMENSION, DEFAULT_JULIA_CONSTANT).unwrap();

        assert_eq!(config.dimension(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dimension_whose_board_would_overflow_is_rejected() {
        let huge = 1usize << (usize::BITS / 2);

        assert_eq!(
            RenderConfig::julia(huge, DEFAULT_JULIA_CONSTANT),
            Err(RenderError::InvalidDimension { dimension: huge })
        );
        assert_eq!(
            RenderConfig::mandelbrot(usize::MAX, 1.0, ORIGIN),
            Err(RenderError::InvalidDimension {
                dimension: usize::MAX
            })
        );
    }

    #[test]
    fn test_unusable_escape_thresholds_are_rejected() {
        let config = RenderConfig::julia(10, DEFAULT_JULIA_CONSTANT).unwrap();

        for threshold in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.0, -4.0] {
            assert!(matches!(
                config.with_escape_threshold(threshold),
                Err(RenderError::InvalidEscapeThreshold { .. })
            ));
        }
        assert_eq!(config.escape_threshold(), DEFAULT_ESCAPE_THRESHOLD);
    }

    #[test]
    fn test_zero_max_iterations_is_rejected() {
        let result = RenderConfig::mandelbrot(10, 1.0, ORIGIN)
            .unwrap()
            .with_max_iterations(0);

        assert_eq!(result, Err(RenderError::ZeroMaxIterations));
    }

    #[test]
    fn test_defaults_depend_on_kind() {
        let mandelbrot = RenderConfig::mandelbrot(10, 1.0, ORIGIN).unwrap();
        let julia = RenderConfig::julia(10, DEFAULT_JULIA_CONSTANT).unwrap();

        assert_eq!(mandelbrot.max_iterations(), 300);
        assert_eq!(julia.max_iterations(), 100);
        assert_eq!(mandelbrot.escape_threshold(), 4.0);
        assert_eq!(julia.escape_threshold(), 4.0);
    }

    #[test]
    fn test_overrides_are_kept() {
        let config = RenderConfig::julia(10, DEFAULT_JULIA_CONSTANT)
            .unwrap()
            .with_max_iterations(42)
            .unwrap()
            .with_escape_threshold(16.0)
            .unwrap();

        assert_eq!(config.max_iterations(), 42);
        assert_eq!(config.escape_threshold(), 16.0);
    }

    #[test]
    fn test_default_kind_is_unzoomed_mandelbrot() {
        assert_eq!(
            FractalKind::default(),
            FractalKind::Mandelbrot {
                zoom: 1.0,
                center: ORIGIN
            }
        );
        assert_eq!(FractalKind::default().display_name(), "Mandelbrot");
    }
}
