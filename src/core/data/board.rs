/// Intensity value of a pixel that has not been rendered yet (plain white).
pub const UNRENDERED: f64 = 1.0;

/// A square grid of normalized intensities in `[0.0, 1.0]`, stored row-major.
///
/// The cell at `(row, col)` lives at index `row * dimension + col`. A new board is
/// filled with [`UNRENDERED`]; the renderer overwrites every cell before handing it out.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    dimension: usize,
    intensities: Vec<f64>,
}

impl Board {
    /// # Panics
    ///
    /// Panics if `dimension²` cells cannot be allocated. [`RenderConfig`] rejects such
    /// dimensions up front.
    ///
    /// [`RenderConfig`]: crate::RenderConfig
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            intensities: vec![UNRENDERED; dimension.saturating_mul(dimension)],
        }
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.intensities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intensities.is_empty()
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.dimension || col >= self.dimension {
            return None;
        }

        Some(self.intensities[row * self.dimension + col])
    }

    #[must_use]
    pub fn rows(&self) -> std::slice::ChunksExact<'_, f64> {
        self.intensities.chunks_exact(self.dimension.max(1))
    }

    pub(crate) fn intensities_mut(&mut self) -> &mut [f64] {
        &mut self.intensities
    }
}
