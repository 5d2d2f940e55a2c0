use crate::error::{Result, VitaraError};

// ---------------------------------------------------------------------------
// SpectrumMatrix – raw detector readings, pixel-major
// ---------------------------------------------------------------------------

/// Unlabeled `[pixels, positions]` matrix of raw intensities.
///
/// Stored row-major with one row per pixel, so `data[pixel * positions + position]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumMatrix {
    data: Vec<f64>,
    pixels: usize,
    positions: usize,
}

impl SpectrumMatrix {
    /// Build from traces as stored on disk (one trace per position, indexed
    /// by pixel) and transpose into pixel-major orientation.
    ///
    /// All traces must have the same length; the first offender is reported
    /// with its 1-based index in `traces`.
    pub fn from_traces(traces: &[Vec<f64>]) -> Result<Self> {
        let positions = traces.len();
        let pixels = traces.first().map_or(0, Vec::len);

        for (i, trace) in traces.iter().enumerate() {
            if trace.len() != pixels {
                return Err(VitaraError::RaggedTrace {
                    line: i + 1,
                    expected: pixels,
                    found: trace.len(),
                });
            }
        }

        let mut data = vec![0.0; pixels * positions];
        for (position, trace) in traces.iter().enumerate() {
            for (pixel, &value) in trace.iter().enumerate() {
                data[pixel * positions + position] = value;
            }
        }

        Ok(SpectrumMatrix {
            data,
            pixels,
            positions,
        })
    }

    pub fn pixels(&self) -> usize {
        self.pixels
    }

    pub fn positions(&self) -> usize {
        self.positions
    }

    pub fn get(&self, pixel: usize, position: usize) -> Option<f64> {
        if pixel < self.pixels && position < self.positions {
            Some(self.data[pixel * self.positions + position])
        } else {
            None
        }
    }

    /// Largest element, or `None` for an empty matrix. NaN propagates.
    pub fn max(&self) -> Option<f64> {
        self.data.iter().copied().reduce(|a, b| {
            if a.is_nan() || b.is_nan() {
                f64::NAN
            } else {
                a.max(b)
            }
        })
    }

    /// Divide every element by the single global maximum.
    ///
    /// Per-position normalization would erase the relative intensity between
    /// delays, so this is deliberately global. The maximum must be finite
    /// and positive for the result to peak at exactly `1.0`.
    pub fn normalized(mut self) -> Result<Self> {
        if let Some(bad) = self.data.iter().find(|v| !v.is_finite()) {
            return Err(VitaraError::Domain(format!(
                "cannot normalize a spectrum containing {bad}"
            )));
        }
        let max = self
            .max()
            .ok_or_else(|| VitaraError::Domain("cannot normalize an empty spectrum".into()))?;
        if !max.is_finite() || max <= 0.0 {
            return Err(VitaraError::Domain(format!(
                "cannot normalize by global maximum {max}"
            )));
        }
        for value in &mut self.data {
            *value /= max;
        }
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// IntensityMatrix – normalized, position-labeled
// ---------------------------------------------------------------------------

/// Globally normalized `[pixels, positions]` matrix with one label per
/// position column.
///
/// # Positional-zip invariant
///
/// `labels()[i]` names column `i` because the i-th header of the positions
/// file and the i-th line of the spectrum file describe the same stage
/// position. Labels are attached by order, never matched by name; reordering
/// either file silently mislabels the data.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityMatrix {
    matrix: SpectrumMatrix,
    labels: Vec<String>,
}

impl IntensityMatrix {
    /// Normalize `raw` then attach `labels` positionally.
    pub fn from_raw(raw: SpectrumMatrix, labels: Vec<String>) -> Result<Self> {
        if labels.len() != raw.positions() {
            return Err(VitaraError::ShapeMismatch {
                positions: labels.len(),
                spectrum: raw.positions(),
            });
        }
        let matrix = raw.normalized()?;
        Ok(IntensityMatrix { matrix, labels })
    }

    pub fn pixels(&self) -> usize {
        self.matrix.pixels
    }

    pub fn positions(&self) -> usize {
        self.matrix.positions
    }

    /// `(pixels, positions)`
    pub fn shape(&self) -> (usize, usize) {
        (self.pixels(), self.positions())
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get(&self, pixel: usize, position: usize) -> Option<f64> {
        self.matrix.get(pixel, position)
    }

    /// Intensities of one pixel across all positions.
    pub fn row(&self, pixel: usize) -> Option<&[f64]> {
        if pixel >= self.pixels() {
            return None;
        }
        let start = pixel * self.positions();
        Some(&self.matrix.data[start..start + self.positions()])
    }

    /// Intensities of one position across all pixels.
    pub fn column(&self, position: usize) -> Option<Vec<f64>> {
        if position >= self.positions() {
            return None;
        }
        Some(
            self.matrix
                .data
                .iter()
                .skip(position)
                .step_by(self.positions())
                .copied()
                .collect(),
        )
    }

    pub fn column_by_label(&self, label: &str) -> Option<Vec<f64>> {
        let position = self.labels.iter().position(|l| l == label)?;
        self.column(position)
    }

    pub fn max(&self) -> Option<f64> {
        self.matrix.max()
    }

    /// Pixel-major backing storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.matrix.data
    }
}
