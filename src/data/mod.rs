/// Data layer: raw spectrum parsing and the normalized intensity matrix.
///
/// Architecture:
/// ```text
///   positions            spectrum
///   (header row)         (one line / position)
///        │                    │
///        │                    ▼
///        │            ┌───────────────┐
///        │            │ SpectrumMatrix │  parse → transpose → [pixels, positions]
///        │            └───────────────┘
///        │                    │  shape check, normalize by global max
///        ▼                    ▼
///   ┌──────────────────────────────┐
///   │       IntensityMatrix         │  labels zipped by position
///   └──────────────────────────────┘
/// ```

pub mod loader;
pub mod model;

pub use loader::{read_dataset, read_spectrum_matrix, DEFAULT_SEPARATOR};
pub use model::{IntensityMatrix, SpectrumMatrix};
