//! Ingest pump-probe delay-scan spectrograms and map their raw axes (stage
//! position, detector pixel) to physical units (fs delay, nm, cm⁻¹).
//!
//! ```text
//!  positions + spectrum ──► data::read_dataset ──► IntensityMatrix [pixels, positions]
//!                                                        │
//!  TrialDescriptor ──► conversion::{position_to_time, map_wavelength}
//!                      units::convert_from_wavelength ──► axis values
//! ```

pub mod config;
pub mod conversion;
pub mod data;
pub mod error;
pub mod export;
pub mod trial;
pub mod units;

pub use config::DisplayConfig;
pub use conversion::{linear_map, map_wavelength, position_to_time, CalibrationRate};
pub use data::{
    read_dataset, read_spectrum_matrix, IntensityMatrix, SpectrumMatrix, DEFAULT_SEPARATOR,
};
pub use error::{Result, VitaraError};
pub use trial::TrialDescriptor;
pub use units::{convert_from_wavelength, kind_label, VerticalUnitKind};
