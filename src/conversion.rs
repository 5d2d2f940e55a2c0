//! Mappings from raw instrument coordinates to physical units.
//!
//! * stage position → femtosecond delay ([`position_to_time`])
//! * detector pixel → wavelength in nm ([`map_wavelength`])
//! * generic proportional rescaling between two closed intervals ([`linear_map`])
//!
//! All functions are pure.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VitaraError};
use crate::units::{convert_from_wavelength, VerticalUnitKind};

/// Femtoseconds per millimetre of optical path (c ≈ 3 mm per 10⁴ fs).
pub const FS_PER_MM: f64 = 10000.0 / 3.0;

// ---------------------------------------------------------------------------
// CalibrationRate – nm per N pixels
// ---------------------------------------------------------------------------

/// Spectral calibration expressed as "`rate_nm` nanometres per `n_pixels`
/// pixels" so fractional pixel counts never appear in configuration.
///
/// Serialized as a `[rate_nm, n_pixels]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct CalibrationRate {
    pub rate_nm: f64,
    pub n_pixels: f64,
}

impl CalibrationRate {
    pub fn new(rate_nm: f64, n_pixels: f64) -> Self {
        Self { rate_nm, n_pixels }
    }

    /// Nanometres per single pixel.
    pub fn nm_per_pixel(&self) -> Result<f64> {
        if self.n_pixels == 0.0 {
            return Err(VitaraError::Domain(
                "calibration rate is defined over 0 pixels".into(),
            ));
        }
        Ok(self.rate_nm / self.n_pixels)
    }
}

impl From<(f64, f64)> for CalibrationRate {
    fn from((rate_nm, n_pixels): (f64, f64)) -> Self {
        Self { rate_nm, n_pixels }
    }
}

impl From<CalibrationRate> for (f64, f64) {
    fn from(rate: CalibrationRate) -> Self {
        (rate.rate_nm, rate.n_pixels)
    }
}

// ---------------------------------------------------------------------------
// Scalar mappings
// ---------------------------------------------------------------------------

/// Proportionally map `value` from `[old_min, old_max]` onto `[new_min, new_max]`.
///
/// The value must lie inside the old interval, otherwise
/// [`VitaraError::OutOfRange`] is returned. A collapsed old interval
/// (`old_min == old_max`) is a [`VitaraError::Domain`] error.
pub fn linear_map(
    value: f64,
    old_min: f64,
    old_max: f64,
    new_min: f64,
    new_max: f64,
) -> Result<f64> {
    // Written so that NaN fails the check.
    if !(old_min <= value && value <= old_max) {
        return Err(VitaraError::OutOfRange {
            value,
            min: old_min,
            max: old_max,
        });
    }
    let old_span = old_max - old_min;
    if old_span == 0.0 {
        return Err(VitaraError::Domain(format!(
            "cannot map from the degenerate range [{old_min}, {old_max}]"
        )));
    }
    Ok((value - old_min) * (new_max - new_min) / old_span + new_min)
}

/// Time offset in fs of stage position `position_number`.
///
/// The delay line is traversed twice, so each step adds `2 * step_length_mm`
/// of optical path.
pub fn position_to_time(position_number: i64, step_length_mm: f64) -> Result<f64> {
    if position_number < 0 {
        return Err(VitaraError::InvalidArgument(format!(
            "cannot convert negative position {position_number} to time"
        )));
    }
    let offset_length_mm = 2.0 * step_length_mm * position_number as f64;
    Ok(offset_length_mm * FS_PER_MM)
}

/// Wavelength in nm of `pixel_number`, starting at `min_wavelength_nm` for
/// pixel zero. Pixels beyond the detector extrapolate linearly; there is no
/// range check.
pub fn map_wavelength(
    pixel_number: f64,
    min_wavelength_nm: f64,
    rate: CalibrationRate,
) -> Result<f64> {
    if rate.n_pixels == 0.0 {
        return Err(VitaraError::Domain(
            "calibration rate is defined over 0 pixels".into(),
        ));
    }
    Ok(min_wavelength_nm + pixel_number * rate.rate_nm / rate.n_pixels)
}

// ---------------------------------------------------------------------------
// Whole-axis helpers
// ---------------------------------------------------------------------------

/// Delay of every position `0..positions`, in fs.
pub fn time_axis(positions: usize, step_length_mm: f64) -> Result<Vec<f64>> {
    (0..positions)
        .map(|p| position_to_time(p as i64, step_length_mm))
        .collect()
}

/// Vertical axis value of every pixel `0..pixels`, in the requested unit.
pub fn vertical_axis(
    pixels: usize,
    min_wavelength_nm: f64,
    rate: CalibrationRate,
    kind: VerticalUnitKind,
) -> Result<Vec<f64>> {
    (0..pixels)
        .map(|px| {
            let wavelength = map_wavelength(px as f64, min_wavelength_nm, rate)?;
            convert_from_wavelength(kind, wavelength)
        })
        .collect()
}
