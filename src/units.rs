use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, VitaraError};

/// Centimetres per nanometre.
const CM_PER_NM: f64 = 1e-7;

// ---------------------------------------------------------------------------
// VerticalUnitKind – how the pixel-derived wavelength axis is displayed
// ---------------------------------------------------------------------------

/// The closed set of vertical-axis units. Anything outside it is rejected
/// when the value is constructed (`FromStr`, `TryFrom<i64>`, serde).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalUnitKind {
    #[default]
    Wavelength,
    Wavenumber,
}

impl VerticalUnitKind {
    pub fn label(self) -> &'static str {
        kind_label(self)
    }
}

/// Fixed display label for each unit kind.
pub fn kind_label(kind: VerticalUnitKind) -> &'static str {
    match kind {
        VerticalUnitKind::Wavelength => "Wavelength (nm)",
        VerticalUnitKind::Wavenumber => "Frequency (cm⁻¹)",
    }
}

/// Convert a wavelength in nm into the requested unit.
///
/// Wavenumber is `1 / λ[cm]`, so a zero wavelength is a [`VitaraError::Domain`]
/// error rather than an infinity.
pub fn convert_from_wavelength(kind: VerticalUnitKind, wavelength_nm: f64) -> Result<f64> {
    match kind {
        VerticalUnitKind::Wavelength => Ok(wavelength_nm),
        VerticalUnitKind::Wavenumber => {
            if wavelength_nm == 0.0 {
                return Err(VitaraError::Domain(
                    "cannot convert a wavelength of 0 nm to wavenumber".into(),
                ));
            }
            Ok(1.0 / (wavelength_nm * CM_PER_NM))
        }
    }
}

impl fmt::Display for VerticalUnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VerticalUnitKind {
    type Err = VitaraError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wavelength" => Ok(VerticalUnitKind::Wavelength),
            "wavenumber" => Ok(VerticalUnitKind::Wavenumber),
            _ => Err(VitaraError::InvalidUnitKind(s.to_string())),
        }
    }
}

/// Numeric codes used by older trial files.
impl TryFrom<i64> for VerticalUnitKind {
    type Error = VitaraError;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            1 => Ok(VerticalUnitKind::Wavelength),
            2 => Ok(VerticalUnitKind::Wavenumber),
            other => Err(VitaraError::InvalidUnitKind(other.to_string())),
        }
    }
}

// -- serde: accept either the name or the numeric code --

/// A unit kind as written in a file, before it is checked against the
/// closed set.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawUnitKind {
    Name(String),
    Code(i64),
}

impl RawUnitKind {
    pub(crate) fn into_kind(self) -> Result<VerticalUnitKind> {
        match self {
            RawUnitKind::Name(name) => name.parse(),
            RawUnitKind::Code(code) => VerticalUnitKind::try_from(code),
        }
    }
}

impl<'de> Deserialize<'de> for VerticalUnitKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        RawUnitKind::deserialize(deserializer)?
            .into_kind()
            .map_err(serde::de::Error::custom)
    }
}

impl Serialize for VerticalUnitKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let name = match self {
            VerticalUnitKind::Wavelength => "wavelength",
            VerticalUnitKind::Wavenumber => "wavenumber",
        };
        serializer.serialize_str(name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(kind_label(VerticalUnitKind::Wavelength), "Wavelength (nm)");
        assert_eq!(VerticalUnitKind::Wavenumber.to_string(), "Frequency (cm⁻¹)");
    }

    #[test]
    fn test_wavelength_is_identity() {
        for x in [0.0, -3.5, 1e-9, 500.0, 1e12] {
            let y = convert_from_wavelength(VerticalUnitKind::Wavelength, x).unwrap();
            assert_eq!(y, x);
        }
    }

    #[test]
    fn test_wavenumber_conversion() {
        let k = convert_from_wavelength(VerticalUnitKind::Wavenumber, 500.0).unwrap();
        assert!((k - 20000.0).abs() < 1e-6, "{k}");
        let k = convert_from_wavelength(VerticalUnitKind::Wavenumber, 800.0).unwrap();
        assert!((k - 12500.0).abs() < 1e-6, "{k}");
    }

    #[test]
    fn test_wavenumber_rejects_zero() {
        let err = convert_from_wavelength(VerticalUnitKind::Wavenumber, 0.0).unwrap_err();
        assert!(matches!(err, VitaraError::Domain(_)));
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(
            "Wavenumber".parse::<VerticalUnitKind>().unwrap(),
            VerticalUnitKind::Wavenumber
        );
        assert_eq!(
            VerticalUnitKind::try_from(1).unwrap(),
            VerticalUnitKind::Wavelength
        );
        assert!(matches!(
            "frequency".parse::<VerticalUnitKind>(),
            Err(VitaraError::InvalidUnitKind(_))
        ));
        assert!(matches!(
            VerticalUnitKind::try_from(3),
            Err(VitaraError::InvalidUnitKind(_))
        ));
    }

    #[test]
    fn test_serde_kind() {
        let kind: VerticalUnitKind = serde_json::from_str("\"wavenumber\"").unwrap();
        assert_eq!(kind, VerticalUnitKind::Wavenumber);
        let kind: VerticalUnitKind = serde_json::from_str("1").unwrap();
        assert_eq!(kind, VerticalUnitKind::Wavelength);
        assert!(serde_json::from_str::<VerticalUnitKind>("7").is_err());
        assert_eq!(
            serde_json::to_string(&VerticalUnitKind::Wavenumber).unwrap(),
            "\"wavenumber\""
        );
    }
}
