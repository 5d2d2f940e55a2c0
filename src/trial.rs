use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::conversion::{self, CalibrationRate};
use crate::error::{Result, VitaraError};
use crate::units::{kind_label, RawUnitKind, VerticalUnitKind};

pub const DEFAULT_CMAP: &str = "magma";

// ---------------------------------------------------------------------------
// TrialDescriptor – calibration and labeling for one trial
// ---------------------------------------------------------------------------

/// Everything needed to turn a trial's matrices into physical axes.
///
/// Immutable once built; construct it with [`TrialDescriptor::builder`] or
/// from a JSON trial file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialDescriptor {
    folder_names: Vec<PathBuf>,
    step_size_mm: f64,
    figure_x_label: String,
    figure_title: String,
    min_wavelength_nm: f64,
    wavelength_per_n_pixels: CalibrationRate,
    x_tick_rate: u32,
    y_tick_rate: u32,
    vertical_units: VerticalUnitKind,
    cmap: String,
}

impl TrialDescriptor {
    pub fn builder(folder: impl Into<PathBuf>) -> TrialDescriptorBuilder {
        TrialDescriptorBuilder::new(folder)
    }

    /// Parse a JSON trial file. Relative folder names are taken relative to
    /// the directory containing the file.
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| VitaraError::io(path, e))?;
        let mut file: TrialFile = serde_json::from_str(&text)?;
        if let Some(base) = path.parent() {
            for folder in &mut file.folder_names {
                if folder.is_relative() {
                    *folder = base.join(&*folder);
                }
            }
        }
        file.into_descriptor()
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let file: TrialFile = serde_json::from_str(text)?;
        file.into_descriptor()
    }

    pub fn folder_names(&self) -> &[PathBuf] {
        &self.folder_names
    }

    pub fn step_size_mm(&self) -> f64 {
        self.step_size_mm
    }

    pub fn figure_x_label(&self) -> &str {
        &self.figure_x_label
    }

    pub fn figure_title(&self) -> &str {
        &self.figure_title
    }

    pub fn min_wavelength_nm(&self) -> f64 {
        self.min_wavelength_nm
    }

    pub fn wavelength_per_n_pixels(&self) -> CalibrationRate {
        self.wavelength_per_n_pixels
    }

    pub fn x_tick_rate(&self) -> u32 {
        self.x_tick_rate
    }

    pub fn y_tick_rate(&self) -> u32 {
        self.y_tick_rate
    }

    pub fn vertical_units(&self) -> VerticalUnitKind {
        self.vertical_units
    }

    pub fn cmap(&self) -> &str {
        &self.cmap
    }

    pub fn vertical_label(&self) -> &'static str {
        kind_label(self.vertical_units)
    }

    /// Delay in fs of each of `positions` stage positions.
    pub fn time_axis(&self, positions: usize) -> Result<Vec<f64>> {
        conversion::time_axis(positions, self.step_size_mm)
    }

    /// Vertical-axis value of each of `pixels` detector pixels, in the
    /// trial's selected unit.
    pub fn vertical_axis(&self, pixels: usize) -> Result<Vec<f64>> {
        conversion::vertical_axis(
            pixels,
            self.min_wavelength_nm,
            self.wavelength_per_n_pixels,
            self.vertical_units,
        )
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TrialDescriptorBuilder {
    folder_names: Vec<PathBuf>,
    step_size_mm: f64,
    figure_x_label: String,
    figure_title: String,
    min_wavelength_nm: f64,
    wavelength_per_n_pixels: CalibrationRate,
    x_tick_rate: u32,
    y_tick_rate: u32,
    vertical_units: VerticalUnitKind,
    cmap: String,
}

impl TrialDescriptorBuilder {
    fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder_names: vec![folder.into()],
            step_size_mm: 0.0,
            figure_x_label: String::new(),
            figure_title: String::new(),
            min_wavelength_nm: 0.0,
            wavelength_per_n_pixels: CalibrationRate::new(1.0, 1.0),
            x_tick_rate: 1,
            y_tick_rate: 1,
            vertical_units: VerticalUnitKind::Wavelength,
            cmap: DEFAULT_CMAP.to_string(),
        }
    }

    pub fn folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.folder_names.push(folder.into());
        self
    }

    pub fn folders<I, P>(mut self, folders: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.folder_names = folders.into_iter().map(Into::into).collect();
        self
    }

    pub fn step_size_mm(mut self, step_size_mm: f64) -> Self {
        self.step_size_mm = step_size_mm;
        self
    }

    pub fn figure_x_label(mut self, label: impl Into<String>) -> Self {
        self.figure_x_label = label.into();
        self
    }

    pub fn figure_title(mut self, title: impl Into<String>) -> Self {
        self.figure_title = title.into();
        self
    }

    pub fn min_wavelength_nm(mut self, min_wavelength_nm: f64) -> Self {
        self.min_wavelength_nm = min_wavelength_nm;
        self
    }

    pub fn wavelength_per_n_pixels(mut self, rate: CalibrationRate) -> Self {
        self.wavelength_per_n_pixels = rate;
        self
    }

    pub fn x_tick_rate(mut self, rate: u32) -> Self {
        self.x_tick_rate = rate;
        self
    }

    pub fn y_tick_rate(mut self, rate: u32) -> Self {
        self.y_tick_rate = rate;
        self
    }

    pub fn vertical_units(mut self, kind: VerticalUnitKind) -> Self {
        self.vertical_units = kind;
        self
    }

    pub fn cmap(mut self, cmap: impl Into<String>) -> Self {
        self.cmap = cmap.into();
        self
    }

    pub fn build(self) -> Result<TrialDescriptor> {
        if self.folder_names.is_empty() {
            return Err(VitaraError::InvalidArgument(
                "a trial needs at least one source folder".into(),
            ));
        }
        if !self.step_size_mm.is_finite() {
            return Err(VitaraError::InvalidArgument(format!(
                "step size {} mm is not finite",
                self.step_size_mm
            )));
        }
        // Surface a zero-pixel calibration now instead of on first use.
        self.wavelength_per_n_pixels.nm_per_pixel()?;

        Ok(TrialDescriptor {
            folder_names: self.folder_names,
            step_size_mm: self.step_size_mm,
            figure_x_label: self.figure_x_label,
            figure_title: self.figure_title,
            min_wavelength_nm: self.min_wavelength_nm,
            wavelength_per_n_pixels: self.wavelength_per_n_pixels,
            x_tick_rate: self.x_tick_rate,
            y_tick_rate: self.y_tick_rate,
            vertical_units: self.vertical_units,
            cmap: self.cmap,
        })
    }
}

// ---------------------------------------------------------------------------
// JSON trial file
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(PathBuf),
    Many(Vec<PathBuf>),
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(p) => vec![p],
        OneOrMany::Many(ps) => ps,
    })
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TrialFile {
    #[serde(deserialize_with = "one_or_many")]
    folder_names: Vec<PathBuf>,
    step_size: f64,
    #[serde(default)]
    figure_x_label: String,
    #[serde(default)]
    figure_title: String,
    min_wavelength: f64,
    wavelength_per_n_pixels: CalibrationRate,
    x_tick_rate: u32,
    y_tick_rate: u32,
    // Checked in `into_descriptor` so a bad kind surfaces as `InvalidUnitKind`.
    vertical_units: RawUnitKind,
    #[serde(default)]
    cmap: Option<String>,
}

impl TrialFile {
    fn into_descriptor(self) -> Result<TrialDescriptor> {
        let vertical_units = self.vertical_units.into_kind()?;
        TrialDescriptorBuilder::new(PathBuf::new())
            .folders(self.folder_names)
            .step_size_mm(self.step_size)
            .figure_x_label(self.figure_x_label)
            .figure_title(self.figure_title)
            .min_wavelength_nm(self.min_wavelength)
            .wavelength_per_n_pixels(self.wavelength_per_n_pixels)
            .x_tick_rate(self.x_tick_rate)
            .y_tick_rate(self.y_tick_rate)
            .vertical_units(vertical_units)
            .cmap(self.cmap.unwrap_or_else(|| DEFAULT_CMAP.to_string()))
            .build()
    }
}
