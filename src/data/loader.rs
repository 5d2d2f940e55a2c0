use std::path::Path;

use crate::error::{Result, VitaraError};

use super::model::{IntensityMatrix, SpectrumMatrix};

/// Separator used by the acquisition software when none is given.
pub const DEFAULT_SEPARATOR: u8 = b'\t';

/// File names inside a dataset folder.
pub const POSITIONS_FILE: &str = "positions";
pub const SPECTRUM_FILE: &str = "spectrum";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read the `positions` and `spectrum` files inside `folder` into a
/// normalized, position-labeled [`IntensityMatrix`].
///
/// The i-th position label is attached to the i-th spectrum trace; see the
/// positional-zip invariant on [`IntensityMatrix`].
pub fn read_dataset(folder: &Path, separator: u8) -> Result<IntensityMatrix> {
    let labels = read_position_labels(&folder.join(POSITIONS_FILE), separator)?;
    let spectrum = read_spectrum_matrix(&folder.join(SPECTRUM_FILE), separator)?;
    IntensityMatrix::from_raw(spectrum, labels)
}

/// Read a spectrum file (one line per stage position) into a pixel-major
/// `[pixels, positions]` matrix.
///
/// Empty lines are skipped and do not count as positions. Fields are parsed
/// as `f64` after trimming surrounding whitespace and must be finite.
pub fn read_spectrum_matrix(path: &Path, separator: u8) -> Result<SpectrumMatrix> {
    let separator = ascii_separator(separator)?;
    let text = std::fs::read_to_string(path).map_err(|e| VitaraError::io(path, e))?;
    let traces = parse_traces(&text, separator)?;
    SpectrumMatrix::from_traces(&traces).map_err(|e| match e {
        // Re-number ragged traces by physical line rather than trace index.
        VitaraError::RaggedTrace {
            line,
            expected,
            found,
        } => VitaraError::RaggedTrace {
            line: physical_line(&text, line),
            expected,
            found,
        },
        other => other,
    })
}

/// Column headers of a positions file, in file order.
pub fn read_position_labels(path: &Path, separator: u8) -> Result<Vec<String>> {
    let separator = ascii_separator(separator)?;
    let file = std::fs::File::open(path).map_err(|e| VitaraError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator as u8)
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let labels = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    Ok(labels)
}

// ---------------------------------------------------------------------------
// Spectrum text helpers
// ---------------------------------------------------------------------------

fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| (i + 1, line))
}

/// Both files must split on the same character, and `csv` splits on raw
/// bytes, so only single-byte (ASCII) separators are accepted.
fn ascii_separator(separator: u8) -> Result<char> {
    if !separator.is_ascii() {
        return Err(VitaraError::InvalidArgument(format!(
            "separator byte 0x{separator:02X} is not ASCII"
        )));
    }
    Ok(separator as char)
}

fn parse_traces(text: &str, separator: char) -> Result<Vec<Vec<f64>>> {
    data_lines(text)
        .map(|(line_no, line)| parse_trace(line, separator, line_no))
        .collect()
}

fn parse_trace(line: &str, separator: char, line_no: usize) -> Result<Vec<f64>> {
    line.split(separator)
        .enumerate()
        .map(|(field, tok)| {
            // `f64::from_str` also accepts `NaN` and `inf`.
            match tok.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(value),
                _ => Err(VitaraError::Parse {
                    line: line_no,
                    field,
                    value: tok.to_string(),
                }),
            }
        })
        .collect()
}

/// 1-based physical line number of the `trace`-th (1-based) non-empty line.
fn physical_line(text: &str, trace: usize) -> usize {
    data_lines(text)
        .nth(trace.saturating_sub(1))
        .map_or(trace, |(line_no, _)| line_no)
}
