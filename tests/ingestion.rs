use std::fs;
use std::path::Path;

use vitara::{
    read_dataset, read_spectrum_matrix, TrialDescriptor, VerticalUnitKind, VitaraError,
    DEFAULT_SEPARATOR,
};

fn write_dataset(dir: &Path, positions: &str, spectrum: &str) {
    fs::write(dir.join("positions"), positions).unwrap();
    fs::write(dir.join("spectrum"), spectrum).unwrap();
}

const SPECTRUM: &str = "1\t2\t3\t4\n5\t6\t7\t8\n2\t20\t4\t0\n";

#[test]
fn test_read_dataset_shape_and_labels() {
    let tmpdir = tempfile::tempdir().unwrap();
    write_dataset(tmpdir.path(), "t0\tt1\tt2\n", SPECTRUM);

    let matrix = read_dataset(tmpdir.path(), DEFAULT_SEPARATOR).unwrap();
    assert_eq!(matrix.shape(), (4, 3));
    assert_eq!(matrix.max(), Some(1.0));
    assert_eq!(matrix.labels(), &["t0", "t1", "t2"]);

    // Line i, field j on disk lands at (pixel j, position i).
    assert_eq!(matrix.get(1, 2), Some(1.0));
    assert_eq!(matrix.get(3, 1), Some(0.4));
    assert_eq!(matrix.column_by_label("t0"), Some(vec![0.05, 0.1, 0.15, 0.2]));
}

#[test]
fn test_positions_with_data_rows_and_commas() {
    let tmpdir = tempfile::tempdir().unwrap();
    write_dataset(
        tmpdir.path(),
        "a,b,c\n0.0,0.1,0.2\n",
        "1,2\n3,4\n\n4,8\n",
    );
    let matrix = read_dataset(tmpdir.path(), b',').unwrap();
    assert_eq!(matrix.shape(), (2, 3));
    assert_eq!(matrix.labels(), &["a", "b", "c"]);
    assert_eq!(matrix.row(1), Some(&[0.25, 0.5, 1.0][..]));
}

#[test]
fn test_shape_mismatch() {
    let tmpdir = tempfile::tempdir().unwrap();
    write_dataset(tmpdir.path(), "t0\tt1\n", SPECTRUM);

    match read_dataset(tmpdir.path(), DEFAULT_SEPARATOR) {
        Err(VitaraError::ShapeMismatch {
            positions,
            spectrum,
        }) => assert_eq!((positions, spectrum), (2, 3)),
        other => panic!("unexpected {other:?}"),
    }

    write_dataset(tmpdir.path(), "t0\tt1\tt2\tt3\n", SPECTRUM);
    assert!(matches!(
        read_dataset(tmpdir.path(), DEFAULT_SEPARATOR),
        Err(VitaraError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_blank_lines_do_not_count() {
    let tmpdir = tempfile::tempdir().unwrap();
    let path = tmpdir.path().join("spectrum");
    fs::write(&path, "1\t2\n\n3\t4\n5\t6\n\n").unwrap();

    let raw = read_spectrum_matrix(&path, DEFAULT_SEPARATOR).unwrap();
    assert_eq!(raw.positions(), 3);
    assert_eq!(raw.pixels(), 2);
}

#[test]
fn test_parse_error_reports_location() {
    let tmpdir = tempfile::tempdir().unwrap();
    write_dataset(tmpdir.path(), "t0\tt1\n", "1\t2\n\n3\tnope\n");

    match read_dataset(tmpdir.path(), DEFAULT_SEPARATOR) {
        Err(VitaraError::Parse { line, field, value }) => {
            assert_eq!((line, field), (3, 1));
            assert_eq!(value, "nope");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_ragged_trace_reports_physical_line() {
    let tmpdir = tempfile::tempdir().unwrap();
    let path = tmpdir.path().join("spectrum");
    fs::write(&path, "1\t2\t3\n\n4\t5\n").unwrap();

    match read_spectrum_matrix(&path, DEFAULT_SEPARATOR) {
        Err(VitaraError::RaggedTrace {
            line,
            expected,
            found,
        }) => assert_eq!((line, expected, found), (3, 3, 2)),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_missing_files() {
    let tmpdir = tempfile::tempdir().unwrap();
    assert!(matches!(
        read_dataset(tmpdir.path(), DEFAULT_SEPARATOR),
        Err(VitaraError::Io { .. })
    ));
}

#[test]
fn test_trial_file_drives_axes() {
    let tmpdir = tempfile::tempdir().unwrap();
    let run = tmpdir.path().join("run1");
    fs::create_dir(&run).unwrap();
    write_dataset(&run, "t0\tt1\tt2\n", SPECTRUM);

    let trial_path = tmpdir.path().join("trial.json");
    fs::write(
        &trial_path,
        r#"{
            "folder_names": "run1",
            "step_size": 0.003,
            "min_wavelength": 500.0,
            "wavelength_per_n_pixels": [10.0, 2.0],
            "x_tick_rate": 10,
            "y_tick_rate": 10,
            "vertical_units": "wavelength",
            "cmap": "inferno"
        }"#,
    )
    .unwrap();

    let trial = TrialDescriptor::from_json_path(&trial_path).unwrap();
    assert_eq!(trial.folder_names(), &[run.clone()]);
    assert_eq!(trial.vertical_units(), VerticalUnitKind::Wavelength);

    let matrix = read_dataset(&trial.folder_names()[0], DEFAULT_SEPARATOR).unwrap();
    let vertical = trial.vertical_axis(matrix.pixels()).unwrap();
    assert_eq!(vertical, vec![500.0, 505.0, 510.0, 515.0]);
    let times = trial.time_axis(matrix.positions()).unwrap();
    assert_eq!(times.len(), 3);
    assert!((times[2] - 40.0).abs() < 1e-9);
}

#[test]
fn test_non_finite_field_rejected() {
    let tmpdir = tempfile::tempdir().unwrap();
    write_dataset(tmpdir.path(), "t0\tt1\n", "1\tNaN\n2\t4\n");

    match read_dataset(tmpdir.path(), DEFAULT_SEPARATOR) {
        Err(VitaraError::Parse { line, field, value }) => {
            assert_eq!((line, field), (1, 1));
            assert_eq!(value, "NaN");
        }
        other => panic!("unexpected {other:?}"),
    }

    write_dataset(tmpdir.path(), "t0\tt1\n", "1\t2\ninf\t4\n");
    assert!(matches!(
        read_dataset(tmpdir.path(), DEFAULT_SEPARATOR),
        Err(VitaraError::Parse { line: 2, field: 0, .. })
    ));
}

#[test]
fn test_non_ascii_separator_rejected() {
    let tmpdir = tempfile::tempdir().unwrap();
    write_dataset(tmpdir.path(), "t0\u{c3}t1\n", "1\u{c3}2\n3\u{c3}4\n");

    assert!(matches!(
        read_dataset(tmpdir.path(), 0xC3),
        Err(VitaraError::InvalidArgument(_))
    ));
    assert!(matches!(
        read_spectrum_matrix(&tmpdir.path().join("spectrum"), 0xC3),
        Err(VitaraError::InvalidArgument(_))
    ));
}
