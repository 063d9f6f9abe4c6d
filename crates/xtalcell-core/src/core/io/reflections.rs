use crate::core::models::miller::MillerPlane;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReflectionIoError {
    #[error("CSV error for '{path}': {source}")]
    File { path: String, source: csv::Error },
    #[error("CSV error: {0}")]
    Stream(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Row {row} has indices (0 0 0)")]
    OriginPlane { row: usize },
}

#[derive(Debug, Serialize, Deserialize)]
struct ReflectionRecord {
    h: i32,
    k: i32,
    l: i32,
    d: Option<f64>,
    q: Option<f64>,
    #[serde(default)]
    label: String,
}

impl From<&MillerPlane> for ReflectionRecord {
    fn from(plane: &MillerPlane) -> Self {
        Self {
            h: plane.h(),
            k: plane.k(),
            l: plane.l(),
            d: plane.d_spacing,
            q: plane.q_spacing(),
            label: plane.label.clone(),
        }
    }
}

impl From<ReflectionRecord> for MillerPlane {
    fn from(record: ReflectionRecord) -> Self {
        let mut plane = MillerPlane::new(record.h, record.k, record.l);
        plane.d_spacing = record.d;
        plane.label = record.label;
        plane
    }
}

/// Writes planes as CSV with a header row.
pub fn write_reflections<W: Write>(
    writer: W,
    planes: &[MillerPlane],
) -> Result<(), ReflectionIoError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for plane in planes {
        csv_writer.serialize(ReflectionRecord::from(plane))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_reflections_to_path(
    path: &Path,
    planes: &[MillerPlane],
) -> Result<(), ReflectionIoError> {
    let file_error = |source| ReflectionIoError::File {
        path: path.to_string_lossy().to_string(),
        source,
    };
    let mut csv_writer = csv::Writer::from_path(path).map_err(file_error)?;
    for plane in planes {
        csv_writer
            .serialize(ReflectionRecord::from(plane))
            .map_err(file_error)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reads planes from CSV with a header row.
///
/// The `q` column is ignored on input since it is derived from `d`.
pub fn read_reflections<R: Read>(reader: R) -> Result<Vec<MillerPlane>, ReflectionIoError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut planes = Vec::new();
    for (row, result) in csv_reader.deserialize::<ReflectionRecord>().enumerate() {
        let plane = MillerPlane::from(result?);
        if plane.is_origin() {
            return Err(ReflectionIoError::OriginPlane { row: row + 1 });
        }
        planes.push(plane);
    }
    Ok(planes)
}

pub fn read_reflections_from_path(path: &Path) -> Result<Vec<MillerPlane>, ReflectionIoError> {
    let file_error = |source| ReflectionIoError::File {
        path: path.to_string_lossy().to_string(),
        source,
    };
    let mut csv_reader = csv::Reader::from_path(path).map_err(file_error)?;
    let mut planes = Vec::new();
    for (row, result) in csv_reader.deserialize::<ReflectionRecord>().enumerate() {
        let plane = MillerPlane::from(result.map_err(file_error)?);
        if plane.is_origin() {
            return Err(ReflectionIoError::OriginPlane { row: row + 1 });
        }
        planes.push(plane);
    }
    Ok(planes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn planes() -> Vec<MillerPlane> {
        vec![
            MillerPlane::with_d_spacing(1, 1, 1, 3.135, "111"),
            MillerPlane::with_d_spacing(2, 2, 0, 1.92, "220"),
            MillerPlane::new(3, 1, -1),
        ]
    }

    #[test]
    fn writes_header_and_one_row_per_plane() {
        let mut buffer = Vec::new();
        write_reflections(&mut buffer, &planes()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "h,k,l,d,q,label");
        assert!(lines[1].starts_with("1,1,1,3.135,2.004"));
        assert!(lines[1].ends_with(",111"));
        assert_eq!(lines[3], "3,1,-1,,,");
    }

    #[test]
    fn file_round_trip_keeps_indices_spacing_and_label() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reflections.csv");
        write_reflections_to_path(&path, &planes()).unwrap();
        let read = read_reflections_from_path(&path).unwrap();
        assert_eq!(read, planes());
    }

    #[test]
    fn missing_label_column_defaults_to_empty() {
        let input = "h,k,l,d,q\n1,0,0,4.2,\n";
        let read = read_reflections(input.as_bytes()).unwrap();
        assert_eq!(read, vec![MillerPlane::with_d_spacing(1, 0, 0, 4.2, "")]);
    }

    #[test]
    fn origin_rows_are_rejected() {
        let input = "h,k,l,d,q,label\n1,0,0,,,\n0,0,0,,,\n";
        assert!(matches!(
            read_reflections(input.as_bytes()),
            Err(ReflectionIoError::OriginPlane { row: 2 })
        ));
    }

    #[test]
    fn malformed_file_reports_its_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "h,k,l,d,q,label\nx,0,0,,,\n").unwrap();
        let err = read_reflections_from_path(&path).unwrap_err();
        assert!(matches!(err, ReflectionIoError::File { .. }));
        assert!(err.to_string().contains("bad.csv"));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let err = read_reflections_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("absent.csv"));
    }
}
