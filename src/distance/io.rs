//! Matrix CSV files.
//!
//! One matrix row per line, comma separated, no header, every value
//! written as `%10.1f`.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tracing::info;

use super::DistanceMatrix;
use crate::error::{Error, Result};

/// Writes a matrix in the CSV layout described in the module docs.
///
/// # Examples
///
/// ```
/// use delivery_routes::distance::{write_matrix, DistanceMatrix};
///
/// let dm = DistanceMatrix::from_rows(vec![vec![0.0, 12.34], vec![9.0, 0.0]]).unwrap();
/// let mut out = Vec::new();
/// write_matrix(&dm, &mut out).unwrap();
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "       0.0,      12.3\n       9.0,       0.0\n"
/// );
/// ```
pub fn write_matrix<W: Write>(matrix: &DistanceMatrix, mut writer: W) -> Result<()> {
    for row in matrix.rows().take(matrix.size()) {
        let line: Vec<String> = row.iter().map(|v| format!("{v:10.1}")).collect();
        writeln!(writer, "{}", line.join(","))?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a headerless square matrix of finite values.
pub fn read_matrix<R: Read>(reader: R) -> Result<DistanceMatrix> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| {
                let v = field.parse::<f64>().map_err(|e| {
                    Error::Matrix(format!("line {}: cannot parse `{field}`: {e}", i + 1))
                })?;
                if !v.is_finite() {
                    return Err(Error::Matrix(format!("line {}: non-finite value", i + 1)));
                }
                Ok(v)
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    DistanceMatrix::from_rows(rows)
}

/// Writes a matrix to `path`.
pub fn save_matrix(matrix: &DistanceMatrix, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_matrix(matrix, BufWriter::new(File::create(path)?))?;
    info!(path = %path.display(), size = matrix.size(), "matrix written");
    Ok(())
}

/// Reads a matrix from `path`.
pub fn load_matrix(path: impl AsRef<Path>) -> Result<DistanceMatrix> {
    let path = path.as_ref();
    let matrix = read_matrix(File::open(path)?)?;
    info!(path = %path.display(), size = matrix.size(), "matrix loaded");
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_rejects_non_finite() {
        for data in ["0.0,NaN\n1.0,0.0\n", "0.0,1.0\ninf,0.0\n"] {
            let err = read_matrix(data.as_bytes());
            assert!(matches!(err, Err(Error::Matrix(msg)) if msg.contains("non-finite")));
        }
    }

    #[test]
    fn test_read_padded_values() {
        let data = "       0.0,     125.4\n     130.2,       0.0\n";
        let dm = read_matrix(data.as_bytes()).expect("valid");
        assert_eq!(dm.size(), 2);
        assert_eq!(dm.get(0, 1), 125.4);
        assert_eq!(dm.get(1, 0), 130.2);
    }

    #[test]
    fn test_read_non_square() {
        let data = "0.0,1.0,2.0\n1.0,0.0,3.0\n";
        assert!(matches!(read_matrix(data.as_bytes()), Err(Error::Matrix(_))));
    }

    #[test]
    fn test_read_bad_number() {
        let data = "0.0,x\n1.0,0.0\n";
        let err = read_matrix(data.as_bytes()).expect_err("bad field");
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_written_file_reads_back_rounded() {
        let dm = DistanceMatrix::from_rows(vec![vec![0.0, 1234.56], vec![987.04, 0.0]])
            .expect("square");
        let mut out = Vec::new();
        write_matrix(&dm, &mut out).expect("write");
        let back = read_matrix(out.as_slice()).expect("read");
        assert_eq!(back.get(0, 1), 1234.6);
        assert_eq!(back.get(1, 0), 987.0);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("duration_matrix.csv");
        let dm = DistanceMatrix::from_rows(vec![vec![0.0, 60.0], vec![61.0, 0.0]]).expect("square");
        save_matrix(&dm, &path).expect("save");
        assert_eq!(load_matrix(&path).expect("load"), dm);
    }
}
