use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::{write::GzEncoder, Compression as GzCompression};
use tracing::info;

use crate::error::{DatatableError, Result};
use crate::types::Datatable;

impl Datatable {
    /// Writes one line per row; values use the shortest text that parses back bit-exactly.
    pub fn write_delimited<W: Write>(&self, mut writer: W, delimiter: char) -> io::Result<()> {
        let mut utf8 = [0u8; 4];
        let separator = delimiter.encode_utf8(&mut utf8).as_bytes();
        for row in self.values().outer_iter() {
            for (column, value) in row.iter().enumerate() {
                if column > 0 {
                    writer.write_all(separator)?;
                }
                write!(writer, "{value}")?;
            }
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }

    pub fn to_delimited_string(&self, delimiter: char) -> String {
        let mut buf = Vec::new();
        self.write_delimited(&mut buf, delimiter)
            .expect("Vec<u8> writer is infallible");
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Saves the table as delimited text, gzip-compressed when the path ends in `.gz`.
pub fn save(table: &Datatable, path: &Path, delimiter: char) -> Result<()> {
    let file = File::create(path).map_err(|err| DatatableError::from_io(path, err))?;
    let io_err = |err: io::Error| DatatableError::from_io(path, err);
    let compressed = is_gzip_path(path);
    if compressed {
        let mut encoder = GzEncoder::new(BufWriter::new(file), GzCompression::default());
        table.write_delimited(&mut encoder, delimiter).map_err(io_err)?;
        encoder.finish().and_then(|mut inner| inner.flush()).map_err(io_err)?;
    } else {
        table
            .write_delimited(BufWriter::new(file), delimiter)
            .map_err(io_err)?;
    }
    info!(
        path = %path.display(),
        rows = table.rows(),
        width = table.width(),
        compressed,
        "wrote datatable"
    );
    Ok(())
}

fn is_gzip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UtteranceSpan;
    use flate2::read::GzDecoder;
    use ndarray::array;
    use std::io::Read;

    fn sample() -> Datatable {
        Datatable::new(
            array![[0.0, -1.5, 0.1], [1e-7, 2.0, 3.25]],
            vec![UtteranceSpan {
                id: "u".into(),
                start_row: 0,
                rows: 2,
            }],
        )
    }

    #[test]
    fn rows_become_delimited_lines() {
        let text = sample().to_delimited_string(',');
        assert_eq!(text, "0,-1.5,0.1\n0.0000001,2,3.25\n");
    }

    #[test]
    fn text_parses_back_exactly() {
        let table = sample();
        let text = table.to_delimited_string('\t');
        let parsed: Vec<f64> = text
            .lines()
            .flat_map(|line| line.split('\t').map(|v| v.parse::<f64>().unwrap()))
            .collect();
        let original: Vec<f64> = table.values().iter().copied().collect();
        assert_eq!(parsed, original);
    }

    #[test]
    fn gz_suffix_compresses_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datatable.csv.gz");
        save(&sample(), &path, ',').unwrap();

        let mut decoded = String::new();
        GzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, sample().to_delimited_string(','));
    }

    #[test]
    fn plain_suffix_writes_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datatable.csv");
        save(&sample(), &path, ',').unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("0,-1.5,0.1\n"));
    }
}
