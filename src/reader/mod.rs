//! Parsing of tab-separated vocoder frame files and utterance lists.

use std::fs;
use std::path::Path;

use ndarray::Array2;
use tracing::trace;

use crate::error::{DatatableError, Result};
use crate::types::FeatureStream;

/// Reads a frame file whose every line holds exactly `width` tab-separated numbers.
pub fn parse_file(width: usize, path: &Path) -> Result<FeatureStream> {
    let text = read_text(path)?;
    parse_frames(&text, Some(width), path)
}

/// Like [`parse_file`], but takes the width from the first non-empty line.
pub fn parse_file_inferred(path: &Path) -> Result<FeatureStream> {
    let text = read_text(path)?;
    parse_frames(&text, None, path)
}

/// Reads an utterance identifier list, one identifier per line.
pub fn read_id_list(path: &Path) -> Result<Vec<String>> {
    let text = read_text(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| DatatableError::from_io(path, err))
}

fn parse_frames(text: &str, width: Option<usize>, path: &Path) -> Result<FeatureStream> {
    let mut expected = width;
    let mut rows = 0usize;
    let mut data = Vec::new();

    for (index, raw) in text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() {
            continue;
        }
        let line_number = index + 1;
        let fields: Vec<&str> = line.split('\t').collect();
        let width = *expected.get_or_insert(fields.len());
        if fields.len() != width {
            return Err(format_error(
                path,
                line_number,
                format!("expected {width} fields, found {}", fields.len()),
            ));
        }
        for (column, field) in fields.iter().enumerate() {
            let value = field.trim().parse::<f64>().map_err(|_| {
                format_error(
                    path,
                    line_number,
                    format!("field {} ('{field}') is not numeric", column + 1),
                )
            })?;
            data.push(value);
        }
        rows += 1;
    }

    let width = expected.unwrap_or(0);
    trace!(path = %path.display(), rows, width, "parsed frame file");
    let values = Array2::from_shape_vec((rows, width), data).map_err(|err| {
        DatatableError::ShapeMismatch(format!("{}: {err}", path.display()))
    })?;
    Ok(FeatureStream::new(values).with_origin(path))
}

fn format_error(path: &Path, line: usize, message: String) -> DatatableError {
    DatatableError::Format {
        path: path.to_path_buf(),
        line,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::path::{Path, PathBuf};

    fn parse(text: &str, width: usize) -> Result<FeatureStream> {
        parse_frames(text, Some(width), &PathBuf::from("inline.dat"))
    }

    #[test]
    fn trailing_terminator_adds_no_row() {
        let stream = parse("1.0\t2.0\n3.0\t4.0\n", 2).unwrap();
        assert_eq!((stream.frames(), stream.width()), (2, 2));
        assert_eq!(stream.values()[[1, 0]], 3.0);
        assert_eq!(stream.origin(), Some(Path::new("inline.dat")));
    }

    #[test]
    fn missing_final_terminator_keeps_last_row() {
        let stream = parse("1\n2", 1).unwrap();
        assert_eq!(stream.frames(), 2);
    }

    #[test]
    fn crlf_lines_are_accepted() {
        let stream = parse("-1.5\r\n2e-3\r\n", 1).unwrap();
        assert_eq!(stream.values()[[0, 0]], -1.5);
        assert_eq!(stream.values()[[1, 0]], 0.002);
    }

    #[test]
    fn wrong_field_count_reports_line() {
        let err = parse("1\t2\n3\n", 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        match err {
            DatatableError::Format { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn trailing_tab_counts_as_extra_field() {
        let err = parse("1\t\n", 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn non_numeric_field_is_rejected() {
        let err = parse("1\tabc\n", 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn inferred_width_enforces_consistency() {
        let path = PathBuf::from("inline.dat");
        let stream = parse_frames("1\t2\t3\n4\t5\t6\n", None, &path).unwrap();
        assert_eq!(stream.width(), 3);
        let err = parse_frames("1\t2\t3\n4\t5\n", None, &path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn empty_file_yields_no_frames() {
        let stream = parse("", 40).unwrap();
        assert_eq!((stream.frames(), stream.width()), (0, 40));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_file(1, &dir.path().join("absent.lf0.dat")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn id_list_skips_blank_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("basenames.list");
        fs::write(&path, "200001\n200002\r\n\n200003\n\n").unwrap();
        let ids = read_id_list(&path).unwrap();
        assert_eq!(ids, ["200001", "200002", "200003"]);
    }
}
