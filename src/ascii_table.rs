use std::fs::read;
use std::path::{Path, PathBuf};




/**
 * An error type for reading whitespace-delimited ASCII tables
 */
#[derive(thiserror::Error, Debug)]
pub enum Error {

    #[error("could not open the table file '{}': {source}", path.display())]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed table row at line {line}: {reason}")]
    MalformedRow {
        line: usize,
        reason: String,
    },
}




/**
 * Return the number of data rows in a file; blank lines are not rows.
 */
pub fn count_rows<P: AsRef<Path>>(path: P) -> Result<usize, Error> {
    Ok(data_lines(&read_file(path.as_ref())?).count())
}




/**
 * Parse the contents of a .dat-like file into rows of `NUM_COLS` floats. Each
 * non-blank line is a row, and must hold exactly `NUM_COLS`
 * whitespace-separated floats. If `expected_rows` is given, the number of rows
 * parsed must match it.
 */
pub fn read_rows<const NUM_COLS: usize>(
    contents: &str,
    expected_rows: Option<usize>,
) -> Result<Vec<[f64; NUM_COLS]>, Error> {
    let rows = data_lines(contents)
        .map(|(line, text)| parse_row(line, text))
        .collect::<Result<Vec<_>, _>>()?;

    match expected_rows {
        Some(expected) if expected != rows.len() => Err(Error::MalformedRow {
            line: contents.lines().count(),
            reason: format!("expected {} rows, found {}", expected, rows.len()),
        }),
        _ => Ok(rows),
    }
}




/**
 * Convenience function to read a file and pass its contents to `read_rows`.
 */
pub fn read_rows_from_file<P: AsRef<Path>, const NUM_COLS: usize>(
    path: P,
    expected_rows: Option<usize>,
) -> Result<Vec<[f64; NUM_COLS]>, Error> {
    read_rows(&read_file(path.as_ref())?, expected_rows)
}




// ============================================================================
fn read_file(path: &Path) -> Result<String, Error> {
    let bytes = read(path).map_err(|source| Error::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        Error::MalformedRow {
            line: 1 + valid.iter().filter(|&&b| b == b'\n').count(),
            reason: e.utf8_error().to_string(),
        }
    })
}

fn data_lines(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents
        .lines()
        .enumerate()
        .map(|(i, text)| (i + 1, text))
        .filter(|(_, text)| !text.trim().is_empty())
}

fn parse_row<const NUM_COLS: usize>(line: usize, text: &str) -> Result<[f64; NUM_COLS], Error> {
    let mut row = [0.0; NUM_COLS];
    let mut fields = text.split_whitespace();

    for i in 0..NUM_COLS {
        let token = fields.next().ok_or_else(|| Error::MalformedRow {
            line,
            reason: format!("expected {} fields, found {}", NUM_COLS, i),
        })?;
        row[i] = token.parse().map_err(|e| Error::MalformedRow {
            line,
            reason: format!("field {} ('{}'): {}", i + 1, token, e),
        })?;
    }
    let extra = fields.count();

    if extra > 0 {
        return Err(Error::MalformedRow {
            line,
            reason: format!("expected {} fields, found {}", NUM_COLS, NUM_COLS + extra),
        })
    }
    Ok(row)
}
