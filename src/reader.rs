//! Input collaborator (A3): hands the engine one batch of raw string cells
//! at a time. Decoupled from the engine so non-CSV sources can be added
//! later without touching the rule kernels.

use std::path::Path;

use snafu::ResultExt;

use crate::error::{self, ReaderResult};

/// One batch of raw cells, column-major: `columns[c][r]` is row `r` of
/// column `c`. Every inner `Vec` has the same length.
#[derive(Debug, Default, Clone)]
pub struct RawBatch {
    pub columns: Vec<Vec<String>>,
    pub rows: usize,
}

pub trait Reader {
    /// Column names, in declaration order, read from the header row.
    fn column_names(&self) -> &[String];

    /// Pull the next batch of up to `batch_size` rows. Returns `None` once
    /// the source is exhausted.
    fn next_batch(&mut self, batch_size: usize) -> ReaderResult<Option<RawBatch>>;
}

/// Reads a delimited text file, treating the first row as the header.
pub struct CsvReader {
    reader: csv::Reader<std::fs::File>,
    header: Vec<String>,
    path: String,
    exhausted: bool,
}

impl CsvReader {
    pub fn open(path: impl AsRef<Path>) -> ReaderResult<Self> {
        let path_str = path.as_ref().display().to_string();
        let file = std::fs::File::open(path.as_ref()).context(error::IoSnafu {
            path: path_str.clone(),
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);
        let header = reader
            .headers()
            .context(error::CsvSnafu)?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        Ok(Self {
            reader,
            header,
            path: path_str,
            exhausted: false,
        })
    }

    /// Construct directly from an in-memory string, primarily for tests.
    pub fn from_text(data: &str) -> ReaderResult<CsvReaderMem> {
        let mut cursor = std::io::Cursor::new(data.as_bytes().to_vec());
        let mut header_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(&mut cursor);
        let header = header_reader
            .headers()
            .context(error::CsvSnafu)?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        cursor.set_position(0);
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(cursor);
        Ok(CsvReaderMem {
            reader,
            header,
            exhausted: false,
        })
    }
}

impl Reader for CsvReader {
    fn column_names(&self) -> &[String] {
        &self.header
    }

    fn next_batch(&mut self, batch_size: usize) -> ReaderResult<Option<RawBatch>> {
        next_batch_from(&mut self.reader, &self.header, batch_size, &mut self.exhausted, &self.path)
    }
}

/// In-memory variant of [`CsvReader`], used by tests and by callers who
/// already hold the data in a `String`.
pub struct CsvReaderMem {
    reader: csv::Reader<std::io::Cursor<Vec<u8>>>,
    header: Vec<String>,
    exhausted: bool,
}

impl Reader for CsvReaderMem {
    fn column_names(&self) -> &[String] {
        &self.header
    }

    fn next_batch(&mut self, batch_size: usize) -> ReaderResult<Option<RawBatch>> {
        next_batch_from(&mut self.reader, &self.header, batch_size, &mut self.exhausted, "<memory>")
    }
}

fn next_batch_from<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    header: &[String],
    batch_size: usize,
    exhausted: &mut bool,
    path: &str,
) -> ReaderResult<Option<RawBatch>> {
    if *exhausted {
        return Ok(None);
    }
    let mut columns: Vec<Vec<String>> = vec![Vec::with_capacity(batch_size); header.len()];
    let mut rows = 0;
    for result in reader.records().take(batch_size) {
        let record = result.context(error::CsvSnafu)?;
        if record.len() != header.len() {
            return error::ColumnCountMismatchSnafu {
                expected: header.len(),
                actual: record.len(),
            }
            .fail();
        }
        for (c, field) in record.iter().enumerate() {
            columns[c].push(field.to_string());
        }
        rows += 1;
    }
    let _ = path;
    if rows == 0 {
        *exhausted = true;
        return Ok(None);
    }
    if rows < batch_size {
        *exhausted = true;
    }
    Ok(Some(RawBatch { columns, rows }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_header_and_batches() {
        let data = "name,age\nalice,30\nbob,25\ncarol,40\n";
        let mut reader = CsvReader::from_text(data).unwrap();
        assert_eq!(reader.column_names(), &["name".to_string(), "age".to_string()]);

        let batch1 = reader.next_batch(2).unwrap().unwrap();
        assert_eq!(batch1.rows, 2);
        assert_eq!(batch1.columns[0], vec!["alice", "bob"]);

        let batch2 = reader.next_batch(2).unwrap().unwrap();
        assert_eq!(batch2.rows, 1);
        assert_eq!(batch2.columns[0], vec!["carol"]);

        assert!(reader.next_batch(2).unwrap().is_none());
    }

    #[test]
    fn rejects_ragged_rows() {
        let data = "a,b\n1,2\n3\n";
        let mut reader = CsvReader::from_text(data).unwrap();
        let err = reader.next_batch(10).unwrap_err();
        assert!(matches!(err, error::ReaderError::ColumnCountMismatch { .. }));
    }

    #[test]
    fn empty_input_yields_no_batches() {
        let data = "a,b\n";
        let mut reader = CsvReader::from_text(data).unwrap();
        assert!(reader.next_batch(10).unwrap().is_none());
    }
}
