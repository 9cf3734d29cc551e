//! The tabular dataset the fame column is merged into.

use crate::error::DatasetError;
use std::io::{Read, Write};
use std::path::Path;

/// A CSV table held in memory as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read a CSV file with a header row.
    pub fn read(path: &Path) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers()?.iter().map(String::from).collect();
        let rows = rdr
            .records()
            .map(|r| r.map(|rec| rec.iter().map(String::from).collect()))
            .collect::<Result<Vec<Vec<String>>, _>>()?;
        Ok(Self { headers, rows })
    }

    /// Write as CSV, creating parent directories as needed.
    pub fn write(&self, path: &Path) -> Result<(), DatasetError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        self.to_writer(file)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), DatasetError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, DatasetError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    }

    /// Values of `column`, one per row, in row order.
    pub fn column(&self, column: &str) -> Result<Vec<String>, DatasetError> {
        let idx = self.column_index(column)?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or_default())
            .collect())
    }

    /// Insert `name` immediately after `anchor`. `None` values become empty
    /// cells. An existing column called `name` is replaced.
    pub fn insert_column_after(
        &mut self,
        anchor: &str,
        name: &str,
        values: &[Option<String>],
    ) -> Result<(), DatasetError> {
        if values.len() != self.rows.len() {
            return Err(DatasetError::LengthMismatch {
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        if anchor != name {
            if let Ok(existing) = self.column_index(name) {
                self.headers.remove(existing);
                for row in &mut self.rows {
                    if existing < row.len() {
                        row.remove(existing);
                    }
                }
            }
        }
        let at = self.column_index(anchor)? + 1;

        self.headers.insert(at, name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            if row.len() < at {
                row.resize(at, String::new());
            }
            row.insert(at, value.clone().unwrap_or_default());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "title,artist,year\nGuernica,Pablo Picasso,1937\nUntitled,Nobody,\nWeeping Woman,Pablo Picasso,1937\n";

    #[test]
    fn test_read_and_column() {
        let ds = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.headers(), ["title", "artist", "year"]);
        assert_eq!(
            ds.column("artist").unwrap(),
            ["Pablo Picasso", "Nobody", "Pablo Picasso"]
        );
        assert!(matches!(
            ds.column("painter"),
            Err(DatasetError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_insert_after_anchor_with_blanks() {
        let mut ds = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        ds.insert_column_after(
            "artist",
            "fame",
            &[Some("5".into()), None, Some("5".into())],
        )
        .unwrap();

        let mut out = Vec::new();
        ds.to_writer(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "title,artist,fame,year\nGuernica,Pablo Picasso,5,1937\nUntitled,Nobody,,\nWeeping Woman,Pablo Picasso,5,1937\n"
        );
    }

    #[test]
    fn test_insert_replaces_existing_column() {
        let mut ds = Dataset::from_reader("fame,artist\n1,A\n2,B\n".as_bytes()).unwrap();
        ds.insert_column_after("artist", "fame", &[Some("7".into()), Some("0".into())])
            .unwrap();
        assert_eq!(ds.headers(), ["artist", "fame"]);
        assert_eq!(ds.column("fame").unwrap(), ["7", "0"]);
    }

    #[test]
    fn test_insert_length_mismatch() {
        let mut ds = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        let err = ds
            .insert_column_after("artist", "fame", &[None])
            .unwrap_err();
        assert!(matches!(
            err,
            DatasetError::LengthMismatch {
                expected: 3,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_write_and_read_back_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/artist_fame.csv");
        let ds = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        ds.write(&path).unwrap();
        assert_eq!(Dataset::read(&path).unwrap(), ds);
    }
}
