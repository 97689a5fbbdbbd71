//! Append-only CSV record of deals.
//!
//! Each row has two columns: the listing serialized as JSON and the predicted
//! value.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::warn;

use super::AlertSink;
use crate::domain::{Listing, Price};
use crate::error::Result;

pub struct CsvSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl CsvSink {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, listing: &Listing, predicted_value: Price) -> Result<()> {
        let row = format!(
            "{},{}\n",
            escape(&serde_json::to_string(listing)?),
            escape(&predicted_value.to_string())
        );
        let mut file = self.file.lock();
        file.write_all(row.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

impl AlertSink for CsvSink {
    fn notify(&self, listing: &Listing, predicted_value: Price) {
        if let Err(e) = self.append(listing, predicted_value) {
            warn!(path = %self.path.display(), error = %e, "Failed to append deal to CSV");
        }
    }
}

/// Quote a field when it contains a delimiter, quote or line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn escape_quotes_only_when_needed() {
        assert_eq!(escape("150"), "150");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape(r#"{"t":"x"}"#), r#""{""t"":""x""}""#);
    }

    #[test]
    fn appends_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deals.csv");
        std::fs::write(&path, "existing\n").unwrap();

        let sink = CsvSink::open(&path).unwrap();
        sink.notify(&Listing::new().with_title("x"), dec!(1));
        sink.notify(&Listing::new().with_title("y").with_price(dec!(2)), dec!(30));

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "existing");
        assert!(lines[1].starts_with("\"{\"\"title\"\":\"\"x\"\""));
        assert!(lines[1].ends_with(",1"));
        assert!(lines[2].ends_with(",30"));
    }

    #[test]
    fn open_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CsvSink::open(dir.path().join("nope").join("deals.csv")).is_err());
    }
}
