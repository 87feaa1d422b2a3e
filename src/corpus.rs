//! Document sources feeding the windowed driver.
//!
//! Two sources are provided: a directory of per-year plain-text files
//! (one `YYYY.txt` per year, the layout the cleaning stage writes)
//! and a `date,content` CSV corpus read directly. Both yield
//! [`Document`] items; broken documents come back as `Err` values so
//! the driver can skip them without aborting the run.

use std::fs;
use std::io;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use thiserror::Error;
use walkdir::WalkDir;

use crate::Year;

/// One dated document of raw text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub year: Year,
    pub text: String,
}

/// A single document could not be read or parsed. Recoverable: the
/// driver skips the document and continues.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corpus row {row} has an unparseable date {date:?}")]
    BadDate { row: u64, date: String },
    #[error("corpus record error: {0}")]
    Csv(#[from] csv::Error),
}

/// A directory holding one plain-text file per year, named `YYYY.txt`.
#[derive(Clone, Debug)]
pub struct AnnualFiles {
    dir: PathBuf,
}

impl AnnualFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Lazy document stream, ordered by year.
    ///
    /// The directory is listed up front, but each file's contents are
    /// only read when the iterator reaches it, so an unconsumed
    /// stream reads nothing. Files not named like `YYYY.txt` are
    /// ignored.
    pub fn documents(&self) -> impl Iterator<Item = Result<Document, DocumentError>> + use<> {
        let mut dated: Vec<(Year, PathBuf)> = WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let year = year_from_path(entry.path())?;
                Some((year, entry.into_path()))
            })
            .collect();
        dated.sort();
        dated.into_iter().map(|(year, path)| {
            fs::read_to_string(&path)
                .map(|text| Document { year, text })
                .map_err(|source| DocumentError::Read { path, source })
        })
    }
}

/// `2019` from `.../2019.txt`, if the stem is exactly four digits.
fn year_from_path(path: &Path) -> Option<Year> {
    if !path.extension().is_some_and(|ext| ext == "txt") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem.len() != 4 || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

/// Rows of a `date,content` CSV file, one document per row.
///
/// Dates may carry a full `YYYY-MM-DD` prefix (anything after the day
/// is ignored) or just a bare `YYYY`.
#[derive(Clone, Debug)]
pub struct CsvCorpus {
    path: PathBuf,
    years: Option<RangeInclusive<Year>>,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    content: String,
}

impl CsvCorpus {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            years: None,
        }
    }

    /// Keep only rows whose year falls in `first..=last`.
    pub fn between(mut self, first: Year, last: Year) -> Self {
        self.years = Some(first..=last);
        self
    }

    /// Read the whole file. Rows with a broken record or date come
    /// back as `Err` items so the driver can skip them one by one;
    /// rows outside the year range are dropped silently.
    pub fn documents(&self) -> Vec<Result<Document, DocumentError>> {
        let mut reader = match csv::Reader::from_path(&self.path) {
            Ok(reader) => reader,
            Err(err) => return vec![Err(DocumentError::Csv(err))],
        };
        let mut documents = Vec::new();
        for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
            // Row 1 is the header.
            let row_no = index as u64 + 2;
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    documents.push(Err(DocumentError::Csv(err)));
                    continue;
                }
            };
            let Some(year) = parse_year(&row.date) else {
                documents.push(Err(DocumentError::BadDate {
                    row: row_no,
                    date: row.date,
                }));
                continue;
            };
            if let Some(years) = &self.years {
                if !years.contains(&year) {
                    continue;
                }
            }
            documents.push(Ok(Document {
                year,
                text: row.content,
            }));
        }
        documents
    }
}

/// Year of a `YYYY-MM-DD...` date string, or of a bare `YYYY`.
fn parse_year(date: &str) -> Option<Year> {
    let date = date.trim();
    if let Some(day) = date.get(..10) {
        if let Ok(parsed) = NaiveDate::parse_from_str(day, "%Y-%m-%d") {
            return Year::try_from(parsed.year()).ok();
        }
    }
    if date.len() == 4 && date.bytes().all(|b| b.is_ascii_digit()) {
        return date.parse().ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn annual_files_are_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("2019.txt"), "later").unwrap();
        fs::write(dir.path().join("2017.txt"), "earlier").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip me").unwrap();
        fs::write(dir.path().join("2018.csv"), "skip me too").unwrap();

        let documents: Vec<Document> = AnnualFiles::new(dir.path())
            .documents()
            .map(Result::unwrap)
            .collect();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].year, 2017);
        assert_eq!(documents[0].text, "earlier");
        assert_eq!(documents[1].year, 2019);
    }

    #[test]
    fn annual_files_empty_directory_yields_nothing() {
        let dir = tempdir().unwrap();
        assert_eq!(AnnualFiles::new(dir.path()).documents().count(), 0);
    }

    #[test]
    fn csv_corpus_parses_dates_and_years() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "date,content").unwrap();
        writeln!(file, "2017-01-20,Inauguration speech").unwrap();
        writeln!(file, "2018,State of the union").unwrap();
        writeln!(file, "someday,Broken row").unwrap();
        drop(file);

        let documents = CsvCorpus::new(&path).documents();
        assert_eq!(documents.len(), 3);
        assert_eq!(documents[0].as_ref().unwrap().year, 2017);
        assert_eq!(documents[1].as_ref().unwrap().year, 2018);
        assert!(matches!(
            documents[2],
            Err(DocumentError::BadDate { row: 4, .. })
        ));
    }

    #[test]
    fn csv_corpus_filters_by_year_range() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "date,content").unwrap();
        writeln!(file, "2016-05-01,before").unwrap();
        writeln!(file, "2017-05-01,inside").unwrap();
        writeln!(file, "2021-05-01,after").unwrap();
        drop(file);

        let documents = CsvCorpus::new(&path).between(2017, 2020).documents();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].as_ref().unwrap().text, "inside");
    }

    #[test]
    fn csv_corpus_missing_file_is_one_error() {
        let documents = CsvCorpus::new("no/such/file.csv").documents();
        assert_eq!(documents.len(), 1);
        assert!(matches!(documents[0], Err(DocumentError::Csv(_))));
    }
}
