#![forbid(unsafe_code)]
//! # country_mentions
//!
//! Count how often countries are mentioned in a corpus of dated text,
//! and how often pairs of countries appear in the same sentence
//! window, as lifetime totals and per calendar year.
//!
//! The pipeline: a [`corpus`] source yields dated documents, the
//! [`Director`] splits each document into fixed-size sentence windows
//! and pulls the noun phrases out of each window once, and every
//! registered [`Counter`] resolves those phrases against a
//! [`CountryRegistry`] and accumulates its counts. Results are read
//! back from the counters and can be persisted with [`export`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use country_mentions::{CountryRegistry, DEFAULT_WINDOW, analyze_directory};
//!
//! let countries = Arc::new(CountryRegistry::builtin()?);
//! let (counter, report) = analyze_directory(&countries, "data/segment".as_ref(), DEFAULT_WINDOW);
//! println!("{} documents, {} windows", report.documents, report.windows);
//! println!("{:?}", counter.frequency().total());
//! # Ok::<(), country_mentions::RegistryError>(())
//! ```

pub mod corpus;
pub mod counter;
pub mod countries;
pub mod director;
pub mod export;
pub mod nlp;

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

pub use corpus::{AnnualFiles, CsvCorpus, Document, DocumentError};
pub use counter::{CooccurrenceCounter, Count, CountError, Counter, FrequencyCounter, PairCount};
pub use countries::{CountryRegistry, Location, RegistryError};
pub use director::{DEFAULT_WINDOW, Director, RunReport};
pub use nlp::{CapitalizedPhraseExtractor, PhraseExtractor, RuleSegmenter, SentenceSegmenter};

/// A document's calendar year.
pub type Year = i16;

/// Run both counters over a directory of annual `YYYY.txt` files with
/// the built-in segmenter and extractor.
///
/// The frequency counter rides inside the returned co-occurrence
/// counter and sees every raw mention; read it through
/// [`CooccurrenceCounter::frequency`].
pub fn analyze_directory(
    countries: &Arc<CountryRegistry>,
    dir: &Path,
    window: NonZeroUsize,
) -> (CooccurrenceCounter, RunReport) {
    let frequency = FrequencyCounter::new(Arc::clone(countries));
    let mut cooccurrence = CooccurrenceCounter::new(Arc::clone(countries), frequency);
    let director = Director::new(RuleSegmenter, CapitalizedPhraseExtractor).with_window(window);
    let report = director.dispatch(AnnualFiles::new(dir).documents(), &mut [&mut cooccurrence]);
    (cooccurrence, report)
}
