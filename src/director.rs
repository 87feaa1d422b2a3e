//! Windowed dispatch from a document stream to the registered
//! counters.

use std::num::NonZeroUsize;

use crate::corpus::{Document, DocumentError};
use crate::counter::Counter;
use crate::nlp::{PhraseExtractor, SentenceSegmenter};

/// Sentences per window when nothing else is configured.
pub const DEFAULT_WINDOW: NonZeroUsize = NonZeroUsize::new(3).unwrap();

/// Reads dated documents, groups their sentences into consecutive
/// non-overlapping windows, extracts the noun phrases of each window
/// once, and hands them to every registered counter.
///
/// Documents are processed strictly one at a time and windows in
/// order; the counters mutate their maps with no locking and rely on
/// there being exactly one writer.
#[derive(Debug)]
pub struct Director<S, X> {
    segmenter: S,
    extractor: X,
    window: NonZeroUsize,
}

/// What a dispatch run processed and what it had to skip.
#[derive(Debug, Default)]
pub struct RunReport {
    pub documents: usize,
    pub windows: usize,
    pub skipped: Vec<DocumentError>,
}

impl<S: SentenceSegmenter, X: PhraseExtractor> Director<S, X> {
    pub fn new(segmenter: S, extractor: X) -> Self {
        Self {
            segmenter,
            extractor,
            window: DEFAULT_WINDOW,
        }
    }

    /// Use `window` sentences per window instead of the default. The
    /// final window of a document may come up short.
    pub fn with_window(mut self, window: NonZeroUsize) -> Self {
        self.window = window;
        self
    }

    /// Drive every document through windowing, extraction, and the
    /// registered counters, in document order and counter
    /// registration order.
    ///
    /// With no counters registered there is nothing to feed, so the
    /// stream is never advanced and no document is read. Documents
    /// that fail to read are logged, recorded in the report, and
    /// skipped; there are no retries.
    pub fn dispatch<I>(&self, documents: I, counters: &mut [&mut dyn Counter]) -> RunReport
    where
        I: IntoIterator<Item = Result<Document, DocumentError>>,
    {
        let mut report = RunReport::default();
        if counters.is_empty() {
            return report;
        }
        for document in documents {
            let document = match document {
                Ok(document) => document,
                Err(err) => {
                    log::warn!("skipping document: {err}");
                    report.skipped.push(err);
                    continue;
                }
            };
            let sentences = self.segmenter.segment(&document.text);
            log::debug!("{}: {} sentences", document.year, sentences.len());
            for window in sentences.chunks(self.window.get()) {
                let span = window.join(" ");
                let phrases = self.extractor.extract(&span);
                for counter in counters.iter_mut() {
                    counter.handle(document.year, &phrases);
                }
                report.windows += 1;
            }
            report.documents += 1;
        }
        report
    }
}
