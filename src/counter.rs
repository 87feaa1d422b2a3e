//! The counting engine: the contract every counter satisfies, the
//! per-country frequency counter, and the pairwise co-occurrence
//! counter built on top of it.
//!
//! Both counters keep two books at once: a lifetime *total* and an
//! *annual* map keyed by the source document's year. Entries are
//! created lazily on first mention and only ever grow.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use thiserror::Error;

use crate::Year;
use crate::countries::CountryRegistry;

/// Mapping from canonical country name to a mention count.
pub type Count = HashMap<String, u64>;

/// Mapping from canonical country name to the counts of countries
/// co-mentioned with it.
pub type PairCount = HashMap<String, Count>;

/// Errors from the public [`FrequencyCounter::add_record`] entry
/// point. Both indicate caller bugs rather than data problems.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CountError {
    /// Counts are monotonic; an increment must be at least one.
    #[error("count increment must be positive")]
    ZeroCount,
    /// The name does not match any registry variant.
    #[error("unknown country: {0:?}")]
    UnknownCountry(String),
}

/// A counter consumes the noun phrases of one sentence window at a
/// time, tagged with the year of the source document.
///
/// Windows may arrive for any year, in any order, any number of
/// times. Phrases the registry does not recognize are expected and
/// silently ignored. The accumulated state is read back through the
/// concrete types' `total()`/`annual()` accessors, whose shapes
/// differ per counter.
pub trait Counter {
    fn handle(&mut self, year: Year, phrases: &[String]);
}

/// Counts how often each country is mentioned, in total and per year.
///
/// Every surface variant is resolved to its canonical name before
/// counting, so the same country is counted the same no matter which
/// synonym triggered the match.
#[derive(Debug)]
pub struct FrequencyCounter {
    countries: Arc<CountryRegistry>,
    total: Count,
    annual: BTreeMap<Year, Count>,
}

impl FrequencyCounter {
    pub fn new(countries: Arc<CountryRegistry>) -> Self {
        Self {
            countries,
            total: Count::new(),
            annual: BTreeMap::new(),
        }
    }

    /// Add `count` mentions of `name` for `year`.
    ///
    /// `name` may be any registry variant; it is canonicalized before
    /// the total and the year's map are both bumped. Entries start at
    /// zero on first use.
    pub fn add_record(&mut self, year: Year, name: &str, count: u64) -> Result<(), CountError> {
        let countries = Arc::clone(&self.countries);
        let canonical = countries
            .canonical_name(name)
            .ok_or_else(|| CountError::UnknownCountry(name.to_owned()))?;
        if count == 0 {
            return Err(CountError::ZeroCount);
        }
        self.bump(year, canonical, count);
        Ok(())
    }

    /// Lifetime counts per country.
    pub fn total(&self) -> &Count {
        &self.total
    }

    /// Counts per year, then per country.
    pub fn annual(&self) -> &BTreeMap<Year, Count> {
        &self.annual
    }

    /// Shared registry handle.
    pub fn countries(&self) -> &Arc<CountryRegistry> {
        &self.countries
    }

    /// `canonical` must already be a canonical name. Total and annual
    /// are bumped together so they never drift apart.
    pub(crate) fn bump(&mut self, year: Year, canonical: &str, count: u64) {
        *self.total.entry(canonical.to_owned()).or_insert(0) += count;
        *self
            .annual
            .entry(year)
            .or_default()
            .entry(canonical.to_owned())
            .or_insert(0) += count;
    }
}

impl Counter for FrequencyCounter {
    fn handle(&mut self, year: Year, phrases: &[String]) {
        let countries = Arc::clone(&self.countries);
        for phrase in phrases {
            if let Some(canonical) = countries.canonical_name(phrase) {
                self.bump(year, canonical, 1);
            }
        }
    }
}

/// Counts how often pairs of countries appear in the same sentence
/// window, in total and per year, and forwards every raw mention to
/// an inner [`FrequencyCounter`].
///
/// Both directions of a pair are materialized: a window mentioning
/// France and Brazil adds one to France→Brazil and one to
/// Brazil→France. A pair is counted once per window, no matter how
/// many times either country occurs in it; only the inner frequency
/// counter sees the raw multiplicity. Self-pairs never appear.
#[derive(Debug)]
pub struct CooccurrenceCounter {
    countries: Arc<CountryRegistry>,
    frequency: FrequencyCounter,
    total: PairCount,
    annual: BTreeMap<Year, PairCount>,
}

impl CooccurrenceCounter {
    /// `frequency` receives one record per raw mention seen by this
    /// counter; read it back through [`Self::frequency`].
    pub fn new(countries: Arc<CountryRegistry>, frequency: FrequencyCounter) -> Self {
        Self {
            countries,
            frequency,
            total: PairCount::new(),
            annual: BTreeMap::new(),
        }
    }

    /// Lifetime pair counts.
    pub fn total(&self) -> &PairCount {
        &self.total
    }

    /// Pair counts per year.
    pub fn annual(&self) -> &BTreeMap<Year, PairCount> {
        &self.annual
    }

    /// The single-country counter fed by this one.
    pub fn frequency(&self) -> &FrequencyCounter {
        &self.frequency
    }

    /// Give the inner counter back to the caller.
    pub fn into_frequency(self) -> FrequencyCounter {
        self.frequency
    }

    /// One increment per ordered pair of distinct names in `window`.
    fn add_pairs(&mut self, year: Year, window: &Count) {
        for a in window.keys() {
            for b in window.keys() {
                if a == b {
                    continue;
                }
                *self
                    .total
                    .entry(a.clone())
                    .or_default()
                    .entry(b.clone())
                    .or_insert(0) += 1;
                *self
                    .annual
                    .entry(year)
                    .or_default()
                    .entry(a.clone())
                    .or_default()
                    .entry(b.clone())
                    .or_insert(0) += 1;
            }
        }
    }
}

impl Counter for CooccurrenceCounter {
    fn handle(&mut self, year: Year, phrases: &[String]) {
        let countries = Arc::clone(&self.countries);
        // Tally this window locally; only distinct names form pairs.
        let mut window = Count::new();
        for phrase in phrases {
            if let Some(canonical) = countries.canonical_name(phrase) {
                *window.entry(canonical.to_owned()).or_insert(0) += 1;
                self.frequency.bump(year, canonical, 1);
            }
        }
        self.add_pairs(year, &window);
    }
}
