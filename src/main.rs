#![forbid(unsafe_code)]
//! # Country mentions CLI
//!
//! Command-line front end for the `country_mentions` crate: point it
//! at a corpus of dated text and it writes total and per-year counts
//! of country mentions and country co-occurrences as JSON.
//!
//! ## Input
//! - Default: a directory with one `YYYY.txt` file per year.
//! - `--from-csv`: a `date,content` CSV file, optionally filtered
//!   with `--from-year`/`--to-year`.
//!
//! ## Example
//! ```bash
//! country_mentions data/segment --window 3 --out data/count --csv
//! ```
//!
//! See `--help` for all available options.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use log::error;

use country_mentions::{
    CapitalizedPhraseExtractor, CooccurrenceCounter, CountryRegistry, CsvCorpus, DEFAULT_WINDOW,
    Director, FrequencyCounter, RuleSegmenter, RunReport, Year, analyze_directory, export,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Directory of annual YYYY.txt files, or a CSV file with --from-csv
    input: PathBuf,

    /// JSON country list; the bundled list is used if omitted
    #[arg(long)]
    countries: Option<PathBuf>,

    /// Number of consecutive sentences per co-occurrence window
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    window: NonZeroUsize,

    /// Directory where the count files are written
    #[arg(long, default_value = "counts")]
    out: PathBuf,

    /// Read the input as a date,content CSV corpus
    #[arg(long, default_value_t = false)]
    from_csv: bool,

    /// Drop CSV rows dated before this year
    #[arg(long)]
    from_year: Option<Year>,

    /// Drop CSV rows dated after this year
    #[arg(long)]
    to_year: Option<Year>,

    /// Also write the per-country totals as CSV
    #[arg(long, default_value_t = false)]
    csv: bool,

    /// How many of the most mentioned countries to print
    #[arg(long, default_value_t = 10)]
    top: usize,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("input path {} does not exist", cli.input.display()).into());
    }

    let countries = Arc::new(match &cli.countries {
        Some(path) => CountryRegistry::load(path)?,
        None => CountryRegistry::builtin()?,
    });

    let (cooccurrence, report) = if cli.from_csv {
        analyze_csv(cli, &countries)
    } else {
        analyze_directory(&countries, &cli.input, cli.window)
    };

    let frequency = cooccurrence.frequency();
    export::write_counts(frequency.total(), frequency.annual(), &cli.out.join("frequency"))?;
    export::write_counts(
        cooccurrence.total(),
        cooccurrence.annual(),
        &cli.out.join("cooccurrence"),
    )?;
    if cli.csv {
        export::write_frequency_csv(frequency.total(), &cli.out.join("total_count.csv"))?;
    }

    println!(
        "Analyzed {} document(s) in {} window(s).",
        report.documents, report.windows
    );
    for (name, count) in export::sort_counts(frequency.total()).into_iter().take(cli.top) {
        println!("{count:>8}  {name}");
    }
    print_skipped(&report);
    Ok(())
}

fn analyze_csv(cli: &Cli, countries: &Arc<CountryRegistry>) -> (CooccurrenceCounter, RunReport) {
    let mut corpus = CsvCorpus::new(&cli.input);
    if cli.from_year.is_some() || cli.to_year.is_some() {
        corpus = corpus.between(
            cli.from_year.unwrap_or(Year::MIN),
            cli.to_year.unwrap_or(Year::MAX),
        );
    }
    let frequency = FrequencyCounter::new(Arc::clone(countries));
    let mut cooccurrence = CooccurrenceCounter::new(Arc::clone(countries), frequency);
    let director =
        Director::new(RuleSegmenter, CapitalizedPhraseExtractor).with_window(cli.window);
    let report = director.dispatch(corpus.documents(), &mut [&mut cooccurrence]);
    (cooccurrence, report)
}

fn print_skipped(report: &RunReport) {
    if report.skipped.is_empty() {
        return;
    }
    eprintln!("Skipped {} document(s):", report.skipped.len());
    for err in &report.skipped {
        eprintln!("  {err}");
    }
}
