//! Writing counter state to disk for downstream reporting.
//!
//! The counters guarantee deterministic key sets (canonical names
//! only); the JSON files make no promise about key order beyond the
//! year-sorted annual maps.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;

use serde::Serialize;

use crate::counter::Count;

/// Serialize `total` and `annual` as pretty JSON files named
/// `total_count.json` and `annual_count.json` under `dir`, creating
/// the directory if needed. Works for both counter shapes.
pub fn write_counts<T, A>(total: &T, annual: &A, dir: &Path) -> io::Result<()>
where
    T: Serialize,
    A: Serialize,
{
    fs::create_dir_all(dir)?;
    write_json(total, &dir.join("total_count.json"))?;
    write_json(annual, &dir.join("annual_count.json"))
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> io::Result<()> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

/// Counts sorted by descending count, name as the tiebreaker, ready
/// for tabular output.
pub fn sort_counts(counts: &Count) -> Vec<(&str, u64)> {
    let mut sorted: Vec<(&str, u64)> = counts
        .iter()
        .map(|(name, &count)| (name.as_str(), count))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    sorted
}

/// Write per-country totals as `country,count` rows, most mentioned
/// first.
pub fn write_frequency_csv(counts: &Count, path: &Path) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["country", "count"])?;
    for (name, count) in sort_counts(counts) {
        writer.write_record([name, &count.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value as Json;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn counts(pairs: &[(&str, u64)]) -> Count {
        pairs
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect()
    }

    #[test]
    fn sort_counts_orders_by_count_then_name() {
        let map = counts(&[("France", 2), ("Brazil", 5), ("Canada", 2)]);
        assert_eq!(
            sort_counts(&map),
            [("Brazil", 5), ("Canada", 2), ("France", 2)]
        );
    }

    #[test]
    fn write_counts_produces_both_files() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("frequency");
        let total = counts(&[("France", 3)]);
        let annual: BTreeMap<i16, Count> =
            [(2017, counts(&[("France", 1)])), (2018, counts(&[("France", 2)]))]
                .into_iter()
                .collect();

        write_counts(&total, &annual, &out).unwrap();

        let total_json: Json =
            serde_json::from_str(&fs::read_to_string(out.join("total_count.json")).unwrap())
                .unwrap();
        assert_eq!(total_json["France"], 3);
        let annual_json: Json =
            serde_json::from_str(&fs::read_to_string(out.join("annual_count.json")).unwrap())
                .unwrap();
        assert_eq!(annual_json["2017"]["France"], 1);
        assert_eq!(annual_json["2018"]["France"], 2);
    }

    #[test]
    fn frequency_csv_is_sorted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("total_count.csv");
        let map = counts(&[("France", 1), ("Brazil", 4)]);

        write_frequency_csv(&map, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines, ["country,count", "Brazil,4", "France,1"]);
    }
}
