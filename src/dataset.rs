use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::collector::MatchRecord;

const CSV_HEADER: &str = "id,date,home_team,away_team,home_score,away_score,status,matchweek";

/// Writes the collected season as CSV, dropping any repeated ids that made
/// it into the list. Returns the number of rows written. The write goes
/// through a tmp file and a rename.
pub fn save_matches_csv(path: &Path, matches: &[MatchRecord]) -> Result<usize> {
    let mut seen = HashSet::new();
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    let mut rows = 0usize;
    for m in matches {
        if !seen.insert(m.id.as_str()) {
            continue;
        }
        let row = [
            csv_field(&m.id),
            m.date.format("%Y-%m-%d").to_string(),
            csv_field(&m.home_team),
            csv_field(&m.away_team),
            m.home_score.map(|s| s.to_string()).unwrap_or_default(),
            m.away_score.map(|s| s.to_string()).unwrap_or_default(),
            m.status.as_str().to_string(),
            csv_field(&m.matchweek),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
        rows += 1;
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).ok();
        }
    }
    let tmp = path.with_extension("csv.tmp");
    fs::write(&tmp, out).context("write matches csv")?;
    fs::rename(&tmp, path).context("swap matches csv")?;
    Ok(rows)
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::MatchStatus;
    use chrono::NaiveDate;

    fn record(id: &str, home: &str) -> MatchRecord {
        MatchRecord {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 8, 2).expect("valid test date"),
            home_team: home.to_string(),
            away_team: "Chelsea".to_string(),
            home_score: Some(2),
            away_score: Some(1),
            status: MatchStatus::Finished,
            matchweek: "Matchweek 1".to_string(),
        }
    }

    #[test]
    fn quotes_fields_with_separators() {
        assert_eq!(csv_field("Arsenal"), "Arsenal");
        assert_eq!(csv_field("Brighton, Hove"), "\"Brighton, Hove\"");
        assert_eq!(csv_field("The \"Reds\""), "\"The \"\"Reds\"\"\"");
    }

    #[test]
    fn writes_deduplicated_rows() {
        let dir = std::env::temp_dir().join("pl_elo_dataset_test");
        fs::create_dir_all(&dir).expect("temp dir should be writable");
        let path = dir.join("matches.csv");

        let matches = [record("m1", "Arsenal"), record("m2", "Fulham"), record("m1", "Arsenal")];
        let rows = save_matches_csv(&path, &matches).expect("csv should save");
        assert_eq!(rows, 2);

        let raw = fs::read_to_string(&path).expect("csv should read back");
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "m1,2025-08-02,Arsenal,Chelsea,2,1,finished,Matchweek 1");
    }
}
