use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::domain::MatchRecord;
use crate::errors::{read_context, row_context};

/// Columns used from an ATP/WTA match file; the rest are ignored
#[derive(Debug, Deserialize)]
struct MatchRow {
    tourney_date: String,
    #[serde(default)]
    surface: String,
    winner_name: String,
    loser_name: String,
    #[serde(default)]
    score: String,
    #[serde(default)]
    best_of: Option<u8>,
    #[serde(default)]
    round: String,
}

impl MatchRow {
    fn into_record(self) -> Result<MatchRecord, crate::errors::ValidationError> {
        MatchRecord::parse(
            &self.tourney_date,
            &self.surface,
            &self.winner_name,
            &self.loser_name,
            &self.score,
            self.best_of.unwrap_or(3),
            &self.round,
        )
    }
}

/// Matches read from one source, with the number of rows dropped
#[derive(Debug, Default)]
pub struct IngestedFile {
    pub matches: Vec<MatchRecord>,
    pub skipped: usize,
}

/// Reads match files into a chronologically sorted list of validated records
pub struct IngestionService {
    paths: Vec<PathBuf>,
}

impl IngestionService {
    pub fn new<P: AsRef<Path>>(paths: &[P]) -> Self {
        Self {
            paths: paths.iter().map(|p| p.as_ref().to_path_buf()).collect(),
        }
    }

    pub fn run(&self) -> Result<Vec<MatchRecord>> {
        info!("=== Starting Match Ingestion ===");

        let mut all_matches = Vec::new();
        let mut skipped = 0;

        for path in &self.paths {
            let file = self.read_file(path)?;
            info!(
                "  → {}: {} matches, {} rows skipped",
                path.display(),
                file.matches.len(),
                file.skipped
            );
            skipped += file.skipped;
            all_matches.extend(file.matches);
        }

        sort_chronologically(&mut all_matches);
        info!(
            "=== Ingestion Complete: {} matches ({} skipped) ===",
            all_matches.len(),
            skipped
        );
        Ok(all_matches)
    }

    fn read_file(&self, path: &Path) -> Result<IngestedFile> {
        let file = File::open(path).with_context(|| read_context(path))?;
        read_matches(file, path)
    }
}

/// Parse CSV match rows. Invalid rows are logged and skipped.
pub fn read_matches<R: Read>(reader: R, source: &Path) -> Result<IngestedFile> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut ingested = IngestedFile::default();

    for row in csv_reader.deserialize::<MatchRow>() {
        let row = match row {
            Ok(row) => row,
            Err(e) if is_row_error(&e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                warn!("Skipping malformed row {} in {}: {}", line, source.display(), e);
                ingested.skipped += 1;
                continue;
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                return Err(e).with_context(|| row_context(source, line));
            }
        };

        match row.into_record() {
            Ok(record) => ingested.matches.push(record),
            Err(e) => {
                warn!("Skipping invalid match in {}: {}", source.display(), e);
                ingested.skipped += 1;
            }
        }
    }

    Ok(ingested)
}

/// Stable: matches on the same date keep file order
pub fn sort_chronologically(matches: &mut [MatchRecord]) {
    matches.sort_by_key(MatchRecord::date);
}

fn is_row_error(e: &csv::Error) -> bool {
    matches!(
        e.kind(),
        csv::ErrorKind::Deserialize { .. } | csv::ErrorKind::UnequalLengths { .. }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Surface;
    use chrono::NaiveDate;

    const SAMPLE: &str = "\
tourney_id,tourney_date,surface,winner_name,loser_name,score,best_of,round
2024-580,20240115,Hard,Jannik  Sinner,Daniil Medvedev,3-6 3-6 6-4 6-4 6-3,5,F
2024-339,20240101,Hard,Alex de Minaur,Grigor Dimitrov,6-3 6-3,3,SF
2024-339,20240101,,Grigor Dimitrov,Holger Rune,7-6 6-4,3,QF
2024-999,2024-01-01,Clay,A,B,6-0 6-0,3,R32
2024-999,20240102,Sand,A,B,6-0 6-0,3,R32
2024-999,20240102,Clay,A,A,6-0 6-0,3,R32
2024-999,20240102,Clay,A,B,6-0 6-0,x,R32
";

    #[test]
    fn test_reads_valid_rows_and_skips_invalid_ones() {
        let file = read_matches(SAMPLE.as_bytes(), Path::new("sample.csv")).unwrap();

        assert_eq!(file.matches.len(), 3);
        assert_eq!(file.skipped, 4);

        let final_match = &file.matches[0];
        assert_eq!(final_match.winner(), "Jannik Sinner");
        assert_eq!(final_match.best_of(), 5);
        assert_eq!(final_match.round(), "F");
        // Blank surface defaults to hard
        assert_eq!(file.matches[2].surface(), Surface::Hard);
    }

    #[test]
    fn test_sort_is_stable_by_date() {
        let mut matches = read_matches(SAMPLE.as_bytes(), Path::new("sample.csv"))
            .unwrap()
            .matches;
        sort_chronologically(&mut matches);

        let dates: Vec<NaiveDate> = matches.iter().map(MatchRecord::date).collect();
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(matches[0].round(), "SF");
        assert_eq!(matches[1].round(), "QF");
        assert_eq!(matches[2].round(), "F");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let service = IngestionService::new(&["/nonexistent/tennis_ranking/matches.csv"]);
        let err = service.run().unwrap_err();
        assert!(err.to_string().contains("Failed to read match file"));
    }
}
