use crate::app_dirs::AppDirs;
use crate::catalog::GameKind;
use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

const HEADER: [&str; 8] = [
    "date",
    "game",
    "rounds",
    "items",
    "score",
    "max_score",
    "accuracy",
    "elapsed_secs",
];

/// One finished session, as appended to the results log.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub game: GameKind,
    pub finished_at: DateTime<Local>,
    pub rounds: u32,
    pub score: u32,
    pub max_score: u32,
    /// Percent, 0..=100.
    pub accuracy: f64,
    /// Numbers shown (sum) or rounds configured (position).
    pub items: u32,
    pub elapsed_secs: f64,
}

/// Append-only CSV history of finished sessions.
#[derive(Debug, Clone)]
pub struct ResultsLog {
    path: PathBuf,
}

impl ResultsLog {
    /// Log under the user's state directory, if one can be resolved.
    pub fn new() -> Option<Self> {
        AppDirs::results_log_path().map(Self::with_path)
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, summary: &SessionSummary) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        // header only on first write
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(HEADER)?;
        }
        writer.write_record([
            summary.finished_at.format("%c").to_string(),
            summary.game.to_string(),
            summary.rounds.to_string(),
            summary.items.to_string(),
            summary.score.to_string(),
            summary.max_score.to_string(),
            format!("{:.2}", summary.accuracy),
            format!("{:.2}", summary.elapsed_secs),
        ])?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn summary(game: GameKind, score: u32) -> SessionSummary {
        SessionSummary {
            game,
            finished_at: Local::now(),
            rounds: 1,
            score,
            max_score: 1,
            accuracy: 100.0 * f64::from(score),
            items: 5,
            elapsed_secs: 9.5,
        }
    }

    #[test]
    fn writes_header_once() {
        let dir = tempdir().unwrap();
        let log = ResultsLog::with_path(dir.path().join("nested").join("results.csv"));
        log.append(&summary(GameKind::SumMemory, 1)).unwrap();
        log.append(&summary(GameKind::PositionNumber, 0)).unwrap();

        let mut reader = csv::Reader::from_path(log.path()).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), HEADER.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "sum-memory");
        assert_eq!(&rows[0][6], "100.00");
        assert_eq!(&rows[1][1], "position-number");
        assert_eq!(&rows[1][4], "0");
        assert_eq!(&rows[1][7], "9.50");
    }
}
