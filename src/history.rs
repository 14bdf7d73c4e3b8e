use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use log::warn;
use thiserror::Error;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Reading history from `{0}` failed with error: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Appending history to `{0}` failed with error: {1}")]
    Append(PathBuf, std::io::Error),

    #[error("Removing history file `{0}` failed with error: {1}")]
    Remove(PathBuf, std::io::Error),

    #[error("Exporting history to `{0}` failed with error: {1}")]
    Export(PathBuf, std::io::Error),
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub timestamp: DateTime<Local>,
    pub expression: String,
    pub result: String,
}

impl Entry {
    fn new(expression: &str, result: &str) -> Self {
        Entry {
            timestamp: Local::now(),
            expression: expression.to_string(),
            result: result.to_string(),
        }
    }

    /// Parses a `YYYY-MM-DD HH:MM:SS: expr = result` line. Lines that do
    /// not match keep their raw text as the expression, stamped with the
    /// current time.
    fn from_line(line: &str) -> Self {
        let timestamp_len = "0000-00-00 00:00:00".len();
        if line.len() > timestamp_len + 2 && line.is_char_boundary(timestamp_len) {
            let (head, rest) = line.split_at(timestamp_len);
            if let (Ok(naive), Some(body)) = (
                NaiveDateTime::parse_from_str(head, TIMESTAMP_FORMAT),
                rest.strip_prefix(": "),
            ) {
                let timestamp = naive
                    .and_local_timezone(Local)
                    .single()
                    .unwrap_or_else(Local::now);
                let (expression, result) = match body.rsplit_once(" = ") {
                    Some((e, r)) => (e.to_string(), r.to_string()),
                    None => (body.to_string(), String::new()),
                };
                return Entry {
                    timestamp,
                    expression,
                    result,
                };
            }
        }
        warn!("malformed history line: {}", line);
        Entry::new(line, "")
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} = {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.expression,
            self.result
        )
    }
}

/// Append-only calculation log. Each append lands in memory and, when the
/// history is file-backed, on the end of the file; nothing else writes it.
#[derive(Debug)]
pub struct History {
    entries: Vec<Entry>,
    path: Option<PathBuf>,
    ascending: bool,
}

impl History {
    pub fn in_memory() -> Self {
        History {
            entries: vec![],
            path: None,
            ascending: true,
        }
    }

    /// Loads prior entries from `path`; a missing file is an empty history.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let mut entries = vec![];
        if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| Error::Read(path.clone(), e))?;
            entries.extend(contents.lines().filter(|l| !l.is_empty()).map(Entry::from_line));
        }
        Ok(History {
            entries,
            path: Some(path),
            ascending: true,
        })
    }

    pub fn append(&mut self, expression: &str, result: &str) -> Result<(), Error> {
        let entry = Entry::new(expression, result);
        if let Some(path) = &self.path {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| Error::Append(path.clone(), e))?;
            writeln!(file, "{}", entry).map_err(|e| Error::Append(path.clone(), e))?;
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive substring search over the rendered entries.
    pub fn search(&self, term: &str) -> Vec<&Entry> {
        let term = term.to_lowercase();
        self.sorted()
            .into_iter()
            .filter(|e| e.to_string().to_lowercase().contains(&term))
            .collect()
    }

    pub fn sorted(&self) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self.entries.iter().collect();
        entries.sort_by_key(|e| e.timestamp);
        if !self.ascending {
            entries.reverse();
        }
        entries
    }

    pub fn toggle_sort(&mut self) {
        self.ascending = !self.ascending;
    }

    pub fn clear(&mut self) -> Result<(), Error> {
        self.entries.clear();
        if let Some(path) = &self.path {
            if path.exists() {
                fs::remove_file(path).map_err(|e| Error::Remove(path.clone(), e))?;
            }
        }
        Ok(())
    }

    /// Single-column CSV, one rendered entry per row.
    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let mut out = String::from("Calculation\n");
        for entry in self.sorted() {
            let line = entry.to_string().replace('"', "\"\"");
            out.push('"');
            out.push_str(&line);
            out.push_str("\"\n");
        }
        fs::write(path, out).map_err(|e| Error::Export(path.to_path_buf(), e))
    }

    /// Number of calculations per calendar day, oldest day first. Feeds
    /// the history bar chart.
    pub fn counts_by_date(&self) -> Vec<(NaiveDate, usize)> {
        let mut counts: Vec<(NaiveDate, usize)> = vec![];
        for entry in &self.entries {
            let date = entry.timestamp.date_naive();
            match counts.iter_mut().find(|(d, _)| *d == date) {
                Some((_, n)) => *n += 1,
                None => counts.push((date, 1)),
            }
        }
        counts.sort_by_key(|(d, _)| *d);
        counts
    }
}
