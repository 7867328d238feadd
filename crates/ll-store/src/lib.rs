//! Storage layer for lifelog.
//!
//! Records live in a single CSV file whose first row is always the header
//! `date,activity,duration,mood,tags,notes`. Appending is the only mutation;
//! every read loads the whole file.
//!
//! # Concurrency
//!
//! There is no locking. The table assumes a single writer, and readers see
//! whatever rows were fully written before they opened the file.
//!
//! # Export
//!
//! [`write_export`] writes the derived tables and the text report into an
//! output directory. It never opens the source table.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Writer, WriterBuilder};
use ll_core::export::{ActivityAverage, WeekdayHours};
use ll_core::{ActivityRecord, ExportBundle, HEADER, StoredRow};
use thiserror::Error;

/// Cleaned copy of the backing table.
pub const CLEANED_FILE: &str = "lifelog_cleaned.csv";
/// Mean hours per activity.
pub const AVERAGES_FILE: &str = "avg_duration_per_activity.csv";
/// Total hours per weekday, Monday first.
pub const WEEKDAYS_FILE: &str = "hours_per_weekday.csv";
/// Three-line text summary.
pub const REPORT_FILE: &str = "summary_report.txt";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing table does not exist yet.
    #[error("no data file at {}", path.display())]
    Unavailable { path: PathBuf },
    /// An I/O error on a specific path.
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A malformed CSV stream or a failed CSV write.
    #[error("csv error in {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl StoreError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn csv(path: &Path) -> impl FnOnce(csv::Error) -> Self + '_ {
        move |source| Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Handle to the backing table.
#[derive(Debug, Clone)]
pub struct Table {
    path: PathBuf,
}

impl Table {
    /// Points at a table file. Nothing is read or created until used.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Writes the header row if the file is missing or empty, creating any
    /// parent directories.
    ///
    /// Returns `true` when the header was written. Safe to call repeatedly.
    pub fn init(&self) -> Result<bool, StoreError> {
        if self.has_content()? {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(StoreError::io(parent))?;
        }
        let mut writer = Writer::from_path(&self.path).map_err(StoreError::csv(&self.path))?;
        writer
            .write_record(HEADER)
            .map_err(StoreError::csv(&self.path))?;
        writer.flush().map_err(StoreError::io(&self.path))?;
        tracing::info!(path = %self.path.display(), "created data file");
        Ok(true)
    }

    fn has_content(&self) -> Result<bool, StoreError> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() > 0),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(&self.path)(e)),
        }
    }

    /// Appends one record as a single six-field row.
    ///
    /// A hand-edited file whose last line lacks a terminator gets one first,
    /// so the new row never joins the previous one.
    pub fn append(&self, record: &ActivityRecord) -> Result<(), StoreError> {
        self.init()?;
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(StoreError::io(&self.path))?;
        if !ends_with_newline(&mut file).map_err(StoreError::io(&self.path))? {
            tracing::debug!(path = %self.path.display(), "terminating last line");
            file.write_all(b"\n").map_err(StoreError::io(&self.path))?;
        }
        let mut writer = WriterBuilder::new().from_writer(file);
        writer
            .write_record(record.to_fields())
            .map_err(StoreError::csv(&self.path))?;
        writer.flush().map_err(StoreError::io(&self.path))?;
        tracing::info!(
            date = %record.date,
            activity = %record.activity,
            "appended record"
        );
        Ok(())
    }

    /// Reads every row after the header, in stored order.
    ///
    /// Rows may have any number of fields; judging them is left to
    /// [`ll_core::screen`]. Bytes that are not valid UTF-8 are replaced with
    /// U+FFFD rather than failing the whole read.
    pub fn read_rows(&self) -> Result<Vec<StoredRow>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::Unavailable {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(StoreError::io(&self.path)(e)),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let mut rows = Vec::new();
        for (i, result) in reader.byte_records().enumerate() {
            let record = result.map_err(StoreError::csv(&self.path))?;
            // Line 1 is the header.
            let line = i + 2;
            if record.iter().any(|field| std::str::from_utf8(field).is_err()) {
                tracing::warn!(line, "row is not valid UTF-8, decoding lossily");
            }
            rows.push(StoredRow::new(
                line,
                record.iter().map(String::from_utf8_lossy),
            ));
        }
        tracing::debug!(path = %self.path.display(), rows = rows.len(), "read data file");
        Ok(rows)
    }
}

fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Paths of the files written by [`write_export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub cleaned: PathBuf,
    pub averages: PathBuf,
    pub weekdays: PathBuf,
    pub report: PathBuf,
}

/// Writes the export artifacts into `dir`, creating it if needed. Existing
/// artifacts are overwritten.
pub fn write_export(dir: &Path, bundle: &ExportBundle) -> Result<ExportPaths, StoreError> {
    fs::create_dir_all(dir).map_err(StoreError::io(dir))?;

    let paths = ExportPaths {
        cleaned: dir.join(CLEANED_FILE),
        averages: dir.join(AVERAGES_FILE),
        weekdays: dir.join(WEEKDAYS_FILE),
        report: dir.join(REPORT_FILE),
    };

    write_table(
        &paths.cleaned,
        HEADER,
        bundle.cleaned.iter().map(ll_core::CleanRecord::to_fields),
    )?;
    write_table(
        &paths.averages,
        ["activity", "mean_hours"],
        bundle.averages.iter().map(average_row),
    )?;
    write_table(
        &paths.weekdays,
        ["weekday", "hours"],
        bundle.weekdays.iter().map(weekday_row),
    )?;
    fs::write(&paths.report, bundle.report.to_string()).map_err(StoreError::io(&paths.report))?;

    tracing::info!(dir = %dir.display(), rows = bundle.cleaned.len(), "wrote export");
    Ok(paths)
}

fn average_row(avg: &ActivityAverage) -> [String; 2] {
    [avg.activity.clone(), avg.mean_hours.to_string()]
}

fn weekday_row(day: &WeekdayHours) -> [String; 2] {
    [day.weekday.to_string(), day.hours.to_string()]
}

fn write_table<H, R, I>(path: &Path, header: H, rows: I) -> Result<(), StoreError>
where
    H: IntoIterator,
    H::Item: AsRef<[u8]>,
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = Writer::from_path(path).map_err(StoreError::csv(path))?;
    writer.write_record(header).map_err(StoreError::csv(path))?;
    for row in rows {
        writer.write_record(row).map_err(StoreError::csv(path))?;
    }
    writer.flush().map_err(StoreError::io(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    use ll_core::{RecordInput, parse, screen};
    use tempfile::TempDir;

    fn record(fields: [&str; 6]) -> ActivityRecord {
        parse(&RecordInput::from_fields(fields)).unwrap()
    }

    fn table_in(temp: &TempDir) -> Table {
        Table::open(temp.path().join("data").join("lifelog.csv"))
    }

    #[test]
    fn init_writes_header_once() {
        let temp = TempDir::new().unwrap();
        let table = table_in(&temp);

        assert!(table.init().unwrap());
        assert!(!table.init().unwrap());

        let content = fs::read_to_string(table.path()).unwrap();
        assert_eq!(content, "date,activity,duration,mood,tags,notes\n");
    }

    #[test]
    fn read_missing_table_is_unavailable() {
        let temp = TempDir::new().unwrap();
        let table = table_in(&temp);

        let err = table.read_rows().unwrap_err();

        assert!(matches!(err, StoreError::Unavailable { .. }));
        assert!(!table.exists());
    }

    #[test]
    fn append_preserves_order() {
        let temp = TempDir::new().unwrap();
        let table = table_in(&temp);
        let records = [
            record(["2025-01-06", "run", "1.5", "happy", "health,cardio", ""]),
            record(["2025-01-06", "Run", "1", "tired", "health", "slow, windy"]),
            record(["2025-01-07", "read", "0.5", "", "", ""]),
        ];

        for r in &records {
            table.append(r).unwrap();
        }
        let rows = table.read_rows().unwrap();

        assert_eq!(rows.len(), 3);
        for (row, r) in rows.iter().zip(&records) {
            assert_eq!(row.fields, r.to_fields().to_vec());
        }
        assert_eq!(rows.iter().map(|r| r.line).collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn embedded_commas_are_quoted() {
        let temp = TempDir::new().unwrap();
        let table = table_in(&temp);

        table
            .append(&record(["2025-01-06", "Run", "1", "Ok", "a, b", "x"]))
            .unwrap();

        let content = fs::read_to_string(table.path()).unwrap();
        assert!(content.ends_with("2025-01-06,Run,1,Ok,\"a, b\",x\n"));
    }

    #[test]
    fn read_keeps_short_rows_for_listing() {
        let temp = TempDir::new().unwrap();
        let table = table_in(&temp);
        table.init().unwrap();
        let mut content = fs::read_to_string(table.path()).unwrap();
        content.push_str("2025-01-06,Run,3\n2025-01-06,Swim,1,Ok,,\n");
        fs::write(table.path(), content).unwrap();

        let rows = table.read_rows().unwrap();
        let screening = screen(&rows);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields, vec!["2025-01-06", "Run", "3"]);
        assert_eq!(screening.kept.len(), 1);
        assert_eq!(screening.skipped[0].line, 2);
    }

    #[test]
    fn read_decodes_invalid_utf8_lossily() {
        let temp = TempDir::new().unwrap();
        let table = table_in(&temp);
        table.init().unwrap();
        let mut content = fs::read(table.path()).unwrap();
        content.extend_from_slice(b"2025-01-06,Run,1.5,Happy,,\n");
        content.extend_from_slice(b"2025-01-07,Read,1,Calm,,caf\xE9\n");
        fs::write(table.path(), content).unwrap();

        let rows = table.read_rows().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields[1], "Run");
        assert_eq!(rows[1].fields[1], "Read");
        assert_eq!(rows[1].fields[5], "caf\u{FFFD}");
        assert_eq!(screen(&rows).kept.len(), 2);
    }

    #[test]
    fn init_fills_empty_file_with_header() {
        let temp = TempDir::new().unwrap();
        let table = table_in(&temp);
        fs::create_dir_all(table.path().parent().unwrap()).unwrap();
        fs::write(table.path(), "").unwrap();

        table
            .append(&record(["2025-01-06", "Run", "1.5", "Happy", "", ""]))
            .unwrap();

        assert_eq!(
            fs::read_to_string(table.path()).unwrap(),
            "date,activity,duration,mood,tags,notes\n2025-01-06,Run,1.5,Happy,,\n"
        );
        let rows = table.read_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, 2);
    }

    #[test]
    fn append_after_unterminated_last_line() {
        let temp = TempDir::new().unwrap();
        let table = table_in(&temp);
        fs::create_dir_all(table.path().parent().unwrap()).unwrap();
        fs::write(
            table.path(),
            "date,activity,duration,mood,tags,notes\n2025-01-06,Run,1.5,Happy,,",
        )
        .unwrap();

        table
            .append(&record(["2025-01-07", "Read", "1", "Calm", "", ""]))
            .unwrap();
        let rows = table.read_rows().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields, vec!["2025-01-06", "Run", "1.5", "Happy", "", ""]);
        assert_eq!(rows[1].fields, vec!["2025-01-07", "Read", "1", "Calm", "", ""]);
        let total: f64 = screen(&rows).kept.iter().filter_map(|e| e.hours).sum();
        assert!((total - 2.5).abs() < 1e-9);
    }

    #[test]
    fn export_writes_all_artifacts_without_touching_source() {
        let temp = TempDir::new().unwrap();
        let table = table_in(&temp);
        table
            .append(&record(["2025-01-06", "Run", "1.5", "Happy", "health", ""]))
            .unwrap();
        table
            .append(&record(["2025-01-06", "Run", "1.5", "Happy", "health", ""]))
            .unwrap();
        table
            .append(&record(["2025-01-12", "Read", "1", "Calm", "", ""]))
            .unwrap();
        let before = fs::read_to_string(table.path()).unwrap();

        let rows = table.read_rows().unwrap();
        let bundle = ExportBundle::build(&screen(&rows).kept);
        let out = temp.path().join("out").join("nested");
        let paths = write_export(&out, &bundle).unwrap();

        assert_eq!(fs::read_to_string(table.path()).unwrap(), before);
        assert_eq!(
            fs::read_to_string(&paths.cleaned).unwrap(),
            "date,activity,duration,mood,tags,notes\n\
             2025-01-06,Run,1.5,Happy,health,\n\
             2025-01-12,Read,1,Calm,,\n"
        );
        assert_eq!(
            fs::read_to_string(&paths.averages).unwrap(),
            "activity,mean_hours\nRead,1\nRun,1.5\n"
        );
        let weekdays = fs::read_to_string(&paths.weekdays).unwrap();
        let lines: Vec<_> = weekdays.lines().collect();
        assert_eq!(lines[0], "weekday,hours");
        assert_eq!(lines[1], "Monday,1.5");
        assert_eq!(lines[7], "Sunday,1");
        assert_eq!(
            fs::read_to_string(&paths.report).unwrap(),
            "Most common activity: Run\nMost common mood: Happy\nTotal hours logged: 2.5\n"
        );
    }

    #[test]
    fn export_of_cleaned_table_is_stable() {
        let temp = TempDir::new().unwrap();
        let table = table_in(&temp);
        table
            .append(&record(["2025-01-06", "run", "2", "ok", "B, a", "n"]))
            .unwrap();
        table
            .append(&record(["2025-01-06", "Run", "2.0", "OK", "b,a", "n"]))
            .unwrap();

        let first = write_export(
            &temp.path().join("first"),
            &ExportBundle::build(&screen(&table.read_rows().unwrap()).kept),
        )
        .unwrap();
        let cleaned = Table::open(&first.cleaned);
        let second = write_export(
            &temp.path().join("second"),
            &ExportBundle::build(&screen(&cleaned.read_rows().unwrap()).kept),
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(&first.cleaned).unwrap(),
            fs::read_to_string(&second.cleaned).unwrap()
        );
    }
}
