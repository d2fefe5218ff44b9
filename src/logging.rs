//! Terminal and file logging with task summary collection.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

/// Task execution result for summary reporting.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Task name as shown in the summary.
    pub name: String,
    /// Final status of the task.
    pub status: TaskStatus,
    /// Optional detail shown next to the status.
    pub message: Option<String>,
}

/// Status of a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Completed successfully.
    Ok,
    /// Not applicable in this run (e.g., nothing to back up).
    NotApplicable,
    /// Applicable but skipped with a reason.
    Skipped,
    /// Previewed only (`--dry-run`).
    DryRun,
    /// Failed with an error.
    Failed,
}

/// Structured logger with dry-run awareness and summary collection.
///
/// All messages are always written to a persistent log file at
/// `$XDG_CACHE_HOME/sshconf/install.log` (default `~/.cache/sshconf/install.log`)
/// with timestamps and ANSI codes stripped, regardless of the quiet/verbose
/// flags.
#[derive(Debug)]
pub struct Logger {
    verbose: bool,
    quiet: bool,
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

/// Return the log file path under `$XDG_CACHE_HOME/sshconf/` (or `~/.cache/sshconf/`).
fn log_file_path() -> Option<PathBuf> {
    let cache_dir = std::env::var("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".cache")
        });
    let dir = cache_dir.join("sshconf");
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join("install.log"))
}

/// Strip ANSI escape sequences from a string.
fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until 'm' (end of SGR sequence)
            for inner in chars.by_ref() {
                if inner == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

impl Logger {
    /// Create a logger and start a fresh log file for this run.
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        let log_file = log_file_path();

        if let Some(ref path) = log_file {
            let header = format!(
                "==========================================\n\
                 sshconf {} {}\n\
                 ==========================================\n",
                crate::version(),
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            );
            // Truncate and write header (new run = fresh log)
            let _ = fs::write(path, header);
        }

        Self {
            verbose,
            quiet,
            tasks: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Append a line to the persistent log file.
    fn write_to_file(&self, level: &str, msg: &str) {
        if let Some(ref path) = self.log_file
            && let Ok(mut f) = fs::OpenOptions::new().append(true).open(path)
        {
            let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            let clean = strip_ansi(msg);
            let _ = writeln!(f, "{ts} {level} {clean}");
        }
    }

    /// Return the log file path, if available.
    #[cfg(test)]
    pub fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Create a logger writing to an explicit log file (test only).
    #[cfg(test)]
    pub fn with_log_file(verbose: bool, quiet: bool, path: PathBuf) -> Self {
        let _ = fs::write(&path, "");
        Self {
            verbose,
            quiet,
            tasks: Mutex::new(Vec::new()),
            log_file: Some(path),
        }
    }

    /// Errors are always shown, even under `--quiet`.
    pub fn error(&self, msg: &str) {
        eprintln!("\x1b[31mERROR\x1b[0m {msg}");
        self.write_to_file("ERR", msg);
    }

    /// Warnings are always shown, even under `--quiet`.
    pub fn warn(&self, msg: &str) {
        eprintln!("\x1b[33mWARN\x1b[0m  {msg}");
        self.write_to_file("WRN", msg);
    }

    /// Announce the start of a stage (task).
    pub fn stage(&self, msg: &str) {
        if !self.quiet {
            println!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m");
        }
        self.write_to_file("STG", msg);
    }

    /// Informational message, suppressed under `--quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {msg}");
        }
        self.write_to_file("INF", msg);
    }

    /// Debug message, shown only under `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            println!("  \x1b[2m{msg}\x1b[0m");
        }
        // Always log debug to file, even when not verbose on terminal
        self.write_to_file("DBG", msg);
    }

    /// Preview message for `--dry-run` output.
    pub fn dry_run(&self, msg: &str) {
        if !self.quiet {
            println!("  \x1b[33m[DRY RUN]\x1b[0m {msg}");
        }
        self.write_to_file("DRY", msg);
    }

    /// Record a task result for the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Number of tasks recorded as failed so far.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.tasks.lock().map_or(0, |tasks| {
            tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded tasks.
    pub fn print_summary(&self) {
        let Ok(tasks) = self.tasks.lock() else {
            return;
        };
        if tasks.is_empty() {
            return;
        }

        if !self.quiet {
            println!();
        }
        self.stage("Summary");

        let mut ok = 0u32;
        let mut not_applicable = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for task in tasks.iter() {
            let (icon, color) = match task.status {
                TaskStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                TaskStatus::NotApplicable => {
                    not_applicable += 1;
                    ("·", "\x1b[2m")
                }
                TaskStatus::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                TaskStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[33m")
                }
                TaskStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = match &task.message {
                Some(msg) => format!(" ({msg})"),
                None => String::new(),
            };

            let line = format!("{icon} {}{suffix}", task.name);
            if !self.quiet {
                println!("  {color}{line}\x1b[0m");
            }
            self.write_to_file("INF", &line);
        }

        let total = ok + not_applicable + skipped + dry_run + failed;
        let totals = format!(
            "{total} tasks: {ok} ok, {not_applicable} n/a, {skipped} skipped, {dry_run} dry-run, {failed} failed"
        );
        if !self.quiet {
            println!();
            println!(
                "  {total} tasks: \x1b[32m{ok} ok\x1b[0m, {not_applicable} n/a, \x1b[33m{skipped} skipped\x1b[0m, {dry_run} dry-run, \x1b[31m{failed} failed\x1b[0m"
            );
        }
        self.write_to_file("INF", &totals);

        if let Some(path) = &self.log_file {
            if !self.quiet {
                println!("  \x1b[2mlog: {}\x1b[0m", path.display());
            }
            self.write_to_file("INF", &format!("log: {}", path.display()));
        }
    }

    /// Ask the user a yes/no question. Returns `true` for `y`/`yes`.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin or stdout cannot be used.
    pub fn confirm(&self, prompt: &str) -> io::Result<bool> {
        print!("{prompt} [y/N]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        let answer = input.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn logger_new() {
        let log = Logger::new(false, false);
        assert!(!log.verbose);
        assert!(!log.quiet);
        assert!(log.tasks.lock().unwrap().is_empty());
    }

    #[test]
    fn logger_verbose() {
        let log = Logger::new(true, false);
        assert!(log.verbose);
    }

    #[test]
    fn record_task_ok() {
        let log = Logger::new(false, true);
        log.record_task("install files", TaskStatus::Ok, None);
        let tasks = log.tasks.lock().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "install files");
        assert_eq!(tasks[0].status, TaskStatus::Ok);
    }

    #[test]
    fn record_task_with_message() {
        let log = Logger::new(false, true);
        log.record_task("backup", TaskStatus::Skipped, Some("nothing to back up"));
        let tasks = log.tasks.lock().unwrap();
        assert_eq!(tasks[0].message, Some("nothing to back up".to_string()));
    }

    #[test]
    fn failure_count_counts_only_failures() {
        let log = Logger::new(false, true);
        log.record_task("a", TaskStatus::Ok, None);
        log.record_task("b", TaskStatus::Failed, Some("error"));
        log.record_task("c", TaskStatus::DryRun, None);
        assert_eq!(log.failure_count(), 1);
    }

    #[test]
    fn strip_ansi_removes_colors() {
        assert_eq!(strip_ansi("\x1b[31mERROR\x1b[0m hello"), "ERROR hello");
        assert_eq!(strip_ansi("no codes here"), "no codes here");
        assert_eq!(
            strip_ansi("\x1b[1;34m==>\x1b[0m \x1b[1mstage\x1b[0m"),
            "==> stage"
        );
    }

    #[test]
    fn log_file_is_created() {
        let log = Logger::new(false, true);
        if let Some(path) = log.log_path() {
            assert!(path.exists(), "log file should be created on Logger::new");
        }
    }

    #[test]
    fn debug_always_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("install.log");
        let log = Logger::with_log_file(false, true, path.clone()); // verbose=false
        log.debug("debug-marker");
        let contents = fs::read_to_string(&path).unwrap();
        assert!(
            contents.contains("debug-marker"),
            "debug messages should always appear in the log file"
        );
    }

    #[test]
    fn quiet_still_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("install.log");
        let log = Logger::with_log_file(false, true, path.clone());
        log.info("quiet-info");
        log.stage("quiet-stage");
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("quiet-info"));
        assert!(contents.contains("quiet-stage"));
    }
}
