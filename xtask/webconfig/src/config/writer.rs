use crate::api::{Change, ChangeMode};
use crate::error::{Result, WebConfigError};
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Plain-text report of a change list, as offered by the export action.
pub struct ChangeReport;

impl ChangeReport {
    pub fn filename(unix_ms: i64) -> String {
        format!("session_changes_{}.txt", unix_ms)
    }

    pub fn render(mode: ChangeMode, changes: &[Change], date: &DateTime<Local>) -> String {
        let title = match mode {
            ChangeMode::Session => "Session Configuration Changes",
            ChangeMode::All => "All Configuration Changes",
        };

        let mut text = String::new();
        let _ = writeln!(text, "{}", title);
        let _ = writeln!(text, "{}", "=".repeat(30));
        let _ = writeln!(text);
        let _ = writeln!(text, "Date: {}", date.format("%Y-%m-%d %H:%M:%S"));
        let _ = writeln!(text);

        for change in changes {
            let _ = writeln!(text, "{}:", change.name);
            if !change.prompt.is_empty() {
                let _ = writeln!(text, "  Description: {}", change.prompt);
            }
            let _ = writeln!(text, "  Type: {}", change.symbol_type);
            let _ = writeln!(text, "  Changed: {} → {}", Self::before(mode, change), change.value);
            let _ = writeln!(text);
        }

        text
    }

    fn before(mode: ChangeMode, change: &Change) -> String {
        match mode {
            ChangeMode::Session => change.original.clone().unwrap_or_default(),
            ChangeMode::All => change
                .default
                .clone()
                .unwrap_or_else(|| "(new)".to_string()),
        }
    }

    /// Write the report into `dir` and return the path of the new file.
    pub fn write(dir: impl AsRef<Path>, mode: ChangeMode, changes: &[Change]) -> Result<PathBuf> {
        let now = Local::now();
        let path = dir.as_ref().join(Self::filename(now.timestamp_millis()));
        Self::write_new(&path, &Self::render(mode, changes, &now))?;
        Ok(path)
    }

    /// Never replaces an existing report, even one from the same millisecond.
    fn write_new(path: &Path, text: &str) -> Result<()> {
        let export_error = |e: std::io::Error| WebConfigError::Export {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(export_error)?;
        file.write_all(text.as_bytes()).map_err(export_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SymbolType;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn date() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_render_session_change() {
        let changes = vec![Change {
            name: "SMP".to_string(),
            prompt: "Symmetric multi-processing".to_string(),
            symbol_type: SymbolType::Bool,
            value: "y".to_string(),
            original: Some("n".to_string()),
            ..Change::default()
        }];

        let text = ChangeReport::render(ChangeMode::Session, &changes, &date());
        assert_eq!(
            text,
            "Session Configuration Changes\n\
             ==============================\n\
             \n\
             Date: 2026-03-01 12:30:00\n\
             \n\
             SMP:\n  Description: Symmetric multi-processing\n  Type: bool\n  Changed: n → y\n\n"
        );
    }

    #[test]
    fn test_render_all_mode_uses_default_or_new() {
        let changes = vec![
            Change {
                name: "CPU_NUM".to_string(),
                symbol_type: SymbolType::Int,
                value: "4".to_string(),
                default: Some("1".to_string()),
                ..Change::default()
            },
            Change {
                name: "LOG_LEVEL".to_string(),
                symbol_type: SymbolType::String,
                value: "debug".to_string(),
                is_new: true,
                ..Change::default()
            },
        ];

        let text = ChangeReport::render(ChangeMode::All, &changes, &date());
        assert!(text.starts_with("All Configuration Changes\n"));
        assert!(text.contains("CPU_NUM:\n  Type: int\n  Changed: 1 → 4\n"));
        assert!(text.contains("LOG_LEVEL:\n  Type: string\n  Changed: (new) → debug\n"));
        assert!(!text.contains("Description"));
    }

    #[test]
    fn test_existing_report_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ChangeReport::filename(1700000000123));
        std::fs::write(&path, "earlier export").unwrap();

        let err = ChangeReport::write_new(&path, "later export").unwrap_err();
        assert!(matches!(err, WebConfigError::Export { path: ref p, .. } if *p == path));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "earlier export");
    }

    #[test]
    fn test_filename() {
        assert_eq!(ChangeReport::filename(1700000000123), "session_changes_1700000000123.txt");
    }
}
