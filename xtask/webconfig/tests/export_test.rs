use std::fs;
use tempfile::TempDir;
use webconfig::api::{ApiResponse, Change, ChangeMode, ChangeSet, Reply, SymbolType};
use webconfig::config::{ChangeReport, ClientConfig};
use webconfig::ui::state::{Tab, WebConfigState};

#[test]
fn test_empty_list_writes_header_only() {
    let dir = TempDir::new().unwrap();
    let path = ChangeReport::write(dir.path(), ChangeMode::Session, &[]).unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("session_changes_"));
    assert!(name.ends_with(".txt"));

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "Session Configuration Changes");
    assert_eq!(lines[1], "=".repeat(30));
    assert!(lines[3].starts_with("Date: "));
}

#[test]
fn test_write_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does/not/exist");
    let err = ChangeReport::write(&missing, ChangeMode::All, &[]).unwrap_err();
    assert!(err.to_string().starts_with("Cannot write export to"));
}

#[test]
fn test_state_exports_cached_list() {
    let dir = TempDir::new().unwrap();
    let config = ClientConfig {
        export_dir: dir.path().to_path_buf(),
        ..ClientConfig::default()
    };
    let mut state = WebConfigState::new(&config);

    state.switch_tab(Tab::SessionChanges);
    for out in state.take_outgoing() {
        let set = ChangeSet {
            count: 1,
            changes: vec![Change {
                name: "CPU_NUM".to_string(),
                prompt: "Number of CPUs".to_string(),
                symbol_type: SymbolType::Int,
                value: "4".to_string(),
                original: Some("1".to_string()),
                ..Change::default()
            }],
            mode: Some(ChangeMode::Session),
        };
        state.apply_reply(Reply::new(out, Ok(ApiResponse::Changes(set))));
    }

    let path = state.export_changes(ChangeMode::Session).unwrap();
    let text = fs::read_to_string(path).unwrap();
    assert!(text.contains("CPU_NUM:\n  Description: Number of CPUs\n  Type: int\n  Changed: 1 → 4\n"));
    assert!(state.status().text().starts_with("Changes exported to "));
}
