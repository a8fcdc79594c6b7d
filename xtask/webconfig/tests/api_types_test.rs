use pretty_assertions::assert_eq;
use webconfig::api::{
    ChangeMode, ChangeSet, ItemKind, MenuItem, MutationReply, PersistReply, SearchHit, Stats,
    SymbolDetail, SymbolType, decode_body,
};

#[test]
fn test_menu_tree_payload() {
    let body = r#"[
        {
            "id": "12", "type": "menu", "prompt": "Kernel Features", "name": null,
            "visible": true, "help": null, "is_new": false,
            "children": [
                {
                    "id": "13", "type": "symbol", "name": "CPU_NUM", "prompt": "Number of CPUs",
                    "visible": true, "children": [], "symbol_type": "int", "value": "4",
                    "assignable": [], "ranges": [{"low": "1", "high": "256"}], "is_new": 1
                },
                {
                    "id": "14", "type": "choice", "prompt": "Log level", "visible": true,
                    "children": [], "mode": "y", "selection": "LOG_INFO",
                    "symbols": ["LOG_WARN", "LOG_INFO"]
                },
                {"id": "15", "type": "comment", "prompt": "Experimental", "visible": false}
            ]
        }
    ]"#;

    let items: Vec<MenuItem> = decode_body("/api/menu_tree", body).unwrap();
    assert_eq!(items.len(), 1);

    let menu = &items[0];
    assert_eq!(menu.kind, ItemKind::Menu);
    assert_eq!(menu.name, "");
    assert_eq!(menu.help, "");
    assert_eq!(menu.label(), "Kernel Features");

    let cpu = &menu.children[0];
    assert_eq!(cpu.symbol_type, Some(SymbolType::Int));
    assert!(cpu.is_new);
    assert_eq!(cpu.ranges[0].high, "256");

    let choice = &menu.children[1];
    assert_eq!(choice.kind, ItemKind::Choice);
    assert_eq!(choice.selection.as_deref(), Some("LOG_INFO"));
    assert_eq!(choice.symbols, vec!["LOG_WARN", "LOG_INFO"]);

    assert!(!menu.children[2].visible);
}

#[test]
fn test_symbol_detail_payload() {
    let body = r#"{
        "name": "SMP", "type": "bool", "value": "y", "user_value": 2,
        "prompt": "Symmetric multi-processing", "depends_on": "ARCH_HAS_SMP",
        "defaults": [{"value": "y", "condition": "X86_64"}, {"value": "n", "condition": null}],
        "help": "Enable SMP support.", "assignable": [0, 2],
        "selects": [{"target": "IRQ_WORK", "condition": null}], "implies": []
    }"#;

    let detail: SymbolDetail = decode_body("/api/symbol/SMP", body).unwrap();
    assert_eq!(detail.symbol_type, SymbolType::Bool);
    assert_eq!(detail.defaults.len(), 2);
    assert_eq!(detail.defaults[0].condition.as_deref(), Some("X86_64"));
    assert_eq!(detail.defaults[1].condition, None);
    assert_eq!(detail.selects[0].target, "IRQ_WORK");
    assert_eq!(detail.assignable, vec![0, 2]);
}

#[test]
fn test_change_set_payloads() {
    let session = r#"{"mode": "session", "count": 1, "changes": [
        {"name": "SMP", "prompt": "SMP", "type": "bool", "original": "n", "value": "y"}
    ]}"#;
    let set: ChangeSet = decode_body("/api/changes", session).unwrap();
    assert_eq!(set.mode, Some(ChangeMode::Session));
    assert_eq!(set.changes[0].original.as_deref(), Some("n"));

    let all = r#"{"mode": "all", "count": 2, "changes": [
        {"name": "CPU_NUM", "prompt": "", "type": "int", "value": "4", "default": "1", "is_new": false},
        {"name": "NEW_OPT", "prompt": null, "type": "string", "value": "x", "default": null, "is_new": true}
    ]}"#;
    let set: ChangeSet = decode_body("/api/changes", all).unwrap();
    assert_eq!(set.count, 2);
    assert_eq!(set.changes[0].default.as_deref(), Some("1"));
    assert!(set.changes[1].is_new);
    assert_eq!(set.changes[1].prompt, "");
}

#[test]
fn test_search_and_stats_payloads() {
    let hits: Vec<SearchHit> = decode_body(
        "/api/search",
        r#"[{"name": "SMP", "prompt": "", "type": "bool", "value": "y", "visible": true}]"#,
    )
    .unwrap();
    assert_eq!(hits[0].label(), "SMP");
    assert_eq!(hits[0].symbol_type, Some(SymbolType::Bool));

    let stats: Stats = decode_body(
        "/api/stats",
        r#"{"total_symbols": 310, "set_symbols": 12, "config_file": ".config", "changed": false}"#,
    )
    .unwrap();
    assert_eq!(
        stats,
        Stats {
            total_symbols: 310,
            set_symbols: 12,
            config_file: ".config".to_string(),
            changed: false,
        }
    );
}

#[test]
fn test_mutation_and_persist_replies() {
    let reply: MutationReply = decode_body(
        "/api/set_value",
        r#"{"success": true, "changed": true, "new_value": "y", "session_changes": 3}"#,
    )
    .unwrap();
    assert!(reply.success && reply.changed);
    assert_eq!(reply.session_changes, Some(3));

    let reply: PersistReply = decode_body(
        "/api/save_config",
        r#"{"success": false, "error": "Permission denied"}"#,
    )
    .unwrap();
    assert!(!reply.success);
    assert_eq!(reply.error.as_deref(), Some("Permission denied"));
}
