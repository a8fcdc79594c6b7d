//! Wire types for the configuration service's JSON endpoints.
//!
//! The service is lenient about what it emits (missing keys, `null` in place
//! of strings, integers where booleans are expected), so nearly every field
//! carries a default and a few go through tolerant deserializers.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Kind of a node in the menu tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Menu,
    Symbol,
    Comment,
    Choice,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Menu => "menu",
            ItemKind::Symbol => "symbol",
            ItemKind::Comment => "comment",
            ItemKind::Choice => "choice",
            ItemKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of a configuration symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolType {
    Bool,
    Tristate,
    String,
    Int,
    Hex,
    #[default]
    #[serde(other)]
    Unknown,
}

impl SymbolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolType::Bool => "bool",
            SymbolType::Tristate => "tristate",
            SymbolType::String => "string",
            SymbolType::Int => "int",
            SymbolType::Hex => "hex",
            SymbolType::Unknown => "unknown",
        }
    }

    /// Bool and tristate symbols are edited through a fixed choice list.
    pub fn is_tristate_like(&self) -> bool {
        matches!(self, SymbolType::Bool | SymbolType::Tristate)
    }
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which change set to request from `/api/changes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeMode {
    /// Edits made since the editing session started.
    Session,
    /// Edits relative to the compiled-in defaults.
    All,
}

impl ChangeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeMode::Session => "session",
            ChangeMode::All => "all",
        }
    }

    /// The reset flavour that matches a change list.
    pub fn reset_kind(&self) -> ResetKind {
        match self {
            ChangeMode::Session => ResetKind::Session,
            ChangeMode::All => ResetKind::Default,
        }
    }
}

impl fmt::Display for ChangeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target value for `/api/reset_symbol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetKind {
    /// Back to the value the symbol had when the session began.
    Session,
    /// Back to the stored default.
    Default,
}

impl ResetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetKind::Session => "session",
            ResetKind::Default => "default",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    #[serde(default, deserialize_with = "string_or_null")]
    pub low: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub high: String,
}

/// One node of the menu tree returned by `/api/menu_tree`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub prompt: String,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub visible: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_new: bool,
    #[serde(default, deserialize_with = "string_or_null")]
    pub help: String,
    #[serde(default)]
    pub children: Vec<MenuItem>,

    // Symbol nodes
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub symbol_type: Option<SymbolType>,
    #[serde(default)]
    pub assignable: Vec<u8>,
    #[serde(default)]
    pub user_value: Option<serde_json::Value>,
    #[serde(default)]
    pub tri_value: Option<u8>,
    #[serde(default)]
    pub depends_on: Option<String>,
    #[serde(default)]
    pub ranges: Vec<ValueRange>,

    // Choice nodes
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub selection: Option<String>,
    #[serde(default)]
    pub symbols: Vec<String>,
}

impl MenuItem {
    /// Minimal symbol stand-in used when a search hit is opened.
    pub fn symbol_stub(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::Symbol,
            value: Some(value.into()),
            visible: true,
            ..Self::default()
        }
    }

    pub fn label(&self) -> &str {
        if self.prompt.is_empty() {
            &self.name
        } else {
            &self.prompt
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_symbol(&self) -> bool {
        self.kind == ItemKind::Symbol
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultValue {
    #[serde(default, deserialize_with = "string_or_null")]
    pub value: String,
    #[serde(default)]
    pub condition: Option<String>,
}

/// A `select`/`imply` edge reported in the symbol detail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseRef {
    #[serde(default, deserialize_with = "string_or_null")]
    pub target: String,
    #[serde(default)]
    pub condition: Option<String>,
}

/// Response of `/api/symbol/<name>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolDetail {
    #[serde(default, deserialize_with = "string_or_null")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub symbol_type: SymbolType,
    #[serde(default, deserialize_with = "string_or_null")]
    pub value: String,
    #[serde(default)]
    pub user_value: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub prompt: String,
    #[serde(default)]
    pub depends_on: Option<String>,
    #[serde(default)]
    pub defaults: Vec<DefaultValue>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub help: String,
    #[serde(default)]
    pub assignable: Vec<u8>,
    #[serde(default)]
    pub selects: Vec<ReverseRef>,
    #[serde(default)]
    pub implies: Vec<ReverseRef>,
}

/// One row of `/api/changes`.
///
/// Session rows carry `original`; all-time rows carry `default`/`is_new`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Change {
    #[serde(default, deserialize_with = "string_or_null")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub prompt: String,
    #[serde(rename = "type", default)]
    pub symbol_type: SymbolType,
    #[serde(default, deserialize_with = "string_or_null")]
    pub value: String,
    #[serde(default)]
    pub original: Option<String>,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_new: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub mode: Option<ChangeMode>,
}

/// One row of `/api/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default, deserialize_with = "string_or_null")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub prompt: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub value: String,
    #[serde(rename = "type", default)]
    pub symbol_type: Option<SymbolType>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub visible: bool,
}

impl SearchHit {
    pub fn label(&self) -> &str {
        if self.prompt.is_empty() {
            &self.name
        } else {
            &self.prompt
        }
    }
}

/// Response of `/api/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub total_symbols: usize,
    #[serde(default)]
    pub set_symbols: usize,
    #[serde(default, deserialize_with = "string_or_null")]
    pub config_file: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub changed: bool,
}

/// Reply of `/api/set_value` and `/api/reset_symbol`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationReply {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub changed: bool,
    #[serde(default)]
    pub new_value: Option<String>,
    #[serde(default)]
    pub session_changes: Option<usize>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Reply of `/api/save_config`, `/api/load_config` and `/api/save_and_exit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistReply {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub success: bool,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of a failed GET.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetValueBody<'a> {
    pub symbol: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetBody<'a> {
    pub symbol: &'a str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ResetKind>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FilenameBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<&'a str>,
}

/// Accepts `true`/`false`, integers (non-zero is true) and `null`.
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(serde_json::Value::String(s)) => !s.is_empty() && s != "0" && s != "false",
        _ => false,
    })
}

fn string_or_null<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}
