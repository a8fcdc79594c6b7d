use crate::api::{DefaultValue, ItemKind, MenuItem, ReverseRef, SymbolDetail, SymbolType, ValueRange};
use crate::ui::utils::TextInput;
use tracing::warn;

const TRISTATE_NAMES: [&str; 3] = ["n", "m", "y"];

/// Map raw assignable indices to value strings, dropping indices that are
/// not legal for the declared type.
pub fn assignable_values(symbol_type: SymbolType, raw: &[u8]) -> Vec<&'static str> {
    let legal: &[u8] = match symbol_type {
        SymbolType::Bool => &[0, 2],
        SymbolType::Tristate => &[0, 1, 2],
        _ => &[],
    };

    raw.iter()
        .filter_map(|idx| {
            if legal.contains(idx) {
                Some(TRISTATE_NAMES[*idx as usize])
            } else {
                warn!("dropping assignable index {} for {} symbol", idx, symbol_type);
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueEditor {
    /// Fixed list for bool and tristate symbols.
    Choice { options: Vec<String>, selected: usize },
    Text(TextInput),
}

impl ValueEditor {
    /// Value the editor currently holds; `None` for an empty choice list.
    pub fn value(&self) -> Option<String> {
        match self {
            ValueEditor::Choice { options, selected } => options.get(*selected).cloned(),
            ValueEditor::Text(input) => Some(input.as_str().to_string()),
        }
    }

    pub fn next_option(&mut self) {
        if let ValueEditor::Choice { options, selected } = self {
            if !options.is_empty() {
                *selected = (*selected + 1) % options.len();
            }
        }
    }

    pub fn prev_option(&mut self) {
        if let ValueEditor::Choice { options, selected } = self {
            if !options.is_empty() {
                *selected = (*selected + options.len() - 1) % options.len();
            }
        }
    }
}

/// Detail panel content for a symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub name: String,
    pub prompt: String,
    pub symbol_type: SymbolType,
    pub editor: ValueEditor,
    pub depends_on: Option<String>,
    pub defaults: Vec<DefaultValue>,
    pub help: String,
    pub selects: Vec<ReverseRef>,
    pub implies: Vec<ReverseRef>,
    pub ranges: Vec<ValueRange>,
}

impl DetailView {
    /// Combine the fetched detail with the item it was opened from.
    ///
    /// The editor is pre-filled from the item's value. Search hits carry no
    /// assignable list, so the detail's own list is used for them.
    pub fn build(item: &MenuItem, detail: SymbolDetail) -> Self {
        let current = item.value.clone().unwrap_or_default();

        let editor = if detail.symbol_type.is_tristate_like() {
            let raw = if item.assignable.is_empty() {
                &detail.assignable
            } else {
                &item.assignable
            };
            let options: Vec<String> = assignable_values(detail.symbol_type, raw)
                .into_iter()
                .map(str::to_string)
                .collect();
            let selected = options.iter().position(|o| *o == current).unwrap_or(0);
            ValueEditor::Choice { options, selected }
        } else {
            ValueEditor::Text(TextInput::new(current))
        };

        Self {
            name: detail.name,
            prompt: detail.prompt,
            symbol_type: detail.symbol_type,
            editor,
            depends_on: detail.depends_on.filter(|d| !d.is_empty()),
            defaults: detail.defaults,
            help: detail.help,
            selects: detail.selects,
            implies: detail.implies,
            ranges: item.ranges.clone(),
        }
    }

    pub fn default_lines(&self) -> Vec<String> {
        self.defaults
            .iter()
            .map(|d| match &d.condition {
                Some(cond) if !cond.is_empty() => format!("{} (if {})", d.value, cond),
                _ => d.value.clone(),
            })
            .collect()
    }
}

/// Generic info shown for menus, comments and choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoPanel {
    pub title: String,
    pub kind: ItemKind,
    pub help: String,
    pub selection: Option<String>,
    pub choices: Vec<String>,
}

impl InfoPanel {
    pub fn from_item(item: &MenuItem) -> Self {
        Self {
            title: item.label().to_string(),
            kind: item.kind,
            help: item.help.clone(),
            selection: item.selection.clone(),
            choices: item.symbols.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailPanel {
    Empty,
    /// Detail fetch in flight for this symbol.
    Loading(String),
    Symbol(DetailView),
    Info(InfoPanel),
    Error(String),
}
