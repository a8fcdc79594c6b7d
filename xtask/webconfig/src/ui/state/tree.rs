use crate::api::{MenuItem, SymbolType};
use std::collections::{HashMap, HashSet};

/// Index path from the root list down to an item.
pub type NodePath = Vec<usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// No children, drawn as a spacer.
    Leaf,
    Collapsed,
    Expanded,
}

impl Toggle {
    pub fn glyph(&self) -> &'static str {
        match self {
            Toggle::Leaf => " ",
            Toggle::Collapsed => "▶",
            Toggle::Expanded => "▼",
        }
    }
}

/// Style class of a symbol's value badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueClass {
    /// `bool-<value>`, used for bool symbols and non-`m` tristates.
    Bool(String),
    TristateModule,
    Plain,
}

impl ValueClass {
    pub fn for_value(symbol_type: Option<SymbolType>, value: &str) -> Self {
        match symbol_type {
            Some(SymbolType::Bool) => ValueClass::Bool(value.to_string()),
            Some(SymbolType::Tristate) if value == "m" => ValueClass::TristateModule,
            Some(SymbolType::Tristate) => ValueClass::Bool(value.to_string()),
            _ => ValueClass::Plain,
        }
    }

    pub fn class_name(&self) -> String {
        match self {
            ValueClass::Bool(v) => format!("bool-{}", v),
            ValueClass::TristateModule => "tristate-m".to_string(),
            ValueClass::Plain => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueBadge {
    pub text: String,
    pub class: ValueClass,
}

/// One rendered node of the menu tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub path: NodePath,
    /// Name path, unique within one rendering and stable across reloads.
    pub key: String,
    pub depth: usize,
    pub toggle: Toggle,
    pub label: String,
    /// Item is not visible under the current configuration.
    pub dimmed: bool,
    pub value: Option<ValueBadge>,
    pub is_new: bool,
    /// Inside a collapsed ancestor.
    pub hidden: bool,
}

impl TreeRow {
    pub fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }
}

/// Render every item of the tree, depth first, in server order.
///
/// Collapsed subtrees are still rendered, with `hidden` set on their rows.
pub fn render_tree(items: &[MenuItem], expanded: &HashSet<String>) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    render_items(items, expanded, 0, &[], "", false, &mut rows);
    rows
}

fn render_items(
    items: &[MenuItem],
    expanded: &HashSet<String>,
    depth: usize,
    parent_path: &[usize],
    parent_key: &str,
    hidden: bool,
    rows: &mut Vec<TreeRow>,
) {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (idx, item) in items.iter().enumerate() {
        let mut path = parent_path.to_vec();
        path.push(idx);

        // "/" separates levels and "#" starts the duplicate suffix, so a
        // label may contain neither unescaped
        let label = if item.name.is_empty() { &item.prompt } else { &item.name };
        let base = label.replace('\\', "\\\\").replace('/', "\\/").replace('#', "\\#");
        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        let key = if *count == 1 {
            format!("{}/{}", parent_key, base)
        } else {
            format!("{}/{}#{}", parent_key, base, count)
        };

        let toggle = if !item.has_children() {
            Toggle::Leaf
        } else if expanded.contains(&key) {
            Toggle::Expanded
        } else {
            Toggle::Collapsed
        };

        let value = match (&item.value, item.is_symbol()) {
            (Some(value), true) => Some(ValueBadge {
                text: value.clone(),
                class: ValueClass::for_value(item.symbol_type, value),
            }),
            _ => None,
        };

        rows.push(TreeRow {
            path: path.clone(),
            key: key.clone(),
            depth,
            toggle,
            label: item.label().to_string(),
            dimmed: !item.visible,
            value,
            is_new: item.is_new,
            hidden,
        });

        if item.has_children() {
            render_items(
                &item.children,
                expanded,
                depth + 1,
                &path,
                &key,
                hidden || toggle != Toggle::Expanded,
                rows,
            );
        }
    }
}

pub fn item_at<'a>(items: &'a [MenuItem], path: &[usize]) -> Option<&'a MenuItem> {
    let (first, rest) = path.split_first()?;
    let mut item = items.get(*first)?;
    for idx in rest {
        item = item.children.get(*idx)?;
    }
    Some(item)
}

pub fn count_items(items: &[MenuItem]) -> usize {
    items.iter().map(|item| 1 + count_items(&item.children)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ItemKind;

    fn menu(prompt: &str, children: Vec<MenuItem>) -> MenuItem {
        MenuItem {
            name: prompt.to_string(),
            prompt: prompt.to_string(),
            kind: ItemKind::Menu,
            visible: true,
            children,
            ..MenuItem::default()
        }
    }

    fn symbol(name: &str, symbol_type: SymbolType, value: &str) -> MenuItem {
        MenuItem {
            name: name.to_string(),
            kind: ItemKind::Symbol,
            visible: true,
            symbol_type: Some(symbol_type),
            value: Some(value.to_string()),
            ..MenuItem::default()
        }
    }

    #[test]
    fn test_collapsed_by_default() {
        let tree = vec![menu("Drivers", vec![symbol("RTC", SymbolType::Bool, "y")])];
        let rows = render_tree(&tree, &HashSet::new());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].toggle, Toggle::Collapsed);
        assert!(!rows[0].hidden);
        assert!(rows[1].hidden);
        assert_eq!(rows[1].depth, 1);
        assert_eq!(rows[1].key, "/Drivers/RTC");
    }

    #[test]
    fn test_expanded_keys_reveal_children() {
        let tree = vec![menu("Drivers", vec![symbol("RTC", SymbolType::Bool, "y")])];
        let expanded: HashSet<String> = ["/Drivers".to_string()].into_iter().collect();
        let rows = render_tree(&tree, &expanded);

        assert_eq!(rows[0].toggle, Toggle::Expanded);
        assert!(!rows[1].hidden);
    }

    #[test]
    fn test_value_classes() {
        assert_eq!(ValueClass::for_value(Some(SymbolType::Bool), "y").class_name(), "bool-y");
        assert_eq!(ValueClass::for_value(Some(SymbolType::Tristate), "m").class_name(), "tristate-m");
        assert_eq!(ValueClass::for_value(Some(SymbolType::Tristate), "n").class_name(), "bool-n");
        assert_eq!(ValueClass::for_value(Some(SymbolType::Hex), "0x10"), ValueClass::Plain);
        assert_eq!(ValueClass::for_value(None, "1"), ValueClass::Plain);
    }

    #[test]
    fn test_duplicate_sibling_names_get_distinct_keys() {
        let tree = vec![
            MenuItem { prompt: "Note".to_string(), kind: ItemKind::Comment, ..MenuItem::default() },
            MenuItem { prompt: "Note".to_string(), kind: ItemKind::Comment, ..MenuItem::default() },
        ];
        let rows = render_tree(&tree, &HashSet::new());
        assert_eq!(rows[0].key, "/Note");
        assert_eq!(rows[1].key, "/Note#2");
        assert!(rows[0].dimmed);
    }

    #[test]
    fn test_hash_in_label_cannot_fake_a_duplicate_suffix() {
        let note = |prompt: &str| MenuItem {
            prompt: prompt.to_string(),
            kind: ItemKind::Comment,
            ..MenuItem::default()
        };
        let tree = vec![note("Note"), note("Note"), note("Note#2"), note("Back\\slash")];
        let rows = render_tree(&tree, &HashSet::new());

        let keys: Vec<&str> = rows.iter().map(|row| row.key.as_str()).collect();
        assert_eq!(keys, vec!["/Note", "/Note#2", "/Note\\#2", "/Back\\\\slash"]);
        assert_eq!(rows[2].label, "Note#2");
    }

    #[test]
    fn test_item_at_follows_path() {
        let tree = vec![menu("A", vec![menu("B", vec![symbol("C", SymbolType::Int, "3")])])];
        assert_eq!(item_at(&tree, &[0, 0, 0]).map(|i| i.name.as_str()), Some("C"));
        assert!(item_at(&tree, &[0, 1]).is_none());
        assert!(item_at(&tree, &[]).is_none());
        assert_eq!(count_items(&tree), 3);
    }
}
