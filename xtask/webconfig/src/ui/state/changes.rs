use crate::api::{Change, ChangeMode, ChangeSet};

/// How a change row shows its before and after values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeValues {
    Transition { from: String, to: String },
    New(String),
    Value(String),
}

impl ChangeValues {
    pub fn describe(mode: ChangeMode, change: &Change) -> Self {
        match mode {
            ChangeMode::Session => ChangeValues::Transition {
                from: change.original.clone().unwrap_or_default(),
                to: change.value.clone(),
            },
            ChangeMode::All => match &change.default {
                Some(default) => ChangeValues::Transition {
                    from: default.clone(),
                    to: change.value.clone(),
                },
                None if change.is_new => ChangeValues::New(change.value.clone()),
                None => ChangeValues::Value(change.value.clone()),
            },
        }
    }

    pub fn text(&self) -> String {
        match self {
            ChangeValues::Transition { from, to } => format!("{} → {}", from, to),
            ChangeValues::New(value) => format!("NEW {}", value),
            ChangeValues::Value(value) => value.clone(),
        }
    }
}

/// Cached change list for one mode, plus the counter shown on its tab.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeList {
    pub mode: ChangeMode,
    pub changes: Vec<Change>,
    pub count: usize,
    pub selected: usize,
}

impl ChangeList {
    pub fn new(mode: ChangeMode) -> Self {
        Self {
            mode,
            changes: Vec::new(),
            count: 0,
            selected: 0,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            ChangeMode::Session => "Session Changes",
            ChangeMode::All => "All Changes",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self.mode {
            ChangeMode::Session => "No session changes",
            ChangeMode::All => "No changes",
        }
    }

    pub fn replace(&mut self, set: ChangeSet) {
        self.count = set.count;
        self.changes = set.changes;
        if self.selected >= self.changes.len() {
            self.selected = self.changes.len().saturating_sub(1);
        }
    }

    pub fn selected_change(&self) -> Option<&Change> {
        self.changes.get(self.selected)
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.changes.len() {
            self.selected += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(name: &str) -> Change {
        Change {
            name: name.to_string(),
            value: "y".to_string(),
            ..Change::default()
        }
    }

    #[test]
    fn test_describe_rows() {
        let mut c = change("SMP");
        c.original = Some("n".to_string());
        assert_eq!(ChangeValues::describe(ChangeMode::Session, &c).text(), "n → y");

        c.default = Some("n".to_string());
        assert_eq!(ChangeValues::describe(ChangeMode::All, &c).text(), "n → y");

        let mut fresh = change("NEW_OPT");
        fresh.is_new = true;
        assert_eq!(
            ChangeValues::describe(ChangeMode::All, &fresh),
            ChangeValues::New("y".to_string())
        );
        assert_eq!(ChangeValues::describe(ChangeMode::All, &change("X")).text(), "y");
    }

    #[test]
    fn test_replace_clamps_selection() {
        let mut list = ChangeList::new(ChangeMode::Session);
        list.replace(ChangeSet {
            count: 3,
            changes: vec![change("A"), change("B"), change("C")],
            mode: None,
        });
        list.move_down();
        list.move_down();
        list.move_down();
        assert_eq!(list.selected_change().map(|c| c.name.as_str()), Some("C"));

        list.replace(ChangeSet { count: 1, changes: vec![change("A")], mode: None });
        assert_eq!(list.selected, 0);
        assert_eq!(list.count, 1);
        assert_eq!(list.empty_message(), "No session changes");
    }
}
