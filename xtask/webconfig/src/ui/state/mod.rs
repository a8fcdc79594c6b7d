//! View model of the configuration client.
//!
//! [`WebConfigState`] owns everything the screen shows. Actions never talk to
//! the network directly: they queue [`Outgoing`] requests, which the UI loop
//! hands to the dispatcher, and completed [`Reply`] values are fed back
//! through [`WebConfigState::apply_reply`].

pub mod changes;
pub mod detail;
pub mod dialog;
pub mod status;
pub mod tree;

pub use changes::{ChangeList, ChangeValues};
pub use detail::{DetailPanel, DetailView, InfoPanel, ValueEditor, assignable_values};
pub use dialog::{ConfirmAction, Dialog, PromptAction};
pub use status::{MODIFIED, StatusBar, StatusKind, StatusMessage};
pub use tree::{
    NodePath, Toggle, TreeRow, ValueBadge, ValueClass, count_items, item_at, render_tree,
};

use crate::api::{
    ApiRequest, ApiResponse, ChangeMode, MenuItem, MutationReply, Outgoing, PersistReply, Reply,
    SearchHit, Stats, Ticket, View,
};
use crate::config::{ChangeReport, ClientConfig, DEFAULT_CONFIG_FILENAME};
use crate::error::{Result, WebConfigError};
use crate::ui::utils::{RequestSequencer, TextInput};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const CLOSE_FALLBACK: &str = "Configuration saved. You can close this window.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Tree,
    SessionChanges,
    AllChanges,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Tree, Tab::SessionChanges, Tab::AllChanges];

    pub fn mode(&self) -> Option<ChangeMode> {
        match self {
            Tab::Tree => None,
            Tab::SessionChanges => Some(ChangeMode::Session),
            Tab::AllChanges => Some(ChangeMode::All),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Tree => "Menu Tree",
            Tab::SessionChanges => "Session Changes",
            Tab::AllChanges => "All Changes",
        }
    }

    pub fn next(&self) -> Tab {
        match self {
            Tab::Tree => Tab::SessionChanges,
            Tab::SessionChanges => Tab::AllChanges,
            Tab::AllChanges => Tab::Tree,
        }
    }
}

/// Where keystrokes go when no dialog is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Main,
    Search,
    Editor,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub query: String,
    pub hits: Vec<SearchHit>,
    pub selected: usize,
}

impl SearchResults {
    pub fn heading(&self) -> String {
        if self.hits.is_empty() {
            "No results found".to_string()
        } else {
            format!("Search Results ({})", self.hits.len())
        }
    }
}

/// Content of the left panel on the tree tab.
#[derive(Debug, Clone, PartialEq)]
pub enum MainPanel {
    Tree,
    Search(SearchResults),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    /// Stopped on purpose: disabled, quitting, or after save-and-exit.
    Stopped,
    /// A heartbeat failed; no further pings are sent.
    Lost,
}

/// Resets issued together by "reset all", finished when every reply is in.
#[derive(Debug, Clone)]
struct BatchReset {
    mode: ChangeMode,
    pending: HashSet<u64>,
    failed: usize,
}

pub struct WebConfigState {
    menu_tree: Vec<MenuItem>,
    rows: Vec<TreeRow>,
    expanded: HashSet<String>,
    cursor_key: Option<String>,
    selected_key: Option<String>,
    selected_item: Option<MenuItem>,
    detail: DetailPanel,
    panel: MainPanel,

    tab: Tab,
    focus: Focus,
    dialog: Option<Dialog>,
    search: TextInput,
    show_all: bool,
    dirty: bool,

    session: ChangeList,
    all: ChangeList,
    batch_reset: Option<BatchReset>,
    stats: Option<Stats>,

    status: StatusBar,
    liveness: Liveness,
    heartbeat_interval: Duration,
    next_heartbeat: Option<Instant>,
    close_delay: Duration,
    close_at: Option<Instant>,
    should_quit: bool,
    export_dir: PathBuf,

    sequencer: RequestSequencer,
    outbox: Vec<Outgoing>,
}

impl WebConfigState {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            menu_tree: Vec::new(),
            rows: Vec::new(),
            expanded: HashSet::new(),
            cursor_key: None,
            selected_key: None,
            selected_item: None,
            detail: DetailPanel::Empty,
            panel: MainPanel::Tree,
            tab: Tab::Tree,
            focus: Focus::Main,
            dialog: None,
            search: TextInput::default(),
            show_all: config.show_all,
            dirty: false,
            session: ChangeList::new(ChangeMode::Session),
            all: ChangeList::new(ChangeMode::All),
            batch_reset: None,
            stats: None,
            status: StatusBar::new(config.status_timeout),
            liveness: if config.heartbeat_enabled {
                Liveness::Alive
            } else {
                Liveness::Stopped
            },
            heartbeat_interval: config.heartbeat_interval,
            next_heartbeat: None,
            close_delay: config.close_delay,
            close_at: None,
            should_quit: false,
            export_dir: config.export_dir.clone(),
            sequencer: RequestSequencer::new(),
            outbox: Vec::new(),
        }
    }

    /// Initial fetches, and the first heartbeat one interval from `now`.
    pub fn start(&mut self, now: Instant) {
        self.load_menu_tree();
        self.update_change_counts();
        self.refresh_stats();
        if self.liveness == Liveness::Alive {
            self.next_heartbeat = Some(now + self.heartbeat_interval);
        }
    }

    // ---- getters ----

    pub fn menu_tree(&self) -> &[MenuItem] {
        &self.menu_tree
    }

    pub fn rows(&self) -> &[TreeRow] {
        &self.rows
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &TreeRow> {
        self.rows.iter().filter(|row| !row.hidden)
    }

    pub fn cursor_key(&self) -> Option<&str> {
        self.cursor_key.as_deref()
    }

    /// Position of the cursor among the visible rows.
    pub fn cursor_index(&self) -> usize {
        self.cursor_key
            .as_deref()
            .and_then(|key| self.visible_rows().position(|row| row.key == key))
            .unwrap_or(0)
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selected_key.as_deref()
    }

    pub fn selected_item(&self) -> Option<&MenuItem> {
        self.selected_item.as_ref()
    }

    pub fn is_selected(&self, row: &TreeRow) -> bool {
        self.selected_key.as_deref() == Some(row.key.as_str())
    }

    pub fn detail(&self) -> &DetailPanel {
        &self.detail
    }

    pub fn panel(&self) -> &MainPanel {
        &self.panel
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn search_input(&self) -> &TextInput {
        &self.search
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn changes(&self, mode: ChangeMode) -> &ChangeList {
        match mode {
            ChangeMode::Session => &self.session,
            ChangeMode::All => &self.all,
        }
    }

    fn changes_mut(&mut self, mode: ChangeMode) -> &mut ChangeList {
        match mode {
            ChangeMode::Session => &mut self.session,
            ChangeMode::All => &mut self.all,
        }
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    pub fn status(&self) -> &StatusBar {
        &self.status
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn take_outgoing(&mut self) -> Vec<Outgoing> {
        std::mem::take(&mut self.outbox)
    }

    // ---- plumbing ----

    fn enqueue(&mut self, view: Option<View>, request: ApiRequest) -> Ticket {
        let ticket = self.sequencer.issue(view);
        debug!(id = ticket.id, path = %request.path(), "queue request");
        self.outbox.push(Outgoing { ticket, request });
        ticket
    }

    fn show_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status.show(text, kind, Instant::now());
    }

    /// Expire the status message; returns whether the banner changed.
    pub fn expire_status(&mut self, now: Instant) -> bool {
        self.status.expire(now, self.dirty)
    }

    /// Queue a heartbeat when one is due.
    pub fn heartbeat_tick(&mut self, now: Instant) {
        if self.liveness != Liveness::Alive {
            return;
        }
        match self.next_heartbeat {
            Some(at) if at <= now => {
                self.enqueue(None, ApiRequest::Heartbeat);
                self.next_heartbeat = Some(now + self.heartbeat_interval);
            }
            Some(_) => {}
            None => self.next_heartbeat = Some(now + self.heartbeat_interval),
        }
    }

    fn stop_heartbeat(&mut self) {
        if self.liveness == Liveness::Alive {
            self.liveness = Liveness::Stopped;
        }
        self.next_heartbeat = None;
    }

    /// True once the delayed close after save-and-exit has come due.
    pub fn close_due(&mut self, now: Instant) -> bool {
        match self.close_at {
            Some(at) if at <= now => {
                self.close_at = None;
                self.status.show_persistent(CLOSE_FALLBACK, StatusKind::Success);
                self.should_quit = true;
                true
            }
            _ => false,
        }
    }

    // ---- tree ----

    pub fn load_menu_tree(&mut self) {
        let show_all = self.show_all;
        self.enqueue(Some(View::Tree), ApiRequest::MenuTree { show_all });
    }

    pub fn toggle_show_all(&mut self) {
        self.show_all = !self.show_all;
        self.load_menu_tree();
    }

    fn rerender(&mut self) {
        self.rows = render_tree(&self.menu_tree, &self.expanded);

        let cursor_visible = self
            .cursor_key
            .as_deref()
            .is_some_and(|key| self.visible_rows().any(|row| row.key == key));
        if !cursor_visible {
            let first = self.visible_rows().next().map(|row| row.key.clone());
            self.cursor_key = first;
        }
    }

    fn row_at_cursor(&self) -> Option<&TreeRow> {
        let key = self.cursor_key.as_deref()?;
        self.rows.iter().find(|row| row.key == key)
    }

    pub fn move_up(&mut self) {
        if let Some(mode) = self.tab.mode() {
            self.changes_mut(mode).move_up();
            return;
        }
        if let MainPanel::Search(results) = &mut self.panel {
            results.selected = results.selected.saturating_sub(1);
            return;
        }

        let idx = self.cursor_index();
        if idx > 0 {
            let prev = self.visible_rows().nth(idx - 1).map(|row| row.key.clone());
            self.cursor_key = prev;
        }
    }

    pub fn move_down(&mut self) {
        if let Some(mode) = self.tab.mode() {
            self.changes_mut(mode).move_down();
            return;
        }
        if let MainPanel::Search(results) = &mut self.panel {
            if results.selected + 1 < results.hits.len() {
                results.selected += 1;
            }
            return;
        }

        let idx = self.cursor_index();
        let next = self.visible_rows().nth(idx + 1).map(|row| row.key.clone());
        if next.is_some() {
            self.cursor_key = next;
        }
    }

    pub fn jump_to_first(&mut self) {
        if self.tab == Tab::Tree && self.panel == MainPanel::Tree {
            let first = self.visible_rows().next().map(|row| row.key.clone());
            self.cursor_key = first;
        }
    }

    pub fn jump_to_last(&mut self) {
        if self.tab == Tab::Tree && self.panel == MainPanel::Tree {
            let last = self.visible_rows().last().map(|row| row.key.clone());
            self.cursor_key = last;
        }
    }

    pub fn expand(&mut self, key: &str) {
        if self.expanded.insert(key.to_string()) {
            self.rerender();
        }
    }

    pub fn collapse(&mut self, key: &str) {
        if self.expanded.remove(key) {
            self.rerender();
        }
    }

    pub fn toggle_expanded(&mut self, key: &str) {
        if self.expanded.contains(key) {
            self.collapse(key);
        } else {
            self.expand(key);
        }
    }

    pub fn toggle_at_cursor(&mut self) {
        let Some(row) = self.row_at_cursor() else { return };
        if row.toggle != Toggle::Leaf {
            let key = row.key.clone();
            self.toggle_expanded(&key);
        }
    }

    pub fn expand_at_cursor(&mut self) {
        let Some(row) = self.row_at_cursor() else { return };
        if row.toggle == Toggle::Collapsed {
            let key = row.key.clone();
            self.expand(&key);
        }
    }

    /// Collapse the row under the cursor, or step out to its parent.
    pub fn collapse_at_cursor(&mut self) {
        let Some(row) = self.row_at_cursor() else { return };
        if row.toggle == Toggle::Expanded {
            let key = row.key.clone();
            self.collapse(&key);
            return;
        }

        let parent_path = &row.path[..row.path.len().saturating_sub(1)];
        let parent = self
            .rows
            .iter()
            .find(|r| !parent_path.is_empty() && r.path == parent_path)
            .map(|r| r.key.clone());
        if parent.is_some() {
            self.cursor_key = parent;
        }
    }

    pub fn select_at_cursor(&mut self) {
        if self.tab != Tab::Tree {
            return;
        }
        let search_idx = match &self.panel {
            MainPanel::Search(results) => Some(results.selected),
            MainPanel::Tree => None,
        };

        match search_idx {
            Some(idx) => self.select_search_result(idx),
            None => {
                if let Some(key) = self.cursor_key.clone() {
                    self.select_item(&key);
                }
            }
        }
    }

    /// Highlight exactly the row at `key` and open it in the detail panel.
    pub fn select_item(&mut self, key: &str) {
        let Some(row) = self.rows.iter().find(|row| row.key == key) else {
            warn!(%key, "select of unknown tree row");
            return;
        };
        let Some(item) = item_at(&self.menu_tree, &row.path).cloned() else {
            return;
        };

        self.selected_key = Some(key.to_string());
        self.cursor_key = Some(key.to_string());
        if item.is_symbol() {
            self.show_symbol_details(item);
        } else {
            self.show_item_info(item);
        }
    }

    pub fn show_symbol_details(&mut self, item: MenuItem) {
        let name = item.name.clone();
        self.detail = DetailPanel::Loading(name.clone());
        self.selected_item = Some(item);
        self.enqueue(Some(View::Detail), ApiRequest::Symbol { name });
    }

    pub fn show_item_info(&mut self, item: MenuItem) {
        // a symbol fetch still in flight must not replace this panel
        self.sequencer.supersede(View::Detail);
        self.detail = DetailPanel::Info(InfoPanel::from_item(&item));
        self.selected_item = Some(item);
    }

    // ---- detail ----

    pub fn begin_edit(&mut self) {
        if matches!(self.detail, DetailPanel::Symbol(_)) {
            self.focus = Focus::Editor;
        }
    }

    pub fn end_edit(&mut self) {
        if self.focus == Focus::Editor {
            self.focus = Focus::Main;
        }
    }

    pub fn editor_mut(&mut self) -> Option<&mut ValueEditor> {
        match &mut self.detail {
            DetailPanel::Symbol(view) => Some(&mut view.editor),
            _ => None,
        }
    }

    /// Post the editor's value for the selected symbol.
    pub fn update_symbol_value(&mut self) {
        let Some(symbol) = self.selected_item.as_ref().map(|item| item.name.clone()) else {
            return;
        };
        let DetailPanel::Symbol(view) = &self.detail else {
            return;
        };
        let Some(value) = view.editor.value() else {
            self.focus = Focus::Main;
            self.show_status("No assignable values", StatusKind::Error);
            return;
        };

        self.focus = Focus::Main;
        self.enqueue(None, ApiRequest::SetValue { symbol, value });
    }

    // ---- changes ----

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        if self.focus == Focus::Search && tab != Tab::Tree {
            self.focus = Focus::Main;
        }
        if let Some(mode) = tab.mode() {
            self.load_changes(mode);
        }
    }

    pub fn next_tab(&mut self) {
        self.switch_tab(self.tab.next());
    }

    pub fn load_changes(&mut self, mode: ChangeMode) {
        self.enqueue(Some(View::ChangeList(mode)), ApiRequest::Changes { mode });
    }

    pub fn update_change_counts(&mut self) {
        for mode in [ChangeMode::Session, ChangeMode::All] {
            self.enqueue(Some(View::ChangeCount(mode)), ApiRequest::Changes { mode });
        }
    }

    pub fn refresh_stats(&mut self) {
        self.enqueue(Some(View::Stats), ApiRequest::Stats);
    }

    pub fn reset_symbol(&mut self, name: &str, mode: ChangeMode) {
        self.dialog = Some(Dialog::confirm(ConfirmAction::ResetSymbol {
            name: name.to_string(),
            mode,
        }));
    }

    /// Reset the highlighted row of the current change tab.
    pub fn reset_selected_change(&mut self) {
        let Some(mode) = self.tab.mode() else { return };
        let Some(name) = self.changes(mode).selected_change().map(|c| c.name.clone()) else {
            return;
        };
        self.reset_symbol(&name, mode);
    }

    pub fn reset_all_changes(&mut self, mode: ChangeMode) {
        self.dialog = Some(Dialog::confirm(ConfirmAction::ResetAll(mode)));
    }

    fn start_batch_reset(&mut self, mode: ChangeMode) {
        let names: Vec<String> = self.changes(mode).changes.iter().map(|c| c.name.clone()).collect();
        let kind = Some(mode.reset_kind());

        let mut pending = HashSet::new();
        for symbol in names {
            let ticket = self.enqueue(None, ApiRequest::ResetSymbol { symbol, kind });
            pending.insert(ticket.id);
        }

        let batch = BatchReset { mode, pending, failed: 0 };
        if batch.pending.is_empty() {
            self.finish_batch_reset(batch);
        } else {
            self.batch_reset = Some(batch);
        }
    }

    fn finish_batch_reset(&mut self, batch: BatchReset) {
        if batch.failed == 0 {
            self.show_status("All changes reset", StatusKind::Success);
        } else {
            warn!(failed = batch.failed, "reset all finished with failures");
            self.show_status("Error resetting changes", StatusKind::Error);
        }
        self.load_changes(batch.mode);
        self.load_menu_tree();
    }

    /// Write the cached change list of `mode` to the export directory.
    pub fn export_changes(&mut self, mode: ChangeMode) -> Option<PathBuf> {
        match ChangeReport::write(&self.export_dir, mode, &self.changes(mode).changes) {
            Ok(path) => {
                info!(path = %path.display(), "changes exported");
                self.show_status(format!("Changes exported to {}", path.display()), StatusKind::Success);
                Some(path)
            }
            Err(e) => {
                warn!("export failed: {}", e);
                self.show_status("Error exporting changes", StatusKind::Error);
                None
            }
        }
    }

    // ---- persistence ----

    pub fn save_config(&mut self) {
        self.enqueue(None, ApiRequest::SaveConfig { filename: None });
    }

    pub fn save_as_config(&mut self) {
        self.dialog = Some(Dialog::prompt(PromptAction::SaveAs, DEFAULT_CONFIG_FILENAME));
    }

    pub fn load_config(&mut self) {
        self.dialog = Some(if self.dirty {
            Dialog::confirm(ConfirmAction::LoadOverUnsaved)
        } else {
            Dialog::prompt(PromptAction::Load, DEFAULT_CONFIG_FILENAME)
        });
    }

    pub fn save_and_exit(&mut self) {
        self.dialog = Some(Dialog::confirm(ConfirmAction::SaveAndExit));
    }

    /// Quit, asking first when there are unsaved edits.
    pub fn request_quit(&mut self) {
        if self.dirty {
            self.dialog = Some(Dialog::confirm(ConfirmAction::Quit));
        } else {
            self.quit();
        }
    }

    fn quit(&mut self) {
        self.stop_heartbeat();
        self.should_quit = true;
    }

    // ---- dialogs ----

    pub fn show_help(&mut self) {
        self.dialog = Some(Dialog::Help);
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    pub fn dialog_input_mut(&mut self) -> Option<&mut TextInput> {
        match &mut self.dialog {
            Some(Dialog::Prompt { input, .. }) => Some(input),
            _ => None,
        }
    }

    pub fn answer_confirm(&mut self, accepted: bool) {
        let action = match self.dialog.take() {
            Some(Dialog::Confirm { action, .. }) => action,
            other => {
                self.dialog = other;
                return;
            }
        };
        if !accepted {
            return;
        }

        match action {
            ConfirmAction::ResetSymbol { name, mode } => {
                let kind = Some(mode.reset_kind());
                self.enqueue(None, ApiRequest::ResetSymbol { symbol: name, kind });
            }
            ConfirmAction::ResetAll(mode) => self.start_batch_reset(mode),
            ConfirmAction::LoadOverUnsaved => {
                self.dialog = Some(Dialog::prompt(PromptAction::Load, DEFAULT_CONFIG_FILENAME));
            }
            ConfirmAction::SaveAndExit => {
                self.enqueue(None, ApiRequest::SaveAndExit);
            }
            ConfirmAction::Quit => self.quit(),
        }
    }

    /// Close the prompt; `None` or an empty answer cancels without a request.
    pub fn answer_prompt(&mut self, answer: Option<String>) {
        let action = match self.dialog.take() {
            Some(Dialog::Prompt { action, .. }) => action,
            other => {
                self.dialog = other;
                return;
            }
        };
        let Some(filename) = answer.filter(|f| !f.is_empty()) else {
            return;
        };

        match action {
            PromptAction::SaveAs => {
                self.enqueue(None, ApiRequest::SaveConfig { filename: Some(filename) });
            }
            PromptAction::Load => {
                self.enqueue(None, ApiRequest::LoadConfig { filename });
            }
        }
    }

    /// Answer the open prompt with what has been typed into it.
    pub fn submit_prompt(&mut self) {
        let answer = self.dialog_input_mut().map(|input| input.as_str().to_string());
        self.answer_prompt(answer);
    }

    // ---- search ----

    pub fn focus_search(&mut self) {
        if self.tab != Tab::Tree {
            self.tab = Tab::Tree;
        }
        self.focus = Focus::Search;
    }

    pub fn blur_search(&mut self) {
        if self.focus == Focus::Search {
            self.focus = Focus::Main;
        }
    }

    /// Edit the search field and search again if the text changed.
    pub fn edit_search(&mut self, edit: impl FnOnce(&mut TextInput)) {
        let before = self.search.as_str().to_string();
        edit(&mut self.search);
        if self.search.as_str() != before {
            self.search_symbols();
        }
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.edit_search(|input| *input = TextInput::new(query));
    }

    /// Search for the current query: an empty query restores the tree and
    /// a single character is too short to search for.
    pub fn search_symbols(&mut self) {
        let query = self.search.as_str().to_string();
        match query.chars().count() {
            0 => self.load_menu_tree(),
            1 => {}
            _ => {
                self.enqueue(Some(View::Tree), ApiRequest::Search { query });
            }
        }
    }

    pub fn select_search_result(&mut self, idx: usize) {
        let MainPanel::Search(results) = &mut self.panel else { return };
        let Some(item) = results
            .hits
            .get(idx)
            .map(|hit| MenuItem::symbol_stub(hit.name.clone(), hit.value.clone()))
        else {
            return;
        };
        results.selected = idx;

        self.selected_key = None;
        self.show_symbol_details(item);
    }

    // ---- replies ----

    pub fn apply_reply(&mut self, reply: Reply) {
        let Reply { ticket, request, outcome } = reply;
        if !self.sequencer.is_current(&ticket) {
            debug!(id = ticket.id, path = %request.path(), "dropping stale reply");
            return;
        }

        let path = request.path();
        match request {
            ApiRequest::MenuTree { .. } => match outcome {
                Ok(ApiResponse::MenuTree(items)) => self.on_menu_tree(items),
                other => {
                    let err = unexpected(&path, other);
                    warn!("error loading menu tree: {}", err);
                    self.show_status("Error loading configuration", StatusKind::Error);
                }
            },
            ApiRequest::Symbol { name } => match outcome {
                Ok(ApiResponse::Symbol(detail)) => {
                    let item = self
                        .selected_item
                        .clone()
                        .filter(|item| item.name == name)
                        .unwrap_or_else(|| MenuItem::symbol_stub(name, detail.value.clone()));
                    self.detail = DetailPanel::Symbol(DetailView::build(&item, detail));
                }
                other => {
                    let err = unexpected(&path, other);
                    warn!(symbol = %name, "error loading symbol details: {}", err);
                    self.detail = DetailPanel::Error("Error loading symbol details".to_string());
                }
            },
            ApiRequest::Changes { mode } => {
                let counter_only = matches!(ticket.view, Some(View::ChangeCount(_)));
                match outcome {
                    Ok(ApiResponse::Changes(set)) if counter_only => {
                        self.changes_mut(mode).count = set.count;
                    }
                    Ok(ApiResponse::Changes(set)) => self.changes_mut(mode).replace(set),
                    other => {
                        let err = unexpected(&path, other);
                        warn!(%mode, "error loading changes: {}", err);
                        if !counter_only {
                            self.show_status("Error loading changes", StatusKind::Error);
                        }
                    }
                }
            }
            ApiRequest::Search { query } => match outcome {
                Ok(ApiResponse::Search(hits)) => {
                    self.panel = MainPanel::Search(SearchResults { query, hits, selected: 0 });
                }
                other => {
                    let err = unexpected(&path, other);
                    warn!(%query, "error searching: {}", err);
                    self.show_status("Error searching symbols", StatusKind::Error);
                }
            },
            ApiRequest::Stats => match outcome {
                Ok(ApiResponse::Stats(stats)) => self.stats = Some(stats),
                other => debug!("stats unavailable: {}", unexpected(&path, other)),
            },
            ApiRequest::SetValue { symbol, .. } => match outcome {
                Ok(ApiResponse::Mutation(reply)) => self.on_value_set(&symbol, reply),
                other => {
                    let err = unexpected(&path, other);
                    self.show_failure(&err, "Error updating value");
                }
            },
            ApiRequest::ResetSymbol { symbol, .. } => {
                let outcome = match outcome {
                    Ok(ApiResponse::Mutation(reply)) => Ok(reply),
                    other => Err(unexpected(&path, other)),
                };
                if self.in_batch(ticket.id) {
                    self.on_batch_reset(ticket.id, outcome);
                } else {
                    self.on_symbol_reset(&symbol, outcome);
                }
            }
            ApiRequest::SaveConfig { .. } => match outcome {
                Ok(ApiResponse::Persist(reply)) => self.on_saved(reply),
                other => {
                    let err = unexpected(&path, other);
                    self.show_failure(&err, "Error saving configuration");
                }
            },
            ApiRequest::LoadConfig { .. } => match outcome {
                Ok(ApiResponse::Persist(reply)) => self.on_loaded(reply),
                other => {
                    let err = unexpected(&path, other);
                    self.show_failure(&err, "Error loading configuration");
                }
            },
            ApiRequest::SaveAndExit => match outcome {
                Ok(ApiResponse::Persist(reply)) => self.on_saved_for_exit(reply),
                other => {
                    let err = unexpected(&path, other);
                    self.show_failure(&err, "Error saving and exiting");
                }
            },
            ApiRequest::Heartbeat => {
                if let Err(err) = outcome {
                    if err.is_transport() && self.liveness == Liveness::Alive {
                        warn!("heartbeat failed: {}", err);
                        self.liveness = Liveness::Lost;
                        self.next_heartbeat = None;
                        self.status.show_persistent("Server connection lost", StatusKind::Error);
                    }
                }
            }
        }
    }

    /// Transport failures get the generic message; anything the server
    /// said is shown as is.
    fn show_failure(&mut self, err: &WebConfigError, generic: &str) {
        warn!("{}: {}", generic, err);
        let message = match err {
            WebConfigError::Server(msg) | WebConfigError::Rejected(msg) => format!("Error: {}", msg),
            _ => generic.to_string(),
        };
        self.show_status(message, StatusKind::Error);
    }

    fn show_rejection(&mut self, error: Option<String>) {
        let error = error.unwrap_or_else(|| "unknown error".to_string());
        self.show_status(format!("Error: {}", error), StatusKind::Error);
    }

    fn on_menu_tree(&mut self, items: Vec<MenuItem>) {
        debug!(items = count_items(&items), "menu tree loaded");
        self.menu_tree = items;
        self.panel = MainPanel::Tree;
        self.rerender();
    }

    fn on_value_set(&mut self, symbol: &str, reply: MutationReply) {
        if !reply.success {
            self.show_rejection(reply.error);
            return;
        }

        info!(%symbol, value = ?reply.new_value, "value updated");
        self.dirty = reply.changed;
        if let (Some(item), Some(value)) = (self.selected_item.as_mut(), reply.new_value) {
            if item.name == symbol {
                item.value = Some(value);
            }
        }
        if let Some(count) = reply.session_changes {
            self.session.count = count;
        }
        self.show_status("Value updated", StatusKind::Success);
        self.load_menu_tree();
        self.update_change_counts();
        self.refresh_stats();
    }

    fn on_symbol_reset(&mut self, symbol: &str, outcome: Result<MutationReply>) {
        match outcome {
            Ok(reply) if reply.success => {
                info!(%symbol, "symbol reset");
                self.show_status(format!("{} reset", symbol), StatusKind::Success);
                self.load_changes(ChangeMode::Session);
                self.load_changes(ChangeMode::All);
                if self.tab == Tab::Tree {
                    self.load_menu_tree();
                }
                self.session.count = reply.session_changes.unwrap_or(0);
            }
            Ok(reply) => self.show_rejection(reply.error),
            Err(err) => self.show_failure(&err, "Error resetting symbol"),
        }
    }

    fn in_batch(&self, id: u64) -> bool {
        self.batch_reset
            .as_ref()
            .is_some_and(|batch| batch.pending.contains(&id))
    }

    fn on_batch_reset(&mut self, id: u64, outcome: Result<MutationReply>) {
        let Some(batch) = self.batch_reset.as_mut() else { return };
        batch.pending.remove(&id);
        match outcome {
            Ok(reply) if reply.success => {}
            Ok(reply) => {
                debug!(error = ?reply.error, "reset rejected");
                batch.failed += 1;
            }
            Err(err) => {
                debug!("reset failed: {}", err);
                batch.failed += 1;
            }
        }

        if batch.pending.is_empty() {
            if let Some(batch) = self.batch_reset.take() {
                self.finish_batch_reset(batch);
            }
        }
    }

    fn on_saved(&mut self, reply: PersistReply) {
        if !reply.success {
            self.show_rejection(reply.error);
            return;
        }
        self.dirty = false;
        let filename = reply.filename.unwrap_or_default();
        info!(%filename, "configuration saved");
        self.show_status(format!("Configuration saved to {}", filename), StatusKind::Success);
        self.update_change_counts();
        self.refresh_stats();
    }

    fn on_loaded(&mut self, reply: PersistReply) {
        if !reply.success {
            self.show_rejection(reply.error);
            return;
        }
        self.dirty = false;
        let filename = reply.filename.unwrap_or_default();
        info!(%filename, "configuration loaded");
        self.show_status(format!("Configuration loaded from {}", filename), StatusKind::Success);
        self.load_menu_tree();
        self.refresh_stats();
    }

    fn on_saved_for_exit(&mut self, reply: PersistReply) {
        if !reply.success {
            self.show_rejection(reply.error);
            return;
        }
        self.dirty = false;
        self.stop_heartbeat();
        self.show_status("Configuration saved. Closing...", StatusKind::Success);
        self.close_at = Some(Instant::now() + self.close_delay);
    }
}

fn unexpected(path: &str, outcome: Result<ApiResponse>) -> WebConfigError {
    match outcome {
        Err(err) => err,
        Ok(_) => WebConfigError::UnexpectedResponse(path.to_string()),
    }
}
