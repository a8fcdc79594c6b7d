use crate::api::{ChangeMode, ConfigApi, Dispatcher, Reply};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::ui::events::{Action, EventHandler, EventResult};
use crate::ui::rendering::Theme;
use crate::ui::state::{
    ChangeValues, DetailPanel, DetailView, Dialog, Focus, InfoPanel, MainPanel, SearchResults, Tab,
    TreeRow, ValueEditor, WebConfigState,
};
use crate::ui::utils::TextInput;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct WebConfigApp<A: ConfigApi> {
    state: WebConfigState,
    dispatcher: Dispatcher<A>,
    replies: UnboundedReceiver<Reply>,
    theme: Theme,
}

impl<A: ConfigApi> WebConfigApp<A> {
    pub fn new(api: Arc<A>, config: &ClientConfig) -> Self {
        let (dispatcher, replies) = Dispatcher::new(api);
        Self {
            state: WebConfigState::new(config),
            dispatcher,
            replies,
            theme: Theme::default(),
        }
    }

    pub fn state(&self) -> &WebConfigState {
        &self.state
    }

    fn flush(&mut self) {
        self.dispatcher.dispatch_all(self.state.take_outgoing());
    }

    /// Apply every reply that has arrived, without waiting.
    fn drain_replies(&mut self) {
        while let Ok(reply) = self.replies.try_recv() {
            self.state.apply_reply(reply);
        }
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.state.start(Instant::now());

        loop {
            self.flush();
            tokio::task::yield_now().await;
            self.drain_replies();

            let now = Instant::now();
            self.state.heartbeat_tick(now);
            self.state.expire_status(now);
            if self.state.close_due(now) || self.state.should_quit() {
                break;
            }
            self.flush();

            terminal.draw(|f| self.render(f))?;

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press && self.handle_key(key)? == EventResult::Quit {
                        break;
                    }
                }
            }
        }

        debug!("ui loop finished");
        Ok(())
    }

    // ---- rendering ----

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Tabs
                Constraint::Length(3), // Search bar
                Constraint::Min(0),    // Main content
                Constraint::Length(3), // Status bar
            ])
            .split(frame.size());

        self.render_header(frame, chunks[0]);
        self.render_tabs(frame, chunks[1]);
        self.render_search_bar(frame, chunks[2]);
        self.render_main_content(frame, chunks[3]);
        self.render_status_bar(frame, chunks[4]);

        if let Some(dialog) = self.state.dialog() {
            self.render_dialog(frame, dialog);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            " Kconfig Web Configuration ",
            self.theme.get_info_style().add_modifier(Modifier::BOLD),
        )];

        if let Some(stats) = self.state.stats() {
            spans.push(Span::raw(format!(
                " {}  {}/{} set ",
                stats.config_file, stats.set_symbols, stats.total_symbols
            )));
        }
        if self.state.show_all() {
            spans.push(Span::styled(" [all] ", self.theme.get_warning_style()));
        }
        if self.state.is_dirty() {
            spans.push(Span::styled(" Modified ", self.theme.get_warning_style()));
        }
        spans.push(Span::raw(" ^S:Save ^O:Load ?:Help q:Quit "));

        let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, area);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .map(|tab| {
                let title = match tab.mode() {
                    Some(mode) => format!("{} ({})", tab.title(), self.state.changes(mode).count),
                    None => tab.title().to_string(),
                };
                Line::from(title)
            })
            .collect();
        let selected = Tab::ALL.iter().position(|t| *t == self.state.tab()).unwrap_or(0);

        let tabs = Tabs::new(titles)
            .select(selected)
            .highlight_style(self.theme.get_selected_style())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(tabs, area);
    }

    fn render_search_bar(&self, frame: &mut Frame, area: Rect) {
        let focused = self.state.focus() == Focus::Search;
        let input = self.state.search_input();

        let line = if focused {
            let mut spans = vec![Span::raw(" Search: ")];
            spans.extend(self.input_spans(input));
            Line::from(spans)
        } else if input.is_empty() {
            Line::from(" Press / or ^F to search")
        } else {
            Line::from(format!(" Search: {}", input.as_str()))
        };

        let search = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if focused {
                    self.theme.get_selected_style()
                } else {
                    self.theme.get_border_style()
                }),
        );
        frame.render_widget(search, area);
    }

    fn input_spans<'a>(&self, input: &'a TextInput) -> Vec<Span<'a>> {
        let (before, after) = input.split_at_cursor();
        let mut chars = after.chars();
        let caret = chars.next().map(String::from).unwrap_or_else(|| " ".to_string());
        vec![
            Span::raw(before),
            Span::styled(caret, Style::default().add_modifier(Modifier::REVERSED)),
            Span::raw(chars.as_str()),
        ]
    }

    fn render_main_content(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        match self.state.tab().mode() {
            None => {
                match self.state.panel() {
                    MainPanel::Tree => self.render_menu_tree(frame, chunks[0]),
                    MainPanel::Search(results) => self.render_search_results(frame, chunks[0], results),
                }
                self.render_detail_panel(frame, chunks[1]);
            }
            Some(mode) => {
                self.render_change_list(frame, chunks[0], mode);
                self.render_change_detail(frame, chunks[1], mode);
            }
        }
    }

    fn panel_block(&self, title: String) -> Block<'static> {
        let focused = self.state.focus() == Focus::Main;
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(if focused {
                self.theme.get_selected_style()
            } else {
                self.theme.get_border_style()
            })
    }

    fn render_menu_tree(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<&TreeRow> = self.state.visible_rows().collect();
        if rows.is_empty() {
            let empty = Paragraph::new("No items found")
                .block(self.panel_block(" Configuration Menu ".to_string()));
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = rows.iter().map(|row| self.create_tree_item(row)).collect();
        let list = List::new(items)
            .block(self.panel_block(" Configuration Menu ".to_string()))
            .highlight_style(self.theme.get_cursor_style());

        let mut list_state = ListState::default().with_selected(Some(self.state.cursor_index()));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn create_tree_item(&self, row: &TreeRow) -> ListItem<'static> {
        let label_style = if self.state.is_selected(row) {
            self.theme.get_selected_style()
        } else if row.dimmed {
            self.theme.get_disabled_style()
        } else {
            Style::default()
        };

        let mut spans = vec![
            Span::raw(format!("{}{} ", row.indent(), row.toggle.glyph())),
            Span::styled(row.label.clone(), label_style),
        ];
        if let Some(badge) = &row.value {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                badge.text.clone(),
                self.theme.get_value_style(&badge.class),
            ));
        }
        if row.is_new {
            spans.push(Span::styled(" (NEW)", self.theme.get_new_item_style()));
        }

        ListItem::new(Line::from(spans))
    }

    fn render_search_results(&self, frame: &mut Frame, area: Rect, results: &SearchResults) {
        let block = self.panel_block(format!(" {} ", results.heading()));
        if results.hits.is_empty() {
            frame.render_widget(Paragraph::new("No results found").block(block), area);
            return;
        }

        let items: Vec<ListItem> = results
            .hits
            .iter()
            .map(|hit| {
                let label_style = if hit.visible {
                    Style::default()
                } else {
                    self.theme.get_disabled_style()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(hit.label().to_string(), label_style),
                    Span::raw("  "),
                    Span::styled(hit.value.clone(), self.theme.get_info_style()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.get_cursor_style());
        let mut list_state = ListState::default().with_selected(Some(results.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_detail_panel(&self, frame: &mut Frame, area: Rect) {
        let lines = match self.state.detail() {
            DetailPanel::Empty => vec![Line::from("Select an item to see its details")],
            DetailPanel::Loading(name) => vec![Line::from(format!("Loading {}...", name))],
            DetailPanel::Error(message) => {
                vec![Line::from(Span::styled(message.clone(), self.theme.get_error_style()))]
            }
            DetailPanel::Info(info) => self.info_lines(info),
            DetailPanel::Symbol(view) => self.symbol_lines(view),
        };

        let detail = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Details ")
                    .border_style(if self.state.focus() == Focus::Editor {
                        self.theme.get_selected_style()
                    } else {
                        self.theme.get_border_style()
                    }),
            );
        frame.render_widget(detail, area);
    }

    fn section(&self, label: &str) -> Line<'static> {
        Line::from(Span::styled(
            label.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
    }

    fn info_lines(&self, info: &InfoPanel) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                info.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            self.section("Type:"),
            Line::from(format!("  {}", info.kind)),
        ];

        if let Some(selection) = &info.selection {
            lines.push(self.section("Selected:"));
            lines.push(Line::from(format!("  {}", selection)));
        }
        if !info.choices.is_empty() {
            lines.push(self.section("Choices:"));
            lines.extend(info.choices.iter().map(|c| Line::from(format!("  • {}", c))));
        }
        if !info.help.is_empty() {
            lines.push(self.section("Help:"));
            lines.extend(info.help.lines().map(|l| Line::from(format!("  {}", l))));
        }
        lines
    }

    fn symbol_lines(&self, view: &DetailView) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(
            view.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        if !view.prompt.is_empty() {
            lines.push(Line::from(view.prompt.clone()));
        }
        lines.push(Line::from(""));

        let editing = self.state.focus() == Focus::Editor;
        lines.push(self.section(if editing {
            "Value (Enter: set, Esc: cancel):"
        } else {
            "Value (e: edit):"
        }));
        let mut editor = vec![Span::raw("  ")];
        match &view.editor {
            ValueEditor::Choice { options, selected } => {
                for (idx, option) in options.iter().enumerate() {
                    let style = if idx == *selected {
                        self.theme.get_selected_style().add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default()
                    };
                    editor.push(Span::styled(format!(" {} ", option), style));
                }
            }
            ValueEditor::Text(input) if editing => {
                editor.extend(self.input_spans(input).into_iter().map(|s| {
                    Span::styled(s.content.into_owned(), s.style)
                }));
            }
            ValueEditor::Text(input) => editor.push(Span::raw(input.as_str().to_string())),
        }
        lines.push(Line::from(editor));

        lines.push(self.section("Type:"));
        lines.push(Line::from(format!("  {}", view.symbol_type)));

        if let Some(depends) = &view.depends_on {
            lines.push(self.section("Depends on:"));
            lines.push(Line::from(format!("  {}", depends)));
        }

        let defaults = view.default_lines();
        if !defaults.is_empty() {
            lines.push(self.section("Defaults:"));
            lines.extend(defaults.into_iter().map(|d| Line::from(format!("  {}", d))));
        }

        if !view.ranges.is_empty() {
            lines.push(self.section("Range:"));
            lines.extend(
                view.ranges
                    .iter()
                    .map(|r| Line::from(format!("  {} .. {}", r.low, r.high))),
            );
        }

        for (label, refs) in [("Selects:", &view.selects), ("Implies:", &view.implies)] {
            if refs.is_empty() {
                continue;
            }
            lines.push(self.section(label));
            for r in refs {
                let text = match &r.condition {
                    Some(cond) if !cond.is_empty() => format!("  • {} (if {})", r.target, cond),
                    _ => format!("  • {}", r.target),
                };
                lines.push(Line::from(text));
            }
        }

        if !view.help.is_empty() {
            lines.push(self.section("Help:"));
            lines.extend(view.help.lines().map(|l| Line::from(format!("  {}", l))));
        }
        lines
    }

    fn render_change_list(&self, frame: &mut Frame, area: Rect, mode: ChangeMode) {
        let list = self.state.changes(mode);
        let block = self.panel_block(format!(" {} ", list.title()));
        if list.changes.is_empty() {
            frame.render_widget(Paragraph::new(list.empty_message()).block(block), area);
            return;
        }

        let items: Vec<ListItem> = list
            .changes
            .iter()
            .map(|change| {
                let values = ChangeValues::describe(mode, change);
                let value_style = match values {
                    ChangeValues::New(_) => self.theme.get_new_item_style(),
                    _ => self.theme.get_info_style(),
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        change.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!("  [{}]  ", change.symbol_type)),
                    Span::styled(values.text(), value_style),
                ]))
            })
            .collect();

        let widget = List::new(items)
            .block(block)
            .highlight_style(self.theme.get_cursor_style());
        let mut list_state = ListState::default().with_selected(Some(list.selected));
        frame.render_stateful_widget(widget, area, &mut list_state);
    }

    fn render_change_detail(&self, frame: &mut Frame, area: Rect, mode: ChangeMode) {
        let mut lines = Vec::new();
        if let Some(change) = self.state.changes(mode).selected_change() {
            lines.push(Line::from(Span::styled(
                change.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            if !change.prompt.is_empty() {
                lines.push(Line::from(change.prompt.clone()));
            }
            lines.push(Line::from(""));
            lines.push(self.section("Type:"));
            lines.push(Line::from(format!("  {}", change.symbol_type)));
            lines.push(self.section("Changed:"));
            lines.push(Line::from(format!("  {}", ChangeValues::describe(mode, change).text())));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(" r: reset  R: reset all  x: export"));

        let detail = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" Details "));
        frame.render_widget(detail, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status = self.state.status();
        let line = match status.current() {
            Some(message) => Line::from(Span::styled(
                format!(" {}", message.text),
                self.theme.get_status_style(message.kind),
            )),
            None => Line::from(
                " ↑↓:Navigate │ Space:Expand │ Enter:Select │ e:Edit │ Tab:Changes │ /:Search │ ?:Help",
            ),
        };

        let bar = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(bar, area);
    }

    fn render_dialog(&self, frame: &mut Frame, dialog: &Dialog) {
        let area = match dialog {
            Dialog::Help => self.centered_rect(60, 80, frame.size()),
            _ => self.centered_rect(50, 30, frame.size()),
        };

        let (lines, style) = match dialog {
            Dialog::Help => (Self::help_lines(), self.theme.get_info_style()),
            Dialog::Confirm { message, .. } => (
                vec![
                    Line::from(message.clone()),
                    Line::from(""),
                    Line::from("  y/Enter - Yes"),
                    Line::from("  n/Esc   - No"),
                ],
                self.theme.get_warning_style(),
            ),
            Dialog::Prompt { message, input, .. } => {
                let mut field = vec![Span::raw("> ")];
                field.extend(self.input_spans(input));
                (
                    vec![
                        Line::from(message.clone()),
                        Line::from(""),
                        Line::from(field),
                        Line::from(""),
                        Line::from("  Enter - OK   Esc - Cancel"),
                    ],
                    Style::default(),
                )
            }
        };

        let widget = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(dialog.title())
                    .border_style(style),
            );
        frame.render_widget(Clear, area);
        frame.render_widget(widget, area);
    }

    fn help_lines() -> Vec<Line<'static>> {
        [
            "Keyboard Shortcuts",
            "══════════════════",
            "",
            "Navigation:",
            "  ↑/k ↓/j    - Move up / down",
            "  Home/End   - Jump to first / last",
            "  →/l        - Expand menu",
            "  ←/h        - Collapse menu / go to parent",
            "  Space      - Toggle menu",
            "  Enter      - Select item",
            "  Tab        - Switch tab",
            "",
            "Actions:",
            "  e          - Edit value of selected symbol",
            "  a          - Toggle show all symbols",
            "  / or ^F    - Search",
            "  r / R      - Reset change / reset all",
            "  x          - Export changes",
            "  ^S         - Save configuration",
            "  w          - Save as...",
            "  ^O         - Load configuration",
            "  X          - Save and exit",
            "  q          - Quit",
            "  ?          - Show this help",
            "",
            "Press any key to close",
        ]
        .into_iter()
        .map(Line::from)
        .collect()
    }

    fn centered_rect(&self, percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }

    // ---- input ----

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult> {
        if self.state.dialog().is_some() {
            self.handle_dialog_key(key);
        } else if let Some(action) = EventHandler::shortcut(&key) {
            self.perform(action);
        } else {
            match self.state.focus() {
                Focus::Search => self.handle_search_key(key),
                Focus::Editor => self.handle_editor_key(key),
                Focus::Main => {
                    if let Some(action) = EventHandler::main_action(&key) {
                        self.perform(action);
                    }
                }
            }
        }

        Ok(if self.state.should_quit() {
            EventResult::Quit
        } else {
            EventResult::Continue
        })
    }

    fn perform(&mut self, action: Action) {
        let state = &mut self.state;
        match action {
            Action::Save => state.save_config(),
            Action::Load => state.load_config(),
            Action::FocusSearch => state.focus_search(),
            Action::MoveUp => state.move_up(),
            Action::MoveDown => state.move_down(),
            Action::First => state.jump_to_first(),
            Action::Last => state.jump_to_last(),
            Action::Select => state.select_at_cursor(),
            Action::Expand => state.expand_at_cursor(),
            Action::Collapse => state.collapse_at_cursor(),
            Action::ToggleExpand => state.toggle_at_cursor(),
            Action::NextTab => state.next_tab(),
            Action::ToggleShowAll => state.toggle_show_all(),
            Action::EditValue => state.begin_edit(),
            Action::Reset => state.reset_selected_change(),
            Action::ResetAll => {
                if let Some(mode) = state.tab().mode() {
                    state.reset_all_changes(mode);
                }
            }
            Action::Export => {
                let mode = state.tab().mode().unwrap_or(ChangeMode::Session);
                state.export_changes(mode);
            }
            Action::SaveAs => state.save_as_config(),
            Action::SaveAndExit => state.save_and_exit(),
            Action::Help => state.show_help(),
            Action::Quit => state.request_quit(),
        }
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) {
        let state = &mut self.state;
        if matches!(state.dialog(), Some(Dialog::Help)) {
            state.close_dialog();
        } else if matches!(state.dialog(), Some(Dialog::Confirm { .. })) {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => state.answer_confirm(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => state.answer_confirm(false),
                _ => {}
            }
        } else {
            match key.code {
                KeyCode::Enter => state.submit_prompt(),
                KeyCode::Esc => state.answer_prompt(None),
                code => {
                    if let Some(input) = state.dialog_input_mut() {
                        edit_input(input, code);
                    }
                }
            }
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Down => self.state.blur_search(),
            code => self.state.edit_search(|input| edit_input(input, code)),
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.end_edit(),
            KeyCode::Enter => self.state.update_symbol_value(),
            code => {
                if let Some(editor) = self.state.editor_mut() {
                    edit_value(editor, code);
                }
            }
        }
    }
}

fn edit_value(editor: &mut ValueEditor, code: KeyCode) {
    if let ValueEditor::Text(input) = editor {
        edit_input(input, code);
        return;
    }
    match code {
        KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') => editor.prev_option(),
        KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') | KeyCode::Char(' ') => {
            editor.next_option()
        }
        _ => {}
    }
}

/// Line editing shared by the search field, the value editor and prompts.
fn edit_input(input: &mut TextInput, code: KeyCode) {
    match code {
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => {}
    }
}
