// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use roster_app::{
    ColumnDef, ColumnId, DisplayRow, MetricCell, PatientTable, SortColumn, SortDirection,
    SortIndicator, TableCommand, TableEvent,
};
use std::io;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_PAGE_SIZE: usize = 10;
const BAR_WIDTH: usize = 10;
const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '░';
const CHECKBOX: &str = "[ ]";
const CHECKBOX_SELECTED: &str = "[x]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    pub title: String,
    pub page_size: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            title: "Patients".to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    page: usize,
    selected_row: usize,
    selected_col: usize,
    search_focused: bool,
    status_line: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiCommand {
    MoveRow(isize),
    MoveColumn(isize),
    ClickSelectedHeader,
    ClickHeader(SortColumn),
    NextPage,
    PrevPage,
    FocusSearch,
    ToggleSelected,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchKey {
    Insert(char),
    Backspace,
    Leave,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum UiStatus {
    SortAsc(&'static str),
    SortDesc(&'static str),
    SortUnavailable,
    Filtered { matched: usize, total: usize },
    SearchFocused,
    SearchDone,
    Page { number: usize, count: usize },
    Selected { count: usize },
}

impl UiStatus {
    fn message(self) -> String {
        match self {
            Self::SortAsc(column) => format!("sort {column} asc"),
            Self::SortDesc(column) => format!("sort {column} desc"),
            Self::SortUnavailable => "sort unavailable".to_owned(),
            Self::Filtered { matched, total } => format!("{matched} of {total} patients"),
            Self::SearchFocused => "search: type a name, enter to finish".to_owned(),
            Self::SearchDone => "search done".to_owned(),
            Self::Page { number, count } => format!("page {number}/{count}"),
            Self::Selected { count } => format!("{count} selected"),
        }
    }
}

/// Row window for one page of a paginated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub index: usize,
    pub count: usize,
    pub start: usize,
    pub end: usize,
}

pub fn page_bounds(total_rows: usize, page: usize, page_size: usize) -> Page {
    let page_size = page_size.max(1);
    let count = total_rows.div_ceil(page_size).max(1);
    let index = page.min(count - 1);
    let start = (index * page_size).min(total_rows);
    let end = (start + page_size).min(total_rows);
    Page {
        index,
        count,
        start,
        end,
    }
}

pub fn run_app(table: &mut PatientTable, options: &ViewOptions) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        selected_col: 1,
        ..ViewData::default()
    };

    let mut result = Ok(());
    loop {
        if let Err(error) = terminal.draw(|frame| render(frame, table, &view_data, options)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if !has_event {
            continue;
        }
        match event::read().context("read event") {
            Ok(Event::Key(key)) => {
                if handle_key_event(table, &mut view_data, options.page_size, key) {
                    break;
                }
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn handle_key_event(
    table: &mut PatientTable,
    view_data: &mut ViewData,
    page_size: usize,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.search_focused {
        if let Some(search_key) = search_key_for(key) {
            let status = apply_search_key(table, view_data, page_size, search_key);
            view_data.status_line = Some(status.message());
        }
        return false;
    }

    let Some(command) = ui_command_for_key(key) else {
        return false;
    };
    if command == UiCommand::Quit {
        return true;
    }
    if let Some(status) = apply_ui_command(table, view_data, page_size, command) {
        view_data.status_line = Some(status.message());
    }
    false
}

fn ui_command_for_key(key: KeyEvent) -> Option<UiCommand> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(UiCommand::MoveRow(1)),
        KeyCode::Char('k') | KeyCode::Up => Some(UiCommand::MoveRow(-1)),
        KeyCode::Char('h') | KeyCode::Left => Some(UiCommand::MoveColumn(-1)),
        KeyCode::Char('l') | KeyCode::Right => Some(UiCommand::MoveColumn(1)),
        KeyCode::Char('s') | KeyCode::Enter => Some(UiCommand::ClickSelectedHeader),
        KeyCode::Char('1') => Some(UiCommand::ClickHeader(SortColumn::Name)),
        KeyCode::Char('2') => Some(UiCommand::ClickHeader(SortColumn::StartDate)),
        KeyCode::Char('3') => Some(UiCommand::ClickHeader(SortColumn::EndDate)),
        KeyCode::Char('4') => Some(UiCommand::ClickHeader(SortColumn::Procedure)),
        KeyCode::Char('5') => Some(UiCommand::ClickHeader(SortColumn::Adherence)),
        KeyCode::Char('6') => Some(UiCommand::ClickHeader(SortColumn::Rom)),
        KeyCode::Char('n') | KeyCode::PageDown => Some(UiCommand::NextPage),
        KeyCode::Char('p') | KeyCode::PageUp => Some(UiCommand::PrevPage),
        KeyCode::Char('/') => Some(UiCommand::FocusSearch),
        KeyCode::Char(' ') => Some(UiCommand::ToggleSelected),
        KeyCode::Char('q') => Some(UiCommand::Quit),
        _ => None,
    }
}

fn search_key_for(key: KeyEvent) -> Option<SearchKey> {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => Some(SearchKey::Leave),
        KeyCode::Backspace => Some(SearchKey::Backspace),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(SearchKey::Insert(ch))
        }
        _ => None,
    }
}

fn apply_ui_command(
    table: &mut PatientTable,
    view_data: &mut ViewData,
    page_size: usize,
    command: UiCommand,
) -> Option<UiStatus> {
    match command {
        UiCommand::MoveRow(delta) => {
            let page = page_bounds(table.records().len(), view_data.page, page_size);
            let rows_on_page = page.end - page.start;
            view_data.selected_row = step(view_data.selected_row, delta, rows_on_page);
            None
        }
        UiCommand::MoveColumn(delta) => {
            view_data.selected_col = step(view_data.selected_col, delta, ColumnId::ALL.len());
            None
        }
        UiCommand::ClickSelectedHeader => {
            let column = ColumnId::ALL
                .get(view_data.selected_col)
                .and_then(|id| id.sort_column());
            match column {
                Some(column) => Some(click_header(table, view_data, page_size, column)),
                None => Some(UiStatus::SortUnavailable),
            }
        }
        UiCommand::ClickHeader(column) => Some(click_header(table, view_data, page_size, column)),
        UiCommand::NextPage => Some(turn_page(table, view_data, page_size, 1)),
        UiCommand::PrevPage => Some(turn_page(table, view_data, page_size, -1)),
        UiCommand::FocusSearch => {
            view_data.search_focused = true;
            Some(UiStatus::SearchFocused)
        }
        UiCommand::ToggleSelected => toggle_focused_row(table, view_data, page_size),
        UiCommand::Quit => None,
    }
}

fn apply_search_key(
    table: &mut PatientTable,
    view_data: &mut ViewData,
    page_size: usize,
    key: SearchKey,
) -> UiStatus {
    let mut query = table.search().to_owned();
    match key {
        SearchKey::Leave => {
            view_data.search_focused = false;
            return UiStatus::SearchDone;
        }
        SearchKey::Backspace => {
            query.pop();
        }
        SearchKey::Insert(ch) => query.push(ch),
    }

    let mut status = UiStatus::SearchFocused;
    for event in table.dispatch(TableCommand::SearchChanged(query)) {
        if let TableEvent::RecordsFiltered { matched, total } = event {
            status = UiStatus::Filtered { matched, total };
        }
    }
    view_data.page = 0;
    view_data.selected_row = 0;
    clamp_view(table, view_data, page_size);
    status
}

fn click_header(
    table: &mut PatientTable,
    view_data: &mut ViewData,
    page_size: usize,
    column: SortColumn,
) -> UiStatus {
    let mut status = UiStatus::SortUnavailable;
    for event in table.dispatch(TableCommand::ColumnHeaderClicked(column)) {
        if let TableEvent::SortApplied(sort) = event {
            let label = sort_column_label(sort.column);
            status = match sort.direction {
                SortDirection::Asc => UiStatus::SortAsc(label),
                SortDirection::Desc => UiStatus::SortDesc(label),
            };
        }
    }
    if let Some(position) = ColumnId::ALL
        .iter()
        .position(|id| id.sort_column() == Some(column))
    {
        view_data.selected_col = position;
    }
    clamp_view(table, view_data, page_size);
    debug!(status = ?status, "header clicked");
    status
}

fn toggle_focused_row(
    table: &mut PatientTable,
    view_data: &ViewData,
    page_size: usize,
) -> Option<UiStatus> {
    let page = page_bounds(table.records().len(), view_data.page, page_size);
    let id = table
        .records()
        .get(page.start + view_data.selected_row)?
        .id
        .clone();
    table
        .dispatch(TableCommand::SelectionToggled(id))
        .into_iter()
        .find_map(|event| match event {
            TableEvent::SelectionChanged { count, .. } => Some(UiStatus::Selected { count }),
            _ => None,
        })
}

fn turn_page(
    table: &PatientTable,
    view_data: &mut ViewData,
    page_size: usize,
    delta: isize,
) -> UiStatus {
    let current = page_bounds(table.records().len(), view_data.page, page_size);
    view_data.page = step(current.index, delta, current.count);
    view_data.selected_row = 0;
    clamp_view(table, view_data, page_size);
    UiStatus::Page {
        number: view_data.page + 1,
        count: current.count,
    }
}

fn clamp_view(table: &PatientTable, view_data: &mut ViewData, page_size: usize) {
    let page = page_bounds(table.records().len(), view_data.page, page_size);
    view_data.page = page.index;
    let rows_on_page = page.end - page.start;
    view_data.selected_row = view_data.selected_row.min(rows_on_page.saturating_sub(1));
    view_data.selected_col = view_data
        .selected_col
        .min(ColumnId::ALL.len().saturating_sub(1));
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = current as isize + delta;
    next.clamp(0, len as isize - 1) as usize
}

fn sort_column_label(column: SortColumn) -> &'static str {
    ColumnId::ALL
        .iter()
        .find(|id| id.sort_column() == Some(column))
        .map_or(column.as_str(), |id| id.label())
}

pub fn header_label(column: &ColumnDef) -> String {
    match column.indicator {
        SortIndicator::Ascending => format!("{} ↑", column.label),
        SortIndicator::Descending => format!("{} ↓", column.label),
        SortIndicator::Inactive if column.is_sortable() => format!("{} ↕", column.label),
        SortIndicator::Inactive => column.label.to_owned(),
    }
}

pub fn metric_bar(cell: &MetricCell) -> String {
    let filled = cell
        .percent
        .map_or(0, |percent| usize::from(percent) * BAR_WIDTH / 100);
    let mut bar = String::with_capacity(BAR_WIDTH * 3);
    bar.extend(std::iter::repeat_n(BAR_FILLED, filled));
    bar.extend(std::iter::repeat_n(BAR_EMPTY, BAR_WIDTH - filled));
    bar
}

fn color_for_token(token: &str) -> Color {
    match token.trim().to_ascii_lowercase().as_str() {
        "green" | "teal" | "lime" => Color::Green,
        "red" => Color::Red,
        "orange" => Color::Indexed(208),
        "yellow" => Color::Yellow,
        "pink" | "grape" => Color::LightMagenta,
        "violet" | "indigo" => Color::Magenta,
        "blue" => Color::Blue,
        "cyan" => Color::Cyan,
        "gray" | "grey" | "dark" => Color::Gray,
        _ => Color::White,
    }
}

fn name_cell_text(row: &DisplayRow) -> Text<'static> {
    let mut first_line = vec![Span::raw(row.name.name.clone())];
    if let Some(badge) = row.name.badge {
        first_line.push(Span::raw(" "));
        first_line.push(Span::styled(
            format!(" {} ", badge.label),
            Style::default()
                .fg(Color::Black)
                .bg(color_for_token(badge.color.as_str())),
        ));
    }
    Text::from(vec![
        Line::from(first_line),
        Line::styled(row.name.last_login.clone(), Style::default().fg(Color::Green)),
    ])
}

fn adherence_cell_text(cell: &MetricCell) -> Text<'static> {
    Text::from(Line::from(vec![
        Span::styled(metric_bar(cell), Style::default().fg(color_for_token(&cell.color))),
        Span::raw(format!(" {}", cell.value)),
    ]))
}

fn rom_cell_text(cell: &MetricCell) -> Text<'static> {
    Text::from(Line::from(Span::styled(
        format!(" {} ", cell.value),
        Style::default()
            .fg(Color::Black)
            .bg(color_for_token(&cell.color))
            .add_modifier(Modifier::BOLD),
    )))
}

fn cell_text(row: &DisplayRow, column: ColumnId) -> Text<'static> {
    match column {
        ColumnId::Select => Text::raw(if row.selected {
            CHECKBOX_SELECTED
        } else {
            CHECKBOX
        }),
        ColumnId::Name => name_cell_text(row),
        ColumnId::StartDate => Text::raw(row.start_date.clone()),
        ColumnId::EndDate => Text::raw(row.end_date.clone()),
        ColumnId::Procedure => Text::raw(row.procedure.clone()),
        ColumnId::Adherence => adherence_cell_text(&row.adherence),
        ColumnId::Rom => rom_cell_text(&row.rom),
    }
}

fn width_constraint(column: &ColumnDef) -> Constraint {
    match (column.width, column.min_width) {
        (Some(width), _) => Constraint::Length(width),
        (None, Some(min_width)) => Constraint::Min(min_width),
        (None, None) => Constraint::Min(8),
    }
}

fn render(
    frame: &mut ratatui::Frame<'_>,
    table: &PatientTable,
    view_data: &ViewData,
    options: &ViewOptions,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_search(frame, layout[0], table, view_data);
    render_table(frame, layout[1], table, view_data, options);

    let status = Paragraph::new(status_text(table, view_data, options.page_size))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);
}

fn render_search(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    table: &PatientTable,
    view_data: &ViewData,
) {
    let (text, style) = if table.search().is_empty() && !view_data.search_focused {
        ("Enter Name".to_owned(), Style::default().fg(Color::DarkGray))
    } else if view_data.search_focused {
        (
            format!("{}▏", table.search()),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        (table.search().to_owned(), Style::default().fg(Color::Green))
    };
    let search = Paragraph::new(text)
        .style(style)
        .block(Block::default().title("Search").borders(Borders::ALL));
    frame.render_widget(search, area);
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    table: &PatientTable,
    view_data: &ViewData,
    options: &ViewOptions,
) {
    let columns = table.columns();
    let rows = table.display_rows();
    let page = page_bounds(rows.len(), view_data.page, options.page_size);

    let header = Row::new(columns.iter().enumerate().map(|(index, column)| {
        let mut style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        if index == view_data.selected_col {
            style = style.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED);
        }
        Cell::from(header_label(column)).style(style)
    }));

    let body = rows[page.start..page.end]
        .iter()
        .enumerate()
        .map(|(offset, row)| {
            let cells = columns
                .iter()
                .map(|column| Cell::from(cell_text(row, column.id)))
                .collect::<Vec<_>>();
            let mut line = Row::new(cells).height(2);
            if offset == view_data.selected_row {
                line = line.style(Style::default().bg(Color::DarkGray));
            }
            line
        });

    let widths = columns.iter().map(width_constraint).collect::<Vec<_>>();
    let widget = Table::new(body, widths)
        .header(header)
        .column_spacing(2)
        .block(
            Block::default()
                .title(table_title(table, &options.title))
                .borders(Borders::ALL),
        );
    frame.render_widget(widget, area);
}

fn table_title(table: &PatientTable, title: &str) -> String {
    let mut parts = vec![format!(
        "{title} r:{}/{}",
        table.records().len(),
        table.all_records().len()
    )];
    if let Some(sort) = table.sort() {
        parts.push(format!(
            "sort {}:{}",
            sort_column_label(sort.column),
            sort.direction.as_str()
        ));
    }
    if !table.search().trim().is_empty() {
        parts.push(format!("search {:?}", table.search().trim()));
    }
    parts.join(" | ")
}

fn status_text(table: &PatientTable, view_data: &ViewData, page_size: usize) -> String {
    let page = page_bounds(table.records().len(), view_data.page, page_size);
    let position = format!("page {}/{}", page.index + 1, page.count);
    let hints = if view_data.search_focused {
        "enter/esc done  backspace delete"
    } else {
        "/ search  space select  h/l column  s sort  1-6 sort by  n/p page  q quit"
    };
    match &view_data.status_line {
        Some(message) => format!("{position} | {message} | {hints}"),
        None => format!("{position} | {hints}"),
    }
}

/// Renders every row as aligned plain text, for non-interactive output.
pub fn render_plain(table: &PatientTable) -> String {
    let columns = table
        .columns()
        .into_iter()
        .filter(|column| column.id != ColumnId::Select)
        .collect::<Vec<_>>();
    let mut lines = vec![
        columns
            .iter()
            .map(header_label)
            .collect::<Vec<_>>(),
    ];
    for row in table.display_rows() {
        lines.push(
            columns
                .iter()
                .map(|column| plain_cell(&row, column.id))
                .collect(),
        );
    }

    let mut widths = vec![0usize; columns.len()];
    for line in &lines {
        for (index, value) in line.iter().enumerate() {
            widths[index] = widths[index].max(value.chars().count());
        }
    }

    let mut output = String::new();
    for line in &lines {
        let padded = line
            .iter()
            .zip(&widths)
            .map(|(value, width)| {
                let pad = width - value.chars().count();
                format!("{value}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ");
        output.push_str(padded.trim_end());
        output.push('\n');
    }
    output.push_str(&table_title(table, "patients"));
    output.push('\n');
    output
}

fn plain_cell(row: &DisplayRow, column: ColumnId) -> String {
    match column {
        ColumnId::Select => String::new(),
        ColumnId::Name => match row.name.badge {
            Some(badge) => format!("{} [{}] ({})", row.name.name, badge.label, row.name.last_login),
            None => format!("{} ({})", row.name.name, row.name.last_login),
        },
        ColumnId::StartDate => row.start_date.clone(),
        ColumnId::EndDate => row.end_date.clone(),
        ColumnId::Procedure => row.procedure.clone(),
        ColumnId::Adherence => format!("{} {}", metric_bar(&row.adherence), row.adherence.value),
        ColumnId::Rom => row.rom.value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CHECKBOX_SELECTED, Page, SearchKey, UiCommand, UiStatus, ViewData, apply_search_key,
        apply_ui_command, cell_text, handle_key_event, header_label, metric_bar, page_bounds,
        render_plain, status_text, table_title, ui_command_for_key,
    };
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::text::Text;
    use roster_app::{
        ActiveSort, ColumnDef, ColumnId, MetricCell, PatientTable, SortColumn, SortDirection,
        SortIndicator,
    };
    use roster_testkit::{PatientFaker, sample_patient};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn small_table() -> PatientTable {
        let mut ada = sample_patient("a", "Ada Park");
        ada.adherence_value.value = "82".to_owned();
        let mut bo = sample_patient("b", "Bo Lindqvist");
        bo.adherence_value.value = "N/A".to_owned();
        let cy = sample_patient("c", "Cy Adams");
        PatientTable::new(vec![cy, ada, bo])
    }

    fn column(indicator: SortIndicator, sort_column: Option<SortColumn>) -> ColumnDef {
        ColumnDef {
            id: ColumnId::Name,
            label: "Name",
            width: None,
            min_width: None,
            sort_column,
            indicator,
        }
    }

    #[test]
    fn page_bounds_split_rows_into_pages_of_ten() {
        assert_eq!(
            page_bounds(23, 0, 10),
            Page {
                index: 0,
                count: 3,
                start: 0,
                end: 10
            }
        );
        assert_eq!(page_bounds(23, 2, 10).start, 20);
        assert_eq!(page_bounds(23, 2, 10).end, 23);
        assert_eq!(page_bounds(23, 9, 10).index, 2);
    }

    #[test]
    fn empty_table_still_has_one_page() {
        let page = page_bounds(0, 3, 10);
        assert_eq!(page.count, 1);
        assert_eq!(page.index, 0);
        assert_eq!(page.start, page.end);
    }

    #[test]
    fn header_label_marks_sort_state() {
        assert_eq!(
            header_label(&column(SortIndicator::Ascending, Some(SortColumn::Name))),
            "Name ↑"
        );
        assert_eq!(
            header_label(&column(SortIndicator::Descending, Some(SortColumn::Name))),
            "Name ↓"
        );
        assert_eq!(
            header_label(&column(SortIndicator::Inactive, Some(SortColumn::Name))),
            "Name ↕"
        );
        assert_eq!(header_label(&column(SortIndicator::Inactive, None)), "Name");
    }

    #[test]
    fn metric_bar_fills_by_percent() {
        let cell = |percent| MetricCell {
            color: "green".to_owned(),
            value: String::new(),
            percent,
        };
        assert_eq!(metric_bar(&cell(Some(50))), "█████░░░░░");
        assert_eq!(metric_bar(&cell(Some(100))), "██████████");
        assert_eq!(metric_bar(&cell(None)), "░░░░░░░░░░");
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(
            ui_command_for_key(key(KeyCode::Char('j'))),
            Some(UiCommand::MoveRow(1))
        );
        assert_eq!(
            ui_command_for_key(key(KeyCode::Enter)),
            Some(UiCommand::ClickSelectedHeader)
        );
        assert_eq!(
            ui_command_for_key(key(KeyCode::Char('5'))),
            Some(UiCommand::ClickHeader(SortColumn::Adherence))
        );
        assert_eq!(
            ui_command_for_key(key(KeyCode::PageDown)),
            Some(UiCommand::NextPage)
        );
        assert_eq!(ui_command_for_key(key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn clicking_the_selection_column_is_unavailable() {
        let mut table = small_table();
        let mut view = ViewData::default();
        let status = apply_ui_command(&mut table, &mut view, 10, UiCommand::ClickSelectedHeader);
        assert_eq!(status, Some(UiStatus::SortUnavailable));
        assert_eq!(table.sort(), None);
    }

    #[test]
    fn clicking_selected_header_toggles_sort() {
        let mut table = small_table();
        let mut view = ViewData {
            selected_col: 1,
            ..ViewData::default()
        };
        let first = apply_ui_command(&mut table, &mut view, 10, UiCommand::ClickSelectedHeader);
        assert_eq!(first, Some(UiStatus::SortAsc("Name")));
        let second = apply_ui_command(&mut table, &mut view, 10, UiCommand::ClickSelectedHeader);
        assert_eq!(second, Some(UiStatus::SortDesc("Name")));
        assert_eq!(
            table.sort(),
            Some(ActiveSort::new(SortColumn::Name, SortDirection::Desc))
        );
    }

    #[test]
    fn number_key_moves_header_cursor_to_sorted_column() {
        let mut table = small_table();
        let mut view = ViewData::default();
        let quit = handle_key_event(&mut table, &mut view, 10, key(KeyCode::Char('6')));
        assert!(!quit);
        assert_eq!(view.selected_col, 6);
        assert_eq!(view.status_line.as_deref(), Some("sort ROM asc"));
    }

    #[test]
    fn search_keys_filter_and_reset_paging() {
        let mut table = PatientTable::new(PatientFaker::new(3).patients(35));
        let mut view = ViewData {
            page: 3,
            selected_row: 4,
            search_focused: true,
            ..ViewData::default()
        };
        let status = apply_search_key(&mut table, &mut view, 10, SearchKey::Insert('a'));
        assert!(matches!(status, UiStatus::Filtered { total: 35, .. }));
        assert_eq!(table.search(), "a");
        assert_eq!(view.page, 0);
        assert_eq!(view.selected_row, 0);

        apply_search_key(&mut table, &mut view, 10, SearchKey::Backspace);
        assert_eq!(table.search(), "");
        assert_eq!(table.records().len(), 35);

        let done = apply_search_key(&mut table, &mut view, 10, SearchKey::Leave);
        assert_eq!(done, UiStatus::SearchDone);
        assert!(!view.search_focused);
    }

    #[test]
    fn typed_characters_go_to_search_while_focused() {
        let mut table = small_table();
        let mut view = ViewData::default();
        handle_key_event(&mut table, &mut view, 10, key(KeyCode::Char('/')));
        assert!(view.search_focused);

        let quit = handle_key_event(&mut table, &mut view, 10, key(KeyCode::Char('q')));
        assert!(!quit);
        assert_eq!(table.search(), "q");
        assert_eq!(table.records().len(), 1);
        assert_eq!(table.records()[0].name, "Bo Lindqvist");

        assert!(handle_key_event(
            &mut table,
            &mut view,
            10,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
    }

    #[test]
    fn space_ticks_the_focused_row_checkbox() {
        let mut table = small_table();
        let mut view = ViewData {
            selected_row: 1,
            ..ViewData::default()
        };
        assert_eq!(
            ui_command_for_key(key(KeyCode::Char(' '))),
            Some(UiCommand::ToggleSelected)
        );
        handle_key_event(&mut table, &mut view, 10, key(KeyCode::Char(' ')));
        assert_eq!(view.status_line.as_deref(), Some("1 selected"));

        let rows = table.display_rows();
        assert!(!rows[0].selected);
        assert!(rows[1].selected);
        assert_eq!(rows[1].id.as_str(), "a");
        assert_eq!(
            cell_text(&rows[1], ColumnId::Select),
            Text::raw(CHECKBOX_SELECTED)
        );

        table.on_column_header_click(SortColumn::Name);
        let ticked = table
            .display_rows()
            .into_iter()
            .filter(|row| row.selected)
            .map(|row| row.name.name)
            .collect::<Vec<_>>();
        assert_eq!(ticked, vec!["Ada Park"]);

        view.selected_row = 0;
        let status = apply_ui_command(&mut table, &mut view, 10, UiCommand::ToggleSelected);
        assert_eq!(status, Some(UiStatus::Selected { count: 0 }));
    }

    #[test]
    fn toggling_on_an_empty_page_does_nothing() {
        let mut table = small_table();
        table.set_search("zzz");
        let mut view = ViewData::default();
        let status = apply_ui_command(&mut table, &mut view, 10, UiCommand::ToggleSelected);
        assert_eq!(status, None);
        assert!(table.selected_ids().is_empty());
    }

    #[test]
    fn paging_clamps_at_both_ends() {
        let mut table = PatientTable::new(PatientFaker::new(5).patients(25));
        let mut view = ViewData::default();
        let back = apply_ui_command(&mut table, &mut view, 10, UiCommand::PrevPage);
        assert_eq!(back, Some(UiStatus::Page { number: 1, count: 3 }));

        for _ in 0..5 {
            apply_ui_command(&mut table, &mut view, 10, UiCommand::NextPage);
        }
        assert_eq!(view.page, 2);
        assert!(status_text(&table, &view, 10).starts_with("page 3/3"));

        apply_ui_command(&mut table, &mut view, 10, UiCommand::MoveRow(50));
        assert_eq!(view.selected_row, 4);
    }

    #[test]
    fn plain_render_lists_rows_in_table_order() {
        let mut table = small_table();
        table.on_column_header_click(SortColumn::Adherence);
        let output = render_plain(&table);
        let lines = output.lines().collect::<Vec<_>>();
        assert!(lines[0].starts_with("Name ↕"));
        assert!(lines[0].contains("Adherence ↑"));
        assert!(lines[1].starts_with("Bo Lindqvist [Onboarded] (No login)"));
        assert!(lines[2].starts_with("Cy Adams"));
        assert!(lines[3].starts_with("Ada Park"));
        assert!(lines[1].contains("Mar 05, 2024"));
        assert!(lines[1].contains("Knee: replacement"));
        assert_eq!(lines[4], "patients r:3/3 | sort Adherence:asc");
    }

    #[test]
    fn table_title_reports_search_and_sort() {
        let mut table = small_table();
        table.set_search(" ad ");
        table.on_column_header_click(SortColumn::Name);
        assert_eq!(
            table_title(&table, "Patients"),
            "Patients r:2/3 | sort Name:asc | search \"ad\""
        );
    }
}
