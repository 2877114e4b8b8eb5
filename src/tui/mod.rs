// SPDX-FileCopyrightText: 2026 Praxis Contributors
// SPDX-License-Identifier: MIT

//! Terminal UI.
//!
//! Renders the tab workspace (ratatui + crossterm): tab bar, role-aware
//! sidebar navigation, data tables with search/sort/paging, and detail panels
//! that show the captured row payload while the fresh fetch resolves.

use std::collections::HashMap;
use std::error::Error;
use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
};

use crate::api::{ApiClient, DashboardStats, Invoice, Page, Patient};
use crate::model::{OpenRequest, Role, View, ViewId, ViewKind};
use crate::store::AppStore;

const FOCUS_COLOR: Color = Color::LightGreen;
const DIM_COLOR: Color = Color::DarkGray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const TAB_HIGHLIGHT_COLOR: Color = Color::LightGreen;
const TOAST_TTL: Duration = Duration::from_secs(3);
const PAGE_SIZE: u64 = 10;
const FUZZY_RANK_THRESHOLD: f64 = 55.0;

/// Runs the interactive terminal UI until the user quits.
pub fn run(
    store: AppStore,
    api: ApiClient,
    handle: tokio::runtime::Handle,
) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(store, api, handle);

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        // Hydration runs after the first paint so the defaults are on screen
        // before any persisted snapshot overlays them.
        app.hydrate_if_needed();
        app.drain_fetch_results();
        app.ensure_focused_load();
        if let Some(message) = app.store.take_store_error() {
            app.set_toast(message);
        }

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    Ok(())
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    fn draw(&mut self, render: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone)]
enum LoadedData {
    Stats(DashboardStats),
    Patients(Page<Patient>),
    Invoices(Page<Invoice>),
    Patient(Patient),
    Invoice(Invoice),
}

#[derive(Debug, Clone)]
enum LoadState {
    Loading,
    Ready(LoadedData),
    Failed(String),
}

#[derive(Debug, Clone)]
struct ViewLoad {
    generation: u64,
    state: LoadState,
}

#[derive(Debug)]
struct FetchMessage {
    view_id: ViewId,
    generation: u64,
    result: Result<LoadedData, String>,
}

/// Per-table presentation state, keyed by view id so each tab keeps its own
/// search query, sort, page, and cursor across focus changes.
#[derive(Debug, Clone, Default)]
struct TableUi {
    query: String,
    sort_column: usize,
    ascending: bool,
    page: u64,
    cursor: usize,
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Sidebar,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchMode {
    Inactive,
    Editing,
}

struct App {
    store: AppStore,
    api: ApiClient,
    runtime: tokio::runtime::Handle,
    fetch_tx: mpsc::Sender<FetchMessage>,
    fetch_rx: mpsc::Receiver<FetchMessage>,
    loads: HashMap<ViewId, ViewLoad>,
    tables: HashMap<ViewId, TableUi>,
    next_generation: u64,
    pane: Pane,
    sidebar_cursor: usize,
    search_mode: SearchMode,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn new(store: AppStore, api: ApiClient, runtime: tokio::runtime::Handle) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::channel();
        Self {
            store,
            api,
            runtime,
            fetch_tx,
            fetch_rx,
            loads: HashMap::new(),
            tables: HashMap::new(),
            next_generation: 0,
            pane: Pane::Sidebar,
            sidebar_cursor: 0,
            search_mode: SearchMode::Inactive,
            toast: None,
            should_quit: false,
        }
    }

    fn hydrate_if_needed(&mut self) {
        if !self.store.hydrated() {
            self.store.hydrate_once();
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn drain_fetch_results(&mut self) {
        while let Ok(message) = self.fetch_rx.try_recv() {
            match self.loads.get_mut(&message.view_id) {
                Some(load) if load.generation == message.generation => {
                    load.state = match message.result {
                        Ok(data) => LoadState::Ready(data),
                        Err(err) => LoadState::Failed(err),
                    };
                }
                // Stale generation or closed view: drop the result.
                _ => {}
            }
        }
    }

    fn ensure_focused_load(&mut self) {
        let focused = self.store.session().focused_view().clone();
        if !self.loads.contains_key(focused.id()) {
            self.request_load(&focused);
        }
    }

    /// Starts (or restarts) the fetch for a view. Each request gets a fresh
    /// generation so a late result from a superseded request never lands.
    fn request_load(&mut self, view: &View) {
        self.next_generation += 1;
        let generation = self.next_generation;
        let view_id = view.id().clone();
        self.loads.insert(
            view_id.clone(),
            ViewLoad {
                generation,
                state: LoadState::Loading,
            },
        );

        let page = self.table_ui(&view_id).page;
        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        let kind = view.kind();
        let entity_id = entity_id_of(view);

        self.runtime.spawn(async move {
            let result = match kind {
                ViewKind::Dashboard => {
                    api.fetch_dashboard_stats().await.map(LoadedData::Stats)
                }
                ViewKind::Patients => api
                    .fetch_patients(PAGE_SIZE, page * PAGE_SIZE)
                    .await
                    .map(LoadedData::Patients),
                ViewKind::Invoices => api
                    .fetch_invoices(PAGE_SIZE, page * PAGE_SIZE)
                    .await
                    .map(LoadedData::Invoices),
                ViewKind::PatientDetail => match entity_id {
                    Some(id) => api.fetch_patient(id).await.map(LoadedData::Patient),
                    None => Err(crate::api::FetchError::NotFound {
                        kind: "patient",
                        id: 0,
                    }),
                },
                ViewKind::InvoiceDetail => match entity_id {
                    Some(id) => api.fetch_invoice(id).await.map(LoadedData::Invoice),
                    None => Err(crate::api::FetchError::NotFound {
                        kind: "invoice",
                        id: 0,
                    }),
                },
            };
            let _ = tx.send(FetchMessage {
                view_id,
                generation,
                result: result.map_err(|err| err.to_string()),
            });
        });
    }

    fn table_ui(&mut self, view_id: &ViewId) -> &mut TableUi {
        self.tables.entry(view_id.clone()).or_default()
    }

    fn focused_view(&self) -> &View {
        self.store.session().focused_view()
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if self.search_mode == SearchMode::Editing {
            self.handle_search_edit_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab => {
                self.pane = match self.pane {
                    Pane::Sidebar => Pane::Content,
                    Pane::Content => Pane::Sidebar,
                };
            }
            KeyCode::Char('[') => self.focus_adjacent_tab(-1),
            KeyCode::Char(']') => self.focus_adjacent_tab(1),
            KeyCode::Char('x') => {
                let focused = self.focused_view().id().clone();
                self.store.close_view(focused);
            }
            KeyCode::Char('r') => self.switch_role(),
            KeyCode::Char('g') => self.retry_focused_load(),
            KeyCode::Char('/') => {
                if table_kind(self.focused_view().kind()) {
                    self.search_mode = SearchMode::Editing;
                    self.pane = Pane::Content;
                }
            }
            KeyCode::Esc => {
                let view_id = self.focused_view().id().clone();
                let table = self.table_ui(&view_id);
                table.query.clear();
                table.cursor = 0;
            }
            _ => match self.pane {
                Pane::Sidebar => self.handle_sidebar_key(code),
                Pane::Content => self.handle_content_key(code),
            },
        }

        false
    }

    fn handle_search_edit_key(&mut self, code: KeyCode) {
        let view_id = self.focused_view().id().clone();
        let table = self.table_ui(&view_id);
        match code {
            KeyCode::Esc => {
                table.query.clear();
                table.cursor = 0;
                self.search_mode = SearchMode::Inactive;
            }
            KeyCode::Enter => self.search_mode = SearchMode::Inactive,
            KeyCode::Backspace => {
                table.query.pop();
                table.cursor = 0;
            }
            KeyCode::Char(ch) => {
                table.query.push(ch);
                table.cursor = 0;
            }
            _ => {}
        }
    }

    fn handle_sidebar_key(&mut self, code: KeyCode) {
        let items = nav_items(self.store.role());
        match code {
            KeyCode::Down | KeyCode::Char('j') => {
                if self.sidebar_cursor + 1 < items.len() {
                    self.sidebar_cursor += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.sidebar_cursor = self.sidebar_cursor.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some((kind, title)) = items.get(self.sidebar_cursor).copied() {
                    self.store.open_view(OpenRequest::nav(kind, title));
                    self.pane = Pane::Content;
                }
            }
            _ => {}
        }
    }

    fn handle_content_key(&mut self, code: KeyCode) {
        let focused = self.focused_view().clone();
        if !table_kind(focused.kind()) {
            return;
        }
        let row_count = self.visible_row_count(&focused);

        let view_id = focused.id().clone();
        match code {
            KeyCode::Down | KeyCode::Char('j') => {
                let table = self.table_ui(&view_id);
                if table.cursor + 1 < row_count {
                    table.cursor += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let table = self.table_ui(&view_id);
                table.cursor = table.cursor.saturating_sub(1);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                let table = self.table_ui(&view_id);
                if table.page > 0 {
                    table.page -= 1;
                    table.cursor = 0;
                    self.request_load(&focused);
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.has_next_page(&focused) {
                    let table = self.table_ui(&view_id);
                    table.page += 1;
                    table.cursor = 0;
                    self.request_load(&focused);
                }
            }
            KeyCode::Char('s') => {
                let column_count = column_titles(focused.kind()).len();
                let table = self.table_ui(&view_id);
                table.sort_column = (table.sort_column + 1) % column_count.max(1);
            }
            KeyCode::Char('o') => {
                let table = self.table_ui(&view_id);
                table.ascending = !table.ascending;
            }
            KeyCode::Enter => self.open_detail_under_cursor(&focused),
            _ => {}
        }
    }

    fn focus_adjacent_tab(&mut self, delta: i64) {
        let session = self.store.session();
        let count = session.open_views().len() as i64;
        let current = session.focused_position() as i64;
        let next = (current + delta).rem_euclid(count) as usize;
        let next_id = session.open_views()[next].id().clone();
        self.store.focus_view(next_id);
    }

    fn switch_role(&mut self) {
        let next = self.store.role().toggled();
        let message = self.store.switch_role(next);
        // The session was reset; cached rows and table state belong to tabs
        // that no longer exist.
        self.loads.clear();
        self.tables.clear();
        self.sidebar_cursor = 0;
        self.pane = Pane::Sidebar;
        self.set_toast(message);
    }

    fn retry_focused_load(&mut self) {
        let focused = self.focused_view().clone();
        self.request_load(&focused);
    }

    fn open_detail_under_cursor(&mut self, view: &View) {
        let Some(load) = self.loads.get(view.id()) else {
            return;
        };
        let LoadState::Ready(data) = &load.state else {
            return;
        };

        let table = self.tables.get(view.id()).cloned().unwrap_or_default();
        let request = match data {
            LoadedData::Patients(page) => {
                let order = patient_order(&page.items, &table);
                order
                    .get(table.cursor)
                    .map(|&idx| &page.items[idx])
                    .map(patient_detail_request)
            }
            LoadedData::Invoices(page) => {
                let order = invoice_order(&page.items, &table);
                order
                    .get(table.cursor)
                    .map(|&idx| &page.items[idx])
                    .map(invoice_detail_request)
            }
            _ => None,
        };

        if let Some(request) = request {
            self.store.open_view(request);
        }
    }

    fn visible_row_count(&self, view: &View) -> usize {
        let table = self.tables.get(view.id()).cloned().unwrap_or_default();
        match self.loads.get(view.id()).map(|load| &load.state) {
            Some(LoadState::Ready(LoadedData::Patients(page))) => {
                patient_order(&page.items, &table).len()
            }
            Some(LoadState::Ready(LoadedData::Invoices(page))) => {
                invoice_order(&page.items, &table).len()
            }
            _ => 0,
        }
    }

    fn has_next_page(&self, view: &View) -> bool {
        let table = self.tables.get(view.id()).cloned().unwrap_or_default();
        let total = match self.loads.get(view.id()).map(|load| &load.state) {
            Some(LoadState::Ready(LoadedData::Patients(page))) => page.total,
            Some(LoadState::Ready(LoadedData::Invoices(page))) => page.total,
            _ => return false,
        };
        (table.page + 1) * PAGE_SIZE < total
    }
}

/// Navigation entries offered to a role. Invoice views are Manager-only.
fn nav_items(role: Role) -> Vec<(ViewKind, &'static str)> {
    let all = [
        (ViewKind::Dashboard, "Dashboard"),
        (ViewKind::Patients, "Patients"),
        (ViewKind::Invoices, "Invoices"),
    ];
    all.into_iter().filter(|(kind, _)| kind.permitted_for(role)).collect()
}

fn table_kind(kind: ViewKind) -> bool {
    matches!(kind, ViewKind::Patients | ViewKind::Invoices)
}

/// The numeric entity id encoded in a detail view id ("patient-detail-42").
fn entity_id_of(view: &View) -> Option<u64> {
    let prefix = format!("{}-", view.kind().as_str());
    view.id().as_str().strip_prefix(&prefix)?.parse().ok()
}

fn patient_detail_request(patient: &Patient) -> OpenRequest {
    OpenRequest::detail(
        ViewKind::PatientDetail,
        format!("Patient: {}", patient.full_name()),
        patient.id,
        Some(serde_json::json!({
            "id": patient.id,
            "firstName": patient.first_name,
            "lastName": patient.last_name,
            "email": patient.email,
        })),
    )
}

fn invoice_detail_request(invoice: &Invoice) -> OpenRequest {
    OpenRequest::detail(
        ViewKind::InvoiceDetail,
        format!("Invoice {}", invoice.invoice_number),
        invoice.id,
        Some(serde_json::json!({
            "id": invoice.id,
            "invoiceNumber": invoice.invoice_number,
            "amount": invoice.amount,
            "status": invoice.status.as_str(),
        })),
    )
}

/// Ranks rows against a fuzzy query, best match first. Substring matches
/// always qualify; fuzzier ones must clear the ratio threshold.
fn rank_rows(query: &str, haystacks: &[String]) -> Vec<usize> {
    let needle = query.to_lowercase();
    let mut scored = haystacks
        .iter()
        .enumerate()
        .filter_map(|(idx, haystack)| {
            let haystack = haystack.to_lowercase();
            if haystack.contains(&needle) {
                return Some((idx, 100.0));
            }
            let score = rapidfuzz::fuzz::ratio(haystack.chars(), needle.chars());
            (score >= FUZZY_RANK_THRESHOLD).then_some((idx, score))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().map(|(idx, _)| idx).collect()
}

fn column_titles(kind: ViewKind) -> &'static [&'static str] {
    match kind {
        ViewKind::Patients => &["Name", "Age", "Email"],
        ViewKind::Invoices => &["Number", "Date", "Amount", "Status"],
        _ => &[],
    }
}

fn patient_haystack(patient: &Patient) -> String {
    format!("{} {}", patient.full_name(), patient.email)
}

fn invoice_haystack(invoice: &Invoice) -> String {
    format!("{} {} {}", invoice.invoice_number, invoice.title, invoice.status)
}

/// Row ordering for the patients table: fuzzy ranking while a query is
/// active, otherwise the selected column sort.
fn patient_order(patients: &[Patient], table: &TableUi) -> Vec<usize> {
    if !table.query.is_empty() {
        let haystacks = patients.iter().map(patient_haystack).collect::<Vec<_>>();
        return rank_rows(&table.query, &haystacks);
    }

    let mut order = (0..patients.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| {
        let (a, b) = (&patients[a], &patients[b]);
        let ordering = match table.sort_column {
            1 => a.age.cmp(&b.age),
            2 => a.email.cmp(&b.email),
            _ => a.full_name().cmp(&b.full_name()),
        };
        if table.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
    order
}

fn invoice_order(invoices: &[Invoice], table: &TableUi) -> Vec<usize> {
    if !table.query.is_empty() {
        let haystacks = invoices.iter().map(invoice_haystack).collect::<Vec<_>>();
        return rank_rows(&table.query, &haystacks);
    }

    let mut order = (0..invoices.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| {
        let (a, b) = (&invoices[a], &invoices[b]);
        let ordering = match table.sort_column {
            1 => a.date.cmp(&b.date),
            2 => a.amount.cmp(&b.amount),
            3 => a.status.as_str().cmp(b.status.as_str()),
            _ => a.invoice_number.cmp(&b.invoice_number),
        };
        if table.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
    order
}

fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("${out}")
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let tabs_area = layout[0];
    let main_area = layout[1];
    let footer_area = layout[2];

    draw_tab_bar(frame, app, tabs_area);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(0)])
        .split(main_area);
    draw_sidebar(frame, app, panes[0]);
    draw_content(frame, app, panes[1]);

    draw_footer(frame, app, footer_area);
}

fn draw_tab_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let session = app.store.session();
    let titles = session
        .open_views()
        .iter()
        .map(|view| Line::from(view.title().to_owned()))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(session.focused_position())
        .highlight_style(Style::default().fg(TAB_HIGHLIGHT_COLOR).add_modifier(Modifier::BOLD))
        .divider("│");
    frame.render_widget(tabs, area);
}

fn draw_sidebar(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let role = app.store.role();
    let items = nav_items(role);
    app.sidebar_cursor = app.sidebar_cursor.min(items.len().saturating_sub(1));

    let list_items = items
        .iter()
        .enumerate()
        .map(|(idx, (_, title))| {
            let mut item = ListItem::new(*title);
            if idx == app.sidebar_cursor && app.pane == Pane::Sidebar {
                item = item.style(Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::BOLD));
            }
            item
        })
        .collect::<Vec<_>>();

    let user = app.store.role_state().user().clone();
    let title = format!(" {} · {} ({role}) ", user.initials(), user.name);
    let border_style = if app.pane == Pane::Sidebar {
        Style::default().fg(FOCUS_COLOR)
    } else {
        Style::default().fg(DIM_COLOR)
    };
    let list = List::new(list_items)
        .block(Block::default().borders(Borders::ALL).title(title).border_style(border_style));
    frame.render_widget(list, area);
}

fn draw_content(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let focused = app.focused_view().clone();
    let border_style = if app.pane == Pane::Content {
        Style::default().fg(FOCUS_COLOR)
    } else {
        Style::default().fg(DIM_COLOR)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", focused.title()))
        .border_style(border_style);

    let load_state = app.loads.get(focused.id()).map(|load| load.state.clone());
    match load_state {
        None | Some(LoadState::Loading) => match focused.kind() {
            ViewKind::PatientDetail | ViewKind::InvoiceDetail => {
                let text = payload_hint_text(&focused);
                frame.render_widget(
                    Paragraph::new(text).wrap(Wrap { trim: false }).block(block),
                    area,
                );
            }
            _ => frame.render_widget(Paragraph::new("Loading…").block(block), area),
        },
        Some(LoadState::Failed(message)) => {
            let text = Text::from(vec![
                Line::from(Span::styled(message, Style::default().fg(Color::LightRed))),
                Line::from(""),
                Line::from("Press g to retry."),
            ]);
            frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }).block(block), area);
        }
        Some(LoadState::Ready(data)) => match data {
            LoadedData::Stats(stats) => draw_dashboard(frame, block, area, &stats),
            LoadedData::Patients(page) => {
                let table = app.table_ui(focused.id()).clone();
                draw_patients_table(frame, block, area, &page, &table);
            }
            LoadedData::Invoices(page) => {
                let table = app.table_ui(focused.id()).clone();
                draw_invoices_table(frame, block, area, &page, &table);
            }
            LoadedData::Patient(patient) => {
                frame.render_widget(
                    Paragraph::new(patient_detail_text(&patient))
                        .wrap(Wrap { trim: false })
                        .block(block),
                    area,
                );
            }
            LoadedData::Invoice(invoice) => {
                frame.render_widget(
                    Paragraph::new(invoice_detail_text(&invoice))
                        .wrap(Wrap { trim: false })
                        .block(block),
                    area,
                );
            }
        },
    }
}

fn draw_dashboard(frame: &mut Frame<'_>, block: Block<'_>, area: Rect, stats: &DashboardStats) {
    let lines = vec![
        Line::from(format!("Total patients    {}", stats.total_patients)),
        Line::from(format!("Total invoices    {}", stats.total_invoices)),
        Line::from(format!("Pending invoices  {}", stats.pending_invoices)),
        Line::from(format!("Total revenue     {}", format_amount(stats.total_revenue))),
    ];
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn draw_patients_table(
    frame: &mut Frame<'_>,
    block: Block<'_>,
    area: Rect,
    page: &Page<Patient>,
    table: &TableUi,
) {
    let order = patient_order(&page.items, table);
    let rows = order
        .iter()
        .enumerate()
        .map(|(row_idx, &idx)| {
            let patient = &page.items[idx];
            let age = patient.age.map(|age| age.to_string()).unwrap_or_else(|| "—".to_owned());
            let row = Row::new(vec![
                Cell::from(patient.full_name()),
                Cell::from(age),
                Cell::from(patient.email.clone()),
            ]);
            style_cursor_row(row, row_idx == table.cursor)
        })
        .collect::<Vec<_>>();

    let widths = [Constraint::Min(24), Constraint::Length(5), Constraint::Min(24)];
    let widget = Table::new(rows, widths)
        .header(table_header(ViewKind::Patients, table))
        .block(block.title_bottom(page_caption(page.total, table)));
    frame.render_widget(widget, area);
}

fn draw_invoices_table(
    frame: &mut Frame<'_>,
    block: Block<'_>,
    area: Rect,
    page: &Page<Invoice>,
    table: &TableUi,
) {
    let order = invoice_order(&page.items, table);
    let rows = order
        .iter()
        .enumerate()
        .map(|(row_idx, &idx)| {
            let invoice = &page.items[idx];
            let row = Row::new(vec![
                Cell::from(invoice.invoice_number.clone()),
                Cell::from(invoice.date.clone()),
                Cell::from(format_amount(invoice.amount)),
                Cell::from(invoice.status.as_str()),
            ]);
            style_cursor_row(row, row_idx == table.cursor)
        })
        .collect::<Vec<_>>();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(9),
    ];
    let widget = Table::new(rows, widths)
        .header(table_header(ViewKind::Invoices, table))
        .block(block.title_bottom(page_caption(page.total, table)));
    frame.render_widget(widget, area);
}

fn table_header(kind: ViewKind, table: &TableUi) -> Row<'static> {
    let cells = column_titles(kind)
        .iter()
        .enumerate()
        .map(|(idx, title)| {
            if idx == table.sort_column && table.query.is_empty() {
                let arrow = if table.ascending { "▲" } else { "▼" };
                Cell::from(format!("{title} {arrow}"))
            } else {
                Cell::from(*title)
            }
        })
        .collect::<Vec<_>>();
    Row::new(cells).style(Style::default().add_modifier(Modifier::BOLD))
}

fn style_cursor_row(row: Row<'_>, is_cursor: bool) -> Row<'_> {
    if is_cursor {
        row.style(Style::default().bg(Color::DarkGray))
    } else {
        row
    }
}

fn page_caption(total: u64, table: &TableUi) -> String {
    let pages = ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
    if table.query.is_empty() {
        format!(" page {}/{pages} ", table.page + 1)
    } else {
        format!(" page {}/{pages} · filter: {} ", table.page + 1, table.query)
    }
}

fn payload_hint_text(view: &View) -> Text<'static> {
    let mut lines = vec![Line::from("Loading…"), Line::from("")];
    if let Some(payload) = view.payload() {
        lines.push(Line::from(Span::styled(
            "From the opening row (may be stale):",
            Style::default().fg(DIM_COLOR),
        )));
        let rendered =
            serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
        for line in rendered.lines() {
            lines.push(Line::from(Span::styled(
                line.to_owned(),
                Style::default().fg(DIM_COLOR),
            )));
        }
    }
    Text::from(lines)
}

fn patient_detail_text(patient: &Patient) -> Text<'static> {
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "—".to_owned());
    Text::from(vec![
        Line::from(format!("Name         {}", patient.full_name())),
        Line::from(format!(
            "Age          {}",
            patient.age.map(|age| age.to_string()).unwrap_or_else(|| "—".to_owned())
        )),
        Line::from(format!("Gender       {}", optional(&patient.gender))),
        Line::from(format!("Email        {}", patient.email)),
        Line::from(format!("Phone        {}", optional(&patient.phone))),
        Line::from(format!("Birth date   {}", optional(&patient.birth_date))),
        Line::from(format!("Blood group  {}", optional(&patient.blood_group))),
    ])
}

fn invoice_detail_text(invoice: &Invoice) -> Text<'static> {
    let mut lines = vec![
        Line::from(format!("Number     {}", invoice.invoice_number)),
        Line::from(format!("Date       {}", invoice.date)),
        Line::from(format!("Amount     {}", format_amount(invoice.amount))),
        Line::from(format!("Status     {}", invoice.status)),
        Line::from(format!("Patient    #{}", invoice.patient_id)),
        Line::from(""),
        Line::from(invoice.title.clone()),
        Line::from(invoice.description.clone()),
    ];
    if !invoice.tags.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Tags: {}", invoice.tags.join(", "))));
    }
    Text::from(lines)
}

fn draw_footer(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let toast_suffix = match app.toast.as_ref() {
        Some(toast) if toast.expires_at > Instant::now() => format!(" | {}", toast.message),
        Some(_) => {
            app.toast = None;
            String::new()
        }
        None => String::new(),
    };

    if app.search_mode == SearchMode::Editing {
        let view_id = app.focused_view().id().clone();
        let query = app.table_ui(&view_id).query.clone();
        let line = Line::from(vec![
            Span::styled("/", Style::default().fg(FOOTER_KEY_COLOR)),
            Span::raw(query.clone()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(query.chars().count() as u16)
            .min(area.x.saturating_add(area.width.saturating_sub(1)));
        frame.set_cursor_position((cursor_x, area.y));
        return;
    }

    let key = |label: &'static str| Span::styled(label, Style::default().fg(FOOTER_KEY_COLOR));
    let sep = || Span::styled(" · ", Style::default().fg(DIM_COLOR));
    let line = Line::from(vec![
        key("q"),
        Span::raw(" quit"),
        sep(),
        key("[ ]"),
        Span::raw(" tabs"),
        sep(),
        key("x"),
        Span::raw(" close"),
        sep(),
        key("/"),
        Span::raw(" search"),
        sep(),
        key("s/o"),
        Span::raw(" sort"),
        sep(),
        key("r"),
        Span::raw(" role"),
        sep(),
        key("g"),
        Span::raw(" reload"),
        Span::raw(toast_suffix),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
