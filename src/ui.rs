use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use finance_tracker::{
    breakdown_by_category, daily_trend, format_money, kind_summary, totals_by_kind, write_csv,
    Category, Ledger, TransactionForm, TransactionKind,
};
use finance_tracker::form::DATE_FORMAT;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Clear, Dataset, GraphType,
        Paragraph, Row, Table, TableState,
    },
    Frame, Terminal,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Overview,
    Transactions,
    Trends,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Overview => Page::Transactions,
            Page::Transactions => Page::Trends,
            Page::Trends => Page::Overview,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Overview => Page::Trends,
            Page::Transactions => Page::Overview,
            Page::Trends => Page::Transactions,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Overview => "Overview",
            Page::Transactions => "Transactions",
            Page::Trends => "Trends",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    AddingTransaction,
    ConfirmClear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Kind,
    Category,
    Amount,
    Description,
    Date,
}

impl FormField {
    const ORDER: [FormField; 5] = [
        FormField::Kind,
        FormField::Category,
        FormField::Amount,
        FormField::Description,
        FormField::Date,
    ];

    fn index(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    fn next(&self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn previous(&self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn label(&self) -> &'static str {
        match self {
            FormField::Kind => "Type",
            FormField::Category => "Category",
            FormField::Amount => "Amount ($)",
            FormField::Description => "Description (optional)",
            FormField::Date => "Date (YYYY-MM-DD)",
        }
    }
}

/// Add-Transaction form state; kind, category and date survive between openings
#[derive(Debug, Clone)]
pub struct FormState {
    pub kind: TransactionKind,
    pub category_idx: usize,
    pub amount: String,
    pub description: String,
    pub date: String,
    pub field: FormField,
}

impl FormState {
    fn new(today: NaiveDate) -> Self {
        Self {
            kind: TransactionKind::Income,
            category_idx: 0,
            amount: String::new(),
            description: String::new(),
            date: today.format(DATE_FORMAT).to_string(),
            field: FormField::Kind,
        }
    }

    pub fn category(&self) -> Category {
        let categories = self.kind.categories();
        categories[self.category_idx % categories.len()]
    }

    fn cycle_category(&mut self, forward: bool) {
        let len = self.kind.categories().len();
        self.category_idx = if forward {
            (self.category_idx + 1) % len
        } else {
            (self.category_idx + len - 1) % len
        };
    }

    fn toggle_kind(&mut self) {
        self.kind = self.kind.toggle();
        self.category_idx = 0;
    }

    fn text_field(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Amount => Some(&mut self.amount),
            FormField::Description => Some(&mut self.description),
            FormField::Date => Some(&mut self.date),
            FormField::Kind | FormField::Category => None,
        }
    }

    fn to_form(&self) -> TransactionForm {
        TransactionForm {
            kind: self.kind.as_str().to_string(),
            category: self.category().as_str().to_string(),
            amount: self.amount.clone(),
            description: self.description.clone(),
            date: self.date.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

pub struct App {
    pub ledger: Ledger,
    pub state: TableState,
    pub current_page: Page,
    pub input_mode: InputMode,
    pub form: FormState,
    pub status: Option<StatusMessage>,
    pub export_path: PathBuf,
    today: NaiveDate,
}

impl App {
    pub fn new(ledger: Ledger, export_path: PathBuf) -> Self {
        Self::with_today(ledger, export_path, Local::now().date_naive())
    }

    pub fn with_today(ledger: Ledger, export_path: PathBuf, today: NaiveDate) -> Self {
        let mut state = TableState::default();
        if !ledger.is_empty() {
            state.select(Some(0));
        }

        Self {
            ledger,
            state,
            current_page: Page::Overview,
            input_mode: InputMode::Normal,
            form: FormState::new(today),
            status: None,
            export_path,
            today,
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn open_form(&mut self) {
        self.input_mode = InputMode::AddingTransaction;
        self.form.field = FormField::Kind;
        self.status = None;
    }

    /// Validate the form and append to the ledger. The form stays open
    /// on error so the user can fix the field.
    pub fn submit_form(&mut self) {
        match self.form.to_form().to_transaction(self.today) {
            Ok(tx) => {
                self.ledger.add(tx);
                self.form.amount.clear();
                self.form.description.clear();
                self.input_mode = InputMode::Normal;
                self.state.select(Some(0));
                self.status = Some(StatusMessage::Info("Transaction added!".to_string()));
            }
            Err(e) => {
                warn!("rejected transaction form: {}", e);
                self.status = Some(StatusMessage::Error(e.to_string()));
            }
        }
    }

    pub fn clear_data(&mut self) {
        self.ledger.clear();
        self.state.select(None);
        self.input_mode = InputMode::Normal;
        self.status = Some(StatusMessage::Info("All data cleared".to_string()));
    }

    /// Write the ledger to `export_path` as CSV
    pub fn export(&mut self) {
        let result = File::create(&self.export_path)
            .with_context(|| format!("Failed to create {}", self.export_path.display()))
            .and_then(|file| write_csv(file, self.ledger.all()).context("Failed to write CSV"));

        self.status = Some(match result {
            Ok(()) => {
                info!(path = %self.export_path.display(), "ledger exported");
                StatusMessage::Info(format!(
                    "Exported {} transactions to {}",
                    self.ledger.len(),
                    self.export_path.display()
                ))
            }
            Err(e) => {
                warn!("export failed: {:#}", e);
                StatusMessage::Error(format!("{:#}", e))
            }
        });
    }

    pub fn next(&mut self) {
        let len = self.ledger.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.ledger.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Returns true when the app should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.input_mode {
            InputMode::AddingTransaction => {
                self.handle_form_key(key);
                false
            }
            InputMode::ConfirmClear => {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => self.clear_data(),
                    _ => {
                        self.input_mode = InputMode::Normal;
                        self.status = None;
                    }
                }
                false
            }
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('a') => self.open_form(),
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('x') if !self.ledger.is_empty() => {
                self.input_mode = InputMode::ConfirmClear;
                self.status = Some(StatusMessage::Error(
                    "Clear all data? Press y to confirm".to_string(),
                ));
            }
            KeyCode::Tab => self.next_page(),
            KeyCode::BackTab => self.previous_page(),
            KeyCode::Char('1') => self.current_page = Page::Overview,
            KeyCode::Char('2') => self.current_page = Page::Transactions,
            KeyCode::Char('3') => self.current_page = Page::Trends,
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.status = None;
            }
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => self.form.field = self.form.field.next(),
            KeyCode::BackTab | KeyCode::Up => self.form.field = self.form.field.previous(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                if self.form.field == FormField::Kind =>
            {
                self.form.toggle_kind()
            }
            KeyCode::Left if self.form.field == FormField::Category => {
                self.form.cycle_category(false)
            }
            KeyCode::Right | KeyCode::Char(' ') if self.form.field == FormField::Category => {
                self.form.cycle_category(true)
            }
            KeyCode::Backspace => {
                if let Some(text) = self.form.text_field() {
                    text.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(text) = self.form.text_field() {
                    text.push(c);
                }
            }
            _ => {}
        }
    }
}

/// Leave raw mode before the default hook prints, so a panic message is
/// readable and the shell is usable afterwards.
fn install_panic_restore() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        previous(info);
    }));
}

pub fn run_ui(app: &mut App) -> Result<()> {
    install_panic_restore();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("Dashboard event loop failed")
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Length(3), // Metrics
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_metrics(f, chunks[1], app);

    if app.ledger.is_empty() {
        render_empty(f, chunks[2]);
    } else {
        match app.current_page {
            Page::Overview => render_overview(f, chunks[2], app),
            Page::Transactions => render_table(f, chunks[2], app),
            Page::Trends => render_trends(f, chunks[2], app),
        }
    }

    render_status_bar(f, chunks[3], app);

    if app.input_mode == InputMode::AddingTransaction {
        render_form(f, app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Overview, Page::Transactions, Page::Trends];

    let mut tab_spans = vec![Span::styled(
        "💰 Personal Finance Tracker  ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(format!("{} {}", i + 1, page.title()), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Total: {}", app.ledger.len()),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(Line::from(tab_spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_metrics(f: &mut Frame, area: Rect, app: &App) {
    let totals = totals_by_kind(app.ledger.all());
    let balance_color = if totals.balance < Decimal::ZERO {
        Color::Red
    } else {
        Color::Green
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let metrics = [
        ("Total Income", format_money(totals.income), Color::Green),
        ("Total Expenses", format_money(totals.expense), Color::Red),
        ("Balance", format_money(totals.balance), balance_color),
    ];

    for ((title, value, color), col) in metrics.into_iter().zip(cols.iter()) {
        let widget = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", title)));
        f.render_widget(widget, *col);
    }
}

fn render_empty(f: &mut Frame, area: Rect) {
    let content = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  👉 Add your first transaction with "),
            Span::styled("a", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("!"),
        ]),
    ];

    let widget = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );
    f.render_widget(widget, area);
}

/// Whole-unit bar height; bars carry the exact amount as their text
fn bar_value(amount: Decimal) -> u64 {
    amount.round().to_u64().unwrap_or(u64::MAX)
}

fn render_overview(f: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    // Expense breakdown
    let breakdown = breakdown_by_category(app.ledger.all(), TransactionKind::Expense);
    let expense_total: Decimal = breakdown.values().copied().sum();
    if breakdown.is_empty() {
        let widget = Paragraph::new("  No expenses yet").block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Expense Breakdown by Category "),
        );
        f.render_widget(widget, cols[0]);
    } else {
        let bars: Vec<Bar> = breakdown
            .iter()
            .map(|(category, amount)| {
                let share = (*amount * Decimal::from(100) / expense_total).round_dp(1);
                Bar::default()
                    .label(Line::from(category.as_str()))
                    .value(bar_value(*amount))
                    .text_value(format!("{}%", share))
                    .style(Style::default().fg(Color::Magenta))
            })
            .collect();

        let chart = BarChart::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Expense Breakdown by Category "),
            )
            .data(BarGroup::default().bars(&bars))
            .bar_width(9)
            .bar_gap(2)
            .value_style(Style::default().fg(Color::Black).bg(Color::Magenta));
        f.render_widget(chart, cols[0]);
    }

    // Income vs Expense
    let bars: Vec<Bar> = kind_summary(app.ledger.all())
        .into_iter()
        .map(|(kind, amount)| {
            let color = kind_color(kind);
            Bar::default()
                .label(Line::from(kind.as_str()))
                .value(bar_value(amount))
                .text_value(format_money(amount))
                .style(Style::default().fg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(" Income vs Expenses "))
        .data(BarGroup::default().bars(&bars))
        .bar_width(12)
        .bar_gap(3)
        .value_style(Style::default().fg(Color::Black).add_modifier(Modifier::BOLD));
    f.render_widget(chart, cols[1]);
}

fn kind_color(kind: TransactionKind) -> Color {
    match kind {
        TransactionKind::Income => Color::Green,
        TransactionKind::Expense => Color::Red,
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Date", "Type", "Category", "Amount", "Description"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows: Vec<Row> = app
        .ledger
        .history()
        .into_iter()
        .map(|tx| {
            let color = kind_color(tx.kind());

            let cells = vec![
                Cell::from(tx.date().format(DATE_FORMAT).to_string()),
                Cell::from(tx.kind().as_str()).style(Style::default().fg(color)),
                Cell::from(tx.category().as_str()),
                Cell::from(format_money(tx.signed_amount())).style(Style::default().fg(color)),
                Cell::from(truncate(tx.description().unwrap_or(""), 40)),
            ];

            Row::new(cells).height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(15),
            Constraint::Length(16),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Transaction History "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_trends(f: &mut Frame, area: Rect, app: &App) {
    let trend = daily_trend(app.ledger.all());
    let (Some(first), Some(last)) = (trend.first(), trend.last()) else {
        return;
    };
    let (first_date, last_date) = (first.date, last.date);

    let mut income: Vec<(f64, f64)> = Vec::new();
    let mut expense: Vec<(f64, f64)> = Vec::new();
    let mut max_y: f64 = 0.0;

    for point in &trend {
        let x = (point.date - first_date).num_days() as f64;
        let y = point.amount.to_f64().unwrap_or(0.0);
        max_y = max_y.max(y);
        match point.kind {
            TransactionKind::Income => income.push((x, y)),
            TransactionKind::Expense => expense.push((x, y)),
        }
    }

    let max_x = ((last_date - first_date).num_days() as f64).max(1.0);
    let max_y = if max_y > 0.0 { max_y * 1.1 } else { 1.0 };

    let datasets = vec![
        Dataset::default()
            .name("Income")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&income),
        Dataset::default()
            .name("Expense")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&expense),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Daily Transaction Trends "),
        )
        .x_axis(
            Axis::default()
                .title("Date")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max_x])
                .labels(vec![
                    Span::raw(first_date.format(DATE_FORMAT).to_string()),
                    Span::raw(last_date.format(DATE_FORMAT).to_string()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Amount")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max_y])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{:.0}", max_y / 2.0)),
                    Span::raw(format!("{:.0}", max_y)),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_form(f: &mut Frame, app: &App) {
    let area = centered_rect(50, 50, f.size());
    f.render_widget(Clear, area);

    let form = &app.form;
    let mut lines = vec![Line::from("")];

    for field in FormField::ORDER {
        let value = match field {
            FormField::Kind => format!("◀ {} ▶", form.kind),
            FormField::Category => format!("◀ {} ▶", form.category()),
            FormField::Amount => form.amount.clone(),
            FormField::Description => form.description.clone(),
            FormField::Date => form.date.clone(),
        };

        let selected = field == form.field;
        let marker = if selected { "→ " } else { "  " };
        let value_style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Green)),
            Span::styled(format!("{:<24}", field.label()), Style::default().fg(Color::Cyan)),
            Span::styled(value, value_style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Add | "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Field | "),
        Span::styled("←/→", Style::default().fg(Color::Yellow)),
        Span::raw(" Choose | "),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]));

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Add Transaction "),
    );
    f.render_widget(widget, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    match &app.status {
        Some(StatusMessage::Info(msg)) => {
            status_spans.push(Span::styled(format!(" ✓ {} ", msg), Style::default().fg(Color::Green)));
            status_spans.push(Span::raw(" | "));
        }
        Some(StatusMessage::Error(msg)) => {
            status_spans.push(Span::styled(format!(" ✗ {} ", msg), Style::default().fg(Color::Red)));
            status_spans.push(Span::raw(" | "));
        }
        None => {}
    }

    status_spans.push(Span::styled("a", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Add | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("e", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Export CSV | "));
    status_spans.push(Span::styled("x", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Clear | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
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
        .split(vertical[1])[1]
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finance_tracker::read_csv;

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn test_app(export_path: PathBuf) -> App {
        App::with_today(
            Ledger::new(),
            export_path,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        )
    }

    /// Open the form, pick kind/category, enter amount, submit
    fn add_expense_food(app: &mut App, amount: &str) {
        press(app, KeyCode::Char('a'));
        press(app, KeyCode::Right); // Income → Expense
        press(app, KeyCode::Tab); // Category: Food is first
        press(app, KeyCode::Tab);
        type_text(app, amount);
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_form_defaults_to_today() {
        let app = test_app(PathBuf::from("unused.csv"));
        assert_eq!(app.form.date, "2024-01-02");
        assert_eq!(app.form.kind, TransactionKind::Income);
        assert_eq!(app.form.category(), Category::Salary);
    }

    #[test]
    fn test_add_transaction_through_form() {
        let mut app = test_app(PathBuf::from("unused.csv"));
        add_expense_food(&mut app, "12.5");

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.ledger.len(), 1);
        let tx = &app.ledger.all()[0];
        assert_eq!(tx.kind(), TransactionKind::Expense);
        assert_eq!(tx.category(), Category::Food);
        assert_eq!(tx.amount(), Decimal::new(125, 1));
        assert!(matches!(app.status, Some(StatusMessage::Info(_))));
        assert!(app.form.amount.is_empty());
    }

    #[test]
    fn test_invalid_amount_keeps_form_open() {
        let mut app = test_app(PathBuf::from("unused.csv"));
        add_expense_food(&mut app, "0");

        assert_eq!(app.input_mode, InputMode::AddingTransaction);
        assert!(app.ledger.is_empty());
        assert!(matches!(app.status, Some(StatusMessage::Error(_))));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_toggle_kind_resets_category() {
        let mut app = test_app(PathBuf::from("unused.csv"));
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.category(), Category::Freelance);

        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.form.kind, TransactionKind::Expense);
        assert_eq!(app.form.category(), Category::Food);
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let mut app = test_app(PathBuf::from("unused.csv"));
        add_expense_food(&mut app, "3");

        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.ledger.len(), 1);

        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.ledger.is_empty());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_export_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.csv");
        let mut app = test_app(path.clone());
        add_expense_food(&mut app, "40");

        press(&mut app, KeyCode::Char('e'));
        assert!(matches!(app.status, Some(StatusMessage::Info(_))));

        let parsed = read_csv(File::open(&path).unwrap()).unwrap();
        assert_eq!(parsed.as_slice(), app.ledger.all());
    }

    #[test]
    fn test_page_navigation_and_quit() {
        let mut app = test_app(PathBuf::from("unused.csv"));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_page, Page::Transactions);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.current_page, Page::Trends);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer description", 10), "a much ...");
    }
}
