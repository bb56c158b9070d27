use anyhow::Result;
use bei_dashboard::charts::compact_number;
use bei_dashboard::{
    aggregate, board_composition, format_thousands, shares_histogram, year_histogram,
    Bucket, DashboardError, Histogram, Listing, ListingRepository, Selection, Summary, TITLE,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs},
    Frame, Terminal,
};
use std::io;

const SHARES_COLOR: Color = Color::Rgb(14, 118, 168);
const YEARS_COLOR: Color = Color::Rgb(255, 99, 97);
const BOARD_COLORS: [Color; 4] = [
    Color::Rgb(8, 48, 107),
    Color::Rgb(33, 113, 181),
    Color::Rgb(107, 174, 214),
    Color::Rgb(198, 219, 239),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Listings,
    SharesDistribution,
    ListingYear,
    BoardComposition,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::Listings,
        Page::SharesDistribution,
        Page::ListingYear,
        Page::BoardComposition,
    ];

    pub fn next(&self) -> Self {
        match self {
            Page::Listings => Page::SharesDistribution,
            Page::SharesDistribution => Page::ListingYear,
            Page::ListingYear => Page::BoardComposition,
            Page::BoardComposition => Page::Listings,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Listings => Page::BoardComposition,
            Page::SharesDistribution => Page::Listings,
            Page::ListingYear => Page::SharesDistribution,
            Page::BoardComposition => Page::ListingYear,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Listings => "Listings",
            Page::SharesDistribution => "Shares Distribution",
            Page::ListingYear => "Listing Year",
            Page::BoardComposition => "Listing Board",
        }
    }

    fn index(&self) -> usize {
        Page::ALL.iter().position(|p| p == self).unwrap_or(0)
    }
}

/// Which panel receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Boards,
    Search,
}

pub struct App<'a> {
    repo: &'a ListingRepository,
    pub selection: Selection,
    pub filtered: Vec<Listing>,
    pub summary: Result<Summary, DashboardError>,
    pub shares_bins: usize,
    pub state: TableState,
    pub board_state: ListState,
    pub current_page: Page,
    pub focus: Focus,
    pub show_detail: bool,
}

impl<'a> App<'a> {
    pub fn new(repo: &'a ListingRepository, shares_bins: usize) -> Self {
        let mut board_state = ListState::default();
        if !repo.boards().is_empty() {
            board_state.select(Some(0));
        }

        let mut app = Self {
            repo,
            selection: repo.default_selection(),
            filtered: Vec::new(),
            summary: Err(DashboardError::EmptySelection),
            shares_bins,
            state: TableState::default(),
            board_state,
            current_page: Page::Listings,
            focus: Focus::Table,
            show_detail: false,
        };
        app.recompute();
        app
    }

    /// One full pass: filter, then aggregate. Run after every selection change.
    pub fn recompute(&mut self) {
        self.filtered = self.repo.filter(&self.selection);
        self.summary = aggregate(&self.filtered);

        // Reset selection to first item
        if !self.filtered.is_empty() {
            self.state.select(Some(0));
        } else {
            self.state.select(None);
        }
    }

    pub fn boards(&self) -> &[String] {
        self.repo.boards()
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_listing(&self) -> Option<&Listing> {
        self.state.selected().and_then(|i| self.filtered.get(i))
    }

    // ========================================================================
    // FILTERS
    // ========================================================================

    pub fn toggle_current_board(&mut self) {
        let board = match self.board_state.selected().and_then(|i| self.repo.boards().get(i)) {
            Some(board) => board.clone(),
            None => return,
        };
        self.selection.toggle_board(&board);
        self.recompute();
    }

    pub fn select_all_boards(&mut self) {
        self.selection.select_all_boards(self.repo.boards());
        self.recompute();
    }

    pub fn clear_boards(&mut self) {
        self.selection.clear_boards();
        self.recompute();
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut keyword = self.selection.keyword.take().unwrap_or_default();
        keyword.push(c);
        self.selection.set_keyword(&keyword);
        self.recompute();
    }

    pub fn pop_search_char(&mut self) {
        let mut keyword = self.selection.keyword.take().unwrap_or_default();
        keyword.pop();
        if !keyword.is_empty() {
            self.selection.set_keyword(&keyword);
        }
        self.recompute();
    }

    /// Back to every board and no keyword
    pub fn clear_filters(&mut self) {
        self.selection = self.repo.default_selection();
        self.recompute();
    }

    // ========================================================================
    // NAVIGATION
    // ========================================================================

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn next_board(&mut self) {
        let len = self.repo.boards().len();
        if len == 0 {
            return;
        }
        let i = match self.board_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.board_state.select(Some(i));
    }

    pub fn previous_board(&mut self) {
        let len = self.repo.boards().len();
        if len == 0 {
            return;
        }
        let i = match self.board_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.board_state.select(Some(i));
    }

    pub fn next(&mut self) {
        let len = self.filtered.len();
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
        let len = self.filtered.len();
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

    pub fn page_down(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + 20).min(len - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        let i = self.state.selected().map(|i| i.saturating_sub(20)).unwrap_or(0);
        self.state.select(Some(i));
    }

    /// Apply a key press. Returns false when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }

        match self.focus {
            Focus::Search => match key.code {
                KeyCode::Enter | KeyCode::Esc => self.focus = Focus::Table,
                KeyCode::Backspace => self.pop_search_char(),
                KeyCode::Char(c) => self.push_search_char(c),
                _ => {}
            },
            Focus::Boards => match key.code {
                KeyCode::Char('q') => return false,
                KeyCode::Esc | KeyCode::Char('b') | KeyCode::Right => self.focus = Focus::Table,
                KeyCode::Down | KeyCode::Char('j') => self.next_board(),
                KeyCode::Up | KeyCode::Char('k') => self.previous_board(),
                KeyCode::Char(' ') | KeyCode::Enter => self.toggle_current_board(),
                KeyCode::Char('a') => self.select_all_boards(),
                KeyCode::Char('n') => self.clear_boards(),
                KeyCode::Char('/') => self.focus = Focus::Search,
                KeyCode::Tab => self.next_page(),
                KeyCode::BackTab => self.previous_page(),
                _ => {}
            },
            Focus::Table => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return false,
                KeyCode::Enter => self.toggle_detail(),
                KeyCode::BackTab => self.previous_page(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        self.previous_page();
                    } else {
                        self.next_page();
                    }
                }
                KeyCode::Char('/') => self.focus = Focus::Search,
                KeyCode::Char('b') | KeyCode::Left => self.focus = Focus::Boards,
                KeyCode::Char('c') => self.clear_filters(),
                KeyCode::Down | KeyCode::Char('j') => self.next(),
                KeyCode::Up | KeyCode::Char('k') => self.previous(),
                KeyCode::PageDown => self.page_down(),
                KeyCode::PageUp => self.page_up(),
                KeyCode::Home => {
                    if !self.filtered.is_empty() {
                        self.state.select(Some(0));
                    }
                }
                KeyCode::End => {
                    if !self.filtered.is_empty() {
                        self.state.select(Some(self.filtered.len() - 1));
                    }
                }
                _ => {}
            },
        }

        true
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
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

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && !app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title + metrics
            Constraint::Length(3), // Page tabs
            Constraint::Min(0),    // Sidebar + content
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_tabs(f, chunks[1], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(0)])
        .split(chunks[2]);

    render_sidebar(f, body[0], app);

    match app.current_page {
        Page::Listings if app.show_detail => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(60), // Listings table
                    Constraint::Percentage(40), // Detail panel
                ])
                .split(body[1]);

            render_table(f, content_chunks[0], app);
            render_detail_panel(f, content_chunks[1], app);
        }
        Page::Listings => render_table(f, body[1], app),
        Page::SharesDistribution => {
            let histogram = shares_histogram(&app.filtered, app.shares_bins);
            render_histogram(
                f,
                body[1],
                " Shares Outstanding Distribution ",
                &histogram,
                |b| compact_number(b.start),
                SHARES_COLOR,
            );
        }
        Page::ListingYear => {
            let histogram = year_histogram(&app.filtered);
            render_histogram(
                f,
                body[1],
                " Issuers per Listing Year ",
                &histogram,
                |b| format!("{}", b.start as i32),
                YEARS_COLOR,
            );
        }
        Page::BoardComposition => render_board_composition(f, body[1], app),
    }

    render_status_bar(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let metrics = match &app.summary {
        Ok(summary) => Line::from(vec![
            Span::styled("Total Issuers: ", label),
            Span::styled(summary.formatted_count(), value),
            Span::raw("   │   "),
            Span::styled("Most Shares: ", label),
            Span::styled(summary.top_by_shares.clone(), value),
            Span::raw("   │   "),
            Span::styled("Earliest Listing Year: ", label),
            Span::styled(summary.earliest_year.to_string(), value),
        ]),
        Err(e) => Line::from(Span::styled(
            format!("No data: {}", e),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        )),
    };

    let header_text = vec![
        Line::from(Span::styled(
            TITLE,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        metrics,
    ];

    let header = Paragraph::new(header_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_tabs(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<&str> = Page::ALL.iter().map(|p| p.title()).collect();

    let tabs = Tabs::new(titles)
        .select(app.current_page.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(" │ ")
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::White)));

    f.render_widget(tabs, area);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_sidebar(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let items: Vec<ListItem> = app
        .boards()
        .iter()
        .map(|board| {
            let (mark, style) = if app.selection.is_board_selected(board) {
                ("[x] ", Style::default().fg(Color::Green))
            } else {
                ("[ ] ", Style::default().fg(Color::DarkGray))
            };
            ListItem::new(Line::from(vec![Span::styled(mark, style), Span::raw(board.clone())]))
        })
        .collect();

    let highlight = if app.focus == Focus::Boards {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(app.focus == Focus::Boards))
                .title(" Listing Board "),
        )
        .highlight_style(highlight);

    f.render_stateful_widget(list, chunks[0], &mut app.board_state);

    let keyword = app.selection.keyword().unwrap_or("");
    let search_text = if app.focus == Focus::Search {
        Line::from(vec![
            Span::raw(keyword.to_string()),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
        ])
    } else if keyword.is_empty() {
        Line::from(Span::styled(
            "press / to search",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(keyword.to_string())
    };

    let search = Paragraph::new(search_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(app.focus == Focus::Search))
            .title(" Name or Code "),
    );

    f.render_widget(search, chunks[1]);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Code", "Name", "Board", "Shares", "Listed", "Year"]
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

    let rows = app.filtered.iter().map(|listing| {
        let cells = vec![
            Cell::from(listing.code().to_string()).style(Style::default().fg(Color::Cyan)),
            Cell::from(truncate(listing.name(), 40)),
            Cell::from(listing.listing_board().to_string()),
            Cell::from(format_thousands(listing.shares())),
            Cell::from(listing.listing_date().format("%Y-%m-%d").to_string()),
            Cell::from(listing.year_of_listing().to_string()),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Min(20),
            Constraint::Length(14),
            Constraint::Length(19),
            Constraint::Length(12),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" Filtered Listings ({}) ", format_thousands(app.filtered.len() as u64))),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_no_data(f: &mut Frame, area: Rect, title: &str) {
    let paragraph = Paragraph::new("No listings match the current filters")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));

    f.render_widget(paragraph, area);
}

fn render_histogram<L>(f: &mut Frame, area: Rect, title: &str, histogram: &Histogram, label: L, color: Color)
where
    L: Fn(&Bucket) -> String,
{
    if histogram.is_empty() {
        render_no_data(f, area, title);
        return;
    }

    let labels: Vec<String> = histogram.buckets.iter().map(&label).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(&histogram.buckets)
        .map(|(l, b)| (l.as_str(), b.count as u64))
        .collect();

    let bars = data.len().max(1) as u16;
    let per_bar = area.width.saturating_sub(2) / bars;
    let bar_gap = if per_bar >= 3 { 1 } else { 0 };
    let bar_width = per_bar.saturating_sub(bar_gap).max(1);

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title.to_string()),
        )
        .data(data.as_slice())
        .max(histogram.max_count().max(1) as u64)
        .bar_width(bar_width)
        .bar_gap(bar_gap)
        .bar_style(Style::default().fg(color))
        .value_style(Style::default().fg(Color::Black).bg(color))
        .label_style(Style::default().fg(Color::Gray));

    f.render_widget(chart, area);
}

fn render_board_composition(f: &mut Frame, area: Rect, app: &App) {
    let composition = board_composition(&app.filtered);
    if composition.is_empty() {
        render_no_data(f, area, " Listing Board Composition ");
        return;
    }

    let header_cells = ["Board", "Issuers", "Share", ""]
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

    let rows = composition.iter().enumerate().map(|(i, slice)| {
        let color = BOARD_COLORS[i % BOARD_COLORS.len()];
        let bar = "█".repeat((slice.percent / 100.0 * 40.0).round() as usize);

        let cells = vec![
            Cell::from(slice.board.clone()),
            Cell::from(format_thousands(slice.count as u64)),
            Cell::from(format!("{:.1}%", slice.percent)),
            Cell::from(bar).style(Style::default().fg(color)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Listing Board Composition "),
    );

    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.filtered.len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    let hints: &[(&str, &str)] = match app.focus {
        Focus::Search => &[("Type", " Search | "), ("Enter/Esc", " Done | "), ("Bksp", " Delete")],
        Focus::Boards => &[
            ("Space", " Toggle | "),
            ("a", " All | "),
            ("n", " None | "),
            ("Esc", " Back | "),
            ("q", " Quit"),
        ],
        Focus::Table => &[
            ("b", " Boards | "),
            ("/", " Search | "),
            ("c", " Clear | "),
            ("Enter", " Details | "),
            ("Tab", " Page | "),
            ("q", " Quit"),
        ],
    };

    status_spans.push(Span::raw(" | "));
    for (key, text) in hints {
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(*text));
    }
    status_spans.push(Span::styled(
        "   Data: Bursa Efek Indonesia",
        Style::default().fg(Color::DarkGray),
    ));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let listing = match app.selected_listing() {
        Some(l) => l,
        None => {
            let no_selection = Paragraph::new("No listing selected").block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Listing Details "),
            );
            f.render_widget(no_selection, area);
            return;
        }
    };

    let field = |name: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {}: ", name), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(value),
        ])
    };

    let content = vec![
        Line::from(""),
        field("Code", listing.code().to_string()),
        Line::from(""),
        field("Name", listing.name().to_string()),
        Line::from(""),
        field("Listing Board", listing.listing_board().to_string()),
        Line::from(""),
        field("Shares", format_thousands(listing.shares())),
        Line::from(""),
        field("Listing Date", listing.listing_date().format("%d %B %Y").to_string()),
        Line::from(""),
        field("Year of Listing", listing.year_of_listing().to_string()),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Press Enter to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]),
    ];

    let detail_panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Listing Details "),
    );

    f.render_widget(detail_panel, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
