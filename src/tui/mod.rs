//! Ratatui-based terminal UI.
//!
//! Three tabs: "Depot Routes" and "Fuel Types" list the available charts
//! (Enter generates one on demand), "Route Query" takes free text. The KPI
//! cards for the active tab sit in the header.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

use crate::app::context::DashboardContext;
use crate::domain::{ChartKind, ChartSpec, ChartType, Kpi};
use crate::error::AppError;
use crate::query::QueryOutcome;

mod plotters_chart;

use plotters_chart::DashPlottersChart;

/// Start the TUI over an already-built context.
pub fn run(ctx: DashboardContext) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(ctx);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Routes,
    Fuel,
    Query,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Routes, Tab::Fuel, Tab::Query];

    fn title(self) -> &'static str {
        match self {
            Tab::Routes => "Depot Routes",
            Tab::Fuel => "Fuel Types",
            Tab::Query => "Route Query",
        }
    }

    fn index(self) -> usize {
        match self {
            Tab::Routes => 0,
            Tab::Fuel => 1,
            Tab::Query => 2,
        }
    }

    fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn prev(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }

    fn charts(self) -> &'static [ChartKind] {
        match self {
            Tab::Routes => &ChartKind::ROUTES,
            Tab::Fuel => &ChartKind::FUEL,
            Tab::Query => &[],
        }
    }
}

/// A chart generated on demand; `spec` is `None` when the data was empty.
struct ShownChart {
    kind: ChartKind,
    spec: Option<ChartSpec>,
}

struct App {
    ctx: DashboardContext,
    route_kpis: Vec<Kpi>,
    fuel_kpis: Vec<Kpi>,
    tab: Tab,
    selected: usize,
    shown: Option<ShownChart>,
    query_input: String,
    query_result: Option<QueryOutcome>,
    status: String,
}

impl App {
    fn new(ctx: DashboardContext) -> Self {
        let route_kpis = ctx.kpis();
        let fuel_kpis = ctx.fuel_leaders();
        let status = format!(
            "{} routes, {} fuel records",
            ctx.routes.records.len(),
            ctx.fuel.records.len()
        );
        Self {
            ctx,
            route_kpis,
            fuel_kpis,
            tab: Tab::Routes,
            selected: 0,
            shown: None,
            query_input: String::new(),
            query_result: None,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Tab => {
                self.switch_tab(self.tab.next());
                return false;
            }
            KeyCode::BackTab => {
                self.switch_tab(self.tab.prev());
                return false;
            }
            KeyCode::Esc => return true,
            _ => {}
        }

        if self.tab == Tab::Query {
            self.handle_query_key(code);
            return false;
        }

        let charts = self.tab.charts();
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected + 1 < charts.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(&kind) = charts.get(self.selected) {
                    self.show_chart(kind);
                }
            }
            _ => {}
        }

        false
    }

    fn handle_query_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                let outcome = self.ctx.query(&self.query_input);
                self.status = match &outcome {
                    QueryOutcome::Found(details) => format!("Found {}", details.route),
                    QueryOutcome::NotFound { .. } => "No match.".to_string(),
                };
                self.query_result = Some(outcome);
            }
            KeyCode::Backspace => {
                self.query_input.pop();
            }
            KeyCode::Char(c) => {
                self.query_input.push(c);
            }
            _ => {}
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.selected = 0;
        self.shown = None;
    }

    fn show_chart(&mut self, kind: ChartKind) {
        let spec = self.ctx.chart(kind);
        self.status = match &spec {
            Some(spec) => format!("{} ({} points)", spec.title, spec.series.len()),
            None => format!("No data for {}.", kind.display_name()),
        };
        self.shown = Some(ShownChart { kind, spec });
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(7),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_tabs(frame, chunks[0]);
        self.draw_kpis(frame, chunks[1]);
        match self.tab {
            Tab::Routes | Tab::Fuel => self.draw_chart_body(frame, chunks[2]),
            Tab::Query => self.draw_query(frame, chunks[2]),
        }
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .block(
                Block::default()
                    .title("Transit Analytics Dashboard")
                    .borders(Borders::ALL),
            )
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }

    fn draw_kpis(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (title, kpis) = match self.tab {
            Tab::Fuel => ("Fuel Leaders", &self.fuel_kpis),
            Tab::Routes | Tab::Query => ("Route KPIs", &self.route_kpis),
        };

        let lines: Vec<Line> = kpis
            .iter()
            .map(|kpi| {
                Line::from(vec![
                    Span::styled(format!("{}: ", kpi.label), Style::default().fg(Color::Gray)),
                    Span::styled(kpi.value.clone(), Style::default().fg(Color::Cyan)),
                ])
            })
            .collect();

        let p = Paragraph::new(Text::from(lines)).block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(26), Constraint::Min(0)])
            .split(area);

        let items: Vec<ListItem> = self
            .tab
            .charts()
            .iter()
            .map(|kind| ListItem::new(kind.display_name()))
            .collect();
        let list = List::new(items)
            .block(Block::default().title("Charts").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, chunks[0], &mut state);

        self.draw_chart(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = self
            .shown
            .as_ref()
            .and_then(|s| s.spec.as_ref())
            .map(|spec| spec.title.clone())
            .unwrap_or_else(|| "Chart".to_string());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(shown) = &self.shown else {
            let msg = Paragraph::new("Select a chart and press Enter.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let Some(spec) = &shown.spec else {
            let msg = Paragraph::new(format!("No data for {}.", shown.kind.display_name()))
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        if spec.chart_type == ChartType::Pie {
            frame.render_widget(Paragraph::new(pie_lines(spec, inner.width as usize)), inner);
        } else {
            frame.render_widget(DashPlottersChart { spec }, inner);
        }
    }

    fn draw_query(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let input = Paragraph::new(format!("{}_", self.query_input))
            .block(Block::default().title("Route Name (e.g. Route 101)").borders(Borders::ALL));
        frame.render_widget(input, chunks[0]);

        let body = match &self.query_result {
            Some(outcome) => crate::report::format_query_outcome(outcome),
            None => "Type a route name and press Enter.".to_string(),
        };
        let result = Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .block(Block::default().title("Details").borders(Borders::ALL));
        frame.render_widget(result, chunks[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.tab {
            Tab::Query => "Tab switch  type + Enter query  Esc quit",
            Tab::Routes | Tab::Fuel => "Tab switch  ↑/↓ select  Enter generate  q quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Percentage-labelled slices, one per line, with a proportional bar.
fn pie_lines(spec: &ChartSpec, width: usize) -> Text<'static> {
    let label_w = spec
        .series
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);
    let bar_w = width.saturating_sub(label_w + 10).max(5);

    let lines: Vec<Line<'static>> = spec
        .percentages()
        .into_iter()
        .map(|(label, pct)| {
            let len = ((pct / 100.0) * bar_w as f64).round() as usize;
            Line::from(vec![
                Span::raw(format!("{label:<label_w$} {pct:>5.1}% ")),
                Span::styled("█".repeat(len.min(bar_w)), Style::default().fg(Color::Cyan)),
            ])
        })
        .collect();

    Text::from(lines)
}
