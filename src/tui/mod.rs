//! Ratatui-based terminal UI.
//!
//! One tab per category. The left pane lists a status card per indicator, the
//! right pane charts the selected indicator (or its whole scale group) over the
//! last three years. `r` reloads everything from the source; the reload runs on
//! the UI thread and the screen is frozen until it completes.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use plotters::style::RGBColor;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Terminal,
};
use tracing::info;

use crate::analysis::{scale_groups, status_cards, StatusKind};
use crate::app::pipeline::{self, Dataset};
use crate::data::{CategoryTable, SeriesSource};
use crate::domain::{Catalog, Category, Month};
use crate::error::AppError;
use crate::report::{fmt_change, fmt_value};

mod plotters_chart;

use plotters_chart::{ChartLine, SeriesPlottersChart};

/// Months shown in the chart pane.
const CHART_WINDOW_MONTHS: i32 = 36;

const PALETTE: [RGBColor; 6] = [
    RGBColor(0, 255, 255),
    RGBColor(255, 215, 0),
    RGBColor(255, 0, 255),
    RGBColor(0, 255, 0),
    RGBColor(255, 128, 0),
    RGBColor(135, 206, 250),
];

/// Start the TUI.
pub fn run(
    catalog: Catalog,
    source: impl SeriesSource + 'static,
    end_date: NaiveDate,
) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(catalog, Box::new(source), end_date);
    // Show something while the first reload blocks.
    terminal
        .draw(|f| app.draw(f))
        .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
    app.reload();
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
enum ChartMode {
    /// Only the selected indicator.
    Series,
    /// Every indicator sharing the selected one's order of magnitude.
    ScaleGroup,
}

struct App {
    catalog: Catalog,
    source: Box<dyn SeriesSource>,
    end_date: NaiveDate,
    dataset: Option<Dataset>,
    category: Category,
    selected: usize,
    chart_mode: ChartMode,
    status: String,
}

impl App {
    fn new(catalog: Catalog, source: Box<dyn SeriesSource>, end_date: NaiveDate) -> Self {
        Self {
            catalog,
            source,
            end_date,
            dataset: None,
            category: Category::ALL[0],
            selected: 0,
            chart_mode: ChartMode::Series,
            status: "Fetching FRED data...".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
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

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Left => {
                self.category = self.category.prev();
                self.selected = 0;
            }
            KeyCode::Right | KeyCode::Tab => {
                self.category = self.category.next();
                self.selected = 0;
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected + 1 < self.card_count() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('g') => {
                self.chart_mode = match self.chart_mode {
                    ChartMode::Series => ChartMode::ScaleGroup,
                    ChartMode::ScaleGroup => ChartMode::Series,
                };
            }
            KeyCode::Char('e') => self.export_current(),
            _ => {}
        }
        false
    }

    /// Replace the dataset with a fresh reload (blocking).
    fn reload(&mut self) {
        let dataset = pipeline::reload(self.source.as_ref(), &self.catalog, self.end_date);
        self.status = format!(
            "Loaded {} series ({} unavailable) as of {}",
            dataset.series_count(),
            dataset.failures.len(),
            dataset.as_of
        );
        self.dataset = Some(dataset);
        self.selected = self.selected.min(self.card_count().saturating_sub(1));
    }

    fn export_current(&mut self) {
        let Some(table) = self.current_table().filter(|t| !t.is_empty()) else {
            self.status = "No data to export.".to_string();
            return;
        };
        let path = PathBuf::from(format!("{}.csv", table.category().file_stem()));
        self.status = match crate::io::write_table_csv(&path, table) {
            Ok(()) => {
                info!(path = %path.display(), "exported category table");
                format!("Wrote {}", path.display())
            }
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn current_table(&self) -> Option<&CategoryTable> {
        self.dataset.as_ref()?.table(self.category)
    }

    fn card_count(&self) -> usize {
        self.current_table()
            .map(|t| status_cards(t, &self.catalog).len())
            .unwrap_or(0)
    }

    /// Identifier of the highlighted status card.
    fn selected_id(&self) -> Option<String> {
        let table = self.current_table()?;
        status_cards(table, &self.catalog)
            .get(self.selected)
            .map(|card| card.descriptor.id.clone())
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_tabs(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<&str> = Category::ALL.iter().map(|c| c.display_name()).collect();
        let selected = Category::ALL.iter().position(|c| *c == self.category).unwrap_or(0);
        let as_of = self
            .dataset
            .as_ref()
            .map(|d| d.as_of.to_string())
            .unwrap_or_else(|| "-".to_string());

        let tabs = Tabs::new(titles)
            .select(selected)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .block(
                Block::default()
                    .title(format!("pulse | as of {as_of}"))
                    .borders(Borders::ALL),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(4)])
            .split(chunks[0]);

        self.draw_cards(frame, left[0]);
        draw_legend(frame, left[1]);
        self.draw_chart(frame, chunks[1]);
    }

    fn draw_cards(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Status").borders(Borders::ALL);

        let Some(table) = self.current_table().filter(|t| !t.is_empty()) else {
            let msg = if self.dataset.is_some() {
                "No data for category."
            } else {
                "Waiting for data..."
            };
            let p = Paragraph::new(msg).style(Style::default().fg(Color::Yellow)).block(block);
            frame.render_widget(p, area);
            return;
        };

        let items: Vec<ListItem> = status_cards(table, &self.catalog)
            .into_iter()
            .map(|card| {
                let latest = card
                    .latest
                    .map(|(m, v)| format!("{} ({m})", fmt_value(v)))
                    .unwrap_or_else(|| "-".to_string());
                let header = Line::from(vec![
                    Span::styled(
                        card.descriptor.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]);
                let detail = Line::from(vec![
                    Span::raw(format!("  {latest}  ")),
                    Span::raw(fmt_change(card.status.latest_change, card.descriptor)),
                    Span::raw("  "),
                    Span::styled(
                        card.status.kind.label(),
                        Style::default().fg(status_color(card.status.kind)),
                    ),
                ]);
                ListItem::new(Text::from(vec![header, detail]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = match self.chart_mode {
            ChartMode::Series => "Chart (series)",
            ChartMode::ScaleGroup => "Chart (scale group)",
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let (Some(table), Some(id)) = (self.current_table(), self.selected_id()) else {
            return;
        };

        let ids = match self.chart_mode {
            ChartMode::Series => vec![id],
            ChartMode::ScaleGroup => scale_groups(table)
                .into_values()
                .find(|group| group.contains(&id))
                .unwrap_or_else(|| vec![id]),
        };

        let Some((lines, x_bounds, y_bounds)) = chart_lines(table, &self.catalog, &ids) else {
            return;
        };

        let legend_height = lines.len().min(4) as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(legend_height)])
            .split(inner);

        let widget = SeriesPlottersChart {
            lines: &lines,
            x_bounds,
            y_bounds,
            y_label: "value".to_string(),
            fmt_x: fmt_axis_month,
            fmt_y: fmt_axis_value,
        };
        frame.render_widget(widget, chunks[0]);

        let legend: Vec<Line> = lines
            .iter()
            .map(|l| {
                let RGBColor(r, g, b) = l.color;
                let style = Style::default().fg(Color::Rgb(r, g, b));
                Line::from(Span::styled(format!("■ {}", l.label), style))
            })
            .collect();
        frame.render_widget(Paragraph::new(Text::from(legend)), chunks[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ category  ↑/↓ select  g group  r reload  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_legend(frame: &mut ratatui::Frame<'_>, area: Rect) {
    let p = Paragraph::new(legend_line())
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Legend").borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn legend_line() -> Line<'static> {
    let mut spans = Vec::new();
    for kind in StatusKind::ALL {
        spans.push(Span::styled("■ ", Style::default().fg(status_color(kind))));
        spans.push(Span::raw(format!("{}  ", kind.label())));
    }
    Line::from(spans)
}

fn status_color(kind: StatusKind) -> Color {
    match kind {
        StatusKind::AllClear => Color::Green,
        StatusKind::WatchCloselyImproving => Color::LightGreen,
        StatusKind::WatchCloselyNeutral => Color::Yellow,
        StatusKind::PotentialDanger => Color::Rgb(255, 165, 0),
        StatusKind::Danger => Color::Red,
        StatusKind::InsufficientData => Color::Gray,
    }
}

/// Chart series for `ids` over the table's last `CHART_WINDOW_MONTHS` months.
///
/// Returns `None` when none of the ids has points in the window.
fn chart_lines(
    table: &CategoryTable,
    catalog: &Catalog,
    ids: &[String],
) -> Option<(Vec<ChartLine>, [f64; 2], [f64; 2])> {
    let last = table.last_month()?;
    let from = Month::from_ordinal(last.ordinal() - (CHART_WINDOW_MONTHS - 1));

    let lines: Vec<ChartLine> = ids
        .iter()
        .filter_map(|id| table.series(id).map(|s| (id, s)))
        .map(|(id, series)| (id, series.since(from)))
        .filter(|(_, points)| !points.is_empty())
        .enumerate()
        .map(|(i, (id, points))| ChartLine {
            label: catalog.display_name(table.category(), id).to_string(),
            points: points.iter().map(|(m, v)| (m.ordinal() as f64, *v)).collect(),
            color: PALETTE[i % PALETTE.len()],
        })
        .collect();

    if lines.is_empty() {
        return None;
    }

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in lines.iter().flat_map(|l| l.points.iter()) {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if x_max <= x_min {
        x_max = x_min + 1.0;
    }
    if y_max <= y_min {
        y_min -= 1.0;
        y_max += 1.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

    Some((lines, [x_min, x_max], [y_min - pad, y_max + pad]))
}

fn fmt_axis_month(v: f64) -> String {
    Month::from_ordinal(v.round() as i32).to_string()
}

fn fmt_axis_value(v: f64) -> String {
    if v.abs() >= 1_000.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::align;
    use crate::domain::{ObservationSeries, UnitMode};
    use crate::error::FetchError;

    /// Serves the same rising series for every identifier.
    struct FlatSource;

    impl SeriesSource for FlatSource {
        fn fetch(
            &self,
            series_id: &str,
            _: UnitMode,
            _: NaiveDate,
        ) -> Result<ObservationSeries, FetchError> {
            if series_id == "UNRATE" {
                return Err(FetchError::Empty {
                    series_id: series_id.to_string(),
                });
            }
            let start = Month::new(2023, 1).unwrap();
            Ok(ObservationSeries::from_values(start, &[1.0, 2.0, 3.0, 4.0]))
        }
    }

    fn app() -> App {
        App::new(
            Catalog::builtin(),
            Box::new(FlatSource),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        )
    }

    #[test]
    fn reload_replaces_dataset_and_reports_failures() {
        let mut app = app();
        assert!(app.current_table().is_none());

        app.handle_key(KeyCode::Char('r'));
        let dataset = app.dataset.as_ref().unwrap();
        assert_eq!(dataset.failures.len(), 1);
        assert_eq!(dataset.series_count(), Catalog::builtin().len() - 1);
        assert!(app.status.contains("1 unavailable"));
    }

    #[test]
    fn navigation_wraps_categories_and_clamps_selection() {
        let mut app = app();
        app.reload();

        app.handle_key(KeyCode::Left);
        assert_eq!(app.category, Category::General);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.category, Category::Employment);

        for _ in 0..20 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.selected, app.card_count() - 1);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.selected, 0);

        app.handle_key(KeyCode::Char('g'));
        assert_eq!(app.chart_mode, ChartMode::ScaleGroup);
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn chart_window_keeps_last_three_years() {
        let start = Month::new(2020, 1).unwrap();
        let values: Vec<f64> = (0..48).map(f64::from).collect();
        let table = align(
            Category::General,
            vec![("GDP".to_string(), Ok(ObservationSeries::from_values(start, &values)))],
        );

        let catalog = Catalog::builtin();
        let (lines, x_bounds, y_bounds) =
            chart_lines(&table, &catalog, &["GDP".to_string()]).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].label, "Gross Domestic Product");
        assert_eq!(lines[0].points.len(), 36);
        assert_eq!(x_bounds[1] - x_bounds[0], 35.0);
        assert!(y_bounds[0] < 12.0 && y_bounds[1] > 47.0);

        assert!(chart_lines(&table, &Catalog::builtin(), &["PI".to_string()]).is_none());
    }

    #[test]
    fn legend_lists_every_status_with_its_color() {
        let line = legend_line();
        assert_eq!(line.spans.len(), StatusKind::ALL.len() * 2);
        assert_eq!(line.spans[0].style.fg, Some(Color::Green));
        assert_eq!(line.spans[1].content, "All clear  ");
        assert_eq!(line.spans[8].style.fg, Some(Color::Red));
    }

    #[test]
    fn status_colors_follow_severity() {
        assert_eq!(status_color(StatusKind::AllClear), Color::Green);
        assert_eq!(status_color(StatusKind::PotentialDanger), Color::Rgb(255, 165, 0));
        assert_eq!(status_color(StatusKind::InsufficientData), Color::Gray);
    }
}
