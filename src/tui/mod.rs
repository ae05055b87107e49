//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing countries, a model family,
//! and the time range, then renders the function and its first and second
//! derivatives as three stacked chart panels with critical/inflection
//! markers. Every input change triggers one full recompute-and-render pass.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};

use crate::app::pipeline::run_model;
use crate::domain::{Country, CurveSet, ModelConfig, RunOutput, RANGE_MAX, RANGE_MIN};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::CurvePanel;

/// Start the TUI with the given initial selections.
pub fn run(config: ModelConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config);
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

/// Selectable settings fields, top to bottom.
const FIELD_COUNTRY: usize = 0;
const FIELD_COMPARE: usize = 1;
const FIELD_FAMILY: usize = 2;
const FIELD_XMIN: usize = 3;
const FIELD_XMAX: usize = 4;
const FIELD_COUNT: usize = 5;

struct App {
    config: ModelConfig,
    selected_field: usize,
    status: String,
    run: Option<RunOutput>,
}

impl App {
    fn new(config: ModelConfig) -> Self {
        let mut app = Self {
            config,
            selected_field: 0,
            status: String::new(),
            run: None,
        };
        app.recompute();
        app
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

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < FIELD_COUNT - 1 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('m') => {
                self.config.family = self.config.family.next();
                self.recompute();
                self.status = format!("model: {}", self.config.family.display_name());
            }
            KeyCode::Char('c') => {
                self.config.compare = match self.config.compare {
                    Some(_) => None,
                    None => Some(default_comparison(self.config.country)),
                };
                self.recompute();
                self.status = match self.config.compare {
                    Some(c) => format!("compare: {}", c.display_name()),
                    None => "compare: off".to_string(),
                };
            }
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            FIELD_COUNTRY => {
                self.config.country = if delta >= 0 {
                    self.config.country.next()
                } else {
                    self.config.country.prev()
                };
                self.status = format!("country: {}", self.config.country.display_name());
            }
            FIELD_COMPARE => {
                self.config.compare = cycle_compare(self.config.compare, delta);
                self.status = match self.config.compare {
                    Some(c) => format!("compare: {}", c.display_name()),
                    None => "compare: off".to_string(),
                };
            }
            FIELD_FAMILY => {
                self.config.family = if delta >= 0 {
                    self.config.family.next()
                } else {
                    self.config.family.prev()
                };
                self.status = format!("model: {}", self.config.family.display_name());
            }
            FIELD_XMIN => {
                let step = if delta >= 0 { 0.1 } else { -0.1 };
                let v = round_decimal(self.config.range.xmin + step);
                self.config.range.xmin = v.clamp(RANGE_MIN, round_decimal(self.config.range.xmax - 0.1));
                self.status = format!("xmin: {:.1}", self.config.range.xmin);
            }
            FIELD_XMAX => {
                let step = if delta >= 0 { 0.1 } else { -0.1 };
                let v = round_decimal(self.config.range.xmax + step);
                self.config.range.xmax = v.clamp(round_decimal(self.config.range.xmin + 0.1), RANGE_MAX);
                self.status = format!("xmax: {:.1}", self.config.range.xmax);
            }
            _ => {}
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        match run_model(&self.config) {
            Ok(run) => self.run = Some(run),
            Err(err) => {
                self.run = None;
                self.status = err.to_string();
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("growth", Style::default().fg(Color::Cyan)),
            Span::raw(" — country growth models through a calculus lens"),
        ]));

        let compare_label = self
            .config
            .compare
            .map(|c| c.display_name().to_string())
            .unwrap_or_else(|| "off".to_string());
        lines.push(Line::from(Span::styled(
            format!(
                "country: {} | compare: {compare_label} | model: {} | range: [{:.1}, {:.1}]",
                self.config.country.display_name(),
                self.config.family.display_name(),
                self.config.range.xmin,
                self.config.range.xmax,
            ),
            Style::default().fg(Color::Gray),
        )));

        if let Some(run) = &self.run {
            lines.push(Line::from(Span::styled(
                format!(
                    "f(x) = {} | critical: {} | inflection: {}",
                    run.primary.formula,
                    run.primary.critical.len(),
                    run.primary.inflection.len(),
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(8)])
            .split(area);

        self.draw_charts(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_charts(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let panels = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);

        self.draw_panel(frame, panels[0], PanelKind::Function);
        self.draw_panel(frame, panels[1], PanelKind::FirstDerivative);
        self.draw_panel(frame, panels[2], PanelKind::SecondDerivative);
    }

    fn draw_panel(&self, frame: &mut ratatui::Frame<'_>, area: Rect, kind: PanelKind) {
        let title = match &self.run {
            Some(run) if run.comparison.is_some() => format!(
                "{} — {} (line) vs {} (dashes)",
                kind.title(),
                run.primary.profile.country.display_name(),
                run.comparison.as_ref().map(|c| c.profile.country.display_name()).unwrap_or(""),
            ),
            _ => kind.title().to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("No model computed.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let primary = finite_segments(&run.primary.curves.xs, kind.series(&run.primary.curves));
        let comparison: Vec<Vec<(f64, f64)>> = run
            .comparison
            .as_ref()
            .map(|c| dash_chunks(finite_segments(&c.curves.xs, kind.series(&c.curves))))
            .unwrap_or_default();

        let x_bounds = [run.range.xmin, run.range.xmax];
        let y_bounds = panel_y_bounds(&primary, &comparison);

        // Semantic marker placement: critical markers on the function and
        // first-derivative panels, inflection markers on the function and
        // second-derivative panels.
        let empty: &[f64] = &[];
        let (critical, inflection): (&[f64], &[f64]) = match kind {
            PanelKind::Function => (&run.primary.critical, &run.primary.inflection),
            PanelKind::FirstDerivative => (&run.primary.critical, empty),
            PanelKind::SecondDerivative => (empty, &run.primary.inflection),
        };

        let widget = CurvePanel {
            primary: &primary,
            comparison: &comparison,
            critical,
            inflection,
            x_bounds,
            y_bounds,
            x_label: match kind {
                PanelKind::SecondDerivative => Some("time"),
                _ => None,
            },
            y_label: kind.y_label(),
        };

        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let compare_label = self
            .config
            .compare
            .map(|c| c.display_name().to_string())
            .unwrap_or_else(|| "off".to_string());

        let items = vec![
            ListItem::new(format!("Country: {}", self.config.country.display_name())),
            ListItem::new(format!("Compare: {compare_label}")),
            ListItem::new(format!("Model:   {}", self.config.family.display_name())),
            ListItem::new(format!("X min:   {:.1}", self.config.range.xmin)),
            ListItem::new(format!("X max:   {:.1}", self.config.range.xmax)),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  m model  c compare  q quit | dashed = critical, dotted = inflection";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanelKind {
    Function,
    FirstDerivative,
    SecondDerivative,
}

impl PanelKind {
    fn title(self) -> &'static str {
        match self {
            PanelKind::Function => "Function (Revenue / Demand / Cost)",
            PanelKind::FirstDerivative => "First Derivative (Growth Rate)",
            PanelKind::SecondDerivative => "Second Derivative (Concavity)",
        }
    }

    fn y_label(self) -> &'static str {
        match self {
            PanelKind::Function => "f(x)",
            PanelKind::FirstDerivative => "f'(x)",
            PanelKind::SecondDerivative => "f''(x)",
        }
    }

    fn series(self, curves: &CurveSet) -> &[f64] {
        match self {
            PanelKind::Function => &curves.f,
            PanelKind::FirstDerivative => &curves.d1,
            PanelKind::SecondDerivative => &curves.d2,
        }
    }
}

/// Split a sampled curve into finite line segments.
///
/// Non-finite samples (NaN/∞ from out-of-domain evaluation) terminate the
/// current segment, so the plotted line simply breaks there.
fn finite_segments(xs: &[f64], ys: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (&x, &y) in xs.iter().zip(ys) {
        if y.is_finite() {
            current.push((x, y));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Re-chunk segments into short runs so the comparison country renders as a
/// dashed line.
fn dash_chunks(segments: Vec<Vec<(f64, f64)>>) -> Vec<Vec<(f64, f64)>> {
    const ON: usize = 10;
    const OFF: usize = 6;
    let mut out = Vec::new();
    for segment in segments {
        let mut i = 0;
        while i < segment.len() {
            let end = (i + ON).min(segment.len());
            if end - i >= 2 {
                out.push(segment[i..end].to_vec());
            }
            i += ON + OFF;
        }
    }
    out
}

/// Shared y bounds over every finite sample in the panel, with 5% padding.
fn panel_y_bounds(primary: &[Vec<(f64, f64)>], comparison: &[Vec<(f64, f64)>]) -> [f64; 2] {
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for segment in primary.iter().chain(comparison) {
        for &(_, y) in segment {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }

    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        // Flat or empty curves still need a drawable band.
        let mid = if y_min.is_finite() { y_min } else { 0.0 };
        return [mid - 0.5, mid + 0.5];
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    [y_min - pad, y_max + pad]
}

/// Snap a range endpoint to the 0.1 grid the ←/→ keys step on.
fn round_decimal(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// First comparison candidate that differs from the primary country.
fn default_comparison(primary: Country) -> Country {
    if primary == Country::ALL[1] {
        Country::ALL[0]
    } else {
        Country::ALL[1]
    }
}

/// Cycle the comparison selector through `off -> each country -> off`.
fn cycle_compare(current: Option<Country>, delta: i32) -> Option<Country> {
    let first = Country::ALL[0];
    let last = Country::ALL[Country::ALL.len() - 1];
    match (current, delta >= 0) {
        (None, true) => Some(first),
        (None, false) => Some(last),
        (Some(c), true) => {
            if c == last {
                None
            } else {
                Some(c.next())
            }
        }
        (Some(c), false) => {
            if c == first {
                None
            } else {
                Some(c.prev())
            }
        }
    }
}
