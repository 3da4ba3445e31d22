use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, List, ListItem, Paragraph, Row,
        Sparkline, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::report::{ReportKind, ReportOutput, Scalar};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{chart_value, format_opt_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_menu(f, chunks[0], app);
    render_result(f, chunks[1], app);
}

fn render_menu(f: &mut Frame, area: Rect, app: &App) {
    let filtered = app.filtered_reports();

    let title = if app.filter_input.is_empty() {
        format!(" Reports ({}) ", filtered.len())
    } else {
        format!(" Reports ({} of {}) ", filtered.len(), ReportKind::all().len())
    };

    if filtered.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("No reports matching '{}'", app.filter_input),
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled("Press Esc to clear the filter", theme::dim_style())),
        ])
        .centered()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::OVERLAY))
                .title(Span::styled(
                    title,
                    Style::default()
                        .fg(theme::TEXT_DIM)
                        .add_modifier(Modifier::BOLD),
                )),
        );
        f.render_widget(msg, area);
        return;
    }

    let width = area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = filtered
        .iter()
        .enumerate()
        .skip(app.report_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(pos, &i)| {
            let kind = ReportKind::all()[i];
            let style = if pos == app.report_index {
                theme::selected_style()
            } else {
                theme::normal_style()
            };
            let label = format!("{:>2} {}", i + 1, truncate(kind.name(), width));
            ListItem::new(Line::from(Span::styled(label, style)))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(list, area);
}

fn render_result(f: &mut Frame, area: Rect, app: &App) {
    let Some((kind, output)) = &app.output else {
        let hint = if app.dataset.is_some() {
            "Select a report and press Enter"
        } else {
            "Open a CSV first (Open tab or :open <path>)"
        };
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No report computed yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(hint, theme::dim_style())),
        ])
        .centered()
        .block(result_block(" Result "));
        f.render_widget(msg, area);
        return;
    };

    let title = format!(" {kind} ");
    match output {
        ReportOutput::Metric { label, value } => render_metric(f, area, &title, label, value),
        ReportOutput::Bars { title: _, rows } => render_bars(f, area, &title, rows),
        ReportOutput::Series { title: _, points } => render_series(f, area, &title, points),
        ReportOutput::Table {
            title: _,
            columns,
            rows,
        } => render_table(f, area, &title, columns, rows),
        ReportOutput::Names { title: _, items } => render_names(f, area, &title, items),
    }
}

fn result_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title.to_string(), theme::title_style()))
}

fn render_metric(f: &mut Frame, area: Rect, title: &str, label: &str, value: &Scalar) {
    let color = match value {
        Scalar::Undefined => theme::RED,
        Scalar::Text(_) => theme::YELLOW,
        _ => theme::GREEN,
    };
    let card = Paragraph::new(vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            value.render(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(label.to_string(), theme::dim_style())),
    ])
    .centered()
    .block(result_block(title));
    f.render_widget(card, area);
}

fn render_bars(f: &mut Frame, area: Rect, title: &str, rows: &[(String, Option<Decimal>)]) {
    if rows.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No rows with this grouping present",
            theme::dim_style(),
        )))
        .centered()
        .block(result_block(title));
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),
            Constraint::Length((rows.len() as u16 + 2).min(12)),
        ])
        .split(area);

    let bars: Vec<Bar> = rows
        .iter()
        .take(12)
        .map(|(name, amt)| {
            let val = amt.map(chart_value).unwrap_or(0);
            Bar::default()
                .value(val)
                .label(Line::from(truncate(name, 10)))
                .style(Style::default().fg(theme::ACCENT))
                .value_style(
                    Style::default()
                        .fg(theme::TEXT)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(result_block(title))
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme::ACCENT))
        .value_style(Style::default().fg(theme::TEXT));
    f.render_widget(chart, chunks[0]);

    // Exact values under the chart; the bars round to whole numbers
    let lines: Vec<Line> = rows
        .iter()
        .take(chunks[1].height.saturating_sub(2) as usize)
        .map(|(name, amt)| {
            Line::from(vec![
                Span::styled(format!(" {:<28}", truncate(name, 28)), theme::normal_style()),
                Span::styled(format_opt_amount(*amt), theme::dim_style()),
            ])
        })
        .collect();
    let listing = Paragraph::new(lines).block(result_block(" Values "));
    f.render_widget(listing, chunks[1]);
}

fn render_series(f: &mut Frame, area: Rect, title: &str, points: &[(String, Decimal)]) {
    if points.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No dated rows to chart",
            theme::dim_style(),
        )))
        .centered()
        .block(result_block(title));
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(4),
        ])
        .split(area);

    let data: Vec<u64> = points.iter().map(|(_, v)| chart_value(*v)).collect();
    let sparkline = Sparkline::default()
        .block(result_block(title))
        .data(&data)
        .style(Style::default().fg(theme::YELLOW));
    f.render_widget(sparkline, chunks[0]);

    let lines: Vec<Line> = points
        .iter()
        .take(chunks[1].height.saturating_sub(2) as usize)
        .map(|(label, v)| {
            Line::from(vec![
                Span::styled(format!(" {label:<10}"), theme::normal_style()),
                Span::styled(format_opt_amount(Some(*v)), theme::dim_style()),
            ])
        })
        .collect();
    let listing = Paragraph::new(lines).block(result_block(" Points "));
    f.render_widget(listing, chunks[1]);
}

fn render_table(
    f: &mut Frame,
    area: Rect,
    title: &str,
    columns: &[&'static str],
    rows: &[Vec<String>],
) {
    if rows.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No rows qualify",
            theme::dim_style(),
        )))
        .centered()
        .block(result_block(title));
        f.render_widget(msg, area);
        return;
    }

    let header_cells = columns
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let table_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, row)| {
            let style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(row.iter().map(|c| Cell::from(c.as_str()))).style(style)
        })
        .collect();

    let widths: Vec<Constraint> = columns
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i == 0 {
                Constraint::Min(20)
            } else {
                Constraint::Length(16)
            }
        })
        .collect();

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(result_block(title));
    f.render_widget(table, area);
}

fn render_names(f: &mut Frame, area: Rect, title: &str, items: &[String]) {
    if items.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "Nothing matched",
            theme::dim_style(),
        )))
        .centered()
        .block(result_block(title));
        f.render_widget(msg, area);
        return;
    }

    let list_items: Vec<ListItem> = items
        .iter()
        .take(area.height.saturating_sub(2) as usize)
        .map(|name| ListItem::new(Line::from(Span::styled(format!(" {name}"), theme::normal_style()))))
        .collect();
    let list = List::new(list_items).block(result_block(title));
    f.render_widget(list, area);
}
