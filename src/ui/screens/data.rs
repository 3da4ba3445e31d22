use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::models::{Column, Record};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(dataset) = &app.dataset else {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No data loaded", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Open a CSV from the Open tab or with :open <path>",
                theme::dim_style(),
            )),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                " Data ",
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            ));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    };

    // Only the columns the file actually carried, in schema order
    let columns: Vec<Column> = Column::all()
        .iter()
        .copied()
        .filter(|c| dataset.has(*c))
        .collect();

    let header_cells = columns
        .iter()
        .map(|c| Cell::from(c.header()).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = dataset
        .records
        .iter()
        .enumerate()
        .skip(app.data_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, rec)| {
            let style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            let cells: Vec<Cell> = columns
                .iter()
                .map(|c| Cell::from(cell_text(rec, *c)))
                .collect();
            Row::new(cells).style(style)
        })
        .collect();

    let widths: Vec<Constraint> = columns
        .iter()
        .map(|c| match c {
            Column::Customer | Column::Date | Column::Amount => Constraint::Length(12),
            Column::State => Constraint::Length(14),
            _ => Constraint::Min(12),
        })
        .collect();

    let first = app.data_scroll + 1;
    let last = (app.data_scroll + area.height.saturating_sub(3) as usize).min(dataset.len());
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(
                    " {} ({} rows, showing {first}-{last}) ",
                    dataset.source,
                    dataset.len()
                ),
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(table, area);
}

fn cell_text(rec: &Record, col: Column) -> String {
    match col {
        Column::Customer => rec.customer.clone().unwrap_or_default(),
        Column::Date => rec.date.map(|d| d.to_string()).unwrap_or_default(),
        Column::Amount => rec.amount.map(format_amount).unwrap_or_default(),
        Column::Service => truncate(rec.service.as_deref().unwrap_or(""), 24),
        Column::Product => truncate(rec.product.as_deref().unwrap_or(""), 24),
        Column::Detail => truncate(rec.detail.as_deref().unwrap_or(""), 24),
        Column::State => truncate(rec.state.as_deref().unwrap_or(""), 14),
        Column::City => truncate(rec.city.as_deref().unwrap_or(""), 18),
    }
}
