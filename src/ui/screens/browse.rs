use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let path_display = Paragraph::new(Line::from(vec![
        Span::styled(" Path: ", Style::default().fg(theme::TEXT_DIM)),
        Span::styled(
            app.browser_path.display().to_string(),
            Style::default().fg(theme::ACCENT),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                " Open CSV File ",
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(path_display, chunks[0]);

    if app.browser_entries.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No CSV files here",
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Navigate with j/k and Enter, or load directly with :open <path>",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::OVERLAY)),
        );
        f.render_widget(msg, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = app
        .browser_entries
        .iter()
        .enumerate()
        .skip(app.browser_scroll)
        .take(chunks[1].height.saturating_sub(2) as usize)
        .map(|(i, path)| {
            let name = if Some(path.as_path()) == app.browser_path.parent() {
                "📁 ..".to_string()
            } else if path.is_dir() {
                format!(
                    "📁 {}",
                    path.file_name().and_then(|n| n.to_str()).unwrap_or("?")
                )
            } else {
                format!(
                    "📄 {}",
                    path.file_name().and_then(|n| n.to_str()).unwrap_or("?")
                )
            };

            let style = if i == app.browser_index {
                theme::selected_style()
            } else {
                theme::normal_style()
            };

            ListItem::new(Line::from(Span::styled(name, style)))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                " j/k to navigate, Enter to open ",
                theme::dim_style(),
            )),
    );
    f.render_widget(list, chunks[1]);
}
