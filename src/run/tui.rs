use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;

use crate::ui::app::{App, InputMode, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(preload: Option<&Path>) -> Result<()> {
    let mut app = App::new();
    app.refresh_browser();
    if let Some(path) = preload {
        if let Err(e) = app.load_file(path) {
            app.set_status(format!("Load failed: {e}"));
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(5) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app)?,
                InputMode::Command => handle_command_input(key, app)?,
                InputMode::Filter => handle_filter_input(key, app),
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') => {
            app.screen = Screen::Reports;
            app.input_mode = InputMode::Filter;
            app.filter_input.clear();
            app.report_index = 0;
            app.report_scroll = 0;
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('1') => switch_screen(app, Screen::Browse),
        KeyCode::Char('2') => switch_screen(app, Screen::Data),
        KeyCode::Char('3') => switch_screen(app, Screen::Reports),
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, screens[next]);
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, screens[prev]);
        }
        KeyCode::Enter => handle_enter(app),
        KeyCode::Esc => handle_escape(app),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_up(app);
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_filter_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.filter_input.clear();
            app.report_index = 0;
            app.report_scroll = 0;
        }
        KeyCode::Backspace => {
            app.filter_input.pop();
            app.report_index = 0;
            app.report_scroll = 0;
        }
        KeyCode::Char(c) => {
            // Live filter: narrow the menu as you type
            app.filter_input.push(c);
            app.report_index = 0;
            app.report_scroll = 0;
        }
        _ => {}
    }
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, screen: Screen) {
    app.screen = screen;
    if screen == Screen::Browse {
        app.refresh_browser();
    }
}

fn handle_move_down(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Browse => {
            scroll_down(
                &mut app.browser_index,
                &mut app.browser_scroll,
                app.browser_entries.len(),
                page,
            );
        }
        Screen::Data => {
            let len = app.dataset.as_ref().map(|d| d.len()).unwrap_or(0);
            if app.data_scroll + page < len {
                app.data_scroll += 1;
            }
        }
        Screen::Reports => {
            let len = app.filtered_reports().len();
            scroll_down(&mut app.report_index, &mut app.report_scroll, len, page);
        }
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Browse => scroll_up(&mut app.browser_index, &mut app.browser_scroll),
        Screen::Data => app.data_scroll = app.data_scroll.saturating_sub(1),
        Screen::Reports => scroll_up(&mut app.report_index, &mut app.report_scroll),
    }
}

fn handle_enter(app: &mut App) {
    match app.screen {
        Screen::Browse => {
            if let Some(path) = app.browser_entries.get(app.browser_index).cloned() {
                if path.is_dir() {
                    app.browser_path = path;
                    app.refresh_browser();
                } else if let Err(e) = app.load_file(&path) {
                    app.set_status(format!("Load failed: {e}"));
                }
            }
        }
        Screen::Data => {}
        Screen::Reports => app.run_selected_report(),
    }
}

fn handle_escape(app: &mut App) {
    if app.screen == Screen::Reports && !app.filter_input.is_empty() {
        app.filter_input.clear();
        app.report_index = 0;
        app.report_scroll = 0;
        app.set_status("Filter cleared");
    } else {
        app.status_message.clear();
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Browse => scroll_to_top(&mut app.browser_index, &mut app.browser_scroll),
        Screen::Data => app.data_scroll = 0,
        Screen::Reports => scroll_to_top(&mut app.report_index, &mut app.report_scroll),
    }
}

fn handle_goto_bottom(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Browse => {
            scroll_to_bottom(
                &mut app.browser_index,
                &mut app.browser_scroll,
                app.browser_entries.len(),
                page,
            );
        }
        Screen::Data => {
            let len = app.dataset.as_ref().map(|d| d.len()).unwrap_or(0);
            app.data_scroll = len.saturating_sub(page);
        }
        Screen::Reports => {
            let len = app.filtered_reports().len();
            scroll_to_bottom(&mut app.report_index, &mut app.report_scroll, len, page);
        }
    }
}
