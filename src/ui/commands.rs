use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, Screen};
use crate::report::ReportKind;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit ReporTUI", cmd_quit, r);
    register_command!("quit", "Quit ReporTUI", cmd_quit, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "open",
        "Load a CSV file (e.g. :open ~/transactions.csv)",
        cmd_open,
        r
    );
    register_command!("o", "Load a CSV file (e.g. :o ~/transactions.csv)", cmd_open, r);
    register_command!("browse", "Go to the file browser", cmd_browse, r);
    register_command!("data", "Go to the data preview", cmd_data, r);
    register_command!("d", "Go to the data preview", cmd_data, r);
    register_command!("reports", "Go to the report menu", cmd_reports, r);
    register_command!("r", "Go to the report menu", cmd_reports, r);
    register_command!(
        "report",
        "Run a report by number or name (e.g. :report 1)",
        cmd_report,
        r
    );
    register_command!("rerun", "Recompute the current report", cmd_rerun, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_open(args: &str, app: &mut App) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :open <file.csv>");
        return Ok(());
    }
    let path = crate::run::shellexpand(args);
    if let Err(e) = app.load_file(std::path::Path::new(&path)) {
        app.set_status(format!("Load failed: {e}"));
    }
    Ok(())
}

fn cmd_browse(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.screen = Screen::Browse;
    app.refresh_browser();
    Ok(())
}

fn cmd_data(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.screen = Screen::Data;
    Ok(())
}

fn cmd_reports(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.screen = Screen::Reports;
    Ok(())
}

fn cmd_report(args: &str, app: &mut App) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :report <number|name>");
        return Ok(());
    }
    let kind = if let Ok(n) = args.parse::<usize>() {
        // Menu numbers are 1-based
        n.checked_sub(1).and_then(|i| ReportKind::all().get(i)).copied()
    } else {
        ReportKind::parse(args)
    };
    match kind {
        Some(kind) => {
            app.screen = Screen::Reports;
            app.run_report(kind);
        }
        None => app.set_status(format!("No report matches '{args}'")),
    }
    Ok(())
}

fn cmd_rerun(_args: &str, app: &mut App) -> anyhow::Result<()> {
    match app.output.as_ref().map(|(kind, _)| *kind) {
        Some(kind) => app.run_report(kind),
        None => app.set_status("Nothing computed yet"),
    }
    Ok(())
}
