use anyhow::Result;
use std::path::Path;

use crate::load::CsvLoader;
use crate::models::Dataset;
use crate::report::{ReportKind, ReportOutput};
use crate::ui::util::{format_amount, format_opt_amount};

pub(crate) fn as_cli(args: &[String]) -> Result<()> {
    match args[1].as_str() {
        "list" | "l" => {
            cli_list();
            Ok(())
        }
        "run" | "r" => cli_run(&args[2..]),
        "summary" | "s" => cli_summary(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("reportui {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            // A bare CSV path opens the TUI with the file preloaded
            let expanded = shellexpand(other);
            let path = Path::new(&expanded);
            if path.is_file() {
                return super::as_tui(Some(path));
            }
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("ReporTUI — interactive reports over transaction CSVs");
    println!();
    println!("Usage: reportui [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  <file.csv>                    Launch TUI with the file loaded");
    println!("  list                          List the available reports");
    println!("  run <file.csv> <n|name>       Compute one report and print it");
    println!("  summary <file.csv>            Print a quick overview of a file");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn cli_list() {
    println!("Available reports:");
    for (i, kind) in ReportKind::all().iter().enumerate() {
        println!("  {:>2}  {}", i + 1, kind.name());
    }
}

fn cli_run(args: &[String]) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: reportui run <file.csv> <number|name>");
    }

    let dataset = load(&args[0])?;
    let selector = args[1..].join(" ");

    let kind = if let Ok(n) = selector.parse::<usize>() {
        n.checked_sub(1)
            .and_then(|i| ReportKind::all().get(i))
            .copied()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Report number out of range: {selector} (1-{})",
                    ReportKind::all().len()
                )
            })?
    } else {
        ReportKind::parse(&selector)
            .ok_or_else(|| anyhow::anyhow!("No report named '{selector}' (see: reportui list)"))?
    };

    let output = kind.run(&dataset)?;
    println!("{kind}");
    println!("{}", "─".repeat(40));
    print_output(&output);
    Ok(())
}

fn cli_summary(args: &[String]) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: reportui summary <file.csv>");
    }

    let dataset = load(&args[0])?;

    println!("ReporTUI — {}", dataset.source);
    println!("{}", "─".repeat(40));
    println!("  Rows:     {}", dataset.len());
    println!(
        "  Columns:  {}",
        dataset
            .columns
            .iter()
            .map(|c| c.header())
            .collect::<Vec<_>>()
            .join(", ")
    );

    // The headline numbers, for columns the file actually has
    for kind in SUMMARY_REPORTS {
        if let Ok(ReportOutput::Metric { label, value }) = kind.run(&dataset) {
            println!("  {label}: {}", value.render());
        }
    }

    Ok(())
}

pub(super) const SUMMARY_REPORTS: [ReportKind; 4] = [
    ReportKind::TotalSales,
    ReportKind::UniqueCustomers,
    ReportKind::AvgPerCustomer,
    ReportKind::RepeatBuyerShare,
];

fn load(arg: &str) -> Result<Dataset> {
    let expanded = shellexpand(arg);
    let path = Path::new(&expanded);
    if !path.exists() {
        anyhow::bail!("File not found: {arg}");
    }
    CsvLoader::load(path)
}

fn print_output(output: &ReportOutput) {
    match output {
        ReportOutput::Metric { label, value } => {
            println!("  {label}: {}", value.render());
        }
        ReportOutput::Bars { rows, .. } => {
            for (name, amt) in rows {
                println!("  {name:<32} {}", format_opt_amount(*amt));
            }
        }
        ReportOutput::Series { points, .. } => {
            for (label, v) in points {
                println!("  {label:<10} {}", format_amount(*v));
            }
        }
        ReportOutput::Table { columns, rows, .. } => {
            let header: Vec<String> = columns.iter().map(|c| format!("{c:<20}")).collect();
            println!("  {}", header.join(" "));
            for row in rows {
                let cells: Vec<String> = row.iter().map(|c| format!("{c:<20}")).collect();
                println!("  {}", cells.join(" "));
            }
        }
        ReportOutput::Names { items, .. } => {
            if items.is_empty() {
                println!("  (none)");
            }
            for name in items {
                println!("  {name}");
            }
        }
    }
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
