use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::load::CsvLoader;
use crate::models::Dataset;
use crate::report::{ReportKind, ReportOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Browse,
    Data,
    Reports,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Browse, Self::Data, Self::Reports]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Browse => write!(f, "Open"),
            Self::Data => write!(f, "Data"),
            Self::Reports => write!(f, "Reports"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Filter,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Filter => write!(f, "FILTER"),
        }
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) filter_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    /// The one loaded file; replaced wholesale by the next load.
    pub(crate) dataset: Option<Dataset>,

    // Reports
    pub(crate) report_index: usize,
    pub(crate) report_scroll: usize,
    /// Last successful result. A failing report leaves this visible and
    /// puts its error in the status line instead.
    pub(crate) output: Option<(ReportKind, ReportOutput)>,

    // Data preview
    pub(crate) data_scroll: usize,

    // File browser
    pub(crate) browser_path: PathBuf,
    pub(crate) browser_entries: Vec<PathBuf>,
    pub(crate) browser_index: usize,
    pub(crate) browser_scroll: usize,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            screen: Screen::Browse,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            filter_input: String::new(),
            status_message: String::new(),
            show_help: false,

            dataset: None,

            report_index: 0,
            report_scroll: 0,
            output: None,

            data_scroll: 0,

            browser_path: directories::UserDirs::new()
                .map(|d| d.home_dir().to_path_buf())
                .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"))),
            browser_entries: Vec::new(),
            browser_index: 0,
            browser_scroll: 0,

            visible_rows: 20,
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Load a CSV and make it the session dataset. The previous dataset
    /// and any computed result are discarded.
    pub(crate) fn load_file(&mut self, path: &Path) -> Result<()> {
        let dataset = CsvLoader::load(path)?;
        self.set_status(format!(
            "Loaded {} ({} rows, {} recognized columns)",
            dataset.source,
            dataset.len(),
            dataset.columns.len()
        ));
        self.dataset = Some(dataset);
        self.output = None;
        self.data_scroll = 0;
        self.screen = Screen::Reports;
        Ok(())
    }

    /// Reports visible under the current filter (indices into
    /// `ReportKind::all()`). An empty filter shows the whole menu.
    pub(crate) fn filtered_reports(&self) -> Vec<usize> {
        if self.filter_input.is_empty() {
            return (0..ReportKind::all().len()).collect();
        }
        let filter = self.filter_input.to_ascii_lowercase();
        ReportKind::all()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.name().to_ascii_lowercase().contains(&filter))
            .map(|(i, _)| i)
            .collect()
    }

    pub(crate) fn selected_report(&self) -> Option<ReportKind> {
        let filtered = self.filtered_reports();
        filtered
            .get(self.report_index)
            .map(|&i| ReportKind::all()[i])
    }

    /// Compute one report against the loaded dataset. On failure the
    /// previous result stays on screen; only the status line changes.
    pub(crate) fn run_report(&mut self, kind: ReportKind) {
        let Some(dataset) = &self.dataset else {
            self.set_status("No data loaded. Open a CSV first (:open <path>)");
            return;
        };
        match kind.run(dataset) {
            Ok(output) => {
                self.output = Some((kind, output));
                self.set_status(format!("Computed: {kind}"));
            }
            Err(e) => self.set_status(format!("Report failed: {e}")),
        }
    }

    pub(crate) fn run_selected_report(&mut self) {
        if let Some(kind) = self.selected_report() {
            self.run_report(kind);
        }
    }

    pub(crate) fn refresh_browser(&mut self) {
        let mut entries: Vec<PathBuf> = Vec::new();

        if let Some(parent) = self.browser_path.parent() {
            entries.push(parent.to_path_buf());
        }

        if let Ok(read_dir) = std::fs::read_dir(&self.browser_path) {
            let all: Vec<PathBuf> = read_dir
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    let hidden = p
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with('.'));
                    !hidden
                        && (p.is_dir()
                            || p.extension()
                                .and_then(|e| e.to_str())
                                .is_some_and(|ext| {
                                    matches!(ext.to_ascii_lowercase().as_str(), "csv" | "tsv")
                                }))
                })
                .collect();

            // Dirs first, then files, each sorted alphabetically
            let mut dirs: Vec<PathBuf> = all.iter().filter(|p| p.is_dir()).cloned().collect();
            let mut files: Vec<PathBuf> = all.iter().filter(|p| !p.is_dir()).cloned().collect();
            dirs.sort();
            files.sort();
            entries.extend(dirs);
            entries.extend(files);
        }

        self.browser_entries = entries;
        self.browser_index = 0;
        self.browser_scroll = 0;
    }
}
