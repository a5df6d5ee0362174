//! Command-line argument parsing for the preview tool
//!
//! Supports:
//! - Placing the cursor at a line/column (1-indexed)
//! - Per-run overrides of the guide settings
//! - Text or JSON output
//! - Running the save sequence on the file

use clap::Parser;
use std::path::PathBuf;

use crate::config::PartialConfig;
use crate::host::{CursorPosition, TabChoice};

/// Draw cursor crosshair guides on a file
#[derive(Parser, Debug)]
#[command(
    name = "crosshair",
    version,
    about = "Draw cursor crosshair guides on a file"
)]
pub struct CliArgs {
    /// File to open
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Cursor line (1-indexed)
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub line: usize,

    /// Cursor column (1-indexed)
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub column: usize,

    /// Line-window radius around the cursor
    #[arg(long, value_name = "N")]
    pub size: Option<usize>,

    /// Do not pad short lines with trailing spaces
    #[arg(long)]
    pub no_whitespace: bool,

    /// Tab stop width used when converting tabs
    #[arg(long, value_name = "N")]
    pub tab_size: Option<usize>,

    /// Answer "Convert" if tabs are found near the cursor
    #[arg(long)]
    pub convert_tabs: bool,

    /// Print decorations and spans as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the file back (without padding) after drawing
    #[arg(long)]
    pub save: bool,

    /// Workspace root holding a `.crosshair.yaml`
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub file: PathBuf,
    /// Cursor converted to 0-indexed
    pub cursor: CursorPosition,
    /// Session-only configuration values
    pub overrides: PartialConfig,
    /// Scripted answer to the tab prompt
    pub tab_answer: TabChoice,
    pub output: OutputMode,
    pub save: bool,
    pub workspace_root: Option<PathBuf>,
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> Result<StartupConfig, String> {
        if self.file.is_dir() {
            return Err(format!("{} is a directory", self.file.display()));
        }
        if let Some(root) = &self.workspace {
            if !root.is_dir() {
                return Err(format!("{} is not a directory", root.display()));
            }
        }

        // Convert from 1-indexed (user input) to 0-indexed (internal)
        let cursor = CursorPosition::new(
            self.line.saturating_sub(1),
            self.column.saturating_sub(1),
        );

        let overrides = PartialConfig {
            enabled: Some(true),
            size: self.size,
            add_whitespace: self.no_whitespace.then_some(false),
            tab_size: self.tab_size,
            ..Default::default()
        };

        Ok(StartupConfig {
            file: self.file,
            cursor,
            overrides,
            tab_answer: if self.convert_tabs {
                TabChoice::Convert
            } else {
                TabChoice::Disable
            },
            output: if self.json {
                OutputMode::Json
            } else {
                OutputMode::Text
            },
            save: self.save,
            workspace_root: self.workspace,
        })
    }
}
