//! Terminal output: rich markdown via termimad, plain markdown, or JSON.

use anyhow::{Context, Result};
use serde::Serialize;
use termimad::{MadSkin, crossterm::style::Color};

/// How results reach stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Rich,
    Plain,
    Json,
}

impl OutputMode {
    pub fn from_flags(json: bool, no_color: bool) -> Self {
        match (json, no_color) {
            (true, _) => OutputMode::Json,
            (false, true) => OutputMode::Plain,
            (false, false) => OutputMode::Rich,
        }
    }
}

pub struct TerminalRenderer {
    mode: OutputMode,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(mode: OutputMode) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { mode, skin }
    }

    /// Prints `markdown`, or `value` as JSON in JSON mode.
    pub fn emit<T: Serialize + ?Sized>(&self, markdown: &str, value: &T) -> Result<()> {
        match self.mode {
            OutputMode::Json => {
                let json =
                    serde_json::to_string_pretty(value).context("Failed to serialize output")?;
                println!("{json}");
            }
            OutputMode::Plain => print!("{markdown}"),
            OutputMode::Rich => {
                // termimad drops the hashes; keep them so headers read as headers
                for line in markdown.lines() {
                    if line.starts_with('#') {
                        println!("\x1b[34m{line}\x1b[0m");
                    } else {
                        self.skin.print_inline(line);
                        println!();
                    }
                }
            }
        }
        Ok(())
    }
}
