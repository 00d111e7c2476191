use anyhow::{Context, Result};
use clap::Parser;
use quill_editor::{EditorConfig, commands::WHEEL_LINES};
use quill_input::EditorKey;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about = "The quill text editor")]
pub struct Args {
    #[arg(help = "File to open.")]
    pub file: Option<PathBuf>,

    #[arg(
        long,
        help = "Keep the column of a run of vertical moves when passing through shorter lines."
    )]
    pub sticky_column: bool,

    #[arg(
        long,
        value_name = "N",
        default_value_t = WHEEL_LINES,
        help = "Lines scrolled per mouse wheel notch."
    )]
    pub wheel_lines: usize,

    #[arg(long, value_name = "N", default_value_t = 4, help = "Spaces inserted for Tab.")]
    pub tab_width: usize,

    #[arg(
        long,
        value_name = "KEY",
        default_value = "C-q",
        help = "Key that quits, e.g. C-q or C-x. Ctrl-C always quits."
    )]
    pub quit_key: EditorKey,

    #[arg(long, value_name = "PATH", help = "Write logs to this file.")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn editor_config(&self) -> EditorConfig {
        EditorConfig {
            sticky_column: self.sticky_column,
            wheel_lines: self.wheel_lines,
            tab_width: self.tab_width,
            quit_key: self.quit_key,
        }
    }
}

/// Install the logger.
///
/// The terminal belongs to the editor, so logs only go somewhere when a log
/// file is given or `RUST_LOG` asks for them.
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let env = env_logger::Env::default().default_filter_or(default_filter(log_file));
    let mut builder = env_logger::Builder::from_env(env);

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("Failed to install logger")?;
    Ok(())
}

fn default_filter(log_file: Option<&Path>) -> &'static str {
    if log_file.is_some() { "info" } else { "off" }
}
