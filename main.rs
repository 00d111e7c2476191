use anyhow::{Context, Result};
use clap::Parser;
use quill::{Args, init_logging};
use quill_editor::Editor;
use quill_terminal::{ScreenLayout, Terminal};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    // Resized to the real terminal once it starts
    let (rows, cols) = ScreenLayout::new(80, 24).viewport_size();
    let config = args.editor_config();

    let editor = match &args.file {
        Some(path) => Editor::with_file(path, rows, cols, config)
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?,
        None => Editor::new(rows, cols, config),
    };
    log::info!("Starting editor on {:?}", args.file);

    let mut terminal = Terminal::new(editor, args.file.is_none());
    terminal.run().await?;

    log::info!("Editor exited");
    Ok(())
}
