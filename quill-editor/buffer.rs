use crate::piece_table::PieceTable;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

type BufferResult<T> = Result<T, BufferError>;

#[derive(Debug, Error)]
pub enum BufferError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("No buffer path set")]
    NoPathSet,
    #[error("'{}' is not a regular file", .0.display())]
    NotAFile(PathBuf),
}

/// What a path points at on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    File,
    Directory,
    Invalid,
}

/// Classify `path` without following it any further than `stat` does
pub async fn validate_path(path: &Path) -> ObjectKind {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => ObjectKind::File,
        Ok(meta) if meta.is_dir() => ObjectKind::Directory,
        _ => ObjectKind::Invalid,
    }
}

/// A piece table plus the file it was loaded from
#[derive(Debug, Default)]
pub struct Buffer {
    table: PieceTable,
    filepath: Option<PathBuf>,
    name: Option<String>,
}

impl Buffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unnamed buffer holding `content`
    pub fn from_bytes(content: impl Into<Vec<u8>>) -> Self {
        Self {
            table: PieceTable::new(content),
            filepath: None,
            name: None,
        }
    }

    /// Load a buffer from a regular file
    pub async fn from_file(path: impl AsRef<Path>) -> BufferResult<Self> {
        let filepath = path.as_ref().to_path_buf();

        if validate_path(&filepath).await != ObjectKind::File {
            return Err(BufferError::NotAFile(filepath));
        }

        let content = fs::read(&filepath).await?;
        log::info!("loaded {} bytes from {}", content.len(), filepath.display());

        Ok(Self {
            table: PieceTable::new(content),
            name: Some(display_name(&filepath)),
            filepath: Some(filepath),
        })
    }

    /// Save the buffer to its file
    pub async fn save(&mut self) -> BufferResult<()> {
        let path = self.filepath.clone().ok_or(BufferError::NoPathSet)?;
        self.write_to(&path).await
    }

    /// Save the buffer to `path` and make that its file.
    ///
    /// The buffer keeps its old path if the write fails.
    pub async fn save_as(&mut self, path: impl AsRef<Path>) -> BufferResult<()> {
        let filepath = path.as_ref().to_path_buf();
        self.write_to(&filepath).await?;

        self.name = Some(display_name(&filepath));
        self.filepath = Some(filepath);
        Ok(())
    }

    async fn write_to(&mut self, path: &Path) -> BufferResult<()> {
        let content = self.table.content();
        fs::write(path, &content).await?;

        log::info!("wrote {} bytes to {}", content.len(), path.display());
        self.table.set_modified(false);
        Ok(())
    }

    pub fn table(&self) -> &PieceTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut PieceTable {
        &mut self.table
    }

    pub fn is_modified(&self) -> bool {
        self.table.is_modified()
    }

    /// Mark buffer as clean (not modified)
    pub fn mark_clean(&mut self) {
        self.table.set_modified(false);
    }

    pub fn filepath(&self) -> Option<&PathBuf> {
        self.filepath.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "*new*".to_string())
}
