use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use documorph_logging::morph_debug;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("download directory {path} unusable: {reason}")]
    OutputDir { path: PathBuf, reason: String },
    #[error("refusing to write artifact named {0:?}")]
    InvalidName(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

fn output_dir_error(dir: &Path, reason: impl ToString) -> PersistError {
    PersistError::OutputDir {
        path: dir.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Creates `dir` if needed and checks that artifacts can be written into it.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => return Err(output_dir_error(dir, "not a directory")),
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|err| output_dir_error(dir, err))?;
        }
        Err(err) => return Err(output_dir_error(dir, err)),
    }
    NamedTempFile::new_in(dir).map_err(|err| output_dir_error(dir, err))?;
    Ok(())
}

/// Saves downloaded artifacts under their final name only once fully written.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// `filename` must be a bare file name; an existing artifact is replaced.
    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        if filename.is_empty()
            || filename == "."
            || filename == ".."
            || filename.contains(['/', '\\'])
        {
            return Err(PersistError::InvalidName(filename.to_string()));
        }
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(content)?;
        staged.as_file_mut().sync_all()?;
        staged
            .persist(&target)
            .map_err(|err| PersistError::Io(err.error))?;

        morph_debug!("wrote {} bytes to {}", content.len(), target.display());
        Ok(target)
    }
}
