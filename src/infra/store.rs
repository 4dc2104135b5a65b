//! Selection persistence.
//!
//! The persisted form is a JSON array of performance ids. The file store
//! writes through a temp file in the target directory and renames it into
//! place.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::schedule::Selection;

#[derive(Debug, thiserror::Error)]
pub enum StoreError
{
    #[error("failed to read selections from {path}")]
    Read
    {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write selections to {path}")]
    Write
    {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("selections file {path} is not a JSON array of ids")]
    Decode
    {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode selections")]
    Encode(#[source] serde_json::Error),
}

/// Durable home of a session's selection.
pub trait SelectionStore
{
    fn load(&self) -> Result<Selection, StoreError>;

    fn save(
        &self,
        selection: &Selection,
    ) -> Result<(), StoreError>;
}

/// JSON file on disk. A missing or blank file is an empty selection.
#[derive(Debug, Clone)]
pub struct JsonFileStore
{
    path: PathBuf,
}

impl JsonFileStore
{
    pub fn new(path: impl Into<PathBuf>) -> Self
    {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path
    {
        &self.path
    }

    fn write_err(
        &self,
        source: io::Error,
    ) -> StoreError
    {
        StoreError::Write { path: self.path.clone(), source }
    }
}

impl SelectionStore for JsonFileStore
{
    fn load(&self) -> Result<Selection, StoreError>
    {
        let text = match fs::read_to_string(&self.path)
        {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound =>
            {
                debug!(path = %self.path.display(), "no saved selections");
                return Ok(Selection::new());
            }
            Err(source) => return Err(StoreError::Read { path: self.path.clone(), source }),
        };

        if text
            .trim()
            .is_empty()
        {
            return Ok(Selection::new());
        }

        serde_json::from_str(&text)
            .map_err(|source| StoreError::Decode { path: self.path.clone(), source })
    }

    fn save(
        &self,
        selection: &Selection,
    ) -> Result<(), StoreError>
    {
        let dir = self
            .path
            .parent()
            .filter(|p| {
                !p.as_os_str()
                    .is_empty()
            })
            .unwrap_or(Path::new("."));
        fs::create_dir_all(dir).map_err(|e| self.write_err(e))?;

        let mut body = serde_json::to_vec_pretty(selection).map_err(StoreError::Encode)?;
        body.push(b'\n');

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.write_err(e))?;
        tmp.write_all(&body)
            .map_err(|e| self.write_err(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.write_err(e.error))?;

        debug!(path = %self.path.display(), count = selection.len(), "saved selections");
        Ok(())
    }
}

/// In-process store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore
{
    inner: RefCell<Selection>,
}

impl MemoryStore
{
    pub fn new(initial: Selection) -> Self
    {
        Self { inner: RefCell::new(initial) }
    }
}

impl SelectionStore for MemoryStore
{
    fn load(&self) -> Result<Selection, StoreError>
    {
        Ok(self
            .inner
            .borrow()
            .clone())
    }

    fn save(
        &self,
        selection: &Selection,
    ) -> Result<(), StoreError>
    {
        *self
            .inner
            .borrow_mut() = selection.clone();
        Ok(())
    }
}
