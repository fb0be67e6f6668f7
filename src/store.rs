//! JSON-backed task store.
//!
//! The whole list is written back as an indented JSON array after every
//! mutation. Nothing is written when a mutation turns out to be a no-op.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::task::{normalize_title, Task};
use crate::view;

/// Default file name, relative to the working directory.
pub const DEFAULT_TASKS_FILE: &str = "tasks.json";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Ordered task list owned together with the file it persists to.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Creates an empty store without touching the disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tasks: Vec::new(),
        }
    }

    /// Loads the store, falling back to an empty list.
    ///
    /// A file that cannot be parsed is moved aside to `<file>.corrupt` so the
    /// next save does not destroy it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tasks = match Self::load(&path) {
            Ok(tasks) => {
                tracing::debug!(path = %path.display(), count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(err @ StoreError::Malformed { .. }) => {
                let backup = corrupt_path(&path);
                match fs::rename(&path, &backup) {
                    Ok(()) => tracing::warn!(
                        backup = %backup.display(),
                        "{err}; starting with an empty list"
                    ),
                    Err(rename_err) => tracing::warn!(
                        "{err}; could not move it aside: {rename_err}; starting with an empty list"
                    ),
                }
                Vec::new()
            }
            Err(err) => {
                tracing::warn!("{err}; starting with an empty list");
                Vec::new()
            }
        };

        Self { path, tasks }
    }

    /// Reads the task list. A missing, empty or `null` file is an empty list.
    pub fn load(path: &Path) -> StoreResult<Vec<Task>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;
        let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let tasks: Option<Vec<Task>> =
            serde_json::from_slice(content).map_err(|source| StoreError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(tasks.unwrap_or_default())
    }

    /// Overwrites the file with the full list.
    pub fn save(&self) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(&self.tasks)?;
        fs::write(&self.path, json).map_err(|e| StoreError::io(&self.path, e))?;
        tracing::trace!(path = %self.path.display(), count = self.tasks.len(), "saved tasks");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, idx: usize) -> Option<&Task> {
        self.tasks.get(idx)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Appends a task. Blank titles are ignored and return `Ok(false)`.
    pub fn add(&mut self, title: &str) -> StoreResult<bool> {
        let Some(title) = normalize_title(title) else {
            return Ok(false);
        };
        self.tasks.push(Task::new(title));
        self.save()?;
        Ok(true)
    }

    /// Replaces the title at `idx`. Blank titles and bad indices are ignored.
    pub fn edit(&mut self, idx: usize, title: &str) -> StoreResult<bool> {
        let Some(title) = normalize_title(title) else {
            return Ok(false);
        };
        let Some(task) = self.tasks.get_mut(idx) else {
            return Ok(false);
        };
        task.title = title;
        self.save()?;
        Ok(true)
    }

    pub fn delete(&mut self, idx: usize) -> StoreResult<Option<Task>> {
        if idx >= self.tasks.len() {
            return Ok(None);
        }
        let removed = self.tasks.remove(idx);
        self.save()?;
        Ok(Some(removed))
    }

    /// Flips the done flag, returning the new value.
    pub fn toggle_done(&mut self, idx: usize) -> StoreResult<Option<bool>> {
        let Some(task) = self.tasks.get_mut(idx) else {
            return Ok(None);
        };
        task.is_done = !task.is_done;
        let done = task.is_done;
        self.save()?;
        Ok(Some(done))
    }

    pub fn sort_alphabetical(&mut self) -> StoreResult<()> {
        view::sort_alphabetical(&mut self.tasks);
        self.save()
    }

    pub fn sort_by_done(&mut self) -> StoreResult<()> {
        view::sort_by_done(&mut self.tasks);
        self.save()
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> StoreResult<bool> {
        if !view::reorder(&mut self.tasks, from, to) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".corrupt");
    path.with_file_name(name)
}
