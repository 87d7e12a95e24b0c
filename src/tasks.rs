// Task store: `tasks.txt`, one free-form task per line in insertion order.

use std::fs::File;
use std::io::{BufReader, Lines};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, TodoError};
use crate::store;

#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a task, creating the file if needed.
    pub fn append(&self, task: &str) -> Result<()> {
        if task.contains(&['\n', '\r'][..]) {
            return Err(TodoError::InvalidTask("must not contain line breaks"));
        }
        store::append_line(&self.path, task)?;
        info!("task added");
        Ok(())
    }

    /// Lazily iterate stored tasks in insertion order. `None` means there is
    /// no task file yet.
    pub fn list_all(&self) -> Result<Option<TaskLines>> {
        Ok(store::read_lines(&self.path)?.map(|lines| TaskLines {
            lines: Some(lines),
            path: self.path.clone(),
        }))
    }
}

pub struct TaskLines {
    lines: Option<Lines<BufReader<File>>>,
    path: PathBuf,
}

impl Iterator for TaskLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.lines.as_mut()?.next()? {
            Ok(line) => Some(Ok(line)),
            Err(e) => {
                self.lines = None;
                Some(Err(TodoError::io("read", self.path.clone(), e)))
            }
        }
    }
}
