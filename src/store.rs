// Line-file primitives used by the credential and task stores.
//
// Every call opens the file, does one thing and closes it again. Nothing is
// cached between calls and there is no locking.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Lines, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{Result, TodoError};

/// Append `line` plus a newline to `path`, creating the file (and its parent
/// directory) when missing. The line is written with a single `write_all`.
pub fn append_line(path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TodoError::io("create", parent, e))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| TodoError::io("open", path, e))?;

    let mut record = String::with_capacity(line.len() + 1);
    record.push_str(line);
    record.push('\n');
    file.write_all(record.as_bytes())
        .map_err(|e| TodoError::io("write", path, e))?;
    debug!(path = %path.display(), "appended record");
    Ok(())
}

/// Open `path` for lazy line-by-line reading. A missing file is `Ok(None)`.
pub fn read_lines(path: &Path) -> Result<Option<Lines<BufReader<File>>>> {
    match File::open(path) {
        Ok(file) => Ok(Some(BufReader::new(file).lines())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "file not found");
            Ok(None)
        }
        Err(e) => Err(TodoError::io("open", path, e)),
    }
}
