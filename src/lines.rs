//! Line-oriented file reading and writing for sources and documents.

use std::path::Path;

use crate::error::Error;

/// Read a file as an ordered list of lines, without line terminators.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the file doesn't exist,
/// or `Error::Io` for other read failures.
pub fn read_lines(path: &Path) -> Result<Vec<String>, Error> {
    let content = match std::fs::read_to_string(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::FileNotFound { path: path.to_path_buf() });
        },
        Err(e) => return Err(Error::Io(e)),
        Ok(c) => c,
    };
    return Ok(content.lines().map(String::from).collect());
}

/// Write lines to a file, each terminated by a newline.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be written.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<(), Error> {
    let mut output = String::with_capacity(lines.iter().map(|l| return l.len().saturating_add(1)).sum());
    for line in lines {
        output.push_str(line);
        output.push('\n');
    }
    std::fs::write(path, output)?;
    return Ok(());
}
