//! Utility functions for neurohr
//!
//! This module provides common helpers used throughout the project.

use crate::error::{HrError, Result};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Get lower-cased file extension from path
pub fn get_file_extension<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Check whether a path has the given extension (case-insensitive)
pub fn has_extension<P: AsRef<Path>>(path: P, extension: &str) -> bool {
    get_file_extension(path).is_some_and(|ext| ext == extension)
}

/// Derive a document identifier from a file name: everything before the first `.`
pub fn document_id_from_file_name(file_name: &str) -> String {
    file_name
        .split('.')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// List files in `dir` with the given extension, sorted by name
pub fn list_files_with_extension<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Create directory if it doesn't exist
pub fn ensure_directory<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if !path.exists() {
        std::fs::create_dir_all(path).map_err(HrError::Io)?;
    }

    Ok(())
}

/// Timestamp suitable for file names (`YYYYMMDD_HHMMSS`)
pub fn file_timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Escape special characters for safe file naming
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Wrap every paragraph of `text` to at most `width` columns
pub fn format_text(text: &str, width: usize) -> String {
    text.split('\n')
        .map(|paragraph| wrap_paragraph(paragraph, width))
        .collect::<Vec<_>>()
        .join("\n")
}

fn wrap_paragraph(paragraph: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in paragraph.split_whitespace() {
        let current_len = current.chars().count();
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

/// Append a timestamped, wrapped entry to a flat log file
pub fn append_log_entry<P: AsRef<Path>>(log_file: P, title: &str, text: &str) -> Result<()> {
    let time_now = Local::now().format("%Y-%m-%d %H:%M");
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file.as_ref())?;
    write!(file, "\n\n{}. {}.\n\n{}", time_now, title, format_text(text, 120))?;
    log::info!("Log entry written: {}", title);
    Ok(())
}
