//! Input module for reading URL and domain lists
//!
//! Both readers are thin: they turn a text file into an ordered list of
//! strings and leave every decision about those strings to the expander.

use std::path::Path;

/// Reads the URL list, one URL per line
///
/// Blank lines are kept so the output file lines up with the input file.
pub fn read_urls(path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_urls(&content))
}

/// Splits text into URLs, stripping surrounding spaces from each line
pub fn parse_urls(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim_matches(' ').to_string())
        .collect()
}

/// Reads a domain allow-list file
///
/// # Arguments
///
/// * `path` - A flat list of domain substrings, one per record
/// * `has_header` - Skip the first record
pub fn read_domains(path: &Path, has_header: bool) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_domains(&content, has_header))
}

/// Parses domain records, dropping the header, separators and blank records
pub fn parse_domains(content: &str, has_header: bool) -> Vec<String> {
    content
        .lines()
        .skip(usize::from(has_header))
        .map(|line| line.trim_matches(|c: char| c == ',' || c.is_whitespace()))
        .filter(|domain| !domain.is_empty())
        .map(str::to_string)
        .collect()
}
