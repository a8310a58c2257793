//! Result file writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one result per line, each terminated by a newline
///
/// # Arguments
///
/// * `path` - Destination file, created or truncated
/// * `urls` - Results in input order
pub fn write_results<S: AsRef<str>>(path: &Path, urls: &[S]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for url in urls {
        out.write_all(url.as_ref().as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()
}
