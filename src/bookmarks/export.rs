use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Default stem for rewritten exports
pub const OUTPUT_PREFIX: &str = "bookmarks_updated";

/// Reads a bookmarks export from disk
pub fn read_document(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read bookmarks file {}", path.display()))?;
    info!("Loaded {} ({} bytes)", path.display(), content.len());

    // Exports saved from some browsers start with a BOM
    Ok(match content.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// `<prefix>_<YYYY-MM-DD>.html`, with anything unsafe for a file name removed
pub fn output_file_name(prefix: &str, date: NaiveDate) -> String {
    let name = format!("{}_{}.html", prefix, date.format("%Y-%m-%d"));
    sanitize_filename::sanitize(name)
}

/// Today's date on this machine, used to name the output
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Writes the rewritten export into `dir` and returns its path
pub fn write_document(dir: &Path, prefix: &str, content: &str, date: NaiveDate) -> Result<PathBuf> {
    if content.is_empty() {
        error!("Refusing to write an empty bookmarks file");
        bail!("No updated content to write");
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = dir.join(output_file_name(prefix, date));
    fs::write(&path, content)
        .with_context(|| format!("Failed to write bookmarks file {}", path.display()))?;

    info!("Wrote updated bookmarks to {}", path.display());
    Ok(path)
}
