//! Directory tree rendering.
//!
//! Emulates the classic `tree` command: a header with a timestamp and
//! the absolute root path, then one connector-prefixed line per
//! directory (and optionally per file). Entries are sorted by name so
//! the output is deterministic across platforms.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Default maximum directory depth to descend into.
pub const DEFAULT_MAX_DEPTH: usize = 12;

/// Options for [`write_tree`].
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// List the files inside each directory, not just directories.
    pub show_files: bool,
    /// Directories deeper than this are listed but not descended into.
    pub max_depth: usize,
    /// Use the ASCII glyph set instead of Unicode pipes.
    pub ascii_glyphs: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            show_files: false,
            max_depth: DEFAULT_MAX_DEPTH,
            ascii_glyphs: false,
        }
    }
}

/// One four-column segment per nesting level.
struct Glyphs {
    /// Connector for a directory with following siblings.
    tee: &'static str,
    /// Connector for the last directory among its siblings.
    corner: &'static str,
    /// Continuation under a directory with following siblings.
    pipe: &'static str,
    /// Continuation under the last directory.
    empty: &'static str,
}

const UNICODE_GLYPHS: Glyphs = Glyphs {
    tee: "├───",
    corner: "└───",
    pipe: "│   ",
    empty: "    ",
};

const ASCII_GLYPHS: Glyphs = Glyphs {
    tee: "+---",
    corner: "\\---",
    pipe: "|   ",
    empty: "    ",
};

/// Render a tree view of `path` into `out`.
///
/// # Errors
///
/// Propagates any filesystem or write error uninterpreted.
pub fn write_tree<W: Write>(path: &Path, out: &mut W, config: &TreeConfig) -> io::Result<()> {
    let root = path.canonicalize()?;
    let glyphs = if config.ascii_glyphs {
        &ASCII_GLYPHS
    } else {
        &UNICODE_GLYPHS
    };

    writeln!(out, "{}", chrono::Utc::now().format("%Y %b %d %H:%M:%S"))?;
    writeln!(out, "{}", root.display())?;
    writeln!(out)?;

    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    writeln!(out, "{name}")?;

    walk(&root, "", 0, config, glyphs, out)
}

fn walk<W: Write>(
    dir: &Path,
    prefix: &str,
    depth: usize,
    config: &TreeConfig,
    glyphs: &Glyphs,
    out: &mut W,
) -> io::Result<()> {
    let (dirs, files) = read_sorted(dir)?;

    if config.show_files {
        // Files sit one segment deeper; the segment continues the pipe
        // while subdirectories still follow below.
        let stem = if dirs.is_empty() {
            glyphs.empty
        } else {
            glyphs.pipe
        };
        for file in &files {
            writeln!(out, "{prefix}{stem}{file}")?;
        }
        if !files.is_empty() {
            writeln!(out, "{prefix}{stem}")?;
        }
    }

    for (index, name) in dirs.iter().enumerate() {
        let is_last = index + 1 == dirs.len();
        let connector = if is_last { glyphs.corner } else { glyphs.tee };
        writeln!(out, "{prefix}{connector}{name}")?;

        if depth + 1 < config.max_depth {
            let continuation = if is_last { glyphs.empty } else { glyphs.pipe };
            let child_prefix = format!("{prefix}{continuation}");
            walk(&dir.join(name), &child_prefix, depth + 1, config, glyphs, out)?;
        }
    }

    Ok(())
}

/// Directory entries split into (directories, files), each sorted by
/// name. Symlinks are treated as files to keep the walk cycle-free.
fn read_sorted(dir: &Path) -> io::Result<(Vec<String>, Vec<String>)> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_dir() {
            dirs.push(name);
        } else {
            files.push(name);
        }
    }
    dirs.sort();
    files.sort();
    Ok((dirs, files))
}
