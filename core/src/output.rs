//! Artifact serialization.
//!
//! Every file the engine produces (snapshots, window artifacts, the
//! consensus list) goes through [`write_lines`]: newline-delimited with a
//! trailing newline, written to a temp sibling and renamed into place so a
//! concurrent reader sees either the old bytes or the new bytes, never a
//! prefix. An empty line set produces an empty file.

use std::fs;
use std::path::Path;

use anyhow::Context;

pub fn write_lines(path: &Path, lines: &[String]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut body = lines.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, body).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
