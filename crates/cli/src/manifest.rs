use anyhow::{Context, Result, bail};
use cmdspec_metadata::Manifest;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST_NAME: &str = "cmdspec.json";

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    if !path.exists() {
        bail!(
            "manifest not found: {} (run `cmdspec init` to create one)",
            path.display()
        );
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest: {}", path.display()))?;
    let manifest = Manifest::from_json(&contents)
        .with_context(|| format!("failed to parse manifest JSON: {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        commands = manifest.commands.len(),
        "loaded manifest"
    );
    Ok(manifest)
}

pub fn write_default_manifest(project_dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = project_dir.join(DEFAULT_MANIFEST_NAME);
    if dest.exists() && !overwrite {
        bail!(
            "{} already exists (use --force to overwrite)",
            dest.display()
        );
    }

    fs::create_dir_all(project_dir)
        .with_context(|| format!("failed to create directory: {}", project_dir.display()))?;

    let mut out =
        serde_json::to_string_pretty(&Manifest::example()).context("failed to serialize manifest")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}
