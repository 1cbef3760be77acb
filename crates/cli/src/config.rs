//! JSON configuration file: `{ "dpw": { <Params fields> } }`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use dpw::Params;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    dpw: Params,
}

/// Read a config file; missing fields take the `Params` defaults.
pub fn load(path: &Path) -> Result<Params> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    let file: ConfigFile = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(file.dpw)
}

pub fn save(path: &Path, params: &Params) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating config dir {}", parent.display()))?;
        }
    }
    let doc = ConfigFile {
        dpw: params.clone(),
    };
    fs::write(path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing config {}", path.display()))?;
    Ok(())
}

/// Write the default config unless the file exists (or `force`).
pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    save(path, &Params::default())
}
