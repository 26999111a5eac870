//! Identify command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use re5scan_core::{MonitorConfig, ProcessHandle, digest_file, version_for_digest};
use tracing::warn;

/// Hash an image (or the running game's image) and print its build
pub fn run(path: Option<&Path>, config: &MonitorConfig) -> Result<()> {
    let path: PathBuf = match path {
        Some(path) => path.to_path_buf(),
        None => match ProcessHandle::find(&config.process_name)? {
            Some(process) => process.image_path.clone(),
            None => bail!(
                "{} is not running; pass the path of an executable",
                config.process_name
            ),
        },
    };

    let digest = digest_file(&path)?;
    let version = version_for_digest(&digest);

    println!("Image:   {}", path.display());
    println!("SHA-256: {}", digest);
    println!("Version: {}", version);

    if !version.is_known() {
        warn!("Unrecognized build; the scanner will not attach to it");
    }

    Ok(())
}
