use anyhow::Context;
use buddies_core::{config::Config, io, paths};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "buddies".to_string());

    println!("Initializing ballot buddies in: {}", root.display());

    let dirs = [
        paths::BUDDIES_DIR,
        paths::VOTERS_DIR,
        paths::PROFILES_DIR,
        paths::MESSAGES_DIR,
        paths::OUTBOX_DIR,
    ];
    for dir in dirs {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    let config_path = paths::config_path(root);
    if !config_path.exists() {
        let config = Config::new(&project_name);
        config.save(root).context("failed to write config.yaml")?;
        println!("  created: .buddies/config.yaml");
    } else {
        println!("  exists:  .buddies/config.yaml");
    }

    Ok(())
}
