//! Workflow init step.
//!
//! Writes the shipped config and a store seeded with the default users.
use crate::cli::InitArgs;
use crate::config::{
    default_config, default_users, resolve_data_dir, write_config, DataDirPaths,
};
use crate::service::{Dataset, JsonFileService};
use anyhow::{anyhow, Context, Result};

pub fn run_init(args: InitArgs) -> Result<()> {
    let paths = DataDirPaths::new(resolve_data_dir(args.data.data_dir.as_deref())?);
    init_data_dir(&paths, args.force)?;
    println!("wrote {}", paths.config_path().display());
    println!("wrote {}", paths.store_path().display());
    Ok(())
}

fn init_data_dir(paths: &DataDirPaths, force: bool) -> Result<()> {
    for path in [paths.config_path(), paths.store_path()] {
        if path.is_file() && !force {
            return Err(anyhow!(
                "{} already exists (use --force to overwrite)",
                path.display()
            ));
        }
    }
    let config = default_config()?;
    let users = default_users(&config)?;
    write_config(paths, &config)?;
    let data = Dataset {
        users,
        ..Dataset::default()
    };
    JsonFileService::new(paths.store_path())
        .init(&data)
        .context("write store")?;
    tracing::info!(root = %paths.root().display(), "data dir initialized");
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
