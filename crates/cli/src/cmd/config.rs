//! Show configuration

use crate::system_config::{self, SystemConfig};
use anyhow::Result;
use std::path::Path;

pub fn run(
    config: &SystemConfig,
    config_path: Option<&Path>,
    path_only: bool,
    example: bool,
) -> Result<()> {
    if path_only {
        match config_path
            .map(Path::to_path_buf)
            .or_else(system_config::config_file_path)
        {
            Some(p) => println!("{}", p.display()),
            None => println!("(no config directory on this platform)"),
        }
        return Ok(());
    }

    if example {
        print!("{}", system_config::render(&SystemConfig::default())?);
    } else {
        print!("{}", system_config::render(config)?);
    }
    Ok(())
}
