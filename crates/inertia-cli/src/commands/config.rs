use std::path::Path;

use anyhow::Result;

use inertia_core::AppConfig;

pub fn run(config: &AppConfig, path: &Path) -> Result<()> {
    let source = if path.exists() { "" } else { " (not found, showing defaults)" };
    println!("# {}{}\n", path.display(), source);
    print!("{}", config.to_toml()?);
    Ok(())
}
