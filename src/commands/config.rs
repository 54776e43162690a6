//! Configuration inspection.

use std::path::Path;

use statnot::config::Config;

use super::CommandResult;

/// Print the effective configuration (or the defaults) as TOML.
pub fn print(path: &Path, defaults: bool) -> CommandResult {
    let config = if defaults {
        Config::default()
    } else {
        Config::load(path)?
    };
    println!("# {}", path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}
