use anyhow::Result;

use crate::Context;
use crate::config::{self, Config, ENV_BEARER_TOKEN};
use crate::ui;

/// Print the effective configuration as TOML on stdout.
pub fn show(ctx: &Context, config: &Config) -> Result<()> {
    print!("{}", config.to_toml()?);

    if ctx.quiet {
        return Ok(());
    }

    match config::default_path() {
        Ok(path) if path.exists() => ui::dim(&format!("default file: {}", path.display())),
        Ok(path) => ui::dim(&format!("default file: {} (not present)", path.display())),
        Err(e) => log::debug!("no default config path: {e}"),
    }
    ui::dim(&format!("endpoint: {}", config.endpoint()));
    if config.bearer_token.is_some() {
        ui::dim(&format!("bearer token: set from {ENV_BEARER_TOKEN}"));
    } else {
        ui::warn(&format!("bearer token: {ENV_BEARER_TOKEN} is not set"));
    }
    Ok(())
}
