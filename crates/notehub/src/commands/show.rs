//! Print the resolved configuration.

use anyhow::Result;

use super::ConfigSource;
use crate::Format;

/// Run the show command.
pub fn run(source: &ConfigSource, format: Format) -> Result<()> {
    let config = source.load()?;

    let rendered = match format {
        Format::Toml => config.to_toml_string()?,
        Format::Json => config.to_json_string()?,
    };
    println!("{}", rendered);

    Ok(())
}
