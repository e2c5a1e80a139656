use anyhow::Result;
use clap::ValueEnum;
use strata_config::Resolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SettingsFormat {
    Json,
    Yaml,
}

pub fn handle_settings(config: &Resolver, format: SettingsFormat) -> Result<()> {
    let settings = config.all_settings();
    let rendered = match format {
        SettingsFormat::Json => serde_json::to_string_pretty(&settings)?,
        SettingsFormat::Yaml => serde_yaml::to_string(&settings)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
