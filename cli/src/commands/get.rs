use anyhow::{bail, Result};
use strata_config::Resolver;

pub fn handle_get(config: &Resolver, key: &str) -> Result<()> {
    match config.get(key) {
        Some(value) => {
            println!("{}", value);
            Ok(())
        }
        None => bail!("key '{}' is not set", key),
    }
}
