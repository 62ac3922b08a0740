use anyhow::{Context, Result};
use personalizer_core::config::PersonalizerConfig;
use personalizer_infrastructure::ConfigService;

pub fn show(config: &PersonalizerConfig) -> Result<()> {
    let text = toml::to_string_pretty(config).context("Failed to encode config")?;
    print!("{}", text);
    Ok(())
}

pub fn path(service: &ConfigService) -> Result<()> {
    let path = service
        .path()
        .context("No config directory on this platform")?;
    println!("{}", path.display());
    Ok(())
}

pub fn init(service: &ConfigService, config: &PersonalizerConfig) -> Result<()> {
    service
        .save_config(config)
        .context("Failed to write config file")?;
    if let Some(path) = service.path() {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use personalizer_core::config::BackendKind;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_effective_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(path.clone());

        let mut config = service.get_config();
        config.storage.backend = BackendKind::Memory;
        init(&service, &config).unwrap();

        let written: PersonalizerConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.storage.backend, BackendKind::Memory);
    }
}
