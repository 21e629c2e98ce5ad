//! `agentrelay init`: write a starter config file.

use agentrelay_config::RelayConfig;
use std::path::Path;

pub fn run(config_path: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if config_path.exists() && !force {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or re-run with --force.");
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(config_path, RelayConfig::default_toml())?;

    println!("✅ Created config at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Pick a model for each agent under [agents.*]");
    println!("   2. Make sure Ollama is running at the configured url");
    println!("   3. Run: agentrelay --challenge \"...\"");
    Ok(())
}
