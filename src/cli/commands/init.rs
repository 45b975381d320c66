use crate::adapters::history::json_history_store::JsonHistoryStore;
use crate::cli::context;
use crate::cli::output;
use crate::config::app_config::{AppConfig, CONFIG_FILE};
use crate::core::errors::{Result, ToolkitError};
use crate::core::traits::history::HistoryStore;

/// Execute the `csirt-pgp init` command.
///
/// Creates the data directory with a default `config.toml` and an empty
/// history file. An existing config is never overwritten.
pub fn execute() -> Result<()> {
    let data_dir = context::data_dir();
    let config_path = data_dir.join(CONFIG_FILE);

    if config_path.exists() {
        return Err(ToolkitError::InvalidConfig {
            detail: format!(
                "csirt-pgp is already initialized ({} exists)",
                config_path.display()
            ),
        });
    }

    output::header("csirt-pgp — Initializing data directory");

    std::fs::create_dir_all(data_dir)?;
    output::success(&format!("Created {}", data_dir.display()));

    let config = AppConfig::default();
    std::fs::write(&config_path, config.to_toml()?)?;
    output::success(&format!("Generated {CONFIG_FILE} with defaults"));

    let store = JsonHistoryStore::new(data_dir, &config.history.file);
    store.initialize_if_absent()?;
    output::success(&format!("Created empty history at {}", store.path().display()));

    println!(
        "\n  Export {} (and {} if the key is protected) before decrypting.",
        config.key.fragment_vars.join(", "),
        config.key.passphrase_var
    );
    Ok(())
}
