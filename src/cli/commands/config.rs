use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();
        let path_str = path.to_string_lossy().to_string();

        if *print_config {
            if path.exists() {
                info(format!("Configuration file: {}", path_str));
                ConfigLogic::print(&path_str)?;
            } else {
                warning("No configuration file found, effective defaults:");
                println!("{}", serde_yaml::to_string(cfg)?);
            }
        }

        if *edit_config {
            ConfigLogic::edit(&path_str, editor)?;
            // re-read to surface mistakes right away
            Config::load_from(&path)?;
            success("Configuration saved.");
        }
    }

    Ok(())
}
