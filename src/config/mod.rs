use crate::core::clock::ClockSettings;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_context")]
    pub context: String,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_marker_max_age_hours")]
    pub marker_max_age_hours: i64,
    #[serde(default = "default_marker_tolerance_minutes")]
    pub marker_tolerance_minutes: i64,
}

fn default_context() -> String {
    "default".to_string()
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_marker_max_age_hours() -> i64 {
    24
}
fn default_marker_tolerance_minutes() -> i64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            context: default_context(),
            tick_interval_ms: default_tick_interval_ms(),
            marker_max_age_hours: default_marker_max_age_hours(),
            marker_tolerance_minutes: default_marker_tolerance_minutes(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rworkclock")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rworkclock")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rworkclock.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rworkclock.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(AppError::Config("tick_interval_ms must be > 0".into()));
        }
        if self.marker_max_age_hours <= 0 {
            return Err(AppError::Config("marker_max_age_hours must be > 0".into()));
        }
        if self.marker_tolerance_minutes < 0 {
            return Err(AppError::Config(
                "marker_tolerance_minutes must be >= 0".into(),
            ));
        }
        Ok(())
    }

    pub fn clock_settings(&self) -> ClockSettings {
        ClockSettings {
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            marker_max_age: chrono::Duration::hours(self.marker_max_age_hours),
            marker_tolerance: chrono::Duration::minutes(self.marker_tolerance_minutes),
        }
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<String> {
        let dir = Self::config_dir();

        // DB path: user provided (as given, like every other command) or default
        let db_path = custom_db
            .map(PathBuf::from)
            .unwrap_or_else(Self::database_file);

        // Write config file
        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };
            let yaml = serde_yaml::to_string(&config)?;
            let mut file =
                fs::File::create(Self::config_file()).map_err(|_| AppError::ConfigSave)?;
            file.write_all(yaml.as_bytes())
                .map_err(|_| AppError::ConfigSave)?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(db_path.to_string_lossy().to_string())
    }
}
