//! Service configuration from the environment

use crate::state_machine::intent::DEFAULT_GREETING;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub port: u16,
    pub greetings: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = var("THREADLINE_DB_PATH").map_or_else(
            || {
                let home = var("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".threadline").join("threadline.db")
            },
            PathBuf::from,
        );

        let port = var("THREADLINE_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let greetings = var("THREADLINE_GREETINGS")
            .map(|raw| raw.split(',').map(|g| g.trim().to_string()).collect())
            .unwrap_or_else(|| vec![DEFAULT_GREETING.to_string()]);

        Self {
            db_path,
            port,
            greetings,
        }
    }
}
