use std::{env, net::SocketAddr, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_RECORDS_PATH: &str = "data/records.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub records_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            records_path: PathBuf::from(DEFAULT_RECORDS_PATH),
        }
    }
}

impl ServerConfig {
    /// `PORT` and `SPORTS_ADMIN_DATA` override the defaults; an unparseable
    /// port keeps the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(port) = env::var("PORT").ok().and_then(|value| value.parse().ok()) {
            config.port = port;
        }
        if let Ok(path) = env::var("SPORTS_ADMIN_DATA") {
            config.records_path = PathBuf::from(path);
        }
        config
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
