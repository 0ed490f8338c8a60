// Runtime configuration read from the environment.
//
// ATTENDANCE_DATA_DIR     directory holding the persisted document (default ./data)
// ATTENDANCE_LISTEN_ADDR  socket address the HTTP server binds (default 127.0.0.1:8080)

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const DATA_DIR_VAR: &str = "ATTENDANCE_DATA_DIR";
pub const LISTEN_ADDR_VAR: &str = "ATTENDANCE_LISTEN_ADDR";

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} is not a socket address: {value}")]
    InvalidListenAddr { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub listen_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        let raw_addr = lookup(LISTEN_ADDR_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = raw_addr
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr {
                var: LISTEN_ADDR_VAR,
                value: raw_addr.clone(),
            })?;
        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            listen_addr,
        })
    }
}
