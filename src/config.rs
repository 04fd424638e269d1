use std::env;
use std::str::FromStr;

use log::warn;

use crate::blockchain::{DEFAULT_ROUND_SIZE, DEFAULT_TARGET};

/// Node settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Fixed minimum chain length for every block.
    pub chain_target: u32,
    /// Attempts per mining round before yielding.
    pub round_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            chain_target: DEFAULT_TARGET,
            round_size: DEFAULT_ROUND_SIZE,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port, |_| true),
            chain_target: parse_var("CHAIN_TARGET", defaults.chain_target, |v| *v >= 1),
            round_size: parse_var("MINING_ROUND_SIZE", defaults.round_size, |v| *v >= 1),
        }
    }
}

fn parse_var<T>(key: &str, default: T, valid: impl Fn(&T) -> bool) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) if valid(&v) => v,
            _ => {
                warn!("ignoring invalid {key}={raw:?}, using {default}");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variable_uses_default() {
        assert_eq!(parse_var("PRIMECHAIN_TEST_UNSET_VAR", 7u32, |_| true), 7);
    }

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.chain_target, DEFAULT_TARGET);
        assert!(cfg.round_size >= 1);
    }
}
