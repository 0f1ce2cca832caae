use anyhow::{bail, Context, Result};

use crate::session::DEFAULT_IDLE_TTL_MINUTES;

/// Application configuration loaded from environment variables.
/// Startup aborts if no OpenAI API key can be resolved.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Sessions idle longer than this are dropped.
    pub session_idle_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            openai_api_key: resolve_api_key(&lookup)?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            session_idle_minutes: match lookup("SESSION_IDLE_MINUTES") {
                Some(raw) => raw
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|m| *m > 0)
                    .context("SESSION_IDLE_MINUTES must be a positive number of minutes")?,
                None => DEFAULT_IDLE_TTL_MINUTES,
            },
        })
    }
}

/// `OPENAI_API_KEY` wins; otherwise read the secret file named by
/// `OPENAI_API_KEY_FILE` (mounted secrets).
fn resolve_api_key<F>(lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = non_empty(lookup("OPENAI_API_KEY")) {
        return Ok(key);
    }

    if let Some(path) = non_empty(lookup("OPENAI_API_KEY_FILE")) {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read OPENAI_API_KEY_FILE at '{path}'"))?;
        if let Some(key) = non_empty(Some(contents)) {
            return Ok(key);
        }
        bail!("OPENAI_API_KEY_FILE '{path}' is empty");
    }

    bail!("API key not found. Set OPENAI_API_KEY in the environment or .env, or point OPENAI_API_KEY_FILE at a secret file")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "9000")])).unwrap_err();
        assert!(err.to_string().contains("API key not found"));
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let result = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "   ")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.session_idle_minutes, 120);
    }

    #[test]
    fn test_session_idle_minutes_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("SESSION_IDLE_MINUTES", "45"),
        ]))
        .unwrap();
        assert_eq!(config.session_idle_minutes, 45);

        for bad in ["0", "-5", "soon"] {
            let result = Config::from_lookup(lookup_from(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("SESSION_IDLE_MINUTES", bad),
            ]));
            assert!(result.is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("PORT", "not-a-port"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_api_key_read_from_secret_file() {
        let mut secret = tempfile::NamedTempFile::new().unwrap();
        writeln!(secret, "sk-from-file").unwrap();

        let path = secret.path().to_string_lossy().to_string();
        let config =
            Config::from_lookup(lookup_from(&[("OPENAI_API_KEY_FILE", path.as_str())])).unwrap();
        assert_eq!(config.openai_api_key, "sk-from-file");
    }

    #[test]
    fn test_env_key_wins_over_secret_file() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-env"),
            ("OPENAI_API_KEY_FILE", "/nonexistent/careerkit/secret"),
        ]))
        .unwrap();
        assert_eq!(config.openai_api_key, "sk-env");
    }

    #[test]
    fn test_missing_secret_file_is_fatal() {
        let result = Config::from_lookup(lookup_from(&[(
            "OPENAI_API_KEY_FILE",
            "/nonexistent/careerkit/secret",
        )]));
        assert!(result.is_err());
    }
}
