use std::{net::SocketAddr, path::PathBuf, str::FromStr};

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub upload_url_prefix: String,
    pub blob_connection_string: Option<String>,
    pub blob_container: String,
    pub cast_list_ttl_secs: u64,
    pub default_page_limit: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = parse(&var, "PORT", 3000)?;

        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| "sqlite://cinemadesk.db?mode=rwc".to_string());

        let upload_dir = var("UPLOAD_DIR").unwrap_or_else(|| "wwwroot/uploads".to_string()).into();
        let upload_url_prefix = var("UPLOAD_URL_PREFIX").unwrap_or_else(|| "/uploads".to_string());

        let blob_connection_string =
            var("AZURE_STORAGE_CONNECTION_STRING").filter(|s| !s.trim().is_empty());
        let blob_container =
            var("AZURE_STORAGE_CONTAINER").unwrap_or_else(|| "uploads".to_string());

        let cast_list_ttl_secs: u64 = parse(&var, "CAST_LIST_TTL_SECS", 600)?;

        let default_page_limit: i64 = parse(&var, "DEFAULT_PAGE_LIMIT", 10)?;
        anyhow::ensure!(default_page_limit > 0, "DEFAULT_PAGE_LIMIT must be positive");

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            upload_dir,
            upload_url_prefix,
            blob_connection_string,
            blob_container,
            cast_list_ttl_secs,
            default_page_limit,
        })
    }
}

/// Unset or blank falls back to `default`; anything else must parse.
fn parse<T>(var: impl Fn(&str) -> Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(name).filter(|s| !s.trim().is_empty()) {
        Some(raw) => raw.trim().parse().with_context(|| format!("{name}={raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.cast_list_ttl_secs, 600);
        assert_eq!(config.default_page_limit, 10);
        assert_eq!(config.blob_connection_string, None);
    }

    #[test]
    fn numeric_values_are_read() {
        let config = config(&[("PORT", "8080"), ("CAST_LIST_TTL_SECS", "30")]).unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.cast_list_ttl_secs, 30);
    }

    #[test]
    fn unparseable_ttl_is_an_error() {
        let err = config(&[("CAST_LIST_TTL_SECS", "ten minutes")]).unwrap_err();
        assert!(err.to_string().contains("CAST_LIST_TTL_SECS"));
    }

    #[test]
    fn unparseable_port_is_an_error() {
        let err = config(&[("PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn page_limit_must_be_positive() {
        assert!(config(&[("DEFAULT_PAGE_LIMIT", "0")]).is_err());
        assert!(config(&[("DEFAULT_PAGE_LIMIT", "lots")]).is_err());
    }

    #[test]
    fn blank_connection_string_means_local_uploads() {
        let config = config(&[("AZURE_STORAGE_CONNECTION_STRING", "  ")]).unwrap();
        assert_eq!(config.blob_connection_string, None);
    }
}
