use crate::domain::error::DomainError;
use crate::logging::LogFormat;

pub const DEFAULT_DB_PATH: &str = "./trades.db";
/// Serverless hosts (Vercel) only allow writes under /tmp.
pub const SERVERLESS_DB_PATH: &str = "/tmp/trades.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Sqlite { path: String },
    Supabase { url: String, key: String },
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Sqlite { .. } => "sqlite",
            Backend::Supabase { .. } => "supabase",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend: Backend,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let supabase_url = lookup("SUPABASE_URL").filter(|s| !s.is_empty());
        let backend_name = lookup("TRADE_LEDGER_BACKEND").unwrap_or_else(|| {
            if supabase_url.is_some() {
                "supabase".into()
            } else {
                "sqlite".into()
            }
        });

        let backend = match backend_name.to_lowercase().as_str() {
            "sqlite" => {
                let path = lookup("TRADE_LEDGER_DB").unwrap_or_else(|| {
                    if lookup("VERCEL").is_some() {
                        SERVERLESS_DB_PATH.into()
                    } else {
                        DEFAULT_DB_PATH.into()
                    }
                });
                Backend::Sqlite { path }
            }
            "supabase" => {
                let url = supabase_url.ok_or("SUPABASE_URL must be set for the supabase backend")?;
                let key = lookup("SUPABASE_KEY")
                    .filter(|s| !s.is_empty())
                    .ok_or("SUPABASE_KEY must be set for the supabase backend")?;
                Backend::Supabase { url, key }
            }
            other => {
                return Err(DomainError::InvalidInput(format!(
                    "Unknown TRADE_LEDGER_BACKEND: {other}"
                )))
            }
        };

        let log_format = lookup("TRADE_LEDGER_LOG")
            .map(|s| s.parse::<LogFormat>())
            .transpose()
            .map_err(DomainError::InvalidInput)?
            .unwrap_or_default();

        Ok(Self {
            backend,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, DomainError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_to_local_sqlite() {
        let cfg = config(&[]).unwrap();
        assert_eq!(
            cfg.backend,
            Backend::Sqlite {
                path: DEFAULT_DB_PATH.into()
            }
        );
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_vercel_uses_tmp() {
        let cfg = config(&[("VERCEL", "1")]).unwrap();
        assert_eq!(
            cfg.backend,
            Backend::Sqlite {
                path: SERVERLESS_DB_PATH.into()
            }
        );
    }

    #[test]
    fn test_supabase_selected_by_url() {
        let cfg = config(&[
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_KEY", "secret"),
            ("TRADE_LEDGER_LOG", "json"),
        ])
        .unwrap();
        assert_eq!(cfg.backend.name(), "supabase");
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn test_supabase_requires_key() {
        let err = config(&[("TRADE_LEDGER_BACKEND", "supabase"), ("SUPABASE_URL", "https://x")])
            .unwrap_err();
        assert!(err.to_string().contains("SUPABASE_KEY"));
    }

    #[test]
    fn test_unknown_backend() {
        assert!(config(&[("TRADE_LEDGER_BACKEND", "mongo")]).is_err());
    }
}
