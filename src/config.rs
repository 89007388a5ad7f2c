use crate::error::ConfigError;
use std::path::PathBuf;

pub const API_URL_VAR: &str = "QUIZ_API_URL";
/// TrueType fonts for PDF export, joined like `PATH`.
pub const PDF_FONTS_VAR: &str = "QUIZ_PDF_FONTS";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const LOG_FILE: &str = "quiz_debug.log";
pub const EXPORT_FILE_NAME: &str = "quiz.pdf";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub log_file: PathBuf,
    pub export_path: PathBuf,
    pub pdf_fonts: Vec<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(API_URL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let parsed = reqwest::Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
            value: raw.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                value: raw,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let pdf_fonts = lookup(PDF_FONTS_VAR)
            .map(|v| {
                std::env::split_paths(v.trim())
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            api_base_url: raw.trim_end_matches('/').to_string(),
            log_file: PathBuf::from(LOG_FILE),
            export_path: PathBuf::from(EXPORT_FILE_NAME),
            pdf_fonts,
        })
    }
}
