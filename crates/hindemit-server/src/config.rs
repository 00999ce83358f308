//! Environment-driven server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use hindemit_openrouter::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

pub const DEFAULT_CHAT_SYSTEM_PROMPT: &str = "\
Du bist Hindemit AI, ein freundlicher und hilfsbereiter Assistent. \
Antworte präzise und auf Deutsch, außer der Benutzer schreibt in einer anderen Sprache.";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Secret provider key. Absent keys disable chat and suggestions but
    /// the page and static endpoints keep working.
    pub api_key: Option<String>,
    pub base_url: String,
    pub request_timeout: Duration,
    /// Optional file overriding the built-in starter questions.
    pub suggestions_file: Option<PathBuf>,
    pub chat_system_prompt: String,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("HINDEMIT_BIND")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| eyre::eyre!("invalid HINDEMIT_BIND: {e}"))?;

        let request_timeout = match get("HINDEMIT_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|e| eyre::eyre!("invalid HINDEMIT_REQUEST_TIMEOUT_SECS {raw:?}: {e}"))?;
                if secs == 0 {
                    return Err(eyre::eyre!("HINDEMIT_REQUEST_TIMEOUT_SECS must be positive"));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            bind_addr,
            api_key: get("OPENROUTER_API_KEY").map(|k| k.trim().to_string()),
            base_url: get("OPENROUTER_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout,
            suggestions_file: get("HINDEMIT_SUGGESTIONS_FILE").map(PathBuf::from),
            chat_system_prompt: get("HINDEMIT_CHAT_SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_CHAT_SYSTEM_PROMPT.to_string()),
        })
    }
}
