use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub crm: CrmConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Settings for the chat-completion model. The API key itself is
/// per-tenant and resolved at request time, never from this file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model: String,
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Limits governing a single chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Maximum number of tool-call rounds before the loop is forced into a
    /// final tool-free model call.
    pub max_tool_rounds: u32,
    /// Default result cap for contact searches.
    pub contact_search_limit: u32,
    /// Default page size forwarded to remote listing tools.
    pub remote_page_size: u32,
    /// Per-tool-call timeout.
    pub tool_timeout_seconds: u64,
    /// Overall turn timeout enforced around the whole orchestration.
    pub turn_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmConfig {
    /// Base URL of the CRM's MCP tool endpoint.
    pub mcp_url: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub database_url: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            base_url: None,
            max_tokens: Some(1000),
            temperature: Some(0.7),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: 3,
            contact_search_limit: 50,
            remote_page_size: 100,
            tool_timeout_seconds: 30,
            turn_timeout_seconds: 120,
        }
    }
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            mcp_url: "https://services.leadconnectorhq.com/mcp/".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            database_url: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            assistant: AssistantConfig::default(),
            crm: CrmConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Check if any config file exists
        let config_exists = if let Some(path) = config_path {
            Path::new(path).exists()
        } else {
            default_config_paths().iter().any(|path| {
                let expanded_path = shellexpand::tilde(path);
                Path::new(expanded_path.as_ref()).exists()
            })
        };

        // If no config exists, create and save a default config
        if !config_exists {
            let default_config = Self::default();

            let config_dir = dirs::home_dir()
                .map(|mut path| {
                    path.push(".config");
                    path.push("deskhand");
                    path
                })
                .unwrap_or_else(|| std::path::PathBuf::from("."));

            std::fs::create_dir_all(&config_dir).ok();

            let config_file = config_dir.join("config.toml");
            if let Some(path) = config_file.to_str() {
                if let Err(e) = default_config.save(path) {
                    eprintln!("Warning: Could not save default config: {}", e);
                }
            }

            return Ok(default_config);
        }

        // Load config from file
        let config_path_to_load = if let Some(path) = config_path {
            Some(path.to_string())
        } else {
            default_config_paths().iter().find_map(|path| {
                let expanded_path = shellexpand::tilde(path);
                if Path::new(expanded_path.as_ref()).exists() {
                    Some(expanded_path.to_string())
                } else {
                    None
                }
            })
        };

        if let Some(path) = config_path_to_load {
            let config_content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&config_content)?;
            config.validate()?;
            return Ok(config);
        }

        Ok(Self::default())
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    /// Reject limit values that would make the orchestrator degenerate.
    pub fn validate(&self) -> Result<()> {
        if self.assistant.max_tool_rounds == 0 {
            anyhow::bail!("assistant.max_tool_rounds must be at least 1");
        }
        if self.assistant.contact_search_limit == 0 {
            anyhow::bail!("assistant.contact_search_limit must be at least 1");
        }
        if self.crm.mcp_url.is_empty() {
            anyhow::bail!("crm.mcp_url must not be empty");
        }
        Ok(())
    }
}

fn default_config_paths() -> [&'static str; 3] {
    [
        "./deskhand.toml",
        "~/.config/deskhand/config.toml",
        "~/.deskhand.toml",
    ]
}

#[cfg(test)]
mod tests;
