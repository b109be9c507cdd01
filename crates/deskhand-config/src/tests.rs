#[cfg(test)]
mod tests {
    use crate::Config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_full_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let config_content = r#"
[model]
model = "gpt-4o-mini"
max_tokens = 500
temperature = 0.2

[assistant]
max_tool_rounds = 5
contact_search_limit = 25
remote_page_size = 100
tool_timeout_seconds = 10
turn_timeout_seconds = 60

[crm]
mcp_url = "https://crm.example.com/mcp/"
request_timeout_seconds = 15

[server]
bind_addr = "0.0.0.0:9000"
database_url = "postgres://localhost/deskhand"
"#;

        fs::write(&config_path, config_content).unwrap();

        let config = Config::load(Some(config_path.to_str().unwrap())).unwrap();

        assert_eq!(config.model.model, "gpt-4o-mini");
        assert_eq!(config.model.max_tokens, Some(500));
        assert_eq!(config.assistant.max_tool_rounds, 5);
        assert_eq!(config.assistant.contact_search_limit, 25);
        assert_eq!(config.crm.mcp_url, "https://crm.example.com/mcp/");
        assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
        assert_eq!(
            config.server.database_url.as_deref(),
            Some("postgres://localhost/deskhand")
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.assistant.max_tool_rounds, 3);
        assert_eq!(config.assistant.contact_search_limit, 50);
        assert_eq!(config.assistant.remote_page_size, 100);
        assert_eq!(config.model.model, "gpt-4o");
        assert!(config.server.database_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad_config.toml");

        let config_content = r#"
[model]
model = "gpt-4o"

[assistant]
max_tool_rounds = 0
contact_search_limit = 50
remote_page_size = 100
tool_timeout_seconds = 30
turn_timeout_seconds = 120

[crm]
mcp_url = "https://crm.example.com/mcp/"
request_timeout_seconds = 15

[server]
bind_addr = "127.0.0.1:8080"
"#;

        fs::write(&config_path, config_content).unwrap();

        let result = Config::load(Some(config_path.to_str().unwrap()));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("max_tool_rounds"));
    }

    #[test]
    fn test_save_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("saved.toml");

        let mut config = Config::default();
        config.assistant.max_tool_rounds = 7;
        config.save(config_path.to_str().unwrap()).unwrap();

        let reloaded = Config::load(Some(config_path.to_str().unwrap())).unwrap();
        assert_eq!(reloaded.assistant.max_tool_rounds, 7);
    }
}
