use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) =
            std::env::var("ANTHROPIC_API_KEY").or_else(|_| std::env::var("AFTERWORD_API_KEY"))
            && !key.trim().is_empty()
        {
            self.provider.api_key = Some(key);
        }

        if let Ok(model) = std::env::var("AFTERWORD_MODEL")
            && !model.is_empty()
        {
            self.provider.model = model;
        }

        if let Ok(port_str) =
            std::env::var("AFTERWORD_GATEWAY_PORT").or_else(|_| std::env::var("PORT"))
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Ok(host) =
            std::env::var("AFTERWORD_GATEWAY_HOST").or_else(|_| std::env::var("HOST"))
            && !host.is_empty()
        {
            self.gateway.host = host;
        }

        if let Ok(command) = std::env::var("AFTERWORD_MCP_COMMAND")
            && !command.is_empty()
        {
            self.mcp.command = command;
        }

        if let Ok(level) = std::env::var("AFTERWORD_LOG_LEVEL")
            && !level.is_empty()
        {
            self.log_level = level;
        }
    }
}
