//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

/// Quote a string as a TOML basic string (handles escaping)
fn toml_string(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}

impl Config {
    /// Render configuration as a TOML config file.
    ///
    /// The API key is intentionally absent: it only comes from the environment.
    pub fn to_toml(&self) -> String {
        format!(
            r#"# editor-relay configuration
#
# The upstream credential is read from the OPENAI_API_KEY environment
# variable only and is never stored in this file.

# Relay bind address
bind_addr = {bind}

# Upstream completion endpoint
api_url = {api_url}

# Model identifier sent upstream
model = {model}

# Origin allowed to call the relay (Access-Control-Allow-Origin)
allowed_origin = {origin}

# Persona instructions sent as the system message
system_prompt = {prompt}

[upstream]
connect_timeout_secs = {connect}
read_timeout_secs = {read}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level}
# JSON file logging (in addition to stdout)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = {log_file_prefix}
"#,
            bind = toml_string(&self.bind_addr.to_string()),
            api_url = toml_string(&self.api_url),
            model = toml_string(&self.model),
            origin = toml_string(&self.allowed_origin),
            prompt = toml_string(&self.system_prompt),
            connect = self.upstream.connect_timeout_secs,
            read = self.upstream.read_timeout_secs,
            log_level = toml_string(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = toml_string(&self.logging.file_dir.display().to_string()),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = toml_string(&self.logging.file_prefix),
        )
    }
}
