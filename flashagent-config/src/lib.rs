//! Loader for the FlashAgent configuration with YAML + environment overlays.
//!
//! The process loads one `flashagent.yaml` at startup and passes the typed
//! result explicitly into the session factory, the task manager, and the
//! result normalizer. A missing or malformed file is a fatal load error,
//! never a runtime concern.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Top-level configuration for the FlashAgent workspace.
#[derive(Debug, Clone, Deserialize)]
pub struct FlashConfig {
    pub agent: AgentSettings,
    pub browser: BrowserSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Bounds applied to every agent run.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentSettings {
    /// Step budget handed to the run operation.
    pub max_steps: u32,
    /// Extracted content at or above this many characters is dropped from
    /// step summaries so page scrapes cannot grow the response unbounded.
    pub max_extracted_content_length: usize,
}

/// Browser session knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

/// Listen address for the health service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8000
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct FlashConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for FlashConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashConfigLoader {
    /// Start with the defaults: `FLASHAGENT__` env overrides on top of
    /// whatever file or inline sources get attached.
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("FLASHAGENT").separator("__"));
        Self { builder }
    }

    /// Attach the configuration file; the `config` crate infers the format
    /// by suffix. The file is required: absence surfaces as a load error.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use flashagent_config::FlashConfigLoader;
    ///
    /// let cfg = FlashConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// agent:
    ///   max_steps: 25
    ///   max_extracted_content_length: 1000
    /// browser:
    ///   user-agent: "Mozilla/5.0"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.agent.max_steps, 25);
    /// assert_eq!(cfg.server.port, 8000);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `${VAR}` placeholders anywhere in the merged tree are expanded
    /// (recursively, depth-capped) before the typed structs materialise, so
    /// secrets like user-agent tokens can live in the environment.
    pub fn load(self) -> Result<FlashConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: FlashConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FA_UA", Some("AgentBot/1.0"), || {
            let mut v = json!("prefix ${FA_UA} suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix AgentBot/1.0 suffix"));
        });
    }

    #[test]
    fn expands_nested_objects() {
        temp_env::with_var("FA_HOST", Some("0.0.0.0"), || {
            let mut v = json!({ "server": { "host": "${FA_HOST}", "port": 8000 } });
            expand_env_in_value(&mut v);
            assert_eq!(v, json!({ "server": { "host": "0.0.0.0", "port": 8000 } }));
        });
    }

    #[test]
    fn stops_on_cycles_and_leaves_value_reasonable() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            // Depth cap terminates the walk; the cycle stays unresolved.
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST}"));
    }
}
