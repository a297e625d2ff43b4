//! Demo configuration, loaded from an optional TOML or JSON file.
//!
//! Every field has a default, and the defaults replay the classic scenario:
//! six map elements, one facade lifecycle, and two keys fetched twice each.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::flyweight::MapElementKind;
use crate::proxy::ConnectPolicy;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    pub flyweight: FlyweightConfig,
    pub proxy: ProxyConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Placement {
    pub kind: String,
    pub x: i32,
    pub y: i32,
}

impl Placement {
    pub fn new(kind: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            kind: kind.into(),
            x,
            y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlyweightConfig {
    pub placements: Vec<Placement>,
    pub clear_after_draw: bool,
}

impl Default for FlyweightConfig {
    fn default() -> Self {
        Self {
            placements: vec![
                Placement::new("Tree", 10, 20),
                Placement::new("Building", 50, 30),
                Placement::new("Road", 100, 40),
                Placement::new("Lake", 150, 50),
                Placement::new("Car", 200, 60),
                Placement::new("River", 250, 70),
            ],
            clear_after_draw: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProxyConfig {
    pub connect_policy: ConnectPolicy,
    pub connect_first: bool,
    pub requests: Vec<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            connect_policy: ConnectPolicy::Lazy,
            connect_first: true,
            requests: ["image_1", "image_1", "image_2", "image_2"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl DemoConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: DemoConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: DemoConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Picks the format from the extension, sniffing the content otherwise.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match format.as_deref() {
            Some("json") => Self::from_json(&content),
            Some("toml") => Self::from_toml(&content),
            _ => {
                let trimmed = content.trim_start();
                if trimmed.starts_with('{') {
                    Self::from_json(&content)
                } else {
                    Self::from_toml(&content)
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, placement) in self.flyweight.placements.iter().enumerate() {
            if let Err(err) = placement.kind.parse::<MapElementKind>() {
                return Err(ConfigError::invalid_value(
                    format!("flyweight.placements[{index}].kind"),
                    err.to_string(),
                ));
            }
        }

        if let Some(index) = self.proxy.requests.iter().position(|key| key.trim().is_empty()) {
            return Err(ConfigError::invalid_value(
                format!("proxy.requests[{index}]"),
                "request key must not be empty",
            ));
        }

        Ok(())
    }
}
