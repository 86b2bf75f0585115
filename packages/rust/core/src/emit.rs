//! Projection into the external build tool's config shape.
//!
//! The build tool reads camelCase keys with the assets name nested under
//! `build`. [`BuildToolConfig`] is that exact shape; conversion to and from
//! [`DeployDescriptor`] is lossless, so emitting and re-reading a descriptor
//! yields identical field values.

use pagebase_shared::{AssetsDir, BasePath, DeployDescriptor, PagebaseError, Result, SiteUrl};
use serde::{Deserialize, Serialize};

/// The configuration object as the external build tool consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildToolConfig {
    /// Absolute base URL used to produce fully-qualified links.
    pub site: SiteUrl,
    /// Root-relative prefix all output is served under.
    pub base_path: BasePath,
    /// Build output settings.
    pub build: BuildSection,
}

/// `build` table of the external config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSection {
    /// Relative directory name for built static assets.
    pub assets: AssetsDir,
}

impl From<&DeployDescriptor> for BuildToolConfig {
    fn from(descriptor: &DeployDescriptor) -> Self {
        Self {
            site: descriptor.site.clone(),
            base_path: descriptor.base_path.clone(),
            build: BuildSection {
                assets: descriptor.assets_dir().clone(),
            },
        }
    }
}

impl From<BuildToolConfig> for DeployDescriptor {
    fn from(config: BuildToolConfig) -> Self {
        Self::new(config.site, config.base_path, config.build.assets)
    }
}

/// Emit the build tool's JSON config, pretty-printed with a trailing newline.
pub fn emit_json(descriptor: &DeployDescriptor) -> Result<String> {
    let config = BuildToolConfig::from(descriptor);
    let mut out = serde_json::to_string_pretty(&config)
        .map_err(|e| PagebaseError::Serialize(e.to_string()))?;
    out.push('\n');
    Ok(out)
}

/// Emit the build tool's TOML config.
pub fn emit_toml(descriptor: &DeployDescriptor) -> Result<String> {
    let config = BuildToolConfig::from(descriptor);
    toml::to_string_pretty(&config).map_err(|e| PagebaseError::Serialize(e.to_string()))
}

/// Parse a JSON config back into the build-tool shape.
pub fn parse_json(input: &str) -> Result<BuildToolConfig> {
    serde_json::from_str(input)
        .map_err(|e| PagebaseError::config(format!("invalid build tool config: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tidy_descriptor() -> DeployDescriptor {
        DeployDescriptor::new(
            SiteUrl::parse("https://ricardodantas.github.io").expect("site"),
            BasePath::parse("/tidy").expect("base"),
            AssetsDir::parse("assets").expect("assets"),
        )
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let json = emit_json(&tidy_descriptor()).expect("emit");
        assert!(json.contains("\"basePath\": \"/tidy\""));
        assert!(json.contains("\"site\": \"https://ricardodantas.github.io\""));
        assert!(json.contains("\"assets\": \"assets\""));
        assert!(json.ends_with('\n'));
    }

    #[test]
    fn json_roundtrip_is_identical() {
        let descriptor = tidy_descriptor();
        let json = emit_json(&descriptor).expect("emit");
        let reread: DeployDescriptor = parse_json(&json).expect("parse").into();
        assert_eq!(reread, descriptor);
    }

    #[test]
    fn toml_roundtrip_is_identical() {
        let descriptor = tidy_descriptor();
        let toml_str = emit_toml(&descriptor).expect("emit");
        let config: BuildToolConfig = toml::from_str(&toml_str).expect("parse");
        assert_eq!(DeployDescriptor::from(config), descriptor);
    }

    #[test]
    fn parse_rejects_invalid_field_values() {
        let err = parse_json(
            r#"{"site": "https://example.com", "basePath": "docs", "build": {"assets": "assets"}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid build tool config"));
    }

    #[test]
    fn fixture_config_validates() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/buildtool.fixture.json")
            .expect("read fixture");
        let config = parse_json(&fixture).expect("parse fixture");
        assert_eq!(config.base_path.as_str(), "/tidy");
        assert_eq!(config.build.assets.as_str(), "assets");
    }
}
