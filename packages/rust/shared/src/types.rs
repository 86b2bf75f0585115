//! Domain types for the deployment descriptor.
//!
//! Each field of the descriptor is a validated newtype: a value that parses
//! is a value the external build tool will accept, so nothing downstream
//! re-checks. Serde goes through `try_from`/`into` String so the same
//! invariants hold for values arriving from TOML or JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PagebaseError, Result};

// ---------------------------------------------------------------------------
// SiteUrl
// ---------------------------------------------------------------------------

/// The absolute origin the site is served from, e.g. `https://ricardodantas.github.io`.
///
/// Must be `http`/`https` with a host, and carry no path, query, or fragment.
/// Path prefixes belong in [`BasePath`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SiteUrl(Url);

impl SiteUrl {
    /// Parse and validate a site origin URL.
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input)
            .map_err(|e| PagebaseError::validation(format!("site URL '{input}': {e}")))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(PagebaseError::validation(format!(
                "site URL '{input}' must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(PagebaseError::validation(format!(
                "site URL '{input}' has no host"
            )));
        }
        if url.path() != "/" {
            return Err(PagebaseError::validation(format!(
                "site URL '{input}' carries a path; put path prefixes in base_path"
            )));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(PagebaseError::validation(format!(
                "site URL '{input}' must not have a query or fragment"
            )));
        }

        Ok(Self(url))
    }

    /// The underlying parsed URL (path is always `/`).
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Host portion of the origin.
    pub fn host(&self) -> &str {
        // Guaranteed by `parse`.
        self.0.host_str().unwrap_or_default()
    }
}

impl fmt::Display for SiteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The url crate normalizes an empty path to "/"; render the bare
        // origin the way it was written in the descriptor file.
        let s = self.0.as_str();
        f.write_str(s.strip_suffix('/').unwrap_or(s))
    }
}

impl FromStr for SiteUrl {
    type Err = PagebaseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SiteUrl {
    type Error = PagebaseError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<SiteUrl> for String {
    fn from(value: SiteUrl) -> Self {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// BasePath
// ---------------------------------------------------------------------------

/// Root-relative prefix under which all generated output is served.
///
/// Always begins with exactly one `/`; never ends with one (except the bare
/// root `/`); interior segments are non-empty and never `.` or `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BasePath(String);

impl BasePath {
    /// The root deployment prefix, `/`.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Parse and validate a base path.
    pub fn parse(input: &str) -> Result<Self> {
        if !input.starts_with('/') {
            return Err(PagebaseError::validation(format!(
                "base path '{input}' must begin with '/'"
            )));
        }
        if input == "/" {
            return Ok(Self::root());
        }
        if input.ends_with('/') {
            return Err(PagebaseError::validation(format!(
                "base path '{input}' must not end with '/'"
            )));
        }
        for segment in input[1..].split('/') {
            if segment.is_empty() {
                return Err(PagebaseError::validation(format!(
                    "base path '{input}' has an empty segment"
                )));
            }
            if segment == "." || segment == ".." {
                return Err(PagebaseError::validation(format!(
                    "base path '{input}' contains '{segment}'"
                )));
            }
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Path segments, empty for the root prefix.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl Default for BasePath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for BasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BasePath {
    type Err = PagebaseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BasePath {
    type Error = PagebaseError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<BasePath> for String {
    fn from(value: BasePath) -> Self {
        value.0
    }
}

// ---------------------------------------------------------------------------
// AssetsDir
// ---------------------------------------------------------------------------

/// Directory name within the build output where static assets land.
///
/// A single relative path segment: non-empty, not `.` or `..`, no separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetsDir(String);

impl AssetsDir {
    /// Parse and validate an assets directory name.
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(PagebaseError::validation(
                "assets directory name must not be empty",
            ));
        }
        if input == "." || input == ".." {
            return Err(PagebaseError::validation(format!(
                "assets directory name must not be '{input}'"
            )));
        }
        if input.contains('/') || input.contains('\\') {
            return Err(PagebaseError::validation(format!(
                "assets directory name '{input}' must be a single path segment"
            )));
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AssetsDir {
    fn default() -> Self {
        Self("assets".to_string())
    }
}

impl fmt::Display for AssetsDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AssetsDir {
    type Err = PagebaseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AssetsDir {
    type Error = PagebaseError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<AssetsDir> for String {
    fn from(value: AssetsDir) -> Self {
        value.0
    }
}

// ---------------------------------------------------------------------------
// DeployDescriptor
// ---------------------------------------------------------------------------

/// The deployment descriptor — the unit the external build tool consumes.
///
/// Constructed once at startup from the descriptor file and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployDescriptor {
    /// Absolute origin the site is served from.
    pub site: SiteUrl,

    /// Root-relative prefix for all generated pages and assets.
    #[serde(default)]
    pub base_path: BasePath,

    /// `[build]` section.
    #[serde(default)]
    pub build: BuildConfig,
}

/// Build output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Directory name for built static assets within the output.
    #[serde(default)]
    pub assets: AssetsDir,
}

impl DeployDescriptor {
    pub fn new(site: SiteUrl, base_path: BasePath, assets: AssetsDir) -> Self {
        Self {
            site,
            base_path,
            build: BuildConfig { assets },
        }
    }

    /// The assets directory name, as written in the `[build]` section.
    pub fn assets_dir(&self) -> &AssetsDir {
        &self.build.assets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_url_accepts_bare_origin() {
        let site = SiteUrl::parse("https://ricardodantas.github.io").expect("parse");
        assert_eq!(site.to_string(), "https://ricardodantas.github.io");
        assert_eq!(site.host(), "ricardodantas.github.io");
        assert_eq!(site.as_url().path(), "/");
    }

    #[test]
    fn site_url_keeps_explicit_port() {
        let site = SiteUrl::parse("http://localhost:8080").expect("parse");
        assert_eq!(site.to_string(), "http://localhost:8080");
    }

    #[test]
    fn site_url_rejects_bad_inputs() {
        assert!(SiteUrl::parse("ftp://example.com").is_err());
        assert!(SiteUrl::parse("example.com").is_err());
        assert!(SiteUrl::parse("https://example.com/docs").is_err());
        assert!(SiteUrl::parse("https://example.com?x=1").is_err());
        assert!(SiteUrl::parse("https://example.com#top").is_err());
    }

    #[test]
    fn base_path_starts_with_single_slash() {
        let base = BasePath::parse("/tidy").expect("parse");
        assert_eq!(base.as_str(), "/tidy");
        assert!(!base.is_root());
        assert_eq!(base.segments().collect::<Vec<_>>(), vec!["tidy"]);
    }

    #[test]
    fn base_path_root_has_no_segments() {
        let base = BasePath::root();
        assert!(base.is_root());
        assert_eq!(base.segments().count(), 0);
    }

    #[test]
    fn base_path_rejects_redundancy_and_traversal() {
        assert!(BasePath::parse("tidy").is_err());
        assert!(BasePath::parse("/tidy/").is_err());
        assert!(BasePath::parse("//tidy").is_err());
        assert!(BasePath::parse("/docs//guide").is_err());
        assert!(BasePath::parse("/../tidy").is_err());
        assert!(BasePath::parse("/tidy/..").is_err());
    }

    #[test]
    fn assets_dir_rejects_dot_and_separators() {
        assert!(AssetsDir::parse("").is_err());
        assert!(AssetsDir::parse(".").is_err());
        assert!(AssetsDir::parse("..").is_err());
        assert!(AssetsDir::parse("static/img").is_err());
        assert!(AssetsDir::parse("static\\img").is_err());
        assert_eq!(AssetsDir::parse("_assets").expect("parse").as_str(), "_assets");
    }

    #[test]
    fn descriptor_exposes_fields_unchanged() {
        let descriptor = DeployDescriptor::new(
            SiteUrl::parse("https://ricardodantas.github.io").expect("site"),
            BasePath::parse("/tidy").expect("base"),
            AssetsDir::parse("assets").expect("assets"),
        );
        assert_eq!(descriptor.site.to_string(), "https://ricardodantas.github.io");
        assert_eq!(descriptor.base_path.as_str(), "/tidy");
        assert_eq!(descriptor.assets_dir().as_str(), "assets");
    }

    #[test]
    fn descriptor_toml_roundtrip_is_identical() {
        let descriptor = DeployDescriptor::new(
            SiteUrl::parse("https://ricardodantas.github.io").expect("site"),
            BasePath::parse("/tidy").expect("base"),
            AssetsDir::parse("assets").expect("assets"),
        );
        let toml_str = toml::to_string_pretty(&descriptor).expect("serialize");
        let parsed: DeployDescriptor = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed, descriptor);
    }

    #[test]
    fn descriptor_rejects_invalid_fields_at_parse() {
        let toml_str = r#"
site = "https://example.com"
base_path = "docs"
"#;
        let err = toml::from_str::<DeployDescriptor>(toml_str).unwrap_err();
        assert!(err.to_string().contains("must begin with '/'"));
    }

    #[test]
    fn descriptor_defaults_base_path_and_assets() {
        let descriptor: DeployDescriptor =
            toml::from_str(r#"site = "https://example.com""#).expect("parse");
        assert!(descriptor.base_path.is_root());
        assert_eq!(descriptor.assets_dir().as_str(), "assets");
    }
}
