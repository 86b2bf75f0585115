//! Fully-qualified URL resolution.
//!
//! The descriptor's `site` exists so consumers can produce absolute links;
//! these functions do the joining so slash handling lives in one place.

use pagebase_shared::{DeployDescriptor, PagebaseError, Result};
use url::Url;

/// The served root of the site: `site` + `base_path`, with a trailing slash.
pub fn site_root(descriptor: &DeployDescriptor) -> Url {
    let mut url = descriptor.site.as_url().clone();
    if descriptor.base_path.is_root() {
        url.set_path("/");
    } else {
        url.set_path(&format!("{}/", descriptor.base_path.as_str()));
    }
    url
}

/// Absolute URL of a page path under the base path.
///
/// `rel` is relative to the site root, e.g. `guide/installation`.
pub fn page_url(descriptor: &DeployDescriptor, rel: &str) -> Result<Url> {
    validate_rel(rel)?;
    site_root(descriptor)
        .join(rel)
        .map_err(|e| PagebaseError::validation(format!("cannot resolve page '{rel}': {e}")))
}

/// Absolute URL of a built asset under `base_path/<assets>/`.
pub fn asset_url(descriptor: &DeployDescriptor, rel: &str) -> Result<Url> {
    validate_rel(rel)?;
    let assets_root = site_root(descriptor)
        .join(&format!("{}/", descriptor.assets_dir().as_str()))
        .map_err(|e| PagebaseError::validation(format!("cannot resolve assets root: {e}")))?;
    assets_root
        .join(rel)
        .map_err(|e| PagebaseError::validation(format!("cannot resolve asset '{rel}': {e}")))
}

/// Reject inputs that would escape or replace the resolved base.
fn validate_rel(rel: &str) -> Result<()> {
    if rel.is_empty() {
        return Err(PagebaseError::validation("path must not be empty"));
    }
    if rel.starts_with('/') || rel.contains("://") {
        return Err(PagebaseError::validation(format!(
            "path '{rel}' must be relative to the site root"
        )));
    }
    if rel.contains('\\') {
        return Err(PagebaseError::validation(format!(
            "path '{rel}' must use '/' separators"
        )));
    }
    if rel.split('/').any(|s| s == "." || s == "..") {
        return Err(PagebaseError::validation(format!(
            "path '{rel}' must not contain '.' or '..' segments"
        )));
    }
    Ok(())
}
