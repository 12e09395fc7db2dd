use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::{BundleRequest, MenuItemInput};

/// Load a bulk menu from a JSON file.
pub fn load_menu<P: AsRef<Path>>(path: P) -> Result<Vec<MenuItemInput>> {
    let content = fs::read_to_string(path)?;
    let menu: Vec<MenuItemInput> = serde_json::from_str(&content)?;
    Ok(menu)
}

/// Load a planning request from a JSON file.
pub fn load_request<P: AsRef<Path>>(path: P) -> Result<BundleRequest> {
    let content = fs::read_to_string(path)?;
    let request: BundleRequest = serde_json::from_str(&content)?;
    Ok(request)
}

/// Serialize a value as pretty-printed JSON and write it to a file.
pub fn save_json<P: AsRef<Path>, T: serde::Serialize>(path: P, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
