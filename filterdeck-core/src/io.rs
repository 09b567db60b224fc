use crate::error::Result;
use crate::models::FilterMap;
use crate::options::EngineOptions;
use std::fs;
use std::path::Path;

/// Load a filter payload map from a JSON file
pub fn load_filter_map<P: AsRef<Path>>(path: P) -> Result<FilterMap> {
    let contents = fs::read_to_string(path)?;
    let map: FilterMap = serde_json::from_str(&contents)?;
    Ok(map)
}

/// Save a filter payload map to a JSON file with pretty printing
pub fn save_filter_map<P: AsRef<Path>>(map: &FilterMap, path: P) -> Result<()> {
    // Sorted keys keep saved files diffable
    let ordered: std::collections::BTreeMap<_, _> = map.iter().collect();
    let json = serde_json::to_string_pretty(&ordered)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load engine options from a JSON file, validated against the options schema
pub fn load_options<P: AsRef<Path>>(path: P) -> Result<EngineOptions> {
    let contents = fs::read_to_string(path)?;
    EngineOptions::from_json_str(&contents)
}
