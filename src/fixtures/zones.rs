//! Zone Fixtures

use serde::Deserialize;

/// Wrapper for zones in YAML
#[derive(Debug, Deserialize)]
pub struct ZonesFixture {
    /// Zone names, in display order
    #[serde(default)]
    pub zones: Vec<String>,
}
