use serde::{Deserialize, Serialize};

/// Geo-prefix resolver paths.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeoConfig {
    #[serde(default = "default_zones_dir")]
    pub zones_dir: String,

    #[serde(default = "default_blocked_countries_path")]
    pub blocked_countries_path: String,
}

fn default_zones_dir() -> String {
    "./GeoBlock/zones".to_string()
}

fn default_blocked_countries_path() -> String {
    "./GeoBlock/blocked_countries.txt".to_string()
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            zones_dir: default_zones_dir(),
            blocked_countries_path: default_blocked_countries_path(),
        }
    }
}
