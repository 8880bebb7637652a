//! Asset categories
//!
//! Classification is by file extension only.

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Budget resource type; every asset falls in one of the first five
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Script,
    Stylesheet,
    Image,
    Font,
    Other,
    Total,
}

impl ResourceType {
    /// Categories an individual file can belong to
    pub const CATEGORIES: [ResourceType; 5] = [
        ResourceType::Script,
        ResourceType::Stylesheet,
        ResourceType::Image,
        ResourceType::Font,
        ResourceType::Other,
    ];

    /// Report order: categories, then the aggregate
    pub const ALL: [ResourceType; 6] = [
        ResourceType::Script,
        ResourceType::Stylesheet,
        ResourceType::Image,
        ResourceType::Font,
        ResourceType::Other,
        ResourceType::Total,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Script => "script",
            ResourceType::Stylesheet => "stylesheet",
            ResourceType::Image => "image",
            ResourceType::Font => "font",
            ResourceType::Other => "other",
            ResourceType::Total => "total",
        }
    }

    /// Parse a budget file `resourceType`
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Category of a file, from its extension (case-insensitive)
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "js" | "mjs" => ResourceType::Script,
            "css" => ResourceType::Stylesheet,
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "avif" => ResourceType::Image,
            "woff" | "woff2" | "ttf" | "eot" | "otf" => ResourceType::Font,
            _ => ResourceType::Other,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
