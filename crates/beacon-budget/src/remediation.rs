//! Canned advice for categories over budget

use serde::Serialize;

use crate::ResourceType;

/// Suggestions for one failing category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Remediation {
    pub resource_type: ResourceType,
    pub over_by_bytes: u64,
    pub advice: &'static [&'static str],
}

pub fn advice_for(resource_type: ResourceType) -> &'static [&'static str] {
    match resource_type {
        ResourceType::Script => &[
            "Split routes and heavy components with dynamic import()",
            "Enable tree-shaking and drop unused dependencies",
            "Check vendor chunks for duplicated packages",
        ],
        ResourceType::Stylesheet => &[
            "Remove unused CSS rules",
            "Inline critical CSS and defer the rest",
        ],
        ResourceType::Image => &[
            "Serve AVIF or WebP instead of PNG/JPEG",
            "Lazy-load images below the fold",
            "Resize images to their rendered dimensions",
        ],
        ResourceType::Font => &[
            "Subset fonts to the glyphs actually used",
            "Ship WOFF2 only and drop legacy formats",
            "Preload only the critical font faces",
        ],
        ResourceType::Other => &["Keep source maps and stray files out of the deployed bundle"],
        ResourceType::Total => &["Start with the largest files listed in this report"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_advice_per_category() {
        let script = advice_for(ResourceType::Script);
        for other in [ResourceType::Stylesheet, ResourceType::Image, ResourceType::Font] {
            assert!(!advice_for(other).is_empty());
            assert_ne!(advice_for(other), script);
        }
    }
}
