//! Hint manifest
//!
//! Four ordered lists, one per intent. Origins for preconnect and
//! dns-prefetch are plain strings.

use serde::{Deserialize, Serialize};

use crate::ResourceDescriptor;

/// Resource hint intent, in decreasing urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HintIntent {
    Preload,
    Prefetch,
    Preconnect,
    DnsPrefetch,
}

impl HintIntent {
    /// Document order in which intents are injected
    pub const ORDER: [HintIntent; 4] = [
        HintIntent::Preload,
        HintIntent::Prefetch,
        HintIntent::Preconnect,
        HintIntent::DnsPrefetch,
    ];

    /// Value of the `rel` attribute
    pub fn rel(&self) -> &'static str {
        match self {
            HintIntent::Preload => "preload",
            HintIntent::Prefetch => "prefetch",
            HintIntent::Preconnect => "preconnect",
            HintIntent::DnsPrefetch => "dns-prefetch",
        }
    }

    pub fn from_rel(rel: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|i| i.rel().eq_ignore_ascii_case(rel.trim()))
    }
}

/// Resources to hint for one mount
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HintManifest {
    pub preload: Vec<ResourceDescriptor>,
    pub prefetch: Vec<ResourceDescriptor>,
    pub preconnect: Vec<String>,
    pub dns_prefetch: Vec<String>,
}

impl HintManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preload(mut self, resource: ResourceDescriptor) -> Self {
        self.preload.push(resource);
        self
    }

    pub fn prefetch(mut self, resource: ResourceDescriptor) -> Self {
        self.prefetch.push(resource);
        self
    }

    pub fn preconnect(mut self, origin: impl Into<String>) -> Self {
        self.preconnect.push(origin.into());
        self
    }

    pub fn dns_prefetch(mut self, origin: impl Into<String>) -> Self {
        self.dns_prefetch.push(origin.into());
        self
    }

    /// Total number of hints across all intents
    pub fn len(&self) -> usize {
        self.preload.len() + self.prefetch.len() + self.preconnect.len() + self.dns_prefetch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
