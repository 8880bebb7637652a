//! Resource descriptors
//!
//! What a hint points at, and the optional attributes the `<link>` carries.

use serde::{Deserialize, Serialize};

/// Resource type, written as the `as` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Font,
    Style,
    Script,
    Fetch,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Font => "font",
            ResourceKind::Style => "style",
            ResourceKind::Script => "script",
            ResourceKind::Fetch => "fetch",
        }
    }
}

/// Fetch priority hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchPriority {
    High,
    Low,
    Auto,
}

impl FetchPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchPriority::High => "high",
            FetchPriority::Low => "low",
            FetchPriority::Auto => "auto",
        }
    }
}

/// A resource to preload or prefetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub url: String,
    pub kind: ResourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_origin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<FetchPriority>,
}

impl ResourceDescriptor {
    pub fn new(url: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            url: url.into(),
            kind,
            mime_type: None,
            cross_origin: None,
            media: None,
            priority: None,
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::new(url, ResourceKind::Image)
    }

    pub fn script(url: impl Into<String>) -> Self {
        Self::new(url, ResourceKind::Script)
    }

    pub fn style(url: impl Into<String>) -> Self {
        Self::new(url, ResourceKind::Style)
    }

    /// Font preloads are always fetched in CORS mode by browsers
    pub fn font(url: impl Into<String>) -> Self {
        Self::new(url, ResourceKind::Font).with_cross_origin(true)
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    pub fn with_cross_origin(mut self, cross_origin: bool) -> Self {
        self.cross_origin = Some(cross_origin);
        self
    }

    pub fn with_media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(media.into());
        self
    }

    pub fn with_priority(mut self, priority: FetchPriority) -> Self {
        self.priority = Some(priority);
        self
    }
}
