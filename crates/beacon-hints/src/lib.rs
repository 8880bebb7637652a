//! Beacon Hints
//!
//! Declarative resource hints scoped to a mount lifetime:
//! `preload`, `prefetch`, `preconnect` and `dns-prefetch` links injected into
//! `<head>` on activation and removed on deactivation.

mod descriptor;
mod manifest;
mod hinter;

pub use descriptor::{FetchPriority, ResourceDescriptor, ResourceKind};
pub use manifest::{HintIntent, HintManifest};
pub use hinter::{HintScope, ResourceHinter, OWNER_ATTR};
