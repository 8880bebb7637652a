//! Resource Hinter
//!
//! Injects one `<link>` per manifest entry into `<head>` and removes them
//! again. Hints are advisory: nothing here returns an error, failures are
//! logged and skipped.

use std::sync::atomic::{AtomicU64, Ordering};

use beacon_dom::{Document, DocumentFragment, NodeId};

use crate::{HintIntent, HintManifest, ResourceDescriptor};

/// Attribute that marks a `<link>` as owned by a particular hinter
pub const OWNER_ATTR: &str = "data-beacon-hint";

static NEXT_HINTER_ID: AtomicU64 = AtomicU64::new(1);

/// Injects and tears down resource hints for one manifest
#[derive(Debug)]
pub struct ResourceHinter {
    id: u64,
    manifest: HintManifest,
    active: bool,
}

impl ResourceHinter {
    pub fn new(manifest: HintManifest) -> Self {
        Self {
            id: NEXT_HINTER_ID.fetch_add(1, Ordering::Relaxed),
            manifest,
            active: false,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn manifest(&self) -> &HintManifest {
        &self.manifest
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Inject every hint into `<head>` as a single batch
    ///
    /// Activating an already active hinter first removes the previous set.
    /// Returns the number of `<link>` elements inserted.
    pub fn activate(&mut self, doc: &mut Document) -> usize {
        if self.active {
            self.deactivate(doc);
        }
        self.active = true;

        if self.manifest.is_empty() {
            return 0;
        }
        let Some(head) = doc.head() else {
            tracing::debug!(hinter = self.id, "document has no <head>, hints skipped");
            return 0;
        };

        let owner = self.id.to_string();
        let mut fragment = DocumentFragment::new();
        for intent in HintIntent::ORDER {
            match intent {
                HintIntent::Preload => {
                    for res in &self.manifest.preload {
                        fragment.append(resource_link(doc, intent, res, &owner));
                    }
                }
                HintIntent::Prefetch => {
                    for res in &self.manifest.prefetch {
                        fragment.append(resource_link(doc, intent, res, &owner));
                    }
                }
                HintIntent::Preconnect => {
                    for origin in &self.manifest.preconnect {
                        fragment.append(origin_link(doc, intent, origin, &owner));
                    }
                }
                HintIntent::DnsPrefetch => {
                    for origin in &self.manifest.dns_prefetch {
                        fragment.append(origin_link(doc, intent, origin, &owner));
                    }
                }
            }
        }

        match doc.append_fragment(head, fragment) {
            Ok(count) => {
                tracing::debug!(hinter = self.id, count, "resource hints injected");
                count
            }
            Err(e) => {
                tracing::warn!(hinter = self.id, "failed to inject resource hints: {}", e);
                0
            }
        }
    }

    /// Remove the hints this hinter injected
    ///
    /// Links already removed by someone else are skipped. Returns the number
    /// of elements removed; calling it twice removes nothing the second time.
    pub fn deactivate(&mut self, doc: &mut Document) -> usize {
        self.active = false;
        let Some(head) = doc.head() else { return 0 };

        let owned = owned_links(doc, head, self.id);
        let mut removed = 0;
        for id in owned {
            match doc.remove_child(head, id) {
                Ok(_) => removed += 1,
                Err(e) => tracing::debug!(hinter = self.id, "hint already gone: {}", e),
            }
        }
        if removed > 0 {
            tracing::debug!(hinter = self.id, removed, "resource hints removed");
        }
        removed
    }

    /// Swap in a new manifest, fully tearing down the old hints first
    pub fn replace(&mut self, doc: &mut Document, manifest: HintManifest) -> usize {
        self.deactivate(doc);
        self.manifest = manifest;
        self.activate(doc)
    }

    /// Activate for the lifetime of the returned guard
    pub fn scope(mut self, doc: &mut Document) -> HintScope<'_> {
        self.activate(doc);
        HintScope { hinter: self, doc }
    }
}

/// RAII guard: hints stay in the document until the guard drops
#[derive(Debug)]
pub struct HintScope<'d> {
    hinter: ResourceHinter,
    doc: &'d mut Document,
}

impl HintScope<'_> {
    pub fn document(&self) -> &Document {
        self.doc
    }

    pub fn hinter(&self) -> &ResourceHinter {
        &self.hinter
    }

    /// Re-point the scope at a different manifest
    pub fn replace(&mut self, manifest: HintManifest) -> usize {
        self.hinter.replace(self.doc, manifest)
    }
}

impl Drop for HintScope<'_> {
    fn drop(&mut self) {
        self.hinter.deactivate(self.doc);
    }
}

/// `<link>` children of `<head>` with a hint `rel` and this owner's marker
fn owned_links(doc: &Document, head: NodeId, owner: u64) -> Vec<NodeId> {
    let owner = owner.to_string();
    let tree = doc.tree();
    doc.children_by_tag(head, "link")
        .into_iter()
        .filter(|&id| {
            let is_hint = tree.attribute(id, "rel").and_then(HintIntent::from_rel).is_some();
            is_hint && tree.attribute(id, OWNER_ATTR) == Some(owner.as_str())
        })
        .collect()
}

fn resource_link(doc: &mut Document, intent: HintIntent, res: &ResourceDescriptor, owner: &str) -> NodeId {
    let id = doc.create_element("link");
    if let Some(elem) = doc.tree_mut().get_mut(id).and_then(|n| n.as_element_mut()) {
        elem.set_attr("rel", intent.rel());
        elem.set_attr("href", res.url.as_str());
        elem.set_attr("as", res.kind.as_str());
        if let Some(mime) = &res.mime_type {
            elem.set_attr("type", mime.as_str());
        }
        if res.cross_origin == Some(true) {
            elem.set_attr("crossorigin", "anonymous");
        }
        if let Some(media) = &res.media {
            elem.set_attr("media", media.as_str());
        }
        if let Some(priority) = res.priority {
            elem.set_attr("fetchpriority", priority.as_str());
        }
        elem.set_attr(OWNER_ATTR, owner);
    }
    id
}

fn origin_link(doc: &mut Document, intent: HintIntent, origin: &str, owner: &str) -> NodeId {
    let id = doc.create_element("link");
    if let Some(elem) = doc.tree_mut().get_mut(id).and_then(|n| n.as_element_mut()) {
        elem.set_attr("rel", intent.rel());
        elem.set_attr("href", origin);
        elem.set_attr(OWNER_ATTR, owner);
    }
    id
}
