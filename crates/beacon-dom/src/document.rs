//! Document - High-level document API
//!
//! Every structural change that goes through `Document` bumps a layout
//! invalidation counter, so callers can verify that batched insertion really
//! costs a single reflow.

use crate::{DocumentFragment, DomResult, DomTree, NodeId};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    tree: DomTree,
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    layout_invalidations: u64,
}

impl Document {
    /// Create a document with `<html>`, `<head>` and `<body>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created nodes cannot violate the hierarchy
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            layout_invalidations: 0,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            layout_invalidations: 0,
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get `<head>` element, if the document has one
    pub fn head(&self) -> Option<NodeId> {
        Some(self.head_element).filter(|id| id.is_valid())
    }

    /// Get `<body>` element, if the document has one
    pub fn body(&self) -> Option<NodeId> {
        Some(self.body_element).filter(|id| id.is_valid())
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    ///
    /// Changes made here bypass the invalidation counter.
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Create a detached element owned by this document
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Append a single node
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let id = self.tree.append_child(parent, child)?;
        self.layout_invalidations += 1;
        Ok(id)
    }

    /// Append every node in `fragment` under `parent` as one batch
    ///
    /// Returns the number of inserted nodes. An empty fragment is a no-op.
    pub fn append_fragment(&mut self, parent: NodeId, mut fragment: DocumentFragment) -> DomResult<usize> {
        if fragment.is_empty() {
            return Ok(0);
        }
        let children = fragment.take_children();
        for &child in &children {
            self.tree.append_child(parent, child)?;
        }
        self.layout_invalidations += 1;
        tracing::trace!(count = children.len(), "fragment appended");
        Ok(children.len())
    }

    /// Remove a child node
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let id = self.tree.remove_child(parent, child)?;
        self.layout_invalidations += 1;
        Ok(id)
    }

    /// Direct children of `parent` with the given tag
    pub fn children_by_tag(&self, parent: NodeId, tag: &str) -> Vec<NodeId> {
        self.tree
            .children(parent)
            .filter(|(_, node)| node.as_element().is_some_and(|e| e.tag.eq_ignore_ascii_case(tag)))
            .map(|(id, _)| id)
            .collect()
    }

    /// Number of structural changes made through this document
    pub fn layout_invalidations(&self) -> u64 {
        self.layout_invalidations
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
