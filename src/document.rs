//! A minimal document tree standing in for the server-rendered login page.
//!
//! The host environment builds one of these from the markup it rendered
//! and hands it to the form controller as an explicit initialization
//! context. Only the vocabulary the login page actually uses is modeled:
//! ids, classes, text content, an input's hidden/visible presentation, a
//! disabled flag, a form action, a few inline style bits, and
//! parent/child structure. Activating a submit control records a form
//! submission on the document, which is the observable submission side
//! effect tests assert on.

/// Handle to an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// How an input element is presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Hidden,
    Visible,
}

/// The inline style bits the client ever sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    /// Rendered inline with surrounding text rather than as a block.
    pub inline: bool,
    /// Text color override, when set.
    pub color: Option<String>,
    /// Shows a pointer cursor on hover (a click affordance).
    pub pointer_cursor: bool,
}

/// One element of the document tree.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub class: Option<String>,
    pub text: String,
    /// Present only on input elements.
    pub presentation: Option<Presentation>,
    pub disabled: bool,
    /// Present only on form elements.
    pub action: Option<String>,
    pub style: Style,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_string(),
            id: None,
            class: None,
            text: String::new(),
            presentation: None,
            disabled: false,
            action: None,
            style: Style::default(),
            children: Vec::new(),
            parent: None,
        }
    }
}

/// The document tree plus the submissions triggered against it.
#[derive(Debug, Default)]
pub struct Document {
    nodes: Vec<Element>,
    submitted: Vec<NodeId>,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Create a detached element and return its handle.
    pub fn create(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Element::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` as the first child of `parent`.
    pub fn prepend(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(0, child);
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old_parent) = self.nodes[child.0].parent.take() {
            self.nodes[old_parent.0].children.retain(|c| *c != child);
        }
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    pub fn element(&self, id: NodeId) -> &Element {
        &self.nodes[id.0]
    }

    pub fn element_mut(&mut self, id: NodeId) -> &mut Element {
        &mut self.nodes[id.0]
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// First element carrying the given id attribute, in creation order.
    pub fn by_id(&self, dom_id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.id.as_deref() == Some(dom_id))
            .map(NodeId)
    }

    /// First element carrying the given class, in creation order.
    pub fn first_by_class(&self, class: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.class.as_deref() == Some(class))
            .map(NodeId)
    }

    /// First form element whose action matches, in creation order.
    pub fn form_by_action(&self, action: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.tag == "form" && n.action.as_deref() == Some(action))
            .map(NodeId)
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Programmatically activate a submit control: the nearest enclosing
    /// form is recorded as submitted. A control outside any form does
    /// nothing, matching a detached button.
    pub fn activate_submit(&mut self, control: NodeId) {
        let mut cursor = Some(control);
        while let Some(node) = cursor {
            if self.nodes[node.0].tag == "form" {
                self.submitted.push(node);
                return;
            }
            cursor = self.nodes[node.0].parent;
        }
    }

    /// Forms submitted so far, in order.
    pub fn submissions(&self) -> &[NodeId] {
        &self.submitted
    }
}
