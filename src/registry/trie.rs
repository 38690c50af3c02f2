//! Arena-backed trie of stack frames.
//!
//! Every reported trace becomes a root-to-node path. Traces are inserted
//! outermost frame first, so deep generic call chains (thread pools, event
//! loops) land near the root and are shared across many distinct
//! exceptions; the exception-specific innermost frames sit near the
//! leaves.
//!
//! Nodes live in a flat arena and reference each other by index, so the
//! parent back-references never form owning cycles and dropping the arena
//! drops the whole tree.

use super::frame::StackFrame;

/// Index of a node inside the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One trie position: a frame plus its tree links.
///
/// Among the children of any node, no two share an equal frame; that is
/// the deduplication invariant the whole registry rests on.
#[derive(Debug)]
struct FrameNode {
    frame: StackFrame,
    /// `None` only for the root sentinel
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Leaf records attached here, keyed by throwable class name: the
    /// same frame chain thrown as different classes stays distinct
    leaf_slots: Vec<(String, usize)>,
}

/// Arena owning every frame node, root sentinel included.
#[derive(Debug)]
pub(crate) struct FrameArena {
    nodes: Vec<FrameNode>,
}

impl FrameArena {
    /// Fresh arena containing only the root sentinel
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![FrameNode {
                frame: StackFrame::new("ROOT", "", None, 0),
                parent: None,
                children: Vec::new(),
                leaf_slots: Vec::new(),
            }],
        }
    }

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total node count, sentinel included
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Walk or extend the trie with one trace, returning the final node.
    ///
    /// Frames are consumed outermost first. An empty trace inserts a single
    /// synthetic frame keyed by the throwable's class name, so frameless
    /// throwables of the same class all land on the same node.
    pub(crate) fn insert_path(
        &mut self,
        frames: &[StackFrame],
        throwable_class_name: &str,
    ) -> NodeId {
        if frames.is_empty() {
            let synthetic = StackFrame::synthetic(throwable_class_name);
            return self.find_or_add_child(self.root(), &synthetic);
        }

        let mut current = self.root();
        for frame in frames.iter().rev() {
            current = self.find_or_add_child(current, frame);
        }
        current
    }

    /// Descend into the child matching `frame`, appending a new one if absent
    fn find_or_add_child(&mut self, parent: NodeId, frame: &StackFrame) -> NodeId {
        for &child in &self.nodes[parent.index()].children {
            if self.nodes[child.index()].frame == *frame {
                return child;
            }
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(FrameNode {
            frame: frame.clone(),
            parent: Some(parent),
            children: Vec::new(),
            leaf_slots: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Leaf slot attached to `node` for this throwable class, if any.
    ///
    /// A leaf's identity is the frame chain *and* the thrown class name,
    /// so slots are looked up per class. Linear scan; a node rarely
    /// terminates more than a couple of distinct classes.
    pub(crate) fn leaf_slot(&self, node: NodeId, throwable_class_name: &str) -> Option<usize> {
        self.nodes[node.index()]
            .leaf_slots
            .iter()
            .find(|(class, _)| class == throwable_class_name)
            .map(|&(_, slot)| slot)
    }

    /// Attach a leaf slot to `node` for this throwable class
    pub(crate) fn set_leaf_slot(&mut self, node: NodeId, throwable_class_name: &str, slot: usize) {
        self.nodes[node.index()]
            .leaf_slots
            .push((throwable_class_name.to_string(), slot));
    }

    /// Frames on the path from `node` up to (excluding) the root sentinel.
    ///
    /// Because traces are inserted outermost first, this walk returns
    /// frames innermost first, i.e. the original trace order.
    pub(crate) fn path_frames(&self, node: NodeId) -> Vec<StackFrame> {
        let mut frames = Vec::new();
        let mut current = node;
        while let Some(parent) = self.nodes[current.index()].parent {
            frames.push(self.nodes[current.index()].frame.clone());
            current = parent;
        }
        frames
    }
}
