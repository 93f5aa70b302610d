use crate::{error::AddChildResult, BehaviorNodeContainer};

/// Ordered, exclusively owned children of a composite node.
///
/// Children are appended while the tree is being built and the order never
/// changes afterwards. Composites embed this and keep their own traversal
/// index within `0..=len()`.
#[derive(Default)]
pub struct ControlNode {
    children: Vec<BehaviorNodeContainer>,
}

impl ControlNode {
    pub fn new(children: Vec<BehaviorNodeContainer>) -> Self {
        Self { children }
    }

    pub fn add_child(&mut self, child: BehaviorNodeContainer) -> AddChildResult {
        self.children.push(child);
        Ok(())
    }

    /// Halts every child, whatever its status, so none is left `Running`.
    pub fn reset_children(&mut self) {
        for child in &mut self.children {
            child.halt();
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Panics if `idx` is out of bounds.
    pub fn child_mut(&mut self, idx: usize) -> &mut BehaviorNodeContainer {
        &mut self.children[idx]
    }

    pub fn children(&self) -> &[BehaviorNodeContainer] {
        &self.children
    }
}
