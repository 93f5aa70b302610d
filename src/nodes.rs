use crate::{
    error::{AddChildResult, LogicError},
    BehaviorCallback, BehaviorNode, BehaviorNodeContainer, Context, ControlNode, Lazy,
    NodeStatus, PortSpec, Symbol, TickResult,
};
use tracing::debug;

pub(crate) static START_IDX: Lazy<Symbol> = Lazy::new(|| "start_idx".into());

/// Ticks its children left to right and succeeds only if all of them do.
///
/// A child returning `Running` suspends the sequence on that child; the next
/// tick resumes there instead of starting over. A `Failure` halts every child
/// and rewinds to the resume anchor. Children returning `Skipped` are passed
/// over, and if nothing but skips happened in a cycle the sequence itself
/// reports `Skipped`.
///
/// The resume anchor comes from the optional `start_idx` input port and
/// defaults to 0. A bound value only moves the traversal index forward, never
/// back over children already done in this cycle.
pub struct SequenceNode {
    control: ControlNode,
    current_child_idx: usize,
    start_idx: usize,
    /// Own status across ticks of one cycle; `Running` once any child did real work.
    status: NodeStatus,
}

impl Default for SequenceNode {
    fn default() -> Self {
        Self::with_children(vec![])
    }
}

impl SequenceNode {
    pub const REGISTRATION_ID: &'static str = "Sequence";

    pub fn with_children(children: Vec<BehaviorNodeContainer>) -> Self {
        Self {
            control: ControlNode::new(children),
            current_child_idx: 0,
            start_idx: 0,
            status: NodeStatus::Idle,
        }
    }

    /// Index of the next child to evaluate.
    pub fn current_child_idx(&self) -> usize {
        self.current_child_idx
    }

    /// The resume anchor.
    pub fn start_idx(&self) -> usize {
        self.start_idx
    }

    pub fn children(&self) -> &[BehaviorNodeContainer] {
        self.control.children()
    }

    /// The anchor may exceed the child count; the index never does.
    fn rewind(&mut self) {
        self.current_child_idx = self.start_idx.min(self.control.len());
    }
}

impl BehaviorNode for SequenceNode {
    fn provided_ports(&self) -> Vec<PortSpec> {
        vec![PortSpec::new_in(*START_IDX).typed::<usize>()]
    }

    fn tick(&mut self, arg: BehaviorCallback, ctx: &mut Context) -> TickResult {
        if let Some(start_idx) = ctx.read_input::<usize>(*START_IDX) {
            self.start_idx = start_idx;
            if self.current_child_idx <= start_idx {
                self.current_child_idx = start_idx.min(self.control.len());
            }
        }

        let children_count = self.control.len();

        while self.current_child_idx < children_count {
            let child = self.control.child_mut(self.current_child_idx);

            let prev_status = child.status();
            let child_status = child.tick(arg, ctx)?;

            // switch to Running as soon as a child did anything
            if child_status != NodeStatus::Skipped {
                self.status = NodeStatus::Running;
            }

            match child_status {
                NodeStatus::Running => return Ok(NodeStatus::Running),
                NodeStatus::Failure => {
                    debug!(child = %child.name(), "sequence failed");
                    self.control.reset_children();
                    self.rewind();
                    self.status = NodeStatus::Failure;
                    return Ok(NodeStatus::Failure);
                }
                NodeStatus::Success => {
                    let yield_to_driver =
                        child.requires_wake_up() && prev_status == NodeStatus::Idle;
                    self.current_child_idx += 1;
                    // An async child finished on its first tick: hand control back so
                    // the rest of the sequence runs on a fresh tick.
                    if yield_to_driver && self.current_child_idx < children_count {
                        ctx.emit_wake_up_signal();
                        return Ok(NodeStatus::Running);
                    }
                }
                NodeStatus::Skipped => {
                    self.current_child_idx += 1;
                }
                NodeStatus::Idle => {
                    // The owning container fills in `parent`
                    return Err(LogicError::IdleStatus {
                        parent: String::new(),
                        child: child.name().to_owned(),
                    });
                }
            }
        }

        // Every child of this cycle returned Success or Skipped
        self.control.reset_children();
        self.rewind();

        let res = if self.status == NodeStatus::Running {
            NodeStatus::Success
        } else {
            NodeStatus::Skipped
        };
        debug!(status = ?res, "sequence completed");
        self.status = res;
        Ok(res)
    }

    fn halt(&mut self) {
        self.rewind();
        self.control.reset_children();
        self.status = NodeStatus::Idle;
    }

    fn add_child(&mut self, child: BehaviorNodeContainer) -> AddChildResult {
        self.control.add_child(child)
    }
}

#[cfg(test)]
mod test;
