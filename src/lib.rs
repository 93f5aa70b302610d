//! # behavior-tree-core (Rust crate)
//!
//! The execution core of a behavior tree: the tick/status contract every node
//! obeys, a control-node base that owns children, a resumable
//! [`SequenceNode`], and a [`WakeUpSignal`] that lets an asynchronous child
//! ask the driver for an immediate extra tick.
//!
//! The design follows
//! [BehaviorTreeCPP](https://github.com/BehaviorTree/BehaviorTree.CPP.git).
//! See [BehaviorTreeCPP's documentation](https://www.behaviortree.dev/) for the
//! idea of behavior trees.
//!
//!
//! ## Ticks and statuses
//!
//! A driver calls `tick` on the root at whatever cadence it likes. Each call
//! runs to completion synchronously and returns a [`NodeStatus`]:
//!
//! * `Running` - in progress, tick me again later.
//! * `Success` / `Failure` - finished for this cycle.
//! * `Skipped` - deliberately not executed this cycle.
//!
//! `Idle` is the state of a node that has not been ticked since its last
//! reset. A node must never *return* it; a composite that sees it reports a
//! [`error::LogicError`] instead of a status.
//!
//!
//! ## How it looks like
//!
//! Leaves are structs implementing [`BehaviorNode`].
//!
//! ```rust
//! use ::behavior_tree_core::{BehaviorCallback, BehaviorNode, Context, NodeStatus, TickResult};
//!
//! struct Greet;
//!
//! impl BehaviorNode for Greet {
//!     fn tick(&mut self, arg: BehaviorCallback, _ctx: &mut Context) -> TickResult {
//!         arg(&"hello");
//!         Ok(NodeStatus::Success)
//!     }
//! }
//! ```
//!
//! Composites own their children through [`BehaviorNodeContainer`]s, which
//! carry the instance name, the port mapping and the last observed status.
//!
//! ```rust
//! # use ::behavior_tree_core::*;
//! # struct Greet;
//! # impl BehaviorNode for Greet {
//! #     fn tick(&mut self, _: BehaviorCallback, _: &mut Context) -> TickResult {
//! #         Ok(NodeStatus::Success)
//! #     }
//! # }
//! let mut seq = SequenceNode::default();
//! seq.add_child(BehaviorNodeContainer::new_node("first", Greet)).unwrap();
//! seq.add_child(BehaviorNodeContainer::new_node("second", Greet)).unwrap();
//!
//! let mut tree = Tree::new(BehaviorNodeContainer::new_node("root", seq));
//! assert_eq!(tree.tick_once(&mut |_| None), Ok(NodeStatus::Success));
//! ```
//!
//!
//! ## Ports
//!
//! A node declares the ports it reads with [`BehaviorNode::provided_ports`]
//! and reads them with [`Context::read_input`]. The mapping from port name to
//! blackboard variable or literal lives in the node's container.
//!
//! ```rust
//! # use ::behavior_tree_core::*;
//! let seq = BehaviorNodeContainer::new(
//!     "resumable",
//!     Box::new(SequenceNode::default()),
//!     hash_map!("start_idx" => BlackboardValue::Ref("checkpoint".into())),
//! );
//! ```
//!
//!
//! ## Wake-up
//!
//! When a child that [requires wake-up](BehaviorNode::requires_wake_up)
//! succeeds on the very tick it started, a [`SequenceNode`] returns `Running`
//! and emits the wake-up signal instead of moving on. [`Tree::tick_once`]
//! re-ticks immediately when that happens, and [`Tree::tick_while_running`]
//! stops sleeping early.

mod config;
mod container;
mod context;
mod control;
pub mod error;
mod nodes;
mod port;
mod registry;
mod symbol;
mod tree;
mod wake_up;

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

pub use crate::config::NodeConfig;
pub use crate::container::BehaviorNodeContainer;
pub use crate::context::Context;
pub use crate::control::ControlNode;
pub use crate::nodes::SequenceNode;
pub use crate::symbol::Symbol;
pub use crate::tree::Tree;
pub use crate::wake_up::WakeUpSignal;
pub use crate::{
    port::{PortSpec, PortType},
    registry::{boxify, Constructor, Registry},
};
pub use ::once_cell::sync::*;

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum NodeStatus {
    /// Not ticked since construction or the last halt. Never a tick result.
    Idle,
    /// The node should keep running in the next tick
    Running,
    Success,
    Failure,
    /// Deliberately not executed in this cycle
    Skipped,
}

impl NodeStatus {
    /// Any status a tick is allowed to return.
    pub fn is_active(self) -> bool {
        !matches!(self, NodeStatus::Idle)
    }
}

pub type TickResult = Result<NodeStatus, error::LogicError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlackboardValue {
    Ref(Symbol),
    Literal(String),
}

impl From<&str> for BlackboardValue {
    fn from(s: &str) -> Self {
        Self::Literal(s.to_owned())
    }
}

/// Blackboard is a mapping of a variable names and their values.
/// The value is wrapped in an `Any` trait object, so it can be any type.
pub type Blackboard = HashMap<Symbol, Rc<dyn Any>>;
pub type BBMap = HashMap<Symbol, BlackboardValue>;
pub type BehaviorCallback<'a> = &'a mut dyn FnMut(&dyn Any) -> Option<Box<dyn Any>>;

pub trait BehaviorNode {
    fn provided_ports(&self) -> Vec<PortSpec> {
        vec![]
    }

    /// Runs one evaluation step. Must not return [`NodeStatus::Idle`].
    fn tick(&mut self, arg: BehaviorCallback, ctx: &mut Context) -> TickResult;

    /// Aborts in-progress work and rewinds to the initial state.
    ///
    /// Called unconditionally by parents, so it has to be harmless on a node
    /// that is not running.
    fn halt(&mut self) {}

    /// Whether this node may complete asynchronously and benefit from an
    /// out-of-cadence re-tick of the tree.
    fn requires_wake_up(&self) -> bool {
        false
    }

    fn add_child(&mut self, _child: BehaviorNodeContainer) -> error::AddChildResult {
        Err(error::AddChildError::TooManyNodes)
    }
}

#[macro_export]
macro_rules! hash_map {
    () => {
        std::collections::HashMap::default()
    };
    ($($name: literal => $val: expr),+ $(,)?) => {{
        let mut ret = std::collections::HashMap::default();
        $(ret.insert($name.into(), $val.into());)+
        ret
    }};
}
