use crate::{
    error::AddChildResult, BBMap, BehaviorCallback, BehaviorNode, BlackboardValue, Context,
    NodeStatus, PortSpec, Symbol, TickResult,
};
use tracing::{debug_span, trace};

/// Owning handle of a node inside its parent.
///
/// Besides the node itself it keeps the instance name, the port mapping that
/// is swapped into the [`Context`] while the node ticks, and the status the
/// node reported last. A parent reads that status to tell a child that just
/// started from one that is continuing work.
pub struct BehaviorNodeContainer {
    pub(crate) name: String,
    pub(crate) node: Box<dyn BehaviorNode>,
    pub(crate) blackboard_map: BBMap,
    pub(crate) status: NodeStatus,
}

impl BehaviorNodeContainer {
    pub fn new(
        name: impl Into<String>,
        node: Box<dyn BehaviorNode>,
        blackboard_map: BBMap,
    ) -> Self {
        Self {
            name: name.into(),
            node,
            blackboard_map,
            status: NodeStatus::Idle,
        }
    }

    pub fn new_raw(name: impl Into<String>, node: Box<dyn BehaviorNode>) -> Self {
        Self::new(name, node, BBMap::new())
    }

    pub fn new_node(name: impl Into<String>, node: impl BehaviorNode + 'static) -> Self {
        Self::new(name, Box::new(node), BBMap::new())
    }

    /// Ticks the node with its own port mapping in place and records the
    /// returned status. A [`crate::error::LogicError`] leaves the recorded
    /// status untouched and gets this container's name as its parent if the
    /// node did not set one.
    pub fn tick(&mut self, arg: BehaviorCallback, ctx: &mut Context) -> TickResult {
        let span = debug_span!("tick", node = %self.name);
        let _enter = span.enter();

        std::mem::swap(&mut self.blackboard_map, &mut ctx.blackboard_map);
        let res = self.node.tick(arg, ctx);
        std::mem::swap(&mut self.blackboard_map, &mut ctx.blackboard_map);
        match res {
            Ok(status) => {
                trace!(prev = ?self.status, ?status, "ticked");
                self.status = status;
                Ok(status)
            }
            Err(e) => Err(e.with_parent(&self.name)),
        }
    }

    /// Halts the node and puts it back to `Idle`. Safe on idle nodes.
    pub fn halt(&mut self) {
        self.node.halt();
        self.status = NodeStatus::Idle;
    }

    pub fn add_child(&mut self, child: BehaviorNodeContainer) -> AddChildResult {
        self.node.add_child(child)
    }

    pub fn status(&self) -> NodeStatus {
        self.status
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requires_wake_up(&self) -> bool {
        self.node.requires_wake_up()
    }

    pub fn provided_ports(&self) -> Vec<PortSpec> {
        self.node.provided_ports()
    }

    pub fn blackboard_map(&self) -> &BBMap {
        &self.blackboard_map
    }

    /// Binds `port` to a blackboard variable or literal, replacing any
    /// previous binding.
    pub fn bind_port(&mut self, port: impl Into<Symbol>, value: BlackboardValue) {
        self.blackboard_map.insert(port.into(), value);
    }
}
