use crate::{
    error::LogicError, BehaviorCallback, BehaviorNodeContainer, Context, NodeStatus, TickResult,
    WakeUpSignal,
};
use std::time::Duration;
use tracing::debug;

/// The root of a behavior tree together with the state a driver needs to
/// tick it: the blackboard context and the wake-up signal nodes emit into.
///
/// How often to tick is up to the caller; `Tree` only decides what happens
/// inside a tick and whether an emitted wake-up earns an immediate re-tick.
pub struct Tree {
    root: BehaviorNodeContainer,
    ctx: Context,
    wake_up: WakeUpSignal,
}

impl Tree {
    pub fn new(root: BehaviorNodeContainer) -> Self {
        Self::with_context(root, Context::default())
    }

    pub fn with_context(root: BehaviorNodeContainer, mut ctx: Context) -> Self {
        let wake_up = WakeUpSignal::new();
        ctx.set_wake_up_signal(wake_up.clone());
        Self { root, ctx, wake_up }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    /// A handle other threads can emit on to wake a sleeping driver.
    pub fn wake_up_signal(&self) -> WakeUpSignal {
        self.wake_up.clone()
    }

    pub fn root(&self) -> &BehaviorNodeContainer {
        &self.root
    }

    pub fn root_status(&self) -> NodeStatus {
        self.root.status()
    }

    fn tick_root(&mut self, arg: BehaviorCallback) -> TickResult {
        let status = self.root.tick(arg, &mut self.ctx)?;
        if !status.is_active() {
            return Err(LogicError::IdleRoot {
                node: self.root.name().to_owned(),
            });
        }
        Ok(status)
    }

    /// Ticks the root exactly once, ignoring wake-up requests.
    pub fn tick_exactly_once(&mut self, arg: BehaviorCallback) -> TickResult {
        self.tick_root(arg)
    }

    /// Ticks the root, then keeps re-ticking immediately as long as the tree
    /// is still `Running` and a node asked for a wake-up during the last tick.
    pub fn tick_once(&mut self, arg: BehaviorCallback) -> TickResult {
        // Signals from before this call belong to the caller's sleep, not to us.
        self.wake_up.take();
        let mut status = self.tick_root(arg)?;
        while status == NodeStatus::Running && self.wake_up.take() {
            debug!(root = %self.root.name(), "re-ticking on wake-up");
            status = self.tick_root(arg)?;
        }
        Ok(status)
    }

    /// Ticks until the root reaches a terminal status. Between ticks it sleeps
    /// up to `sleep`, returning early if a wake-up signal is emitted.
    pub fn tick_while_running(&mut self, arg: BehaviorCallback, sleep: Duration) -> TickResult {
        let mut status = self.tick_root(arg)?;
        while status == NodeStatus::Running {
            self.wake_up.wait_for(sleep);
            status = self.tick_root(arg)?;
        }
        Ok(status)
    }

    /// Halts every node, leaving the whole tree `Idle`.
    pub fn halt_tree(&mut self) {
        self.root.halt();
    }
}
