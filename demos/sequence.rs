//! Runs a small patrol routine. Try `RUST_LOG=behavior_tree_core=trace`.

use ::behavior_tree_core::{
    boxify, BehaviorCallback, BehaviorNode, Context, Lazy, NodeConfig, NodeStatus, PortSpec,
    Registry, Symbol, TickResult, Tree,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

static TARGET: Lazy<Symbol> = Lazy::new(|| "target".into());

/// Pretends to walk to a waypoint, taking a few ticks.
struct MoveTo {
    steps_left: Option<u32>,
}

impl BehaviorNode for MoveTo {
    fn provided_ports(&self) -> Vec<PortSpec> {
        vec![PortSpec::new_in(*TARGET).typed::<String>()]
    }

    fn tick(&mut self, arg: BehaviorCallback, ctx: &mut Context) -> TickResult {
        let target = ctx.read_input::<String>(*TARGET).unwrap_or_default();
        let left = self.steps_left.unwrap_or(2);
        if left == 0 {
            self.steps_left = None;
            arg(&format!("arrived at {target}"));
            return Ok(NodeStatus::Success);
        }
        arg(&format!("walking to {target}"));
        self.steps_left = Some(left - 1);
        Ok(NodeStatus::Running)
    }

    fn halt(&mut self) {
        self.steps_left = None;
    }
}

/// Checks the battery; asynchronous in a real robot, immediate here.
struct CheckBattery;

impl BehaviorNode for CheckBattery {
    fn tick(&mut self, arg: BehaviorCallback, _ctx: &mut Context) -> TickResult {
        arg(&"battery ok".to_string());
        Ok(NodeStatus::Success)
    }

    fn requires_wake_up(&self) -> bool {
        true
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut registry = Registry::default();
    registry.register("MoveTo", boxify(|| MoveTo { steps_left: None }));
    registry.register("CheckBattery", boxify(|| CheckBattery));

    let mut root = registry.build_configured(
        "Sequence",
        &NodeConfig::from_yaml("name: patrol\nports:\n  start_idx: \"{resume_at}\"\n")?,
    )?;
    root.add_child(registry.build_configured("CheckBattery", &NodeConfig::default())?)?;
    for waypoint in ["kitchen", "hallway"] {
        let config =
            NodeConfig::from_yaml(&format!("name: {waypoint}\nports:\n  target: {waypoint}\n"))?;
        root.add_child(registry.build_configured("MoveTo", &config)?)?;
    }

    let mut ctx = Context::default();
    ctx.set("resume_at", 0usize);
    let mut tree = Tree::with_context(root, ctx);

    let result = tree.tick_while_running(
        &mut |v| {
            if let Some(msg) = v.downcast_ref::<String>() {
                println!("{msg}");
            }
            None
        },
        Duration::from_millis(100),
    )?;

    println!("result: {result:?}");
    println!("Total symbols: {}", Symbol::count());
    Ok(())
}
