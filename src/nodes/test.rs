use super::*;
use crate::{BBMap, BlackboardValue, PortType, WakeUpSignal};
use std::{cell::Cell, collections::VecDeque, rc::Rc};

use crate::NodeStatus::*;

struct Append<const V: bool = true>;

impl<const V: bool> BehaviorNode for Append<V> {
    fn tick(&mut self, arg: BehaviorCallback, _ctx: &mut Context) -> TickResult {
        arg(&V);
        Ok(Success)
    }
}

struct Suspend;

impl BehaviorNode for Suspend {
    fn tick(&mut self, _arg: BehaviorCallback, _ctx: &mut Context) -> TickResult {
        Ok(Running)
    }
}

#[derive(Clone, Default)]
struct Calls {
    ticks: Rc<Cell<usize>>,
    halts: Rc<Cell<usize>>,
}

/// Returns the scripted statuses in order, then repeats the last one.
struct Scripted {
    script: VecDeque<NodeStatus>,
    last: NodeStatus,
    calls: Calls,
    wake_up: bool,
}

impl BehaviorNode for Scripted {
    fn tick(&mut self, _arg: BehaviorCallback, _ctx: &mut Context) -> TickResult {
        self.calls.ticks.set(self.calls.ticks.get() + 1);
        if let Some(status) = self.script.pop_front() {
            self.last = status;
        }
        Ok(self.last)
    }

    fn halt(&mut self) {
        self.calls.halts.set(self.calls.halts.get() + 1);
    }

    fn requires_wake_up(&self) -> bool {
        self.wake_up
    }
}

fn scripted_node(
    name: &str,
    script: &[NodeStatus],
    wake_up: bool,
) -> (BehaviorNodeContainer, Calls) {
    let calls = Calls::default();
    let node = Scripted {
        script: script.iter().copied().collect(),
        last: Success,
        calls: calls.clone(),
        wake_up,
    };
    (BehaviorNodeContainer::new_node(name, node), calls)
}

fn scripted(name: &str, script: &[NodeStatus]) -> (BehaviorNodeContainer, Calls) {
    scripted_node(name, script, false)
}

fn tick(tree: &mut SequenceNode, ctx: &mut Context) -> TickResult {
    tree.tick(&mut |_| None, ctx)
}

#[test]
fn test_sequence() {
    let mut res = vec![];

    let mut append = |v: &dyn std::any::Any| -> Option<Box<dyn std::any::Any>> {
        res.push(*v.downcast_ref::<bool>().unwrap());
        None
    };

    let mut tree = SequenceNode::default();
    tree.add_child(BehaviorNodeContainer::new_node("a", Append::<true>))
        .unwrap();
    tree.add_child(BehaviorNodeContainer::new_node("b", Append::<false>))
        .unwrap();

    assert_eq!(Ok(Success), tree.tick(&mut append, &mut Context::default()));

    assert_eq!(res, vec![true, false]);
    assert_eq!(tree.current_child_idx(), 0);
}

#[test]
fn test_sequence_failure_short_circuits() {
    let (first, first_calls) = scripted("first", &[Success]);
    let (second, second_calls) = scripted("second", &[Failure]);
    let (third, third_calls) = scripted("third", &[Success]);
    let mut tree = SequenceNode::with_children(vec![first, second, third]);

    assert_eq!(tick(&mut tree, &mut Context::default()), Ok(Failure));

    assert_eq!(first_calls.ticks.get(), 1);
    assert_eq!(second_calls.ticks.get(), 1);
    assert_eq!(third_calls.ticks.get(), 0);

    // Every child is reset, including the one never reached
    for calls in [&first_calls, &second_calls, &third_calls] {
        assert_eq!(calls.halts.get(), 1);
    }
    assert!(tree.children().iter().all(|c| c.status() == Idle));
    assert_eq!(tree.current_child_idx(), 0);
}

#[test]
fn test_sequence_failure_is_not_retried() {
    let (first, first_calls) = scripted("first", &[Failure, Success]);
    let (second, _) = scripted("second", &[Success]);
    let mut tree = SequenceNode::with_children(vec![first, second]);
    let mut ctx = Context::default();

    assert_eq!(tick(&mut tree, &mut ctx), Ok(Failure));
    assert_eq!(first_calls.ticks.get(), 1);

    // A new cycle starts from the anchor on the next tick
    assert_eq!(tick(&mut tree, &mut ctx), Ok(Success));
    assert_eq!(first_calls.ticks.get(), 2);
}

#[test]
fn test_sequence_all_success_over_ticks() {
    let (first, first_calls) = scripted("first", &[Running, Success]);
    let (second, second_calls) = scripted("second", &[Running, Success]);
    let (third, third_calls) = scripted("third", &[Running, Success]);
    let mut tree = SequenceNode::with_children(vec![first, second, third]);
    let mut ctx = Context::default();

    assert_eq!(tick(&mut tree, &mut ctx), Ok(Running));
    assert_eq!(tree.current_child_idx(), 0);
    assert_eq!(tick(&mut tree, &mut ctx), Ok(Running));
    assert_eq!(tree.current_child_idx(), 1);
    assert_eq!(tick(&mut tree, &mut ctx), Ok(Running));
    assert_eq!(tree.current_child_idx(), 2);
    assert_eq!(tick(&mut tree, &mut ctx), Ok(Success));
    assert_eq!(tree.current_child_idx(), 0);

    assert_eq!(first_calls.ticks.get(), 2);
    assert_eq!(second_calls.ticks.get(), 2);
    assert_eq!(third_calls.ticks.get(), 2);
    assert!(tree.children().iter().all(|c| c.status() == Idle));
}

#[test]
fn test_sequence_suspend() {
    let mut res = vec![];

    let mut tree = SequenceNode::default();
    tree.add_child(BehaviorNodeContainer::new_node("a", Append::<true>))
        .unwrap();
    tree.add_child(BehaviorNodeContainer::new_node("suspend", Suspend))
        .unwrap();
    tree.add_child(BehaviorNodeContainer::new_node("b", Append::<false>))
        .unwrap();

    assert_eq!(
        tree.tick(
            &mut |v: &dyn std::any::Any| {
                res.push(*v.downcast_ref::<bool>().unwrap());
                None
            },
            &mut Context::default(),
        ),
        Ok(Running)
    );

    assert_eq!(res, vec![true]);
    assert_eq!(tree.current_child_idx(), 1);

    // Ticking again resumes on the suspended child, neither push(true) nor push(false) happens
    tree.tick(
        &mut |v: &dyn std::any::Any| {
            res.push(*v.downcast_ref::<bool>().unwrap());
            None
        },
        &mut Context::default(),
    )
    .unwrap();

    assert_eq!(res, vec![true]);
    assert_eq!(tree.current_child_idx(), 1);
}

#[test]
fn test_sequence_all_skipped() {
    let (first, _) = scripted("first", &[Skipped]);
    let (second, _) = scripted("second", &[Skipped]);
    let mut tree = SequenceNode::with_children(vec![first, second]);

    assert_eq!(tick(&mut tree, &mut Context::default()), Ok(Skipped));
    assert_eq!(tree.current_child_idx(), 0);
}

#[test]
fn test_sequence_empty_is_skipped() {
    let mut tree = SequenceNode::default();
    assert_eq!(tick(&mut tree, &mut Context::default()), Ok(Skipped));
}

#[test]
fn test_sequence_some_skipped() {
    let (first, _) = scripted("first", &[Skipped]);
    let (second, _) = scripted("second", &[Success]);
    let (third, _) = scripted("third", &[Skipped]);
    let mut tree = SequenceNode::with_children(vec![first, second, third]);

    assert_eq!(tick(&mut tree, &mut Context::default()), Ok(Success));
}

#[test]
fn test_sequence_skips_after_work_in_same_cycle() {
    let (first, _) = scripted("first", &[Running, Success]);
    let (second, _) = scripted("second", &[Skipped]);
    let mut tree = SequenceNode::with_children(vec![first, second]);
    let mut ctx = Context::default();

    assert_eq!(tick(&mut tree, &mut ctx), Ok(Running));
    // The first child worked earlier in this cycle, so this is not vacuous
    assert_eq!(tick(&mut tree, &mut ctx), Ok(Success));
}

#[test]
fn test_start_idx_jumps_forward() {
    let (first, first_calls) = scripted("first", &[Success]);
    let (second, second_calls) = scripted("second", &[Success]);
    let (third, third_calls) = scripted("third", &[Success]);
    let mut tree = SequenceNode::with_children(vec![first, second, third]);
    let mut ctx = Context::default();
    ctx.set("start_idx", 2usize);

    assert_eq!(tick(&mut tree, &mut ctx), Ok(Success));
    assert_eq!(first_calls.ticks.get(), 0);
    assert_eq!(second_calls.ticks.get(), 0);
    assert_eq!(third_calls.ticks.get(), 1);
    assert_eq!(tree.start_idx(), 2);
    assert_eq!(tree.current_child_idx(), 2);
}

#[test]
fn test_start_idx_from_literal_port() {
    let (first, first_calls) = scripted("first", &[Success]);
    let (second, second_calls) = scripted("second", &[Success]);
    let mut tree = SequenceNode::with_children(vec![first, second]);
    let mut ctx = Context::default();
    ctx.blackboard_map = BBMap::from([(*START_IDX, BlackboardValue::from("1"))]);

    assert_eq!(tick(&mut tree, &mut ctx), Ok(Success));
    assert_eq!(first_calls.ticks.get(), 0);
    assert_eq!(second_calls.ticks.get(), 1);
}

#[test]
fn test_start_idx_never_rewinds() {
    let (first, first_calls) = scripted("first", &[Success]);
    let (second, second_calls) = scripted("second", &[Running, Running, Success]);
    let (third, _) = scripted("third", &[Success]);
    let (fourth, fourth_calls) = scripted("fourth", &[Success]);
    let mut tree = SequenceNode::with_children(vec![first, second, third, fourth]);
    let mut ctx = Context::default();

    assert_eq!(tick(&mut tree, &mut ctx), Ok(Running));
    assert_eq!(tree.current_child_idx(), 1);

    // Lower than the current index: no effect on this cycle
    ctx.set("start_idx", 0usize);
    assert_eq!(tick(&mut tree, &mut ctx), Ok(Running));
    assert_eq!(tree.current_child_idx(), 1);
    assert_eq!(first_calls.ticks.get(), 1);
    assert_eq!(second_calls.ticks.get(), 2);

    // Higher: jump over the running child
    ctx.set("start_idx", 3usize);
    assert_eq!(tick(&mut tree, &mut ctx), Ok(Success));
    assert_eq!(second_calls.ticks.get(), 2);
    assert_eq!(fourth_calls.ticks.get(), 1);
    assert_eq!(tree.current_child_idx(), 3);
}

#[test]
fn test_start_idx_is_resume_anchor_on_failure() {
    let (first, _) = scripted("first", &[Success]);
    let (second, _) = scripted("second", &[Success]);
    let (third, _) = scripted("third", &[Failure]);
    let mut tree = SequenceNode::with_children(vec![first, second, third]);
    let mut ctx = Context::default();
    ctx.set("start_idx", 1usize);

    assert_eq!(tick(&mut tree, &mut ctx), Ok(Failure));
    assert_eq!(tree.current_child_idx(), 1);
}

#[test]
fn test_start_idx_beyond_children() {
    let (first, first_calls) = scripted("first", &[Success]);
    let (second, _) = scripted("second", &[Success]);
    let mut tree = SequenceNode::with_children(vec![first, second]);
    let mut ctx = Context::default();
    ctx.set("start_idx", 5usize);

    assert_eq!(tick(&mut tree, &mut ctx), Ok(Skipped));
    assert_eq!(first_calls.ticks.get(), 0);
    assert_eq!(tree.start_idx(), 5);
    assert!(tree.current_child_idx() <= tree.children().len());
}

#[test]
fn test_start_idx_unparsable_is_ignored() {
    let (first, first_calls) = scripted("first", &[Success]);
    let mut tree = SequenceNode::with_children(vec![first]);
    let mut ctx = Context::default();
    ctx.set("start_idx", "not a number");

    assert_eq!(tick(&mut tree, &mut ctx), Ok(Success));
    assert_eq!(first_calls.ticks.get(), 1);
    assert_eq!(tree.start_idx(), 0);
}

#[test]
fn test_idle_child_is_logic_error() {
    let (first, first_calls) = scripted("first", &[Success]);
    let (second, second_calls) = scripted("broken", &[Idle, Success]);
    let mut tree = SequenceNode::with_children(vec![first, second]);
    let mut ctx = Context::default();

    assert!(matches!(
        tick(&mut tree, &mut ctx),
        Err(LogicError::IdleStatus { child, .. }) if child == "broken"
    ));
    assert_eq!(tree.current_child_idx(), 1);

    // The child behaves now; the sequence picks up where it stopped
    assert_eq!(tick(&mut tree, &mut ctx), Ok(Success));
    assert_eq!(first_calls.ticks.get(), 1);
    assert_eq!(second_calls.ticks.get(), 2);
    assert_eq!(tree.current_child_idx(), 0);
}

#[test]
fn test_idle_error_names_container() {
    let (first, _) = scripted("first", &[Success]);
    let (second, _) = scripted("broken", &[Idle]);
    let inner = SequenceNode::with_children(vec![first, second]);
    let (last, last_calls) = scripted("last", &[Success]);
    let outer = SequenceNode::with_children(vec![
        BehaviorNodeContainer::new_node("inner", inner),
        last,
    ]);
    let mut tree = BehaviorNodeContainer::new_node("outer", outer);

    // The innermost composite is named, not the one the error passed through
    assert_eq!(
        tree.tick(&mut |_| None, &mut Context::default()),
        Err(LogicError::IdleStatus {
            parent: "inner".to_owned(),
            child: "broken".to_owned(),
        })
    );
    assert_eq!(tree.status(), Idle);
    assert_eq!(last_calls.ticks.get(), 0);
}

#[test]
fn test_wake_up_on_async_child_finishing_first_tick() {
    let (first, _) = scripted_node("async", &[Success], true);
    let (second, second_calls) = scripted("second", &[Success]);
    let mut tree = SequenceNode::with_children(vec![first, second]);
    let signal = WakeUpSignal::new();
    let mut ctx = Context::default();
    ctx.set_wake_up_signal(signal.clone());

    assert_eq!(tick(&mut tree, &mut ctx), Ok(Running));
    assert!(signal.take());
    assert!(!signal.take());
    assert_eq!(second_calls.ticks.get(), 0);
    assert_eq!(tree.current_child_idx(), 1);

    assert_eq!(tick(&mut tree, &mut ctx), Ok(Success));
    assert!(!signal.is_pending());
    assert_eq!(second_calls.ticks.get(), 1);
}

#[test]
fn test_no_wake_up_for_continuing_async_child() {
    let (first, _) = scripted_node("async", &[Running, Success], true);
    let (second, second_calls) = scripted("second", &[Success]);
    let mut tree = SequenceNode::with_children(vec![first, second]);
    let signal = WakeUpSignal::new();
    let mut ctx = Context::default();
    ctx.set_wake_up_signal(signal.clone());

    assert_eq!(tick(&mut tree, &mut ctx), Ok(Running));
    assert!(!signal.is_pending());

    // Was Running before this tick, so the sequence just moves on
    assert_eq!(tick(&mut tree, &mut ctx), Ok(Success));
    assert!(!signal.is_pending());
    assert_eq!(second_calls.ticks.get(), 1);
}

#[test]
fn test_no_wake_up_for_last_child() {
    let (first, _) = scripted("first", &[Success]);
    let (last, _) = scripted_node("async", &[Success], true);
    let mut tree = SequenceNode::with_children(vec![first, last]);
    let signal = WakeUpSignal::new();
    let mut ctx = Context::default();
    ctx.set_wake_up_signal(signal.clone());

    assert_eq!(tick(&mut tree, &mut ctx), Ok(Success));
    assert!(!signal.is_pending());
}

#[test]
fn test_wake_up_without_listener() {
    let (first, _) = scripted_node("async", &[Success], true);
    let (second, _) = scripted("second", &[Success]);
    let mut tree = SequenceNode::with_children(vec![first, second]);
    let mut ctx = Context::default();

    assert_eq!(tick(&mut tree, &mut ctx), Ok(Running));
    assert_eq!(tick(&mut tree, &mut ctx), Ok(Success));
}

#[test]
fn test_halt_resets_to_anchor() {
    let (first, first_calls) = scripted("first", &[Success]);
    let (second, second_calls) = scripted("second", &[Running]);
    let mut tree = SequenceNode::with_children(vec![first, second]);
    let mut ctx = Context::default();

    assert_eq!(tick(&mut tree, &mut ctx), Ok(Running));
    assert_eq!(tree.children()[1].status(), Running);

    tree.halt();
    assert_eq!(tree.current_child_idx(), 0);
    assert_eq!(first_calls.halts.get(), 1);
    assert_eq!(second_calls.halts.get(), 1);
    assert!(tree.children().iter().all(|c| c.status() == Idle));

    // Halting an idle sequence is harmless
    tree.halt();
    assert_eq!(tree.current_child_idx(), 0);

    assert_eq!(tick(&mut tree, &mut ctx), Ok(Running));
    assert_eq!(first_calls.ticks.get(), 2);
}

#[test]
fn test_provided_ports() {
    let ports = SequenceNode::default().provided_ports();
    assert_eq!(ports.len(), 1);
    assert_eq!(ports[0].key, "start_idx");
    assert_eq!(ports[0].ty, PortType::Input);
    assert_eq!(ports[0].value_type, Some(std::any::type_name::<usize>()));
}
