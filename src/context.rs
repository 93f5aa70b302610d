use crate::{BBMap, Blackboard, BlackboardValue, Symbol, WakeUpSignal};
use std::{any::Any, rc::Rc, str::FromStr};
use tracing::{debug, warn};

/// Everything a node can see while it is being ticked: the blackboard, the
/// port mapping of the node currently ticking and the driver's wake-up signal.
#[derive(Default)]
pub struct Context {
    blackboard: Blackboard,
    pub(crate) blackboard_map: BBMap,
    wake_up: Option<WakeUpSignal>,
}

impl Context {
    pub fn new(blackboard: Blackboard) -> Self {
        Self {
            blackboard,
            blackboard_map: BBMap::new(),
            wake_up: None,
        }
    }

    pub fn take_blackboard(self) -> Blackboard {
        self.blackboard
    }

    /// Registers the listener that [`Self::emit_wake_up_signal`] notifies.
    pub fn set_wake_up_signal(&mut self, signal: WakeUpSignal) {
        self.wake_up = Some(signal);
    }

    pub fn wake_up_signal(&self) -> Option<&WakeUpSignal> {
        self.wake_up.as_ref()
    }

    /// Asks the driver for an immediate extra tick. Without a registered
    /// listener this does nothing.
    pub fn emit_wake_up_signal(&self) {
        if let Some(signal) = &self.wake_up {
            debug!("wake-up signal emitted");
            signal.emit();
        }
    }

    pub fn get<T: 'static>(&self, key: impl Into<Symbol>) -> Option<&T> {
        let key: Symbol = key.into();
        let mapped = match self.blackboard_map.get(&key) {
            None => key,
            Some(BlackboardValue::Ref(mapped)) => *mapped,
            Some(BlackboardValue::Literal(mapped)) => {
                return (mapped as &dyn Any).downcast_ref();
            }
        };

        self.blackboard
            .get(&mapped)
            .and_then(|val| val.downcast_ref())
    }

    /// Reads a `T` directly, or parses it if the port holds a string.
    pub fn get_parse<T>(&self, key: impl Into<Symbol>) -> Option<T>
    where
        T: FromStr + Clone + 'static,
    {
        self.get_parse_inner(key.into()).and_then(Result::ok)
    }

    fn get_parse_inner<T>(&self, key: Symbol) -> Option<Result<T, T::Err>>
    where
        T: FromStr + Clone + 'static,
    {
        if let Some(val) = self.get::<T>(key) {
            return Some(Ok(val.clone()));
        }
        if let Some(s) = self.get::<String>(key) {
            return Some(s.parse());
        }
        self.get::<&'static str>(key).map(|s| s.parse())
    }

    /// Fetches the value bound to an input port.
    ///
    /// `None` means "no override": the port is unbound, or bound to something
    /// that does not convert to `T`. The latter is logged.
    pub fn read_input<T>(&self, key: impl Into<Symbol>) -> Option<T>
    where
        T: FromStr + Clone + 'static,
    {
        let key = key.into();
        match self.get_parse_inner::<T>(key)? {
            Ok(val) => Some(val),
            Err(_) => {
                warn!(port = %key, "input port value could not be converted, ignoring");
                None
            }
        }
    }

    /// Writes to the blackboard entry the port `key` is mapped to.
    ///
    /// Returns `false` if the port is bound to a literal, which cannot be written.
    pub fn set<T: 'static>(&mut self, key: impl Into<Symbol>, val: T) -> bool {
        let key = key.into();
        let mapped = match self.blackboard_map.get(&key) {
            None => key,
            Some(BlackboardValue::Ref(mapped)) => *mapped,
            Some(BlackboardValue::Literal(_)) => {
                warn!(port = %key, "attempted to write to a literal port");
                return false;
            }
        };
        self.blackboard.insert(mapped, Rc::new(val));
        true
    }
}
