use crate::{error::ConfigError, BehaviorNode, BehaviorNodeContainer, NodeConfig, SequenceNode};
use std::collections::HashMap;

pub type Constructor = Box<dyn Fn() -> Box<dyn BehaviorNode>>;

pub fn boxify<T>(cons: impl (Fn() -> T) + 'static) -> Constructor
where
    T: BehaviorNode + 'static,
{
    Box::new(move || Box::new(cons()))
}

/// Constructors of node types, keyed by registration ID.
pub struct Registry {
    node_types: HashMap<String, Constructor>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut ret = Self {
            node_types: HashMap::new(),
        };
        ret.register(SequenceNode::REGISTRATION_ID, boxify(SequenceNode::default));
        ret
    }
}

impl Registry {
    pub fn register(&mut self, type_name: impl ToString, constructor: Constructor) {
        self.node_types.insert(type_name.to_string(), constructor);
    }

    pub fn build(&self, type_name: &str) -> Option<Box<dyn BehaviorNode>> {
        self.node_types
            .get(type_name)
            .map(|constructor| constructor())
    }

    /// Builds a node of `type_name` and wraps it with the name and port
    /// bindings of `config`. The instance name defaults to the type name.
    pub fn build_configured(
        &self,
        type_name: &str,
        config: &NodeConfig,
    ) -> Result<BehaviorNodeContainer, ConfigError> {
        let node = self
            .build(type_name)
            .ok_or_else(|| ConfigError::MissingNode(type_name.to_owned()))?;
        config.instantiate(type_name, node)
    }
}
