//! Per-node configuration: instance name and port bindings.
//!
//! ```yaml
//! name: patrol
//! ports:
//!   start_idx: "{checkpoint}"   # blackboard variable
//! ```
//!
//! A port value in braces refers to a blackboard variable, anything else is a
//! literal string that the node parses when it reads the port.

use crate::{error::ConfigError, BBMap, BehaviorNode, BehaviorNodeContainer, BlackboardValue};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ports: BTreeMap<String, String>,
}

impl NodeConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Resolves the textual port values into a [`BBMap`].
    pub fn blackboard_map(&self) -> BBMap {
        self.ports
            .iter()
            .map(|(port, value)| (port.into(), parse_port_value(value)))
            .collect()
    }

    /// Wraps `node` into a container, rejecting bindings for ports the node
    /// does not declare.
    pub fn instantiate(
        &self,
        type_name: &str,
        node: Box<dyn BehaviorNode>,
    ) -> Result<BehaviorNodeContainer, ConfigError> {
        let provided = node.provided_ports();
        if let Some(port) = self
            .ports
            .keys()
            .find(|port| !provided.iter().any(|spec| spec.key == port.as_str()))
        {
            return Err(ConfigError::UnknownPort {
                node: type_name.to_owned(),
                port: port.clone(),
            });
        }
        let name = self.name.clone().unwrap_or_else(|| type_name.to_owned());
        Ok(BehaviorNodeContainer::new(name, node, self.blackboard_map()))
    }
}

fn parse_port_value(value: &str) -> BlackboardValue {
    match value
        .trim()
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    {
        Some(key) => BlackboardValue::Ref(key.trim().into()),
        None => BlackboardValue::Literal(value.to_owned()),
    }
}
