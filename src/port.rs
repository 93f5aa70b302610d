use crate::Symbol;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PortType {
    Input,
    Output,
    InOut,
}

/// Static declaration of a named runtime parameter a node reads or writes.
///
/// `value_type` is informational only; ports are resolved and converted at
/// read time by [`crate::Context::read_input`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PortSpec {
    pub ty: PortType,
    pub key: Symbol,
    pub value_type: Option<&'static str>,
}

impl PortSpec {
    pub fn new_in(key: impl Into<Symbol>) -> Self {
        Self {
            ty: PortType::Input,
            key: key.into(),
            value_type: None,
        }
    }

    pub fn new_out(key: impl Into<Symbol>) -> Self {
        Self {
            ty: PortType::Output,
            key: key.into(),
            value_type: None,
        }
    }

    pub fn new_inout(key: impl Into<Symbol>) -> Self {
        Self {
            ty: PortType::InOut,
            key: key.into(),
            value_type: None,
        }
    }

    /// Attaches the Rust type the port is expected to carry.
    pub fn typed<T: 'static>(self) -> Self {
        Self {
            value_type: Some(std::any::type_name::<T>()),
            ..self
        }
    }
}
