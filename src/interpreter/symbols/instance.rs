use crate::interpreter::{
    symbols::{identifier::Identifier, types::TypeUsage},
    value::core::Value,
};

/// A named storage cell within a scope.
///
/// Instances are what variable lookups resolve to. They live in a
/// namespace's stack-like instance vector, tagged with the scope level they
/// were registered at so whole scopes can be popped on exit. The instance
/// owns its [`Value`], and the value owns (or borrows) its buffer per the
/// buffer-mode rules.
#[derive(Debug, Clone)]
pub struct Instance {
    /// The instance's name.
    pub identifier:  Identifier,
    /// The declared type of the instance.
    pub type_usage:  TypeUsage,
    /// The scope level the instance was registered at.
    pub scope_level: u32,
    /// The instance's storage.
    pub value:       Value,
}
