use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::interpreter::symbols::{
    function::Function,
    identifier::{Identifier, fnv1a_32},
    instance::Instance,
    types::{Type, TypeRef},
};

/// A named registry of types, functions, instances and child namespaces.
///
/// The environment owns one root namespace; hosts may create children and
/// register symbols into them, which scripts reach through `::`-qualified
/// names and `using namespace` directives. Each namespace carries its own
/// stack-like instance vector; releasing a scope level recurses into the
/// children.
#[derive(Debug)]
pub struct Namespace {
    /// The namespace's name; empty for the root.
    pub identifier: Identifier,
    namespaces:     HashMap<u32, Namespace>,
    types:          HashMap<u32, TypeRef>,
    functions:      HashMap<u32, Vec<Function>>,
    instances:      Vec<Instance>,
}

impl Namespace {
    /// Creates an empty namespace.
    #[must_use]
    pub fn new(identifier: Identifier) -> Self {
        Self { identifier,
               namespaces: HashMap::new(),
               types: HashMap::new(),
               functions: HashMap::new(),
               instances: Vec::new() }
    }

    /// Gets or creates a direct child namespace.
    pub fn child_mut(&mut self, name: &str) -> &mut Self {
        let identifier = Identifier::new(name);
        self.namespaces
            .entry(identifier.hash)
            .or_insert_with(|| Self::new(identifier))
    }

    /// Registers a type, returning the shared handle.
    pub fn register_type(&mut self, ty: Type) -> TypeRef {
        let hash = ty.identifier.hash;
        let type_ref: TypeRef = Rc::new(RefCell::new(ty));
        self.types.insert(hash, Rc::clone(&type_ref));
        type_ref
    }

    /// Looks up a type registered directly in this namespace.
    #[must_use]
    pub fn get_type(&self, hash: u32) -> Option<TypeRef> {
        self.types.get(&hash).map(Rc::clone)
    }

    /// Looks up a type by a `::`-joined path relative to this namespace.
    #[must_use]
    pub fn get_type_by_path(&self, path: &str) -> Option<TypeRef> {
        match path.split_once("::") {
            Some((namespace, rest)) => self.namespaces
                                           .get(&fnv1a_32(namespace))
                                           .and_then(|child| child.get_type_by_path(rest)),
            None => self.get_type(fnv1a_32(path)),
        }
    }

    /// Registers a function.
    ///
    /// A function with the same name and parameter list replaces the
    /// previous registration; otherwise the overload list is extended.
    pub fn register_function(&mut self, function: Function) {
        let overloads = self.functions.entry(function.identifier.hash).or_default();

        for existing in overloads.iter_mut() {
            if existing.parameters == function.parameters {
                *existing = function;
                return;
            }
        }

        overloads.push(function);
    }

    /// Looks up the first overload registered under a name.
    #[must_use]
    pub fn get_function(&self, hash: u32) -> Option<Function> {
        self.functions
            .get(&hash)
            .and_then(|overloads| overloads.first())
            .cloned()
    }

    /// Looks up the full overload list registered under a name.
    #[must_use]
    pub fn get_functions(&self, hash: u32) -> Option<&Vec<Function>> {
        self.functions.get(&hash)
    }

    /// Looks up a function by a `::`-joined path relative to this namespace.
    #[must_use]
    pub fn get_function_by_path(&self, path: &str) -> Option<Function> {
        match path.split_once("::") {
            Some((namespace, rest)) => self.namespaces
                                           .get(&fnv1a_32(namespace))
                                           .and_then(|child| child.get_function_by_path(rest)),
            None => self.get_function(fnv1a_32(path)),
        }
    }

    /// Appends an instance to the instance stack.
    pub fn register_instance(&mut self, instance: Instance) {
        self.instances.push(instance);
    }

    /// Finds the most recently registered instance with the given name.
    ///
    /// The back-to-front scan is what implements lexical shadowing: the
    /// innermost declaration wins.
    #[must_use]
    pub fn retrieve_instance(&self, identifier: &Identifier) -> Option<&Instance> {
        self.instances
            .iter()
            .rev()
            .find(|instance| instance.identifier == *identifier)
    }

    /// Mutable access to the most recently registered instance with the
    /// given name.
    #[must_use]
    pub fn retrieve_instance_mut(&mut self, identifier: &Identifier) -> Option<&mut Instance> {
        self.instances
            .iter_mut()
            .rev()
            .find(|instance| instance.identifier == *identifier)
    }

    /// Pops every instance registered at `scope_level` or deeper, recursing
    /// into child namespaces.
    pub fn release_instances(&mut self, scope_level: u32) {
        while self.instances
                  .last()
                  .is_some_and(|instance| instance.scope_level >= scope_level)
        {
            self.instances.pop();
        }

        for child in self.namespaces.values_mut() {
            child.release_instances(scope_level);
        }
    }

    /// The number of instances currently registered here.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }
}
