use std::{collections::HashMap, rc::Rc};

use log::{debug, trace};

use crate::{
    ast::Program,
    error::EnvironmentError,
    interpreter::{
        evaluator::core::ExecutionContext,
        lexer::tokenize,
        parser::core::{ParsingContext, parse_program},
        preprocessor::preprocess,
        symbols::{
            function::{Function, Method},
            identifier::{Identifier, fnv1a_32},
            instance::Instance,
            namespace::Namespace,
            types::{Member, Type, TypeRef, TypeUsage, Visibility},
        },
        value::{
            core::Value,
            memory::{Address, Allocation, LITERAL_STRINGS_POOL_CAPACITY, Memory, MemoryPool},
        },
    },
};

/// The interpreter's root object: registries, memory and the load pipeline.
///
/// A host registers native types, variables, functions and methods into an
/// environment, then feeds it source text through [`Environment::load`].
/// Each environment is single-threaded and non-reentrant; embedders that
/// need parallelism own one environment per worker.
///
/// # Example
/// ```
/// use cleat::Environment;
///
/// let mut env = Environment::new();
/// env.load("sum", "int a = 2; int b = 3; int c = a + b;").unwrap();
///
/// let c = env.get_variable("c").unwrap();
/// assert_eq!(c.get::<i32>(), 5);
/// ```
pub struct Environment {
    pub(crate) root_namespace: Namespace,
    programs:                  HashMap<u32, Program>,
    memory:                    Memory,
    literal_strings_pool:      MemoryPool,
    error_message:             Option<String>,
}

impl Environment {
    /// Creates an environment with the built-in types pre-registered.
    #[must_use]
    pub fn new() -> Self {
        let mut memory = Memory::new();
        let literal_strings_pool = MemoryPool::new(&mut memory, LITERAL_STRINGS_POOL_CAPACITY);

        let mut environment = Self { root_namespace: Namespace::new(Identifier::new("")),
                                     programs: HashMap::new(),
                                     memory,
                                     literal_strings_pool,
                                     error_message: None };

        environment.register_built_in_types();
        environment
    }

    fn register_built_in_types(&mut self) {
        self.register_built_in_type("int", 4);
        self.register_built_in_type("uint32_t", 4);
        self.register_built_in_type("size_t", 8);
        self.register_built_in_type("char", 1);
        self.register_built_in_type("bool", 1);
        self.register_built_in_type("uint8_t", 1);
        self.register_built_in_type("short", 2);
        self.register_built_in_type("uint16_t", 2);
        self.register_built_in_type("float", 4);
        self.register_built_in_type("double", 8);
    }

    /// Registers a built-in type descriptor.
    pub fn register_built_in_type(&mut self, name: &str, size: usize) -> TypeRef {
        self.root_namespace.register_type(Type::built_in(name, size))
    }

    /// Registers an empty struct descriptor of the given instance size.
    pub fn register_struct(&mut self, name: &str, size: usize) -> TypeRef {
        self.root_namespace.register_type(Type::structure(name, size))
    }

    /// Registers an empty class descriptor of the given instance size.
    pub fn register_class(&mut self, name: &str, size: usize) -> TypeRef {
        self.root_namespace.register_type(Type::class(name, size))
    }

    /// Adds a member to a registered struct or class.
    ///
    /// # Panics
    /// Panics when the type is unknown or built-in; member registration is
    /// host setup code and misuse is a programming error.
    pub fn register_struct_member(&mut self,
                                  type_name: &str,
                                  member_name: &str,
                                  member_type: &TypeUsage,
                                  offset: usize,
                                  array_size: usize) {
        let Some(ty) = self.get_type(type_name) else {
            panic!("no type named '{type_name}'");
        };

        let mut type_usage = member_type.clone();
        type_usage.array_size = array_size;

        ty.borrow_mut().add_member(Member { identifier: Identifier::new(member_name),
                                            type_usage,
                                            offset,
                                            visibility: Visibility::Public });
    }

    /// Registers a method on a registered struct or class.
    ///
    /// A method named like its type with no parameters acts as the default
    /// constructor; methods named `operator<op>` implement binary operators
    /// on the type.
    ///
    /// # Panics
    /// Panics when the type is unknown or built-in.
    pub fn register_method(&mut self, type_name: &str, method: Method) {
        let Some(ty) = self.get_type(type_name) else {
            panic!("no type named '{type_name}'");
        };

        ty.borrow_mut().add_method(method);
    }

    /// Registers a free function.
    ///
    /// Registering the same name repeatedly extends its overload list;
    /// matching parameter lists replace the previous registration.
    pub fn register_function(&mut self, function: Function) {
        self.root_namespace.register_function(function);
    }

    /// Gets or creates a child namespace of the root.
    ///
    /// Symbols registered through the returned namespace are reachable from
    /// scripts as `Name::symbol`, or unqualified under a matching
    /// `using namespace` directive.
    pub fn namespace_mut(&mut self, name: &str) -> &mut Namespace {
        self.root_namespace.child_mut(name)
    }

    /// Looks up a registered type by its (possibly `::`-qualified) name.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<TypeRef> {
        self.root_namespace.get_type_by_path(name)
    }

    /// Parses a textual type usage such as `int`, `const char*` or
    /// `float&`.
    ///
    /// # Returns
    /// The parsed usage, or `None` when the base type is not registered.
    #[must_use]
    pub fn parse_type_usage(&self, text: &str) -> Option<TypeUsage> {
        let mut remaining = text.trim();

        let is_const = match remaining.strip_prefix("const ") {
            Some(rest) => {
                remaining = rest.trim_start();
                true
            },
            None => false,
        };

        let mut pointer_level = 0;
        let mut is_reference = false;

        if let Some(rest) = remaining.strip_suffix('*') {
            pointer_level = 1;
            remaining = rest.trim_end();
        } else if let Some(rest) = remaining.strip_suffix('&') {
            is_reference = true;
            remaining = rest.trim_end();
        }

        let ty = self.get_type(remaining)?;

        Some(TypeUsage { ty,
                         is_const,
                         is_reference,
                         pointer_level,
                         array_size: 1 })
    }

    /// Sets a global variable, creating it when necessary.
    ///
    /// The stored value always gets a fresh heap buffer initialized from
    /// `value`; the buffer is registered in memory, so scripts may take the
    /// variable's address.
    pub fn set_variable(&mut self, type_usage: &TypeUsage, name: &str, value: &Value) {
        let identifier = Identifier::new(name);

        let stored = Value::on_registered_heap(type_usage, &mut self.memory);
        stored.set_from(value);

        if let Some(instance) = self.root_namespace.retrieve_instance_mut(&identifier) {
            instance.type_usage = type_usage.clone();
            instance.value = stored;
            return;
        }

        self.root_namespace.register_instance(Instance { identifier,
                                                         type_usage: type_usage.clone(),
                                                         scope_level: 0,
                                                         value: stored });
    }

    /// Reads a variable by name.
    ///
    /// The returned value aliases the variable's storage: reads observe
    /// later script writes, and [`Value::set`] writes through to it.
    #[must_use]
    pub fn get_variable(&self, name: &str) -> Option<Value> {
        self.root_namespace
            .retrieve_instance(&Identifier::new(name))
            .map(|instance| instance.value.clone())
    }

    /// Preprocesses, tokenizes, parses and executes a program.
    ///
    /// The program is retained under its name for the lifetime of the
    /// environment. Between runs, the instance stack unwinds to the global
    /// scope, so host-set variables survive while script state does not.
    ///
    /// # Errors
    /// Returns the first compile or runtime error; the formatted message is
    /// also available through [`Environment::error_message`].
    pub fn load(&mut self, program_name: &str, code: &str) -> Result<(), EnvironmentError> {
        debug!("loading program '{program_name}' ({} bytes)", code.len());

        self.error_message = None;
        // the previous run's script state unwinds to the global scope
        self.root_namespace.release_instances(1);

        let result = self.load_program(program_name, code);

        if let Err(error) = &result {
            let message = error.to_string();
            debug!("program '{program_name}' failed: {message}");
            self.error_message = Some(message);
        }

        result
    }

    fn load_program(&mut self, program_name: &str, code: &str) -> Result<(), EnvironmentError> {
        let preprocessed = preprocess(code);
        let tokens = tokenize(&preprocessed)?;

        let mut parsing = ParsingContext::new(tokens);
        let parsed = parse_program(self, &mut parsing);

        // parse-time instance registrations are type-tracking scaffolding;
        // execution re-registers as declarations run
        self.root_namespace.release_instances(1);

        let statements = parsed?;
        trace!("parsed {} top-level statements", statements.len());

        let program = Program { name:       program_name.to_string(),
                                code:       code.to_string(),
                                statements: statements.into_iter().map(Rc::new).collect(), };

        let mut ctx = ExecutionContext::new(&mut self.memory);
        let mut result = Ok(());

        for statement in &program.statements {
            result = self.execute_statement(&mut ctx, statement);

            if result.is_err() {
                break;
            }
        }

        self.programs.insert(fnv1a_32(program_name), program);
        result.map_err(EnvironmentError::from)
    }

    /// The formatted message of the last failed load, if any.
    ///
    /// Messages read `[Compile Error] Line N: ...` or
    /// `[Runtime Error] Line N: ...`.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    // ---- internals shared by the parser and the evaluator ----

    pub(crate) fn lookup_type(&self, name: &str, using_namespaces: &[String]) -> Option<TypeRef> {
        if let Some(ty) = self.root_namespace.get_type_by_path(name) {
            return Some(ty);
        }

        using_namespaces.iter().find_map(|prefix| {
                            self.root_namespace.get_type_by_path(&format!("{prefix}::{name}"))
                        })
    }

    pub(crate) fn lookup_function_named(&self,
                                        name: &str,
                                        using_namespaces: &[String])
                                        -> Option<Function> {
        if let Some(function) = self.root_namespace.get_function_by_path(name) {
            return Some(function);
        }

        using_namespaces.iter().find_map(|prefix| {
                            self.root_namespace.get_function_by_path(&format!("{prefix}::{name}"))
                        })
    }

    pub(crate) fn retrieve_instance_type(&self, identifier: &Identifier) -> Option<(TypeUsage, u32)> {
        self.root_namespace
            .retrieve_instance(identifier)
            .map(|instance| (instance.type_usage.clone(), instance.scope_level))
    }

    pub(crate) fn retrieve_instance_value(&self, identifier: &Identifier) -> Option<Value> {
        self.root_namespace
            .retrieve_instance(identifier)
            .map(|instance| instance.value.clone())
    }

    pub(crate) fn register_instance_at(&mut self,
                                       scope_level: u32,
                                       type_usage: TypeUsage,
                                       identifier: Identifier,
                                       value: Value) {
        self.root_namespace.register_instance(Instance { identifier,
                                                         type_usage,
                                                         scope_level,
                                                         value });
    }

    pub(crate) fn release_instances(&mut self, scope_level: u32) {
        self.root_namespace.release_instances(scope_level);
    }

    pub(crate) fn memory_resolve(&self, address: Address) -> Option<(Allocation, usize)> {
        self.memory.resolve(address)
    }

    /// Interns a string literal into the bounded literal pool and wraps its
    /// address as a `const char*` value.
    pub(crate) fn intern_string_literal(&mut self, text: &str) -> Value {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);

        let view = self.literal_strings_pool.push_bytes(&bytes);

        let mut type_usage = self.built_in_usage("char");
        type_usage.is_const = true;
        type_usage.pointer_level = 1;

        let value = Value::on_heap(&type_usage);
        value.write_bytes(&view.address.to_bytes());
        value
    }

    pub(crate) fn built_in_usage(&self, name: &str) -> TypeUsage {
        let Some(ty) = self.get_type(name) else {
            panic!("built-in type '{name}' is not registered");
        };

        TypeUsage::of(&ty)
    }

    pub(crate) fn int_literal(&self, value: i32) -> Value {
        let literal = Value::on_heap(&self.built_in_usage("int"));
        literal.set(value);
        literal
    }

    pub(crate) fn uint_literal(&self, value: u32) -> Value {
        let literal = Value::on_heap(&self.built_in_usage("uint32_t"));
        literal.set(value);
        literal
    }

    pub(crate) fn float_literal(&self, value: f32) -> Value {
        let literal = Value::on_heap(&self.built_in_usage("float"));
        literal.set(value);
        literal
    }

    pub(crate) fn double_literal(&self, value: f64) -> Value {
        let literal = Value::on_heap(&self.built_in_usage("double"));
        literal.set(value);
        literal
    }

    pub(crate) fn bool_literal(&self, value: bool) -> Value {
        let literal = Value::on_heap(&self.built_in_usage("bool"));
        literal.set(value);
        literal
    }

    /// A null pointer value. The base type is irrelevant for a null
    /// pointer; only the pointer-sized zero buffer matters.
    pub(crate) fn null_pointer_value(&self) -> Value {
        let mut type_usage = self.built_in_usage("int");
        type_usage.pointer_level = 1;
        Value::on_heap(&type_usage)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
