use std::rc::Rc;

use crate::{
    ast::Statement,
    interpreter::{
        symbols::{
            identifier::Identifier,
            types::{TypeUsage, Visibility},
        },
        value::core::Value,
    },
};

/// The callable body of a host-registered function.
///
/// Arguments arrive marshalled (by-value parameters own their buffers,
/// by-reference parameters alias the caller's storage); the return slot, if
/// present, is pre-sized to the declared return type and written through
/// [`Value::set`].
pub type NativeFunctionBody = Rc<dyn Fn(&[Value], Option<&Value>)>;

/// The callable body of a host-registered method.
///
/// The first parameter is the receiver's storage: for value receivers the
/// instance's own buffer, for pointer receivers the resolved pointee. Writes
/// into it are visible to the script.
pub type NativeMethodBody = Rc<dyn Fn(&Value, &[Value], Option<&Value>)>;

/// What executes when a function is called.
#[derive(Clone)]
pub enum FunctionBody {
    /// An opaque host callback.
    Native(NativeFunctionBody),
    /// A script-defined body: the declared parameter names plus a shared
    /// handle to the block statement the program owns.
    Script {
        /// Parameter names, parallel to the descriptor's parameter types.
        parameter_names: Vec<Identifier>,
        /// The function body block.
        body:            Rc<Statement>,
    },
}

/// A free function registered in a namespace.
///
/// Functions registered repeatedly under one name form an overload list;
/// lookup by bare name yields the first overload.
#[derive(Clone)]
pub struct Function {
    /// The function's name.
    pub identifier:  Identifier,
    /// The declared return type; `None` for `void`.
    pub return_type: Option<TypeUsage>,
    /// The ordered parameter types.
    pub parameters:  Vec<TypeUsage>,
    /// The executable body.
    pub body:        FunctionBody,
}

impl Function {
    /// Creates a host-registered function.
    pub fn native(name: &str,
                  parameters: Vec<TypeUsage>,
                  return_type: Option<TypeUsage>,
                  body: impl Fn(&[Value], Option<&Value>) + 'static)
                  -> Self {
        Self { identifier: Identifier::new(name),
               return_type,
               parameters,
               body: FunctionBody::Native(Rc::new(body)) }
    }

    /// Creates a script-defined function around a program-owned body.
    #[must_use]
    pub const fn script(identifier: Identifier,
                        parameters: Vec<TypeUsage>,
                        parameter_names: Vec<Identifier>,
                        return_type: Option<TypeUsage>,
                        body: Rc<Statement>)
                        -> Self {
        Self { identifier,
               return_type,
               parameters,
               body: FunctionBody::Script { parameter_names, body } }
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.body {
            FunctionBody::Native(_) => "native",
            FunctionBody::Script { .. } => "script",
        };

        f.debug_struct("Function")
         .field("identifier", &self.identifier.name)
         .field("parameters", &self.parameters.len())
         .field("kind", &kind)
         .finish_non_exhaustive()
    }
}

/// A method bound to an aggregate type.
///
/// Constructors are methods named like their type; binary operators on user
/// types dispatch to methods named `operator<op>`. Methods are always
/// host-registered in this revision.
#[derive(Clone)]
pub struct Method {
    /// The method's name.
    pub identifier:  Identifier,
    /// The declared return type; `None` for `void`.
    pub return_type: Option<TypeUsage>,
    /// The method's visibility.
    pub visibility:  Visibility,
    /// The ordered parameter types.
    pub parameters:  Vec<TypeUsage>,
    /// The executable body.
    pub body:        NativeMethodBody,
}

impl Method {
    /// Creates a host-registered method.
    pub fn native(name: &str,
                  parameters: Vec<TypeUsage>,
                  return_type: Option<TypeUsage>,
                  body: impl Fn(&Value, &[Value], Option<&Value>) + 'static)
                  -> Self {
        Self { identifier: Identifier::new(name),
               return_type,
               visibility: Visibility::Public,
               parameters,
               body: Rc::new(body) }
    }
}

impl std::fmt::Debug for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Method")
         .field("identifier", &self.identifier.name)
         .field("parameters", &self.parameters.len())
         .finish_non_exhaustive()
    }
}
