use std::{cell::RefCell, rc::Rc};

use crate::interpreter::{
    symbols::{function::Method, identifier::Identifier},
    value::memory::POINTER_SIZE,
};

/// A shared handle to a registered type.
///
/// Types live in the environment's registries and are referenced from every
/// [`TypeUsage`]; the `RefCell` lets hosts keep adding members and methods
/// after registration.
pub type TypeRef = Rc<RefCell<Type>>;

/// Member visibility tag.
///
/// Recorded on members and methods; this revision does not enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Accessible from anywhere.
    #[default]
    Public,
    /// Accessible from the type and derived types.
    Protected,
    /// Accessible from the type only.
    Private,
}

/// A named field of an aggregate type.
#[derive(Debug, Clone)]
pub struct Member {
    /// The member's name.
    pub identifier: Identifier,
    /// The member's declared type.
    pub type_usage: TypeUsage,
    /// Byte offset of the member within its owning aggregate.
    pub offset:     usize,
    /// The member's visibility.
    pub visibility: Visibility,
}

/// What kind of type a descriptor is, and the members it carries.
#[derive(Debug)]
pub enum TypeKind {
    /// A primitive numeric, boolean or character type.
    BuiltIn,
    /// An aggregate with members and methods.
    Struct {
        /// The ordered member list; offsets index into instance storage.
        members: Vec<Member>,
        /// Methods, including constructors (named like the type).
        methods: Vec<Rc<Method>>,
    },
    /// Same layout as a struct, tagged separately.
    Class {
        /// The ordered member list; offsets index into instance storage.
        members: Vec<Member>,
        /// Methods, including constructors (named like the type).
        methods: Vec<Rc<Method>>,
    },
}

/// A registered type descriptor.
///
/// Every type has a name and a byte size; aggregates additionally carry
/// their members and methods. Types are created through the environment's
/// registration API and shared as [`TypeRef`]s.
#[derive(Debug)]
pub struct Type {
    /// The type's name.
    pub identifier: Identifier,
    /// Instance size in bytes.
    pub size:       usize,
    /// The kind tag plus aggregate contents.
    pub kind:       TypeKind,
}

impl Type {
    /// Creates a built-in type descriptor.
    #[must_use]
    pub fn built_in(name: &str, size: usize) -> Self {
        Self { identifier: Identifier::new(name),
               size,
               kind: TypeKind::BuiltIn, }
    }

    /// Creates an empty struct descriptor.
    #[must_use]
    pub fn structure(name: &str, size: usize) -> Self {
        Self { identifier: Identifier::new(name),
               size,
               kind: TypeKind::Struct { members: Vec::new(),
                                        methods: Vec::new(), }, }
    }

    /// Creates an empty class descriptor.
    #[must_use]
    pub fn class(name: &str, size: usize) -> Self {
        Self { identifier: Identifier::new(name),
               size,
               kind: TypeKind::Class { members: Vec::new(),
                                       methods: Vec::new(), }, }
    }

    /// Returns `true` for built-in types.
    #[must_use]
    pub const fn is_built_in(&self) -> bool {
        matches!(self.kind, TypeKind::BuiltIn)
    }

    /// Returns `true` for built-in types that carry decimal values.
    #[must_use]
    pub fn is_decimal(&self) -> bool {
        self.is_built_in() && (self.identifier.name == "float" || self.identifier.name == "double")
    }

    /// Returns `true` for built-in types that carry integer values.
    ///
    /// `bool` and `char` count as integers here; the evaluator runs them
    /// through the sign-extended integer lane.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.is_built_in() && !self.is_decimal()
    }

    /// The aggregate's members; empty for built-in types.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        match &self.kind {
            TypeKind::BuiltIn => &[],
            TypeKind::Struct { members, .. } | TypeKind::Class { members, .. } => members,
        }
    }

    /// The aggregate's methods; empty for built-in types.
    #[must_use]
    pub fn methods(&self) -> &[Rc<Method>] {
        match &self.kind {
            TypeKind::BuiltIn => &[],
            TypeKind::Struct { methods, .. } | TypeKind::Class { methods, .. } => methods,
        }
    }

    /// Adds a member to an aggregate type.
    ///
    /// # Panics
    /// Panics when called on a built-in type; that is a host registration
    /// mistake.
    pub fn add_member(&mut self, member: Member) {
        match &mut self.kind {
            TypeKind::BuiltIn => panic!("cannot add a member to built-in type '{}'", self.identifier),
            TypeKind::Struct { members, .. } | TypeKind::Class { members, .. } => members.push(member),
        }
    }

    /// Adds a method to an aggregate type.
    ///
    /// # Panics
    /// Panics when called on a built-in type; that is a host registration
    /// mistake.
    pub fn add_method(&mut self, method: Method) {
        match &mut self.kind {
            TypeKind::BuiltIn => panic!("cannot add a method to built-in type '{}'", self.identifier),
            TypeKind::Struct { methods, .. } | TypeKind::Class { methods, .. } => {
                methods.push(Rc::new(method));
            },
        }
    }

    /// Looks up a member by name.
    #[must_use]
    pub fn find_member(&self, identifier: &Identifier) -> Option<&Member> {
        self.members().iter().find(|member| member.identifier == *identifier)
    }

    /// Looks up a method by name, returning a shared handle so the caller
    /// can invoke it without holding a borrow of the type.
    #[must_use]
    pub fn find_method(&self, name: &str) -> Option<Rc<Method>> {
        let identifier = Identifier::new(name);
        self.methods()
            .iter()
            .find(|method| method.identifier == identifier)
            .cloned()
    }

    /// Looks up the zero-argument constructor: a method named like the type
    /// with an empty parameter list.
    #[must_use]
    pub fn default_constructor(&self) -> Option<Rc<Method>> {
        self.methods()
            .iter()
            .find(|method| method.identifier == self.identifier && method.parameters.is_empty())
            .cloned()
    }
}

/// A use-site annotation over a type.
///
/// A `TypeUsage` is what declarations, members, parameters and values carry:
/// the base type plus const-ness, reference-ness, pointer depth and array
/// extent. Two usages are equal iff all four components match.
#[derive(Debug, Clone)]
pub struct TypeUsage {
    /// The base type.
    pub ty:            TypeRef,
    /// Whether the use site is `const`.
    pub is_const:      bool,
    /// Whether the use site is a reference.
    pub is_reference:  bool,
    /// Pointer indirection depth; `0` means not a pointer.
    pub pointer_level: u32,
    /// Array extent; `1` for scalars.
    pub array_size:    usize,
}

impl TypeUsage {
    /// Creates a plain usage of a type: non-const, non-reference, no
    /// pointer, extent 1.
    #[must_use]
    pub fn of(ty: &TypeRef) -> Self {
        Self { ty:            Rc::clone(ty),
               is_const:      false,
               is_reference:  false,
               pointer_level: 0,
               array_size:    1, }
    }

    /// The effective byte size of a value of this usage.
    ///
    /// Pointers and references occupy a pointer-sized buffer regardless of
    /// the base type; everything else is the base size times the array
    /// extent.
    #[must_use]
    pub fn size(&self) -> usize {
        if self.is_pointer() || self.is_reference {
            return POINTER_SIZE;
        }

        self.ty.borrow().size * self.array_size
    }

    /// Returns `true` when the usage is a pointer.
    #[must_use]
    pub const fn is_pointer(&self) -> bool {
        self.pointer_level > 0
    }

    /// The usage obtained by taking the address of this one.
    #[must_use]
    pub fn referenced(&self) -> Self {
        let mut usage = self.clone();
        usage.pointer_level += 1;
        usage
    }

    /// The usage obtained by dereferencing this pointer.
    ///
    /// # Panics
    /// Panics when the usage is not a pointer.
    #[must_use]
    pub fn dereferenced(&self) -> Self {
        assert!(self.is_pointer());

        let mut usage = self.clone();
        usage.pointer_level -= 1;
        usage
    }
}

impl PartialEq for TypeUsage {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.ty, &other.ty)
        && self.is_const == other.is_const
        && self.is_reference == other.is_reference
        && self.pointer_level == other.pointer_level
        && self.array_size == other.array_size
    }
}

impl std::fmt::Display for TypeUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }

        write!(f, "{}", self.ty.borrow().identifier)?;

        for _ in 0..self.pointer_level {
            write!(f, "*")?;
        }

        if self.is_reference {
            write!(f, "&")?;
        }

        Ok(())
    }
}
