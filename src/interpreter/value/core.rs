use crate::interpreter::{
    symbols::types::TypeUsage,
    value::memory::{Address, BufferView, Memory, MemoryPool},
};

/// The ownership mode of a value's buffer.
///
/// The mode discriminator drives argument marshalling and assignment
/// semantics, and it survives shallow copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferMode {
    /// No buffer has been attached yet.
    Uninitialized,
    /// The buffer is borrowed from other storage; never freed here.
    External,
    /// The buffer was carved from a scope-bound stack pool; freed by pool
    /// rewind, not per value.
    Stack,
    /// The buffer is exclusively owned; freed when the last view drops.
    Heap,
}

/// A value's buffer in one of the three ownership modes, or nothing at all.
#[derive(Debug, Clone)]
pub enum ValueBuffer {
    /// No storage attached.
    Uninitialized,
    /// A borrowed view of storage owned elsewhere.
    External(BufferView),
    /// A view into a scope-bound stack pool.
    Stack(BufferView),
    /// Owned storage.
    Heap(BufferView),
}

/// The runtime carrier of a typed byte buffer.
///
/// A value pairs a [`TypeUsage`] with a buffer in one of three ownership
/// modes. Cloning a value is shallow: the clone aliases the same bytes,
/// preserving the buffer-pointer semantics instance reads rely on. Deep
/// copies are explicit through [`Value::to_heap_copy`].
///
/// # Example
/// ```
/// use std::{cell::RefCell, rc::Rc};
///
/// use cleat::interpreter::{
///     symbols::types::{Type, TypeUsage},
///     value::core::Value,
/// };
///
/// let int_type = Rc::new(RefCell::new(Type::built_in("int", 4)));
/// let value = Value::on_heap(&TypeUsage::of(&int_type));
/// value.set(41i32);
///
/// assert_eq!(value.get::<i32>(), 41);
///
/// // Clones alias the same buffer.
/// let alias = value.clone();
/// alias.set(42i32);
/// assert_eq!(value.get::<i32>(), 42);
/// ```
#[derive(Debug, Clone)]
pub struct Value {
    /// The value's declared type.
    pub type_usage: TypeUsage,
    /// The value's buffer and its ownership mode.
    pub buffer:     ValueBuffer,
}

impl Value {
    /// Creates a value with no storage attached.
    ///
    /// Reference-typed instances start out like this until a function call
    /// binds them to their referent.
    #[must_use]
    pub const fn uninitialized(type_usage: TypeUsage) -> Self {
        Self { type_usage,
               buffer: ValueBuffer::Uninitialized, }
    }

    /// Creates a value owning a fresh zero-filled anonymous buffer.
    #[must_use]
    pub fn on_heap(type_usage: &TypeUsage) -> Self {
        Self { type_usage: type_usage.clone(),
               buffer:     ValueBuffer::Heap(BufferView::anonymous(type_usage.size())), }
    }

    /// Creates a value owning a fresh buffer registered in `memory`, so its
    /// address can be taken.
    #[must_use]
    pub fn on_registered_heap(type_usage: &TypeUsage, memory: &mut Memory) -> Self {
        let mut view = BufferView::anonymous(type_usage.size());
        let slot = memory.register(&view.alloc);
        view.address = Address::new(slot, 0);

        Self { type_usage: type_usage.clone(),
               buffer:     ValueBuffer::Heap(view), }
    }

    /// Creates a value whose buffer is carved from a stack pool.
    #[must_use]
    pub fn on_stack(type_usage: &TypeUsage, pool: &mut MemoryPool) -> Self {
        Self { type_usage: type_usage.clone(),
               buffer:     ValueBuffer::Stack(pool.push(type_usage.size())), }
    }

    /// Creates a value borrowing storage owned elsewhere.
    #[must_use]
    pub const fn external(type_usage: TypeUsage, view: BufferView) -> Self {
        Self { type_usage,
               buffer: ValueBuffer::External(view) }
    }

    /// The buffer's ownership mode.
    #[must_use]
    pub const fn mode(&self) -> BufferMode {
        match self.buffer {
            ValueBuffer::Uninitialized => BufferMode::Uninitialized,
            ValueBuffer::External(_) => BufferMode::External,
            ValueBuffer::Stack(_) => BufferMode::Stack,
            ValueBuffer::Heap(_) => BufferMode::Heap,
        }
    }

    /// The underlying buffer view, if storage is attached.
    #[must_use]
    pub const fn view(&self) -> Option<&BufferView> {
        match &self.buffer {
            ValueBuffer::Uninitialized => None,
            ValueBuffer::External(view) | ValueBuffer::Stack(view) | ValueBuffer::Heap(view) => {
                Some(view)
            },
        }
    }

    /// The effective byte size of the value.
    #[must_use]
    pub fn size(&self) -> usize {
        self.type_usage.size()
    }

    /// The address of the value's storage, or [`Address::NULL`] when the
    /// storage is anonymous or missing.
    #[must_use]
    pub fn address(&self) -> Address {
        self.view().map_or(Address::NULL, |view| view.address)
    }

    /// Copies the value's bytes out of its buffer.
    #[must_use]
    pub fn read_bytes(&self) -> Vec<u8> {
        self.view().map_or_else(Vec::new, BufferView::read_bytes)
    }

    /// Writes bytes into the value's buffer, truncating to the buffer size.
    pub fn write_bytes(&self, bytes: &[u8]) {
        if let Some(view) = self.view() {
            view.write_bytes(bytes);
        }
    }

    /// Writes another value into this one.
    ///
    /// The source bytes are copied into the target's buffer, truncated to
    /// the buffer length. Reference-typed values alias their referent's
    /// storage, so writing through a reference reaches the referent with no
    /// special case.
    pub fn set_from(&self, source: &Self) {
        debug_assert!(self.view().is_some());
        self.write_bytes(&source.read_bytes());
    }

    /// Reads the buffer as a primitive of type `T`.
    #[must_use]
    pub fn get<T: Primitive>(&self) -> T {
        T::read_from(&self.read_bytes())
    }

    /// Writes a primitive of type `T` into the buffer.
    pub fn set<T: Primitive>(&self, value: T) {
        let mut bytes = self.read_bytes();
        value.write_to(&mut bytes);
        self.write_bytes(&bytes);
    }

    /// Interprets the buffer as a condition: any non-zero leading byte is
    /// `true`.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        self.read_bytes().first().is_some_and(|&byte| byte != 0)
    }

    /// Deep-copies the value into a fresh anonymous heap buffer.
    ///
    /// Pass-by-value marshalling uses this so callee mutations cannot
    /// escape into the caller's storage.
    #[must_use]
    pub fn to_heap_copy(&self) -> Self {
        let copy = Self::on_heap(&self.type_usage);
        copy.write_bytes(&self.read_bytes());
        copy
    }

    /// Re-wraps the value as an External borrow of the same storage.
    ///
    /// Pass-by-reference marshalling uses this so callee mutations write
    /// back into the caller's storage.
    #[must_use]
    pub fn to_external_view(&self) -> Self {
        match self.view() {
            Some(view) => Self { type_usage: self.type_usage.clone(),
                                 buffer:     ValueBuffer::External(view.clone()), },
            None => Self::uninitialized(self.type_usage.clone()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use crate::util::num::{decimal_from_bytes, integer_from_bytes};

        if self.view().is_none() {
            return write!(f, "<uninitialized>");
        }

        if self.type_usage.is_pointer() || self.type_usage.is_reference {
            let address = Address::from_bytes(&self.read_bytes());
            return if address.is_null() {
                write!(f, "nullptr")
            } else {
                write!(f, "<address {}+{}>", address.slot(), address.offset())
            };
        }

        let ty = self.type_usage.ty.borrow();

        if ty.is_decimal() {
            write!(f, "{}", decimal_from_bytes(&self.read_bytes()))
        } else if ty.is_integer() {
            write!(f, "{}", integer_from_bytes(&self.read_bytes()))
        } else {
            write!(f, "<{} instance>", ty.identifier)
        }
    }
}

/// A native type that can be read from and written into value buffers.
///
/// The host-facing typed accessors ([`Value::get`] and [`Value::set`]) are
/// built on this; the byte order is the native one, matching the layout the
/// evaluator writes.
pub trait Primitive: Copy {
    /// Writes `self` into the front of `buffer`.
    fn write_to(self, buffer: &mut [u8]);
    /// Reads a value from the front of `buffer`.
    fn read_from(buffer: &[u8]) -> Self;
}

macro_rules! impl_primitive {
    ($($ty:ty),*) => {
        $(
            impl Primitive for $ty {
                fn write_to(self, buffer: &mut [u8]) {
                    let size = size_of::<$ty>();
                    buffer[..size].copy_from_slice(&self.to_ne_bytes());
                }

                fn read_from(buffer: &[u8]) -> Self {
                    let size = size_of::<$ty>();
                    let mut raw = [0u8; size_of::<$ty>()];
                    raw.copy_from_slice(&buffer[..size]);
                    Self::from_ne_bytes(raw)
                }
            }
        )*
    };
}

impl_primitive!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

impl Primitive for bool {
    fn write_to(self, buffer: &mut [u8]) {
        buffer[0] = u8::from(self);
    }

    fn read_from(buffer: &[u8]) -> Self {
        buffer[0] != 0
    }
}
