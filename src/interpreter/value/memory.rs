use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

/// The size of a pointer or reference value buffer, in bytes.
pub const POINTER_SIZE: usize = 8;
/// Capacity of the literal string pool. Pushing past this limit is a fatal
/// assertion; the pool is a documented fixed-size arena.
pub const LITERAL_STRINGS_POOL_CAPACITY: usize = 1024;
/// Capacity of the execution context's stack pool for instance storage.
pub const EXECUTION_STACK_CAPACITY: usize = 4096;

/// A reference-counted byte allocation.
///
/// Every value buffer lives in one of these; views into the same allocation
/// share it, which is what gives assignments and reference parameters their
/// write-through behavior.
pub type Allocation = Rc<RefCell<Vec<u8>>>;

/// An abstract memory address.
///
/// Addresses are what pointer-typed values store in their buffers: a 64-bit
/// handle encoding an allocation slot and a byte offset, with `0` reserved
/// for the null pointer. They are resolved back to allocations through
/// [`Memory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address(u64);

impl Address {
    /// The null pointer.
    pub const NULL: Self = Self(0);

    /// Encodes a slot and byte offset as an address.
    #[must_use]
    pub const fn new(slot: usize, offset: usize) -> Self {
        Self(((slot as u64 + 1) << 32) | offset as u64)
    }

    /// Returns `true` for the null pointer.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The allocation slot this address points into.
    #[must_use]
    pub const fn slot(self) -> usize {
        (self.0 >> 32) as usize - 1
    }

    /// The byte offset within the allocation.
    #[must_use]
    pub const fn offset(self) -> usize {
        (self.0 & 0xffff_ffff) as usize
    }

    /// The raw buffer representation of the address.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; POINTER_SIZE] {
        self.0.to_ne_bytes()
    }

    /// Reads an address back from a raw buffer.
    ///
    /// Buffers shorter than a pointer yield the null address.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.len() < POINTER_SIZE {
            return Self::NULL;
        }

        let mut raw = [0u8; POINTER_SIZE];
        raw.copy_from_slice(&bytes[..POINTER_SIZE]);
        Self(u64::from_ne_bytes(raw))
    }
}

/// A view into a byte allocation.
///
/// A view carries the allocation it aliases, the byte range it covers, and
/// the address of that range when the allocation is registered in a
/// [`Memory`]. Cloning a view is shallow; all clones read and write the same
/// bytes.
#[derive(Debug, Clone)]
pub struct BufferView {
    /// The aliased allocation.
    pub alloc:   Allocation,
    /// Byte offset of the view within the allocation.
    pub offset:  usize,
    /// Length of the view in bytes.
    pub len:     usize,
    /// The view's address, or [`Address::NULL`] for anonymous buffers.
    pub address: Address,
}

impl BufferView {
    /// Creates an anonymous, zero-filled buffer that is not addressable.
    ///
    /// Expression temporaries use these; nothing in a program can take their
    /// address.
    #[must_use]
    pub fn anonymous(len: usize) -> Self {
        Self { alloc: Rc::new(RefCell::new(vec![0u8; len])),
               offset: 0,
               len,
               address: Address::NULL, }
    }

    /// Copies the viewed bytes out of the allocation.
    #[must_use]
    pub fn read_bytes(&self) -> Vec<u8> {
        let data = self.alloc.borrow();
        data[self.offset..self.offset + self.len].to_vec()
    }

    /// Writes bytes into the view, truncating the source to the view length.
    pub fn write_bytes(&self, bytes: &[u8]) {
        let count = bytes.len().min(self.len);
        let mut data = self.alloc.borrow_mut();
        data[self.offset..self.offset + count].copy_from_slice(&bytes[..count]);
    }

    /// Derives a narrower view at a byte offset within this one.
    ///
    /// Member access uses this to step from an aggregate's storage to one of
    /// its fields; the derived view keeps the allocation and gets the
    /// offset-adjusted address.
    #[must_use]
    pub fn sub_view(&self, delta: usize, len: usize) -> Self {
        let address = if self.address.is_null() {
            Address::NULL
        } else {
            Address::new(self.address.slot(), self.address.offset() + delta)
        };

        Self { alloc: Rc::clone(&self.alloc),
               offset: self.offset + delta,
               len,
               address }
    }
}

/// The address table that makes instance storage addressable.
///
/// Registered allocations get a slot; addresses encode the slot plus an
/// offset and resolve back through [`Memory::resolve`]. Slots hold weak
/// references, so a freed allocation leaves a dead slot that is reused by
/// later registrations and resolves to `None` (a dangling pointer reads as
/// unreachable rather than as someone else's memory).
#[derive(Debug, Default)]
pub struct Memory {
    slots: Vec<Weak<RefCell<Vec<u8>>>>,
}

impl Memory {
    /// Creates an empty address table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an allocation, returning its slot.
    pub fn register(&mut self, alloc: &Allocation) -> usize {
        for (slot, entry) in self.slots.iter_mut().enumerate() {
            if entry.strong_count() == 0 {
                *entry = Rc::downgrade(alloc);
                return slot;
            }
        }

        self.slots.push(Rc::downgrade(alloc));
        self.slots.len() - 1
    }

    /// Resolves an address to its allocation and byte offset.
    ///
    /// Returns `None` for the null address, for unknown slots, and for slots
    /// whose allocation has been freed.
    #[must_use]
    pub fn resolve(&self, address: Address) -> Option<(Allocation, usize)> {
        if address.is_null() {
            return None;
        }

        let slot = self.slots.get(address.slot())?;
        let alloc = slot.upgrade()?;
        Some((alloc, address.offset()))
    }
}

/// A bounded bump-allocated byte pool.
///
/// Two of these exist per environment: the literal string pool (interned
/// string literals, never rewound) and the execution stack pool (instance
/// storage, rewound as scopes exit). The pool's backing allocation is
/// registered in [`Memory`], so everything carved from it is addressable.
#[derive(Debug)]
pub struct MemoryPool {
    alloc:    Allocation,
    slot:     usize,
    capacity: usize,
    top:      usize,
}

impl MemoryPool {
    /// Creates a pool of the given capacity, registered in `memory`.
    #[must_use]
    pub fn new(memory: &mut Memory, capacity: usize) -> Self {
        let alloc: Allocation = Rc::new(RefCell::new(vec![0u8; capacity]));
        let slot = memory.register(&alloc);

        Self { alloc,
               slot,
               capacity,
               top: 0 }
    }

    /// Carves a zero-filled range off the top of the pool.
    ///
    /// # Panics
    /// Panics when the pool capacity is exhausted; the pools are fixed-size
    /// arenas and overflowing one is a documented hard limit.
    pub fn push(&mut self, size: usize) -> BufferView {
        assert!(self.top + size <= self.capacity, "memory pool overflow");

        let offset = self.top;
        self.top += size;

        // The range may have been used by an earlier scope.
        self.alloc.borrow_mut()[offset..offset + size].fill(0);

        BufferView { alloc: Rc::clone(&self.alloc),
                     offset,
                     len: size,
                     address: Address::new(self.slot, offset), }
    }

    /// Carves a range holding a copy of `bytes`.
    ///
    /// # Panics
    /// Panics when the pool capacity is exhausted.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> BufferView {
        let view = self.push(bytes.len());
        view.write_bytes(bytes);
        view
    }

    /// The current top of the pool, for later [`rewind`](Self::rewind).
    #[must_use]
    pub const fn watermark(&self) -> usize {
        self.top
    }

    /// Rewinds the pool to a previously recorded watermark.
    pub fn rewind(&mut self, watermark: usize) {
        debug_assert!(watermark <= self.top);
        self.top = watermark;
    }
}
