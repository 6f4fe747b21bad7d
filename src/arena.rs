//! Slot allocator that backs the nodes of a linked tree.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A copyable reference to an object stored in an `Arena<T>`.
///
/// Two handles are equal if and only if they refer to the same slot, so a handle doubles as the
/// identity of the object stored in it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    index: usize,
}

enum Slot<T> {
    Occupied(T),
    Vacant(Option<usize>),
}

/// An allocator for a single type of object, addressed by `Handle`s.
///
/// Freed slots are threaded onto a free list and reused by later allocations, so a structure
/// with a steady number of live objects does not grow. All objects still inside the arena are
/// dropped with it.
///
/// # Examples
///
/// ```
/// use avl_collections::arena::Arena;
///
/// let mut arena = Arena::new();
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(x), 2);
/// assert!(arena.is_empty());
/// ```
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    head: Option<usize>,
    len: usize,
}

impl<T> Arena<T> {
    /// Constructs a new, empty `Arena<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::Arena;
    ///
    /// let arena: Arena<u32> = Arena::new();
    /// ```
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            head: None,
            len: 0,
        }
    }

    /// Constructs a new, empty `Arena<T>` with room for `capacity` objects before it needs to
    /// reallocate.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::Arena;
    ///
    /// let arena: Arena<u32> = Arena::with_capacity(1024);
    /// assert!(arena.capacity() >= 1024);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Arena {
            slots: Vec::with_capacity(capacity),
            head: None,
            len: 0,
        }
    }

    /// Stores an object in the arena and returns the handle that refers to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        self.len += 1;
        match self.head.take() {
            None => {
                self.slots.push(Slot::Occupied(value));
                Handle {
                    index: self.slots.len() - 1,
                }
            },
            Some(index) => {
                let vacant_slot = mem::replace(&mut self.slots[index], Slot::Occupied(value));
                match vacant_slot {
                    Slot::Vacant(next) => self.head = next,
                    Slot::Occupied(_) => panic!("Error: free list points at an occupied slot."),
                }
                Handle { index }
            },
        }
    }

    /// Removes an object from the arena and returns it. The handle must not be used afterwards;
    /// its slot will be handed out again by a later allocation.
    ///
    /// # Panics
    ///
    /// Panics if the handle refers to a vacant slot or a slot that was never allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(x), 0);
    /// ```
    pub fn free(&mut self, handle: Handle) -> T {
        if handle.index >= self.slots.len() {
            panic!("Error: attempting to free invalid slot.");
        }
        let old_slot = mem::replace(&mut self.slots[handle.index], Slot::Vacant(self.head));
        match old_slot {
            Slot::Vacant(next) => {
                self.slots[handle.index] = Slot::Vacant(next);
                panic!("Error: attempting to free vacant slot.");
            },
            Slot::Occupied(value) => {
                self.head = Some(handle.index);
                self.len -= 1;
                value
            },
        }
    }

    /// Returns an immutable reference to an object in the arena. Returns `None` if the handle
    /// does not refer to a live object.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.slots.get(handle.index) {
            Some(Slot::Occupied(ref value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to an object in the arena. Returns `None` if the handle does
    /// not refer to a live object.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.slots.get_mut(handle.index) {
            Some(Slot::Occupied(ref mut value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots the arena can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Returns the number of slots, live or vacant, that the arena has handed out so far.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Drops every object in the arena. All outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = None;
        self.len = 0;
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Handle> for Arena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("Error: handle does not refer to a live object.")
    }
}

impl<T> IndexMut<Handle> for Arena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle).expect("Error: handle does not refer to a live object.")
    }
}
