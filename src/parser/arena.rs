//! Append-only node storage with typed, generation-tagged handles.
//!
//! Every arena created for one parse shares a generation number, so a
//! [`Handle`] taken from one parse can never silently index into the nodes
//! of another: [`Arena::try_get`] returns `None` and indexing panics.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_GENERATION: AtomicU32 = AtomicU32::new(1);

/// Identifies the set of arenas belonging to one parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Generation(u32);

impl Generation {
    /// Allocates a generation number no other live parse is using.
    pub fn fresh() -> Self {
        Generation(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed))
    }
}

/// A typed handle into an [`Arena`].
pub struct Handle<T> {
    index: u32,
    generation: Generation,
    _phantom: PhantomData<T>,
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}@{}]", self.index, self.generation.0)
    }
}

impl<T> Handle<T> {
    fn new(index: u32, generation: Generation) -> Self {
        Self {
            index,
            generation,
            _phantom: PhantomData,
        }
    }

    /// Returns the zero-based index of this handle.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

/// An append-only arena with typed [`Handle`]-based access.
#[derive(Clone, Debug)]
pub struct Arena<T> {
    data: Vec<T>,
    generation: Generation,
}

impl<T> Arena<T> {
    /// Creates an empty arena tagged with `generation`.
    pub fn new(generation: Generation) -> Self {
        Self {
            data: Vec::new(),
            generation,
        }
    }

    /// Returns the number of elements in the arena.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the arena contains no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Appends a value and returns its handle.
    pub fn append(&mut self, value: T) -> Handle<T> {
        let index = u32::try_from(self.data.len()).unwrap_or_else(|_| {
            panic!("arena overflow: {} items exceeds u32::MAX", self.data.len())
        });
        self.data.push(value);
        Handle::new(index, self.generation)
    }

    /// Returns a reference to the value if the handle belongs to this arena.
    pub fn try_get(&self, handle: Handle<T>) -> Option<&T> {
        if handle.generation != self.generation {
            return None;
        }
        self.data.get(handle.index())
    }

    /// Iterates over `(handle, &value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        let generation = self.generation;
        // Safety: arena size bounded by u32::MAX (enforced in append)
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (Handle::new(i as u32, generation), v))
    }

    fn check(&self, handle: Handle<T>) {
        assert!(
            handle.generation == self.generation,
            "handle {:?} used with an arena of generation {}",
            handle,
            self.generation.0
        );
    }
}

impl<T> Index<Handle<T>> for Arena<T> {
    type Output = T;

    fn index(&self, handle: Handle<T>) -> &T {
        self.check(handle);
        &self.data[handle.index()]
    }
}

impl<T> IndexMut<Handle<T>> for Arena<T> {
    fn index_mut(&mut self, handle: Handle<T>) -> &mut T {
        self.check(handle);
        &mut self.data[handle.index()]
    }
}
