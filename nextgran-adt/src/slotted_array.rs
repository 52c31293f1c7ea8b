//! Fixed-capacity slotted array
//!
//! A `SlottedArray<T, N>` stores up to `N` optional elements addressed by an
//! integer index in `0..N`. Lookup, insertion and removal are O(1) and
//! iteration visits occupied slots in ascending index order, skipping holes.
//!
//! Elements never move once inserted: the backing storage is either inline
//! (the default) or a heap vector reserved to `N` slots at construction and
//! never reallocated. This makes the array suitable for per-UE and per-cell
//! state that other components refer to by index.
//!
//! # Example
//!
//! ```
//! use nextgran_adt::SlottedArray;
//!
//! let mut ues: SlottedArray<&str, 5> = SlottedArray::new();
//! assert!(ues.insert(1, "ue-1"));
//! assert!(ues.insert(3, "ue-3"));
//! assert!(!ues.insert(3, "other"));
//!
//! let values: Vec<_> = ues.iter().copied().collect();
//! assert_eq!(values, vec!["ue-1", "ue-3"]);
//! assert_eq!(ues.find_first_empty(0), 0);
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Backing storage of a [`SlottedArray`].
///
/// The storage exposes a logical prefix of slots. Every slot past the logical
/// length is empty.
pub trait SlotStorage<T> {
    /// Creates empty storage able to hold `capacity` slots without moving.
    fn with_slot_capacity(capacity: usize) -> Self;

    /// Returns the logical slots.
    fn slots(&self) -> &[Option<T>];

    /// Returns the logical slots mutably.
    fn slots_mut(&mut self) -> &mut [Option<T>];

    /// Extends the logical length to `len` with empty slots. Never shrinks.
    fn grow_to(&mut self, len: usize);

    /// Drops trailing empty slots from the logical length.
    fn trim(&mut self);

    /// Empties every slot and resets the logical length to zero.
    fn clear(&mut self);
}

/// Inline slot storage of `N` slots.
#[derive(Clone)]
pub struct InlineSlots<T, const N: usize> {
    slots: [Option<T>; N],
    len: usize,
}

impl<T, const N: usize> SlotStorage<T> for InlineSlots<T, N> {
    fn with_slot_capacity(_capacity: usize) -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            len: 0,
        }
    }

    fn slots(&self) -> &[Option<T>] {
        &self.slots[..self.len]
    }

    fn slots_mut(&mut self) -> &mut [Option<T>] {
        &mut self.slots[..self.len]
    }

    fn grow_to(&mut self, len: usize) {
        debug_assert!(len <= N);
        self.len = self.len.max(len);
    }

    fn trim(&mut self) {
        while self.len > 0 && self.slots[self.len - 1].is_none() {
            self.len -= 1;
        }
    }

    fn clear(&mut self) {
        for slot in &mut self.slots[..self.len] {
            *slot = None;
        }
        self.len = 0;
    }
}

/// Heap slot storage, reserved once at construction.
#[derive(Clone)]
pub struct HeapSlots<T> {
    slots: Vec<Option<T>>,
}

impl<T> SlotStorage<T> for HeapSlots<T> {
    fn with_slot_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    fn slots(&self) -> &[Option<T>] {
        &self.slots
    }

    fn slots_mut(&mut self) -> &mut [Option<T>] {
        &mut self.slots
    }

    fn grow_to(&mut self, len: usize) {
        if len > self.slots.len() {
            self.slots.resize_with(len, || None);
        }
    }

    fn trim(&mut self) {
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
    }

    fn clear(&mut self) {
        self.slots.clear();
    }
}

/// Array of up to `N` optional elements addressed by index.
///
/// Indexing with `[]` an empty slot, or inserting at an index `>= N`, is a
/// caller bug and panics.
#[derive(Clone)]
pub struct SlottedArray<T, const N: usize, S = InlineSlots<T, N>> {
    storage: S,
    len: usize,
    _marker: PhantomData<T>,
}

/// Slotted array whose slots live on the heap. Use it for large `N`.
pub type SlottedHeapArray<T, const N: usize> = SlottedArray<T, N, HeapSlots<T>>;

impl<T, const N: usize, S: SlotStorage<T>> SlottedArray<T, N, S> {
    /// Creates an empty array.
    pub fn new() -> Self {
        Self {
            storage: S::with_slot_capacity(N),
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Maximum number of elements (`N`).
    pub fn capacity(&self) -> usize {
        N
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the highest occupied index.
    pub fn extent(&self) -> usize {
        self.storage.slots().len()
    }

    pub fn contains(&self, idx: usize) -> bool {
        matches!(self.storage.slots().get(idx), Some(Some(_)))
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.storage.slots().get(idx).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.storage.slots_mut().get_mut(idx).and_then(Option::as_mut)
    }

    /// Inserts `value` at `idx` if the slot is empty.
    ///
    /// Returns `false` without touching the array when `idx` is occupied.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= N`.
    pub fn insert(&mut self, idx: usize, value: T) -> bool {
        assert!(idx < N, "index {idx} out of bounds for slotted array of capacity {N}");
        if self.contains(idx) {
            return false;
        }
        self.emplace(idx, value);
        true
    }

    /// Stores `value` at `idx`, replacing any previous element.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= N`.
    pub fn emplace(&mut self, idx: usize, value: T) -> &mut T {
        assert!(idx < N, "index {idx} out of bounds for slotted array of capacity {N}");
        self.storage.grow_to(idx + 1);
        let slot = &mut self.storage.slots_mut()[idx];
        if slot.is_none() {
            self.len += 1;
        }
        slot.insert(value)
    }

    /// Removes the element at `idx`. Returns whether an element was removed.
    pub fn erase(&mut self, idx: usize) -> bool {
        match self.storage.slots_mut().get_mut(idx) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                self.len -= 1;
                self.storage.trim();
                true
            }
            _ => false,
        }
    }

    /// Moves the element at `idx` out of the array.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is empty.
    pub fn take(&mut self, idx: usize) -> T {
        let Some(value) = self.storage.slots_mut().get_mut(idx).and_then(Option::take) else {
            panic!("take from empty slot {idx}");
        };
        self.len -= 1;
        self.storage.trim();
        value
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.len = 0;
    }

    /// Smallest empty index `>= start_guess`.
    ///
    /// When no hole exists past `start_guess`, the first index beyond the
    /// populated extent is returned. A result `>= N` means the array is full.
    pub fn find_first_empty(&self, start_guess: usize) -> usize {
        let slots = self.storage.slots();
        let past_extent = start_guess.max(slots.len());
        if self.len == slots.len() {
            return past_extent;
        }
        (start_guess..slots.len())
            .find(|&i| slots[i].is_none())
            .unwrap_or(past_extent)
    }

    /// Iterates occupied slots in ascending index order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.storage.slots(), 0)
    }

    /// Iterates occupied slots from the first index `>= idx`.
    pub fn lower_bound(&self, idx: usize) -> Iter<'_, T> {
        Iter::new(self.storage.slots(), idx)
    }

    /// Iterates `(index, element)` pairs in ascending index order.
    pub fn iter_indexed(&self) -> IndexedIter<'_, T> {
        IndexedIter {
            inner: Iter::new(self.storage.slots(), 0),
        }
    }

    /// Iterates `(index, element)` pairs from the first index `>= idx`.
    pub fn lower_bound_indexed(&self, idx: usize) -> IndexedIter<'_, T> {
        IndexedIter {
            inner: Iter::new(self.storage.slots(), idx),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            inner: self.storage.slots_mut().iter_mut().enumerate(),
        }
    }

    /// Occupied indices in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter_indexed().map(|(idx, _)| idx)
    }
}

impl<T, const N: usize, S: SlotStorage<T>> Default for SlottedArray<T, N, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize, S: SlotStorage<T>> Index<usize> for SlottedArray<T, N, S> {
    type Output = T;

    fn index(&self, idx: usize) -> &T {
        match self.get(idx) {
            Some(value) => value,
            None => panic!("access to empty slot {idx}"),
        }
    }
}

impl<T, const N: usize, S: SlotStorage<T>> IndexMut<usize> for SlottedArray<T, N, S> {
    fn index_mut(&mut self, idx: usize) -> &mut T {
        match self.get_mut(idx) {
            Some(value) => value,
            None => panic!("access to empty slot {idx}"),
        }
    }
}

impl<T: fmt::Debug, const N: usize, S: SlotStorage<T>> fmt::Debug for SlottedArray<T, N, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter_indexed()).finish()
    }
}

impl<'a, T, const N: usize, S: SlotStorage<T>> IntoIterator for &'a SlottedArray<T, N, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, const N: usize, S: SlotStorage<T>> IntoIterator for &'a mut SlottedArray<T, N, S> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

/// Forward iterator over occupied slots.
///
/// Two iterators are equal when they walk the same storage and sit at the
/// same position.
#[derive(Clone)]
pub struct Iter<'a, T> {
    slots: &'a [Option<T>],
    pos: usize,
}

impl<'a, T> Iter<'a, T> {
    fn new(slots: &'a [Option<T>], start: usize) -> Self {
        let mut iter = Self { slots, pos: start };
        iter.skip_holes();
        iter
    }

    fn skip_holes(&mut self) {
        while self.pos < self.slots.len() && self.slots[self.pos].is_none() {
            self.pos += 1;
        }
    }

    /// Index of the element the next call to `next` yields, or the storage
    /// extent once exhausted.
    pub fn position(&self) -> usize {
        self.pos.min(self.slots.len())
    }

    fn next_indexed(&mut self) -> Option<(usize, &'a T)> {
        let slots = self.slots;
        let idx = self.pos;
        let value = slots.get(idx)?.as_ref()?;
        self.pos += 1;
        self.skip_holes();
        Some((idx, value))
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.next_indexed().map(|(_, value)| value)
    }
}

impl<T> PartialEq for Iter<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.slots, other.slots) && self.position() == other.position()
    }
}

impl<T> Eq for Iter<'_, T> {}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("pos", &self.position()).finish()
    }
}

/// Iterator over `(index, element)` pairs.
#[derive(Clone, Debug)]
pub struct IndexedIter<'a, T> {
    inner: Iter<'a, T>,
}

impl<'a, T> Iterator for IndexedIter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<(usize, &'a T)> {
        self.inner.next_indexed()
    }
}

/// Mutable iterator over occupied slots.
pub struct IterMut<'a, T> {
    inner: std::iter::Enumerate<std::slice::IterMut<'a, Option<T>>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        self.inner.find_map(|(_, slot)| slot.as_mut())
    }
}
