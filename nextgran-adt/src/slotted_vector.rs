//! Dense slotted vector
//!
//! `SlottedVector<T>` maps an open-ended integer index space to elements kept
//! densely packed in a single vector. A sparse `index_mapper` translates
//! external indices into dense positions. Compared to
//! [`SlottedArray`](crate::SlottedArray) it uses less memory and iterates
//! faster over few elements, but elements move on erase, so no reference may
//! be held across a structural mutation.
//!
//! Erase swaps the target with the last dense element. The owner of every
//! dense position is tracked in a reverse table so the swap repair is O(1)
//! instead of a scan over `index_mapper`.

use std::fmt;
use std::ops::{Index, IndexMut};

/// Marks an external index with no element.
const ABSENT: usize = usize::MAX;

/// Vector of optional elements addressed by an open-ended index.
#[derive(Clone, Default)]
pub struct SlottedVector<T> {
    /// Live elements, densely packed in no particular order.
    objects: Vec<T>,
    /// External index owning each dense position.
    owners: Vec<usize>,
    /// External index -> dense position, or `ABSENT`.
    index_mapper: Vec<usize>,
}

impl<T> SlottedVector<T> {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            owners: Vec::new(),
            index_mapper: Vec::new(),
        }
    }

    /// Creates an empty vector with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            objects: Vec::with_capacity(capacity),
            owners: Vec::with_capacity(capacity),
            index_mapper: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// One past the highest occupied index.
    pub fn extent(&self) -> usize {
        self.index_mapper.len()
    }

    fn position(&self, idx: usize) -> Option<usize> {
        self.index_mapper.get(idx).copied().filter(|&pos| pos != ABSENT)
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.position(idx).is_some()
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.position(idx).map(|pos| &self.objects[pos])
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.position(idx).map(|pos| &mut self.objects[pos])
    }

    /// Stores `value` at `idx`.
    ///
    /// An existing element is overwritten in its current dense position.
    /// Otherwise the value is appended to the dense storage.
    pub fn emplace(&mut self, idx: usize, value: T) -> &mut T {
        if let Some(pos) = self.position(idx) {
            let slot = &mut self.objects[pos];
            *slot = value;
            return slot;
        }

        let pos = self.objects.len();
        if idx == self.index_mapper.len() {
            self.index_mapper.push(pos);
        } else {
            if idx > self.index_mapper.len() {
                self.index_mapper.resize(idx + 1, ABSENT);
            }
            self.index_mapper[idx] = pos;
        }
        self.owners.push(idx);
        self.objects.push(value);
        &mut self.objects[pos]
    }

    /// Inserts `value` at `idx` if it is free. Returns whether it was inserted.
    pub fn insert(&mut self, idx: usize, value: T) -> bool {
        if self.contains(idx) {
            return false;
        }
        self.emplace(idx, value);
        true
    }

    /// Removes the element at `idx`. Returns whether an element was removed.
    pub fn erase(&mut self, idx: usize) -> bool {
        self.remove(idx).is_some()
    }

    /// Moves the element at `idx` out of the vector.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is empty.
    pub fn take(&mut self, idx: usize) -> T {
        match self.remove(idx) {
            Some(value) => value,
            None => panic!("take from empty slot {idx}"),
        }
    }

    fn remove(&mut self, idx: usize) -> Option<T> {
        let pos = self.position(idx)?;
        let value = self.objects.swap_remove(pos);
        self.owners.swap_remove(pos);
        if let Some(&moved) = self.owners.get(pos) {
            self.index_mapper[moved] = pos;
        }

        self.index_mapper[idx] = ABSENT;
        while self.index_mapper.last() == Some(&ABSENT) {
            self.index_mapper.pop();
        }
        Some(value)
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.owners.clear();
        self.index_mapper.clear();
    }

    /// Smallest empty index `>= start_guess`, or the first index past the
    /// populated extent when there is no hole.
    pub fn find_first_empty(&self, start_guess: usize) -> usize {
        let past_extent = start_guess.max(self.index_mapper.len());
        if self.objects.len() == self.index_mapper.len() {
            return past_extent;
        }
        (start_guess..self.index_mapper.len())
            .find(|&i| self.index_mapper[i] == ABSENT)
            .unwrap_or(past_extent)
    }

    /// Elements in dense storage order. The order is unrelated to indices.
    pub fn unsorted(&self) -> &[T] {
        &self.objects
    }

    pub fn unsorted_mut(&mut self) -> &mut [T] {
        &mut self.objects
    }

    /// Iterates elements in ascending index order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.lower_bound(0)
    }

    /// Iterates elements from the first occupied index `>= idx`.
    pub fn lower_bound(&self, idx: usize) -> Iter<'_, T> {
        Iter::new(self, idx)
    }

    /// Iterates `(index, element)` pairs in ascending index order.
    pub fn iter_indexed(&self) -> IndexedIter<'_, T> {
        IndexedIter { inner: self.iter() }
    }

    /// `(index, element)` pairs from the first occupied index `>= idx`.
    pub fn lower_bound_indexed(&self, idx: usize) -> IndexedIter<'_, T> {
        IndexedIter {
            inner: self.lower_bound(idx),
        }
    }

    /// Occupied indices in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter_indexed().map(|(idx, _)| idx)
    }
}

impl<T> Index<usize> for SlottedVector<T> {
    type Output = T;

    fn index(&self, idx: usize) -> &T {
        match self.get(idx) {
            Some(value) => value,
            None => panic!("access to empty slot {idx}"),
        }
    }
}

impl<T> IndexMut<usize> for SlottedVector<T> {
    fn index_mut(&mut self, idx: usize) -> &mut T {
        match self.get_mut(idx) {
            Some(value) => value,
            None => panic!("access to empty slot {idx}"),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SlottedVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter_indexed()).finish()
    }
}

impl<'a, T> IntoIterator for &'a SlottedVector<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Index-ordered iterator over a [`SlottedVector`].
///
/// Two iterators are equal when they walk the same vector and sit at the
/// same position.
pub struct Iter<'a, T> {
    vec: &'a SlottedVector<T>,
    pos: usize,
}

impl<'a, T> Iter<'a, T> {
    fn new(vec: &'a SlottedVector<T>, start: usize) -> Self {
        let mut iter = Self { vec, pos: start };
        iter.skip_holes();
        iter
    }

    fn skip_holes(&mut self) {
        let mapper = &self.vec.index_mapper;
        while self.pos < mapper.len() && mapper[self.pos] == ABSENT {
            self.pos += 1;
        }
    }

    /// Index of the element the next call to `next` yields, or the populated
    /// extent once exhausted.
    pub fn position(&self) -> usize {
        self.pos.min(self.vec.extent())
    }

    fn next_indexed(&mut self) -> Option<(usize, &'a T)> {
        let vec = self.vec;
        let idx = self.pos;
        let pos = vec.position(idx)?;
        self.pos += 1;
        self.skip_holes();
        Some((idx, &vec.objects[pos]))
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            vec: self.vec,
            pos: self.pos,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.next_indexed().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.vec.len()))
    }
}

impl<T> PartialEq for Iter<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.vec, other.vec) && self.position() == other.position()
    }
}

impl<T> Eq for Iter<'_, T> {}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("pos", &self.position()).finish()
    }
}

/// Iterator over `(index, element)` pairs of a [`SlottedVector`].
pub struct IndexedIter<'a, T> {
    inner: Iter<'a, T>,
}

impl<'a, T> Iterator for IndexedIter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<(usize, &'a T)> {
        self.inner.next_indexed()
    }
}
