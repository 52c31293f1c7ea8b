//! Identifier-keyed slotted containers
//!
//! [`SlottedIdTable`] and [`SlottedIdVector`] key a [`SlottedArray`] or a
//! [`SlottedVector`] by a strongly typed identifier (UE index, LCID, cell
//! index, ...). The identifier is translated to and from the underlying
//! integer index by an [`IdConverter`] policy.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use crate::slotted_array::{HeapSlots, InlineSlots, SlotStorage, SlottedArray};
use crate::slotted_vector::SlottedVector;

/// Conversion between an identifier type and a container index.
pub trait IdConverter<Id> {
    /// Index that stores `id`.
    fn get_index(id: Id) -> usize;

    /// Identifier stored at `index`.
    fn get_id(index: usize) -> Id;

    /// Identifier stored at `index`, or `None` when no identifier maps to it.
    fn try_get_id(index: usize) -> Option<Id> {
        Some(Self::get_id(index))
    }
}

/// Default policy: numeric conversion through `Into<usize>` / `TryFrom<usize>`.
///
/// Converting back an index that is not a valid identifier is a bug and
/// panics. Containers only ever hand back indices they were given.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericIdConverter;

impl<Id> IdConverter<Id> for NumericIdConverter
where
    Id: Into<usize> + TryFrom<usize>,
{
    fn get_index(id: Id) -> usize {
        id.into()
    }

    fn get_id(index: usize) -> Id {
        match Self::try_get_id(index) {
            Some(id) => id,
            None => panic!("index {index} is not a valid identifier"),
        }
    }

    fn try_get_id(index: usize) -> Option<Id> {
        Id::try_from(index).ok()
    }
}

/// Fixed-capacity table of elements keyed by identifier.
pub struct SlottedIdTable<Id, T, const N: usize, S = InlineSlots<T, N>, C = NumericIdConverter> {
    inner: SlottedArray<T, N, S>,
    _marker: PhantomData<fn(Id) -> C>,
}

/// Identifier table with heap-allocated slots.
pub type SlottedHeapIdTable<Id, T, const N: usize, C = NumericIdConverter> =
    SlottedIdTable<Id, T, N, HeapSlots<T>, C>;

impl<Id, T, const N: usize, S, C> SlottedIdTable<Id, T, N, S, C>
where
    Id: Copy,
    S: SlotStorage<T>,
    C: IdConverter<Id>,
{
    pub fn new() -> Self {
        Self {
            inner: SlottedArray::new(),
            _marker: PhantomData,
        }
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.inner.contains(C::get_index(id))
    }

    pub fn get(&self, id: Id) -> Option<&T> {
        self.inner.get(C::get_index(id))
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut T> {
        self.inner.get_mut(C::get_index(id))
    }

    /// See [`SlottedArray::insert`].
    pub fn insert(&mut self, id: Id, value: T) -> bool {
        self.inner.insert(C::get_index(id), value)
    }

    /// See [`SlottedArray::emplace`].
    pub fn emplace(&mut self, id: Id, value: T) -> &mut T {
        self.inner.emplace(C::get_index(id), value)
    }

    pub fn erase(&mut self, id: Id) -> bool {
        self.inner.erase(C::get_index(id))
    }

    /// See [`SlottedArray::take`].
    pub fn take(&mut self, id: Id) -> T {
        self.inner.take(C::get_index(id))
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// First free identifier at or after `start`, or `None` when the table is
    /// full from `start` on.
    pub fn find_first_empty(&self, start: Id) -> Option<Id> {
        let idx = self.inner.find_first_empty(C::get_index(start));
        (idx < N).then(|| C::get_id(idx))
    }

    /// `(id, element)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (Id, &T)> + '_ {
        self.inner.iter_indexed().map(|(idx, value)| (C::get_id(idx), value))
    }

    /// Pairs from the first occupied id at or after `id`.
    pub fn lower_bound(&self, id: Id) -> impl Iterator<Item = (Id, &T)> + '_ {
        self.inner
            .lower_bound_indexed(C::get_index(id))
            .map(|(idx, value)| (C::get_id(idx), value))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.inner.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.inner.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.inner.keys().map(C::get_id)
    }
}

impl<Id, T, const N: usize, S, C> Default for SlottedIdTable<Id, T, N, S, C>
where
    Id: Copy,
    S: SlotStorage<T>,
    C: IdConverter<Id>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Id, T, const N: usize, S, C> Index<Id> for SlottedIdTable<Id, T, N, S, C>
where
    Id: Copy,
    S: SlotStorage<T>,
    C: IdConverter<Id>,
{
    type Output = T;

    fn index(&self, id: Id) -> &T {
        &self.inner[C::get_index(id)]
    }
}

impl<Id, T, const N: usize, S, C> IndexMut<Id> for SlottedIdTable<Id, T, N, S, C>
where
    Id: Copy,
    S: SlotStorage<T>,
    C: IdConverter<Id>,
{
    fn index_mut(&mut self, id: Id) -> &mut T {
        &mut self.inner[C::get_index(id)]
    }
}

impl<Id, T, const N: usize, S, C> fmt::Debug for SlottedIdTable<Id, T, N, S, C>
where
    Id: Copy + fmt::Debug,
    T: fmt::Debug,
    S: SlotStorage<T>,
    C: IdConverter<Id>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Dense vector of elements keyed by identifier.
pub struct SlottedIdVector<Id, T, C = NumericIdConverter> {
    inner: SlottedVector<T>,
    _marker: PhantomData<fn(Id) -> C>,
}

impl<Id, T, C> SlottedIdVector<Id, T, C>
where
    Id: Copy,
    C: IdConverter<Id>,
{
    pub fn new() -> Self {
        Self {
            inner: SlottedVector::new(),
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.inner.contains(C::get_index(id))
    }

    pub fn get(&self, id: Id) -> Option<&T> {
        self.inner.get(C::get_index(id))
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut T> {
        self.inner.get_mut(C::get_index(id))
    }

    pub fn insert(&mut self, id: Id, value: T) -> bool {
        self.inner.insert(C::get_index(id), value)
    }

    pub fn emplace(&mut self, id: Id, value: T) -> &mut T {
        self.inner.emplace(C::get_index(id), value)
    }

    pub fn erase(&mut self, id: Id) -> bool {
        self.inner.erase(C::get_index(id))
    }

    pub fn take(&mut self, id: Id) -> T {
        self.inner.take(C::get_index(id))
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// First free identifier at or after `start` in index order.
    ///
    /// Returns `None` if that index does not map back to a valid identifier.
    pub fn find_first_empty(&self, start: Id) -> Option<Id> {
        C::try_get_id(self.inner.find_first_empty(C::get_index(start)))
    }

    /// Elements in dense storage order.
    pub fn unsorted(&self) -> &[T] {
        self.inner.unsorted()
    }

    pub fn unsorted_mut(&mut self) -> &mut [T] {
        self.inner.unsorted_mut()
    }

    /// `(id, element)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (Id, &T)> + '_ {
        self.inner.iter_indexed().map(|(idx, value)| (C::get_id(idx), value))
    }

    /// Pairs from the first occupied id at or after `id`.
    pub fn lower_bound(&self, id: Id) -> impl Iterator<Item = (Id, &T)> + '_ {
        self.inner
            .lower_bound_indexed(C::get_index(id))
            .map(|(idx, value)| (C::get_id(idx), value))
    }

    /// Elements in ascending index order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.inner.iter()
    }

    /// Elements in dense storage order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.inner.unsorted_mut().iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.inner.keys().map(C::get_id)
    }
}

impl<Id, T, C> Default for SlottedIdVector<Id, T, C>
where
    Id: Copy,
    C: IdConverter<Id>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Id, T, C> Index<Id> for SlottedIdVector<Id, T, C>
where
    Id: Copy,
    C: IdConverter<Id>,
{
    type Output = T;

    fn index(&self, id: Id) -> &T {
        &self.inner[C::get_index(id)]
    }
}

impl<Id, T, C> IndexMut<Id> for SlottedIdVector<Id, T, C>
where
    Id: Copy,
    C: IdConverter<Id>,
{
    fn index_mut(&mut self, id: Id) -> &mut T {
        &mut self.inner[C::get_index(id)]
    }
}

impl<Id, T, C> fmt::Debug for SlottedIdVector<Id, T, C>
where
    Id: Copy + fmt::Debug,
    T: fmt::Debug,
    C: IdConverter<Id>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
