//! Slotted containers for nextgran
//!
//! Index-addressed containers used for UE, bearer and cell bookkeeping:
//!
//! - [`SlottedArray`]: fixed capacity, element addresses never change.
//! - [`SlottedVector`]: open-ended index space, densely packed elements.
//! - [`SlottedIdTable`] / [`SlottedIdVector`]: the above keyed by a typed
//!   identifier through an [`IdConverter`].
//!
//! Lookup, insertion and erasure are O(1); iteration follows ascending index
//! order and skips empty slots. Out-of-range insertion and access to an empty
//! slot through `[]` are programming errors and panic. Every other miss is
//! reported through `bool` or `Option`.
//!
//! None of the containers synchronize internally. Structural mutation needs
//! exclusive access, which the borrow checker enforces.

pub mod slotted_array;
pub mod slotted_id;
pub mod slotted_vector;

pub use slotted_array::{
    HeapSlots, InlineSlots, SlotStorage, SlottedArray, SlottedHeapArray,
};
pub use slotted_id::{
    IdConverter, NumericIdConverter, SlottedHeapIdTable, SlottedIdTable, SlottedIdVector,
};
pub use slotted_vector::SlottedVector;
