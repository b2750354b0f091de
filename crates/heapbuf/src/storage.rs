// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use nm::{Event, Magnitude};
use tracing::{Level, event};

use crate::Element;

/// The fixed-size block of elements behind one or more views.
///
/// Storage is created once and never resized. Every view derived from the same root holds a
/// clone of the same `Storage`, which is a reference-counted handle - the elements are released
/// when the last view is dropped.
///
/// Elements live in `Cell`s, so any view may write through a shared handle. This makes the type
/// `!Send` and `!Sync`: a storage block and all its views are confined to the thread that created
/// them, which is what keeps the unsynchronized mutation sound.
///
/// All index arguments are absolute storage indices. Callers validate them against their own
/// window before reaching down here.
pub(crate) struct Storage<T> {
    cells: Rc<Box<[Cell<T>]>>,
}

impl<T: Element> Storage<T> {
    /// Allocates storage of `len` elements, each set to `T::default()`.
    pub(crate) fn allocate(len: usize) -> Self {
        STORAGE_ALLOCATED_LEN.with(|e| e.observe(len));
        event!(Level::TRACE, len, "allocated buffer storage");

        Self::from_values(vec![T::default(); len])
    }

    /// Takes ownership of the caller's elements as the storage contents.
    ///
    /// The allocation of the vector is reused for the storage.
    pub(crate) fn adopt(values: Vec<T>) -> Self {
        event!(Level::TRACE, len = values.len(), "adopted buffer storage");

        Self::from_values(values)
    }

    fn from_values(values: Vec<T>) -> Self {
        // `Cell<T>` has the layout of `T`, so this collects in place.
        let cells: Box<[Cell<T>]> = values.into_iter().map(Cell::new).collect();

        Self { cells: Rc::new(cells) }
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn get(&self, index: usize) -> T {
        self.cells[index].get()
    }

    pub(crate) fn set(&self, index: usize, value: T) {
        self.cells[index].set(value);
    }

    /// Copies `dst.len()` elements starting at `index` into `dst`.
    pub(crate) fn read_into(&self, index: usize, dst: &mut [T]) {
        let src = &self.cells[index..index + dst.len()];

        for (to, from) in dst.iter_mut().zip(src) {
            *to = from.get();
        }
    }

    /// Copies all of `src` into the storage starting at `index`.
    pub(crate) fn write_from(&self, index: usize, src: &[T]) {
        let dst = &self.cells[index..index + src.len()];

        for (to, from) in dst.iter().zip(src) {
            to.set(*from);
        }
    }

    /// Moves `len` elements from `src` to `dst` within this storage.
    ///
    /// The two ranges may overlap. The result is as if the source range had first been copied to
    /// a temporary and then from the temporary to the destination.
    pub(crate) fn move_within(&self, src: usize, dst: usize, len: usize) {
        if len == 0 || src == dst {
            return;
        }

        let from = &self.cells[src..src + len];
        let to = &self.cells[dst..dst + len];

        if dst < src {
            // Writing front to back never overwrites a source element before it is read.
            for (to, from) in to.iter().zip(from) {
                to.set(from.get());
            }
        } else {
            for (to, from) in to.iter().zip(from).rev() {
                to.set(from.get());
            }
        }
    }

    /// Copies `len` elements from `source` (starting at `src`) to this storage (starting at `dst`).
    ///
    /// `source` may be this very storage, in which case the copy is overlap-safe.
    pub(crate) fn copy_from(&self, dst: usize, source: &Self, src: usize, len: usize) {
        if self.same_storage(source) {
            self.move_within(src, dst, len);
            return;
        }

        let from = &source.cells[src..src + len];
        let to = &self.cells[dst..dst + len];

        for (to, from) in to.iter().zip(from) {
            to.set(from.get());
        }
    }

    /// Whether both handles refer to the same block of elements.
    pub(crate) fn same_storage(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cells, &other.cells)
    }

    /// Returns the elements if this is the only handle to the storage.
    pub(crate) fn try_into_vec(self) -> Result<Vec<T>, Self> {
        match Rc::try_unwrap(self.cells) {
            Ok(cells) => Ok(cells.into_vec().into_iter().map(Cell::into_inner).collect()),
            Err(cells) => Err(Self { cells }),
        }
    }
}

impl<T> Clone for Storage<T> {
    fn clone(&self) -> Self {
        Self {
            cells: Rc::clone(&self.cells),
        }
    }
}

impl<T> fmt::Debug for Storage<T> {
    #[cfg_attr(test, mutants::skip)] // There is no specific API contract here for us to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("len", &self.cells.len())
            .field("handles", &Rc::strong_count(&self.cells))
            .finish()
    }
}

const STORAGE_LEN_BUCKETS: &[Magnitude] = &[0, 16, 64, 256, 1024, 4096, 16_384, 65_536];

thread_local! {
    static STORAGE_ALLOCATED_LEN: Event = Event::builder()
        .name("heapbuf_storage_allocated_len")
        .histogram(STORAGE_LEN_BUCKETS)
        .build();
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

    use static_assertions::assert_not_impl_any;
    use tracing_test::traced_test;

    use super::*;

    assert_not_impl_any!(Storage<u8>: Send, Sync);

    fn contents<T: Element>(storage: &Storage<T>) -> Vec<T> {
        (0..storage.len()).map(|i| storage.get(i)).collect()
    }

    #[test]
    fn allocate_is_default_filled() {
        let storage = Storage::<u32>::allocate(4);

        assert_eq!(storage.len(), 4);
        assert_eq!(contents(&storage), vec![0, 0, 0, 0]);
    }

    #[test]
    fn adopt_keeps_contents() {
        let storage = Storage::adopt(vec!['a', 'b', 'c']);

        assert_eq!(contents(&storage), vec!['a', 'b', 'c']);
    }

    #[traced_test]
    #[test]
    fn allocation_is_traced() {
        _ = Storage::<u8>::allocate(3);

        assert!(logs_contain("allocated buffer storage"));
    }

    #[test]
    fn shared_handles_see_writes() {
        let a = Storage::adopt(vec![1_u8, 2, 3]);
        let b = a.clone();

        a.set(1, 20);

        assert_eq!(b.get(1), 20);
        assert!(a.same_storage(&b));
        assert!(!a.same_storage(&Storage::adopt(vec![1_u8, 20, 3])));
    }

    #[test]
    fn read_and_write_ranges() {
        let storage = Storage::<u16>::allocate(6);

        storage.write_from(2, &[7, 8, 9]);

        let mut dst = [0_u16; 4];
        storage.read_into(1, &mut dst);

        assert_eq!(dst, [0, 7, 8, 9]);
    }

    #[test]
    fn move_within_forward_overlap() {
        let storage = Storage::adopt(vec![0, 1, 2, 3, 4, 5]);

        storage.move_within(2, 0, 4);

        assert_eq!(contents(&storage), vec![2, 3, 4, 5, 4, 5]);
    }

    #[test]
    fn move_within_backward_overlap() {
        let storage = Storage::adopt(vec![0, 1, 2, 3, 4, 5]);

        storage.move_within(0, 2, 4);

        assert_eq!(contents(&storage), vec![0, 1, 0, 1, 2, 3]);
    }

    #[test]
    fn move_within_zero_length_is_noop() {
        let storage = Storage::adopt(vec![0, 1, 2]);

        storage.move_within(1, 0, 0);
        storage.move_within(1, 1, 2);

        assert_eq!(contents(&storage), vec![0, 1, 2]);
    }

    #[test]
    fn copy_from_other_storage() {
        let src = Storage::adopt(vec![9, 8, 7]);
        let dst = Storage::<i32>::allocate(5);

        dst.copy_from(1, &src, 0, 3);

        assert_eq!(contents(&dst), vec![0, 9, 8, 7, 0]);
    }

    #[test]
    fn copy_from_same_storage_is_overlap_safe() {
        let storage = Storage::adopt(vec![0, 1, 2, 3, 4]);
        let alias = storage.clone();

        storage.copy_from(1, &alias, 0, 4);

        assert_eq!(contents(&storage), vec![0, 0, 1, 2, 3]);
    }

    #[test]
    fn try_into_vec_requires_unique_handle() {
        let storage = Storage::adopt(vec![1, 2, 3]);
        let alias = storage.clone();

        let storage = storage.try_into_vec().unwrap_err();
        drop(alias);

        assert_eq!(storage.try_into_vec().unwrap(), vec![1, 2, 3]);
    }
}
