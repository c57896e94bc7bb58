//! A fixed-capacity binary heap ordered by a caller-supplied priority predicate.
//!
//! The capacity is chosen at construction and never grows. Running out of room,
//! or popping from an empty heap, is reported through plain return values;
//! only nonsensical requests produce a [`HeapError`].
#![doc(html_root_url = "https://docs.rs/bounded_heap")]
#![warn(
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_lifetimes,
    unused_import_braces
)]
#![deny(missing_docs, unsafe_op_in_unsafe_fn)]

mod error;
mod order;

pub use error::{HeapError, Result};
pub use order::{MaxFirst, MinFirst, Priority, Stateful};

use std::{
    fmt::{self, Debug, Display, Formatter},
    iter::{self, FusedIterator},
    mem::{self, MaybeUninit},
    slice::{self, Iter},
};

/// Backing storage: `data[0..len]` is always initialized, everything past it never is.
struct Slots<T> {
    len: usize,
    data: Box<[MaybeUninit<T>]>,
}

impl<T> Slots<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            len: 0,
            data: iter::repeat_with(MaybeUninit::uninit)
                .take(capacity)
                .collect(),
        }
    }

    #[inline(always)]
    fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    fn get(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        // # Safety
        // Only ever called with indexes in `0..len`, which are initialized
        unsafe { self.data[index].assume_init_ref() }
    }

    #[inline(always)]
    fn as_slice(&self) -> &[T] {
        // # Safety
        // `data[0..len]` is initialized and `MaybeUninit<T>` has the layout of `T`
        unsafe { slice::from_raw_parts(self.data.as_ptr().cast::<T>(), self.len) }
    }
}

impl<T> Drop for Slots<T> {
    #[inline(always)]
    fn drop(&mut self) {
        for slot in &mut self.data[..self.len] {
            // # Safety
            // Every slot below `len` holds a live value that nobody else will drop
            unsafe { slot.assume_init_drop() };
        }
    }
}

/// A fixed-capacity heap whose order is decided by a [`Priority`] predicate.
///
/// Element `i` has its children at `2i + 1` and `2i + 2`, and no child ever
/// outranks its parent, so the root is always the next element to pop.
/// Elements that tie under the predicate come out in an unspecified order.
pub struct BoundedHeap<T, P> {
    slots: Slots<T>,
    order: P,
}

impl<T, P> BoundedHeap<T, P>
where
    P: Priority<T>,
{
    /// Creates a new empty heap able to hold `capacity` elements.
    ///
    /// # Errors
    ///
    /// [`HeapError::InvalidCapacity`] if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounded_heap::*;
    /// let mut heap = BoundedHeap::new(16, |a: &i32, b: &i32| a > b).unwrap();
    /// heap.insert(1);
    /// assert!(BoundedHeap::<i32, MaxFirst>::new(0, MaxFirst).is_err());
    /// ```
    pub fn new(capacity: usize, order: P) -> Result<Self> {
        if capacity == 0 {
            log::trace!("rejected heap with capacity 0");
            return Err(HeapError::InvalidCapacity { capacity });
        }
        log::debug!("creating bounded heap with capacity {capacity}");
        Ok(Self {
            slots: Slots::with_capacity(capacity),
            order,
        })
    }

    /// Builds a heap holding exactly `items`, with a capacity equal to their count.
    ///
    /// The heap is therefore full as soon as it is returned.
    ///
    /// # Errors
    ///
    /// [`HeapError::InvalidCapacity`] if `items` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounded_heap::*;
    /// let mut heap = BoundedHeap::heapify([9, 8, 7, 6, 5], MinFirst).unwrap();
    /// assert_eq!(5, heap.len());
    /// assert_eq!(Some(5), heap.pop());
    /// ```
    pub fn heapify<I>(items: I, order: P) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        let mut heap = Self::new(items.len(), order)?;
        for item in items {
            let inserted = heap.insert(item);
            debug_assert!(inserted);
        }
        Ok(heap)
    }

    /// Tries to add `value`, handing it back if the heap is full.
    ///
    /// # Time Complexity
    ///
    /// Average time complexity O(1) and worst case O(log N)
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounded_heap::*;
    /// let mut heap = BoundedHeap::new(1, MaxFirst).unwrap();
    /// assert_eq!(Ok(()), heap.try_insert(1));
    /// assert_eq!(Err(2), heap.try_insert(2));
    /// ```
    pub fn try_insert(&mut self, value: T) -> std::result::Result<(), T> {
        if self.is_full() {
            log::trace!("heap full at capacity {}", self.capacity());
            return Err(value);
        }
        // `data[len]` becomes initialized, so `data[0..len + 1]` is initialized.
        self.slots.data[self.slots.len] = MaybeUninit::new(value);
        self.slots.len += 1;
        self.sift_up(self.slots.len - 1);
        Ok(())
    }

    /// Adds `value` to the heap.
    ///
    /// # Returns
    ///
    /// `true` if there was room for `value`.
    ///
    /// `false` if the heap was already full. `value` is dropped and the heap is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounded_heap::*;
    /// let mut heap = BoundedHeap::new(2, |a: &i32, b: &i32| a < b).unwrap();
    /// assert!(heap.insert(3));
    /// assert!(heap.insert(1));
    /// assert!(!heap.insert(2));
    /// assert_eq!(Some(&1), heap.peek());
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        self.try_insert(value).is_ok()
    }

    /// Adds `value`, making room by evicting the lowest priority element if needed.
    ///
    /// This keeps the `capacity` highest priority elements out of a longer stream.
    ///
    /// # Returns
    ///
    /// `None` if there was spare capacity to accommodate `value`
    ///
    /// `Some(elem)` if the lowest priority element `elem` had to be evicted to accommodate `value`.
    /// `elem` may be `value` if all the elements already present were at least as high priority.
    ///
    /// # Time Complexity
    ///
    /// If there was spare capacity, worst case O(log N)
    ///
    /// If the heap was full, O(N), since every leaf is a candidate for eviction.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounded_heap::*;
    /// let mut heap = BoundedHeap::new(2, MaxFirst).unwrap();
    /// assert_eq!(None, heap.insert_evicting(4));
    /// assert_eq!(None, heap.insert_evicting(9));
    /// assert_eq!(Some(4), heap.insert_evicting(6));
    /// assert_eq!(Some(1), heap.insert_evicting(1));
    /// assert_eq!(vec![9, 6], heap.into_sorted_vec());
    /// ```
    pub fn insert_evicting(&mut self, value: T) -> Option<T> {
        let value = match self.try_insert(value) {
            Ok(()) => return None,
            Err(value) => value,
        };

        // The lowest priority element has no children, so only leaves are scanned.
        let len = self.slots.len;
        let mut lowest_index = len >> 1;
        for index in (len >> 1)..len {
            if self
                .order
                .outranks(self.slots.get(lowest_index), self.slots.get(index))
            {
                lowest_index = index;
            }
        }
        if !self.order.outranks(&value, self.slots.get(lowest_index)) {
            return Some(value);
        }

        let evicted = mem::replace(&mut self.slots.data[lowest_index], MaybeUninit::new(value));
        log::trace!("evicted element at index {lowest_index}");
        self.sift_up(lowest_index);
        // # Safety
        // `evicted` was in `0..len` so it held an initialized value.
        Some(unsafe { evicted.assume_init() })
    }

    /// Removes and returns the highest priority element.
    ///
    /// # Returns
    ///
    /// `None` if there are no elements in the heap.
    ///
    /// `Some(elem)` if there was an element. `elem` is at least as high priority as all remaining elements.
    ///
    /// # Time Complexity
    ///
    /// Average time complexity O(1) and worst case O(log N)
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounded_heap::*;
    /// let mut heap = BoundedHeap::heapify([11, 9, 7, 4, 3, 8], MinFirst).unwrap();
    /// assert_eq!(Some(3), heap.pop());
    /// assert_eq!(Some(4), heap.pop());
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        if self.slots.len == 0 {
            return None;
        }
        self.slots.len -= 1;
        let root = mem::replace(&mut self.slots.data[0], MaybeUninit::uninit());
        // # Safety
        // `data[0]` is now uninitialized. Restore the property of `data[0..len]`
        // always being initialized by swapping in the last value.
        self.slots.data.swap(0, self.slots.len);
        self.sift_down(0);
        // # Safety
        // `root` still holds the initialized value taken from `data[0]`.
        Some(unsafe { root.assume_init() })
    }

    /// Pops up to `n` elements, highest priority first.
    ///
    /// Fewer than `n` elements come back only when the heap runs empty.
    ///
    /// # Errors
    ///
    /// [`HeapError::OutOfRange`] if `n` is larger than the capacity. The heap is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounded_heap::*;
    /// let mut heap = BoundedHeap::heapify([10, 20, 50, 20, 15], MinFirst).unwrap();
    /// assert_eq!(vec![10, 15], heap.take(2).unwrap());
    /// assert_eq!(vec![20, 20, 50], heap.take(4).unwrap());
    /// assert!(heap.take(6).is_err());
    /// ```
    pub fn take(&mut self, n: usize) -> Result<Vec<T>> {
        let capacity = self.capacity();
        if n > capacity {
            log::trace!("rejected take of {n} from heap with capacity {capacity}");
            return Err(HeapError::OutOfRange {
                requested: n,
                capacity,
            });
        }
        log::trace!("taking {} of {} elements", n.min(self.len()), self.len());
        Ok(iter::from_fn(|| self.pop()).take(n).collect())
    }

    /// Consumes the heap, returning its elements in the order they would be popped.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounded_heap::*;
    /// let heap = BoundedHeap::heapify([2, 9, 4], MaxFirst).unwrap();
    /// assert_eq!(vec![9, 4, 2], heap.into_sorted_vec());
    /// ```
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        iter::from_fn(|| self.pop()).collect()
    }

    fn sift_up(&mut self, mut node_index: usize) {
        while node_index != 0 {
            let parent_index = (node_index - 1) >> 1;
            let node = self.slots.get(node_index);
            let parent = self.slots.get(parent_index);
            if !self.order.outranks(node, parent) {
                break;
            }
            self.slots.data.swap(node_index, parent_index);
            node_index = parent_index;
        }
    }

    fn sift_down(&mut self, mut node_index: usize) {
        let len = self.slots.len;
        loop {
            let lchild_index = (node_index << 1) + 1;
            let rchild_index = (node_index << 1) + 2;
            if lchild_index >= len {
                break;
            }
            let node = self.slots.get(node_index);
            let lchild = self.slots.get(lchild_index);
            let (child, child_index) = if rchild_index < len {
                let rchild = self.slots.get(rchild_index);
                match self.order.outranks(rchild, lchild) {
                    true => (rchild, rchild_index),
                    false => (lchild, lchild_index),
                }
            } else {
                (lchild, lchild_index)
            };
            if !self.order.outranks(child, node) {
                break;
            }
            self.slots.data.swap(node_index, child_index);
            node_index = child_index;
        }
    }
}

impl<T, P> BoundedHeap<T, P> {
    /// Returns a reference to the highest priority element.
    ///
    /// # Returns
    ///
    /// `None` if there are no elements in the heap.
    ///
    /// `Some(elem)` if there was an element. `elem` is at least as high priority as all other elements.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounded_heap::*;
    /// let heap: BoundedHeap<i32, MaxFirst> = BoundedHeap::new(16, MaxFirst).unwrap();
    /// assert_eq!(None, heap.peek());
    /// ```
    #[inline(always)]
    pub fn peek(&self) -> Option<&T> {
        match self.slots.len {
            0 => None,
            _ => Some(self.slots.get(0)),
        }
    }

    /// Provides immutable access to the occupied part of the backing storage.
    /// NOTE: The elements are NOT in the order they'd be popped in!
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        self.slots.as_slice()
    }

    /// Provides iteration of the heap's elements.
    /// NOTE: The elements are NOT in the order they'd be popped in!
    #[inline(always)]
    pub fn iter(&self) -> Iter<'_, T> {
        self.as_slice().iter()
    }

    /// The predicate deciding which element comes out first.
    #[inline(always)]
    pub fn order(&self) -> &P {
        &self.order
    }

    /// Returns the number of elements.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounded_heap::*;
    /// let mut heap = BoundedHeap::new(16, MaxFirst).unwrap();
    /// heap.insert(1);
    /// assert_eq!(heap.len(), 1);
    /// ```
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.slots.len
    }

    /// Alias of [`len`](Self::len).
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.len()
    }

    /// Returns the maximum number of elements the heap can hold.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Returns true if there are no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounded_heap::*;
    /// let mut heap = BoundedHeap::new(16, MaxFirst).unwrap();
    /// assert!(heap.is_empty());
    /// heap.insert(1);
    /// assert!(!heap.is_empty());
    /// ```
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.slots.len == 0
    }

    /// Returns true if there is no free space left.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounded_heap::*;
    /// let mut heap = BoundedHeap::new(1, MaxFirst).unwrap();
    /// assert!(!heap.is_full());
    /// heap.insert(1);
    /// assert!(heap.is_full());
    /// ```
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.slots.len == self.slots.capacity()
    }
}

impl<T: Debug> Debug for Slots<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T, P> Debug for BoundedHeap<T, P>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedHeap")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("data", &self.as_slice())
            .finish()
    }
}

impl<T, P> Display for BoundedHeap<T, P>
where
    T: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, value) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            Display::fmt(value, f)?;
        }
        write!(f, "] ({}/{})", self.len(), self.capacity())
    }
}

impl<'a, T: 'a, P> IntoIterator for &'a BoundedHeap<T, P> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, P> IntoIterator for BoundedHeap<T, P> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { slots: self.slots }
    }
}

/// Ownership transferring iterator, yielding elements in storage order from the back.
#[derive(Debug)]
pub struct IntoIter<T> {
    slots: Slots<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.slots.len == 0 {
            return None;
        }
        self.slots.len -= 1;
        let index = self.slots.len;
        // # Safety
        // `index` was the last initialized slot. Shrinking `len` first hands
        // ownership over, so `Slots` only drops the remainder.
        Some(unsafe { self.slots.data[index].assume_init_read() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.slots.len, Some(self.slots.len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}
