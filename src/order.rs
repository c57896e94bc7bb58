//! Priority predicates used to order a [`BoundedHeap`](crate::BoundedHeap).

/// Decides which of two elements should leave the heap first.
///
/// `outranks` should return true if its first argument is strictly higher priority than the second.
/// It is technically permitted to return true when given elements of equal priority,
/// although it is recommended to return false in those cases to avoid swaps for performance reasons.
///
/// If a predicate judges that a particular element is higher priority than another one,
/// it is expected that that remains true for as long as those elements are in the heap.
/// The heap never checks this; an inconsistent predicate only scrambles the output order.
pub trait Priority<T: ?Sized> {
    /// Returns true if `a` must be popped before `b`.
    fn outranks(&self, a: &T, b: &T) -> bool;
}

impl<T: ?Sized, F> Priority<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline(always)]
    fn outranks(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Largest element first.
///
/// ```
/// # use bounded_heap::*;
/// let mut heap = BoundedHeap::new(4, MaxFirst).unwrap();
/// heap.insert(2);
/// heap.insert(7);
/// assert_eq!(Some(&7), heap.peek());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaxFirst;

impl<T: Ord> Priority<T> for MaxFirst {
    #[inline(always)]
    fn outranks(&self, a: &T, b: &T) -> bool {
        a > b
    }
}

/// Smallest element first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinFirst;

impl<T: Ord> Priority<T> for MinFirst {
    #[inline(always)]
    fn outranks(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// A comparer that consults a piece of state owned alongside it.
///
/// Use `state` to hold another datastructure in order to sort keys by associated values.
///
/// ```
/// # use bounded_heap::*;
/// let scores = [1, 3, 1, 2];
/// let by_score = Stateful::new(|a: &usize, b: &usize, s: &[i32; 4]| s[*a] > s[*b], scores);
/// let mut heap = BoundedHeap::new(4, by_score).unwrap();
/// heap.insert(0);
/// heap.insert(1);
/// heap.insert(3);
/// assert_eq!(Some(1), heap.pop());
/// assert_eq!(Some(3), heap.pop());
/// ```
#[derive(Debug, Clone)]
pub struct Stateful<F, S> {
    comparer: F,
    state: S,
}

impl<F, S> Stateful<F, S> {
    /// Bundles `comparer` with the `state` it is called with.
    pub fn new(comparer: F, state: S) -> Self {
        Self { comparer, state }
    }

    /// The state handed to every comparison.
    pub fn state(&self) -> &S {
        &self.state
    }
}

impl<T: ?Sized, F, S> Priority<T> for Stateful<F, S>
where
    F: Fn(&T, &T, &S) -> bool,
{
    #[inline(always)]
    fn outranks(&self, a: &T, b: &T) -> bool {
        (self.comparer)(a, b, &self.state)
    }
}
