//! Binary heap with a pluggable ordering rule
//!
//! Elements live at 1-based positions: the root is position 1 and the
//! children of position `k` are `2k` and `2k + 1`. The comparator answers
//! "should `a` come out before `b`?". For every non-root position `k` the
//! heap keeps `!before(k, parent(k))`, so `pop` always yields an element no
//! other element is preferred over.
//!
//! The comparator must be a strict weak ordering. This is not checked; a
//! comparator that violates it only produces an unspecified pop order.

use std::fmt;

/// Comparator used by [`PriorityQueue::new`]: larger elements first
fn greater<T: PartialOrd>(a: &T, b: &T) -> bool {
    a > b
}

/// Array-backed priority queue ordered by a caller-supplied comparator
///
/// # Example
/// ```
/// use netsim_core::PriorityQueue;
///
/// // Default ordering is a max-heap
/// let mut pq = PriorityQueue::new();
/// pq.push_array([2, 3, 4, 3, 2, 4]);
/// assert_eq!(pq.pop(), Some(4));
///
/// // A min-heap is just another comparator
/// let mut pq = PriorityQueue::with_comparator(|a: &i32, b: &i32| a < b);
/// pq.push_array([5, 1, 3]);
/// assert_eq!(pq.pop(), Some(1));
/// assert_eq!(pq.pop(), Some(3));
/// ```
#[derive(Clone)]
pub struct PriorityQueue<T, C = fn(&T, &T) -> bool> {
    /// Position `k` is stored at `heap[k - 1]`
    heap: Vec<T>,
    before: C,
}

impl<T: PartialOrd> PriorityQueue<T> {
    /// Max-heap using `>` as the ordering rule
    pub fn new() -> Self {
        Self::with_comparator(greater::<T> as fn(&T, &T) -> bool)
    }
}

impl<T: PartialOrd> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> PriorityQueue<T, C>
where
    C: Fn(&T, &T) -> bool,
{
    /// Empty queue where `before(a, b)` means `a` must be popped before `b`
    pub fn with_comparator(before: C) -> Self {
        Self {
            heap: Vec::new(),
            before,
        }
    }

    /// Number of queued elements
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Insert one element in O(log n)
    pub fn push(&mut self, value: T) {
        self.heap.push(value);
        self.upheap(self.heap.len());
    }

    /// Insert every element of `items`, one upheap per element
    ///
    /// The resulting layout is identical to calling [`push`](Self::push) for
    /// each element in iteration order.
    pub fn push_array<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.push(item);
        }
    }

    /// Remove and return the extremal element, `None` when empty
    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        // Last element moves to the root, then sinks
        let top = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.downheap(1);
        }
        Some(top)
    }

    /// Peek at the extremal element
    pub fn top(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Drop every element
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Swap the extremal element for `value` in a single downheap pass
    ///
    /// Returns the previous top. On an empty queue `value` is simply
    /// inserted and `None` is returned.
    pub fn replace_top(&mut self, value: T) -> Option<T> {
        if self.heap.is_empty() {
            self.heap.push(value);
            return None;
        }
        let old = std::mem::replace(&mut self.heap[0], value);
        self.downheap(1);
        Some(old)
    }

    /// Push `value` then pop, without growing the heap
    ///
    /// If nothing in the queue is preferred over `value`, `value` comes
    /// straight back and the queue is untouched.
    ///
    /// # Example
    /// ```
    /// use netsim_core::PriorityQueue;
    ///
    /// let mut pq = PriorityQueue::new();
    /// pq.push_array([3, 7]);
    /// assert_eq!(pq.push_pop(9), 9);
    /// assert_eq!(pq.push_pop(1), 7);
    /// assert_eq!(pq.len(), 2);
    /// ```
    pub fn push_pop(&mut self, value: T) -> T {
        let beaten = matches!(self.heap.first(), Some(top) if (self.before)(top, &value));
        if !beaten {
            return value;
        }
        let old = std::mem::replace(&mut self.heap[0], value);
        self.downheap(1);
        old
    }

    /// Replace the whole content with `items`
    pub fn replace_array<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.heap.clear();
        self.push_array(items);
    }

    /// Pop up to `n` elements, in pop order
    pub fn pop_array(&mut self, n: usize) -> Vec<T> {
        let mut out = Vec::with_capacity(n.min(self.heap.len()));
        for _ in 0..n {
            match self.pop() {
                Some(v) => out.push(v),
                None => break,
            }
        }
        out
    }

    /// Destructive iterator yielding elements in pop order
    pub fn drain(&mut self) -> Drain<'_, T, C> {
        Drain { queue: self }
    }

    /// Elements in heap layout (position order), not pop order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.heap.iter()
    }

    /// Backing storage in position order; `as_slice()[k - 1]` is position `k`
    pub fn as_slice(&self) -> &[T] {
        &self.heap
    }

    /// Verify the heap invariant over every non-root position
    pub fn is_heap(&self) -> bool {
        (2..=self.heap.len()).all(|k| !self.favors(k, k / 2))
    }

    /// Copy of the content in pop order
    pub fn to_sorted_vec(&self) -> Vec<T>
    where
        T: Clone,
        C: Clone,
    {
        let mut copy = Self {
            heap: self.heap.clone(),
            before: self.before.clone(),
        };
        copy.pop_array(copy.len())
    }

    /// Does the comparator prefer position `a` over position `b`?
    fn favors(&self, a: usize, b: usize) -> bool {
        (self.before)(&self.heap[a - 1], &self.heap[b - 1])
    }

    fn upheap(&mut self, mut k: usize) {
        while k > 1 {
            let parent = k / 2;
            if !self.favors(k, parent) {
                break;
            }
            self.heap.swap(k - 1, parent - 1);
            k = parent;
        }
    }

    fn downheap(&mut self, mut k: usize) {
        let n = self.heap.len();
        while 2 * k <= n {
            let mut child = 2 * k;
            if child < n && self.favors(child + 1, child) {
                child += 1;
            }
            if !self.favors(child, k) {
                break;
            }
            self.heap.swap(k - 1, child - 1);
            k = child;
        }
    }
}

impl<T, C> Extend<T> for PriorityQueue<T, C>
where
    C: Fn(&T, &T) -> bool,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.push_array(iter);
    }
}

impl<T: fmt::Debug, C> fmt::Debug for PriorityQueue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("heap", &self.heap)
            .finish_non_exhaustive()
    }
}

/// Iterator returned by [`PriorityQueue::drain`]
pub struct Drain<'a, T, C>
where
    C: Fn(&T, &T) -> bool,
{
    queue: &'a mut PriorityQueue<T, C>,
}

impl<T, C> Iterator for Drain<'_, T, C>
where
    C: Fn(&T, &T) -> bool,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.queue.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.queue.len();
        (n, Some(n))
    }
}
