/// Array-backed binary min-heap.
///
/// The smallest element (by `Ord`) is always at index 0. Children of index
/// `i` live at `2i + 1` and `2i + 2`.
#[derive(Clone, Debug)]
pub struct MinHeap<T> {
    items: Vec<T>,
}

impl<T: Ord> MinHeap<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The smallest element, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Insert an element in `O(log n)`.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Remove and return the smallest element in `O(log n)`.
    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let min = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Some(min)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.items[i] >= self.items[parent] {
                break;
            }
            self.items.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * i + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let smaller = if right < len && self.items[right] < self.items[left] {
                right
            } else {
                left
            };
            if self.items[i] <= self.items[smaller] {
                break;
            }
            self.items.swap(i, smaller);
            i = smaller;
        }
    }
}

impl<T: Ord> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for MinHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Self::new();
        for item in iter {
            heap.push(item);
        }
        heap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn drain<T: Ord>(mut heap: MinHeap<T>) -> Vec<T> {
        let mut out = Vec::with_capacity(heap.len());
        while let Some(item) = heap.pop() {
            out.push(item);
        }
        out
    }

    #[test]
    fn empty_heap() {
        let mut heap: MinHeap<u32> = MinHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.peek(), None);
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn pops_in_ascending_order() {
        let heap: MinHeap<u32> = [5, 1, 4, 1, 3, 9, 2].into_iter().collect();
        assert_eq!(heap.len(), 7);
        assert_eq!(heap.peek(), Some(&1));
        assert_eq!(drain(heap), vec![1, 1, 2, 3, 4, 5, 9]);
    }

    #[test]
    fn interleaved_push_and_pop() {
        let mut heap = MinHeap::with_capacity(4);
        heap.push(10);
        heap.push(3);
        assert_eq!(heap.pop(), Some(3));
        heap.push(7);
        heap.push(1);
        assert_eq!(heap.pop(), Some(1));
        assert_eq!(heap.pop(), Some(7));
        assert_eq!(heap.pop(), Some(10));
        assert!(heap.is_empty());
    }

    #[test]
    fn ties_resolve_by_full_ordering() {
        let heap: MinHeap<(u32, usize)> = [(2, 1), (2, 0), (1, 5)].into_iter().collect();
        assert_eq!(drain(heap), vec![(1, 5), (2, 0), (2, 1)]);
    }

    proptest! {
        #[test]
        fn heap_sort_matches_std_sort(mut values in prop::collection::vec(any::<i32>(), 0..200)) {
            let heap: MinHeap<i32> = values.iter().copied().collect();
            let sorted = drain(heap);
            values.sort();
            prop_assert_eq!(sorted, values);
        }
    }
}
