//! Binary heap ordered by a caller-supplied `precedes(a, b)` predicate.
//!
//! Unlike `std::collections::BinaryHeap` this does not require `Ord`: the Coffman-Graham
//! readiness comparator is not a total order (a prefix compares as preceding the longer list),
//! so the heap only ever asks "should `a` be served before `b`".

#[derive(Debug, Clone)]
pub struct PriorityQueue<T, F> {
    items: Vec<T>,
    precedes: F,
}

impl<T, F> PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    pub fn new(precedes: F) -> Self {
        Self {
            items: Vec::new(),
            precedes,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        let mut i = self.items.len() - 1;
        while i > 0 {
            let parent = (i - 1) >> 1;
            if !(self.precedes)(&self.items[i], &self.items[parent]) {
                break;
            }
            self.items.swap(i, parent);
            i = parent;
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let top = self.items.swap_remove(0);
        self.sift_down(0);
        Some(top)
    }

    fn sift_down(&mut self, mut i: usize) {
        let size = self.items.len();
        let half = size >> 1;
        while i < half {
            let mut best = (i << 1) + 1;
            let right = best + 1;
            if right < size && (self.precedes)(&self.items[right], &self.items[best]) {
                best = right;
            }
            if !(self.precedes)(&self.items[best], &self.items[i]) {
                break;
            }
            self.items.swap(i, best);
            i = best;
        }
    }
}

impl<T, F> Extend<T> for PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}
