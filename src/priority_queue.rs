/// Array-backed binary min-heap of `(item, priority)` pairs. Equal priorities
/// come out in no particular order.
#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    heap: Vec<(T, f64)>,
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        PriorityQueue { heap: Vec::new() }
    }
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, item: T, priority: f64) {
        self.heap.push((item, priority));
        self.sift_up(self.heap.len() - 1);
    }

    pub fn dequeue(&mut self) -> Option<T> {
        self.dequeue_with_priority().map(|(item, _)| item)
    }

    pub fn dequeue_with_priority(&mut self) -> Option<(T, f64)> {
        if self.heap.is_empty() {
            return None;
        }
        let ret = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(ret)
    }

    pub fn peek(&self) -> Option<&T> {
        self.heap.first().map(|(item, _)| item)
    }

    pub fn peek_priority(&self) -> Option<f64> {
        self.heap.first().map(|(_, priority)| *priority)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.heap[index].1 >= self.heap[parent].1 {
                break;
            }
            self.heap.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.heap[right].1 < self.heap[left].1 {
                right
            } else {
                left
            };
            if self.heap[index].1 <= self.heap[child].1 {
                break;
            }
            self.heap.swap(index, child);
            index = child;
        }
    }
}

impl<T: PartialEq> PriorityQueue<T> {
    /// Linear scan by value; priorities are ignored.
    pub fn contains(&self, item: &T) -> bool {
        self.heap.iter().any(|(x, _)| x == item)
    }
}
