use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

type Comparison<T> = Box<dyn Fn(&T, &T) -> Ordering>;

/// A vector kept sorted ascending by a comparison function.
///
/// The comparison may be coarser than `PartialEq` (say, "by score only"), so
/// lookups first find the run of comparison-equal items and then search that
/// run for a value-equal one.
pub struct OrderedCollection<T> {
    items: Vec<T>,
    comparison: Comparison<T>,
    allow_duplicate_values: bool,
}

impl<T> OrderedCollection<T>
where
    T: Ord + 'static,
{
    pub fn new() -> Self {
        Self::with_comparison(T::cmp)
    }
}

impl<T> Default for OrderedCollection<T>
where
    T: Ord + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OrderedCollection<T> {
    pub fn with_comparison<F>(comparison: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        OrderedCollection {
            items: Vec::new(),
            comparison: Box::new(comparison),
            allow_duplicate_values: true,
        }
    }

    pub fn allow_duplicate_values(&self) -> bool {
        self.allow_duplicate_values
    }

    /// Only affects later adds; values already present stay.
    pub fn set_allow_duplicate_values(&mut self, allow: bool) {
        self.allow_duplicate_values = allow;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn remove_at(&mut self, index: usize) -> T {
        self.items.remove(index)
    }

    /// Keeps the `len` smallest items.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// First index whose item is not less than `item`.
    fn lower_bound(&self, item: &T) -> usize {
        self.items
            .partition_point(|x| (self.comparison)(x, item) == Ordering::Less)
    }

    /// First index whose item is greater than `item`.
    fn upper_bound(&self, item: &T) -> usize {
        self.items
            .partition_point(|x| (self.comparison)(x, item) != Ordering::Greater)
    }
}

impl<T: PartialEq> OrderedCollection<T> {
    /// Inserts after any comparison-equal items and returns the index used.
    /// With duplicates disallowed, adding a value-equal item is a no-op that
    /// returns the existing item's index.
    pub fn add(&mut self, item: T) -> usize {
        if !self.allow_duplicate_values {
            if let Some(index) = self.index_of(&item) {
                return index;
            }
        }

        let index = match (self.items.first(), self.items.last()) {
            (None, _) | (_, None) => 0,
            (Some(first), _) if (self.comparison)(&item, first) == Ordering::Less => 0,
            (_, Some(last)) if (self.comparison)(&item, last) != Ordering::Less => {
                self.items.len()
            }
            _ => self.upper_bound(&item),
        };
        self.items.insert(index, item);
        index
    }

    pub fn index_of(&self, item: &T) -> Option<usize> {
        let start = self.lower_bound(item);
        self.items[start..]
            .iter()
            .take_while(|x| (self.comparison)(*x, item) == Ordering::Equal)
            .position(|x| x == item)
            .map(|offset| start + offset)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.index_of(item).is_some()
    }

    pub fn remove(&mut self, item: &T) -> bool {
        match self.index_of(item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }
}

impl<T: Clone> OrderedCollection<T> {
    /// Clones every item into `dest` starting at `start`.
    ///
    /// Panics when `dest` is too short, like slice copies do.
    pub fn copy_to(&self, dest: &mut [T], start: usize) {
        dest[start..start + self.items.len()].clone_from_slice(&self.items);
    }
}

impl<T> Index<usize> for OrderedCollection<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a OrderedCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> From<OrderedCollection<T>> for Vec<T> {
    fn from(collection: OrderedCollection<T>) -> Self {
        collection.items
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedCollection")
            .field("items", &self.items)
            .field("allow_duplicate_values", &self.allow_duplicate_values)
            .finish()
    }
}
