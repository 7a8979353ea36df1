//! Flat bit arena recording include decisions.

/// One bit per `(item, weight, count)` state.
///
/// A set bit means including the item strictly improved the best value of
/// that state. Values themselves live in two rolling layers owned by the
/// engine; only the decisions are kept for every item.
#[derive(Debug, Clone)]
pub struct DecisionTable {
    items: usize,
    width: usize,
    depth: usize,
    bits: Vec<u64>,
}

impl DecisionTable {
    /// Allocate a cleared table for `items` candidates, weights `0..=width`
    /// and counts `0..=depth`.
    pub fn new(items: usize, width: usize, depth: usize) -> Self {
        let cells = items * (width + 1) * (depth + 1);
        Self {
            items,
            width,
            depth,
            bits: vec![0; cells.div_ceil(64)],
        }
    }

    /// Number of candidate layers.
    pub fn items(&self) -> usize {
        self.items
    }

    /// Largest weight index.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Largest count index.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Total number of cells.
    pub fn cells(&self) -> usize {
        self.items * self.layer_len()
    }

    /// Cells in one item layer.
    pub fn layer_len(&self) -> usize {
        (self.width + 1) * (self.depth + 1)
    }

    /// Record that `item` is included at `(weight, count)`.
    pub fn mark(&mut self, item: usize, weight: usize, count: usize) {
        let offset = self.offset(item, weight, count);
        self.bits[offset / 64] |= 1 << (offset % 64);
    }

    /// Whether `item` is included at `(weight, count)`.
    pub fn is_marked(&self, item: usize, weight: usize, count: usize) -> bool {
        let offset = self.offset(item, weight, count);
        self.bits[offset / 64] & (1 << (offset % 64)) != 0
    }

    fn offset(&self, item: usize, weight: usize, count: usize) -> usize {
        debug_assert!(item < self.items && weight <= self.width && count <= self.depth);
        item * self.layer_len() + weight * (self.depth + 1) + count
    }
}
