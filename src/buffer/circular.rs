use crate::graph::model::Direction;

/// Window of `num_visible` consecutive items (mod `len`) starting at `start`,
/// plus the two staged neighbours just outside it.
///
/// `Direction::Down` advances the list: the item in the topmost container
/// leaves through the top and the next item enters at the bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircularBuffer {
    len: usize,
    num_visible: usize,
    start: usize,
}

impl CircularBuffer {
    /// Scrolling-list mode applies only when there are more items than containers.
    pub fn applies(items: usize, containers: usize) -> bool {
        items > 0 && items > containers
    }

    /// `None` unless [`CircularBuffer::applies`] and there is at least one container.
    pub fn new(len: usize, num_visible: usize, start: usize) -> Option<Self> {
        if num_visible == 0 || !Self::applies(len, num_visible) {
            return None;
        }
        Some(Self {
            len,
            num_visible,
            start: start % len,
        })
    }

    /// Total number of items.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Never true for a constructed buffer.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of containers in the window.
    pub fn num_visible(&self) -> usize {
        self.num_visible
    }

    /// Item index shown in the topmost container.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Item index shown in container `slot` (0 = topmost).
    pub fn item_at(&self, slot: usize) -> usize {
        (self.start + slot) % self.len
    }

    /// Item indices shown, topmost first.
    pub fn visible(&self) -> Vec<usize> {
        (0..self.num_visible).map(|s| self.item_at(s)).collect()
    }

    /// Item staged in the top teleport slot: one before the topmost.
    pub fn top_staged(&self) -> usize {
        (self.start + self.len - 1) % self.len
    }

    /// Item staged in the bottom teleport slot: one after the bottommost.
    pub fn bottom_staged(&self) -> usize {
        (self.start + self.num_visible) % self.len
    }

    /// Shift the window one item; `Down` advances it.
    pub fn step(&mut self, dir: Direction) {
        self.start = match dir {
            Direction::Down => (self.start + 1) % self.len,
            Direction::Up => (self.start + self.len - 1) % self.len,
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/circular.rs"]
mod tests;
