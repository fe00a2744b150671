//! Queue bookkeeping for an engine.
//!
//! Pure index arithmetic over the queue of locators; the audio thread never
//! sees it. Navigation never wraps around.

use crate::library::Locator;

#[derive(Debug, Clone, Default)]
pub struct QueueCursor {
    queue: Vec<Locator>,
    index: Option<usize>,
}

impl QueueCursor {
    /// Replace the queue. The cursor lands on the first item, if any.
    pub fn set_queue(&mut self, queue: Vec<Locator>) {
        self.index = if queue.is_empty() { None } else { Some(0) };
        self.queue = queue;
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn current(&self) -> Option<&Locator> {
        self.index.and_then(|i| self.queue.get(i))
    }

    pub fn get(&self, index: usize) -> Option<&Locator> {
        self.queue.get(index)
    }

    pub fn has_next(&self) -> bool {
        matches!(self.index, Some(i) if i + 1 < self.queue.len())
    }

    pub fn has_previous(&self) -> bool {
        matches!(self.index, Some(i) if i > 0)
    }

    /// Move to `index` if it is inside the queue.
    pub fn jump(&mut self, index: usize) -> Option<usize> {
        if index < self.queue.len() {
            self.index = Some(index);
            Some(index)
        } else {
            None
        }
    }

    /// Step forward; `None` at the end of the queue.
    pub fn advance(&mut self) -> Option<usize> {
        if !self.has_next() {
            return None;
        }
        let next = self.index.map_or(0, |i| i + 1);
        self.jump(next)
    }

    /// Step back; `None` at the start of the queue.
    pub fn retreat(&mut self) -> Option<usize> {
        if !self.has_previous() {
            return None;
        }
        let prev = self.index.map_or(0, |i| i - 1);
        self.jump(prev)
    }
}
