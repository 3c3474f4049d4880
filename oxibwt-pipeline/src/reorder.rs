//! Bounded sliding-window reorder buffer.
//!
//! Producers insert items tagged with a monotonically increasing index in any
//! order; a single consumer takes them back strictly in index order. Only
//! indices in `[next_expected, next_expected + capacity)` are accepted, and
//! index `i` always lands in slot `i % capacity`, so at most `capacity` items
//! are ever held.

use std::error::Error;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// A rejected [`ReorderBuffer::put`]. The item is always handed back.
#[derive(PartialEq, Eq)]
pub enum PutError<T> {
    /// The buffer was closed before the item could be stored.
    Closed(T),
    /// The index was already consumed.
    Stale {
        /// Rejected index.
        index: u64,
        /// Rejected item.
        item: T,
    },
    /// An item with the same index is already pending.
    Duplicate {
        /// Rejected index.
        index: u64,
        /// Rejected item.
        item: T,
    },
}

impl<T> PutError<T> {
    /// Recover the rejected item.
    pub fn into_inner(self) -> T {
        match self {
            Self::Closed(item) | Self::Stale { item, .. } | Self::Duplicate { item, .. } => item,
        }
    }
}

impl<T> fmt::Debug for PutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed(_) => f.write_str("Closed(..)"),
            Self::Stale { index, .. } => f.debug_struct("Stale").field("index", index).finish(),
            Self::Duplicate { index, .. } => {
                f.debug_struct("Duplicate").field("index", index).finish()
            }
        }
    }
}

impl<T> fmt::Display for PutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed(_) => f.write_str("reorder buffer is closed"),
            Self::Stale { index, .. } => write!(f, "index {} was already consumed", index),
            Self::Duplicate { index, .. } => write!(f, "index {} is already pending", index),
        }
    }
}

impl<T> Error for PutError<T> {}

#[derive(Debug)]
struct ReorderState<T> {
    /// `None` when free, otherwise the pending index and its item.
    slots: Vec<Option<(u64, T)>>,
    next_expected: u64,
    closed: bool,
}

impl<T> ReorderState<T> {
    fn slot(&self, index: u64) -> usize {
        (index % self.slots.len() as u64) as usize
    }

    fn in_window(&self, index: u64) -> bool {
        index >= self.next_expected && index - self.next_expected < self.slots.len() as u64
    }
}

/// Thread-safe bounded buffer delivering items in strictly increasing index
/// order.
///
/// # Closing
///
/// [`close`](Self::close) wakes every waiter. A `put` that has not stored
/// its item by then returns [`PutError::Closed`] with the item, so nothing
/// is dropped silently. `get_next` keeps returning items that are already
/// stored contiguously from `next_expected`, then returns `None`.
#[derive(Debug)]
pub struct ReorderBuffer<T> {
    state: Mutex<ReorderState<T>>,
    /// Signalled when the item at `next_expected` arrives.
    ready: Condvar,
    /// Signalled when the window advances.
    space: Condvar,
}

impl<T> ReorderBuffer<T> {
    /// Create a buffer holding at most `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        Self {
            state: Mutex::new(ReorderState {
                slots: (0..capacity).map(|_| None).collect(),
                next_expected: 0,
                closed: false,
            }),
            ready: Condvar::new(),
            space: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ReorderState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Maximum number of pending items.
    pub fn capacity(&self) -> usize {
        self.lock().slots.len()
    }

    /// Index the consumer will return next.
    pub fn next_expected(&self) -> u64 {
        self.lock().next_expected
    }

    /// Number of items currently stored.
    pub fn pending(&self) -> usize {
        self.lock().slots.iter().filter(|s| s.is_some()).count()
    }

    /// Store `item` under `index`.
    ///
    /// Blocks while `index` lies beyond the window or its slot is taken.
    pub fn put(&self, index: u64, item: T) -> Result<(), PutError<T>> {
        let mut state = self.lock();
        loop {
            if state.closed {
                return Err(PutError::Closed(item));
            }
            if index < state.next_expected {
                return Err(PutError::Stale { index, item });
            }
            if state.in_window(index) {
                let slot = state.slot(index);
                match &state.slots[slot] {
                    None => break,
                    Some((pending, _)) if *pending == index => {
                        return Err(PutError::Duplicate { index, item });
                    }
                    Some(_) => {}
                }
            }
            state = self
                .space
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        let slot = state.slot(index);
        state.slots[slot] = Some((index, item));
        let wake_consumer = index == state.next_expected;
        drop(state);
        if wake_consumer {
            self.ready.notify_one();
        }
        Ok(())
    }

    /// Take the item at `next_expected`, blocking until it arrives.
    ///
    /// Returns `None` once the buffer is closed and that item is absent.
    pub fn get_next(&self) -> Option<T> {
        let mut state = self.lock();
        loop {
            let expected = state.next_expected;
            let slot = state.slot(expected);
            if matches!(state.slots[slot], Some((index, _)) if index == expected) {
                let (_, item) = state.slots[slot].take()?;
                state.next_expected += 1;
                drop(state);
                self.space.notify_all();
                return Some(item);
            }
            if state.closed {
                return None;
            }
            state = self
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Close the buffer and wake every waiter.
    pub fn close(&self) {
        self.lock().closed = true;
        self.ready.notify_all();
        self.space.notify_all();
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_in_order_passthrough() {
        let buffer = ReorderBuffer::new(4);
        for i in 0..4 {
            buffer.put(i, i * 10).unwrap();
        }
        for i in 0..4 {
            assert_eq!(buffer.get_next(), Some(i * 10));
        }
        assert_eq!(buffer.next_expected(), 4);
    }

    #[test]
    fn test_capacity_bounds_pending_items() {
        let buffer = ReorderBuffer::new(3);
        assert_eq!(buffer.capacity(), 3);
        for i in 0..3 {
            buffer.put(i, i).unwrap();
        }
        assert_eq!(buffer.pending(), buffer.capacity());
        assert_eq!(buffer.get_next(), Some(0));
        assert_eq!(buffer.capacity(), 3);
    }

    #[test]
    #[should_panic(expected = "Capacity must be greater than 0")]
    fn test_zero_capacity_panics() {
        let _ = ReorderBuffer::<u8>::new(0);
    }

    #[test]
    fn test_out_of_order_within_window() {
        let buffer = ReorderBuffer::new(3);
        buffer.put(2, 'c').unwrap();
        buffer.put(0, 'a').unwrap();
        buffer.put(1, 'b').unwrap();
        assert_eq!(buffer.pending(), 3);
        assert_eq!(buffer.get_next(), Some('a'));
        assert_eq!(buffer.get_next(), Some('b'));
        assert_eq!(buffer.get_next(), Some('c'));
        assert_eq!(buffer.pending(), 0);
    }

    #[test]
    fn test_put_beyond_window_blocks() {
        let buffer = Arc::new(ReorderBuffer::new(2));
        let producer = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || buffer.put(2, "late"))
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!producer.is_finished(), "index 2 is outside [0, 2)");

        buffer.put(0, "first").unwrap();
        thread::sleep(Duration::from_millis(50));
        assert!(!producer.is_finished(), "window has not advanced yet");

        assert_eq!(buffer.get_next(), Some("first"));
        producer.join().unwrap().unwrap();

        buffer.put(1, "second").unwrap();
        assert_eq!(buffer.get_next(), Some("second"));
        assert_eq!(buffer.get_next(), Some("late"));
    }

    #[test]
    fn test_get_next_waits_for_gap() {
        let buffer = Arc::new(ReorderBuffer::new(4));
        buffer.put(1, 1u64).unwrap();
        buffer.put(2, 2u64).unwrap();

        let consumer = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                (0..3).map(|_| buffer.get_next()).collect::<Vec<_>>()
            })
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!consumer.is_finished(), "index 0 is still missing");

        buffer.put(0, 0).unwrap();
        assert_eq!(consumer.join().unwrap(), vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_stale_and_duplicate_are_rejected() {
        let buffer = ReorderBuffer::new(4);
        buffer.put(0, "a").unwrap();
        buffer.put(1, "b").unwrap();
        assert!(matches!(
            buffer.put(1, "again"),
            Err(PutError::Duplicate { index: 1, .. })
        ));
        assert_eq!(buffer.get_next(), Some("a"));

        let err = buffer.put(0, "old").unwrap_err();
        assert!(matches!(err, PutError::Stale { index: 0, .. }));
        assert_eq!(err.into_inner(), "old");
    }

    #[test]
    fn test_close_drains_ready_items_then_stops() {
        let buffer = ReorderBuffer::new(4);
        buffer.put(0, 'a').unwrap();
        buffer.put(1, 'b').unwrap();
        buffer.put(3, 'd').unwrap();
        buffer.close();

        assert_eq!(buffer.get_next(), Some('a'));
        assert_eq!(buffer.get_next(), Some('b'));
        // Index 2 never arrived, so 3 is not released.
        assert_eq!(buffer.get_next(), None);
        assert!(matches!(buffer.put(2, 'c'), Err(PutError::Closed('c'))));
    }

    #[test]
    fn test_close_returns_blocked_put_item() {
        let buffer = Arc::new(ReorderBuffer::new(1));
        buffer.put(0, String::from("held")).unwrap();
        let producer = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || buffer.put(1, String::from("blocked")))
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!producer.is_finished());

        buffer.close();
        let err = producer.join().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "reorder buffer is closed");
        assert_eq!(err.into_inner(), "blocked");
    }

    #[test]
    fn test_close_wakes_waiting_consumer() {
        let buffer: Arc<ReorderBuffer<u8>> = Arc::new(ReorderBuffer::new(2));
        let consumer = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || buffer.get_next())
        };
        thread::sleep(Duration::from_millis(50));
        buffer.close();
        assert!(buffer.is_closed());
        assert_eq!(consumer.join().unwrap(), None);
    }

    #[test]
    fn test_concurrent_producers_deliver_in_order() {
        let buffer = Arc::new(ReorderBuffer::new(3));
        let producers: Vec<_> = (0..4u64)
            .map(|worker| {
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || {
                    // Worker w owns indices w, w + 4, w + 8, ...
                    for index in (worker..200).step_by(4) {
                        if index % 7 == 0 {
                            thread::sleep(Duration::from_millis(1));
                        }
                        buffer.put(index, index).unwrap();
                    }
                })
            })
            .collect();

        let received: Vec<u64> = (0..200).filter_map(|_| buffer.get_next()).collect();
        for producer in producers {
            producer.join().unwrap();
        }
        assert_eq!(received, (0..200).collect::<Vec<_>>());
    }
}
