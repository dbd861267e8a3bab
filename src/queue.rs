//! Bounded delivery queue for locally destined mouse samples.
//!
//! Producers run in the USB report-received (interrupt-adjacent) context
//! while the drain task runs from the cooperative loop, so the queue brings
//! its own mutual exclusion: a critical-section mutex around a fixed-size
//! `heapless` ring buffer. Every operation is non-blocking.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Deque;

use crate::error::Error;
use crate::hid::mouse::MouseSample;

/// Fixed-capacity FIFO of mouse samples with internal locking.
pub struct ReportQueue<const N: usize> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Deque<MouseSample, N>>>,
}

impl<const N: usize> ReportQueue<N> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Append a sample. Fails with `QueueFull` when the buffer is at
    /// capacity, leaving the existing contents untouched.
    pub fn try_push(&self, sample: MouseSample) -> Result<(), Error> {
        self.inner.lock(|q| {
            q.borrow_mut()
                .push_back(sample)
                .map_err(|_| Error::QueueFull)
        })
    }

    /// Copy of the head element without removing it.
    pub fn peek(&self) -> Option<MouseSample> {
        self.inner.lock(|q| q.borrow().front().copied())
    }

    /// Remove and return the head element.
    pub fn pop(&self) -> Option<MouseSample> {
        self.inner.lock(|q| q.borrow_mut().pop_front())
    }

    pub fn len(&self) -> usize {
        self.inner.lock(|q| q.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock(|q| q.borrow().is_empty())
    }
}

impl<const N: usize> Default for ReportQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
