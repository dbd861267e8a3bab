//! Shared device state threaded through the report pipeline.
//!
//! One `DeviceState` exists per board; the pipeline entry points hold a
//! reference, never a copy. Fields shared between the ingestion context and
//! the cooperative loop are atomics, except the 64-bit activity timestamps
//! which sit behind a critical-section mutex (no 64-bit atomics on the
//! target).

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::config::MOUSE_QUEUE_DEPTH;
use crate::queue::ReportQueue;

/// Which of the two boards this firmware instance runs on. Fixed at init,
/// used to index per-output slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BoardRole {
    OutputA = 0,
    OutputB = 1,
}

impl BoardRole {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Process-wide mutable state of the report pipeline.
pub struct DeviceState {
    board_role: BoardRole,
    /// Last known button bitmask. Persists across reports because some
    /// report layouts omit the button field.
    mouse_buttons: AtomicU8,
    /// Reduced-speed pointer mode, toggled by the external hotkey logic.
    mouse_zoom: AtomicBool,
    /// Whether the local USB link to the host is established. Maintained
    /// by the USB stack's event handler.
    host_connected: AtomicBool,
    /// Which output currently owns the shared peripherals. Written by the
    /// external switching logic.
    active_output: AtomicU8,
    /// Per-output timestamp of the last locally delivered report (us).
    last_activity: Mutex<CriticalSectionRawMutex, Cell<[u64; 2]>>,
    /// Bounded queue of samples awaiting local USB delivery.
    pub mouse_queue: ReportQueue<MOUSE_QUEUE_DEPTH>,
}

impl DeviceState {
    pub const fn new(board_role: BoardRole) -> Self {
        Self {
            board_role,
            mouse_buttons: AtomicU8::new(0),
            mouse_zoom: AtomicBool::new(false),
            host_connected: AtomicBool::new(false),
            active_output: AtomicU8::new(BoardRole::OutputA as u8),
            last_activity: Mutex::new(Cell::new([0; 2])),
            mouse_queue: ReportQueue::new(),
        }
    }

    pub fn board_role(&self) -> BoardRole {
        self.board_role
    }

    pub fn mouse_buttons(&self) -> u8 {
        self.mouse_buttons.load(Ordering::Relaxed)
    }

    pub fn set_mouse_buttons(&self, buttons: u8) {
        self.mouse_buttons.store(buttons, Ordering::Relaxed);
    }

    pub fn mouse_zoom(&self) -> bool {
        self.mouse_zoom.load(Ordering::Relaxed)
    }

    pub fn set_mouse_zoom(&self, zoom: bool) {
        self.mouse_zoom.store(zoom, Ordering::Relaxed);
    }

    pub fn host_connected(&self) -> bool {
        self.host_connected.load(Ordering::Relaxed)
    }

    pub fn set_host_connected(&self, connected: bool) {
        self.host_connected.store(connected, Ordering::Relaxed);
    }

    /// True iff this board currently owns the shared peripherals.
    pub fn is_active_output(&self) -> bool {
        self.active_output.load(Ordering::Relaxed) == self.board_role as u8
    }

    pub fn set_active_output(&self, output: BoardRole) {
        self.active_output.store(output as u8, Ordering::Relaxed);
    }

    /// Stamp this board's last-activity slot.
    pub fn touch_activity(&self, role: BoardRole, now_us: u64) {
        self.last_activity.lock(|slots| {
            let mut v = slots.get();
            v[role.index()] = now_us;
            slots.set(v);
        });
    }

    pub fn last_activity(&self, role: BoardRole) -> u64 {
        self.last_activity.lock(|slots| slots.get()[role.index()])
    }
}
