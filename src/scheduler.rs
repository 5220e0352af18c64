//! Frame scheduling.
//!
//! The render loop never talks to a host timing primitive directly. It asks a
//! [`FrameScheduler`] for "the next frame" and keeps the returned handle so it
//! can cancel on unmount. Browsers back this with `requestAnimationFrame`;
//! tests and headless export use [`ManualScheduler`] to step exact frame
//! counts.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// Callback run once when the requested frame arrives.
pub type FrameCallback = Box<dyn FnOnce()>;

/// Opaque id of a requested frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Source of animation frames.
///
/// Implementations must not run the callback synchronously inside
/// `request_frame`; the render loop requests its next frame from within the
/// current one.
pub trait FrameScheduler {
    /// Run `callback` on the next frame.
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Drop a requested frame. Cancelling a frame that already ran is a no-op.
    fn cancel(&self, handle: FrameHandle);
}

/// Scheduler that only advances when told to.
///
/// Each [`run_frame`](Self::run_frame) call runs the callbacks that were
/// pending when it started; callbacks requested while it runs wait for the
/// next call, like a browser's animation frame queue.
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<VecDeque<(FrameHandle, FrameCallback)>>,
    /// Handles of the batch currently running, so a callback can cancel a
    /// sibling that has been dequeued but not yet run.
    running: RefCell<Vec<FrameHandle>>,
    next_id: Cell<u64>,
    frames: Cell<u64>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requested frames waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Number of frame ticks delivered so far.
    pub fn frames(&self) -> u64 {
        self.frames.get()
    }

    /// Deliver one frame tick. Returns how many callbacks ran.
    pub fn run_frame(&self) -> usize {
        let batch: Vec<_> = self.queue.borrow_mut().drain(..).collect();
        *self.running.borrow_mut() = batch.iter().map(|(handle, _)| *handle).collect();
        self.frames.set(self.frames.get() + 1);

        let mut ran = 0;
        for (handle, callback) in batch {
            let still_live = {
                let mut running = self.running.borrow_mut();
                match running.iter().position(|h| *h == handle) {
                    Some(idx) => {
                        running.swap_remove(idx);
                        true
                    }
                    None => false,
                }
            };
            if still_live {
                callback();
                ran += 1;
            }
        }
        self.running.borrow_mut().clear();
        ran
    }

    /// Deliver `count` frame ticks. Returns the total callbacks run.
    pub fn run_frames(&self, count: usize) -> usize {
        (0..count).map(|_| self.run_frame()).sum()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let handle = FrameHandle::new(id);
        self.queue.borrow_mut().push_back((handle, callback));
        handle
    }

    fn cancel(&self, handle: FrameHandle) {
        self.queue.borrow_mut().retain(|(h, _)| *h != handle);
        self.running.borrow_mut().retain(|h| *h != handle);
    }
}
