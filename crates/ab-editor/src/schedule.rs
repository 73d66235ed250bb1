//! Work the host runs on a later turn of its event loop.
//!
//! `DeferredQueue` holds zero-delay follow-ups (run on the next turn);
//! `ResizeDebouncer` coalesces container resizes to one per paint frame.

use ab_core::viewport::Size;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Clear canvas focus after a dialog closed or a drag completed.
    BlurAll,
    /// Re-evaluate the add-animation button once focus has settled.
    RefreshAddAnimation,
}

#[derive(Debug, Clone, Default)]
pub struct DeferredQueue {
    tasks: VecDeque<DeferredTask>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a task. A task already pending is not queued twice.
    pub fn push(&mut self, task: DeferredTask) {
        if !self.tasks.contains(&task) {
            self.tasks.push_back(task);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Take every pending task in queue order.
    pub fn drain(&mut self) -> Vec<DeferredTask> {
        self.tasks.drain(..).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResizeDebouncer {
    pending: Option<Size>,
    coalesced: u32,
}

impl ResizeDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resize; replaces any resize still pending.
    pub fn request(&mut self, size: Size) {
        if self.pending.replace(size).is_some() {
            self.coalesced += 1;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Called on the next paint frame: the last requested size, once.
    pub fn take(&mut self) -> Option<Size> {
        let size = self.pending.take()?;
        if self.coalesced > 0 {
            log::trace!("coalesced {} resize requests", self.coalesced);
        }
        self.coalesced = 0;
        Some(size)
    }
}
