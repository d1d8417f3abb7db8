/// 延迟更新调度器
///
/// One-shot latch for the deferred update.
///
/// Arming an armed latch does nothing, so any number of stack mutations within
/// a tick collapse into the single update that consumes it at the tick boundary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateScheduler {
    pending: bool,
}

impl UpdateScheduler {
    /// Arms the latch. Returns `false` when an update was already pending.
    pub fn schedule(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consumes the latch. Returns whether an update was pending.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }
}
