use alloc::collections::BTreeSet;

/// Indices whose elements still need a measurement.
///
/// Newly created elements are queued here during a render pass and measured on the next
/// paint-safe callback, once the host has laid them out. Measurements are idempotent, so
/// entries for elements recycled in the meantime are simply skipped.
#[derive(Debug, Default)]
pub(crate) struct MeasureQueue {
    pending: BTreeSet<usize>,
}

impl MeasureQueue {
    pub(crate) fn schedule(&mut self, index: usize) {
        self.pending.insert(index);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub(crate) fn take(&mut self) -> BTreeSet<usize> {
        core::mem::take(&mut self.pending)
    }

    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }
}
