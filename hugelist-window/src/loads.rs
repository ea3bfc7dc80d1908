use std::collections::HashMap;

use hugelist::IndexRange;

use crate::{LoadId, LoadPriority, LoadRequest};

/// Book-keeping for load requests that have been issued but not resolved.
///
/// Completion order is irrelevant: each request is tracked by id, and resolving one never
/// affects another. Results are not trusted either way; the next render pass re-reads
/// availability from the source.
#[derive(Debug, Default)]
pub(crate) struct InFlightLoads {
    next_id: u64,
    pending: HashMap<LoadId, LoadRequest>,
}

impl InFlightLoads {
    /// Issues a request for `range`, unless an in-flight request of at least the same
    /// priority already covers it.
    pub(crate) fn issue(&mut self, range: IndexRange, priority: LoadPriority) -> Option<LoadRequest> {
        let covered = self
            .pending
            .values()
            .any(|r| r.priority >= priority && r.range.covers(&range));
        if covered {
            vtrace!(start = range.start, end = range.end, "range already in flight");
            return None;
        }

        self.next_id = self.next_id.wrapping_add(1);
        let request = LoadRequest {
            id: LoadId(self.next_id),
            range,
            priority,
        };
        self.pending.insert(request.id, request);
        Some(request)
    }

    pub(crate) fn complete(&mut self, id: LoadId) -> Option<LoadRequest> {
        self.pending.remove(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }
}
