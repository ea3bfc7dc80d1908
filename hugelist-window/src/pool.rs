use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use hugelist::IndexRange;

use crate::ElementLayout;

#[derive(Debug)]
pub(crate) struct Slot<E> {
    pub(crate) element: E,
    pub(crate) layout: Option<ElementLayout>,
}

/// Rendered elements keyed by item index, kept sorted for positioning.
///
/// The pool owns every element it holds until the element is recycled or the pool is
/// drained on teardown.
#[derive(Debug)]
pub(crate) struct RenderedPool<E> {
    slots: BTreeMap<usize, Slot<E>>,
}

impl<E> RenderedPool<E> {
    pub(crate) fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn contains(&self, index: usize) -> bool {
        self.slots.contains_key(&index)
    }

    pub(crate) fn insert(&mut self, index: usize, element: E) {
        let prev = self.slots.insert(
            index,
            Slot {
                element,
                layout: None,
            },
        );
        debug_assert!(prev.is_none(), "RenderedPool: index {index} rendered twice");
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Slot<E>> {
        self.slots.get(&index)
    }

    pub(crate) fn first_index(&self) -> Option<usize> {
        self.slots.keys().next().copied()
    }

    pub(crate) fn indices(&self) -> Vec<usize> {
        self.slots.keys().copied().collect()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut Slot<E>)> {
        self.slots.iter_mut().map(|(&i, slot)| (i, slot))
    }

    /// Removes every element outside `window` and hands it to `recycle`.
    pub(crate) fn retain_window(
        &mut self,
        window: Option<IndexRange>,
        mut recycle: impl FnMut(usize, E),
    ) -> usize {
        let stale: Vec<usize> = self
            .slots
            .keys()
            .copied()
            .filter(|&i| !window.is_some_and(|w| w.contains(i)))
            .collect();
        for &index in &stale {
            if let Some(slot) = self.slots.remove(&index) {
                recycle(index, slot.element);
            }
        }
        stale.len()
    }

    pub(crate) fn drain(&mut self, mut recycle: impl FnMut(usize, E)) -> usize {
        let slots = core::mem::take(&mut self.slots);
        let n = slots.len();
        for (index, slot) in slots {
            recycle(index, slot.element);
        }
        n
    }
}
