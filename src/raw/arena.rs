use alloc::vec::Vec;
use core::num::NonZeroU32;

/// Non-owning reference to a node slot inside an [`Arena`].
///
/// Branch children and the leaf chain's `prev`/`next` links are all handles, so
/// the only owner of a node is the arena slot itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZeroU32);

impl Handle {
    pub(crate) const MAX_SLOT: usize = (u32::MAX - 1) as usize;

    #[inline]
    fn from_slot(slot: usize) -> Self {
        assert!(slot <= Self::MAX_SLOT, "`Handle::from_slot()` - `slot` > `Handle::MAX_SLOT`!");
        #[allow(clippy::cast_possible_truncation)]
        let raw = (slot + 1) as u32;
        Self(NonZeroU32::new(raw).expect("`Handle::from_slot()` - slot + 1 is never zero"))
    }

    #[inline]
    fn slot(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// Slot allocator that owns every node of a tree.
///
/// Freed slots are recycled through a free list; a handle is only valid until it
/// is passed to [`Arena::take`].
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of live nodes.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn alloc(&mut self, node: T) -> Handle {
        if let Some(handle) = self.free.pop() {
            self.slots[handle.slot()] = Some(node);
            return handle;
        }

        assert!(
            self.slots.len() <= Handle::MAX_SLOT,
            "`Arena::alloc()` - arena is at maximum capacity ({})",
            Handle::MAX_SLOT + 1
        );
        self.slots.push(Some(node));
        Handle::from_slot(self.slots.len() - 1)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.slot()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.slot()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Borrows two distinct nodes mutably at once, in argument order.
    pub(crate) fn pair_mut(&mut self, left: Handle, right: Handle) -> (&mut T, &mut T) {
        let (l, r) = (left.slot(), right.slot());
        assert_ne!(l, r, "`Arena::pair_mut()` - handles must be distinct!");

        let (first, second) = if l < r {
            let (head, tail) = self.slots.split_at_mut(r);
            (&mut head[l], &mut tail[0])
        } else {
            let (head, tail) = self.slots.split_at_mut(l);
            (&mut tail[0], &mut head[r])
        };

        (
            first.as_mut().expect("`Arena::pair_mut()` - `left` is invalid!"),
            second.as_mut().expect("`Arena::pair_mut()` - `right` is invalid!"),
        )
    }

    /// Removes a node, returning it and recycling its slot.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let node = self.slots[handle.slot()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        node
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
