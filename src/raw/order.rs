use crate::error::{Error, Result};

/// Order hint used when none is given.
pub const DEFAULT_ORDER: usize = 16;

/// Slots kept inline in each node before spilling to the heap; sized for the
/// default order plus the transient overflow slot used while splitting.
pub(crate) const INLINE_SLOTS: usize = 2 * (DEFAULT_ORDER >> 1) + 2;

/// Fill limits derived from the order hint.
///
/// `bracket_size` bounds both the values of a leaf and the children of a branch.
/// A non-root node whose count falls to `m_size` or below is rebalanced, and an
/// overflowing node splits into two halves of `m_size + 1`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Order {
    hint: usize,
    m_size: usize,
    bracket_size: usize,
}

impl Order {
    pub(crate) fn new(hint: usize) -> Result<Self> {
        let m_size = hint >> 1;
        if m_size == 0 {
            return Err(Error::InvalidOrder { hint });
        }

        Ok(Self {
            hint,
            m_size,
            bracket_size: 2 * m_size + 1,
        })
    }

    #[inline]
    pub(crate) const fn hint(self) -> usize {
        self.hint
    }

    #[inline]
    pub(crate) const fn m_size(self) -> usize {
        self.m_size
    }

    #[inline]
    pub(crate) const fn bracket_size(self) -> usize {
        self.bracket_size
    }

    /// True when a non-root node holding `count` entries must be rebalanced.
    #[inline]
    pub(crate) const fn underflows(self, count: usize) -> bool {
        count <= self.m_size
    }

    /// True when a sibling holding `count` entries can give some away.
    #[inline]
    pub(crate) const fn can_lend(self, count: usize) -> bool {
        count > self.m_size + 1
    }
}

impl Default for Order {
    fn default() -> Self {
        Self {
            hint: DEFAULT_ORDER,
            m_size: DEFAULT_ORDER >> 1,
            bracket_size: 2 * (DEFAULT_ORDER >> 1) + 1,
        }
    }
}
