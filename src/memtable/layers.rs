//! Lock ordering for the active and frozen layers
//!
//! Two independent RwLocks, one per layer. Whenever both are held the active
//! lock is taken first. Combined guards can only be built through the active
//! side, and a frozen-only guard has no way to reach the active lock.

use std::ops::{Deref, DerefMut};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The two layer locks, handed out in active → frozen order only
pub(crate) struct Layers<A, F> {
    active: RwLock<A>,
    frozen: RwLock<F>,
}

impl<A, F> Layers<A, F> {
    pub(crate) fn new(active: A, frozen: F) -> Self {
        Self {
            active: RwLock::new(active),
            frozen: RwLock::new(frozen),
        }
    }

    /// Shared access to the active layer; may later extend to the frozen one
    pub(crate) fn read_active(&self) -> ActiveRead<'_, A, F> {
        ActiveRead {
            active: self.active.read(),
            frozen: &self.frozen,
        }
    }

    /// Exclusive access to the active layer alone
    pub(crate) fn write_active(&self) -> RwLockWriteGuard<'_, A> {
        self.active.write()
    }

    /// Shared access to the frozen layer alone
    pub(crate) fn read_frozen(&self) -> RwLockReadGuard<'_, F> {
        self.frozen.read()
    }

    /// Exclusive access to the frozen layer alone
    pub(crate) fn write_frozen(&self) -> RwLockWriteGuard<'_, F> {
        self.frozen.write()
    }

    /// Shared access to both layers
    pub(crate) fn read_both(&self) -> BothRead<'_, A, F> {
        self.read_active().with_frozen()
    }

    /// Exclusive access to both layers
    pub(crate) fn write_both(&self) -> BothWrite<'_, A, F> {
        let active = self.active.write();
        let frozen = self.frozen.write();
        BothWrite { active, frozen }
    }
}

/// Shared active guard that remembers where the frozen lock is
pub(crate) struct ActiveRead<'a, A, F> {
    active: RwLockReadGuard<'a, A>,
    frozen: &'a RwLock<F>,
}

impl<'a, A, F> ActiveRead<'a, A, F> {
    /// Take the frozen lock (shared) while still holding the active one
    pub(crate) fn with_frozen(self) -> BothRead<'a, A, F> {
        let frozen = self.frozen.read();
        BothRead {
            active: self.active,
            frozen,
        }
    }
}

impl<A, F> Deref for ActiveRead<'_, A, F> {
    type Target = A;

    fn deref(&self) -> &A {
        &self.active
    }
}

pub(crate) struct BothRead<'a, A, F> {
    pub(crate) active: RwLockReadGuard<'a, A>,
    pub(crate) frozen: RwLockReadGuard<'a, F>,
}

pub(crate) struct BothWrite<'a, A, F> {
    pub(crate) active: RwLockWriteGuard<'a, A>,
    pub(crate) frozen: RwLockWriteGuard<'a, F>,
}

impl<A, F> BothWrite<'_, A, F> {
    /// Split borrow of both layers for moves between them
    pub(crate) fn split(&mut self) -> (&mut A, &mut F) {
        (self.active.deref_mut(), self.frozen.deref_mut())
    }
}
