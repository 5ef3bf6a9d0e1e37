use core::cell::RefCell;
use core::fmt;

use critical_section::{CriticalSection, Mutex};

use crate::SharedRef;

/// A location holding a [`SharedRef`] that several threads may read and replace.
///
/// A `SharedRef` itself may be cloned from many threads at once, but one
/// handle instance must not be reassigned or swapped concurrently. The slot
/// serialises those operations with a critical section. It always holds a
/// valid handle; nothing can take it out without putting another in.
///
/// Old handles are dropped after the critical section ends, so a value's
/// destructor never runs with interrupts disabled.
pub struct SharedSlot<T: ?Sized>(Mutex<RefCell<SharedRef<T>>>);

impl<T: ?Sized> SharedSlot<T> {
    pub const fn new(handle: SharedRef<T>) -> Self {
        Self(Mutex::new(RefCell::new(handle)))
    }

    /// Returns a new owner of the current value.
    pub fn load(&self) -> SharedRef<T> {
        critical_section::with(|cs| self.load_in(cs))
    }

    /// Like [`load`](Self::load), inside a critical section the caller already holds.
    pub fn load_in(&self, cs: CriticalSection) -> SharedRef<T> {
        self.0.borrow(cs).borrow().clone()
    }

    /// Sets the current value.
    pub fn store(&self, handle: SharedRef<T>) {
        drop(self.replace(handle));
    }

    /// Sets the current value, returning the previous one.
    pub fn replace(&self, handle: SharedRef<T>) -> SharedRef<T> {
        critical_section::with(|cs| self.0.borrow(cs).replace(handle))
    }

    /// Exchanges the current value with `handle`.
    pub fn swap_with(&self, handle: &mut SharedRef<T>) {
        critical_section::with(|cs| self.0.borrow(cs).borrow_mut().swap(handle));
    }

    /// Runs `f` on the current value, outside the critical section.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let handle = self.load();
        f(&handle)
    }

    pub fn get_mut(&mut self) -> &mut SharedRef<T> {
        self.0.get_mut().get_mut()
    }

    pub fn into_inner(self) -> SharedRef<T> {
        self.0.into_inner().into_inner()
    }
}

impl<T: ?Sized> From<SharedRef<T>> for SharedSlot<T> {
    fn from(handle: SharedRef<T>) -> Self {
        Self::new(handle)
    }
}

impl<T: Default> Default for SharedSlot<T> {
    fn default() -> Self {
        Self::new(SharedRef::default())
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for SharedSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedSlot").field(&self.load()).finish()
    }
}
