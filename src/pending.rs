use alloc::sync::Arc;
use core::fmt;

use crate::error::require_cell;
use crate::SharedRef;

/// A handle that is still under construction and may be empty.
///
/// This is the only place an empty shared handle is allowed to exist. It has
/// no way to read the value; the only way out is [`publish`](Self::publish),
/// which checks the handle is filled before any code can observe it.
///
/// ```
/// use shared_ref::PendingRef;
///
/// let mut pending = PendingRef::new();
/// assert!(pending.is_empty());
///
/// pending.fill_value(String::from("ready"));
/// let handle = pending.publish();
/// assert_eq!(*handle, "ready");
/// ```
pub struct PendingRef<T: ?Sized>(Option<Arc<T>>);

impl<T: ?Sized> PendingRef<T> {
    /// Creates an empty pending handle.
    pub const fn new() -> Self {
        Self(None)
    }

    /// Sets the value, dropping any value set before.
    pub fn fill(&mut self, cell: Arc<T>) -> &mut Self {
        self.0 = Some(cell);
        self
    }

    /// Returns true if a value has been set
    pub fn is_filled(&self) -> bool {
        self.0.is_some()
    }

    /// Returns true if no value has been set yet
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Finishes construction.
    ///
    /// # Panics
    ///
    /// Panics if the handle was never filled.
    #[track_caller]
    pub fn publish(self) -> SharedRef<T> {
        let cell = require_cell(self.0);
        log::debug!("publishing pending handle {:p}", Arc::as_ptr(&cell));
        SharedRef::from(cell)
    }

    /// Finishes construction, handing the pending handle back if still empty.
    pub fn try_publish(self) -> Result<SharedRef<T>, Self> {
        match self.0 {
            Some(cell) => Ok(SharedRef::from(cell)),
            None => Err(self),
        }
    }
}

impl<T> PendingRef<T> {
    /// Allocates `value` and sets it.
    pub fn fill_value(&mut self, value: T) -> &mut Self {
        self.fill(Arc::new(value))
    }
}

impl<T: ?Sized> Default for PendingRef<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for PendingRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRef")
            .field("filled", &self.is_filled())
            .finish()
    }
}
