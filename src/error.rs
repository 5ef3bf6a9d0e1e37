use alloc::sync::Arc;
use core::fmt;
use core::ptr::NonNull;

/// A null pointer or empty `Option<Arc<T>>` was offered where a live value is required.
///
/// Only the fallible conversions return this. The constructors and
/// assignments treat a null source as a caller bug and panic with the same
/// message instead.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NullError;

impl fmt::Display for NullError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("pointer cannot be null")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NullError {}

#[cold]
#[inline(never)]
#[track_caller]
fn violated(what: &str) -> ! {
    log::error!("precondition violated: {} is null", what);
    panic!("{}: {}", what, NullError)
}

/// Checks a raw owning pointer, panicking if it is null.
#[track_caller]
pub(crate) fn require_ptr<T: ?Sized>(ptr: *mut T) -> NonNull<T> {
    match NonNull::new(ptr) {
        Some(ptr) => ptr,
        None => violated("raw pointer"),
    }
}

/// Unwraps a nullable shared cell, panicking if it is empty.
#[track_caller]
pub(crate) fn require_cell<T: ?Sized>(cell: Option<Arc<T>>) -> Arc<T> {
    match cell {
        Some(arc) => arc,
        None => violated("shared cell"),
    }
}
