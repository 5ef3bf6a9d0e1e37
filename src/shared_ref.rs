use alloc::boxed::Box;
use alloc::sync::{Arc, Weak};
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::convert::TryFrom;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::Deref;

use crate::dispose::{Disposer, Disposing};
use crate::error::{require_cell, require_ptr, NullError};

/// A reference-counted handle that always points at a live `T`.
///
/// `SharedRef` holds an [`Arc<T>`] and nothing else, so cloning, dropping and
/// sharing across threads behave exactly as they do for `Arc`. What it adds
/// is the guarantee that there is no empty state: every constructor taking a
/// nullable source checks it first and panics on null, and no method can
/// leave a handle empty afterwards.
///
/// The operations that are part of the handle's own contract (`get`,
/// `use_count`, `unique`, `swap`, `assign`) are methods. Operations mirrored
/// from `Arc` are associated functions, as they are on `Arc`, so they never
/// shadow methods of `T` reached through `Deref`.
///
/// The contract methods do shadow pointee methods with the same name. On a
/// `SharedRef<Cell<i32>>`, `h.get()` returns `&Cell<i32>`; write `(*h).get()`
/// to call `Cell::get`. The same goes for `swap` and `replace`.
pub struct SharedRef<T: ?Sized> {
    cell: Arc<T>,
}

impl<T> SharedRef<T> {
    /// Allocates `value` and returns the only handle to it.
    pub fn new(value: T) -> Self {
        Self {
            cell: Arc::new(value),
        }
    }

    /// Builds a value that holds a weak reference to itself.
    ///
    /// The weak reference cannot be upgraded until `data_fn` returns.
    pub fn new_cyclic<F>(data_fn: F) -> Self
    where
        F: FnOnce(&Weak<T>) -> T,
    {
        Self {
            cell: Arc::new_cyclic(data_fn),
        }
    }

    /// Returns the value if this is its only strong owner.
    pub fn try_unwrap(this: Self) -> Result<T, Self> {
        Arc::try_unwrap(this.cell).map_err(|cell| Self { cell })
    }
}

impl<T: ?Sized> SharedRef<T> {
    /// Takes ownership of a pointer produced by [`Box::into_raw`].
    ///
    /// # Panics
    ///
    /// Panics if `ptr` is null.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `Box::into_raw` and must not be used or freed by
    /// anything else afterwards.
    ///
    /// The value is moved into a fresh shared allocation and the box is
    /// freed, so [`as_ptr`](Self::as_ptr) on the result is not `ptr`. Use
    /// [`adopt`](SharedRef::adopt) to keep the value at its address.
    #[track_caller]
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        let ptr = require_ptr(ptr);
        log::trace!("taking ownership of boxed {:p}", ptr);
        Self {
            cell: Arc::from(Box::from_raw(ptr.as_ptr())),
        }
    }

    /// Reclaims a strong reference released by [`Arc::into_raw`] or
    /// [`SharedRef::into_arc_raw`].
    ///
    /// # Panics
    ///
    /// Panics if `ptr` is null.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `Arc::into_raw` for an `Arc<T>` and each such
    /// pointer may be reclaimed only once.
    #[track_caller]
    pub unsafe fn from_arc_raw(ptr: *const T) -> Self {
        let ptr = require_ptr(ptr as *mut T);
        Self {
            cell: Arc::from_raw(ptr.as_ptr() as *const T),
        }
    }

    /// Builds a handle from a borrowed cell, adding one owner.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is `None`.
    #[track_caller]
    pub fn from_cell(cell: &Option<Arc<T>>) -> Self {
        Self {
            cell: require_cell(cell.clone()),
        }
    }

    /// Moves the reference out of `cell`, leaving it `None`.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is already `None`.
    #[track_caller]
    pub fn take_cell(cell: &mut Option<Arc<T>>) -> Self {
        Self {
            cell: require_cell(cell.take()),
        }
    }

    /// # Panics
    ///
    /// Panics if `cell` is `None`.
    #[track_caller]
    pub fn from_option(cell: Option<Arc<T>>) -> Self {
        Self {
            cell: require_cell(cell),
        }
    }

    /// Points this handle at the value held by `cell`.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is `None`. The handle keeps its old value in that case.
    #[track_caller]
    pub fn assign(&mut self, cell: Option<Arc<T>>) -> &mut Self {
        self.cell = require_cell(cell);
        self
    }

    /// Like [`assign`](Self::assign), cloning the reference out of `cell`.
    #[track_caller]
    pub fn assign_from(&mut self, cell: &Option<Arc<T>>) -> &mut Self {
        self.cell = require_cell(cell.clone());
        self
    }

    /// Re-types the handle, usually through an unsized coercion.
    ///
    /// ```
    /// # use shared_ref::make_shared;
    /// # use std::{fmt::Debug, sync::Arc};
    /// let number = make_shared(5);
    /// let debug = number.clone().convert(|arc| arc as Arc<dyn Debug + Send + Sync>);
    /// assert_eq!(debug.use_count(), 2);
    /// ```
    pub fn convert<U, F>(self, f: F) -> SharedRef<U>
    where
        U: ?Sized,
        F: FnOnce(Arc<T>) -> Arc<U>,
    {
        SharedRef { cell: f(self.cell) }
    }

    /// Number of strong owners, this handle included. Never zero.
    pub fn use_count(&self) -> usize {
        Arc::strong_count(&self.cell)
    }

    /// Returns true if no other strong owner exists.
    pub fn unique(&self) -> bool {
        self.use_count() == 1
    }

    pub fn get(&self) -> &T {
        &self.cell
    }

    /// Address of the shared value.
    pub fn as_ptr(&self) -> *const T {
        Arc::as_ptr(&self.cell)
    }

    /// Exchanges the values two handles point at.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.cell, &mut other.cell);
    }

    /// Points this handle at `other`'s value and returns the previous handle.
    pub fn replace(&mut self, other: Self) -> Self {
        core::mem::replace(self, other)
    }

    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.cell, &other.cell)
    }

    pub fn weak_count(this: &Self) -> usize {
        Arc::weak_count(&this.cell)
    }

    pub fn downgrade(this: &Self) -> Weak<T> {
        Arc::downgrade(&this.cell)
    }

    /// Recovers a handle from a weak reference, or `None` if the value is gone.
    pub fn upgrade(weak: &Weak<T>) -> Option<Self> {
        weak.upgrade().map(|cell| Self { cell })
    }

    /// Mutable access, available only while this is the sole owner.
    pub fn get_mut(this: &mut Self) -> Option<&mut T> {
        Arc::get_mut(&mut this.cell)
    }

    pub fn as_arc(this: &Self) -> &Arc<T> {
        &this.cell
    }

    pub fn into_arc(this: Self) -> Arc<T> {
        this.cell
    }

    /// Releases the handle into a raw pointer without dropping the owner it
    /// represents. Reclaim it with [`SharedRef::from_arc_raw`].
    pub fn into_arc_raw(this: Self) -> *const T {
        Arc::into_raw(this.cell)
    }
}

impl<T: Clone> SharedRef<T> {
    /// Clone-on-write access: clones the value first if it is shared.
    pub fn make_mut(this: &mut Self) -> &mut T {
        Arc::make_mut(&mut this.cell)
    }
}

impl<T: ?Sized + 'static> SharedRef<Disposing<T>> {
    /// Takes ownership of `ptr`, releasing it through `disposer` once the
    /// last owner is gone.
    ///
    /// # Panics
    ///
    /// Panics if `ptr` is null. The disposer is dropped unused in that case.
    ///
    /// The handle is a `SharedRef<Disposing<T>>`, not a `SharedRef<T>`: it
    /// cannot be passed where a `SharedRef<T>` or `SharedRef<dyn Trait>` is
    /// expected, and reading the value takes a second dereference (`**h`).
    /// `Arc` has no hook for a custom release, so the disposer has to travel
    /// inside the shared value.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads for as long as any owner lives, must not
    /// be mutated elsewhere meanwhile, and `disposer` must be the right way to
    /// release it.
    #[track_caller]
    pub unsafe fn adopt<D: Disposer<T>>(ptr: *mut T, disposer: D) -> Self {
        let ptr = require_ptr(ptr);
        log::trace!("adopting {:p} with a custom disposer", ptr);
        Self::new(Disposing::new(ptr, disposer))
    }
}

/// Allocates `value` behind a fresh, unique handle.
pub fn make_shared<T>(value: T) -> SharedRef<T> {
    SharedRef::new(value)
}

/// Allocates the value returned by `init` behind a fresh, unique handle.
pub fn make_shared_with<T, F>(init: F) -> SharedRef<T>
where
    F: FnOnce() -> T,
{
    SharedRef::new(init())
}

impl<T: ?Sized> Clone for SharedRef<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: ?Sized> Deref for SharedRef<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.cell
    }
}

impl<T: ?Sized> AsRef<T> for SharedRef<T> {
    fn as_ref(&self) -> &T {
        &self.cell
    }
}

impl<T: ?Sized> Borrow<T> for SharedRef<T> {
    fn borrow(&self) -> &T {
        &self.cell
    }
}

impl<T: ?Sized> From<Arc<T>> for SharedRef<T> {
    fn from(cell: Arc<T>) -> Self {
        Self { cell }
    }
}

impl<T: ?Sized> From<&Arc<T>> for SharedRef<T> {
    fn from(cell: &Arc<T>) -> Self {
        Self {
            cell: Arc::clone(cell),
        }
    }
}

impl<T: ?Sized> TryFrom<Option<Arc<T>>> for SharedRef<T> {
    type Error = NullError;

    fn try_from(cell: Option<Arc<T>>) -> Result<Self, NullError> {
        cell.map(|cell| Self { cell }).ok_or(NullError)
    }
}

impl<T: ?Sized> From<SharedRef<T>> for Arc<T> {
    fn from(handle: SharedRef<T>) -> Self {
        handle.cell
    }
}

impl<T: ?Sized> From<SharedRef<T>> for Option<Arc<T>> {
    fn from(handle: SharedRef<T>) -> Self {
        Some(handle.cell)
    }
}

impl<T: Default> Default for SharedRef<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for SharedRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T: ?Sized + fmt::Display> fmt::Display for SharedRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&**self, f)
    }
}

impl<T: ?Sized> fmt::Pointer for SharedRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.as_ptr(), f)
    }
}

impl<T: ?Sized + PartialEq> PartialEq for SharedRef<T> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: ?Sized + Eq> Eq for SharedRef<T> {}

impl<T: ?Sized + PartialOrd> PartialOrd for SharedRef<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (**self).partial_cmp(&**other)
    }
}

impl<T: ?Sized + Ord> Ord for SharedRef<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (**self).cmp(&**other)
    }
}

impl<T: ?Sized + Hash> Hash for SharedRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state)
    }
}
