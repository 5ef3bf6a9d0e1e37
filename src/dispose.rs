use alloc::boxed::Box;
use core::fmt;
use core::ops::Deref;
use core::ptr::NonNull;

/// Releases a value that a [`SharedRef`](crate::SharedRef) adopted from a raw pointer.
///
/// A disposer knows both how to tear the value down and where its memory
/// came from, so it covers what a deleter and an allocator would each do.
/// Any `Fn(NonNull<T>)` closure that is `Send + Sync` is a disposer.
pub trait Disposer<T: ?Sized>: Send + Sync + 'static {
    /// # Safety
    ///
    /// Called exactly once, with the pointer originally adopted, after the
    /// last owner is gone.
    unsafe fn dispose(&self, ptr: NonNull<T>);
}

impl<T, F> Disposer<T> for F
where
    T: ?Sized,
    F: Fn(NonNull<T>) + Send + Sync + 'static,
{
    unsafe fn dispose(&self, ptr: NonNull<T>) {
        self(ptr)
    }
}

/// Frees pointers produced by [`Box::into_raw`].
#[derive(Copy, Clone, Debug, Default)]
pub struct BoxDisposer;

impl<T: ?Sized> Disposer<T> for BoxDisposer {
    unsafe fn dispose(&self, ptr: NonNull<T>) {
        drop(Box::from_raw(ptr.as_ptr()));
    }
}

/// Releases nothing. For statics and memory owned elsewhere.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopDisposer;

impl<T: ?Sized> Disposer<T> for NoopDisposer {
    unsafe fn dispose(&self, _ptr: NonNull<T>) {}
}

/// An adopted raw pointer together with the strategy that releases it.
///
/// Created by [`SharedRef::adopt`](crate::SharedRef::adopt). It dereferences
/// to the pointee and runs its disposer when dropped, which happens when the
/// last handle to it goes away.
pub struct Disposing<T: ?Sized + 'static> {
    ptr: NonNull<T>,
    disposer: Box<dyn Disposer<T>>,
}

// Shares `&T` between threads exactly like `Arc<T>` would.
unsafe impl<T: ?Sized + Send + Sync + 'static> Send for Disposing<T> {}
unsafe impl<T: ?Sized + Send + Sync + 'static> Sync for Disposing<T> {}

impl<T: ?Sized + 'static> Disposing<T> {
    pub(crate) fn new<D: Disposer<T>>(ptr: NonNull<T>, disposer: D) -> Self {
        Self {
            ptr,
            disposer: Box::new(disposer),
        }
    }

    pub fn disposer(&self) -> &dyn Disposer<T> {
        &*self.disposer
    }
}

impl<T: ?Sized + 'static> Deref for Disposing<T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { self.ptr.as_ref() }
    }
}

impl<T: ?Sized + 'static> Drop for Disposing<T> {
    fn drop(&mut self) {
        log::trace!("disposing {:p}", self.ptr);
        unsafe { self.disposer.dispose(self.ptr) };
    }
}

impl<T: ?Sized + fmt::Debug + 'static> fmt::Debug for Disposing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Disposing").field(&&**self).finish()
    }
}
