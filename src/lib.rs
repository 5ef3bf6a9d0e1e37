#![no_std]

//! A shared-ownership handle that can never be null.
//!
//! [`SharedRef<T>`] wraps an [`Arc<T>`](alloc::sync::Arc) and narrows its
//! contract: every path that builds one from a nullable source
//! (`Option<Arc<T>>`, a raw pointer) checks it first, and every path that
//! mutates one (clone, assignment, swap) keeps it pointing at a live value.
//! Handing a null source to a constructor is a programmer error and panics.
//!
//! # Example
//! ```
//! use shared_ref::{make_shared, SharedRef};
//!
//! let answer = make_shared(42);
//! assert_eq!(*answer, 42);
//! assert!(answer.unique());
//!
//! let alias = answer.clone();
//! assert_eq!(alias.use_count(), 2);
//!
//! let maybe = Some(std::sync::Arc::new(7));
//! let seven = SharedRef::from_cell(&maybe);
//! assert_eq!(seven.use_count(), 2);
//! ```
//!
//! Objects that need to be wired up before anyone may look at them go
//! through [`PendingRef`], the one place where an empty handle is allowed to
//! exist, and the type keeps it from being read until it is published.

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod archive;
mod dispose;
mod error;
mod pending;
mod shared_ref;
mod slot;

pub use archive::{Archive, Persist};
pub use dispose::{BoxDisposer, Disposer, Disposing, NoopDisposer};
pub use error::NullError;
pub use pending::PendingRef;
pub use shared_ref::{make_shared, make_shared_with, SharedRef};
pub use slot::SharedSlot;
