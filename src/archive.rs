use crate::SharedRef;

/// A sink that values write themselves into.
pub trait Archive {
    type Error;
}

/// Writes a value into an archive of type `A` at a given format version.
///
/// A [`SharedRef<T>`] persists as exactly the persisted form of its `T`,
/// with the version passed through unchanged. Reading a handle back is up to
/// the archive, which must hand out a live handle (e.g. via
/// [`make_shared`](crate::make_shared)).
pub trait Persist<A: Archive + ?Sized> {
    fn persist(&self, archive: &mut A, version: u32) -> Result<(), A::Error>;
}

impl<A, T> Persist<A> for SharedRef<T>
where
    A: Archive + ?Sized,
    T: Persist<A> + ?Sized,
{
    #[inline]
    fn persist(&self, archive: &mut A, version: u32) -> Result<(), A::Error> {
        self.get().persist(archive, version)
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::SharedRef;

    impl<T: Serialize + ?Sized> Serialize for SharedRef<T> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            (**self).serialize(serializer)
        }
    }

    impl<'de, T: Deserialize<'de>> Deserialize<'de> for SharedRef<T> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            T::deserialize(deserializer).map(SharedRef::new)
        }
    }
}
