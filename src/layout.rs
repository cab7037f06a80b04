//! Storage kinds a union can be declared over, and the per-alternative layout choice.

use std::mem::{self, MaybeUninit};
use std::sync::Arc;

use crate::error::LayoutError;
use crate::shape::{Alternative, Value};

/// The boxed slot of an [`Unbounded`] union.
pub type Slot = Option<Arc<dyn Value>>;

/// Fixed storage of `N` raw bytes. Alternatives are stored inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Inline<const N: usize>;

/// A single boxed slot. Every alternative is boxed, whatever its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Unbounded;

/// The kind of storage behind a [`Buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    Fixed(usize),
    Unbounded,
}

/// The storage a union is declared over.
///
/// A type can be an alternative of a union over `B` when it implements [`Alternative<B>`].
///
/// # Safety
///
/// When `KIND` is `BufferKind::Fixed(n)`, `Storage` must be exactly `n` bytes that may hold any bit pattern,
/// and `slot` / `slot_mut` must return `None`.
/// When `KIND` is `BufferKind::Unbounded`, `slot` / `slot_mut` must return `Some`.
pub unsafe trait Buffer: Send + Sync + 'static {
    type Storage: Clone + Send + Sync + 'static;

    const KIND: BufferKind;

    /// Storage whose contents are left unspecified.
    fn uninit() -> Self::Storage;

    /// Storage of the zero value.
    fn zeroed() -> Self::Storage;

    fn slot(storage: &Self::Storage) -> Option<&Slot>;

    fn slot_mut(storage: &mut Self::Storage) -> Option<&mut Slot>;
}

unsafe impl<const N: usize> Buffer for Inline<N> {
    type Storage = [MaybeUninit<u8>; N];

    const KIND: BufferKind = BufferKind::Fixed(N);

    #[inline]
    fn uninit() -> Self::Storage {
        [MaybeUninit::uninit(); N]
    }

    #[inline]
    fn zeroed() -> Self::Storage {
        [MaybeUninit::new(0); N]
    }

    #[inline]
    fn slot(_: &Self::Storage) -> Option<&Slot> {
        None
    }

    #[inline]
    fn slot_mut(_: &mut Self::Storage) -> Option<&mut Slot> {
        None
    }
}

unsafe impl Buffer for Unbounded {
    type Storage = Slot;

    const KIND: BufferKind = BufferKind::Unbounded;

    #[inline]
    fn uninit() -> Self::Storage {
        None
    }

    #[inline]
    fn zeroed() -> Self::Storage {
        None
    }

    #[inline]
    fn slot(storage: &Self::Storage) -> Option<&Slot> {
        Some(storage)
    }

    #[inline]
    fn slot_mut(storage: &mut Self::Storage) -> Option<&mut Slot> {
        Some(storage)
    }
}

/// Where one alternative lives inside a union value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layout {
    /// The alternative is kept in the boxed slot.
    pub boxed: bool,
    /// Byte offset of the storage within the union value.
    pub offset: usize,
}

impl Layout {
    /// Picks the storage strategy for `T` over the buffer `B`,
    /// with the buffer starting `offset` bytes into the union value.
    pub fn select<B: Buffer, T: Alternative<B>>(offset: usize) -> Result<Self, LayoutError> {
        let capacity = match B::KIND {
            BufferKind::Unbounded => return Ok(Self { boxed: true, offset }),
            BufferKind::Fixed(capacity) => capacity,
        };

        if !<T as Alternative<B>>::PLAIN {
            return Err(LayoutError::NotPlain);
        }

        if mem::needs_drop::<T>() {
            return Err(LayoutError::NeedsDrop);
        }

        let size = mem::size_of::<T>();
        if size > capacity {
            return Err(LayoutError::TooLarge { size, capacity });
        }

        Ok(Self { boxed: false, offset })
    }
}
