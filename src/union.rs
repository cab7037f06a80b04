use std::fmt;
use std::marker::PhantomData;
use std::mem;

use crate::derive::{self, Alternatives};
use crate::error::DeclarationError;
use crate::field::Field;
use crate::layout::{Buffer, BufferKind, Layout};
use crate::shape::Value;

/// A tagged union over the alternatives `V`.
///
/// The union is a discriminant followed by the storage of `V::Buffer`.
/// It is created through the accessors in `V`, see [`Union::with`].
#[repr(C)]
pub struct Union<V: Alternatives> {
    pub(crate) tag: u16,
    pub(crate) storage: <V::Buffer as Buffer>::Storage,
    fields: PhantomData<fn() -> V>,
}

impl<V: Alternatives> Union<V> {
    /// A union tagged `tag` whose storage is left unspecified.
    #[inline]
    pub(crate) fn uninit(tag: u16) -> Self {
        Self {
            tag,
            storage: V::Buffer::uninit(),
            fields: PhantomData,
        }
    }

    /// Byte offset of the storage within a union value.
    #[inline]
    pub(crate) fn storage_offset() -> usize {
        mem::offset_of!(Union<V>, storage)
    }

    /// Derives a fresh set of accessors.
    ///
    /// # Panic
    ///
    /// Panics if the declaration is invalid, see [`Union::try_fields`].
    pub fn fields() -> V {
        derive::fields::<V>()
    }

    /// Derives a fresh set of accessors, or reports why the declaration is invalid.
    pub fn try_fields() -> Result<V, DeclarationError> {
        derive::try_fields::<V>()
    }

    /// The accessors of this union type, derived once for the whole process.
    ///
    /// # Panic
    ///
    /// Panics if the declaration is invalid.
    #[inline]
    pub fn with() -> &'static V {
        V::cached()
    }

    /// The raw discriminant.
    #[inline]
    pub fn tag(&self) -> u16 {
        self.tag
    }

    /// The field that is currently active.
    #[inline]
    pub fn field(&self) -> Field<Self> {
        field_of(self)
    }

    /// The name of the active alternative, if the discriminant is a declared one.
    #[inline]
    pub fn name(&self) -> Option<&'static str> {
        V::NAMES.get(self.tag as usize).copied()
    }

    /// The active value, type-erased.
    ///
    /// Returns `None` for a default boxed union, which holds no value.
    pub fn dynamic(&self) -> Option<Box<dyn Value>> {
        V::cached().dynamic(self)
    }
}

/// Returns the currently active field of `union`.
#[inline]
pub fn field_of<V: Alternatives>(union: &Union<V>) -> Field<Union<V>> {
    let offset = Union::<V>::storage_offset();
    let boxed = V::Buffer::KIND == BufferKind::Unbounded;
    Field::new(union.tag, Layout { boxed, offset })
}

impl<V: Alternatives> Default for Union<V> {
    /// The zero value: discriminant 0 over zeroed storage.
    #[inline]
    fn default() -> Self {
        Self {
            tag: 0,
            storage: V::Buffer::zeroed(),
            fields: PhantomData,
        }
    }
}

impl<V: Alternatives> Clone for Union<V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            tag: self.tag,
            storage: self.storage.clone(),
            fields: PhantomData,
        }
    }
}

impl<V: Alternatives> Copy for Union<V> where <V::Buffer as Buffer>::Storage: Copy {}

impl<V: Alternatives> fmt::Debug for Union<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut tuple = f.debug_tuple(self.name().unwrap_or("?"));
        if let Some(value) = self.dynamic() {
            tuple.field(&value);
        }
        tuple.finish()
    }
}
