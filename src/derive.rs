//! Accessor derivation: turns a declared list of alternatives into typed accessors.

use std::any;
use std::marker::PhantomData;

use crate::accessor::As;
use crate::error::DeclarationError;
use crate::field::Field;
use crate::layout::{Buffer, Layout};
use crate::shape::{Alternative, Value};
use crate::union::Union;

/// The largest number of alternatives a union may declare.
pub const MAX_ALTERNATIVES: usize = u16::MAX as usize;

/// The accessor bundle of a union type: one [`As`] per alternative, in declaration order.
///
/// This is normally implemented by [`tagged_union!`](crate::tagged_union).
///
/// # Safety
///
/// `load` must call [`Loader::load`] once per alternative, in the same order and with the same types
/// on every call, and must not return accessors obtained any other way.
pub unsafe trait Alternatives: Sized + Send + Sync + 'static {
    /// The storage the union is declared over.
    type Buffer: Buffer;

    /// The names of the alternatives, indexed by discriminant.
    const NAMES: &'static [&'static str];

    fn load(loader: &mut Loader<Self>) -> Result<Self, DeclarationError>;

    /// The process-wide bundle, derived on first use.
    fn cached() -> &'static Self;

    /// The active value of `union`, type-erased.
    fn dynamic(&self, union: &Union<Self>) -> Option<Box<dyn Value>>;
}

/// Hands out discriminants and layouts while a bundle is derived.
pub struct Loader<V: Alternatives> {
    next: usize,
    offset: usize,
    fields: PhantomData<fn() -> V>,
}

impl<V: Alternatives> Loader<V> {
    fn new() -> Self {
        Self {
            next: 0,
            offset: Union::<V>::storage_offset(),
            fields: PhantomData,
        }
    }

    /// Loads the next alternative, named `name`, holding values of type `T`.
    pub fn load<T: Alternative<V::Buffer>>(&mut self, name: &'static str) -> Result<As<Union<V>, T>, DeclarationError> {
        if self.next >= MAX_ALTERNATIVES {
            return Err(DeclarationError::OutOfDiscriminants {
                union: any::type_name::<Union<V>>(),
                alternative: name,
            });
        }

        let layout = Layout::select::<V::Buffer, T>(self.offset).map_err(|source| DeclarationError::Layout {
            union: any::type_name::<Union<V>>(),
            alternative: name,
            ty: any::type_name::<T>(),
            source,
        })?;

        let tag = self.next as u16;
        self.next += 1;

        log::trace!(
            "loaded `{}` as {}::{} (tag {}, offset {}, boxed {})",
            any::type_name::<T>(),
            any::type_name::<Union<V>>(),
            name,
            tag,
            layout.offset,
            layout.boxed
        );

        Ok(As::from_field(name, Field::new(tag, layout)))
    }

    /// The number of alternatives loaded so far.
    #[inline]
    pub fn count(&self) -> usize {
        self.next
    }
}

/// Derives a fresh accessor bundle for `V`.
pub fn try_fields<V: Alternatives>() -> Result<V, DeclarationError> {
    let count = V::NAMES.len();
    if count > MAX_ALTERNATIVES {
        return Err(DeclarationError::TooManyAlternatives {
            union: any::type_name::<Union<V>>(),
            count,
        });
    }

    let mut loader = Loader::new();
    let fields = V::load(&mut loader)?;

    debug_assert_eq!(loader.count(), count, "`NAMES` does not match the loaded alternatives");
    log::debug!("derived {} alternatives for `{}`", loader.count(), any::type_name::<Union<V>>());

    Ok(fields)
}

/// Derives a fresh accessor bundle for `V`.
///
/// # Panic
///
/// Panics if the declaration is invalid.
pub fn fields<V: Alternatives>() -> V {
    match try_fields::<V>() {
        Ok(fields) => fields,
        Err(err) => panic!("{}", err),
    }
}
