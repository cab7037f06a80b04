//! Classifies types as plain data or not.
//!
//! Only plain data may live in the raw bytes of an [`Inline`](crate::Inline) buffer,
//! everything else has to be boxed.

use std::any::{self, Any};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use crate::layout::{Buffer, Inline, Unbounded};

/// Describes whether a type can be stored as raw bytes.
///
/// # Safety
///
/// A type may only set `PLAIN` to `true` if a bitwise copy of a value is a valid,
/// independent value, and the all-zero bit pattern is a valid value.
/// That rules out references, raw pointers, and anything that owns heap data.
/// Types with drop glue are rejected separately when a union is derived.
pub unsafe trait Shape {
    /// `true` if the type is plain data.
    const PLAIN: bool;
}

/// A type-erased alternative, as handed out by [`Union::dynamic`](crate::Union::dynamic).
pub trait Value: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// The name of the concrete type behind this value.
    fn type_name(&self) -> &'static str;
}

impl<T: Any + fmt::Debug + Send + Sync> Value for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn type_name(&self) -> &'static str {
        any::type_name::<T>()
    }
}

/// Everything a type needs to be an alternative of a union declared over the buffer `B`.
///
/// Any `Value + Clone` can be boxed in an [`Unbounded`] union.
/// An [`Inline`] union additionally needs [`Shape`] to tell whether the raw bytes can be kept.
pub trait Alternative<B: Buffer>: Value + Clone {
    /// `true` if the type may be stored as raw bytes in `B`.
    const PLAIN: bool;
}

impl<T: Shape + Value + Clone, const N: usize> Alternative<Inline<N>> for T {
    const PLAIN: bool = <T as Shape>::PLAIN;
}

impl<T: Value + Clone> Alternative<Unbounded> for T {
    const PLAIN: bool = false;
}

macro_rules! plain {
    ($($ty:ty),*) => (
        $(
            unsafe impl Shape for $ty {
                const PLAIN: bool = true;
            }
        )*
    )
}

plain!(
    (), bool, char, f32, f64,
    u8, u16, u32, u64, u128, usize,
    i8, i16, i32, i64, i128, isize,
    Duration
);

unsafe impl<T: ?Sized> Shape for PhantomData<T> {
    const PLAIN: bool = true;
}

unsafe impl<T: Shape, const N: usize> Shape for [T; N] {
    const PLAIN: bool = T::PLAIN;
}

macro_rules! not_plain {
    ($(impl <$($generics:ident),*> for $ty:ty;)*) => (
        $(
            unsafe impl <$($generics),*> Shape for $ty {
                const PLAIN: bool = false;
            }
        )*
    )
}

not_plain!(
    impl <> for String;
    impl <T> for Vec<T>;
    impl <T> for VecDeque<T>;
    impl <T> for Option<T>;
    impl <K, V, S> for HashMap<K, V, S>;
    impl <K, V> for BTreeMap<K, V>;
    impl <T, S> for HashSet<T, S>;
    impl <T> for BTreeSet<T>;
);

unsafe impl<T: ?Sized> Shape for &'static T {
    const PLAIN: bool = false;
}

unsafe impl<T: ?Sized> Shape for Box<T> {
    const PLAIN: bool = false;
}

unsafe impl<T: ?Sized> Shape for Arc<T> {
    const PLAIN: bool = false;
}

macro_rules! fn_shape {
    ($($generics:ident),*) => (
        unsafe impl <R $(,$generics)*> Shape for fn($($generics),*) -> R {
            const PLAIN: bool = false;
        }
    )
}

fn_shape!();
fn_shape!(A);
fn_shape!(A, B);
fn_shape!(A, B, C);
fn_shape!(A, B, C, D);

macro_rules! tuple_shape {
    ($current:ident $(,$generics:ident)*) => (
        unsafe impl <$current: Shape $(,$generics: Shape)*> Shape for ($current, $($generics,)*) {
            const PLAIN: bool = $current::PLAIN $(&& $generics::PLAIN)*;
        }

        tuple_shape!($($generics),*);
    );

    () => ();
}

tuple_shape!(A, B, C, D, E, F, G, H, I, J);

/// Declares a struct and classifies it: the struct is plain data if every field is.
///
/// # Examples
/// ```
/// tagged::shape! {
///     #[derive(Clone, Copy, Debug, PartialEq)]
///     pub struct Point {
///         pub x: f32,
///         pub y: f32,
///     }
/// }
///
/// assert!(<Point as tagged::Shape>::PLAIN);
/// ```
#[macro_export]
macro_rules! shape {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident {
            $($(#[$field_attr:meta])* $field_vis:vis $field:ident: $ty:ty),* $(,)?
        }
    ) => (
        $(#[$attr])*
        $vis struct $name {
            $($(#[$field_attr])* $field_vis $field: $ty,)*
        }

        // The field list is the struct's own, so the classification cannot lie.
        unsafe impl $crate::Shape for $name {
            const PLAIN: bool = true $(&& <$ty as $crate::Shape>::PLAIN)*;
        }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    shape! {
        #[derive(Clone, Copy, Debug)]
        struct Pixel {
            rgb: [u8; 3],
            alpha: f32,
        }
    }

    shape! {
        #[derive(Clone, Debug)]
        struct Named {
            id: u32,
            name: String,
        }
    }

    #[allow(dead_code)]
    #[derive(Clone, Debug)]
    enum Color {
        Red,
        Rgb(u8, u8, u8),
    }

    #[test]
    fn test_primitives_are_plain() {
        assert!(<u8 as Shape>::PLAIN);
        assert!(<f64 as Shape>::PLAIN);
        assert!(<char as Shape>::PLAIN);
        assert!(<() as Shape>::PLAIN);
    }

    #[test]
    fn test_compounds_follow_their_parts() {
        assert!(<[u32; 4] as Shape>::PLAIN);
        assert!(<(u8, i64, [f32; 2]) as Shape>::PLAIN);
        assert!(!<[String; 2] as Shape>::PLAIN);
        assert!(!<(u8, Vec<u8>) as Shape>::PLAIN);
    }

    #[test]
    fn test_references_are_not_plain() {
        assert!(!<String as Shape>::PLAIN);
        assert!(!<Vec<u8> as Shape>::PLAIN);
        assert!(!<&'static str as Shape>::PLAIN);
        assert!(!<Box<u8> as Shape>::PLAIN);
        assert!(!<Arc<u8> as Shape>::PLAIN);
        assert!(!<fn(u8) -> u8 as Shape>::PLAIN);
        assert!(!<HashMap<u8, u8> as Shape>::PLAIN);
        assert!(!<Option<u8> as Shape>::PLAIN);
        assert!(!<VecDeque<u8> as Shape>::PLAIN);
        assert!(!<BTreeSet<u8> as Shape>::PLAIN);
    }

    #[test]
    fn test_declared_structs() {
        assert!(<Pixel as Shape>::PLAIN);
        assert!(!<Named as Shape>::PLAIN);
    }

    #[test]
    fn test_alternative_follows_buffer() {
        assert!(<u32 as Alternative<Inline<4>>>::PLAIN);
        assert!(!<Named as Alternative<Inline<64>>>::PLAIN);
        assert!(!<u32 as Alternative<Unbounded>>::PLAIN);
        assert!(!<Color as Alternative<Unbounded>>::PLAIN);
        assert!(!<Result<u8, String> as Alternative<Unbounded>>::PLAIN);
    }

    #[test]
    fn test_value_type_name() {
        let boxed: Box<dyn Value> = Box::new(7u16);
        let value: &dyn Value = &*boxed;

        assert_eq!(value.type_name(), "u16");
        assert_eq!(value.as_any().downcast_ref::<u16>(), Some(&7));
    }
}
