use std::any;
use std::fmt;
use std::marker::PhantomData;
use std::ptr;
use std::sync::Arc;

use crate::derive::Alternatives;
use crate::error::{fatal, UsageError};
use crate::field::Field;
use crate::layout::{Buffer, BufferKind};
use crate::shape::{Alternative, Value};
use crate::union::Union;

/// Typed access to one alternative, holding values of type `T`, of the union type `U`.
///
/// Accessors are obtained by deriving a union's fields. A default accessor is not derived,
/// and panics on any use.
pub struct As<U, T> {
    name: &'static str,
    field: Field<U>,
    marker: PhantomData<fn() -> T>,
}

impl<U, T> As<U, T> {
    #[inline]
    pub(crate) fn from_field(name: &'static str, field: Field<U>) -> Self {
        Self {
            name,
            field,
            marker: PhantomData,
        }
    }

    /// The field this accessor reads and writes.
    #[inline]
    pub fn field(&self) -> Field<U> {
        self.field
    }

    /// The declared name of the alternative.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<V: Alternatives, T: Alternative<V::Buffer>> As<Union<V>, T> {
    /// Creates a union holding `value`.
    ///
    /// # Panic
    ///
    /// Panics if this accessor was not derived.
    #[allow(clippy::new_ret_no_self)]
    #[inline]
    pub fn new(&self, value: T) -> Union<V> {
        self.check();

        let mut union = Union::uninit(self.field.tag());
        self.write(&mut union, value);
        union
    }

    /// Overwrites `union` so that it holds `value`, whatever it held before.
    ///
    /// # Panic
    ///
    /// Panics if this accessor was not derived.
    #[inline]
    pub fn set(&self, union: &mut Union<V>, value: T) {
        self.check();

        union.tag = self.field.tag();
        self.write(union, value);
    }

    /// Returns the value held by `union`.
    ///
    /// # Panic
    ///
    /// Panics if `union` holds another alternative, if it is a default boxed union with nothing in it,
    /// or if this accessor was not derived.
    #[track_caller]
    pub fn get(&self, union: &Union<V>) -> T {
        match self.lookup(union) {
            Some(value) => value,
            None if union.tag == self.field.tag() => fatal(UsageError::Empty {
                union: any::type_name::<Union<V>>(),
                alternative: self.name,
            }),
            None => fatal(UsageError::WrongTag {
                union: any::type_name::<Union<V>>(),
                expected: self.name,
                found: union.name().unwrap_or("?"),
            }),
        }
    }

    /// Returns the value held by `union`, or `None` if it holds another alternative.
    ///
    /// A default union over [`Unbounded`](crate::Unbounded) storage has the first alternative's tag
    /// but an empty slot. Looking it up yields `None` as well.
    ///
    /// # Panic
    ///
    /// Panics if this accessor was not derived.
    pub fn lookup(&self, union: &Union<V>) -> Option<T> {
        self.check();

        if union.tag != self.field.tag() {
            return None;
        }

        if self.field.is_boxed() {
            let slot = match V::Buffer::slot(&union.storage) {
                Some(slot) => slot,
                None => unreachable!("boxed field over fixed storage"),
            };
            let value: &dyn Value = &**slot.as_ref()?;

            match value.as_any().downcast_ref::<T>() {
                Some(value) => Some(value.clone()),
                None => fatal(UsageError::BoxedTypeMismatch {
                    union: any::type_name::<Union<V>>(),
                    expected: any::type_name::<T>(),
                    found: value.type_name(),
                }),
            }
        } else {
            // The tag matches, so the bytes at the offset were written as a `T`.
            unsafe {
                let base = (union as *const Union<V>).cast::<u8>();
                Some(ptr::read_unaligned(base.add(self.field.offset()).cast::<T>()))
            }
        }
    }

    /// Like [`As::lookup`], but yields the default value and `false` if `union` holds another alternative.
    #[inline]
    pub fn lookup_or_default(&self, union: &Union<V>) -> (T, bool)
    where
        T: Default,
    {
        match self.lookup(union) {
            Some(value) => (value, true),
            None => (T::default(), false),
        }
    }

    #[inline]
    #[track_caller]
    fn check(&self) {
        if !self.field.is_initialized() {
            fatal(UsageError::Uninitialized {
                union: any::type_name::<Union<V>>(),
            });
        }
    }

    fn write(&self, union: &mut Union<V>, value: T) {
        if self.field.is_boxed() {
            match V::Buffer::slot_mut(&mut union.storage) {
                Some(slot) => *slot = Some(Arc::new(value)),
                None => unreachable!("boxed field over fixed storage"),
            }
        } else {
            debug_assert!(matches!(
                V::Buffer::KIND,
                BufferKind::Fixed(capacity)
                    if self.field.offset() - Union::<V>::storage_offset() + std::mem::size_of::<T>() <= capacity
            ));

            // Derivation only lays a field out inline when `T` is plain and fits the buffer.
            unsafe {
                let base = (union as *mut Union<V>).cast::<u8>();
                ptr::write_unaligned(base.add(self.field.offset()).cast::<T>(), value);
            }
        }
    }
}

impl<U, T> Default for As<U, T> {
    #[inline]
    fn default() -> Self {
        Self::from_field("", Field::uninit())
    }
}

impl<U, T> Clone for As<U, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<U, T> Copy for As<U, T> {}

impl<U, T> PartialEq for As<U, T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
    }
}

impl<U, T> Eq for As<U, T> {}

impl<U, T> fmt::Debug for As<U, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("As")
            .field("name", &self.name)
            .field("type", &any::type_name::<T>())
            .field("field", &self.field)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Inline, Unbounded};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    crate::shape! {
        #[derive(Clone, Copy, Debug, PartialEq, Default)]
        struct Point {
            x: i32,
            y: i32,
        }
    }

    tagged_union! {
        union Float: Inline<8> {
            bits32: f32,
            bits64: f64,
        }
    }

    tagged_union! {
        union Figure: Inline<16> {
            point: Point,
            flag: bool,
            bytes: [u8; 16],
            pair: (u8, u64),
        }
    }

    tagged_union! {
        union Message: Unbounded {
            text: String,
            items: Vec<u32>,
            code: u16,
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    enum Color {
        Red,
        Rgb(u8, u8, u8),
    }

    tagged_union! {
        union Paint: Unbounded {
            color: Color,
            result: Result<u8, String>,
            path: PathBuf,
        }
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn test_float_scenario() {
        let with = Float::with();
        let value = with.bits32.new(3.14159f32);

        assert_eq!(value.field(), with.bits32.field());
        assert_eq!(with.bits32.get(&value), 3.14159f32);
        assert_eq!(with.bits64.lookup(&value), None);
        assert_eq!(with.bits64.lookup_or_default(&value), (0.0, false));
    }

    #[test]
    #[should_panic(expected = "read while `bits32` is active")]
    fn test_get_wrong_tag() {
        let with = Float::with();
        let value = with.bits32.new(1.0);

        with.bits64.get(&value);
    }

    #[test]
    fn test_round_trip_inline() {
        let with = Figure::with();

        let point = Point { x: -3, y: 7 };
        assert_eq!(with.point.get(&with.point.new(point)), point);
        assert!(with.flag.get(&with.flag.new(true)));

        let mut bytes = [0u8; 16];
        bytes.iter_mut().enumerate().for_each(|(i, byte)| *byte = i as u8);
        assert_eq!(with.bytes.get(&with.bytes.new(bytes)), bytes);
        assert_eq!(with.pair.get(&with.pair.new((9, u64::MAX))), (9, u64::MAX));
    }

    #[test]
    fn test_round_trip_boxed() {
        let with = Message::with();

        assert_eq!(with.text.get(&with.text.new(String::from("hi"))), "hi");
        assert_eq!(with.items.get(&with.items.new(vec![1, 2, 3])), vec![1, 2, 3]);
        assert_eq!(with.code.get(&with.code.new(500)), 500);
    }

    #[test]
    fn test_mismatch_is_never_misread() {
        let with = Figure::with();
        let value = with.bytes.new([0xff; 16]);

        assert_eq!(with.point.lookup(&value), None);
        assert_eq!(with.point.lookup_or_default(&value), (Point::default(), false));
        assert_eq!(with.flag.lookup(&value), None);

        let message = Message::with().code.new(7);
        assert_eq!(Message::with().text.lookup_or_default(&message), (String::new(), false));
    }

    #[test]
    fn test_copy_semantics() {
        let with = Message::with();
        let mut items = vec![1, 2];
        let value = with.items.new(items.clone());
        items.push(3);

        assert_eq!(with.items.get(&value), vec![1, 2]);

        let shape = Figure::with();
        let mut point = Point { x: 1, y: 1 };
        let value = shape.point.new(point);
        point.x = 100;

        assert_eq!(shape.point.get(&value).x, 1);
    }

    #[test]
    fn test_reassignment() {
        let with = Figure::with();
        let mut value = with.bytes.new([0xab; 16]);

        with.flag.set(&mut value, false);
        assert_eq!(value.field(), with.flag.field());
        assert!(!with.flag.get(&value));
        assert_eq!(with.bytes.lookup(&value), None);

        value = with.point.new(Point { x: 2, y: 3 });
        assert_eq!(with.point.get(&value), Point { x: 2, y: 3 });

        let message = Message::with();
        let mut boxed = message.text.new(String::from("old"));
        message.code.set(&mut boxed, 1);
        assert_eq!(message.code.get(&boxed), 1);
        assert_eq!(message.text.lookup(&boxed), None);
    }

    #[test]
    #[should_panic(expected = "used before its fields were derived")]
    fn test_uninitialized_new() {
        As::<Float, f32>::default().new(1.0);
    }

    #[test]
    #[should_panic(expected = "used before its fields were derived")]
    fn test_uninitialized_lookup() {
        let value = Float::with().bits32.new(1.0);

        As::<Float, f32>::default().lookup(&value);
    }

    #[test]
    #[should_panic(expected = "::text` is active but holds no value")]
    fn test_get_on_empty_boxed_union() {
        let value = Message::default();

        assert_eq!(Message::with().text.lookup(&value), None);
        Message::with().text.get(&value);
    }

    #[test]
    fn test_boxed_alternatives_need_no_shape() {
        let with = Paint::with();

        let color = with.color.new(Color::Rgb(1, 2, 3));
        assert_eq!(with.color.get(&color), Color::Rgb(1, 2, 3));
        assert_eq!(with.result.lookup(&color), None);

        let failed = with.result.new(Err(String::from("no ink")));
        assert_eq!(with.result.get(&failed), Err(String::from("no ink")));
        assert_eq!(with.path.get(&with.path.new(PathBuf::from("/tmp"))), PathBuf::from("/tmp"));
        assert_eq!(format!("{:?}", with.color.new(Color::Red)), "color(Red)");
    }

    #[test]
    #[should_panic(expected = "holds a boxed `u16` where `alloc::string::String` was expected")]
    fn test_boxed_type_mismatch() {
        let message = Message::with();
        let value = message.code.new(3);
        // An accessor for the same tag with another type can only come from a broken bundle.
        let broken = As::<Message, String>::from_field("code", message.code.field());

        broken.lookup(&value);
    }

    #[test]
    fn test_debug() {
        let with = Float::with();

        assert_eq!(
            format!("{:?}", with.bits64),
            "As { name: \"bits64\", type: \"f64\", field: Field { tag: 1, offset: 2, boxed: false } }"
        );
    }
}
