use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::layout::Layout;

/// Identifies one alternative of the union type `U`.
///
/// Fields are handed out by accessor derivation and by [`field_of`](crate::field_of).
/// Two fields are equal when their discriminant, offset and storage mode all match,
/// which makes them usable for switch-style dispatch:
///
/// ```
/// tagged::tagged_union! {
///     pub union Number: tagged::Inline<8> {
///         int: i64,
///         float: f64,
///     }
/// }
///
/// let with = Number::with();
/// let n = with.float.new(0.5);
///
/// let doubled = match n.field() {
///     f if f == with.int.field() => with.int.get(&n) as f64 * 2.0,
///     f if f == with.float.field() => with.float.get(&n) * 2.0,
///     _ => unreachable!(),
/// };
/// assert_eq!(doubled, 1.0);
/// ```
pub struct Field<U> {
    tag: u16,
    offset: usize,
    boxed: bool,
    owner: PhantomData<fn() -> U>,
}

impl<U> Field<U> {
    /// A field that has not been derived. Any accessor holding one panics on use.
    #[inline]
    pub const fn uninit() -> Self {
        Self {
            tag: 0,
            offset: 0,
            boxed: false,
            owner: PhantomData,
        }
    }

    #[inline]
    pub(crate) const fn new(tag: u16, layout: Layout) -> Self {
        Self {
            tag,
            offset: layout.offset,
            boxed: layout.boxed,
            owner: PhantomData,
        }
    }

    /// The discriminant of this field.
    #[inline]
    pub const fn tag(&self) -> u16 {
        self.tag
    }

    /// The byte offset of the storage within the union value.
    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub const fn is_boxed(&self) -> bool {
        self.boxed
    }

    /// Storage always follows the discriminant, so a derived field never has offset 0.
    #[inline]
    pub const fn is_initialized(&self) -> bool {
        self.offset != 0
    }
}

impl<U> Default for Field<U> {
    #[inline]
    fn default() -> Self {
        Self::uninit()
    }
}

impl<U> Clone for Field<U> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<U> Copy for Field<U> {}

impl<U> PartialEq for Field<U> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.offset == other.offset && self.boxed == other.boxed
    }
}

impl<U> Eq for Field<U> {}

impl<U> Hash for Field<U> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag.hash(state);
        self.offset.hash(state);
        self.boxed.hash(state);
    }
}

impl<U> fmt::Debug for Field<U> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Field")
            .field("tag", &self.tag)
            .field("offset", &self.offset)
            .field("boxed", &self.boxed)
            .finish()
    }
}
