//! Compact tagged unions.
//!
//! A union holds exactly one of a declared list of alternatives, identified by a small discriminant.
//! The layout of every alternative is worked out once, when the union's accessors are derived,
//! so that constructing and reading values afterwards only compares discriminants.
//!
//! ```
//! use tagged::{tagged_union, Inline};
//!
//! tagged_union! {
//!     pub union Float: Inline<8> {
//!         bits32: f32,
//!         bits64: f64,
//!     }
//! }
//!
//! fn describe(value: &Float) -> String {
//!     let with = Float::with();
//!     match value.field() {
//!         f if f == with.bits32.field() => format!("a f32: {}", with.bits32.get(value)),
//!         f if f == with.bits64.field() => format!("a f64: {}", with.bits64.get(value)),
//!         _ => unreachable!(),
//!     }
//! }
//!
//! # fn main() {
//! let with = Float::with();
//! let mut value = with.bits32.new(1.5);
//! assert_eq!(describe(&value), "a f32: 1.5");
//!
//! value = with.bits64.new(0.25);
//! assert_eq!(describe(&value), "a f64: 0.25");
//! assert_eq!(with.bits32.lookup(&value), None);
//! # }
//! ```
//!
//! Alternatives without references are stored inline, as raw bytes, in an [`Inline`] buffer.
//! Anything else needs an [`Unbounded`] union, which boxes its alternatives.

#[macro_use]
mod macros;

pub mod accessor;
pub mod derive;
pub mod error;
pub mod field;
pub mod layout;
pub mod shape;
pub mod union;

pub use accessor::As;
pub use derive::{fields, try_fields, Alternatives, Loader, MAX_ALTERNATIVES};
pub use error::{DeclarationError, LayoutError, UsageError};
pub use field::Field;
pub use layout::{Buffer, BufferKind, Inline, Layout, Unbounded};
pub use shape::{Alternative, Shape, Value};
pub use union::{field_of, Union};

#[doc(hidden)]
pub use once_cell;
#[doc(hidden)]
pub use paste;
