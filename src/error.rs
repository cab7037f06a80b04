use thiserror::Error;

use crate::derive::MAX_ALTERNATIVES;

/// Why an alternative cannot use the storage its union declares.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("needs {size} bytes but the buffer holds {capacity}")]
    TooLarge { size: usize, capacity: usize },
    #[error("contains references or owned data, declare the union over `Unbounded` storage")]
    NotPlain,
    #[error("has drop glue, declare the union over `Unbounded` storage")]
    NeedsDrop,
}

/// A union declaration that cannot be derived.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("`{union}` declares {count} alternatives, at most {max} are supported", max = MAX_ALTERNATIVES)]
    TooManyAlternatives { union: &'static str, count: usize },
    #[error("`{union}` ran out of discriminants after {max} alternatives, at `{alternative}`", max = MAX_ALTERNATIVES)]
    OutOfDiscriminants { union: &'static str, alternative: &'static str },
    #[error("cannot load `{ty}` into `{union}::{alternative}`: {source}")]
    Layout {
        union: &'static str,
        alternative: &'static str,
        ty: &'static str,
        #[source]
        source: LayoutError,
    },
}

/// Misuse of an accessor. These are raised as panics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("accessor for `{union}` used before its fields were derived")]
    Uninitialized { union: &'static str },
    #[error("`{union}::{expected}` read while `{found}` is active")]
    WrongTag {
        union: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("`{union}::{alternative}` is active but holds no value")]
    Empty {
        union: &'static str,
        alternative: &'static str,
    },
    #[error("`{union}` holds a boxed `{found}` where `{expected}` was expected")]
    BoxedTypeMismatch {
        union: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// Raises a usage error.
#[cold]
#[track_caller]
pub(crate) fn fatal(err: UsageError) -> ! {
    panic!("{}", err)
}
