/// Declares a tagged union type and the bundle of accessors for its alternatives.
///
/// ```
/// use tagged::{tagged_union, Inline};
///
/// tagged_union! {
///     /// A float of either width.
///     pub union Float: Inline<8> {
///         bits32: f32,
///         bits64: f64,
///     }
/// }
/// # fn main() {
/// let with = Float::with();
/// let value = with.bits64.new(2.5);
/// assert_eq!(with.bits64.get(&value), 2.5);
/// # }
/// ```
///
/// expands to a type alias `Float` for [`Union<FloatFields>`](crate::Union), and a struct
/// `FloatFields` with one public [`As`](crate::As) per alternative:
///
/// ```ignore
/// pub type Float = tagged::Union<FloatFields>;
///
/// pub struct FloatFields {
///     pub bits32: tagged::As<Float, f32>,
///     pub bits64: tagged::As<Float, f64>,
/// }
/// ```
///
/// Discriminants are assigned in declaration order, starting at 0.
/// The buffer is either [`Inline<N>`](crate::Inline), holding plain alternatives as raw bytes,
/// or [`Unbounded`](crate::Unbounded), boxing every alternative.
#[macro_export]
macro_rules! tagged_union {
    (
        $(#[$attr:meta])*
        $vis:vis union $name:ident: $buffer:ty {
            $($(#[$field_attr:meta])* $field:ident: $ty:ty),* $(,)?
        }
    ) => (
        $crate::paste::paste! {
            $(#[$attr])*
            $vis type $name = $crate::Union<[<$name Fields>]>;

            #[doc = concat!("The accessors of [`", stringify!($name), "`], one per alternative.")]
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            $vis struct [<$name Fields>] {
                $(
                    $(#[$field_attr])*
                    pub $field: $crate::As<$name, $ty>,
                )*
            }

            unsafe impl $crate::Alternatives for [<$name Fields>] {
                type Buffer = $buffer;

                const NAMES: &'static [&'static str] = &[$(stringify!($field)),*];

                #[allow(unused_variables)]
                fn load(
                    loader: &mut $crate::Loader<Self>,
                ) -> ::core::result::Result<Self, $crate::DeclarationError> {
                    ::core::result::Result::Ok(Self {
                        $($field: loader.load(stringify!($field))?,)*
                    })
                }

                fn cached() -> &'static Self {
                    static FIELDS: $crate::once_cell::sync::OnceCell<[<$name Fields>]> =
                        $crate::once_cell::sync::OnceCell::new();

                    FIELDS.get_or_init($crate::fields::<Self>)
                }

                #[allow(unused_variables)]
                fn dynamic(
                    &self,
                    union: &$name,
                ) -> ::core::option::Option<::std::boxed::Box<dyn $crate::Value>> {
                    let field = union.field();
                    $(
                        if field == self.$field.field() {
                            return self.$field
                                .lookup(union)
                                .map(|value| ::std::boxed::Box::new(value) as ::std::boxed::Box<dyn $crate::Value>);
                        }
                    )*
                    ::core::option::Option::None
                }
            }
        }
    );
}
