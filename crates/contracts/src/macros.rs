//! Schema macros
//!
//! Declarative macros that remove the repetitive parts of schema types.

/// Define a closed integer enum with its [`codec::ThriftEnum`] impl
///
/// Generates the enum, an `ALL` table in declaration order, the value
/// mapping in both directions and its field encoding. Extra attributes (serde, `Default`)
/// pass through to the enum and its variants.
///
/// # Usage
/// ```ignore
/// thrift_enum! {
///     pub enum Edition: "Edition" {
///         Uk = 0,
///         Us = 1,
///     }
/// }
/// ```
macro_rules! thrift_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $thrift_name:literal {
            $( $(#[$variant_meta:meta])* $variant:ident = $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$variant_meta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl codec::ThriftEnum for $name {
            const NAME: &'static str = $thrift_name;

            fn value(self) -> i32 {
                match self {
                    $($name::$variant => $value),+
                }
            }

            fn from_value(value: i32) -> Option<Self> {
                match value {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl $crate::wire::WireValue for $name {
            const TTYPE: codec::TType = codec::TType::I32;

            fn write_value<T: codec::OutputTransport>(
                &self,
                w: &mut codec::CompactWriter<T>,
            ) -> codec::Result<()> {
                $crate::wire::write_enum(*self, w)
            }

            fn read_value<T: codec::InputTransport>(
                r: &mut codec::CompactReader<T>,
                field: &'static str,
            ) -> codec::Result<Self> {
                $crate::wire::read_enum_value(r, field)
            }
        }
    };
}

/// Let [`codec::ThriftStruct`] types nest inside fields and lists
macro_rules! wire_struct {
    ($($name:ident),+ $(,)?) => {
        $(
            impl $crate::wire::WireValue for $name {
                const TTYPE: codec::TType = codec::TType::Struct;

                fn write_value<T: codec::OutputTransport>(
                    &self,
                    w: &mut codec::CompactWriter<T>,
                ) -> codec::Result<()> {
                    $crate::wire::write_nested(self, w)
                }

                fn read_value<T: codec::InputTransport>(
                    r: &mut codec::CompactReader<T>,
                    _: &'static str,
                ) -> codec::Result<Self> {
                    $crate::wire::read_nested(r)
                }
            }
        )+
    };
}
