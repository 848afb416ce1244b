//! Helper macro for generating driven-port error enums.

/// Generate a `thiserror` enum for a driven port, with snake_case
/// constructor functions for each variant. Variants are either unit-like or
/// carry a single `message: String` field.
macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident message) => {
        ::paste::paste! {
            pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                Self::$variant { message: message.into() }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $field:ident : String } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $field: String } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $($field)?);
            )*
        }
    };
}

pub(crate) use define_port_error;
