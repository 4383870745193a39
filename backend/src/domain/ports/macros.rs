//! Helper macro generating port error enums with snake-case constructors.
//!
//! Each variant gets a documented constructor; struct-like variants take
//! `impl Into<_>` for every field.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            #[must_use]
            pub const fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            #[must_use]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( {
                    $(
                        #[doc = concat!("`", stringify!($field), "` reported with the failure.")]
                        $field : $ty
                    ),*
                } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        /// Gateway failures used to exercise the macro.
        pub enum ExampleGatewayError {
            /// No credentials.
            NotConfigured => "carrier credentials are not configured",
            /// Refused by the carrier.
            Rejected { message: String } => "carrier rejected request: {message}",
            /// Unexpected response.
            Shape { message: String, status: u16 } => "bad shape: {message} ({status})",
        }
    }

    #[test]
    fn unit_variants_get_argumentless_constructors() {
        let err = ExampleGatewayError::not_configured();
        assert_eq!(err.to_string(), "carrier credentials are not configured");
    }

    #[test]
    fn string_fields_accept_str() {
        let err = ExampleGatewayError::rejected("wilaya inconnue");
        assert_eq!(err.to_string(), "carrier rejected request: wilaya inconnue");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = ExampleGatewayError::shape("not json", 502_u16);
        assert_eq!(err.to_string(), "bad shape: not json (502)");
    }
}
