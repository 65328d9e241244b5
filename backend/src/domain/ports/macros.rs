//! `define_port_error!` declares the error enum of a driven port.
//!
//! Every help-desk store failure is a fixed summary plus a free-form detail
//! from the adapter, so each variant carries exactly one `message` field.
//! The macro adds a snake_case constructor per variant and a
//! [`message`](#method.message) accessor shared by all variants.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $summary:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error("{summary}: {message}", summary = $summary)]
                $variant { message: String },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!("Build a `", stringify!($variant), "` failure.")]
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant {
                            message: message.into(),
                        }
                    }
                }
            )+

            /// Adapter detail without the variant summary.
            pub fn message(&self) -> &str {
                match self {
                    $( Self::$variant { message } )|+ => message,
                }
            }
        }
    };
}

pub(crate) use define_port_error;
