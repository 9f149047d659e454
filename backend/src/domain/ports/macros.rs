//! `define_port_error!` generates the error enum of a driven port.
//!
//! Each variant pairs its fields with a `thiserror` message, and every
//! variant gets a snake_case constructor whose fields accept `impl Into<T>`,
//! so adapters can write `AccountRepositoryError::query("timeout")`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
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
                $variant $( { $($field : $ty),* } )?,
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
    use rstest::rstest;

    define_port_error! {
        pub enum LedgerStoreError {
            Offline => "ledger store offline",
            Query { message: String } => "ledger query failed: {message}",
            Stale { expected: u32 } => "ledger revision {expected} is stale",
            Rejected { message: String, row: u32 } => "row {row} rejected: {message}",
        }
    }

    #[rstest]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(LedgerStoreError::offline(), LedgerStoreError::Offline);
    }

    #[rstest]
    fn string_fields_accept_str() {
        let err = LedgerStoreError::query("connection reset");
        assert_eq!(err.to_string(), "ledger query failed: connection reset");
    }

    #[rstest]
    fn numeric_fields_keep_their_type() {
        let err = LedgerStoreError::stale(4_u32);
        assert_eq!(err, LedgerStoreError::Stale { expected: 4 });
        assert_eq!(err.to_string(), "ledger revision 4 is stale");
    }

    #[rstest]
    fn mixed_fields_follow_declaration_order() {
        let err = LedgerStoreError::rejected(String::from("duplicate voter"), 2_u32);
        assert_eq!(err.to_string(), "row 2 rejected: duplicate voter");
    }
}
