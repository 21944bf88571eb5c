// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

/// Allows to create one or more typed numeric ids
///
/// Defines the type as a newtype over `i64` and, with the `diesel` feature enabled,
/// implements the traits required to use it as a `BIGINT` column with diesel.
#[macro_export]
macro_rules! id_newtype {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            pub use __newtype_impl::$name;
        )+

        mod __newtype_impl {
            #[allow(unused_imports)]
            use $crate::imports::*;
            use std::fmt;
            use std::num::ParseIntError;
            use std::str::FromStr;

            $(

            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
            #[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
            #[cfg_attr(
                feature = "diesel",
                derive(AsExpression, FromSqlRow),
                diesel(sql_type = diesel::sql_types::BigInt)
            )]
            pub struct $name(i64);

            impl $name {
                /// Wrap a value into this type.
                pub const fn from(inner: i64) -> Self {
                    Self(inner)
                }

                /// Get a reference to the inner value.
                pub fn inner(&self) -> &i64 {
                    &self.0
                }

                /// Destructure this type and extract the inner value.
                pub fn into_inner(self) -> i64 {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.0.fmt(f)
                }
            }

            impl FromStr for $name {
                type Err = ParseIntError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    s.parse().map(Self)
                }
            }

            #[cfg(feature = "diesel")]
            impl<DB> ToSql<diesel::sql_types::BigInt, DB> for $name
            where
                DB: diesel::backend::Backend,
                i64: ToSql<diesel::sql_types::BigInt, DB>,
            {
                fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, DB>) -> serialize::Result {
                    <i64 as ToSql<diesel::sql_types::BigInt, DB>>::to_sql(&self.0, out)
                }
            }

            #[cfg(feature = "diesel")]
            impl<DB> FromSql<diesel::sql_types::BigInt, DB> for $name
            where
                DB: diesel::backend::Backend,
                i64: FromSql<diesel::sql_types::BigInt, DB>,
            {
                fn from_sql(bytes: DB::RawValue<'_>) -> deserialize::Result<Self> {
                    <i64 as FromSql<diesel::sql_types::BigInt, DB>>::from_sql(bytes).map(Self)
                }
            }

            )+
        }
    };
}
