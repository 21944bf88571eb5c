// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Data types shared by the huddle crates.
//!
//! # Features
//!
//! ## `default`
//!
//! Depends on:
//! - `serde`
//!
//! ## `backend`
//!
//! Set the `backend` feature for using the types in the storage layer and the
//! group services.
//!
//! Depends on:
//! - `diesel`
//! - `serde`
//!
//! ## `diesel`
//!
//! Adds [Diesel](https://diesel.rs/) type mappings to the identifier newtypes
//! and the participation status, so they can be stored in a database through the ORM.
//!
//! ## `serde`
//!
//! Derives [`serde::Serialize`] and [`serde::Deserialize`] for all types.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    missing_debug_implementations,
    missing_docs,
    no_mangle_generic_items,
    non_shorthand_field_patterns,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unsafe_code,
    unused_allocation,
    unused_comparisons,
    unused_extern_crates,
    unused_import_braces,
    unused_parens,
    while_true
)]

mod macros;

pub mod core;

mod imports {
    #[cfg(feature = "diesel")]
    pub use diesel::{
        deserialize::{self, FromSql, FromSqlRow},
        expression::AsExpression,
        pg::{Pg, PgValue},
        serialize::{self, IsNull, Output, ToSql},
        sql_types::Text,
    };

    #[cfg(feature = "serde")]
    pub use serde::{Deserialize, Serialize};
}
