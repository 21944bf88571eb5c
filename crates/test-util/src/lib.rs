// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Test utility functions for the database and group crates
pub use pretty_assertions::assert_eq;

#[cfg(feature = "database")]
pub mod database;

#[cfg(feature = "groups")]
pub mod groups;
