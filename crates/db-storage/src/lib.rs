// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

#![allow(clippy::extra_unused_lifetimes)]

//! Contains the database ORM and database migrations for the group service
//! Builds upon huddle-database
//!
//! Every model module exposes plain functions and associated functions taking a
//! `&mut DbConnection`. Callers decide about the transaction boundaries, multi step
//! operations like [`groups::Group::delete_cascading`] open their own transaction.

#[macro_use]
extern crate diesel;

mod schema;

pub mod events;
pub mod groups;
pub mod invites;
pub mod messages;
pub mod migrations;
pub mod users;
