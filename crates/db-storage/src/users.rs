// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Contains the user specific database structs and queries
use super::schema::users;
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::{ExpressionMethods, Identifiable, Insertable, QueryDsl, Queryable, RunQueryDsl};

pub use types::core::UserId;

/// Diesel user struct
///
/// Mirror of an identity managed outside of this service. Only exists so references
/// from groups, events and messages can be validated and presented.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Get a user with the given id
    ///
    /// Returns [`database::DatabaseError::NotFound`] if the user does not exist
    #[tracing::instrument(err, skip_all, fields(%id))]
    pub fn get(conn: &mut DbConnection, id: UserId) -> Result<User> {
        let user = users::table.filter(users::id.eq(id)).get_result(conn)?;

        Ok(user)
    }

    /// Get all users ordered by id
    #[tracing::instrument(err, skip_all)]
    pub fn get_all(conn: &mut DbConnection) -> Result<Vec<User>> {
        let users = users::table.order(users::id).load(conn)?;

        Ok(users)
    }
}

/// Diesel insertable user struct
///
/// Represents fields that have to be provided on user insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<User> {
        let user = diesel::insert_into(users::table)
            .values(self)
            .get_result(conn)?;

        Ok(user)
    }
}
