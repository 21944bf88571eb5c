// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::groups::{Group, GroupId};
use crate::schema::group_messages;
use crate::users::UserId;
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::{ExpressionMethods, Identifiable, Insertable, QueryDsl, Queryable, RunQueryDsl};

pub use types::core::MessageId;

/// A message posted to a group's board
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Associations)]
#[diesel(table_name = group_messages)]
#[diesel(belongs_to(Group, foreign_key = group_id))]
pub struct Message {
    pub id: MessageId,
    pub group_id: GroupId,
    pub author_id: UserId,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

impl Message {
    #[tracing::instrument(err, skip_all, fields(%id))]
    pub fn get(conn: &mut DbConnection, id: MessageId) -> Result<Message> {
        let message = group_messages::table
            .filter(group_messages::id.eq(id))
            .get_result(conn)?;

        Ok(message)
    }

    /// Get all messages of a group in the order they were sent
    #[tracing::instrument(err, skip_all, fields(%group_id))]
    pub fn get_all_for_group(conn: &mut DbConnection, group_id: GroupId) -> Result<Vec<Message>> {
        let messages = group_messages::table
            .filter(group_messages::group_id.eq(group_id))
            .order((group_messages::sent_at, group_messages::id))
            .load(conn)?;

        Ok(messages)
    }

    /// Returns `false` if no message was deleted
    #[tracing::instrument(err, skip_all, fields(%id))]
    pub fn delete(conn: &mut DbConnection, id: MessageId) -> Result<bool> {
        let deleted =
            diesel::delete(group_messages::table.filter(group_messages::id.eq(id))).execute(conn)?;

        Ok(deleted == 1)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = group_messages)]
pub struct NewMessage {
    pub group_id: GroupId,
    pub author_id: UserId,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl NewMessage {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<Message> {
        let message = diesel::insert_into(group_messages::table)
            .values(self)
            .get_result(conn)?;

        Ok(message)
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = group_messages)]
pub struct UpdateMessage {
    pub content: String,
    pub edited_at: DateTime<Utc>,
}

impl UpdateMessage {
    #[tracing::instrument(err, skip_all, fields(%id))]
    pub fn apply(self, conn: &mut DbConnection, id: MessageId) -> Result<Message> {
        let message = diesel::update(group_messages::table.filter(group_messages::id.eq(id)))
            .set(self)
            .get_result(conn)?;

        Ok(message)
    }
}
