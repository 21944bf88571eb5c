// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::groups::{Group, GroupId};
use crate::schema::{event_participants, group_events, users};
use crate::users::{User, UserId};
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::upsert::excluded;
use diesel::prelude::*;
use types::core::ParticipationStatus;

pub use types::core::EventId;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Associations)]
#[diesel(table_name = group_events)]
#[diesel(belongs_to(Group, foreign_key = group_id))]
pub struct Event {
    pub id: EventId,
    pub group_id: GroupId,
    pub creator_id: UserId,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    #[tracing::instrument(err, skip_all, fields(%id))]
    pub fn get(conn: &mut DbConnection, id: EventId) -> Result<Event> {
        let event = group_events::table
            .filter(group_events::id.eq(id))
            .get_result(conn)?;

        Ok(event)
    }

    /// Get all events of a group, latest event date first
    #[tracing::instrument(err, skip_all, fields(%group_id))]
    pub fn get_all_for_group(conn: &mut DbConnection, group_id: GroupId) -> Result<Vec<Event>> {
        let events = group_events::table
            .filter(group_events::group_id.eq(group_id))
            .order((group_events::event_date.desc(), group_events::id.desc()))
            .load(conn)?;

        Ok(events)
    }

    /// Get all events created by the user, latest event date first
    #[tracing::instrument(err, skip_all, fields(%creator_id))]
    pub fn get_all_by_creator(conn: &mut DbConnection, creator_id: UserId) -> Result<Vec<Event>> {
        let events = group_events::table
            .filter(group_events::creator_id.eq(creator_id))
            .order((group_events::event_date.desc(), group_events::id.desc()))
            .load(conn)?;

        Ok(events)
    }

    /// Get all events the user responded to with the given status, latest event date first
    #[tracing::instrument(err, skip_all, fields(%user_id, %status))]
    pub fn get_all_with_participant_status(
        conn: &mut DbConnection,
        user_id: UserId,
        status: ParticipationStatus,
    ) -> Result<Vec<Event>> {
        let query = event_participants::table
            .inner_join(group_events::table)
            .filter(
                event_participants::user_id
                    .eq(user_id)
                    .and(event_participants::status.eq(status)),
            )
            .select(group_events::all_columns)
            .order((group_events::event_date.desc(), group_events::id.desc()));

        let events = query.load(conn)?;

        Ok(events)
    }

    /// Delete the event and all responses to it
    ///
    /// Returns `false` if no event was deleted
    #[tracing::instrument(err, skip_all, fields(%id))]
    pub fn delete_cascading(conn: &mut DbConnection, id: EventId) -> Result<bool> {
        conn.transaction(|conn| {
            diesel::delete(event_participants::table.filter(event_participants::event_id.eq(id)))
                .execute(conn)?;

            let deleted =
                diesel::delete(group_events::table.filter(group_events::id.eq(id))).execute(conn)?;

            Ok(deleted == 1)
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = group_events)]
pub struct NewEvent {
    pub group_id: GroupId,
    pub creator_id: UserId,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewEvent {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<Event> {
        let event = diesel::insert_into(group_events::table)
            .values(self)
            .get_result(conn)?;

        Ok(event)
    }
}

/// A group member's response to an event
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Associations, Insertable)]
#[diesel(table_name = event_participants)]
#[diesel(primary_key(event_id, user_id))]
#[diesel(belongs_to(Event, foreign_key = event_id))]
#[diesel(belongs_to(User, foreign_key = user_id))]
pub struct Participant {
    pub event_id: EventId,
    pub user_id: UserId,
    pub status: ParticipationStatus,
    pub responded_at: DateTime<Utc>,
}

impl Participant {
    /// Get all responses to the event with the responding users, in order of response
    #[tracing::instrument(err, skip_all, fields(%event_id))]
    pub fn get_all_for_event_with_users(
        conn: &mut DbConnection,
        event_id: EventId,
    ) -> Result<Vec<(Participant, User)>> {
        let participants = event_participants::table
            .inner_join(users::table)
            .filter(event_participants::event_id.eq(event_id))
            .order((event_participants::responded_at, event_participants::user_id))
            .load(conn)?;

        Ok(participants)
    }

    /// Inserts the response or overwrites status and response time of an existing one
    #[tracing::instrument(err, skip_all, fields(event_id = %self.event_id, user_id = %self.user_id))]
    pub fn upsert(self, conn: &mut DbConnection) -> Result<Participant> {
        let participant = diesel::insert_into(event_participants::table)
            .values(&self)
            .on_conflict((event_participants::event_id, event_participants::user_id))
            .do_update()
            .set((
                event_participants::status.eq(excluded(event_participants::status)),
                event_participants::responded_at.eq(excluded(event_participants::responded_at)),
            ))
            .get_result(conn)?;

        Ok(participant)
    }
}
