// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use super::schema::{
    event_participants, group_events, group_invites, group_memberships, group_messages, groups,
    users,
};
use super::users::{User, UserId};
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::{
    BoolExpressionMethods, Connection, ExpressionMethods, Identifiable, Insertable, QueryDsl,
    Queryable, RunQueryDsl,
};

pub use types::core::GroupId;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Associations)]
#[diesel(belongs_to(User, foreign_key = moderator_id))]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub moderator_id: UserId,
}

impl Group {
    #[tracing::instrument(err, skip_all, fields(%id))]
    pub fn get(conn: &mut DbConnection, id: GroupId) -> Result<Group> {
        let group = groups::table.filter(groups::id.eq(id)).get_result(conn)?;

        Ok(group)
    }

    /// Same as [`Group::get`] but locks the row until the surrounding transaction ends
    ///
    /// Every group scoped write takes this lock first, so concurrent membership changes of
    /// the same group are serialized.
    #[tracing::instrument(err, skip_all, fields(%id))]
    pub fn get_for_update(conn: &mut DbConnection, id: GroupId) -> Result<Group> {
        let group = groups::table
            .filter(groups::id.eq(id))
            .for_update()
            .get_result(conn)?;

        Ok(group)
    }

    /// Get all groups, newest first
    #[tracing::instrument(err, skip_all)]
    pub fn get_all(conn: &mut DbConnection) -> Result<Vec<Group>> {
        let groups = groups::table
            .order((groups::created_at.desc(), groups::id.desc()))
            .load(conn)?;

        Ok(groups)
    }

    /// Get all groups the user is an accepted member of, newest first
    #[tracing::instrument(err, skip_all, fields(%user_id))]
    pub fn get_all_for_member(conn: &mut DbConnection, user_id: UserId) -> Result<Vec<Group>> {
        let query = group_memberships::table
            .inner_join(groups::table)
            .filter(
                group_memberships::user_id
                    .eq(user_id)
                    .and(group_memberships::is_accepted.eq(true)),
            )
            .select(groups::all_columns)
            .order((groups::created_at.desc(), groups::id.desc()));

        let groups = query.load(conn)?;

        Ok(groups)
    }

    #[tracing::instrument(err, skip_all, fields(%id, %moderator_id))]
    pub fn set_moderator(
        conn: &mut DbConnection,
        id: GroupId,
        moderator_id: UserId,
    ) -> Result<Group> {
        let group = diesel::update(groups::table.filter(groups::id.eq(id)))
            .set(groups::moderator_id.eq(moderator_id))
            .get_result(conn)?;

        Ok(group)
    }

    /// Delete the group together with everything it owns
    ///
    /// Removes participants of the group's events, the events, messages, invites and
    /// memberships before the group row itself. Returns `false` if no group was deleted.
    #[tracing::instrument(err, skip_all, fields(%id))]
    pub fn delete_cascading(conn: &mut DbConnection, id: GroupId) -> Result<bool> {
        conn.transaction(|conn| {
            let group_event_ids = group_events::table
                .filter(group_events::group_id.eq(id))
                .select(group_events::id);

            diesel::delete(
                event_participants::table
                    .filter(event_participants::event_id.eq_any(group_event_ids)),
            )
            .execute(conn)?;

            diesel::delete(group_events::table.filter(group_events::group_id.eq(id)))
                .execute(conn)?;
            diesel::delete(group_messages::table.filter(group_messages::group_id.eq(id)))
                .execute(conn)?;
            diesel::delete(group_invites::table.filter(group_invites::group_id.eq(id)))
                .execute(conn)?;
            diesel::delete(group_memberships::table.filter(group_memberships::group_id.eq(id)))
                .execute(conn)?;

            let deleted = diesel::delete(groups::table.filter(groups::id.eq(id))).execute(conn)?;

            Ok(deleted == 1)
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = groups)]
pub struct NewGroup {
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub moderator_id: UserId,
}

impl NewGroup {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<Group> {
        let group = diesel::insert_into(groups::table)
            .values(self)
            .get_result(conn)?;

        Ok(group)
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = groups)]
pub struct UpdateGroup {
    pub name: String,
    pub description: String,
}

impl UpdateGroup {
    #[tracing::instrument(err, skip_all, fields(%id))]
    pub fn apply(self, conn: &mut DbConnection, id: GroupId) -> Result<Group> {
        let group = diesel::update(groups::table.filter(groups::id.eq(id)))
            .set(self)
            .get_result(conn)?;

        Ok(group)
    }
}

/// A user's relation to a group
///
/// A row without `is_accepted` is a pending join request.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Associations)]
#[diesel(table_name = group_memberships)]
#[diesel(primary_key(user_id, group_id))]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(belongs_to(Group, foreign_key = group_id))]
pub struct Membership {
    pub user_id: UserId,
    pub group_id: GroupId,
    pub joined_at: DateTime<Utc>,
    pub is_accepted: bool,
}

impl Membership {
    #[tracing::instrument(err, skip_all, fields(%group_id, %user_id))]
    pub fn get(conn: &mut DbConnection, group_id: GroupId, user_id: UserId) -> Result<Membership> {
        let membership = group_memberships::table
            .filter(
                group_memberships::group_id
                    .eq(group_id)
                    .and(group_memberships::user_id.eq(user_id)),
            )
            .get_result(conn)?;

        Ok(membership)
    }

    /// Get all memberships of a group with the member's user loaded alongside
    ///
    /// Pending memberships are included, ordered by join date
    #[tracing::instrument(err, skip_all, fields(%group_id))]
    pub fn get_all_for_group_with_users(
        conn: &mut DbConnection,
        group_id: GroupId,
    ) -> Result<Vec<(Membership, User)>> {
        let memberships = group_memberships::table
            .inner_join(users::table)
            .filter(group_memberships::group_id.eq(group_id))
            .order((group_memberships::joined_at, group_memberships::user_id))
            .load(conn)?;

        Ok(memberships)
    }

    /// Flips a pending membership to accepted
    ///
    /// Returns `false` if there was no pending membership
    #[tracing::instrument(err, skip_all, fields(%group_id, %user_id))]
    pub fn accept(conn: &mut DbConnection, group_id: GroupId, user_id: UserId) -> Result<bool> {
        let updated = diesel::update(
            group_memberships::table.filter(
                group_memberships::group_id
                    .eq(group_id)
                    .and(group_memberships::user_id.eq(user_id))
                    .and(group_memberships::is_accepted.eq(false)),
            ),
        )
        .set(group_memberships::is_accepted.eq(true))
        .execute(conn)?;

        Ok(updated == 1)
    }

    /// Deletes the membership regardless of its state
    ///
    /// Returns `false` if there was no membership
    #[tracing::instrument(err, skip_all, fields(%group_id, %user_id))]
    pub fn delete(conn: &mut DbConnection, group_id: GroupId, user_id: UserId) -> Result<bool> {
        let deleted = diesel::delete(
            group_memberships::table.filter(
                group_memberships::group_id
                    .eq(group_id)
                    .and(group_memberships::user_id.eq(user_id)),
            ),
        )
        .execute(conn)?;

        Ok(deleted == 1)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = group_memberships)]
pub struct NewMembership {
    pub user_id: UserId,
    pub group_id: GroupId,
    pub joined_at: DateTime<Utc>,
    pub is_accepted: bool,
}

impl NewMembership {
    /// Tries to insert the membership
    ///
    /// Returns `false` if the user already had a membership row for the group. The
    /// conflict is resolved inside the statement, an open transaction stays usable.
    #[tracing::instrument(err, skip_all, fields(user_id = %self.user_id, group_id = %self.group_id))]
    pub fn try_insert(self, conn: &mut DbConnection) -> Result<bool> {
        let inserted = diesel::insert_into(group_memberships::table)
            .values(self)
            .on_conflict_do_nothing()
            .execute(conn)?;

        Ok(inserted == 1)
    }
}
