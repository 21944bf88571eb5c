// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::groups::{Group, GroupId};
use crate::schema::{group_invites, groups, users};
use crate::users::{User, UserId};
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::{
    BoolExpressionMethods, ExpressionMethods, Identifiable, Insertable, JoinOnDsl,
    OptionalExtension, QueryDsl, Queryable, RunQueryDsl,
};

pub use types::core::InviteId;

/// Diesel invite struct
///
/// Represents an invitation of a user into a group, sent by the group's moderator.
/// An invite is open as long as it was neither accepted nor declined.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Associations)]
#[diesel(table_name = group_invites)]
#[diesel(belongs_to(Group, foreign_key = group_id))]
pub struct Invite {
    pub id: InviteId,
    pub group_id: GroupId,
    pub inviter_id: UserId,
    pub invited_user_id: UserId,
    pub invited_at: DateTime<Utc>,
    pub is_accepted: bool,
    pub is_declined: bool,
}

/// An open invite together with the invited group and the inviting user
pub type InviteWithGroupAndInviter = (Invite, Group, User);

impl Invite {
    pub fn is_open(&self) -> bool {
        !self.is_accepted && !self.is_declined
    }

    #[tracing::instrument(err, skip_all, fields(%id))]
    pub fn get(conn: &mut DbConnection, id: InviteId) -> Result<Invite> {
        let invite = group_invites::table
            .filter(group_invites::id.eq(id))
            .get_result(conn)?;

        Ok(invite)
    }

    /// Returns true if the user has an open invite for the group
    #[tracing::instrument(err, skip_all, fields(%group_id, %invited_user_id))]
    pub fn open_exists(
        conn: &mut DbConnection,
        group_id: GroupId,
        invited_user_id: UserId,
    ) -> Result<bool> {
        let query = group_invites::table
            .filter(
                group_invites::group_id
                    .eq(group_id)
                    .and(group_invites::invited_user_id.eq(invited_user_id))
                    .and(group_invites::is_accepted.eq(false))
                    .and(group_invites::is_declined.eq(false)),
            )
            .select(diesel::dsl::count_star());

        let count: i64 = query.get_result(conn)?;

        Ok(count > 0)
    }

    /// Set the accepted and declined flags of the invite
    #[tracing::instrument(err, skip_all, fields(%id, %is_accepted, %is_declined))]
    pub fn mark(
        conn: &mut DbConnection,
        id: InviteId,
        is_accepted: bool,
        is_declined: bool,
    ) -> Result<Invite> {
        let invite = diesel::update(group_invites::table.filter(group_invites::id.eq(id)))
            .set((
                group_invites::is_accepted.eq(is_accepted),
                group_invites::is_declined.eq(is_declined),
            ))
            .get_result(conn)?;

        Ok(invite)
    }

    /// Returns all open invites of the user, newest first, with the group and inviter loaded
    #[tracing::instrument(err, skip_all, fields(%invited_user_id))]
    pub fn get_open_for_user_with_group_and_inviter(
        conn: &mut DbConnection,
        invited_user_id: UserId,
    ) -> Result<Vec<InviteWithGroupAndInviter>> {
        // The invitee is a second reference into users, so only the inviter is joined
        let query = group_invites::table
            .inner_join(groups::table)
            .inner_join(users::table.on(group_invites::inviter_id.eq(users::id)))
            .filter(
                group_invites::invited_user_id
                    .eq(invited_user_id)
                    .and(group_invites::is_accepted.eq(false))
                    .and(group_invites::is_declined.eq(false)),
            )
            .select((
                group_invites::all_columns,
                groups::all_columns,
                users::all_columns,
            ))
            .order((group_invites::invited_at.desc(), group_invites::id.desc()));

        let invites = query.load(conn)?;

        Ok(invites)
    }

    /// Returns the ids of all users with an open invite for the group
    #[tracing::instrument(err, skip_all, fields(%group_id))]
    pub fn get_open_invitees_for_group(
        conn: &mut DbConnection,
        group_id: GroupId,
    ) -> Result<Vec<UserId>> {
        let query = group_invites::table
            .filter(
                group_invites::group_id
                    .eq(group_id)
                    .and(group_invites::is_accepted.eq(false))
                    .and(group_invites::is_declined.eq(false)),
            )
            .select(group_invites::invited_user_id)
            .order((group_invites::invited_at, group_invites::id));

        let user_ids = query.load(conn)?;

        Ok(user_ids)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = group_invites)]
pub struct NewInvite {
    pub group_id: GroupId,
    pub inviter_id: UserId,
    pub invited_user_id: UserId,
    pub invited_at: DateTime<Utc>,
    pub is_accepted: bool,
    pub is_declined: bool,
}

impl NewInvite {
    /// Tries to insert the invite
    ///
    /// Returns `None` if an open invite for the same group and user already exists.
    #[tracing::instrument(err, skip_all)]
    pub fn try_insert(self, conn: &mut DbConnection) -> Result<Option<Invite>> {
        let invite = diesel::insert_into(group_invites::table)
            .values(self)
            .on_conflict_do_nothing()
            .get_result(conn)
            .optional()?;

        Ok(invite)
    }
}
