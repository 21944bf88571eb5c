// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use super::{GroupStore, StoreTx};
use crate::GroupResult;
use database::{Db, DbConnection, OptionalExt, Result};
use db_storage::events::{Event, EventId, NewEvent, Participant};
use db_storage::groups::{Group, GroupId, Membership, NewGroup, NewMembership, UpdateGroup};
use db_storage::invites::{Invite, InviteId, InviteWithGroupAndInviter, NewInvite};
use db_storage::messages::{Message, MessageId, NewMessage, UpdateMessage};
use db_storage::users::{NewUser, User, UserId};
use diesel::Connection;
use std::sync::Arc;
use types::core::ParticipationStatus;

/// [`GroupStore`] backed by the postgres database
#[derive(Debug, Clone)]
pub struct PgStore {
    db: Arc<Db>,
}

impl PgStore {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }
}

impl GroupStore for PgStore {
    fn transaction<T, F>(&self, f: F) -> GroupResult<T>
    where
        F: FnOnce(&mut dyn StoreTx) -> GroupResult<T>,
    {
        let mut conn = self.db.get_conn()?;

        conn.transaction(|conn| f(&mut PgTx { conn }))
    }
}

struct PgTx<'c> {
    conn: &'c mut DbConnection,
}

impl StoreTx for PgTx<'_> {
    fn find_user(&mut self, id: UserId) -> Result<Option<User>> {
        User::get(self.conn, id).optional()
    }

    fn insert_user(&mut self, user: NewUser) -> Result<User> {
        user.insert(self.conn)
    }

    fn find_group(&mut self, id: GroupId) -> Result<Option<Group>> {
        Group::get(self.conn, id).optional()
    }

    fn find_group_for_update(&mut self, id: GroupId) -> Result<Option<Group>> {
        Group::get_for_update(self.conn, id).optional()
    }

    fn all_groups(&mut self) -> Result<Vec<Group>> {
        Group::get_all(self.conn)
    }

    fn groups_for_member(&mut self, user: UserId) -> Result<Vec<Group>> {
        Group::get_all_for_member(self.conn, user)
    }

    fn insert_group(&mut self, group: NewGroup) -> Result<Group> {
        group.insert(self.conn)
    }

    fn update_group(&mut self, id: GroupId, update: UpdateGroup) -> Result<Group> {
        update.apply(self.conn, id)
    }

    fn set_moderator(&mut self, id: GroupId, moderator: UserId) -> Result<Group> {
        Group::set_moderator(self.conn, id, moderator)
    }

    fn delete_group(&mut self, id: GroupId) -> Result<bool> {
        Group::delete_cascading(self.conn, id)
    }

    fn find_membership(&mut self, group: GroupId, user: UserId) -> Result<Option<Membership>> {
        Membership::get(self.conn, group, user).optional()
    }

    fn memberships_for_group(&mut self, group: GroupId) -> Result<Vec<(Membership, User)>> {
        Membership::get_all_for_group_with_users(self.conn, group)
    }

    fn try_insert_membership(&mut self, membership: NewMembership) -> Result<bool> {
        membership.try_insert(self.conn)
    }

    fn accept_membership(&mut self, group: GroupId, user: UserId) -> Result<bool> {
        Membership::accept(self.conn, group, user)
    }

    fn delete_membership(&mut self, group: GroupId, user: UserId) -> Result<bool> {
        Membership::delete(self.conn, group, user)
    }

    fn find_invite(&mut self, id: InviteId) -> Result<Option<Invite>> {
        Invite::get(self.conn, id).optional()
    }

    fn open_invite_exists(&mut self, group: GroupId, user: UserId) -> Result<bool> {
        Invite::open_exists(self.conn, group, user)
    }

    fn insert_invite(&mut self, invite: NewInvite) -> Result<Option<Invite>> {
        invite.try_insert(self.conn)
    }

    fn mark_invite(
        &mut self,
        id: InviteId,
        is_accepted: bool,
        is_declined: bool,
    ) -> Result<Invite> {
        Invite::mark(self.conn, id, is_accepted, is_declined)
    }

    fn open_invites_for_user(&mut self, user: UserId) -> Result<Vec<InviteWithGroupAndInviter>> {
        Invite::get_open_for_user_with_group_and_inviter(self.conn, user)
    }

    fn open_invites_for_group(&mut self, group: GroupId) -> Result<Vec<UserId>> {
        Invite::get_open_invitees_for_group(self.conn, group)
    }

    fn find_event(&mut self, id: EventId) -> Result<Option<Event>> {
        Event::get(self.conn, id).optional()
    }

    fn insert_event(&mut self, event: NewEvent) -> Result<Event> {
        event.insert(self.conn)
    }

    fn delete_event(&mut self, id: EventId) -> Result<bool> {
        Event::delete_cascading(self.conn, id)
    }

    fn events_for_group(&mut self, group: GroupId) -> Result<Vec<Event>> {
        Event::get_all_for_group(self.conn, group)
    }

    fn events_by_creator(&mut self, user: UserId) -> Result<Vec<Event>> {
        Event::get_all_by_creator(self.conn, user)
    }

    fn events_attending(&mut self, user: UserId) -> Result<Vec<Event>> {
        Event::get_all_with_participant_status(self.conn, user, ParticipationStatus::Going)
    }

    fn participants_for_event(&mut self, event: EventId) -> Result<Vec<(Participant, User)>> {
        Participant::get_all_for_event_with_users(self.conn, event)
    }

    fn upsert_participant(&mut self, participant: Participant) -> Result<Participant> {
        participant.upsert(self.conn)
    }

    fn find_message(&mut self, id: MessageId) -> Result<Option<Message>> {
        Message::get(self.conn, id).optional()
    }

    fn insert_message(&mut self, message: NewMessage) -> Result<Message> {
        message.insert(self.conn)
    }

    fn update_message(&mut self, id: MessageId, update: UpdateMessage) -> Result<Message> {
        update.apply(self.conn, id)
    }

    fn delete_message(&mut self, id: MessageId) -> Result<bool> {
        Message::delete(self.conn, id)
    }

    fn messages_for_group(&mut self, group: GroupId) -> Result<Vec<Message>> {
        Message::get_all_for_group(self.conn, group)
    }
}
