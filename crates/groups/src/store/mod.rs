// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Persistence gateway of the group subsystem
//!
//! [`GroupStore`] hands out a [`StoreTx`] for the duration of one atomic unit of work.
//! Two backends exist: [`PgStore`] on top of the diesel models and [`MemoryStore`] which
//! keeps all rows in process.
use crate::GroupResult;
use database::Result;
use db_storage::events::{Event, EventId, NewEvent, Participant};
use db_storage::groups::{Group, GroupId, Membership, NewGroup, NewMembership, UpdateGroup};
use db_storage::invites::{Invite, InviteId, InviteWithGroupAndInviter, NewInvite};
use db_storage::messages::{Message, MessageId, NewMessage, UpdateMessage};
use db_storage::users::{NewUser, User, UserId};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Runs units of work atomically
pub trait GroupStore: Send + Sync {
    /// Runs `f` inside a transaction
    ///
    /// All writes done through the [`StoreTx`] are committed if `f` returns `Ok`, and none
    /// of them if it returns `Err`.
    fn transaction<T, F>(&self, f: F) -> GroupResult<T>
    where
        F: FnOnce(&mut dyn StoreTx) -> GroupResult<T>;
}

/// Row level operations available inside a [`GroupStore::transaction`]
///
/// Lookups of single rows return `None` for missing rows. Updates of missing rows fail
/// with [`database::DatabaseError::NotFound`].
pub trait StoreTx {
    fn find_user(&mut self, id: UserId) -> Result<Option<User>>;
    fn insert_user(&mut self, user: NewUser) -> Result<User>;

    fn find_group(&mut self, id: GroupId) -> Result<Option<Group>>;
    /// Like [`StoreTx::find_group`], additionally locks the group until the transaction ends
    fn find_group_for_update(&mut self, id: GroupId) -> Result<Option<Group>>;
    fn all_groups(&mut self) -> Result<Vec<Group>>;
    /// Groups the user holds an accepted membership in
    fn groups_for_member(&mut self, user: UserId) -> Result<Vec<Group>>;
    fn insert_group(&mut self, group: NewGroup) -> Result<Group>;
    fn update_group(&mut self, id: GroupId, update: UpdateGroup) -> Result<Group>;
    fn set_moderator(&mut self, id: GroupId, moderator: UserId) -> Result<Group>;
    /// Deletes the group and every membership, invite, event, participant and message of it
    fn delete_group(&mut self, id: GroupId) -> Result<bool>;

    fn find_membership(&mut self, group: GroupId, user: UserId) -> Result<Option<Membership>>;
    /// All memberships of the group, pending included, ordered by join date
    fn memberships_for_group(&mut self, group: GroupId) -> Result<Vec<(Membership, User)>>;
    /// Returns `false` if the user already has a membership row for the group
    fn try_insert_membership(&mut self, membership: NewMembership) -> Result<bool>;
    /// Flips a pending membership to accepted, returns `false` if none was pending
    fn accept_membership(&mut self, group: GroupId, user: UserId) -> Result<bool>;
    fn delete_membership(&mut self, group: GroupId, user: UserId) -> Result<bool>;

    fn find_invite(&mut self, id: InviteId) -> Result<Option<Invite>>;
    fn open_invite_exists(&mut self, group: GroupId, user: UserId) -> Result<bool>;
    /// Returns `None` if an open invite for the same group and user exists
    fn insert_invite(&mut self, invite: NewInvite) -> Result<Option<Invite>>;
    fn mark_invite(&mut self, id: InviteId, is_accepted: bool, is_declined: bool)
        -> Result<Invite>;
    fn open_invites_for_user(&mut self, user: UserId) -> Result<Vec<InviteWithGroupAndInviter>>;
    fn open_invites_for_group(&mut self, group: GroupId) -> Result<Vec<UserId>>;

    fn find_event(&mut self, id: EventId) -> Result<Option<Event>>;
    fn insert_event(&mut self, event: NewEvent) -> Result<Event>;
    /// Deletes the event and all responses to it
    fn delete_event(&mut self, id: EventId) -> Result<bool>;
    fn events_for_group(&mut self, group: GroupId) -> Result<Vec<Event>>;
    fn events_by_creator(&mut self, user: UserId) -> Result<Vec<Event>>;
    /// Events the user responded to with [`types::core::ParticipationStatus::Going`]
    fn events_attending(&mut self, user: UserId) -> Result<Vec<Event>>;

    fn participants_for_event(&mut self, event: EventId) -> Result<Vec<(Participant, User)>>;
    /// Inserts the response or overwrites status and response time of an existing one
    fn upsert_participant(&mut self, participant: Participant) -> Result<Participant>;

    fn find_message(&mut self, id: MessageId) -> Result<Option<Message>>;
    fn insert_message(&mut self, message: NewMessage) -> Result<Message>;
    fn update_message(&mut self, id: MessageId, update: UpdateMessage) -> Result<Message>;
    fn delete_message(&mut self, id: MessageId) -> Result<bool>;
    fn messages_for_group(&mut self, group: GroupId) -> Result<Vec<Message>>;
}
