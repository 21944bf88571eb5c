// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use super::{GroupStore, StoreTx};
use crate::GroupResult;
use database::{DatabaseError, Result};
use db_storage::events::{Event, EventId, NewEvent, Participant};
use db_storage::groups::{Group, GroupId, Membership, NewGroup, NewMembership, UpdateGroup};
use db_storage::invites::{Invite, InviteId, InviteWithGroupAndInviter, NewInvite};
use db_storage::messages::{Message, MessageId, NewMessage, UpdateMessage};
use db_storage::users::{NewUser, User, UserId};
use parking_lot::Mutex;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;

/// [`GroupStore`] keeping all rows in process
///
/// A transaction holds the lock for its whole duration and works on a copy of the tables
/// which replaces the stored tables only if the transaction succeeds. Enforces the same
/// keys and references as the database schema.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GroupStore for MemoryStore {
    fn transaction<T, F>(&self, f: F) -> GroupResult<T>
    where
        F: FnOnce(&mut dyn StoreTx) -> GroupResult<T>,
    {
        let mut tables = self.tables.lock();
        let mut working_copy = tables.clone();

        let result = f(&mut working_copy);

        if result.is_ok() {
            *tables = working_copy;
        } else {
            log::debug!("Rolling back in-memory transaction");
        }

        result
    }
}

#[derive(Debug, Clone, Default)]
struct Sequences {
    user: i64,
    group: i64,
    invite: i64,
    event: i64,
    message: i64,
}

fn next(sequence: &mut i64) -> i64 {
    *sequence += 1;
    *sequence
}

#[derive(Debug, Clone, Default)]
struct Tables {
    sequences: Sequences,
    users: BTreeMap<UserId, User>,
    groups: BTreeMap<GroupId, Group>,
    memberships: BTreeMap<(GroupId, UserId), Membership>,
    invites: BTreeMap<InviteId, Invite>,
    events: BTreeMap<EventId, Event>,
    participants: BTreeMap<(EventId, UserId), Participant>,
    messages: BTreeMap<MessageId, Message>,
}

fn foreign_key_violation(table: &str, column: &str) -> DatabaseError {
    DatabaseError::Custom(format!(
        "insert or update on table \"{table}\" violates foreign key constraint on \"{column}\""
    ))
}

impl Tables {
    fn user(&self, id: UserId) -> Result<&User> {
        self.users.get(&id).ok_or(DatabaseError::NotFound)
    }

    fn group(&self, id: GroupId) -> Result<&Group> {
        self.groups.get(&id).ok_or(DatabaseError::NotFound)
    }

    fn check_user(&self, id: UserId, table: &str, column: &str) -> Result<()> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(foreign_key_violation(table, column))
        }
    }

    fn check_group(&self, id: GroupId, table: &str) -> Result<()> {
        if self.groups.contains_key(&id) {
            Ok(())
        } else {
            Err(foreign_key_violation(table, "group_id"))
        }
    }

    fn sorted_events<P>(&self, predicate: P) -> Vec<Event>
    where
        P: Fn(&Event) -> bool,
    {
        let mut events: Vec<Event> = self
            .events
            .values()
            .filter(|event| predicate(event))
            .cloned()
            .collect();
        events.sort_by_key(|event| Reverse((event.event_date, event.id)));
        events
    }

    fn remove_event(&mut self, id: EventId) -> bool {
        self.participants.retain(|(event_id, _), _| *event_id != id);
        self.events.remove(&id).is_some()
    }
}

impl StoreTx for Tables {
    fn find_user(&mut self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.get(&id).cloned())
    }

    fn insert_user(&mut self, user: NewUser) -> Result<User> {
        let user = User {
            id: UserId::from(next(&mut self.sequences.user)),
            display_name: user.display_name,
            created_at: user.created_at,
        };
        self.users.insert(user.id, user.clone());

        Ok(user)
    }

    fn find_group(&mut self, id: GroupId) -> Result<Option<Group>> {
        Ok(self.groups.get(&id).cloned())
    }

    fn find_group_for_update(&mut self, id: GroupId) -> Result<Option<Group>> {
        // The store lock already serializes every transaction
        self.find_group(id)
    }

    fn all_groups(&mut self) -> Result<Vec<Group>> {
        let mut groups: Vec<Group> = self.groups.values().cloned().collect();
        groups.sort_by_key(|group| Reverse((group.created_at, group.id)));

        Ok(groups)
    }

    fn groups_for_member(&mut self, user: UserId) -> Result<Vec<Group>> {
        let mut groups: Vec<Group> = self
            .memberships
            .values()
            .filter(|m| m.user_id == user && m.is_accepted)
            .filter_map(|m| self.groups.get(&m.group_id).cloned())
            .collect();
        groups.sort_by_key(|group| Reverse((group.created_at, group.id)));

        Ok(groups)
    }

    fn insert_group(&mut self, group: NewGroup) -> Result<Group> {
        self.check_user(group.moderator_id, "groups", "moderator_id")?;

        let group = Group {
            id: GroupId::from(next(&mut self.sequences.group)),
            name: group.name,
            description: group.description,
            created_at: group.created_at,
            moderator_id: group.moderator_id,
        };
        self.groups.insert(group.id, group.clone());

        Ok(group)
    }

    fn update_group(&mut self, id: GroupId, update: UpdateGroup) -> Result<Group> {
        let group = self.groups.get_mut(&id).ok_or(DatabaseError::NotFound)?;
        group.name = update.name;
        group.description = update.description;

        Ok(group.clone())
    }

    fn set_moderator(&mut self, id: GroupId, moderator: UserId) -> Result<Group> {
        self.check_user(moderator, "groups", "moderator_id")?;

        let group = self.groups.get_mut(&id).ok_or(DatabaseError::NotFound)?;
        group.moderator_id = moderator;

        Ok(group.clone())
    }

    fn delete_group(&mut self, id: GroupId) -> Result<bool> {
        let event_ids: Vec<EventId> = self
            .events
            .values()
            .filter(|event| event.group_id == id)
            .map(|event| event.id)
            .collect();
        for event_id in event_ids {
            self.remove_event(event_id);
        }

        self.messages.retain(|_, message| message.group_id != id);
        self.invites.retain(|_, invite| invite.group_id != id);
        self.memberships.retain(|(group_id, _), _| *group_id != id);

        Ok(self.groups.remove(&id).is_some())
    }

    fn find_membership(&mut self, group: GroupId, user: UserId) -> Result<Option<Membership>> {
        Ok(self.memberships.get(&(group, user)).cloned())
    }

    fn memberships_for_group(&mut self, group: GroupId) -> Result<Vec<(Membership, User)>> {
        let mut memberships = self
            .memberships
            .values()
            .filter(|m| m.group_id == group)
            .map(|m| Ok((m.clone(), self.user(m.user_id)?.clone())))
            .collect::<Result<Vec<_>>>()?;
        memberships.sort_by_key(|(m, _)| (m.joined_at, m.user_id));

        Ok(memberships)
    }

    fn try_insert_membership(&mut self, membership: NewMembership) -> Result<bool> {
        self.check_user(membership.user_id, "group_memberships", "user_id")?;
        self.check_group(membership.group_id, "group_memberships")?;

        let key = (membership.group_id, membership.user_id);
        if self.memberships.contains_key(&key) {
            return Ok(false);
        }

        self.memberships.insert(
            key,
            Membership {
                user_id: membership.user_id,
                group_id: membership.group_id,
                joined_at: membership.joined_at,
                is_accepted: membership.is_accepted,
            },
        );

        Ok(true)
    }

    fn accept_membership(&mut self, group: GroupId, user: UserId) -> Result<bool> {
        match self.memberships.get_mut(&(group, user)) {
            Some(membership) if !membership.is_accepted => {
                membership.is_accepted = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn delete_membership(&mut self, group: GroupId, user: UserId) -> Result<bool> {
        Ok(self.memberships.remove(&(group, user)).is_some())
    }

    fn find_invite(&mut self, id: InviteId) -> Result<Option<Invite>> {
        Ok(self.invites.get(&id).cloned())
    }

    fn open_invite_exists(&mut self, group: GroupId, user: UserId) -> Result<bool> {
        Ok(self
            .invites
            .values()
            .any(|i| i.group_id == group && i.invited_user_id == user && i.is_open()))
    }

    fn insert_invite(&mut self, invite: NewInvite) -> Result<Option<Invite>> {
        self.check_group(invite.group_id, "group_invites")?;
        self.check_user(invite.inviter_id, "group_invites", "inviter_id")?;
        self.check_user(invite.invited_user_id, "group_invites", "invited_user_id")?;

        let is_open = !invite.is_accepted && !invite.is_declined;
        if is_open && self.open_invite_exists(invite.group_id, invite.invited_user_id)? {
            return Ok(None);
        }

        let invite = Invite {
            id: InviteId::from(next(&mut self.sequences.invite)),
            group_id: invite.group_id,
            inviter_id: invite.inviter_id,
            invited_user_id: invite.invited_user_id,
            invited_at: invite.invited_at,
            is_accepted: invite.is_accepted,
            is_declined: invite.is_declined,
        };
        self.invites.insert(invite.id, invite.clone());

        Ok(Some(invite))
    }

    fn mark_invite(
        &mut self,
        id: InviteId,
        is_accepted: bool,
        is_declined: bool,
    ) -> Result<Invite> {
        let (group_id, invited_user_id, was_open) = self
            .invites
            .get(&id)
            .map(|invite| (invite.group_id, invite.invited_user_id, invite.is_open()))
            .ok_or(DatabaseError::NotFound)?;

        let reopens = !was_open && !is_accepted && !is_declined;
        if reopens && self.open_invite_exists(group_id, invited_user_id)? {
            return Err(DatabaseError::UniqueViolation(
                "duplicate key value violates unique constraint \"group_invites_open_idx\"".into(),
            ));
        }

        let invite = self.invites.get_mut(&id).ok_or(DatabaseError::NotFound)?;
        invite.is_accepted = is_accepted;
        invite.is_declined = is_declined;

        Ok(invite.clone())
    }

    fn open_invites_for_user(&mut self, user: UserId) -> Result<Vec<InviteWithGroupAndInviter>> {
        let mut invites = self
            .invites
            .values()
            .filter(|invite| invite.invited_user_id == user && invite.is_open())
            .map(|invite| {
                Ok((
                    invite.clone(),
                    self.group(invite.group_id)?.clone(),
                    self.user(invite.inviter_id)?.clone(),
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        invites.sort_by_key(|(invite, _, _)| Reverse((invite.invited_at, invite.id)));

        Ok(invites)
    }

    fn open_invites_for_group(&mut self, group: GroupId) -> Result<Vec<UserId>> {
        let mut invites: Vec<&Invite> = self
            .invites
            .values()
            .filter(|invite| invite.group_id == group && invite.is_open())
            .collect();
        invites.sort_by_key(|invite| (invite.invited_at, invite.id));

        Ok(invites
            .into_iter()
            .map(|invite| invite.invited_user_id)
            .collect())
    }

    fn find_event(&mut self, id: EventId) -> Result<Option<Event>> {
        Ok(self.events.get(&id).cloned())
    }

    fn insert_event(&mut self, event: NewEvent) -> Result<Event> {
        self.check_group(event.group_id, "group_events")?;
        self.check_user(event.creator_id, "group_events", "creator_id")?;

        let event = Event {
            id: EventId::from(next(&mut self.sequences.event)),
            group_id: event.group_id,
            creator_id: event.creator_id,
            title: event.title,
            description: event.description,
            event_date: event.event_date,
            location: event.location,
            created_at: event.created_at,
        };
        self.events.insert(event.id, event.clone());

        Ok(event)
    }

    fn delete_event(&mut self, id: EventId) -> Result<bool> {
        Ok(self.remove_event(id))
    }

    fn events_for_group(&mut self, group: GroupId) -> Result<Vec<Event>> {
        Ok(self.sorted_events(|event| event.group_id == group))
    }

    fn events_by_creator(&mut self, user: UserId) -> Result<Vec<Event>> {
        Ok(self.sorted_events(|event| event.creator_id == user))
    }

    fn events_attending(&mut self, user: UserId) -> Result<Vec<Event>> {
        let participants = &self.participants;

        Ok(self.sorted_events(|event| {
            participants
                .get(&(event.id, user))
                .map_or(false, |p| p.status.is_attending())
        }))
    }

    fn participants_for_event(&mut self, event: EventId) -> Result<Vec<(Participant, User)>> {
        let mut participants = self
            .participants
            .values()
            .filter(|p| p.event_id == event)
            .map(|p| Ok((p.clone(), self.user(p.user_id)?.clone())))
            .collect::<Result<Vec<_>>>()?;
        participants.sort_by_key(|(p, _)| (p.responded_at, p.user_id));

        Ok(participants)
    }

    fn upsert_participant(&mut self, participant: Participant) -> Result<Participant> {
        if !self.events.contains_key(&participant.event_id) {
            return Err(foreign_key_violation("event_participants", "event_id"));
        }
        self.check_user(participant.user_id, "event_participants", "user_id")?;

        self.participants.insert(
            (participant.event_id, participant.user_id),
            participant.clone(),
        );

        Ok(participant)
    }

    fn find_message(&mut self, id: MessageId) -> Result<Option<Message>> {
        Ok(self.messages.get(&id).cloned())
    }

    fn insert_message(&mut self, message: NewMessage) -> Result<Message> {
        self.check_group(message.group_id, "group_messages")?;
        self.check_user(message.author_id, "group_messages", "author_id")?;

        let message = Message {
            id: MessageId::from(next(&mut self.sequences.message)),
            group_id: message.group_id,
            author_id: message.author_id,
            content: message.content,
            sent_at: message.sent_at,
            edited_at: None,
        };
        self.messages.insert(message.id, message.clone());

        Ok(message)
    }

    fn update_message(&mut self, id: MessageId, update: UpdateMessage) -> Result<Message> {
        let message = self.messages.get_mut(&id).ok_or(DatabaseError::NotFound)?;
        message.content = update.content;
        message.edited_at = Some(update.edited_at);

        Ok(message.clone())
    }

    fn delete_message(&mut self, id: MessageId) -> Result<bool> {
        Ok(self.messages.remove(&id).is_some())
    }

    fn messages_for_group(&mut self, group: GroupId) -> Result<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .messages
            .values()
            .filter(|message| message.group_id == group)
            .cloned()
            .collect();
        messages.sort_by_key(|message| (message.sent_at, message.id));

        Ok(messages)
    }
}
