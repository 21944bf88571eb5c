// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Events of a group and the members' responses to them
use crate::store::{GroupStore, StoreTx};
use crate::{policy, GroupError, GroupResult, Identity};
use chrono::{DateTime, Utc};
use db_storage::events::{Event, EventId, NewEvent, Participant};
use db_storage::groups::{Group, GroupId};
use db_storage::users::{User, UserId};
use std::collections::BTreeMap;
use std::sync::Arc;
use types::core::ParticipationStatus;
use validator::Validate;

#[derive(Debug, Clone, Validate)]
pub struct NewEventRequest {
    #[validate(length(min = 1, max = 200), custom = "crate::validation::not_blank")]
    pub title: String,
    #[validate(length(min = 1, max = 4000), custom = "crate::validation::not_blank")]
    pub description: String,
    pub event_date: DateTime<Utc>,
    #[validate(length(max = 300))]
    pub location: Option<String>,
}

/// An event with its group, creator and all responses to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    pub event: Event,
    pub group: Group,
    pub creator: User,
    /// Responses in the order they were given
    pub participants: Vec<(Participant, User)>,
}

pub struct EventManager<S> {
    store: Arc<S>,
}

impl<S> Clone for EventManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

/// Loads group, creator and responses of each event, looking up every group and creator once
fn load_details(tx: &mut dyn StoreTx, events: Vec<Event>) -> GroupResult<Vec<EventDetails>> {
    let mut groups: BTreeMap<GroupId, Group> = BTreeMap::new();
    let mut creators: BTreeMap<UserId, User> = BTreeMap::new();

    events
        .into_iter()
        .map(|event| -> GroupResult<EventDetails> {
            let group = match groups.get(&event.group_id) {
                Some(group) => group.clone(),
                None => {
                    let group = tx
                        .find_group(event.group_id)?
                        .ok_or(GroupError::NotFound)?;
                    groups.insert(group.id, group.clone());
                    group
                }
            };

            let creator = match creators.get(&event.creator_id) {
                Some(creator) => creator.clone(),
                None => {
                    let creator = tx
                        .find_user(event.creator_id)?
                        .ok_or(GroupError::NotFound)?;
                    creators.insert(creator.id, creator.clone());
                    creator
                }
            };

            let participants = tx.participants_for_event(event.id)?;

            Ok(EventDetails {
                event,
                group,
                creator,
                participants,
            })
        })
        .collect()
}

impl<S: GroupStore> EventManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates an event in the group, only accepted members may do so
    #[tracing::instrument(err, skip_all, fields(%group, %creator))]
    pub fn create_event(
        &self,
        group: GroupId,
        creator: UserId,
        request: NewEventRequest,
    ) -> GroupResult<Event> {
        request.validate()?;

        self.store.transaction(|tx| {
            let group = tx
                .find_group_for_update(group)?
                .ok_or(GroupError::NotFound)?;
            let membership = tx.find_membership(group.id, creator)?;

            if !policy::is_accepted_member(&group, membership.as_slice(), creator) {
                return Err(GroupError::Unauthorized);
            }

            let now = Utc::now();

            let event = tx.insert_event(NewEvent {
                group_id: group.id,
                creator_id: creator,
                title: request.title,
                description: request.description,
                event_date: request.event_date,
                location: request.location,
                created_at: now,
            })?;

            Ok(event)
        })
    }

    /// Records the user's response to the event, replacing an earlier one
    ///
    /// Returns `false` if the event does not exist or the user is not an accepted member of
    /// the event's group.
    #[tracing::instrument(err, skip_all, fields(%event, %user, %status))]
    pub fn respond_to_event(
        &self,
        event: EventId,
        user: UserId,
        status: ParticipationStatus,
    ) -> GroupResult<bool> {
        self.store.transaction(|tx| {
            let Some(event) = tx.find_event(event)? else {
                return Ok(false);
            };
            let Some(group) = tx.find_group(event.group_id)? else {
                return Ok(false);
            };
            let membership = tx.find_membership(group.id, user)?;

            if !policy::is_accepted_member(&group, membership.as_slice(), user) {
                return Ok(false);
            }

            tx.upsert_participant(Participant {
                event_id: event.id,
                user_id: user,
                status,
                responded_at: Utc::now(),
            })?;

            Ok(true)
        })
    }

    /// Deletes the event and all responses to it
    #[tracing::instrument(err, skip_all, fields(%event, user = %identity.user_id))]
    pub fn delete_event(&self, event: EventId, identity: Identity) -> GroupResult<()> {
        self.store.transaction(|tx| {
            let event = tx.find_event(event)?.ok_or(GroupError::NotFound)?;
            let group = tx
                .find_group_for_update(event.group_id)?
                .ok_or(GroupError::NotFound)?;

            if !policy::can_manage_event(&event, &group, identity.user_id, identity.is_admin) {
                return Err(GroupError::Unauthorized);
            }

            tx.delete_event(event.id)?;

            Ok(())
        })
    }

    /// Events of the group, latest event date first
    #[tracing::instrument(err, skip_all, fields(%group))]
    pub fn events_for_group(&self, group: GroupId) -> GroupResult<Vec<EventDetails>> {
        self.store.transaction(|tx| {
            let events = tx.events_for_group(group)?;
            load_details(tx, events)
        })
    }

    #[tracing::instrument(err, skip_all, fields(%event))]
    pub fn event_details(&self, event: EventId) -> GroupResult<Option<EventDetails>> {
        self.store.transaction(|tx| {
            let Some(event) = tx.find_event(event)? else {
                return Ok(None);
            };

            Ok(load_details(tx, vec![event])?.pop())
        })
    }

    /// Events created by the user, latest event date first
    #[tracing::instrument(err, skip_all, fields(%user))]
    pub fn events_by_organizer(&self, user: UserId) -> GroupResult<Vec<EventDetails>> {
        self.store.transaction(|tx| {
            let events = tx.events_by_creator(user)?;
            load_details(tx, events)
        })
    }

    /// Events the user responded to with [`ParticipationStatus::Going`], latest event date first
    #[tracing::instrument(err, skip_all, fields(%user))]
    pub fn events_user_is_attending(&self, user: UserId) -> GroupResult<Vec<EventDetails>> {
        self.store.transaction(|tx| {
            let events = tx.events_attending(user)?;
            load_details(tx, events)
        })
    }
}
