// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Group creation, join requests, moderation of members and moderator succession
use crate::store::GroupStore;
use crate::succession::{choose_successor, Succession};
use crate::{policy, GroupError, GroupResult, Identity};
use chrono::Utc;
use db_storage::groups::{Group, GroupId, Membership, NewGroup, NewMembership, UpdateGroup};
use db_storage::messages::Message;
use db_storage::users::{User, UserId};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Clone, Validate)]
pub struct NewGroupRequest {
    #[validate(length(min = 1, max = 100), custom = "crate::validation::not_blank")]
    pub name: String,
    #[validate(length(min = 1, max = 2000), custom = "crate::validation::not_blank")]
    pub description: String,
}

#[derive(Debug, Clone, Validate)]
pub struct UpdateGroupRequest {
    #[validate(length(min = 1, max = 100), custom = "crate::validation::not_blank")]
    pub name: String,
    #[validate(length(min = 1, max = 2000), custom = "crate::validation::not_blank")]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A pending membership was created and awaits the moderator's decision
    Requested,
    /// The user already had a pending or accepted membership
    AlreadyRequestedOrMember,
}

impl JoinOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Requested)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The user's membership was removed
    Left,
    /// The user had no membership to remove
    NotAMember,
    /// The moderator left and `successor` is the new moderator
    ModeratorHandedOver { successor: UserId },
    /// The moderator was the last accepted member, the group is gone
    GroupDeleted,
}

impl LeaveOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::NotAMember)
    }
}

/// A group with everything needed to present it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDetails {
    pub group: Group,
    pub moderator: User,
    /// Pending and accepted memberships ordered by join date
    pub members: Vec<(Membership, User)>,
    pub messages: Vec<Message>,
}

/// Manages groups and the memberships in them
pub struct MembershipManager<S> {
    store: Arc<S>,
    succession: Succession,
    rng: Arc<Mutex<StdRng>>,
}

impl<S> Clone for MembershipManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            succession: self.succession,
            rng: self.rng.clone(),
        }
    }
}

impl<S: GroupStore> MembershipManager<S> {
    pub fn new(store: Arc<S>, succession: Succession) -> Self {
        Self::with_rng(store, succession, StdRng::from_entropy())
    }

    /// Creates a manager drawing random successors from the given `rng`
    pub fn with_rng(store: Arc<S>, succession: Succession, rng: StdRng) -> Self {
        Self {
            store,
            succession,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Creates a group moderated by `founder`, who becomes its first accepted member
    #[tracing::instrument(err, skip_all, fields(%founder))]
    pub fn create_group(&self, founder: UserId, request: NewGroupRequest) -> GroupResult<Group> {
        request.validate()?;

        self.store.transaction(|tx| {
            tx.find_user(founder)?.ok_or(GroupError::NotFound)?;

            let now = Utc::now();

            let group = tx.insert_group(NewGroup {
                name: request.name,
                description: request.description,
                created_at: now,
                moderator_id: founder,
            })?;

            tx.try_insert_membership(NewMembership {
                user_id: founder,
                group_id: group.id,
                joined_at: now,
                is_accepted: true,
            })?;

            log::debug!("User {} created group {}", founder, group.id);

            Ok(group)
        })
    }

    /// Requests to join the group, the moderator has to accept the request
    #[tracing::instrument(err, skip_all, fields(%user, %group))]
    pub fn request_join(&self, user: UserId, group: GroupId) -> GroupResult<JoinOutcome> {
        self.store.transaction(|tx| {
            tx.find_group_for_update(group)?
                .ok_or(GroupError::NotFound)?;
            tx.find_user(user)?.ok_or(GroupError::NotFound)?;

            let inserted = tx.try_insert_membership(NewMembership {
                user_id: user,
                group_id: group,
                joined_at: Utc::now(),
                is_accepted: false,
            })?;

            if inserted {
                Ok(JoinOutcome::Requested)
            } else {
                Ok(JoinOutcome::AlreadyRequestedOrMember)
            }
        })
    }

    /// Accepts a pending join request of `target`
    ///
    /// Returns `false` if `target` had no pending request.
    #[tracing::instrument(err, skip_all, fields(%group, %target, %actor))]
    pub fn accept_member(&self, group: GroupId, target: UserId, actor: UserId) -> GroupResult<bool> {
        self.store.transaction(|tx| {
            let group = tx
                .find_group_for_update(group)?
                .ok_or(GroupError::NotFound)?;

            if !policy::is_moderator(&group, actor) {
                return Err(GroupError::Unauthorized);
            }

            Ok(tx.accept_membership(group.id, target)?)
        })
    }

    /// Declines a join request or removes a member
    ///
    /// The moderator cannot be removed this way, see [`MembershipManager::leave_group`].
    /// Returns `false` if `target` had no membership.
    #[tracing::instrument(err, skip_all, fields(%group, %target, %actor))]
    pub fn remove_member(&self, group: GroupId, target: UserId, actor: UserId) -> GroupResult<bool> {
        self.store.transaction(|tx| {
            let group = tx
                .find_group_for_update(group)?
                .ok_or(GroupError::NotFound)?;

            if !policy::is_moderator(&group, actor) {
                return Err(GroupError::Unauthorized);
            }

            if policy::is_moderator(&group, target) {
                return Err(GroupError::conflict(
                    "the moderator cannot be removed from the group, they have to leave it",
                ));
            }

            Ok(tx.delete_membership(group.id, target)?)
        })
    }

    /// Removes the user from the group
    ///
    /// A leaving moderator hands the group over to another accepted member chosen by the
    /// configured [`Succession`]. Without any other accepted member the group is deleted.
    #[tracing::instrument(err, skip_all, fields(%user, %group))]
    pub fn leave_group(&self, user: UserId, group: GroupId) -> GroupResult<LeaveOutcome> {
        self.store.transaction(|tx| {
            let group = tx
                .find_group_for_update(group)?
                .ok_or(GroupError::NotFound)?;

            if !policy::is_moderator(&group, user) {
                return if tx.delete_membership(group.id, user)? {
                    Ok(LeaveOutcome::Left)
                } else {
                    Ok(LeaveOutcome::NotAMember)
                };
            }

            let candidates: Vec<Membership> = tx
                .memberships_for_group(group.id)?
                .into_iter()
                .map(|(membership, _)| membership)
                .filter(|membership| membership.user_id != user)
                .collect();

            let successor = {
                let mut rng = self.rng.lock();
                choose_successor(self.succession, &candidates, &mut *rng)
            };

            match successor {
                Some(successor) => {
                    tx.set_moderator(group.id, successor)?;
                    tx.delete_membership(group.id, user)?;

                    log::debug!(
                        "Moderator {} left group {}, {} took over",
                        user,
                        group.id,
                        successor
                    );

                    Ok(LeaveOutcome::ModeratorHandedOver { successor })
                }
                None => {
                    tx.delete_group(group.id)?;

                    log::debug!("Last member {} left group {}, deleted it", user, group.id);

                    Ok(LeaveOutcome::GroupDeleted)
                }
            }
        })
    }

    /// Deletes the group and everything it owns
    #[tracing::instrument(err, skip_all, fields(%group, user = %identity.user_id))]
    pub fn delete_group(&self, group: GroupId, identity: Identity) -> GroupResult<()> {
        self.store.transaction(|tx| {
            let group = tx
                .find_group_for_update(group)?
                .ok_or(GroupError::NotFound)?;

            if !policy::can_manage_group(&group, identity.user_id, identity.is_admin) {
                return Err(GroupError::Unauthorized);
            }

            tx.delete_group(group.id)?;

            Ok(())
        })
    }

    /// Changes name and description of the group
    #[tracing::instrument(err, skip_all, fields(%group, user = %identity.user_id))]
    pub fn update_group(
        &self,
        group: GroupId,
        identity: Identity,
        request: UpdateGroupRequest,
    ) -> GroupResult<Group> {
        request.validate()?;

        self.store.transaction(|tx| {
            let group = tx
                .find_group_for_update(group)?
                .ok_or(GroupError::NotFound)?;

            if !policy::can_manage_group(&group, identity.user_id, identity.is_admin) {
                return Err(GroupError::Unauthorized);
            }

            let group = tx.update_group(
                group.id,
                UpdateGroup {
                    name: request.name,
                    description: request.description,
                },
            )?;

            Ok(group)
        })
    }

    /// All groups, newest first
    #[tracing::instrument(err, skip_all)]
    pub fn all_groups(&self) -> GroupResult<Vec<Group>> {
        self.store.transaction(|tx| Ok(tx.all_groups()?))
    }

    /// Groups the user is an accepted member of, newest first
    #[tracing::instrument(err, skip_all, fields(%user))]
    pub fn groups_for_user(&self, user: UserId) -> GroupResult<Vec<Group>> {
        self.store.transaction(|tx| Ok(tx.groups_for_member(user)?))
    }

    #[tracing::instrument(err, skip_all, fields(%group))]
    pub fn group_details(&self, group: GroupId) -> GroupResult<GroupDetails> {
        self.store.transaction(|tx| {
            let group = tx.find_group(group)?.ok_or(GroupError::NotFound)?;
            let moderator = tx
                .find_user(group.moderator_id)?
                .ok_or(GroupError::NotFound)?;
            let members = tx.memberships_for_group(group.id)?;
            let messages = tx.messages_for_group(group.id)?;

            Ok(GroupDetails {
                group,
                moderator,
                members,
                messages,
            })
        })
    }
}
