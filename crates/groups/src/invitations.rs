// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Invitations of users into groups by the group's moderator
use crate::store::GroupStore;
use crate::{policy, GroupError, GroupResult};
use chrono::Utc;
use db_storage::groups::{Group, GroupId, NewMembership};
use db_storage::invites::{Invite, InviteId, NewInvite};
use db_storage::users::{User, UserId};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteOutcome {
    Sent(Invite),
    /// Only the moderator may invite users
    NotModerator,
    /// The invited user already has a pending or accepted membership
    AlreadyMember,
    /// The invited user already has an open invite for the group
    AlreadyInvited,
}

impl InviteOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Sent(_))
    }
}

/// An open invite together with the group it is for and the user who sent it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInvite {
    pub invite: Invite,
    pub group: Group,
    pub inviter: User,
}

pub struct InvitationManager<S> {
    store: Arc<S>,
}

impl<S> Clone for InvitationManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: GroupStore> InvitationManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    #[tracing::instrument(err, skip_all, fields(%group, %inviter, %invited))]
    pub fn send_invite(
        &self,
        group: GroupId,
        inviter: UserId,
        invited: UserId,
    ) -> GroupResult<InviteOutcome> {
        self.store.transaction(|tx| {
            let group = tx
                .find_group_for_update(group)?
                .ok_or(GroupError::NotFound)?;
            tx.find_user(invited)?.ok_or(GroupError::NotFound)?;

            if !policy::is_moderator(&group, inviter) {
                return Ok(InviteOutcome::NotModerator);
            }

            if tx.find_membership(group.id, invited)?.is_some() {
                return Ok(InviteOutcome::AlreadyMember);
            }

            if tx.open_invite_exists(group.id, invited)? {
                return Ok(InviteOutcome::AlreadyInvited);
            }

            let invite = tx.insert_invite(NewInvite {
                group_id: group.id,
                inviter_id: inviter,
                invited_user_id: invited,
                invited_at: Utc::now(),
                is_accepted: false,
                is_declined: false,
            })?;

            Ok(invite.map_or(InviteOutcome::AlreadyInvited, InviteOutcome::Sent))
        })
    }

    /// Open invites of the user, newest first
    #[tracing::instrument(err, skip_all, fields(%user))]
    pub fn pending_invites_for_user(&self, user: UserId) -> GroupResult<Vec<PendingInvite>> {
        self.store.transaction(|tx| {
            let invites = tx
                .open_invites_for_user(user)?
                .into_iter()
                .map(|(invite, group, inviter)| PendingInvite {
                    invite,
                    group,
                    inviter,
                })
                .collect();

            Ok(invites)
        })
    }

    /// Ids of all users with an open invite for the group
    #[tracing::instrument(err, skip_all, fields(%group))]
    pub fn pending_invites_for_group(&self, group: GroupId) -> GroupResult<Vec<UserId>> {
        self.store
            .transaction(|tx| Ok(tx.open_invites_for_group(group)?))
    }

    #[tracing::instrument(err, skip_all, fields(%user))]
    pub fn pending_invite_count(&self, user: UserId) -> GroupResult<usize> {
        self.store
            .transaction(|tx| Ok(tx.open_invites_for_user(user)?.len()))
    }

    /// Accepts the invite and makes the invited user an accepted member
    ///
    /// Accepting an already accepted invite again changes nothing.
    #[tracing::instrument(err, skip_all, fields(%invite, %user))]
    pub fn accept_invite(&self, invite: InviteId, user: UserId) -> GroupResult<()> {
        self.store.transaction(|tx| {
            let invite = tx.find_invite(invite)?.ok_or(GroupError::NotFound)?;

            if invite.invited_user_id != user {
                return Err(GroupError::Unauthorized);
            }

            if invite.is_declined {
                return Err(GroupError::conflict("the invite was already declined"));
            }

            if invite.is_accepted {
                return Ok(());
            }

            tx.find_group_for_update(invite.group_id)?
                .ok_or(GroupError::NotFound)?;

            tx.mark_invite(invite.id, true, false)?;

            let inserted = tx.try_insert_membership(NewMembership {
                user_id: user,
                group_id: invite.group_id,
                joined_at: Utc::now(),
                is_accepted: true,
            })?;

            if !inserted {
                // A join request was sent in the meantime, the invite settles it
                tx.accept_membership(invite.group_id, user)?;
            }

            Ok(())
        })
    }

    /// Declines the invite, the invited user does not become a member
    #[tracing::instrument(err, skip_all, fields(%invite, %user))]
    pub fn decline_invite(&self, invite: InviteId, user: UserId) -> GroupResult<()> {
        self.store.transaction(|tx| {
            let invite = tx.find_invite(invite)?.ok_or(GroupError::NotFound)?;

            if invite.invited_user_id != user {
                return Err(GroupError::Unauthorized);
            }

            if invite.is_accepted {
                return Err(GroupError::conflict("the invite was already accepted"));
            }

            if !invite.is_declined {
                tx.mark_invite(invite.id, false, true)?;
            }

            Ok(())
        })
    }
}
