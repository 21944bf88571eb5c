// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Group membership and event participation core
//!
//! Every operation runs as one [`store::GroupStore::transaction`]: it reads the current
//! rows, consults the [`policy`] and writes its changes atomically. Expected outcomes like
//! "already a member" are reported through outcome enums, only failures are errors.
//!
//! The managers are cheap to clone and meant to be called from a blocking context.

mod error;
mod identity;
mod validation;

pub mod events;
pub mod invitations;
pub mod membership;
pub mod messages;
pub mod policy;
pub mod store;
pub mod succession;

pub use error::{GroupError, GroupResult};
pub use events::{EventDetails, EventManager, NewEventRequest};
pub use identity::Identity;
pub use invitations::{InvitationManager, InviteOutcome, PendingInvite};
pub use membership::{
    GroupDetails, JoinOutcome, LeaveOutcome, MembershipManager, NewGroupRequest,
    UpdateGroupRequest,
};
pub use messages::MessageManager;
pub use succession::Succession;

pub use db_storage::events::{Event, EventId, Participant};
pub use db_storage::groups::{Group, GroupId, Membership};
pub use db_storage::invites::{Invite, InviteId};
pub use db_storage::messages::{Message, MessageId};
pub use db_storage::users::{User, UserId};
pub use types::core::ParticipationStatus;
