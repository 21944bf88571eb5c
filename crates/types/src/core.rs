// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Core types of huddle.
//!
//! All core types are simple types (e.g. newtypes of primitive or other simple types),
//! and typically used by other types in this crate.

mod event_id;
mod group_id;
mod invite_id;
mod message_id;
mod participation_status;
mod user_id;

pub use event_id::EventId;
pub use group_id::GroupId;
pub use invite_id::InviteId;
pub use message_id::MessageId;
pub use participation_status::ParticipationStatus;
pub use user_id::UserId;
