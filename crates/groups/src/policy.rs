// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Authorization rules of the group subsystem
//!
//! Pure predicates over already loaded rows. The managers consult them before every write.
use db_storage::events::Event;
use db_storage::groups::{Group, Membership};
use db_storage::messages::Message;
use types::core::UserId;

pub fn is_moderator(group: &Group, user: UserId) -> bool {
    group.moderator_id == user
}

/// Returns true if the user holds an accepted membership in the group
///
/// The moderator always counts as accepted member.
pub fn is_accepted_member(group: &Group, memberships: &[Membership], user: UserId) -> bool {
    is_moderator(group, user)
        || memberships
            .iter()
            .any(|m| m.group_id == group.id && m.user_id == user && m.is_accepted)
}

pub fn can_manage_group(group: &Group, user: UserId, is_admin: bool) -> bool {
    is_admin || is_moderator(group, user)
}

/// Creator, moderator of the event's group or an administrator
pub fn can_manage_event(event: &Event, group: &Group, user: UserId, is_admin: bool) -> bool {
    event.creator_id == user || can_manage_group(group, user, is_admin)
}

/// Author, moderator of the message's group or an administrator
pub fn can_manage_message(message: &Message, group: &Group, user: UserId, is_admin: bool) -> bool {
    message.author_id == user || can_manage_group(group, user, is_admin)
}

/// Only the author or an administrator may change the content of a message
pub fn can_edit_message(message: &Message, user: UserId, is_admin: bool) -> bool {
    is_admin || message.author_id == user
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use types::core::{EventId, GroupId, MessageId};

    const MODERATOR: UserId = UserId::from(1);
    const MEMBER: UserId = UserId::from(2);
    const STRANGER: UserId = UserId::from(3);

    fn group() -> Group {
        Group {
            id: GroupId::from(10),
            name: "Wine Club".into(),
            description: "Tasting every friday".into(),
            created_at: Utc::now(),
            moderator_id: MODERATOR,
        }
    }

    fn membership(user_id: UserId, is_accepted: bool) -> Membership {
        Membership {
            user_id,
            group_id: GroupId::from(10),
            joined_at: Utc::now(),
            is_accepted,
        }
    }

    fn event(creator_id: UserId) -> Event {
        Event {
            id: EventId::from(100),
            group_id: GroupId::from(10),
            creator_id,
            title: "Tasting".into(),
            description: "Bring glasses".into(),
            event_date: Utc::now(),
            location: None,
            created_at: Utc::now(),
        }
    }

    fn message(author_id: UserId) -> Message {
        Message {
            id: MessageId::from(1000),
            group_id: GroupId::from(10),
            author_id,
            content: "Cheers".into(),
            sent_at: Utc::now(),
            edited_at: None,
        }
    }

    #[test]
    fn accepted_members() {
        let group = group();
        let memberships = [membership(MODERATOR, true), membership(MEMBER, true)];

        assert!(is_moderator(&group, MODERATOR));
        assert!(!is_moderator(&group, MEMBER));
        assert!(is_accepted_member(&group, &memberships, MODERATOR));
        assert!(is_accepted_member(&group, &memberships, MEMBER));
        assert!(!is_accepted_member(&group, &memberships, STRANGER));

        // The moderator counts even without a loaded membership
        assert!(is_accepted_member(&group, &[], MODERATOR));
    }

    #[test]
    fn pending_and_foreign_memberships_do_not_count() {
        let group = group();

        assert!(!is_accepted_member(
            &group,
            &[membership(MEMBER, false)],
            MEMBER
        ));

        let mut foreign = membership(MEMBER, true);
        foreign.group_id = GroupId::from(11);
        assert!(!is_accepted_member(&group, &[foreign], MEMBER));
    }

    #[test]
    fn manage_group() {
        let group = group();

        assert!(can_manage_group(&group, MODERATOR, false));
        assert!(!can_manage_group(&group, MEMBER, false));
        assert!(can_manage_group(&group, STRANGER, true));
    }

    #[test]
    fn manage_event() {
        let group = group();
        let event = event(MEMBER);

        assert!(can_manage_event(&event, &group, MEMBER, false));
        assert!(can_manage_event(&event, &group, MODERATOR, false));
        assert!(can_manage_event(&event, &group, STRANGER, true));
        assert!(!can_manage_event(&event, &group, STRANGER, false));
    }

    #[test]
    fn manage_and_edit_message() {
        let group = group();
        let message = message(MEMBER);

        assert!(can_manage_message(&message, &group, MEMBER, false));
        assert!(can_manage_message(&message, &group, MODERATOR, false));
        assert!(can_manage_message(&message, &group, STRANGER, true));
        assert!(!can_manage_message(&message, &group, STRANGER, false));

        assert!(can_edit_message(&message, MEMBER, false));
        assert!(can_edit_message(&message, STRANGER, true));
        assert!(!can_edit_message(&message, MODERATOR, false));
    }
}
