// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use huddle_groups::{GroupError, Identity, MessageId};
use pretty_assertions::assert_eq;
use test_util::groups::GroupFixture;

#[test]
fn members_post_and_read_messages() {
    let fixture = GroupFixture::memory();
    let moderator = fixture.create_user("Maria");
    let anna = fixture.create_user("Anna");
    let stranger = fixture.create_user("Stefan");
    let group = fixture.create_group(&moderator, "Wine Club");
    fixture.add_member(&group, &anna);

    let first = fixture
        .messages
        .post_message(group.id, moderator.id, "Welcome!".into())
        .unwrap();
    let second = fixture
        .messages
        .post_message(group.id, anna.id, "Cheers".into())
        .unwrap();
    assert_eq!(second.edited_at, None);

    assert!(matches!(
        fixture
            .messages
            .post_message(group.id, stranger.id, "Hello?".into()),
        Err(GroupError::Unauthorized)
    ));
    assert!(matches!(
        fixture
            .messages
            .post_message(group.id, anna.id, "   ".into()),
        Err(GroupError::Validation(_))
    ));

    let details = fixture.membership.group_details(group.id).unwrap();
    assert_eq!(details.messages, vec![first.clone(), second.clone()]);

    assert_eq!(
        fixture.messages.group_of_message(second.id).unwrap(),
        Some(group.id)
    );
    assert_eq!(
        fixture
            .messages
            .group_of_message(MessageId::from(404))
            .unwrap(),
        None
    );
}

#[test]
fn editing_messages() {
    let fixture = GroupFixture::memory();
    let moderator = fixture.create_user("Maria");
    let anna = fixture.create_user("Anna");
    let admin = fixture.create_user("Admin");
    let group = fixture.create_group(&moderator, "Wine Club");
    fixture.add_member(&group, &anna);

    let message = fixture
        .messages
        .post_message(group.id, anna.id, "Cheers".into())
        .unwrap();

    assert_eq!(
        fixture
            .messages
            .message_for_edit(message.id, anna.id)
            .unwrap(),
        Some(message.clone())
    );
    assert_eq!(
        fixture
            .messages
            .message_for_edit(message.id, moderator.id)
            .unwrap(),
        None
    );

    // Moderators may delete but not edit foreign messages
    assert!(matches!(
        fixture.messages.edit_message(
            message.id,
            Identity::user(moderator.id),
            "Censored".into()
        ),
        Err(GroupError::Unauthorized)
    ));

    let edited = fixture
        .messages
        .edit_message(message.id, Identity::user(anna.id), "Cheers!".into())
        .unwrap();
    assert_eq!(edited.content, "Cheers!");
    assert!(edited.edited_at.is_some());
    assert_eq!(edited.sent_at, message.sent_at);

    let edited = fixture
        .messages
        .edit_message(message.id, Identity::admin(admin.id), "Cheers!!".into())
        .unwrap();
    assert_eq!(edited.content, "Cheers!!");

    assert!(matches!(
        fixture.messages.edit_message(
            MessageId::from(404),
            Identity::user(anna.id),
            "Cheers".into()
        ),
        Err(GroupError::NotFound)
    ));
}

#[test]
fn deleting_messages() {
    let fixture = GroupFixture::memory();
    let moderator = fixture.create_user("Maria");
    let anna = fixture.create_user("Anna");
    let bernd = fixture.create_user("Bernd");
    let group = fixture.create_group(&moderator, "Wine Club");
    fixture.add_member(&group, &anna);
    fixture.add_member(&group, &bernd);

    let annas = fixture
        .messages
        .post_message(group.id, anna.id, "Cheers".into())
        .unwrap();
    let bernds = fixture
        .messages
        .post_message(group.id, bernd.id, "Prost".into())
        .unwrap();

    assert!(matches!(
        fixture
            .messages
            .delete_message(annas.id, Identity::user(bernd.id)),
        Err(GroupError::Unauthorized)
    ));

    assert!(fixture
        .messages
        .delete_message(annas.id, Identity::user(anna.id))
        .unwrap());
    assert!(fixture
        .messages
        .delete_message(bernds.id, Identity::user(moderator.id))
        .unwrap());

    // Already gone
    assert!(!fixture
        .messages
        .delete_message(annas.id, Identity::user(anna.id))
        .unwrap());

    let details = fixture.membership.group_details(group.id).unwrap();
    assert!(details.messages.is_empty());
}
