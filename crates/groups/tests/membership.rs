// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use chrono::{DateTime, Duration, TimeZone as _, Utc};
use db_storage::groups::NewMembership;
use huddle_groups::store::{GroupStore, MemoryStore};
use huddle_groups::{
    Group, GroupError, GroupId, Identity, JoinOutcome, LeaveOutcome, NewEventRequest,
    NewGroupRequest, Succession, UpdateGroupRequest, UserId,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use test_util::groups::GroupFixture;

/// Exactly one accepted membership row belongs to the moderator
fn assert_moderator_invariant(fixture: &GroupFixture<MemoryStore>, group: &Group) {
    let details = fixture.membership.group_details(group.id).unwrap();
    let moderator_rows: Vec<_> = details
        .members
        .iter()
        .filter(|(membership, _)| membership.user_id == details.group.moderator_id)
        .collect();

    assert_eq!(moderator_rows.len(), 1);
    assert!(moderator_rows[0].0.is_accepted);
}

fn is_member(fixture: &GroupFixture<MemoryStore>, group: &Group, user: UserId) -> bool {
    fixture
        .store
        .transaction(|tx| Ok(tx.find_membership(group.id, user)?))
        .unwrap()
        .is_some()
}

#[test]
fn create_group_seeds_the_founder() {
    let fixture = GroupFixture::memory();
    let founder = fixture.create_user("Franziska");

    let group = fixture
        .membership
        .create_group(
            founder.id,
            NewGroupRequest {
                name: "Wine Club".into(),
                description: "Tasting every friday".into(),
            },
        )
        .unwrap();

    assert_eq!(group.moderator_id, founder.id);
    assert_eq!(group.name, "Wine Club");

    let details = fixture.membership.group_details(group.id).unwrap();
    assert_eq!(details.moderator, founder);
    assert_eq!(details.members.len(), 1);
    assert!(details.members[0].0.is_accepted);
    assert_moderator_invariant(&fixture, &group);

    assert_eq!(
        fixture.membership.groups_for_user(founder.id).unwrap(),
        vec![group]
    );
}

#[test]
fn create_group_validates_input() {
    let fixture = GroupFixture::memory();
    let founder = fixture.create_user("Franziska");

    for (name, description) in [
        ("", "Tasting"),
        ("   ", "Tasting"),
        ("Wine Club", ""),
        ("Wine Club", "\n"),
    ] {
        let result = fixture.membership.create_group(
            founder.id,
            NewGroupRequest {
                name: name.into(),
                description: description.into(),
            },
        );
        assert!(
            matches!(result, Err(GroupError::Validation(_))),
            "{name:?} / {description:?} was accepted"
        );
    }

    let result = fixture.membership.create_group(
        founder.id,
        NewGroupRequest {
            name: "a".repeat(101),
            description: "Tasting".into(),
        },
    );
    assert!(matches!(result, Err(GroupError::Validation(_))));

    let result = fixture.membership.create_group(
        founder.id,
        NewGroupRequest {
            name: "a".repeat(100),
            description: "d".repeat(2000),
        },
    );
    assert!(result.is_ok());

    assert_eq!(fixture.membership.all_groups().unwrap().len(), 1);
}

#[test]
fn create_group_for_unknown_founder() {
    let fixture = GroupFixture::memory();

    let result = fixture.membership.create_group(
        UserId::from(404),
        NewGroupRequest {
            name: "Wine Club".into(),
            description: "Tasting".into(),
        },
    );

    assert!(matches!(result, Err(GroupError::NotFound)));
    assert!(fixture.membership.all_groups().unwrap().is_empty());
}

#[test]
fn join_requests() {
    let fixture = GroupFixture::memory();
    let founder = fixture.create_user("Franziska");
    let anna = fixture.create_user("Anna");
    let group = fixture.create_group(&founder, "Wine Club");

    let outcome = fixture.membership.request_join(anna.id, group.id).unwrap();
    assert_eq!(outcome, JoinOutcome::Requested);
    assert!(outcome.is_success());

    // Pending requests do not count as membership
    assert!(fixture.membership.groups_for_user(anna.id).unwrap().is_empty());

    let outcome = fixture.membership.request_join(anna.id, group.id).unwrap();
    assert_eq!(outcome, JoinOutcome::AlreadyRequestedOrMember);
    assert!(!outcome.is_success());

    let outcome = fixture
        .membership
        .request_join(founder.id, group.id)
        .unwrap();
    assert_eq!(outcome, JoinOutcome::AlreadyRequestedOrMember);

    let result = fixture
        .membership
        .request_join(anna.id, GroupId::from(404));
    assert!(matches!(result, Err(GroupError::NotFound)));
}

#[test]
fn concurrent_join_requests_create_one_membership() {
    let fixture = GroupFixture::memory();
    let founder = fixture.create_user("Franziska");
    let anna = fixture.create_user("Anna");
    let group = fixture.create_group(&founder, "Wine Club");

    let outcomes: Vec<JoinOutcome> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| fixture.membership.request_join(anna.id, group.id)))
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect()
    });

    let requested = outcomes
        .iter()
        .filter(|outcome| **outcome == JoinOutcome::Requested)
        .count();
    assert_eq!(requested, 1);
    assert!(outcomes
        .iter()
        .all(|outcome| matches!(
            outcome,
            JoinOutcome::Requested | JoinOutcome::AlreadyRequestedOrMember
        )));

    let details = fixture.membership.group_details(group.id).unwrap();
    assert_eq!(details.members.len(), 2);
}

#[test]
fn only_the_moderator_accepts_and_removes() {
    let fixture = GroupFixture::memory();
    let founder = fixture.create_user("Franziska");
    let anna = fixture.create_user("Anna");
    let bernd = fixture.create_user("Bernd");
    let group = fixture.create_group(&founder, "Wine Club");

    fixture.membership.request_join(anna.id, group.id).unwrap();
    fixture.membership.request_join(bernd.id, group.id).unwrap();

    assert!(matches!(
        fixture.membership.accept_member(group.id, anna.id, bernd.id),
        Err(GroupError::Unauthorized)
    ));
    assert!(matches!(
        fixture.membership.remove_member(group.id, anna.id, bernd.id),
        Err(GroupError::Unauthorized)
    ));

    assert!(fixture
        .membership
        .accept_member(group.id, anna.id, founder.id)
        .unwrap());
    // Nothing pending anymore
    assert!(!fixture
        .membership
        .accept_member(group.id, anna.id, founder.id)
        .unwrap());

    // Declining a request removes the pending row
    assert!(fixture
        .membership
        .remove_member(group.id, bernd.id, founder.id)
        .unwrap());
    assert!(!is_member(&fixture, &group, bernd.id));
    assert!(!fixture
        .membership
        .remove_member(group.id, bernd.id, founder.id)
        .unwrap());

    // Kicking an accepted member
    assert!(fixture
        .membership
        .remove_member(group.id, anna.id, founder.id)
        .unwrap());
    assert!(!is_member(&fixture, &group, anna.id));
}

#[test]
fn moderator_cannot_remove_themselves() {
    let fixture = GroupFixture::memory();
    let founder = fixture.create_user("Franziska");
    let group = fixture.create_group(&founder, "Wine Club");

    assert!(matches!(
        fixture
            .membership
            .remove_member(group.id, founder.id, founder.id),
        Err(GroupError::Conflict(_))
    ));
    assert!(is_member(&fixture, &group, founder.id));
    assert_moderator_invariant(&fixture, &group);
}

#[test]
fn members_leave() {
    let fixture = GroupFixture::memory();
    let founder = fixture.create_user("Franziska");
    let anna = fixture.create_user("Anna");
    let stranger = fixture.create_user("Stefan");
    let group = fixture.create_group(&founder, "Wine Club");
    fixture.add_member(&group, &anna);

    assert_eq!(
        fixture.membership.leave_group(anna.id, group.id).unwrap(),
        LeaveOutcome::Left
    );
    assert!(!is_member(&fixture, &group, anna.id));

    let outcome = fixture.membership.leave_group(stranger.id, group.id).unwrap();
    assert_eq!(outcome, LeaveOutcome::NotAMember);
    assert!(!outcome.is_success());

    assert!(matches!(
        fixture
            .membership
            .leave_group(anna.id, GroupId::from(404)),
        Err(GroupError::NotFound)
    ));
}

#[test]
fn wine_club_hand_over() {
    let fixture = GroupFixture::memory();
    let founder = fixture.create_user("Franziska");
    let anna = fixture.create_user("Anna");
    let group = fixture.create_group(&founder, "Wine Club");

    assert_eq!(
        fixture.membership.request_join(anna.id, group.id).unwrap(),
        JoinOutcome::Requested
    );
    assert!(fixture
        .membership
        .accept_member(group.id, anna.id, founder.id)
        .unwrap());

    assert_eq!(
        fixture.membership.leave_group(founder.id, group.id).unwrap(),
        LeaveOutcome::ModeratorHandedOver {
            successor: anna.id
        }
    );

    let details = fixture.membership.group_details(group.id).unwrap();
    assert_eq!(details.group.moderator_id, anna.id);
    assert!(!is_member(&fixture, &group, founder.id));
    assert_moderator_invariant(&fixture, &details.group);
}

#[test]
fn pending_members_do_not_inherit() {
    let fixture = GroupFixture::memory();
    let founder = fixture.create_user("Franziska");
    let anna = fixture.create_user("Anna");
    let group = fixture.create_group(&founder, "Wine Club");
    fixture.membership.request_join(anna.id, group.id).unwrap();

    assert_eq!(
        fixture.membership.leave_group(founder.id, group.id).unwrap(),
        LeaveOutcome::GroupDeleted
    );
    assert!(matches!(
        fixture.membership.group_details(group.id),
        Err(GroupError::NotFound)
    ));
    assert!(!is_member(&fixture, &group, anna.id));
}

#[test]
fn last_member_leaving_deletes_everything() {
    let fixture = GroupFixture::memory();
    let founder = fixture.create_user("Franziska");
    let ulrich = fixture.create_user("Ulrich");
    let group = fixture.create_group(&founder, "Wine Club");

    let event = fixture
        .events
        .create_event(
            group.id,
            founder.id,
            NewEventRequest {
                title: "Tasting".into(),
                description: "Bring glasses".into(),
                event_date: Utc.with_ymd_and_hms(2024, 6, 1, 19, 0, 0).unwrap(),
                location: None,
            },
        )
        .unwrap();
    fixture
        .events
        .respond_to_event(
            event.id,
            founder.id,
            huddle_groups::ParticipationStatus::Going,
        )
        .unwrap();
    fixture
        .invitations
        .send_invite(group.id, founder.id, ulrich.id)
        .unwrap();
    fixture
        .messages
        .post_message(group.id, founder.id, "Cheers".into())
        .unwrap();

    assert_eq!(
        fixture.membership.leave_group(founder.id, group.id).unwrap(),
        LeaveOutcome::GroupDeleted
    );

    assert!(fixture.membership.all_groups().unwrap().is_empty());
    assert_eq!(fixture.events.event_details(event.id).unwrap(), None);
    assert!(fixture
        .events
        .events_user_is_attending(founder.id)
        .unwrap()
        .is_empty());
    assert!(fixture
        .invitations
        .pending_invites_for_user(ulrich.id)
        .unwrap()
        .is_empty());
}

#[test]
fn random_succession_picks_another_accepted_member() {
    let fixture = GroupFixture::memory();
    let founder = fixture.create_user("Franziska");
    let members: Vec<_> = ["Anna", "Bernd", "Carla"]
        .into_iter()
        .map(|name| fixture.create_user(name))
        .collect();
    let pending = fixture.create_user("Paul");
    let group = fixture.create_group(&founder, "Wine Club");
    for member in &members {
        fixture.add_member(&group, member);
    }
    fixture.membership.request_join(pending.id, group.id).unwrap();

    let LeaveOutcome::ModeratorHandedOver { successor } =
        fixture.membership.leave_group(founder.id, group.id).unwrap()
    else {
        panic!("expected the group to be handed over");
    };

    assert_ne!(successor, founder.id);
    assert_ne!(successor, pending.id);
    assert!(members.iter().any(|member| member.id == successor));

    let details = fixture.membership.group_details(group.id).unwrap();
    assert_eq!(details.group.moderator_id, successor);
    assert_moderator_invariant(&fixture, &details.group);
}

#[test]
fn seniority_succession_picks_the_earliest_member() {
    let store = Arc::new(MemoryStore::new());
    let fixture = GroupFixture::new(store.clone(), Succession::Seniority);
    let founder = fixture.create_user("Franziska");
    let anna = fixture.create_user("Anna");
    let bernd = fixture.create_user("Bernd");
    let group = fixture.create_group(&founder, "Wine Club");

    let joined_at = Utc::now() - Duration::days(1);
    store
        .transaction(|tx| {
            // Bernd joined an hour before Anna
            for (user, offset) in [(anna.id, 1), (bernd.id, 0)] {
                tx.try_insert_membership(accepted_membership(
                    user,
                    group.id,
                    joined_at + Duration::hours(offset),
                ))?;
            }
            Ok(())
        })
        .unwrap();

    assert_eq!(
        fixture.membership.leave_group(founder.id, group.id).unwrap(),
        LeaveOutcome::ModeratorHandedOver {
            successor: bernd.id
        }
    );
}

fn accepted_membership(
    user_id: UserId,
    group_id: GroupId,
    joined_at: DateTime<Utc>,
) -> NewMembership {
    NewMembership {
        user_id,
        group_id,
        joined_at,
        is_accepted: true,
    }
}

#[test]
fn delete_and_update_group() {
    let fixture = GroupFixture::memory();
    let founder = fixture.create_user("Franziska");
    let anna = fixture.create_user("Anna");
    let admin = fixture.create_user("Admin");
    let group = fixture.create_group(&founder, "Wine Club");
    fixture.add_member(&group, &anna);

    let update = UpdateGroupRequest {
        name: "Spritz Club".into(),
        description: "Aperitivo at six".into(),
    };

    assert!(matches!(
        fixture
            .membership
            .update_group(group.id, Identity::user(anna.id), update.clone()),
        Err(GroupError::Unauthorized)
    ));
    let updated = fixture
        .membership
        .update_group(group.id, Identity::user(founder.id), update)
        .unwrap();
    assert_eq!(updated.name, "Spritz Club");
    assert_eq!(updated.moderator_id, founder.id);

    assert!(matches!(
        fixture
            .membership
            .delete_group(group.id, Identity::user(anna.id)),
        Err(GroupError::Unauthorized)
    ));
    fixture
        .membership
        .delete_group(group.id, Identity::admin(admin.id))
        .unwrap();

    assert!(fixture.membership.all_groups().unwrap().is_empty());
    assert!(matches!(
        fixture
            .membership
            .delete_group(group.id, Identity::admin(admin.id)),
        Err(GroupError::NotFound)
    ));
}
