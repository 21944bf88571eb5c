// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use chrono::Utc;
use database::DbConnection;
use huddle_db_storage::groups::{Group, NewGroup, NewMembership};
use huddle_db_storage::users::{NewUser, User};

pub fn make_user(conn: &mut DbConnection, display_name: &str) -> User {
    NewUser {
        display_name: display_name.into(),
        created_at: Utc::now(),
    }
    .insert(conn)
    .unwrap()
}

/// Creates a group moderated by `founder` including the founder's accepted membership
pub fn make_group(conn: &mut DbConnection, founder: &User, name: &str) -> Group {
    let group = NewGroup {
        name: name.into(),
        description: format!("All about {name}"),
        created_at: Utc::now(),
        moderator_id: founder.id,
    }
    .insert(conn)
    .unwrap();

    assert!(NewMembership {
        user_id: founder.id,
        group_id: group.id,
        joined_at: Utc::now(),
        is_accepted: true,
    }
    .try_insert(conn)
    .unwrap());

    group
}
