// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::migrations::type_polyfills::datetime;
use barrel::backend::Pg;
use barrel::{types, Migration};

pub fn migration() -> String {
    let mut migr = Migration::new();

    migr.create_table("users", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));
        table.add_column("display_name", types::text().nullable(false));
        table.add_column("created_at", datetime().nullable(false));
    });

    migr.create_table("groups", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));
        table.add_column("name", types::varchar(100).nullable(false));
        table.add_column("description", types::varchar(2000).nullable(false));
        table.add_column("created_at", datetime().nullable(false));
        table.add_column(
            "moderator_id",
            types::custom("BIGINT NOT NULL REFERENCES users(id)"),
        );
    });

    migr.create_table("group_memberships", |table| {
        table.add_column(
            "user_id",
            types::custom("BIGINT REFERENCES users(id) ON DELETE CASCADE"),
        );
        table.add_column(
            "group_id",
            types::custom("BIGINT REFERENCES groups(id) ON DELETE CASCADE"),
        );
        table.add_column("joined_at", datetime().nullable(false));
        table.add_column("is_accepted", types::boolean().nullable(false));
        table.inject_custom("PRIMARY KEY (user_id, group_id)");
    });

    migr.create_table("group_invites", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));
        table.add_column(
            "group_id",
            types::custom("BIGINT NOT NULL REFERENCES groups(id) ON DELETE CASCADE"),
        );
        table.add_column(
            "inviter_id",
            types::custom("BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE"),
        );
        table.add_column(
            "invited_user_id",
            types::custom("BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE"),
        );
        table.add_column("invited_at", datetime().nullable(false));
        table.add_column("is_accepted", types::boolean().nullable(false));
        table.add_column("is_declined", types::boolean().nullable(false));
    });

    migr.create_table("group_events", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));
        table.add_column(
            "group_id",
            types::custom("BIGINT NOT NULL REFERENCES groups(id) ON DELETE CASCADE"),
        );
        table.add_column(
            "creator_id",
            types::custom("BIGINT NOT NULL REFERENCES users(id)"),
        );
        table.add_column("title", types::varchar(200).nullable(false));
        table.add_column("description", types::varchar(4000).nullable(false));
        table.add_column("event_date", datetime().nullable(false));
        table.add_column("location", types::varchar(300).nullable(true));
        table.add_column("created_at", datetime().nullable(false));
    });

    migr.create_table("event_participants", |table| {
        table.add_column(
            "event_id",
            types::custom("BIGINT REFERENCES group_events(id) ON DELETE CASCADE"),
        );
        table.add_column(
            "user_id",
            types::custom("BIGINT REFERENCES users(id) ON DELETE CASCADE"),
        );
        table.add_column("status", types::text().nullable(false));
        table.add_column("responded_at", datetime().nullable(false));
        table.inject_custom("PRIMARY KEY (event_id, user_id)");
    });

    migr.create_table("group_messages", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));
        table.add_column(
            "group_id",
            types::custom("BIGINT NOT NULL REFERENCES groups(id) ON DELETE CASCADE"),
        );
        table.add_column(
            "author_id",
            types::custom("BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE"),
        );
        table.add_column("content", types::varchar(2000).nullable(false));
        table.add_column("sent_at", datetime().nullable(false));
        table.add_column("edited_at", datetime().nullable(true));
    });

    // At most one open invitation per group and invitee
    migr.inject_custom(
        "CREATE UNIQUE INDEX group_invites_open_idx ON group_invites (group_id, invited_user_id) \
         WHERE NOT is_accepted AND NOT is_declined",
    );
    migr.inject_custom("CREATE INDEX group_events_group_id_idx ON group_events (group_id)");
    migr.inject_custom("CREATE INDEX group_messages_group_id_idx ON group_messages (group_id)");

    migr.make::<Pg>()
}
