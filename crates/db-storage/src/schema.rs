// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

table! {
    event_participants (event_id, user_id) {
        event_id -> Int8,
        user_id -> Int8,
        status -> Text,
        responded_at -> Timestamptz,
    }
}

table! {
    group_events (id) {
        id -> Int8,
        group_id -> Int8,
        creator_id -> Int8,
        title -> Text,
        description -> Text,
        event_date -> Timestamptz,
        location -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

table! {
    group_invites (id) {
        id -> Int8,
        group_id -> Int8,
        inviter_id -> Int8,
        invited_user_id -> Int8,
        invited_at -> Timestamptz,
        is_accepted -> Bool,
        is_declined -> Bool,
    }
}

table! {
    group_memberships (user_id, group_id) {
        user_id -> Int8,
        group_id -> Int8,
        joined_at -> Timestamptz,
        is_accepted -> Bool,
    }
}

table! {
    group_messages (id) {
        id -> Int8,
        group_id -> Int8,
        author_id -> Int8,
        content -> Text,
        sent_at -> Timestamptz,
        edited_at -> Nullable<Timestamptz>,
    }
}

table! {
    groups (id) {
        id -> Int8,
        name -> Text,
        description -> Text,
        created_at -> Timestamptz,
        moderator_id -> Int8,
    }
}

table! {
    refinery_schema_history (version) {
        version -> Int4,
        name -> Nullable<Varchar>,
        applied_on -> Nullable<Varchar>,
        checksum -> Nullable<Varchar>,
    }
}

table! {
    users (id) {
        id -> Int8,
        display_name -> Text,
        created_at -> Timestamptz,
    }
}

joinable!(event_participants -> group_events (event_id));
joinable!(event_participants -> users (user_id));
joinable!(group_events -> groups (group_id));
joinable!(group_events -> users (creator_id));
joinable!(group_invites -> groups (group_id));
joinable!(group_memberships -> groups (group_id));
joinable!(group_memberships -> users (user_id));
joinable!(group_messages -> groups (group_id));
joinable!(group_messages -> users (author_id));
joinable!(groups -> users (moderator_id));

allow_tables_to_appear_in_same_query!(
    event_participants,
    group_events,
    group_invites,
    group_memberships,
    group_messages,
    groups,
    refinery_schema_history,
    users,
);
