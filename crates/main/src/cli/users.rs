// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use anyhow::{ensure, Result};
use chrono::Utc;
use database::Db;
use db_storage::users::{NewUser, User, UserId};
use tabled::{Style, Table, Tabled};

/// Implementation of the `huddle create-user --name <name>` command
pub fn create_user(db: &Db, name: String) -> Result<()> {
    ensure!(!name.trim().is_empty(), "The name of a user must not be blank");

    let mut conn = db.get_conn()?;

    let user = NewUser {
        display_name: name,
        created_at: Utc::now(),
    }
    .insert(&mut conn)?;

    println!("Created user\n\tid   = {}\n\tname = {}", user.id, user.display_name);

    Ok(())
}

#[derive(Tabled)]
struct UserTableRow {
    id: UserId,
    name: String,
    created_at: String,
}

/// Implementation of the `huddle list-users` command
pub fn list_users(db: &Db) -> Result<()> {
    let mut conn = db.get_conn()?;

    let rows: Vec<UserTableRow> = User::get_all(&mut conn)?
        .into_iter()
        .map(|user| UserTableRow {
            id: user.id,
            name: user.display_name,
            created_at: user.created_at.to_rfc3339(),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::psql()));

    Ok(())
}
