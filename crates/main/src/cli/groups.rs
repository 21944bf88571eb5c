// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use anyhow::{Context, Result};
use clap::Subcommand;
use database::Db;
use groups::store::PgStore;
use groups::{Group, GroupId, Identity, Membership, MembershipManager, User, UserId};
use shared::settings::Settings;
use std::sync::Arc;
use tabled::{Style, Table, Tabled};

#[derive(Subcommand, Debug, Clone)]
#[command(rename_all = "kebab_case")]
pub enum Command {
    /// List all groups
    List,
    /// Show a group with its members and messages
    Show { id: GroupId },
    /// Delete a group with all of its events, invites and messages
    Delete {
        id: GroupId,
        /// Id of the administrator deleting the group
        #[arg(long)]
        admin: UserId,
    },
}

pub fn handle_command(settings: &Settings, db: Arc<Db>, command: Command) -> Result<()> {
    let manager = MembershipManager::new(Arc::new(PgStore::new(db)), settings.groups.succession);

    match command {
        Command::List => list_all_groups(&manager),
        Command::Show { id } => show_group(&manager, id),
        Command::Delete { id, admin } => delete_group(&manager, id, admin),
    }
}

#[derive(Tabled)]
struct GroupTableRow {
    id: GroupId,
    name: String,
    moderator: UserId,
    created_at: String,
}

impl GroupTableRow {
    fn from_group(group: Group) -> Self {
        Self {
            id: group.id,
            name: group.name,
            moderator: group.moderator_id,
            created_at: group.created_at.to_rfc3339(),
        }
    }
}

#[derive(Tabled)]
struct MemberTableRow {
    id: UserId,
    name: String,
    accepted: bool,
    joined_at: String,
}

impl MemberTableRow {
    fn from_member((membership, user): (Membership, User)) -> Self {
        Self {
            id: user.id,
            name: user.display_name,
            accepted: membership.is_accepted,
            joined_at: membership.joined_at.to_rfc3339(),
        }
    }
}

/// Implementation of the `huddle groups list` command
fn list_all_groups(manager: &MembershipManager<PgStore>) -> Result<()> {
    let groups = manager.all_groups().context("Failed to load groups")?;
    let rows: Vec<GroupTableRow> = groups.into_iter().map(GroupTableRow::from_group).collect();

    println!("{}", Table::new(rows).with(Style::psql()));

    Ok(())
}

/// Implementation of the `huddle groups show <id>` command
fn show_group(manager: &MembershipManager<PgStore>, id: GroupId) -> Result<()> {
    let details = manager
        .group_details(id)
        .with_context(|| format!("Failed to load group {id}"))?;

    println!(
        "Group {}\n\tname        = {}\n\tdescription = {}\n\tmoderator   = {} ({})\n\tmessages    = {}\n",
        details.group.id,
        details.group.name,
        details.group.description,
        details.moderator.display_name,
        details.moderator.id,
        details.messages.len(),
    );

    let rows: Vec<MemberTableRow> = details
        .members
        .into_iter()
        .map(MemberTableRow::from_member)
        .collect();

    println!("{}", Table::new(rows).with(Style::psql()));

    Ok(())
}

/// Implementation of the `huddle groups delete <id> --admin <user-id>` command
fn delete_group(manager: &MembershipManager<PgStore>, id: GroupId, admin: UserId) -> Result<()> {
    manager
        .delete_group(id, Identity::admin(admin))
        .with_context(|| format!("Failed to delete group {id}"))?;

    println!("Deleted group {id}");

    Ok(())
}
