// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use database::Db;
use shared::settings::Settings;
use std::path::PathBuf;
use std::sync::Arc;

mod groups;
mod users;

#[derive(Parser, Debug, Clone)]
#[command(name = "huddle", about = "Administration of the huddle group service")]
pub struct Args {
    #[arg(
        short,
        long,
        default_value = "config.toml",
        help = "Specify path to configuration file"
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub cmd: SubCommand,
}

#[derive(Subcommand, Debug, Clone)]
#[command(rename_all = "kebab_case")]
pub enum SubCommand {
    /// Apply all pending database migrations
    MigrateDb,
    /// Create a user mirroring an external identity
    CreateUser {
        /// The name shown to other users
        #[arg(long)]
        name: String,
    },
    /// List all users
    ListUsers,
    /// Inspect and manage groups
    #[command(subcommand)]
    Groups(groups::Command),
}

pub async fn run(settings: Settings, cmd: SubCommand) -> Result<()> {
    match cmd {
        SubCommand::MigrateDb => {
            let report = db_storage::migrations::migrate_from_url(&settings.database.url)
                .await
                .context("Failed to migrate database")?;

            println!(
                "Applied {} migration(s)",
                report.applied_migrations().len()
            );

            Ok(())
        }
        SubCommand::CreateUser { name } => users::create_user(&*connect(&settings)?, name),
        SubCommand::ListUsers => users::list_users(&*connect(&settings)?),
        SubCommand::Groups(command) => groups::handle_command(&settings, connect(&settings)?, command),
    }
}

fn connect(settings: &Settings) -> Result<Arc<Db>> {
    let db = Db::connect(&settings.database).context("Failed to connect to database")?;

    Ok(Arc::new(db))
}
