// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use anyhow::{Context, Result};
use clap::Parser;
use shared::settings::Settings;

mod cli;
mod trace;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run().await {
        if log::log_enabled!(log::Level::Error) {
            log::error!("Crashed with error: {:?}", err);
        } else {
            eprintln!("Crashed with error: {err:?}");
        }

        std::process::exit(-1);
    }
}

async fn run() -> Result<()> {
    let args = cli::Args::parse();

    let settings = Settings::load(&args.config).with_context(|| {
        format!(
            "Failed to load settings from {}",
            args.config.to_string_lossy()
        )
    })?;

    trace::init(&settings.logging)?;

    cli::run(settings, args.cmd).await
}
