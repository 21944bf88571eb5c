// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Shared settings for the huddle crates.
//! Kept in its own crate so the storage layer and the binary agree on one configuration format.

pub mod settings;
