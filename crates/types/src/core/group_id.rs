// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

crate::id_newtype! {
    /// The numeric identifier of a group
    GroupId
}
