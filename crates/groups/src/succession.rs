// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Picks the next moderator when the current one leaves a group
use db_storage::groups::Membership;
use rand::seq::SliceRandom;
use rand::Rng;
use types::core::UserId;

pub use shared::settings::Succession;

/// Chooses the successor among `candidates` according to `policy`
///
/// Only accepted memberships are eligible, the caller is responsible for removing the
/// departing moderator from the candidates. Returns `None` if nobody is eligible.
pub fn choose_successor<R>(
    policy: Succession,
    candidates: &[Membership],
    rng: &mut R,
) -> Option<UserId>
where
    R: Rng + ?Sized,
{
    let eligible: Vec<&Membership> = candidates.iter().filter(|m| m.is_accepted).collect();

    let successor = match policy {
        Succession::Random => eligible.choose(rng).copied(),
        Succession::Seniority => eligible
            .into_iter()
            .min_by_key(|membership| (membership.joined_at, membership.user_id)),
    };

    successor.map(|membership| membership.user_id)
}
