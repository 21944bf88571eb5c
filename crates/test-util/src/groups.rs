// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! A set of managers sharing one store, plus helpers to seed it
use chrono::Utc;
use db_storage::users::{NewUser, User};
use groups::store::{GroupStore, MemoryStore};
use groups::{
    EventManager, InvitationManager, MembershipManager, MessageManager, NewGroupRequest,
    Succession,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Seed of the random number generator used for moderator succession in tests
pub const SUCCESSION_SEED: u64 = 0x5eed;

pub struct GroupFixture<S> {
    pub store: Arc<S>,
    pub membership: MembershipManager<S>,
    pub invitations: InvitationManager<S>,
    pub events: EventManager<S>,
    pub messages: MessageManager<S>,
}

impl GroupFixture<MemoryStore> {
    /// Managers on top of an empty [`MemoryStore`] with random succession
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Succession::Random)
    }
}

impl<S: GroupStore> GroupFixture<S> {
    /// Managers on top of `store`, random succession draws from a seeded generator
    pub fn new(store: Arc<S>, succession: Succession) -> Self {
        Self {
            membership: MembershipManager::with_rng(
                store.clone(),
                succession,
                StdRng::seed_from_u64(SUCCESSION_SEED),
            ),
            invitations: InvitationManager::new(store.clone()),
            events: EventManager::new(store.clone()),
            messages: MessageManager::new(store.clone()),
            store,
        }
    }

    pub fn create_user(&self, display_name: &str) -> User {
        self.store
            .transaction(|tx| {
                Ok(tx.insert_user(NewUser {
                    display_name: display_name.into(),
                    created_at: Utc::now(),
                })?)
            })
            .expect("Unable to create test user")
    }

    /// Creates a group founded and moderated by `founder`
    pub fn create_group(&self, founder: &User, name: &str) -> groups::Group {
        self.membership
            .create_group(
                founder.id,
                NewGroupRequest {
                    name: name.into(),
                    description: format!("All about {name}"),
                },
            )
            .expect("Unable to create test group")
    }

    /// Lets `user` request to join and the group's moderator accept the request
    pub fn add_member(&self, group: &groups::Group, user: &User) {
        self.membership
            .request_join(user.id, group.id)
            .expect("Unable to request joining the test group");

        let accepted = self
            .membership
            .accept_member(group.id, user.id, group.moderator_id)
            .expect("Unable to accept test member");

        assert!(accepted, "test member had no pending join request");
    }
}
