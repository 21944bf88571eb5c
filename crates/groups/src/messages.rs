// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! The message board of a group
use crate::store::GroupStore;
use crate::{policy, GroupError, GroupResult, Identity};
use chrono::Utc;
use db_storage::groups::GroupId;
use db_storage::messages::{Message, MessageId, NewMessage, UpdateMessage};
use db_storage::users::UserId;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Validate)]
struct MessageContent {
    #[validate(length(min = 1, max = 2000), custom = "crate::validation::not_blank")]
    content: String,
}

fn validate_content(content: &str) -> GroupResult<()> {
    MessageContent {
        content: content.to_owned(),
    }
    .validate()?;
    Ok(())
}

pub struct MessageManager<S> {
    store: Arc<S>,
}

impl<S> Clone for MessageManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: GroupStore> MessageManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Posts a message to the group's board, only accepted members may do so
    #[tracing::instrument(err, skip_all, fields(%group, %author))]
    pub fn post_message(
        &self,
        group: GroupId,
        author: UserId,
        content: String,
    ) -> GroupResult<Message> {
        validate_content(&content)?;

        self.store.transaction(|tx| {
            let group = tx
                .find_group_for_update(group)?
                .ok_or(GroupError::NotFound)?;
            let membership = tx.find_membership(group.id, author)?;

            if !policy::is_accepted_member(&group, membership.as_slice(), author) {
                return Err(GroupError::Unauthorized);
            }

            let message = tx.insert_message(NewMessage {
                group_id: group.id,
                author_id: author,
                content,
                sent_at: Utc::now(),
            })?;

            Ok(message)
        })
    }

    #[tracing::instrument(err, skip_all, fields(%message, user = %identity.user_id))]
    pub fn edit_message(
        &self,
        message: MessageId,
        identity: Identity,
        content: String,
    ) -> GroupResult<Message> {
        validate_content(&content)?;

        self.store.transaction(|tx| {
            let message = tx.find_message(message)?.ok_or(GroupError::NotFound)?;

            if !policy::can_edit_message(&message, identity.user_id, identity.is_admin) {
                return Err(GroupError::Unauthorized);
            }

            let message = tx.update_message(
                message.id,
                UpdateMessage {
                    content,
                    edited_at: Utc::now(),
                },
            )?;

            Ok(message)
        })
    }

    /// Deletes the message, returns `false` if it did not exist
    #[tracing::instrument(err, skip_all, fields(%message, user = %identity.user_id))]
    pub fn delete_message(&self, message: MessageId, identity: Identity) -> GroupResult<bool> {
        self.store.transaction(|tx| {
            let Some(message) = tx.find_message(message)? else {
                return Ok(false);
            };
            let group = tx
                .find_group(message.group_id)?
                .ok_or(GroupError::NotFound)?;

            if !policy::can_manage_message(&message, &group, identity.user_id, identity.is_admin)
            {
                return Err(GroupError::Unauthorized);
            }

            Ok(tx.delete_message(message.id)?)
        })
    }

    /// Returns the message if `user` is its author
    #[tracing::instrument(err, skip_all, fields(%message, %user))]
    pub fn message_for_edit(
        &self,
        message: MessageId,
        user: UserId,
    ) -> GroupResult<Option<Message>> {
        self.store.transaction(|tx| {
            let message = tx.find_message(message)?;

            Ok(message.filter(|message| message.author_id == user))
        })
    }

    #[tracing::instrument(err, skip_all, fields(%message))]
    pub fn group_of_message(&self, message: MessageId) -> GroupResult<Option<GroupId>> {
        self.store.transaction(|tx| {
            let message = tx.find_message(message)?;

            Ok(message.map(|message| message.group_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_limits() {
        assert!(validate_content("Cheers!").is_ok());
        assert!(validate_content(&"a".repeat(2000)).is_ok());
        assert!(matches!(
            validate_content(&"a".repeat(2001)),
            Err(GroupError::Validation(_))
        ));
        assert!(matches!(
            validate_content("   "),
            Err(GroupError::Validation(_))
        ));
        assert!(matches!(validate_content(""), Err(GroupError::Validation(_))));
    }
}
