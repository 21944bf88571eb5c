// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use database::DatabaseError;
use validator::ValidationErrors;

/// Result type using [`GroupError`] as the error
pub type GroupResult<T> = Result<T, GroupError>;

/// Failures of group operations
///
/// Outcomes the caller is expected to render, like an already pending join request, are
/// not errors. See the outcome types of the individual managers.
#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    #[error("The requested resource could not be found")]
    NotFound,
    #[error("The acting user is not allowed to perform this operation")]
    Unauthorized,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Database error: {0}")]
    Database(DatabaseError),
}

impl GroupError {
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict(reason.into())
    }
}

impl From<DatabaseError> for GroupError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound => Self::NotFound,
            err => Self::Database(err),
        }
    }
}

impl From<diesel::result::Error> for GroupError {
    fn from(err: diesel::result::Error) -> Self {
        Self::from(DatabaseError::from(err))
    }
}
