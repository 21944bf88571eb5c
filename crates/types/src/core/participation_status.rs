// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

#[allow(unused_imports)]
use crate::imports::*;
#[cfg(feature = "diesel")]
use std::io::Write;

/// The attendance a group member declared for an event.
///
/// Members may switch freely between all three states, the event date does not
/// restrict a change of mind.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(rename_all = "snake_case")
)]
#[cfg_attr(
    feature = "diesel",
    derive(AsExpression, FromSqlRow),
    diesel(sql_type = Text)
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ParticipationStatus {
    /// The member will attend
    Going,

    /// The member has not decided yet
    Maybe,

    /// The member will not attend
    #[strum(to_string = "not_going", serialize = "notgoing")]
    NotGoing,
}

impl ParticipationStatus {
    /// Returns `true` if the member declared to attend the event
    pub fn is_attending(&self) -> bool {
        matches!(self, Self::Going)
    }
}

#[cfg(feature = "diesel")]
impl ToSql<Text, Pg> for ParticipationStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_ref().as_bytes())?;
        Ok(IsNull::No)
    }
}

#[cfg(feature = "diesel")]
impl FromSql<Text, Pg> for ParticipationStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;

        s.parse()
            .map_err(|_| format!("unknown participation status {s:?}").into())
    }
}
