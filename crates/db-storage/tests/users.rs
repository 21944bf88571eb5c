// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use database::DatabaseError;
use huddle_db_storage::users::{User, UserId};
use pretty_assertions::assert_eq;
use serial_test::serial;

use crate::common::make_user;

mod common;

#[tokio::test]
#[serial]
#[ignore = "requires a running postgres"]
async fn users_are_listed_by_id() {
    let db_ctx = test_util::database::DatabaseContext::new(true).await;
    let mut conn = db_ctx.db.get_conn().unwrap();

    let aileen = make_user(&mut conn, "Aileen");
    let laura = make_user(&mut conn, "Laura");
    let cheryl = make_user(&mut conn, "Cheryl");

    let unknown = UserId::from(cheryl.id.into_inner() + 1000);

    assert_eq!(User::get_all(&mut conn).unwrap(), vec![aileen, laura.clone(), cheryl]);
    assert_eq!(User::get(&mut conn, laura.id).unwrap(), laura);
    assert!(matches!(
        User::get(&mut conn, unknown),
        Err(DatabaseError::NotFound)
    ));
}
