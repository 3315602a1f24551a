use crate::{schema::follows, users::User, Connection, Error, Result};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};
use tracing::info;

#[derive(Clone, Debug, PartialEq, Queryable, Identifiable, Associations)]
#[belongs_to(User, foreign_key = "author_id")]
pub struct Follow {
    pub id: i32,
    pub user_id: i32,
    pub author_id: i32,
}

#[derive(Insertable)]
#[table_name = "follows"]
pub struct NewFollow {
    pub user_id: i32,
    pub author_id: i32,
}

impl Follow {
    insert!(follows, NewFollow);

    pub fn find(conn: &Connection, from: i32, to: i32) -> Result<Follow> {
        follows::table
            .filter(follows::user_id.eq(from))
            .filter(follows::author_id.eq(to))
            .get_result(conn)
            .map_err(Error::from)
    }

    /// Makes `user` follow `author`.
    ///
    /// Following somebody twice gives back the existing edge, and nobody can
    /// follow themselves.
    pub fn follow(conn: &Connection, user: &User, author: &User) -> Result<Follow> {
        if user.id == author.id {
            return Err(Error::Validation("you can't follow yourself".into()));
        }
        match Follow::find(conn, user.id, author.id) {
            Ok(existing) => return Ok(existing),
            Err(Error::NotFound) => {}
            Err(e) => return Err(e),
        }
        let follow = Follow::insert(
            conn,
            NewFollow {
                user_id: user.id,
                author_id: author.id,
            },
        )?;
        info!("{} now follows {}", user.username, author.username);
        Ok(follow)
    }

    /// Removes the edge, if there is one. Returns whether something was deleted.
    pub fn unfollow(conn: &Connection, user_id: i32, author_id: i32) -> Result<bool> {
        let deleted = diesel::delete(
            follows::table
                .filter(follows::user_id.eq(user_id))
                .filter(follows::author_id.eq(author_id)),
        )
        .execute(conn)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::db, users::tests::fill_database};
    use diesel::Connection as _;

    #[test]
    fn follow_is_idempotent() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let first = Follow::follow(&conn, &users[0], &users[1]).unwrap();
            let second = Follow::follow(&conn, &users[0], &users[1]).unwrap();
            assert_eq!(first, second);
            assert_eq!(users[1].count_followers(&conn).unwrap(), 1);
            assert_eq!(Follow::find(&conn, users[0].id, users[1].id).unwrap(), first);
            Ok(())
        })
    }

    #[test]
    fn unfollow_restores_state() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            Follow::follow(&conn, &users[0], &users[2]).unwrap();
            let before = users[0].get_followed(&conn).unwrap();

            Follow::follow(&conn, &users[0], &users[1]).unwrap();
            assert!(Follow::unfollow(&conn, users[0].id, users[1].id).unwrap());
            assert_eq!(users[0].get_followed(&conn).unwrap(), before);

            // nothing left to remove
            assert!(!Follow::unfollow(&conn, users[0].id, users[1].id).unwrap());
            Ok(())
        })
    }

    #[test]
    fn no_self_follow() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            assert!(matches!(
                Follow::follow(&conn, &users[0], &users[0]),
                Err(Error::Validation(_))
            ));
            assert!(matches!(
                Follow::find(&conn, users[0].id, users[0].id),
                Err(Error::NotFound)
            ));
            Ok(())
        })
    }

    #[test]
    fn self_follow_rejected_by_database() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let res = Follow::insert(
                &conn,
                NewFollow {
                    user_id: users[1].id,
                    author_id: users[1].id,
                },
            );
            assert!(matches!(res, Err(Error::Db(_))));
            assert_eq!(users[1].count_followers(&conn).unwrap(), 0);
            Ok(())
        })
    }
}
