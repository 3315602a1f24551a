use crate::{
    comments::Comment,
    follows::Follow,
    posts::Post,
    schema::{comments, follows, posts, users},
    Connection, Error, Result,
};
use chrono::{NaiveDateTime, Utc};
use diesel::{
    self, BelongingToDsl, BoolExpressionMethods, Connection as _, ExpressionMethods, QueryDsl,
    RunQueryDsl,
};
use std::fmt;
use tracing::info;
use yatube_api::users::AuthorData;

#[derive(Queryable, Identifiable, Clone, Debug, PartialEq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub display_name: String,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "users"]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub creation_date: NaiveDateTime,
}

/// First path segments of the server's own pages, which a profile URL would collide with
pub const RESERVED_USERNAMES: &[&str] = &["about", "follow", "group", "new"];

impl User {
    insert!(users, NewUser);
    get!(users);
    find_by!(users, find_by_username, username as &str);

    /// Registers a new account. Usernames are unique, can't be blank and can't
    /// shadow one of the server's pages.
    pub fn create(conn: &Connection, username: &str, display_name: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::Validation("the username can't be empty".into()));
        }
        if RESERVED_USERNAMES.contains(&username.to_lowercase().as_str()) {
            return Err(Error::Validation(format!(
                "\"{}\" is reserved, please choose another username",
                username
            )));
        }
        conn.transaction(|| {
            if User::find_by_username(conn, username).is_ok() {
                return Err(Error::UserAlreadyExists);
            }
            User::insert(
                conn,
                NewUser {
                    username: username.to_owned(),
                    display_name: display_name.trim().to_owned(),
                    creation_date: Utc::now().naive_utc(),
                },
            )
            .map_err(|err| match err {
                Error::Db(diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                )) => Error::UserAlreadyExists,
                err => err,
            })
        })
    }

    pub fn list(conn: &Connection) -> Result<Vec<User>> {
        users::table
            .order_by(users::username.asc())
            .load::<User>(conn)
            .map_err(Error::from)
    }

    /// Removes the account along with everything it owns: its comments, its
    /// posts (and the comments under them) and the follow edges in both
    /// directions.
    pub fn delete(&self, conn: &Connection) -> Result<()> {
        conn.transaction(|| {
            let their_posts = posts::table
                .filter(posts::author_id.eq(self.id))
                .select(posts::id);
            diesel::delete(
                comments::table.filter(
                    comments::author_id
                        .eq(self.id)
                        .or(comments::post_id.eq_any(their_posts)),
                ),
            )
            .execute(conn)?;
            diesel::delete(posts::table.filter(posts::author_id.eq(self.id))).execute(conn)?;
            diesel::delete(
                follows::table.filter(
                    follows::user_id
                        .eq(self.id)
                        .or(follows::author_id.eq(self.id)),
                ),
            )
            .execute(conn)?;
            diesel::delete(self).execute(conn)?;
            info!("Deleted user {}", self.username);
            Ok(())
        })
    }

    pub fn name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }

    /// Accounts this user follows
    pub fn get_followed(&self, conn: &Connection) -> Result<Vec<User>> {
        let followed = follows::table
            .filter(follows::user_id.eq(self.id))
            .select(follows::author_id);
        users::table
            .filter(users::id.eq_any(followed))
            .order_by(users::username.asc())
            .load::<User>(conn)
            .map_err(Error::from)
    }

    pub fn count_followed(&self, conn: &Connection) -> Result<i64> {
        follows::table
            .filter(follows::user_id.eq(self.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    /// Accounts following this user
    pub fn get_followers(&self, conn: &Connection) -> Result<Vec<User>> {
        let followers = Follow::belonging_to(self).select(follows::user_id);
        users::table
            .filter(users::id.eq_any(followers))
            .order_by(users::username.asc())
            .load::<User>(conn)
            .map_err(Error::from)
    }

    pub fn count_followers(&self, conn: &Connection) -> Result<i64> {
        Follow::belonging_to(self)
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn is_following(&self, conn: &Connection, other_id: i32) -> Result<bool> {
        follows::table
            .filter(follows::user_id.eq(self.id))
            .filter(follows::author_id.eq(other_id))
            .count()
            .get_result::<i64>(conn)
            .map_err(Error::from)
            .map(|r| r > 0)
    }

    pub fn count_posts(&self, conn: &Connection) -> Result<i64> {
        Post::count_for_author(conn, self.id)
    }

    pub fn count_comments(&self, conn: &Connection) -> Result<i64> {
        Comment::count_for_author(conn, self.id)
    }

    pub fn to_api(&self, conn: &Connection) -> Result<AuthorData> {
        Ok(AuthorData {
            id: self.id,
            username: self.username.clone(),
            display_name: self.name().to_owned(),
            posts_count: self.count_posts(conn)?,
            followers_count: self.count_followers(conn)?,
            following_count: self.count_followed(conn)?,
        })
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        posts::{NewPost, Post},
        tests::db,
    };
    use diesel::Connection as _;

    pub(crate) fn fill_database(conn: &Connection) -> Vec<User> {
        vec![
            User::create(conn, "admin", "The admin").unwrap(),
            User::create(conn, "user", "Some user").unwrap(),
            User::create(conn, "other", "").unwrap(),
        ]
    }

    #[test]
    fn create_and_find() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let found = User::find_by_username(&conn, "user").unwrap();
            assert_eq!(found, users[1]);
            assert_eq!(User::get(&conn, users[0].id).unwrap().username, "admin");
            assert_eq!(users[2].name(), "other");
            assert_eq!(users[0].to_string(), "admin");
            assert_eq!(User::list(&conn).unwrap().len(), 3);
            Ok(())
        })
    }

    #[test]
    fn duplicate_and_empty_usernames() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            fill_database(&conn);
            assert!(matches!(
                User::create(&conn, "admin", "Again"),
                Err(Error::UserAlreadyExists)
            ));
            assert!(matches!(
                User::create(&conn, "  ", ""),
                Err(Error::Validation(_))
            ));
            for name in &["follow", "new", "group", "about", " Follow "] {
                assert!(matches!(
                    User::create(&conn, name, ""),
                    Err(Error::Validation(_))
                ));
            }
            assert_eq!(User::list(&conn).unwrap().len(), 3);
            // only whole names are reserved
            User::create(&conn, "followers", "").unwrap();
            Ok(())
        })
    }

    #[test]
    fn followers_and_followed() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            Follow::follow(&conn, &users[0], &users[1]).unwrap();
            Follow::follow(&conn, &users[2], &users[1]).unwrap();

            assert!(users[0].is_following(&conn, users[1].id).unwrap());
            assert!(!users[1].is_following(&conn, users[0].id).unwrap());
            assert_eq!(users[1].count_followers(&conn).unwrap(), 2);
            assert_eq!(users[0].count_followed(&conn).unwrap(), 1);
            assert_eq!(
                users[1]
                    .get_followers(&conn)
                    .unwrap()
                    .into_iter()
                    .map(|u| u.username)
                    .collect::<Vec<_>>(),
                vec!["admin", "other"]
            );
            assert_eq!(users[0].get_followed(&conn).unwrap(), vec![users[1].clone()]);
            Ok(())
        })
    }

    #[test]
    fn delete_cascades() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let post = Post::create(
                &conn,
                NewPost::new(users[1].id, "A post that will go away", None, None),
            )
            .unwrap();
            let other_post = Post::create(
                &conn,
                NewPost::new(users[0].id, "A post that stays", None, None),
            )
            .unwrap();
            Comment::create(&conn, &post, &users[0], "on the doomed post").unwrap();
            Comment::create(&conn, &other_post, &users[1], "by the doomed user").unwrap();
            let kept = Comment::create(&conn, &other_post, &users[2], "kept").unwrap();
            Follow::follow(&conn, &users[0], &users[1]).unwrap();
            Follow::follow(&conn, &users[1], &users[2]).unwrap();

            users[1].delete(&conn).unwrap();

            assert!(matches!(User::get(&conn, users[1].id), Err(Error::NotFound)));
            assert!(matches!(Post::get(&conn, post.id), Err(Error::NotFound)));
            assert!(Post::get(&conn, other_post.id).is_ok());
            assert_eq!(
                Comment::list_for_post(&conn, other_post.id).unwrap(),
                vec![kept]
            );
            assert_eq!(users[0].count_followed(&conn).unwrap(), 0);
            assert_eq!(users[2].count_followers(&conn).unwrap(), 0);
            Ok(())
        })
    }

    #[test]
    fn to_api_counts() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            Post::create(&conn, NewPost::new(users[0].id, "First", None, None)).unwrap();
            Follow::follow(&conn, &users[1], &users[0]).unwrap();

            let data = users[0].to_api(&conn).unwrap();
            assert_eq!(data.username, "admin");
            assert_eq!(data.display_name, "The admin");
            assert_eq!(data.posts_count, 1);
            assert_eq!(data.followers_count, 1);
            assert_eq!(data.following_count, 0);
            Ok(())
        })
    }
}
