use crate::{
    posts::{Post, DATE_FORMAT},
    schema::comments,
    users::User,
    Connection, Error, Result,
};
use chrono::{NaiveDateTime, Utc};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};
use yatube_api::comments::CommentData;

#[derive(Queryable, Identifiable, Clone, Debug, PartialEq)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub author_id: i32,
    pub text: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "comments"]
pub struct NewComment {
    pub post_id: i32,
    pub author_id: i32,
    pub text: String,
    pub created_at: NaiveDateTime,
}

impl Comment {
    insert!(comments, NewComment);

    pub fn create(conn: &Connection, post: &Post, author: &User, text: &str) -> Result<Comment> {
        if text.trim().is_empty() {
            return Err(Error::Validation("a comment can't be empty".into()));
        }
        Comment::insert(
            conn,
            NewComment {
                post_id: post.id,
                author_id: author.id,
                text: text.to_owned(),
                created_at: Utc::now().naive_utc(),
            },
        )
    }

    /// Comments of a post, newest first
    pub fn list_for_post(conn: &Connection, post_id: i32) -> Result<Vec<Comment>> {
        comments::table
            .filter(comments::post_id.eq(post_id))
            .order((comments::created_at.desc(), comments::id.desc()))
            .load::<Comment>(conn)
            .map_err(Error::from)
    }

    pub fn count_for_author(conn: &Connection, author_id: i32) -> Result<i64> {
        comments::table
            .filter(comments::author_id.eq(author_id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.author_id)
    }

    pub fn to_api(&self, conn: &Connection) -> Result<CommentData> {
        Ok(CommentData {
            id: self.id,
            post_id: self.post_id,
            author: self.get_author(conn)?.username,
            text: self.text.clone(),
            created_at: self.created_at.format(DATE_FORMAT).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{posts::NewPost, tests::db, users::tests::fill_database};
    use diesel::Connection as _;

    #[test]
    fn newest_first() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let post = Post::create(&conn, NewPost::new(users[0].id, "Hello", None, None)).unwrap();
            let first = Comment::create(&conn, &post, &users[1], "First!").unwrap();
            let second = Comment::create(&conn, &post, &users[2], "Second").unwrap();

            let listed = Comment::list_for_post(&conn, post.id).unwrap();
            assert_eq!(listed, vec![second, first]);
            assert_eq!(listed[0].to_api(&conn).unwrap().author, "other");
            assert_eq!(users[1].count_comments(&conn).unwrap(), 1);
            Ok(())
        })
    }

    #[test]
    fn empty_comment() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let post = Post::create(&conn, NewPost::new(users[0].id, "Hello", None, None)).unwrap();
            assert!(matches!(
                Comment::create(&conn, &post, &users[1], "\n"),
                Err(Error::Validation(_))
            ));
            Ok(())
        })
    }
}
