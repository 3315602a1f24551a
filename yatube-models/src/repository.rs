//! Narrow read interfaces over the store, so that the feed can be built
//! against anything that knows the follow graph and the posts.

use crate::{
    posts::Post,
    schema::{follows, posts},
    Connection, Error, Result,
};
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};

pub trait FollowRepository {
    /// Ids of the authors `user_id` follows
    fn followed_ids(&self, user_id: i32) -> Result<Vec<i32>>;
}

pub trait PostRepository {
    fn count_by_authors(&self, authors: &[i32]) -> Result<i64>;

    /// Posts written by any of `authors`, newest first. `limits` is an
    /// `(offset, offset + size)` window; `None` loads everything.
    fn list_by_authors(&self, authors: &[i32], limits: Option<(i32, i32)>) -> Result<Vec<Post>>;
}

impl FollowRepository for Connection {
    fn followed_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        follows::table
            .filter(follows::user_id.eq(user_id))
            .select(follows::author_id)
            .load::<i32>(self)
            .map_err(Error::from)
    }
}

impl PostRepository for Connection {
    fn count_by_authors(&self, authors: &[i32]) -> Result<i64> {
        posts::table
            .filter(posts::author_id.eq_any(authors))
            .count()
            .get_result(self)
            .map_err(Error::from)
    }

    fn list_by_authors(&self, authors: &[i32], limits: Option<(i32, i32)>) -> Result<Vec<Post>> {
        let mut query = posts::table
            .filter(posts::author_id.eq_any(authors))
            .order((posts::created_at.desc(), posts::id.desc()))
            .into_boxed();
        if let Some((min, max)) = limits {
            query = query.offset(min.into()).limit((max - min).into());
        }
        query.load::<Post>(self).map_err(Error::from)
    }
}
