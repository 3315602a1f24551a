use crate::{
    pagination::{Page, Paginated},
    posts::Post,
    repository::{FollowRepository, PostRepository},
    users::User,
    Connection, Result, ITEMS_PER_PAGE,
};

/// The posts written by the authors someone follows, newest first.
pub struct Feed<'a, F: ?Sized, P: ?Sized> {
    follows: &'a F,
    posts: &'a P,
}

impl<'a> Feed<'a, Connection, Connection> {
    /// A feed reading both the follow graph and the posts from the database.
    pub fn for_conn(conn: &'a Connection) -> Self {
        Feed::new(conn, conn)
    }
}

impl<'a, F, P> Feed<'a, F, P>
where
    F: FollowRepository + ?Sized,
    P: PostRepository + ?Sized,
{
    pub fn new(follows: &'a F, posts: &'a P) -> Self {
        Feed { follows, posts }
    }

    fn followed(&self, viewer: Option<&User>) -> Result<Vec<i32>> {
        match viewer {
            Some(user) => self.follows.followed_ids(user.id),
            None => Ok(vec![]),
        }
    }

    /// The whole feed. Anonymous viewers and people following nobody get an empty one.
    pub fn build(&self, viewer: Option<&User>) -> Result<Vec<Post>> {
        let authors = self.followed(viewer)?;
        if authors.is_empty() {
            return Ok(vec![]);
        }
        self.posts.list_by_authors(&authors, None)
    }

    /// One page of the feed, only loading the posts of that page.
    pub fn page(&self, viewer: Option<&User>, page: Page) -> Result<Paginated<Post>> {
        let authors = self.followed(viewer)?;
        let count = if authors.is_empty() {
            0
        } else {
            self.posts.count_by_authors(&authors)?
        };
        Paginated::from_count(count, ITEMS_PER_PAGE, page.number(), |limits| {
            self.posts.list_by_authors(&authors, Some(limits))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        follows::Follow,
        posts::{tests::fill_database as fill_posts, NewPost},
        tests::db,
        users::tests::fill_database as fill_users,
    };
    use chrono::{NaiveDate, NaiveDateTime};
    use diesel::Connection as _;

    struct FakeFollows(Vec<(i32, i32)>);

    impl FollowRepository for FakeFollows {
        fn followed_ids(&self, user_id: i32) -> Result<Vec<i32>> {
            Ok(self
                .0
                .iter()
                .filter(|(user, _)| *user == user_id)
                .map(|(_, author)| *author)
                .collect())
        }
    }

    struct FakePosts(Vec<Post>);

    impl PostRepository for FakePosts {
        fn count_by_authors(&self, authors: &[i32]) -> Result<i64> {
            Ok(self.list_by_authors(authors, None)?.len() as i64)
        }

        fn list_by_authors(&self, authors: &[i32], limits: Option<(i32, i32)>) -> Result<Vec<Post>> {
            let mut posts = self
                .0
                .iter()
                .filter(|p| authors.contains(&p.author_id))
                .cloned()
                .collect::<Vec<_>>();
            posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
            Ok(match limits {
                Some((min, max)) => posts
                    .into_iter()
                    .skip(min as usize)
                    .take((max - min) as usize)
                    .collect(),
                None => posts,
            })
        }
    }

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd(2024, 3, 1).and_hms(12, minute, 0)
    }

    fn post(id: i32, author_id: i32, created_at: NaiveDateTime) -> Post {
        Post {
            id,
            text: format!("post {}", id),
            created_at,
            author_id,
            group_id: None,
            image: None,
        }
    }

    fn user(id: i32) -> User {
        User {
            id,
            username: format!("user{}", id),
            display_name: String::new(),
            creation_date: at(0),
        }
    }

    #[test]
    fn only_followed_authors_newest_first() {
        let follows = FakeFollows(vec![(1, 2), (1, 3), (2, 1)]);
        let posts = FakePosts(vec![
            post(1, 2, at(1)),
            post(2, 3, at(5)),
            post(3, 4, at(9)),
            post(4, 2, at(5)),
            post(5, 1, at(7)),
        ]);
        let feed = Feed::new(&follows, &posts);

        let ids = feed
            .build(Some(&user(1)))
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect::<Vec<_>>();
        // same date: the most recent id comes first
        assert_eq!(ids, vec![4, 2, 1]);
    }

    #[test]
    fn empty_feeds() {
        let follows = FakeFollows(vec![(1, 2)]);
        let posts = FakePosts(vec![post(1, 3, at(1))]);
        let feed = Feed::new(&follows, &posts);

        assert!(feed.build(None).unwrap().is_empty());
        // following somebody who never posted
        assert!(feed.build(Some(&user(1))).unwrap().is_empty());
        // following nobody
        assert!(feed.build(Some(&user(3))).unwrap().is_empty());

        let page = feed.page(None, Page::first()).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn page_agrees_with_build() {
        let follows = FakeFollows(vec![(1, 2), (1, 3)]);
        let posts = FakePosts(
            (1..=25)
                .map(|id| post(id, 2 + id % 3, at(id as u32)))
                .collect(),
        );
        let feed = Feed::new(&follows, &posts);
        let viewer = user(1);

        for page in 0..5 {
            assert_eq!(
                feed.page(Some(&viewer), Page::new(page)).unwrap(),
                Paginated::paginate(feed.build(Some(&viewer)).unwrap(), ITEMS_PER_PAGE, page)
            );
        }
    }

    #[test]
    fn database_feed() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_users(&conn);
            let posts = fill_posts(&conn, &users[1]);
            let other = Post::create(&conn, NewPost::new(users[2].id, "Not followed", None, None))
                .unwrap();
            Follow::follow(&conn, &users[0], &users[1]).unwrap();

            let feed = Feed::for_conn(&conn);
            let built = feed.build(Some(&users[0])).unwrap();
            assert_eq!(built.len(), 13);
            assert_eq!(built[0], posts[12]);
            assert!(!built.contains(&other));

            let first = feed.page(Some(&users[0]), Page::first()).unwrap();
            assert_eq!(first.items.len(), 10);
            let second = feed.page(Some(&users[0]), Page::new(2)).unwrap();
            assert_eq!(second.items.len(), 3);

            // a deleted post leaves the feed of its readers
            posts[12].delete(&conn, &users[1]).unwrap();
            let built = feed.build(Some(&users[0])).unwrap();
            assert_eq!(built.len(), 12);
            assert!(!built.contains(&posts[12]));

            Follow::unfollow(&conn, users[0].id, users[1].id).unwrap();
            assert!(feed.build(Some(&users[0])).unwrap().is_empty());
            Ok(())
        })
    }
}
