use crate::{
    comments::Comment,
    groups::Group,
    pagination::{Page, Paginated},
    schema::{comments, posts, users},
    users::User,
    Connection, Error, Result, ITEMS_PER_PAGE,
};
use chrono::{NaiveDateTime, Utc};
use diesel::{self, Connection as _, ExpressionMethods, QueryDsl, RunQueryDsl};
use std::fmt;
use tracing::info;
use yatube_api::posts::{PostData, PostViewData};
use yatube_common::utils::truncate_chars;

/// Posts are displayed with their text cut to this many characters
pub const DISPLAY_LENGTH: usize = 15;

/// Format used when dates leave the database
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Queryable, Identifiable, Clone, Debug, PartialEq)]
pub struct Post {
    pub id: i32,
    pub text: String,
    pub created_at: NaiveDateTime,
    pub author_id: i32,
    pub group_id: Option<i32>,
    pub image: Option<String>,
}

#[derive(Insertable)]
#[table_name = "posts"]
pub struct NewPost {
    pub text: String,
    pub created_at: NaiveDateTime,
    pub author_id: i32,
    pub group_id: Option<i32>,
    pub image: Option<String>,
}

impl NewPost {
    pub fn new(author_id: i32, text: &str, group_id: Option<i32>, image: Option<String>) -> Self {
        NewPost {
            text: text.to_owned(),
            created_at: Utc::now().naive_utc(),
            author_id,
            group_id,
            image: image.filter(|i| !i.is_empty()),
        }
    }
}

/// What the author of a post is allowed to change. The creation date is not part of it.
#[derive(AsChangeset)]
#[table_name = "posts"]
#[changeset_options(treat_none_as_null = "true")]
pub struct PostChanges {
    pub text: String,
    pub group_id: Option<i32>,
    pub image: Option<String>,
}

fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        Err(Error::Validation("the text of a post can't be empty".into()))
    } else {
        Ok(())
    }
}

fn check_group(conn: &Connection, group_id: Option<i32>) -> Result<()> {
    if let Some(id) = group_id {
        Group::get(conn, id)?;
    }
    Ok(())
}

impl Post {
    insert!(posts, NewPost);
    get!(posts);

    /// Publishes a new post, after checking its text, its author and its group.
    pub fn create(conn: &Connection, new: NewPost) -> Result<Post> {
        validate_text(&new.text)?;
        User::get(conn, new.author_id)?;
        check_group(conn, new.group_id)?;
        let post = Post::insert(conn, new)?;
        info!("Post {} published by user {}", post.id, post.author_id);
        Ok(post)
    }

    /// Finds a post through its author's username, as it appears in URLs.
    pub fn find_for_author(conn: &Connection, username: &str, id: i32) -> Result<Post> {
        posts::table
            .inner_join(users::table)
            .filter(users::username.eq(username))
            .filter(posts::id.eq(id))
            .select(posts::all_columns)
            .first(conn)
            .map_err(Error::from)
    }

    pub fn is_author(&self, user: &User) -> bool {
        self.author_id == user.id
    }

    /// Lets the author change the text, the group or the image of a post.
    pub fn update(&self, conn: &Connection, editor: &User, changes: PostChanges) -> Result<Post> {
        if !self.is_author(editor) {
            return Err(Error::Unauthorized);
        }
        validate_text(&changes.text)?;
        check_group(conn, changes.group_id)?;
        diesel::update(self).set(&changes).execute(conn)?;
        Post::get(conn, self.id)
    }

    /// Deletes the post and its comments. Only its author may do it.
    pub fn delete(&self, conn: &Connection, by: &User) -> Result<()> {
        if !self.is_author(by) {
            return Err(Error::Unauthorized);
        }
        conn.transaction(|| {
            diesel::delete(comments::table.filter(comments::post_id.eq(self.id)))
                .execute(conn)?;
            diesel::delete(self).execute(conn)?;
            info!("Post {} deleted", self.id);
            Ok(())
        })
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        posts::table
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn list_page(conn: &Connection, (min, max): (i32, i32)) -> Result<Vec<Post>> {
        posts::table
            .order((posts::created_at.desc(), posts::id.desc()))
            .offset(min.into())
            .limit((max - min).into())
            .load::<Post>(conn)
            .map_err(Error::from)
    }

    /// Every post, newest first
    pub fn page(conn: &Connection, page: Page) -> Result<Paginated<Post>> {
        Paginated::from_count(
            Post::count(conn)?,
            ITEMS_PER_PAGE,
            page.number(),
            |limits| Post::list_page(conn, limits),
        )
    }

    pub fn count_for_group(conn: &Connection, group_id: i32) -> Result<i64> {
        posts::table
            .filter(posts::group_id.eq(group_id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn group_page(
        conn: &Connection,
        group_id: i32,
        (min, max): (i32, i32),
    ) -> Result<Vec<Post>> {
        posts::table
            .filter(posts::group_id.eq(group_id))
            .order((posts::created_at.desc(), posts::id.desc()))
            .offset(min.into())
            .limit((max - min).into())
            .load::<Post>(conn)
            .map_err(Error::from)
    }

    pub fn page_for_group(conn: &Connection, group: &Group, page: Page) -> Result<Paginated<Post>> {
        Paginated::from_count(
            Post::count_for_group(conn, group.id)?,
            ITEMS_PER_PAGE,
            page.number(),
            |limits| Post::group_page(conn, group.id, limits),
        )
    }

    pub fn count_for_author(conn: &Connection, author_id: i32) -> Result<i64> {
        posts::table
            .filter(posts::author_id.eq(author_id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn author_page(
        conn: &Connection,
        author_id: i32,
        (min, max): (i32, i32),
    ) -> Result<Vec<Post>> {
        posts::table
            .filter(posts::author_id.eq(author_id))
            .order((posts::created_at.desc(), posts::id.desc()))
            .offset(min.into())
            .limit((max - min).into())
            .load::<Post>(conn)
            .map_err(Error::from)
    }

    pub fn page_for_author(conn: &Connection, author: &User, page: Page) -> Result<Paginated<Post>> {
        Paginated::from_count(
            Post::count_for_author(conn, author.id)?,
            ITEMS_PER_PAGE,
            page.number(),
            |limits| Post::author_page(conn, author.id, limits),
        )
    }

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.author_id)
    }

    pub fn get_group(&self, conn: &Connection) -> Result<Option<Group>> {
        self.group_id.map(|id| Group::get(conn, id)).transpose()
    }

    /// The beginning of the text, as shown in listings
    pub fn excerpt(&self) -> &str {
        truncate_chars(&self.text, DISPLAY_LENGTH)
    }

    pub fn to_api(&self, conn: &Connection) -> Result<PostData> {
        Ok(PostData {
            id: self.id,
            text: self.text.clone(),
            created_at: self.created_at.format(DATE_FORMAT).to_string(),
            author: self.get_author(conn)?.username,
            group: self.get_group(conn)?.map(|g| g.slug),
            image: self.image.clone(),
        })
    }

    /// The post, its author and its comments, newest first
    pub fn to_view_api(&self, conn: &Connection) -> Result<PostViewData> {
        Ok(PostViewData {
            post: self.to_api(conn)?,
            author: self.get_author(conn)?.to_api(conn)?,
            comments: Comment::list_for_post(conn, self.id)?
                .iter()
                .map(|c| c.to_api(conn))
                .collect::<Result<Vec<_>>>()?,
        })
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.excerpt())
    }
}
