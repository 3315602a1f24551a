use crate::{
    schema::{groups, posts},
    Connection, Error, Result,
};
use diesel::{self, Connection as _, ExpressionMethods, QueryDsl, RunQueryDsl};
use std::fmt;
use tracing::info;
use yatube_api::groups::GroupData;
use yatube_common::utils::{is_valid_slug, slugify, truncate_chars};

/// Longest accepted group title, in characters
pub const TITLE_MAX_LENGTH: usize = 200;
/// Groups are displayed with their title cut to this many characters
pub const DISPLAY_LENGTH: usize = 100;

#[derive(Queryable, Identifiable, Clone, Debug, PartialEq)]
pub struct Group {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Clone, Debug, Default, Insertable)]
#[table_name = "groups"]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl NewGroup {
    pub fn new(title: &str, slug: Option<&str>, description: &str) -> NewGroup {
        NewGroup {
            title: title.trim().to_owned(),
            slug: slug.map(str::trim).unwrap_or_default().to_owned(),
            description: description.to_owned(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.title.is_empty() {
            return Err(Error::Validation("the title can't be empty".into()));
        }
        if self.title.chars().count() > TITLE_MAX_LENGTH {
            return Err(Error::Validation(format!(
                "the title can't be longer than {} characters",
                TITLE_MAX_LENGTH
            )));
        }
        Ok(())
    }

    /// Gives the group its URL identifier.
    ///
    /// A slug chosen by the user is kept as long as it is URL-safe. Otherwise
    /// one is derived from the title. Either way it must not be used by
    /// another group yet: no suffix is ever appended to make it unique.
    pub fn assign_slug(&mut self, conn: &Connection) -> Result<()> {
        if self.slug.is_empty() {
            self.slug = slugify(&self.title);
            if self.slug.is_empty() {
                return Err(Error::Validation(format!(
                    "couldn't derive a slug from \"{}\", please choose one",
                    self.title
                )));
            }
        } else if !is_valid_slug(&self.slug) {
            return Err(Error::Validation(
                "slugs may only contain lowercase letters, digits, hyphens and underscores".into(),
            ));
        }

        if Group::slug_used(conn, &self.slug)? {
            return Err(Error::DuplicateSlug(self.slug.clone()));
        }
        Ok(())
    }
}

impl Group {
    insert!(groups, NewGroup);
    get!(groups);
    find_by!(groups, find_by_slug, slug as &str);

    /// Validates the group, assigns its slug and saves it.
    pub fn create(conn: &Connection, mut new: NewGroup) -> Result<Group> {
        new.validate()?;
        conn.transaction(|| {
            new.assign_slug(conn)?;
            let slug = new.slug.clone();
            let group = Group::insert(conn, new).map_err(|err| match err {
                // somebody else took the slug since we checked
                Error::Db(diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                )) => Error::DuplicateSlug(slug),
                err => err,
            })?;
            info!("Created group {} ({})", group.title, group.slug);
            Ok(group)
        })
    }

    pub fn list(conn: &Connection) -> Result<Vec<Group>> {
        groups::table
            .order_by(groups::title.asc())
            .load::<Group>(conn)
            .map_err(Error::from)
    }

    pub fn slug_used(conn: &Connection, slug: &str) -> Result<bool> {
        use diesel::dsl::{exists, select};

        select(exists(groups::table.filter(groups::slug.eq(slug))))
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn count_posts(&self, conn: &Connection) -> Result<i64> {
        posts::table
            .filter(posts::group_id.eq(self.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    /// Deletes the group. Its posts stay, without a group.
    pub fn delete(&self, conn: &Connection) -> Result<()> {
        conn.transaction(|| {
            diesel::update(posts::table.filter(posts::group_id.eq(self.id)))
                .set(posts::group_id.eq(None::<i32>))
                .execute(conn)?;
            diesel::delete(self).execute(conn)?;
            info!("Deleted group {}", self.slug);
            Ok(())
        })
    }

    /// The title, as shown in listings
    pub fn display_title(&self) -> &str {
        truncate_chars(&self.title, DISPLAY_LENGTH)
    }

    pub fn to_api(&self) -> GroupData {
        GroupData {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            description: self.description.clone(),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_title())
    }
}
