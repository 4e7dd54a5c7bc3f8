use std::path::Path;

use chrono::Utc;
use common::media::{MediaError, MediaStore, UploadedImage};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, QueryOrder, Set};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::entity::blog;

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("record store: {0}")]
    Db(#[from] DbErr),

    #[error("media store: {0}")]
    Media(#[from] MediaError),
}

/// Fields of a blog about to be created.
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub category: String,
    pub blogger: String,
}

/// Fields overwritten by an update.
#[derive(Debug, Clone)]
pub struct BlogChanges {
    pub title: String,
    pub content: String,
    pub category: String,
    pub blogger: String,
}

/// What an update does to the attached image.
#[derive(Debug, Clone, Copy)]
pub enum ImageUpdate<'a> {
    /// Leave `image` and `image_id` as they are.
    Keep,
    /// Delete the current asset, if any, and clear both fields.
    Remove,
    /// Delete the current asset, if any, then upload the file at this path.
    Replace(&'a Path),
}

/// Blog operations over a record store and a media store.
pub struct BlogService<'a, C: ConnectionTrait> {
    conn: &'a C,
    media: &'a dyn MediaStore,
}

impl<'a, C: ConnectionTrait> BlogService<'a, C> {
    pub fn new(conn: &'a C, media: &'a dyn MediaStore) -> Self {
        Self { conn, media }
    }

    /// All blogs, oldest first.
    pub async fn list(&self) -> Result<Vec<blog::Model>, BlogError> {
        let blogs = blog::Entity::find()
            .order_by_asc(blog::Column::CreatedAt)
            .order_by_asc(blog::Column::Id)
            .all(self.conn)
            .await?;
        Ok(blogs)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<blog::Model>, BlogError> {
        Ok(blog::Entity::find_by_id(id).one(self.conn).await?)
    }

    /// Insert a blog, uploading `image` first when given.
    ///
    /// If the insert fails after a successful upload the asset is removed
    /// again.
    pub async fn create(
        &self,
        new_blog: NewBlog,
        image: Option<&Path>,
    ) -> Result<blog::Model, BlogError> {
        let uploaded = match image {
            Some(path) => Some(self.media.upload(path).await?),
            None => None,
        };

        let now = Utc::now();
        let model = blog::ActiveModel {
            id: Set(Uuid::now_v7()),
            title: Set(new_blog.title),
            summary: Set(new_blog.summary),
            content: Set(new_blog.content),
            category: Set(new_blog.category),
            blogger: Set(new_blog.blogger),
            image: Set(uploaded.as_ref().map(|u| u.image_url.clone())),
            image_id: Set(uploaded.as_ref().map(|u| u.public_id.clone())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match model.insert(self.conn).await {
            Ok(created) => {
                info!(id = %created.id, has_image = created.image.is_some(), "Blog created");
                Ok(created)
            }
            Err(e) => {
                if let Some(UploadedImage { public_id, .. }) = uploaded {
                    self.discard_orphan(&public_id).await;
                }
                Err(e.into())
            }
        }
    }

    /// Apply `changes` and `image` to an existing blog.
    ///
    /// Returns `Ok(None)` without touching the media store when no blog has
    /// this id.
    pub async fn update(
        &self,
        id: Uuid,
        changes: BlogChanges,
        image: ImageUpdate<'_>,
    ) -> Result<Option<blog::Model>, BlogError> {
        let Some(existing) = self.find(id).await? else {
            return Ok(None);
        };

        let old_image_id = existing.image_id.clone();
        let mut active: blog::ActiveModel = existing.into();

        match image {
            ImageUpdate::Keep => {}
            ImageUpdate::Remove => {
                if let Some(old) = &old_image_id {
                    self.media.delete(old).await?;
                }
                active.image = Set(None);
                active.image_id = Set(None);
            }
            ImageUpdate::Replace(path) => {
                if let Some(old) = &old_image_id {
                    self.media.delete(old).await?;
                }
                let uploaded = self.media.upload(path).await?;
                active.image = Set(Some(uploaded.image_url));
                active.image_id = Set(Some(uploaded.public_id));
            }
        }

        active.title = Set(changes.title);
        active.content = Set(changes.content);
        active.blogger = Set(changes.blogger);
        active.category = Set(changes.category);
        active.updated_at = Set(Utc::now());

        let updated = active.update(self.conn).await?;
        info!(id = %updated.id, "Blog updated");
        Ok(Some(updated))
    }

    /// Delete a blog and its image.
    ///
    /// Returns the removed blog, or `Ok(None)` when no blog has this id.
    pub async fn delete(&self, id: Uuid) -> Result<Option<blog::Model>, BlogError> {
        let Some(existing) = self.find(id).await? else {
            return Ok(None);
        };

        let result = blog::Entity::delete_by_id(id).exec(self.conn).await?;
        if result.rows_affected == 0 {
            // Lost a race with another delete.
            return Ok(None);
        }

        if let Some(public_id) = &existing.image_id {
            self.media.delete(public_id).await?;
        }

        info!(id = %existing.id, "Blog deleted");
        Ok(Some(existing))
    }

    async fn discard_orphan(&self, public_id: &str) {
        if let Err(e) = self.media.delete(public_id).await {
            warn!(%public_id, "Failed to remove orphaned image: {e}");
        }
    }
}
