use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::blog::{BlogChanges, NewBlog};
use crate::entity::blog;
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::utils::upload::StagedImage;

/// The literal value of `removeImage` that requests image removal.
pub const REMOVE_IMAGE_FLAG: &str = "true";

/// A blog post as returned by the API.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogResponse {
    /// Blog ID (UUIDv7).
    #[schema(example = "01936f0e-1234-7abc-8000-000000000001")]
    pub id: String,
    #[schema(example = "Sourdough at altitude")]
    pub title: String,
    #[schema(example = "What changes above 2000m.")]
    pub summary: String,
    pub content: String,
    #[schema(example = "baking")]
    pub category: String,
    #[schema(example = "alice")]
    pub blogger: String,
    /// Public URL of the attached image. Omitted when there is none.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "http://127.0.0.1:3000/media/blog-images/01936f0e.png")]
    pub image: Option<String>,
    /// Media store identifier of the attached image. Present iff `image` is.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "blog-images/01936f0e.png")]
    pub image_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<blog::Model> for BlogResponse {
    fn from(model: blog::Model) -> Self {
        Self {
            id: model.id.to_string(),
            title: model.title,
            summary: model.summary,
            content: model.content,
            category: model.category,
            blogger: model.blogger,
            image: model.image,
            image_id: model.image_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Confirmation returned by write operations.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Blog added successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Identity resolved from the bearer token.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CurrentUser {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "writer")]
    pub role: String,
}

impl From<AuthUser> for CurrentUser {
    fn from(user: AuthUser) -> Self {
        Self {
            id: user.user_id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Response for the authenticated listing.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PrivateBlogsResponse {
    pub blogs: Vec<BlogResponse>,
    pub user: CurrentUser,
}

/// Fields collected from a blog multipart form.
///
/// Text fields stay `None` when the part was not sent.
#[derive(Debug, Default)]
pub struct BlogForm {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub blogger: Option<String>,
    pub remove_image: Option<String>,
    pub image: Option<StagedImage>,
    /// Why the `image` part was refused. Ignored when the image is removed.
    pub image_error: Option<AppError>,
}

fn require(value: Option<String>, field: &str) -> Result<String, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("Missing '{field}' field")))
}

impl BlogForm {
    /// Whether the client asked for the current image to be dropped.
    pub fn wants_image_removed(&self) -> bool {
        self.remove_image.as_deref() == Some(REMOVE_IMAGE_FLAG)
    }

    /// Split the form into a new blog and its optional image.
    pub fn into_new_blog(self) -> Result<(NewBlog, Option<StagedImage>), AppError> {
        if let Some(err) = self.image_error {
            return Err(err);
        }
        let blog = NewBlog {
            title: require(self.title, "title")?,
            summary: require(self.summary, "summary")?,
            content: require(self.content, "content")?,
            category: require(self.category, "category")?,
            blogger: require(self.blogger, "blogger")?,
        };
        Ok((blog, self.image))
    }

    /// Split the form into the overwritten fields and its optional image.
    ///
    /// `summary` is not part of an update and is ignored if sent. A refused
    /// image only fails the update when the image is not being removed.
    pub fn into_changes(self) -> Result<(BlogChanges, Option<StagedImage>), AppError> {
        if !self.wants_image_removed() {
            if let Some(err) = self.image_error {
                return Err(err);
            }
        }
        let changes = BlogChanges {
            title: require(self.title, "title")?,
            content: require(self.content, "content")?,
            category: require(self.category, "category")?,
            blogger: require(self.blogger, "blogger")?,
        };
        Ok((changes, self.image))
    }
}
