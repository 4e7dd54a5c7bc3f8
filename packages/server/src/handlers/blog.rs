use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use tracing::instrument;
use uuid::Uuid;

use crate::blog::{BlogService, ImageUpdate};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::blog::{BlogForm, BlogResponse, MessageResponse, PrivateBlogsResponse};
use crate::state::AppState;
use crate::utils::upload::stage_image;

/// Room left for the text parts and multipart framing on top of the image.
const FORM_OVERHEAD: u64 = 1024 * 1024;

pub fn blog_body_limit(max_image_size: u64) -> DefaultBodyLimit {
    let limit = max_image_size.saturating_add(FORM_OVERHEAD);
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}

#[utoipa::path(
    get,
    path = "/public",
    tag = "Blogs",
    operation_id = "listPublicBlogs",
    summary = "List all blogs",
    description = "Returns every blog, oldest first. No authentication required.",
    responses(
        (status = 200, description = "All blogs", body = Vec<BlogResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_public_blogs(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlogResponse>>, AppError> {
    let blogs = BlogService::new(&state.db, &*state.media).list().await?;
    Ok(Json(blogs.into_iter().map(BlogResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/private",
    tag = "Blogs",
    operation_id = "listPrivateBlogs",
    summary = "List all blogs with the current user",
    description = "Returns the same blogs as the public listing together with the identity \
        resolved from the bearer token.",
    responses(
        (status = 200, description = "Blogs and current user", body = PrivateBlogsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_private_blogs(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<PrivateBlogsResponse>, AppError> {
    let blogs = BlogService::new(&state.db, &*state.media).list().await?;
    Ok(Json(PrivateBlogsResponse {
        blogs: blogs.into_iter().map(BlogResponse::from).collect(),
        user: auth_user.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Blogs",
    operation_id = "getBlog",
    summary = "Get a blog by ID",
    params(("id" = String, Path, description = "Blog ID (UUID)")),
    responses(
        (status = 200, description = "Blog details", body = BlogResponse),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Blog not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogResponse>, AppError> {
    let id = parse_blog_id(&id)?;
    let blog = BlogService::new(&state.db, &*state.media)
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;
    Ok(Json(blog.into()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Blogs",
    operation_id = "createBlog",
    summary = "Create a blog",
    description = "Text fields `title`, `content`, `blogger`, `category` and `summary` are \
        required. An optional `image` file is uploaded to the media store and attached.",
    request_body(content_type = "multipart/form-data", description = "Blog fields with optional image"),
    responses(
        (status = 200, description = "Blog created", body = MessageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Media or record store failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn create_blog(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<MessageResponse>, AppError> {
    let (new_blog, image) = read_blog_form(multipart, state.config.storage.max_image_size)
        .await
        .and_then(BlogForm::into_new_blog)
        .map_err(not_added)?;

    BlogService::new(&state.db, &*state.media)
        .create(new_blog, image.as_ref().map(|staged| staged.path()))
        .await?;

    Ok(Json(MessageResponse::new("Blog added successfully")))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Blogs",
    operation_id = "updateBlog",
    summary = "Update a blog",
    description = "Overwrites `title`, `content`, `blogger` and `category`. With \
        `removeImage=true` the current image is deleted and cleared; otherwise an `image` \
        file replaces the current image. Without either the image is left untouched.",
    params(("id" = String, Path, description = "Blog ID (UUID)")),
    request_body(content_type = "multipart/form-data", description = "Blog fields with optional image and removeImage flag"),
    responses(
        (status = 200, description = "Blog updated", body = MessageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Blog not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Media or record store failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_blog_id(&id)?;
    let form = read_blog_form(multipart, state.config.storage.max_image_size).await?;
    let remove_image = form.wants_image_removed();
    let (changes, image) = form.into_changes()?;

    let image_update = if remove_image {
        ImageUpdate::Remove
    } else if let Some(staged) = &image {
        ImageUpdate::Replace(staged.path())
    } else {
        ImageUpdate::Keep
    };

    BlogService::new(&state.db, &*state.media)
        .update(id, changes, image_update)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;

    Ok(Json(MessageResponse::new("Updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Blogs",
    operation_id = "deleteBlog",
    summary = "Delete a blog",
    description = "Deletes the blog and its image. An unknown ID is answered with 401 \
        (BLOG_NOT_FOUND) for compatibility with existing clients.",
    params(("id" = String, Path, description = "Blog ID (UUID)")),
    responses(
        (status = 200, description = "Blog deleted", body = MessageResponse),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Blog not found (BLOG_NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Media or record store failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_blog_id(&id)?;

    BlogService::new(&state.db, &*state.media)
        .delete(id)
        .await?
        .ok_or(AppError::BlogMissing)?;

    Ok(Json(MessageResponse::new("Successfully deleted Blog")))
}

/// Prefix client errors on create with the message clients already expect.
fn not_added(err: AppError) -> AppError {
    match err {
        AppError::Validation(msg) => AppError::Validation(format!("Blog could not be added: {msg}")),
        other => other,
    }
}

fn parse_blog_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::Validation("Invalid blog ID".into()))
}

/// Collect the blog form, staging the `image` part to a temp file.
async fn read_blog_form(
    mut multipart: Multipart,
    max_image_size: u64,
) -> Result<BlogForm, AppError> {
    let mut form = BlogForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            match stage_image(field, max_image_size).await {
                Ok(staged) => form.image = staged,
                // Reported later; an update that removes the image ignores the file.
                Err(AppError::Validation(msg)) => {
                    form.image = None;
                    form.image_error = Some(AppError::Validation(msg));
                }
                Err(e) => return Err(e),
            }
            continue;
        }

        let slot = match name.as_str() {
            "title" => &mut form.title,
            "summary" => &mut form.summary,
            "content" => &mut form.content,
            "category" => &mut form.category,
            "blogger" => &mut form.blogger,
            "removeImage" => &mut form.remove_image,
            _ => continue, // Ignore unknown fields.
        };
        let text = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read '{name}': {e}")))?;
        *slot = Some(text);
    }

    if let Some(staged) = &form.image {
        tracing::debug!(
            file_name = %staged.file_name,
            content_type = %staged.content_type,
            size = staged.size,
            "Received blog image"
        );
    }

    Ok(form)
}
