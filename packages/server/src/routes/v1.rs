use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers::blog::*;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/blogs", blog_routes(config))
}

fn blog_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_public_blogs))
        .routes(routes!(list_private_blogs))
        .routes(routes!(create_blog))
        .routes(routes!(get_blog, update_blog, delete_blog))
        .layer(blog_body_limit(config.storage.max_image_size))
}
