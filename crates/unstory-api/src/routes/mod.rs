//! Route definitions
//!
//! API routes are mounted under /api/v1; health probes live at the root.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{engagement, health, posts, tags, users};
use crate::state::AppState;

/// API router (health routes are separate so they skip rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Liveness and readiness probes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(post_routes())
        .merge(tag_routes())
        .merge(user_routes())
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(posts::search_posts).post(posts::create_post))
        .route("/posts/featured", get(posts::featured_posts))
        .route(
            "/posts/:slug",
            get(posts::get_post)
                .patch(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/posts/:slug/publish", post(posts::publish_post))
        // Engagement
        .route(
            "/posts/:slug/like",
            get(engagement::get_like_status).post(engagement::toggle_like),
        )
        .route("/posts/:slug/view", post(engagement::record_view))
}

fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/tags", get(tags::list_tags))
        .route("/tags/:tag", get(tags::get_tag_page))
        .route("/categories/:name", get(tags::get_category))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/@me",
            get(users::get_current_user).patch(users::update_current_user),
        )
        .route("/users/by-username/:username", get(users::get_profile))
        .route(
            "/users/by-username/:username/posts",
            get(users::get_profile_posts),
        )
        .route(
            "/users/:user_id/follow",
            get(users::get_follow_status).post(users::toggle_follow),
        )
        .route("/users/:user_id/stats", get(users::get_follower_stats))
}
