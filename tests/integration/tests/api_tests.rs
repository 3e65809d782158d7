//! API Integration Tests
//!
//! These tests require a running PostgreSQL instance reachable through
//! `DATABASE_URL`; they are skipped when it is unset. Migrations are applied
//! on startup.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, fixtures::*, TestServer, TestUser,
};
use reqwest::{header::SET_COOKIE, StatusCode};

async fn create_post(server: &TestServer, user: &TestUser, body: &CreatePostBody) -> PostBody {
    let response = server.post_as("/api/v1/posts", user, body).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Posts
// ============================================================================

#[tokio::test]
async fn test_draft_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.sign_in("author").unwrap();
    let reader = server.sign_in("reader").unwrap();

    let draft = create_post(&server, &author, &CreatePostBody::draft("Work in progress")).await;
    assert!(!draft.published);
    assert!(draft.slug.starts_with("work-in-progress"));
    assert_eq!(draft.author.as_ref().unwrap().id, author.id());

    // Drafts are invisible to everyone but the author
    let path = format!("/api/v1/posts/{}", draft.slug);
    let code = assert_error(server.get(&path).await.unwrap(), StatusCode::NOT_FOUND)
        .await
        .unwrap();
    assert_eq!(code, "UNKNOWN_POST");
    let mine: PostBody = assert_json(server.get_as(&path, &author).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert!(mine.content.is_some());

    // Another user cannot publish it
    let publish = format!("{path}/publish");
    let response = server.post_empty(&publish, Some(&reader)).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let published: PostBody = assert_json(
        server.post_empty(&publish, Some(&author)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(published.published);
    assert_status(server.get(&path).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_slug_freezes_on_publish() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.sign_in("author").unwrap();
    let other = server.sign_in("other").unwrap();
    let draft = create_post(&server, &author, &CreatePostBody::draft("Rename me")).await;

    let wanted = format!("renamed-{}", unique_suffix());
    let rename = UpdatePostBody {
        slug: Some(wanted.clone()),
        ..UpdatePostBody::default()
    };
    let renamed: PostBody = assert_json(
        server
            .patch_as(&format!("/api/v1/posts/{}", draft.slug), &author, &rename)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(renamed.slug, wanted);

    let path = format!("/api/v1/posts/{wanted}");
    server
        .post_empty(&format!("{path}/publish"), Some(&author))
        .await
        .unwrap();

    let rename = UpdatePostBody {
        slug: Some(format!("again-{}", unique_suffix())),
        ..UpdatePostBody::default()
    };
    let code = assert_error(
        server.patch_as(&path, &author, &rename).await.unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    assert_eq!(code, "SLUG_IMMUTABLE");

    let retitle = UpdatePostBody {
        title: Some("Hijacked".to_string()),
        ..UpdatePostBody::default()
    };
    let code = assert_error(
        server.patch_as(&path, &other, &retitle).await.unwrap(),
        StatusCode::FORBIDDEN,
    )
    .await
    .unwrap();
    assert_eq!(code, "NOT_POST_AUTHOR");
}

#[tokio::test]
async fn test_delete_post() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.sign_in("author").unwrap();
    let post = create_post(&server, &author, &CreatePostBody::published("Short lived", &[])).await;
    let path = format!("/api/v1/posts/{}", post.slug);

    server.post_empty(&format!("{path}/like"), Some(&author)).await.unwrap();
    let response = server.delete_as(&path, &author).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    assert_status(server.get(&path).await.unwrap(), StatusCode::NOT_FOUND)
        .await
        .unwrap();
}

// ============================================================================
// Engagement
// ============================================================================

#[tokio::test]
async fn test_like_toggle_round_trip() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.sign_in("author").unwrap();
    let reader = server.sign_in("reader").unwrap();
    let post = create_post(&server, &author, &CreatePostBody::published("Likeable", &[])).await;
    let like = format!("/api/v1/posts/{}/like", post.slug);

    let first: LikeToggleBody = assert_json(
        server.post_empty(&like, Some(&reader)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(first.liked);
    assert_eq!(first.likes_count, 1);

    let status: LikeStatusBody = assert_json(server.get_as(&like, &reader).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert!(status.is_liked);
    assert_eq!(status.likes_count, 1);

    let second: LikeToggleBody = assert_json(
        server.post_empty(&like, Some(&reader)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(!second.liked);
    assert_eq!(second.likes_count, 0);

    // Anonymous callers can read but not like
    let code = assert_error(
        server.post_empty(&like, None).await.unwrap(),
        StatusCode::UNAUTHORIZED,
    )
    .await
    .unwrap();
    assert_eq!(code, "AUTHENTICATION_REQUIRED");
    let anonymous: LikeStatusBody = assert_json(server.get(&like).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert!(!anonymous.is_liked);
    assert_eq!(anonymous.likes_count, 0);
}

#[tokio::test]
async fn test_concurrent_likes_keep_counter_consistent() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.sign_in("author").unwrap();
    let post = create_post(&server, &author, &CreatePostBody::published("Popular", &[])).await;
    let like = format!("/api/v1/posts/{}/like", post.slug);

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let reader = server.sign_in("fan").unwrap();
        let client = server.client.clone();
        let url = format!("{}{like}", server.base_url());
        tasks.spawn(async move { client.post(url).bearer_auth(&reader.token).send().await });
    }
    while let Some(result) = tasks.join_next().await {
        assert_status(result.unwrap().unwrap(), StatusCode::OK).await.unwrap();
    }

    let status: LikeStatusBody = assert_json(server.get(&like).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(status.likes_count, 8);
}

#[tokio::test]
async fn test_anonymous_views_dedupe_by_fingerprint_cookie() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.sign_in("author").unwrap();
    let post = create_post(&server, &author, &CreatePostBody::published("Viewed", &[])).await;
    let view = format!("/api/v1/posts/{}/view", post.slug);

    // First visit mints a fingerprint
    let response = server.post_empty(&view, None).await.unwrap();
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("fingerprint cookie");
    assert!(cookie.starts_with("fingerprint="));
    assert!(cookie.contains("HttpOnly"));
    let first: ViewBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(first.success);
    assert!(first.viewed);

    // Reload: the cookie is sent back and nothing new is set
    let response = server.post_empty(&view, None).await.unwrap();
    assert!(response.headers().get(SET_COOKIE).is_none());
    let again: ViewBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!again.viewed);

    // Another visitor
    let stranger = TestServer::new_client().unwrap();
    let other: ViewBody = assert_json(
        server.post_empty_with(&stranger, &view).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(other.viewed);

    let detail: PostBody = assert_json(
        server.get(&format!("/api/v1/posts/{}", post.slug)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(detail.views, 2);
}

#[tokio::test]
async fn test_signed_in_views_count_once() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.sign_in("author").unwrap();
    let reader = server.sign_in("reader").unwrap();
    let post = create_post(&server, &author, &CreatePostBody::published("Read twice", &[])).await;
    let view = format!("/api/v1/posts/{}/view", post.slug);

    let first: ViewBody = assert_json(
        server.post_empty(&view, Some(&reader)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(first.viewed);

    let response = server.post_empty(&view, Some(&reader)).await.unwrap();
    assert!(response.headers().get(SET_COOKIE).is_none());
    let second: ViewBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!second.viewed);

    let missing = assert_error(
        server
            .post_empty("/api/v1/posts/no-such-post/view", None)
            .await
            .unwrap(),
        StatusCode::NOT_FOUND,
    )
    .await
    .unwrap();
    assert_eq!(missing, "UNKNOWN_POST");
}

// ============================================================================
// Feeds
// ============================================================================

#[tokio::test]
async fn test_tag_page_orders_and_paginates() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.sign_in("author").unwrap();
    let reader = server.sign_in("reader").unwrap();
    let tag = format!("Topic {}", unique_suffix());

    let older = create_post(&server, &author, &CreatePostBody::published("Older", &[&tag])).await;
    let newer = create_post(&server, &author, &CreatePostBody::published("Newer", &[&tag])).await;
    server
        .post_empty(&format!("/api/v1/posts/{}/view", older.slug), Some(&reader))
        .await
        .unwrap();

    let slug = &newer.tags[0].slug;
    let latest: TagPageBody = assert_json(
        server
            .get(&format!("/api/v1/tags/{slug}?sort=latest"))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(latest.sort, "latest");
    assert_eq!(latest.total_count, 2);
    assert_eq!(latest.total_pages, 1);
    assert_eq!(latest.posts[0].id, newer.id);

    let popular: TagPageBody = assert_json(
        server
            .get(&format!("/api/v1/tags/{slug}?sort=popular"))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(popular.posts[0].id, older.id);

    // Unknown sort falls back to recommended
    let fallback: TagPageBody = assert_json(
        server
            .get(&format!("/api/v1/tags/{slug}?sort=hottest"))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(fallback.sort, "recommended");

    let code = assert_error(
        server
            .get(&format!("/api/v1/tags/missing-{}", unique_suffix()))
            .await
            .unwrap(),
        StatusCode::NOT_FOUND,
    )
    .await
    .unwrap();
    assert_eq!(code, "UNKNOWN_TAG");
}

#[tokio::test]
async fn test_search_pages_partition_results() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.sign_in("author").unwrap();
    let word = format!("needle{}", unique_suffix());
    for i in 0..3 {
        create_post(
            &server,
            &author,
            &CreatePostBody::published(&format!("{word} part {i}"), &[]),
        )
        .await;
    }

    let mut seen = Vec::new();
    for page in 1..=3 {
        let body: PostPageBody = assert_json(
            server
                .get(&format!("/api/v1/posts?q={word}&limit=1&page={page}"))
                .await
                .unwrap(),
            StatusCode::OK,
        )
        .await
        .unwrap();
        assert_eq!(body.total_count, 3);
        assert_eq!(body.total_pages, 3);
        assert_eq!(body.page, page);
        assert_eq!(body.posts.len(), 1);
        seen.push(body.posts[0].id.clone());
    }
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 3);

    let beyond: PostPageBody = assert_json(
        server
            .get(&format!("/api/v1/posts?q={word}&limit=1&page=9"))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(beyond.posts.is_empty());
    assert_eq!(beyond.total_count, 3);
}

#[tokio::test]
async fn test_tag_directory_and_category() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.sign_in("author").unwrap();
    let tag = format!("Category {}", unique_suffix());
    let post = create_post(&server, &author, &CreatePostBody::published("Filed", &[&tag])).await;

    let tags: Vec<TagSummaryBody> = assert_json(
        server.get("/api/v1/tags?limit=200").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let entry = tags.iter().find(|t| t.name == tag);
    if let Some(entry) = entry {
        assert_eq!(entry.post_count, 1);
    }

    let listed: Vec<PostBody> = assert_json(
        server
            .get(&format!("/api/v1/categories/{}", tag.to_uppercase().replace(' ', "%20")))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, post.id);
}

// ============================================================================
// Users and follows
// ============================================================================

#[tokio::test]
async fn test_profile_and_author_posts() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.sign_in("writer").unwrap();
    create_post(&server, &author, &CreatePostBody::published("Public", &[])).await;
    create_post(&server, &author, &CreatePostBody::draft("Private")).await;

    let me: CurrentUserBody = assert_json(
        server.get_as("/api/v1/users/@me", &author).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(me.id, author.id());
    assert!(!me.show_followers_count);

    let profile: ProfileBody = assert_json(
        server
            .get(&format!("/api/v1/users/by-username/{}", author.username()))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(profile.id, author.id());

    let posts: PostPageBody = assert_json(
        server
            .get(&format!("/api/v1/users/by-username/{}/posts", author.username()))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(posts.total_count, 1);
    assert_eq!(posts.posts[0].title, "Public");
}

#[tokio::test]
async fn test_follow_and_stats_visibility() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.sign_in("alice").unwrap();
    let bob = server.sign_in("bob").unwrap();

    // Bob exists locally once he has done anything
    server.get_as("/api/v1/users/@me", &bob).await.unwrap();

    let follow = format!("/api/v1/users/{}/follow", bob.id());
    let toggled: FollowToggleBody = assert_json(
        server.post_empty(&follow, Some(&alice)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(toggled.is_following);

    let status: FollowStatusBody = assert_json(server.get_as(&follow, &alice).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert!(status.is_following);
    assert!(!status.is_self);

    let own: FollowStatusBody = assert_json(server.get_as(&follow, &bob).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert!(own.is_self);
    assert!(!own.is_following);

    let stats_path = format!("/api/v1/users/{}/stats", bob.id());
    let hidden: FollowerStatsBody = assert_json(server.get(&stats_path).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert!(hidden.hidden);
    assert_eq!(hidden.followers, 0);

    let opt_in = UpdateProfileBody {
        show_followers_count: Some(true),
        ..UpdateProfileBody::default()
    };
    let me: CurrentUserBody = assert_json(
        server.patch_as("/api/v1/users/@me", &bob, &opt_in).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(me.show_followers_count);

    let visible: FollowerStatsBody = assert_json(server.get(&stats_path).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert!(!visible.hidden);
    assert_eq!(visible.followers, 1);
    assert_eq!(visible.following, 0);

    let untoggled: FollowToggleBody = assert_json(
        server.post_empty(&follow, Some(&alice)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(!untoggled.is_following);
}
