//! In-memory repositories for service tests
//!
//! One shared state behind a mutex implements every repository trait with
//! the same observable behaviour as the Postgres store: toggles are atomic,
//! listings end in `id DESC`, and `find_by_ids` deliberately returns rows in
//! ascending id order so callers must restore ranking order themselves.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use unstory_common::JwtService;
use unstory_core::entities::{Follow, Like, Post, PostView, Tag, TagWithCount, User, UserProfile};
use unstory_core::traits::{
    FollowRepository, LikeRepository, LikeToggle, PostFilter, PostRepository, PostViewRepository,
    RepoResult, TagRepository, UserRepository, ViewRecord,
};
use unstory_core::{
    compare_posts, with_random_suffix, DomainError, PageRequest, Snowflake, SnowflakeGenerator,
    SortKey, ViewerKey,
};

use super::context::{ServiceContext, ServiceContextBuilder};

const TEST_SECRET: &str = "service-test-secret";

pub fn profile(id: i64, username: &str) -> UserProfile {
    UserProfile {
        id: Snowflake::new(id),
        email: format!("{username}@example.com"),
        username: Some(username.to_string()),
        name: Some(username.to_string()),
        avatar: None,
    }
}

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<Snowflake, User>,
    posts: BTreeMap<Snowflake, Post>,
    tags: BTreeMap<Snowflake, Tag>,
    post_tags: Vec<(Snowflake, Snowflake)>,
    likes: Vec<Like>,
    views: Vec<PostView>,
    follows: Vec<Follow>,
}

impl MemoryState {
    fn has_tag(&self, post_id: Snowflake, tag_id: Snowflake) -> bool {
        self.post_tags.contains(&(post_id, tag_id))
    }

    fn matching(&self, filter: &PostFilter, keys: &[SortKey]) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .values()
            .filter(|p| filter.accepts(p))
            .filter(|p| filter.tag_id.is_none_or(|tag| self.has_tag(p.id, tag)))
            .cloned()
            .collect();
        posts.sort_by(|a, b| compare_posts(keys, a, b));
        posts
    }

    fn post_mut(&mut self, id: Snowflake) -> RepoResult<&mut Post> {
        self.posts
            .get_mut(&id)
            .ok_or_else(|| DomainError::PostNotFound(id.to_string()))
    }
}

/// Shared in-memory store handed out as every repository
#[derive(Clone)]
pub struct TestStore {
    state: Arc<Mutex<MemoryState>>,
    jwt: Arc<JwtService>,
    generator: Arc<SnowflakeGenerator>,
}

impl TestStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            jwt: Arc::new(JwtService::new(TEST_SECRET, None)),
            generator: Arc::new(SnowflakeGenerator::new(1)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }

    pub fn context(&self) -> ServiceContext {
        let store = Arc::new(self.clone());
        ServiceContextBuilder::new()
            .user_repo(store.clone())
            .post_repo(store.clone())
            .tag_repo(store.clone())
            .like_repo(store.clone())
            .post_view_repo(store.clone())
            .follow_repo(store)
            .jwt_service(self.jwt.clone())
            .snowflake_generator(self.generator.clone())
            .build()
            .unwrap()
    }

    pub fn token_for(&self, profile: &UserProfile) -> String {
        self.jwt.issue_session(profile, 3600).unwrap()
    }

    /// Mirror a user directly
    pub fn add_user(&self, profile: &UserProfile) -> User {
        let user = User::from_profile(profile);
        self.lock().users.insert(user.id, user.clone());
        user
    }

    pub fn update_user(&self, id: Snowflake, f: impl FnOnce(&mut User)) {
        if let Some(user) = self.lock().users.get_mut(&id) {
            f(user);
        }
    }

    /// Insert a published post; later calls get later timestamps
    pub fn add_post(&self, author: Snowflake, title: &str, tags: &[&Tag]) -> Post {
        let id = self.generator.generate();
        let mut post = Post::draft(id, format!("post-{id}"), title.to_string(), author);
        post.published = true;
        let mut state = self.lock();
        let offset = i64::try_from(state.posts.len()).unwrap_or_default();
        post.created_at = Utc::now() - Duration::days(365) + Duration::minutes(offset);
        post.updated_at = post.created_at;
        state.posts.insert(id, post.clone());
        for tag in tags {
            state.tags.entry(tag.id).or_insert_with(|| (*tag).clone());
            state.post_tags.push((id, tag.id));
        }
        post
    }

    pub fn update_post(&self, id: Snowflake, f: impl FnOnce(&mut Post)) {
        if let Some(post) = self.lock().posts.get_mut(&id) {
            f(post);
        }
    }

    pub fn post(&self, id: Snowflake) -> Option<Post> {
        self.lock().posts.get(&id).cloned()
    }

    pub fn like_rows(&self, post_id: Snowflake) -> i64 {
        let count = self.lock().likes.iter().filter(|l| l.post_id == post_id).count();
        i64::try_from(count).unwrap_or_default()
    }

    pub fn follow_rows(&self) -> usize {
        self.lock().follows.len()
    }
}

#[async_trait]
impl UserRepository for TestStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        let state = self.lock();
        Ok(ids.iter().filter_map(|id| state.users.get(id).cloned()).collect())
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| {
                u.username
                    .as_deref()
                    .is_some_and(|name| name.eq_ignore_ascii_case(username.trim()))
            })
            .cloned())
    }

    async fn upsert_from_profile(&self, profile: &UserProfile) -> RepoResult<User> {
        let mut state = self.lock();
        if let Some(user) = state.users.get(&profile.id) {
            return Ok(user.clone());
        }
        if state.users.values().any(|u| u.email == profile.email) {
            return Err(DomainError::EmailTaken(profile.email.clone()));
        }

        let mut user = User::from_profile(profile);
        let taken = user.username.as_deref().is_some_and(|name| {
            state.users.values().any(|u| {
                u.username
                    .as_deref()
                    .is_some_and(|other| other.eq_ignore_ascii_case(name))
            })
        });
        if taken {
            user.username = None;
        }
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_profile(&self, user: &User) -> RepoResult<()> {
        let mut state = self.lock();
        if !state.users.contains_key(&user.id) {
            return Err(DomainError::UserNotFound(user.id.to_string()));
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }
}

#[async_trait]
impl PostRepository for TestStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        Ok(self.lock().posts.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Post>> {
        Ok(self.lock().posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Post>> {
        // BTreeMap iteration: ascending id, whatever order was asked for
        Ok(self
            .lock()
            .posts
            .values()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn find_ranked_ids(
        &self,
        filter: &PostFilter,
        keys: &[SortKey],
        page: PageRequest,
    ) -> RepoResult<Vec<Snowflake>> {
        let offset = usize::try_from(page.offset()).unwrap_or_default();
        let limit = usize::try_from(page.limit()).unwrap_or_default();
        Ok(self
            .lock()
            .matching(filter, keys)
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|p| p.id)
            .collect())
    }

    async fn find_all(&self, filter: &PostFilter, keys: &[SortKey]) -> RepoResult<Vec<Post>> {
        Ok(self.lock().matching(filter, keys))
    }

    async fn count(&self, filter: &PostFilter) -> RepoResult<i64> {
        let count = self.lock().matching(filter, &[]).len();
        Ok(i64::try_from(count).unwrap_or_default())
    }

    async fn create(&self, post: &Post, tag_ids: &[Snowflake]) -> RepoResult<()> {
        let mut state = self.lock();
        if state.posts.values().any(|p| p.slug == post.slug) {
            return Err(DomainError::SlugTaken(post.slug.clone()));
        }
        if !state.users.contains_key(&post.author_id) {
            return Err(DomainError::UserNotFound(post.author_id.to_string()));
        }
        state.posts.insert(post.id, post.clone());
        for tag_id in tag_ids {
            if !state.has_tag(post.id, *tag_id) {
                state.post_tags.push((post.id, *tag_id));
            }
        }
        Ok(())
    }

    async fn update(&self, post: &Post, tag_ids: Option<&[Snowflake]>) -> RepoResult<()> {
        let mut state = self.lock();
        if state
            .posts
            .values()
            .any(|p| p.slug == post.slug && p.id != post.id)
        {
            return Err(DomainError::SlugTaken(post.slug.clone()));
        }
        let stored = state.post_mut(post.id)?;
        if stored.published && stored.slug != post.slug {
            return Err(DomainError::SlugImmutable);
        }
        stored.slug.clone_from(&post.slug);
        stored.title.clone_from(&post.title);
        stored.excerpt.clone_from(&post.excerpt);
        stored.content.clone_from(&post.content);
        stored.cover_image.clone_from(&post.cover_image);
        stored.updated_at = post.updated_at;
        if let Some(tag_ids) = tag_ids {
            state.post_tags.retain(|(p, _)| *p != post.id);
            for tag_id in tag_ids {
                state.post_tags.push((post.id, *tag_id));
            }
        }
        Ok(())
    }

    async fn publish(&self, id: Snowflake) -> RepoResult<bool> {
        let mut state = self.lock();
        let post = state.post_mut(id)?;
        let changed = !post.published;
        post.published = true;
        Ok(changed)
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        let mut state = self.lock();
        let removed = state.posts.remove(&id).is_some();
        state.post_tags.retain(|(p, _)| *p != id);
        state.likes.retain(|l| l.post_id != id);
        state.views.retain(|v| v.post_id != id);
        Ok(removed)
    }

    async fn reconcile_counters(&self) -> RepoResult<u64> {
        let mut state = self.lock();
        let mut repaired = 0;
        let ids: Vec<Snowflake> = state.posts.keys().copied().collect();
        for id in ids {
            let likes = state.likes.iter().filter(|l| l.post_id == id).count();
            let views = state.views.iter().filter(|v| v.post_id == id).count();
            let likes = i64::try_from(likes).unwrap_or_default();
            let views = i64::try_from(views).unwrap_or_default();
            let post = state.post_mut(id)?;
            if post.likes_count != likes || post.views != views {
                post.likes_count = likes;
                post.views = views;
                repaired += 1;
            }
        }
        Ok(repaired)
    }
}

#[async_trait]
impl TagRepository for TestStore {
    async fn find_by_identifier(&self, identifier: &str) -> RepoResult<Option<Tag>> {
        let state = self.lock();
        let identifier = identifier.trim();
        let by_slug = state
            .tags
            .values()
            .find(|t| t.slug.eq_ignore_ascii_case(identifier));
        Ok(by_slug
            .or_else(|| state.tags.values().find(|t| t.has_name(identifier)))
            .cloned())
    }

    async fn get_or_create(&self, candidate: &Tag) -> RepoResult<Tag> {
        let mut state = self.lock();
        if let Some(existing) = state.tags.values().find(|t| t.has_name(&candidate.name)) {
            return Ok(existing.clone());
        }
        let mut tag = candidate.clone();
        while state.tags.values().any(|t| t.slug.eq_ignore_ascii_case(&tag.slug)) {
            tag.slug = with_random_suffix(&candidate.slug);
        }
        state.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn find_by_post_ids(&self, post_ids: &[Snowflake]) -> RepoResult<Vec<(Snowflake, Tag)>> {
        let state = self.lock();
        let mut pairs: Vec<(Snowflake, Tag)> = state
            .post_tags
            .iter()
            .filter(|(post, _)| post_ids.contains(post))
            .filter_map(|(post, tag)| state.tags.get(tag).map(|t| (*post, t.clone())))
            .collect();
        pairs.sort_by(|a, b| a.1.name.cmp(&b.1.name));
        Ok(pairs)
    }

    async fn list_with_counts(&self, limit: i64) -> RepoResult<Vec<TagWithCount>> {
        let state = self.lock();
        let mut counts: Vec<TagWithCount> = state
            .tags
            .values()
            .map(|tag| {
                let post_count = state
                    .post_tags
                    .iter()
                    .filter(|(post, t)| {
                        *t == tag.id && state.posts.get(post).is_some_and(|p| p.published)
                    })
                    .count();
                TagWithCount {
                    tag: tag.clone(),
                    post_count: i64::try_from(post_count).unwrap_or_default(),
                }
            })
            .filter(|entry| entry.post_count > 0)
            .collect();
        counts.sort_by(|a, b| b.post_count.cmp(&a.post_count).then(a.tag.name.cmp(&b.tag.name)));
        counts.truncate(usize::try_from(limit.clamp(1, 100)).unwrap_or_default());
        Ok(counts)
    }
}

#[async_trait]
impl LikeRepository for TestStore {
    async fn toggle(&self, like: &Like) -> RepoResult<LikeToggle> {
        let mut state = self.lock();
        let existing = state
            .likes
            .iter()
            .position(|l| l.post_id == like.post_id && l.user_id == like.user_id);

        let liked = match existing {
            Some(index) => {
                state.likes.remove(index);
                false
            }
            None => {
                state.likes.push(like.clone());
                true
            }
        };

        let post = state.post_mut(like.post_id)?;
        post.likes_count = (post.likes_count + if liked { 1 } else { -1 }).max(0);
        Ok(LikeToggle {
            liked,
            likes_count: post.likes_count,
        })
    }

    async fn exists(&self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self
            .lock()
            .likes
            .iter()
            .any(|l| l.post_id == post_id && l.user_id == user_id))
    }
}

#[async_trait]
impl PostViewRepository for TestStore {
    async fn record(&self, view: &PostView) -> RepoResult<ViewRecord> {
        let mut state = self.lock();
        let viewer = match (&view.user_id, &view.fingerprint) {
            (Some(user_id), _) => ViewerKey::User(*user_id),
            (None, Some(fingerprint)) => ViewerKey::Fingerprint(fingerprint),
            (None, None) => return Err(DomainError::ValidationError("view without identity".into())),
        };
        let seen = state
            .views
            .iter()
            .any(|v| v.post_id == view.post_id && v.is_for(viewer));
        let post = state.post_mut(view.post_id)?;
        if !seen {
            post.views += 1;
        }
        let views = post.views;
        if !seen {
            state.views.push(view.clone());
        }
        Ok(ViewRecord {
            recorded: !seen,
            views,
        })
    }
}

#[async_trait]
impl FollowRepository for TestStore {
    async fn toggle(&self, follow: &Follow) -> RepoResult<bool> {
        if follow.is_self_follow() {
            return Err(DomainError::CannotFollowSelf);
        }
        let mut state = self.lock();
        if !state.users.contains_key(&follow.following_id) {
            return Err(DomainError::UserNotFound(follow.following_id.to_string()));
        }
        let existing = state.follows.iter().position(|f| {
            f.follower_id == follow.follower_id && f.following_id == follow.following_id
        });
        match existing {
            Some(index) => {
                state.follows.remove(index);
                Ok(false)
            }
            None => {
                state.follows.push(follow.clone());
                Ok(true)
            }
        }
    }

    async fn exists(&self, follower_id: Snowflake, following_id: Snowflake) -> RepoResult<bool> {
        Ok(self
            .lock()
            .follows
            .iter()
            .any(|f| f.follower_id == follower_id && f.following_id == following_id))
    }

    async fn count_followers(&self, user_id: Snowflake) -> RepoResult<i64> {
        let count = self.lock().follows.iter().filter(|f| f.following_id == user_id).count();
        Ok(i64::try_from(count).unwrap_or_default())
    }

    async fn count_following(&self, user_id: Snowflake) -> RepoResult<i64> {
        let count = self.lock().follows.iter().filter(|f| f.follower_id == user_id).count();
        Ok(i64::try_from(count).unwrap_or_default())
    }
}
