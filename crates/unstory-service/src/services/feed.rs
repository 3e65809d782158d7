//! Feed service - ranked listings
//!
//! Tag pages, search, the featured strip, author pages and the category path.
//! Ranked listings run in two phases: the store returns one page of ids in
//! ranking order, then full rows are fetched by id and put back into that
//! order, since the hydration query is free to return rows in any order.

use std::collections::HashMap;

use tracing::{debug, instrument};

use unstory_core::entities::{Post, Tag, User};
use unstory_core::traits::PostFilter;
use unstory_core::{DomainError, PageRequest, SearchSort, Snowflake, SortKey, TagSort};

use crate::dto::{
    PostDetailResponse, PostPageResponse, PostSummaryResponse, TagPageResponse, TagResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Number of posts in the featured strip
pub const FEATURED_LIMIT: u32 = 6;

/// Put hydrated rows back into ranking order; ids with no row are dropped
pub fn restore_order(ids: &[Snowflake], posts: Vec<Post>) -> Vec<Post> {
    let mut by_id: HashMap<Snowflake, Post> = posts.into_iter().map(|p| (p.id, p)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

/// Feed service
pub struct FeedService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FeedService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Published posts carrying a tag, looked up by slug or name.
    ///
    /// An unknown tag is `TagNotFound`; a known tag without posts is an empty page.
    #[instrument(skip(self))]
    pub async fn tag_page(
        &self,
        identifier: &str,
        sort: TagSort,
        page: u32,
    ) -> ServiceResult<TagPageResponse> {
        let tag = self
            .ctx
            .tag_repo()
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| DomainError::TagNotFound(identifier.to_string()))?;

        let filter = PostFilter::published().with_tag(tag.id);
        let page = self
            .ranked_page(&filter, sort.keys(), PageRequest::fixed(page))
            .await?;

        Ok(TagPageResponse {
            tag: TagResponse::from(&tag),
            sort: sort.as_str(),
            page,
        })
    }

    /// Substring search over title or excerpt; a blank query browses everything published
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        page: u32,
        limit: u32,
        sort: SearchSort,
    ) -> ServiceResult<PostPageResponse> {
        let filter = PostFilter::published().matching(query);
        self.ranked_page(&filter, sort.keys(), PageRequest::new(page, limit))
            .await
    }

    /// Featured published posts, newest first
    #[instrument(skip(self))]
    pub async fn featured(&self) -> ServiceResult<Vec<PostSummaryResponse>> {
        let filter = PostFilter::published().featured();
        let page = self
            .ranked_page(
                &filter,
                SearchSort::Latest.keys(),
                PageRequest::new(1, FEATURED_LIMIT),
            )
            .await?;
        Ok(page.posts)
    }

    /// An author's published posts, newest first
    #[instrument(skip(self))]
    pub async fn author_posts(&self, author_id: Snowflake, page: u32) -> ServiceResult<PostPageResponse> {
        let filter = PostFilter::published().by_author(author_id);
        self.ranked_page(&filter, SearchSort::Latest.keys(), PageRequest::fixed(page))
            .await
    }

    /// Published posts with a tag whose name equals `name`, ignoring case.
    ///
    /// Unpaginated; keeps the newest-first order of the full feed.
    #[instrument(skip(self))]
    pub async fn category_posts(&self, name: &str) -> ServiceResult<Vec<PostSummaryResponse>> {
        let wanted = name.trim().to_lowercase();
        let posts = self
            .ctx
            .post_repo()
            .find_all(&PostFilter::published(), SearchSort::Latest.keys())
            .await?;

        let tags = self.load_tags(&posts).await?;
        let posts: Vec<Post> = posts
            .into_iter()
            .filter(|post| {
                tags.get(&post.id)
                    .is_some_and(|tags| tags.iter().any(|t| t.name.to_lowercase() == wanted))
            })
            .collect();

        let authors = self.load_authors(&posts).await?;
        Ok(assemble(&posts, &tags, &authors))
    }

    /// Full view of one post with its author and tags
    pub async fn detail(&self, post: &Post) -> ServiceResult<PostDetailResponse> {
        let tags = self.load_tags(std::slice::from_ref(post)).await?;
        let author = self.ctx.user_repo().find_by_id(post.author_id).await?;
        let post_tags = tags.get(&post.id).map(Vec::as_slice).unwrap_or_default();
        Ok(PostDetailResponse::from_parts(post, author.as_ref(), post_tags))
    }

    async fn ranked_page(
        &self,
        filter: &PostFilter,
        keys: &[SortKey],
        page: PageRequest,
    ) -> ServiceResult<PostPageResponse> {
        let posts = self.ctx.post_repo();
        let ids = posts.find_ranked_ids(filter, keys, page).await?;
        let total_count = posts.count(filter).await?;

        let hydrated = restore_order(&ids, posts.find_by_ids(&ids).await?);
        if hydrated.len() != ids.len() {
            debug!(
                expected = ids.len(),
                found = hydrated.len(),
                "Posts vanished between ranking and hydration"
            );
        }

        let tags = self.load_tags(&hydrated).await?;
        let authors = self.load_authors(&hydrated).await?;

        Ok(PostPageResponse {
            posts: assemble(&hydrated, &tags, &authors),
            total_count,
            page: page.page,
            total_pages: page.total_pages(total_count),
        })
    }

    async fn load_tags(&self, posts: &[Post]) -> ServiceResult<HashMap<Snowflake, Vec<Tag>>> {
        let ids: Vec<Snowflake> = posts.iter().map(|p| p.id).collect();
        let mut tags: HashMap<Snowflake, Vec<Tag>> = HashMap::new();
        for (post_id, tag) in self.ctx.tag_repo().find_by_post_ids(&ids).await? {
            tags.entry(post_id).or_default().push(tag);
        }
        Ok(tags)
    }

    async fn load_authors(&self, posts: &[Post]) -> ServiceResult<HashMap<Snowflake, User>> {
        let mut ids: Vec<Snowflake> = posts.iter().map(|p| p.author_id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(self
            .ctx
            .user_repo()
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect())
    }
}

fn assemble(
    posts: &[Post],
    tags: &HashMap<Snowflake, Vec<Tag>>,
    authors: &HashMap<Snowflake, User>,
) -> Vec<PostSummaryResponse> {
    posts
        .iter()
        .map(|post| {
            let post_tags = tags.get(&post.id).map(Vec::as_slice).unwrap_or_default();
            PostSummaryResponse::from_parts(post, authors.get(&post.author_id), post_tags)
        })
        .collect()
}
