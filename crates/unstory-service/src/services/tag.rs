//! Tag service
//!
//! Tag directory and get-or-create of tags named by authors.

use tracing::instrument;

use unstory_core::entities::Tag;

use crate::dto::TagSummaryResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Default size of the tag directory
pub const DEFAULT_TAG_LIMIT: i64 = 50;

/// Tag service
pub struct TagService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TagService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Tags by number of published posts, most used first
    #[instrument(skip(self))]
    pub async fn list_tags(&self, limit: Option<i64>) -> ServiceResult<Vec<TagSummaryResponse>> {
        let tags = self
            .ctx
            .tag_repo()
            .list_with_counts(limit.unwrap_or(DEFAULT_TAG_LIMIT))
            .await?;
        Ok(tags.iter().map(TagSummaryResponse::from).collect())
    }

    /// Resolve author-supplied names to tags, creating missing ones.
    ///
    /// Names that differ only in case collapse to one tag. Names that differ
    /// in punctuation ("C" and "C++") stay distinct tags.
    #[instrument(skip(self, names), fields(count = names.len()))]
    pub async fn resolve_tags(&self, names: &[String]) -> ServiceResult<Vec<Tag>> {
        let mut tags: Vec<Tag> = Vec::with_capacity(names.len());
        for name in names {
            let candidate = Tag::new(self.ctx.generate_id(), name);
            if candidate.name.is_empty() || tags.iter().any(|t| t.has_name(&candidate.name)) {
                continue;
            }
            let tag = self.ctx.tag_repo().get_or_create(&candidate).await?;
            if !tags.iter().any(|t| t.id == tag.id) {
                tags.push(tag);
            }
        }
        Ok(tags)
    }
}
