//! Tag entity - a named topic attached to posts

use crate::value_objects::{slugify, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: Snowflake,
    pub name: String,
    pub slug: String,
}

impl Tag {
    pub fn new(id: Snowflake, name: &str) -> Self {
        let name = name.trim().to_string();
        let slug = Self::slug_for(&name);
        Self { id, name, slug }
    }

    /// Slug a tag name maps to; names without ASCII alphanumerics keep their lowercased text
    pub fn slug_for(name: &str) -> String {
        let slug = slugify(name);
        if slug.is_empty() {
            name.trim().to_lowercase()
        } else {
            slug
        }
    }

    /// Whether `name` names this tag; tag names are unique ignoring case
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

/// Tag with its number of published posts, for the tag directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagWithCount {
    pub tag: Tag,
    pub post_count: i64,
}
