//! Tag entity <-> model mapper

use unstory_core::entities::{Tag, TagWithCount};
use unstory_core::value_objects::Snowflake;

use crate::models::{PostTagModel, TagCountModel, TagModel};

impl From<TagModel> for Tag {
    fn from(model: TagModel) -> Self {
        Tag {
            id: Snowflake::new(model.id),
            name: model.name,
            slug: model.slug,
        }
    }
}

impl From<PostTagModel> for (Snowflake, Tag) {
    fn from(model: PostTagModel) -> Self {
        (
            Snowflake::new(model.post_id),
            Tag {
                id: Snowflake::new(model.id),
                name: model.name,
                slug: model.slug,
            },
        )
    }
}

impl From<TagCountModel> for TagWithCount {
    fn from(model: TagCountModel) -> Self {
        TagWithCount {
            tag: Tag {
                id: Snowflake::new(model.id),
                name: model.name,
                slug: model.slug,
            },
            post_count: model.post_count,
        }
    }
}
