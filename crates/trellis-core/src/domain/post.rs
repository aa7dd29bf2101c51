//! Post - 投稿レコード

use serde::{Deserialize, Serialize};

use super::document::SearchFields;
use super::entity::{Entity, overwrite_if_present};
use super::ids::{PostId, PostKind};

/// Post は primary store に保存された投稿
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
    /// 投稿者のユーザー名
    pub author: String,
}

/// Post の可変フィールド（create/update/patch の入力）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFields {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: String,
}

impl PostFields {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            author: String::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }
}

impl Entity for Post {
    type Marker = PostKind;
    type Fields = PostFields;

    fn id(&self) -> PostId {
        self.id
    }

    fn from_fields(id: PostId, fields: PostFields) -> Self {
        Self {
            id,
            title: fields.title,
            body: fields.body,
            author: fields.author,
        }
    }

    fn replace(&mut self, fields: PostFields) {
        self.title = fields.title;
        self.body = fields.body;
        self.author = fields.author;
    }

    fn patch(&mut self, fields: PostFields) {
        overwrite_if_present(&mut self.title, fields.title);
        overwrite_if_present(&mut self.body, fields.body);
        overwrite_if_present(&mut self.author, fields.author);
    }

    fn search_fields(&self) -> SearchFields {
        SearchFields::from([
            ("id".to_string(), self.id.to_string()),
            ("title".to_string(), self.title.clone()),
            ("body".to_string(), self.body.clone()),
            ("author".to_string(), self.author.clone()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    fn sample() -> Post {
        Post::from_fields(
            PostId::from_ulid(Ulid::new()),
            PostFields::new("A", "B").with_author("alice"),
        )
    }

    #[test]
    fn replace_clears_empty_fields() {
        let mut post = sample();
        post.replace(PostFields::new("", "new"));

        assert_eq!(post.title, "");
        assert_eq!(post.body, "new");
        assert_eq!(post.author, "");
    }

    #[test]
    fn patch_keeps_fields_left_empty() {
        let mut post = sample();
        post.patch(PostFields::new("", "new"));

        assert_eq!(post.title, "A");
        assert_eq!(post.body, "new");
        assert_eq!(post.author, "alice");
    }

    #[test]
    fn search_fields_flatten_every_attribute() {
        let post = sample();
        let fields = post.search_fields();

        assert_eq!(fields["id"], post.id.to_string());
        assert_eq!(fields["title"], "A");
        assert_eq!(fields["body"], "B");
        assert_eq!(fields["author"], "alice");
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn kind_and_collection_come_from_marker() {
        assert_eq!(Post::kind(), "post");
        assert_eq!(Post::collection(), "posts");
    }

    #[test]
    fn fields_default_missing_json_keys() {
        let fields: PostFields = serde_json::from_str(r#"{"body":"only body"}"#).unwrap();
        assert_eq!(fields, PostFields::new("", "only body"));
    }
}
