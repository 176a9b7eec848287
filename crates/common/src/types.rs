//! Record types decoded from the posts and comments resources

use serde::{Deserialize, Serialize};

/// A post, as served by `/posts`
///
/// Fields missing from a response decode to their defaults, so an echo
/// that omits `id` reads back as `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

impl Post {
    /// A post body for create/replace requests. `id` stays 0 and is still
    /// sent as `"id": 0`; the server ignores it and assigns its own.
    pub fn draft(user_id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: 0,
            user_id,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}

/// Partial post body for PATCH; only the fields that are set are sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl PostPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

/// A comment, as served by `/comments`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub name: String,
    pub email: String,
    pub body: String,
}
