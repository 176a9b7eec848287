//! Contract cases for the `posts` resource
//!
//! The fixture fakes every write: creates, updates and deletes are echoed
//! back but never persisted. Cases that read a write back through a
//! follow-up GET assert the documented contract and are expected to fail
//! against the live fixture.

use futures::FutureExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use apitest_common::{Post, PostPatch};

use crate::case::{Suite, TestCase};
use crate::error::ContractResult;
use crate::expect;
use crate::spec::{decode, RequestSpec};

pub const RESOURCE: &str = "posts";

pub const POST_1_TITLE: &str =
    "sunt aut facere repellat provident occaecati excepturi optio reprehenderit";
pub const POST_1_BODY: &str = "quia et suscipit\nsuscipit recusandae consequuntur expedita et cum\nreprehenderit molestiae ut ut quas totam\nnostrum rerum est autem sunt rem eveniet architecto";

pub const POST_45_TITLE: &str = "ut numquam possimus omnis eius suscipit laudantium iure";
pub const POST_45_BODY: &str = "est natus reiciendis nihil possimus aut provident\nex et dolor\nrepellat pariatur est\nnobis rerum repellendus dolorem autem";

pub const INVALID_JSON: &str = r#"{ "hello":"invalid"}"#;

pub fn suite() -> Suite {
    Suite::new(
        "posts",
        vec![
            TestCase::new("getAllPosts", |s| get_all_posts(s).boxed()),
            TestCase::new("checkGetAllPostsCount", |s| check_get_all_posts_count(s).boxed())
                .depends_on("getAllPosts"),
            TestCase::new("checkGetValidPost", |s| check_get_valid_post(s).boxed())
                .depends_on("getAllPosts"),
            TestCase::new("checkGetInvalidPost", |s| check_get_invalid_post(s).boxed())
                .depends_on("getAllPosts"),
            TestCase::new("checkPostsWithQueryParameters", |s| {
                check_posts_with_query_parameters(s).boxed()
            })
            .depends_on("getAllPosts"),
            TestCase::new("checkPostsWithMultipleQueryParameters", |s| {
                check_posts_with_multiple_query_parameters(s).boxed()
            })
            .depends_on("getAllPosts"),
            TestCase::new("checkCreatePost", |s| check_create_post(s).boxed()),
            TestCase::new("checkCreatedRecordIfPresent", |s| {
                check_created_record_if_present(s).boxed()
            })
            .depends_on("checkCreatePost"),
            TestCase::new("createPostWithInvalidJson", |s| {
                create_post_with_invalid_json(s).boxed()
            }),
            TestCase::new("updateRecord", |s| update_record(s).boxed()),
            TestCase::new("checkUpdatedRecord", |s| check_updated_record(s).boxed())
                .depends_on("updateRecord"),
            TestCase::new("checkPartialUpdate", |s| check_partial_update(s).boxed()),
            TestCase::new("checkPartiallyUpdatedData", |s| {
                check_partially_updated_data(s).boxed()
            })
            .depends_on("checkPartialUpdate"),
            TestCase::new("checkDeletePost", |s| check_delete_post(s).boxed()),
            TestCase::new("checkDeletedRecord", |s| check_deleted_record(s).boxed()),
        ],
    )
}

fn item(id: i64) -> String {
    format!("{}/{}", RESOURCE, id)
}

/// GET the collection filtered by `userId` and `id`
async fn find(spec: &RequestSpec, user_id: i64, id: i64) -> ContractResult<Vec<Post>> {
    let response = spec
        .get(RESOURCE)?
        .query(&[("userId", user_id), ("id", id)])
        .send()
        .await?;
    decode(response).await
}

async fn get_all_posts(spec: &RequestSpec) -> ContractResult<()> {
    let response = spec.get(RESOURCE)?.send().await?;
    expect::response_is_json(&response)?;
    expect::status(StatusCode::OK, response.status())
}

async fn check_get_all_posts_count(spec: &RequestSpec) -> ContractResult<()> {
    let posts: Vec<Post> = decode(spec.get(RESOURCE)?.send().await?).await?;
    expect::count("posts", 100, posts.len())
}

async fn check_get_valid_post(spec: &RequestSpec) -> ContractResult<()> {
    let post: Post = decode(spec.get(&item(1))?.send().await?).await?;

    expect::eq("id", 1, post.id)?;
    expect::eq("userId", 1, post.user_id)?;
    expect::eq("title", POST_1_TITLE, post.title.as_str())?;
    expect::eq("body", POST_1_BODY, post.body.as_str())
}

async fn check_get_invalid_post(spec: &RequestSpec) -> ContractResult<()> {
    let response = spec.get(&item(-1))?.send().await?;
    expect::status(StatusCode::NOT_FOUND, response.status())
}

async fn check_posts_with_query_parameters(spec: &RequestSpec) -> ContractResult<()> {
    let response = spec.get(RESOURCE)?.query(&[("userId", 5)]).send().await?;
    let posts: Vec<Post> = decode(response).await?;

    expect::count("posts for userId=5", 10, posts.len())?;
    let matching = posts.iter().filter(|p| p.user_id == 5).count();
    expect::count("posts with userId == 5", 10, matching)
}

async fn check_posts_with_multiple_query_parameters(spec: &RequestSpec) -> ContractResult<()> {
    let posts = find(spec, 5, 45).await?;

    expect::count("posts for userId=5&id=45", 1, posts.len())?;
    let post = &posts[0];
    expect::eq("userId", 5, post.user_id)?;
    expect::eq("id", 45, post.id)?;
    expect::eq("title", POST_45_TITLE, post.title.as_str())?;
    expect::eq("body", POST_45_BODY, post.body.as_str())
}

async fn check_create_post(spec: &RequestSpec) -> ContractResult<()> {
    let draft = Post::draft(1, "Test Title", "Test Body");
    let response = spec.post(RESOURCE)?.json(&draft).send().await?;
    expect::status(StatusCode::CREATED, response.status())
}

async fn check_created_record_if_present(spec: &RequestSpec) -> ContractResult<()> {
    let draft = Post::draft(1, "Test Title", "Test Body");
    let created: Post = decode(spec.post(RESOURCE)?.json(&draft).send().await?).await?;

    expect::eq("body", &draft.body, &created.body)?;
    expect::eq("title", &draft.title, &created.title)?;
    expect::eq("userId", draft.user_id, created.user_id)?;

    // The fixture only pretends to create; against the live service the
    // record is not there and this count is 0.
    let found = find(spec, created.user_id, created.id).await?;
    expect::count("created post", 1, found.len())
}

async fn create_post_with_invalid_json(spec: &RequestSpec) -> ContractResult<()> {
    let response = spec
        .post(RESOURCE)?
        .header(CONTENT_TYPE, "application/json")
        .body(INVALID_JSON)
        .send()
        .await?;
    expect::status(StatusCode::BAD_REQUEST, response.status())
}

async fn update_record(spec: &RequestSpec) -> ContractResult<()> {
    let replacement = Post::draft(1, "Updated Title", "Updated Body").with_id(1);
    let response = spec.put(&item(2))?.json(&replacement).send().await?;
    expect::status(StatusCode::OK, response.status())
}

async fn check_updated_record(spec: &RequestSpec) -> ContractResult<()> {
    let replacement = Post::draft(1, "Updated Title", "Updated Body").with_id(2);
    let updated: Post = decode(spec.put(&item(2))?.json(&replacement).send().await?).await?;

    expect::eq("title", &replacement.title, &updated.title)?;
    expect::eq("body", &replacement.body, &updated.body)?;

    // Not persisted by the fixture; the live service still serves the
    // original post 2 here.
    let found = find(spec, updated.user_id, updated.id).await?;
    expect::count("updated post", 1, found.len())?;
    expect::eq("title", &replacement.title, &found[0].title)?;
    expect::eq("body", &replacement.body, &found[0].body)
}

async fn check_partial_update(spec: &RequestSpec) -> ContractResult<()> {
    let patch = PostPatch::title("Updated Title");
    let response = spec.patch(&item(1))?.json(&patch).send().await?;
    expect::status(StatusCode::OK, response.status())
}

async fn check_partially_updated_data(spec: &RequestSpec) -> ContractResult<()> {
    let patch = PostPatch::title("Updated Title - Partial");
    let patched: Post = decode(spec.patch(&item(1))?.json(&patch).send().await?).await?;

    expect::eq("title", patch.title.as_deref(), Some(patched.title.as_str()))?;
    // The patch body carries no id, so the echo is expected to hold the unset value.
    expect::eq("id", 0, patched.id)?;

    // Known service deviation: the documented contract keeps userId at 1
    // after a partial update, but the fixture has been observed to echo 0.
    // The documented value is asserted on purpose.
    expect::eq("userId", 1, patched.user_id)?;

    let found = find(spec, patched.user_id, patched.id).await?;
    expect::count("patched post", 1, found.len())?;
    expect::eq("title", patch.title.as_deref(), Some(found[0].title.as_str()))
}

async fn check_delete_post(spec: &RequestSpec) -> ContractResult<()> {
    let response = spec.delete(&item(1))?.send().await?;
    expect::status(StatusCode::OK, response.status())
}

async fn check_deleted_record(spec: &RequestSpec) -> ContractResult<()> {
    let response = spec.delete(&item(2))?.send().await?;
    expect::status(StatusCode::OK, response.status())?;

    // Deletion is not durable on the fixture either; the documented
    // contract says the record is gone.
    let response = spec.get(&item(2))?.send().await?;
    expect::status(StatusCode::NOT_FOUND, response.status())
}
