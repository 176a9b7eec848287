//! Contract cases for the `comments` resource

use futures::FutureExt;
use reqwest::StatusCode;

use apitest_common::Comment;

use crate::case::{Suite, TestCase};
use crate::error::ContractResult;
use crate::expect;
use crate::spec::{decode, RequestSpec};

pub const RESOURCE: &str = "comments";

pub const KNOWN_EMAIL: &str = "Lew@alysha.tv";

pub fn suite() -> Suite {
    Suite::new(
        "comments",
        vec![
            TestCase::new("getAllComments", |s| get_all_comments(s).boxed()),
            TestCase::new("checkCommentsCount", |s| check_comments_count(s).boxed())
                .depends_on("getAllComments"),
            TestCase::new("checkCommentsWithParameters", |s| {
                check_comments_with_parameters(s).boxed()
            })
            .depends_on("getAllComments"),
            TestCase::new("checkCommentsWithInvalidParameters", |s| {
                check_comments_with_invalid_parameters(s).boxed()
            })
            .depends_on("getAllComments"),
        ],
    )
}

async fn find(spec: &RequestSpec, post_id: i64, email: &str) -> ContractResult<Vec<Comment>> {
    let post_id = post_id.to_string();
    let response = spec
        .get(RESOURCE)?
        .query(&[("postId", post_id.as_str()), ("email", email)])
        .send()
        .await?;
    decode(response).await
}

async fn get_all_comments(spec: &RequestSpec) -> ContractResult<()> {
    let response = spec.get(RESOURCE)?.send().await?;
    expect::response_is_json(&response)?;
    expect::status(StatusCode::OK, response.status())
}

async fn check_comments_count(spec: &RequestSpec) -> ContractResult<()> {
    let comments: Vec<Comment> = decode(spec.get(RESOURCE)?.send().await?).await?;
    expect::count("comments", 500, comments.len())
}

async fn check_comments_with_parameters(spec: &RequestSpec) -> ContractResult<()> {
    let comments = find(spec, 1, KNOWN_EMAIL).await?;

    expect::count("comments for postId=1", 1, comments.len())?;
    expect::eq("email", KNOWN_EMAIL, comments[0].email.as_str())?;
    expect::eq("postId", 1, comments[0].post_id)
}

async fn check_comments_with_invalid_parameters(spec: &RequestSpec) -> ContractResult<()> {
    let comments = find(spec, -1, KNOWN_EMAIL).await?;
    expect::count("comments for postId=-1", 0, comments.len())
}
