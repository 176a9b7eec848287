//! Local stand-in for the posts/comments fixture, built on `wiremock`.
//!
//! Two flavours:
//! - `Behaviour::Documented` honours the documented contract, including
//!   read-after-write on faked creates/updates/deletes.
//! - `Behaviour::NonDurable` behaves like the public fixture: writes are
//!   echoed but nothing persists, and a partial update echoes `userId` 0.

#![allow(dead_code)]

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use apitest_common::{Comment, Environment, EnvironmentConfig, Post};
use apitest_contract::suites::comments::KNOWN_EMAIL;
use apitest_contract::suites::posts::{POST_1_BODY, POST_1_TITLE, POST_45_BODY, POST_45_TITLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    Documented,
    NonDurable,
}

pub fn config_for(server: &MockServer) -> EnvironmentConfig {
    EnvironmentConfig {
        environment: Environment::Test,
        base_uri: server.uri(),
        request_timeout: Duration::from_secs(5),
    }
}

pub fn post(id: i64) -> Post {
    let user_id = (id - 1) / 10 + 1;
    match id {
        1 => Post::draft(user_id, POST_1_TITLE, POST_1_BODY).with_id(id),
        45 => Post::draft(user_id, POST_45_TITLE, POST_45_BODY).with_id(id),
        _ => Post::draft(user_id, format!("title {id}"), format!("body {id}")).with_id(id),
    }
}

pub fn posts() -> Vec<Post> {
    (1..=100).map(post).collect()
}

pub fn comment(id: i64) -> Comment {
    Comment {
        id,
        post_id: (id - 1) / 5 + 1,
        name: format!("name {id}"),
        email: if id == 3 {
            KNOWN_EMAIL.to_string()
        } else {
            format!("user{id}@example.com")
        },
        body: format!("comment body {id}"),
    }
}

pub fn comments(count: i64) -> Vec<Comment> {
    (1..=count).map(comment).collect()
}

/// Echoes the JSON request body merged over `defaults`, then applies
/// `fixed`. Non-object bodies get a 400.
struct Echo {
    status: u16,
    defaults: Value,
    fixed: Value,
}

impl Respond for Echo {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let sent = match serde_json::from_slice::<Value>(&request.body) {
            Ok(Value::Object(sent)) => sent,
            _ => return ResponseTemplate::new(400),
        };

        let mut merged = self.defaults.as_object().cloned().unwrap_or_default();
        merged.extend(sent);
        if let Some(fixed) = self.fixed.as_object() {
            merged.extend(fixed.clone());
        }
        ResponseTemplate::new(self.status).set_body_json(Value::Object(merged))
    }
}

async fn get_json(server: &MockServer, route: &str, body: impl serde::Serialize) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .with_priority(3)
        .mount(server)
        .await;
}

async fn lookup(server: &MockServer, user_id: &str, id: &str, body: impl serde::Serialize) {
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("userId", user_id))
        .and(query_param("id", id))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .with_priority(1)
        .mount(server)
        .await;
}

/// Mount the `/posts` routes
pub async fn mount_posts(server: &MockServer, behaviour: Behaviour) {
    let durable = behaviour == Behaviour::Documented;

    get_json(server, "/posts", posts()).await;
    get_json(server, "/posts/1", post(1)).await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("userId", "5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(posts().into_iter().filter(|p| p.user_id == 5).collect::<Vec<_>>()),
        )
        .with_priority(2)
        .mount(server)
        .await;

    lookup(server, "5", "45", vec![post(45)]).await;

    Mock::given(method("GET"))
        .and(path("/posts/-1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
        .mount(server)
        .await;

    // Create
    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(body_json(json!({"hello": "invalid"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({})))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(Echo {
            status: 201,
            defaults: json!({}),
            fixed: json!({"id": 101}),
        })
        .with_priority(2)
        .mount(server)
        .await;

    let created = Post::draft(1, "Test Title", "Test Body").with_id(101);
    let empty: Vec<Post> = Vec::new();
    if durable {
        lookup(server, "1", "101", vec![created]).await;
    } else {
        lookup(server, "1", "101", &empty).await;
    }

    // Replace
    Mock::given(method("PUT"))
        .and(path("/posts/2"))
        .respond_with(Echo {
            status: 200,
            defaults: json!({}),
            fixed: json!({"id": 2}),
        })
        .mount(server)
        .await;

    if durable {
        let updated = Post::draft(1, "Updated Title", "Updated Body").with_id(2);
        lookup(server, "1", "2", vec![updated]).await;
    } else {
        lookup(server, "1", "2", vec![post(2)]).await;
    }

    // Partial update. The public fixture echoes only the sent fields, so
    // `id` and `userId` decode as 0.
    let patch_echo = Echo {
        status: 200,
        defaults: if durable { json!({"userId": 1}) } else { json!({}) },
        fixed: json!({}),
    };
    Mock::given(method("PATCH"))
        .and(path("/posts/1"))
        .respond_with(patch_echo)
        .mount(server)
        .await;

    if durable {
        let patched = Post {
            id: 0,
            user_id: 1,
            title: "Updated Title - Partial".to_string(),
            body: String::new(),
        };
        lookup(server, "1", "0", vec![patched]).await;
    }

    // Delete
    for route in ["/posts/1", "/posts/2"] {
        Mock::given(method("DELETE"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(server)
            .await;
    }

    let after_delete = if durable {
        ResponseTemplate::new(404).set_body_json(json!({}))
    } else {
        ResponseTemplate::new(200).set_body_json(post(2))
    };
    Mock::given(method("GET"))
        .and(path("/posts/2"))
        .respond_with(after_delete)
        .mount(server)
        .await;
}

/// Mount the `/comments` routes with `count` comments in the collection
pub async fn mount_comments(server: &MockServer, count: i64) {
    get_json(server, "/comments", comments(count)).await;

    Mock::given(method("GET"))
        .and(path("/comments"))
        .and(query_param("postId", "1"))
        .and(query_param("email", KNOWN_EMAIL))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![comment(3)]))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/comments"))
        .and(query_param("postId", "-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<Comment>::new()))
        .with_priority(1)
        .mount(server)
        .await;
}

pub async fn documented_fixture() -> MockServer {
    let server = MockServer::start().await;
    mount_posts(&server, Behaviour::Documented).await;
    mount_comments(&server, 500).await;
    server
}
