//! HTTP-level integration tests for the reply endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_admin, create_user, delete, get, post_json, put_json,
};
use serde_json::json;
use sqlx::PgPool;

async fn create_published_note(app: &axum::Router, token: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/notes",
        Some(token),
        json!({ "title": "Thread", "content": "root" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_reply(app: &axum::Router, token: &str, note_id: &str, content: &str) -> String {
    let response = post_json(
        app,
        &format!("/api/v1/notes/{note_id}/replies"),
        Some(token),
        json!({ "content": content }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reply_shows_in_thread_and_bumps_count(pool: PgPool) {
    let owner = create_user(&pool, "thread-owner").await;
    let replier = create_user(&pool, "thread-replier").await;
    let app = build_test_app(pool.clone());

    let note_id = create_published_note(&app, &owner.token).await;
    let reply_id = create_reply(&app, &replier.token, &note_id, "first!").await;

    let response = get(&app, &format!("/api/v1/notes/{note_id}"), Some(&owner.token)).await;
    let body = body_json(response).await;
    let replies = body["data"]["replies"].as_array().unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0]["id"], reply_id.as_str());
    assert_eq!(replies[0]["user"]["displayName"], "thread-replier");
    assert_eq!(body["data"]["_count"]["replies"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cannot_reply_to_draft(pool: PgPool) {
    let owner = create_user(&pool, "draft-owner").await;
    let app = build_test_app(pool.clone());

    let response = post_json(
        &app,
        "/api/v1/notes",
        Some(&owner.token),
        json!({ "content": "unfinished", "isDraft": true }),
    )
    .await;
    let note_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = post_json(
        &app,
        &format!("/api/v1/notes/{note_id}/replies"),
        Some(&owner.token),
        json!({ "content": "replying to my own draft" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reply_to_missing_note_is_404(pool: PgPool) {
    let user = create_user(&pool, "lost").await;
    let app = build_test_app(pool.clone());

    let ghost = uuid::Uuid::new_v4();
    let response = post_json(
        &app,
        &format!("/api/v1/notes/{ghost}/replies"),
        Some(&user.token),
        json!({ "content": "anyone home?" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Quoting
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_quote_survives_target_deletion_as_dangling_id(pool: PgPool) {
    let owner = create_user(&pool, "quoter").await;
    let app = build_test_app(pool.clone());

    let note_id = create_published_note(&app, &owner.token).await;
    let quoted_id = create_reply(&app, &owner.token, &note_id, "original").await;

    let response = post_json(
        &app,
        &format!("/api/v1/notes/{note_id}/replies"),
        Some(&owner.token),
        json!({ "content": "quoting you", "replyToId": quoted_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let quoting = body_json(response).await;
    assert_eq!(quoting["data"]["replyToId"], quoted_id.as_str());

    // Delete the quoted reply; the pointer must survive.
    let response = delete(
        &app,
        &format!("/api/v1/notes/{note_id}/replies/{quoted_id}"),
        Some(&owner.token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, &format!("/api/v1/notes/{note_id}"), Some(&owner.token)).await;
    let body = body_json(response).await;
    let replies = body["data"]["replies"].as_array().unwrap();
    assert_eq!(replies.len(), 1, "only the quoting reply remains");
    assert_eq!(
        replies[0]["replyToId"],
        quoted_id.as_str(),
        "the reference dangles instead of being nulled"
    );
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reply_edit_is_author_only(pool: PgPool) {
    let owner = create_user(&pool, "edit-owner").await;
    let author = create_user(&pool, "edit-author").await;
    let admin = create_admin(&pool, "edit-admin").await;
    let app = build_test_app(pool.clone());

    let note_id = create_published_note(&app, &owner.token).await;
    let reply_id = create_reply(&app, &author.token, &note_id, "tpyo").await;
    let uri = format!("/api/v1/notes/{note_id}/replies/{reply_id}");

    // Neither the note owner nor an admin may edit the reply.
    for token in [&owner.token, &admin.token] {
        let response = put_json(&app, &uri, Some(token), json!({ "content": "hijack" })).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    // The author may.
    let response = put_json(&app, &uri, Some(&author.token), json!({ "content": "typo" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["content"], "typo");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reply_note_mismatch_rejected(pool: PgPool) {
    let user = create_user(&pool, "mismatch").await;
    let app = build_test_app(pool.clone());

    let note_a = create_published_note(&app, &user.token).await;
    let note_b = create_published_note(&app, &user.token).await;
    let reply_in_a = create_reply(&app, &user.token, &note_a, "in note a").await;

    // Addressing a's reply through b's path is a 400, not a 404.
    let response = put_json(
        &app,
        &format!("/api/v1/notes/{note_b}/replies/{reply_in_a}"),
        Some(&user.token),
        json!({ "content": "confused" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Reply does not belong to this note");
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reply_delete_author_or_admin(pool: PgPool) {
    let owner = create_user(&pool, "rd-owner").await;
    let author = create_user(&pool, "rd-author").await;
    let third = create_user(&pool, "rd-third").await;
    let admin = create_admin(&pool, "rd-admin").await;
    let app = build_test_app(pool.clone());

    let note_id = create_published_note(&app, &owner.token).await;

    // Third party: forbidden.
    let r1 = create_reply(&app, &author.token, &note_id, "one").await;
    let response = delete(
        &app,
        &format!("/api/v1/notes/{note_id}/replies/{r1}"),
        Some(&third.token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Author: allowed.
    let response = delete(
        &app,
        &format!("/api/v1/notes/{note_id}/replies/{r1}"),
        Some(&author.token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Admin: allowed, lands in the reply archive.
    let r2 = create_reply(&app, &author.token, &note_id, "two").await;
    let response = delete(
        &app,
        &format!("/api/v1/notes/{note_id}/replies/{r2}"),
        Some(&admin.token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, "/api/v1/admin/deleted-replies", Some(&admin.token)).await;
    let body = body_json(response).await;
    let archived = body["data"].as_array().unwrap();
    assert_eq!(archived.len(), 2);
    // The admin-deleted one is flagged as a moderator removal.
    let by_admin = archived
        .iter()
        .find(|r| r["originalReplyId"] == r2.as_str())
        .unwrap();
    assert_eq!(by_admin["deletedByOwner"], false);
    assert_eq!(by_admin["deletedByName"], "rd-admin");
}
