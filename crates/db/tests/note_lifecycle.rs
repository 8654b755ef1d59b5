//! Integration tests for the note/reply lifecycle at the repository layer.
//!
//! Exercises publish transitions, edit-history gating, and the
//! reply-creation activity bump against a real database.

use corkboard_db::models::note::{CreateNote, UpdateNote};
use corkboard_db::models::reply::CreateReply;
use corkboard_db::models::user::CreateUser;
use corkboard_db::repositories::{NoteRepo, ReplyRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(name: &str) -> CreateUser {
    CreateUser {
        email: format!("{name}@example.com"),
        display_name: name.to_string(),
        password_hash: "$argon2id$fake-hash".to_string(),
    }
}

fn new_note(content: &str, is_draft: bool) -> CreateNote {
    CreateNote {
        title: Some("Lifecycle".to_string()),
        content: content.to_string(),
        color: None,
        is_draft: Some(is_draft),
        layer: None,
    }
}

fn edit(title: Option<&str>, content: Option<&str>) -> UpdateNote {
    UpdateNote {
        title: title.map(str::to_string),
        content: content.map(str::to_string),
        color: None,
    }
}

async fn history_count(pool: &PgPool, note_id: corkboard_core::types::DbId) -> i64 {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM note_edit_history WHERE note_id = $1")
            .bind(note_id)
            .fetch_one(pool)
            .await
            .unwrap();
    count
}

// ---------------------------------------------------------------------------
// Test: defaults are applied on create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_applies_defaults(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("defaults")).await.unwrap();
    let note = NoteRepo::create(
        &pool,
        user.id,
        &CreateNote {
            title: None,
            content: "bare minimum".to_string(),
            color: None,
            is_draft: None,
            layer: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(note.color, "yellow");
    assert_eq!(note.status, "published");
    assert_eq!(note.layer, "surface");
    assert!(note.title.is_none());
}

// ---------------------------------------------------------------------------
// Test: publish is one-way
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_publish_is_one_way(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("publisher")).await.unwrap();
    let note = NoteRepo::create(&pool, user.id, &new_note("draft body", true))
        .await
        .unwrap();
    assert_eq!(note.status, "draft");

    let published = NoteRepo::publish(&pool, note.id).await.unwrap();
    assert!(published.is_some(), "first publish should succeed");
    assert_eq!(published.unwrap().status, "published");

    let second = NoteRepo::publish(&pool, note.id).await.unwrap();
    assert!(
        second.is_none(),
        "second publish must not match (already published)"
    );

    let reloaded = NoteRepo::find_by_id(&pool, note.id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, "published", "status must stay published");
}

// ---------------------------------------------------------------------------
// Test: draft edits are never archived
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_draft_edits_produce_no_history(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("drafter")).await.unwrap();
    let note = NoteRepo::create(&pool, user.id, &new_note("v1", true))
        .await
        .unwrap();

    NoteRepo::update_with_history(&pool, note.id, &edit(None, Some("v2")), user.id, "drafter")
        .await
        .unwrap();
    NoteRepo::update_with_history(&pool, note.id, &edit(None, Some("v3")), user.id, "drafter")
        .await
        .unwrap();

    assert_eq!(
        history_count(&pool, note.id).await,
        0,
        "pre-publication edits need no history"
    );
}

// ---------------------------------------------------------------------------
// Test: published edits archive the pre-edit content, one row per edit
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_published_edits_archive_pre_images(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("editor")).await.unwrap();
    let note = NoteRepo::create(&pool, user.id, &new_note("v1", false))
        .await
        .unwrap();

    NoteRepo::update_with_history(&pool, note.id, &edit(None, Some("v2")), user.id, "editor")
        .await
        .unwrap();
    NoteRepo::update_with_history(&pool, note.id, &edit(None, Some("v3")), user.id, "editor")
        .await
        .unwrap();

    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT content, edited_by_name FROM note_edit_history
         WHERE note_id = $1 ORDER BY created_at ASC",
    )
    .bind(note.id)
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(rows.len(), 2, "exactly one history row per real edit");
    assert_eq!(rows[0].0, "v1", "first row holds the pre-first-edit content");
    assert_eq!(rows[1].0, "v2", "second row holds the pre-second-edit content");
    assert_eq!(rows[0].1, "editor");
}

// ---------------------------------------------------------------------------
// Test: a no-op update does not archive
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unchanged_update_produces_no_history(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("noop")).await.unwrap();
    let note = NoteRepo::create(&pool, user.id, &new_note("same", false))
        .await
        .unwrap();

    // Same content, color-only change: nothing to archive.
    NoteRepo::update_with_history(
        &pool,
        note.id,
        &UpdateNote {
            title: Some("Lifecycle".to_string()),
            content: Some("same".to_string()),
            color: Some("pink".to_string()),
        },
        user.id,
        "noop",
    )
    .await
    .unwrap();

    assert_eq!(history_count(&pool, note.id).await, 0);
    let reloaded = NoteRepo::find_by_id(&pool, note.id).await.unwrap().unwrap();
    assert_eq!(reloaded.color, "pink", "the color change itself applies");
}

// ---------------------------------------------------------------------------
// Test: creating a reply bumps the note's activity timestamp
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reply_bumps_last_activity(pool: PgPool) {
    let author = UserRepo::create(&pool, &new_user("author")).await.unwrap();
    let replier = UserRepo::create(&pool, &new_user("replier")).await.unwrap();
    let note = NoteRepo::create(&pool, author.id, &new_note("topic", false))
        .await
        .unwrap();
    let before = note.last_activity_at;

    ReplyRepo::create(
        &pool,
        note.id,
        replier.id,
        &CreateReply {
            content: "first!".to_string(),
            reply_to_id: None,
        },
    )
    .await
    .unwrap();

    let after = NoteRepo::find_by_id(&pool, note.id).await.unwrap().unwrap();
    assert!(
        after.last_activity_at > before,
        "reply creation must move the note to the top of the feed"
    );

    let summary = NoteRepo::find_summary(&pool, note.id).await.unwrap().unwrap();
    assert_eq!(summary.reply_count, 1);
}

// ---------------------------------------------------------------------------
// Test: reply edits archive the pre-edit content
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reply_edit_archives_pre_image(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("replyeditor")).await.unwrap();
    let note = NoteRepo::create(&pool, user.id, &new_note("topic", false))
        .await
        .unwrap();
    let reply = ReplyRepo::create(
        &pool,
        note.id,
        user.id,
        &CreateReply {
            content: "tpyo".to_string(),
            reply_to_id: None,
        },
    )
    .await
    .unwrap();

    let updated = ReplyRepo::update_with_history(&pool, reply.id, "typo", user.id, "replyeditor")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.content, "typo");

    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT content FROM reply_edit_history WHERE reply_id = $1")
            .bind(reply.id)
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "tpyo", "history holds the pre-edit content");
}

// ---------------------------------------------------------------------------
// Test: draft visibility in the viewer-scoped listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_hides_other_users_drafts(pool: PgPool) {
    let owner = UserRepo::create(&pool, &new_user("owner")).await.unwrap();
    let other = UserRepo::create(&pool, &new_user("other")).await.unwrap();

    let draft = NoteRepo::create(&pool, owner.id, &new_note("secret", true))
        .await
        .unwrap();

    let for_owner = NoteRepo::list_for_viewer(&pool, "surface", owner.id)
        .await
        .unwrap();
    assert!(
        for_owner.iter().any(|n| n.id == draft.id),
        "owner sees their own draft"
    );

    let for_other = NoteRepo::list_for_viewer(&pool, "surface", other.id)
        .await
        .unwrap();
    assert!(
        !for_other.iter().any(|n| n.id == draft.id),
        "drafts are invisible to other users"
    );

    NoteRepo::publish(&pool, draft.id).await.unwrap();
    let for_other = NoteRepo::list_for_viewer(&pool, "surface", other.id)
        .await
        .unwrap();
    assert!(
        for_other.iter().any(|n| n.id == draft.id),
        "published notes appear for everyone"
    );
}

// ---------------------------------------------------------------------------
// Test: hidden-layer notes stay out of the surface listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_layers_partition_listings(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("layered")).await.unwrap();
    let hidden = NoteRepo::create(
        &pool,
        user.id,
        &CreateNote {
            title: None,
            content: "hidden thought".to_string(),
            color: None,
            is_draft: None,
            layer: Some("hidden".to_string()),
        },
    )
    .await
    .unwrap();

    let surface = NoteRepo::list_for_viewer(&pool, "surface", user.id)
        .await
        .unwrap();
    assert!(!surface.iter().any(|n| n.id == hidden.id));

    let hidden_list = NoteRepo::list_for_viewer(&pool, "hidden", user.id)
        .await
        .unwrap();
    assert!(hidden_list.iter().any(|n| n.id == hidden.id));
}
