//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.
//! Regenerate with `diesel print-schema` after migrations change.

diesel::table! {
    /// Portal accounts: one row per member, moderator or administrator.
    users (id) {
        id -> Uuid,
        display_name -> Varchar,
        email -> Varchar,
        /// Role ladder value: "member", "moderator" or "admin".
        role -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Community feed posts, including moderation state.
    posts (id) {
        id -> Uuid,
        author_id -> Uuid,
        title -> Varchar,
        body -> Text,
        /// Post kind: "resource", "hackathon", "project" or "announcement".
        kind -> Varchar,
        /// Moderation status: "pending", "approved" or "rejected".
        status -> Varchar,
        tags -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per (post, user) like; toggling deletes the row.
    post_likes (post_id, user_id) {
        post_id -> Uuid,
        user_id -> Uuid,
    }
}

diesel::table! {
    /// Comments attached to feed posts.
    comments (id) {
        id -> Uuid,
        post_id -> Uuid,
        author_id -> Uuid,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Member suggestion-box entries.
    suggestions (id) {
        id -> Uuid,
        author_id -> Uuid,
        title -> Varchar,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Official staff announcements.
    announcements (id) {
        id -> Uuid,
        author_id -> Uuid,
        title -> Varchar,
        body -> Text,
        published_at -> Timestamptz,
    }
}

diesel::table! {
    /// Achievement wall entries; `recipient` is free-form text.
    achievements (id) {
        id -> Uuid,
        submitted_by -> Uuid,
        title -> Varchar,
        description -> Text,
        recipient -> Varchar,
        awarded_at -> Timestamptz,
    }
}

diesel::table! {
    /// Career-guidance shelf of the library.
    career_resources (id) {
        id -> Uuid,
        submitted_by -> Uuid,
        title -> Varchar,
        description -> Text,
        link -> Varchar,
        category -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Study-resource shelf of the library.
    study_resources (id) {
        id -> Uuid,
        submitted_by -> Uuid,
        title -> Varchar,
        description -> Text,
        link -> Varchar,
        category -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tutorial shelf of the library.
    tutorials (id) {
        id -> Uuid,
        submitted_by -> Uuid,
        title -> Varchar,
        description -> Text,
        link -> Varchar,
        category -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Forum discussion threads; `last_activity_at` orders the listing.
    forum_threads (id) {
        id -> Uuid,
        author_id -> Uuid,
        title -> Varchar,
        body -> Text,
        reply_count -> Int8,
        created_at -> Timestamptz,
        last_activity_at -> Timestamptz,
    }
}

diesel::table! {
    /// Replies within forum threads.
    forum_replies (id) {
        id -> Uuid,
        thread_id -> Uuid,
        author_id -> Uuid,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(post_likes -> posts (post_id));
diesel::joinable!(forum_replies -> forum_threads (thread_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    posts,
    post_likes,
    comments,
    suggestions,
    announcements,
    achievements,
    career_resources,
    study_resources,
    tutorials,
    forum_threads,
    forum_replies,
);
