//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered teams, keyed by their unique name.
    teams (team_name) {
        team_name -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Users; each belongs to exactly one team.
    users (user_id) {
        user_id -> Text,
        username -> Text,
        team_name -> Text,
        is_active -> Bool,
    }
}

diesel::table! {
    /// Pull requests with their lifecycle state.
    ///
    /// `revision` is the optimistic concurrency token; every conditional
    /// update increments it.
    pull_requests (pull_request_id) {
        pull_request_id -> Text,
        pull_request_name -> Text,
        author_id -> Text,
        status -> Text,
        created_at -> Timestamptz,
        merged_at -> Nullable<Timestamptz>,
        revision -> Int8,
    }
}

diesel::table! {
    /// Reviewer slots (0 or 1) per pull request.
    pull_request_reviewers (pull_request_id, slot) {
        pull_request_id -> Text,
        slot -> Int2,
        user_id -> Text,
    }
}

diesel::joinable!(users -> teams (team_name));
diesel::joinable!(pull_requests -> users (author_id));
diesel::joinable!(pull_request_reviewers -> pull_requests (pull_request_id));
diesel::joinable!(pull_request_reviewers -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(teams, users, pull_requests, pull_request_reviewers);
