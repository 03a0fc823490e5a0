pub const LOGIN_URL: &str = "/login";
pub const REGISTER_URL: &str = "/register";
pub const LOGOUT_URL: &str = "/logout";
pub const RESEND_VERIFICATION_URL: &str = "/resend-verification";
pub const ACCOUNT_URL: &str = "/account";

pub const USER_SESSION_COOKIE_NAME: &str = "user_session";

pub const ACTIVITIES_URL: &str = "/activities";
pub const PUBLIC_ACTIVITY_URL: &str = "/public/activity";

pub fn verify_email_url(token: &str) -> String {
    format!("/verify-email/{token}")
}

pub fn activity_url(id: i64) -> String {
    format!("/activities/{id}")
}

pub fn create_activity_url(ty: &str) -> String {
    format!("/activities/create/{ty}")
}

pub fn new_activity_url(ty: &str) -> String {
    format!("/activities/new/{ty}")
}

pub fn edit_activity_url(id: i64) -> String {
    format!("/activities/{id}/edit")
}

pub fn update_activity_url(id: i64) -> String {
    format!("/activities/{id}/update")
}

pub fn delete_activity_url(id: i64) -> String {
    format!("/activities/{id}/delete")
}

pub fn share_activity_url(id: i64) -> String {
    format!("/activities/{id}/share")
}

pub fn start_play_url(id: i64) -> String {
    format!("/activities/{id}/play")
}

pub fn play_url(token: &str) -> String {
    format!("/play/{token}")
}

pub fn play_begin_url(token: &str) -> String {
    format!("/play/{token}/begin")
}

pub fn play_action_url(token: &str) -> String {
    format!("/play/{token}/action")
}

pub fn play_clock_url(token: &str) -> String {
    format!("/play/{token}/clock")
}

pub fn play_submit_url(token: &str) -> String {
    format!("/play/{token}/submit")
}

pub fn play_abandon_url(token: &str) -> String {
    format!("/play/{token}/abandon")
}

// Cover image uploads, stored on disk next to the database
pub const UPLOADS_DIR: &str = "uploads";

pub fn upload_url(file: &str) -> String {
    format!("/uploads/{file}")
}

// Authoring bounds
pub const GRID_MIN_SIZE: usize = 5;
pub const GRID_MAX_SIZE: usize = 20;
pub const MIN_WORD_SEARCH_WORDS: usize = 3;
pub const MIN_CROSSWORD_ITEMS: usize = 3;
pub const MIN_QUIZ_OPTIONS: usize = 2;

// Listing
pub const PAGE_SIZE: usize = 6;
