//! Fire-and-forget notification hooks. These stand in for outbound email
//! delivery: they log and return, and must never fail the request that
//! triggered them.

use tracing::info;

use crate::auth::repo::User;

pub fn on_after_register(user: &User) {
    info!(user_id = user.id, email = %user.email, "user registered");
}

pub fn on_after_forgot_password(user: &User, token: &str) {
    info!(user_id = user.id, email = %user.email, token, "password reset requested");
}

pub fn on_after_request_verify(user: &User, token: &str) {
    info!(user_id = user.id, email = %user.email, token, "email verification requested");
}
