/// API route handlers
///
/// This module contains all HTTP route handlers organized by resource.

pub mod auth;
pub mod health;
pub mod notifications;
pub mod tasks;
pub mod users;
