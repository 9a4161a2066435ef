pub mod list_notifications;
pub mod mark_all_read;
pub mod mark_read;
pub mod overview;
