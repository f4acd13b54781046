pub mod auth_forms;
pub mod handlers;
pub mod notices;
pub mod recognition;
pub mod sidebar;
pub mod static_pages;
pub mod utils;
