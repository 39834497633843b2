pub mod blog;
pub mod coach;
pub mod config;
pub mod debug_console;
pub mod discovery;
pub mod error;
pub mod filters;
pub mod i18n;
pub mod markdown;
pub mod messages;
pub mod pipeline;
pub mod quiz;
pub mod reviews;
pub mod scheduler;
pub mod seo;
pub mod server;
pub mod store;
