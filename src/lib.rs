pub mod config;
pub mod dispatch;
pub mod http;
pub mod humanize;
pub mod metadata;
pub mod observability;
pub mod worker;
