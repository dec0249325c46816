pub mod common;
pub mod completions;
pub mod delete;
pub mod export;
pub mod identity;
pub mod list;
pub mod log;
pub mod note;
pub mod propose;
pub mod vote;
pub mod watch;
