pub mod api;
pub mod context;
pub mod decoder;
pub mod error;
pub mod fields;
pub mod pager;
pub mod parser;
pub mod progress;
pub mod reconciler;
