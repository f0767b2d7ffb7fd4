pub mod fields;
pub mod handlers;
pub mod history;
