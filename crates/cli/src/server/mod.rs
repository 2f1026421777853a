pub mod web;

pub use web::{bind_web_listener, start_web_server};
