pub mod handlers;
pub mod payloads;
pub mod protocol;
