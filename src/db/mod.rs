pub mod chat;
pub mod document;
pub mod subscription;
pub mod usage;
