mod chat;
mod document;
mod plan;
mod subscription;
mod tier;
mod usage;
pub mod user;

pub use chat::*;
pub use document::*;
pub use plan::*;
pub use subscription::*;
pub use tier::*;
pub use usage::*;
pub use user::*;
