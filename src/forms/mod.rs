mod chat;
mod checkout;
mod document;
mod user;

pub use chat::*;
pub use checkout::*;
pub use document::*;
pub use user::*;
