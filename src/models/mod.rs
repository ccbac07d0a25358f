//! Data models for DermaCare entities

mod admin;
mod appointment;
mod chat;
mod notification;
mod product;
mod progress;
mod routine;
mod skin;
mod user;

pub use admin::*;
pub use appointment::*;
pub use chat::*;
pub use notification::*;
pub use product::*;
pub use progress::*;
pub use routine::*;
pub use skin::*;
pub use user::*;
