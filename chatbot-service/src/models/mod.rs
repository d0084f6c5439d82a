pub mod article;
pub mod message;

pub use article::Article;
pub use message::{BotType, MemberMessage, Message, UserType};
