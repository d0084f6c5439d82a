pub mod requests;
pub mod response;

pub use requests::{
    ChatRequest, CreateArticleRequest, MemberChatRequest, MixBotRequest, TranslateRequest,
};
pub use response::ApiResponse;
