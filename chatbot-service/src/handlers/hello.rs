use crate::dtos::ApiResponse;

pub const HELLO_GET_MESSAGE: &str = "안녕하세요.백엔드데이터 GET 서비스입니다.";
pub const HELLO_POST_MESSAGE: &str = "안녕하세요.백엔드데이터 POST 서비스입니다.";

pub async fn hello_get() -> ApiResponse<String> {
    ApiResponse::ok(HELLO_GET_MESSAGE.to_string())
}

pub async fn hello_post() -> ApiResponse<String> {
    ApiResponse::ok(HELLO_POST_MESSAGE.to_string())
}
