use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// 회원가입/로그인 요청 모델
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(as = Credentials)]
pub struct Credentials {
    /// Login
    /// 로그인 ID
    #[schema(example = "alice")]
    pub login: String,

    /// Password (will be hashed)
    /// 비밀번호 (해싱됨)
    #[schema(example = "password123")]
    pub password: String,
}

// 회원가입/로그인 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = TokenResponse)]
pub struct TokenResponse {
    /// JWT Access Token (Authorization 헤더에도 포함)
    /// JWT Access Token, also sent in the Authorization header
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}
