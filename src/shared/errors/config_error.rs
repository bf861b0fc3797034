use thiserror::Error;

/// 설정 에러
/// Configuration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// DB 접속 문자열 없음
    #[error("Database URI is not set. Set it via 'DATABASE_URI' or '-d' (or use --in-memory)")]
    MissingDatabaseUri,

    /// 서명 키 없음
    #[error("Server key is not set. Set it via 'KEY' or '-k'")]
    MissingKey,

    /// 기간 문자열 파싱 실패
    #[error("Invalid duration: '{0}' (expected e.g. 500ms, 30s, 1m30s, 2h)")]
    InvalidDuration(String),
}
