use thiserror::Error;

/// Top-level error type for the redpen pipeline.
///
/// The display strings of the user-fatal variants are shown verbatim to the
/// user by the CLI, so they carry the product's Traditional Chinese wording.
#[derive(Debug, Error)]
pub enum RedpenError {
    #[error("API 金鑰無效，請檢查設定")]
    InvalidApiKey,

    #[error("API 請求過於頻繁，請稍後再試")]
    RateLimited,

    #[error("圖片處理失敗，請確保照片清晰可讀")]
    ImageProcessing,

    #[error("PDF 匯出失敗")]
    PdfExport,

    #[error("record {0} not found")]
    RecordNotFound(i64),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure modes of a chat-completions call, split by HTTP status so the
/// grading client can decide between fatal surfacing and fallback.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 401: the configured credential was rejected.
    #[error("credential rejected by completion endpoint")]
    Unauthorized,

    /// 402: the account behind the credential is out of quota.
    #[error("completion endpoint reports exhausted quota")]
    PaymentRequired,

    /// 429: the endpoint is throttling this credential.
    #[error("completion endpoint rate limit hit")]
    RateLimited,

    /// Any other non-success status.
    #[error("completion endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Connection, TLS, timeout, or body-decoding failure.
    #[error("transport failure: {0}")]
    Transport(String),
}
