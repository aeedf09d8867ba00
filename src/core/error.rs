//! 错误类型
//!
//! 错误信息直接展示给用户，因此使用中文。

use thiserror::Error;

/// 后端API调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 无法连接到后端
    #[error("网络连接失败，请检查后端服务是否运行")]
    Network(String),

    /// 请求超时
    #[error("请求超时，请稍后重试")]
    Timeout,

    /// 后端返回非成功状态码
    #[error("API调用失败: {detail}")]
    Http { status: u16, detail: String },

    /// 响应无法解析
    #[error("响应格式错误: {0}")]
    InvalidResponse(String),

    /// 会话创建失败
    #[error("无法创建会话")]
    Session,

    /// 请求构造失败（如上传文件的MIME类型无效）
    #[error("请求构造失败: {0}")]
    Request(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::Network(e.to_string())
        } else if e.is_decode() {
            ApiError::InvalidResponse(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Http {
                status: status.as_u16(),
                detail: e.to_string(),
            }
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl ApiError {
    /// 从后端错误响应体中提取 detail 字段，取不到时使用原始文本
    pub fn from_error_body(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.trim().to_string()
                }
            });
        ApiError::Http { status, detail }
    }
}

/// 上传文件校验错误
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("不支持的文件类型: {0}（仅支持 .pdf .docx .txt .md）")]
    UnsupportedType(String),

    #[error("文件过大: {name}（{size} 字节，上限 {limit} 字节）")]
    TooLarge { name: String, size: u64, limit: u64 },

    #[error("读取文件失败: {0}")]
    Io(#[from] std::io::Error),
}
