//! 上传前的文件准备
//!
//! 只做校验与元数据整理，不做任何内容解析（解析由后端完成）。

use crate::core::error::UploadError;
use std::path::{Path, PathBuf};

/// 单个文件大小上限（10MB）
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// 支持的扩展名及其MIME类型
pub const SUPPORTED_FILE_TYPES: &[(&str, &str)] = &[
    (".pdf", "application/pdf"),
    (
        ".docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    (".txt", "text/plain"),
    (".md", "text/markdown"),
];

/// 文件选择对话框使用的扩展名（不带点）
pub fn accepted_extensions() -> Vec<&'static str> {
    SUPPORTED_FILE_TYPES
        .iter()
        .map(|(ext, _)| ext.trim_start_matches('.'))
        .collect()
}

/// 待上传文件
#[derive(Debug, Clone)]
pub struct PendingUpload {
    /// 客户端生成的稳定ID（基于路径的hash）
    pub id: String,
    /// 文件名
    pub name: String,
    /// 本地路径
    pub path: PathBuf,
    /// MIME类型
    pub mime_type: String,
    /// 文件内容
    pub bytes: Vec<u8>,
}

impl PendingUpload {
    /// 从本地路径读取并校验文件
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        let declared_mime = SUPPORTED_FILE_TYPES
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, mime)| *mime)
            .ok_or_else(|| UploadError::UnsupportedType(name.clone()))?;

        let size = std::fs::metadata(path)?.len();
        if size > MAX_FILE_SIZE {
            return Err(UploadError::TooLarge {
                name,
                size,
                limit: MAX_FILE_SIZE,
            });
        }

        let bytes = std::fs::read(path)?;

        // 文本类文件没有魔数，嗅探结果不在支持列表内时沿用扩展名对应的类型
        let mime_type = infer::get(&bytes)
            .map(|kind| kind.mime_type())
            .filter(|sniffed| SUPPORTED_FILE_TYPES.iter().any(|(_, mime)| mime == sniffed))
            .unwrap_or(declared_mime)
            .to_string();

        Ok(Self {
            id: stable_id(path),
            name,
            path: path.to_path_buf(),
            mime_type,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// 基于路径生成稳定ID
fn stable_id(path: &Path) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    hex::encode(&hasher.finalize()[..16])
}
