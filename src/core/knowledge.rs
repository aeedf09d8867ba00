//! 客户端知识库状态
//!
//! 知识库内容完全由后端维护，这里只保存最近一次拉取的快照，
//! 供侧栏展示和发送聊天请求时使用。

use crate::core::client::ExamApiClient;
use crate::core::error::ApiError;
use crate::core::models::{KnowledgeFile, KnowledgeType};

/// 文件内容为空时的占位文字
pub const EMPTY_CONTENT: &str = "文件内容为空";
/// 文件内容获取失败时的占位文字
pub const CONTENT_UNAVAILABLE: &str = "文件内容获取失败";

/// 知识库快照
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    /// 知识库1：复习资料
    pub knowledge: Vec<KnowledgeFile>,
    /// 知识库2：考试题目
    pub questions: Vec<KnowledgeFile>,
}

impl KnowledgeBase {
    /// 从后端拉取文件列表及每个文件的内容
    ///
    /// 单个文件内容获取失败不影响整体，文件保留并使用占位文字。
    pub async fn fetch(client: &ExamApiClient) -> Result<Self, ApiError> {
        let listing = client.list_files().await?;
        if !listing.success {
            return Err(ApiError::InvalidResponse("获取知识库文件列表失败".to_string()));
        }

        let knowledge = Self::with_content(client, listing.knowledge_base_1).await;
        let questions = Self::with_content(client, listing.knowledge_base_2).await;

        tracing::info!(
            "知识库已刷新: 复习资料 {} 个, 考试题目 {} 个",
            knowledge.len(),
            questions.len()
        );

        Ok(Self {
            knowledge,
            questions,
        })
    }

    async fn with_content(client: &ExamApiClient, files: Vec<KnowledgeFile>) -> Vec<KnowledgeFile> {
        let mut result = Vec::with_capacity(files.len());
        for mut file in files {
            let content = match client.file_content(&file.id).await {
                Ok(response) => response
                    .content
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| EMPTY_CONTENT.to_string()),
                Err(e) => {
                    tracing::warn!("获取文件 {} 内容失败: {}", file.name, e);
                    CONTENT_UNAVAILABLE.to_string()
                }
            };
            file.content = Some(content);
            result.push(file);
        }
        result
    }

    /// 指定类型的文件列表
    pub fn files(&self, knowledge_type: KnowledgeType) -> &[KnowledgeFile] {
        match knowledge_type {
            KnowledgeType::Knowledge => &self.knowledge,
            KnowledgeType::Questions => &self.questions,
        }
    }

    /// 按文件名过滤（大小写不敏感）
    pub fn filtered(&self, knowledge_type: KnowledgeType, term: &str) -> Vec<&KnowledgeFile> {
        let term = term.trim().to_lowercase();
        self.files(knowledge_type)
            .iter()
            .filter(|f| term.is_empty() || f.name.to_lowercase().contains(&term))
            .collect()
    }

    /// 从本地快照移除文件（后端删除成功后调用）
    pub fn remove(&mut self, knowledge_type: KnowledgeType, file_id: &str) {
        let list = match knowledge_type {
            KnowledgeType::Knowledge => &mut self.knowledge,
            KnowledgeType::Questions => &mut self.questions,
        };
        list.retain(|f| f.id != file_id);
    }

    /// 清空（新会话时使用）
    pub fn clear(&mut self) {
        self.knowledge.clear();
        self.questions.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.knowledge.is_empty() && self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KnowledgeBase {
        KnowledgeBase {
            knowledge: vec![
                KnowledgeFile::new("k1", "机器学习基础.pdf"),
                KnowledgeFile::new("k2", "Deep Learning Notes.md"),
            ],
            questions: vec![KnowledgeFile::new("q1", "历年真题.docx")],
        }
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let kb = sample();
        let hits = kb.filtered(KnowledgeType::Knowledge, "deep");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "k2");

        assert_eq!(kb.filtered(KnowledgeType::Knowledge, "").len(), 2);
        assert_eq!(kb.filtered(KnowledgeType::Questions, "真题").len(), 1);
        assert!(kb.filtered(KnowledgeType::Questions, "不存在").is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut kb = sample();
        kb.remove(KnowledgeType::Knowledge, "k1");
        assert_eq!(kb.knowledge.len(), 1);
        // 类型不匹配时不删除
        kb.remove(KnowledgeType::Knowledge, "q1");
        assert_eq!(kb.questions.len(), 1);

        kb.clear();
        assert!(kb.is_empty());
    }
}
