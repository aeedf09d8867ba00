//! 后端REST客户端
//!
//! 所有知识库与对话操作都以会话ID为作用域。会话ID由后端签发，
//! 客户端只在内存中缓存，首次使用时自动创建。

use crate::core::error::ApiError;
use crate::core::models::{
    ApiConfig, ChatRequest, Difficulty, KnowledgeFile, KnowledgeType, QuestionBatch,
    QuestionRequest, QuestionType, UploadFileInfo,
};
use crate::core::upload::PendingUpload;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::Mutex;

/// 创建会话响应
#[derive(Debug, Deserialize)]
struct CreateSessionResponse {
    #[serde(default)]
    success: bool,
    session_id: Option<String>,
}

/// 知识库文件列表
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeListing {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub knowledge_base_1: Vec<KnowledgeFile>,
    #[serde(default)]
    pub knowledge_base_2: Vec<KnowledgeFile>,
}

/// 单个文件内容
#[derive(Debug, Clone, Deserialize)]
pub struct FileContent {
    #[serde(default)]
    pub file: Option<KnowledgeFile>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AllContentResponse {
    #[serde(default)]
    files: Vec<KnowledgeFile>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    answer: serde_json::Value,
}

/// 上传结果
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub files: Vec<KnowledgeFile>,
}

/// 删除结果
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// 后端健康状态
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub api_key_configured: bool,
}

/// 考试复习后端客户端
pub struct ExamApiClient {
    /// API配置
    config: ApiConfig,
    /// HTTP客户端
    client: reqwest::Client,
    /// 当前会话ID；锁在创建会话期间保持，保证并发调用只创建一次
    session: Mutex<Option<String>>,
}

impl ExamApiClient {
    /// 创建新的客户端
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| ApiError::Request(format!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self {
            config,
            client,
            session: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// 创建新会话并替换缓存
    pub async fn create_session(&self) -> Result<String, ApiError> {
        let mut guard = self.session.lock().await;
        let id = self.request_new_session().await?;
        *guard = Some(id.clone());
        Ok(id)
    }

    /// 获取当前会话ID，不存在时先创建
    pub async fn session_id(&self) -> Result<String, ApiError> {
        let mut guard = self.session.lock().await;
        if let Some(id) = guard.as_ref() {
            return Ok(id.clone());
        }
        let id = self.request_new_session().await?;
        *guard = Some(id.clone());
        Ok(id)
    }

    async fn request_new_session(&self) -> Result<String, ApiError> {
        let response: CreateSessionResponse = self
            .send(self.client.post(self.url("/create-session")))
            .await?;

        match response.session_id {
            Some(id) if response.success && !id.is_empty() => {
                tracing::info!("会话创建成功: {}", id);
                Ok(id)
            }
            _ => {
                tracing::error!("创建会话失败: 后端未返回会话ID");
                Err(ApiError::Session)
            }
        }
    }

    /// 获取知识库文件列表
    pub async fn list_files(&self) -> Result<KnowledgeListing, ApiError> {
        let sid = self.session_id().await?;
        self.send(self.client.get(self.url(&format!("/knowledge-base/{}", sid))))
            .await
    }

    /// 获取单个文件内容
    pub async fn file_content(&self, file_id: &str) -> Result<FileContent, ApiError> {
        let sid = self.session_id().await?;
        self.send(
            self.client
                .get(self.url(&format!("/knowledge-base/{}/{}", sid, file_id))),
        )
        .await
    }

    /// 获取会话内所有文件及其内容
    pub async fn all_content(&self) -> Result<Vec<KnowledgeFile>, ApiError> {
        let sid = self.session_id().await?;
        let response: AllContentResponse = self
            .send(
                self.client
                    .get(self.url(&format!("/knowledge-base-content/{}", sid))),
            )
            .await?;
        Ok(response.files)
    }

    /// 发送消息给大模型并获取回复
    ///
    /// 知识库内容取自后端最新数据，只保留调用方当前持有的文件；
    /// 取内容失败时退回使用调用方传入的文件。
    pub async fn send_message(
        &self,
        message: &str,
        knowledge_base_1: &[KnowledgeFile],
        knowledge_base_2: &[KnowledgeFile],
    ) -> Result<String, ApiError> {
        let sid = self.session_id().await?;

        let (knowledge_files, question_files) = match self.all_content().await {
            Ok(all) => (
                select_files(&all, knowledge_base_1),
                select_files(&all, knowledge_base_2),
            ),
            Err(e) => {
                tracing::warn!("获取知识库内容失败，使用本地数据: {}", e);
                (knowledge_base_1.to_vec(), knowledge_base_2.to_vec())
            }
        };

        tracing::debug!(
            "发送聊天请求: 知识库文件 {} 个, 题目文件 {} 个",
            knowledge_files.len(),
            question_files.len()
        );

        let request = ChatRequest {
            message: message.to_string(),
            session_id: sid,
            knowledge_base_1: knowledge_files,
            knowledge_base_2: question_files,
            api_key: self.config.api_key().map(str::to_string),
            model: self.config.model_override().map(str::to_string),
        };

        let response: ChatResponse = self
            .send(self.client.post(self.url("/chat")).json(&request))
            .await?;

        Ok(answer_text(response.answer))
    }

    /// 基于知识库生成题目
    pub async fn generate_questions(
        &self,
        topic: &str,
        difficulty: Difficulty,
        count: u32,
        knowledge_base_1: &[KnowledgeFile],
        knowledge_base_2: &[KnowledgeFile],
    ) -> Result<QuestionBatch, ApiError> {
        let sid = self.session_id().await?;
        let all = self.all_content().await?;

        let request = QuestionRequest {
            topic: topic.to_string(),
            session_id: sid,
            difficulty,
            count,
            question_type: QuestionType::MultipleChoice,
            knowledge_base_1: select_files(&all, knowledge_base_1),
            knowledge_base_2: select_files(&all, knowledge_base_2),
            api_key: self.config.api_key().map(str::to_string),
            model: self.config.model_override().map(str::to_string),
        };

        self.send(
            self.client
                .post(self.url("/generate-questions"))
                .json(&request),
        )
        .await
    }

    /// 上传文件到指定知识库
    pub async fn upload(
        &self,
        files: &[PendingUpload],
        knowledge_type: KnowledgeType,
    ) -> Result<UploadResult, ApiError> {
        let sid = self.session_id().await?;

        let mut form = reqwest::multipart::Form::new();
        for file in files {
            let part = reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(&file.mime_type)
                .map_err(|e| ApiError::Request(e.to_string()))?;
            let info = UploadFileInfo {
                id: file.id.clone(),
                name: file.name.clone(),
                knowledge_type,
            };
            let info_json =
                serde_json::to_string(&info).map_err(|e| ApiError::Request(e.to_string()))?;
            form = form.part("files", part).text("file_info", info_json);
        }
        form = form.text("session_id", sid);

        tracing::info!("上传 {} 个文件到{}", files.len(), knowledge_type);
        self.send(self.client.post(self.url("/upload")).multipart(form))
            .await
    }

    /// 从知识库删除文件
    pub async fn delete_file(
        &self,
        file_id: &str,
        knowledge_type: KnowledgeType,
    ) -> Result<DeleteResult, ApiError> {
        let sid = self.session_id().await?;
        self.send(
            self.client
                .delete(self.url(&format!("/delete-file/{}/{}", sid, file_id)))
                .query(&[("knowledge_type", knowledge_type.as_str())]),
        )
        .await
    }

    /// 后端健康检查
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.send(self.client.get(self.url("/health"))).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// 附加模型覆盖头并发送请求，非2xx时解析后端的 detail
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let request = self.apply_model_headers(request);
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("API调用失败，状态码: {}", status.as_u16());
            return Err(ApiError::from_error_body(status.as_u16(), &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    fn apply_model_headers(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(model) = self.config.model_override() {
            if let Some(key) = self.config.api_key() {
                request = request.header("x-api-key", key);
            }
            request = request.header("x-model", model);
        }
        request
    }
}

/// 从后端全量文件中挑出调用方持有的文件
pub(crate) fn select_files(all: &[KnowledgeFile], wanted: &[KnowledgeFile]) -> Vec<KnowledgeFile> {
    let ids: HashSet<&str> = wanted.iter().map(|f| f.id.as_str()).collect();
    all.iter()
        .filter(|f| ids.contains(f.id.as_str()))
        .cloned()
        .collect()
}

/// 保证回答为字符串；非字符串时格式化为JSON
pub(crate) fn answer_text(answer: serde_json::Value) -> String {
    match answer {
        serde_json::Value::String(s) => s,
        other => {
            tracing::debug!("answer不是字符串，转换为JSON字符串");
            serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn file(id: &str) -> KnowledgeFile {
        KnowledgeFile::new(id, format!("{}.txt", id))
    }

    #[test]
    fn test_select_files_keeps_only_wanted() {
        let mut all = vec![file("a"), file("b"), file("c")];
        all[0].content = Some("内容A".to_string());

        let selected = select_files(&all, &[file("a"), file("c"), file("zzz")]);
        let ids: Vec<_> = selected.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        // 使用后端返回的版本（带内容）
        assert_eq!(selected[0].content.as_deref(), Some("内容A"));
    }

    #[test]
    fn test_select_files_empty_wanted() {
        let all = vec![file("a")];
        assert!(select_files(&all, &[]).is_empty());
    }

    #[test]
    fn test_answer_text() {
        assert_eq!(answer_text(json!("你好")), "你好");
        assert_eq!(answer_text(json!({"a": 1})), "{\n  \"a\": 1\n}");
        assert_eq!(answer_text(serde_json::Value::Null), "null");
    }

    #[test]
    fn test_url_join_trims_trailing_slash() {
        let client = ExamApiClient::new(ApiConfig {
            base_url: "http://localhost:8000/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.url("/chat"), "http://localhost:8000/chat");
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        let client = ExamApiClient::new(ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();

        let err = client.session_id().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_) | ApiError::Timeout));
        // 失败不缓存，下次调用仍会重新请求
        assert!(client.session_id().await.is_err());
    }
}
