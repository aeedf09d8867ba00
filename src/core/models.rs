//! 核心数据模型定义
//!
//! 与后端交换的请求/响应结构，以及客户端本地的会话与对话状态。
//! 字段名必须与后端JSON保持一致。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 知识库类型
/// 知识库1为复习资料，知识库2为考试题目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeType {
    /// 复习资料（知识库1）
    Knowledge,
    /// 考试题目（知识库2）
    Questions,
}

impl KnowledgeType {
    /// 后端使用的类型字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            KnowledgeType::Knowledge => "knowledge",
            KnowledgeType::Questions => "questions",
        }
    }

    /// 空列表时的提示文字
    pub fn empty_hint(&self) -> &'static str {
        match self {
            KnowledgeType::Knowledge => "暂无复习资料",
            KnowledgeType::Questions => "暂无题库文件",
        }
    }
}

impl std::fmt::Display for KnowledgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KnowledgeType::Knowledge => write!(f, "复习资料"),
            KnowledgeType::Questions => write!(f, "考试题目"),
        }
    }
}

/// 知识库文件
/// 除 id 和 name 外，后端不保证其余字段存在
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeFile {
    /// 后端分配的文件ID
    pub id: String,
    /// 文件名
    pub name: String,
    /// 文件大小（字节）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// MIME类型
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// 后端存储路径
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// 上传时间（后端本地时间，无时区）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_time: Option<String>,
    /// 所属会话
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// 文件文本内容
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl KnowledgeFile {
    /// 仅包含ID和名称的文件描述
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size: None,
            mime_type: None,
            path: None,
            upload_time: None,
            session_id: None,
            content: None,
        }
    }

    /// 以KB为单位的大小，保留一位小数
    pub fn size_kb_label(&self) -> String {
        format!("{:.1} KB", self.size.unwrap_or(0) as f64 / 1024.0)
    }
}

/// 对话角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// 对话消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// 本地唯一ID
    pub id: String,
    /// 发送方
    pub role: ChatRole,
    /// 消息内容
    pub content: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// 用户消息
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content.into())
    }

    /// 助手消息
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content.into())
    }

    fn new(role: ChatRole, content: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content,
            created_at: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}

/// 题目难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// 题目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    Essay,
    ShortAnswer,
}

/// 生成题目的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSource {
    /// 直接从题目库中抽取
    Extracted,
    /// 基于知识点生成
    Generated,
}

impl QuestionSource {
    /// 后端只区分 "extracted"，其余取值都视为生成
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("extracted") => QuestionSource::Extracted,
            _ => QuestionSource::Generated,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestionSource::Extracted => "📚 来自题目库",
            QuestionSource::Generated => "🤖 基于知识点生成",
        }
    }
}

/// 后端生成的单道题目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub references: Vec<String>,
}

impl GeneratedQuestion {
    pub fn source(&self) -> QuestionSource {
        QuestionSource::from_wire(self.source.as_deref())
    }
}

/// 题目生成接口响应
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QuestionBatch {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub questions: Vec<GeneratedQuestion>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub source_type: Option<String>,
}

/// 聊天请求载荷
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
    pub knowledge_base_1: Vec<KnowledgeFile>,
    pub knowledge_base_2: Vec<KnowledgeFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// 题目生成请求载荷
#[derive(Debug, Clone, Serialize)]
pub struct QuestionRequest {
    pub topic: String,
    pub session_id: String,
    pub difficulty: Difficulty,
    pub count: u32,
    pub question_type: QuestionType,
    pub knowledge_base_1: Vec<KnowledgeFile>,
    pub knowledge_base_2: Vec<KnowledgeFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// 上传时随文件附带的描述
#[derive(Debug, Clone, Serialize)]
pub struct UploadFileInfo {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub knowledge_type: KnowledgeType,
}

/// 后端API配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// 后端基地址
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 大模型API密钥（可为空，由后端使用默认密钥）
    #[serde(default)]
    pub api_key: String,
    /// 模型名称，"default" 表示使用后端默认模型
    #[serde(default = "default_model")]
    pub model: String,
    /// 请求超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_model() -> String {
    "default".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl ApiConfig {
    /// 非空白的API密钥
    pub fn api_key(&self) -> Option<&str> {
        let key = self.api_key.trim();
        (!key.is_empty()).then_some(key)
    }

    /// 需要覆盖后端默认值的模型名称
    pub fn model_override(&self) -> Option<&str> {
        let model = self.model.trim();
        (!model.is_empty() && model != "default").then_some(model)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 后端API配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 启动时是否显示知识库侧栏
    #[serde(default = "default_true")]
    pub show_knowledge_panel: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            show_knowledge_panel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knowledge_file_tolerates_missing_fields() {
        let file: KnowledgeFile = serde_json::from_str(r#"{"id":"file_1","name":"a.pdf"}"#).unwrap();
        assert_eq!(file.id, "file_1");
        assert!(file.content.is_none());
        assert_eq!(file.size_kb_label(), "0.0 KB");
    }

    #[test]
    fn test_knowledge_file_type_field() {
        let file: KnowledgeFile = serde_json::from_str(
            r#"{"id":"f","name":"n.txt","type":"text/plain","size":2048}"#,
        )
        .unwrap();
        assert_eq!(file.mime_type.as_deref(), Some("text/plain"));
        assert_eq!(file.size_kb_label(), "2.0 KB");

        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["type"], "text/plain");
        assert!(json.get("content").is_none());
    }

    #[test]
    fn test_question_source_unknown_value_is_generated() {
        let q: GeneratedQuestion =
            serde_json::from_str(r#"{"question":"q","answer":"a","explanation":"e","source":"ai"}"#).unwrap();
        assert_eq!(q.source(), QuestionSource::Generated);

        let q: GeneratedQuestion = serde_json::from_str(r#"{"source":"extracted"}"#).unwrap();
        assert_eq!(q.source(), QuestionSource::Extracted);

        let q: GeneratedQuestion = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(q.source(), QuestionSource::Generated);
    }

    #[test]
    fn test_model_override() {
        let mut config = ApiConfig::default();
        assert_eq!(config.model_override(), None);
        config.model = "step-1-8k".to_string();
        assert_eq!(config.model_override(), Some("step-1-8k"));
        config.api_key = "   ".to_string();
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_request_enums_serialize_snake_case() {
        assert_eq!(serde_json::to_string(&Difficulty::Medium).unwrap(), "\"medium\"");
        assert_eq!(
            serde_json::to_string(&QuestionType::MultipleChoice).unwrap(),
            "\"multiple_choice\""
        );
        assert_eq!(serde_json::to_string(&KnowledgeType::Questions).unwrap(), "\"questions\"");
    }
}
