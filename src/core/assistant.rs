//! 对话处理
//!
//! 根据消息意图把请求分发到题目生成接口或通用聊天接口，
//! 并把结果整理成可直接展示的文本。

use crate::core::client::ExamApiClient;
use crate::core::error::ApiError;
use crate::core::intent::{classify_intent, MessageIntent};
use crate::core::knowledge::KnowledgeBase;
use crate::core::latex::latex_to_natural_language;
use crate::core::models::{ChatMessage, Difficulty, QuestionBatch};

/// 处理失败时回复给用户的文字
pub const ERROR_REPLY: &str = "抱歉，处理您的请求时出现了错误。请重试。";

/// 对话中出题使用的默认主题
const DEFAULT_TOPIC: &str = "考试复习";
/// 对话中出题的默认数量
const DEFAULT_QUESTION_COUNT: u32 = 3;

/// 对话助手
pub struct ChatAssistant<'a> {
    client: &'a ExamApiClient,
}

impl<'a> ChatAssistant<'a> {
    pub fn new(client: &'a ExamApiClient) -> Self {
        Self { client }
    }

    /// 处理一条用户消息，任何错误都转换为道歉文字
    pub async fn reply(&self, message: &str, knowledge_base: &KnowledgeBase) -> String {
        match self.try_reply(message, knowledge_base).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("处理消息失败: {}", e);
                ERROR_REPLY.to_string()
            }
        }
    }

    /// 处理一条用户消息
    pub async fn try_reply(
        &self,
        message: &str,
        knowledge_base: &KnowledgeBase,
    ) -> Result<String, ApiError> {
        match classify_intent(message) {
            MessageIntent::GenerateQuestions => {
                tracing::info!("识别为出题请求");
                let batch = self
                    .client
                    .generate_questions(
                        DEFAULT_TOPIC,
                        Difficulty::Medium,
                        DEFAULT_QUESTION_COUNT,
                        &knowledge_base.knowledge,
                        &knowledge_base.questions,
                    )
                    .await?;
                Ok(format_question_batch(&batch))
            }
            MessageIntent::AnswerLookup => {
                self.client
                    .send_message(message, &knowledge_base.knowledge, &knowledge_base.questions)
                    .await
            }
        }
    }
}

/// 将生成的题目整理为展示文本
pub fn format_question_batch(batch: &QuestionBatch) -> String {
    let source_type = batch.source_type.as_deref().unwrap_or("未知来源");
    let mut out = format!("## 📝 为您生成的题目 ({})\n\n", source_type);

    for (index, question) in batch.questions.iter().enumerate() {
        out.push_str(&format!("### 题目 {} {}\n\n", index + 1, question.source().label()));
        out.push_str(&format!("**题目：** {}\n\n", question.question));
        out.push_str(&format!("**答案：** {}\n\n", question.answer));
        out.push_str(&format!("**详细解释：** {}\n\n", question.explanation));

        if !question.references.is_empty() {
            out.push_str(&format!("**知识库引用：** {}\n\n", question.references.join(", ")));
        }

        out.push_str("---\n\n");
    }

    out
}

/// 对话记录
#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// 追加一问一答；回答在入库时完成公式转换
    pub fn push_exchange(&mut self, question: &str, answer: &str) {
        self.messages.push(ChatMessage::user(question));
        self.messages
            .push(ChatMessage::assistant(latex_to_natural_language(answer)));
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ChatRole, GeneratedQuestion};

    fn question(source: Option<&str>, references: &[&str]) -> GeneratedQuestion {
        GeneratedQuestion {
            question: "什么是过拟合？".to_string(),
            answer: "模型在训练集上表现好、在测试集上表现差".to_string(),
            explanation: "模型记住了噪声".to_string(),
            source: source.map(str::to_string),
            references: references.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_format_question_batch() {
        let batch = QuestionBatch {
            success: true,
            questions: vec![
                question(Some("extracted"), &["历年真题.docx"]),
                question(Some("generated"), &[]),
            ],
            total: Some(2),
            source_type: Some("题库+知识点".to_string()),
        };

        let text = format_question_batch(&batch);
        assert!(text.starts_with("## 📝 为您生成的题目 (题库+知识点)\n\n"));
        assert!(text.contains("### 题目 1 📚 来自题目库"));
        assert!(text.contains("### 题目 2 🤖 基于知识点生成"));
        assert!(text.contains("**知识库引用：** 历年真题.docx"));
        assert_eq!(text.matches("**知识库引用：**").count(), 1);
        assert_eq!(text.matches("---\n\n").count(), 2);
    }

    #[test]
    fn test_format_empty_batch_uses_unknown_source() {
        let text = format_question_batch(&QuestionBatch::default());
        assert_eq!(text, "## 📝 为您生成的题目 (未知来源)\n\n");
    }

    #[test]
    fn test_history_pairs_and_converts() {
        let mut history = ChatHistory::default();
        history.push_exchange("圆的面积？", r"$\pi r^2$");

        let messages = history.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].content, "圆的面积？");
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(messages[1].content, "【数学公式：π r的2次方】");

        history.clear();
        assert!(history.is_empty());
    }
}
