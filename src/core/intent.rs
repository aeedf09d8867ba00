//! 消息意图识别
//!
//! 判断用户消息是"生成新题目"还是"询问已有题目/知识点"。
//! 两条固定规则，不调用模型：
//! - 命中任一出题关键词 → 生成题目
//! - 但消息同时包含"题目"与答案类词语时，视为查答案（排除规则优先）

/// 出题关键词（大小写不敏感）
const GENERATE_KEYWORDS: &[&str] = &["generate", "生成题目", "出题", "生成练习", "创建题目", "制作题目"];

/// 查答案类词语，与"题目"同时出现时排除出题意图
const ANSWER_KEYWORDS: &[&str] = &["答案", "解答", "解析"];

/// 消息意图
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageIntent {
    /// 生成新的练习题（走题目生成接口）
    GenerateQuestions,
    /// 询问题库内题目或知识点（走通用聊天接口）
    AnswerLookup,
}

/// 对用户消息进行意图分类
pub fn classify_intent(message: &str) -> MessageIntent {
    let lower = message.to_lowercase();

    let wants_generation = GENERATE_KEYWORDS.iter().any(|k| lower.contains(k));
    let asks_for_answer =
        lower.contains("题目") && ANSWER_KEYWORDS.iter().any(|k| lower.contains(k));

    if wants_generation && !asks_for_answer {
        MessageIntent::GenerateQuestions
    } else {
        MessageIntent::AnswerLookup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_keyword_alone() {
        assert_eq!(classify_intent("生成题目"), MessageIntent::GenerateQuestions);
        assert_eq!(classify_intent("请帮我生成题目，关于线性代数"), MessageIntent::GenerateQuestions);
        assert_eq!(classify_intent("给我出题"), MessageIntent::GenerateQuestions);
        assert_eq!(classify_intent("生成练习吧"), MessageIntent::GenerateQuestions);
        assert_eq!(classify_intent("创建题目"), MessageIntent::GenerateQuestions);
        assert_eq!(classify_intent("制作题目"), MessageIntent::GenerateQuestions);
    }

    #[test]
    fn test_english_keyword_is_case_insensitive() {
        assert_eq!(classify_intent("Generate 5 questions"), MessageIntent::GenerateQuestions);
        assert_eq!(classify_intent("GENERATE"), MessageIntent::GenerateQuestions);
    }

    #[test]
    fn test_exclusion_wins() {
        assert_eq!(classify_intent("生成题目的答案"), MessageIntent::AnswerLookup);
        assert_eq!(classify_intent("生成题目并给出解析"), MessageIntent::AnswerLookup);
        assert_eq!(classify_intent("出题目，然后解答"), MessageIntent::AnswerLookup);
        assert_eq!(classify_intent("generate 题目 答案"), MessageIntent::AnswerLookup);
    }

    #[test]
    fn test_answer_words_without_timu_do_not_exclude() {
        // "出题" 不含 "题目"，排除规则不生效
        assert_eq!(classify_intent("出题并附答案"), MessageIntent::GenerateQuestions);
    }

    #[test]
    fn test_no_trigger_keywords() {
        assert_eq!(classify_intent("这道题的答案是什么"), MessageIntent::AnswerLookup);
        assert_eq!(classify_intent("什么是机器学习？"), MessageIntent::AnswerLookup);
        assert_eq!(classify_intent(""), MessageIntent::AnswerLookup);
        assert_eq!(classify_intent("题目2-2"), MessageIntent::AnswerLookup);
    }

    #[test]
    fn test_property_over_surrounding_text() {
        let fillers = ["", "请", "abc ", "帮我", "第3章 ", "😀"];
        for prefix in fillers {
            for suffix in fillers {
                let plain = format!("{prefix}生成题目{suffix}");
                assert_eq!(classify_intent(&plain), MessageIntent::GenerateQuestions, "{plain}");

                let with_answer = format!("{prefix}生成题目{suffix}答案");
                assert_eq!(classify_intent(&with_answer), MessageIntent::AnswerLookup, "{with_answer}");
            }
        }
    }
}
