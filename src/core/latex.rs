//! LaTeX 公式转自然语言
//!
//! 大模型回答中常混入 LaTeX 片段，桌面端不做公式排版，
//! 统一改写为可直接阅读的中文/Unicode 文本。

use regex::Regex;
use std::sync::OnceLock;

/// 符号替换表，按顺序执行；较长的命令必须排在其前缀之前
const MATH_SYMBOLS: &[(&str, &str)] = &[
    (r"\alpha", "α"),
    (r"\beta", "β"),
    (r"\gamma", "γ"),
    (r"\delta", "δ"),
    (r"\theta", "θ"),
    (r"\lambda", "λ"),
    (r"\mu", "μ"),
    (r"\pi", "π"),
    (r"\sigma", "σ"),
    (r"\phi", "φ"),
    (r"\omega", "ω"),
    (r"\infty", "∞"),
    (r"\sum", "求和"),
    (r"\prod", "连乘"),
    (r"\int", "积分"),
    (r"\sqrt", "根号"),
    (r"\frac", "分数"),
    (r"\times", "×"),
    (r"\div", "÷"),
    (r"\pm", "±"),
    (r"\leq", "≤"),
    (r"\geq", "≥"),
    (r"\neq", "≠"),
    (r"\approx", "≈"),
    (r"\sin", "正弦"),
    (r"\cos", "余弦"),
    (r"\tan", "正切"),
    (r"\log", "对数"),
    (r"\ln", "自然对数"),
    (r"\exp", "指数函数"),
    (r"\lim", "极限"),
];

struct Patterns {
    frac: Regex,
    sqrt: Regex,
    superscript: Regex,
    subscript: Regex,
    display_dollar: Regex,
    display_bracket: Regex,
    inline_paren: Regex,
    inline_dollar: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        frac: compile(r"\\frac\{([^}]+)\}\{([^}]+)\}"),
        sqrt: compile(r"\\sqrt\{([^}]+)\}"),
        superscript: compile(r"([a-zA-Z0-9])\^([a-zA-Z0-9]+)"),
        subscript: compile(r"([a-zA-Z0-9])_([a-zA-Z0-9]+)"),
        display_dollar: compile(r"\$\$([^$]+)\$\$"),
        display_bracket: compile(r"(?s)\\\[(.+?)\\\]"),
        inline_paren: compile(r"(?s)\\\((.+?)\\\)"),
        inline_dollar: compile(r"\$([^$]+)\$"),
    })
}

fn compile(pattern: &str) -> Regex {
    // 模式均为编译期常量
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

/// 将文本中的 LaTeX 片段转换为自然数学语言
pub fn latex_to_natural_language(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let p = patterns();

    // 结构化命令必须先于符号表执行：反过来 \frac{1}{2} 会变成 "分数{1}{2}"，
    // \sqrt{x} 会变成 "根号{x}"
    let mut converted = p.frac.replace_all(text, "($1)/($2)").into_owned();
    converted = p.sqrt.replace_all(&converted, "√($1)").into_owned();

    for (latex, natural) in MATH_SYMBOLS {
        if converted.contains(latex) {
            converted = converted.replace(latex, natural);
        }
    }

    converted = p.superscript.replace_all(&converted, "${1}的${2}次方").into_owned();
    converted = p.subscript.replace_all(&converted, "${1}的下标${2}").into_owned();

    // $$ 必须先于 $ 处理，否则 $$a$$ 两侧会残留多余的 $
    converted = p.display_dollar.replace_all(&converted, "【数学公式：$1】").into_owned();
    converted = p.display_bracket.replace_all(&converted, "【数学公式：$1】").into_owned();
    converted = p.inline_paren.replace_all(&converted, "【数学公式：$1】").into_owned();
    converted = p.inline_dollar.replace_all(&converted, "【数学公式：$1】").into_owned();

    converted
}
