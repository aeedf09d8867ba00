//! 对话面板

use crate::core::assistant::ChatHistory;
use crate::core::models::ChatMessage;
use crate::ui::styles::{bubble_rounding, Theme};
use eframe::egui::{self, RichText, Ui};

/// 空对话时的使用提示
const USAGE_TIPS: &[&str] = &[
    "• 询问题库中题目的答案和解析",
    "• 询问某个知识点的详细解释",
    "• 要求生成新的练习题（说\"生成题目\"）",
    "• 请求提供解题思路",
    "• 要求生成模拟考试",
];

/// 对话面板
#[derive(Default)]
pub struct ChatPanel {
    /// 输入框内容
    input: String,
}

impl ChatPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 渲染对话面板，返回用户提交的消息
    pub fn render(
        &mut self,
        ui: &mut Ui,
        history: &ChatHistory,
        pending: Option<&str>,
        theme: &Theme,
    ) -> Option<String> {
        let mut submitted = None;
        let is_loading = pending.is_some();

        ui.heading("逢考必过");
        ui.label(RichText::new("基于您的知识库生成题目和解答").color(theme.muted));
        ui.separator();

        // 输入区固定在底部
        egui::TopBottomPanel::bottom("chat_input")
            .resizable(false)
            .show_inside(ui, |ui| {
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    let input_id = ui.make_persistent_id("chat_input_text");
                    // Enter 发送，Shift+Enter 换行
                    // consume_key 不区分 Shift，需要单独判断
                    let enter_pressed = ui.memory(|m| m.has_focus(input_id))
                        && !ui.input(|i| i.modifiers.shift)
                        && ui.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Enter));

                    let send_width = 48.0;
                    ui.add_enabled(
                        !is_loading,
                        egui::TextEdit::multiline(&mut self.input)
                            .id(input_id)
                            .hint_text("输入您的问题或要求...")
                            .desired_rows(2)
                            .desired_width(ui.available_width() - send_width),
                    );

                    let can_send = !self.input.trim().is_empty() && !is_loading;
                    let clicked = ui
                        .add_enabled(can_send, egui::Button::new("➤ 发送"))
                        .clicked();

                    if (clicked || enter_pressed) && can_send {
                        submitted = Some(std::mem::take(&mut self.input));
                    }
                });
                ui.add_space(6.0);
            });

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if history.is_empty() && pending.is_none() {
                    Self::render_empty_state(ui, theme);
                } else {
                    for message in history.messages() {
                        Self::render_message(ui, message, theme);
                    }
                }

                // 等待回复期间先显示用户消息
                if let Some(question) = pending {
                    Self::render_message(ui, &ChatMessage::user(question), theme);
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new("正在思考...").color(theme.muted));
                    });
                }
            });

        submitted
    }

    fn render_empty_state(ui: &mut Ui, theme: &Theme) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label(RichText::new("🤖").size(40.0));
            ui.label(RichText::new("开始您的复习之旅").size(18.0).strong());
            ui.label("您可以：");
            for tip in USAGE_TIPS {
                ui.label(RichText::new(*tip).color(theme.muted));
            }
            ui.add_space(12.0);
            ui.label(
                RichText::new(
                    "💡 提示：如果您想询问题库中已有题目的答案，直接问\"这道题的答案是什么\"；\
                     如果想生成新的练习题，请说\"生成题目\"。",
                )
                .small()
                .color(theme.primary),
            );
        });
    }

    fn render_message(ui: &mut Ui, message: &ChatMessage, theme: &Theme) {
        let (layout, fill, text_color, avatar) = if message.is_user() {
            (
                egui::Layout::right_to_left(egui::Align::TOP),
                theme.user_bubble,
                theme.user_text,
                "👤",
            )
        } else {
            (
                egui::Layout::left_to_right(egui::Align::TOP),
                theme.assistant_bubble,
                ui.visuals().text_color(),
                "🤖",
            )
        };

        let max_width = ui.available_width() * 0.8;
        ui.with_layout(layout, |ui| {
            ui.label(avatar);
            egui::Frame::none()
                .fill(fill)
                .rounding(bubble_rounding())
                .inner_margin(egui::Margin::symmetric(10.0, 6.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.with_layout(egui::Layout::top_down(egui::Align::LEFT), |ui| {
                        ui.label(RichText::new(&message.content).color(text_color));
                    });
                });
        });
        ui.add_space(8.0);
    }
}
