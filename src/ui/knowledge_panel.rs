//! 知识库侧栏

use crate::core::knowledge::KnowledgeBase;
use crate::core::models::{KnowledgeFile, KnowledgeType};
use crate::ui::styles::{panel_stroke, Theme};
use eframe::egui::{self, RichText, Ui};
use std::collections::HashSet;

/// 侧栏操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgePanelAction {
    None,
    Refresh,
}

/// 知识库侧栏
pub struct KnowledgePanel {
    /// 当前标签页
    active: KnowledgeType,
    /// 搜索关键字
    search_term: String,
    /// 已展开的文件
    expanded: HashSet<String>,
}

impl Default for KnowledgePanel {
    fn default() -> Self {
        Self {
            active: KnowledgeType::Knowledge,
            search_term: String::new(),
            expanded: HashSet::new(),
        }
    }
}

impl KnowledgePanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 切换文件展开状态
    pub fn toggle(&mut self, file_id: &str) {
        if !self.expanded.remove(file_id) {
            self.expanded.insert(file_id.to_string());
        }
    }

    pub fn is_expanded(&self, file_id: &str) -> bool {
        self.expanded.contains(file_id)
    }

    /// 渲染侧栏
    pub fn render(
        &mut self,
        ui: &mut Ui,
        knowledge_base: &KnowledgeBase,
        is_loading: bool,
        theme: &Theme,
    ) -> KnowledgePanelAction {
        let mut action = KnowledgePanelAction::None;

        ui.horizontal(|ui| {
            ui.heading("📚 知识库");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(!is_loading, egui::Button::new("🔄"))
                    .on_hover_text("刷新知识库")
                    .clicked()
                {
                    action = KnowledgePanelAction::Refresh;
                }
            });
        });

        ui.horizontal(|ui| {
            for kt in [KnowledgeType::Knowledge, KnowledgeType::Questions] {
                let label = format!("{} ({})", kt, knowledge_base.files(kt).len());
                ui.selectable_value(&mut self.active, kt, label);
            }
        });

        ui.add(
            egui::TextEdit::singleline(&mut self.search_term)
                .hint_text("🔍 搜索文件...")
                .desired_width(f32::INFINITY),
        );
        ui.separator();

        if is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("加载中...");
            });
            return action;
        }

        let files = knowledge_base.filtered(self.active, &self.search_term);
        if files.is_empty() {
            let hint = if self.search_term.trim().is_empty() {
                self.active.empty_hint()
            } else {
                "没有匹配的文件"
            };
            ui.label(RichText::new(hint).color(theme.muted));
            return action;
        }

        let mut toggled = None;
        egui::ScrollArea::vertical()
            .id_salt("knowledge_files")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for file in files {
                    if self.render_file(ui, file, theme) {
                        toggled = Some(file.id.clone());
                    }
                }
            });

        if let Some(id) = toggled {
            self.toggle(&id);
        }

        action
    }

    /// 渲染单个文件，返回是否点击了展开/收起
    fn render_file(&self, ui: &mut Ui, file: &KnowledgeFile, theme: &Theme) -> bool {
        let expanded = self.is_expanded(&file.id);
        let mut clicked = false;

        egui::Frame::none()
            .stroke(panel_stroke())
            .rounding(4.0)
            .inner_margin(6.0)
            .fill(if expanded { theme.selected_bg } else { egui::Color32::TRANSPARENT })
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let arrow = if expanded { "▼" } else { "▶" };
                    if ui.small_button(arrow).clicked() {
                        clicked = true;
                    }
                    ui.label(RichText::new(&file.name).strong());
                });
                ui.label(RichText::new(file.size_kb_label()).small().color(theme.muted));

                if expanded {
                    let content = file.content.as_deref().unwrap_or_default();
                    egui::ScrollArea::vertical()
                        .id_salt(("knowledge_content", &file.id))
                        .max_height(240.0)
                        .show(ui, |ui| {
                            ui.label(RichText::new(content).small());
                        });
                }
            });
        ui.add_space(4.0);

        clicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_expand() {
        let mut panel = KnowledgePanel::new();
        assert!(!panel.is_expanded("file_1"));

        panel.toggle("file_1");
        assert!(panel.is_expanded("file_1"));
        assert!(!panel.is_expanded("file_2"));

        panel.toggle("file_1");
        assert!(!panel.is_expanded("file_1"));
    }
}
