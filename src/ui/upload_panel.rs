//! 上传资料面板

use crate::core::knowledge::KnowledgeBase;
use crate::core::models::KnowledgeType;
use crate::core::upload::{accepted_extensions, MAX_FILE_SIZE};
use crate::ui::styles::{panel_stroke, Theme};
use eframe::egui::{self, RichText, Ui};
use std::path::PathBuf;

/// 上传面板操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPanelAction {
    None,
    /// 用户选择了待上传的文件
    Upload(KnowledgeType, Vec<PathBuf>),
    /// 删除已上传文件
    Delete(KnowledgeType, String),
    /// 重新拉取已上传文件列表
    Refresh,
}

/// 上传资料面板
#[derive(Default)]
pub struct UploadPanel;

impl UploadPanel {
    pub fn new() -> Self {
        Self
    }

    /// 渲染两个上传区域
    pub fn render(
        &mut self,
        ui: &mut Ui,
        knowledge_base: &KnowledgeBase,
        uploading: Option<KnowledgeType>,
        refreshing: bool,
        theme: &Theme,
    ) -> UploadPanelAction {
        let mut action = UploadPanelAction::None;

        ui.heading("上传学习资料");
        ui.label(
            RichText::new(format!(
                "支持 {} 格式，单个文件不超过 {} MB",
                accepted_extensions().join(" / "),
                MAX_FILE_SIZE / 1024 / 1024
            ))
            .color(theme.muted),
        );
        ui.add_space(8.0);

        ui.columns(2, |columns| {
            let sections = [
                (KnowledgeType::Knowledge, "📖 上传复习资料", "课本、笔记、讲义等"),
                (KnowledgeType::Questions, "📝 上传考试题目", "往年试卷、习题集等"),
            ];
            for (column, (kt, title, hint)) in columns.iter_mut().zip(sections) {
                let section_action =
                    Self::render_section(column, (kt, title, hint), knowledge_base, uploading, refreshing, theme);
                if section_action != UploadPanelAction::None {
                    action = section_action;
                }
            }
        });

        action
    }

    fn render_section(
        ui: &mut Ui,
        (knowledge_type, title, hint): (KnowledgeType, &str, &str),
        knowledge_base: &KnowledgeBase,
        uploading: Option<KnowledgeType>,
        refreshing: bool,
        theme: &Theme,
    ) -> UploadPanelAction {
        let mut action = UploadPanelAction::None;

        egui::Frame::none()
            .stroke(panel_stroke())
            .rounding(6.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(title).strong().size(16.0));
                ui.label(RichText::new(hint).small().color(theme.muted));
                ui.add_space(6.0);

                let busy = uploading.is_some();
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(!busy, egui::Button::new("📂 选择文件..."))
                        .clicked()
                    {
                        if let Some(paths) = rfd::FileDialog::new()
                            .add_filter("学习资料", &accepted_extensions())
                            .pick_files()
                        {
                            if !paths.is_empty() {
                                action = UploadPanelAction::Upload(knowledge_type, paths);
                            }
                        }
                    }
                    if ui
                        .add_enabled(!refreshing, egui::Button::new("🔄"))
                        .on_hover_text("刷新文件列表")
                        .clicked()
                    {
                        action = UploadPanelAction::Refresh;
                    }
                    if uploading == Some(knowledge_type) {
                        ui.spinner();
                        ui.label("上传中...");
                    } else if refreshing {
                        ui.spinner();
                    }
                });

                ui.separator();

                let files = knowledge_base.files(knowledge_type);
                if files.is_empty() {
                    ui.label(RichText::new(knowledge_type.empty_hint()).color(theme.muted));
                    return;
                }

                ui.label(format!("已上传 {} 个文件", files.len()));
                egui::ScrollArea::vertical()
                    .id_salt(("uploaded_files", knowledge_type.as_str()))
                    .max_height(320.0)
                    .show(ui, |ui| {
                        for file in files {
                            ui.horizontal(|ui| {
                                ui.label("📄");
                                ui.label(&file.name);
                                ui.label(
                                    RichText::new(file.size_kb_label())
                                        .small()
                                        .color(theme.muted),
                                );
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        if ui
                                            .add_enabled(!busy, egui::Button::new("🗑"))
                                            .on_hover_text("删除文件")
                                            .clicked()
                                        {
                                            action = UploadPanelAction::Delete(
                                                knowledge_type,
                                                file.id.clone(),
                                            );
                                        }
                                    },
                                );
                            });
                        }
                    });
            });

        action
    }
}
