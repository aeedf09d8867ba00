//! 对话框组件

use crate::core::models::{ApiConfig, AppConfig};
use eframe::egui;

/// 设置对话框
pub struct SettingsDialog {
    /// 是否显示
    pub visible: bool,
    /// 后端基地址（配置文件中的值）
    pub base_url: String,
    /// 环境变量指定的后端地址，存在时优先生效
    pub base_url_override: Option<String>,
    /// 大模型API密钥
    pub api_key: String,
    /// 模型名称
    pub model: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
    /// 是否显示知识库侧栏
    pub show_knowledge_panel: bool,
}

impl Default for SettingsDialog {
    fn default() -> Self {
        let mut dialog = Self {
            visible: false,
            base_url: String::new(),
            base_url_override: None,
            api_key: String::new(),
            model: String::new(),
            timeout_secs: 0,
            show_knowledge_panel: true,
        };
        dialog.load_from_config(&AppConfig::default());
        dialog
    }
}

impl SettingsDialog {
    pub fn load_from_config(&mut self, config: &AppConfig) {
        self.base_url = config.api.base_url.clone();
        self.api_key = config.api.api_key.clone();
        self.model = config.api.model.clone();
        self.timeout_secs = config.api.timeout_secs;
        self.show_knowledge_panel = config.show_knowledge_panel;
    }

    /// 根据表单内容生成API配置
    pub fn to_api_config(&self) -> ApiConfig {
        let base_url = self.base_url.trim().trim_end_matches('/');
        let model = self.model.trim();

        ApiConfig {
            base_url: if base_url.is_empty() {
                ApiConfig::default().base_url
            } else {
                base_url.to_string()
            },
            api_key: self.api_key.trim().to_string(),
            model: if model.is_empty() {
                "default".to_string()
            } else {
                model.to_string()
            },
            timeout_secs: self.timeout_secs.max(1),
        }
    }

    /// 渲染对话框
    pub fn render(&mut self, ctx: &egui::Context) -> SettingsResult {
        let mut result = SettingsResult::None;

        if !self.visible {
            return result;
        }

        egui::Window::new("⚙️ 设置")
            .collapsible(false)
            .resizable(true)
            .default_width(460.0)
            .show(ctx, |ui| {
                ui.heading("后端服务");

                ui.horizontal(|ui| {
                    ui.label("API 地址:");
                    ui.text_edit_singleline(&mut self.base_url);
                });
                if let Some(url) = &self.base_url_override {
                    ui.label(
                        egui::RichText::new(format!(
                            "本次运行使用环境变量 {} 指定的地址: {}",
                            crate::storage::config::BASE_URL_ENV,
                            url
                        ))
                        .small()
                        .weak(),
                    );
                }

                ui.horizontal(|ui| {
                    ui.label("请求超时(秒):");
                    ui.add(egui::DragValue::new(&mut self.timeout_secs).range(1..=600));
                });

                ui.separator();
                ui.heading("大模型");

                ui.horizontal(|ui| {
                    ui.label("模型名称:");
                    ui.text_edit_singleline(&mut self.model);
                });
                ui.label(
                    egui::RichText::new("填写 default 使用后端默认模型")
                        .small()
                        .weak(),
                );

                ui.horizontal(|ui| {
                    ui.label("API 密钥:");
                    ui.add(egui::TextEdit::singleline(&mut self.api_key).password(true));
                });

                ui.separator();
                ui.checkbox(&mut self.show_knowledge_panel, "显示知识库侧栏");

                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("💾 保存").clicked() {
                        result = SettingsResult::Save;
                        self.visible = false;
                    }
                    if ui.button("✗ 取消").clicked() {
                        result = SettingsResult::Cancel;
                        self.visible = false;
                    }
                });
            });

        result
    }
}

/// 设置对话框结果
#[derive(Debug)]
pub enum SettingsResult {
    None,
    Save,
    Cancel,
}
