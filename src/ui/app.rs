//! 主应用程序
//!
//! 整合会话、知识库与对话，提供完整的用户界面。

use crate::core::assistant::{ChatAssistant, ChatHistory};
use crate::core::client::ExamApiClient;
use crate::core::knowledge::KnowledgeBase;
use crate::core::models::{AppConfig, KnowledgeType};
use crate::core::upload::PendingUpload;
use crate::storage::config::{effective_api, ConfigManager};
use crate::ui::chat_panel::ChatPanel;
use crate::ui::dialogs::{SettingsDialog, SettingsResult};
use crate::ui::knowledge_panel::{KnowledgePanel, KnowledgePanelAction};
use crate::ui::styles::Theme;
use crate::ui::tasks::{TaskOutcome, TaskRunner};
use crate::ui::upload_panel::{UploadPanel, UploadPanelAction};
use anyhow::Result;
use eframe::egui::{self, RichText};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

/// 主界面标签页
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    /// 上传资料
    Upload,
    /// 开始复习
    Chat,
}

/// 主应用程序
pub struct ExamPrepApp {
    /// 配置（与配置文件一致，不含环境变量覆盖）
    config: AppConfig,
    /// 配置管理器
    config_manager: ConfigManager,
    /// 环境变量指定的后端地址
    base_url_override: Option<String>,
    /// 主题
    theme: Theme,
    /// 后台任务
    tasks: TaskRunner,
    /// 后端客户端
    client: Arc<ExamApiClient>,
    /// 任务代号；新建会话或更换客户端时递增，旧代号的结果被丢弃
    generation: u64,
    /// 最近一次健康检查是否成功
    backend_online: Option<bool>,
    /// 当前会话ID
    session_id: Option<String>,
    /// 会话请求进行中
    session_loading: bool,
    /// 知识库快照
    knowledge: KnowledgeBase,
    /// 知识库刷新中
    knowledge_loading: bool,
    /// 对话记录
    history: ChatHistory,
    /// 等待回复的用户消息
    pending_question: Option<String>,
    /// 正在上传的知识库
    uploading: Option<KnowledgeType>,
    /// 当前标签页
    active_tab: Tab,
    /// 是否显示知识库侧栏
    show_knowledge_panel: bool,
    chat_panel: ChatPanel,
    knowledge_panel: KnowledgePanel,
    upload_panel: UploadPanel,
    /// 设置对话框
    settings_dialog: SettingsDialog,
    /// 状态消息
    status_message: String,
}

impl ExamPrepApp {
    /// 创建新的应用实例
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self> {
        let config_manager = ConfigManager::new(ConfigManager::default_path());
        let config = config_manager.load().unwrap_or_else(|e| {
            tracing::warn!("读取配置失败，使用默认配置: {}", e);
            AppConfig::default()
        });

        let mut app = Self::with_parts(
            cc.egui_ctx.clone(),
            config_manager,
            config,
            ConfigManager::base_url_override(),
        )?;
        app.check_health();
        app.start_session(false);
        Ok(app)
    }

    fn with_parts(
        ctx: egui::Context,
        config_manager: ConfigManager,
        config: AppConfig,
        base_url_override: Option<String>,
    ) -> Result<Self> {
        let api = effective_api(&config, base_url_override.as_deref());
        tracing::info!("后端地址: {}", api.base_url);

        let client = Arc::new(ExamApiClient::new(api)?);
        let tasks = TaskRunner::new(ctx)?;

        let mut settings_dialog = SettingsDialog::default();
        settings_dialog.load_from_config(&config);
        settings_dialog.base_url_override = base_url_override.clone();

        Ok(Self {
            show_knowledge_panel: config.show_knowledge_panel,
            config,
            config_manager,
            base_url_override,
            theme: Theme::default(),
            tasks,
            client,
            generation: 0,
            backend_online: None,
            session_id: None,
            session_loading: false,
            knowledge: KnowledgeBase::default(),
            knowledge_loading: false,
            history: ChatHistory::default(),
            pending_question: None,
            uploading: None,
            active_tab: Tab::Upload,
            chat_panel: ChatPanel::new(),
            knowledge_panel: KnowledgePanel::new(),
            upload_panel: UploadPanel::new(),
            settings_dialog,
            status_message: "正在连接后端...".to_string(),
        })
    }

    /// 以当前代号在后台执行任务
    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = TaskOutcome> + Send + 'static,
    {
        self.tasks.spawn(self.generation, task);
    }

    /// 进入新一代：进行中的请求结果作废，相应的等待状态一并复位
    fn begin_generation(&mut self) {
        self.generation += 1;
        self.session_loading = false;
        self.knowledge_loading = false;
        self.pending_question = None;
        self.uploading = None;
    }

    /// 检查后端是否可用
    fn check_health(&self) {
        let client = Arc::clone(&self.client);
        self.spawn(async move { TaskOutcome::HealthChecked(client.health().await) });
    }

    /// 获取会话；fresh 为 true 时总是新建
    fn start_session(&mut self, fresh: bool) {
        if self.session_loading {
            return;
        }
        if fresh {
            self.begin_generation();
        }
        self.session_loading = true;
        self.status_message = "正在创建会话...".to_string();

        let client = Arc::clone(&self.client);
        self.spawn(async move {
            let result = if fresh {
                client.create_session().await
            } else {
                client.session_id().await
            };
            TaskOutcome::SessionReady { fresh, result }
        });
    }

    /// 刷新知识库
    fn refresh_knowledge(&mut self) {
        if self.knowledge_loading {
            return;
        }
        self.knowledge_loading = true;

        let client = Arc::clone(&self.client);
        self.spawn(async move {
            TaskOutcome::KnowledgeLoaded(KnowledgeBase::fetch(&client).await)
        });
    }

    /// 发送对话消息
    fn send_message(&mut self, message: String) {
        if message.trim().is_empty() || self.pending_question.is_some() {
            return;
        }
        self.pending_question = Some(message.clone());

        let client = Arc::clone(&self.client);
        let knowledge = self.knowledge.clone();
        self.spawn(async move {
            let answer = ChatAssistant::new(&client).reply(&message, &knowledge).await;
            TaskOutcome::ChatReplied {
                question: message,
                answer,
            }
        });
    }

    /// 校验并上传选中的文件
    fn upload_files(&mut self, knowledge_type: KnowledgeType, paths: Vec<PathBuf>) {
        let mut pending = Vec::with_capacity(paths.len());
        let mut rejected = Vec::new();
        for path in &paths {
            match PendingUpload::from_path(path) {
                Ok(file) => {
                    tracing::debug!("待上传 {}: {} 字节, {}", file.path.display(), file.size(), file.mime_type);
                    pending.push(file);
                }
                Err(e) => {
                    tracing::warn!("跳过文件 {}: {}", path.display(), e);
                    rejected.push(e.to_string());
                }
            }
        }

        if !rejected.is_empty() {
            self.status_message = rejected.join("；");
        }
        if pending.is_empty() {
            return;
        }

        self.uploading = Some(knowledge_type);
        let client = Arc::clone(&self.client);
        self.spawn(async move {
            let result = client.upload(&pending, knowledge_type).await;
            TaskOutcome::Uploaded {
                knowledge_type,
                result,
            }
        });
    }

    /// 删除已上传文件
    fn delete_file(&mut self, knowledge_type: KnowledgeType, file_id: String) {
        let client = Arc::clone(&self.client);
        self.spawn(async move {
            let result = client.delete_file(&file_id, knowledge_type).await;
            TaskOutcome::Deleted {
                knowledge_type,
                file_id,
                result,
            }
        });
    }

    /// 处理上传面板的操作
    fn handle_upload_action(&mut self, action: UploadPanelAction) {
        match action {
            UploadPanelAction::Upload(kt, paths) => self.upload_files(kt, paths),
            UploadPanelAction::Delete(kt, id) => self.delete_file(kt, id),
            UploadPanelAction::Refresh => self.refresh_knowledge(),
            UploadPanelAction::None => {}
        }
    }

    /// 应用后台任务结果，丢弃旧代号的结果
    fn apply_outcome(&mut self, generation: u64, outcome: TaskOutcome) {
        if generation != self.generation {
            tracing::debug!("丢弃过期的任务结果: {:?}", outcome);
            return;
        }
        self.handle_outcome(outcome);
    }

    /// 处理后台任务结果
    fn handle_outcome(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::HealthChecked(result) => match result {
                Ok(health) => {
                    self.backend_online = Some(true);
                    tracing::info!(
                        "后端状态: {}, API密钥已配置: {}",
                        health.status,
                        health.api_key_configured
                    );
                    if !health.api_key_configured && self.client.config().api_key().is_none() {
                        self.status_message = "后端未配置大模型API密钥，请在设置中填写".to_string();
                    }
                }
                Err(e) => {
                    self.backend_online = Some(false);
                    tracing::warn!("后端健康检查失败: {}", e);
                }
            },
            TaskOutcome::SessionReady { fresh, result } => {
                self.session_loading = false;
                match result {
                    Ok(id) => {
                        if fresh {
                            self.knowledge.clear();
                            self.history.clear();
                            self.knowledge_panel = KnowledgePanel::new();
                            // 新会话总要拉取自己的知识库
                            self.knowledge_loading = false;
                        }
                        self.status_message = if fresh {
                            "已创建新会话".to_string()
                        } else {
                            "会话已就绪".to_string()
                        };
                        self.session_id = Some(id);
                        self.refresh_knowledge();
                    }
                    Err(e) => {
                        tracing::error!("会话初始化失败: {}", e);
                        self.status_message = format!("会话初始化失败: {}", e);
                    }
                }
            }
            TaskOutcome::KnowledgeLoaded(result) => {
                self.knowledge_loading = false;
                match result {
                    Ok(knowledge) => self.knowledge = knowledge,
                    Err(e) => {
                        tracing::error!("刷新知识库失败: {}", e);
                        self.status_message = format!("刷新知识库失败: {}", e);
                    }
                }
            }
            TaskOutcome::ChatReplied { question, answer } => {
                self.pending_question = None;
                self.history.push_exchange(&question, &answer);
            }
            TaskOutcome::Uploaded {
                knowledge_type,
                result,
            } => {
                self.uploading = None;
                match result {
                    Ok(upload) if upload.success => {
                        self.status_message = format!(
                            "已上传 {} 个文件到{}",
                            upload.files.len(),
                            knowledge_type
                        );
                        self.refresh_knowledge();
                    }
                    Ok(upload) => {
                        self.status_message = format!("上传失败: {}", upload.message);
                    }
                    Err(e) => {
                        tracing::error!("上传失败: {}", e);
                        self.status_message = format!("上传失败: {}", e);
                    }
                }
            }
            TaskOutcome::Deleted {
                knowledge_type,
                file_id,
                result,
            } => match result {
                Ok(deleted) if deleted.success => {
                    self.knowledge.remove(knowledge_type, &file_id);
                    self.status_message = "文件已删除".to_string();
                }
                Ok(deleted) => {
                    self.status_message = format!("删除失败: {}", deleted.message);
                }
                Err(e) => {
                    tracing::error!("删除文件失败: {}", e);
                    self.status_message = format!("删除失败: {}", e);
                }
            },
        }
    }

    /// 保存设置并重建客户端
    fn apply_settings(&mut self) {
        self.config.api = self.settings_dialog.to_api_config();
        self.config.show_knowledge_panel = self.settings_dialog.show_knowledge_panel;
        self.show_knowledge_panel = self.config.show_knowledge_panel;

        if let Err(e) = self.config_manager.save(&self.config) {
            tracing::error!("保存配置失败: {}", e);
            self.status_message = format!("保存配置失败: {}", e);
            return;
        }

        let api = effective_api(&self.config, self.base_url_override.as_deref());
        match ExamApiClient::new(api) {
            Ok(client) => {
                self.client = Arc::new(client);
                self.begin_generation();
                self.session_id = None;
                self.backend_online = None;
                self.knowledge.clear();
                self.status_message = "设置已保存".to_string();
                self.check_health();
                self.start_session(false);
            }
            Err(e) => {
                tracing::error!("创建客户端失败: {}", e);
                self.status_message = format!("创建客户端失败: {}", e);
            }
        }
    }

    /// 标题栏
    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(RichText::new("逢考必过").color(self.theme.primary).strong());

            match &self.session_id {
                Some(id) => {
                    ui.label(RichText::new(short_session_id(id)).color(self.theme.muted));
                }
                None if self.session_loading => {
                    ui.spinner();
                }
                None => {
                    ui.label(RichText::new("未连接").color(self.theme.error));
                }
            }

            if ui
                .add_enabled(!self.session_loading, egui::Button::new("➕ 新会话"))
                .clicked()
            {
                self.start_session(true);
            }

            ui.separator();
            ui.selectable_value(&mut self.active_tab, Tab::Upload, "📤 上传资料");
            ui.selectable_value(&mut self.active_tab, Tab::Chat, "💬 开始复习");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("⚙️").on_hover_text("设置").clicked() {
                    self.settings_dialog.load_from_config(&self.config);
                    self.settings_dialog.visible = true;
                }
            });
        });
    }
}

/// 会话ID只显示前8位
fn short_session_id(id: &str) -> String {
    format!("会话: {}...", id.chars().take(8).collect::<String>())
}

impl eframe::App for ExamPrepApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for (generation, outcome) in self.tasks.drain() {
            self.apply_outcome(generation, outcome);
        }

        // 顶部菜单栏
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("文件", |ui| {
                    if ui.button("⚙️ 设置").clicked() {
                        self.settings_dialog.load_from_config(&self.config);
                        self.settings_dialog.visible = true;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("❌ 退出").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("视图", |ui| {
                    if ui
                        .checkbox(&mut self.show_knowledge_panel, "知识库侧栏")
                        .clicked()
                    {
                        ui.close_menu();
                    }
                });
            });
        });

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_header(ui);
            ui.add_space(4.0);
        });

        // 底部状态栏
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status_message);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match self.backend_online {
                        Some(true) => {
                            ui.label(RichText::new("● 后端已连接").color(self.theme.success));
                        }
                        Some(false) => {
                            ui.label(RichText::new("● 后端未连接").color(self.theme.error));
                        }
                        None => {}
                    }
                    ui.separator();
                    ui.label(format!(
                        "{} {} 个 | {} {} 个",
                        KnowledgeType::Knowledge,
                        self.knowledge.knowledge.len(),
                        KnowledgeType::Questions,
                        self.knowledge.questions.len()
                    ));
                });
            });
        });

        match self.active_tab {
            Tab::Upload => {
                let action = egui::CentralPanel::default()
                    .show(ctx, |ui| {
                        self.upload_panel.render(
                            ui,
                            &self.knowledge,
                            self.uploading,
                            self.knowledge_loading,
                            &self.theme,
                        )
                    })
                    .inner;

                self.handle_upload_action(action);
            }
            Tab::Chat => {
                if self.show_knowledge_panel {
                    let action = egui::SidePanel::left("knowledge_panel")
                        .resizable(true)
                        .default_width(300.0)
                        .show(ctx, |ui| {
                            self.knowledge_panel.render(
                                ui,
                                &self.knowledge,
                                self.knowledge_loading,
                                &self.theme,
                            )
                        })
                        .inner;

                    if action == KnowledgePanelAction::Refresh {
                        self.refresh_knowledge();
                    }
                }

                let submitted = egui::CentralPanel::default()
                    .show(ctx, |ui| {
                        self.chat_panel.render(
                            ui,
                            &self.history,
                            self.pending_question.as_deref(),
                            &self.theme,
                        )
                    })
                    .inner;

                if let Some(message) = submitted {
                    self.send_message(message);
                }
            }
        }

        // 设置对话框
        match self.settings_dialog.render(ctx) {
            SettingsResult::Save => self.apply_settings(),
            SettingsResult::Cancel | SettingsResult::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::{DeleteResult, UploadResult};
    use crate::core::error::ApiError;
    use crate::core::models::KnowledgeFile;
    use tempfile::tempdir;

    // 后端地址指向不可达端口，后台任务很快失败；测试直接注入结果，不读取通道
    fn test_app(dir: &std::path::Path, base_url_override: Option<&str>) -> ExamPrepApp {
        let mut config = AppConfig::default();
        config.api.base_url = "http://127.0.0.1:1".to_string();
        config.api.timeout_secs = 1;
        ExamPrepApp::with_parts(
            egui::Context::default(),
            ConfigManager::new(dir.join("config.json")),
            config,
            base_url_override.map(str::to_string),
        )
        .unwrap()
    }

    fn knowledge_with(id: &str) -> KnowledgeBase {
        KnowledgeBase {
            knowledge: vec![KnowledgeFile::new(id, format!("{}.pdf", id))],
            questions: Vec::new(),
        }
    }

    fn file_ids(kb: &KnowledgeBase) -> Vec<&str> {
        kb.knowledge.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn test_short_session_id() {
        assert_eq!(
            short_session_id("0f8e6a2c-1234-5678-9abc-def012345678"),
            "会话: 0f8e6a2c..."
        );
        assert_eq!(short_session_id("abc"), "会话: abc...");
    }

    #[test]
    fn test_new_session_ignores_refresh_from_previous_session() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), None);

        // 旧会话的刷新仍在进行
        app.refresh_knowledge();
        assert!(app.knowledge_loading);
        let old_generation = app.generation;

        app.start_session(true);
        let generation = app.generation;
        assert_ne!(generation, old_generation);

        app.apply_outcome(
            generation,
            TaskOutcome::SessionReady {
                fresh: true,
                result: Ok("new-session".to_string()),
            },
        );
        // 新会话自己的刷新已排队
        assert!(app.knowledge_loading);

        app.apply_outcome(
            old_generation,
            TaskOutcome::KnowledgeLoaded(Ok(knowledge_with("old_k1"))),
        );
        assert_eq!(app.session_id.as_deref(), Some("new-session"));
        assert!(app.knowledge.is_empty());
        assert!(app.knowledge_loading);

        app.apply_outcome(
            generation,
            TaskOutcome::KnowledgeLoaded(Ok(knowledge_with("new_k1"))),
        );
        assert_eq!(file_ids(&app.knowledge), vec!["new_k1"]);
        assert!(!app.knowledge_loading);
    }

    #[test]
    fn test_new_session_clears_knowledge_and_history() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), None);
        app.session_id = Some("sess-1".to_string());
        app.knowledge = knowledge_with("k1");
        app.history.push_exchange("问题", "回答");

        app.start_session(true);
        assert!(app.session_loading);
        app.apply_outcome(
            app.generation,
            TaskOutcome::SessionReady {
                fresh: true,
                result: Ok("sess-2".to_string()),
            },
        );

        assert!(!app.session_loading);
        assert_eq!(app.session_id.as_deref(), Some("sess-2"));
        assert!(app.knowledge.is_empty());
        assert!(app.history.is_empty());
        assert_eq!(app.status_message, "已创建新会话");
    }

    #[test]
    fn test_new_session_drops_pending_reply() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), None);
        app.send_message("旧会话的问题".to_string());
        assert!(app.pending_question.is_some());
        let old_generation = app.generation;

        app.start_session(true);
        assert!(app.pending_question.is_none());

        app.apply_outcome(
            old_generation,
            TaskOutcome::ChatReplied {
                question: "旧会话的问题".to_string(),
                answer: "旧回答".to_string(),
            },
        );
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_failed_session_resets_loading() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), None);

        app.start_session(false);
        assert!(app.session_loading);
        app.apply_outcome(
            app.generation,
            TaskOutcome::SessionReady {
                fresh: false,
                result: Err(ApiError::Session),
            },
        );

        assert!(!app.session_loading);
        assert!(app.session_id.is_none());
        assert!(!app.knowledge_loading);
        assert_eq!(app.status_message, "会话初始化失败: 无法创建会话");

        // 可以再次尝试
        app.start_session(false);
        assert!(app.session_loading);
    }

    #[test]
    fn test_successful_delete_removes_file_locally() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), None);
        app.knowledge = KnowledgeBase {
            knowledge: vec![KnowledgeFile::new("k1", "a.pdf"), KnowledgeFile::new("k2", "b.pdf")],
            questions: Vec::new(),
        };

        app.apply_outcome(
            app.generation,
            TaskOutcome::Deleted {
                knowledge_type: KnowledgeType::Knowledge,
                file_id: "k1".to_string(),
                result: Ok(DeleteResult {
                    success: true,
                    message: "文件 k1 删除成功".to_string(),
                }),
            },
        );
        assert_eq!(file_ids(&app.knowledge), vec!["k2"]);

        app.apply_outcome(
            app.generation,
            TaskOutcome::Deleted {
                knowledge_type: KnowledgeType::Knowledge,
                file_id: "k2".to_string(),
                result: Ok(DeleteResult {
                    success: false,
                    message: "文件不存在".to_string(),
                }),
            },
        );
        assert_eq!(file_ids(&app.knowledge), vec!["k2"]);
        assert_eq!(app.status_message, "删除失败: 文件不存在");
    }

    #[test]
    fn test_successful_upload_triggers_refresh() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), None);
        app.uploading = Some(KnowledgeType::Questions);

        app.apply_outcome(
            app.generation,
            TaskOutcome::Uploaded {
                knowledge_type: KnowledgeType::Questions,
                result: Ok(UploadResult {
                    success: true,
                    message: "成功上传 1 个文件".to_string(),
                    files: vec![KnowledgeFile::new("file_1", "真题.docx")],
                }),
            },
        );

        assert!(app.uploading.is_none());
        assert!(app.knowledge_loading);
        assert_eq!(app.status_message, "已上传 1 个文件到考试题目");
    }

    #[test]
    fn test_upload_tab_refresh_action() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), None);
        assert!(!app.knowledge_loading);

        app.handle_upload_action(UploadPanelAction::Refresh);
        assert!(app.knowledge_loading);
    }

    #[test]
    fn test_settings_apply_drops_results_from_old_client() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), None);
        app.start_session(false);
        app.refresh_knowledge();
        let old_generation = app.generation;

        app.settings_dialog.base_url = "http://127.0.0.1:2".to_string();
        app.apply_settings();
        assert_ne!(app.generation, old_generation);
        assert!(app.session_loading);
        assert!(!app.knowledge_loading);
        assert_eq!(app.client.config().base_url, "http://127.0.0.1:2");

        app.apply_outcome(
            old_generation,
            TaskOutcome::SessionReady {
                fresh: false,
                result: Ok("old-backend".to_string()),
            },
        );
        app.apply_outcome(
            old_generation,
            TaskOutcome::KnowledgeLoaded(Ok(knowledge_with("old_k1"))),
        );
        assert!(app.session_id.is_none());
        assert!(app.knowledge.is_empty());
        assert!(app.session_loading);

        app.apply_outcome(
            app.generation,
            TaskOutcome::SessionReady {
                fresh: false,
                result: Ok("new-backend".to_string()),
            },
        );
        assert_eq!(app.session_id.as_deref(), Some("new-backend"));
    }

    #[test]
    fn test_env_base_url_is_not_saved() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), Some("http://127.0.0.1:3"));
        assert_eq!(app.client.config().base_url, "http://127.0.0.1:3");
        assert_eq!(app.settings_dialog.base_url, "http://127.0.0.1:1");

        app.settings_dialog.model = "step-1-8k".to_string();
        app.apply_settings();

        let saved = ConfigManager::new(dir.path().join("config.json")).load().unwrap();
        assert_eq!(saved.api.base_url, "http://127.0.0.1:1");
        assert_eq!(saved.api.model, "step-1-8k");
        assert_eq!(app.client.config().base_url, "http://127.0.0.1:3");
    }

    #[test]
    fn test_health_result_sets_backend_status() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), None);
        assert!(app.backend_online.is_none());

        app.apply_outcome(
            app.generation,
            TaskOutcome::HealthChecked(Err(ApiError::Timeout)),
        );
        assert_eq!(app.backend_online, Some(false));
    }
}
