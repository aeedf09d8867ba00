//! 界面模块

pub mod app;
pub mod chat_panel;
pub mod dialogs;
pub mod knowledge_panel;
pub mod styles;
pub mod tasks;
pub mod upload_panel;
