//! Core模块 - 后端通信与对话处理逻辑

pub mod models;
pub mod error;
pub mod intent;
pub mod latex;
pub mod upload;
pub mod client;
pub mod knowledge;
pub mod assistant;
