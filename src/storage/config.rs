//! 配置文件管理模块

use crate::core::models::{ApiConfig, AppConfig};
use anyhow::Result;
use std::path::PathBuf;

/// 覆盖后端地址的环境变量
pub const BASE_URL_ENV: &str = "FENGKAO_API_BASE_URL";

/// 配置管理器
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// 创建配置管理器
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// 获取默认配置路径
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "fengkao", "Fengkao")
            .map(|d| d.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    }

    /// 加载配置
    pub fn load(&self) -> Result<AppConfig> {
        if self.config_path.exists() {
            let content = std::fs::read_to_string(&self.config_path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(AppConfig::default())
        }
    }

    /// 环境变量中的后端地址
    pub fn base_url_override() -> Option<String> {
        normalize_override(std::env::var(BASE_URL_ENV).ok())
    }

    /// 保存配置
    pub fn save(&self, config: &AppConfig) -> Result<()> {
        // 确保目录存在
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }
}

fn normalize_override(value: Option<String>) -> Option<String> {
    value
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
}

/// 实际使用的API配置
///
/// 环境变量中的后端地址优先于配置文件，但只作用于本次运行，不写回配置文件。
pub fn effective_api(config: &AppConfig, base_url_override: Option<&str>) -> ApiConfig {
    let mut api = config.api.clone();
    if let Some(url) = base_url_override {
        api.base_url = url.to_string();
    }
    api
}
