//! 逢考必过 - 基于个人知识库的考试复习助手
//!
//! 上传复习资料与考试题目，向大模型提问或生成练习题。

pub mod core;
pub mod storage;
pub mod ui;

use anyhow::Result;
use eframe::egui::{self, FontData, FontDefinitions, FontFamily};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 配置中文字体
fn setup_custom_fonts(ctx: &egui::Context) {
    let mut fonts = FontDefinitions::default();

    // 按平台依次尝试系统中文字体
    let font_paths = [
        "C:/Windows/Fonts/msyh.ttc",                             // 微软雅黑
        "C:/Windows/Fonts/simhei.ttf",                           // 黑体
        "/System/Library/Fonts/PingFang.ttc",                    // 苹方
        "/System/Library/Fonts/STHeiti Light.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",        // 文泉驿
    ];

    let mut font_loaded = false;
    for path in &font_paths {
        if let Ok(font_data) = std::fs::read(path) {
            fonts.font_data.insert(
                "chinese_font".to_owned(),
                FontData::from_owned(font_data).into(),
            );

            // 将中文字体设为首选
            fonts.families
                .entry(FontFamily::Proportional)
                .or_default()
                .insert(0, "chinese_font".to_owned());

            fonts.families
                .entry(FontFamily::Monospace)
                .or_default()
                .insert(0, "chinese_font".to_owned());

            font_loaded = true;
            tracing::info!("已加载中文字体: {}", path);
            break;
        }
    }

    if !font_loaded {
        tracing::warn!("未能加载中文字体，界面可能显示乱码");
    }

    ctx.set_fonts(fonts);
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("启动 逢考必过");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("逢考必过 - 考试复习助手"),
        ..Default::default()
    };

    eframe::run_native(
        "Fengkao",
        options,
        Box::new(
            |cc| -> std::result::Result<Box<dyn eframe::App>, Box<dyn std::error::Error + Send + Sync>> {
                setup_custom_fonts(&cc.egui_ctx);
                let app = ui::app::ExamPrepApp::new(cc)?;
                Ok(Box::new(app))
            },
        ),
    )
    .map_err(|e| anyhow::anyhow!("GUI启动失败: {}", e))?;

    Ok(())
}
