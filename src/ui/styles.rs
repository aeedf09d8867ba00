//! 样式定义

use eframe::egui::{Color32, Rounding, Stroke};

/// 颜色主题
pub struct Theme {
    pub primary: Color32,
    pub muted: Color32,
    pub success: Color32,
    pub error: Color32,
    pub user_bubble: Color32,
    pub user_text: Color32,
    pub assistant_bubble: Color32,
    pub selected_bg: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color32::from_rgb(59, 130, 246),      // 蓝色
            muted: Color32::from_rgb(107, 114, 128),       // 灰色
            success: Color32::from_rgb(52, 168, 83),       // 绿色
            error: Color32::from_rgb(234, 67, 53),         // 红色
            user_bubble: Color32::from_rgb(59, 130, 246),
            user_text: Color32::WHITE,
            assistant_bubble: Color32::from_gray(40),
            selected_bg: Color32::from_rgba_unmultiplied(59, 130, 246, 30),
        }
    }
}

/// 消息气泡圆角
pub fn bubble_rounding() -> Rounding {
    Rounding::same(8.0)
}

/// 面板边框
pub fn panel_stroke() -> Stroke {
    Stroke::new(1.0, Color32::from_gray(90))
}
