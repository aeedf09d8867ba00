//! 后台任务
//!
//! 网络请求在 Tokio 运行时上执行，结果通过通道送回界面线程，
//! 每帧开始时统一取出处理。每个任务带有发起时的代号，
//! 会话或客户端更换后，旧代号的结果由界面丢弃。

use crate::core::client::{DeleteResult, HealthStatus, UploadResult};
use crate::core::error::ApiError;
use crate::core::knowledge::KnowledgeBase;
use crate::core::models::KnowledgeType;
use anyhow::Result;
use eframe::egui;
use std::future::Future;
use std::sync::mpsc::{self, Receiver, Sender};

/// 后台任务结果
#[derive(Debug)]
pub enum TaskOutcome {
    /// 会话就绪；fresh 表示用户主动新建的会话
    SessionReady {
        fresh: bool,
        result: Result<String, ApiError>,
    },
    /// 后端健康检查
    HealthChecked(Result<HealthStatus, ApiError>),
    /// 知识库刷新完成
    KnowledgeLoaded(Result<KnowledgeBase, ApiError>),
    /// 对话回复（已处理错误）
    ChatReplied { question: String, answer: String },
    /// 上传完成
    Uploaded {
        knowledge_type: KnowledgeType,
        result: Result<UploadResult, ApiError>,
    },
    /// 删除完成
    Deleted {
        knowledge_type: KnowledgeType,
        file_id: String,
        result: Result<DeleteResult, ApiError>,
    },
}

/// 任务执行器
pub struct TaskRunner {
    runtime: tokio::runtime::Runtime,
    sender: Sender<(u64, TaskOutcome)>,
    receiver: Receiver<(u64, TaskOutcome)>,
    ctx: egui::Context,
}

impl TaskRunner {
    pub fn new(ctx: egui::Context) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("fengkao-worker")
            .enable_all()
            .build()?;
        let (sender, receiver) = mpsc::channel();

        Ok(Self {
            runtime,
            sender,
            receiver,
            ctx,
        })
    }

    /// 在后台执行任务，完成后唤醒界面重绘
    pub fn spawn<F>(&self, generation: u64, task: F)
    where
        F: Future<Output = TaskOutcome> + Send + 'static,
    {
        let sender = self.sender.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let outcome = task.await;
            if sender.send((generation, outcome)).is_err() {
                tracing::warn!("界面已关闭，丢弃任务结果");
            }
            ctx.request_repaint();
        });
    }

    /// 取出所有已完成的任务结果及其代号
    pub fn drain(&self) -> Vec<(u64, TaskOutcome)> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_outcome_keeps_generation() {
        let runner = TaskRunner::new(egui::Context::default()).unwrap();
        runner.spawn(7, async {
            TaskOutcome::ChatReplied {
                question: "q".to_string(),
                answer: "a".to_string(),
            }
        });

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut done = Vec::new();
        while done.is_empty() && Instant::now() < deadline {
            done = runner.drain();
            std::thread::sleep(Duration::from_millis(10));
        }

        assert_eq!(done.len(), 1);
        assert_eq!(done[0].0, 7);
        assert!(matches!(done[0].1, TaskOutcome::ChatReplied { .. }));
    }
}
