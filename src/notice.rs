//! 用户提示
//!
//! 输入类错误（二维码格式错误、学生不存在、密码不一致）只向用户提示，不改动表单状态。

use std::sync::Mutex;

use tracing::warn;

use crate::i18n::Translate;

/// 一条已本地化的提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub key: &'static str,
    pub message: String,
}

impl Notice {
    pub fn localized(key: &'static str, translator: &dyn Translate) -> Self {
        Self {
            key,
            message: translator.t(key),
        }
    }
}

/// 提示输出通道
pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// 写入日志的提示通道
#[derive(Debug, Default)]
pub struct LogNoticeSink;

impl NoticeSink for LogNoticeSink {
    fn notify(&self, notice: Notice) {
        warn!(key = notice.key, "{}", notice.message);
    }
}

/// 记录所有提示，供调用方轮询显示
#[derive(Debug, Default)]
pub struct RecordingNoticeSink {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNoticeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn keys(&self) -> Vec<&'static str> {
        match self.notices.lock() {
            Ok(guard) => guard.iter().map(|n| n.key).collect(),
            Err(poisoned) => poisoned.into_inner().iter().map(|n| n.key).collect(),
        }
    }
}

impl NoticeSink for RecordingNoticeSink {
    fn notify(&self, notice: Notice) {
        match self.notices.lock() {
            Ok(mut guard) => guard.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }
}
