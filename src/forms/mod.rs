//! 实体表单控制器
//!
//! 每个表单持有一份记录的工作副本（[`FormState`]），负责：
//! - 以已有记录或零值填充
//! - 获取下拉框所需的参考列表
//! - 把各种输入事件规整为类型化的字段更新
//! - 提交时把状态整理为接口需要的载荷（JSON 或 multipart）

pub mod attendance;
pub mod exam;
pub mod instructor;
pub mod loader;
pub mod options;
pub mod payload;
pub mod recitation;
pub mod state;
pub mod submit;
pub mod validation;
pub mod view;

use std::sync::Arc;

pub use attendance::{AttendanceForm, ManualOutcome, ScanOutcome, ScanState};
pub use exam::ExamForm;
pub use instructor::InstructorForm;
pub use payload::{ChosenFile, MultipartPayload, SubmissionPayload};
pub use recitation::{RecitationContext, RecitationForm};
pub use state::{FieldKind, FieldValue, FormMode, FormRecord, FormState, InputEvent};
pub use validation::ValidationErrors;
pub use view::{ActionView, FieldView, FormView, Widget};

use crate::i18n::{Catalog, Translate};
use crate::notice::{LogNoticeSink, Notice, NoticeSink};

/// 表单的外部协作者：翻译与用户提示
#[derive(Clone)]
pub struct FormContext {
    translator: Arc<dyn Translate>,
    notices: Arc<dyn NoticeSink>,
}

impl FormContext {
    pub fn new(translator: Arc<dyn Translate>, notices: Arc<dyn NoticeSink>) -> Self {
        Self {
            translator,
            notices,
        }
    }

    /// 无语言包，文字显示为翻译键；提示写入日志
    pub fn untranslated() -> Self {
        Self::new(Arc::new(Catalog::default()), Arc::new(LogNoticeSink))
    }

    pub fn t(&self, key: &str) -> String {
        self.translator.t(key)
    }

    /// 发出本地化提示
    pub fn notify(&self, key: &'static str) {
        self.notices
            .notify(Notice::localized(key, self.translator.as_ref()));
    }

    pub(crate) fn cancel_label(&self) -> String {
        self.t("common.cancel")
    }
}

impl std::fmt::Debug for FormContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormContext").finish_non_exhaustive()
    }
}
