//! madrasa-forms - 学校管理系统的实体表单控制器
//!
//! 面向学校管理 REST 接口的无界面表单层：考勤、考试、讲师、背诵表单，以及导航侧栏。
//!
//! # 架构
//! - `client`: 数据访问层（reqwest / 内存后端）
//! - `config`: 配置管理
//! - `errors`: 统一错误处理
//! - `forms`: 表单状态、参考列表加载与提交载荷整理
//! - `i18n`: 翻译目录
//! - `models`: 记录与参考列表的数据模型
//! - `navigation`: 导航侧栏状态
//! - `notice`: 用户提示通道
//! - `runtime`: 运行时生命周期管理
//! - `utils`: 工具函数

pub mod client;
pub mod config;
pub mod errors;
pub mod forms;
pub mod i18n;
pub mod models;
pub mod navigation;
pub mod notice;
pub mod runtime;
pub mod utils;
