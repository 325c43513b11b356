//! 导航侧栏
//!
//! 只保存当前分区与抽屉开关，不涉及路由和 URL。

pub mod sidebar;

pub use sidebar::{NavItem, Section, Sidebar};
