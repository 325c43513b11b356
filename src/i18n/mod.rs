//! 本地化
//!
//! 表单只持有翻译键，界面文字统一通过 [`Translate`] 查询当前语言。
//! 语言包的加载不在本库范围内，调用方传入已解析的 JSON 即可。

mod catalog;

pub use catalog::Catalog;

/// 翻译接口：点分键 → 当前语言文本
pub trait Translate: Send + Sync {
    fn t(&self, key: &str) -> String;
}
