//! 应用配置
//!
//! 配置按以下顺序叠加：`config.toml` → `config.{APP_ENV}.toml` → `MADRASA_*` 环境变量。

mod loader;
mod structs;

pub use structs::*;
