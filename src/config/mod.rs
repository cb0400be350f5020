//! 配置管理
//!
//! 静态配置从 `config.toml` / `config.{APP_ENV}.toml` / 环境变量加载，进程内只初始化一次。

mod loader;
mod structs;

pub use structs::*;
