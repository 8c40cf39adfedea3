//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `surface/`, `utils/`
//! - 子模块: process, vacuum, core

pub mod core;
pub mod process;
pub mod vacuum;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Process(args) => process::execute(args),
        Commands::Vacuum(args) => vacuum::execute(args),
        Commands::Core(args) => core::execute(args),
    }
}
