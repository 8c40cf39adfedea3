//! # vacuum 子命令 CLI 定义
//!
//! 从 potential.csv 或 LOCPOT 提取真空能级。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/vacuum.rs`

use clap::Args;
use std::path::PathBuf;

/// vacuum 子命令参数
#[derive(Args, Debug)]
pub struct VacuumArgs {
    /// Path to potential.csv, LOCPOT, or a directory containing either
    /// (defaults to cwd)
    pub path: Option<PathBuf>,
}
