//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `process`: 汇总各晶面计算结果并计算表面能
//! - `vacuum`: 提取真空能级
//! - `core`: 提取芯态本征能量
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: process, vacuum, core

pub mod core;
pub mod process;
pub mod vacuum;

use clap::{Parser, Subcommand};

/// Surfdata - VASP 表面计算数据后处理工具箱
#[derive(Parser)]
#[command(name = "surfdata")]
#[command(version)]
#[command(about = "A VASP slab calculation post-processing toolkit", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Collect per-facet slab results into a surface energy table
    Process(process::ProcessArgs),

    /// Extract the vacuum level from potential.csv or LOCPOT
    Vacuum(vacuum::VacuumArgs),

    /// Extract a core state eigenenergy from a structure and OUTCAR
    Core(core::CoreArgs),
}
