//! # Surfdata - VASP 表面计算数据后处理工具箱
//!
//! 将表面 (slab) 计算的产出目录汇总成平面数据表：表面能、真空能级、
//! 芯能级结合能，按 Miller 指数逐面收集。
//!
//! ## 子命令
//! - `process` - 汇总各晶面文件夹的计算结果并计算表面能
//! - `vacuum`  - 从 potential.csv 或 LOCPOT 提取真空能级
//! - `core`    - 从结构与 OUTCAR 提取芯态本征能量
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── surface/   (表面数据汇总)
//!   │     ├── parsers/   (VASP 输出解析器)
//!   │     ├── analysis/  (配位与氧化态分析)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod analysis;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod surface;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
