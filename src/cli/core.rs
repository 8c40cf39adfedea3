//! # core 子命令 CLI 定义
//!
//! 从结构文件与 OUTCAR 提取芯态本征能量。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 复用 `cli/process.rs` 的取值解析
//! - 参数传递给 `commands/core.rs`

use super::process::{parse_ox_states, NnMethodArg};
use crate::analysis::OxStates;
use clap::Args;
use std::path::PathBuf;

/// core 子命令参数
#[derive(Args, Debug)]
pub struct CoreArgs {
    /// Symbol of the atom the core state energy is parsed from
    pub core_atom: String,

    /// Bulk nearest neighbours of the core atom, e.g. Ti,Ti,O,O
    #[arg(value_delimiter = ',')]
    pub bulk_nn: Vec<String>,

    /// Path to the OUTCAR file (falls back to OUTCAR.gz)
    #[arg(long, default_value = "OUTCAR")]
    pub outcar: PathBuf,

    /// Path to the structure file
    #[arg(long, default_value = "POSCAR")]
    pub structure: PathBuf,

    /// Core state orbital
    #[arg(long, default_value = "1s")]
    pub orbital: String,

    /// Oxidation states: 'el:n,el:n' by element, 'n,n,...' by site, guessed if unset
    #[arg(long, value_parser = parse_ox_states)]
    pub ox_states: Option<OxStates>,

    /// Nearest neighbour detection algorithm
    #[arg(long, value_enum, default_value = "covalent-cutoff")]
    pub nn_method: NnMethodArg,

    /// Distance tolerance of the nearest neighbour algorithm
    #[arg(long, default_value_t = 0.2)]
    pub nn_tolerance: f64,
}
