//! # core 命令实现
//!
//! 从结构文件与 OUTCAR 提取芯态本征能量并打印。
//!
//! ## 依赖关系
//! - 使用 `cli/core.rs` 定义的参数
//! - 使用 `surface/core_level.rs`, `parsers/poscar.rs`
//! - 使用 `utils/output.rs`

use crate::cli::core::CoreArgs;
use crate::error::{Result, SurfdataError};
use crate::parsers::poscar;
use crate::surface::core_level::{self, CoreEnergyOptions};
use crate::utils::output;

/// 执行 core 命令
pub fn execute(args: CoreArgs) -> Result<()> {
    output::print_header("Extracting Core Level Energy");

    if args.bulk_nn.is_empty() {
        return Err(SurfdataError::InvalidArgument(
            "bulk nearest neighbours must not be empty".to_string(),
        ));
    }

    let mut crystal = poscar::parse_poscar_file(&args.structure)?;
    output::print_info(&format!(
        "Structure: {} ({} sites)",
        crystal.formula(),
        crystal.atoms.len()
    ));

    let opts = CoreEnergyOptions {
        orbital: args.orbital.clone(),
        ox_states: args.ox_states.clone().unwrap_or_default(),
        nn_method: args.nn_method.to_method(args.nn_tolerance),
    };

    let value = core_level::core_energy_from_structure(
        &mut crystal,
        &args.core_atom,
        &args.bulk_nn,
        &opts,
        &args.outcar,
    )?;

    if value.is_nan() {
        output::print_warning("Core level energy could not be determined.");
    } else {
        output::print_success(&format!(
            "{} {} core state energy: {} eV",
            args.core_atom, args.orbital, value
        ));
    }

    Ok(())
}
