//! # vacuum 命令实现
//!
//! 从指定路径（或当前目录）解析真空能级并打印。
//!
//! ## 依赖关系
//! - 使用 `cli/vacuum.rs` 定义的参数
//! - 使用 `surface/vacuum.rs`, `utils/output.rs`

use crate::cli::vacuum::VacuumArgs;
use crate::error::Result;
use crate::surface::vacuum;
use crate::utils::output;

/// 执行 vacuum 命令
pub fn execute(args: VacuumArgs) -> Result<()> {
    output::print_header("Extracting Vacuum Level");

    let value = vacuum::vacuum(args.path.as_deref())?;

    if value.is_nan() {
        output::print_warning("Vacuum level could not be determined.");
    } else {
        output::print_success(&format!("Maximum planar potential: {} eV", value));
    }

    Ok(())
}
