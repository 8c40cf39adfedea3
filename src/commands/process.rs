//! # process 命令实现
//!
//! 汇总各晶面计算结果：构建配置、调用 `surface::data::process_data`，
//! 按输出开关写出 CSV 或在终端打印结果表，可选绘图。
//!
//! ## 依赖关系
//! - 使用 `cli/process.rs` 定义的参数
//! - 使用 `surface/data.rs`, `surface/plot.rs`
//! - 使用 `utils/output.rs`

use crate::cli::process::ProcessArgs;
use crate::error::Result;
use crate::models::FacetTable;
use crate::surface::core_level::CoreEnergyOptions;
use crate::surface::data::{self, ProcessConfig};
use crate::surface::plot;
use crate::utils::output;

use std::path::PathBuf;
use tabled::{Table, Tabled};

/// 终端结果表行（完整数据在 CSV 中）
#[derive(Debug, Clone, Tabled)]
struct ResultRow {
    #[tabled(rename = "hkl")]
    hkl: String,
    #[tabled(rename = "Area (Å²)")]
    area: String,
    #[tabled(rename = "Atoms")]
    atoms: usize,
    #[tabled(rename = "Functional")]
    functional: String,
    #[tabled(rename = "Band gap (eV)")]
    bandgap: String,
    #[tabled(rename = "γ (mJ/m²)")]
    surface_energy: String,
}

/// 执行 process 命令
pub fn execute(args: ProcessArgs) -> Result<()> {
    output::print_header("Processing Slab Data");

    let mut cfg = ProcessConfig::new(args.bulk_per_atom);
    cfg.parse_hkl = !args.no_discover;
    cfg.path_to_fols = args.path_to_fols.clone();
    for entry in &args.facets {
        cfg.hkl_dict.insert(entry.facet, PathBuf::from(&entry.path));
    }
    cfg.parse_vacuum = args.parse_vacuum;
    cfg.parse_core_energy = args.parse_core_energy;
    cfg.core_atom = args.core_atom.clone();
    cfg.bulk_nn = args.bulk_nn.clone();
    cfg.save_csv = !args.no_save;
    cfg.csv_fname = args.csv_fname.clone();
    cfg.core_options = CoreEnergyOptions {
        orbital: args.orbital.clone(),
        ox_states: args.ox_states.clone().unwrap_or_default(),
        nn_method: args.nn_method.to_method(args.nn_tolerance),
    };

    if let Some(dir) = &cfg.path_to_fols {
        output::print_info(&format!("Scanning '{}' for facet folders...", dir.display()));
    }

    match data::process_data(&cfg)? {
        Some(table) => {
            print_table(&table);

            if let Some(plot_fname) = &args.plot_fname {
                plot::plot_surface_energy(&table, plot_fname)?;
                output::print_success(&format!(
                    "Surface energy plot saved to '{}'",
                    plot_fname.display()
                ));
            }
        }
        None => {
            let mut fname = args.csv_fname.clone();
            if !fname.ends_with(".csv") {
                fname.push_str(".csv");
            }
            output::print_done(&format!("Data written to '{}'", fname));

            if args.plot_fname.is_some() {
                output::print_warning("--plot-fname requires --no-save; plot was skipped.");
            }
        }
    }

    Ok(())
}

fn print_table(table: &FacetTable) {
    let rows: Vec<ResultRow> = table
        .records
        .iter()
        .map(|r| ResultRow {
            hkl: r.hkl.clone(),
            area: format!("{:.3}", r.area),
            atoms: r.atoms,
            functional: r.functional.clone(),
            bandgap: format!("{:.4}", r.bandgap),
            surface_energy: format!("{:.4}", r.surface_energy),
        })
        .collect();

    println!("{}", Table::new(&rows));
}
