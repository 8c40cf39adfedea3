//! # 晶面数据汇总
//!
//! 发现各晶面目录，逐面解析 vasprun.xml 与 POSCAR，可选地提取
//! 真空能级与芯能级，收集完成后统一计算表面能列，写出 CSV 或
//! 返回结果表。
//!
//! 目录结构支持：
//! 1. 自动发现：基目录（当前目录或 `path_to_fols`）下名字恰为
//!    三位数字的子目录，如 100 -> (1,0,0)
//! 2. 显式映射：Miller 指数 -> 路径，可与自动发现合并；
//!    同键冲突时发现结果覆盖路径、保留原插入位置
//!
//! ## 依赖关系
//! - 被 `commands/process.rs` 使用
//! - 使用 `parsers/`, `models/facet.rs`, `surface/vacuum.rs`,
//!   `surface/core_level.rs`, `utils/`

use crate::error::{Result, SurfdataError};
use crate::models::{Facet, FacetMap, FacetRecord, FacetTable};
use crate::parsers::{poscar, vasprun};
use crate::surface::core_level::{self, CoreEnergyOptions};
use crate::surface::vacuum;
use crate::utils::{output, progress};
use std::fs;
use std::path::{Path, PathBuf};

/// 一次汇总运行的全部配置
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// 体相每原子能量 (eV)，表面能的参考值
    pub bulk_per_atom: f64,
    /// 是否自动发现三位数字晶面目录
    pub parse_hkl: bool,
    /// 基目录，缺省为当前目录
    pub path_to_fols: Option<PathBuf>,
    /// 显式晶面 -> 路径映射
    pub hkl_dict: FacetMap,
    /// 是否提取芯能级
    pub parse_core_energy: bool,
    /// 芯能级目标元素
    pub core_atom: Option<String>,
    /// 目标元素的体相近邻元素
    pub bulk_nn: Option<Vec<String>>,
    /// 是否提取真空能级
    pub parse_vacuum: bool,
    /// 是否写出 CSV（否则返回结果表）
    pub save_csv: bool,
    /// CSV 文件名，自动补 .csv 后缀
    pub csv_fname: String,
    /// 芯能级提取选项
    pub core_options: CoreEnergyOptions,
}

impl ProcessConfig {
    pub fn new(bulk_per_atom: f64) -> Self {
        ProcessConfig {
            bulk_per_atom,
            parse_hkl: true,
            path_to_fols: None,
            hkl_dict: FacetMap::new(),
            parse_core_energy: false,
            core_atom: None,
            bulk_nn: None,
            parse_vacuum: false,
            save_csv: true,
            csv_fname: "data.csv".to_string(),
            core_options: CoreEnergyOptions::default(),
        }
    }
}

/// 汇总各晶面数据。`save_csv` 时写出文件并返回 None，
/// 否则返回结果表。两种结果互斥，不会同时发生。
pub fn process_data(cfg: &ProcessConfig) -> Result<Option<FacetTable>> {
    let base: PathBuf = match &cfg.path_to_fols {
        Some(p) => p.clone(),
        None => std::env::current_dir().map_err(|e| SurfdataError::Other(e.to_string()))?,
    };

    let mut hkl_map = cfg.hkl_dict.clone();
    if cfg.parse_hkl {
        discover_facets(&base, &mut hkl_map)?;
    }

    if hkl_map.is_empty() {
        return Err(SurfdataError::Other(format!(
            "No facet directories were found in {}",
            base.display()
        )));
    }

    // 芯能级前提：目标元素与体相近邻都要提供，缺一则跳过而非报错
    let get_core = cfg.parse_core_energy && cfg.core_atom.is_some() && cfg.bulk_nn.is_some();
    if cfg.parse_core_energy && !get_core {
        output::print_warning(
            "Core atom or bulk nearest neighbours were not supplied. \
             Core energy will not be parsed.",
        );
    }

    let mut records: Vec<FacetRecord> = Vec::new();
    let mut electrostatic_list: Vec<f64> = Vec::new();
    let mut core_energy_list: Vec<f64> = Vec::new();

    let pb = progress::create_progress_bar(hkl_map.len() as u64, "Parsing facets");

    for (facet, path) in hkl_map.iter() {
        let summary = vasprun::parse_vasprun(&path.join("vasprun.xml"))?;
        let slab = poscar::parse_poscar_file(&path.join("POSCAR"))?;

        records.push(FacetRecord {
            hkl: facet.label(),
            hkl_tuple: *facet,
            area: slab.lattice.surface_area(),
            atoms: summary.nsites,
            functional: summary.run_type,
            encut: summary.encut,
            algo: summary.algo,
            ismear: summary.ismear,
            sigma: summary.sigma,
            kpoints: summary.nkpoints,
            bandgap: summary.bandgap,
            slab_energy: summary.final_energy,
            slab_per_atom: summary.final_energy_per_atom,
            surface_energy: f64::NAN,
            surface_energy_ev: f64::NAN,
            vacuum_potential: None,
            core_energy: None,
        });

        if cfg.parse_vacuum {
            let v = pb.suspend(|| vacuum::vacuum(Some(path.as_path())))?;
            electrostatic_list.push(v);
        }

        if get_core {
            let core_atom = cfg.core_atom.as_deref().unwrap_or_default();
            let bulk_nn = cfg.bulk_nn.as_deref().unwrap_or_default();
            let v = pb.suspend(|| {
                core_level::core_energy(
                    core_atom,
                    bulk_nn,
                    &cfg.core_options,
                    &path.join("OUTCAR"),
                    &path.join("POSCAR"),
                )
            })?;
            core_energy_list.push(v);
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    let has_vacuum = !electrostatic_list.is_empty();
    let has_core = !core_energy_list.is_empty();
    for (i, v) in electrostatic_list.into_iter().enumerate() {
        records[i].vacuum_potential = Some(v);
    }
    for (i, v) in core_energy_list.into_iter().enumerate() {
        records[i].core_energy = Some(v);
    }

    let mut table = FacetTable {
        records,
        has_vacuum,
        has_core,
    };

    // 派生列在全表收集完成后统一计算
    table.compute_surface_energies(cfg.bulk_per_atom);

    if cfg.save_csv {
        let mut fname = cfg.csv_fname.clone();
        if !fname.ends_with(".csv") {
            fname.push_str(".csv");
        }
        table.to_csv(Path::new(&fname))?;
        Ok(None)
    } else {
        Ok(Some(table))
    }
}

/// 扫描基目录的直接子目录，把三位数字命名的目录并入映射。
/// 已有键只更新路径，保留插入位置。
pub fn discover_facets(base: &Path, map: &mut FacetMap) -> Result<()> {
    if !base.exists() {
        return Err(SurfdataError::DirectoryNotFound {
            path: base.display().to_string(),
        });
    }

    let entries = fs::read_dir(base).map_err(|e| SurfdataError::FileReadError {
        path: base.display().to_string(),
        source: e,
    })?;

    for entry in entries.filter_map(|e| e.ok()) {
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(facet) = Facet::from_folder_name(&name) {
            map.insert(facet, base.join(&name));
        }
    }

    Ok(())
}
