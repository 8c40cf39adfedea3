//! # process 子命令 CLI 定义
//!
//! 汇总各晶面文件夹的计算结果。显式晶面映射、氧化态与近邻算法的
//! 取值解析都在参数解析阶段完成，格式错误在任何文件 I/O 之前报出。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/process.rs`
//! - 取值解析函数同时被 `cli/core.rs` 复用

use crate::analysis::{NnMethod, OxStates};
use crate::models::Facet;
use clap::{Args, ValueEnum};
use std::collections::BTreeMap;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────
// 取值解析
// ─────────────────────────────────────────────────────────────

/// 显式晶面映射条目
#[derive(Debug, Clone)]
pub struct FacetEntry {
    pub facet: Facet,
    pub path: String,
}

/// 解析 "H,K,L=PATH" 形式的显式晶面映射。
/// Miller 指数必须恰为三个整数，路径必须非空。
pub fn parse_facet_spec(s: &str) -> Result<FacetEntry, String> {
    let (indices, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected H,K,L=PATH, got '{}'", s))?;

    let parts: Vec<&str> = indices.split(',').collect();
    if parts.len() != 3 {
        return Err(format!(
            "Miller index must have exactly 3 components, got {} in '{}'",
            parts.len(),
            indices
        ));
    }

    let mut hkl = [0i32; 3];
    for (slot, part) in hkl.iter_mut().zip(parts.iter()) {
        *slot = part
            .trim()
            .parse()
            .map_err(|_| format!("Miller index component '{}' is not an integer", part))?;
    }

    if path.is_empty() {
        return Err(format!("missing path in facet specification '{}'", s));
    }

    Ok(FacetEntry {
        facet: Facet(hkl[0], hkl[1], hkl[2]),
        path: path.to_string(),
    })
}

/// 解析氧化态：含 ':' 时按元素 (el:n,el:n)，否则按位点 (n,n,...)
pub fn parse_ox_states(s: &str) -> Result<OxStates, String> {
    if s.contains(':') {
        let mut map = BTreeMap::new();
        for part in s.split(',') {
            let (el, state) = part
                .split_once(':')
                .ok_or_else(|| format!("expected ELEMENT:STATE, got '{}'", part))?;
            let el = el.trim();
            if el.is_empty() {
                return Err(format!("missing element symbol in '{}'", part));
            }
            let state: i32 = state
                .trim()
                .parse()
                .map_err(|_| format!("oxidation state '{}' is not an integer", state))?;
            map.insert(el.to_string(), state);
        }
        Ok(OxStates::PerElement(map))
    } else {
        let states: Result<Vec<i32>, String> = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse()
                    .map_err(|_| format!("oxidation state '{}' is not an integer", part))
            })
            .collect();
        Ok(OxStates::PerSite(states?))
    }
}

/// 近邻判定算法选择
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum NnMethodArg {
    /// Covalent radius sum cutoff
    CovalentCutoff,
    /// Scaled minimum distance
    MinimumDistance,
}

impl NnMethodArg {
    pub fn to_method(self, tolerance: f64) -> NnMethod {
        match self {
            NnMethodArg::CovalentCutoff => NnMethod::CovalentCutoff { tolerance },
            NnMethodArg::MinimumDistance => NnMethod::MinimumDistance { tolerance },
        }
    }
}

// ─────────────────────────────────────────────────────────────
// process 子命令参数
// ─────────────────────────────────────────────────────────────

/// process 子命令参数
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Bulk energy per atom in eV per atom
    #[arg(long)]
    pub bulk_per_atom: f64,

    /// Do not auto-discover three-digit facet folders
    #[arg(long, default_value_t = false)]
    pub no_discover: bool,

    /// Path to where the hkl folders are (defaults to cwd)
    #[arg(long)]
    pub path_to_fols: Option<PathBuf>,

    /// Explicit facet mapping, e.g. --facet 1,-1,2=path/to/112 (repeatable)
    #[arg(long = "facet", value_name = "H,K,L=PATH", value_parser = parse_facet_spec)]
    pub facets: Vec<FacetEntry>,

    /// Parse the vacuum level from potential.csv or LOCPOT in each folder
    #[arg(long, default_value_t = false)]
    pub parse_vacuum: bool,

    /// Parse core level energies from OUTCAR in each folder
    #[arg(long, default_value_t = false)]
    pub parse_core_energy: bool,

    /// Symbol of the atom the core state energy is parsed from
    #[arg(long)]
    pub core_atom: Option<String>,

    /// Bulk nearest neighbours of the core atom, e.g. Ti,Ti,O,O
    #[arg(long, value_delimiter = ',')]
    pub bulk_nn: Option<Vec<String>>,

    /// Return the table to the terminal instead of writing a csv file
    #[arg(long, default_value_t = false)]
    pub no_save: bool,

    /// Filename of the output csv (a .csv suffix is appended if absent)
    #[arg(long, default_value = "data.csv")]
    pub csv_fname: String,

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

    /// Save a surface energy plot (PNG, only with --no-save)
    #[arg(long)]
    pub plot_fname: Option<PathBuf>,
}
