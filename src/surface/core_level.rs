//! # 芯能级提取
//!
//! 在 slab 中挑选一个成键环境与体相一致、且位于结构中部的代表原子，
//! 读取其芯态本征能量的末步值。
//!
//! 候选过滤：目标元素的全部位点按 c 方向分数坐标取四分位距，
//! 只保留严格落在 (Q1, Q3) 开区间内、且近邻签名与给定体相签名
//! 完全一致的位点；再取其中序号最接近中位的一个。
//!
//! ## 依赖关系
//! - 被 `surface/data.rs`, `commands/core.rs` 使用
//! - 使用 `analysis/`, `parsers/outcar.rs`, `parsers/poscar.rs`

use crate::analysis::{assign_oxidation_states, get_bonded_structure, NnMethod, OxStates};
use crate::error::Result;
use crate::models::Crystal;
use crate::parsers::{outcar, poscar};
use crate::utils::output;
use std::path::Path;

/// 芯能级提取的可调选项。固定的已识别字段集合取代自由键值合并。
#[derive(Debug, Clone)]
pub struct CoreEnergyOptions {
    /// 芯态轨道，如 "1s"
    pub orbital: String,
    /// 氧化态赋值策略
    pub ox_states: OxStates,
    /// 近邻判定算法，逐次调用独立构造
    pub nn_method: NnMethod,
}

impl Default for CoreEnergyOptions {
    fn default() -> Self {
        CoreEnergyOptions {
            orbital: "1s".to_string(),
            ox_states: OxStates::Guess,
            nn_method: NnMethod::default(),
        }
    }
}

/// 过滤阶段的瞬态候选记录
struct Candidate {
    site: usize,
    signature: String,
    c_coord: f64,
}

/// 从结构文件与 OUTCAR 提取芯能级 (eV)。
/// 软缺失（无候选原子、轨道缺失、能量序列为空）返回 NaN。
pub fn core_energy(
    core_atom: &str,
    bulk_nn: &[String],
    opts: &CoreEnergyOptions,
    outcar_path: &Path,
    structure_path: &Path,
) -> Result<f64> {
    let mut crystal = poscar::parse_poscar_file(structure_path)?;
    core_energy_from_structure(&mut crystal, core_atom, bulk_nn, opts, outcar_path)
}

/// 同上，结构已在内存中
pub fn core_energy_from_structure(
    crystal: &mut Crystal,
    core_atom: &str,
    bulk_nn: &[String],
    opts: &CoreEnergyOptions,
    outcar_path: &Path,
) -> Result<f64> {
    assign_oxidation_states(crystal, &opts.ox_states)?;
    let bonded = get_bonded_structure(crystal, &opts.nn_method);

    // 体相近邻签名：排序后空格连接，次序无关的比较键
    let mut sorted_nn: Vec<String> = bulk_nn.to_vec();
    sorted_nn.sort();
    let bulk_signature = sorted_nn.join(" ");

    let mut candidates: Vec<Candidate> = Vec::new();
    for (n, atom) in crystal.atoms.iter().enumerate() {
        if atom.element != core_atom {
            continue;
        }
        let mut elems = bonded.neighbor_elements(crystal, n);
        elems.sort();
        candidates.push(Candidate {
            site: n,
            signature: elems.join(" "),
            c_coord: atom.position[2],
        });
    }

    if candidates.is_empty() {
        output::print_warning(&format!(
            "No {} sites found in the structure. Core energy will not be parsed.",
            core_atom
        ));
        return Ok(f64::NAN);
    }

    let c_coords: Vec<f64> = candidates.iter().map(|c| c.c_coord).collect();
    let low = quantile_linear(&c_coords, 0.25);
    let high = quantile_linear(&c_coords, 0.75);

    // 严格开区间：恰好落在分位边界上的位点被排除
    let filtered: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| low < c.c_coord && c.c_coord < high && c.signature == bulk_signature)
        .collect();

    if filtered.is_empty() {
        output::print_warning(&format!(
            "No {} sites with bulk-like coordination found within the slab \
             interquartile range. Core energy will not be parsed.",
            core_atom
        ));
        return Ok(f64::NAN);
    }

    // 序号最接近中位者：位置 (m-1)/2，半数逢偶
    let pos = (filtered.len() - 1) as f64 * 0.5;
    let atom_idx = filtered[pos.round_ties_even() as usize].site;

    let eigen = outcar::parse_core_state_eigen(outcar_path)?;
    let value = eigen
        .get(atom_idx)
        .and_then(|orbitals| orbitals.get(&opts.orbital))
        .and_then(|series| series.last())
        .copied()
        .unwrap_or(f64::NAN);

    Ok(value)
}

/// 线性插值分位数 (pandas 默认约定)
fn quantile_linear(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
