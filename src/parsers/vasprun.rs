//! # VASP vasprun.xml 解析器
//!
//! 从 vasprun.xml 提取本模块需要的标量信息：原子数、INCAR/参数标签、
//! k 点总数、带隙、末步总能。逐行扫描提取，不做完整 XML 建树。
//!
//! ## 依赖关系
//! - 被 `surface/data.rs` 使用
//! - 使用 `parsers/mod.rs` 的 gzip 回退读取

use crate::error::{Result, SurfdataError};
use crate::parsers;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

/// 占据数阈值：高于此值的本征态计入价带
const OCCU_TOL: f64 = 1e-8;

/// vasprun.xml 标量摘要
#[derive(Debug, Clone)]
pub struct VasprunSummary {
    /// 原子数
    pub nsites: usize,
    /// 计算类型标签 (GGA / HF / SCAN / ...，+U 后缀)
    pub run_type: String,
    /// 平面波截断能 ENCUT (eV)，取自 INCAR 段
    pub encut: f64,
    /// 电子步算法 ALGO，取自 INCAR 段
    pub algo: String,
    /// 展宽方法 ISMEAR，取自参数段
    pub ismear: i32,
    /// 展宽宽度 SIGMA (eV)，取自参数段
    pub sigma: f64,
    /// k 点总数
    pub nkpoints: usize,
    /// 带隙 (eV)。文件无本征值块时为 NaN
    pub bandgap: f64,
    /// 末离子步总能 (eV)
    pub final_energy: f64,
    /// 每原子总能 (eV)
    pub final_energy_per_atom: f64,
}

/// 解析 vasprun.xml，明文缺失时回退 vasprun.xml.gz
pub fn parse_vasprun(path: &Path) -> Result<VasprunSummary> {
    let content = parsers::read_text_with_gz_fallback(path)?;
    parse_vasprun_content(&content, &path.display().to_string())
}

/// 从字符串内容解析
pub fn parse_vasprun_content(content: &str, source: &str) -> Result<VasprunSummary> {
    // <i type="string" name="ALGO">Fast</i> 形式的标签
    let tag_re = Regex::new(
        r#"<i(?:\s+type="[^"]*")?\s+name="([A-Za-z_0-9]+)"\s*>([^<]*)</i>"#,
    )
    .map_err(|e| SurfdataError::Other(e.to_string()))?;
    let atoms_re = Regex::new(r"<atoms>\s*(\d+)\s*</atoms>")
        .map_err(|e| SurfdataError::Other(e.to_string()))?;

    let mut incar: HashMap<String, String> = HashMap::new();
    let mut params: HashMap<String, String> = HashMap::new();
    let mut nsites: Option<usize> = None;
    let mut nkpoints = 0usize;
    let mut final_energy: Option<f64> = None;

    // 带隙统计量
    let mut vbm = f64::NEG_INFINITY;
    let mut cbm = f64::INFINITY;
    let mut saw_eigenvalues = false;

    // 扫描状态
    let mut in_incar = false;
    let mut in_parameters = false;
    let mut in_kpointlist = false;
    let mut in_projected = false;
    let mut in_eigenvalues = false;
    let mut eigenvalues_done = false;

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("<incar") {
            in_incar = true;
        } else if trimmed.starts_with("</incar>") {
            in_incar = false;
        } else if trimmed.starts_with("<parameters") {
            in_parameters = true;
        } else if trimmed.starts_with("</parameters>") {
            in_parameters = false;
        } else if trimmed.starts_with("<projected") {
            in_projected = true;
        } else if trimmed.starts_with("</projected>") {
            in_projected = false;
        }

        if trimmed.starts_with(r#"<varray name="kpointlist""#) {
            in_kpointlist = true;
            continue;
        }
        if in_kpointlist {
            if trimmed.starts_with("</varray>") {
                in_kpointlist = false;
            } else if trimmed.starts_with("<v") {
                nkpoints += 1;
            }
            continue;
        }

        // 只统计第一个非投影本征值块（离子步间块内容一致，投影块格式不同）
        if trimmed.starts_with("<eigenvalues") && !in_projected && !eigenvalues_done {
            in_eigenvalues = true;
            continue;
        }
        if in_eigenvalues {
            if trimmed.starts_with("</eigenvalues>") {
                in_eigenvalues = false;
                eigenvalues_done = true;
            } else if let Some(rest) = trimmed.strip_prefix("<r>") {
                let fields: Vec<f64> = rest
                    .trim_end_matches("</r>")
                    .split_whitespace()
                    .filter_map(|s| s.parse().ok())
                    .collect();
                if fields.len() >= 2 {
                    saw_eigenvalues = true;
                    let (energy, occu) = (fields[0], fields[1]);
                    if occu > OCCU_TOL {
                        if energy > vbm {
                            vbm = energy;
                        }
                    } else if energy < cbm {
                        cbm = energy;
                    }
                }
            }
            continue;
        }

        if (in_incar || in_parameters) && trimmed.starts_with("<i") {
            if let Some(caps) = tag_re.captures(trimmed) {
                let name = caps[1].to_string();
                let value = caps[2].trim().to_string();
                if in_incar {
                    incar.insert(name, value);
                } else {
                    params.insert(name, value);
                }
            }
            continue;
        }

        if nsites.is_none() {
            if let Some(caps) = atoms_re.captures(trimmed) {
                nsites = caps[1].parse().ok();
            }
        }

        // 末离子步能量：保留最后一次出现
        if trimmed.starts_with(r#"<i name="e_fr_energy""#) {
            if let Some(caps) = tag_re.captures(trimmed) {
                if let Ok(v) = caps[2].trim().parse::<f64>() {
                    final_energy = Some(v);
                }
            }
        }
    }

    let nsites = nsites.ok_or_else(|| parse_err(source, "missing <atoms> count"))?;
    let final_energy =
        final_energy.ok_or_else(|| parse_err(source, "missing final energy (e_fr_energy)"))?;

    let encut = require_f64(&incar, "ENCUT", source)?;
    let algo = incar
        .get("ALGO")
        .cloned()
        .ok_or_else(|| parse_err(source, "missing ALGO in INCAR section"))?;
    let ismear = require_f64(&params, "ISMEAR", source)? as i32;
    let sigma = require_f64(&params, "SIGMA", source)?;

    let bandgap = if saw_eigenvalues && vbm.is_finite() && cbm.is_finite() {
        (cbm - vbm).max(0.0)
    } else {
        f64::NAN
    };

    Ok(VasprunSummary {
        nsites,
        run_type: run_type(&params, &incar),
        encut,
        algo,
        ismear,
        sigma,
        nkpoints,
        bandgap,
        final_energy,
        final_energy_per_atom: final_energy / nsites as f64,
    })
}

/// 计算类型标签。LHFCALC -> HF，METAGGA -> 其值，GGA -> GGA，否则 LDA；
/// LDAU 为真时追加 +U。
fn run_type(params: &HashMap<String, String>, incar: &HashMap<String, String>) -> String {
    let lookup = |key: &str| params.get(key).or_else(|| incar.get(key));
    let truthy = |v: Option<&String>| v.map(|s| s.trim().starts_with('T')).unwrap_or(false);

    let mut label = if truthy(lookup("LHFCALC")) {
        "HF".to_string()
    } else if let Some(mg) = lookup("METAGGA")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "--" && !s.eq_ignore_ascii_case("none"))
    {
        mg.to_uppercase()
    } else if lookup("GGA")
        .map(|s| {
            let s = s.trim();
            !s.is_empty() && s != "--"
        })
        .unwrap_or(false)
    {
        "GGA".to_string()
    } else {
        "LDA".to_string()
    };

    if truthy(lookup("LDAU")) {
        label.push_str("+U");
    }
    label
}

fn require_f64(map: &HashMap<String, String>, key: &str, source: &str) -> Result<f64> {
    map.get(key)
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| parse_err(source, &format!("missing or non-numeric {} tag", key)))
}

fn parse_err(source: &str, reason: &str) -> SurfdataError {
    SurfdataError::ParseError {
        format: "vasprun.xml".to_string(),
        path: source.to_string(),
        reason: reason.to_string(),
    }
}
