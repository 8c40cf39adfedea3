//! # VASP LOCPOT 解析器
//!
//! 解析 LOCPOT 体数据：POSCAR 头部之后是网格维度行和逐点电势值，
//! x 方向变化最快。提供沿任一轴的平面平均。
//!
//! ## 依赖关系
//! - 被 `surface/vacuum.rs` 使用
//! - 使用 `parsers/mod.rs` 的 gzip 回退读取

use crate::error::{Result, SurfdataError};
use crate::parsers;
use std::path::Path;

/// LOCPOT 电势网格
#[derive(Debug, Clone)]
pub struct Locpot {
    pub ngx: usize,
    pub ngy: usize,
    pub ngz: usize,
    /// 逐点电势，索引 x + y·ngx + z·ngx·ngy
    pub data: Vec<f64>,
}

impl Locpot {
    /// 读取 LOCPOT。路径以 .gz 结尾时解压读取；
    /// 明文路径不存在时回退 `<path>.gz`。
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = parsers::read_text_with_gz_fallback(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    /// 从字符串内容解析
    pub fn parse(content: &str, source: &str) -> Result<Self> {
        let lines: Vec<&str> = content.lines().collect();
        if lines.len() < 10 {
            return Err(parse_err(source, "file too short"));
        }

        // POSCAR 头部：注释、缩放、3 个晶格向量
        // Line 5: 元素行 (VASP 5+) 或直接是原子数行 (VASP 4)
        let line5: Vec<&str> = lines[5].split_whitespace().collect();
        let counts_line = if line5.first().map(|s| s.parse::<usize>().is_ok()).unwrap_or(false) {
            5
        } else {
            6
        };
        let natoms: usize = lines
            .get(counts_line)
            .map(|l| l.split_whitespace().filter_map(|s| s.parse::<usize>().ok()).sum())
            .unwrap_or(0);
        if natoms == 0 {
            return Err(parse_err(source, "missing atom counts line"));
        }

        let mut coord_line = counts_line + 1;
        if lines
            .get(coord_line)
            .map(|l| l.trim().to_lowercase().starts_with("selective"))
            .unwrap_or(false)
        {
            coord_line += 1;
        }

        // 跳过坐标行，找网格维度行（第一个恰含 3 个正整数的非空行）
        let mut idx = coord_line + 1 + natoms;
        let (ngx, ngy, ngz) = loop {
            let line = lines
                .get(idx)
                .ok_or_else(|| parse_err(source, "missing grid dimension line"))?;
            let dims: Vec<usize> = line
                .split_whitespace()
                .filter_map(|s| s.parse().ok())
                .collect();
            if dims.len() == 3 && dims.iter().all(|&d| d > 0) {
                break (dims[0], dims[1], dims[2]);
            }
            if !line.trim().is_empty() {
                return Err(parse_err(source, "unexpected content before grid dimensions"));
            }
            idx += 1;
        };

        let npoints = ngx * ngy * ngz;
        let mut data = Vec::with_capacity(npoints);
        for line in &lines[idx + 1..] {
            for tok in line.split_whitespace() {
                if let Ok(v) = tok.parse::<f64>() {
                    data.push(v);
                    if data.len() == npoints {
                        return Ok(Locpot { ngx, ngy, ngz, data });
                    }
                }
            }
        }

        Err(parse_err(
            source,
            &format!("grid truncated: expected {} values, got {}", npoints, data.len()),
        ))
    }

    /// 沿指定轴 (0=a, 1=b, 2=c) 的平面平均电势
    pub fn average_along_axis(&self, axis: usize) -> Vec<f64> {
        let dims = [self.ngx, self.ngy, self.ngz];
        let n = dims[axis];
        let mut sums = vec![0.0; n];

        for z in 0..self.ngz {
            for y in 0..self.ngy {
                for x in 0..self.ngx {
                    let i = x + y * self.ngx + z * self.ngx * self.ngy;
                    let slab_idx = [x, y, z][axis];
                    sums[slab_idx] += self.data[i];
                }
            }
        }

        let plane_points = (self.ngx * self.ngy * self.ngz / n) as f64;
        sums.iter().map(|s| s / plane_points).collect()
    }
}

fn parse_err(source: &str, reason: &str) -> SurfdataError {
    SurfdataError::ParseError {
        format: "LOCPOT".to_string(),
        path: source.to_string(),
        reason: reason.to_string(),
    }
}
