//! # 晶面数据模型
//!
//! Miller 指数键、保持插入顺序的晶面映射、结果表及其 CSV 输出。
//!
//! ## 依赖关系
//! - 被 `surface/data.rs`, `cli/process.rs`, `commands/process.rs` 使用
//! - 使用 `error.rs`

use crate::error::{Result, SurfdataError};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// eV/Å² -> mJ/m² 换算常数
pub const EV_PER_ANG2_TO_MJ_PER_M2: f64 = 16.02;

/// Miller 指数 (hkl)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Facet(pub i32, pub i32, pub i32);

impl Facet {
    /// 指数拼接成的标签，如 (1,0,0) -> "100"，(1,-1,2) -> "1-12"
    pub fn label(&self) -> String {
        format!("{}{}{}", self.0, self.1, self.2)
    }

    /// 元组形式，如 "(1, 0, 0)"，用于表格输出
    pub fn tuple_repr(&self) -> String {
        format!("({}, {}, {})", self.0, self.1, self.2)
    }

    /// 从三位数字文件夹名解析，如 "100" -> (1,0,0)
    ///
    /// 文件夹命名只覆盖 0-9 的单个数字，负指数无法自动发现，
    /// 只能通过显式映射提供。
    pub fn from_folder_name(name: &str) -> Option<Facet> {
        if name.len() != 3 || !name.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let d: Vec<i32> = name.chars().map(|c| c as i32 - '0' as i32).collect();
        Some(Facet(d[0], d[1], d[2]))
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 保持插入顺序的晶面 -> 路径映射。
///
/// 行序必须跟随映射的构建顺序（显式输入顺序或目录枚举顺序），
/// 对已有键再次 insert 只更新路径、不改变位置。
#[derive(Debug, Clone, Default)]
pub struct FacetMap {
    entries: Vec<(Facet, PathBuf)>,
}

impl FacetMap {
    pub fn new() -> Self {
        FacetMap::default()
    }

    /// 插入或更新。已存在的键保留原插入位置，仅替换路径。
    pub fn insert(&mut self, facet: Facet, path: PathBuf) {
        for entry in &mut self.entries {
            if entry.0 == facet {
                entry.1 = path;
                return;
            }
        }
        self.entries.push((facet, path));
    }

    pub fn get(&self, facet: &Facet) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(f, _)| f == facet)
            .map(|(_, p)| p.as_path())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Facet, &PathBuf)> {
        self.entries.iter().map(|(f, p)| (f, p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 结果表中的一行（一个晶面）
#[derive(Debug, Clone, Serialize)]
pub struct FacetRecord {
    /// 标签，如 "100"
    pub hkl: String,
    /// Miller 指数
    pub hkl_tuple: Facet,
    /// 表面积 (Å²)
    pub area: f64,
    /// 原子数
    pub atoms: usize,
    /// 泛函标签
    pub functional: String,
    /// 平面波截断能 (eV)
    pub encut: f64,
    /// 电子步算法
    pub algo: String,
    /// 展宽方法
    pub ismear: i32,
    /// 展宽宽度 (eV)
    pub sigma: f64,
    /// k 点总数
    pub kpoints: usize,
    /// 带隙 (eV)
    pub bandgap: f64,
    /// slab 总能 (eV)
    pub slab_energy: f64,
    /// slab 每原子能量 (eV)
    pub slab_per_atom: f64,
    /// 表面能 (mJ/m²)，全表收集完后统一计算
    pub surface_energy: f64,
    /// 表面能 (eV/Å²)
    pub surface_energy_ev: f64,
    /// 真空能级 (eV)，可选列
    pub vacuum_potential: Option<f64>,
    /// 芯态本征能量 (eV)，可选列
    pub core_energy: Option<f64>,
}

/// 结果表。可选列只有在对应数据列表非空时才存在，
/// 而不是以缺失标记填充。
#[derive(Debug, Clone)]
pub struct FacetTable {
    pub records: Vec<FacetRecord>,
    pub has_vacuum: bool,
    pub has_core: bool,
}

impl FacetTable {
    /// 全表派生列：表面能。必须在所有行收集完成之后调用。
    ///
    /// surface_energy = (E_slab - E_bulk/atom · N) / (2A) · 16.02  (mJ/m²)
    /// surface_energy_ev 为同式不乘换算因子 (eV/Å²)。
    /// 面积为零时结果为 ±inf/NaN，不报错。
    pub fn compute_surface_energies(&mut self, bulk_per_atom: f64) {
        for r in &mut self.records {
            let per_area =
                (r.slab_energy - bulk_per_atom * r.atoms as f64) / (2.0 * r.area);
            r.surface_energy = per_area * EV_PER_ANG2_TO_MJ_PER_M2;
            r.surface_energy_ev = per_area;
        }
    }

    /// 表头，按可选列的存在情况拼接
    pub fn headers(&self) -> Vec<&'static str> {
        let mut h = vec![
            "hkl",
            "hkl_tuple",
            "area",
            "atoms",
            "functional",
            "encut",
            "algo",
            "ismear",
            "sigma",
            "kpoints",
            "bandgap",
            "slab_energy",
            "slab_per_atom",
            "surface_energy",
            "surface_energy_ev",
        ];
        if self.has_vacuum {
            h.push("vacuum_potential");
        }
        if self.has_core {
            h.push("core_energy");
        }
        h
    }

    /// 写出 CSV：含表头、无行索引列。NaN 写为空单元格。
    pub fn to_csv(&self, output_path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(SurfdataError::CsvError)?;

        wtr.write_record(self.headers())
            .map_err(SurfdataError::CsvError)?;

        for r in &self.records {
            let mut record = vec![
                r.hkl.clone(),
                r.hkl_tuple.tuple_repr(),
                fmt_cell(r.area),
                r.atoms.to_string(),
                r.functional.clone(),
                fmt_cell(r.encut),
                r.algo.clone(),
                r.ismear.to_string(),
                fmt_cell(r.sigma),
                r.kpoints.to_string(),
                fmt_cell(r.bandgap),
                fmt_cell(r.slab_energy),
                fmt_cell(r.slab_per_atom),
                fmt_cell(r.surface_energy),
                fmt_cell(r.surface_energy_ev),
            ];
            if self.has_vacuum {
                record.push(r.vacuum_potential.map(fmt_cell).unwrap_or_default());
            }
            if self.has_core {
                record.push(r.core_energy.map(fmt_cell).unwrap_or_default());
            }
            wtr.write_record(&record).map_err(SurfdataError::CsvError)?;
        }

        wtr.flush().map_err(|e| SurfdataError::FileWriteError {
            path: output_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }
}

/// 浮点单元格：NaN 为空，其余最短往返表示
fn fmt_cell(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        format!("{}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_label() {
        assert_eq!(Facet(1, 0, 0).label(), "100");
        assert_eq!(Facet(1, -1, 2).label(), "1-12");
    }

    #[test]
    fn test_facet_tuple_repr() {
        assert_eq!(Facet(0, 1, 1).tuple_repr(), "(0, 1, 1)");
    }

    #[test]
    fn test_facet_from_folder_name() {
        assert_eq!(Facet::from_folder_name("100"), Some(Facet(1, 0, 0)));
        assert_eq!(Facet::from_folder_name("010"), Some(Facet(0, 1, 0)));
        assert_eq!(Facet::from_folder_name("1000"), None);
        assert_eq!(Facet::from_folder_name("10a"), None);
        assert_eq!(Facet::from_folder_name("10"), None);
    }

    #[test]
    fn test_facet_map_preserves_insertion_order() {
        let mut map = FacetMap::new();
        map.insert(Facet(1, 1, 1), PathBuf::from("a"));
        map.insert(Facet(1, 0, 0), PathBuf::from("b"));
        map.insert(Facet(0, 1, 0), PathBuf::from("c"));

        let keys: Vec<Facet> = map.iter().map(|(f, _)| *f).collect();
        assert_eq!(keys, vec![Facet(1, 1, 1), Facet(1, 0, 0), Facet(0, 1, 0)]);
    }

    #[test]
    fn test_facet_map_update_keeps_position() {
        // 发现阶段可以覆盖显式条目的路径，但不改变其位置
        let mut map = FacetMap::new();
        map.insert(Facet(1, 0, 0), PathBuf::from("explicit/100"));
        map.insert(Facet(0, 0, 1), PathBuf::from("001"));
        map.insert(Facet(1, 0, 0), PathBuf::from("discovered/100"));

        assert_eq!(map.len(), 2);
        let entries: Vec<(Facet, PathBuf)> = map.iter().map(|(f, p)| (*f, p.clone())).collect();
        assert_eq!(entries[0].0, Facet(1, 0, 0));
        assert_eq!(entries[0].1, PathBuf::from("discovered/100"));
        assert_eq!(entries[1].0, Facet(0, 0, 1));
    }

    fn sample_record() -> FacetRecord {
        FacetRecord {
            hkl: "100".to_string(),
            hkl_tuple: Facet(1, 0, 0),
            area: 20.0,
            atoms: 4,
            functional: "GGA".to_string(),
            encut: 520.0,
            algo: "Fast".to_string(),
            ismear: 0,
            sigma: 0.05,
            kpoints: 36,
            bandgap: 1.5,
            slab_energy: -40.0,
            slab_per_atom: -10.0,
            surface_energy: f64::NAN,
            surface_energy_ev: f64::NAN,
            vacuum_potential: None,
            core_energy: None,
        }
    }

    #[test]
    fn test_surface_energy_relation() {
        let mut table = FacetTable {
            records: vec![sample_record()],
            has_vacuum: false,
            has_core: false,
        };
        table.compute_surface_energies(-9.5);

        let r = &table.records[0];
        // (-40 - (-9.5 · 4)) / (2 · 20) = -0.05 eV/Å²
        assert!((r.surface_energy_ev - (-0.05)).abs() < 1e-12);
        assert!((r.surface_energy - r.surface_energy_ev * 16.02).abs() < 1e-12);
    }

    #[test]
    fn test_zero_area_is_infinite_not_error() {
        let mut record = sample_record();
        record.area = 0.0;
        let mut table = FacetTable {
            records: vec![record],
            has_vacuum: false,
            has_core: false,
        };
        table.compute_surface_energies(-9.5);
        assert!(table.records[0].surface_energy_ev.is_infinite());
    }

    #[test]
    fn test_headers_base_schema_only() {
        let table = FacetTable {
            records: vec![sample_record()],
            has_vacuum: false,
            has_core: false,
        };
        let headers = table.headers();
        assert_eq!(headers.len(), 15);
        assert!(!headers.contains(&"vacuum_potential"));
        assert!(!headers.contains(&"core_energy"));
    }

    #[test]
    fn test_headers_with_optional_columns() {
        let table = FacetTable {
            records: vec![sample_record()],
            has_vacuum: true,
            has_core: true,
        };
        let headers = table.headers();
        assert_eq!(*headers.last().unwrap(), "core_energy");
        assert_eq!(headers[headers.len() - 2], "vacuum_potential");
    }

    #[test]
    fn test_fmt_cell_nan_is_empty() {
        assert_eq!(fmt_cell(f64::NAN), "");
        assert_eq!(fmt_cell(1.5), "1.5");
    }
}
