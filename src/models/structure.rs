//! # 晶体结构数据模型
//!
//! 定义 slab 结构的统一表示：晶格、原子（含可选氧化态）。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `analysis/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 晶格参数表示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// slab 表面积：面内向量叉积的模 |a × b| (Å²)
    pub fn surface_area(&self) -> f64 {
        let a = self.matrix[0];
        let b = self.matrix[1];

        let cross = [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ];

        (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt()
    }

    /// 分数坐标转笛卡尔坐标
    pub fn frac_to_cart(&self, frac: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }
}

/// 原子信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 分数坐标 [x, y, z]
    pub position: [f64; 3],

    /// 氧化态（由 `analysis::oxidation` 赋值）
    pub oxidation_state: Option<i32>,
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
            oxidation_state: None,
        }
    }
}

/// slab 晶体结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crystal {
    /// 结构名称
    pub name: String,

    /// 晶格
    pub lattice: Lattice,

    /// 原子列表
    pub atoms: Vec<Atom>,
}

impl Crystal {
    pub fn new(name: impl Into<String>, lattice: Lattice, atoms: Vec<Atom>) -> Self {
        Crystal {
            name: name.into(),
            lattice,
            atoms,
        }
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_area_orthogonal() {
        let lattice = Lattice::from_vectors([[4.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 30.0]]);
        assert!((lattice.surface_area() - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_surface_area_hexagonal() {
        // a = b = 3 Å, γ = 120° -> area = a·b·sin(120°)
        let lattice = Lattice::from_vectors([
            [3.0, 0.0, 0.0],
            [-1.5, 3.0 * 0.75f64.sqrt(), 0.0],
            [0.0, 0.0, 25.0],
        ]);
        let expected = 3.0 * 3.0 * (0.75f64).sqrt();
        assert!((lattice.surface_area() - expected).abs() < 1e-10);
    }

    #[test]
    fn test_frac_to_cart() {
        let lattice = Lattice::from_vectors([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 8.0]]);
        let cart = lattice.frac_to_cart([0.5, 0.25, 0.5]);
        assert!((cart[0] - 2.0).abs() < 1e-10);
        assert!((cart[1] - 1.0).abs() < 1e-10);
        assert!((cart[2] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_crystal_formula() {
        let lattice = Lattice::from_vectors([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]);
        let atoms = vec![
            Atom::new("Ti", [0.0, 0.0, 0.0]),
            Atom::new("O", [0.5, 0.5, 0.0]),
            Atom::new("O", [0.5, 0.0, 0.5]),
        ];
        let crystal = Crystal::new("TiO2", lattice, atoms);
        assert_eq!(crystal.formula(), "O2Ti");
    }
}
