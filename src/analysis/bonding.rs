//! # 最近邻成键分析
//!
//! 在 3x3x3 周期镜像范围内按距离判据构建成键结构。
//! 两种算法：共价半径截断、最小距离缩放。算法实例逐次调用构造，
//! 不共享全局状态。
//!
//! ## 依赖关系
//! - 被 `surface/core_level.rs` 使用
//! - 使用 `models/structure.rs`

use crate::models::Crystal;

/// 最近邻判定算法
#[derive(Debug, Clone, PartialEq)]
pub enum NnMethod {
    /// d <= (r_i + r_j)·(1 + tolerance)，共价半径查表。
    /// 已赋氧化态时跳过同号离子对（阳-阳、阴-阴不成键）。
    CovalentCutoff { tolerance: f64 },
    /// d <= d_min(i)·(1 + tolerance)，d_min 为该位点到任意镜像的最短距离
    MinimumDistance { tolerance: f64 },
}

impl Default for NnMethod {
    fn default() -> Self {
        NnMethod::CovalentCutoff { tolerance: 0.2 }
    }
}

/// 成键结构：每个位点的近邻位点序号（周期镜像映射回原位点，
/// 同一近邻经多个镜像出现时按配位各计一次）
#[derive(Debug, Clone)]
pub struct BondedStructure {
    pub neighbors: Vec<Vec<usize>>,
}

impl BondedStructure {
    /// 位点 n 的近邻元素符号列表
    pub fn neighbor_elements(&self, crystal: &Crystal, n: usize) -> Vec<String> {
        self.neighbors[n]
            .iter()
            .map(|&j| crystal.atoms[j].element.clone())
            .collect()
    }
}

/// 构建成键结构
pub fn get_bonded_structure(crystal: &Crystal, method: &NnMethod) -> BondedStructure {
    let n = crystal.atoms.len();
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];

    match method {
        NnMethod::CovalentCutoff { tolerance } => {
            for i in 0..n {
                let r_i = covalent_radius(&crystal.atoms[i].element);
                for (j, d) in image_distances(crystal, i) {
                    if same_sign_ions(crystal, i, j) {
                        continue;
                    }
                    let r_j = covalent_radius(&crystal.atoms[j].element);
                    if d <= (r_i + r_j) * (1.0 + tolerance) {
                        neighbors[i].push(j);
                    }
                }
            }
        }
        NnMethod::MinimumDistance { tolerance } => {
            for i in 0..n {
                let pairs: Vec<(usize, f64)> = image_distances(crystal, i).collect();
                let d_min = pairs
                    .iter()
                    .map(|&(_, d)| d)
                    .fold(f64::INFINITY, f64::min);
                if !d_min.is_finite() {
                    continue;
                }
                for (j, d) in pairs {
                    if d <= d_min * (1.0 + tolerance) {
                        neighbors[i].push(j);
                    }
                }
            }
        }
    }

    BondedStructure { neighbors }
}

/// 位点 i 到所有位点各镜像的 (位点序号, 距离)。排除零距离的自身。
fn image_distances<'a>(
    crystal: &'a Crystal,
    i: usize,
) -> impl Iterator<Item = (usize, f64)> + 'a {
    let frac_i = crystal.atoms[i].position;
    (0..crystal.atoms.len()).flat_map(move |j| {
        let frac_j = crystal.atoms[j].position;
        let mut out = Vec::with_capacity(27);
        for sa in -1i32..=1 {
            for sb in -1i32..=1 {
                for sc in -1i32..=1 {
                    let disp = [
                        frac_j[0] + sa as f64 - frac_i[0],
                        frac_j[1] + sb as f64 - frac_i[1],
                        frac_j[2] + sc as f64 - frac_i[2],
                    ];
                    let cart = crystal.lattice.frac_to_cart(disp);
                    let d = (cart[0] * cart[0] + cart[1] * cart[1] + cart[2] * cart[2]).sqrt();
                    if d > 1e-8 {
                        out.push((j, d));
                    }
                }
            }
        }
        out
    })
}

/// 两位点均已赋氧化态且同号时为真
fn same_sign_ions(crystal: &Crystal, i: usize, j: usize) -> bool {
    match (
        crystal.atoms[i].oxidation_state,
        crystal.atoms[j].oxidation_state,
    ) {
        (Some(a), Some(b)) => (a > 0 && b > 0) || (a < 0 && b < 0),
        _ => false,
    }
}

/// 共价半径 (Å)。未收录元素取 1.5。
pub fn covalent_radius(element: &str) -> f64 {
    match element {
        "H" => 0.37,
        "Li" => 1.34,
        "Be" => 0.90,
        "B" => 0.82,
        "C" => 0.77,
        "N" => 0.75,
        "O" => 0.73,
        "F" => 0.71,
        "Na" => 1.54,
        "Mg" => 1.30,
        "Al" => 1.18,
        "Si" => 1.11,
        "P" => 1.06,
        "S" => 1.02,
        "Cl" => 0.99,
        "K" => 1.96,
        "Ca" => 1.74,
        "Sc" => 1.44,
        "Ti" => 1.36,
        "V" => 1.25,
        "Cr" => 1.27,
        "Mn" => 1.39,
        "Fe" => 1.25,
        "Co" => 1.26,
        "Ni" => 1.21,
        "Cu" => 1.38,
        "Zn" => 1.31,
        "Ga" => 1.26,
        "Ge" => 1.22,
        "As" => 1.19,
        "Se" => 1.16,
        "Br" => 1.14,
        "Rb" => 2.11,
        "Sr" => 1.92,
        "Y" => 1.62,
        "Zr" => 1.48,
        "Nb" => 1.37,
        "Mo" => 1.45,
        "Ru" => 1.26,
        "Rh" => 1.35,
        "Pd" => 1.31,
        "Ag" => 1.53,
        "Cd" => 1.48,
        "In" => 1.44,
        "Sn" => 1.41,
        "Sb" => 1.38,
        "Te" => 1.35,
        "I" => 1.33,
        "Cs" => 2.25,
        "Ba" => 1.98,
        "La" => 1.69,
        "Hf" => 1.50,
        "Ta" => 1.38,
        "W" => 1.46,
        "Ir" => 1.37,
        "Pt" => 1.28,
        "Au" => 1.44,
        "Hg" => 1.49,
        "Pb" => 1.47,
        "Bi" => 1.46,
        _ => 1.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    /// 岩盐型 MgO 惯用胞，Mg 的最近邻为 6 个 O
    fn mgo() -> Crystal {
        let a = 4.21;
        let lattice = Lattice::from_vectors([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]]);
        let atoms = vec![
            Atom::new("Mg", [0.0, 0.0, 0.0]),
            Atom::new("Mg", [0.5, 0.5, 0.0]),
            Atom::new("Mg", [0.5, 0.0, 0.5]),
            Atom::new("Mg", [0.0, 0.5, 0.5]),
            Atom::new("O", [0.5, 0.0, 0.0]),
            Atom::new("O", [0.0, 0.5, 0.0]),
            Atom::new("O", [0.0, 0.0, 0.5]),
            Atom::new("O", [0.5, 0.5, 0.5]),
        ];
        Crystal::new("MgO", lattice, atoms)
    }

    #[test]
    fn test_rock_salt_coordination_min_dist() {
        let crystal = mgo();
        let bonded = get_bonded_structure(&crystal, &NnMethod::MinimumDistance { tolerance: 0.1 });
        // 最短距离 a/2，每个位点 6 个最近邻
        assert_eq!(bonded.neighbors[0].len(), 6);
        let elems = bonded.neighbor_elements(&crystal, 0);
        assert!(elems.iter().all(|e| e == "O"));
    }

    #[test]
    fn test_covalent_cutoff_ionic_filter() {
        let mut crystal = mgo();
        for atom in &mut crystal.atoms {
            atom.oxidation_state = Some(if atom.element == "Mg" { 2 } else { -2 });
        }
        // 宽松容差下同号对仍被过滤，Mg 的近邻全为 O
        let bonded =
            get_bonded_structure(&crystal, &NnMethod::CovalentCutoff { tolerance: 0.5 });
        let elems = bonded.neighbor_elements(&crystal, 0);
        assert!(!elems.is_empty());
        assert!(elems.iter().all(|e| e == "O"));
    }

    #[test]
    fn test_default_method_is_fresh_value() {
        // 默认算法按值构造，不依赖共享实例
        assert_eq!(
            NnMethod::default(),
            NnMethod::CovalentCutoff { tolerance: 0.2 }
        );
    }
}
