//! # 氧化态赋值
//!
//! 三种赋值策略：逐位点列表、逐元素映射、按常见氧化态猜测。
//! 猜测策略在各元素的常见氧化态组合中选取使晶胞总电荷绝对值
//! 最小的组合，表序靠前（更常见）的态优先，结果确定。
//!
//! ## 依赖关系
//! - 被 `surface/core_level.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{Result, SurfdataError};
use crate::models::Crystal;
use std::collections::BTreeMap;

/// 组合搜索上限，超出时退化为每元素取最常见态
const MAX_COMBINATIONS: usize = 10_000;

/// 氧化态输入的三种形式
#[derive(Debug, Clone, Default)]
pub enum OxStates {
    /// 逐位点，长度必须等于位点数，如 [3, 2, 2, -2, -2]
    PerSite(Vec<i32>),
    /// 逐元素，如 {"Fe": 3, "O": -2}
    PerElement(BTreeMap<String, i32>),
    /// 按常见氧化态与电荷平衡猜测
    #[default]
    Guess,
}

/// 按策略为结构赋氧化态
pub fn assign_oxidation_states(crystal: &mut Crystal, spec: &OxStates) -> Result<()> {
    match spec {
        OxStates::PerSite(states) => {
            if states.len() != crystal.atoms.len() {
                return Err(SurfdataError::OxidationError(format!(
                    "per-site list has {} entries but structure has {} sites",
                    states.len(),
                    crystal.atoms.len()
                )));
            }
            for (atom, &state) in crystal.atoms.iter_mut().zip(states.iter()) {
                atom.oxidation_state = Some(state);
            }
        }
        OxStates::PerElement(map) => {
            for atom in &mut crystal.atoms {
                let state = map.get(&atom.element).ok_or_else(|| {
                    SurfdataError::OxidationError(format!(
                        "no oxidation state supplied for element {}",
                        atom.element
                    ))
                })?;
                atom.oxidation_state = Some(*state);
            }
        }
        OxStates::Guess => {
            let guessed = guess_by_charge_balance(crystal);
            for atom in &mut crystal.atoms {
                atom.oxidation_state = guessed.get(&atom.element).copied();
            }
        }
    }
    Ok(())
}

/// 逐元素猜测：在常见氧化态的笛卡尔积中取 |总电荷| 最小者
fn guess_by_charge_balance(crystal: &Crystal) -> BTreeMap<String, i32> {
    // 按出现顺序收集元素与计数
    let mut elements: Vec<String> = Vec::new();
    let mut counts: Vec<i64> = Vec::new();
    for atom in &crystal.atoms {
        match elements.iter().position(|e| e == &atom.element) {
            Some(i) => counts[i] += 1,
            None => {
                elements.push(atom.element.clone());
                counts.push(1);
            }
        }
    }

    let candidates: Vec<&[i32]> = elements
        .iter()
        .map(|e| common_oxidation_states(e))
        .collect();

    let total = candidates
        .iter()
        .map(|c| c.len())
        .try_fold(1usize, |acc, l| acc.checked_mul(l))
        .unwrap_or(usize::MAX);
    let mut best: Vec<i32> = candidates.iter().map(|c| c[0]).collect();

    if total > 1 && total <= MAX_COMBINATIONS {
        let mut best_charge = i64::MAX;
        let mut pick = vec![0usize; candidates.len()];
        'outer: loop {
            let charge: i64 = pick
                .iter()
                .enumerate()
                .map(|(i, &j)| candidates[i][j] as i64 * counts[i])
                .sum();
            if charge.abs() < best_charge {
                best_charge = charge.abs();
                best = pick.iter().enumerate().map(|(i, &j)| candidates[i][j]).collect();
            }

            // 进位式枚举，保持表序优先
            for i in (0..pick.len()).rev() {
                pick[i] += 1;
                if pick[i] < candidates[i].len() {
                    continue 'outer;
                }
                pick[i] = 0;
            }
            break;
        }
    }

    elements.into_iter().zip(best).collect()
}

/// 常见氧化态，最常见者在前。未知元素返回 [0]。
pub fn common_oxidation_states(element: &str) -> &'static [i32] {
    match element {
        "H" => &[1, -1],
        "Li" | "Na" | "K" | "Rb" | "Cs" => &[1],
        "Be" | "Mg" | "Ca" | "Sr" | "Ba" => &[2],
        "B" | "Al" | "Ga" | "In" => &[3],
        "C" => &[4, -4, 2],
        "Si" => &[4, -4],
        "N" => &[-3, 3, 5],
        "P" => &[5, -3, 3],
        "As" | "Sb" | "Bi" => &[3, 5, -3],
        "O" => &[-2],
        "S" => &[-2, 6, 4],
        "Se" | "Te" => &[-2, 4, 6],
        "F" => &[-1],
        "Cl" | "Br" | "I" => &[-1, 1, 3, 5, 7],
        "Sc" | "Y" | "La" => &[3],
        "Ce" => &[3, 4],
        "Ti" => &[4, 3, 2],
        "Zr" | "Hf" => &[4],
        "V" => &[5, 4, 3, 2],
        "Nb" | "Ta" => &[5, 3],
        "Cr" => &[3, 6, 2],
        "Mo" | "W" => &[6, 4],
        "Mn" => &[2, 4, 7, 3],
        "Fe" => &[3, 2],
        "Co" => &[2, 3],
        "Ni" => &[2, 3],
        "Cu" => &[2, 1],
        "Zn" | "Cd" => &[2],
        "Ag" => &[1],
        "Au" => &[3, 1],
        "Pd" | "Pt" => &[2, 4],
        "Ru" => &[3, 4],
        "Rh" | "Ir" => &[3],
        "Hg" => &[2, 1],
        "Ge" | "Sn" | "Pb" => &[2, 4],
        _ => &[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    fn tio2() -> Crystal {
        let lattice = Lattice::from_vectors([[4.6, 0.0, 0.0], [0.0, 4.6, 0.0], [0.0, 0.0, 3.0]]);
        let atoms = vec![
            Atom::new("Ti", [0.0, 0.0, 0.0]),
            Atom::new("O", [0.3, 0.3, 0.0]),
            Atom::new("O", [0.7, 0.7, 0.0]),
        ];
        Crystal::new("TiO2", lattice, atoms)
    }

    #[test]
    fn test_guess_charge_balanced() {
        let mut crystal = tio2();
        assign_oxidation_states(&mut crystal, &OxStates::Guess).unwrap();
        assert_eq!(crystal.atoms[0].oxidation_state, Some(4));
        assert_eq!(crystal.atoms[1].oxidation_state, Some(-2));
    }

    #[test]
    fn test_per_element() {
        let mut crystal = tio2();
        let mut map = BTreeMap::new();
        map.insert("Ti".to_string(), 3);
        map.insert("O".to_string(), -2);
        assign_oxidation_states(&mut crystal, &OxStates::PerElement(map)).unwrap();
        assert_eq!(crystal.atoms[0].oxidation_state, Some(3));
    }

    #[test]
    fn test_per_element_missing_is_error() {
        let mut crystal = tio2();
        let mut map = BTreeMap::new();
        map.insert("Ti".to_string(), 4);
        let err = assign_oxidation_states(&mut crystal, &OxStates::PerElement(map)).unwrap_err();
        assert!(matches!(err, SurfdataError::OxidationError(_)));
    }

    #[test]
    fn test_per_site_length_mismatch_is_error() {
        let mut crystal = tio2();
        let err =
            assign_oxidation_states(&mut crystal, &OxStates::PerSite(vec![4, -2])).unwrap_err();
        assert!(matches!(err, SurfdataError::OxidationError(_)));
    }

    #[test]
    fn test_per_site() {
        let mut crystal = tio2();
        assign_oxidation_states(&mut crystal, &OxStates::PerSite(vec![4, -2, -2])).unwrap();
        assert_eq!(crystal.atoms[2].oxidation_state, Some(-2));
    }
}
