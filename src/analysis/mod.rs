//! # 分析模块
//!
//! 提供成键环境与氧化态的局域化学分析。
//!
//! ## 依赖关系
//! - 被 `surface/core_level.rs` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: bonding, oxidation

pub mod bonding;
pub mod oxidation;

pub use bonding::{get_bonded_structure, BondedStructure, NnMethod};
pub use oxidation::{assign_oxidation_states, OxStates};
