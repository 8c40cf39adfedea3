//! # 数据模型模块
//!
//! 定义晶体结构与结果表的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `analysis/`, `surface/` 使用
//! - 子模块: structure, facet

pub mod facet;
pub mod structure;

pub use facet::{Facet, FacetMap, FacetRecord, FacetTable};
pub use structure::{Atom, Crystal, Lattice};
