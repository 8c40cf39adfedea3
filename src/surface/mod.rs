//! # 表面数据模块
//!
//! 本工具的核心：晶面数据汇总、真空能级提取、芯能级提取、绘图。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `parsers/`, `analysis/`, `models/`
//! - 子模块: data, vacuum, core_level, plot

pub mod core_level;
pub mod data;
pub mod plot;
pub mod vacuum;
