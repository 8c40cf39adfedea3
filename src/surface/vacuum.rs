//! # 真空能级提取
//!
//! 取平面平均电势的最大值作为真空能级。来源解析顺序：
//! 1. 路径以 .csv 结尾：读取其 "planar" 列
//! 2. 路径含 LOCPOT：直接读取（明文缺失回退 .gz），沿 c 轴平面平均
//! 3. 目录（或缺省为当前目录）：依次探测 potential.csv、LOCPOT、
//!    LOCPOT.gz，都不存在时返回 NaN 并给出一次警告
//!
//! 两条取整路径刻意不同：表格来源按十进制三位银行家舍入，
//! 网格来源按三位格式化后重新解析。
//!
//! ## 依赖关系
//! - 被 `surface/data.rs`, `commands/vacuum.rs` 使用
//! - 使用 `parsers/locpot.rs`, `utils/output.rs`

use crate::error::{Result, SurfdataError};
use crate::parsers::locpot::Locpot;
use crate::utils::output;
use std::path::{Path, PathBuf};

/// 真空能级：平面平均电势的最大值 (eV)。
/// 软缺失（目录中无任何来源）返回 NaN；显式来源损坏或缺失为致命错误。
pub fn vacuum(path: Option<&Path>) -> Result<f64> {
    if let Some(p) = path {
        let s = p.to_string_lossy();
        if s.ends_with(".csv") {
            return max_planar_from_csv(p);
        }
        if s.contains("LOCPOT") {
            return max_planar_from_locpot(p);
        }
    }

    let dir: PathBuf = match path {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().map_err(|e| SurfdataError::Other(e.to_string()))?,
    };

    let csv_path = dir.join("potential.csv");
    if csv_path.is_file() {
        return max_planar_from_csv(&csv_path);
    }
    let locpot = dir.join("LOCPOT");
    if locpot.is_file() {
        return max_planar_from_locpot(&locpot);
    }
    let locpot_gz = dir.join("LOCPOT.gz");
    if locpot_gz.is_file() {
        return max_planar_from_locpot(&locpot_gz);
    }

    output::print_warning(&format!(
        "Vacuum electrostatic potential was not parsed from {}: \
         no LOCPOT or potential.csv files were provided.",
        dir.display()
    ));
    Ok(f64::NAN)
}

/// 表格来源："planar" 列最大值，三位小数银行家舍入
fn max_planar_from_csv(path: &Path) -> Result<f64> {
    let mut rdr = csv::Reader::from_path(path).map_err(SurfdataError::CsvError)?;

    let planar_idx = rdr
        .headers()
        .map_err(SurfdataError::CsvError)?
        .iter()
        .position(|h| h == "planar")
        .ok_or_else(|| SurfdataError::ParseError {
            format: "potential csv".to_string(),
            path: path.display().to_string(),
            reason: "missing 'planar' column".to_string(),
        })?;

    let mut max = f64::NAN;
    for record in rdr.records() {
        let record = record.map_err(SurfdataError::CsvError)?;
        let field = record.get(planar_idx).unwrap_or("");
        let value: f64 = field.trim().parse().map_err(|_| SurfdataError::ParseError {
            format: "potential csv".to_string(),
            path: path.display().to_string(),
            reason: format!("non-numeric planar value '{}'", field),
        })?;
        // max 跳过 NaN（acc 为 NaN 时取新值）
        max = max.max(value);
    }

    Ok(round3(max))
}

/// 网格来源：LOCPOT 沿 c 轴平面平均的最大值，格式化后重新解析
fn max_planar_from_locpot(path: &Path) -> Result<f64> {
    let lpt = Locpot::from_file(path)?;
    let planar = lpt.average_along_axis(2);
    let max = planar.iter().fold(f64::NAN, |acc, &v| acc.max(v));
    Ok(fmt3_reparse(max))
}

/// 十进制三位舍入，逢五取偶
fn round3(x: f64) -> f64 {
    (x * 1000.0).round_ties_even() / 1000.0
}

/// 三位格式化后重新解析
fn fmt3_reparse(x: f64) -> f64 {
    format!("{:.3}", x).parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_potential_csv(dir: &Path, values: &[f64]) -> PathBuf {
        let path = dir.join("potential.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "index,planar,macroscopic").unwrap();
        for (i, v) in values.iter().enumerate() {
            writeln!(f, "{},{},0.0", i, v).unwrap();
        }
        path
    }

    fn write_locpot(dir: &Path, fname: &str) -> PathBuf {
        // 2x2x2 网格，z 平面分别为 1.0 与 7.7775
        let path = dir.join(fname);
        let content = "slab\n1.0\n4.0 0.0 0.0\n0.0 4.0 0.0\n0.0 0.0 10.0\nMg\n1\nDirect\n\
                       0.0 0.0 0.0\n\n  2  2  2\n  1.0 1.0 1.0 1.0\n  7.7775 7.7775 7.7775 7.7775\n";
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_directory_with_tabular_source() {
        let dir = tempfile::tempdir().unwrap();
        write_potential_csv(dir.path(), &[1.0, 2.5, 2.501]);
        let v = vacuum(Some(dir.path())).unwrap();
        assert!((v - 2.501).abs() < 1e-12);
    }

    #[test]
    fn test_explicit_csv_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_potential_csv(dir.path(), &[0.3, 5.12345]);
        let v = vacuum(Some(&path)).unwrap();
        assert!((v - 5.123).abs() < 1e-12);
    }

    #[test]
    fn test_directory_with_locpot() {
        let dir = tempfile::tempdir().unwrap();
        write_locpot(dir.path(), "LOCPOT");
        let v = vacuum(Some(dir.path())).unwrap();
        // 格式化路径: 7.7775 -> "7.778" (carry in decimal formatting)
        assert!((v - 7.778).abs() < 1e-12 || (v - 7.777).abs() < 1e-12);
        assert!(!v.is_nan());
    }

    #[test]
    fn test_no_sources_returns_nan() {
        let dir = tempfile::tempdir().unwrap();
        let v = vacuum(Some(dir.path())).unwrap();
        assert!(v.is_nan());
    }

    #[test]
    fn test_explicit_csv_missing_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("potential.csv");
        assert!(vacuum(Some(&missing)).is_err());
    }

    #[test]
    fn test_missing_planar_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("potential.csv");
        std::fs::write(&path, "index,value\n0,1.0\n").unwrap();
        assert!(vacuum(Some(&path)).is_err());
    }

    #[test]
    fn test_round3_ties_to_even() {
        assert_eq!(round3(0.0025), 0.002);
        assert_eq!(round3(2.5014), 2.501);
    }

    #[test]
    fn test_fmt3_reparse() {
        assert_eq!(fmt3_reparse(2.50149), 2.501);
        assert!(fmt3_reparse(f64::NAN).is_nan());
    }
}
