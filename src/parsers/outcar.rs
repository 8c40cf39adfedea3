//! # VASP OUTCAR 芯态本征能量解析器
//!
//! 解析 ICORELEVEL 计算输出的芯态本征能量块。
//!
//! ## 块格式说明
//! ```text
//!    NIONS =      4
//!  ...
//!  the core state eigenenergies are
//!   1-  1s  -505.1234  2s   -60.1234
//!       2p   -35.1234
//!   2-  1s  -505.2345  2s   -60.2345
//!  ...
//!  E-fermi :  -1.2345
//! ```
//! 奇数个字段的行开启一个新离子（首字段为序号），偶数行延续上一离子。
//! 同一轨道的能量随离子步重复出现时按顺序累积，末项为最终离子步。
//!
//! ## 依赖关系
//! - 被 `surface/core_level.rs` 使用
//! - 使用 `parsers/mod.rs` 的 gzip 回退读取

use crate::error::Result;
use crate::parsers;
use std::collections::HashMap;
use std::path::Path;

/// 每个离子的轨道 -> 本征能量序列
pub type CoreStateEigen = Vec<HashMap<String, Vec<f64>>>;

/// 解析 OUTCAR 的芯态本征能量，明文缺失时回退 OUTCAR.gz
pub fn parse_core_state_eigen(path: &Path) -> Result<CoreStateEigen> {
    let content = parsers::read_text_with_gz_fallback(path)?;
    Ok(read_core_state_eigen(&content))
}

/// 从 OUTCAR 内容提取芯态本征能量
pub fn read_core_state_eigen(content: &str) -> CoreStateEigen {
    let lines: Vec<&str> = content.lines().collect();
    let mut eigen: CoreStateEigen = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        if let Some(pos) = line.find("NIONS =") {
            if let Ok(n) = line[pos + 7..].trim().parse::<usize>() {
                eigen = vec![HashMap::new(); n];
            }
        }

        if line.contains("the core state eigen") {
            let mut iat: isize = -1;
            i += 1;
            while i < lines.len() {
                let line = lines[i];
                if line.contains("E-fermi") {
                    break;
                }

                let data: Vec<&str> = line.split_whitespace().collect();
                let mut start = 0;
                if data.len() % 2 == 1 {
                    // 新离子条目，首字段为序号
                    iat += 1;
                    start = 1;
                }

                if iat >= 0 && (iat as usize) < eigen.len() {
                    let entry = &mut eigen[iat as usize];
                    let mut j = start;
                    while j + 1 < data.len() {
                        if let Ok(v) = data[j + 1].parse::<f64>() {
                            entry.entry(data[j].to_string()).or_default().push(v);
                        }
                        j += 2;
                    }
                }
                i += 1;
            }
        }

        i += 1;
    }

    eigen
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
   ions per type =               2   2
   NIONS =      4

 the core state eigenenergies are
  1-  1s  -505.1000  2s   -60.1000
  2-  1s  -505.2000  2s   -60.2000
  3-  1s  -430.3000
  4-  1s  -430.4000
 E-fermi :  -1.2345

 the core state eigenenergies are
  1-  1s  -506.1000  2s   -61.1000
  2-  1s  -506.2000  2s   -61.2000
  3-  1s  -431.3000
  4-  1s  -431.4000
 E-fermi :  -1.3345
";

    #[test]
    fn test_per_ion_orbital_map() {
        let eigen = read_core_state_eigen(SAMPLE);
        assert_eq!(eigen.len(), 4);
        assert_eq!(eigen[0]["1s"], vec![-505.1, -506.1]);
        assert_eq!(eigen[1]["2s"], vec![-60.2, -61.2]);
        assert!(eigen[2].get("2s").is_none());
    }

    #[test]
    fn test_last_entry_is_final_ionic_step() {
        let eigen = read_core_state_eigen(SAMPLE);
        assert_eq!(*eigen[3]["1s"].last().unwrap(), -431.4);
    }

    #[test]
    fn test_continuation_line() {
        let content = "\
   NIONS =      1

 the core state eigen
  1-  1s  -500.0000  2s   -55.0000
      2p   -30.0000  3s    -5.0000
 E-fermi :   0.5
";
        let eigen = read_core_state_eigen(content);
        assert_eq!(eigen.len(), 1);
        assert_eq!(eigen[0]["2p"], vec![-30.0]);
        assert_eq!(eigen[0]["3s"], vec![-5.0]);
    }

    #[test]
    fn test_no_core_block() {
        let content = "   NIONS =      2\n nothing else here\n";
        let eigen = read_core_state_eigen(content);
        assert_eq!(eigen.len(), 2);
        assert!(eigen[0].is_empty());
    }
}
