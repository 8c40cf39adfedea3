//! # 解析器模块
//!
//! 提供 VASP 结构文件和输出文件的解析器。
//!
//! 输出文件可能是 gzip 压缩形式 (vasprun.xml.gz, LOCPOT.gz, OUTCAR.gz)。
//! 压缩形式只作为明文缺失时的回退，两者都不存在为致命错误。
//!
//! ## 依赖关系
//! - 被 `surface/`, `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar, vasprun, outcar, locpot

pub mod locpot;
pub mod outcar;
pub mod poscar;
pub mod vasprun;

use crate::error::{Result, SurfdataError};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 读取文件为字符串。文件名以 .gz 结尾时先解压。
pub fn read_text(path: &Path) -> Result<String> {
    let is_gz = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    let file = File::open(path).map_err(|e| SurfdataError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut content = String::new();
    if is_gz {
        GzDecoder::new(file)
            .read_to_string(&mut content)
            .map_err(|e| SurfdataError::FileReadError {
                path: path.display().to_string(),
                source: e,
            })?;
    } else {
        let mut file = file;
        file.read_to_string(&mut content)
            .map_err(|e| SurfdataError::FileReadError {
                path: path.display().to_string(),
                source: e,
            })?;
    }

    Ok(content)
}

/// 读取文件，明文缺失时回退到 `<path>.gz`
pub fn read_text_with_gz_fallback(path: &Path) -> Result<String> {
    if path.exists() {
        return read_text(path);
    }

    let gz = gz_sibling(path);
    if gz.exists() {
        return read_text(&gz);
    }

    Err(SurfdataError::FileNotFound {
        path: path.display().to_string(),
    })
}

/// `<path>.gz`
fn gz_sibling(path: &Path) -> std::path::PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".gz");
    std::path::PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_read_text_plain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        std::fs::write(&path, "hello").unwrap();
        assert_eq!(read_text(&path).unwrap(), "hello");
    }

    #[test]
    fn test_read_text_gz() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt.gz");
        let file = File::create(&path).unwrap();
        let mut enc = GzEncoder::new(file, Compression::default());
        enc.write_all(b"compressed content").unwrap();
        enc.finish().unwrap();

        assert_eq!(read_text(&path).unwrap(), "compressed content");
    }

    #[test]
    fn test_gz_fallback_order() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("OUTCAR");
        let gz = dir.path().join("OUTCAR.gz");

        let file = File::create(&gz).unwrap();
        let mut enc = GzEncoder::new(file, Compression::default());
        enc.write_all(b"from gz").unwrap();
        enc.finish().unwrap();

        // 只有 .gz 时走回退
        assert_eq!(read_text_with_gz_fallback(&plain).unwrap(), "from gz");

        // 明文出现后优先明文
        std::fs::write(&plain, "from plain").unwrap();
        assert_eq!(read_text_with_gz_fallback(&plain).unwrap(), "from plain");
    }

    #[test]
    fn test_gz_fallback_neither_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("vasprun.xml");
        let err = read_text_with_gz_fallback(&missing).unwrap_err();
        assert!(matches!(err, SurfdataError::FileNotFound { .. }));
    }
}
