//! 把文件集合打包成 zip。
//!
//! 条目按文件集合的插入顺序写入，所有时间戳固定为 zip 纪元（1980-01-01），
//! 因此相同的文件集合总是得到逐字节相同的归档。

use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::{ExportError, Result};
use crate::export::FileSet;

pub const ARCHIVE_EXTENSION: &str = "zip";

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644)
}

/// 在内存中组装归档；失败时不返回任何部分结果
pub fn assemble(files: &FileSet) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for file in files {
        writer.start_file(file.path.as_str(), entry_options())?;
        writer.write_all(file.contents.as_bytes())?;
    }
    let cursor = writer.finish()?;
    let bytes = cursor.into_inner();
    tracing::debug!(entries = files.len(), bytes = bytes.len(), "archive assembled");
    Ok(bytes)
}

/// 异步写入归档文件
///
/// 压缩在阻塞线程池上完成，只有整个归档组装成功后才会落盘。
pub async fn write_archive(files: FileSet, path: impl AsRef<Path>) -> Result<u64> {
    let bytes = tokio::task::spawn_blocking(move || assemble(&files))
        .await
        .map_err(|e| ExportError::Archive(format!("archive task failed: {}", e)))??;
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, &bytes).await?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "archive written");
    Ok(bytes.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn sample() -> FileSet {
        FileSet::new()
            .with("README.md", "# hello\n")
            .with("src/index.ts", "console.log(1);\n")
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let first = assemble(&sample()).unwrap();
        let second = assemble(&sample()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_assemble_preserves_order_and_contents() {
        let bytes = assemble(&sample()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_index(0).unwrap().name(), "README.md");
        assert_eq!(archive.by_index(1).unwrap().name(), "src/index.ts");

        let mut contents = String::new();
        archive
            .by_name("src/index.ts")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "console.log(1);\n");
    }

    #[test]
    fn test_empty_file_set() {
        let bytes = assemble(&FileSet::new()).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[tokio::test]
    async fn test_write_archive_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("demo-runtime.zip");
        let written = write_archive(sample(), &path).await.unwrap();
        let on_disk = std::fs::read(&path).unwrap();
        assert_eq!(on_disk.len() as u64, written);
        assert_eq!(on_disk, assemble(&sample()).unwrap());
    }
}
