//! 文本来源（宿主文档正文的提供方）
//!
//! 核心每次扫描只调用一次 `get_text`，失败时不重试；任何失败都以 `SourceError`
//! 返回，绝不折算成空扫描结果。
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::SourceError;

/// 文本来源能力
pub trait TextSource {
    fn get_text(&mut self) -> Result<String, SourceError>;
}

/// 内存中的现成文本
#[derive(Debug, Clone)]
pub struct StaticText(pub String);

impl TextSource for StaticText {
    fn get_text(&mut self) -> Result<String, SourceError> {
        Ok(self.0.clone())
    }
}

/// 本地文件
/// - 超过 `max_file_size` 的文件视为不可用
/// - 明显是二进制的内容视为不可用
/// - 非法 UTF-8 字节做有损转换
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    max_file_size: Option<u64>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), max_file_size: None }
    }

    pub fn with_max_file_size(mut self, max: Option<u64>) -> Self {
        self.max_file_size = max;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn origin(&self) -> String {
        self.path.display().to_string()
    }
}

impl TextSource for FileSource {
    fn get_text(&mut self) -> Result<String, SourceError> {
        let io_err = |source| SourceError::Io { origin: self.origin(), source };
        if let Some(max) = self.max_file_size {
            let size = std::fs::metadata(&self.path).map_err(io_err)?.len();
            if size > max {
                return Err(SourceError::TooLarge { origin: self.origin(), size, max });
            }
        }

        let file = File::open(&self.path).map_err(io_err)?;
        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).map_err(io_err)?;
        decode_text(buf, self.origin())
    }
}

/// 任意 `Read`（CLI 中用于标准输入）
pub struct ReaderSource<R> {
    reader: R,
    origin: String,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R, origin: impl Into<String>) -> Self {
        Self { reader, origin: origin.into() }
    }
}

impl<R: Read> TextSource for ReaderSource<R> {
    fn get_text(&mut self) -> Result<String, SourceError> {
        let mut buf = Vec::new();
        self.reader
            .read_to_end(&mut buf)
            .map_err(|source| SourceError::Io { origin: self.origin.clone(), source })?;
        decode_text(buf, self.origin.clone())
    }
}

fn decode_text(buf: Vec<u8>, origin: String) -> Result<String, SourceError> {
    if is_probably_binary(&buf) {
        return Err(SourceError::Binary { origin });
    }
    match String::from_utf8(buf) {
        Ok(s) => Ok(s),
        Err(e) => Ok(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}

/// 判定缓冲区是否“明显是二进制”
/// - 只要包含任何 NUL 字节（0x00）即认为二进制；
/// - 否则计算可打印比例（ASCII 可打印、tab/CR/LF 与所有非 ASCII 字节），低于 25% 则认为二进制。
fn is_probably_binary(buf: &[u8]) -> bool {
    if buf.is_empty() { return false; }
    if buf.iter().any(|&b| b == 0) { return true; }
    let printable = buf
        .iter()
        .filter(|&&b| matches!(b, 0x09 | 0x0A | 0x0D) || (0x20..=0x7E).contains(&b) || b >= 0x80)
        .count();
    let ratio = printable as f32 / (buf.len() as f32);
    ratio < 0.25
}
