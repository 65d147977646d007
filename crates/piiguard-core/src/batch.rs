//! 批量扫描：遍历目录，逐文件检查，并以 JSON 数组流式写出
//!
//! 每个文件都经由 `FileSource` 取文本、`Session::scan` 扫描；读不出来的文件单独记为
//! `error` 项，不会写成空结果。
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::options::{BatchOptions, BatchStats};
use crate::session::Session;
use crate::source::{FileSource, TextSource};
use crate::types::ScanResult;

/// 单个文件的检查结果
#[derive(Debug)]
enum FileOutcome {
    Scanned(ScanResult),
    Unavailable(String),
}

#[derive(Serialize)]
struct ResultItem<'a> {
    path: String,
    result: &'a ScanResult,
}

#[derive(Serialize)]
struct ErrorItem<'a> {
    path: String,
    error: &'a str,
}

/// 扫描目录并将结果以 JSON 数组流式写入 `out`
/// 稳定性保证：先收集文件并按路径排序，输出顺序与线程数无关
pub fn scan_dir_and_write(
    input_dir: &Path,
    out: &mut dyn Write,
    opts: &BatchOptions,
    session: &Session,
) -> Result<BatchStats> {
    let files = collect_files(input_dir, opts.recursive);
    tracing::info!(files = files.len(), dir = ?input_dir, "collected files");

    let threads = opts.threads.unwrap_or_else(num_cpus::get);
    let mut writer = ItemWriter::new(out);

    if threads > 1 && files.len() > 1 {
        scan_parallel(&files, &mut writer, opts, session, threads)?;
    } else {
        writer.begin()?;
        for path in &files {
            let outcome = check_file(path, opts.max_file_size, session);
            writer.write(path, &outcome)?;
        }
    }

    writer.finish()
}

/// 遍历输入目录；非递归时深度限制为 1
fn collect_files(input_dir: &Path, recursive: bool) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(input_dir).min_depth(1);
    if !recursive {
        walker = walker.max_depth(1);
    }
    let mut files: Vec<PathBuf> = vec![];
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if entry.file_type().is_file() { files.push(entry.into_path()); }
    }
    files.sort();
    files
}

fn check_file(path: &Path, max_file_size: Option<u64>, session: &Session) -> FileOutcome {
    let mut source = FileSource::new(path).with_max_file_size(max_file_size);
    match source.get_text() {
        Ok(text) => FileOutcome::Scanned(session.scan(&text)),
        Err(e) => {
            tracing::debug!(?path, error = %e, "file unavailable");
            FileOutcome::Unavailable(e.to_string())
        }
    }
}

/// 并行调度：
/// - Rayon 线程池并行检查
/// - 单线程 Writer 按 idx 重排后写出，保证稳定顺序
fn scan_parallel(
    files: &[PathBuf],
    writer: &mut ItemWriter<'_>,
    opts: &BatchOptions,
    session: &Session,
    threads: usize,
) -> Result<()> {
    use crossbeam_channel as channel;
    use rayon::prelude::*;
    use std::collections::BTreeMap;

    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    let (tx, rx) = channel::bounded::<(usize, FileOutcome)>(256);
    let max_file_size = opts.max_file_size;

    writer.begin()?;

    // 扫描在作用域线程中执行，Writer 留在当前线程
    std::thread::scope(|scope| -> Result<()> {
        // Receiver 随闭包返回一同释放，写出出错时扫描线程不会阻塞在满通道上
        let rx = rx;
        scope.spawn(move || {
            pool.install(|| {
                files.par_iter().enumerate().for_each_with(tx, |tx, (idx, path)| {
                    let _ = tx.send((idx, check_file(path, max_file_size, session)));
                });
            });
            // 结束后 Sender 全部被丢弃，Receiver 将收到关闭信号
        });

        let mut next_idx: usize = 0;
        let mut pending: BTreeMap<usize, FileOutcome> = BTreeMap::new();
        while let Ok((idx, outcome)) = rx.recv() {
            pending.insert(idx, outcome);
            while let Some(outcome) = pending.remove(&next_idx) {
                writer.write(&files[next_idx], &outcome)?;
                next_idx += 1;
            }
        }
        Ok(())
    })
}

/// JSON 数组的流式写出与计数
struct ItemWriter<'w> {
    out: &'w mut dyn Write,
    first: bool,
    stats: BatchStats,
}

impl<'w> ItemWriter<'w> {
    fn new(out: &'w mut dyn Write) -> Self {
        Self { out, first: true, stats: BatchStats::default() }
    }

    fn begin(&mut self) -> Result<()> {
        write!(self.out, "[")?;
        Ok(())
    }

    fn write(&mut self, path: &Path, outcome: &FileOutcome) -> Result<()> {
        if !self.first { write!(self.out, ",")?; } else { self.first = false; }
        let path = path.display().to_string();
        match outcome {
            FileOutcome::Scanned(result) => {
                self.stats.files_scanned += 1;
                if !result.is_empty() { self.stats.files_flagged += 1; }
                serde_json::to_writer(&mut *self.out, &ResultItem { path, result })?;
            }
            FileOutcome::Unavailable(error) => {
                self.stats.files_unavailable += 1;
                serde_json::to_writer(&mut *self.out, &ErrorItem { path, error })?;
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<BatchStats> {
        write!(self.out, "]")?;
        Ok(self.stats)
    }
}
