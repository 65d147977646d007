use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use piiguard_core::{
    scan_dir_and_write, BatchOptions, BatchStats, ConsoleSink, FileSource, GuardConfig,
    IndexAttribution, ReaderSource, Session, TextSource,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "piiguard", version, about = "检测文档中的敏感个人信息（PII）")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 扫描单个文档并输出 ScanResult（JSON）
    Scan {
        /// 输入文件；"-" 表示标准输入
        #[arg(long, default_value = "-")]
        input: PathBuf,

        #[command(flatten)]
        common: CommonArgs,

        /// 缩进输出
        #[arg(long)]
        pretty: bool,
    },
    /// 检查单个文档并以通知形式打印结果；文档不可读时以非零状态退出
    Verify {
        /// 输入文件；"-" 表示标准输入
        #[arg(long, default_value = "-")]
        input: PathBuf,

        #[command(flatten)]
        common: CommonArgs,

        /// 命中时不打印原始值
        #[arg(long)]
        hide_values: bool,

        /// 无命中时也打印一条提示
        #[arg(long)]
        announce_clean: bool,
    },
    /// 扫描目录并生成 JSON 数组
    Batch {
        /// 输入目录
        #[arg(long)]
        input: PathBuf,

        /// 输出文件（JSON 数组）
        #[arg(long, default_value = "./result.json")]
        output: PathBuf,

        #[command(flatten)]
        common: CommonArgs,

        /// 线程数（"auto"=CPU 核心数）
        #[arg(long, default_value = "auto")]
        threads: String,

        /// 最大扫描文件大小（单位字节，例如 5242880 代表 5MB）
        #[arg(long)]
        max_file_size: Option<u64>,

        /// 递归扫描子目录
        #[arg(long)]
        recursive: bool,
    },
    /// 按优先级列出规则表中的类别
    Rules {
        #[command(flatten)]
        common: CommonArgs,
    },
}

/// 各子命令共用的参数；命令行优先于配置文件
#[derive(Args, Debug)]
struct CommonArgs {
    /// 配置文件路径（TOML）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 规则文件路径（TOML），默认使用内置规则表
    #[arg(long)]
    rules: Option<PathBuf>,

    /// 报告所有命中类别，而不是只报告优先级最高的一个
    #[arg(long)]
    all: bool,

    /// 命中偏移的计算方式
    #[arg(long, value_enum)]
    index: Option<IndexArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum IndexArg {
    MatchOffset,
    FirstOccurrence,
}

impl CommonArgs {
    fn resolve(&self) -> Result<GuardConfig> {
        let mut cfg = match &self.config {
            Some(p) => GuardConfig::load(p)?,
            None => GuardConfig::default(),
        };
        if let Some(r) = &self.rules { cfg.rules_path = Some(r.clone()); }
        if self.all { cfg.policy.stop_at_first_match = false; }
        if let Some(i) = self.index {
            cfg.policy.index = match i {
                IndexArg::MatchOffset => IndexAttribution::MatchOffset,
                IndexArg::FirstOccurrence => IndexAttribution::FirstOccurrence,
            };
        }
        Ok(cfg)
    }
}

fn main() -> Result<ExitCode> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { input, common, pretty } => {
            let session = common.resolve()?.session()?;
            let text = open_source(&input)
                .get_text()
                .with_context(|| format!("read {}", input.display()))?;
            let result = session.scan(&text);

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            if pretty {
                serde_json::to_writer_pretty(&mut out, &result)?;
            } else {
                serde_json::to_writer(&mut out, &result)?;
            }
            writeln!(out)?;
        }
        Commands::Verify { input, common, hide_values, announce_clean } => {
            let mut cfg = common.resolve()?;
            if hide_values { cfg.report.reveal_values = false; }
            if announce_clean { cfg.report.announce_clean = true; }
            let session = cfg.session()?;

            let mut sink = ConsoleSink::new(std::io::stdout());
            let mut source = open_source(&input);
            if let Err(e) = session.verify(source.as_mut(), &mut sink) {
                warn!(error = %e, "could not check document");
                return Ok(ExitCode::from(2));
            }
        }
        Commands::Batch { input, output, common, threads, max_file_size, recursive } => {
            info!(?input, ?output, "starting batch scan");
            let session = common.resolve()?.session()?;

            let file = File::create(&output).context("create output file")?;
            let opts = BatchOptions { max_file_size, threads: parse_threads(&threads), recursive };
            let stats = write_batch(&input, file, &opts, &session)?;

            info!(
                files_scanned = stats.files_scanned,
                files_flagged = stats.files_flagged,
                files_unavailable = stats.files_unavailable,
                "batch scan finished"
            );
        }
        Commands::Rules { common } => {
            let registry = common.resolve()?.registry()?;
            for (i, def) in registry.iter().enumerate() {
                println!("{:>2}. {:<16} {}", i + 1, def.category(), def.display_name());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 日志写到 stderr，stdout 留给扫描结果
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 以缓冲方式写出批量结果（JSON 数组）；最终冲刷失败同样视为失败，避免留下截断的结果文件
fn write_batch<W: Write>(input: &Path, out: W, opts: &BatchOptions, session: &Session) -> Result<BatchStats> {
    let mut out = BufWriter::new(out);
    let stats = scan_dir_and_write(input, &mut out, opts, session).context("batch scan failed")?;
    out.flush().context("flush output file")?;
    Ok(stats)
}

/// "-" 为标准输入，其余按文件路径处理
fn open_source(input: &Path) -> Box<dyn TextSource> {
    if input.as_os_str() == "-" {
        Box::new(ReaderSource::new(std::io::stdin(), "<stdin>"))
    } else {
        Box::new(FileSource::new(input))
    }
}

/// 解析线程参数
fn parse_threads(s: &str) -> Option<usize> {
    if s.eq_ignore_ascii_case("auto") { return None; }
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n),
        _ => None,
    }
}
