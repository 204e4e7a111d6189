use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use quest_extractor::{CollisionPolicy, ExtractConfig, QuestExtractor, RunReport};

#[derive(Parser)]
#[command(name = "quest_extractor")]
#[command(about = "从任务 SNBT 文件中提取中文文本，替换为占位符并生成翻译表")]
#[command(version = "0.1.0")]
struct Cli {
    /// 输入根目录（默认 quests）
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// 输出根目录（默认 out）
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON 配置文件，命令行参数会覆盖其中的设置
    #[arg(long)]
    config: Option<PathBuf>,

    /// 文档标识字段
    #[arg(long)]
    id_field: Option<String>,

    /// 占位符命名空间
    #[arg(long)]
    namespace: Option<String>,

    /// 翻译表文件名
    #[arg(long)]
    table_name: Option<String>,

    /// 翻译表分隔符
    #[arg(long)]
    delimiter: Option<String>,

    /// 源语言列表头
    #[arg(long)]
    source_lang: Option<String>,

    /// 目标语言列表头
    #[arg(long)]
    target_lang: Option<String>,

    /// 严格模式：拒绝产生占位符冲突的文档
    #[arg(long)]
    strict: bool,

    /// 顺序处理文档（不使用并行）
    #[arg(long)]
    sequential: bool,

    /// 同时输出 JSON 格式的翻译表
    #[arg(long)]
    json: bool,

    /// 将运行报告以 JSON 写入指定文件
    #[arg(long)]
    report: Option<PathBuf>,

    /// 显示提取统计信息
    #[arg(long)]
    stats: bool,

    /// 静默模式(仅输出警告和错误)
    #[arg(long, conflicts_with = "verbose")]
    quiet: bool,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = build_config(&cli)?;
    let extractor = QuestExtractor::new(config).context("配置无效")?;

    let report = extractor.run().with_context(|| {
        format!("提取失败: {}", extractor.config().input_dir.display())
    })?;

    if let Some(report_path) = &cli.report {
        save_report(&report, report_path)?;
    }

    print_summary(&cli, &report);
    Ok(())
}

/// 初始化日志，RUST_LOG 优先
fn init_logging(cli: &Cli) {
    let default_level = if cli.quiet {
        "warn"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 合并配置文件与命令行参数
fn build_config(cli: &Cli) -> Result<ExtractConfig> {
    let mut config = match &cli.config {
        Some(path) => ExtractConfig::from_file(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?,
        None => ExtractConfig::default(),
    };

    if let Some(input) = &cli.input {
        config.input_dir = input.clone();
    }
    if let Some(output) = &cli.output {
        config.output_dir = output.clone();
    }
    if let Some(id_field) = &cli.id_field {
        config.id_field = id_field.clone();
    }
    if let Some(namespace) = &cli.namespace {
        config.placeholder_namespace = namespace.clone();
    }
    if let Some(table_name) = &cli.table_name {
        config.table_name = table_name.clone();
    }
    if let Some(delimiter) = &cli.delimiter {
        config.table_format.delimiter = delimiter.clone();
    }
    if let Some(source_lang) = &cli.source_lang {
        config.table_format.source_lang = source_lang.clone();
    }
    if let Some(target_lang) = &cli.target_lang {
        config.table_format.target_lang = target_lang.clone();
    }
    if cli.strict {
        config.collision_policy = CollisionPolicy::Reject;
    }
    if cli.sequential {
        config.parallel = false;
    }
    if cli.json {
        config.emit_json = true;
    }

    Ok(config)
}

/// 写出 JSON 运行报告
fn save_report(report: &RunReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("序列化运行报告失败")?;
    std::fs::write(path, json).with_context(|| format!("写入运行报告失败: {}", path.display()))
}

/// 打印提取摘要信息
fn print_summary(cli: &Cli, report: &RunReport) {
    if cli.stats {
        println!("{}", report);
        return;
    }
    if cli.quiet {
        return;
    }

    println!(
        "处理了 {}/{} 个文档，提取到 {} 个翻译条目",
        report.documents_written, report.documents_found, report.entry_count
    );
    if let Some(table_path) = &report.table_path {
        println!("翻译表已写入: {}", table_path.display());
    }
    if !report.collisions.is_empty() {
        println!("发现 {} 个占位符冲突（后写入者覆盖）", report.collisions.len());
    }
    if !report.is_clean() {
        eprintln!("{} 个文档处理失败:", report.failures.len());
        for failure in &report.failures {
            eprintln!("  [{}] {}: {}", failure.stage, failure.path.display(), failure.message);
        }
    }
}
