//! Sequence 命令处理

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

use plp_harness::ProbeSequence;

use crate::commands::common::{self, ProbeOptions};
use crate::config::CliConfig;
use crate::SequenceAction;

pub async fn handle(action: SequenceAction) -> Result<()> {
    match action {
        SequenceAction::Run {
            file,
            base_url,
            timeout,
            session_prefix,
        } => run_sequence(&file, base_url, timeout, session_prefix).await,
        SequenceAction::List => list_sequences().await,
    }
}

/// 从文件加载序列 (按扩展名区分 YAML/JSON)
fn load_sequence(path: &Path) -> Result<ProbeSequence> {
    let ext = path.extension().and_then(|s| s.to_str());

    let sequence = match ext {
        Some("yaml") | Some("yml") => ProbeSequence::from_yaml_file(path)?,
        Some("json") => ProbeSequence::from_json_file(path)?,
        _ => anyhow::bail!("不支持的序列文件格式，仅支持 .yaml/.yml 或 .json"),
    };

    Ok(sequence)
}

async fn run_sequence(
    file: &str,
    base_url: Option<String>,
    timeout: Option<u64>,
    session_prefix: Option<String>,
) -> Result<()> {
    let path = Path::new(file);

    // 加载序列
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap()
    );
    spinner.set_message(format!("加载序列: {}", file));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let sequence = load_sequence(path)?;

    spinner.finish_with_message(format!(
        "{} 序列加载成功: {}",
        "✓".green().bold(),
        sequence.name.cyan()
    ));

    let config = CliConfig::load()?;

    let options = ProbeOptions {
        base_url: base_url.unwrap_or(config.gateway_url),
        timeout_per_step: timeout.unwrap_or(config.timeout_per_step),
        session_prefix: session_prefix.unwrap_or(config.session_id_prefix),
    };

    println!();
    common::execute(&sequence, &options).await
}

async fn list_sequences() -> Result<()> {
    let config = CliConfig::load()?;
    let sequence_dir = config.get_sequence_dir();

    if !sequence_dir.exists() {
        println!("{}", format!("序列目录不存在: {:?}", sequence_dir).yellow());
        println!("\n可以通过设置配置文件中的 sequence_dir 来指定序列目录");
        return Ok(());
    }

    println!("{}\n", format!("序列目录: {:?}", sequence_dir).bold());

    let entries = std::fs::read_dir(&sequence_dir)
        .with_context(|| format!("读取序列目录失败: {:?}", sequence_dir))?;

    let mut sequences = Vec::new();

    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let ext = path.extension().and_then(|s| s.to_str());
        if ext != Some("yaml") && ext != Some("yml") && ext != Some("json") {
            continue;
        }

        if let Ok(sequence) = load_sequence(&path) {
            sequences.push((path, sequence));
        }
    }

    if sequences.is_empty() {
        println!("{}", "没有找到任何序列文件".yellow());
        return Ok(());
    }

    println!("找到 {} 个序列:\n", sequences.len().to_string().green());

    for (path, sequence) in sequences {
        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            println!("{}", file_name.cyan().bold());
        }
        println!("  名称: {}", sequence.name);

        if let Some(desc) = &sequence.description {
            println!("  描述: {}", desc.bright_black());
        }

        println!("  步骤: {}", sequence.steps.len().to_string().yellow());

        if !sequence.tags.is_empty() {
            println!("  标签: {}", sequence.tags.join(", ").bright_black());
        }

        println!();
    }

    Ok(())
}
