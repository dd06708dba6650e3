use anyhow::{Context, Result};
use batch_renamer_core::{
    app_paths, compile_replace_chain, load_profiles, Batch, BatchFile, CaseConversion, DiskFile,
    Profile, ReplacePattern, TrimBlanks,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Parser)]
#[command(name = "batch-renamer-cli")]
#[command(about = "テンプレートでファイル名を一括リネームします")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Rename(RenameArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
}

#[derive(Debug, Args)]
struct RenameArgs {
    #[arg(long)]
    input: String,
    #[arg(long, default_value_t = false)]
    recursive: bool,
    #[arg(long, default_value_t = false)]
    include_hidden: bool,
    /// 保存済みプロファイル名。未指定時はデフォルトプロファイルを使用します。
    #[arg(long)]
    profile: Option<String>,
    #[arg(long)]
    template: Option<String>,
    #[arg(long)]
    start: Option<i64>,
    #[arg(long)]
    step: Option<i64>,
    /// カウンタ幅。0は自動幅です。
    #[arg(long)]
    width: Option<usize>,
    /// 置換ルール PATTERN=REPLACEMENT。複数指定時は順に適用されます。
    #[arg(long)]
    replace: Vec<String>,
    /// 置換ルールのパターンで大文字小文字を区別します。
    #[arg(long, default_value_t = false)]
    match_case: bool,
    #[arg(long, value_enum)]
    case: Option<CaseMode>,
    #[arg(long, value_enum)]
    trim: Option<TrimMode>,
    /// リネーム前にフォーカスされていたファイル名。
    #[arg(long)]
    focused: Option<String>,
    #[arg(long, default_value_t = false)]
    apply: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CaseMode {
    Unchanged,
    Lower,
    Upper,
    Sentence,
    Initial,
    Toggle,
}

impl From<CaseMode> for CaseConversion {
    fn from(mode: CaseMode) -> Self {
        match mode {
            CaseMode::Unchanged => Self::Unchanged,
            CaseMode::Lower => Self::LowerCase,
            CaseMode::Upper => Self::UpperCase,
            CaseMode::Sentence => Self::SentenceCase,
            CaseMode::Initial => Self::InitialCaps,
            CaseMode::Toggle => Self::ToggleCase,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TrimMode {
    None,
    Leading,
    Trailing,
    Both,
}

impl From<TrimMode> for TrimBlanks {
    fn from(mode: TrimMode) -> Self {
        match mode {
            TrimMode::None => Self::None,
            TrimMode::Leading => Self::Leading,
            TrimMode::Trailing => Self::Trailing,
            TrimMode::Both => Self::LeadingAndTrailing,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct PreviewRow {
    original: String,
    computed: String,
    changed: bool,
    failed: bool,
}

#[derive(Debug, Serialize)]
struct RenameReport {
    rows: Vec<PreviewRow>,
    renamed: usize,
    failed: usize,
    unchanged: usize,
    new_focus: Option<String>,
    applied: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rename(args) => cmd_rename(args),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

fn cmd_rename(args: RenameArgs) -> Result<()> {
    let profile = resolve_profile(&args)?;
    warn_malformed_rules(&profile);

    let input = PathBuf::from(&args.input);
    let files = collect_files(&input, args.recursive, args.include_hidden)?;
    if files.is_empty() {
        anyhow::bail!("対象ファイルがありません: {}", input.display());
    }

    let mut batch = Batch::new(files);
    batch.preview(&profile, None);

    let mut rows = snapshot_rows(&batch);
    let report = if args.apply {
        let outcome = batch.apply(&profile, None, args.focused.as_deref());
        for (row, live) in rows.iter_mut().zip(batch.rows()) {
            row.failed = live.rename_failed;
        }
        RenameReport {
            renamed: outcome.renamed,
            failed: outcome.failed,
            unchanged: outcome.unchanged,
            new_focus: outcome.new_focus,
            applied: true,
            rows,
        }
    } else {
        let unchanged = rows.iter().filter(|r| !r.changed).count();
        RenameReport {
            renamed: 0,
            failed: 0,
            unchanged,
            new_focus: None,
            applied: false,
            rows,
        }
    };

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print_table(&report),
    }

    Ok(())
}

fn resolve_profile(args: &RenameArgs) -> Result<Profile> {
    let store = load_profiles()?;
    let mut profile = match &args.profile {
        Some(name) => store
            .find(name)
            .with_context(|| format!("プロファイルが見つかりません: {name}"))?
            .clone(),
        None => store.default_profile.clone(),
    };

    if let Some(template) = &args.template {
        profile.template = template.clone();
    }
    if let Some(start) = args.start {
        profile.counter_start = start;
    }
    if let Some(step) = args.step {
        profile.counter_step = step;
    }
    if let Some(width) = args.width {
        profile.counter_width = width;
    }
    if !args.replace.is_empty() {
        profile.patterns = args
            .replace
            .iter()
            .map(|rule| parse_replace_rule(rule, args.match_case))
            .collect::<Result<Vec<_>>>()?;
    }
    if let Some(case) = args.case {
        profile.case_conversion = case.into();
    }
    if let Some(trim) = args.trim {
        profile.trim_blanks = trim.into();
    }
    Ok(profile)
}

fn parse_replace_rule(rule: &str, match_case: bool) -> Result<ReplacePattern> {
    let (pattern, replacement) = rule
        .split_once('=')
        .with_context(|| format!("置換ルールは PATTERN=REPLACEMENT 形式で指定してください: {rule}"))?;
    Ok(ReplacePattern {
        pattern: pattern.to_string(),
        replacement: replacement.to_string(),
        match_case,
    })
}

fn warn_malformed_rules(profile: &Profile) {
    for (rule, compiled) in profile
        .patterns
        .iter()
        .zip(compile_replace_chain(&profile.patterns))
    {
        if !compiled.well_formed {
            eprintln!(
                "正規表現が不正なためスキップします: {}",
                rule.pattern
            );
        }
    }
}

fn collect_files(
    root: &Path,
    recursive: bool,
    include_hidden: bool,
) -> Result<Vec<Box<dyn BatchFile>>> {
    if !root.exists() {
        anyhow::bail!("入力フォルダが存在しません: {}", root.display());
    }

    let mut paths = Vec::new();
    if recursive {
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry =
                entry.with_context(|| format!("フォルダ走査に失敗しました: {}", root.display()))?;
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            if is_hidden(path) && !include_hidden {
                continue;
            }
            paths.push(path.to_path_buf());
        }
    } else {
        for entry in fs::read_dir(root)
            .with_context(|| format!("フォルダを読めませんでした: {}", root.display()))?
        {
            let entry =
                entry.with_context(|| format!("エントリ読み取り失敗: {}", root.display()))?;
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            if is_hidden(&path) && !include_hidden {
                continue;
            }
            paths.push(path);
        }
        paths.sort();
    }

    Ok(paths
        .into_iter()
        .map(|path| Box::new(DiskFile::new(path)) as Box<dyn BatchFile>)
        .collect())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

fn snapshot_rows(batch: &Batch) -> Vec<PreviewRow> {
    batch
        .rows()
        .iter()
        .map(|row| PreviewRow {
            original: row.original_name.clone(),
            computed: row.computed_name.clone(),
            changed: row.computed_name != row.original_name,
            failed: row.rename_failed,
        })
        .collect()
}

fn print_table(report: &RenameReport) {
    println!("元ファイル名 -> 新ファイル名");
    for row in &report.rows {
        let marker = if row.failed {
            " [失敗]"
        } else if !row.changed {
            " [変更なし]"
        } else {
            ""
        };
        println!("{} -> {}{}", row.original, row.computed, marker);
    }

    if report.applied {
        eprintln!(
            "適用完了: {}件 (失敗 {}件, 変更なし {}件)",
            report.renamed, report.failed, report.unchanged
        );
        if let Some(focus) = &report.new_focus {
            eprintln!("フォーカス: {focus}");
        }
    } else {
        eprintln!("dry-runモード: 実ファイルは変更していません。適用するには --apply を指定してください。");
    }
}

fn cmd_config_show() -> Result<()> {
    let store = load_profiles()?;
    let paths = app_paths()?;
    println!("プロファイル: {}", paths.profiles_path.display());
    println!("{}", toml::to_string_pretty(&store)?);
    Ok(())
}
