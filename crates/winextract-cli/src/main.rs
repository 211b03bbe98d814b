use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use winextract_core::extract::{ExtractConfig, Extractor, ProgressSink};

#[derive(Debug, Parser)]
#[command(name = "winextract")]
#[command(about = "Extract window/door measurements from DXF drawings.")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Extract {
        input: PathBuf,
        #[arg(long)]
        report: Option<PathBuf>,
        #[arg(long)]
        dump_document: Option<PathBuf>,
        #[arg(long, default_value = "PJ")]
        window_layer: String,
        #[arg(long, default_value = "TKA4")]
        frame_block: String,
        #[arg(long, default_value = "SC")]
        info_block: String,
        #[arg(long)]
        annotation_layer: Option<String>,
        #[arg(long, default_value_t = 20.0)]
        window_gap: f64,
        #[arg(long, default_value_t = 30.0)]
        annotation_gap: f64,
        #[arg(long, default_value_t = 1.0)]
        verify_epsilon: f64,
        #[arg(long, default_value_t = 500.0)]
        row_tolerance: f64,
    },
}

struct LogProgress;

impl ProgressSink for LogProgress {
    fn progress(&mut self, percent: u8, label: &str) {
        log::info!("{label}: {percent}%");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.cmd {
        Command::Extract {
            input,
            report,
            dump_document,
            window_layer,
            frame_block,
            info_block,
            annotation_layer,
            window_gap,
            annotation_gap,
            verify_epsilon,
            row_tolerance,
        } => {
            let cfg = ExtractConfig {
                window_layer,
                frame_block,
                info_block,
                annotation_layer,
                window_gap,
                annotation_gap,
                verify_epsilon,
                row_tolerance,
            };
            extract(&input, report.as_deref(), dump_document.as_deref(), cfg)
        }
    }
}

fn extract(
    input: &Path,
    report: Option<&Path>,
    dump_document: Option<&Path>,
    cfg: ExtractConfig,
) -> Result<()> {
    ensure_input_file(input)?;

    let ext = input
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "dxf" => {}
        "dwg" => bail!("DWG input is not supported; export the drawing as ASCII DXF first."),
        _ => bail!("Unsupported input extension: .{ext}"),
    }

    let document = winextract_import_dxf::import_dxf(input)?;

    if let Some(path) = dump_document {
        let json = serde_json::to_string_pretty(&document).context("serialize document")?;
        write_output(path, &json).with_context(|| format!("write document: {path:?}"))?;
    }

    let source = input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("drawing");
    let extractor = Extractor::new(cfg);
    let report_data = extractor.extract(source, &document, &mut LogProgress);

    for warning in &report_data.warnings {
        log::warn!("[{}] {}", warning.code, warning.message);
    }
    log::info!(
        "{} page(s), {} window(s), {} unverified",
        report_data.summary.pages,
        report_data.summary.windows,
        report_data.summary.unverified_windows
    );

    let json = serde_json::to_string_pretty(&report_data).context("serialize report")?;
    if let Some(path) = report {
        write_output(path, &json).with_context(|| format!("write report: {path:?}"))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

fn write_output(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    std::fs::write(path, contents)
}

fn ensure_input_file(input: &Path) -> Result<()> {
    match std::fs::metadata(input) {
        Ok(meta) => {
            if meta.is_file() {
                Ok(())
            } else {
                bail!("input is not a file: {input:?}");
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            bail!("input not found: {input:?} (cwd: {cwd:?}).");
        }
        Err(err) => Err(err).with_context(|| format!("stat input: {input:?}")),
    }
}
