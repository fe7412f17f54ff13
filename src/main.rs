use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use vllm_cpu_detect::config::{DEFAULT_COMMAND_TIMEOUT_SECS, DetectConfig, OutputFormat};

/// vllm-cpu-detect - recommend the best vLLM CPU package for this machine
///
/// Inspects the CPU's AVX512 and AMX support and prints the most capable
/// prebuilt package the host can run.
///
/// Exits with 0 when the recommendation is backed by detected features (or
/// by the architecture alone), and 1 when detection found nothing and the
/// base package was chosen as a fallback. Exits with 3 when the report could
/// not be written.
#[derive(Parser, Debug)]
#[command(author, version = env!("VLLM_CPU_DETECT_VERSION"), about)]
struct Cli {
    /// Seconds to wait for each external inventory command (also via VLLM_CPU_DETECT_TIMEOUT)
    #[arg(
        long,
        env = "VLLM_CPU_DETECT_TIMEOUT",
        value_name = "SECS",
        default_value_t = DEFAULT_COMMAND_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,

    /// CPU descriptor file read on Linux (also via VLLM_CPU_DETECT_CPUINFO)
    #[arg(long, env = "VLLM_CPU_DETECT_CPUINFO", value_name = "PATH")]
    cpuinfo: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print only the recommended package name
    #[arg(long)]
    package_only: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = DetectConfig::new(cli.cpuinfo, cli.timeout, cli.format, cli.package_only)?;
    let runtime = vllm_cpu_detect::runtime::RealRuntime;

    let mut stdout = std::io::stdout().lock();
    let result = vllm_cpu_detect::app::run(&runtime, &config, &mut stdout).await;
    if let Err(err) = &result {
        log::error!("Failed to write report: {:#}", err);
    }
    Ok(ExitCode::from(vllm_cpu_detect::app::exit_code(&result)))
}
