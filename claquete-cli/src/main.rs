// claquete-cli/src/main.rs
//
// Command-line interface for the claquete video compression tool. Parses
// arguments with clap, checks for the required external tools, runs one
// encode job through claquete-core and prints a summary of the result.

use clap::{Parser, Subcommand, ValueEnum};
use claquete_core::{
    CancelToken, CoreConfig, EncodeOptions, EncodeRequest, Job, LocalProcessBackend, PresetChoice,
    SpeedProfile, check_dependency, format_bytes, format_duration_seconds,
};
use owo_colors::OwoColorize;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process;

mod config;
mod progress;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Claquete: video compression tool",
    long_about = "Compresses videos for upload using ffmpeg via the claquete-core library."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compresses a video file into an output directory
    Encode(EncodeArgs),
}

#[derive(Parser, Debug)]
struct EncodeArgs {
    /// Input video file
    #[arg(required = true, value_name = "INPUT_FILE")]
    input_path: PathBuf,

    /// Directory where the compressed file will be saved
    #[arg(required = true, value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Quality/size preset
    #[arg(long, value_enum, default_value_t = PresetArg::Hd)]
    preset: PresetArg,

    /// Quality (CRF): higher means more compression and a smaller file
    #[arg(long, value_name = "CRF", default_value_t = config::DEFAULT_CRF)]
    crf: u8,

    /// Encoder speed
    #[arg(long, value_enum, default_value_t = SpeedArg::Fast)]
    speed: SpeedArg,

    /// Audio bitrate in kbps (128, 160 or 192)
    #[arg(long, value_name = "KBPS", default_value_t = config::DEFAULT_AUDIO_BITRATE_KBPS)]
    audio_bitrate: u32,

    /// Upper bound on encoder threads (defaults to all available CPUs)
    #[arg(long, value_name = "COUNT")]
    threads: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum PresetArg {
    /// HD recommended: downscale anything above 1080p
    Hd,
    /// SD: downscale anything above 720p
    Sd,
    /// Keep original resolution
    Original,
}

impl From<PresetArg> for PresetChoice {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Hd => PresetChoice::TargetHd,
            PresetArg::Sd => PresetChoice::TargetSd,
            PresetArg::Original => PresetChoice::KeepOriginal,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SpeedArg {
    Fast,
    Medium,
}

impl From<SpeedArg> for SpeedProfile {
    fn from(arg: SpeedArg) -> Self {
        match arg {
            SpeedArg::Fast => SpeedProfile::Fast,
            SpeedArg::Medium => SpeedProfile::Medium,
        }
    }
}

// --- Main Logic ---

fn run_encode(args: EncodeArgs) -> Result<(), Box<dyn Error>> {
    if !args.input_path.is_file() {
        return Err(format!(
            "Invalid input path '{}': not a file",
            args.input_path.display()
        )
        .into());
    }

    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")?;

    let size_in = fs::metadata(&args.input_path)?.len();
    println!(
        "{} {} ({})",
        "Input:".bold(),
        args.input_path.display(),
        format_bytes(size_in)
    );
    println!(
        "{} {} | CRF {} | {} | {} kbps audio",
        "Settings:".bold(),
        PresetChoice::from(args.preset).label(),
        args.crf,
        SpeedProfile::from(args.speed).as_str(),
        args.audio_bitrate
    );

    fs::create_dir_all(&args.output_dir)?;
    let config = CoreConfig {
        output_dir: args.output_dir.clone(),
        thread_cap: args.threads,
        ..CoreConfig::default()
    };
    config.validate()?;
    log::debug!("core config: {config:?}");

    let request = EncodeRequest {
        input_path: args.input_path.clone(),
        preset: args.preset.into(),
        options: EncodeOptions {
            crf: args.crf,
            speed: args.speed.into(),
            audio_bitrate_kbps: args.audio_bitrate,
        },
    };

    println!("Encode started: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));

    let bar = progress::encode_bar();
    let sink_bar = bar.clone();
    let mut sink = move |fraction: f64, elapsed_secs: f64, total_secs: f64| {
        sink_bar.set_position((fraction * 100.0).round() as u64);
        sink_bar.set_message(progress::position_message(elapsed_secs, total_secs));
    };

    let backend = LocalProcessBackend::from_config(&config);
    let report = Job::new(request).run(&backend, &config, &mut sink, &CancelToken::new());
    bar.finish_and_clear();

    let stats = report.result?;

    println!("{}", "Compression finished".green().bold());
    println!("{} {}", "Output:".bold(), stats.output_path.display());
    println!("  Encode time: {}", format_duration_seconds(stats.encode_time.as_secs_f64()).bold());
    println!("  Input size:  {}", format_bytes(stats.size_in).bold());
    println!("  Output size: {}", format_bytes(stats.size_out).bold());
    match stats.reduction_pct {
        Some(pct) => println!("  Reduced by:  {}", format!("{pct:.1}%").green().bold()),
        None => println!("  Reduced by:  {}", "n/a (empty input)".yellow()),
    }
    println!("Encode finished: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Encode(args) => args.verbose,
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "warn" }),
    )
    .init();

    let result = match cli.command {
        Commands::Encode(args) => run_encode(args),
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "Error:".red().bold());
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_encode_basic_args() {
        let args = vec!["claquete", "encode", "input.mp4", "out"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Encode(encode_args) => {
                assert_eq!(encode_args.input_path, PathBuf::from("input.mp4"));
                assert_eq!(encode_args.output_dir, PathBuf::from("out"));
                assert!(matches!(encode_args.preset, PresetArg::Hd));
                assert_eq!(encode_args.crf, config::DEFAULT_CRF);
                assert!(matches!(encode_args.speed, SpeedArg::Fast));
                assert_eq!(encode_args.audio_bitrate, config::DEFAULT_AUDIO_BITRATE_KBPS);
                assert!(encode_args.threads.is_none());
                assert!(!encode_args.verbose);
            }
        }
    }

    #[test]
    fn test_parse_encode_full_args() {
        let args = vec![
            "claquete",
            "encode",
            "clip.mp4",
            "out",
            "--preset",
            "sd",
            "--crf",
            "26",
            "--speed",
            "medium",
            "--audio-bitrate",
            "192",
            "--threads",
            "4",
            "--verbose",
        ];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Encode(encode_args) => {
                assert!(matches!(encode_args.preset, PresetArg::Sd));
                assert_eq!(encode_args.crf, 26);
                assert!(matches!(encode_args.speed, SpeedArg::Medium));
                assert_eq!(encode_args.audio_bitrate, 192);
                assert_eq!(encode_args.threads, Some(4));
                assert!(encode_args.verbose);
            }
        }
    }

    #[test]
    fn test_preset_arg_mapping() {
        assert_eq!(PresetChoice::from(PresetArg::Hd), PresetChoice::TargetHd);
        assert_eq!(PresetChoice::from(PresetArg::Sd), PresetChoice::TargetSd);
        assert_eq!(
            PresetChoice::from(PresetArg::Original),
            PresetChoice::KeepOriginal
        );
    }
}
