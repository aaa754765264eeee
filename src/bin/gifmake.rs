use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use gifmake::{
    ConversionEvent, ConversionPlan, ConversionReport, ConvertOptions, FrameRateSpec, GifMaker,
    GifOptions, GifmakeError, OptimizationOutcome, OptimizeMode, ProgressCallback, ProgressInfo,
    utilities::human_bytes,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  gifmake frames\n  gifmake frames --name intro --max-size 600 --fps 24\n  gifmake frames --duration 3.5 --optimize false --json\n  gifmake frames --dry-run --verbose false\n  gifmake --completions zsh > _gifmake";

#[derive(Debug, Parser)]
#[command(
    name = "gifmake",
    version,
    about = "Turn a directory of numbered images into an animated GIF",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Directory holding the numbered PNG/JPEG frames.
    #[arg(required_unless_present = "completions")]
    directory: Option<PathBuf>,

    /// Output file name (".gif" is appended if missing). Defaults to the
    /// directory name.
    #[arg(short, long)]
    name: Option<String>,

    /// Limit the longest edge of every frame to this many pixels.
    #[arg(long)]
    max_size: Option<u32>,

    /// Playback rate in frames per second (default 30). Cannot be combined
    /// with a non-zero --duration.
    #[arg(long)]
    fps: Option<u32>,

    /// Total animation length in seconds; the frame rate is derived from it.
    #[arg(short, long)]
    duration: Option<f64>,

    /// Run gifsicle on the result when it is installed.
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    optimize: bool,

    /// Fail instead of warning when gifsicle is missing or fails.
    #[arg(long)]
    require_optimizer: bool,

    /// Seconds to wait for gifsicle before giving up.
    #[arg(long, default_value_t = 120)]
    optimizer_timeout: u64,

    /// Play the animation this many extra times instead of looping forever.
    #[arg(long)]
    repeat: Option<u16>,

    /// Palette quantizer speed, 1 (best quality) to 30 (fastest).
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(i32).range(1..=30))]
    speed: i32,

    /// Scan and plan without decoding or writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Print the final report as JSON.
    #[arg(long)]
    json: bool,

    /// Show a progress bar.
    #[arg(long)]
    progress: bool,

    /// Show the scan summary and info logging.
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    verbose: bool,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum)]
    completions: Option<Shell>,
}

fn init_logger(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .write_style(env_logger::WriteStyle::Auto)
        .init();
}

fn optimize_mode(optimize: bool, require_optimizer: bool) -> OptimizeMode {
    match (optimize, require_optimizer) {
        (false, _) => OptimizeMode::Disabled,
        (true, true) => OptimizeMode::Required,
        (true, false) => OptimizeMode::BestEffort,
    }
}

fn build_options(
    cli: &Cli,
    progress: Arc<TerminalProgress>,
) -> Result<ConvertOptions, GifmakeError> {
    let mut options = ConvertOptions::new()
        .with_progress(progress)
        .with_frame_rate(FrameRateSpec::new(cli.fps, cli.duration)?)
        .with_gif_options(
            GifOptions::new()
                .with_repeat(cli.repeat)
                .with_speed(cli.speed),
        )
        .with_optimize(optimize_mode(cli.optimize, cli.require_optimizer))
        .with_optimizer_timeout(Duration::from_secs(cli.optimizer_timeout));

    if let Some(name) = &cli.name {
        options = options.with_name(name.clone());
    }
    if let Some(max_size) = cli.max_size {
        options = options.with_max_size(max_size);
    }

    Ok(options)
}

/// Exit status for a failed run: 2 for bad input, 1 for a failed stage.
fn exit_code(error: &(dyn std::error::Error + 'static)) -> i32 {
    match error.downcast_ref::<GifmakeError>() {
        Some(error) if error.is_usage_error() => 2,
        _ => 1,
    }
}

fn warn(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
}

struct TerminalProgress {
    bar: ProgressBar,
    verbose: bool,
}

impl TerminalProgress {
    fn new(show_bar: bool, verbose: bool) -> Self {
        let bar = if show_bar {
            let bar = ProgressBar::new(0);
            let style =
                ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style.progress_chars("##-"));
            bar
        } else {
            ProgressBar::hidden()
        };
        Self { bar, verbose }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
        self.bar.set_message(format!("{:?}", info.operation).to_lowercase());
    }

    fn on_event(&self, event: &ConversionEvent) {
        match event {
            ConversionEvent::ScanCompleted(report) if self.verbose => {
                self.bar.suspend(|| print!("{report}"));
            }
            ConversionEvent::OptimizerSkipped { reason } => {
                self.bar.suspend(|| warn(&format!("GIF was not optimized: {reason}")));
            }
            _ => {}
        }
    }
}

fn print_plan(plan: &ConversionPlan, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let payload = json!({
            "directory": plan.scan.directory,
            "output": plan.target.path(),
            "frame_count": plan.scan.accepted_count(),
            "frames_per_second": plan.frames_per_second,
            "source_bytes": plan.scan.total_bytes,
            "frames": plan.scan.images.iter().map(|image| &image.path).collect::<Vec<_>>(),
            "skipped": plan.scan.rejected,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", plan.scan);
        println!(
            "Would write {} frames at {} fps to {}",
            plan.scan.accepted_count(),
            plan.frames_per_second,
            plan.target.path().display(),
        );
    }
    Ok(())
}

fn optimization_label(outcome: &OptimizationOutcome) -> &'static str {
    match outcome {
        OptimizationOutcome::Disabled => "disabled",
        OptimizationOutcome::Applied => "applied",
        OptimizationOutcome::Skipped { .. } => "skipped",
    }
}

fn print_report(report: &ConversionReport, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let skipped_reason = match &report.optimization {
            OptimizationOutcome::Skipped { reason } => Some(reason.as_str()),
            _ => None,
        };
        let payload = json!({
            "output": report.output,
            "frame_count": report.frame_count,
            "frames_per_second": report.frames_per_second,
            "frame_delay_centiseconds": report.frame_delay,
            "source_bytes": report.source_bytes,
            "encoded_bytes": report.encoded_bytes,
            "final_bytes": report.final_bytes,
            "optimization": optimization_label(&report.optimization),
            "optimization_skipped_reason": skipped_reason,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let size = if report.final_bytes == report.encoded_bytes {
        human_bytes(report.final_bytes)
    } else {
        format!(
            "{} -> {}",
            human_bytes(report.encoded_bytes),
            human_bytes(report.final_bytes)
        )
    };
    println!(
        "{} {}",
        "success:".green().bold(),
        format!(
            "Wrote {} frames at {} fps to {} ({size})",
            report.frame_count,
            report.frames_per_second,
            report.output.display(),
        )
        .green()
    );
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "gifmake", &mut std::io::stdout());
        return Ok(());
    }

    let directory = cli
        .directory
        .clone()
        .ok_or("a frame directory is required")?;
    let progress = Arc::new(TerminalProgress::new(
        cli.progress && !cli.dry_run,
        cli.verbose,
    ));
    let options = build_options(&cli, Arc::clone(&progress))?;
    let maker = GifMaker::new(&directory, options);
    log::debug!("{maker:?}");

    if cli.dry_run {
        let plan = maker.plan()?;
        return print_plan(&plan, cli.json);
    }

    let result = maker.run();
    progress.finish();
    print_report(&result?, cli.json)
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(error) = run(cli) {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(exit_code(error.as_ref()));
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use clap::Parser;

    use super::{
        Cli, FrameRateSpec, GifmakeError, OptimizeMode, TerminalProgress, build_options, exit_code,
        optimize_mode,
    };

    #[test]
    fn parse_defaults() {
        let cli = Cli::try_parse_from(["gifmake", "frames"]).unwrap();
        assert_eq!(cli.directory.as_deref(), Some(Path::new("frames")));
        assert!(cli.optimize);
        assert!(cli.verbose);
        assert_eq!(cli.speed, 10);
        assert_eq!(cli.optimizer_timeout, 120);
        assert!(cli.fps.is_none() && cli.duration.is_none());
    }

    #[test]
    fn fps_and_duration_conflict_is_a_usage_error() {
        let cli = Cli::try_parse_from(["gifmake", "frames", "--fps", "10", "-d", "2"]).unwrap();
        let progress = Arc::new(TerminalProgress::new(false, false));

        let error = build_options(&cli, progress).unwrap_err();
        assert!(matches!(error, GifmakeError::ConflictingTiming { fps: 10, .. }));
        assert_eq!(exit_code(&error), 2);
    }

    #[test]
    fn zero_duration_does_not_conflict_with_fps() {
        let cli =
            Cli::try_parse_from(["gifmake", "frames", "--fps", "24", "--duration", "0"]).unwrap();
        let progress = Arc::new(TerminalProgress::new(false, false));

        let options = build_options(&cli, progress).unwrap();
        assert_eq!(options.frame_rate(), FrameRateSpec::FramesPerSecond(24));
    }

    #[test]
    fn parse_verbose_takes_a_value() {
        let cli = Cli::try_parse_from(["gifmake", "frames", "--verbose", "false"]).unwrap();
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_optimize_takes_a_value() {
        let cli = Cli::try_parse_from(["gifmake", "frames", "--optimize", "false"]).unwrap();
        assert!(!cli.optimize);
    }

    #[test]
    fn parse_rejects_out_of_range_speed() {
        assert!(Cli::try_parse_from(["gifmake", "frames", "--speed", "31"]).is_err());
        assert!(Cli::try_parse_from(["gifmake", "frames", "--speed", "0"]).is_err());
    }

    #[test]
    fn parse_completions_without_directory() {
        let cli = Cli::try_parse_from(["gifmake", "--completions", "bash"]).unwrap();
        assert!(cli.directory.is_none());
        assert!(Cli::try_parse_from(["gifmake"]).is_err());
    }

    #[test]
    fn optimize_mode_mapping() {
        assert_eq!(optimize_mode(false, true), OptimizeMode::Disabled);
        assert_eq!(optimize_mode(true, false), OptimizeMode::BestEffort);
        assert_eq!(optimize_mode(true, true), OptimizeMode::Required);
    }

    #[test]
    fn exit_code_mapping() {
        let usage: Box<dyn std::error::Error> = Box::new(GifmakeError::InvalidTiming(
            "duration must be positive".to_string(),
        ));
        assert_eq!(exit_code(usage.as_ref()), 2);

        let stage: Box<dyn std::error::Error> =
            Box::new(GifmakeError::EncodeError("disk full".to_string()));
        assert_eq!(exit_code(stage.as_ref()), 1);

        let other: Box<dyn std::error::Error> = "a frame directory is required".into();
        assert_eq!(exit_code(other.as_ref()), 1);
    }
}
