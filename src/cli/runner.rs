use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use baresoil::{
    BatchReport, EstimationParams, FileReport, ReportFormat, estimate_directory, estimate_file,
};

use super::args::CliArgs;
use super::errors::AppError;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file (if any) first, then individual flags on top.
fn resolve_params(args: &CliArgs) -> Result<EstimationParams, AppError> {
    let mut params = match &args.config {
        Some(path) => EstimationParams::from_json_file(path)?,
        None => EstimationParams::default(),
    };
    if let Some(method) = args.method {
        params.method = method;
    }
    if let Some(lambda) = args.lambda {
        params.lambda = lambda;
    }
    if let Some(red_band) = args.red_band {
        params.red_band = red_band;
    }
    if let Some(nir_band) = args.nir_band {
        params.nir_band = nir_band;
    }
    params.validate()?;
    Ok(params)
}

fn render_file_text(out: &mut String, file: &FileReport) -> fmt::Result {
    let adaptive = file
        .report
        .adaptive
        .map(|a| a.fraction.to_string())
        .unwrap_or_else(|| "-".to_string());
    let fixed = file
        .report
        .fixed
        .map(|f| f.to_string())
        .unwrap_or_else(|| "-".to_string());

    writeln!(out, "File Name -> {}", file.name)?;
    writeln!(out, "Proposed Algorithm: /  Simplified Method Percent ")?;
    writeln!(out, "     {}        /     {} ", adaptive, fixed)?;
    if let Some(a) = &file.report.adaptive {
        let e = &a.threshold.endmembers;
        let [s, r, n] = e.coords();
        writeln!(
            out,
            "threshold {:.5} (lambda {})",
            a.threshold.threshold, a.threshold.lambda
        )?;
        writeln!(out, "decomposition [{}, {}, {}]", s, r, n)?;
        if e.is_collapsed() {
            writeln!(out, "note: red-max and NIR-max endmembers share one pixel")?;
        }
    }
    writeln!(out)
}

fn render_batch_text(report: &BatchReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{}\n\n   RESULTS \n", "_".repeat(30))?;
    for file in &report.results {
        render_file_text(&mut out, file)?;
    }
    for err in &report.errors {
        writeln!(
            out,
            "For file ::: {} ::: this error was found --> {}",
            err.name, err.message
        )?;
    }
    writeln!(
        out,
        "processed={} failed={}",
        report.processed, report.failed
    )?;
    Ok(out)
}

fn emit(output: Option<&Path>, text: &str) -> Result<(), AppError> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, text)?;
            info!("Report written to {:?}", path);
        }
        None => print!("{}", text),
    }
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        init_logging();
    }

    let params = resolve_params(&args)?;

    let text = match (&args.input, &args.input_dir) {
        (Some(_), Some(_)) => {
            return Err(AppError::ConflictingArguments {
                first: "--input".to_string(),
                second: "--input-dir".to_string(),
            }
            .into());
        }
        (None, None) => {
            return Err(AppError::MissingArgument {
                arg: "--input or --input-dir".to_string(),
            }
            .into());
        }
        (Some(input), None) => {
            info!("Estimating {:?} with {} method(s)", input, params.method);
            let file = estimate_file(input, &params)?;
            match args.format {
                ReportFormat::Text => {
                    let mut out = String::new();
                    render_file_text(&mut out, &file)?;
                    out
                }
                ReportFormat::Json => serde_json::to_string_pretty(&file)? + "\n",
            }
        }
        (None, Some(input_dir)) => {
            info!("Starting batch estimation from directory: {:?}", input_dir);
            let report = estimate_directory(input_dir, &params, args.continue_on_error)?;
            report.ensure_any_processed()?;
            match args.format {
                ReportFormat::Text => render_batch_text(&report)?,
                ReportFormat::Json => serde_json::to_string_pretty(&report)? + "\n",
            }
        }
    };

    emit(args.output.as_deref(), &text)?;
    Ok(())
}
