use std::path::{Path, PathBuf};
use std::process::ExitCode;

use png_to_jpg::config::job::JobFile;
use png_to_jpg::config::merged::MergedConfig;
use png_to_jpg::config::{self};
use png_to_jpg::convert::CancellationToken;
use png_to_jpg::pipeline::item_processor::ItemOutcome;
use png_to_jpg::pipeline::job_runner::JobConfig;
use png_to_jpg::pipeline::orchestrator::run_all_jobs;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: png_to_jpg <jobs.yaml>...");
        eprintln!("  Convert PNG images to JPEG on a white background according to job files.");
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("png_to_jpg {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let mut job_configs: Vec<JobConfig> = Vec::new();
    let mut workers = 0usize;

    for job_file_arg in &args {
        let job_file_path = Path::new(job_file_arg);

        // Load settings from the same directory as the job file.
        let settings = match config::load_settings_for_job(job_file_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("ERROR: Failed to load settings for {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        let yaml_content = match std::fs::read_to_string(job_file_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("ERROR: Failed to read job file {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        let job_file = match JobFile::from_yaml(&yaml_content) {
            Ok(jf) => jf,
            Err(e) => {
                eprintln!("ERROR: Failed to parse job file {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        // Relative paths resolve against the job file's directory.
        let job_dir = job_file_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        for job in &job_file.jobs {
            let merged = MergedConfig::new(&settings, job);
            workers = workers.max(merged.parallel_workers);

            job_configs.push(JobConfig {
                input_path: resolve_path(&job_dir, &job.input),
                output_dir: resolve_path(&job_dir, &job.output),
                quality: merged.quality,
                overwrite: merged.overwrite,
                limits: merged.limits,
                cache_dir: merged.cache_dir.map(|dir| resolve_path(&job_dir, &dir)),
            });
        }
    }

    let token = CancellationToken::new();
    let results = run_all_jobs(&job_configs, workers, &token);

    let mut has_error = false;
    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(job_result) => {
                for item in &job_result.items {
                    match &item.outcome {
                        Ok(ItemOutcome::Converted { sizes, from_cache }) => {
                            eprintln!(
                                "OK: {} -> {} ({sizes}){}",
                                item.input_path.display(),
                                item.output_path.display(),
                                if *from_cache { " [cached]" } else { "" }
                            );
                        }
                        Ok(ItemOutcome::SkippedExisting) => {
                            eprintln!(
                                "SKIP: {} -> {} (output exists)",
                                item.input_path.display(),
                                item.output_path.display()
                            );
                        }
                        Err(e) => {
                            eprintln!("ERROR: {}: {e}", item.input_path.display());
                            has_error = true;
                        }
                    }
                }
            }
            Err(e) => {
                eprintln!(
                    "ERROR: {} -> {}: {e}",
                    job_configs[i].input_path.display(),
                    job_configs[i].output_dir.display()
                );
                has_error = true;
            }
        }
    }

    if has_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Resolve a potentially relative path against a base directory.
/// If the path is already absolute, return it as-is.
fn resolve_path(base_dir: &Path, path: impl AsRef<Path>) -> PathBuf {
    let p = path.as_ref();
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}
