use tracing::info;
use tracing_subscriber::EnvFilter;

use lighthouse_push::{RunParams, Target, run_with_params};

use super::args::CliArgs;
use super::errors::AppError;

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn params_from_args(args: &CliArgs) -> Result<RunParams, AppError> {
    let gateway = args.pushgateway.trim();
    if !(gateway.starts_with("http://") || gateway.starts_with("https://")) {
        return Err(AppError::InvalidPushgateway {
            url: args.pushgateway.clone(),
        });
    }

    if args.timeout_secs == 0 {
        return Err(AppError::ZeroTimeout {
            secs: args.timeout_secs,
        });
    }

    let only_categories: Vec<String> = args
        .only_categories
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    if only_categories.iter().any(String::is_empty) {
        return Err(AppError::EmptyCategory {
            list: args.only_categories.join(","),
        });
    }

    let chrome_flags = Some(args.chrome_flags.trim())
        .filter(|f| !f.is_empty())
        .map(str::to_string);

    Ok(RunParams {
        lighthouse_bin: args.lighthouse_bin.clone(),
        chrome_flags,
        only_categories,
        pushgateway: gateway.to_string(),
        keep_going: args.keep_going,
        timeout_secs: args.timeout_secs,
    })
}

fn targets_from_args(args: &CliArgs) -> Result<Vec<Target>, AppError> {
    args.urls
        .iter()
        .enumerate()
        .map(|(idx, url)| {
            let url = url.trim();
            if url.is_empty() {
                Err(AppError::EmptyUrl { position: idx + 1 })
            } else {
                Ok(Target::from(url))
            }
        })
        .collect()
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(args.log);

    let params = params_from_args(&args)?;
    let targets = targets_from_args(&args)?;

    info!("Push URL: {}", params.push_url());

    let report = run_with_params(&targets, &params)?;

    info!("Run complete!");
    info!("Audited: {}", report.audited);
    info!("Skipped: {}", report.skipped);
    info!("Pushed: {}", report.pushed);

    Ok(())
}
