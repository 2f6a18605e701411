use std::ffi::OsString;
use std::path::Path;

use clap::{CommandFactory, Parser};
use serde::Serialize;

use probeburst::args::{OutputFormat, ProbeArgs};
use probeburst::config::{DEFAULT_CONFIG_FILES, build_targets, load_config, suite_pause};
use probeburst::error::{AppError, AppResult, ValidationError};
use probeburst::logger::init_logging;
use probeburst::output::{run_lines, suite_lines};
use probeburst::probe::{ProbeEngine, ProbeRequest};
use probeburst::shutdown::{setup_signal_shutdown_handler, shutdown_channel};
use probeburst::suite::{DEFAULT_SUITE_PAUSE, run_suite};

pub(crate) fn run() -> AppResult<()> {
    let raw_args: Vec<OsString> = std::env::args_os().collect();
    if should_show_help(&raw_args) {
        ProbeArgs::command().print_help()?;
        println!();
        return Ok(());
    }

    let args = ProbeArgs::parse_from(raw_args);
    init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(&args))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(args: &ProbeArgs) -> AppResult<()> {
    let engine = ProbeEngine::new()?;
    let (shutdown_tx, mut shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let result = if let Some(url) = args.url.as_deref() {
        let request = single_request(url, args)?;
        let run = engine.run_until_shutdown(request, &mut shutdown_rx).await;
        run.map_err(AppError::from)
            .and_then(|run| emit(args.output_format, &run, run_lines(&run)))
    } else {
        let config = load_config(args.config.as_deref())?
            .ok_or_else(|| AppError::validation(ValidationError::MissingTarget))?;
        let targets = build_targets(&config, &args.headers)?;
        let pause = match args.suite_pause {
            Some(pause) => pause,
            None => suite_pause(&config)?.unwrap_or(DEFAULT_SUITE_PAUSE),
        };
        let suite = run_suite(&engine, targets, pause, &mut shutdown_rx).await;
        suite
            .map_err(AppError::from)
            .and_then(|suite| emit(args.output_format, &suite, suite_lines(&suite)))
    };

    signal_handle.abort();
    result
}

fn single_request(url: &str, args: &ProbeArgs) -> AppResult<ProbeRequest> {
    let mut request = ProbeRequest::new(url, args.method)?.with_concurrency(args.concurrency)?;
    if let Some(data) = &args.data {
        request = request.with_body(data.as_bytes());
    }
    for (key, value) in &args.headers {
        request = request.with_header(key, value)?;
    }
    if let Some(delay) = args.delay {
        request = request.with_inter_launch_delay(delay);
    }
    Ok(request)
}

fn emit<T: Serialize>(format: OutputFormat, value: &T, lines: Vec<String>) -> AppResult<()> {
    match format {
        OutputFormat::Text => {
            for line in lines {
                println!("{}", line);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
