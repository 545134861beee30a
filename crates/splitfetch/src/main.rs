use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use splitfetch_core::{
    CancellationToken, DownloadOrchestrator, DownloadResult, FetchOptions, Progress, ReqwestClient,
};

use crate::cli::App;
use crate::ui::tracker::{ProgressTracker, ProgressTrackerConfig, Tracker};

mod cli;
mod logging;
mod ui;

fn main() -> ExitCode {
    let app = App::parse();
    logging::init(app.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(app)) {
        Ok(result) => {
            println!("Downloaded filename: {}", result.path.display());
            println!("Total time: {:.2?}", result.elapsed);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Download failed with error ({e:#})");
            ExitCode::FAILURE
        }
    }
}

async fn run(app: App) -> Result<DownloadResult> {
    let tracker = Arc::new(ProgressTracker::new(ProgressTrackerConfig {
        hidden: app.quiet,
        msg: None,
    }));

    let mut options = FetchOptions::default()
        .fan_out(app.parallel)
        .output_dir(&app.dir);
    for (name, value) in app.headers {
        options = options.header(name, value);
    }
    let sink = Arc::clone(&tracker);
    options = options.on_progress(Arc::new(move |progress: &Progress| {
        sink.step(*progress);
    }));

    let client = ReqwestClient::new().context("building HTTP client")?;
    let orchestrator = DownloadOrchestrator::new(client).with_options(options);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling download");
            on_interrupt.cancel();
        }
    });

    let result = orchestrator
        .download_with_cancel(&app.url, cancel)
        .await
        .with_context(|| format!("downloading {}", app.url));

    match result {
        Ok(ref done) => tracker.finish(Some(done.filename.clone())),
        Err(_) => tracker.pb.abandon(),
    }
    result
}
