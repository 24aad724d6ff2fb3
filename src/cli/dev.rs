use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::build::{BuildCoordinator, BuildReport, Pipeline};
use crate::bundler::CommandBundler;
use crate::cli::Cli;
use crate::server;
use crate::store::{Workspace, load_config};
use crate::tagger::KeywordTagger;
use crate::watch::watch_source;

pub async fn run(cli: Cli) -> Result<()> {
    let mut config =
        load_config(cli.config.as_deref(), &cli.dir).context("failed to load config")?;
    if let Some(kind) = cli.bundler {
        config.bundler = kind;
    }
    if let Some(path) = cli.bundler_path {
        config.bundler_path = Some(path);
    }

    let workspace = Workspace::new(&cli.dir, &cli.scratch_dir, &cli.out_dir)
        .context("invalid directory layout")?;
    let bundler = CommandBundler::locate(
        config.bundler,
        config.bundler_path.as_deref(),
        workspace.source(),
    )
    .context("failed to locate bundler")?;
    info!(kind = %bundler.kind(), program = %bundler.program().display(), "using bundler");

    let tagger = KeywordTagger::new(&config.tag_rules, config.tag_merge);
    let pipeline = Arc::new(Pipeline::new(
        workspace,
        Arc::new(bundler),
        Arc::new(tagger),
        config,
    ));

    if cli.once {
        let p = pipeline.clone();
        let report = tokio::task::spawn_blocking(move || p.run())
            .await
            .context("build task failed")?
            .context("build failed")?;
        print_report(&report, &pipeline);
        return Ok(());
    }

    let port = cli.port.context("a port is required unless --once is given")?;
    let listener = TcpListener::bind((cli.host.as_str(), port))
        .await
        .with_context(|| format!("failed to bind {}:{port}", cli.host))?;
    let out = pipeline.workspace().out().to_path_buf();
    let server = tokio::spawn(server::serve(listener, out, pipeline.output_lock()));

    let coordinator = BuildCoordinator::spawn(pipeline.clone());
    coordinator.trigger();

    let _watcher = watch_source(pipeline.workspace().source(), coordinator.clone())
        .context("failed to watch source directory")?;

    println!("Serving modules at http://{}:{port}/modules.json", cli.host);
    println!("Press Ctrl+C to stop");

    tokio::select! {
        res = server => {
            res.context("server task failed")?.context("server error")?;
        }
        _ = tokio::signal::ctrl_c() => {
            let status = coordinator.status();
            info!(builds = status.completed, failed = status.failed, "shutting down");
        }
    }
    Ok(())
}

fn print_report(report: &BuildReport, pipeline: &Pipeline) {
    println!(
        "Built {} module(s) into {} in {}ms",
        report.built.len(),
        pipeline.workspace().out().display(),
        report.elapsed.as_millis()
    );
    for name in &report.built {
        println!("  {name}");
    }
    for skipped in &report.skipped {
        eprintln!("  skipped {}: {}", skipped.dir.display(), skipped.reason);
    }
}
