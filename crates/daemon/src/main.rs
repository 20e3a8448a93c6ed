// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `streamvaultd`: the StreamVault daemon binary. Owns the Postgres
//! [`Gateway`], wires every orchestration component (C4-C12), serves the
//! operator control socket, and runs the periodic reaper/cleanup sweeps.
//!
//! Startup order matters: the [`WorkerPool`] needs every handler
//! registered before [`TaskQueueManager`] can be built, but the
//! orphan-recovery-check handler needs a reference to the
//! [`RecordingLifecycleManager`] that is only constructed afterward (it,
//! in turn, needs the queue manager). The `OnceLock` on
//! [`OrphanRecoveryCheckHandler`] breaks that cycle: the handler is
//! registered empty and filled in once the lifecycle manager exists.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use streamvault_adapters::{TokioProcessSupervisor, TungsteniteFanout};
use streamvault_core::{Clock, SystemClock};
use streamvault_daemon::{env, lock, protocol_wire, Request, Response};
use streamvault_engine::{
    CleanupConfig, CleanupHandler, Fanout, LifecycleConfig, MetadataGenerationHandler, Mp4RemuxHandler,
    Mp4ValidationHandler, OrphanRecoveryCheckHandler, ProgressEvent, ProgressTracker, QueueManagerConfig,
    ReaperConfig, RecordingLifecycleManager, SegmentConcatenationHandler, StaticChapterSource, TaskQueueManager,
    ThumbnailGenerationHandler, WorkerPool,
};
use streamvault_storage::Gateway;
use tokio::net::{TcpListener, UnixListener};
use tracing_subscriber::EnvFilter;

mod dispatch;

type Supervisor = TokioProcessSupervisor;
type Transport = TungsteniteFanout;
type Lifecycle = RecordingLifecycleManager<SystemClock, Supervisor, Transport>;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("streamvaultd: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let paths = lock::Paths::resolve()?;
    setup_logging(&paths.log_path);

    let _lock_guard = match lock::acquire(&paths) {
        Ok(guard) => guard,
        Err(lock::DaemonError::LockFailed) => {
            tracing::error!("another streamvaultd instance already holds {:?}", paths.lock_path);
            return Err(Box::new(lock::DaemonError::LockFailed));
        }
        Err(err) => return Err(Box::new(err)),
    };

    let database_url = env::database_url()?;
    let gateway = Gateway::connect(&database_url).await?;
    gateway.migrate().await?;
    tracing::info!("connected to Postgres and ran migrations");

    let clock = SystemClock;
    let tracker = Arc::new(ProgressTracker::new(clock));
    let transport = TungsteniteFanout::new();
    let fanout = Arc::new(Fanout::new(transport.clone()));

    let recordings_root = env::recordings_root();
    let process_log_dir = paths.state_dir.join("process-logs");
    let supervisor = TokioProcessSupervisor::new(process_log_dir);

    let lifecycle_cell: Arc<OnceLock<Arc<Lifecycle>>> = Arc::new(OnceLock::new());

    let mut pool = WorkerPool::new(clock, Arc::clone(&tracker));
    pool.register(
        "segment_concatenation",
        Arc::new(SegmentConcatenationHandler::new(gateway.clone(), supervisor.clone())),
    );
    pool.register(
        "metadata_generation",
        Arc::new(MetadataGenerationHandler::new(gateway.clone(), StaticChapterSource)),
    );
    pool.register("mp4_remux", Arc::new(Mp4RemuxHandler::new(gateway.clone(), supervisor.clone())));
    pool.register("mp4_validation", Arc::new(Mp4ValidationHandler::new(gateway.clone())));
    pool.register(
        "thumbnail_generation",
        Arc::new(ThumbnailGenerationHandler::new(gateway.clone(), supervisor.clone())),
    );
    pool.register("cleanup", Arc::new(CleanupHandler::new(gateway.clone())));
    pool.register(
        "orphan_recovery_check",
        Arc::new(OrphanRecoveryCheckHandler::new(Arc::clone(&lifecycle_cell), ReaperConfig::default())),
    );
    let worker_pool = Arc::new(pool);

    let queue = Arc::new(TaskQueueManager::new(
        gateway.clone(),
        worker_pool,
        Arc::clone(&tracker),
        clock,
        QueueManagerConfig::default(),
    ));

    let lifecycle_config = LifecycleConfig {
        recordings_root: recordings_root.clone(),
        ..LifecycleConfig::default()
    };
    let lifecycle = Arc::new(RecordingLifecycleManager::new(
        gateway.clone(),
        supervisor,
        Arc::clone(&tracker),
        Arc::clone(&fanout),
        Arc::clone(&queue),
        clock,
        lifecycle_config,
    ));
    lifecycle_cell
        .set(Arc::clone(&lifecycle))
        .unwrap_or_else(|_| unreachable!("lifecycle cell is only set once, here, at startup"));

    tracker.register_progress_callback({
        let fanout = Arc::clone(&fanout);
        let tracker = Arc::clone(&tracker);
        move |event: ProgressEvent| {
            let fanout = Arc::clone(&fanout);
            let tracker = Arc::clone(&tracker);
            tokio::spawn(async move {
                let task_type = match &event {
                    ProgressEvent::StatusChanged(task) => task.task_type.clone(),
                    ProgressEvent::ProgressChanged { id, .. } => {
                        tracker.get(id).map(|t| t.task_type).unwrap_or_default()
                    }
                };
                fanout.on_progress_event(&task_type, event).await;
            });
        }
    });

    // One-time recovery scan (C10, §4.9): resume interrupted DAGs, repair
    // completed recordings whose output vanished, and pick up any
    // orphaned capture artifacts left on disk by an unclean shutdown.
    match streamvault_engine::scan_for_orphans(&gateway, &queue, &recordings_root, clock.now_utc()).await {
        Ok(findings) if !findings.is_empty() => {
            tracing::info!(count = findings.len(), "startup recovery scan found work")
        }
        Ok(_) => {}
        Err(err) => tracing::warn!(error = %err, "startup recovery scan failed"),
    }

    let shutdown = Arc::new(AtomicBool::new(false));

    let fanout_listener = TcpListener::bind(("0.0.0.0", env::fanout_port())).await?;
    tracing::info!(addr = %fanout_listener.local_addr()?, "fan-out listening");
    tokio::spawn(transport.accept_loop(fanout_listener));

    tokio::spawn(reaper_loop(Arc::clone(&lifecycle), gateway.clone(), Arc::clone(&shutdown)));
    tokio::spawn(cleanup_loop(gateway.clone(), Arc::clone(&shutdown)));
    tokio::spawn(progress_sweep_loop(Arc::clone(&tracker), Arc::clone(&shutdown)));

    let _ = std::fs::remove_file(&paths.socket_path);
    let control_listener = UnixListener::bind(&paths.socket_path)?;
    tracing::info!(socket = ?paths.socket_path, "control socket listening");

    let ctx = Arc::new(dispatch::Context {
        gateway,
        queue,
        lifecycle: Arc::clone(&lifecycle),
        tracker,
        started_at: clock.now_utc(),
    });

    tokio::select! {
        () = control_loop(control_listener, Arc::clone(&ctx)) => {}
        result = wait_for_shutdown_signal() => {
            if let Err(err) = result {
                tracing::warn!(error = %err, "failed to install signal handler");
            }
            tracing::info!("shutdown signal received");
        }
    }

    shutdown.store(true, Ordering::SeqCst);
    lifecycle.graceful_shutdown(std::time::Duration::from_secs(15)).await;
    let _ = std::fs::remove_file(&paths.socket_path);
    Ok(())
}

async fn control_loop(listener: UnixListener, ctx: Arc<dispatch::Context>) {
    loop {
        let (stream, _) = match listener.accept().await {
            Ok(pair) => pair,
            Err(err) => {
                tracing::warn!(error = %err, "control socket accept failed");
                continue;
            }
        };
        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            let mut stream = stream;
            loop {
                let request: Request =
                    match protocol_wire::read_request(&mut stream, protocol_wire::DEFAULT_TIMEOUT).await {
                        Ok(req) => req,
                        Err(_) => break,
                    };
                let response: Response = dispatch::handle(&ctx, request).await;
                if protocol_wire::write_response(&mut stream, &response, protocol_wire::DEFAULT_TIMEOUT)
                    .await
                    .is_err()
                {
                    break;
                }
            }
        });
    }
}

async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
        Ok(())
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

async fn reaper_loop(lifecycle: Arc<Lifecycle>, gateway: Gateway, shutdown: Arc<AtomicBool>) {
    let config = ReaperConfig::default();
    let mut interval = tokio::time::interval(env::reaper_interval());
    while !shutdown.load(Ordering::SeqCst) {
        interval.tick().await;
        let now = SystemClock.now_utc();
        match streamvault_engine::run_reaper_sweep(&lifecycle, &gateway, &config, now).await {
            Ok(report) if !report.is_empty() => tracing::info!(?report, "reaper sweep reaped stuck work"),
            Ok(_) => {}
            Err(err) => tracing::warn!(error = %err, "reaper sweep failed"),
        }
    }
}

async fn cleanup_loop(gateway: Gateway, shutdown: Arc<AtomicBool>) {
    let config = CleanupConfig::default();
    let mut interval = tokio::time::interval(env::cleanup_interval());
    while !shutdown.load(Ordering::SeqCst) {
        interval.tick().await;
        let now = SystemClock.now_utc();
        match streamvault_engine::run_cleanup_sweep(&gateway, config, now).await {
            Ok(report) => {
                if report.sessions_deleted > 0 || report.tokens_deleted > 0 {
                    tracing::info!(?report, "cleanup sweep removed stale rows");
                }
            }
            Err(err) => tracing::warn!(error = %err, "cleanup sweep failed"),
        }
    }
}

/// Drops completed-task entries past [`ProgressTracker::sweep`]'s
/// retention window, matching the completed-map TTL §4.3 describes.
async fn progress_sweep_loop(tracker: Arc<ProgressTracker<SystemClock>>, shutdown: Arc<AtomicBool>) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(5 * 60));
    while !shutdown.load(Ordering::SeqCst) {
        interval.tick().await;
        tracker.sweep();
    }
}

fn setup_logging(log_path: &std::path::Path) {
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or_else(|| std::path::Path::new(".")),
        log_path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("daemon.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    // Leaked deliberately: the guard must outlive the process, and this
    // runs exactly once at startup.
    Box::leak(Box::new(guard));
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
}
