//! File system watcher for the development server.
//!
//! Monitors the content directory and the config file, batching rapid
//! events with debouncing, and swaps a freshly assembled route table into
//! the server on every successful rebuild.

use crate::{
    build::{BuildCtx, BuildReport, build_routes},
    config::SiteConfig,
    log,
    site::RouteTable,
};
use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    sync::{Arc, mpsc},
    time::{Duration, Instant},
};

// =============================================================================
// Constants
// =============================================================================

const DEBOUNCE_MS: u64 = 300;
const REBUILD_COOLDOWN_MS: u64 = 800;

// =============================================================================
// Path Utilities
// =============================================================================

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

// =============================================================================
// Debounce State
// =============================================================================

/// Batches rapid file events with debouncing and rebuild cooldown.
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
            last_rebuild: None,
        }
    }

    fn in_cooldown(&self) -> bool {
        self.last_rebuild
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
    }

    fn add(&mut self, event: Event) {
        for path in event.paths {
            if !is_temp_file(&path) {
                self.pending.insert(path);
            }
        }
        self.last_event = Some(Instant::now());
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        self.pending.drain().collect()
    }

    fn mark_rebuild(&mut self) {
        self.last_rebuild = Some(Instant::now());
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

// =============================================================================
// Event Loop
// =============================================================================

/// Watch for changes and rebuild into the shared route table. Blocks forever.
pub fn watch_for_changes_blocking(
    config: &'static SiteConfig,
    routes: Arc<ArcSwap<RouteTable>>,
) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        tx.send(res).ok();
    })
    .context("Failed to create file watcher")?;

    watcher
        .watch(&config.build.content, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", config.build.content.display()))?;
    // Config edits can't be hot-applied to a leaked config; watch anyway so
    // the user gets a hint instead of silence.
    watcher
        .watch(&config.config_path, RecursiveMode::NonRecursive)
        .ok();

    log!("watch"; "watching {}", config.build.content.display());

    let mut debouncer = Debouncer::new();
    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) => {
                if is_relevant(&event.kind) && !debouncer.in_cooldown() {
                    debouncer.add(event);
                }
            }
            Ok(Err(err)) => log!("watch"; "watch error: {err}"),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => return Ok(()),
        }

        if debouncer.ready() {
            let changed = debouncer.take();
            handle_changes(&changed, config, &routes);
            debouncer.mark_rebuild();
        }
    }
}

/// Only content-affecting event kinds trigger a rebuild.
const fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Rebuild the route table and swap it in, logging the outcome.
fn handle_changes(
    changed: &[PathBuf],
    config: &'static SiteConfig,
    routes: &ArcSwap<RouteTable>,
) {
    if changed.iter().any(|p| *p == config.config_path) {
        log!("watch"; "config changed, restart serve to apply");
    }

    let trigger = changed
        .first()
        .map(|p| {
            p.strip_prefix(config.get_root())
                .unwrap_or(p.as_path())
                .display()
                .to_string()
        })
        .unwrap_or_default();
    log!("watch"; "{} changed, rebuilding...", trigger);

    let ctx = BuildCtx::new(config);
    let mut report = BuildReport::default();
    match build_routes(config, &ctx, &mut report) {
        Ok(table) => {
            routes.store(Arc::new(table));
            log!("watch"; "rebuilt {} routes", report.routes);
            for err in &report.errors {
                log!("warn"; "{err:#}");
            }
        }
        Err(err) => {
            log!("watch"; "rebuild failed");
            log!("error"; "{err:#}");
        }
    }
}
