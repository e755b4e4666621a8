//! Site building orchestration.
//!
//! Drives the pipeline over one immutable configuration:
//!
//! ```text
//! build_site()
//!     │
//!     ├── load_documents()      parallel, partial-failure
//!     ├── Taxonomy::build()     barrier; slug uniqueness
//!     ├── render_document()     parallel, partial-failure
//!     ├── assemble()            barrier; route table
//!     └── emit()                parallel, per-route errors
//! ```
//!
//! State machine: `Idle → Loading → Indexing → Rendering → Assembling →
//! Emitting → {Done, Failed, Cancelled}`. Per-document errors are collected
//! into the report; the terminal state is `Failed` only for fatal error
//! classes, zero usable documents, or any error under strict mode.

use crate::{
    config::SiteConfig,
    content::{Document, loader},
    emit,
    error::BuildError,
    log,
    render::{self, RenderedPage, theme},
    site::{self, RouteTable},
    taxonomy::Taxonomy,
    utils::log::ProgressBars,
};
use rayon::prelude::*;
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Instant,
};

// ============================================================================
// Build Context
// ============================================================================

/// Cancellation flag plus deadline for one build.
///
/// The flag is shared with signal handlers; setting it stops dispatch of new
/// per-document work, in-flight tasks finish, and the build terminates in
/// the `Cancelled` state.
pub struct BuildCtx {
    cancel: Arc<AtomicBool>,
    deadline: Instant,
    timeout_secs: u64,
}

impl BuildCtx {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            cancel: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now() + config.deadline(),
            timeout_secs: config.build.timeout,
        }
    }

    /// Shared flag for wiring up Ctrl+C or embedder cancellation.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Fail fast if the build was cancelled or ran past its deadline.
    pub fn check(&self) -> Result<(), BuildError> {
        if self.cancel.load(Ordering::Relaxed) {
            return Err(BuildError::Cancelled);
        }
        if Instant::now() > self.deadline {
            return Err(BuildError::Timeout(self.timeout_secs));
        }
        Ok(())
    }
}

// ============================================================================
// Build Report
// ============================================================================

/// Pipeline phase, also the terminal state of a finished build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildState {
    #[default]
    Idle,
    Loading,
    Indexing,
    Rendering,
    Assembling,
    Emitting,
    Done,
    Failed,
    Cancelled,
}

/// Counts plus collected errors for one build.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub state: BuildState,

    /// Documents successfully loaded (drafts included).
    pub loaded: usize,

    /// Draft documents excluded from the published output.
    pub drafts_skipped: usize,

    /// Documents rendered to pages.
    pub rendered: usize,

    /// Routes in the assembled table.
    pub routes: usize,

    /// Collected per-document and per-route errors; on a fatal exit the
    /// fatal error is the last entry.
    pub errors: Vec<BuildError>,
}

impl BuildReport {
    /// Whether the build ended in a terminal failure state.
    pub fn is_fatal(&self) -> bool {
        matches!(self.state, BuildState::Failed | BuildState::Cancelled)
    }
}

// ============================================================================
// Orchestration
// ============================================================================

/// Build the site and write it to the output directory.
///
/// Never panics and never returns early with a half-filled report: fatal
/// errors are folded into the report's terminal state.
pub fn build_site(config: &'static SiteConfig, ctx: &BuildCtx) -> BuildReport {
    let mut report = BuildReport::default();

    let table = match build_routes(config, ctx, &mut report) {
        Ok(table) => table,
        Err(err) => return fail(report, err),
    };

    report.state = BuildState::Emitting;
    match emit::emit(&table, &config.build.output, ctx) {
        Ok(emit_report) => {
            if !emit_report.is_success() {
                log!("warn"; "{} route(s) failed to write", emit_report.errors.len());
            }
            report.errors.extend(emit_report.errors);
        }
        Err(err) => return fail(report, err),
    }

    report.state = if config.build.strict && !report.errors.is_empty() {
        BuildState::Failed
    } else {
        BuildState::Done
    };
    report
}

/// Run the pipeline up to the assembled route table.
///
/// Used directly by the dev server, which serves the table from memory
/// instead of emitting it. Non-fatal errors accumulate in `report`.
pub fn build_routes(
    config: &'static SiteConfig,
    ctx: &BuildCtx,
    report: &mut BuildReport,
) -> Result<RouteTable, BuildError> {
    // ========================================================================
    // Loading
    // ========================================================================
    report.state = BuildState::Loading;
    ctx.check()?;

    let patterns = config
        .build
        .ignore_patterns()
        .map_err(|e| BuildError::load(&config.config_path, e.to_string()))?;
    let file_count = loader::collect_content_files(&config.build.content, &patterns).len();

    log!("load"; "discovering content in {}", config.build.content.display());
    let progress = ProgressBars::new(&[("load", file_count)]);
    let outcome = loader::load_documents(config, || progress.inc_by_name("load"))
        .map_err(|e| BuildError::load(&config.build.content, e.to_string()))?;
    progress.finish();

    report.loaded = outcome.documents.len();
    report.errors.extend(outcome.errors);

    if outcome.documents.is_empty() {
        return Err(BuildError::load(
            &config.build.content,
            "no usable content documents",
        ));
    }
    strict_check(config, report)?;

    // ========================================================================
    // Indexing
    // ========================================================================
    report.state = BuildState::Indexing;
    ctx.check()?;

    let (mut published, drafts): (Vec<Document>, Vec<Document>) = outcome
        .documents
        .into_iter()
        .partition(|doc| config.build.drafts || !doc.draft);
    report.drafts_skipped = drafts.len();

    let taxonomy = Taxonomy::build(&mut published, config.build.slug_collision)?;

    // ========================================================================
    // Rendering
    // ========================================================================
    report.state = BuildState::Rendering;
    ctx.check()?;

    log!("render"; "rendering {} documents", published.len());
    let progress = ProgressBars::new(&[("render", published.len())]);
    let results: Vec<Result<RenderedPage, BuildError>> = published
        .par_iter()
        .map(|doc| {
            ctx.check()?;
            let result = render::render_document(doc, config);
            progress.inc_by_name("render");
            result
        })
        .collect();
    progress.finish();

    let mut pages = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(page) => pages.push(page),
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => report.errors.push(err),
        }
    }
    report.rendered = pages.len();
    strict_check(config, report)?;

    // ========================================================================
    // Assembling
    // ========================================================================
    report.state = BuildState::Assembling;
    ctx.check()?;

    let theme = theme::by_name(&config.build.theme)
        .ok_or_else(|| BuildError::load(&config.config_path, "unknown theme"))?;
    let table = site::assemble(&pages, &taxonomy, theme, config)?;
    report.routes = table.len();

    ctx.check()?;
    Ok(table)
}

/// In strict mode any collected error aborts the build.
fn strict_check(config: &SiteConfig, report: &mut BuildReport) -> Result<(), BuildError> {
    if config.build.strict && !report.errors.is_empty() {
        return Err(report.errors.remove(0));
    }
    Ok(())
}

/// Fold a fatal error into the report's terminal state.
fn fail(mut report: BuildReport, err: BuildError) -> BuildReport {
    report.state = match err {
        BuildError::Cancelled => BuildState::Cancelled,
        _ => BuildState::Failed,
    };
    report.errors.push(err);
    report
}

/// Print the user-facing build summary.
pub fn log_summary(report: &BuildReport) {
    log!(
        "build";
        "{} loaded, {} rendered, {} drafts skipped, {} routes",
        report.loaded,
        report.rendered,
        report.drafts_skipped,
        report.routes
    );
    for err in &report.errors {
        log!("error"; "{err:#}");
    }
    match report.state {
        BuildState::Done if report.errors.is_empty() => log!("build"; "done"),
        BuildState::Done => log!("warn"; "done with {} error(s)", report.errors.len()),
        BuildState::Cancelled => log!("error"; "cancelled"),
        _ => log!("error"; "failed"),
    }
}
