//! Route emission.
//!
//! Writes a route table to a destination tree. Each route is written
//! atomically (temp sibling + rename) so a crash mid-build never leaves a
//! half-written file at a route's final path. Writes run in parallel;
//! per-route I/O failures are collected and summarized, never aborting the
//! remaining writes.

use crate::{
    build::BuildCtx,
    error::BuildError,
    site::{Route, RouteTable},
};
use rayon::prelude::*;
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

/// Outcome of one emit pass.
#[derive(Debug, Default)]
pub struct EmitReport {
    /// Routes successfully written.
    pub written: usize,

    /// Per-route write failures, sorted by URL.
    pub errors: Vec<BuildError>,
}

impl EmitReport {
    /// Overall success requires zero failed routes.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Write every route under `dest`.
///
/// Returns `Err` only for build-wide conditions (cancellation, timeout);
/// ordinary write failures land in the report.
pub fn emit(table: &RouteTable, dest: &Path, ctx: &BuildCtx) -> Result<EmitReport, BuildError> {
    let errors = Mutex::new(Vec::new());
    let routes: Vec<&Route> = table.iter().collect();

    let result: Result<(), BuildError> = routes.par_iter().try_for_each(|route| {
        ctx.check()?;
        if let Err(e) = write_route(route, dest) {
            errors
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(BuildError::Io {
                    url: route.url.clone(),
                    source: e,
                });
        }
        Ok(())
    });
    result?;

    let mut errors = errors.into_inner().unwrap_or_else(std::sync::PoisonError::into_inner);
    errors.sort_by(|a, b| {
        let url = |e: &BuildError| match e {
            BuildError::Io { url, .. } => url.clone(),
            _ => String::new(),
        };
        url(a).cmp(&url(b))
    });

    Ok(EmitReport {
        written: routes.len() - errors.len(),
        errors,
    })
}

/// Map a route URL to its output file path.
///
/// | URL | Path |
/// |-----|------|
/// | `/` | `index.html` |
/// | `/posts-pca/` | `posts-pca/index.html` |
/// | `/index.xml` | `index.xml` |
pub fn route_output_path(dest: &Path, url: &str) -> PathBuf {
    let rel = url.trim_start_matches('/');
    if rel.is_empty() || url.ends_with('/') {
        dest.join(rel).join("index.html")
    } else {
        dest.join(rel)
    }
}

/// Atomic write: temp sibling, then rename over the final path.
fn write_route(route: &Route, dest: &Path) -> io::Result<()> {
    let final_path = route_output_path(dest, &route.url);
    if let Some(parent) = final_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file_name = final_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "route".to_string());
    let tmp_path = final_path.with_file_name(format!(".{file_name}.tmp"));

    fs::write(&tmp_path, &route.bytes)?;
    fs::rename(&tmp_path, &final_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputFormat, SiteConfig};
    use tempfile::TempDir;

    fn route(url: &str, bytes: &[u8]) -> Route {
        Route {
            url: url.to_string(),
            format: OutputFormat::Html,
            bytes: bytes.to_vec(),
            origin: PathBuf::from("test"),
        }
    }

    fn ctx() -> BuildCtx {
        BuildCtx::new(&SiteConfig::default())
    }

    #[test]
    fn test_route_output_path() {
        let dest = Path::new("public");
        assert_eq!(
            route_output_path(dest, "/"),
            Path::new("public/index.html")
        );
        assert_eq!(
            route_output_path(dest, "/posts-pca/"),
            Path::new("public/posts-pca/index.html")
        );
        assert_eq!(
            route_output_path(dest, "/index.xml"),
            Path::new("public/index.xml")
        );
        assert_eq!(
            route_output_path(dest, "/tags/r/page/2/"),
            Path::new("public/tags/r/page/2/index.html")
        );
    }

    #[test]
    fn test_emit_writes_all_routes() {
        let dir = TempDir::new().unwrap();
        let mut table = RouteTable::default();
        table.insert(route("/", b"home")).unwrap();
        table.insert(route("/a/", b"page a")).unwrap();
        table.insert(route("/index.xml", b"<rss/>")).unwrap();

        let report = emit(&table, dir.path(), &ctx()).unwrap();
        assert!(report.is_success());
        assert_eq!(report.written, 3);

        assert_eq!(fs::read(dir.path().join("index.html")).unwrap(), b"home");
        assert_eq!(fs::read(dir.path().join("a/index.html")).unwrap(), b"page a");
        assert_eq!(fs::read(dir.path().join("index.xml")).unwrap(), b"<rss/>");
    }

    #[test]
    fn test_emit_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let mut table = RouteTable::default();
        table.insert(route("/", b"home")).unwrap();
        table.insert(route("/index.xml", b"x")).unwrap();
        table.insert(route("/index.json", b"y")).unwrap();

        emit(&table, dir.path(), &ctx()).unwrap();

        let leftovers: Vec<_> = walkdir::WalkDir::new(dir.path())
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_emit_overwrites_previous_output() {
        let dir = TempDir::new().unwrap();
        let mut table = RouteTable::default();
        table.insert(route("/", b"v1")).unwrap();
        emit(&table, dir.path(), &ctx()).unwrap();

        let mut table = RouteTable::default();
        table.insert(route("/", b"v2")).unwrap();
        emit(&table, dir.path(), &ctx()).unwrap();

        assert_eq!(fs::read(dir.path().join("index.html")).unwrap(), b"v2");
    }

    #[test]
    fn test_emit_collects_per_route_errors() {
        let dir = TempDir::new().unwrap();
        // Occupy the route's parent path with a file so create_dir_all fails.
        fs::write(dir.path().join("blocked"), b"file").unwrap();

        let mut table = RouteTable::default();
        table.insert(route("/blocked/post/", b"x")).unwrap();
        table.insert(route("/fine/", b"ok")).unwrap();

        let report = emit(&table, dir.path(), &ctx()).unwrap();
        assert!(!report.is_success());
        assert_eq!(report.written, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(report.errors[0], BuildError::Io { .. }));
        // The other route still got written.
        assert_eq!(fs::read(dir.path().join("fine/index.html")).unwrap(), b"ok");
    }

    #[test]
    fn test_emit_cancelled() {
        let dir = TempDir::new().unwrap();
        let mut table = RouteTable::default();
        table.insert(route("/", b"x")).unwrap();

        let ctx = ctx();
        ctx.cancel_flag().store(true, std::sync::atomic::Ordering::Relaxed);
        let err = emit(&table, dir.path(), &ctx).unwrap_err();
        assert!(matches!(err, BuildError::Cancelled));
    }
}
