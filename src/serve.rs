//! Development server backed by the in-memory route table.
//!
//! `papyr serve` never touches the output directory: the assembled
//! [`RouteTable`] is the serving artifact. The main thread answers requests
//! against the current table; the watcher thread (see [`crate::watch`])
//! rebuilds on content changes and swaps a fresh table in through an
//! [`ArcSwap`], so a request always sees a complete, consistent build.
//! Ctrl+C unblocks the accept loop for a clean shutdown.

use crate::{
    build::{BuildCtx, BuildReport, BuildState, build_routes, log_summary},
    config::SiteConfig,
    log,
    site::RouteTable,
    watch::watch_for_changes_blocking,
};
use anyhow::{Context, Result, bail};
use arc_swap::ArcSwap;
use std::{
    net::{IpAddr, SocketAddr},
    sync::{Arc, atomic::Ordering},
};
use tiny_http::{Header, Request, Response, Server};

/// How many consecutive ports to probe when the configured one is taken.
const PORT_PROBE_RANGE: u16 = 10;

/// Build into memory and serve until Ctrl+C.
///
/// The initial build must succeed (non-strict per-document errors are
/// tolerated and logged); later rebuilds that fail keep the previous table.
pub fn serve_site(config: &'static SiteConfig) -> Result<()> {
    let ctx = BuildCtx::new(config);
    let mut report = BuildReport::default();
    let table = match build_routes(config, &ctx, &mut report) {
        Ok(table) => table,
        Err(err) => {
            report.state = BuildState::Failed;
            report.errors.push(err);
            log_summary(&report);
            bail!("initial build failed");
        }
    };
    report.state = BuildState::Done;
    log_summary(&report);

    let routes: Arc<ArcSwap<RouteTable>> = Arc::new(ArcSwap::from_pointee(table));

    let interface = config
        .serve
        .interface_addr()
        .with_context(|| format!("invalid [serve] interface `{}`", config.serve.interface))?;
    let (server, addr) = bind_with_fallback(interface, config.serve.port)?;
    let server = Arc::new(server);

    let unblock = Arc::clone(&server);
    let cancel = ctx.cancel_flag();
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        cancel.store(true, Ordering::Relaxed);
        unblock.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{addr}");

    if config.serve.watch {
        let routes = Arc::clone(&routes);
        std::thread::spawn(move || {
            if let Err(err) = watch_for_changes_blocking(config, routes) {
                log!("watch"; "{err}");
            }
        });
    }

    // Blocks until the Ctrl+C handler unblocks the accept loop.
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &routes.load()) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Bind the configured port, walking forward through the probe range when
/// it is already taken.
fn bind_with_fallback(interface: IpAddr, wanted: u16) -> Result<(Server, SocketAddr)> {
    let mut last_err = None;
    for port in wanted..wanted.saturating_add(PORT_PROBE_RANGE) {
        let addr = SocketAddr::new(interface, port);
        match Server::http(addr) {
            Ok(server) => {
                if port != wanted {
                    log!("serve"; "port {wanted} in use, bound {port} instead");
                }
                return Ok((server, addr));
            }
            Err(e) => last_err = Some(e),
        }
    }
    bail!(
        "no free port in {}..{}: {}",
        wanted,
        wanted.saturating_add(PORT_PROBE_RANGE),
        last_err.map(|e| e.to_string()).unwrap_or_default()
    )
}

/// Resolve one request against the current route table.
///
/// Exact URL first, then the same URL with a trailing slash (so `/posts`
/// finds the `/posts/` route), then 404.
fn handle_request(request: Request, table: &RouteTable) -> Result<()> {
    let decoded = urlencoding::decode(request.url())
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    // Cache-busting query strings don't participate in route identity.
    let path = decoded.split('?').next().unwrap_or_default();
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    let route = table
        .get(&path)
        .or_else(|| table.get(&format!("{}/", path.trim_end_matches('/'))));

    let response = match route {
        Some(route) => Response::from_data(route.bytes.clone())
            .with_header(content_type_header(route.content_type())?),
        None => Response::from_data(b"404 Not Found".to_vec())
            .with_status_code(404)
            .with_header(content_type_header("text/plain")?),
    };
    request.respond(response)?;
    Ok(())
}

fn content_type_header(value: &str) -> Result<Header> {
    Header::from_bytes("Content-Type", value)
        .map_err(|()| anyhow::anyhow!("invalid content-type header"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::site::Route;
    use std::path::PathBuf;

    fn table_with(urls: &[&str]) -> RouteTable {
        let mut table = RouteTable::default();
        for url in urls {
            table
                .insert(Route {
                    url: url.to_string(),
                    format: OutputFormat::Html,
                    bytes: b"ok".to_vec(),
                    origin: PathBuf::from("test"),
                })
                .unwrap();
        }
        table
    }

    #[test]
    fn test_route_lookup_with_and_without_slash() {
        let table = table_with(&["/", "/posts/"]);
        assert!(table.get("/posts/").is_some());
        // The trailing-slash fallback used by handle_request
        let path = "/posts";
        let fallback = format!("{}/", path.trim_end_matches('/'));
        assert!(table.get(&fallback).is_some());
    }

    #[test]
    fn test_bind_with_fallback_walks_forward() {
        let interface: IpAddr = "127.0.0.1".parse().unwrap();
        // Occupy an ephemeral port, then ask for that same port; the bind
        // should land on a later one.
        let holder = std::net::TcpListener::bind((interface, 0)).unwrap();
        let busy = holder.local_addr().unwrap().port();

        let (_server, addr) = bind_with_fallback(interface, busy).expect("fallback bind");
        assert_ne!(addr.port(), busy);
        assert!(addr.port() > busy);
    }
}
