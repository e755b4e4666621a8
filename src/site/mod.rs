//! Site assembly.
//!
//! Turns rendered pages plus configuration into the full route table:
//!
//! ```text
//! assemble()
//!     ├── single pages        /slug/
//!     ├── home list pages     /  /page/2/ ...
//!     ├── term list pages     /categories/x/  /tags/y/  (+ /page/N/)
//!     └── feeds               /index.xml  /index.json
//! ```
//!
//! Every route URL is unique within a build; a collision is a fatal error
//! because it would make the output undefined.

pub mod json_feed;
pub mod rss;

use crate::{
    config::{OutputFormat, SiteConfig},
    error::BuildError,
    render::{
        RenderedPage,
        theme::{ListPage, SiteContext, Theme},
    },
    taxonomy::{Taxonomy, TermKind},
    utils::{minify::minify_route, slug::slugify},
};
use std::{collections::BTreeMap, path::PathBuf};

// ============================================================================
// Routes
// ============================================================================

/// A single (format, URL) pair mapped to final rendered bytes.
#[derive(Debug, Clone)]
pub struct Route {
    /// Site-relative URL: `/`, `/posts-pca/`, `/index.xml`.
    pub url: String,

    pub format: OutputFormat,

    /// Final bytes, after minification if enabled.
    pub bytes: Vec<u8>,

    /// What produced this route, for collision reporting.
    pub origin: PathBuf,
}

impl Route {
    pub const fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// URL → route mapping for one build, iterated in URL order.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, Route>,
}

impl RouteTable {
    /// Insert a route, failing on URL collision.
    pub fn insert(&mut self, route: Route) -> Result<(), BuildError> {
        if let Some(existing) = self.routes.get(&route.url) {
            return Err(BuildError::RouteCollision {
                url: route.url,
                first: existing.origin.clone(),
                second: route.origin,
            });
        }
        self.routes.insert(route.url.clone(), route);
        Ok(())
    }

    pub fn get(&self, url: &str) -> Option<&Route> {
        self.routes.get(url)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

// ============================================================================
// Assembly
// ============================================================================

/// Build the full route table from the published page set.
///
/// `pages` must already exclude drafts (unless include-drafts is active).
pub fn assemble(
    pages: &[RenderedPage],
    taxonomy: &Taxonomy,
    theme: &dyn Theme,
    config: &SiteConfig,
) -> Result<RouteTable, BuildError> {
    let site = SiteContext::new(config);
    let mut table = RouteTable::default();

    // Newest first; dateless pages go last, ties broken by slug so the
    // ordering is total and stable.
    let mut ordered: Vec<&RenderedPage> = pages.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));

    if config.outputs.enabled(OutputFormat::Html) {
        assemble_singles(&mut table, pages, theme, &site, config)?;
        assemble_list(
            &mut table,
            &ordered,
            "/",
            &config.base.title,
            None,
            true,
            theme,
            &site,
            config,
        )?;
        assemble_terms(&mut table, &ordered, taxonomy, theme, &site, config)?;
    }

    if config.outputs.enabled(OutputFormat::Rss) {
        let xml = rss::rss_feed(&ordered, config)
            .map_err(|e| BuildError::render("<rss feed>", e.to_string()))?;
        table.insert(Route {
            url: "/index.xml".to_string(),
            format: OutputFormat::Rss,
            bytes: minify_route(OutputFormat::Rss, xml.into_bytes(), config),
            origin: PathBuf::from("<rss feed>"),
        })?;
    }

    if config.outputs.enabled(OutputFormat::Json) {
        let json = json_feed::json_feed(&ordered, config)
            .map_err(|e| BuildError::render("<json feed>", e.to_string()))?;
        table.insert(Route {
            url: "/index.json".to_string(),
            format: OutputFormat::Json,
            bytes: json.into_bytes(),
            origin: PathBuf::from("<json feed>"),
        })?;
    }

    Ok(table)
}

/// One HTML route per page.
fn assemble_singles(
    table: &mut RouteTable,
    pages: &[RenderedPage],
    theme: &dyn Theme,
    site: &SiteContext,
    config: &SiteConfig,
) -> Result<(), BuildError> {
    for page in pages {
        let html = theme.single(page, site);
        table.insert(html_route(page.url.clone(), html, page.path.clone(), config))?;
    }
    Ok(())
}

/// Paginated list routes under `base`, rendered with the home or list layout.
#[allow(clippy::too_many_arguments)]
fn assemble_list(
    table: &mut RouteTable,
    items: &[&RenderedPage],
    base: &str,
    title: &str,
    heading: Option<&str>,
    is_home: bool,
    theme: &dyn Theme,
    site: &SiteContext,
    config: &SiteConfig,
) -> Result<(), BuildError> {
    let chunks = paginate(items, config.build.page_size);
    let total_pages = chunks.len();

    for (i, chunk) in chunks.iter().enumerate() {
        let page_num = i + 1;
        let list = ListPage {
            title: title.to_string(),
            heading: heading.map(str::to_string),
            url: page_url(base, page_num),
            items: chunk.to_vec(),
            page_num,
            total_pages,
            prev: (page_num > 1).then(|| page_url(base, page_num - 1)),
            next: (page_num < total_pages).then(|| page_url(base, page_num + 1)),
        };
        let html = if is_home {
            theme.home(&list, site)
        } else {
            theme.list(&list, site)
        };
        let origin = PathBuf::from(format!("<list {base}page {page_num}>"));
        table.insert(html_route(list.url, html, origin, config))?;
    }
    Ok(())
}

/// Category and tag list pages in stable term order.
fn assemble_terms(
    table: &mut RouteTable,
    ordered: &[&RenderedPage],
    taxonomy: &Taxonomy,
    theme: &dyn Theme,
    site: &SiteContext,
    config: &SiteConfig,
) -> Result<(), BuildError> {
    for kind in [TermKind::Category, TermKind::Tag] {
        for (value, members) in taxonomy.terms(kind) {
            // Preserve the global newest-first order within the term.
            let items: Vec<&RenderedPage> = ordered
                .iter()
                .filter(|page| members.iter().any(|m| m == &page.slug))
                .copied()
                .collect();
            // All members may have been skipped by a failed render.
            if items.is_empty() {
                continue;
            }
            let base = format!("/{}/{}/", kind.section(), slugify(value));
            assemble_list(
                table, &items, &base, value, Some(value), false, theme, site, config,
            )?;
        }
    }
    Ok(())
}

fn html_route(url: String, html: String, origin: PathBuf, config: &SiteConfig) -> Route {
    Route {
        url,
        format: OutputFormat::Html,
        bytes: minify_route(OutputFormat::Html, html.into_bytes(), config),
        origin,
    }
}

/// URL of page `n` of a list: page 1 lives at the base itself.
fn page_url(base: &str, n: usize) -> String {
    if n == 1 {
        base.to_string()
    } else {
        format!("{base}page/{n}/")
    }
}

/// Split items into fixed-size pages; the last page may be partial.
/// An empty item set still yields one (empty) page.
fn paginate<'a>(items: &'a [&'a RenderedPage], size: usize) -> Vec<&'a [&'a RenderedPage]> {
    if items.is_empty() {
        return vec![&[]];
    }
    items.chunks(size.max(1)).collect()
}
