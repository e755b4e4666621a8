//! Theme layouts.
//!
//! A theme is a capability set: it renders the three page shapes (single,
//! list, home) and nothing else. Themes are selected by name at
//! configuration time; layouts receive everything through explicit context
//! parameters.

use super::{RenderedPage, escape_html};
use crate::config::{MenuEntry, SiteConfig};

// ============================================================================
// Contexts
// ============================================================================

/// Site-wide, read-only context shared by every layout call.
pub struct SiteContext<'a> {
    pub config: &'a SiteConfig,
    /// Menu entries already sorted by weight.
    pub menu: Vec<&'a MenuEntry>,
}

impl<'a> SiteContext<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self {
            config,
            menu: config.menu.sorted(),
        }
    }

    /// Absolute URL for a site-relative path.
    pub fn full_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base.url_trimmed(), path)
    }
}

/// One list page (home page or taxonomy term page) after pagination.
pub struct ListPage<'a> {
    /// Browser-tab title.
    pub title: String,

    /// Heading shown above the items; the home page shows the hero instead.
    pub heading: Option<String>,

    /// URL of this page.
    pub url: String,

    /// Items on this page, newest first.
    pub items: Vec<&'a RenderedPage>,

    /// 1-based page number.
    pub page_num: usize,

    pub total_pages: usize,

    /// URL of the previous (newer) page, if any.
    pub prev: Option<String>,

    /// URL of the next (older) page, if any.
    pub next: Option<String>,
}

// ============================================================================
// Theme Trait and Registry
// ============================================================================

/// A pluggable look-and-feel: three layouts, selected by config.
pub trait Theme: Send + Sync {
    /// Render one document's page.
    fn single(&self, page: &RenderedPage, site: &SiteContext) -> String;

    /// Render a taxonomy term or other list page.
    fn list(&self, list: &ListPage, site: &SiteContext) -> String;

    /// Render a home page (hero plus post list).
    fn home(&self, list: &ListPage, site: &SiteContext) -> String;
}

static PAPER: PaperTheme = PaperTheme;

/// Look up a theme by its config name.
pub fn by_name(name: &str) -> Option<&'static dyn Theme> {
    match name {
        "paper" => Some(&PAPER),
        _ => None,
    }
}

pub fn is_known(name: &str) -> bool {
    by_name(name).is_some()
}

// ============================================================================
// Paper Theme
// ============================================================================

/// Built-in minimal blog theme.
pub struct PaperTheme;

impl Theme for PaperTheme {
    fn single(&self, page: &RenderedPage, site: &SiteContext) -> String {
        let config = site.config;
        let mut main = String::new();

        main.push_str("<article class=\"post-single\">\n");
        main.push_str(&format!(
            "<header class=\"post-header\">\n<h1 class=\"post-title\">{}</h1>\n",
            escape_html(&page.title)
        ));
        main.push_str(&format!("<div class=\"post-meta\">{}</div>\n", meta_line(page, site)));
        main.push_str("</header>\n");
        main.push_str(&format!("<div class=\"post-content\">\n{}\n</div>\n", page.html));

        let terms = taxonomy_footer(page);
        if !terms.is_empty() {
            main.push_str(&terms);
        }
        if config.params.show_share_buttons {
            main.push_str(&share_buttons(page, site));
        }
        if config.params.comments {
            main.push_str("<div id=\"comments\" class=\"post-comments\"></div>\n");
        }
        main.push_str("</article>\n");

        shell(&page.title, &main, site)
    }

    fn list(&self, list: &ListPage, site: &SiteContext) -> String {
        let mut main = String::new();

        if let Some(heading) = &list.heading {
            main.push_str(&format!(
                "<header class=\"page-header\"><h1>{}</h1></header>\n",
                escape_html(heading)
            ));
        }
        main.push_str(&post_list(list, site));
        main.push_str(&pagination_nav(list));

        shell(&list.title, &main, site)
    }

    fn home(&self, list: &ListPage, site: &SiteContext) -> String {
        let params = &site.config.params;
        let mut main = String::new();

        // Hero only on the first page
        if list.page_num == 1 {
            main.push_str("<div class=\"home-info\">\n");
            if !params.home.title.is_empty() {
                main.push_str(&format!("<h1>{}</h1>\n", escape_html(&params.home.title)));
            }
            if !params.home.content.is_empty() {
                main.push_str(&format!("<p>{}</p>\n", escape_html(&params.home.content)));
            }
            if !params.social.is_empty() {
                main.push_str("<div class=\"social-icons\">\n");
                for icon in &params.social {
                    main.push_str(&format!(
                        "<a href=\"{}\" rel=\"me\" title=\"{}\"><span class=\"icon icon-{}\"></span></a>\n",
                        escape_html(&icon.url),
                        escape_html(&icon.name),
                        escape_html(&icon.name),
                    ));
                }
                main.push_str("</div>\n");
            }
            main.push_str("</div>\n");
        }

        main.push_str(&post_list(list, site));
        main.push_str(&pagination_nav(list));

        shell(&list.title, &main, site)
    }
}

// ============================================================================
// Layout Fragments
// ============================================================================

/// Common document shell: head, nav, main, footer.
fn shell(title: &str, main: &str, site: &SiteContext) -> String {
    let config = site.config;
    let mut head = String::new();

    head.push_str(&format!(
        "<meta charset=\"utf-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>{} | {}</title>\n",
        escape_html(title),
        escape_html(&config.base.title)
    ));
    if !config.base.description.is_empty() {
        head.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            escape_html(&config.base.description)
        ));
    }
    head.push_str("<link rel=\"stylesheet\" href=\"/css/paper.css\">\n");
    if config.markup.math {
        head.push_str(concat!(
            "<link rel=\"stylesheet\" href=\"https://cdn.jsdelivr.net/npm/katex@0.16/dist/katex.min.css\">\n",
            "<script defer src=\"https://cdn.jsdelivr.net/npm/katex@0.16/dist/katex.min.js\"></script>\n",
            "<script defer src=\"https://cdn.jsdelivr.net/npm/katex@0.16/dist/contrib/auto-render.min.js\"></script>\n",
        ));
    }

    let mut nav = String::new();
    nav.push_str(&format!(
        "<nav class=\"nav\">\n<a class=\"logo\" href=\"/\">{}</a>\n<ul class=\"menu\">\n",
        escape_html(&config.base.title)
    ));
    for entry in &site.menu {
        let target = if entry.is_external() {
            " target=\"_blank\" rel=\"noopener\""
        } else {
            ""
        };
        nav.push_str(&format!(
            "<li><a href=\"{}\"{}>{}</a></li>\n",
            escape_html(&entry.url),
            target,
            escape_html(&entry.name)
        ));
    }
    nav.push_str("</ul>\n</nav>\n");

    let footer = if config.base.copyright.is_empty() {
        String::new()
    } else {
        format!(
            "<footer class=\"footer\">{}</footer>\n",
            escape_html(&config.base.copyright)
        )
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n{}</head>\n<body>\n{}<main class=\"main\">\n{}</main>\n{}</body>\n</html>\n",
        escape_html(&config.base.language),
        head,
        nav,
        main,
        footer
    )
}

/// Date, reading time and author line under a post title.
fn meta_line(page: &RenderedPage, site: &SiteContext) -> String {
    let mut parts = Vec::new();
    if let Some(date) = &page.date {
        parts.push(format!(
            "<time datetime=\"{}\">{}</time>",
            date.to_rfc3339(),
            date.format("%Y-%m-%d")
        ));
    }
    if site.config.params.show_reading_time {
        parts.push(format!("{} min read", page.reading_time));
    }
    if let Some(author) = &page.author {
        parts.push(escape_html(author));
    }
    parts.join(" &middot; ")
}

/// Category and tag links at the end of a single page.
fn taxonomy_footer(page: &RenderedPage) -> String {
    if page.categories.is_empty() && page.tags.is_empty() {
        return String::new();
    }
    let mut out = String::from("<footer class=\"post-footer\"><ul class=\"post-terms\">\n");
    for value in &page.categories {
        out.push_str(&format!(
            "<li><a href=\"/categories/{}/\">{}</a></li>\n",
            crate::utils::slug::slugify(value),
            escape_html(value)
        ));
    }
    for value in &page.tags {
        out.push_str(&format!(
            "<li><a href=\"/tags/{}/\">#{}</a></li>\n",
            crate::utils::slug::slugify(value),
            escape_html(value)
        ));
    }
    out.push_str("</ul></footer>\n");
    out
}

/// Share links for a single page.
fn share_buttons(page: &RenderedPage, site: &SiteContext) -> String {
    let url = urlencoding::encode(&site.full_url(&page.url)).into_owned();
    let title = urlencoding::encode(&page.title).into_owned();
    format!(
        concat!(
            "<div class=\"share-buttons\">\n",
            "<a href=\"https://twitter.com/intent/tweet?url={url}&amp;text={title}\" rel=\"noopener\">x</a>\n",
            "<a href=\"https://www.linkedin.com/shareArticle?url={url}&amp;title={title}\" rel=\"noopener\">linkedin</a>\n",
            "<a href=\"https://reddit.com/submit?url={url}&amp;title={title}\" rel=\"noopener\">reddit</a>\n",
            "</div>\n",
        ),
        url = url,
        title = title,
    )
}

/// Post cards for a list page.
fn post_list(list: &ListPage, site: &SiteContext) -> String {
    let mut out = String::from("<div class=\"post-entries\">\n");
    for page in &list.items {
        out.push_str("<article class=\"post-entry\">\n");
        out.push_str(&format!(
            "<h2 class=\"entry-title\"><a href=\"{}\">{}</a></h2>\n",
            page.url,
            escape_html(&page.title)
        ));
        if let Some(summary) = &page.summary {
            out.push_str(&format!(
                "<p class=\"entry-summary\">{}</p>\n",
                escape_html(summary)
            ));
        }
        let meta = meta_line(page, site);
        if !meta.is_empty() {
            out.push_str(&format!("<div class=\"entry-meta\">{meta}</div>\n"));
        }
        out.push_str("</article>\n");
    }
    out.push_str("</div>\n");
    out
}

/// Older/newer links when a list spans multiple pages.
fn pagination_nav(list: &ListPage) -> String {
    if list.total_pages <= 1 {
        return String::new();
    }
    let mut out = String::from("<nav class=\"pagination\">\n");
    if let Some(prev) = &list.prev {
        out.push_str(&format!("<a class=\"prev\" href=\"{prev}\">&laquo; newer</a>\n"));
    }
    out.push_str(&format!(
        "<span class=\"page-num\">{} / {}</span>\n",
        list.page_num, list.total_pages
    ));
    if let Some(next) = &list.next {
        out.push_str(&format!("<a class=\"next\" href=\"{next}\">older &raquo;</a>\n"));
    }
    out.push_str("</nav>\n");
    out
}
