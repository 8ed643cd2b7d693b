//! Course portal client
//!
//! Thin HTTP implementation of the [`RecordSource`] seam: cookie-session
//! form login, paginated list scrape, and per-course detail fetch. The HTML
//! helpers below are deliberately naive string scanners tailored to the
//! portal markup; tag and attribute matching is ASCII case-insensitive.

use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::services::canonicalizer::canonicalize;
use crate::types::{CourseStub, RecordSource};

const USER_AGENT: &str = concat!("coursewatch/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Hard upper bound on list pagination, so a portal that echoes rows forever
/// cannot wedge the run.
const MAX_LIST_PAGES: usize = 50;

/// Fields extracted from one raw detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFields {
    pub body_text: String,
    pub updated_label: Option<String>,
    pub room: Option<String>,
}

/// Authenticated portal client
pub struct PortalClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: String,
}

impl PortalClient {
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("Invalid portal base URL: {}", e)))?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(HTTP_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Establish the portal session. Must complete before any list or detail
    /// fetch; the session cookie lives in the client's cookie store.
    pub async fn login(&self) -> Result<()> {
        let url = self
            .base_url
            .join("login")
            .map_err(|e| Error::Source(format!("Invalid login URL: {}", e)))?;

        let response = self
            .http
            .post(url)
            .form(&[
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Source(format!(
                "Portal login rejected with status {}",
                response.status()
            )));
        }

        info!("Portal login succeeded");
        Ok(())
    }

    async fn fetch_list_page(&self, page: usize) -> Result<String> {
        let mut url = self
            .base_url
            .join("courses")
            .map_err(|e| Error::Source(format!("Invalid list URL: {}", e)))?;
        url.query_pairs_mut().append_pair("page", &page.to_string());

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Source(format!(
                "List page {} returned status {}",
                page,
                response.status()
            )));
        }
        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl RecordSource for PortalClient {
    async fn list_stubs(&self) -> Result<Vec<CourseStub>> {
        let mut stubs = Vec::new();

        for page in 1..=MAX_LIST_PAGES {
            let html = self.fetch_list_page(page).await?;
            let page_stubs = parse_list_page(&html, &self.base_url);
            if page_stubs.is_empty() {
                break;
            }
            debug!(page, rows = page_stubs.len(), "Parsed course list page");
            stubs.extend(page_stubs);

            if page == MAX_LIST_PAGES {
                warn!(
                    cap = MAX_LIST_PAGES,
                    "List pagination cap reached, later pages are ignored"
                );
            }
        }

        Ok(stubs)
    }

    async fn fetch_detail(&self, detail_url: &str) -> Result<String> {
        let response = self.http.get(detail_url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Source(format!(
                "Detail page returned status {}",
                response.status()
            )));
        }
        Ok(response.text().await?)
    }
}

// ============================================================================
// List and detail page parsing
// ============================================================================

/// Parse one list page into course stubs.
///
/// A row is a `<tr class="course-row">` with five cells: code, linked title,
/// instructor, term, day/period. Rows without a detail link are skipped;
/// rows with an empty code yield a stub without an id candidate.
pub fn parse_list_page(html: &str, base_url: &Url) -> Vec<CourseStub> {
    let mut stubs = Vec::new();
    let mut pos = 0;

    while let Some((start, end)) = tag_block_ci(html, "<tr", "</tr>", pos) {
        pos = end;
        let row = &html[start..end];
        let open_tag = &row[..row.find('>').map(|i| i + 1).unwrap_or(row.len())];
        if !open_tag.to_ascii_lowercase().contains("course-row") {
            continue;
        }

        let mut cells: Vec<&str> = Vec::new();
        let mut cell_pos = 0;
        while let Some((cell_start, cell_end)) = tag_block_ci(row, "<td", "</td>", cell_pos) {
            cells.push(inner_of(&row[cell_start..cell_end]));
            cell_pos = cell_end;
        }
        if cells.len() < 5 {
            debug!(cells = cells.len(), "Skipping malformed course row");
            continue;
        }

        let href = tag_block_ci(cells[1], "<a", "</a>", 0)
            .and_then(|(link_start, link_end)| attr_ci(&cells[1][link_start..link_end], "href"));
        let Some(href) = href else {
            warn!("Course row has no detail link, skipping");
            continue;
        };
        let detail_url = base_url
            .join(&href)
            .map(|u| u.to_string())
            .unwrap_or(href);

        let code = strip_tags(cells[0]);

        stubs.push(CourseStub {
            id: (!code.is_empty()).then(|| code.clone()),
            title: strip_tags(cells[1]),
            detail_url,
            instructor: strip_tags(cells[2]),
            term: strip_tags(cells[3]),
            schedule: strip_tags(cells[4]),
        });
    }

    stubs
}

/// Extract body text, last-updated label, and room from a raw detail page.
///
/// If the expected `<div class="course-body">` container is missing, the
/// whole page is stripped to text so a restyled portal degrades to a noisier
/// fingerprint instead of an empty one.
pub fn extract_detail_fields(html: &str) -> DetailFields {
    let body_text = slice_inner_ci(html, "<div class=\"course-body\"", "</div>")
        .map(strip_tags)
        .unwrap_or_else(|| strip_tags(html));

    DetailFields {
        body_text,
        updated_label: marked_text(html, "class=\"updated\""),
        room: marked_text(html, "class=\"room\""),
    }
}

/// Text content of the first element carrying `marker` in its opening tag
fn marked_text(html: &str, marker: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let marker_at = lower.find(&marker.to_ascii_lowercase())?;
    let open_end = html[marker_at..].find('>')? + marker_at + 1;
    let close = html[open_end..].find("</")? + open_end;
    let text = strip_tags(&html[open_end..close]);
    (!text.is_empty()).then_some(text)
}

// ============================================================================
// HTML string helpers
// ============================================================================

/// Find the next complete `<open ...> ... </close>` block from `from`
/// onwards; returns byte offsets spanning the whole block.
fn tag_block_ci(s: &str, open_tag: &str, close_tag: &str, from: usize) -> Option<(usize, usize)> {
    let lower = s.to_ascii_lowercase();
    let start = lower.get(from..)?.find(&open_tag.to_ascii_lowercase())? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lower[open_end..].find(&close_tag.to_ascii_lowercase())?;
    Some((start, open_end + end_rel + close_tag.len()))
}

/// The content between an opening pattern's `>` and the closing pattern
fn slice_inner_ci<'a>(s: &'a str, open_pat: &str, close_pat: &str) -> Option<&'a str> {
    let lower = s.to_ascii_lowercase();
    let open_at = lower.find(&open_pat.to_ascii_lowercase())?;
    let after_open = s[open_at..].find('>')? + open_at + 1;
    let close_rel = lower[after_open..].find(&close_pat.to_ascii_lowercase())?;
    Some(&s[after_open..after_open + close_rel])
}

/// Inner content of a complete tag block like `<td ...>INNER</td>`
fn inner_of(block: &str) -> &str {
    match (block.find('>'), block.rfind('<')) {
        (Some(open), Some(close)) if close > open => &block[open + 1..close],
        _ => "",
    }
}

/// Value of an attribute inside an opening tag; quoted or bare
fn attr_ci(tag: &str, name: &str) -> Option<String> {
    let lower = tag.to_ascii_lowercase();
    let pattern = format!("{}=", name.to_ascii_lowercase());
    let at = lower.find(&pattern)?;
    let rest = &tag[at + pattern.len()..];

    let value = match rest.chars().next()? {
        '"' => &rest[1..1 + rest[1..].find('"')?],
        '\'' => &rest[1..1 + rest[1..].find('\'')?],
        _ => rest
            .split(|c: char| c.is_whitespace() || c == '>')
            .next()
            .unwrap_or(""),
    };
    Some(decode_entities(value))
}

/// Remove all `<...>` tags (each tag becomes a word boundary), decode common
/// entities, then collapse whitespace.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    canonicalize(&decode_entities(&out))
}

/// Minimal entity decoding for the entities the portal actually emits
fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", "\u{00A0}")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
