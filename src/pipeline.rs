//! Request pipeline.
//!
//! Composes the stages for one selector: resolve, fetch, classify, then
//! either sanitize + render + emit (HTML), pass through (text) or reject.
//! Every error ends the request with a one-line reply and nothing else.

use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, error, info};

use crate::classify::{classify, ContentClass};
use crate::config::{CharsetPolicy, Config, GatewayIdentity};
use crate::error_handling::{GatewayError, GatewayStats, InfoType, InitializationError};
use crate::fetch::{FetchedResource, Fetcher};
use crate::gophermap::{Gophermap, GophermapLine};
use crate::render::{Html2TextRenderer, TextRenderer};
use crate::sanitize::sanitize_html;
use crate::selector::{resolve_selector, ResolvedSelector};

/// Everything a request needs, built once at startup and shared read-only.
#[derive(Clone)]
pub struct GatewayContext {
    fetcher: Fetcher,
    renderer: Arc<dyn TextRenderer>,
    identity: Arc<GatewayIdentity>,
    charset: CharsetPolicy,
    root_page: PathBuf,
    stats: Arc<GatewayStats>,
}

impl GatewayContext {
    /// Builds the context from the configuration and an HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::ListenAddressError` if the gateway
    /// identity cannot be derived from the listen address.
    pub fn new(config: &Config, client: Arc<reqwest::Client>) -> Result<Self, InitializationError> {
        Ok(Self {
            fetcher: Fetcher::new(client),
            renderer: Arc::new(Html2TextRenderer::new()),
            identity: Arc::new(config.identity()?),
            charset: config.charset,
            root_page: config.root_page.clone(),
            stats: Arc::new(GatewayStats::new()),
        })
    }

    /// Replaces the HTML-to-text renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn TextRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn identity(&self) -> &GatewayIdentity {
        &self.identity
    }

    pub fn stats(&self) -> &Arc<GatewayStats> {
        &self.stats
    }

    /// Handles one selector and returns the response body.
    ///
    /// Never fails: errors are logged, counted, and turned into a one-line
    /// reply. The closing `.` line is left to the transport.
    pub async fn handle_selector(&self, selector: &str) -> Vec<u8> {
        info!("Selector: {selector}");
        match self.respond(selector).await {
            Ok(body) => body,
            Err(e) => {
                match e.url() {
                    Some(url) => error!("{e} (url: {url})"),
                    None => error!("{e}"),
                }
                self.stats.increment_error(e.error_type());
                error_reply(&e).to_bytes(&self.identity, self.charset)
            }
        }
    }

    async fn respond(&self, selector: &str) -> Result<Vec<u8>, GatewayError> {
        let target = match resolve_selector(selector) {
            ResolvedSelector::Root => {
                let page = self.read_root_page().await?;
                self.stats.increment_info(InfoType::RootPage);
                return Ok(page);
            }
            ResolvedSelector::Target(target) => target,
        };

        let resource = self.fetcher.fetch(&target).await?;
        let (map, kind) = render_resource(&resource, self.renderer.as_ref())?;
        debug!(
            "Rendered {target} as {} ({} records, {} links)",
            kind.as_str(),
            map.len(),
            map.link_count()
        );
        self.stats.increment_info(kind);
        Ok(map.to_bytes(&self.identity, self.charset))
    }

    /// The welcome gophermap, read from disk on every root request.
    async fn read_root_page(&self) -> Result<Vec<u8>, GatewayError> {
        tokio::fs::read(&self.root_page)
            .await
            .map_err(|source| GatewayError::RootPage {
                path: self.root_page.clone(),
                source,
            })
    }
}

/// Turns a fetched resource into a gophermap.
///
/// Pure: the same resource always yields the same gophermap. Returns the kind
/// of page served alongside it, for statistics.
///
/// # Errors
///
/// - `GatewayError::UnsupportedContent` for non-HTML, non-text MIME types
/// - `GatewayError::Render` if the renderer rejects the document
pub fn render_resource(
    resource: &FetchedResource,
    renderer: &dyn TextRenderer,
) -> Result<(Gophermap, InfoType), GatewayError> {
    let class = classify(&resource.mime_type);
    debug!(
        "Classified {} (MIME type '{}') as {class:?}",
        resource.url, resource.mime_type
    );

    match class {
        ContentClass::Unsupported => Err(GatewayError::UnsupportedContent {
            url: resource.url.to_string(),
            mime_type: resource.mime_type.clone(),
        }),
        ContentClass::PlainText => Ok((
            Gophermap::from_plain_text(&resource.body_text()),
            InfoType::PlainTextPage,
        )),
        ContentClass::Html => {
            let html = sanitize_html(&resource.body_text(), &resource.url);
            let rendered = renderer
                .render(&html)
                .map_err(|message| GatewayError::Render {
                    url: resource.url.to_string(),
                    message,
                })?;
            Ok((Gophermap::from_rendered(&rendered), InfoType::HtmlPage))
        }
    }
}

/// The one-line reply for a failed request.
///
/// Unsupported content is reported as an info line, anything else as a
/// Gopher error item.
pub fn error_reply(error: &GatewayError) -> Gophermap {
    let line = match error {
        GatewayError::UnsupportedContent { .. } => GophermapLine::info(error.to_string()),
        _ => GophermapLine::error(error.to_string()),
    };
    Gophermap::single(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    struct FailingRenderer;

    impl TextRenderer for FailingRenderer {
        fn render(&self, _html: &str) -> Result<Vec<String>, String> {
            Err("renderer exploded".to_string())
        }
    }

    fn resource(url: &str, mime: &str, body: &str) -> FetchedResource {
        FetchedResource::new(Url::parse(url).unwrap(), mime, body.as_bytes())
    }

    fn identity() -> GatewayIdentity {
        GatewayIdentity::new("localhost", 7000)
    }

    #[test]
    fn test_single_anchor_becomes_single_link() {
        let res = resource(
            "https://www.example.com",
            "text/html",
            r#"<a href="/about">About</a>"#,
        );
        let (map, kind) = render_resource(&res, &Html2TextRenderer::new()).unwrap();
        assert_eq!(kind, InfoType::HtmlPage);
        let links: Vec<_> = map
            .lines()
            .iter()
            .filter(|l| matches!(l, GophermapLine::Link { .. }))
            .collect();
        assert_eq!(
            links,
            vec![&GophermapLine::link("About", "https://www.example.com/about")]
        );
        assert!(map
            .to_text(&identity())
            .contains("1About\thttps://www.example.com/about\tlocalhost\t7000\r\n"));
    }

    #[test]
    fn test_unparsable_href_is_kept_as_text() {
        let res = resource(
            "https://www.example.com/",
            "text/html",
            r#"<p>before <a href="http://[oops/">Broken</a> after</p>"#,
        );
        let (map, _) = render_resource(&res, &Html2TextRenderer::new()).unwrap();
        assert_eq!(map.link_count(), 0);
        assert_eq!(map.lines(), &[GophermapLine::info("before [Broken] after")]);
    }

    fn links_of(map: &Gophermap) -> Vec<&GophermapLine> {
        map.lines()
            .iter()
            .filter(|l| matches!(l, GophermapLine::Link { .. }))
            .collect()
    }

    #[test]
    fn test_bracketed_anchor_text_becomes_link() {
        let res = resource(
            "https://www.example.com/",
            "text/html",
            r#"<p>Fact<a href="/cite">[1]</a></p>"#,
        );
        let (map, _) = render_resource(&res, &Html2TextRenderer::new()).unwrap();
        assert_eq!(
            map.lines(),
            &[
                GophermapLine::info("Fact"),
                GophermapLine::link("[1]", "https://www.example.com/cite"),
            ]
        );
    }

    #[test]
    fn test_parenthesized_href_is_selector_verbatim() {
        let res = resource(
            "https://www.example.com/",
            "text/html",
            r#"<a href="/wiki/Foo_(bar)">Foo</a>"#,
        );
        let (map, _) = render_resource(&res, &Html2TextRenderer::new()).unwrap();
        let expected = Url::parse("https://www.example.com/")
            .unwrap()
            .join("/wiki/Foo_(bar)")
            .unwrap();
        assert_eq!(expected.as_str(), "https://www.example.com/wiki/Foo_(bar)");
        assert_eq!(
            links_of(&map),
            vec![&GophermapLine::link("Foo", expected.as_str())]
        );
    }

    #[test]
    fn test_query_string_ampersands_survive() {
        let res = resource(
            "https://www.example.com/",
            "text/html",
            r#"<a href="/s?x=1&amp;y=2">A</a><br><a href="/s?x=1&copy=2">B</a>"#,
        );
        let (map, _) = render_resource(&res, &Html2TextRenderer::new()).unwrap();
        assert_eq!(
            links_of(&map),
            vec![
                &GophermapLine::link("A", "https://www.example.com/s?x=1&y=2"),
                &GophermapLine::link("B", "https://www.example.com/s?x=1&copy=2"),
            ]
        );
    }

    #[test]
    fn test_plain_text_passthrough() {
        let res = resource("https://x.test/a.txt", "text/plain", "line one\nline two\n");
        let (map, kind) = render_resource(&res, &Html2TextRenderer::new()).unwrap();
        assert_eq!(kind, InfoType::PlainTextPage);
        assert_eq!(
            map.to_text(&identity()),
            "iline one\t-\t-\t-\r\niline two\t-\t-\t-\r\n"
        );
    }

    #[test]
    fn test_plain_text_is_not_treated_as_html() {
        let res = resource("https://x.test/a.txt", "text/plain", "<a href=\"/x\">x</a>");
        let (map, _) = render_resource(&res, &Html2TextRenderer::new()).unwrap();
        assert_eq!(map.link_count(), 0);
        assert_eq!(map.lines(), &[GophermapLine::info("<a href=\"/x\">x</a>")]);
    }

    #[test]
    fn test_binary_is_rejected() {
        let res = resource(
            "http://x.test/file.bin",
            "application/octet-stream",
            "\u{0}\u{1}",
        );
        let err = render_resource(&res, &Html2TextRenderer::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Not an HTML or text document: http://x.test/file.bin (MIME type is application/octet-stream)"
        );
        assert_eq!(
            error_reply(&err).to_text(&identity()),
            "iNot an HTML or text document: http://x.test/file.bin (MIME type is application/octet-stream)\t-\t-\t-\r\n"
        );
    }

    #[test]
    fn test_render_failure() {
        let res = resource("https://x.test/", "text/html", "<p>x</p>");
        let err = render_resource(&res, &FailingRenderer).unwrap_err();
        assert_eq!(
            err.to_string(),
            "error converting html to text: renderer exploded"
        );
        assert_eq!(
            error_reply(&err).to_text(&identity()),
            "3error converting html to text: renderer exploded\tError\terror.host\t1\r\n"
        );
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let body = "<h1>Title</h1><p>Some text with <a href=\"rel\">a link</a>.</p>\
                    <ul><li>one</li><li>two</li></ul>";
        let res = resource("https://www.example.com/dir/", "text/html", body);
        let renderer = Html2TextRenderer::new();
        let (first, _) = render_resource(&res, &renderer).unwrap();
        let (second, _) = render_resource(&res, &renderer).unwrap();
        assert_eq!(
            first.to_bytes(&identity(), CharsetPolicy::default()),
            second.to_bytes(&identity(), CharsetPolicy::default())
        );
        assert!(first
            .lines()
            .contains(&GophermapLine::link("a link", "https://www.example.com/dir/rel")));
    }

    #[test]
    fn test_script_links_are_not_emitted() {
        let res = resource(
            "https://www.example.com/",
            "text/html",
            "<script>var s = '<a href=\"/evil\">';</script><p>safe</p>",
        );
        let (map, _) = render_resource(&res, &Html2TextRenderer::new()).unwrap();
        assert_eq!(map.link_count(), 0);
        assert!(!map.to_text(&identity()).contains("evil"));
    }

    #[tokio::test]
    async fn test_root_selector_serves_file_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.gopher");
        let page = "iWelcome\t-\t-\t-\r\n7Search the web\t\tlocalhost\t7000\r\n";
        std::fs::write(&path, page).unwrap();

        let config = Config {
            root_page: path,
            ..Config::default()
        };
        let ctx = GatewayContext::new(&config, Arc::new(reqwest::Client::new())).unwrap();
        assert_eq!(ctx.handle_selector("").await, page.as_bytes());
        assert_eq!(ctx.handle_selector("/").await, page.as_bytes());
        assert_eq!(ctx.stats().get_info_count(InfoType::RootPage), 2);
    }

    #[tokio::test]
    async fn test_missing_root_page_is_an_error_line() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            root_page: dir.path().join("missing.gopher"),
            ..Config::default()
        };
        let ctx = GatewayContext::new(&config, Arc::new(reqwest::Client::new())).unwrap();
        let reply = String::from_utf8(ctx.handle_selector("").await).unwrap();
        assert!(reply.starts_with("3error reading root page"));
        assert!(reply.ends_with("\tError\terror.host\t1\r\n"));
        assert_eq!(
            ctx.stats()
                .get_error_count(crate::error_handling::ErrorType::RootPageError),
            1
        );
    }
}
