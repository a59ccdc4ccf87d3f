//! Selector resolution.
//!
//! Turns the raw selector a Gopher client sent into either the root page or
//! the web URL to fetch.

/// What a selector asks the gateway for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSelector {
    /// Empty selector: serve the static welcome gophermap, fetch nothing.
    Root,
    /// Absolute `http`/`https` URL to fetch.
    Target(String),
}

/// Resolves a Gopher selector into a fetch target.
///
/// Strips one leading `/` and then one leading tab (search items arrive as
/// `\t<query>`). What remains is the root selector when empty (or `/`),
/// otherwise a URL; `https://` is prepended when neither `http://` nor
/// `https://` is present.
///
/// No validation happens here. A target that is not a valid URL fails later,
/// at fetch time.
///
/// # Arguments
///
/// * `selector` - The selector as received, without the line terminator
pub fn resolve_selector(selector: &str) -> ResolvedSelector {
    let requested = selector.strip_prefix('/').unwrap_or(selector);
    let requested = requested.strip_prefix('\t').unwrap_or(requested);

    if requested.is_empty() || requested == "/" {
        return ResolvedSelector::Root;
    }

    if requested.starts_with("https://") || requested.starts_with("http://") {
        ResolvedSelector::Target(requested.to_string())
    } else {
        ResolvedSelector::Target(format!("https://{requested}"))
    }
}
