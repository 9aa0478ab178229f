//! Finding the list pages to crawl.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

use crate::fetcher::{FetchError, PageSource};

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Site path holding the entry list pages.
pub const LIST_PATH_PREFIX: &str = "/conteudo/pokemon/";
pub const LIST_PAGE_SUFFIX: &str = ".htm";

/// Absolute, sorted, deduplicated list page URLs linked from `html`.
pub fn list_page_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.starts_with(LIST_PATH_PREFIX) && href.ends_with(LIST_PAGE_SUFFIX))
        .filter_map(|href| match base_url.join(href) {
            Ok(url) => Some(String::from(url)),
            Err(err) => {
                debug!(href, error = %err, "ignoring unresolvable link");
                None
            }
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Fetch `start_page` and return every list page it links to.
///
/// The start page itself is always part of the result, first when it was
/// not among the discovered links.
pub async fn discover_pages<S: PageSource + ?Sized>(
    source: &S,
    start_page: &str,
    base_url: &Url,
) -> Result<Vec<String>, FetchError> {
    let page = source.fetch_page(start_page).await?;
    let mut urls = list_page_links(&page.body_utf8, base_url);

    if !urls.iter().any(|url| url == start_page) {
        urls.insert(0, start_page.to_string());
    }

    info!(count = urls.len(), start_page, "pages discovered");
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://pokemythology.net").unwrap()
    }

    #[test]
    fn test_keeps_only_list_pages() {
        let html = r#"
            <a href="/conteudo/pokemon/lista02.htm">2</a>
            <a href="/conteudo/pokemon/lista01.htm">1</a>
            <a href="/conteudo/pokemon/lista02.htm">2 again</a>
            <a href="/conteudo/itens/lista01.htm">items</a>
            <a href="/conteudo/pokemon/lista03.html">html</a>
            <a href="lista04.htm">relative</a>
            <a>no href</a>
        "#;

        assert_eq!(
            list_page_links(html, &base()),
            [
                "https://pokemythology.net/conteudo/pokemon/lista01.htm",
                "https://pokemythology.net/conteudo/pokemon/lista02.htm",
            ]
        );
    }
}
