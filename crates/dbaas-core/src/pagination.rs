//! Lazy, restartable paging over collection endpoints
//!
//! A [`Pager`] only remembers where a listing starts. Nothing is fetched until
//! one of [`Pager::each_page`], [`Pager::all_pages`] or [`Pager::stream`] is
//! called, and each of them starts over from the first page.
//!
//! ```rust,ignore
//! let pager = dbaas_core::instances::list(&client);
//! pager
//!     .each_page(|page| {
//!         for instance in page.extract_instances()? {
//!             println!("{} {}", instance.id, instance.status);
//!         }
//!         Ok(true) // keep going
//!     })
//!     .await?;
//! ```

use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::client::{Headers, ServiceClient};
use crate::error::Result;

/// Raw page as returned by the service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    /// URL the page was fetched from
    pub url: String,
    pub body: Value,
    pub headers: Headers,
}

/// A decoded page of a listing
pub trait Page: Sized {
    /// URL of the following page, `None` on the last page
    fn next_page_url(&self) -> Result<Option<String>>;

    /// True when the page carries no items; paging stops there
    fn is_empty(&self) -> Result<bool>;
}

/// A hypertext link as found in `*_links` arrays
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Link {
    pub href: String,
    #[serde(default)]
    pub rel: String,
}

/// Page whose successor is advertised by a `rel = "next"` link
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedPage {
    pub result: PageResult,
    links_key: &'static str,
}

impl LinkedPage {
    /// Wrap `result`, reading links from the top-level `links_key` array
    #[must_use]
    pub fn new(result: PageResult, links_key: &'static str) -> Self {
        Self { result, links_key }
    }

    /// Resolve the `next` link, relative links against the page URL
    pub fn next_page_url(&self) -> Result<Option<String>> {
        let Some(links) = self.result.body.get(self.links_key) else {
            return Ok(None);
        };
        let links: Vec<Link> = serde_json::from_value(links.clone())?;
        let Some(next) = links.into_iter().find(|l| l.rel == "next") else {
            return Ok(None);
        };
        if next.href.is_empty() {
            return Ok(None);
        }

        let resolved = match Url::parse(&next.href) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Url::parse(&self.result.url)?.join(&next.href)?
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Some(resolved.to_string()))
    }
}

/// Lazy sequence of pages starting at `initial_url`
pub struct Pager<'c, C: ?Sized, P> {
    client: &'c C,
    initial_url: String,
    create_page: fn(PageResult) -> P,
}

impl<'c, C, P> Pager<'c, C, P>
where
    C: ServiceClient + ?Sized,
    P: Page,
{
    /// Create a pager; `create_page` decodes each raw page
    pub fn new(
        client: &'c C,
        initial_url: impl Into<String>,
        create_page: fn(PageResult) -> P,
    ) -> Self {
        Self {
            client,
            initial_url: initial_url.into(),
            create_page,
        }
    }

    #[must_use]
    pub fn initial_url(&self) -> &str {
        &self.initial_url
    }

    async fn fetch(&self, url: &str) -> Result<P> {
        debug!(url, "fetching page");
        let response = self.client.get(url, None).await?;
        Ok((self.create_page)(PageResult {
            url: url.to_string(),
            body: response.body.unwrap_or(Value::Null),
            headers: response.headers,
        }))
    }

    /// Fetch the page at `next` and the URL of the one after it
    async fn advance(&self, next: Option<String>) -> Result<Option<(P, Option<String>)>> {
        let Some(url) = next else {
            return Ok(None);
        };
        let page = self.fetch(&url).await?;
        if page.is_empty()? {
            return Ok(None);
        }
        // A page linking to itself would never terminate.
        let following = page.next_page_url()?.filter(|n| *n != url);
        Ok(Some((page, following)))
    }

    /// Visit pages in order until the listing ends or `handler` returns false
    pub async fn each_page<F>(&self, mut handler: F) -> Result<()>
    where
        F: FnMut(P) -> Result<bool>,
    {
        let mut next = Some(self.initial_url.clone());
        while let Some((page, following)) = self.advance(next).await? {
            if !handler(page)? {
                break;
            }
            next = following;
        }
        Ok(())
    }

    /// Fetch every page
    pub async fn all_pages(&self) -> Result<Vec<P>> {
        let mut pages = Vec::new();
        self.each_page(|page| {
            pages.push(page);
            Ok(true)
        })
        .await?;
        Ok(pages)
    }

    /// Pages as a `Stream`; a page is fetched only when polled
    pub fn stream(&self) -> impl Stream<Item = Result<P>> + '_ {
        stream::try_unfold(Some(self.initial_url.clone()), move |next| self.advance(next))
    }
}
