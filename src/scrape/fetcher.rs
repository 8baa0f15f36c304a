use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::models::{Batch, Verse, strip_tags, to_display_name, to_key};

/// Selector for the citation link on the random-verse page
pub const CITATION_SELECTOR: &str = "div.vr a.vc";
/// Selector for the verse body on the random-verse page
pub const TEXT_SELECTOR: &str = "span.v1";

/// Citation and body extracted from one page, markup already stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedVerse {
    pub citation: String,
    pub text: String,
}

impl ScrapedVerse {
    pub fn into_verse(self) -> Verse {
        Verse::new(to_key(&self.citation), to_display_name(&self.citation), self.text)
    }
}

/// Scrapes random verses from a web page
pub struct VerseFetcher {
    client: Client,
    url: String,
}

impl VerseFetcher {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Fetch `count` verses, one request each
    pub async fn fetch(&self, count: usize) -> Result<Batch> {
        let mut batch = Batch::new();

        for i in 0..count {
            info!("fetch request: {}", i + 1);
            let scraped = self.fetch_one().await?;
            let verse = scraped.into_verse();
            debug!("Fetched {} ({} chars)", verse.key, verse.text.len());
            batch.insert(verse);
        }

        Ok(batch)
    }

    /// Fetch and parse a single random verse
    pub async fn fetch_one(&self) -> Result<ScrapedVerse> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to request verse page: {}", self.url))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Verse page error: {} - {}", status, self.url);
        }

        let body = response
            .text()
            .await
            .context("Failed to read verse page body")?;

        parse_verse_page(&body)
    }
}

/// Extract citation and verse text from the page HTML
pub fn parse_verse_page(html: &str) -> Result<ScrapedVerse> {
    let document = Html::parse_document(html);

    let citation = select_first(&document, CITATION_SELECTOR)
        .context("Verse citation not found on page")?;
    let text = select_first(&document, TEXT_SELECTOR).context("Verse text not found on page")?;

    Ok(ScrapedVerse {
        citation: clean_markup(&citation),
        text: clean_markup(&text),
    })
}

/// Strip tags, then turn entities (`&amp;`, `&nbsp;`, ...) back into characters
fn clean_markup(raw: &str) -> String {
    html_escape::decode_html_entities(&strip_tags(raw)).into_owned()
}

/// Outer HTML of the first element matching `selector`
fn select_first(document: &Html, selector: &str) -> Result<String> {
    let parsed =
        Selector::parse(selector).map_err(|e| anyhow::anyhow!("Invalid selector: {:?}", e))?;
    document
        .select(&parsed)
        .next()
        .map(|element| element.html())
        .with_context(|| format!("No element matches {:?}", selector))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<div class="bibleVerse">
  <span class="v1">Love is patient, love is <em>kind</em>.</span>
  <div class="vr"><a class="vc" href="/1-corinthians/13/4">1 Corinthians 13:4</a></div>
</div>
</body></html>"#;

    #[test]
    fn test_parse_verse_page() {
        let scraped = parse_verse_page(PAGE).unwrap();

        assert_eq!(scraped.citation, "1 Corinthians 13:4");
        assert_eq!(scraped.text, "Love is patient, love is kind.");
    }

    #[test]
    fn test_into_verse() {
        let verse = parse_verse_page(PAGE).unwrap().into_verse();

        assert_eq!(verse.key, "1_Corinthians_13.4");
        assert_eq!(verse.display_name, "First  Corinthians 13, 4");
        assert!(verse.commentary.is_none());
    }

    #[test]
    fn test_entities_are_decoded() {
        let html = r#"<div class="vr"><a class="vc">Psalm 23:1</a></div>
<span class="v1">Faith&nbsp;&amp; hope &lt;3</span>"#;
        let scraped = parse_verse_page(html).unwrap();

        assert_eq!(scraped.text, "Faith\u{a0}& hope <3");
        assert_eq!(scraped.citation, "Psalm 23:1");
    }

    #[test]
    fn test_missing_citation() {
        let html = r#"<html><body><span class="v1">text</span></body></html>"#;
        let err = parse_verse_page(html).unwrap_err();
        assert!(err.to_string().contains("citation"));
    }

    #[test]
    fn test_missing_text() {
        let html = r#"<div class="vr"><a class="vc">John 3:16</a></div>"#;
        let err = parse_verse_page(html).unwrap_err();
        assert!(err.to_string().contains("text"));
    }
}
