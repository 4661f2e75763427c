//! Secondary source: one page per issuing country
//!
//! These pages carry collector prices and better pictures. Records are
//! produced in the same shape as the primary source so they can be merged.

use crate::coin::{truncate_description, CoinRecord, Condition, DEFAULT_MINTAGE};
use crate::config::ScraperConfig;
use crate::scraper::extract::{PageExtractor, Records, Strategy};
use crate::scraper::fetch_loop::FetchLoop;
use crate::scraper::html::{
    coin_containers, element_text, first_text, image_source, parse_selector, resolve_url,
};
use crate::CoinError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use url::Url;

const ARTICLE_CLASSES: [&str; 3] = ["coin", "post", "entry"];
const CONTAINER_CLASSES: [&str; 3] = ["coin", "image", "thumbnail"];

/// Context of one fetched country page
#[derive(Debug, Clone)]
pub struct CountryPage {
    /// Slug used in the page URL, e.g. `san-marino`
    pub slug: String,
    pub base_url: Url,
}

impl CountryPage {
    /// Display name of the country, e.g. `San Marino`
    pub fn country_name(&self) -> String {
        country_name(&self.slug)
    }
}

/// Collector prices found on a page, per condition
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Prices {
    pub fdc: Option<f64>,
    pub bu: Option<f64>,
    pub be: Option<f64>,
}

struct Selectors {
    articles: Selector,
    containers: Selector,
    images: Selector,
    article_titles: Selector,
    nearby_titles: Selector,
}

fn selectors() -> &'static Selectors {
    static SELECTORS: OnceLock<Selectors> = OnceLock::new();
    SELECTORS.get_or_init(|| Selectors {
        articles: parse_selector("article, div"),
        containers: parse_selector("div, figure, a"),
        images: parse_selector("img"),
        article_titles: parse_selector("h1, h2, h3, h4, a"),
        nearby_titles: parse_selector("h1, h2, h3, h4, a, p"),
    })
}

fn year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(20\d{2})\b").expect("year regex is valid"))
}

fn mintage_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:mintage|tirage|tiragem)[:\s]+([0-9][0-9,.]*)")
            .expect("mintage regex is valid")
    })
}

fn price_regexes() -> &'static [(Condition, Regex); 3] {
    static RES: OnceLock<[(Condition, Regex); 3]> = OnceLock::new();
    RES.get_or_init(|| {
        let price = |label: &str| {
            Regex::new(&format!(r"\b{}\b[:\s]+[€$]?\s*([0-9]+(?:[.,][0-9]+)?)", label))
                .expect("price regex is valid")
        };
        [
            (Condition::Fdc, price("FDC")),
            (Condition::Bu, price("BU")),
            (Condition::Be, price("BE")),
        ]
    })
}

/// Builds the URL of the commemorative page for a country slug
pub fn country_page_url(base_url: &str, slug: &str) -> String {
    format!(
        "{}/en/{}-2-euro-commemorative-coins/",
        base_url.trim_end_matches('/'),
        slug
    )
}

/// Turns a slug into a display name: `san-marino` becomes `San Marino`
pub fn country_name(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extractor for country pages: articles first, then image containers
pub fn secondary_extractor() -> PageExtractor<CountryPage> {
    PageExtractor::new(vec![
        ("article", article_strategy as Strategy<CountryPage>),
        ("container", container_strategy as Strategy<CountryPage>),
    ])
}

/// Fetches every configured country page and extracts its coins
pub async fn scrape_secondary(
    fetch_loop: &FetchLoop<'_>,
    config: &ScraperConfig,
) -> Result<Vec<CoinRecord>, CoinError> {
    let base_url = Url::parse(&config.secondary_base_url)?;
    let extractor = secondary_extractor();

    let records = fetch_loop
        .run(
            config.countries.iter(),
            |slug| country_page_url(&config.secondary_base_url, slug),
            |body, slug| {
                let page = CountryPage {
                    slug: slug.to_string(),
                    base_url: base_url.clone(),
                };
                extractor.extract(body, &page)
            },
        )
        .await;

    tracing::info!("Total coins scraped from secondary source: {}", records.len());
    Ok(records)
}

/// Article strategy: post-like blocks with an image and a year
pub fn article_strategy<'a>(document: &'a Html, page: &'a CountryPage) -> Records<'a> {
    let articles = coin_containers(document, &selectors().articles, &ARTICLE_CLASSES);
    Box::new(
        articles
            .into_iter()
            .filter_map(move |article| coin_from_article(&article, page)),
    )
}

/// Container strategy: image blocks whose nearby title carries a year
pub fn container_strategy<'a>(document: &'a Html, page: &'a CountryPage) -> Records<'a> {
    let containers = coin_containers(document, &selectors().containers, &CONTAINER_CLASSES);
    Box::new(
        containers
            .into_iter()
            .filter_map(move |container| coin_from_container(&container, page)),
    )
}

fn coin_from_article(article: &ElementRef, page: &CountryPage) -> Option<CoinRecord> {
    let src = image_source(article, &selectors().images)?;
    let text = element_text(article);

    let Some(year) = find_year(&text) else {
        tracing::debug!("Skipping {} article without year", page.slug);
        return None;
    };

    let title = first_text(article, &selectors().article_titles).unwrap_or_default();
    let mintage = parse_mintage(&text);
    let prices = extract_prices(&text);

    let mut coin = CoinRecord::estimated(
        page.country_name(),
        year,
        &title,
        mintage,
        resolve_url(src, &page.base_url),
    );
    coin.value_fdc = prices.fdc.unwrap_or(coin.value_fdc);
    coin.value_bu = prices.bu.unwrap_or(coin.value_bu);
    coin.value_be = prices.be.unwrap_or(coin.value_be);
    Some(coin)
}

fn coin_from_container(container: &ElementRef, page: &CountryPage) -> Option<CoinRecord> {
    let src = image_source(container, &selectors().images)?;
    let title = nearby_title(container)?;
    let year = find_year(&title)?;

    Some(CoinRecord::estimated(
        page.country_name(),
        year,
        &truncate_description(&title),
        DEFAULT_MINTAGE,
        resolve_url(src, &page.base_url),
    ))
}

/// Title heuristic for bare containers: look in the container, then its
/// parent, then its next sibling element
fn nearby_title(container: &ElementRef) -> Option<String> {
    let parent = container.parent().and_then(ElementRef::wrap);
    let sibling = container.next_siblings().find_map(ElementRef::wrap);

    [Some(*container), parent, sibling]
        .into_iter()
        .flatten()
        .find_map(|element| first_text(&element, &selectors().nearby_titles))
}

/// Finds the first `20xx` year in a text
pub fn find_year(text: &str) -> Option<i32> {
    year_regex()
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Mintage heuristic: number after a `mintage`/`tirage`/`tiragem` label,
/// thousands separators removed
pub fn parse_mintage(text: &str) -> u64 {
    mintage_regex()
        .captures(text)
        .and_then(|caps| {
            caps[1]
                .chars()
                .filter(char::is_ascii_digit)
                .collect::<String>()
                .parse()
                .ok()
        })
        .unwrap_or(DEFAULT_MINTAGE)
}

/// Price heuristic: `FDC: 5€`, `BU 10`, `BE: €15,50`
pub fn extract_prices(text: &str) -> Prices {
    let mut prices = Prices::default();

    for (condition, regex) in price_regexes() {
        let value = regex
            .captures(text)
            .and_then(|caps| caps[1].replace(',', ".").parse::<f64>().ok());

        match condition {
            Condition::Fdc => prices.fdc = value,
            Condition::Bu => prices.bu = value,
            Condition::Be => prices.be = value,
        }
    }

    prices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(slug: &str) -> CountryPage {
        CountryPage {
            slug: slug.to_string(),
            base_url: Url::parse("https://www.2euros.example").unwrap(),
        }
    }

    fn extract(html: &str, slug: &str) -> Vec<CoinRecord> {
        secondary_extractor().extract(html, &page(slug))
    }

    #[test]
    fn test_country_page_url() {
        assert_eq!(
            country_page_url("https://www.2euros.org", "san-marino"),
            "https://www.2euros.org/en/san-marino-2-euro-commemorative-coins/"
        );
    }

    #[test]
    fn test_country_name() {
        assert_eq!(country_name("france"), "France");
        assert_eq!(country_name("san-marino"), "San Marino");
        assert_eq!(country_name(""), "");
    }

    #[test]
    fn test_article_with_prices() {
        let html = r#"
            <article class="post coin-post">
                <a href="/fr-2024"><img data-src="/images/fr-2024.jpg"></a>
                <h2>Olympic Games Paris 2024</h2>
                <p>Mintage: 15,000,000</p>
                <p>FDC: 3,50€ BU: €9 BE: 25</p>
            </article>
        "#;

        let records = extract(html, "france");
        assert_eq!(records.len(), 1);

        let coin = &records[0];
        assert_eq!(coin.country, "France");
        assert_eq!(coin.year, 2024);
        assert_eq!(coin.description, "Olympic Games Paris 2024");
        assert_eq!(coin.mintage, 15_000_000);
        assert_eq!(coin.image_url, "https://www.2euros.example/images/fr-2024.jpg");
        assert_eq!(coin.value_fdc, 3.5);
        assert_eq!(coin.value_bu, 9.0);
        assert_eq!(coin.value_be, 25.0);
    }

    #[test]
    fn test_article_without_prices_uses_estimates() {
        let html = r#"
            <div class="entry"><img src="/m.jpg"><h3>Malta 2019 - Children</h3><p>Tirage: 80.000</p></div>
        "#;

        let records = extract(html, "malta");
        assert_eq!(records[0].mintage, 80_000);
        assert_eq!(records[0].value_fdc, 15.0);
        assert_eq!(records[0].value_be, 60.0);
    }

    #[test]
    fn test_content_wrapper_yields_every_article() {
        let html = r#"
            <div class="entry-content">
                <article class="post"><img src="/fr-2012.jpg"><h2>France 2012 Abbe Pierre</h2></article>
                <article class="post"><img src="/fr-2015.jpg"><h2>France 2015 Peace in Europe</h2></article>
                <article class="post"><img src="/fr-2024.jpg"><h2>France 2024 Olympic Games</h2><p>FDC: 4 BU: 8 BE: 20</p></article>
            </div>
        "#;

        let records = extract(html, "france");
        let years: Vec<i32> = records.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2012, 2015, 2024]);
        assert_eq!(records[1].description, "France 2015 Peace in Europe");
        assert_eq!(records[1].image_url, "https://www.2euros.example/fr-2015.jpg");
        assert_eq!(records[2].value_fdc, 4.0);
        assert_eq!(records[2].value_be, 20.0);
    }

    #[test]
    fn test_article_without_year_is_skipped() {
        let html = r#"<article class="post"><img src="/x.jpg"><h2>About us</h2></article>"#;
        assert!(extract(html, "france").is_empty());
    }

    #[test]
    fn test_container_strategy_fallback() {
        let html = r#"
            <section>
                <figure class="wp-image"><img src="/pt.jpg"></figure>
                <p>Portugal 2024 - Carnation Revolution</p>
            </section>
        "#;

        let records = extract(html, "portugal");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].country, "Portugal");
        assert_eq!(records[0].year, 2024);
        assert_eq!(records[0].description, "Portugal 2024 - Carnation Revolution");
        assert_eq!(records[0].mintage, DEFAULT_MINTAGE);
        assert_eq!(records[0].value_fdc, 4.0);
    }

    #[test]
    fn test_find_year() {
        assert_eq!(find_year("Issued in 2012 for"), Some(2012));
        assert_eq!(find_year("1999 and 12024"), None);
    }

    #[test]
    fn test_parse_mintage() {
        assert_eq!(parse_mintage("Mintage: 1,000,000"), 1_000_000);
        assert_eq!(parse_mintage("tiragem 500.000"), 500_000);
        assert_eq!(parse_mintage("no number"), DEFAULT_MINTAGE);
    }

    #[test]
    fn test_extract_prices_ignores_lowercase_words() {
        let prices = extract_prices("this could be 5 years old, BU: 7.25");
        assert_eq!(prices.be, None);
        assert_eq!(prices.bu, Some(7.25));
        assert_eq!(prices.fdc, None);
    }
}
