//! Primary source: one catalog page per issuing year
//!
//! Each year page lists that year's commemorative coins in boxes holding a
//! country heading, a picture, a feature paragraph and an issuing volume.
//! Two strategies are tried in order:
//!
//! | Strategy | Containers | Skips |
//! |----------|------------|-------|
//! | `structured` | `div`/`article`/`section`/`li` with a class containing `coin`, `box` or `commemorative` | containers without an image |
//! | `image-scan` | every `img` on the page | logos, icons, SVGs, images with no nearby text |

use crate::coin::{CoinRecord, DEFAULT_MINTAGE};
use crate::config::ScraperConfig;
use crate::scraper::extract::{PageExtractor, Records, Strategy};
use crate::scraper::fetch_loop::FetchLoop;
use crate::scraper::html::{
    coin_containers, element_text, first_text, image_source, img_source, parse_selector,
    resolve_url,
};
use crate::CoinError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use url::Url;

/// Country used when a container carries no heading
pub const UNKNOWN_COUNTRY: &str = "Unknown";

const CONTAINER_CLASSES: [&str; 3] = ["coin", "box", "commemorative"];

/// How many ancestor levels of an image the image scan looks at
const NEIGHBOURHOOD_DEPTH: usize = 3;

/// Context of one fetched year page
#[derive(Debug, Clone)]
pub struct YearPage {
    pub year: i32,
    pub base_url: Url,
}

struct Selectors {
    containers: Selector,
    headings: Selector,
    images: Selector,
    paragraphs: Selector,
    captions: Selector,
}

fn selectors() -> &'static Selectors {
    static SELECTORS: OnceLock<Selectors> = OnceLock::new();
    SELECTORS.get_or_init(|| Selectors {
        containers: parse_selector("div, article, section, li"),
        headings: parse_selector("h1, h2, h3, h4, h5, h6"),
        images: parse_selector("img"),
        paragraphs: parse_selector("p"),
        captions: parse_selector("figcaption"),
    })
}

fn million_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)issuing\s+volume\s*[:\-]?\s*(\d+(?:[.,]\d{1,2})?)\s*million")
            .expect("million regex is valid")
    })
}

fn volume_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)issuing\s+volume\s*[:\-]?\s*(\d{1,3}(?:[,.\s]\d{3})+|\d+)")
            .expect("volume regex is valid")
    })
}

fn issuing_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)issuing\s+(?:volume|date)").expect("issuing regex is valid"))
}

/// Builds the URL of the catalog page for `year`
pub fn year_page_url(base_url: &str, year: i32) -> String {
    format!(
        "{}/euro/coins/comm/html/comm_{}.en.html",
        base_url.trim_end_matches('/'),
        year
    )
}

/// Extractor for year pages: structured boxes first, then the image scan
pub fn primary_extractor() -> PageExtractor<YearPage> {
    PageExtractor::new(vec![
        ("structured", structured_strategy as Strategy<YearPage>),
        ("image-scan", image_scan_strategy as Strategy<YearPage>),
    ])
}

/// Fetches every year page in the configured range and extracts its coins
pub async fn scrape_primary(
    fetch_loop: &FetchLoop<'_>,
    config: &ScraperConfig,
) -> Result<Vec<CoinRecord>, CoinError> {
    let base_url = Url::parse(&config.primary_base_url)?;
    let extractor = primary_extractor();

    let records = fetch_loop
        .run(
            config.first_year..=config.last_year,
            |year| year_page_url(&config.primary_base_url, *year),
            |body, year| {
                let page = YearPage {
                    year: *year,
                    base_url: base_url.clone(),
                };
                extractor.extract(body, &page)
            },
        )
        .await;

    tracing::info!("Primary source produced {} coins", records.len());
    Ok(records)
}

/// Structured strategy: one coin per coin box
pub fn structured_strategy<'a>(document: &'a Html, page: &'a YearPage) -> Records<'a> {
    let containers = coin_containers(document, &selectors().containers, &CONTAINER_CLASSES);
    Box::new(
        containers
            .into_iter()
            .filter_map(move |container| coin_from_container(&container, page)),
    )
}

/// Image-scan strategy: one coin per content image with nearby text
pub fn image_scan_strategy<'a>(document: &'a Html, page: &'a YearPage) -> Records<'a> {
    Box::new(
        document
            .select(&selectors().images)
            .filter_map(move |img| coin_from_image(&img, page)),
    )
}

fn coin_from_container(container: &ElementRef, page: &YearPage) -> Option<CoinRecord> {
    let Some(src) = image_source(container, &selectors().images) else {
        tracing::debug!("Skipping {} container without image", page.year);
        return None;
    };

    let country = country_from_heading(container).unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());
    let description = description_from_paragraphs(container).unwrap_or_default();
    let mintage = parse_issuing_volume(&element_text(container));

    Some(CoinRecord::estimated(
        country,
        page.year,
        &description,
        mintage,
        resolve_url(src, &page.base_url),
    ))
}

fn coin_from_image(img: &ElementRef, page: &YearPage) -> Option<CoinRecord> {
    let src = img_source(img)?;
    if looks_decorative(src) {
        return None;
    }

    let neighbourhood: Vec<ElementRef> = img
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take(NEIGHBOURHOOD_DEPTH)
        .collect();

    let alt = img
        .value()
        .attr("alt")
        .map(str::trim)
        .filter(|alt| !alt.is_empty());

    let country = neighbourhood
        .iter()
        .find_map(country_from_heading)
        .or_else(|| alt.and_then(country_from_alt));

    let Some(country) = country else {
        tracing::debug!("Skipping image {} with no nearby text", src);
        return None;
    };

    let description = neighbourhood
        .iter()
        .find_map(|element| first_text(element, &selectors().captions))
        .or_else(|| alt.map(str::to_string))
        .or_else(|| img.value().attr("title").map(str::to_string))
        .unwrap_or_default();

    let mintage = neighbourhood
        .last()
        .map(|element| parse_issuing_volume(&element_text(element)))
        .unwrap_or(DEFAULT_MINTAGE);

    Some(CoinRecord::estimated(
        country,
        page.year,
        &description,
        mintage,
        resolve_url(src, &page.base_url),
    ))
}

/// Country heuristic: text of the first heading inside the element
pub fn country_from_heading(element: &ElementRef) -> Option<String> {
    first_text(element, &selectors().headings)
}

/// Country heuristic for bare images: alt text before any ` - ` or `:`,
/// without year tokens
pub fn country_from_alt(alt: &str) -> Option<String> {
    let head = alt.split(" - ").next().unwrap_or(alt);
    let head = head.split(':').next().unwrap_or(head);
    let country = head
        .split_whitespace()
        .filter(|word| !word.chars().all(|c| c.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(" ");

    if country.is_empty() {
        None
    } else {
        Some(country)
    }
}

/// Description heuristic: first paragraph that is not an issuing line, with
/// any leading `Label:` removed
pub fn description_from_paragraphs(container: &ElementRef) -> Option<String> {
    container
        .select(&selectors().paragraphs)
        .map(|p| element_text(&p))
        .filter(|text| !text.is_empty() && !issuing_line_regex().is_match(text))
        .map(|text| strip_label(&text))
        .find(|text| !text.is_empty())
}

fn strip_label(text: &str) -> String {
    match text.split_once(':') {
        Some((_, rest)) if !rest.trim().is_empty() => rest.trim().to_string(),
        _ => text.trim().to_string(),
    }
}

/// Mintage heuristic: the number following an "Issuing volume" label
///
/// Accepts grouped thousands (`5,000,000`, `2 500 000`, `1.000.000`) and
/// `N million`. Anything missing or unparseable yields [`DEFAULT_MINTAGE`].
pub fn parse_issuing_volume(text: &str) -> u64 {
    if let Some(caps) = million_regex().captures(text) {
        let mintage = caps[1]
            .replace(',', ".")
            .parse::<f64>()
            .map(|millions| (millions * 1_000_000.0).round())
            .unwrap_or(f64::NAN);
        if mintage >= 0.0 && mintage < u64::MAX as f64 {
            return mintage as u64;
        }
        return DEFAULT_MINTAGE;
    }

    match volume_regex().captures(text) {
        Some(caps) => {
            let digits: String = caps[1].chars().filter(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(DEFAULT_MINTAGE)
        }
        None => DEFAULT_MINTAGE,
    }
}

fn looks_decorative(src: &str) -> bool {
    let src = src.to_ascii_lowercase();
    src.starts_with("data:")
        || src.ends_with(".svg")
        || src.contains("logo")
        || src.contains("icon")
}
