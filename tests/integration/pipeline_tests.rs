use coin_ledger::config::ScraperConfig;
use coin_ledger::{collect_coins, CoinPipeline, CoinRecord, FallbackProvider, StaticCatalog};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FRANCE_2024: &str = r#"
<html><body>
  <div class="coin-box">
    <h3>France</h3>
    <img src="/img/x.png" alt="France 2024">
    <p><strong>Feature:</strong> Olympic Games Paris 2024</p>
    <p><strong>Issuing volume:</strong> 5,000,000</p>
  </div>
</body></html>
"#;

/// Primary-only configuration pointed at a mock server
fn test_config(base_url: &str, first_year: i32, last_year: i32) -> ScraperConfig {
    ScraperConfig {
        primary_base_url: base_url.to_string(),
        secondary_base_url: base_url.to_string(),
        secondary_enabled: false,
        first_year,
        last_year,
        request_delay: 0,
        request_timeout: 2,
        user_agent: "CoinLedgerTest/1.0".to_string(),
        countries: vec!["france".to_string()],
    }
}

async fn mount_page(server: &MockServer, page_path: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_container_page() {
    let server = MockServer::start().await;
    mount_page(&server, "/euro/coins/comm/html/comm_2024.en.html", 200, FRANCE_2024).await;

    let coins = collect_coins(&test_config(&server.uri(), 2024, 2024)).await;

    assert_eq!(coins.len(), 1);
    let coin = &coins[0];
    assert_eq!(coin.country, "France");
    assert_eq!(coin.year, 2024);
    assert_eq!(coin.mintage, 5_000_000);
    assert_eq!(coin.image_url, format!("{}/img/x.png", server.uri()));
    assert_eq!(coin.value_fdc, 3.0);
}

#[tokio::test]
async fn test_failed_year_does_not_stop_the_loop() {
    let server = MockServer::start().await;
    mount_page(&server, "/euro/coins/comm/html/comm_2022.en.html", 500, "").await;
    mount_page(&server, "/euro/coins/comm/html/comm_2023.en.html", 404, "").await;
    mount_page(&server, "/euro/coins/comm/html/comm_2024.en.html", 200, FRANCE_2024).await;

    let coins = collect_coins(&test_config(&server.uri(), 2022, 2024)).await;

    assert_eq!(coins.len(), 1);
    assert_eq!(coins[0].year, 2024);
}

#[tokio::test]
async fn test_total_failure_yields_static_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri(), 2023, 2024);
    config.secondary_enabled = true;

    let coins = collect_coins(&config).await;

    assert_eq!(coins, StaticCatalog.records());
    assert_eq!(coins.len(), 20);
    assert_eq!(coins[0].country, "France");
    assert_eq!(coins[0].year, 2024);
    assert_eq!(coins[0].mintage, 5_000_000);
}

#[tokio::test]
async fn test_pages_without_coins_use_injected_fallback() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/euro/coins/comm/html/comm_2024.en.html",
        200,
        "<html><body><p>No coins this year</p></body></html>",
    )
    .await;

    let fixture = vec![CoinRecord::estimated(
        "Testland",
        2024,
        "Fixture coin",
        42,
        "https://fixtures.example/coin.png",
    )];
    let pipeline =
        CoinPipeline::with_fallback(test_config(&server.uri(), 2024, 2024), fixture.clone());

    assert_eq!(pipeline.collect().await, fixture);
}

#[tokio::test]
async fn test_primary_and_secondary_are_merged() {
    let server = MockServer::start().await;
    mount_page(&server, "/euro/coins/comm/html/comm_2024.en.html", 200, FRANCE_2024).await;
    mount_page(
        &server,
        "/en/france-2-euro-commemorative-coins/",
        200,
        r#"
        <article class="post">
            <img src="/photos/fr-2024.jpg">
            <h2>France 2024 Olympic Games</h2>
            <p>FDC: 4,50€ BU: 9 BE: 30</p>
        </article>
        <article class="post">
            <img src="/photos/fr-2012.jpg">
            <h2>France 2012 Abbé Pierre</h2>
        </article>
        "#,
    )
    .await;

    let mut config = test_config(&server.uri(), 2024, 2024);
    config.secondary_enabled = true;

    let coins = collect_coins(&config).await;
    assert_eq!(coins.len(), 2);

    let merged = &coins[0];
    assert_eq!(merged.description, "Olympic Games Paris 2024");
    assert_eq!(merged.mintage, 5_000_000);
    assert_eq!(merged.image_url, format!("{}/photos/fr-2024.jpg", server.uri()));
    assert_eq!(merged.value_fdc, 4.5);
    assert_eq!(merged.value_bu, 9.0);
    assert_eq!(merged.value_be, 30.0);

    let secondary_only = &coins[1];
    assert_eq!(secondary_only.year, 2012);
    assert_eq!(secondary_only.description, "France 2012 Abbé Pierre");
}

#[tokio::test]
async fn test_secondary_requests_use_country_slugs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/en/san-marino-2-euro-commemorative-coins/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="entry"><img src="/sm.jpg"><h3>2024 Perugino</h3><p>Mintage: 60.000</p></div>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri(), 2024, 2024);
    config.secondary_enabled = true;
    config.countries = vec!["san-marino".to_string()];

    let coins = collect_coins(&config).await;

    assert_eq!(coins.len(), 1);
    assert_eq!(coins[0].country, "San Marino");
    assert_eq!(coins[0].mintage, 60_000);
    assert_eq!(coins[0].value_fdc, 15.0);
}
