//! Default coin data used when no live source produces anything

use crate::coin::{CoinRecord, GENERIC_IMAGE_URL};

/// Supplies the record set substituted for an empty or failed scrape
pub trait FallbackProvider {
    fn records(&self) -> Vec<CoinRecord>;
}

/// A fixed record list, mostly useful as a small test fixture
impl FallbackProvider for Vec<CoinRecord> {
    fn records(&self) -> Vec<CoinRecord> {
        self.clone()
    }
}

const PORTRAIT_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1630856826965-f274fce8e532?q=85&w=600&auto=format&fit=crop";
const STACK_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1634108941345-3a6a66685563?q=85&w=600&auto=format&fit=crop";

/// (country, year, description, mintage, image, fdc, bu, be)
type CatalogEntry = (&'static str, i32, &'static str, u64, &'static str, f64, f64, f64);

const CATALOG: [CatalogEntry; 20] = [
    ("France", 2024, "Jeux Olympiques et Paralympiques Paris 2024", 5_000_000, GENERIC_IMAGE_URL, 5.0, 8.0, 15.0),
    ("France", 2023, "200 ans de la naissance de Louis Pasteur", 3_000_000, PORTRAIT_IMAGE_URL, 4.5, 7.5, 14.0),
    ("France", 2022, "Simone Veil", 4_000_000, GENERIC_IMAGE_URL, 4.0, 7.0, 13.0),
    ("Allemagne", 2024, "Thuringe", 30_000_000, STACK_IMAGE_URL, 3.5, 6.0, 12.0),
    ("Allemagne", 2023, "Mecklembourg-Poméranie-Occidentale", 30_000_000, STACK_IMAGE_URL, 3.5, 6.0, 12.0),
    ("Italie", 2024, "150e anniversaire de la naissance de Guglielmo Marconi", 3_000_000, PORTRAIT_IMAGE_URL, 4.5, 8.0, 15.0),
    ("Italie", 2023, "150 ans de la mort d'Alessandro Manzoni", 3_000_000, GENERIC_IMAGE_URL, 4.0, 7.5, 14.0),
    ("Espagne", 2024, "Présidence du Conseil de l'UE", 3_000_000, STACK_IMAGE_URL, 4.0, 7.0, 13.0),
    ("Espagne", 2023, "Avila", 1_000_000, PORTRAIT_IMAGE_URL, 5.0, 9.0, 16.0),
    ("Belgique", 2024, "Présidence belge du Conseil de l'UE", 200_000, GENERIC_IMAGE_URL, 6.0, 12.0, 22.0),
    ("Luxembourg", 2024, "200 ans de la Constitution", 500_000, STACK_IMAGE_URL, 5.5, 10.0, 18.0),
    ("Portugal", 2024, "50 ans de la Révolution des Œillets", 1_000_000, PORTRAIT_IMAGE_URL, 5.0, 8.5, 16.0),
    ("Grèce", 2024, "150 ans de la naissance de Constantin Caratheodory", 750_000, GENERIC_IMAGE_URL, 5.0, 9.0, 17.0),
    ("Pays-Bas", 2024, "Effigie du Roi Willem-Alexander", 3_000_000, STACK_IMAGE_URL, 4.0, 7.0, 13.0),
    ("Finlande", 2024, "Élections et démocratie", 400_000, PORTRAIT_IMAGE_URL, 5.5, 10.0, 18.0),
    ("Monaco", 2024, "Prince Albert II", 15_000, GENERIC_IMAGE_URL, 50.0, 100.0, 200.0),
    ("Vatican", 2024, "Pape François", 80_000, STACK_IMAGE_URL, 20.0, 40.0, 80.0),
    ("San Marin", 2024, "500 ans de la mort du Pérugin", 60_000, PORTRAIT_IMAGE_URL, 25.0, 50.0, 100.0),
    ("Malte", 2024, "Jeux de l'Île", 100_000, GENERIC_IMAGE_URL, 15.0, 30.0, 60.0),
    ("Autriche", 2024, "100 ans de la Radio autrichienne", 1_000_000, STACK_IMAGE_URL, 5.0, 8.5, 16.0),
];

/// Built-in catalog of recent commemorative coins with hand-set prices
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl FallbackProvider for StaticCatalog {
    fn records(&self) -> Vec<CoinRecord> {
        CATALOG
            .iter()
            .map(
                |&(country, year, description, mintage, image_url, value_fdc, value_bu, value_be)| {
                    CoinRecord {
                        country: country.to_string(),
                        year,
                        description: description.to_string(),
                        mintage,
                        image_url: image_url.to_string(),
                        value_fdc,
                        value_bu,
                        value_be,
                    }
                },
            )
            .collect()
    }
}
