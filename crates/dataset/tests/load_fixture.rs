use petrodash_core::Fuel;
use petrodash_dataset::{load_prices, read_brand_column, read_brand_list, StationFilter};
use std::fs::File;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_fixture_loads_every_row() {
    let table = load_prices(fixture("stations.csv"), ';').unwrap();
    assert_eq!(table.len(), 10);
    assert_eq!(
        table.regions(),
        vec!["Auvergne-Rhône-Alpes", "Bretagne", "Île-de-France"]
    );
    assert_eq!(
        table.cities(),
        vec!["Ajaccio", "Bourg-en-Bresse", "Brest", "Lyon", "Paris", "Rennes"]
    );
    assert_eq!(
        table.available_fuels(),
        vec![Fuel::Gazole, Fuel::E10, Fuel::Sp98, Fuel::Sp95, Fuel::E85, Fuel::Gplc]
    );
}

#[test]
fn test_fixture_counts_per_fuel() {
    let table = load_prices(fixture("stations.csv"), ';').unwrap();
    let all = StationFilter::new();
    let counts: Vec<u64> = Fuel::ALL
        .iter()
        .map(|f| table.count_with_fuel(*f, &all))
        .collect();
    // E10, Gazole, SP95, SP98, E85, GPLc
    assert_eq!(counts, vec![6, 9, 5, 4, 2, 2]);
}

#[test]
fn test_fixture_regional_mean() {
    let table = load_prices(fixture("stations.csv"), ';').unwrap();
    let ara = StationFilter::new().in_region("Auvergne-Rhône-Alpes");
    let mean = table.mean_price(Fuel::Gazole, &ara).unwrap();
    assert!((mean - 1.899).abs() < 1e-9);
}

#[test]
fn test_fixture_brands_align_with_rows() {
    let mut table = load_prices(fixture("stations.csv"), ';').unwrap();
    let brands = read_brand_column(File::open(fixture("brand.csv")).unwrap()).unwrap();
    assert_eq!(brands.len(), table.len());
    table.attach_brands(brands);
    assert_eq!(table.stations()[5].brand.as_deref(), Some("No Brand"));

    let list = read_brand_list(File::open(fixture("brand.txt")).unwrap()).unwrap();
    assert_eq!(list.len(), 4);
    assert_eq!(list[1].name, "Intermarché");
}

#[test]
fn test_missing_file_is_dataset_error() {
    let err = load_prices(fixture("absent.csv"), ';').unwrap_err();
    assert!(matches!(err, petrodash_core::PetroError::Dataset(_)));
}
