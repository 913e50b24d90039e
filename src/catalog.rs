use std::path::Path;

use crate::db::SqlitePool;
use crate::models::NewProduct;

/// Only shop-item rows are imported; everything else in the export is
/// navigation noise.
pub const CATALOG_URL_PREFIX: &str = "https://edp.by/shop/";

const CATEGORY_SEGMENT_INDEX: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRow {
    pub id: String,
    pub name: String,
    pub url: String,
    pub category: String,
}

/// Parses one export row. A row qualifies when its fourth field is a
/// shop URL; the category is a fixed positional segment of that URL.
/// Non-qualifying rows are skipped silently.
pub fn parse_catalog_row(fields: &[&str]) -> Option<CatalogRow> {
    if fields.len() < 4 || !fields[3].starts_with(CATALOG_URL_PREFIX) {
        return None;
    }

    let url = fields[3];
    let category = url.split('/').nth(CATEGORY_SEGMENT_INDEX)?;

    Some(CatalogRow {
        id: fields[0].to_string(),
        name: fields.get(4).unwrap_or(&"").to_string(),
        url: url.to_string(),
        category: category.to_string(),
    })
}

/// Bulk-imports the product catalog, overwriting existing records by
/// id. Returns how many rows were imported.
pub fn import_products_from_csv(pool: &SqlitePool, path: &Path) -> anyhow::Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut imported = 0;

    for record in reader.records() {
        let record = record?;
        let fields: Vec<&str> = record.iter().collect();

        let Some(row) = parse_catalog_row(&fields) else {
            continue;
        };

        crate::upsert_product(
            pool,
            &NewProduct {
                id: &row.id,
                name: &row.name,
                url: &row.url,
                category: &row.category,
                description: None,
            },
        )?;
        imported += 1;
    }

    tracing::info!("Imported {} products from {}", imported, path.display());

    Ok(imported)
}
