// src/spreadsheets/columns.rs

use crate::domain::Listing;

/// Export columns: every listing field, sorted by name.
pub const COLUMNS: [&str; 17] = [
    "address",
    "baths",
    "beds",
    "classified_label",
    "created_at",
    "days_on_market",
    "description",
    "living_area",
    "lot_size",
    "price",
    "processed_at",
    "raw_json",
    "score",
    "source",
    "status",
    "url",
    "year_built",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn text(v: Option<&str>) -> Self {
        v.map(|s| Cell::Text(s.to_string())).unwrap_or(Cell::Empty)
    }

    fn int(v: Option<i64>) -> Self {
        v.map(|n| Cell::Number(n as f64)).unwrap_or(Cell::Empty)
    }

    fn float(v: Option<f64>) -> Self {
        v.map(Cell::Number).unwrap_or(Cell::Empty)
    }

    /// How the cell reads in a text format such as CSV.
    pub fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

/// One row of cells, in `COLUMNS` order.
pub fn flatten(listing: &Listing) -> Vec<Cell> {
    COLUMNS
        .iter()
        .map(|column| match *column {
            "address" => Cell::text(listing.address.as_deref()),
            "baths" => Cell::float(listing.baths),
            "beds" => Cell::int(listing.beds),
            "classified_label" => Cell::text(listing.classified_label.as_deref()),
            "created_at" => Cell::Text(listing.created_at.to_rfc3339()),
            "days_on_market" => Cell::int(listing.days_on_market),
            "description" => Cell::text(listing.description.as_deref()),
            "living_area" => Cell::int(listing.living_area),
            "lot_size" => Cell::int(listing.lot_size),
            "price" => Cell::int(listing.price),
            "processed_at" => Cell::text(listing.processed_at.map(|t| t.to_rfc3339()).as_deref()),
            "raw_json" => Cell::Text(listing.raw_json.to_string()),
            "score" => Cell::float(listing.score),
            "source" => Cell::Text(listing.source.clone()),
            "status" => Cell::text(listing.status.as_deref()),
            "url" => Cell::Text(listing.url.clone()),
            "year_built" => Cell::int(listing.year_built),
            _ => Cell::Empty,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_sorted() {
        let mut sorted = COLUMNS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, COLUMNS.to_vec());
    }

    #[test]
    fn flatten_follows_column_order() {
        let mut listing = Listing::new("zillow", "https://z.com/1");
        listing.price = Some(500_000);
        listing.baths = Some(2.5);
        listing.score = Some(12.25);

        let row = flatten(&listing);
        assert_eq!(row.len(), COLUMNS.len());

        let cell = |name: &str| &row[COLUMNS.iter().position(|c| *c == name).unwrap()];
        assert_eq!(cell("price"), &Cell::Number(500_000.0));
        assert_eq!(cell("baths").render(), "2.5");
        assert_eq!(cell("price").render(), "500000");
        assert_eq!(cell("url"), &Cell::Text("https://z.com/1".to_string()));
        assert_eq!(cell("beds"), &Cell::Empty);
        assert_eq!(cell("raw_json").render(), "{}");
    }
}
