use crate::domain::normalize::{lot_area_to_sqft, parse_number, parse_price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use url::Url;

/// A listing record as a provider hands it over, before normalization.
/// Any field may be missing, including the URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawListing {
    pub url: Option<String>,
    pub address: Option<String>,
    pub price: Option<i64>,
    pub beds: Option<i64>,
    pub baths: Option<f64>,
    pub living_area: Option<i64>,
    pub lot_size: Option<i64>,
    pub year_built: Option<i64>,
    pub days_on_market: Option<i64>,
    pub status: Option<String>,
    pub description: Option<String>,
    /// Source-specific leftovers kept for diagnostics.
    #[serde(default)]
    pub raw_json: Map<String, Value>,
}

/// Resolves a possibly relative listing link against the site root.
fn absolute_url(site_root: &Url, href: Option<&str>) -> Option<String> {
    let href = href.map(str::trim).filter(|h| !h.is_empty())?;
    site_root.join(href).ok().map(String::from)
}

fn diagnostics(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn whole(n: Option<f64>) -> Option<i64> {
    n.filter(|v| v.is_finite()).map(|v| v.round() as i64)
}

// realtor.com: props.pageProps.properties[]
//  ├── property_id / listing_id
//  ├── href / permalink
//  ├── status, list_price, list_date
//  ├── location.address { line, city, state_code, postal_code }
//  └── description { beds, baths, sqft, lot_sqft, year_built, type, text }

#[derive(Debug, Deserialize)]
pub struct RealtorProperty {
    pub property_id: Option<String>,
    pub listing_id: Option<String>,
    pub href: Option<String>,
    pub permalink: Option<String>,
    pub status: Option<String>,
    pub list_price: Option<f64>,
    pub list_date: Option<String>,
    pub location: Option<RealtorLocation>,
    pub description: Option<RealtorDescription>,
}

#[derive(Debug, Deserialize)]
pub struct RealtorLocation {
    pub address: Option<RealtorAddress>,
}

#[derive(Debug, Deserialize)]
pub struct RealtorAddress {
    pub line: Option<String>,
    pub city: Option<String>,
    pub state_code: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RealtorDescription {
    pub beds: Option<f64>,
    pub baths: Option<f64>,
    pub baths_consolidated: Option<String>,
    pub sqft: Option<f64>,
    pub lot_sqft: Option<f64>,
    pub year_built: Option<f64>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub text: Option<String>,
}

impl RealtorProperty {
    pub fn into_raw(self, site_root: &Url, now: DateTime<Utc>) -> RawListing {
        let href = self.href.clone().or_else(|| {
            self.permalink
                .as_ref()
                .map(|p| format!("/realestateandhomes-detail/{p}"))
        });

        let address = self
            .location
            .as_ref()
            .and_then(|l| l.address.as_ref())
            .map(|a| {
                [&a.line, &a.city, &a.state_code, &a.postal_code]
                    .iter()
                    .filter_map(|part| part.as_deref())
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ")
            });

        let days_on_market = self
            .list_date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
            .map(|d| (now - d.with_timezone(&Utc)).num_days().max(0));

        let desc = self.description.as_ref();

        RawListing {
            url: absolute_url(site_root, href.as_deref()),
            address,
            price: whole(self.list_price),
            beds: whole(desc.and_then(|d| d.beds)),
            baths: desc.and_then(|d| {
                d.baths
                    .or_else(|| d.baths_consolidated.as_deref().and_then(parse_number))
            }),
            living_area: whole(desc.and_then(|d| d.sqft)),
            lot_size: whole(desc.and_then(|d| d.lot_sqft)),
            year_built: whole(desc.and_then(|d| d.year_built)),
            days_on_market,
            status: self.status.clone(),
            description: desc.and_then(|d| d.text.clone()),
            raw_json: diagnostics(json!({
                "property_id": self.property_id,
                "listing_id": self.listing_id,
                "list_date": self.list_date,
                "property_type": desc.and_then(|d| d.property_type.clone()),
            })),
        }
    }
}

// zillow.com: props.pageProps.searchPageState.cat1.searchResults.listResults[]
//  ├── zpid, detailUrl, address, statusType, statusText, flexFieldText
//  ├── unformattedPrice / price ("$1,250,000")
//  ├── beds, baths, area
//  └── hdpData.homeInfo { lotAreaValue, lotAreaUnit, daysOnZillow, yearBuilt }

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZillowResult {
    pub zpid: Option<Value>,
    pub detail_url: Option<String>,
    pub address: Option<String>,
    pub status_type: Option<String>,
    pub status_text: Option<String>,
    pub flex_field_text: Option<String>,
    pub unformatted_price: Option<f64>,
    pub price: Option<String>,
    pub beds: Option<f64>,
    pub baths: Option<f64>,
    pub area: Option<f64>,
    pub hdp_data: Option<ZillowHdpData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZillowHdpData {
    pub home_info: Option<ZillowHomeInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZillowHomeInfo {
    pub lot_area_value: Option<f64>,
    pub lot_area_unit: Option<String>,
    pub days_on_zillow: Option<f64>,
    pub year_built: Option<f64>,
    pub living_area: Option<f64>,
}

impl ZillowResult {
    pub fn into_raw(self, site_root: &Url) -> RawListing {
        let home = self.hdp_data.as_ref().and_then(|h| h.home_info.as_ref());

        let price = whole(self.unformatted_price)
            .or_else(|| self.price.as_deref().and_then(parse_price));

        let lot_size = home.and_then(|h| {
            h.lot_area_value
                .and_then(|v| lot_area_to_sqft(v, h.lot_area_unit.as_deref()))
        });

        let living_area =
            whole(self.area).or_else(|| whole(home.and_then(|h| h.living_area)));

        RawListing {
            url: absolute_url(site_root, self.detail_url.as_deref()),
            address: self.address.clone(),
            price,
            beds: whole(self.beds),
            baths: self.baths,
            living_area,
            lot_size,
            year_built: whole(home.and_then(|h| h.year_built)),
            days_on_market: whole(home.and_then(|h| h.days_on_zillow)),
            status: self.status_type.clone(),
            description: self.flex_field_text.clone(),
            raw_json: diagnostics(json!({
                "zpid": self.zpid,
                "status_text": self.status_text,
                "price_text": self.price,
            })),
        }
    }
}
