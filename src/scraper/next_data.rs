// next_data.rs
use crate::scraper::models::{RealtorProperty, ZillowResult};
use crate::scraper::{RawListing, SourceError, SourceProvider};
use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use serde_json::Value;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Site {
    Realtor,
    Zillow,
}

/// Search-results pages that embed their data as a Next.js `__NEXT_DATA__` script.
pub struct NextDataProvider {
    name: String,
    site: Site,
    site_root: Url,
    search_url: String,
    client: Client,
}

impl NextDataProvider {
    pub fn realtor(city: &str, timeout: Duration) -> Result<Self, SourceError> {
        // "Newton, MA" -> "Newton_MA"
        let slug = city
            .split(',')
            .map(|p| p.trim().replace(' ', "-"))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("_");
        Self::new(
            "realtor",
            Site::Realtor,
            "https://www.realtor.com/",
            format!("https://www.realtor.com/realestateandhomes-search/{slug}"),
            timeout,
        )
    }

    pub fn zillow(city: &str, timeout: Duration) -> Result<Self, SourceError> {
        // "Newton, MA" -> "newton-ma"
        let slug = city.replace(',', "").replace(' ', "-").to_lowercase();
        Self::new(
            "zillow",
            Site::Zillow,
            "https://www.zillow.com/",
            format!("https://www.zillow.com/{slug}"),
            timeout,
        )
    }

    fn new(
        name: &str,
        site: Site,
        site_root: &str,
        search_url: String,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let site_root =
            Url::parse(site_root).map_err(|e| SourceError::UnexpectedShape(e.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            site,
            site_root,
            search_url,
            client,
        })
    }

    fn page_url(&self, page: u32) -> String {
        match (self.site, page) {
            (_, 1) => self.search_url.clone(),
            (Site::Realtor, n) => format!("{}/pg-{n}", self.search_url),
            (Site::Zillow, n) => format!("{}/{n}_p/", self.search_url),
        }
    }

    fn fetch_page(&self, url: &str) -> Result<Vec<RawListing>, SourceError> {
        let html = self.fetch_html(url)?;
        let data = extract_next_data(&html)?;
        match self.site {
            Site::Realtor => extract_realtor(&data, &self.site_root),
            Site::Zillow => extract_zillow(&data, &self.site_root),
        }
    }

    fn fetch_html(&self, url: &str) -> Result<String, SourceError> {
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::REFERER, "https://www.google.com/")
            .send()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::Blocked(format!("HTTP {status} for {url}")));
        }

        let text = resp
            .text()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(SourceError::Network(format!("HTTP {status} for {url}")));
        }
        if text.contains("px-captcha") || text.contains("Press & Hold") {
            return Err(SourceError::Blocked(format!("captcha page for {url}")));
        }

        Ok(text)
    }
}

impl SourceProvider for NextDataProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, max_pages: Option<u32>) -> Result<Vec<RawListing>, SourceError> {
        let max_pages = max_pages.unwrap_or(1).max(1);
        let mut out = Vec::new();

        for page in 1..=max_pages {
            let page_url = self.page_url(page);
            tracing::debug!(source = %self.name, page, url = %page_url, "fetching page");

            match self.fetch_page(&page_url) {
                Ok(records) if records.is_empty() => {
                    tracing::debug!(source = %self.name, page, "no properties on page, stopping");
                    break;
                }
                Ok(records) => {
                    tracing::debug!(source = %self.name, page, count = records.len(), "page parsed");
                    out.extend(records);
                }
                // The first page decides success; later pages only add to it.
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    tracing::warn!(source = %self.name, page, error = %e, "page failed, keeping earlier pages");
                    break;
                }
            }
        }

        Ok(out)
    }
}

fn extract_next_data(html: &str) -> Result<Value, SourceError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"script[id="__NEXT_DATA__"]"#)
        .map_err(|e| SourceError::HtmlParse(e.to_string()))?;

    let element = document
        .select(&selector)
        .next()
        .ok_or(SourceError::MissingNextData)?;

    let json_text = element.text().next().ok_or(SourceError::MissingNextData)?;
    serde_json::from_str(json_text).map_err(|e| SourceError::JsonParse(e.to_string()))
}

fn extract_realtor(data: &Value, site_root: &Url) -> Result<Vec<RawListing>, SourceError> {
    let arr = data["props"]["pageProps"]["properties"]
        .as_array()
        .ok_or(SourceError::UnexpectedShape("properties missing".to_string()))?;

    let now = Utc::now();
    Ok(arr
        .iter()
        .filter_map(|v| match serde_json::from_value::<RealtorProperty>(v.clone()) {
            Ok(p) => Some(p.into_raw(site_root, now)),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable realtor property");
                None
            }
        })
        .collect())
}

fn extract_zillow(data: &Value, site_root: &Url) -> Result<Vec<RawListing>, SourceError> {
    let arr = data["props"]["pageProps"]["searchPageState"]["cat1"]["searchResults"]
        ["listResults"]
        .as_array()
        .ok_or(SourceError::UnexpectedShape("listResults missing".to_string()))?;

    Ok(arr
        .iter()
        .filter_map(|v| match serde_json::from_value::<ZillowResult>(v.clone()) {
            Ok(r) => Some(r.into_raw(site_root)),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable zillow result");
                None
            }
        })
        .collect())
}
