use std::io::Write;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::error::{KpiError, Result};
use crate::models::Product;
use crate::settings::ScrapeSettings;

pub const USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub listing_class: String,
    pub pages: u32,
    pub delay: Duration,
    pub timeout: Duration,
}

impl ScrapeConfig {
    pub fn from_settings(s: &ScrapeSettings) -> Self {
        Self {
            base_url: s.base_url.clone(),
            listing_class: s.listing_class.clone(),
            pages: s.pages,
            delay: Duration::try_from_secs_f64(s.delay_secs.max(0.0)).unwrap_or_default(),
            timeout: Duration::from_secs(s.timeout_secs),
        }
    }
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

pub trait PageSource {
    fn fetch(&self, url: &Url) -> Result<String>;
}

pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    fn fetch(&self, url: &Url) -> Result<String> {
        let resp = self.client.get(url.clone()).send()?.error_for_status()?;
        Ok(resp.text()?)
    }
}

pub fn page_url(base: &Url, page: u32) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut().append_pair("page", &page.to_string());
    url
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

struct Selectors {
    listing: Selector,
    title: Selector,
    price: Selector,
    description: Selector,
    link: Selector,
    image: Selector,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| KpiError::Other(format!("Invalid selector {css:?}: {e:?}")))
}

/// `"col-md-4 col-lg-4"` becomes `div.col-md-4.col-lg-4`.
pub fn listing_selector(class_list: &str) -> Result<Selector> {
    let classes: Vec<&str> = class_list.split_whitespace().collect();
    if classes.is_empty() {
        return Err(KpiError::Other("Listing class must not be empty".to_string()));
    }
    selector(&format!("div.{}", classes.join(".")))
}

impl Selectors {
    fn new(class_list: &str) -> Result<Self> {
        Ok(Self {
            listing: listing_selector(class_list)?,
            title: selector("a.title")?,
            price: selector("h4.pull-right")?,
            description: selector("p.description")?,
            link: selector("a")?,
            image: selector("img")?,
        })
    }
}

fn text_of(el: &ElementRef, sel: &Selector) -> Option<String> {
    el.select(sel)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
}

fn attr_of(el: &ElementRef, sel: &Selector, attr: &str) -> Option<String> {
    el.select(sel)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(str::to_string)
}

fn parse_product(el: &ElementRef, sel: &Selectors, base: &Url) -> Option<Product> {
    let href = attr_of(el, &sel.link, "href")?;
    Some(Product {
        title: text_of(el, &sel.title)?,
        price: text_of(el, &sel.price)?,
        description: text_of(el, &sel.description)?,
        product_url: base.join(&href).ok()?.to_string(),
        image_url: attr_of(el, &sel.image, "src")?,
    })
}

/// Returns the number of listing blocks found and the products that parsed.
fn parse_listings(body: &str, sel: &Selectors, base: &Url, page: u32) -> (usize, Vec<Product>) {
    let doc = Html::parse_document(body);
    let mut found = 0;
    let mut products = Vec::new();
    for el in doc.select(&sel.listing) {
        found += 1;
        match parse_product(&el, sel, base) {
            Some(p) => products.push(p),
            None => log::warn!("Skipping incomplete listing {found} on page {page}"),
        }
    }
    (found, products)
}

// ---------------------------------------------------------------------------
// Scrape loop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PageReport {
    pub page: u32,
    pub listings: usize,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    pub products: Vec<Product>,
    pub pages: Vec<PageReport>,
}

/// Fetch pages `1..=pages` in order. A page that fails to fetch is logged
/// and skipped; a page with no listings is not an error.
pub fn scrape_products<S: PageSource>(source: &S, config: &ScrapeConfig) -> Result<ScrapeOutcome> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| KpiError::Other(format!("Invalid base URL {:?}: {e}", config.base_url)))?;
    let sel = Selectors::new(&config.listing_class)?;
    let mut outcome = ScrapeOutcome::default();

    for page in 1..=config.pages {
        log::info!("Scraping page {page}...");
        let body = match source.fetch(&page_url(&base, page)) {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Error while scraping page {page}: {e}");
                outcome.pages.push(PageReport {
                    page,
                    listings: 0,
                    error: Some(e.to_string()),
                });
                continue;
            }
        };

        let (found, products) = parse_listings(&body, &sel, &base, page);
        if found == 0 {
            log::info!("No product listings found on page {page}.");
        }
        outcome.products.extend(products);
        outcome.pages.push(PageReport {
            page,
            listings: found,
            error: None,
        });

        if page < config.pages && !config.delay.is_zero() {
            std::thread::sleep(config.delay);
        }
    }

    log::info!(
        "Scraped {} products from {} pages",
        outcome.products.len(),
        config.pages
    );
    Ok(outcome)
}

/// Pretty JSON array with 4-space indent; non-ASCII is written as-is.
pub fn save_products(products: &[Product], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
    products.serialize(&mut ser)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;

    const CLASS: &str = "col-md-4 col-xl-4 col-lg-4";

    fn listing(title: &str, price: &str, desc: Option<&str>, href: &str) -> String {
        let desc = desc
            .map(|d| format!("<p class=\"description\">{d}</p>"))
            .unwrap_or_default();
        format!(
            r#"<div class="col-md-4 col-xl-4 col-lg-4">
                 <div class="thumbnail">
                   <img class="img-responsive" src="/images/{title}.png">
                   <div class="caption">
                     <h4 class="pull-right price"> {price} </h4>
                     <h4><a href="{href}" class="title">  {title}  </a></h4>
                     {desc}
                   </div>
                 </div>
               </div>"#
        )
    }

    fn page(listings: &[String]) -> String {
        format!("<html><body><div class=\"row\">{}</div></body></html>", listings.join("\n"))
    }

    /// Serves canned bodies keyed by page number; absent pages fail.
    struct FakeSource {
        pages: HashMap<u32, String>,
        requested: RefCell<Vec<String>>,
    }

    impl PageSource for FakeSource {
        fn fetch(&self, url: &Url) -> Result<String> {
            self.requested.borrow_mut().push(url.to_string());
            let page: u32 = url
                .query_pairs()
                .find(|(k, _)| k == "page")
                .and_then(|(_, v)| v.parse().ok())
                .unwrap_or(0);
            self.pages
                .get(&page)
                .cloned()
                .ok_or_else(|| KpiError::Other(format!("connection refused for page {page}")))
        }
    }

    fn config(pages: u32) -> ScrapeConfig {
        ScrapeConfig {
            base_url: "https://shop.test/catalog/all".to_string(),
            listing_class: CLASS.to_string(),
            pages,
            delay: Duration::ZERO,
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_page_url() {
        let base = Url::parse("https://shop.test/catalog/all").unwrap();
        assert_eq!(page_url(&base, 3).as_str(), "https://shop.test/catalog/all?page=3");
    }

    #[test]
    fn test_listing_selector() {
        assert!(listing_selector(CLASS).is_ok());
        assert!(listing_selector("   ").is_err());
    }

    #[test]
    fn test_parse_listings_extracts_fields() {
        let base = Url::parse("https://shop.test/catalog/all").unwrap();
        let sel = Selectors::new(CLASS).unwrap();
        let body = page(&[
            listing("Laptop", "$295.99", Some("Asus VivoBook"), "/product/1"),
            listing("Tablet", "$99.99", None, "/product/2"),
        ]);
        let (found, products) = parse_listings(&body, &sel, &base, 1);
        assert_eq!(found, 2);
        assert_eq!(products.len(), 1);
        let p = &products[0];
        assert_eq!(p.title, "Laptop");
        assert_eq!(p.price, "$295.99");
        assert_eq!(p.description, "Asus VivoBook");
        assert_eq!(p.product_url, "https://shop.test/product/1");
        assert_eq!(p.image_url, "/images/Laptop.png");
    }

    #[test]
    fn test_scrape_continues_past_empty_and_failed_pages() {
        let mut pages = HashMap::new();
        pages.insert(1, page(&[listing("A", "$1", Some("a"), "/p/a")]));
        pages.insert(2, page(&[]));
        pages.insert(4, page(&[listing("B", "$2", Some("b"), "/p/b")]));
        let source = FakeSource {
            pages,
            requested: RefCell::new(Vec::new()),
        };

        let outcome = scrape_products(&source, &config(4)).unwrap();

        assert_eq!(source.requested.borrow().len(), 4);
        let titles: Vec<&str> = outcome.products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(outcome.pages.len(), 4);
        assert_eq!(outcome.pages[1], PageReport { page: 2, listings: 0, error: None });
        assert_eq!(outcome.pages[2].page, 3);
        assert!(outcome.pages[2].error.as_deref().unwrap().contains("connection refused"));
        assert_eq!(outcome.pages[3].listings, 1);
    }

    #[test]
    fn test_scrape_rejects_bad_base_url() {
        let source = FakeSource {
            pages: HashMap::new(),
            requested: RefCell::new(Vec::new()),
        };
        let mut cfg = config(1);
        cfg.base_url = "not a url".to_string();
        assert!(scrape_products(&source, &cfg).is_err());
        assert!(source.requested.borrow().is_empty());
    }

    #[test]
    fn test_save_products_json_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scraped_data.json");
        let products = vec![Product {
            title: "Café".to_string(),
            price: "$5".to_string(),
            description: "Crème".to_string(),
            product_url: "https://shop.test/p/1".to_string(),
            image_url: "/img/1.png".to_string(),
        }];
        save_products(&products, &path).unwrap();
        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.starts_with("[\n    {\n        \"Title\": \"Café\""));
        assert!(json.contains("\"Product URL\": \"https://shop.test/p/1\""));
        assert!(json.contains("\"Image URL\""));
        let back: Vec<Product> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, products);
    }

    #[test]
    fn test_save_products_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        assert!(matches!(save_products(&[], &path), Err(KpiError::Io(_))));
    }

    #[test]
    fn test_config_from_settings() {
        let cfg = ScrapeConfig::from_settings(&ScrapeSettings::default());
        assert_eq!(cfg.pages, 5);
        assert_eq!(cfg.delay, Duration::from_secs(2));
        assert_eq!(cfg.timeout, Duration::from_secs(10));
    }
}
