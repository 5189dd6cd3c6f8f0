use std::path::PathBuf;

use crate::error::Result;
use crate::scrape::{save_products, scrape_products, HttpSource, PageReport, ScrapeConfig};
use crate::settings::{load_settings, shellexpand_path};

pub fn run(
    url: Option<String>,
    listing_class: Option<String>,
    pages: Option<u32>,
    delay: Option<f64>,
    output: Option<String>,
) -> Result<()> {
    let mut s = load_settings().scrape;
    if let Some(u) = url {
        s.base_url = u;
    }
    if let Some(c) = listing_class {
        s.listing_class = c;
    }
    if let Some(p) = pages {
        s.pages = p;
    }
    if let Some(d) = delay {
        s.delay_secs = d;
    }
    if let Some(o) = output {
        s.output = o;
    }

    let config = ScrapeConfig::from_settings(&s);
    let source = HttpSource::new(config.timeout)?;
    let outcome = scrape_products(&source, &config)?;

    for page in &outcome.pages {
        println!("{}", page_line(page));
    }

    let failed: Vec<String> = outcome
        .pages
        .iter()
        .filter(|p| p.error.is_some())
        .map(|p| p.page.to_string())
        .collect();
    if !failed.is_empty() {
        eprintln!(
            "{} of {} pages could not be fetched (pages {})",
            failed.len(),
            outcome.pages.len(),
            failed.join(", ")
        );
    }
    if outcome.products.is_empty() {
        println!("No data was scraped.");
        return Ok(());
    }

    let path = PathBuf::from(shellexpand_path(&s.output));
    save_products(&outcome.products, &path)?;
    println!("Data saved to {}", path.display());
    Ok(())
}

fn page_line(report: &PageReport) -> String {
    match &report.error {
        Some(e) => format!("Page {}: failed ({e})", report.page),
        None => format!("Page {}: {} listings", report.page, report.listings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_line() {
        let ok = PageReport {
            page: 2,
            listings: 6,
            error: None,
        };
        assert_eq!(page_line(&ok), "Page 2: 6 listings");
        let failed = PageReport {
            page: 3,
            listings: 0,
            error: Some("timed out".to_string()),
        };
        assert_eq!(page_line(&failed), "Page 3: failed (timed out)");
    }
}
