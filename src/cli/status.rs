use std::path::Path;

use colored::Colorize;

use crate::error::Result;
use crate::settings::{load_settings, settings_file_exists, settings_path, shellexpand_path};

fn presence(path: &str) -> String {
    if Path::new(&shellexpand_path(path)).exists() {
        "found".green().to_string()
    } else {
        "missing".red().to_string()
    }
}

pub fn run() -> Result<()> {
    let settings = load_settings();
    let path = settings_path();

    println!(
        "Settings:    {}{}",
        path.display(),
        if settings_file_exists() { "" } else { " (not saved, using defaults)" }
    );
    println!("Sales:       {} [{}]", settings.sales_path, presence(&settings.sales_path));
    println!("Marketing:   {} [{}]", settings.marketing_path, presence(&settings.marketing_path));
    println!("Output dir:  {}", settings.output_dir);
    println!("Cost basis:  {:?}", settings.cost_basis);

    #[cfg(feature = "scrape")]
    {
        let s = &settings.scrape;
        println!();
        println!("Scrape URL:  {}", s.base_url);
        println!("Listing:     div.{}", s.listing_class.split_whitespace().collect::<Vec<_>>().join("."));
        println!("Pages:       {} ({}s apart, {}s timeout)", s.pages, s.delay_secs, s.timeout_secs);
        println!("Output:      {}", s.output);
    }

    Ok(())
}
