mod aggregate;
mod chart;
mod cli;
mod error;
mod fmt;
mod forecast;
mod html;
mod loader;
mod merge;
mod models;
mod pipeline;
#[cfg(feature = "scrape")]
mod scrape;
mod settings;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Report {
            sales,
            marketing,
            output_dir,
            cost_basis,
        } => cli::report::run(sales, marketing, output_dir, cost_basis),
        #[cfg(feature = "scrape")]
        Commands::Scrape {
            url,
            listing_class,
            pages,
            delay,
            output,
        } => cli::scrape::run(url, listing_class, pages, delay, output),
        Commands::Init {
            sales,
            marketing,
            output_dir,
        } => cli::init::run(sales, marketing, output_dir),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
