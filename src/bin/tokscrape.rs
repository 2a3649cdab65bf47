fn main() {
    std::process::exit(tokscrape::cli::run_scraper());
}
