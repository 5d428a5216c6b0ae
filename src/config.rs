/// Program configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Landing page of the official question catalog
    pub start_url: String,
    /// Base URL used to absolutize relative image sources
    pub site_base_url: String,
    /// URL the catalog page settles on after entering it
    pub catalog_url: String,
    /// URL the start page settles on when returning from the catalog
    pub start_page_url: String,
    /// Where the scraper writes its result
    pub scrape_output_file: String,
    /// Whole-run timeout for the scraper, in seconds
    pub scrape_timeout_secs: u64,
    /// Tesseract language code for OCR
    pub ocr_language: String,
    /// Directory the OCR step downloads question images into
    pub ocr_cache_dir: String,
    /// JSON file holding the per-question answer statistics
    pub stats_file: String,
    /// TOML manifest mapping question-set names to JSON files
    pub manifest_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_url: "https://oet.bamf.de/ords/oetut/f?p=514:1".to_string(),
            site_base_url: "https://oet.bamf.de/ords/oetut/".to_string(),
            catalog_url: "https://oet.bamf.de/ords/oetut/f?p=514:30::::::".to_string(),
            start_page_url: "https://oet.bamf.de/ords/oetut/f?p=514:1::::::".to_string(),
            scrape_output_file: "scrape_results.json".to_string(),
            scrape_timeout_secs: 60 * 60,
            ocr_language: "deu".to_string(),
            ocr_cache_dir: "ocr_cache".to_string(),
            stats_file: "question_stats.json".to_string(),
            manifest_file: "question_sets.toml".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            start_url: std::env::var("START_URL").unwrap_or(default.start_url),
            site_base_url: std::env::var("SITE_BASE_URL").unwrap_or(default.site_base_url),
            catalog_url: std::env::var("CATALOG_URL").unwrap_or(default.catalog_url),
            start_page_url: std::env::var("START_PAGE_URL").unwrap_or(default.start_page_url),
            scrape_output_file: std::env::var("SCRAPE_OUTPUT_FILE").unwrap_or(default.scrape_output_file),
            scrape_timeout_secs: std::env::var("SCRAPE_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.scrape_timeout_secs),
            ocr_language: std::env::var("OCR_LANGUAGE").unwrap_or(default.ocr_language),
            ocr_cache_dir: std::env::var("OCR_CACHE_DIR").unwrap_or(default.ocr_cache_dir),
            stats_file: std::env::var("STATS_FILE").unwrap_or(default.stats_file),
            manifest_file: std::env::var("MANIFEST_FILE").unwrap_or(default.manifest_file),
        }
    }
}
