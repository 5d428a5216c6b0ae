//! Catalog crawler.
//!
//! Walks the official question catalog with a headless browser: one pass
//! over the 300 general questions, then one pass per state over its 10
//! state-specific questions. Any structural mismatch aborts the run before
//! anything is written; only a shortfall in a state pool is downgraded to a
//! warning.

mod extract;

pub use extract::{parse_question_number, StateOption};

use anyhow::Result;
use chromiumoxide::Page;
use tracing::{info, warn};

use crate::catalog::{Question, QuestionCatalog};
use crate::config::Config;
use crate::error::ScrapeError;

/// Size of the general question pool.
pub const GENERAL_QUESTIONS_COUNT: usize = 300;
/// Expected size of each state-specific pool.
pub const STATE_QUESTIONS_COUNT: usize = 10;

/// The instruction paragraph the landing page must carry, with the question
/// counts embedded. If the site changes the rules or the distribution this
/// text changes with them, and the scrape fails so the assumptions can be
/// re-checked.
pub fn expected_instruction_text() -> String {
    format!(
        "Das Bundesamt stellt Ihnen an dieser Stelle den Gesamtkatalog der für den \
         Einbürgerungstest zugelassenen Prüfungsfragen zur Verfügung, mit dem Sie sich auf \
         einen Einbürgerungstest vorbereiten können. Dabei handelt es sich um insgesamt \
         {total} Fragen, davon {general} allgemeine Fragen und {state} landesbezogene Fragen, \
         die nur für das jeweilige Bundesland zu beantworten sind.",
        total = GENERAL_QUESTIONS_COUNT + STATE_QUESTIONS_COUNT,
        general = GENERAL_QUESTIONS_COUNT,
        state = STATE_QUESTIONS_COUNT,
    )
}

/// Accumulator for one scrape run.
///
/// Passed through the page-walk routines and turned into the final catalog
/// at the end, so the run holds no state outside this struct.
#[derive(Debug, Default)]
pub struct ScrapeRun {
    catalog: QuestionCatalog,
}

impl ScrapeRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_general(&mut self, question: Question) {
        self.catalog.general_questions.push(question);
    }

    pub fn push_state(&mut self, state: &str, question: Question) {
        self.catalog
            .state_questions
            .entry(state.to_string())
            .or_default()
            .push(question);
    }

    pub fn general_count(&self) -> usize {
        self.catalog.general_questions.len()
    }

    pub fn finish(self) -> QuestionCatalog {
        self.catalog
    }
}

/// Check the landing-page assumptions (instruction text, state dropdown)
/// and return the available states.
pub async fn verify_landing_page(page: &Page) -> Result<Vec<StateOption>> {
    extract::verify_instruction_text(page, &expected_instruction_text()).await?;
    info!("✓ instruction text matches the expected value");

    let states = extract::state_options(page).await?;
    if states.is_empty() {
        return Err(ScrapeError::NoStates.into());
    }
    Ok(states)
}

/// Walk the whole catalog. The page must already be on the landing page.
pub async fn scrape_catalog(page: &Page, config: &Config) -> Result<QuestionCatalog> {
    let states = verify_landing_page(page).await?;
    info!(
        "Available states: {}",
        states
            .iter()
            .map(|s| s.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut run = ScrapeRun::new();
    scrape_general_questions(page, config, &states[0], &mut run).await?;

    for state in &states {
        scrape_state_questions(page, config, state, &mut run).await?;
    }

    Ok(run.finish())
}

/// The general pool is identical for every state, so it is scraped once
/// under an arbitrary (the first) state.
async fn scrape_general_questions(
    page: &Page,
    config: &Config,
    state: &StateOption,
    run: &mut ScrapeRun,
) -> Result<()> {
    info!("Selecting state {} to scrape general questions", state.label);
    extract::select_state(page, &state.value).await?;
    extract::enter_catalog(page).await?;
    extract::wait_for_url(page, &config.catalog_url).await?;

    for index in 0..GENERAL_QUESTIONS_COUNT {
        let question = extract::extract_question(page, &config.site_base_url).await?;
        log_question(index + 1, GENERAL_QUESTIONS_COUNT, &question);
        run.push_general(question);

        if index + 1 < GENERAL_QUESTIONS_COUNT {
            extract::click_next(page).await?;
        }
    }

    extract::return_to_start(page).await?;
    extract::wait_for_url(page, &config.start_page_url).await?;
    info!("✓ scraped {} general questions", run.general_count());
    Ok(())
}

async fn scrape_state_questions(
    page: &Page,
    config: &Config,
    state: &StateOption,
    run: &mut ScrapeRun,
) -> Result<()> {
    info!("Selecting state: {}", state.label);
    extract::select_state(page, &state.value).await?;
    extract::enter_catalog(page).await?;
    extract::wait_for_url(page, &config.catalog_url).await?;

    let first_row = GENERAL_QUESTIONS_COUNT + 1;
    info!(
        "Jumping to first state-specific question ({}) for {}",
        first_row, state.label
    );
    extract::jump_to_row(page, &first_row.to_string()).await?;

    let mut count = 0;
    loop {
        let question = extract::extract_question(page, &config.site_base_url).await?;
        log_question(count + 1, STATE_QUESTIONS_COUNT, &question);
        run.push_state(&state.label, question);
        count += 1;

        let next_exists = extract::next_button_exists(page).await?;
        if count >= STATE_QUESTIONS_COUNT || !next_exists {
            if count < STATE_QUESTIONS_COUNT {
                // Not fatal: the pool is smaller than expected, the data
                // collected so far is still usable.
                warn!(
                    "Expected {} state-specific questions for {}, but found only {}. \
                     The next button is not available.",
                    STATE_QUESTIONS_COUNT, state.label, count
                );
            }
            break;
        }
        extract::click_next(page).await?;
    }

    info!("✓ finished scraping {} questions", state.label);
    extract::return_to_start(page).await?;
    extract::wait_for_url(page, &config.start_page_url).await?;
    Ok(())
}

fn log_question(index: usize, total: usize, question: &Question) {
    if question.question_image_url.is_some() {
        info!(
            "[{}/{}] question {}: extracted image URL",
            index, total, question.question_number
        );
    } else {
        info!(
            "[{}/{}] question {}: extracted text",
            index, total, question.question_number
        );
    }
}
