//! Page-level extraction primitives.
//!
//! Every function here works on the current page only and knows nothing
//! about the walk order; the driver in `scraper::mod` sequences them.

use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::Page;
use regex::Regex;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::debug;

use crate::catalog::{Answer, Question};
use crate::error::ScrapeError;

/// Localized page header, e.g. "Aufgabe 12 von 310".
const HEADER_PATTERN: &str = r"Aufgabe\s+(\d+)\s+von\s+\d+";

const HEADER_SELECTOR: &str = "table#R59645205843215396 td.RegionHeader";
const STATE_SELECT_SELECTOR: &str = "select#P1_BUL_ID";
const ROW_SELECT_SELECTOR: &str = "select#P30_ROWNUM";
const NEXT_BUTTON_SELECTOR: &str = r#"input[value="nächste Aufgabe >"]"#;
const CATALOG_BUTTON_SELECTOR: &str = r#"input[value="Zum Fragenkatalog"]"#;
const START_BUTTON_SELECTOR: &str = r#"input[value="zur Startseite"]"#;

/// How long to poll for the question body (image or text) to appear.
const BODY_POLL_ATTEMPTS: usize = 25;
const BODY_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// One entry of the state dropdown on the landing page.
#[derive(Debug, Clone, Deserialize)]
pub struct StateOption {
    pub value: String,
    pub label: String,
}

/// Assert that the landing page still carries the expected instruction
/// paragraph. A mismatch aborts the run.
pub async fn verify_instruction_text(page: &Page, expected: &str) -> Result<()> {
    let script = r#"
        (() => {
            const paragraphs = document.querySelectorAll('tr.t3instructiontext td.t3Body p');
            return Array.from(paragraphs).map(p => p.innerText.trim());
        })()
    "#;

    let paragraphs: Vec<String> = page
        .evaluate(script)
        .await?
        .into_value()
        .context("cannot read instruction text paragraphs")?;

    if !paragraphs.iter().any(|p| p == expected) {
        return Err(ScrapeError::InstructionTextChanged.into());
    }
    Ok(())
}

/// Read the available states from the landing-page dropdown.
pub async fn state_options(page: &Page) -> Result<Vec<StateOption>> {
    let script = r#"
        (() => {
            const select = document.querySelector('select#P1_BUL_ID');
            if (!select) return null;
            return Array.from(select.options).map(option => ({
                value: option.value,
                label: option.textContent.trim()
            }));
        })()
    "#;

    let options: Option<Vec<StateOption>> = page
        .evaluate(script)
        .await?
        .into_value()
        .context("cannot read state options")?;

    options.ok_or_else(|| {
        ScrapeError::MissingElement {
            selector: STATE_SELECT_SELECTOR.to_string(),
        }
        .into()
    })
}

/// Select a state in the landing-page dropdown by option value.
pub async fn select_state(page: &Page, value: &str) -> Result<()> {
    let script = format!(
        r#"
        (() => {{
            const select = document.querySelector('select#P1_BUL_ID');
            if (!select) return false;
            select.value = {value};
            select.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;
        }})()
        "#,
        value = serde_json::to_string(value)?,
    );

    let selected: bool = page.evaluate(script.as_str()).await?.into_value()?;
    if !selected {
        return Err(ScrapeError::MissingElement {
            selector: STATE_SELECT_SELECTOR.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Click "Zum Fragenkatalog" and wait for the catalog page.
pub async fn enter_catalog(page: &Page) -> Result<()> {
    click_and_wait(page, CATALOG_BUTTON_SELECTOR).await
}

/// Click "zur Startseite" and wait for the landing page.
pub async fn return_to_start(page: &Page) -> Result<()> {
    click_and_wait(page, START_BUTTON_SELECTOR).await
}

/// Jump to a catalog row by selecting it in the row dropdown. The page
/// submits itself on change.
pub async fn jump_to_row(page: &Page, row_label: &str) -> Result<()> {
    let script = format!(
        r#"
        (() => {{
            const select = document.querySelector('select#P30_ROWNUM');
            if (!select) return false;
            const option = Array.from(select.options)
                .find(o => o.textContent.trim() === {label});
            if (!option) return false;
            select.value = option.value;
            select.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;
        }})()
        "#,
        label = serde_json::to_string(row_label)?,
    );

    let jumped: bool = page.evaluate(script.as_str()).await?.into_value()?;
    if !jumped {
        return Err(ScrapeError::MissingElement {
            selector: ROW_SELECT_SELECTOR.to_string(),
        }
        .into());
    }
    page.wait_for_navigation().await?;
    Ok(())
}

/// Whether the "nächste Aufgabe >" button is present on the current page.
/// It disappears on the last question of a pool.
pub async fn next_button_exists(page: &Page) -> Result<bool> {
    let script = r#"(() => !!document.querySelector('input[value="nächste Aufgabe >"]'))()"#;
    let exists: bool = page.evaluate(script).await?.into_value()?;
    Ok(exists)
}

/// Advance to the next question.
pub async fn click_next(page: &Page) -> Result<()> {
    click_and_wait(page, NEXT_BUTTON_SELECTOR).await
}

/// Poll until the page URL matches the expected one.
pub async fn wait_for_url(page: &Page, expected: &str) -> Result<()> {
    for _ in 0..BODY_POLL_ATTEMPTS {
        if page.url().await?.as_deref() == Some(expected) {
            return Ok(());
        }
        sleep(BODY_POLL_INTERVAL).await;
    }
    anyhow::bail!("page did not reach expected URL: {}", expected);
}

/// Extract the question shown on the current catalog page.
pub async fn extract_question(page: &Page, site_base_url: &str) -> Result<Question> {
    let header = header_text(page).await?;
    debug!("header text: {}", header);
    let question_number = parse_question_number(&header)?;

    let body = question_body(page, question_number).await?;
    let extras = answers_and_explanation(page).await?;

    Ok(Question {
        question_number,
        question_text: body.text,
        question_image_url: body
            .image_url
            .map(|src| absolutize(site_base_url, &src)),
        explanation: if extras.explanation.is_empty() {
            None
        } else {
            Some(extras.explanation)
        },
        answers: extras
            .answers
            .into_iter()
            .map(|raw| Answer {
                text: raw.text,
                is_correct: raw.is_correct,
            })
            .collect(),
    })
}

/// Parse the question number out of the region header.
pub fn parse_question_number(header: &str) -> Result<u32, ScrapeError> {
    let regex = Regex::new(HEADER_PATTERN).expect("header pattern is valid");
    regex
        .captures(header)
        .and_then(|captures| captures.get(1))
        .and_then(|number| number.as_str().parse().ok())
        .ok_or_else(|| ScrapeError::HeaderParse {
            header: header.to_string(),
        })
}

// ========== helpers ==========

#[derive(Debug, Default, Deserialize)]
struct QuestionBody {
    #[serde(rename = "imageUrl")]
    image_url: Option<String>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAnswer {
    text: String,
    #[serde(rename = "isCorrect")]
    is_correct: bool,
}

#[derive(Debug, Deserialize)]
struct RawExtras {
    answers: Vec<RawAnswer>,
    explanation: String,
}

async fn header_text(page: &Page) -> Result<String> {
    let script = r#"
        (() => {
            const cell = document.querySelector('table#R59645205843215396 td.RegionHeader');
            return cell ? cell.innerText : null;
        })()
    "#;

    let header: Option<String> = page.evaluate(script).await?.into_value()?;
    header.ok_or_else(|| {
        ScrapeError::MissingElement {
            selector: HEADER_SELECTOR.to_string(),
        }
        .into()
    })
}

/// Read the question body: an image URL or a plain text, whichever is
/// visible. Polls because the page renders the two containers lazily.
async fn question_body(page: &Page, question_number: u32) -> Result<QuestionBody> {
    let script = r#"
        (() => {
            const img = document.querySelector('span#P30_AUFGABENSTELLUNG_BILD > img');
            if (img && img.offsetParent !== null) {
                return { imageUrl: img.getAttribute('src') };
            }
            const text = document.querySelector('span#P30_AUFGABENSTELLUNG');
            if (text && text.offsetParent !== null) {
                return { text: text.innerText.trim() };
            }
            return {};
        })()
    "#;

    for _ in 0..BODY_POLL_ATTEMPTS {
        let body: QuestionBody = page.evaluate(script).await?.into_value()?;
        if body.image_url.is_some() || body.text.is_some() {
            return Ok(body);
        }
        sleep(BODY_POLL_INTERVAL).await;
    }

    Err(ScrapeError::EmptyQuestion { question_number }.into())
}

async fn answers_and_explanation(page: &Page) -> Result<RawExtras> {
    let script = r#"
        (() => {
            const answers = Array.from(
                document.querySelectorAll('input[type="radio"][name="f20"]')
            ).map(radio => ({
                text: (radio.closest('tr')?.querySelector('td[headers="ANTWORT"]')?.textContent || '').trim(),
                isCorrect: radio.id === 'FARBE'
            }));
            const explanation =
                (document.querySelector('#P30_BESCHREIBUNG')?.textContent || '').trim();
            return { answers, explanation };
        })()
    "#;

    let extras: RawExtras = page
        .evaluate(script)
        .await?
        .into_value()
        .context("cannot read answer options")?;
    Ok(extras)
}

async fn click_and_wait(page: &Page, selector: &str) -> Result<()> {
    let element = page.find_element(selector).await.map_err(|_| {
        ScrapeError::MissingElement {
            selector: selector.to_string(),
        }
    })?;
    element.click().await?;
    page.wait_for_navigation().await?;
    Ok(())
}

fn absolutize(site_base_url: &str, src: &str) -> String {
    if src.starts_with("http://") || src.starts_with("https://") {
        src.to_string()
    } else {
        format!("{}{}", site_base_url, src.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_question_number_from_header() {
        assert_eq!(parse_question_number("Aufgabe 12 von 310").unwrap(), 12);
        assert_eq!(parse_question_number("Aufgabe  301  von 310").unwrap(), 301);
    }

    #[test]
    fn rejects_header_without_task_count() {
        let err = parse_question_number("Fragenkatalog").unwrap_err();
        assert!(matches!(err, ScrapeError::HeaderParse { .. }));
    }

    #[test]
    fn absolutizes_relative_image_sources() {
        let base = "https://oet.bamf.de/ords/oetut/";
        assert_eq!(
            absolutize(base, "r/514/files/bild.png"),
            "https://oet.bamf.de/ords/oetut/r/514/files/bild.png"
        );
        assert_eq!(
            absolutize(base, "https://cdn.example.org/bild.png"),
            "https://cdn.example.org/bild.png"
        );
    }
}
