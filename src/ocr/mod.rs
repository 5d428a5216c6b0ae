//! OCR enrichment.
//!
//! Second stage of the pipeline: every question that only exists as an
//! image gets its text recognized with Tesseract (German) and merged into
//! `questionText`. Text questions pass through untouched. The pass is a
//! plain serial loop and the first failure aborts the whole batch, so an
//! output file only ever exists for a fully enriched input.

use std::path::{Path, PathBuf};

use anyhow::Result;
use rusty_tesseract::{Args, Image};
use tracing::{debug, info};

use crate::catalog::{Question, QuestionFile};
use crate::config::Config;
use crate::error::OcrError;

pub struct OcrEngine {
    client: reqwest::Client,
    args: Args,
    cache_dir: PathBuf,
}

impl OcrEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            args: Args {
                lang: config.ocr_language.clone(),
                ..Args::default()
            },
            cache_dir: PathBuf::from(&config.ocr_cache_dir),
        }
    }

    /// Download the question image (cached by question number) and run
    /// Tesseract over it.
    pub async fn recognize_url(&self, question_number: u32, url: &str) -> Result<String> {
        let path = self.download(question_number, url).await?;

        let image = Image::from_path(&path).map_err(|e| OcrError::Recognition {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let text =
            rusty_tesseract::image_to_string(&image, &self.args).map_err(|e| {
                OcrError::Recognition {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
            })?;

        Ok(text.trim().to_string())
    }

    async fn download(&self, question_number: u32, url: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.cache_dir)?;
        let path = self
            .cache_dir
            .join(format!("question_{}.{}", question_number, extension_of(url)));

        if path.exists() {
            debug!("using cached image for question {}", question_number);
            return Ok(path);
        }

        let download_error = |message: String| OcrError::Download {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| download_error(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| download_error(e.to_string()))?;
        std::fs::write(&path, &bytes)?;

        Ok(path)
    }
}

/// Whether the question needs a recognition pass at all.
pub fn needs_recognition(question: &Question) -> bool {
    question.question_image_url.is_some()
}

/// Merge recognized text into the question. Overwrites any existing text,
/// matching a full re-run from scratch.
pub fn apply_recognized_text(question: &mut Question, text: String) {
    question.question_text = Some(text);
}

/// Enrich a whole question file, preserving its shape (catalog or flat).
pub async fn enrich_file(file: QuestionFile, engine: &OcrEngine) -> Result<QuestionFile> {
    match file {
        QuestionFile::Flat(mut questions) => {
            enrich_questions(&mut questions, engine).await?;
            Ok(QuestionFile::Flat(questions))
        }
        QuestionFile::Catalog(mut catalog) => {
            enrich_questions(&mut catalog.general_questions, engine).await?;
            for (state, questions) in catalog.state_questions.iter_mut() {
                info!("Enriching state questions for {}", state);
                enrich_questions(questions, engine).await?;
            }
            Ok(QuestionFile::Catalog(catalog))
        }
    }
}

pub async fn enrich_questions(questions: &mut [Question], engine: &OcrEngine) -> Result<()> {
    for question in questions.iter_mut() {
        info!("Processing question: {}", question.question_number);

        let Some(url) = question.question_image_url.clone() else {
            info!("Text question, skipping OCR");
            continue;
        };

        let text = engine.recognize_url(question.question_number, &url).await?;
        info!("Extracted text: {}", text);
        apply_recognized_text(question, text);
    }
    Ok(())
}

fn extension_of(url: &str) -> &str {
    Path::new(url)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.len() <= 4 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Answer;

    fn text_question() -> Question {
        Question {
            question_number: 1,
            question_text: Some("Wie heißt die deutsche Verfassung?".to_string()),
            question_image_url: None,
            explanation: None,
            answers: vec![Answer {
                text: "Grundgesetz".to_string(),
                is_correct: true,
            }],
        }
    }

    #[tokio::test]
    async fn questions_without_image_pass_through_unchanged() {
        let question = text_question();
        assert!(!needs_recognition(&question));

        // No image URL anywhere, so the engine is never asked to recognize
        // anything and the questions must come out byte-identical.
        let engine = OcrEngine::new(&crate::Config::default());
        let mut questions = vec![question.clone()];
        enrich_questions(&mut questions, &engine).await.unwrap();
        assert_eq!(questions, vec![question]);
    }

    #[test]
    fn recognized_text_overwrites_existing_text() {
        let mut question = text_question();
        question.question_image_url = Some("https://example.org/bild.png".to_string());
        assert!(needs_recognition(&question));

        apply_recognized_text(&mut question, "Was ist ein Rechtsstaat?".to_string());
        assert_eq!(
            question.question_text.as_deref(),
            Some("Was ist ein Rechtsstaat?")
        );
    }

    #[test]
    fn falls_back_to_png_for_odd_urls() {
        assert_eq!(extension_of("https://example.org/bild.png"), "png");
        assert_eq!(extension_of("https://example.org/bild.jpeg"), "jpeg");
        assert_eq!(extension_of("https://example.org/f?p=514:30"), "png");
    }
}
