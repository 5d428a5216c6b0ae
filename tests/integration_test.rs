use std::path::PathBuf;

use fragenkatalog::browser::launch_headless_browser;
use fragenkatalog::quiz::terminal;
use fragenkatalog::scraper;
use fragenkatalog::{Config, JsonStatsStore, QuestionFile, QuizMode, QuizSession, StatsStore};

fn temp_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("fragenkatalog_it_{}_{}.json", tag, std::process::id()))
}

fn sample_catalog_json() -> &'static str {
    r#"{
        "generalQuestions": [
            {
                "questionNumber": 1,
                "questionText": "In Deutschland dürfen Menschen offen etwas gegen die Regierung sagen, weil ...",
                "explanation": "Meinungsfreiheit, Art. 5 GG.",
                "answers": [
                    {"text": "hier Religionsfreiheit gilt.", "isCorrect": false},
                    {"text": "hier Meinungsfreiheit gilt.", "isCorrect": true}
                ]
            },
            {
                "questionNumber": 2,
                "questionImageUrl": "https://oet.bamf.de/ords/oetut/r/514/files/wappen.png",
                "questionText": "Welches Wappen gehört zur Bundesrepublik Deutschland?",
                "answers": [
                    {"text": "1", "isCorrect": true},
                    {"text": "2", "isCorrect": false}
                ]
            }
        ],
        "stateQuestions": {
            "Hessen": [
                {
                    "questionNumber": 301,
                    "questionText": "Welches Bundesland ist Hessen?",
                    "answers": [
                        {"text": "ein Stadtstaat", "isCorrect": false},
                        {"text": "ein Flächenland", "isCorrect": true}
                    ]
                }
            ]
        }
    }"#
}

/// Full offline pass over the quiz pipeline: load a question file, answer
/// questions, verify that the persisted stats drive the practice order.
#[test]
fn quiz_end_to_end_practice_order() {
    let file_path = temp_path("catalog");
    std::fs::write(&file_path, sample_catalog_json()).unwrap();
    let stats_path = temp_path("stats_e2e");
    let _ = std::fs::remove_file(&stats_path);

    let file = QuestionFile::load(&file_path).unwrap();
    assert_eq!(file.available_states(), vec!["Hessen"]);
    assert!(file.one_correct_violations().is_empty());

    let questions = file.questions_for_state(Some("Hessen")).unwrap();
    assert_eq!(questions.len(), 3);

    // Build up stats: Q1 answered correctly three times, Q2 once wrong.
    let mut store = JsonStatsStore::open(&stats_path).unwrap();
    for _ in 0..3 {
        store.record_answer(1, true).unwrap();
    }
    store.record_answer(2, false).unwrap();

    let mut session = QuizSession::new(questions, store);
    session.set_mode(QuizMode::Practice).unwrap();

    let mut order = vec![session.current_question().unwrap().question_number];
    while session.next() {
        order.push(session.current_question().unwrap().question_number);
    }
    // Q2 (score -1) first, then the unanswered Q301 (0), then Q1 (3).
    assert_eq!(order, vec![2, 301, 1]);

    let _ = std::fs::remove_file(&file_path);
    let _ = std::fs::remove_file(&stats_path);
}

/// Answering through a session must survive a store reopen.
#[test]
fn recorded_answers_survive_reopening_the_store() {
    let file_path = temp_path("catalog2");
    std::fs::write(&file_path, sample_catalog_json()).unwrap();
    let stats_path = temp_path("stats_reopen");
    let _ = std::fs::remove_file(&stats_path);

    let file = QuestionFile::load(&file_path).unwrap();
    let questions = file.questions_for_state(Some("Hessen")).unwrap();

    let store = JsonStatsStore::open(&stats_path).unwrap();
    let mut session = QuizSession::new(questions, store);
    let outcome = session.select_answer(1).unwrap();
    assert!(outcome.correct);
    drop(session);

    let reopened = JsonStatsStore::open(&stats_path).unwrap();
    let stat = reopened.get(1).unwrap().unwrap();
    assert_eq!((stat.correct_count, stat.incorrect_count), (1, 0));

    let _ = std::fs::remove_file(&file_path);
    let _ = std::fs::remove_file(&stats_path);
}

/// A flat question file needs no region and feeds the quiz directly.
#[test]
fn flat_files_have_no_regions() {
    let json = r#"[
        {
            "questionNumber": 5,
            "questionText": "Frage",
            "answers": [{"text": "ja", "isCorrect": true}]
        }
    ]"#;
    let file: QuestionFile = serde_json::from_str(json).unwrap();
    assert!(file.available_states().is_empty());
    assert_eq!(file.questions_for_state(None).unwrap().len(), 1);
}

/// Empty question lists end the quiz with a message instead of an error.
#[test]
fn terminal_run_handles_empty_flat_file() {
    let stats_path = temp_path("stats_empty");
    let _ = std::fs::remove_file(&stats_path);

    let file = QuestionFile::Flat(Vec::new());
    let store = JsonStatsStore::open(&stats_path).unwrap();
    terminal::run(&file, store).unwrap();

    let _ = std::fs::remove_file(&stats_path);
}

/// Live check against the real site. Needs a local Chromium and network
/// access: cargo test -- --ignored
#[tokio::test]
#[ignore]
async fn live_landing_page_still_matches_assumptions() {
    fragenkatalog::logger::init();
    let config = Config::from_env();

    let (_browser, page) = launch_headless_browser(&config.start_url)
        .await
        .expect("failed to launch browser");

    let states = scraper::verify_landing_page(&page)
        .await
        .expect("landing page no longer matches the scraper's assumptions");
    assert!(!states.is_empty(), "the state dropdown should offer states");
    println!(
        "available states: {}",
        states
            .iter()
            .map(|s| s.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
}

/// Full live scrape. Takes a long time; run deliberately.
#[tokio::test]
#[ignore]
async fn live_scrape_full_catalog() {
    fragenkatalog::logger::init();
    let config = Config::from_env();

    let (_browser, page) = launch_headless_browser(&config.start_url)
        .await
        .expect("failed to launch browser");

    let catalog = scraper::scrape_catalog(&page, &config)
        .await
        .expect("scrape failed");

    assert_eq!(
        catalog.general_questions.len(),
        scraper::GENERAL_QUESTIONS_COUNT
    );
    assert!(!catalog.state_questions.is_empty());

    let violations = QuestionFile::Catalog(catalog).one_correct_violations();
    assert!(
        violations.is_empty(),
        "questions without exactly one correct answer: {:?}",
        violations
    );
}
