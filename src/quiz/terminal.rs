//! Line-oriented terminal front-end.
//!
//! One question per screen, one command per line. All quiz rules live in
//! [`QuizSession`]; this module only renders and forwards.

use std::io::BufRead;

use anyhow::Result;

use crate::catalog::QuestionFile;
use crate::quiz::session::{QuizMode, QuizSession};
use crate::quiz::store::StatsStore;

enum LoopExit {
    Quit,
    ChangeRegion,
}

pub fn run<S: StatsStore>(file: &QuestionFile, mut store: S) -> Result<()> {
    let states = file.available_states();

    let mut region = if states.is_empty() {
        None
    } else {
        match prompt_region(&states)? {
            Some(region) => Some(region),
            None => return Ok(()),
        }
    };

    loop {
        let questions = file
            .questions_for_state(region.as_deref())
            .unwrap_or_default();
        if questions.is_empty() {
            println!("No questions available for the selected set.");
            return Ok(());
        }

        let mut session = QuizSession::new(questions, store);
        let exit = quiz_loop(&mut session, !states.is_empty())?;
        store = session.into_store();

        match exit {
            LoopExit::Quit => return Ok(()),
            LoopExit::ChangeRegion => match prompt_region(&states)? {
                Some(next) => region = Some(next),
                None => return Ok(()),
            },
        }
    }
}

fn prompt_region(states: &[String]) -> Result<Option<String>> {
    println!("Available states:");
    for (i, state) in states.iter().enumerate() {
        println!("  {}) {}", i + 1, state);
    }
    println!("Select a state by number (q to quit):");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input == "q" {
            return Ok(None);
        }
        if let Ok(index) = input.parse::<usize>() {
            if (1..=states.len()).contains(&index) {
                return Ok(Some(states[index - 1].clone()));
            }
        }
        if let Some(state) = states.iter().find(|s| s.as_str() == input) {
            return Ok(Some(state.clone()));
        }
        println!("Please select a valid state to get started.");
    }
    Ok(None)
}

fn quiz_loop<S: StatsStore>(
    session: &mut QuizSession<S>,
    allow_region_change: bool,
) -> Result<LoopExit> {
    // Recognized text of image questions stays hidden until asked for, so
    // looking at the image stays an exercise.
    let mut show_text = false;
    render(session, show_text, allow_region_change);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            "q" => return Ok(LoopExit::Quit),
            "r" if allow_region_change => return Ok(LoopExit::ChangeRegion),
            "n" => {
                if session.next() {
                    show_text = false;
                }
                render(session, show_text, allow_region_change);
            }
            "p" => {
                if session.previous() {
                    show_text = false;
                }
                render(session, show_text, allow_region_change);
            }
            "m" => {
                let mode = match session.mode() {
                    QuizMode::Sequential => QuizMode::Practice,
                    QuizMode::Practice => QuizMode::Sequential,
                };
                session.set_mode(mode)?;
                show_text = false;
                match mode {
                    QuizMode::Practice => println!("Practice mode: worst questions first."),
                    QuizMode::Sequential => println!("Sequential order."),
                }
                render(session, show_text, allow_region_change);
            }
            "t" => {
                show_text = !show_text;
                render(session, show_text, allow_region_change);
            }
            "" => render(session, show_text, allow_region_change),
            input => match input.parse::<usize>() {
                Ok(number) if number >= 1 => match session.select_answer(number - 1) {
                    Ok(outcome) => {
                        if outcome.correct {
                            println!("✓ Richtig!");
                        } else {
                            println!("✗ Falsch.");
                        }
                        if let Some(explanation) = &outcome.explanation {
                            println!("{}", explanation);
                        }
                        render(session, show_text, allow_region_change);
                    }
                    Err(e) => println!("{}", e),
                },
                _ => println!("Unknown command: {:?}", input),
            },
        }
    }
    Ok(LoopExit::Quit)
}

fn render<S: StatsStore>(session: &QuizSession<S>, show_text: bool, allow_region_change: bool) {
    let Some(question) = session.current_question() else {
        return;
    };
    let (position, total) = session.position();

    println!();
    println!(
        "--- Frage {} ({} von {}) ---",
        question.question_number, position, total
    );

    match (&question.question_image_url, &question.question_text) {
        (Some(url), Some(text)) => {
            println!("[Bild] {}", url);
            if show_text {
                println!("{}", text);
            } else {
                println!("(t zeigt den erkannten Text)");
            }
        }
        (Some(url), None) => println!("[Bild] {}", url),
        (None, Some(text)) => println!("{}", text),
        (None, None) => println!("(Frage ohne Text)"),
    }

    let selected = session.selected_answer();
    for (i, answer) in question.answers.iter().enumerate() {
        let marker = match selected {
            Some(_) if answer.is_correct => " ✓",
            Some(sel) if sel == i => " ✗",
            _ => "",
        };
        println!("  {}) {}{}", i + 1, answer.text, marker);
    }

    let region_hint = if allow_region_change {
        ", r: Bundesland"
    } else {
        ""
    };
    println!(
        "(1-{}: Antwort, n/p: blättern, m: Modus{}, q: Ende)",
        question.answers.len().max(1),
        region_hint
    );
}
