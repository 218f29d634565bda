//! The review loop: for each record, guess a category, ask the human, and
//! learn from the answer before moving on.
//!
//! Each record moves `Pending -> Presented -> Resolved`, or to `Aborted` when
//! the human quits. Registry and classifier are updated in the same step that
//! resolves a record, so the guess for record i+1 reflects every answer up to
//! record i.

use crate::classifier::{Guess, IncrementalClassifier};
use crate::error::{BankClassifyError, Result};
use crate::features::extract;
use crate::models::TransactionRecord;
use crate::registry::CategoryRegistry;

pub const QUIT_TOKEN: &str = "q";

/// What the human sees before answering.
pub struct Presentation<'a> {
    pub categories: &'a [String],
    pub record: &'a TransactionRecord,
    pub guess: &'a Guess,
    /// Zero-based position within the batch.
    pub position: usize,
    pub total: usize,
}

/// Source of human answers. Implemented by the terminal UI and by tests.
pub trait Prompt {
    /// Show the record and return one line of input.
    fn ask(&mut self, view: &Presentation<'_>) -> Result<String>;

    /// Tell the human their last answer was not usable.
    fn reject(&mut self, error: &BankClassifyError);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Accept,
    Select(i64),
    NewCategory(String),
    Quit,
}

impl Response {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            Self::Accept
        } else if input.eq_ignore_ascii_case(QUIT_TOKEN) {
            Self::Quit
        } else if let Ok(index) = input.parse::<i64>() {
            Self::Select(index)
        } else {
            Self::NewCategory(input.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Pending,
    Presented,
    Resolved,
    Aborted,
}

#[derive(Debug)]
pub struct LabelOutcome {
    /// The whole batch in ingestion order; unresolved records have no category.
    pub records: Vec<TransactionRecord>,
    pub states: Vec<RecordState>,
    pub resolved: usize,
    pub quit: bool,
}

impl LabelOutcome {
    pub fn resolved_records(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.records
            .iter()
            .zip(&self.states)
            .filter(|(_, s)| **s == RecordState::Resolved)
            .map(|(r, _)| r)
    }
}

pub struct InteractiveLabeler<'a, P: Prompt> {
    classifier: &'a mut IncrementalClassifier,
    registry: &'a mut CategoryRegistry,
    prompt: P,
}

impl<'a, P: Prompt> InteractiveLabeler<'a, P> {
    pub fn new(
        classifier: &'a mut IncrementalClassifier,
        registry: &'a mut CategoryRegistry,
        prompt: P,
    ) -> Self {
        Self {
            classifier,
            registry,
            prompt,
        }
    }

    #[cfg(test)]
    pub fn into_prompt(self) -> P {
        self.prompt
    }

    pub fn label_batch(&mut self, mut records: Vec<TransactionRecord>) -> Result<LabelOutcome> {
        let total = records.len();
        let mut states = vec![RecordState::Pending; total];
        let mut resolved = 0usize;

        for position in 0..total {
            states[position] = RecordState::Presented;
            match self.label_one(&records[position], position, total)? {
                Some(category) => {
                    records[position].category = Some(category);
                    states[position] = RecordState::Resolved;
                    resolved += 1;
                }
                None => {
                    for state in &mut states[position..] {
                        *state = RecordState::Aborted;
                    }
                    log::info!("Quit after {resolved} of {total} records");
                    return Ok(LabelOutcome {
                        records,
                        states,
                        resolved,
                        quit: true,
                    });
                }
            }
        }

        Ok(LabelOutcome {
            records,
            states,
            resolved,
            quit: false,
        })
    }

    /// Present one record until it resolves. `None` means the human quit.
    fn label_one(
        &mut self,
        record: &TransactionRecord,
        position: usize,
        total: usize,
    ) -> Result<Option<String>> {
        let features = extract(&record.description);
        let guess = self.classifier.classify(&features);
        if features.is_empty() {
            log::info!("{:?} has no usable words; only category frequency can guess", record.description);
        }
        log::debug!("{:?} -> {} tokens, guess {:?}", record.description, features.len(), guess);

        loop {
            let view = Presentation {
                categories: self.registry.names(),
                record,
                guess: &guess,
                position,
                total,
            };
            let input = self.prompt.ask(&view)?;
            let response = Response::parse(&input);
            if response == Response::Quit {
                return Ok(None);
            }
            match self.resolve(response, &guess) {
                Ok(category) => {
                    self.classifier.update(features, category.clone());
                    return Ok(Some(category));
                }
                Err(e) if e.is_recoverable() => self.prompt.reject(&e),
                Err(e) => return Err(e),
            }
        }
    }

    fn resolve(&mut self, response: Response, guess: &Guess) -> Result<String> {
        match response {
            Response::Accept => {
                let name = guess.category().ok_or(BankClassifyError::NothingToAccept)?;
                // A guess learned from history may predate the categories file.
                self.registry.register(name)?;
                Ok(name.to_string())
            }
            Response::Select(index) => Ok(self.registry.resolve(index)?.to_string()),
            Response::NewCategory(name) => {
                let index = self.registry.register(&name)?;
                Ok(self.registry.resolve(index as i64)?.to_string())
            }
            Response::Quit => unreachable!("quit is handled before resolution"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays canned answers and records what was shown.
    #[derive(Default)]
    struct ScriptedPrompt {
        answers: VecDeque<&'static str>,
        guesses: Vec<Guess>,
        rejections: Vec<String>,
    }

    impl ScriptedPrompt {
        fn new(answers: &[&'static str]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                ..Default::default()
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn ask(&mut self, view: &Presentation<'_>) -> Result<String> {
            self.guesses.push(view.guess.clone());
            self.answers
                .pop_front()
                .map(str::to_string)
                .ok_or_else(|| BankClassifyError::Other("script exhausted".into()))
        }

        fn reject(&mut self, error: &BankClassifyError) {
            self.rejections.push(error.to_string());
        }
    }

    fn batch(descriptions: &[&str]) -> Vec<TransactionRecord> {
        descriptions
            .iter()
            .map(|d| TransactionRecord::unlabeled("01 Jan", *d, -1.0))
            .collect()
    }

    #[test]
    fn test_response_parse() {
        assert_eq!(Response::parse(""), Response::Accept);
        assert_eq!(Response::parse("  "), Response::Accept);
        assert_eq!(Response::parse("Q"), Response::Quit);
        assert_eq!(Response::parse("q"), Response::Quit);
        assert_eq!(Response::parse("3"), Response::Select(3));
        assert_eq!(Response::parse("-1"), Response::Select(-1));
        assert_eq!(Response::parse("Eating out"), Response::NewCategory("Eating out".into()));
        assert_eq!(Response::parse("quit"), Response::NewCategory("quit".into()));
    }

    #[test]
    fn test_two_examples_needed_before_guessing() {
        let mut clf = IncrementalClassifier::new();
        let mut reg = CategoryRegistry::in_memory();
        let prompt = ScriptedPrompt::new(&["Groceries", "", "0"]);
        let mut labeler = InteractiveLabeler::new(&mut clf, &mut reg, prompt);
        let outcome = labeler
            .label_batch(batch(&["TESCO STORE 123", "TESCO STORE 456"]))
            .unwrap();
        let prompt = labeler.into_prompt();

        assert_eq!(prompt.guesses, vec![Guess::NoGuess, Guess::NoGuess, Guess::NoGuess]);
        // Blank accept with no guess is refused and the record re-presented.
        assert_eq!(prompt.rejections.len(), 1);
        assert_eq!(outcome.resolved, 2);
        assert!(!outcome.quit);
        assert_eq!(outcome.records[0].category.as_deref(), Some("Groceries"));
        assert_eq!(outcome.records[1].category.as_deref(), Some("Groceries"));
        assert_eq!(reg.by_name("Groceries"), Some(0));
        assert_eq!(clf.len(), 2);
        assert!(clf.is_ready());
    }

    #[test]
    fn test_guess_improves_within_session() {
        let mut clf = IncrementalClassifier::new();
        let mut reg = CategoryRegistry::in_memory();
        let prompt = ScriptedPrompt::new(&["Groceries", "Car", ""]);
        let mut labeler = InteractiveLabeler::new(&mut clf, &mut reg, prompt);
        let outcome = labeler
            .label_batch(batch(&["TESCO STORE", "SHELL FUEL", "TESCO EXPRESS"]))
            .unwrap();
        let prompt = labeler.into_prompt();

        assert_eq!(prompt.guesses[2], Guess::Category("Groceries".into()));
        assert_eq!(outcome.records[2].category.as_deref(), Some("Groceries"));
        assert_eq!(clf.len(), 3);
    }

    #[test]
    fn test_out_of_range_index_reprompts() {
        let mut clf = IncrementalClassifier::new();
        let mut reg = CategoryRegistry::in_memory();
        reg.register("Food").unwrap();
        let prompt = ScriptedPrompt::new(&["7", "-2", "0"]);
        let mut labeler = InteractiveLabeler::new(&mut clf, &mut reg, prompt);
        let outcome = labeler.label_batch(batch(&["CAFE"])).unwrap();
        let prompt = labeler.into_prompt();

        assert_eq!(prompt.rejections.len(), 2);
        assert!(prompt.rejections[0].contains("index 7"));
        assert_eq!(outcome.records[0].category.as_deref(), Some("Food"));
        assert_eq!(outcome.states, vec![RecordState::Resolved]);
        assert_eq!(clf.len(), 1);
    }

    #[test]
    fn test_quit_leaves_rest_unlabeled() {
        let mut clf = IncrementalClassifier::new();
        let mut reg = CategoryRegistry::in_memory();
        let prompt = ScriptedPrompt::new(&["Rent", "Q"]);
        let mut labeler = InteractiveLabeler::new(&mut clf, &mut reg, prompt);
        let outcome = labeler.label_batch(batch(&["LANDLORD", "CINEMA", "PUB"])).unwrap();

        assert!(outcome.quit);
        assert_eq!(outcome.resolved, 1);
        assert_eq!(
            outcome.states,
            vec![RecordState::Resolved, RecordState::Aborted, RecordState::Aborted]
        );
        assert_eq!(outcome.records[0].category.as_deref(), Some("Rent"));
        assert!(outcome.records[1].category.is_none());
        assert!(outcome.records[2].category.is_none());
        assert_eq!(outcome.resolved_records().count(), 1);
        assert_eq!(clf.len(), 1);
    }

    #[test]
    fn test_new_category_name_is_registered_once() {
        let mut clf = IncrementalClassifier::new();
        let mut reg = CategoryRegistry::in_memory();
        let prompt = ScriptedPrompt::new(&["Bills", " Bills ", "Travel"]);
        let mut labeler = InteractiveLabeler::new(&mut clf, &mut reg, prompt);
        let outcome = labeler.label_batch(batch(&["EDF", "WATER", "RYANAIR"])).unwrap();

        assert_eq!(reg.names(), &["Bills".to_string(), "Travel".to_string()]);
        assert_eq!(outcome.records[1].category.as_deref(), Some("Bills"));
        assert_eq!(clf.categories().collect::<Vec<_>>(), vec!["Bills", "Travel"]);
    }

    #[test]
    fn test_accepted_history_guess_is_registered() {
        let mut clf = IncrementalClassifier::train([
            (extract("NETFLIX"), "Fun"),
            (extract("NETFLIX"), "Fun"),
        ]);
        let mut reg = CategoryRegistry::in_memory();
        let prompt = ScriptedPrompt::new(&[""]);
        let mut labeler = InteractiveLabeler::new(&mut clf, &mut reg, prompt);
        let outcome = labeler.label_batch(batch(&["NETFLIX COM"])).unwrap();

        assert_eq!(outcome.records[0].category.as_deref(), Some("Fun"));
        assert_eq!(reg.by_name("Fun"), Some(0));
        assert_eq!(clf.len(), 3);
    }

    #[test]
    fn test_prompt_failure_propagates() {
        let mut clf = IncrementalClassifier::new();
        let mut reg = CategoryRegistry::in_memory();
        let prompt = ScriptedPrompt::new(&[]);
        let mut labeler = InteractiveLabeler::new(&mut clf, &mut reg, prompt);
        assert!(labeler.label_batch(batch(&["CAFE"])).is_err());
    }

    #[test]
    fn test_empty_batch() {
        let mut clf = IncrementalClassifier::new();
        let mut reg = CategoryRegistry::in_memory();
        let mut labeler = InteractiveLabeler::new(&mut clf, &mut reg, ScriptedPrompt::new(&[]));
        let outcome = labeler.label_batch(Vec::new()).unwrap();
        assert_eq!(outcome.resolved, 0);
        assert!(!outcome.quit);
    }
}
