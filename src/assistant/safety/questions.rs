use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use super::tips::{SAFETY_CATEGORIES, SAFETY_THEMES};

/// A question may be picked this many times in a row before the next pick is
/// forced onto a different one.
pub const MAX_CONSECUTIVE_REPEATS: u32 = 2;

pub const FOLLOW_UP_QUESTIONS: &[&str] = &[
    "Would you like to learn more about emergency procedures?",
    "Should we discuss personal safety measures?",
    "Would you like to know about first aid basics?",
    "Do you need information about fire safety?",
    "Would you like to learn about cyber security?",
    "Should we focus on home safety tips?",
    "Would you like to know about road safety?",
    "Do you want to learn about workplace safety?",
    "Would you like to know about environmental safety?",
    "Should we discuss health and hygiene practices?",
];

/// Phrasings used to compose a fresh question; `{}` takes one of the fills.
const QUESTION_TEMPLATES: &[(&str, &[&str])] = &[
    ("Would you like to learn about {}?", SAFETY_THEMES),
    ("Should we discuss {}?", SAFETY_CATEGORIES),
    (
        "Would you like to know about {}?",
        &["emergency procedures", "prevention tips", "safety measures"],
    ),
    ("Should we focus on {} safety?", &["personal", "home", "workplace"]),
    (
        "Would you like to learn about {}?",
        &["first aid", "emergency response", "prevention"],
    ),
    ("Should we discuss {} safety?", &["cyber", "road", "environmental"]),
    (
        "Would you like to know about {} practices?",
        &["health", "hygiene", "wellness"],
    ),
    (
        "Should we talk about {}?",
        &["emergency kits", "safety equipment", "prevention tools"],
    ),
];

/// Picks the question appended after a response, keeping runs of the same
/// question short without remembering more than the last pick.
#[derive(Debug)]
pub struct FollowUpQuestions {
    pool: Vec<String>,
    last_question_asked: Option<String>,
    /// How many picks in a row returned `last_question_asked`.
    question_count: u32,
    previous_suggestions: HashSet<String>,
}

impl Default for FollowUpQuestions {
    fn default() -> Self {
        Self::with_pool(FOLLOW_UP_QUESTIONS.iter().map(|q| q.to_string()).collect())
    }
}

impl FollowUpQuestions {
    pub fn with_pool(pool: Vec<String>) -> Self {
        Self {
            pool,
            last_question_asked: None,
            question_count: 0,
            previous_suggestions: HashSet::new(),
        }
    }

    pub fn last_question_asked(&self) -> Option<&str> {
        self.last_question_asked.as_deref()
    }

    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    pub fn previous_suggestions(&self) -> &HashSet<String> {
        &self.previous_suggestions
    }

    pub fn next_question<R: Rng + ?Sized>(&mut self, rng: &mut R) -> String {
        let last = self.last_question_asked.as_deref();

        let question = if self.question_count >= MAX_CONSECUTIVE_REPEATS {
            let available: Vec<&String> = self
                .pool
                .iter()
                .filter(|q| Some(q.as_str()) != last)
                .collect();
            let question = match available.choose(rng) {
                Some(question) => (*question).clone(),
                None => synthesize_question(last, rng),
            };
            self.question_count = 0;
            question
        } else {
            match self.pool.choose(rng) {
                Some(question) => question.clone(),
                None => synthesize_question(last, rng),
            }
        };

        if last == Some(question.as_str()) {
            self.question_count += 1;
        } else {
            self.question_count = 1;
        }

        self.previous_suggestions.insert(question.clone());
        self.last_question_asked = Some(question.clone());
        question
    }
}

/// Composes a question from a random phrasing and fill that differs from
/// `avoid`. Visits each phrasing at most once.
pub fn synthesize_question<R: Rng + ?Sized>(avoid: Option<&str>, rng: &mut R) -> String {
    let mut templates: Vec<&(&str, &[&str])> = QUESTION_TEMPLATES.iter().collect();
    templates.shuffle(rng);

    for (template, fills) in templates {
        let candidates: Vec<String> = fills
            .iter()
            .map(|fill| template.replacen("{}", fill, 1))
            .filter(|candidate| Some(candidate.as_str()) != avoid)
            .collect();
        if let Some(question) = candidates.choose(rng) {
            return question.clone();
        }
    }

    // Every phrasing has several fills, so at least one always differs.
    format!("Should we talk about {}?", SAFETY_THEMES[0])
}
