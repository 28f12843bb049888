//! Practice question bank
//!
//! A fixed set of behavioral interview questions grouped by difficulty
//! tier. Content generation is out of scope; the bank only selects.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Difficulty tier of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// All tiers in declared order
    pub fn all() -> &'static [Difficulty] {
        &[
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Advanced,
        ]
    }

    /// Parse a tier name, falling back to `Beginner` for anything unknown
    pub fn from_name_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "intermediate" => Difficulty::Intermediate,
            "advanced" => Difficulty::Advanced,
            _ => Difficulty::Beginner,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A question tagged with its tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub difficulty: Difficulty,
}

const BEGINNER: &[&str] = &[
    "Tell me about yourself.",
    "What are your strengths and weaknesses?",
    "Why do you want to work for this company?",
    "Where do you see yourself in 5 years?",
    "Describe a challenging situation you faced at work and how you handled it.",
];

const INTERMEDIATE: &[&str] = &[
    "Tell me about a time when you had to work with a difficult team member.",
    "How do you handle stress and pressure?",
    "What are your salary expectations?",
    "Why should we hire you?",
    "What is your leadership style?",
];

const ADVANCED: &[&str] = &[
    "Describe a situation where you had to make an unpopular decision.",
    "How do you stay motivated in your work?",
    "Tell me about a time when you failed and what you learned from it.",
    "How do you prioritize your work when dealing with multiple deadlines?",
    "What questions do you have for me about the role or company?",
];

/// Static question bank
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionBank;

impl QuestionBank {
    pub fn new() -> Self {
        QuestionBank
    }

    /// Questions for one tier
    pub fn tier(&self, difficulty: Difficulty) -> &'static [&'static str] {
        match difficulty {
            Difficulty::Beginner => BEGINNER,
            Difficulty::Intermediate => INTERMEDIATE,
            Difficulty::Advanced => ADVANCED,
        }
    }

    /// Random question from a tier
    pub fn random_question(&self, difficulty: Difficulty) -> Question {
        self.random_question_with(difficulty, &mut rand::thread_rng())
    }

    pub fn random_question_with<R: Rng + ?Sized>(
        &self,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Question {
        let question = self
            .tier(difficulty)
            .choose(rng)
            .copied()
            .unwrap_or_default();

        Question {
            question: question.to_owned(),
            difficulty,
        }
    }

    /// Draw `count` questions spread across the tiers.
    ///
    /// Each tier contributes `count / 3` draws; the beginner tier also
    /// takes the remainder. Draws are independent, so repeats are possible.
    pub fn questions(&self, count: usize) -> Vec<Question> {
        self.questions_with(count, &mut rand::thread_rng())
    }

    pub fn questions_with<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Question> {
        let mut questions = Vec::with_capacity(count);
        for &difficulty in Difficulty::all() {
            let mut draws = count / 3;
            if difficulty == Difficulty::Beginner {
                draws += count % 3;
            }
            for _ in 0..draws {
                questions.push(self.random_question_with(difficulty, rng));
            }
        }
        questions.truncate(count);
        questions
    }
}
