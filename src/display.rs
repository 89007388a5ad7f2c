use crate::models::Question;
use crate::quiz::QuizSnapshot;
use lazy_static::lazy_static;
use regex::Regex;

pub const NOT_ATTEMPTED: &str = "Not attempted";

lazy_static! {
    static ref OPTION_PREFIX: Regex = Regex::new(r"^[A-Za-z][.)]\s*").expect("valid regex");
}

/// How an option is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    None,
    /// Chosen, quiz not yet submitted.
    Selected,
    /// Chosen and right.
    Correct,
    /// Chosen and wrong.
    Incorrect,
    /// The right answer, which the user did not choose.
    HighlightCorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOption {
    pub label: char,
    pub text: String,
    /// Text as sent by the service; this is what gets recorded and graded.
    pub raw: String,
}

impl DisplayOption {
    pub fn labelled(&self) -> String {
        format!("{}) {}", self.label, self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub selected: Option<String>,
    pub correct: String,
    pub explanation: Option<String>,
    pub is_correct: bool,
}

impl Feedback {
    pub fn selected_label(&self) -> &str {
        self.selected.as_deref().unwrap_or(NOT_ATTEMPTED)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQuestion {
    pub number: usize,
    pub text: String,
    pub options: Vec<(DisplayOption, OptionMark)>,
    pub feedback: Option<Feedback>,
}

/// Drops any `A.` / `b)` style prefix the model left on an option.
pub fn strip_option_prefix(raw: &str) -> String {
    let cleaned = OPTION_PREFIX.replace(raw, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        raw.to_string()
    } else {
        cleaned.to_string()
    }
}

fn label_for(index: usize) -> char {
    char::from_u32('A' as u32 + index as u32).unwrap_or('?')
}

/// Blank options are skipped; letters are handed out to what remains, in order.
pub fn display_options(options: &[String]) -> Vec<DisplayOption> {
    options
        .iter()
        .filter(|opt| !opt.trim().is_empty())
        .enumerate()
        .map(|(j, opt)| DisplayOption {
            label: label_for(j),
            text: strip_option_prefix(opt),
            raw: opt.clone(),
        })
        .collect()
}

pub fn option_mark(raw: &str, selected: Option<&str>, answer: &str, submitted: bool) -> OptionMark {
    let is_selected = selected == Some(raw);
    if submitted {
        if raw == answer && is_selected {
            OptionMark::Correct
        } else if is_selected {
            OptionMark::Incorrect
        } else if raw == answer {
            OptionMark::HighlightCorrect
        } else {
            OptionMark::None
        }
    } else if is_selected {
        OptionMark::Selected
    } else {
        OptionMark::None
    }
}

pub fn render_question(
    index: usize,
    question: &Question,
    selected: Option<&str>,
    submitted: bool,
) -> RenderedQuestion {
    let options = display_options(&question.options)
        .into_iter()
        .map(|opt| {
            let mark = option_mark(&opt.raw, selected, &question.correct_answer, submitted);
            (opt, mark)
        })
        .collect();

    let feedback = submitted.then(|| Feedback {
        selected: selected.map(str::to_string),
        correct: question.correct_answer.clone(),
        explanation: question
            .explanation
            .as_ref()
            .filter(|e| !e.trim().is_empty())
            .cloned(),
        is_correct: selected == Some(question.correct_answer.as_str()),
    });

    RenderedQuestion {
        number: index + 1,
        text: question.text.clone(),
        options,
        feedback,
    }
}

pub fn render_quiz(quiz: &QuizSnapshot) -> Vec<RenderedQuestion> {
    quiz.questions()
        .iter()
        .enumerate()
        .map(|(i, q)| render_question(i, q, quiz.answer(i), quiz.is_submitted()))
        .collect()
}
