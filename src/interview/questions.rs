//! Base question bank and numbered-question helpers

use crate::error::Result;
use std::collections::BTreeMap;
use std::path::Path;

/// Role key (words joined by `_`) to numbered questions
pub type QuestionBank = BTreeMap<String, Vec<String>>;

/// Questions used when no role key matches the position
pub const GENERIC_QUESTIONS: &[&str] = &[
    "1. Tell me about your professional experience.",
    "2. What achievement in your career are you most proud of?",
    "3. Why are you interested in this position?",
    "4. How do you keep your professional skills up to date?",
    "5. What are you looking for in your next team?",
];

/// Bank written to `general_questions.json` when none exists
pub fn default_question_bank() -> QuestionBank {
    let mut bank = QuestionBank::new();
    bank.insert(
        "Python_Dev".to_string(),
        to_strings(&[
            "1. Tell me about your experience with Python.",
            "2. Which Python frameworks have you used?",
            "3. Tell me about your most challenging project.",
            "4. How do you organize your code?",
            "5. Which testing tools have you used?",
        ]),
    );
    bank.insert(
        "Head_of_sales".to_string(),
        to_strings(&[
            "1. Tell me about your experience managing sales.",
            "2. Which methods of improving sales efficiency have you used?",
            "3. How do you motivate your team?",
            "4. Tell me about a successful project that increased sales.",
            "5. How do you work with key accounts?",
        ]),
    );
    bank.insert(
        "HR_Director".to_string(),
        to_strings(&[
            "1. Tell me about your experience in HR.",
            "2. Which staff assessment methods have you used?",
            "3. How do you organize onboarding of new employees?",
            "4. Tell me about a difficult HR project.",
            "5. How do you work with corporate culture?",
        ]),
    );
    bank
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn read_bank(path: &Path) -> Result<QuestionBank> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn write_bank(path: &Path, bank: &QuestionBank) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(bank)?)?;
    Ok(())
}

/// Load the bank from `path`; when missing or unreadable the default bank is
/// written there and returned
pub fn load_or_create(path: &Path) -> QuestionBank {
    match read_bank(path) {
        Ok(bank) if !bank.is_empty() => {
            log::info!("Loaded {} question sets from {}", bank.len(), path.display());
            bank
        }
        result => {
            if let Err(e) = result {
                log::warn!("Question bank {} unavailable: {}", path.display(), e);
            }
            let bank = default_question_bank();
            match write_bank(path, &bank) {
                Ok(()) => log::info!("Default question bank written to {}", path.display()),
                Err(e) => log::error!("Failed to write default question bank: {}", e),
            }
            bank
        }
    }
}

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pick the question set for `position`: an exact key match wins, otherwise
/// the key sharing the most words with the position; generic questions when
/// nothing overlaps
pub fn select_questions(position: &str, bank: &QuestionBank) -> Vec<String> {
    let position_words = words(position);

    if let Some(questions) = bank
        .iter()
        .find(|(key, _)| words(key) == position_words)
        .map(|(_, questions)| questions)
    {
        return questions.clone();
    }

    let mut best: Option<(&String, usize)> = None;
    for (key, _) in bank {
        let overlap = words(key).iter().filter(|w| position_words.contains(w)).count();
        if overlap > 0 && best.is_none_or(|(_, score)| overlap > score) {
            best = Some((key, overlap));
        }
    }

    match best.and_then(|(key, _)| bank.get(key)) {
        Some(questions) => {
            log::info!("Selected question set for position '{}'", position);
            questions.clone()
        }
        None => {
            log::info!("No question set matches '{}', using generic questions", position);
            to_strings(GENERIC_QUESTIONS)
        }
    }
}

/// Length of a leading `N.` marker, if any
fn number_prefix_len(text: &str) -> Option<usize> {
    let digits = text.chars().take_while(|c| c.is_ascii_digit()).count();
    (digits > 0 && text[digits..].starts_with('.')).then_some(digits + 1)
}

/// Whether `line` starts with `N.`
pub fn has_question_number(line: &str) -> bool {
    number_prefix_len(line.trim_start()).is_some()
}

/// Drop a leading `N.` so numbering is not read aloud
pub fn strip_question_number(text: &str) -> String {
    let trimmed = text.trim_start();
    match number_prefix_len(trimmed) {
        Some(len) => trimmed[len..].trim().to_string(),
        None => trimmed.trim_end().to_string(),
    }
}

/// Keep only the lines of `text` that start with `N.`
pub fn parse_numbered_questions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| has_question_number(line))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_exact_key_wins() {
        let bank = default_question_bank();
        let questions = select_questions("Head of Sales", &bank);
        assert!(questions[0].contains("managing sales"));
    }

    #[test]
    fn test_overlap_selection() {
        let bank = default_question_bank();
        let questions = select_questions("Senior Python developer", &bank);
        assert!(questions[0].contains("Python"));

        let questions = select_questions("HR business partner", &bank);
        assert!(questions[0].contains("HR"));
    }

    #[test]
    fn test_generic_fallback() {
        let bank = default_question_bank();
        let questions = select_questions("Welder", &bank);
        assert_eq!(questions.len(), GENERIC_QUESTIONS.len());
        assert_eq!(select_questions("", &QuestionBank::new()).len(), GENERIC_QUESTIONS.len());
    }

    #[test]
    fn test_numbered_helpers() {
        assert!(has_question_number("3. Why?"));
        assert!(has_question_number("  10.Why?"));
        assert!(!has_question_number("Why 3. ?"));
        assert!(!has_question_number("- bullet"));

        assert_eq!(strip_question_number("1. Tell me about yourself."), "Tell me about yourself.");
        assert_eq!(strip_question_number("No number 3. here"), "No number 3. here");

        let text = "Here are the questions:\n1. First?\n\n2. Second?\nThanks";
        assert_eq!(parse_numbered_questions(text), vec!["1. First?", "2. Second?"]);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("general_questions.json");

        let bank = load_or_create(&path);
        assert_eq!(bank.len(), 3);
        assert!(path.exists());

        std::fs::write(&path, r#"{"QA_Engineer": ["1. How do you write test plans?"]}"#).unwrap();
        let bank = load_or_create(&path);
        assert_eq!(bank.len(), 1);
        assert_eq!(select_questions("QA engineer", &bank), vec!["1. How do you write test plans?"]);
    }

    #[test]
    fn test_corrupt_bank_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("general_questions.json");
        std::fs::write(&path, "{ broken").unwrap();

        let bank = load_or_create(&path);
        assert!(bank.contains_key("Python_Dev"));
        let reread: QuestionBank = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reread, bank);
    }
}
