/// Derived score column appended by the scorer and carried into exports.
pub const SCORE_COLUMN: &str = "Likelihood_to_Study_Abroad_Score";

/// Identifier and free-text columns removed during cleaning when present.
pub const DROPPED_COLUMNS: &[&str] = &[
    "Response ID",
    "You mentioned you now intend to study in a different country. Please outline the country you previously planned to study in",
    "You mentioned you now intend to study in a different country. Please outline the country you now planned to study in",
];

/// Raw cell texts read as missing values. Matched exactly, without trimming.
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(value: &str) -> bool {
    NA_TOKENS.iter().any(|&token| token == value)
}

/// Survey questions the tool reads. Declaration order is the reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SurveyField {
    Destination,
    Vaccine,
    StudyStatus,
    ChangeFactor,
    Vaccination,
    OnlineSentiment,
}

impl SurveyField {
    pub fn column(self) -> &'static str {
        match self {
            SurveyField::Destination => "What is your preferred study destination?",
            SurveyField::Vaccine => "If vaccinated what vaccine did you receive?",
            SurveyField::StudyStatus => "What is your current study status?",
            SurveyField::ChangeFactor => {
                "If you changed you study abroad plans as a result of COVID-19, what was the main contributing factor that influenced your decision"
            }
            SurveyField::Vaccination => "Have you been vaccinated?",
            SurveyField::OnlineSentiment => {
                "How do you feel about studying higher education online without travelling overseas?"
            }
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SurveyField::Destination => "destination",
            SurveyField::Vaccine => "vaccine",
            SurveyField::StudyStatus => "study_status",
            SurveyField::ChangeFactor => "change_factor",
            SurveyField::Vaccination => "vaccination",
            SurveyField::OnlineSentiment => "online_sentiment",
        }
    }

    pub fn ordinal(self) -> usize {
        self as usize
    }
}

pub fn question_order() -> &'static [SurveyField] {
    &[
        SurveyField::Destination,
        SurveyField::Vaccine,
        SurveyField::StudyStatus,
        SurveyField::ChangeFactor,
        SurveyField::Vaccination,
        SurveyField::OnlineSentiment,
    ]
}
