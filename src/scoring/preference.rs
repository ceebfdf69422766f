use crate::offerings::ExamType;

pub const DEFAULT_CATEGORY: &str = "OPEN";

/// A student's constraints for one recommendation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Preference {
    /// Filter on the JEE Advanced track (IITs) instead of JEE Mains
    pub prefer_iit: bool,

    pub jee_advanced_rank: u64,

    pub jee_mains_rank: u64,

    /// Upper bound on fee; unbounded by default
    pub max_fee: f64,

    pub min_salary: f64,

    /// Seat category, matched exactly against the offering's seat type
    pub category: String,
}

fn default_max_fee() -> f64 {
    f64::INFINITY
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Preference {
    /// Preference with default budget, salary and category.
    pub fn new(prefer_iit: bool, jee_advanced_rank: u64, jee_mains_rank: u64) -> Self {
        Self {
            prefer_iit,
            jee_advanced_rank,
            jee_mains_rank,
            max_fee: default_max_fee(),
            min_salary: 0.0,
            category: default_category(),
        }
    }

    /// Exam track this preference filters on.
    pub fn exam_type(&self) -> ExamType {
        if self.prefer_iit {
            ExamType::JeeAdvanced
        } else {
            ExamType::JeeMains
        }
    }

    /// The student's rank on the selected track.
    pub fn rank(&self) -> u64 {
        if self.prefer_iit {
            self.jee_advanced_rank
        } else {
            self.jee_mains_rank
        }
    }
}
