use crate::offerings::ExamType;

/// Linear weights of the score formula for one exam track.
///
/// `score = package * pkg_ratio + fee * (1 - norm_fee) + rank * (1 - norm_rank)
///          + base + branch * branch_ratio`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub package: f64,
    pub fee: f64,
    pub rank: f64,
    pub base: f64,
    pub branch: f64,
}

impl ScoreWeights {
    pub const JEE_ADVANCED: ScoreWeights = ScoreWeights {
        package: 0.20,
        fee: 0.25,
        rank: 0.40,
        base: 0.0,
        branch: 0.15,
    };

    pub const JEE_MAINS: ScoreWeights = ScoreWeights {
        package: 0.25,
        fee: 0.20,
        rank: 0.35,
        base: 0.20,
        branch: 0.10,
    };

    pub fn for_exam(exam: ExamType) -> Self {
        match exam {
            ExamType::JeeAdvanced => Self::JEE_ADVANCED,
            ExamType::JeeMains => Self::JEE_MAINS,
        }
    }

    /// Combine the per-row ratios into a score. Inputs are expected in 0-1
    /// but are not clamped. The Mains weights sum to 1.10, so a Mains score
    /// can exceed 1.
    pub fn combine(
        &self,
        package_ratio: f64,
        normalized_fee: f64,
        normalized_rank: f64,
        branch_ratio: f64,
    ) -> f64 {
        self.package * package_ratio
            + self.fee * (1.0 - normalized_fee)
            + self.rank * (1.0 - normalized_rank)
            + self.base
            + self.branch * branch_ratio
    }
}

/// Denominator for request-relative normalization.
///
/// A max that is absent, zero, negative or non-finite falls back to 1. This
/// avoids division by zero; it is an approximation, not a normalization.
pub fn safe_denominator(max: Option<f64>) -> f64 {
    match max {
        Some(m) if m.is_finite() && m > 0.0 => m,
        _ => 1.0,
    }
}
