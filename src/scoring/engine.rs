use super::branch::{branch_score, max_branch_weight};
use super::preference::Preference;
use super::weights::{safe_denominator, ScoreWeights};
use crate::offerings::Offering;

/// Most matches a recommendation returns.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// An offering that passed the filters, with its score inputs.
#[derive(Debug, Clone)]
pub struct ScoredOffering<'a> {
    pub offering: &'a Offering,
    pub normalized_rank: f64, // 0-1 within the filtered set
    pub normalized_fee: f64,  // 0-1 within the filtered set
    pub branch_score: f64,    // 0-10
    pub score: f64,
}

/// Display subset of a scored offering.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendedOffering {
    pub institute: String,
    pub program: String,
    pub score: f64,
    pub average_package: f64,
    pub fee: f64,
    pub closing_rank: f64,
}

/// Counts describing one engine run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendDiagnostics {
    pub considered: usize,
    pub passed_filter: usize,
    /// Rows whose score could not be computed and were scored 0
    pub scoring_failures: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recommendation {
    pub matches: Vec<RecommendedOffering>,
    pub diagnostics: RecommendDiagnostics,
}

/// Whether an offering satisfies every filter of the preference.
///
/// Closing rank is the worst rank admitted, so an offering qualifies when its
/// closing rank is at least the student's rank on the selected track. Absent
/// numeric fields never satisfy a comparison.
pub fn passes_filter(offering: &Offering, pref: &Preference) -> bool {
    if offering.exam_type != pref.exam_type() {
        return false;
    }

    let rank_ok = offering
        .closing_rank
        .is_some_and(|r| r >= pref.rank() as f64);
    let fee_ok = offering.fee.is_some_and(|f| f <= pref.max_fee);
    let package_ok = offering
        .average_package
        .is_some_and(|p| p >= pref.min_salary);

    rank_ok && fee_ok && package_ok && offering.seat_category == pref.category
}

/// Request-relative denominators, taken over the finite values of the
/// filtered set only.
#[derive(Debug, Clone, Copy)]
struct Normalizers {
    rank: f64,
    fee: f64,
    package: f64,
    branch: f64,
}

impl Normalizers {
    fn over(rows: &[&Offering]) -> Self {
        let max_of = |field: fn(&Offering) -> Option<f64>| {
            rows.iter()
                .filter_map(|&o| field(o))
                .filter(|v| v.is_finite())
                .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        };

        Self {
            rank: safe_denominator(max_of(|o| o.closing_rank)),
            fee: safe_denominator(max_of(|o| o.fee)),
            package: safe_denominator(max_of(|o| o.average_package)),
            branch: safe_denominator(Some(max_branch_weight())),
        }
    }
}

/// Score one filtered row. None when a field is absent or the result is not
/// finite; the caller scores such rows 0.
fn score_row<'a>(offering: &'a Offering, norms: &Normalizers) -> Option<ScoredOffering<'a>> {
    let normalized_rank = offering.closing_rank? / norms.rank;
    let normalized_fee = offering.fee? / norms.fee;
    let package_ratio = offering.average_package? / norms.package;
    let branch = branch_score(&offering.program);

    let score = ScoreWeights::for_exam(offering.exam_type).combine(
        package_ratio,
        normalized_fee,
        normalized_rank,
        branch / norms.branch,
    );

    score.is_finite().then_some(ScoredOffering {
        offering,
        normalized_rank,
        normalized_fee,
        branch_score: branch,
        score,
    })
}

/// Filter, score and sort every qualifying offering, best first.
///
/// Ties keep table order.
pub fn score_offerings<'a>(
    offerings: &'a [Offering],
    pref: &Preference,
) -> (Vec<ScoredOffering<'a>>, RecommendDiagnostics) {
    let mut diagnostics = RecommendDiagnostics {
        considered: offerings.len(),
        ..Default::default()
    };

    let filtered: Vec<&Offering> = offerings
        .iter()
        .filter(|o| passes_filter(o, pref))
        .collect();
    diagnostics.passed_filter = filtered.len();

    if filtered.is_empty() {
        return (Vec::new(), diagnostics);
    }

    let norms = Normalizers::over(&filtered);

    let mut scored: Vec<ScoredOffering> = filtered
        .into_iter()
        .map(|offering| {
            score_row(offering, &norms).unwrap_or_else(|| {
                diagnostics.scoring_failures += 1;
                log::warn!(
                    "Could not score {} / {}, using 0",
                    offering.institute,
                    offering.program
                );
                ScoredOffering {
                    offering,
                    normalized_rank: 0.0,
                    normalized_fee: 0.0,
                    branch_score: 0.0,
                    score: 0.0,
                }
            })
        })
        .collect();

    // Stable sort: equal scores keep table order
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    (scored, diagnostics)
}

/// Recommend up to five offerings for a preference.
///
/// Pure function of its inputs: the table is only read, so concurrent calls
/// over the same snapshot are safe.
pub fn recommend(offerings: &[Offering], pref: &Preference) -> Recommendation {
    let (scored, diagnostics) = score_offerings(offerings, pref);

    let matches = scored
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|s| RecommendedOffering {
            institute: s.offering.institute.clone(),
            program: s.offering.program.clone(),
            score: s.score,
            average_package: s.offering.average_package.unwrap_or(0.0),
            fee: s.offering.fee.unwrap_or(0.0),
            closing_rank: s.offering.closing_rank.unwrap_or(0.0),
        })
        .collect();

    Recommendation {
        matches,
        diagnostics,
    }
}
