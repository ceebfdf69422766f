/// Editorial preference weight per branch, highest priority first.
///
/// Keys are matched as substrings of the program name. Overlapping keys
/// ("Computer Science" inside "Computer Science (AI)") resolve to the longest
/// key contained in the name, so table order only breaks equal-length ties.
pub const BRANCH_PREFERENCES: &[(&str, f64)] = &[
    ("Computer Science", 10.0),
    ("Computer Science (AI)", 9.5),
    ("Computer Science (DS)", 9.0),
    ("Electronics & Communication", 8.0),
    ("Electronics and Communication", 8.0),
    ("Electrical Engineering", 7.5),
    ("Mechanical Engineering", 7.0),
    ("Aerospace Engineering", 6.5),
    ("Production Engineering", 6.0),
    ("Metallurgical Engineering", 5.5),
    ("Bio Engineering", 5.0),
    ("Civil Engineering", 4.5),
];

/// A branch key that matched a program name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchMatch {
    pub key: &'static str,
    pub weight: f64,
}

/// Find the most specific branch contained in `program`.
pub fn match_branch(program: &str) -> Option<BranchMatch> {
    let mut best: Option<BranchMatch> = None;

    for &(key, weight) in BRANCH_PREFERENCES {
        if !program.contains(key) {
            continue;
        }
        // Strictly longer only: earlier entries win ties
        if best.map_or(true, |b| key.len() > b.key.len()) {
            best = Some(BranchMatch { key, weight });
        }
    }

    best
}

/// Branch preference weight (0-10) for a program name; 0 when nothing matches.
pub fn branch_score(program: &str) -> f64 {
    match_branch(program).map_or(0.0, |m| m.weight)
}

/// Largest weight in the table, used to scale branch scores into 0-1.
pub fn max_branch_weight() -> f64 {
    BRANCH_PREFERENCES
        .iter()
        .map(|&(_, w)| w)
        .fold(0.0, f64::max)
}
