use std::fmt;

/// Entrance exam track an offering admits through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExamType {
    JeeAdvanced,
    JeeMains,
}

impl ExamType {
    /// Parse the `Type of Exam` cell. Returns None for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "JEE Advanced" => Some(ExamType::JeeAdvanced),
            "JEE Mains" => Some(ExamType::JeeMains),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExamType::JeeAdvanced => "JEE Advanced",
            ExamType::JeeMains => "JEE Mains",
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One institute/program/seat-type row of the offerings table.
#[derive(Debug, Clone, PartialEq)]
pub struct Offering {
    pub institute: String,
    pub program: String,          // may embed a branch name
    pub exam_type: ExamType,
    pub closing_rank: Option<f64>, // worst rank admitted
    pub fee: Option<f64>,
    pub average_package: Option<f64>,
    pub seat_category: String,    // "OPEN", category codes
}

/// Immutable snapshot of all offerings loaded from the data source.
#[derive(Debug, Clone, Default)]
pub struct OfferingTable {
    rows: Vec<Offering>,
}

impl OfferingTable {
    pub fn new(rows: Vec<Offering>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Offering] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse a possibly-dirty numeric cell. Empty, non-numeric and non-finite
/// values are absent.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
