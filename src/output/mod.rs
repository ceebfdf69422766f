pub mod formatter;

pub use formatter::{
    format_currency, format_recommendation_detail, format_score, format_scored_table, format_tsv,
    score_percent, should_use_colors, to_response, ApiRecommendation,
};
