//! Review Intel Common Library
//!
//! 解析サーバーとの入出力型と、ダッシュボード表示用の純粋な変換

pub mod error;
pub mod format;
pub mod parser;
pub mod types;
pub mod views;

pub use error::{Error, Result};
pub use format::{
    format_number, format_ratio_percent, overview_cards, rating_stars, sentiment_color, truncate,
    OverviewCard, Sentiment,
};
pub use parser::{extract_detail, extract_json, parse_response};
pub use types::{
    AiOverview, AnalysisResult, Overview, PredictionRequest, PredictionResult, ProductInfo,
    SampleDataset, SampleReview, SentimentBreakdown, SuspiciousReview, Topic, UploadInfo,
    WordCount,
};
pub use views::{
    breakdown_bar, paginate, rank_suspicious, rating_bins, treemap, word_cloud, Page, Polarity,
    SuspiciousSort, WordCloudStyle,
};
