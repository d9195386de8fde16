//! 解析サーバーとの入出力型定義
//!
//! サーバーのJSON (snake_case) をそのまま受ける:
//! - UploadInfo: アップロード / サンプル読み込みの応答
//! - SampleDataset: サンプルデータセットのカタログ項目
//! - AnalysisResult: 解析結果の全体（クライアントでは変更しない）
//! - PredictionResult: 評価予測の応答

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// 負の件数は0として読む（空のCSVでサーバーが -1 を返すことがある）
fn non_negative_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let count = i64::deserialize(deserializer)?;
    Ok(usize::try_from(count).unwrap_or(0))
}

/// アップロード / サンプル読み込みの応答
///
/// `file_id` が以降の解析で使うデータセット参照になる
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadInfo {
    pub file_id: String,
    pub filename: String,
    pub total_rows: usize,
    pub columns: Vec<String>,
    pub message: String,
}

/// サンプルデータセット
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleDataset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "non_negative_count")]
    pub review_count: usize,
}

/// 評価予測リクエスト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub text: String,
}

/// 評価予測の応答
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_rating: f64,
    pub sentiment: String,
    pub sentiment_score: f64,
    /// 0.0〜1.0
    pub confidence: f64,
}

/// 集計値
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overview {
    pub total_reviews: u64,
    pub avg_rating: f64,
    pub sentiment_score: f64,
    pub fake_review_percentage: f64,
}

/// 期間ごとの感情比率（%）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelinePoint {
    pub period: String,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub avg_sentiment: f64,
}

/// positive / negative に分かれた一覧
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Polarized<T> {
    pub positive: Vec<T>,
    pub negative: Vec<T>,
}

impl<T> Default for Polarized<T> {
    fn default() -> Self {
        Self {
            positive: Vec::new(),
            negative: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Topic {
    pub name: String,
    pub keywords: Vec<String>,
    pub count: u64,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Insight {
    pub text: String,
    pub count: u64,
    pub sentiment: String,
}

/// 好評点 / 不満点
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyInsights {
    pub praises: Vec<Insight>,
    pub complaints: Vec<Insight>,
}

/// 不正の疑いがあるレビュー
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuspiciousReview {
    pub index: usize,
    pub text: String,
    pub rating: u8,
    /// 0.0〜1.0
    pub fake_score: f64,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleReview {
    pub text: String,
    pub rating: u8,
    pub sentiment: String,
    pub sentiment_score: f64,
}

/// 感情ラベル別の件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentBreakdown {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

impl SentimentBreakdown {
    pub fn total(&self) -> u64 {
        self.positive + self.negative + self.neutral
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductMention {
    pub name: String,
    pub count: u64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryMention {
    pub category: String,
    pub mentions: u64,
}

/// 商品推定情報
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductInfo {
    pub product_ids: Vec<ProductMention>,
    pub detected_categories: Vec<CategoryMention>,
    pub key_terms: Vec<String>,
    pub key_phrases: Vec<String>,
}

/// AIによる要約
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiOverview {
    pub product_description: String,
    pub overall_summary: String,
    pub what_people_like: String,
    pub what_people_dislike: String,
    pub recommendation: String,
}

/// 解析結果
///
/// サーバー応答をそのまま保持する。表示用の値は `views` / `format` で読み出し時に導出する
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    pub overview: Overview,
    pub sentiment_timeline: Vec<TimelinePoint>,
    /// "1"〜"5" → 件数（欠けている評価は0扱い）
    pub rating_distribution: BTreeMap<String, u64>,
    pub topics: Polarized<Topic>,
    pub word_frequencies: Polarized<WordCount>,
    pub key_insights: KeyInsights,
    pub suspicious_reviews: Vec<SuspiciousReview>,
    pub sample_reviews: Vec<SampleReview>,
    pub sentiment_breakdown: SentimentBreakdown,
    pub product_info: Option<ProductInfo>,
    pub ai_overview: Option<AiOverview>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_result_sparse_payload() {
        let json = r#"{"overview": {"total_reviews": 12, "avg_rating": 3.5}}"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.overview.total_reviews, 12);
        assert!(result.topics.positive.is_empty());
        assert!(result.suspicious_reviews.is_empty());
        assert!(result.ai_overview.is_none());
        assert_eq!(result.sentiment_breakdown.total(), 0);
    }

    #[test]
    fn test_analysis_result_server_shape() {
        let json = r#"{
            "overview": {"total_reviews": 3, "avg_rating": 4.33, "sentiment_score": 0.41, "fake_review_percentage": 33.3},
            "sentiment_timeline": [{"period": "2024-01", "positive": 66.7, "negative": 33.3, "neutral": 0.0, "avg_sentiment": 0.2}],
            "rating_distribution": {"1": 1, "5": 2},
            "topics": {"positive": [{"name": "Battery", "keywords": ["battery", "life"], "count": 2, "weight": 0.4}], "negative": []},
            "word_frequencies": {"positive": [{"word": "great", "count": 2}], "negative": []},
            "key_insights": {"praises": [{"text": "long battery life", "count": 2, "sentiment": "positive"}], "complaints": []},
            "suspicious_reviews": [{"index": 2, "text": "Best product ever!!!", "rating": 5, "fake_score": 0.72, "reasons": ["Excessive punctuation"]}],
            "sample_reviews": [{"text": "Great battery", "rating": 5, "sentiment": "positive", "sentiment_score": 0.8}],
            "sentiment_breakdown": {"positive": 2, "negative": 1, "neutral": 0},
            "product_info": {"product_ids": [{"name": "B00X", "count": 3, "type": "product_id"}], "detected_categories": [{"category": "Headphones", "mentions": 2}], "key_terms": ["battery"], "key_phrases": []},
            "ai_overview": {"product_description": "Headphones", "overall_summary": "Mostly positive.", "what_people_like": "", "what_people_dislike": "", "recommendation": "Recommended"}
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.rating_distribution.get("5"), Some(&2));
        assert_eq!(result.topics.positive[0].keywords, vec!["battery", "life"]);
        assert_eq!(result.suspicious_reviews[0].reasons.len(), 1);
        assert_eq!(result.sentiment_breakdown.total(), 3);

        let product = result.product_info.unwrap();
        assert_eq!(product.product_ids[0].kind, "product_id");
        assert_eq!(product.detected_categories[0].mentions, 2);
    }

    #[test]
    fn test_sample_dataset_optional_fields() {
        let json = r#"[{"id": "electronics.csv", "name": "Electronics", "review_count": 500}]"#;
        let samples: Vec<SampleDataset> = serde_json::from_str(json).unwrap();
        assert_eq!(samples[0].review_count, 500);
        assert!(samples[0].description.is_empty());
    }

    #[test]
    fn test_sample_dataset_negative_count_is_zero() {
        let json = r#"[
            {"id": "empty.csv", "name": "Empty", "review_count": -1},
            {"id": "books.csv", "name": "Books", "review_count": 42}
        ]"#;
        let samples: Vec<SampleDataset> = serde_json::from_str(json).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].review_count, 0);
        assert_eq!(samples[1].review_count, 42);
    }
}
