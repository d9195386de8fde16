//! 表示用フォーマッタ
//!
//! 解析結果の値を画面に出す文字列・色へ変換する純粋関数

use crate::types::Overview;

pub const POSITIVE_COLOR: &str = "#10b981";
pub const NEGATIVE_COLOR: &str = "#ef4444";
pub const NEUTRAL_COLOR: &str = "#6b7280";

const FILLED_STAR: char = '\u{2605}';
const EMPTY_STAR: char = '\u{2606}';
const MAX_STARS: usize = 5;

/// 不正スコアがこれを超えると高リスク表示
pub const HIGH_RISK_FAKE_SCORE: f64 = 0.6;

/// 感情ラベル
///
/// サーバーが未知のラベルを返しても Neutral に落とす
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn from_label(label: &str) -> Self {
        match label {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Sentiment::Positive => POSITIVE_COLOR,
            Sentiment::Negative => NEGATIVE_COLOR,
            Sentiment::Neutral => NEUTRAL_COLOR,
        }
    }
}

/// 件数を短縮表記にする（1234 → "1.2K", 2500000 → "2.5M"）
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// 星表示（3.6 → "★★★★☆"）
pub fn rating_stars(rating: f64) -> String {
    // 負数・NaN は 0 に飽和する
    let filled = (rating.round() as usize).min(MAX_STARS);
    let mut stars = String::with_capacity(MAX_STARS * 3);
    stars.extend(std::iter::repeat(FILLED_STAR).take(filled));
    stars.extend(std::iter::repeat(EMPTY_STAR).take(MAX_STARS - filled));
    stars
}

/// 感情ラベルの表示色
pub fn sentiment_color(sentiment: &str) -> &'static str {
    Sentiment::from_label(sentiment).color()
}

/// 文字数で切り詰める
///
/// `max_chars` 以下ならそのまま、超える場合は先頭 `max_chars` 文字に "..." を付ける
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// 平均評価（4.2 → "4.20 / 5"）
pub fn format_avg_rating(avg: f64) -> String {
    format!("{:.2} / 5", avg)
}

/// 感情スコア（正なら + 付き、小数3桁）
pub fn format_sentiment_score(score: f64) -> String {
    let sign = if score > 0.0 { "+" } else { "" };
    format!("{}{:.3}", sign, score)
}

/// 百分率（小数1桁）
pub fn format_percentage(pct: f64) -> String {
    format!("{:.1}%", pct)
}

/// 0〜1 の比率を整数パーセントに（0.873 → "87%"）
pub fn format_ratio_percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

pub fn is_high_risk(fake_score: f64) -> bool {
    fake_score > HIGH_RISK_FAKE_SCORE
}

/// 概要カード
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewCard {
    pub label: &'static str,
    pub value: String,
}

pub fn overview_cards(overview: &Overview) -> Vec<OverviewCard> {
    vec![
        OverviewCard {
            label: "Total Reviews",
            value: format_number(overview.total_reviews),
        },
        OverviewCard {
            label: "Avg Rating",
            value: format_avg_rating(overview.avg_rating),
        },
        OverviewCard {
            label: "Sentiment Score",
            value: format_sentiment_score(overview.sentiment_score),
        },
        OverviewCard {
            label: "Suspicious Reviews",
            value: format_percentage(overview.fake_review_percentage),
        },
    ]
}
