//! 可視化ごとのデータ変換
//!
//! 保持している `AnalysisResult` から、各ビューが必要とする形を読み出し時に導出する。
//! 結果はキャッシュしない（データ量はセッションあたり有限で、どの変換も O(n)）

use crate::format::{NEGATIVE_COLOR, NEUTRAL_COLOR, POSITIVE_COLOR};
use crate::types::{SentimentBreakdown, SuspiciousReview, Topic, WordCount};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// ワードクラウドに並べる最大語数
pub const MAX_CLOUD_WORDS: usize = 30;
/// ツールチップに出すキーワード数
pub const TOOLTIP_KEYWORDS: usize = 5;
/// 商品の頻出語として出す最大数
pub const MAX_KEY_TERMS: usize = 12;
/// 感情タブのレビュー表示件数
pub const SAMPLE_REVIEWS_PER_PAGE: usize = 5;

pub const POSITIVE_TOPIC_COLORS: [&str; 4] = ["#10b981", "#34d399", "#6ee7b7", "#a7f3d0"];
pub const NEGATIVE_TOPIC_COLORS: [&str; 4] = ["#ef4444", "#f87171", "#fca5a5", "#fecaca"];
/// 1〜5星の棒の色
pub const RATING_COLORS: [&str; 5] = ["#ef4444", "#f97316", "#eab308", "#84cc16", "#10b981"];

/// positive / negative の区別（配色の選択に使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn topic_palette(&self) -> &'static [&'static str] {
        match self {
            Polarity::Positive => &POSITIVE_TOPIC_COLORS,
            Polarity::Negative => &NEGATIVE_TOPIC_COLORS,
        }
    }
}

// =============================================
// ワードクラウド
// =============================================

/// 文字サイズ・不透明度の範囲
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordCloudStyle {
    pub min_font_px: f64,
    pub max_font_px: f64,
    pub min_opacity: f64,
    pub max_opacity: f64,
}

impl Default for WordCloudStyle {
    fn default() -> Self {
        Self {
            min_font_px: 12.0,
            max_font_px: 32.0,
            min_opacity: 0.4,
            max_opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloudWord {
    pub word: String,
    pub count: u64,
    pub font_px: f64,
    pub opacity: f64,
}

/// 出現回数に比例した文字サイズと不透明度を割り当てる
///
/// `ratio = count / max_count` を各範囲に線形写像する。
/// 空集合または全件0回のときは何も返さない
pub fn word_cloud(words: &[WordCount], style: &WordCloudStyle) -> Vec<CloudWord> {
    let max_count = words.iter().map(|w| w.count).max().unwrap_or(0);
    if max_count == 0 {
        return Vec::new();
    }

    words
        .iter()
        .take(MAX_CLOUD_WORDS)
        .map(|w| {
            let ratio = w.count as f64 / max_count as f64;
            CloudWord {
                word: w.word.clone(),
                count: w.count,
                font_px: style.min_font_px + ratio * (style.max_font_px - style.min_font_px),
                opacity: style.min_opacity + ratio * (style.max_opacity - style.min_opacity),
            }
        })
        .collect()
}

// =============================================
// トピック ツリーマップ
// =============================================

#[derive(Debug, Clone, PartialEq)]
pub struct TreemapNode {
    pub name: String,
    pub size: u64,
    pub fill: &'static str,
    pub keywords: Vec<String>,
}

impl TreemapNode {
    /// ツールチップ用の先頭キーワード
    pub fn tooltip(&self) -> String {
        self.keywords
            .iter()
            .take(TOOLTIP_KEYWORDS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// トピック一覧をツリーマップ用データにする
///
/// 色は入力順に配色を巡回して割り当てる
pub fn treemap(topics: &[Topic], polarity: Polarity) -> Vec<TreemapNode> {
    let palette = polarity.topic_palette();
    topics
        .iter()
        .enumerate()
        .map(|(i, t)| TreemapNode {
            name: t.name.clone(),
            size: t.count,
            fill: palette[i % palette.len()],
            keywords: t.keywords.clone(),
        })
        .collect()
}

// =============================================
// 評価分布
// =============================================

#[derive(Debug, Clone, PartialEq)]
pub struct RatingBin {
    pub rating: u8,
    pub label: String,
    pub count: u64,
    pub fill: &'static str,
}

/// 1〜5星の順で件数を並べる（欠けている評価は0件）
pub fn rating_bins(distribution: &BTreeMap<String, u64>) -> Vec<RatingBin> {
    (1u8..=5)
        .map(|rating| RatingBin {
            rating,
            label: format!("{} Star", rating),
            count: distribution.get(&rating.to_string()).copied().unwrap_or(0),
            fill: RATING_COLORS[usize::from(rating - 1)],
        })
        .collect()
}

// =============================================
// 感情内訳バー
// =============================================

#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownSegment {
    pub label: &'static str,
    pub count: u64,
    /// 0.0〜1.0
    pub share: f64,
    pub color: &'static str,
}

/// 内訳バーの区間（positive, neutral, negative の順）
///
/// 合計0件のときはバーを出さない
pub fn breakdown_bar(breakdown: &SentimentBreakdown) -> Option<Vec<BreakdownSegment>> {
    let total = breakdown.total();
    if total == 0 {
        return None;
    }

    let segment = |label, count: u64, color| BreakdownSegment {
        label,
        count,
        share: count as f64 / total as f64,
        color,
    };

    Some(vec![
        segment("Positive", breakdown.positive, POSITIVE_COLOR),
        segment("Neutral", breakdown.neutral, NEUTRAL_COLOR),
        segment("Negative", breakdown.negative, NEGATIVE_COLOR),
    ])
}

// =============================================
// ページング
// =============================================

#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 0始まり（範囲外の指定は最終ページに丸める）
    pub index: usize,
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.total_pages
    }
}

pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page);
    let index = page.min(total_pages.saturating_sub(1));
    let start = (index * per_page).min(items.len());
    let end = (start + per_page).min(items.len());

    Page {
        items: &items[start..end],
        index,
        total_pages,
    }
}

// =============================================
// 疑わしいレビューの並べ替え
// =============================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuspiciousSort {
    #[default]
    FakeScore,
    Rating,
}

/// 降順に並べる（同値は元の順を保つ）
pub fn rank_suspicious(reviews: &[SuspiciousReview], sort: SuspiciousSort) -> Vec<&SuspiciousReview> {
    let mut ranked: Vec<&SuspiciousReview> = reviews.iter().collect();
    ranked.sort_by(|a, b| match sort {
        SuspiciousSort::FakeScore => b.fake_score.partial_cmp(&a.fake_score).unwrap_or(Ordering::Equal),
        SuspiciousSort::Rating => b.rating.cmp(&a.rating),
    });
    ranked
}

/// 商品の頻出語（先頭 MAX_KEY_TERMS 件）
pub fn key_terms(terms: &[String]) -> &[String] {
    &terms[..terms.len().min(MAX_KEY_TERMS)]
}
