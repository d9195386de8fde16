//! ターミナル版ダッシュボード
//!
//! 解析結果は読むだけ。表示用の値は描画のたびに common の変換関数で作る。
//! ここで持つ状態はタブ・展開行・並び順・ページだけ

use review_intel_common::format::{
    format_ratio_percent, format_sentiment_score, is_high_risk, overview_cards, rating_stars,
    sentiment_color, truncate,
};
use review_intel_common::types::{Insight, TimelinePoint};
use review_intel_common::views::{
    breakdown_bar, key_terms, paginate, rank_suspicious, rating_bins, treemap, word_cloud,
    Polarity, SuspiciousSort, WordCloudStyle, SAMPLE_REVIEWS_PER_PAGE,
};
use review_intel_common::{AnalysisResult, SampleDataset, WordCount};

use crate::predictor::{PredictorDisplay, PredictorView};
use crate::session::SessionState;

/// 疑わしいレビューの折りたたみ時の文字数
pub const SUSPICIOUS_PREVIEW_CHARS: usize = 120;
const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Insights,
    Suspicious,
    Sentiment,
    Predict,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Insights, Tab::Suspicious, Tab::Sentiment, Tab::Predict];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Insights => "Key Insights",
            Tab::Suspicious => "Suspicious Reviews",
            Tab::Sentiment => "Sentiment Analysis",
            Tab::Predict => "Predict Rating",
        }
    }
}

/// ダッシュボードの表示状態
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub tab: Tab,
    pub sort: SuspiciousSort,
    /// 展開中の疑わしいレビュー（`SuspiciousReview::index`）
    pub expanded: Option<usize>,
    /// サンプルレビューのページ（0始まり）
    pub page: usize,
}

impl DashboardView {
    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn set_sort(&mut self, sort: SuspiciousSort) {
        self.sort = sort;
    }

    /// 同じ行をもう一度選ぶと閉じる
    pub fn toggle_expanded(&mut self, review_index: usize) {
        self.expanded = match self.expanded {
            Some(current) if current == review_index => None,
            _ => Some(review_index),
        };
    }

    pub fn next_page(&mut self, result: &AnalysisResult) {
        let page = paginate(&result.sample_reviews, self.page, SAMPLE_REVIEWS_PER_PAGE);
        if page.has_next() {
            self.page = page.index + 1;
        } else {
            self.page = page.index;
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// 概要・グラフ・選択中タブをまとめて描画する
    pub fn render(&self, result: &AnalysisResult, prediction: Option<&PredictorView>) -> String {
        join_sections(vec![
            render_overview(result),
            render_charts(result),
            render_tab_bar(self.tab),
            self.render_tab(result, prediction),
        ])
    }

    /// 選択中タブの中身だけを描画する
    pub fn render_tab(&self, result: &AnalysisResult, prediction: Option<&PredictorView>) -> String {
        match self.tab {
            Tab::Insights => render_insights(result),
            Tab::Suspicious => render_suspicious(result, self.sort, self.expanded),
            Tab::Sentiment => render_sentiment(result, self.page),
            Tab::Predict => match prediction {
                Some(view) => render_prediction(view),
                None => render_prediction(&PredictorView::default()),
            },
        }
    }
}

fn join_sections(sections: Vec<String>) -> String {
    sections
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let filled = ((value as f64 / max as f64) * width as f64).round() as usize;
    "█".repeat(filled.min(width))
}

fn heading(title: &str) -> String {
    format!("== {} ==", title)
}

// =============================================
// セッション・サンプル一覧
// =============================================

pub fn render_session_status(state: &SessionState) -> String {
    match state {
        SessionState::Idle => "No dataset loaded".to_string(),
        SessionState::Loading { source, dataset } => match dataset {
            Some(dataset) => format!(
                "Analyzing {} ({} rows)...",
                dataset.file_name, dataset.total_rows
            ),
            None => format!("Loading {}...", source.label()),
        },
        SessionState::Analyzed { dataset, result } => format!(
            "{}: {} reviews analyzed",
            dataset.file_name, result.overview.total_reviews
        ),
        SessionState::Error { message } => format!("Error: {}", message),
    }
}

/// サンプルデータセット一覧（空なら何も出さない）
pub fn render_samples(samples: &[SampleDataset]) -> String {
    if samples.is_empty() {
        return String::new();
    }

    let mut lines = vec![heading("Sample Datasets")];
    for sample in samples {
        lines.push(format!(
            "  [{}] {} ({} reviews)",
            sample.id, sample.name, sample.review_count
        ));
        if !sample.description.is_empty() {
            lines.push(format!("      {}", sample.description));
        }
    }
    lines.join("\n")
}

// =============================================
// 概要・AI要約
// =============================================

pub fn render_overview(result: &AnalysisResult) -> String {
    let mut lines = vec![heading("Overview")];
    for card in overview_cards(&result.overview) {
        lines.push(format!("  {:<20} {}", card.label, card.value));
    }

    if let Some(ai) = &result.ai_overview {
        lines.push(String::new());
        lines.push(heading("AI Overview"));
        for (label, text) in [
            ("Product", &ai.product_description),
            ("Summary", &ai.overall_summary),
            ("Likes", &ai.what_people_like),
            ("Dislikes", &ai.what_people_dislike),
            ("Verdict", &ai.recommendation),
        ] {
            if !text.is_empty() {
                lines.push(format!("  {}: {}", label, text));
            }
        }
    }

    if let Some(info) = &result.product_info {
        let terms = key_terms(&info.key_terms);
        if !terms.is_empty() {
            lines.push(format!("  Key terms: {}", terms.join(", ")));
        }
        if !info.detected_categories.is_empty() {
            let categories: Vec<String> = info
                .detected_categories
                .iter()
                .map(|c| format!("{} ({})", c.category, c.mentions))
                .collect();
            lines.push(format!("  Categories: {}", categories.join(", ")));
        }
    }

    lines.join("\n")
}

// =============================================
// グラフ
// =============================================

pub fn render_charts(result: &AnalysisResult) -> String {
    join_sections(vec![
        render_timeline(&result.sentiment_timeline),
        render_rating_distribution(result),
        render_topics(result),
        render_word_clouds(result),
    ])
}

fn render_timeline(timeline: &[TimelinePoint]) -> String {
    if timeline.is_empty() {
        return String::new();
    }

    let mut lines = vec![heading("Sentiment Over Time")];
    for point in timeline {
        lines.push(format!(
            "  {:<10} +{:<5} ={:<5} -{:<5} avg {}",
            point.period,
            point.positive,
            point.neutral,
            point.negative,
            format_sentiment_score(point.avg_sentiment)
        ));
    }
    lines.join("\n")
}

fn render_rating_distribution(result: &AnalysisResult) -> String {
    let bins = rating_bins(&result.rating_distribution);
    let max = bins.iter().map(|b| b.count).max().unwrap_or(0);

    let mut lines = vec![heading("Rating Distribution")];
    for bin in &bins {
        lines.push(format!(
            "  {:<7} {:<width$} {}",
            bin.label,
            bar(bin.count, max, BAR_WIDTH),
            bin.count,
            width = BAR_WIDTH
        ));
    }
    lines.join("\n")
}

fn render_topics(result: &AnalysisResult) -> String {
    let mut lines = Vec::new();
    for (title, topics, polarity) in [
        ("Positive Topics", &result.topics.positive, Polarity::Positive),
        ("Negative Topics", &result.topics.negative, Polarity::Negative),
    ] {
        let nodes = treemap(topics, polarity);
        if nodes.is_empty() {
            continue;
        }
        lines.push(heading(title));
        for node in nodes {
            lines.push(format!("  {} ({}) {} - {}", node.name, node.size, node.fill, node.tooltip()));
        }
    }
    lines.join("\n")
}

fn render_word_cloud(title: &str, words: &[WordCount]) -> String {
    let cloud = word_cloud(words, &WordCloudStyle::default());
    if cloud.is_empty() {
        return String::new();
    }

    let rendered: Vec<String> = cloud
        .iter()
        .map(|w| format!("{}[{:.0}px]", w.word, w.font_px))
        .collect();
    format!("{}\n  {}", heading(title), rendered.join(" "))
}

fn render_word_clouds(result: &AnalysisResult) -> String {
    join_sections(vec![
        render_word_cloud("Positive Words", &result.word_frequencies.positive),
        render_word_cloud("Negative Words", &result.word_frequencies.negative),
    ])
}

// =============================================
// タブ
// =============================================

fn render_tab_bar(active: Tab) -> String {
    Tab::ALL
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab.label())
            } else {
                format!(" {} ", tab.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn render_insight_list(title: &str, insights: &[Insight]) -> Vec<String> {
    let mut lines = vec![format!("{}:", title)];
    if insights.is_empty() {
        lines.push("  (none)".to_string());
    }
    for insight in insights {
        lines.push(format!("  - {} (x{})", insight.text, insight.count));
    }
    lines
}

pub fn render_insights(result: &AnalysisResult) -> String {
    let mut lines = vec![heading(Tab::Insights.label())];
    lines.extend(render_insight_list("What customers love", &result.key_insights.praises));
    lines.extend(render_insight_list("Common complaints", &result.key_insights.complaints));
    lines.join("\n")
}

pub fn render_suspicious(
    result: &AnalysisResult,
    sort: SuspiciousSort,
    expanded: Option<usize>,
) -> String {
    let mut lines = vec![heading(Tab::Suspicious.label())];
    if result.suspicious_reviews.is_empty() {
        lines.push("No suspicious reviews detected".to_string());
        return lines.join("\n");
    }

    lines.push(format!(
        "{} suspicious reviews found (sorted by {})",
        result.suspicious_reviews.len(),
        match sort {
            SuspiciousSort::FakeScore => "fake score",
            SuspiciousSort::Rating => "rating",
        }
    ));

    for review in rank_suspicious(&result.suspicious_reviews, sort) {
        let risk = if is_high_risk(review.fake_score) { "HIGH" } else { "mid" };
        lines.push(format!(
            "  #{} {} fake {} ({})",
            review.index,
            rating_stars(f64::from(review.rating)),
            format_ratio_percent(review.fake_score),
            risk
        ));
        let text = if expanded == Some(review.index) {
            review.text.clone()
        } else {
            truncate(&review.text, SUSPICIOUS_PREVIEW_CHARS)
        };
        lines.push(format!("     {}", text));
        if !review.reasons.is_empty() {
            lines.push(format!("     reasons: {}", review.reasons.join(", ")));
        }
    }
    lines.join("\n")
}

pub fn render_sentiment(result: &AnalysisResult, page: usize) -> String {
    let mut lines = vec![heading(Tab::Sentiment.label())];

    if let Some(segments) = breakdown_bar(&result.sentiment_breakdown) {
        let bar: String = segments
            .iter()
            .zip(["█", "▒", "░"])
            .map(|(s, fill)| fill.repeat((s.share * BAR_WIDTH as f64).round() as usize))
            .collect();
        lines.push(format!("  {}", bar));
        let legend: Vec<String> = segments
            .iter()
            .map(|s| format!("{}: {}", s.label, s.count))
            .collect();
        lines.push(format!("  {}", legend.join("  ")));
    }

    if result.sample_reviews.is_empty() {
        return lines.join("\n");
    }

    let page = paginate(&result.sample_reviews, page, SAMPLE_REVIEWS_PER_PAGE);
    for review in page.items {
        lines.push(format!(
            "  {} {} {} score {}",
            review.sentiment,
            sentiment_color(&review.sentiment),
            rating_stars(f64::from(review.rating)),
            review.sentiment_score
        ));
        lines.push(format!("     {}", review.text));
    }
    if page.total_pages > 1 {
        lines.push(format!(
            "  {} {} / {} {}",
            if page.has_prev() { "< Prev" } else { "      " },
            page.index + 1,
            page.total_pages,
            if page.has_next() { "Next >" } else { "" }
        ));
    }
    lines.join("\n")
}

pub fn render_prediction(view: &PredictorView) -> String {
    match view.display() {
        PredictorDisplay::Empty => "Type at least 10 characters to predict a rating".to_string(),
        PredictorDisplay::Predicting => "Predicting...".to_string(),
        PredictorDisplay::Ready(result) => format!(
            "Predicted rating: {} ({:.1})\nSentiment: {} ({})\nConfidence: {}",
            rating_stars(result.predicted_rating),
            result.predicted_rating,
            result.sentiment,
            format_sentiment_score(result.sentiment_score),
            format_ratio_percent(result.confidence)
        ),
    }
}
