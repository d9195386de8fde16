use clap::{Parser, Subcommand, ValueEnum};
use review_intel_common::SuspiciousSort;
use std::path::PathBuf;

use crate::dashboard::Tab;

#[derive(Parser)]
#[command(name = "review-intel")]
#[command(about = "商品レビュー解析ダッシュボード", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 解析サーバーのURL（設定ファイルより優先）
    #[arg(long, global = true)]
    pub server: Option<String>,
}

/// ダッシュボードの表示オプション
#[derive(clap::Args, Clone, Debug)]
pub struct DashboardArgs {
    /// 表示するタブ
    #[arg(long, value_enum, default_value = "all")]
    pub tab: TabArg,

    /// 疑わしいレビューの並び順
    #[arg(long, value_enum, default_value = "fake-score")]
    pub sort: SortArg,

    /// サンプルレビューのページ（1始まり）
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// 展開表示する疑わしいレビューの番号
    #[arg(long)]
    pub expand: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// CSVファイルをアップロードして解析
    Analyze {
        /// レビューCSVファイル
        #[arg(required = true)]
        file: PathBuf,

        #[command(flatten)]
        view: DashboardArgs,
    },

    /// サンプルデータセットの一覧表示/読み込み
    Samples {
        /// 読み込んで解析するサンプルID
        #[arg(long)]
        load: Option<String>,

        #[command(flatten)]
        view: DashboardArgs,
    },

    /// 解析後、入力中のレビューから評価を予測（標準入力の各行を入力とみなす）
    Predict {
        /// 先に解析するCSVファイル
        #[arg(long, conflicts_with = "sample", required_unless_present = "sample")]
        file: Option<PathBuf>,

        /// 先に解析するサンプルID
        #[arg(long)]
        sample: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// 解析サーバーのURLを設定
        #[arg(long)]
        set_server: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// テーマ（ライト/ダーク）を表示/切り替え
    Theme {
        /// 切り替えて保存
        #[arg(long)]
        toggle: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum TabArg {
    Insights,
    Suspicious,
    Sentiment,
    #[default]
    All,
}

impl TabArg {
    /// 描画するタブ
    pub fn tabs(&self) -> Vec<Tab> {
        match self {
            TabArg::Insights => vec![Tab::Insights],
            TabArg::Suspicious => vec![Tab::Suspicious],
            TabArg::Sentiment => vec![Tab::Sentiment],
            TabArg::All => vec![Tab::Insights, Tab::Suspicious, Tab::Sentiment],
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    #[default]
    FakeScore,
    Rating,
}

impl From<SortArg> for SuspiciousSort {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::FakeScore => SuspiciousSort::FakeScore,
            SortArg::Rating => SuspiciousSort::Rating,
        }
    }
}
