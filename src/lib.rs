//! 商品レビュー解析ダッシュボードのクライアント
//!
//! 解析セッションの制御（`session`）、評価予測（`predictor`）、
//! 解析サーバーとの境界（`client`）とターミナル描画（`dashboard`）

pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod predictor;
pub mod session;
