use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// 最上位ノードを表す親 id の既定値
pub const DEFAULT_TOP_PARENT: &str = "qyai";

/// 動的ルートと権限レコードの突き合わせ方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// path と address の完全一致 (カタログの構造を保つ)
    #[default]
    Path,
    /// id の一致 (レコード側の親子関係で木を組み直す)
    Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOptions {
    /// この値を親 id に持つノードを最上位とみなす
    pub top_parent: String,
    /// order による並べ替え (既定は無効)
    pub sort_by_order: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        ReconcileOptions {
            top_parent: DEFAULT_TOP_PARENT.to_string(),
            sort_by_order: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOptions {
    pub strategy: MatchStrategy,
    pub reconcile: ReconcileOptions,
    /// 不備のある権限レコードを黙って捨てずにエラーにする
    pub strict: bool,
}
