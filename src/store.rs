//! 権限ストア: ルート・メニュー・ページ・ボタンの表示権限を保持する。

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalogue::RouteCatalogue;
use crate::config::{MatchStrategy, ResolverOptions};
use crate::error::{ResolveError, Result};
use crate::matcher::filter_routes;
use crate::model::{PermissionRecord, RouteDescriptor};
use crate::reconciler::reconcile_by_id;
use crate::validate::validate_records;

/// UI 層 (ルーター・メニュー描画) に渡す権限状態
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionState {
    /// 有効な全ルート (常設ルート + 動的ルート)
    pub routes: Vec<RouteDescriptor>,
    /// 動的に追加されたルートのみ
    pub add_routes: Vec<RouteDescriptor>,
    /// 表示してよいボタンの識別キー
    pub btns: Vec<String>,
    #[serde(skip)]
    constant: Vec<RouteDescriptor>,
}

impl PermissionState {
    /// 初期状態: routes は常設ルートのみ
    pub fn new(catalogue: &RouteCatalogue) -> Self {
        PermissionState {
            routes: catalogue.constant.clone(),
            add_routes: Vec::new(),
            btns: Vec::new(),
            constant: catalogue.constant.clone(),
        }
    }

    pub fn with_routes(self, routes: Vec<RouteDescriptor>) -> Self {
        let mut all = self.constant.clone();
        all.extend(routes.iter().cloned());
        PermissionState {
            routes: all,
            add_routes: routes,
            ..self
        }
    }

    pub fn with_buttons(self, btns: Vec<String>) -> Self {
        PermissionState { btns, ..self }
    }
}

/// メニュー権限 (type 1, 2) とボタン権限 (type 3) に振り分ける。
/// どちらでもないレコードは捨てる。
pub fn split_records(records: &[PermissionRecord]) -> (Vec<PermissionRecord>, Vec<PermissionRecord>) {
    let menus = records.iter().filter(|r| r.kind.is_menu()).cloned().collect();
    let buttons = records.iter().filter(|r| r.kind.is_button()).cloned().collect();
    (menus, buttons)
}

/// type 3 のレコードからボタンの識別キーを入力順に取り出す
pub fn extract_buttons(records: &[PermissionRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.kind.is_button())
        .map(|r| match &r.value {
            Some(value) => value.clone(),
            None => {
                warn!(id = ?r.id, "button permission without value");
                String::new()
            }
        })
        .collect()
}

/// バックエンドの権限レコードから動的ルートとボタン権限を算出し、状態に反映する。
///
/// 戻り値は新しい状態と、動的ルート + 末尾ルートのリスト。
/// エラーの場合、呼び出し元の状態はそのまま残る。
pub fn generate_routes(
    state: &PermissionState,
    catalogue: &RouteCatalogue,
    records: &[PermissionRecord],
    options: &ResolverOptions,
) -> Result<(PermissionState, Vec<RouteDescriptor>)> {
    if options.strict {
        let issues = validate_records(records);
        if !issues.is_empty() {
            return Err(ResolveError::InvalidRecords(issues));
        }
    }

    let (menus, buttons) = split_records(records);
    let btns = extract_buttons(&buttons);

    let mut accessed = match options.strategy {
        MatchStrategy::Path => filter_routes(&catalogue.dynamic, &menus),
        MatchStrategy::Id => reconcile_by_id(&catalogue.dynamic, &menus, &options.reconcile),
    };
    accessed.extend(catalogue.end.iter().cloned());

    info!(
        strategy = ?options.strategy,
        menus = menus.len(),
        buttons = btns.len(),
        routes = accessed.len(),
        "generated routes"
    );

    let state = state.clone().with_routes(accessed.clone()).with_buttons(btns);
    Ok((state, accessed))
}
