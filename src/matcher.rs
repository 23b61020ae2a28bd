use std::collections::HashSet;

use tracing::debug;

use crate::model::{PermissionRecord, RouteDescriptor};

/// 前端で定義した動的ルート表を、バックエンドが返した権限レコードで絞り込む。
///
/// ノードは次のどちらかを満たす場合に残る:
/// - path がいずれかのレコードの address と完全一致する (大文字小文字を区別)
/// - 絞り込み後の子ルートが 1 つ以上残っている
///
/// カタログの構造と順序は保たれ、入力は変更しない。
pub fn filter_routes(
    catalogue: &[RouteDescriptor],
    records: &[PermissionRecord],
) -> Vec<RouteDescriptor> {
    // address を持たないレコードはどのルートにも一致しない
    let addresses: HashSet<&str> = records.iter().filter_map(PermissionRecord::address).collect();
    if addresses.is_empty() {
        debug!(records = records.len(), "no permission addresses, nothing matched");
        return Vec::new();
    }

    let matched = filter_with(catalogue, &addresses);
    debug!(
        catalogue = catalogue.len(),
        addresses = addresses.len(),
        matched = matched.len(),
        "filtered dynamic routes"
    );
    matched
}

fn filter_with(routes: &[RouteDescriptor], addresses: &HashSet<&str>) -> Vec<RouteDescriptor> {
    routes
        .iter()
        .filter_map(|route| {
            let children = filter_with(&route.children, addresses);
            if addresses.contains(route.path.as_str()) || !children.is_empty() {
                Some(RouteDescriptor {
                    children,
                    ..route.clone_without_children()
                })
            } else {
                None
            }
        })
        .collect()
}
