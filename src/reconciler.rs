use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::ReconcileOptions;
use crate::model::{PermissionRecord, RouteDescriptor};
use crate::tree::build_tree;

/// id でカタログのノードを探す (深さ優先・先行順)。
///
/// 同じ id が複数ある場合は最初に見つかったノードを返す。
pub fn find_by_id<'a>(routes: &'a [RouteDescriptor], id: &str) -> Option<&'a RouteDescriptor> {
    for route in routes {
        if route.id.as_deref() == Some(id) {
            return Some(route);
        }
        if let Some(found) = find_by_id(&route.children, id) {
            return Some(found);
        }
    }
    None
}

/// 権限レコード側を正とする突き合わせ。
///
/// レコードごとに同じ id のカタログノードを探し、order / parentId / path / title を
/// レコードの値で上書きする。対応するノードがないレコードは捨てる。
/// 一致したノードの元の子ルートは捨て、レコードの id / parentId で木を組み直す。
pub fn reconcile_by_id(
    catalogue: &[RouteDescriptor],
    records: &[PermissionRecord],
    options: &ReconcileOptions,
) -> Vec<RouteDescriptor> {
    warn_duplicate_ids(catalogue);

    let mut matched: Vec<RouteDescriptor> = records
        .iter()
        .filter_map(|record| {
            let id = record.id.as_deref()?;
            let Some(node) = find_by_id(catalogue, id) else {
                debug!(id, "permission record has no catalogue route, dropped");
                return None;
            };
            Some(overwrite(node.clone_without_children(), record))
        })
        .collect();

    if options.sort_by_order {
        // order 未設定のものは末尾へ (安定ソート)
        matched.sort_by_key(|route| (route.order.is_none(), route.order));
    }

    debug!(
        records = records.len(),
        matched = matched.len(),
        "reconciled permission records by id"
    );
    build_tree(matched, &options.top_parent)
}

fn overwrite(mut route: RouteDescriptor, record: &PermissionRecord) -> RouteDescriptor {
    route.order = record.order;
    route.parent_id = record.parent_id.clone();
    if let Some(address) = &record.address {
        route.path = address.clone();
    }
    if let Some(name) = &record.name {
        route.meta.title = Some(name.clone());
    }
    route
}

fn warn_duplicate_ids(catalogue: &[RouteDescriptor]) {
    fn walk<'a>(routes: &'a [RouteDescriptor], seen: &mut HashSet<&'a str>) {
        for route in routes {
            if let Some(id) = route.id.as_deref()
                && !seen.insert(id)
            {
                warn!(id, path = %route.path, "duplicate route id in catalogue, first match wins");
            }
            walk(&route.children, seen);
        }
    }

    walk(catalogue, &mut HashSet::new());
}
