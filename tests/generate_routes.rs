use rstest::rstest;
use serde_json::json;

use route_permission_resolver::matcher::filter_routes;
use route_permission_resolver::store::extract_buttons;
use route_permission_resolver::tree::build_tree;
use route_permission_resolver::{
    MatchStrategy, PermissionKind, PermissionRecord, PermissionState, ResolverOptions, RouteCatalogue,
    RouteDescriptor, generate_routes,
};

fn records(value: serde_json::Value) -> Vec<PermissionRecord> {
    serde_json::from_value(value).unwrap()
}

fn grant(address: &str) -> PermissionRecord {
    PermissionRecord {
        kind: PermissionKind::Route,
        address: Some(address.to_string()),
        ..Default::default()
    }
}

fn paths(routes: &[RouteDescriptor]) -> Vec<&str> {
    routes.iter().map(|r| r.path.as_str()).collect()
}

/// 出力に残ったノードは、path が address に含まれるか、子が残っているかのどちらか
fn assert_every_node_is_justified(routes: &[RouteDescriptor], addresses: &[&str]) {
    for route in routes {
        assert!(
            addresses.contains(&route.path.as_str()) || !route.children.is_empty(),
            "{} kept without permission",
            route.path
        );
        assert_every_node_is_justified(&route.children, addresses);
    }
}

fn is_granted(route: &RouteDescriptor, addresses: &[&str]) -> bool {
    addresses.contains(&route.path.as_str())
        || route.children.iter().any(|child| is_granted(child, addresses))
}

/// 許可された (または許可された子孫を持つ) カタログのノードは、同じ位置に必ず残っている
fn assert_every_granted_node_is_kept(
    catalogue: &[RouteDescriptor],
    out: &[RouteDescriptor],
    addresses: &[&str],
) {
    let mut kept = out.iter();
    for route in catalogue.iter().filter(|r| is_granted(r, addresses)) {
        let Some(found) = kept.next() else {
            panic!("{} granted but missing", route.path);
        };
        assert_eq!(found.path, route.path);
        assert_every_granted_node_is_kept(&route.children, &found.children, addresses);
    }
    assert!(kept.next().is_none(), "output has nodes the catalogue does not grant");
}

#[rstest]
#[case::system_user(&["/system/user"], &["/system"])]
#[case::two_roots(&["/log/login", "/system"], &["/system", "/log"])]
#[case::unknown_address(&["/nowhere"], &[])]
#[case::nested_and_parent(&["/system", "/system/role", "/log/operation"], &["/system", "/log"])]
#[case::nothing(&[], &[])]
fn builtin_catalogue_is_filtered_by_address(#[case] addresses: &[&str], #[case] expected: &[&str]) {
    let catalogue = RouteCatalogue::builtin();
    let records: Vec<_> = addresses
        .iter()
        .map(|a| grant(a))
        .collect();

    let out = filter_routes(&catalogue.dynamic, &records);

    assert_eq!(paths(&out), expected);
    assert_every_node_is_justified(&out, addresses);
    assert_every_granted_node_is_kept(&catalogue.dynamic, &out, addresses);
}

#[test]
fn backend_payload_produces_state_for_the_router() {
    let catalogue = RouteCatalogue::builtin();
    let payload = records(json!([
        { "id": 100, "supId": "qyai", "type": 1, "address": "/system", "order": 1, "name": "System" },
        { "id": 101, "supId": 100, "type": "2", "address": "/system/user", "order": 1, "name": "Users" },
        { "id": 900, "supId": 101, "type": 3, "name": "Edit user", "value": "user:edit" },
        { "id": 901, "supId": 101, "type": 3, "name": "Delete user", "value": "user:delete" },
        { "id": 200, "supId": "qyai", "type": 1, "address": "", "name": "Logs" }
    ]));

    let (state, accessed) = generate_routes(
        &PermissionState::new(&catalogue),
        &catalogue,
        &payload,
        &ResolverOptions::default(),
    )
    .unwrap();

    assert_eq!(paths(&accessed), vec!["/system", "*"]);
    assert_eq!(paths(&accessed[0].children), vec!["/system/user"]);
    assert_eq!(state.btns, vec!["user:edit", "user:delete"]);
    assert_eq!(state.routes.len(), catalogue.constant.len() + accessed.len());
    assert_eq!(state.add_routes, accessed);
}

#[test]
fn id_strategy_uses_backend_hierarchy_and_titles() {
    let catalogue = RouteCatalogue::builtin();
    let payload = records(json!([
        { "id": 201, "supId": 100, "type": 2, "address": "/system/operation-log", "name": "Audit" },
        { "id": 100, "supId": "qyai", "type": 1, "address": "/system", "name": "Settings" }
    ]));
    let options = ResolverOptions {
        strategy: MatchStrategy::Id,
        ..Default::default()
    };

    let (state, accessed) =
        generate_routes(&PermissionState::new(&catalogue), &catalogue, &payload, &options).unwrap();

    assert_eq!(paths(&accessed), vec!["/system", "*"]);
    let system = &accessed[0];
    assert_eq!(system.meta.title.as_deref(), Some("Settings"));
    assert_eq!(paths(&system.children), vec!["/system/operation-log"]);
    assert_eq!(system.children[0].meta.title.as_deref(), Some("Audit"));
    assert!(state.btns.is_empty());
}

#[test]
fn button_count_matches_type_three_records() {
    let payload = records(json!([
        { "type": 3, "value": "a" },
        { "type": 1, "address": "/x", "value": "ignored" },
        { "type": "3", "value": "b" },
        { "type": 3 },
        { "type": 2, "address": "/y" }
    ]));

    let btns = extract_buttons(&payload);

    assert_eq!(btns.len(), 3);
    assert_eq!(btns, vec!["a", "b", ""]);
}

#[test]
fn tree_builder_keeps_every_reachable_node() {
    let flat: Vec<RouteDescriptor> = records(json!([
        { "id": 1, "supId": "qyai", "type": 1, "address": "/a" },
        { "id": 2, "supId": 1, "type": 1, "address": "/a/b" },
        { "id": 3, "supId": 2, "type": 1, "address": "/a/b/c" },
        { "id": 4, "supId": "qyai", "type": 1, "address": "/d" },
        { "id": 5, "supId": 4, "type": 1, "address": "/d/e" }
    ]))
    .into_iter()
    .map(|r| RouteDescriptor {
        path: r.address.clone().unwrap_or_default(),
        id: r.id,
        parent_id: r.parent_id,
        ..Default::default()
    })
    .collect();
    let total = flat.len();

    let forest = build_tree(flat, "qyai");

    assert_eq!(paths(&forest), vec!["/a", "/d"]);
    let count: usize = forest.iter().map(RouteDescriptor::node_count).sum();
    assert_eq!(count, total);
}

#[test]
fn catalogue_round_trips_through_json() {
    let catalogue = RouteCatalogue::builtin();
    let text = serde_json::to_string(&catalogue).unwrap();
    let back: RouteCatalogue = serde_json::from_str(&text).unwrap();
    assert_eq!(back, catalogue);
}
