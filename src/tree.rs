use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::model::RouteDescriptor;

/// フラットなリストから木を組み立てるためのノード
pub trait TreeNode: Clone {
    /// 自身の主キー (例: id)
    fn key(&self) -> Option<Cow<'_, str>>;

    /// 親の主キー (例: parentId / supId)
    fn parent_key(&self) -> Option<Cow<'_, str>>;

    fn set_children(&mut self, children: Vec<Self>);

    /// 自身を含む部分木のノード数
    fn node_count(&self) -> usize;
}

impl TreeNode for RouteDescriptor {
    fn key(&self) -> Option<Cow<'_, str>> {
        self.id.as_deref().map(Cow::Borrowed)
    }

    fn parent_key(&self) -> Option<Cow<'_, str>> {
        self.parent_id.as_deref().map(Cow::Borrowed)
    }

    fn set_children(&mut self, children: Vec<Self>) {
        self.children = children;
    }

    fn node_count(&self) -> usize {
        RouteDescriptor::node_count(self)
    }
}

/// フラットなリストを親子関係 (key / parent key) でまとめ、最上位ノードのみを返す。
///
/// 最上位とみなすのは、親キーが `top_value` と等しいか、空文字・未設定のノード。
/// 親が見つからず最上位でもないノードは結果に含まれない。
/// 子の順序は入力リストの順序のまま。
///
/// 親子の循環 (自分自身が親の場合や、同じ key のノードが複数ある場合を含む) は key で
/// 判定し、循環が閉じる位置にノードを一度だけ付け、それ以上は展開しない。
/// 出力のノード数は入力の件数を超えない。
pub fn build_tree<T: TreeNode>(list: Vec<T>, top_value: &str) -> Vec<T> {
    let mut by_parent: HashMap<Cow<'_, str>, Vec<usize>> = HashMap::new();
    for (index, node) in list.iter().enumerate() {
        if let Some(parent) = node.parent_key() {
            by_parent.entry(parent).or_default().push(index);
        }
    }

    let tops: Vec<usize> = list
        .iter()
        .enumerate()
        .filter(|(_, node)| is_top(node.parent_key().as_deref(), top_value))
        .map(|(index, _)| index)
        .collect();

    let mut ancestors = Vec::new();
    let forest: Vec<T> = tops
        .into_iter()
        .map(|index| assemble(&list, &by_parent, index, &mut ancestors))
        .collect();

    debug!(
        nodes = list.len(),
        roots = forest.len(),
        tree_nodes = forest.iter().map(T::node_count).sum::<usize>(),
        top = top_value,
        "built tree"
    );
    forest
}

fn is_top(parent_key: Option<&str>, top_value: &str) -> bool {
    match parent_key {
        None => true,
        Some(parent) => parent.is_empty() || parent == top_value,
    }
}

fn assemble<'a, T: TreeNode>(
    list: &'a [T],
    by_parent: &HashMap<Cow<'_, str>, Vec<usize>>,
    index: usize,
    ancestors: &mut Vec<Cow<'a, str>>,
) -> T {
    let mut node = list[index].clone();

    // key を持たないノードは誰の親にもならない
    let Some(key) = list[index].key() else {
        return node;
    };
    let Some(child_indices) = by_parent.get(&*key) else {
        return node;
    };

    // 循環は key で判定する (同じ id のレコードが複数あっても展開は一度きり)
    ancestors.push(key);
    let children: Vec<T> = child_indices
        .iter()
        .map(|&child| {
            let child_key = list[child].key();
            if child_key.as_ref().is_some_and(|k| ancestors.contains(k)) {
                warn!(
                    key = ?child_key,
                    "cyclic parent reference, attaching node without expanding it"
                );
                list[child].clone()
            } else {
                assemble(list, by_parent, child, ancestors)
            }
        })
        .collect();
    ancestors.pop();

    if !children.is_empty() {
        node.set_children(children);
    }
    node
}

/// フィールド名を指定して JSON オブジェクトのリストを木にする。
///
/// `build_value_tree(&list, "id", "supId", "qyai")` のように使う。
/// 文字列と数値の主キーはどちらも文字列として比較する。
pub fn build_value_tree(
    list: &[Value],
    key: &str,
    parent_key: &str,
    top_value: &str,
) -> Vec<Value> {
    let keyed: Vec<KeyedValue<'_>> = list
        .iter()
        .map(|value| KeyedValue {
            value: value.clone(),
            key,
            parent_key,
        })
        .collect();

    build_tree(keyed, top_value)
        .into_iter()
        .map(|keyed| keyed.value)
        .collect()
}

#[derive(Clone)]
struct KeyedValue<'a> {
    value: Value,
    key: &'a str,
    parent_key: &'a str,
}

impl KeyedValue<'_> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.value.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

impl TreeNode for KeyedValue<'_> {
    fn key(&self) -> Option<Cow<'_, str>> {
        self.field(self.key)
    }

    fn parent_key(&self) -> Option<Cow<'_, str>> {
        // JS の緩い比較では 0 == '' なので、数値の 0 は親なし (最上位) として扱う
        match self.value.get(self.parent_key) {
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Some(Cow::Borrowed("")),
            _ => self.field(self.parent_key),
        }
    }

    fn set_children(&mut self, children: Vec<Self>) {
        if let Value::Object(map) = &mut self.value {
            let children = children.into_iter().map(|child| child.value).collect();
            map.insert("children".to_string(), Value::Array(children));
        }
    }

    fn node_count(&self) -> usize {
        value_node_count(&self.value)
    }
}

fn value_node_count(value: &Value) -> usize {
    1 + value
        .get("children")
        .and_then(Value::as_array)
        .map_or(0, |children| children.iter().map(value_node_count).sum())
}
