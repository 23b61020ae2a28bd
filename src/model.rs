// src/model.rs
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// フロントエンド側で定義されたルート (カタログの 1 ノード)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    /// ルートのパス (例: "/system", "/system/user")
    #[serde(default)]
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,

    /// メニューに表示しないルート
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,

    /// 権限レコードの id と突き合わせるためのキー (id 方式でのみ使用)
    #[serde(
        default,
        deserialize_with = "deserialize_loose_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    /// id 方式で権限レコードから上書きされる親 id
    #[serde(
        default,
        alias = "supId",
        deserialize_with = "deserialize_loose_parent_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_loose_order",
        skip_serializing_if = "Option::is_none"
    )]
    pub order: Option<i64>,

    #[serde(default)]
    pub meta: RouteMeta,

    /// 子ルート。空の場合は JSON に出力しない
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteDescriptor>,
}

impl RouteDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        RouteDescriptor {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.meta.icon = Some(icon.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.redirect = Some(redirect.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_children(mut self, children: Vec<RouteDescriptor>) -> Self {
        self.children = children;
        self
    }

    /// children を除いたノード自身のコピー
    pub fn clone_without_children(&self) -> RouteDescriptor {
        RouteDescriptor {
            path: self.path.clone(),
            name: self.name.clone(),
            redirect: self.redirect.clone(),
            hidden: self.hidden,
            id: self.id.clone(),
            parent_id: self.parent_id.clone(),
            order: self.order,
            meta: self.meta.clone(),
            children: Vec::new(),
        }
    }

    /// 自身を含む部分木のノード数
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(RouteDescriptor::node_count).sum::<usize>()
    }
}

/// ルートのメタ情報 (title 以外のキーは extra にそのまま保持する)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 権限レコードの種別 (route=1, page=2, button=3)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionKind {
    Route,
    Page,
    Button,
    /// 上記以外の値。メニューにもボタンにも振り分けられない
    Unknown(String),
}

impl PermissionKind {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "1" => PermissionKind::Route,
            "2" => PermissionKind::Page,
            "3" => PermissionKind::Button,
            other => PermissionKind::Unknown(other.to_string()),
        }
    }

    /// route / page はメニュー (ルーティング) 権限として扱う
    pub fn is_menu(&self) -> bool {
        matches!(self, PermissionKind::Route | PermissionKind::Page)
    }

    pub fn is_button(&self) -> bool {
        matches!(self, PermissionKind::Button)
    }
}

impl Default for PermissionKind {
    fn default() -> Self {
        PermissionKind::Unknown(String::new())
    }
}

impl Serialize for PermissionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PermissionKind::Route => serializer.serialize_u8(1),
            PermissionKind::Page => serializer.serialize_u8(2),
            PermissionKind::Button => serializer.serialize_u8(3),
            PermissionKind::Unknown(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for PermissionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<LooseScalar> = Option::deserialize(deserializer)?;
        Ok(raw
            .map(|raw| PermissionKind::from_raw(&raw.into_string()))
            .unwrap_or_default())
    }
}

/// バックエンドから返される権限レコード (フラットなリスト)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRecord {
    #[serde(default, deserialize_with = "deserialize_loose_id")]
    pub id: Option<String>,

    #[serde(default, alias = "supId", deserialize_with = "deserialize_loose_parent_id")]
    pub parent_id: Option<String>,

    #[serde(rename = "type", default)]
    pub kind: PermissionKind,

    /// ルートのパス。カタログ側の path と完全一致で照合する
    #[serde(default)]
    pub address: Option<String>,

    #[serde(default, deserialize_with = "deserialize_loose_order")]
    pub order: Option<i64>,

    #[serde(default)]
    pub name: Option<String>,

    /// ボタンの識別キー (type=3 のみ)
    #[serde(default)]
    pub value: Option<String>,
}

impl PermissionRecord {
    /// 空文字でない address のみを返す
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref().filter(|a| !a.is_empty())
    }
}

#[cfg(test)]
impl PermissionRecord {
    pub fn route(id: impl Into<String>, parent_id: Option<&str>, address: impl Into<String>) -> Self {
        PermissionRecord {
            id: Some(id.into()),
            parent_id: parent_id.map(str::to_string),
            kind: PermissionKind::Route,
            address: Some(address.into()),
            ..Default::default()
        }
    }

    pub fn button(value: impl Into<String>) -> Self {
        PermissionRecord {
            kind: PermissionKind::Button,
            value: Some(value.into()),
            ..Default::default()
        }
    }
}

/// 数値・文字列どちらでも受け付けるスカラー値
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Int(i64),
    Float(f64),
    Str(String),
}

impl LooseScalar {
    fn into_string(self) -> String {
        match self {
            LooseScalar::Int(n) => n.to_string(),
            LooseScalar::Float(f) => f.to_string(),
            LooseScalar::Str(s) => s,
        }
    }
}

fn deserialize_loose_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<LooseScalar> = Option::deserialize(deserializer)?;
    Ok(raw.map(LooseScalar::into_string))
}

/// 親 id 用。JS の緩い比較では 0 == '' なので、数値の 0 は空文字 (最上位) にそろえる
fn deserialize_loose_parent_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<LooseScalar> = Option::deserialize(deserializer)?;
    Ok(raw.map(|raw| match raw {
        LooseScalar::Int(0) => String::new(),
        LooseScalar::Float(f) if f == 0.0 => String::new(),
        other => other.into_string(),
    }))
}

fn deserialize_loose_order<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<LooseScalar> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| match raw {
        LooseScalar::Int(n) => Some(n),
        LooseScalar::Float(f) => Some(f as i64),
        LooseScalar::Str(s) => s.trim().parse().ok(),
    }))
}

fn is_false(value: &bool) -> bool {
    !*value
}
