use path_absolutize::Absolutize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{ResolveError, Result};
use crate::model::RouteDescriptor;

/// カタログファイルとみなすファイル名の末尾
pub const CATALOGUE_SUFFIX: &str = ".routes.json";

/// 前端で静的に定義したルート表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteCatalogue {
    /// 権限に関係なく常に有効なルート (ログイン画面など)
    #[serde(default)]
    pub constant: Vec<RouteDescriptor>,

    /// 権限レコードで絞り込む動的ルート
    #[serde(default)]
    pub dynamic: Vec<RouteDescriptor>,

    /// 動的ルートの後ろに必ず付ける末尾ルート (404 へのフォールバックなど)
    #[serde(default)]
    pub end: Vec<RouteDescriptor>,
}

impl RouteCatalogue {
    /// 組み込みの管理画面向けルート表
    pub fn builtin() -> Self {
        let constant = vec![
            RouteDescriptor::new("/login").with_name("Login").hidden(),
            RouteDescriptor::new("/404").with_name("NotFound").hidden(),
            RouteDescriptor::new("/")
                .with_redirect("/dashboard")
                .with_children(vec![RouteDescriptor::new("/dashboard")
                    .with_name("Dashboard")
                    .with_title("Dashboard")
                    .with_icon("dashboard")]),
        ];

        let dynamic = vec![
            RouteDescriptor::new("/system")
                .with_id("100")
                .with_name("System")
                .with_title("System")
                .with_icon("setting")
                .with_redirect("/system/user")
                .with_children(vec![
                    RouteDescriptor::new("/system/user")
                        .with_id("101")
                        .with_name("User")
                        .with_title("Users"),
                    RouteDescriptor::new("/system/role")
                        .with_id("102")
                        .with_name("Role")
                        .with_title("Roles"),
                    RouteDescriptor::new("/system/menu")
                        .with_id("103")
                        .with_name("Menu")
                        .with_title("Menus"),
                ]),
            RouteDescriptor::new("/log")
                .with_id("200")
                .with_name("Log")
                .with_title("Logs")
                .with_icon("documentation")
                .with_children(vec![
                    RouteDescriptor::new("/log/operation")
                        .with_id("201")
                        .with_name("OperationLog")
                        .with_title("Operation log"),
                    RouteDescriptor::new("/log/login")
                        .with_id("202")
                        .with_name("LoginLog")
                        .with_title("Login log"),
                ]),
        ];

        let end = vec![RouteDescriptor::new("*").with_redirect("/404").hidden()];

        RouteCatalogue {
            constant,
            dynamic,
            end,
        }
    }

    /// ファイルならそのまま、ディレクトリなら配下の `*.routes.json` をまとめて読み込む
    pub fn load(path: &Path) -> Result<Self> {
        let path = absolute(path)?;
        if path.is_dir() {
            Self::from_dir(&path)
        } else {
            Self::from_file(&path)
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let src = fs::read_to_string(path).map_err(|source| ResolveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalogue: RouteCatalogue =
            serde_json::from_str(&src).map_err(|source| ResolveError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            file = %path.display(),
            constant = catalogue.constant.len(),
            dynamic = catalogue.dynamic.len(),
            end = catalogue.end.len(),
            "loaded route catalogue"
        );
        Ok(catalogue)
    }

    /// ディレクトリを再帰的に探索し、見つかったカタログをパス順に連結する
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_type().is_file()
                    && e.file_name()
                        .to_str()
                        .is_some_and(|name| name.ends_with(CATALOGUE_SUFFIX))
            })
            .map(|e| e.path().to_path_buf())
            .collect();

        if files.is_empty() {
            return Err(ResolveError::MissingCatalogue(dir.to_path_buf()));
        }

        // 重複を除去し、読み込み順を安定させる
        files.sort();
        files.dedup();

        let mut merged = RouteCatalogue::default();
        for file in &files {
            info!(file = %file.display(), "reading route catalogue");
            merged.extend(Self::from_file(file)?);
        }
        Ok(merged)
    }

    pub fn extend(&mut self, other: RouteCatalogue) {
        self.constant.extend(other.constant);
        self.dynamic.extend(other.dynamic);
        self.end.extend(other.end);
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    path.absolutize()
        .map(|p| p.to_path_buf())
        .map_err(|source| ResolveError::Io {
            path: path.to_path_buf(),
            source,
        })
}
