//! バックエンドの権限レコードと前端のルート表を突き合わせ、
//! ログインユーザーが表示できるルートとボタンを算出する。

pub mod catalogue;
pub mod config;
pub mod error;
pub mod matcher;
pub mod model;
pub mod reconciler;
pub mod store;
pub mod tree;
pub mod validate;

pub use catalogue::RouteCatalogue;
pub use config::{MatchStrategy, ReconcileOptions, ResolverOptions};
pub use error::ResolveError;
pub use model::{PermissionKind, PermissionRecord, RouteDescriptor, RouteMeta};
pub use store::{PermissionState, generate_routes};
