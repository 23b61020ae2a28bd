// src/main.rs

use clap::{ArgAction, Parser, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use route_permission_resolver::config::DEFAULT_TOP_PARENT;
use route_permission_resolver::{
    MatchStrategy, PermissionRecord, PermissionState, ReconcileOptions, ResolveError,
    ResolverOptions, RouteCatalogue, generate_routes,
};

/// 標準出力に書き出す内容
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Output {
    /// routes / addRoutes / btns をまとめた状態
    State,
    /// 常設ルートを含む全ルート
    Routes,
    /// 動的ルート + 末尾ルート
    Dynamic,
    /// ボタン権限のみ
    Buttons,
}

/// CLI 引数定義
#[derive(Parser, Debug)]
#[command(
    name = "route-permission-resolver",
    version,
    about = "バックエンドの権限レコードから表示可能なルートとボタンを算出して JSON 出力する CLI ツール"
)]
struct Cli {
    /// 権限レコード (JSON 配列) のファイル。`-` で標準入力
    #[arg(short = 'p', long = "permissions", value_name = "FILE")]
    permissions: PathBuf,

    /// ルート表のファイル、または `*.routes.json` を含むディレクトリ。省略時は組み込みのルート表
    #[arg(short = 'c', long = "catalogue", value_name = "FILE|DIR")]
    catalogue: Option<PathBuf>,

    /// 突き合わせ方式
    #[arg(short = 's', long, value_enum, default_value_t = MatchStrategy::Path)]
    strategy: MatchStrategy,

    /// id 方式で最上位とみなす親 id
    #[arg(long, value_name = "VALUE", default_value = DEFAULT_TOP_PARENT)]
    top_parent: String,

    /// id 方式で order 順に並べ替える
    #[arg(long)]
    sort_by_order: bool,

    /// 不備のある権限レコードがあればエラーにする
    #[arg(long)]
    strict: bool,

    #[arg(short = 'o', long, value_enum, default_value_t = Output::State)]
    output: Output,

    /// ログを詳細にする (-v: debug, -vv: trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> ResolverOptions {
        ResolverOptions {
            strategy: self.strategy,
            reconcile: ReconcileOptions {
                top_parent: self.top_parent.clone(),
                sort_by_order: self.sort_by_order,
            },
            strict: self.strict,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1) CLI 引数をパースし、ログを初期化 (標準出力は JSON 専用なのでログは stderr へ)
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // 2) ルート表と権限レコードを読み込む
    let catalogue = match &cli.catalogue {
        Some(path) => RouteCatalogue::load(path)?,
        None => RouteCatalogue::builtin(),
    };
    let records = read_records(&cli.permissions)?;

    // 3) 権限を突き合わせて状態を更新
    let state = PermissionState::new(&catalogue);
    let (state, accessed) = generate_routes(&state, &catalogue, &records, &cli.options())?;

    // 4) 結果を JSON 化して標準出力
    let json = match cli.output {
        Output::State => serde_json::to_string_pretty(&state)?,
        Output::Routes => serde_json::to_string_pretty(&state.routes)?,
        Output::Dynamic => serde_json::to_string_pretty(&accessed)?,
        Output::Buttons => serde_json::to_string_pretty(&state.btns)?,
    };
    println!("{}", json);

    Ok(())
}

fn read_records(path: &Path) -> Result<Vec<PermissionRecord>, ResolveError> {
    let src = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| ResolveError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|source| ResolveError::Io {
            path: path.to_path_buf(),
            source,
        })?
    };

    serde_json::from_str(&src).map_err(|source| ResolveError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
