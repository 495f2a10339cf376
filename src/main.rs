// ==========================================
// 参数持久化子系统 - 控制台入口
// ==========================================
// 用法:
//   nvs-params                  进入交互控制台
//   nvs-params list             执行单条命令后退出
//   nvs-params set retry_count 5
// 环境变量: NVS_PARAMS_DB_PATH / NVS_PARAMS_NAMESPACE / NVS_PARAMS_LANG
//           NVS_PARAMS_LOG_FORMAT=json 切换 JSON 日志
// ==========================================

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use anyhow::Context;
use nvs_params::i18n::{self, t};
use nvs_params::{logging, ParamApi, ParamCommand, ParamRegistry, SqliteStore, StoreConfig};

const PROMPT: &str = "param> ";

fn main() -> anyhow::Result<()> {
    match std::env::var("NVS_PARAMS_LOG_FORMAT").as_deref() {
        Ok("json") => logging::init_json(),
        _ => logging::init(),
    }

    i18n::init_from_env();

    let config = StoreConfig::from_env();
    tracing::info!(
        version = nvs_params::VERSION,
        db_path = %config.db_path,
        namespace = %config.namespace,
        "{} 启动",
        nvs_params::APP_NAME
    );

    let store = Arc::new(
        SqliteStore::open(&config)
            .with_context(|| format!("无法打开参数存储: {}", config.db_path))?,
    );

    let api = ParamApi::new(Arc::new(build_registry(store)?));

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        run_console(&api)
    } else {
        let tokens: Vec<&str> = args.iter().map(String::as_str).collect();
        let command = ParamCommand::parse(&tokens)?;
        let output = api.execute(command)?;
        println!("{}", output.render(io::stdout().is_terminal()));
        Ok(())
    }
}

/// 声明本程序使用的参数
fn build_registry(store: Arc<SqliteStore>) -> anyhow::Result<ParamRegistry> {
    let mut registry = ParamRegistry::new(store);
    registry.declare("wifi_ssid", String::new())?;
    registry.declare("wifi_password", String::new())?;
    registry.declare("retry_count", 3i32)?;
    registry.declare_transient("verbose", false)?;
    Ok(registry)
}

/// 交互控制台：命令错误只打印，不退出
fn run_console(api: &ParamApi) -> anyhow::Result<()> {
    let color = io::stdout().is_terminal();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{}", t("repl.welcome"));
    loop {
        write!(stdout, "{}", PROMPT)?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        match line {
            "" => continue,
            "quit" | "exit" => break,
            "help" => {
                println!("{}", t("param.usage"));
                continue;
            }
            _ => {}
        }

        match ParamCommand::parse_line(line).and_then(|cmd| api.execute(cmd)) {
            Ok(output) => println!("{}", output.render(color)),
            Err(e) => eprintln!("{}", e),
        }
    }
    Ok(())
}
