// ==========================================
// 签证排期库存 - 命令行入口
// ==========================================
// 用法:
//   visa-inventory upload <path> [--name <file_name>] [--password <secret>]
//   visa-inventory list
//   visa-inventory delete <file_name> [--password <secret>]
//   visa-inventory views [--category <code>] [--from "<Month> <Year>"]
//                        [--to "<Month> <Year>"] [--scope latest|all|file:<key>]
//
// 密码也可通过 VISA_INVENTORY_ADMIN_SECRET 传入，界面语言由 VISA_INVENTORY_LOCALE 指定
// 结果以 JSON 输出到 stdout，日志输出到 stderr
// ==========================================

use anyhow::{anyhow, bail, Context};
use serde::Serialize;
use std::path::Path;
use visa_inventory::api::parse_filter_params;
use visa_inventory::app::AppState;
use visa_inventory::engine::SourceScope;
use visa_inventory::{i18n, logging};

const ADMIN_SECRET_ENV: &str = "VISA_INVENTORY_ADMIN_SECRET";
const LOCALE_ENV: &str = "VISA_INVENTORY_LOCALE";

struct CliArgs {
    command: String,
    positional: Vec<String>,
    options: Vec<(String, String)>,
}

impl CliArgs {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> anyhow::Result<Self> {
        let command = args.next().ok_or_else(|| anyhow!(usage()))?;
        let mut positional = Vec::new();
        let mut options = Vec::new();
        while let Some(arg) = args.next() {
            if let Some(name) = arg.strip_prefix("--") {
                let value = args
                    .next()
                    .with_context(|| format!("选项 --{} 缺少取值", name))?;
                options.push((name.to_string(), value));
            } else {
                positional.push(arg);
            }
        }
        Ok(Self {
            command,
            positional,
            options,
        })
    }

    fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn positional(&self, idx: usize, what: &str) -> anyhow::Result<&str> {
        self.positional
            .get(idx)
            .map(String::as_str)
            .with_context(|| format!("缺少参数: {}\n{}", what, usage()))
    }

    fn admin_secret(&self) -> Option<String> {
        self.option("password")
            .map(str::to_string)
            .or_else(|| std::env::var(ADMIN_SECRET_ENV).ok())
    }
}

fn usage() -> String {
    [
        "用法:",
        "  visa-inventory upload <path> [--name <file_name>] [--password <secret>]",
        "  visa-inventory list",
        "  visa-inventory delete <file_name> [--password <secret>]",
        "  visa-inventory views [--category <code>] [--from \"<Month> <Year>\"] [--to \"<Month> <Year>\"] [--scope latest|all|file:<key>]",
    ]
    .join("\n")
}

/// "March 2020" → ("March", "2020")
fn split_month_year(value: &str) -> anyhow::Result<(&str, &str)> {
    value
        .trim()
        .rsplit_once(char::is_whitespace)
        .map(|(m, y)| (m.trim(), y.trim()))
        .with_context(|| format!("日期格式错误: {}（期望 \"March 2020\"）", value))
}

fn parse_scope(value: &str) -> anyhow::Result<SourceScope> {
    match value.trim() {
        "latest" => Ok(SourceScope::Latest),
        "all" => Ok(SourceScope::All),
        other => match other.strip_prefix("file:") {
            Some(key) if !key.trim().is_empty() => Ok(SourceScope::File(key.trim().to_string())),
            _ => bail!("未知的数据范围: {}（latest / all / file:<key>）", value),
        },
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    if let Ok(locale) = std::env::var(LOCALE_ENV) {
        if !locale.trim().is_empty() {
            i18n::set_locale(locale.trim());
        }
    }

    let args = CliArgs::parse(std::env::args().skip(1))?;
    tracing::info!(
        app = visa_inventory::APP_NAME,
        version = visa_inventory::VERSION,
        locale = %i18n::current_locale(),
        command = %args.command,
        "启动"
    );

    let state = AppState::from_env().map_err(|e| anyhow!(e))?;

    match args.command.as_str() {
        "upload" => {
            let path = Path::new(args.positional(0, "<path>")?);
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("无法读取文件: {}", path.display()))?;
            let name = match args.option("name") {
                Some(name) => name.to_string(),
                None => path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
                    .with_context(|| format!("无法确定文件名: {}", path.display()))?,
            };
            let secret = args.admin_secret();
            let response = state
                .inventory_api
                .process_upload(bytes, &name, secret.as_deref())
                .await?;
            print_json(&response)
        }
        "list" => {
            let response = state.inventory_api.list_all().await?;
            print_json(&response)
        }
        "delete" => {
            let name = args.positional(0, "<file_name>")?;
            let secret = args.admin_secret();
            let response = state
                .inventory_api
                .delete_file(name, secret.as_deref())
                .await?;
            print_json(&response)
        }
        "views" => {
            let from = args.option("from").map(split_month_year).transpose()?;
            let to = args.option("to").map(split_month_year).transpose()?;
            let mut params = parse_filter_params(args.option("category"), from, to)?;
            if let Some(scope) = args.option("scope") {
                params.scope = parse_scope(scope)?;
            }
            let response = state.dashboard_api.load_dashboard(&params).await?;
            print_json(&response)
        }
        other => bail!("未知命令: {}\n{}", other, usage()),
    }
}
