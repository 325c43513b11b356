use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use human_panic::setup_panic;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

// 从 lib.rs 导入模块
use madrasa_forms::client::{DataAccess, Resource};
use madrasa_forms::config::AppConfig;
use madrasa_forms::errors::{MadrasaError, Result};
use madrasa_forms::forms::loader::ReferenceLists;
use madrasa_forms::forms::{
    AttendanceForm, ChosenFile, ExamForm, FormContext, InstructorForm, RecitationContext,
    RecitationForm, ScanOutcome,
};
use madrasa_forms::i18n::Catalog;
use madrasa_forms::navigation::Sidebar;
use madrasa_forms::notice::LogNoticeSink;
use madrasa_forms::runtime::lifetime;

#[derive(Debug, Parser)]
#[command(
    name = "madrasa-forms",
    version,
    about = "Drive the madrasa entity forms from the command line"
)]
struct Cli {
    /// 已解析的语言包（JSON）
    #[arg(long, global = true)]
    translations: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 列出导航分区
    Sections,
    /// 以扫码内容签到并提交考勤
    AttendanceQr { payload: String },
    /// 提交考试记录（有 id 时更新）
    Exam { file: PathBuf },
    /// 提交讲师记录，可附带头像
    Instructor {
        file: PathBuf,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// 提交背诵记录
    Recitation { file: PathBuf },
}

fn read_record<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::default());
    };
    let locale = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("en")
        .to_string();
    let value: Value = read_record(path)?;
    Catalog::from_json(locale, &value)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 输入类错误与运行错误区分退出码
fn exit_code(err: &MadrasaError) -> i32 {
    if err.is_input_error() { 2 } else { 1 }
}

async fn run(cli: Cli, config: &AppConfig, client: Arc<dyn DataAccess>) -> Result<()> {
    let catalog = Arc::new(load_catalog(cli.translations.as_deref())?);
    let ctx = FormContext::new(catalog.clone(), Arc::new(LogNoticeSink));
    let client = client.as_ref();

    match cli.command {
        Command::Sections => {
            println!("{}", config.app.system_name);
            for item in Sidebar::default().items(catalog.as_ref()) {
                println!("  {:<14} {}", item.section.id(), item.label);
            }
        }
        Command::AttendanceQr { payload } => {
            let mut form = AttendanceForm::mount(ctx, None, client)
                .await
                .with_timestamp_policy(config.attendance.timestamp_policy);
            form.toggle_scanner();
            match form.on_scan(Some(payload.as_str())) {
                ScanOutcome::Resolved { .. } => print_json(&form.submit(client).await?)?,
                _ => {
                    return Err(MadrasaError::invalid_qr_payload(format!(
                        "Rejected QR payload: {payload}"
                    )));
                }
            }
        }
        Command::Exam { file } => {
            let exam = read_record(&file)?;
            let form = ExamForm::mount(ctx, Some(&exam), client).await;
            print_json(&form.submit(client).await?)?;
        }
        Command::Instructor { file, image } => {
            let instructor = read_record(&file)?;
            let mut form = InstructorForm::new(ctx, Some(&instructor))
                .with_upload_limit(config.upload.max_size);
            if let Some(path) = image {
                form.select_image(ChosenFile::from_path(path)?)?;
            }
            print_json(&form.submit(client).await?)?;
        }
        Command::Recitation { file } => {
            let recitation = read_record(&file)?;
            let references =
                ReferenceLists::load(client, &[Resource::Lessons, Resource::Students]).await;
            let course = RecitationContext {
                lessons: references.lessons,
                students: references.students,
                ..RecitationContext::default()
            };
            let form = RecitationForm::new(ctx, Some(&recitation), course);
            print_json(&form.submit(client).await?)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    // 记录程序启动时间
    let start_datetime = chrono::Utc::now();

    setup_panic!();
    let cli = Cli::parse();

    // 初始化配置
    if let Err(e) = AppConfig::init() {
        eprintln!("Failed to initialize configuration: {e}");
        std::process::exit(1);
    }
    let config = AppConfig::get();

    // 初始化日志（标准输出留给命令结果）
    let stderr_log = std::io::stderr();
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(stderr_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    // 打印信息
    warn!(
        "Starting {}...
        Project: {}
        Version: {}
        API: {}",
        config.app.system_name,
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.api.base_url
    );

    let startup = match lifetime::startup::prepare_startup(config).await {
        Ok(startup) => startup,
        Err(e) => {
            error!("{}", e);
            drop(guard);
            std::process::exit(1);
        }
    };

    debug!(
        "Startup completed in {} ms using the {} backend",
        chrono::Utc::now()
            .signed_duration_since(start_datetime)
            .num_milliseconds(),
        startup.backend
    );

    if let Err(e) = run(cli, config, startup.data_access).await {
        error!("{}", e);
        drop(guard);
        eprintln!("[{}] {}", e.code(), e.format_simple());
        std::process::exit(exit_code(&e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_separates_input_errors() {
        assert_eq!(exit_code(&MadrasaError::invalid_qr_payload("bad")), 2);
        assert_eq!(exit_code(&MadrasaError::password_mismatch("bad")), 2);
        assert_eq!(exit_code(&MadrasaError::network("down")), 1);
        assert_eq!(exit_code(&MadrasaError::config("missing")), 1);
    }
}
