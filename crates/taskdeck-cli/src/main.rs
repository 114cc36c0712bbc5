use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskdeck_core::app::{AppBuilder, CsrfMode};
use taskdeck_core::config::Config;
use taskdeck_core::domain::{EditedTask, NewTask, Task, TaskId};
use taskdeck_core::impls::LogNavigator;

#[derive(Debug, Parser)]
#[command(name = "taskdeck", about = "Manage tasks on a taskdeck backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 一覧を表示
    List,
    /// タスクを作成
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// タスクを更新
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// タスクを削除
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    // 1 回きりのプロセスなので、CSRF トークンを待ってから最初のリクエストを出す
    let app = AppBuilder::from_config(&config)?
        .csrf_mode(CsrfMode::AwaitBeforeReady)
        .navigator(LogNavigator)
        .build()?;
    app.start().await;

    // (A) 一覧を読み込んでキャッシュを作る
    let query = app.query_tasks();
    query.fetch().await.context("failed to load tasks")?;

    // (B) mutation を実行（成功時はキャッシュに patch が当たる）
    let mutate = app.mutate_task();
    match cli.command {
        Command::List => {}
        Command::Create { title, description } => {
            let mut task = NewTask::new(title);
            task.description = description;
            let created = mutate.create_task(task).await?;
            info!(id = %created.id, "created");
        }
        Command::Update {
            id,
            title,
            description,
        } => {
            let mut draft = EditedTask::new(title).with_id(TaskId::new(id));
            draft.description = description;
            app.drafts().update_edited_task(draft);
            let updated = mutate.submit_edited_task().await?;
            info!(id = %updated.id, "updated");
        }
        Command::Delete { id } => {
            mutate.delete_task(TaskId::new(id)).await?;
            info!(id, "deleted");
        }
    }

    // (C) キャッシュの中身を出力（再取得はしない）
    let tasks: Vec<Task> = query.cached().unwrap_or_default();
    println!("{}", serde_json::to_string_pretty(&tasks)?);
    Ok(())
}
