//! Task queue command handlers.

use rotki_core::{CoreError, Session};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{GlobalOpts, TasksArgs, TasksCommand};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct TaskEntry {
    id: u64,
    state: &'static str,
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "State")]
    state: &'static str,
}

impl From<&TaskEntry> for TaskRow {
    fn from(entry: &TaskEntry) -> Self {
        Self {
            id: entry.id,
            state: entry.state,
        }
    }
}

pub async fn handle(
    session: &Session,
    args: TasksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TasksCommand::List => {
            let list = session
                .client()
                .list_tasks()
                .await
                .map_err(CoreError::from)?;

            let mut data: Vec<TaskEntry> = list
                .pending
                .iter()
                .map(|&id| TaskEntry {
                    id,
                    state: "pending",
                })
                .chain(list.completed.iter().map(|&id| TaskEntry {
                    id,
                    state: "completed",
                }))
                .collect();
            data.sort_by_key(|e| e.id);

            let out = output::render_list(
                &global.output,
                &data,
                |e| TaskRow::from(e),
                |e| e.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
