use crate::config::{self, Config, DatabaseConfig, LoggingConfig, PolicyConfig};
use crate::core::db::{Columns, Condition, CrudAux};
use crate::core::{CrudError, Result};
use crate::reply::Reply;
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: crudaux [--config <path> | --db <path>] <command> <table> [options]

Commands:
  list <table>    Print every matching row as a JSON array
  get <table>     Print the first matching row as a JSON object (or null)
  insert <table>  Insert one row from col=value pairs
  update <table>  Update matching rows with col=value pairs
  delete <table>  Delete matching rows
  help            Show this message

Options:
  col=value          Column assignment (insert, update)
  --columns <a,b>    Columns to return (list, get); default *
  --where <cond>     Condition without the WHERE keyword, e.g. \"id = ?\"
  --param <value>    Positional value for the condition; repeatable";

/// Everything after the table name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    pub table: String,
    pub columns: Option<String>,
    pub assignments: Vec<(String, String)>,
    pub condition: Option<String>,
    pub params: Vec<String>,
}

/// A parsed command line command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List(Request),
    Get(Request),
    Insert(Request),
    Update(Request),
    Delete(Request),
    Help,
    Unknown(String),
}

/// Global options plus the command
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub config_path: Option<String>,
    pub db_path: Option<String>,
    pub command: Command,
}

/// Parses the process arguments (without the program name).
pub fn parse_args(args: &[String]) -> Invocation {
    let mut config_path = None;
    let mut db_path = None;
    let mut rest: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => config_path = iter.next().cloned(),
            "--db" => db_path = iter.next().cloned(),
            other => rest.push(other),
        }
    }

    Invocation {
        config_path,
        db_path,
        command: parse_command(&rest),
    }
}

/// Parses `<command> <table> [options]`.
pub fn parse_command(parts: &[&str]) -> Command {
    let Some((&name, tail)) = parts.split_first() else {
        return Command::Help;
    };
    if name == "help" || name == "--help" || name == "-h" {
        return Command::Help;
    }

    let Some((&table, options)) = tail.split_first() else {
        return Command::Unknown(format!("{}: missing table name", name));
    };
    let request = match parse_request(table, options) {
        Ok(request) => request,
        Err(message) => return Command::Unknown(message),
    };

    match name {
        "list" => Command::List(request),
        "get" => Command::Get(request),
        "insert" => Command::Insert(request),
        "update" => Command::Update(request),
        "delete" => Command::Delete(request),
        _ => Command::Unknown(format!("unknown command: {}", name)),
    }
}

fn parse_request(table: &str, options: &[&str]) -> std::result::Result<Request, String> {
    let mut request = Request {
        table: table.to_string(),
        ..Request::default()
    };

    let mut iter = options.iter();
    while let Some(&option) = iter.next() {
        match option {
            "--columns" | "--where" | "--param" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("{} needs a value", option))?
                    .to_string();
                match option {
                    "--columns" => request.columns = Some(value),
                    "--where" => request.condition = Some(value),
                    _ => request.params.push(value),
                }
            }
            assignment => match assignment.split_once('=') {
                Some((column, value)) if !column.is_empty() => request
                    .assignments
                    .push((column.to_string(), value.to_string())),
                _ => return Err(format!("unexpected argument: {}", assignment)),
            },
        }
    }
    Ok(request)
}

/// Builds the configuration for an invocation: `--db` wins, then `--config`,
/// then the default config file.
pub fn resolve_config(invocation: &Invocation) -> Result<Config> {
    if let Some(db) = &invocation.db_path {
        return Ok(Config {
            database: DatabaseConfig::new(db.clone()),
            policy: PolicyConfig::default(),
            logging: LoggingConfig::default(),
        });
    }

    let path: PathBuf = match &invocation.config_path {
        Some(path) => PathBuf::from(path),
        None => config::default_config_path()
            .ok_or_else(|| CrudError::Config("no config directory on this platform".to_string()))?,
    };
    config::load_config(path)
}

/// Text to print and whether the command succeeded
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub text: String,
    pub success: bool,
}

/// Runs a parsed command against the database.
///
/// Reads print rows as JSON; writes print a [`Reply`]. Failures always print a
/// failure `Reply`.
pub fn execute(crud: &CrudAux, command: &Command) -> Output {
    let result = match command {
        Command::List(req) => crud
            .select_rows(
                &req.table,
                &columns_of(req),
                condition_of(req).as_ref(),
                req.params.as_slice(),
            )
            .and_then(|rows| json_output(&rows)),
        Command::Get(req) => crud
            .select_row(
                &req.table,
                &columns_of(req),
                condition_of(req).as_ref(),
                req.params.as_slice(),
            )
            .and_then(|row| json_output(&row)),
        Command::Insert(req) => {
            let (columns, values) = split_assignments(req);
            reply_output(
                crud.insert_row(&req.table, columns.as_slice(), values.as_slice()),
                |id| format!("Registro agregado con id {}", id),
            )
        }
        Command::Update(req) => {
            let (columns, mut values) = split_assignments(req);
            values.extend(req.params.iter().cloned());
            reply_output(
                crud.update_row(
                    &req.table,
                    columns.as_slice(),
                    condition_of(req).as_ref(),
                    values.as_slice(),
                ),
                |n| format!("{} registro(s) actualizado(s)", n),
            )
        }
        Command::Delete(req) => reply_output(
            crud.delete_row(&req.table, condition_of(req).as_ref(), req.params.as_slice()),
            |n| format!("{} registro(s) eliminado(s)", n),
        ),
        Command::Help => Ok(Output {
            text: USAGE.to_string(),
            success: true,
        }),
        Command::Unknown(message) => Err(CrudError::Query(message.clone())),
    };

    result.unwrap_or_else(|e| Output {
        text: Reply::failure(e.to_string())
            .to_json()
            .unwrap_or_else(|_| e.to_string()),
        success: false,
    })
}

fn json_output<T: serde::Serialize>(value: &T) -> Result<Output> {
    Ok(Output {
        text: serde_json::to_string_pretty(value)?,
        success: true,
    })
}

fn reply_output<T, F: FnOnce(&T) -> String>(result: Result<T>, describe: F) -> Result<Output> {
    let reply = Reply::from_result(&result, describe);
    Ok(Output {
        success: reply.is_success(),
        text: reply.to_json()?,
    })
}

fn columns_of(req: &Request) -> Columns {
    req.columns.as_deref().map(Columns::from).unwrap_or(Columns::All)
}

fn condition_of(req: &Request) -> Option<Condition> {
    req.condition.as_deref().map(Condition::raw)
}

fn split_assignments(req: &Request) -> (Vec<String>, Vec<String>) {
    req.assignments.iter().cloned().unzip()
}
