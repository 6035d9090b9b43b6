use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ini_table_sqlite::{Aggregate, SqliteTable, StatementOutcome, TableOptions, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ini-table")]
#[command(version, about = "Query and modify a single INI-configured SQLite table")]
struct Cli {
    /// INI file holding the table definition.
    #[arg(long, env = "INI_TABLE_CONFIG")]
    config: PathBuf,
    /// Table name; also the INI section and the `<table>.db` file stem.
    #[arg(long)]
    table: String,
    /// Directory holding `<table>.db` (default: current directory).
    #[arg(long)]
    db_dir: Option<PathBuf>,
    /// Log executed statements; repeat for debug output.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the table if missing and print its creation statement.
    Init,
    /// Print matching rows as JSON.
    Select(SelectArgs),
    /// Insert one row.
    Insert(InsertArgs),
    /// Delete rows where a column equals a value.
    Delete(DeleteArgs),
    /// Update rows matching a WHERE clause.
    Update(UpdateArgs),
    /// Print the minimum of a column.
    Min(AggregateArgs),
    /// Print the maximum of a column.
    Max(AggregateArgs),
    /// Print the average of a column.
    Avg(AggregateArgs),
    /// Print the number of matching rows.
    Count(CountArgs),
}

#[derive(Debug, Args)]
struct SelectArgs {
    /// Comma-separated columns, or `*` for all.
    #[arg(long, default_value = "*")]
    columns: String,
    /// Raw SQL filter without the WHERE keyword. Trusted as-is.
    #[arg(long = "where")]
    where_clause: Option<String>,
}

#[derive(Debug, Args)]
struct InsertArgs {
    /// Comma-separated column names.
    #[arg(long)]
    columns: String,
    /// Comma-separated values (integers, reals, NULL, or text), one per column.
    #[arg(long, allow_hyphen_values = true)]
    values: String,
}

#[derive(Debug, Args)]
struct DeleteArgs {
    /// Column to match on.
    #[arg(long)]
    column: String,
    /// Value the column must equal.
    #[arg(long, allow_hyphen_values = true)]
    value: String,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Assignment `column=value`; repeatable, later entries win.
    #[arg(long = "set", required = true, allow_hyphen_values = true)]
    assignments: Vec<String>,
    /// Raw SQL filter without the WHERE keyword. Trusted as-is.
    #[arg(long = "where")]
    where_clause: String,
}

#[derive(Debug, Args)]
struct AggregateArgs {
    /// Column to aggregate.
    #[arg(long)]
    column: String,
}

#[derive(Debug, Args)]
struct CountArgs {
    /// Raw SQL filter without the WHERE keyword. Trusted as-is.
    #[arg(long = "where")]
    where_clause: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    let mut options = TableOptions::new().command_logging(cli.verbose > 0);
    if let Some(dir) = &cli.db_dir {
        options = options.database_dir(dir);
    }
    debug!(config = %cli.config.display(), table = %cli.table, "opening table");

    let table = SqliteTable::open_with(&cli.config, &cli.table, options)
        .map_err(|e| format!("Failed to open table '{}': {e}", cli.table))?;

    let result = match cli.command {
        Command::Init => {
            println!("{}", table.create_statement());
            Ok(())
        }
        Command::Select(args) => run_select(&table, args),
        Command::Insert(args) => run_insert(&table, args),
        Command::Delete(args) => run_delete(&table, args),
        Command::Update(args) => run_update(&table, args),
        Command::Min(args) => run_aggregate(&table, Aggregate::Min, args),
        Command::Max(args) => run_aggregate(&table, Aggregate::Max, args),
        Command::Avg(args) => run_aggregate(&table, Aggregate::Avg, args),
        Command::Count(args) => {
            println!("{}", table.count(args.where_clause.as_deref()));
            Ok(())
        }
    };

    table
        .close()
        .map_err(|e| format!("Failed to close database: {e}"))?;
    result
}

// ---------------------------------------------------------------------------
// commands
// ---------------------------------------------------------------------------

fn run_select(table: &SqliteTable, args: SelectArgs) -> Result<(), String> {
    let columns = parse_csv_list(&args.columns);
    let result = table
        .select(&columns, args.where_clause.as_deref())
        .map_err(|e| e.to_string())?;
    if !result.success {
        return Err(format!(
            "Select failed, rolled back. Error: {}",
            result.error.unwrap_or_default()
        ));
    }
    let json = serde_json::to_string_pretty(&result.rows)
        .map_err(|e| format!("Failed to serialize rows: {e}"))?;
    println!("{json}");
    Ok(())
}

fn run_insert(table: &SqliteTable, args: InsertArgs) -> Result<(), String> {
    let columns = parse_csv_list(&args.columns);
    let values: Vec<Value> = args.values.split(',').map(parse_value).collect();
    let outcome = table.insert(&columns, &values).map_err(|e| e.to_string())?;
    report(outcome)
}

fn run_delete(table: &SqliteTable, args: DeleteArgs) -> Result<(), String> {
    let outcome = table
        .delete(&args.column, parse_value(&args.value))
        .map_err(|e| e.to_string())?;
    report(outcome)
}

fn run_update(table: &SqliteTable, args: UpdateArgs) -> Result<(), String> {
    let assignments = args
        .assignments
        .iter()
        .map(|raw| {
            raw.split_once('=')
                .map(|(column, value)| (column.trim().to_string(), parse_value(value)))
                .ok_or_else(|| format!("invalid assignment '{raw}': expected column=value"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let outcome = table
        .update(&assignments, &args.where_clause)
        .map_err(|e| e.to_string())?;
    report(outcome)
}

fn run_aggregate(table: &SqliteTable, func: Aggregate, args: AggregateArgs) -> Result<(), String> {
    let outcome = table
        .aggregate(func, &args.column)
        .map_err(|e| e.to_string())?;
    report(outcome)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Prints a successful outcome's message, or turns a failed one into an error.
fn report(outcome: StatementOutcome) -> Result<(), String> {
    if outcome.success {
        println!("{}", outcome.message);
        Ok(())
    } else {
        Err(outcome.message)
    }
}

fn parse_csv_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Reads a command-line value as integer, real, `NULL`, or else text.
fn parse_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return Value::Integer(v);
    }
    if trimmed.chars().any(|c| c.is_ascii_digit()) {
        if let Ok(v) = trimmed.parse::<f64>() {
            return Value::Real(v);
        }
    }
    Value::Text(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("42"), Value::Integer(42));
        assert_eq!(parse_value(" -7 "), Value::Integer(-7));
        assert_eq!(parse_value("2.5"), Value::Real(2.5));
        assert_eq!(parse_value("NULL"), Value::Null);
        assert_eq!(parse_value("null"), Value::Null);
        assert_eq!(parse_value("nan"), Value::from("nan"));
        assert_eq!(parse_value("bob"), Value::from("bob"));
        assert_eq!(parse_value(" ann "), Value::from("ann"));
    }

    #[test]
    fn test_parse_csv_list() {
        assert_eq!(parse_csv_list("id, name,,age"), ["id", "name", "age"]);
        assert!(parse_csv_list("").is_empty());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
