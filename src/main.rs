use clap::{Args, Parser, Subcommand};
use firestore_client::{
    DatabaseClient, Direction, Document, FilterOp, FirestoreClient, Operation, Query, Value,
};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Operators accepted by `--where`, longest first so `>=` wins over `>`.
const WHERE_OPERATORS: [&str; 7] = [">=", "<=", "!=", "==", "=", "<", ">"];

#[derive(Parser)]
#[command(name = "firestore-client", version, about = "Inspect a Firestore database")]
struct Cli {
    #[command(flatten)]
    connection: Connection,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Connection {
    #[arg(long, help = "Project to open with ambient credentials")]
    project_id: Option<String>,

    #[arg(long, help = "Path of a service account JSON key")]
    service_account: Option<PathBuf>,

    #[arg(long, help = "http[s]://host[:port]/projects/{project}[/databases/{database}]")]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the root collections.
    ListTables,
    Get {
        collection: String,
        id: String,
    },
    Query {
        collection: String,
        #[arg(
            long = "where",
            help = "Filter such as age>=21, name=ada or nickname=null (is-null); repeatable"
        )]
        filters: Vec<String>,
        #[arg(long)]
        order_by: Option<String>,
        #[arg(long, requires = "order_by")]
        desc: bool,
        #[arg(long)]
        limit: Option<u32>,
    },
    Delete {
        collection: String,
        id: String,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Database request failed: {0}")]
    Database(#[from] firestore_client::Error),

    #[error("Invalid filter {0:?}, expected field<op>value")]
    InvalidFilter(String),

    #[error("Failed to render document as JSON: {0}")]
    Render(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut client = FirestoreClient::new();
    connect(&mut client, cli.connection).await?;

    let result = run(&mut client, cli.command).await;
    // The session is released whether or not the command succeeded.
    let closed = client.close().await;
    result?;
    Ok(closed?)
}

async fn connect(client: &mut FirestoreClient, connection: Connection) -> Result<(), CliError> {
    if let Some(path) = connection.service_account {
        client.init_with_service_account(&path).await?;
    } else if let Some(url) = connection.database_url {
        client.init_with_database_url(&url).await?;
    } else if let Some(project_id) = connection.project_id {
        client.init_with_project_id(&project_id).await?;
    }
    Ok(())
}

async fn run(client: &mut impl DatabaseClient, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::ListTables => {
            for name in client.list_tables().await? {
                println!("{}", name);
            }
        }
        Commands::Get { collection, id } => {
            let response = client.execute(&collection, Operation::get(id)).await?;
            for document in response.into_documents() {
                print_document(&document)?;
            }
        }
        Commands::Query {
            collection,
            filters,
            order_by,
            desc,
            limit,
        } => {
            let mut query = Query::new();
            for filter in &filters {
                let (field, op, value) = parse_filter(filter)?;
                query = query.filter(field, op, value);
            }
            if let Some(field) = order_by {
                let direction = if desc {
                    Direction::Descending
                } else {
                    Direction::Ascending
                };
                query = query.order_by(field, direction);
            }
            if let Some(limit) = limit {
                query = query.limit(limit);
            }
            debug!("Running {:?}", query);
            for document in client.execute(&collection, query.into()).await?.into_documents() {
                print_document(&document)?;
            }
        }
        Commands::Delete { collection, id } => {
            client.execute(&collection, Operation::delete(id.as_str())).await?;
            println!("deleted {}/{}", collection, id);
        }
    }
    Ok(())
}

fn parse_filter(input: &str) -> Result<(String, FilterOp, Value), CliError> {
    let invalid = || CliError::InvalidFilter(input.to_string());
    let (position, symbol) = WHERE_OPERATORS
        .iter()
        .filter_map(|symbol| input.find(symbol).map(|position| (position, *symbol)))
        .min_by_key(|(position, symbol)| (*position, std::cmp::Reverse(symbol.len())))
        .ok_or_else(invalid)?;
    let field = input[..position].trim();
    let value = input[position + symbol.len()..].trim();
    if field.is_empty() {
        return Err(invalid());
    }
    let value = parse_value(value);
    // `== null` and `!= null` are the unary null checks.
    let op = match (FilterOp::parse(symbol).ok_or_else(invalid)?, &value) {
        (FilterOp::Equal, Value::Null) => FilterOp::IsNull,
        (FilterOp::NotEqual, Value::Null) => FilterOp::IsNotNull,
        (op, _) => op,
    };
    Ok((field.to_string(), op, value))
}

/// Reads a JSON literal, falling back to a plain string.
fn parse_value(input: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(input) {
        Ok(json) => from_json(json),
        Err(_) => Value::from(input),
    }
}

fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Double(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(values) => Value::array(values.into_iter().map(from_json)),
        serde_json::Value::Object(entries) => {
            Value::map(entries.into_iter().map(|(key, value)| (key, from_json(value))))
        }
    }
}

fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => (*b).into(),
        Value::Integer(i) => (*i).into(),
        Value::Double(d) => (*d).into(),
        Value::Array(values) => values.iter().map(to_json).collect(),
        Value::Map(fields) => fields
            .iter()
            .map(|(key, value)| (key.clone(), to_json(value)))
            .collect::<serde_json::Map<_, _>>()
            .into(),
        other => other.to_string().into(),
    }
}

fn print_document(document: &Document) -> Result<(), CliError> {
    let fields = to_json(&Value::Map(document.fields.clone()));
    println!("{}\t{}", document.id, serde_json::to_string(&fields)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_filter, parse_value};
    use firestore_client::{FilterOp, Value};

    #[test]
    fn parses_filters() {
        let (field, op, value) = parse_filter("age>=21").unwrap();
        assert_eq!(field, "age");
        assert_eq!(op, FilterOp::GreaterThanOrEqual);
        assert_eq!(value, Value::Integer(21));

        let (field, op, value) = parse_filter("name = ada").unwrap();
        assert_eq!((field.as_str(), op), ("name", FilterOp::Equal));
        assert_eq!(value, Value::from("ada"));

        let (_, op, _) = parse_filter("city!=Paris").unwrap();
        assert_eq!(op, FilterOp::NotEqual);

        let (field, op, _) = parse_filter("nickname=null").unwrap();
        assert_eq!((field.as_str(), op), ("nickname", FilterOp::IsNull));
        let (_, op, _) = parse_filter("nickname!=null").unwrap();
        assert_eq!(op, FilterOp::IsNotNull);

        assert!(parse_filter("=3").is_err());
        assert!(parse_filter("age").is_err());
    }

    #[test]
    fn parses_json_literals() {
        assert_eq!(parse_value("1.5"), Value::Double(1.5));
        assert_eq!(parse_value("true"), Value::Boolean(true));
        assert_eq!(parse_value("null"), Value::Null);
        assert_eq!(parse_value("\"42\""), Value::from("42"));
        assert_eq!(
            parse_value("[1, \"a\"]"),
            Value::array(vec![Value::Integer(1), Value::from("a")])
        );
    }
}
