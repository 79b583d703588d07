//! sheetc - sheet addressing and cursor planning tool

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use sheet_cursor::prelude::*;
use sheet_cursor::{column_name, parse_keys, CursorCall, MAX_NAME_LEN};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetc")]
#[command(author, version, about = "Spreadsheet addressing and cursor planning tool")]
struct Cli {
    /// Log library activity to stderr (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Size of the in-memory sheet commands operate on
#[derive(Args)]
struct SheetSize {
    /// Number of rows in the sheet
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: u32,

    /// Number of columns in the sheet
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: u32,
}

impl SheetSize {
    fn sheet(&self) -> Result<Sheet<MemoryCursor>> {
        Sheet::new(MemoryCursor::new(self.rows, self.cols)).context("Failed to attach sheet")
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the column names of zero-based column indices
    Column {
        /// Column indices
        #[arg(required = true)]
        indices: Vec<u32>,
    },

    /// Decode an address such as `B11:F20` into zero-based coordinates
    Decode {
        /// Address text (`$` markers are optional)
        address: String,
    },

    /// Resolve successive index expressions, e.g. `"10:20, 1:6" "1:9, 1:4"`
    Address {
        #[command(flatten)]
        size: SheetSize,

        /// Key expressions, each applied to the previous result
        #[arg(required = true, allow_hyphen_values = true)]
        keys: Vec<String>,
    },

    /// Generate unique sheet names from suggestions
    Names {
        /// Names that already exist
        #[arg(short, long)]
        reserve: Vec<String>,

        /// Maximum name length
        #[arg(long, default_value_t = MAX_NAME_LEN)]
        max_len: usize,

        /// Suggested names, in order
        #[arg(required = true)]
        suggested: Vec<String>,
    },

    /// Print the cursor calls needed to visit each address in turn
    Plan {
        #[command(flatten)]
        size: SheetSize,

        /// Target addresses, in order
        #[arg(required = true)]
        targets: Vec<String>,
    },

    /// Write a JSON block of values to an address and read it back
    Fill {
        #[command(flatten)]
        size: SheetSize,

        /// Target address
        address: String,

        /// JSON array of rows, e.g. `[[1, "a"], [2, null]]`
        values: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Column { indices } => columns(&indices),
        Commands::Decode { address } => decode(&address),
        Commands::Address { size, keys } => resolve(&size, &keys),
        Commands::Names {
            reserve,
            max_len,
            suggested,
        } => names(&reserve, max_len, &suggested),
        Commands::Plan { size, targets } => plan(&size, &targets),
        Commands::Fill {
            size,
            address,
            values,
        } => fill(&size, &address, &values),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn columns(indices: &[u32]) -> Result<()> {
    tracing::debug!("Naming {} columns", indices.len());
    for &index in indices {
        println!("{}\t{}", index, column_name(index));
    }
    Ok(())
}

fn decode(text: &str) -> Result<()> {
    let address =
        SheetAddress::parse(text).with_context(|| format!("Invalid address '{}'", text))?;
    tracing::debug!("Decoded '{}' as {:?}", text, address);

    println!("Address: {}", address);
    println!("Row: {}", address.row());
    println!("Column: {}", address.col());
    println!("Rows: {}", address.row_count());
    println!("Columns: {}", address.col_count());
    println!("Cells: {}", address.cell_count());
    Ok(())
}

fn resolve(size: &SheetSize, expressions: &[String]) -> Result<()> {
    let sheet = size.sheet()?;
    let mut range = Range::Tabular(sheet.cells());

    for expression in expressions {
        let keys = parse_keys(expression)
            .with_context(|| format!("Invalid key expression '{}'", expression))?;
        tracing::debug!("Indexing {} with {:?}", range, keys);
        range = range
            .get_keys(&keys)
            .with_context(|| format!("Failed to index {} with [{}]", range, expression))?;
        println!("[{}]\t{}\t{}\tlen={}", expression, range.kind(), range, range.len());
    }
    Ok(())
}

fn names(reserved: &[String], max_len: usize, suggested: &[String]) -> Result<()> {
    let mut generator = NameGenerator::with_max_len(max_len);
    tracing::debug!(
        "Generating {} names ({} reserved, max length {})",
        suggested.len(),
        reserved.len(),
        generator.max_len()
    );
    for name in reserved {
        generator.reserve(name);
    }
    for name in suggested {
        println!("{}", generator.generate(name));
    }
    Ok(())
}

fn plan(size: &SheetSize, targets: &[String]) -> Result<()> {
    let sheet = size.sheet()?;

    for text in targets {
        let address =
            SheetAddress::parse(text).with_context(|| format!("Invalid address '{}'", text))?;
        let before = sheet.inspect(|remote| remote.calls().len())?;
        sheet
            .with_target(&address, |_| Ok(()))
            .with_context(|| format!("Failed to position cursor over {}", address))?;

        let calls = sheet.inspect(|remote| remote.calls()[before..].to_vec())?;
        tracing::debug!("Positioning over {} took {} calls", address, calls.len());
        println!("{}:", address);
        if calls.is_empty() {
            println!("  (no calls)");
        }
        for call in calls {
            match call {
                CursorCall::MoveBy {
                    delta_cols,
                    delta_rows,
                } => println!("  move_by(cols={}, rows={})", delta_cols, delta_rows),
                CursorCall::ResizeTo { cols, rows } => {
                    println!("  resize_to(cols={}, rows={})", cols, rows)
                }
                other => println!("  {:?}", other),
            }
        }
    }
    Ok(())
}

fn fill(size: &SheetSize, text: &str, json: &str) -> Result<()> {
    let sheet = size.sheet()?;
    let address =
        SheetAddress::parse(text).with_context(|| format!("Invalid address '{}'", text))?;
    if !sheet.address().contains(address.row_end(), address.col_end()) {
        bail!("Address {} is outside the sheet {}", address, sheet.address());
    }
    let block = parse_block(json)?;
    tracing::debug!("Filling {} with {} rows", address, block.len());

    let rows = i64::from(address.row())..i64::from(address.row_end()) + 1;
    let cols = i64::from(address.col())..i64::from(address.col_end()) + 1;
    let range = sheet.get(rows, cols)?;

    range
        .set_values_grid(block)
        .with_context(|| format!("Failed to write values to {}", range))?;
    let values = range
        .values_grid()
        .with_context(|| format!("Failed to read values from {}", range))?;

    let rows: Vec<serde_json::Value> = values
        .iter()
        .map(|row| serde_json::Value::Array(row.iter().map(Scalar::to_json).collect()))
        .collect();
    println!("{}", serde_json::Value::Array(rows));
    Ok(())
}

fn parse_block(json: &str) -> Result<Vec<Vec<CellValue>>> {
    let value: serde_json::Value = serde_json::from_str(json).context("Invalid JSON")?;
    let serde_json::Value::Array(rows) = value else {
        bail!("Expected a JSON array of rows");
    };

    rows.iter()
        .enumerate()
        .map(|(i, row)| -> Result<Vec<CellValue>> {
            let context = || format!("Invalid value in row {}", i);
            match row {
                serde_json::Value::Array(cells) => cells
                    .iter()
                    .map(|cell| CellValue::from_json(cell).with_context(context))
                    .collect(),
                // A bare scalar is a one-cell row
                other => Ok(vec![CellValue::from_json(other).with_context(context)?]),
            }
        })
        .collect()
}
