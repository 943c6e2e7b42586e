//! # csvgrid-cli
//!
//! Command-line interface for inspecting and editing delimiter-separated files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use csvgrid_sheet::{CsvOptions, Delimiter, LineTerminator, Sheet};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// csvgrid - read, reshape and write CSV-like files
#[derive(Parser)]
#[command(name = "csvgrid")]
#[command(author, version, about = "Read, reshape and write CSV-like files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Field delimiter of input files (character or name, e.g. ';' or semicolon)
    #[arg(short = 'd', long = "delimiter", global = true, default_value = "comma")]
    delimiter: Delimiter,

    /// Treat the first row as column names
    #[arg(long = "header", global = true)]
    header: bool,

    /// Text encoding of input files (WHATWG label)
    #[arg(long = "encoding", global = true, default_value = "utf-8")]
    encoding: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print a file
    Show {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format (table, csv, json)
        #[arg(short = 'f', long = "format", default_value = "table")]
        format: OutputFormat,

        /// Delimiter for csv output (defaults to the input delimiter)
        #[arg(short = 'o', long = "output-delimiter")]
        output_delimiter: Option<Delimiter>,
    },

    /// Print the shape and column names of a file
    Info {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format (table, csv, json)
        #[arg(short = 'f', long = "format", default_value = "table")]
        format: OutputFormat,
    },

    /// Rewrite a file with another delimiter or encoding. A `.json` output
    /// path writes JSON instead.
    Convert {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Delimiter of the output file (defaults to the input delimiter)
        #[arg(short = 'o', long = "output-delimiter")]
        output_delimiter: Option<Delimiter>,

        /// Text encoding of the output file (defaults to the input encoding)
        #[arg(long = "output-encoding")]
        output_encoding: Option<String>,

        /// Terminate lines with CRLF instead of LF
        #[arg(long)]
        crlf: bool,
    },

    /// Print one cell, addressed in A1 notation
    Get {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(value_name = "CELL")]
        cell: String,
    },

    /// Change one cell, addressed in A1 notation, and save the file
    Set {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(value_name = "CELL")]
        cell: String,

        #[arg(value_name = "VALUE")]
        value: String,

        /// Write to this file instead of overwriting FILE
        #[arg(long = "output", value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Create a file of empty cells
    New {
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Number of columns (ignored when --names is given)
        #[arg(long, default_value_t = 1)]
        columns: usize,

        /// Number of data rows
        #[arg(long, default_value_t = 1)]
        rows: usize,

        /// Comma-separated column names; implies --header
        #[arg(long, value_delimiter = ',')]
        names: Vec<String>,
    },
}

/// Output format for printed sheets.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Aligned table output (default)
    #[default]
    Table,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let input = input_options(&cli)?;
    let output = run(cli.command, &input)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

/// Reader options shared by every subcommand.
fn input_options(cli: &Cli) -> Result<CsvOptions> {
    CsvOptions::default()
        .with_delimiter(cli.delimiter)
        .with_headers(cli.header)
        .with_encoding_label(&cli.encoding)
        .with_context(|| format!("Invalid --encoding: '{}'", cli.encoding))
}

/// Run a subcommand and return the text to print.
fn run(command: Command, input: &CsvOptions) -> Result<String> {
    match command {
        Command::Show {
            file,
            format,
            output_delimiter,
        } => {
            let sheet = load(&file, input)?;
            render(&sheet, format, output_delimiter.unwrap_or(input.delimiter))
        }
        Command::Info { file, format } => {
            let sheet = load(&file, input)?;
            describe(&file, &sheet, format)
        }
        Command::Convert {
            input: source,
            output,
            output_delimiter,
            output_encoding,
            crlf,
        } => {
            let sheet = load(&source, input)?;
            let mut options = input
                .clone()
                .with_delimiter(output_delimiter.unwrap_or(input.delimiter));
            if let Some(label) = &output_encoding {
                options = options
                    .with_encoding_label(label)
                    .with_context(|| format!("Invalid --output-encoding: '{label}'"))?;
            }
            if crlf {
                options = options.with_line_terminator(LineTerminator::CrLf);
            }
            save(&sheet, &output, options)?;
            Ok(format!(
                "{} {} -> {}",
                "Converted".green().bold(),
                source.display(),
                output.display()
            ))
        }
        Command::Get { file, cell } => {
            let sheet = load(&file, input)?;
            let value = sheet
                .get_a1(&cell)
                .with_context(|| format!("Cannot read cell {cell}"))?;
            Ok(value.to_string())
        }
        Command::Set {
            file,
            cell,
            value,
            output,
        } => {
            let mut sheet = load(&file, input)?;
            sheet
                .set_a1(&cell, &value)
                .with_context(|| format!("Cannot write cell {cell}"))?;
            let target = output.unwrap_or(file);
            save(&sheet, &target, input.clone())?;
            Ok(String::new())
        }
        Command::New {
            output,
            columns,
            rows,
            names,
        } => {
            let sheet = if names.is_empty() {
                Sheet::blank(columns, rows)?
            } else {
                Sheet::blank_with_headers(&names, rows)?
            };
            let options = input.clone().with_headers(sheet.has_header_row());
            save(&sheet, &output, options)?;
            Ok(format!(
                "{} {} ({} x {})",
                "Created".green().bold(),
                output.display(),
                sheet.column_count(),
                sheet.row_count()
            ))
        }
    }
}

fn load(path: &Path, options: &CsvOptions) -> Result<Sheet> {
    debug!(path = %path.display(), "loading sheet");
    Sheet::from_csv_with_options(path, options.clone())
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

fn save(sheet: &Sheet, path: &Path, options: CsvOptions) -> Result<()> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let saved = if is_json {
        sheet.save_as_json(path)
    } else {
        sheet.save_as_csv_with_options(path, options)
    };
    saved.with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Print a sheet in the specified format.
fn render(sheet: &Sheet, format: OutputFormat, delimiter: Delimiter) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(sheet)),
        OutputFormat::Json => Ok(sheet.to_json_string_pretty()?),
        OutputFormat::Csv => {
            let lines: Vec<String> = sheet.get_formatted_sheet(delimiter).collect();
            Ok(lines.join("\n"))
        }
    }
}

/// Aligned table with spreadsheet row numbers in the first column. Headerless
/// sheets are labelled with column letters.
fn render_table(sheet: &Sheet) -> String {
    if sheet.is_empty() {
        return "(empty sheet)".to_string();
    }

    let labels: Vec<String> = match sheet.column_names() {
        Ok(names) => names.to_vec(),
        Err(_) => (0..sheet.column_count())
            .map(|col| sheet.get_column_number(col))
            .collect(),
    };
    let body: Vec<(String, Vec<String>)> = sheet
        .rows()
        .enumerate()
        .map(|(row, cells)| {
            (
                sheet.get_row_number(row).to_string(),
                cells.into_iter().map(display_cell).collect(),
            )
        })
        .collect();

    let number_width = body.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    let mut widths: Vec<usize> = labels.iter().map(|l| l.chars().count()).collect();
    for (_, cells) in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(body.len() + 1);
    let header = labels
        .iter()
        .zip(&widths)
        .map(|(label, &width)| format!("{label:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    lines.push(format!("{:number_width$} | {}", "", header.cyan().bold()));

    for (number, cells) in &body {
        let row = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ");
        lines.push(format!("{:>number_width$} | {row}", number.dimmed()));
    }

    lines.join("\n")
}

/// Make line breaks and tabs visible so every row stays on one line.
fn display_cell(cell: &str) -> String {
    cell.replace("\r\n", "\\n")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Shape and column names of a sheet.
fn describe(path: &Path, sheet: &Sheet, format: OutputFormat) -> Result<String> {
    let names = sheet.column_names().ok();
    let columns: Vec<(String, Option<&str>)> = (0..sheet.column_count())
        .map(|col| {
            (
                sheet.get_column_number(col),
                names.map(|n| n[col].as_str()),
            )
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "file": path.display().to_string(),
                "rows": sheet.row_count(),
                "columns": sheet.column_count(),
                "header": sheet.has_header_row(),
                "names": names,
            });
            Ok(serde_json::to_string_pretty(&value)?)
        }
        OutputFormat::Csv => {
            let mut lines = vec!["column,name".to_string()];
            lines.extend(columns.iter().map(|(letter, name)| {
                format!(
                    "{letter},{}",
                    csvgrid_sheet::format_cell(name.unwrap_or(""), Delimiter::Comma)
                )
            }));
            Ok(lines.join("\n"))
        }
        OutputFormat::Table => {
            let mut lines = vec![
                path.display().to_string().cyan().bold().to_string(),
                format!("  {} {}", "rows:".yellow(), sheet.row_count()),
                format!("  {} {}", "columns:".yellow(), sheet.column_count()),
            ];
            lines.extend(columns.iter().map(|(letter, name)| match name {
                Some(name) => format!("  {letter:>3}  {name}"),
                None => format!("  {letter:>3}"),
            }));
            Ok(lines.join("\n"))
        }
    }
}
