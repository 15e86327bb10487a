//! Interactive REPL: reads relational-algebra statements terminated by `;`,
//! compiles each to SQL, runs it against the opened database, and prints the
//! result set.

use std::io::{self, Write};

use clap::Parser;

use ra_sql_compiler::catalog::Catalog;
use ra_sql_compiler::driver::{Driver, SqliteDriver};
use ra_sql_compiler::namer::NameGenerator;
use ra_sql_compiler::{compile_to_tree, emit_sql, header_of};

#[derive(Debug, Parser)]
#[command(name = "ra-repl")]
#[command(about = "Compiles and runs relational-algebra queries against a SQLite database")]
struct Cli {
    /// Path to the SQLite database file to query against.
    db_path: String,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut driver = match SqliteDriver::open(&cli.db_path) {
        Ok(driver) => driver,
        Err(err) => {
            eprintln!("failed to open '{}': {err}", cli.db_path);
            std::process::exit(1);
        }
    };

    loop {
        let input = match read_statement() {
            Some(input) => input,
            None => break,
        };
        let trimmed = input.trim();

        match trimmed {
            "schema;" => {
                display_schema(driver.catalog());
                continue;
            }
            "help;" | "h;" => {
                print_help();
                continue;
            }
            "exit;" | "quit;" | "q;" => break,
            _ => {}
        }

        if let Some(rest) = trimmed.strip_prefix("source ") {
            let filename = rest.trim_end_matches(';').trim();
            execute_file(filename, &mut driver);
            continue;
        }

        run_statement(trimmed, &mut driver);
    }
}

fn run_statement(source: &str, driver: &mut SqliteDriver) {
    let mut names = NameGenerator::new();
    let tree = match compile_to_tree(source, driver.catalog(), &mut names) {
        Ok(tree) => tree,
        Err(err) => {
            println!("{err}");
            return;
        }
    };
    let query = emit_sql(&tree);
    match driver.execute(&query) {
        Ok((_, rows)) => display_results(&header_of(&tree), &rows),
        Err(err) => println!("{err}"),
    }
}

fn execute_file(filename: &str, driver: &mut SqliteDriver) {
    let contents = match std::fs::read_to_string(filename) {
        Ok(contents) => contents,
        Err(_) => {
            println!("FileNotFoundError: A file with name '{filename}' cannot be found");
            return;
        }
    };
    let source: String = contents
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join(" ");
    run_statement(&source, driver);
}

fn display_schema(catalog: &Catalog) {
    println!("*********************************************");
    for relation in catalog.iter() {
        print!("{}(", relation.name);
        let attrs = relation.attribute_names();
        let doms = relation.domains();
        for (i, (name, dom)) in attrs.iter().zip(doms.iter()).enumerate() {
            if i == attrs.len() - 1 {
                println!("{name}:{dom})");
            } else {
                print!("{name}:{dom},");
            }
        }
    }
    println!("*********************************************");
}

fn display_results(
    header: &[(String, ra_sql_compiler::catalog::Domain)],
    rows: &[Vec<ra_sql_compiler::driver::SqlValue>],
) {
    print!("\nANSWER(");
    for (i, (name, domain)) in header.iter().enumerate() {
        if i == header.len() - 1 {
            println!("{name}:{domain})");
        } else {
            print!("{name}:{domain},");
        }
    }
    println!("Number of tuples = {}\n", rows.len());
    for row in rows {
        for value in row {
            print!("{value}:");
        }
        println!();
    }
    println!();
}

fn print_help() {
    println!();
    println!("schema; \t\t# to see schema");
    println!("source filename; \t# to run query in file");
    println!("query terminated with ;\t# to run query");
    println!("exit; or quit; or q; \t# to exit");
    println!();
}

/// Reads lines from stdin until one contains a `;`, concatenating them the
/// way the original line-continuation prompt did. Returns `None` at EOF.
fn read_statement() -> Option<String> {
    let mut result = String::new();
    loop {
        let prompt = if result.is_empty() { "RA: " } else { "> " };
        print!("{prompt}");
        io::stdout().flush().ok();

        let mut line = String::new();
        if io::stdin().read_line(&mut line).ok()? == 0 {
            return None;
        }
        let line = line.trim();

        if let Some(idx) = line.find(';') {
            result.push_str(&line[..=idx]);
            break;
        }
        result.push_str(line);
        result.push(' ');
    }
    Some(result)
}
