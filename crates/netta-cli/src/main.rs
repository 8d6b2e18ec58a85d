//! `netta` - a thin binary wrapper around [`netta_cli::fixtures`].
//!
//! Builds a fixture [`netta_ir::Document`] through the same `Builder`
//! call sequence a real front-end would emit, runs the checker over it,
//! and prints whatever diagnostics and global flags fall out. There is
//! no parser here; this crate exists to demonstrate `netta-ir` end to
//! end, not to read `.netta` source files.

use clap::{Parser, Subcommand};
use netta_cli::fixtures::{self, FIXTURES};
use netta_ir::diagnostic::{Diagnostic, Severity};
use netta_ir::Document;

#[derive(Parser)]
#[command(name = "netta")]
#[command(about = "Builds and checks fixture timed-automata documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the names of the available fixture models.
    List,
    /// Build a fixture and print its diagnostics and global flags.
    Check {
        /// Fixture name, e.g. `minimal-ta`. See `netta list`.
        name: String,
    },
    /// Build and check every fixture, reporting a pass/fail summary.
    All,
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::List => {
            for (name, _) in FIXTURES {
                println!("{name}");
            }
        }
        Commands::Check { name } => match fixtures::find(&name) {
            Some(build) => {
                let doc = build();
                print_report(&name, &doc);
                if doc.has_errors() {
                    std::process::exit(1);
                }
            }
            None => {
                eprintln!("no such fixture: {name} (see `netta list`)");
                std::process::exit(1);
            }
        },
        Commands::All => {
            let mut failed = 0;
            for (name, build) in FIXTURES {
                let doc = build();
                print_report(name, &doc);
                if doc.has_errors() {
                    failed += 1;
                }
            }
            if failed > 0 {
                eprintln!("{failed} fixture(s) reported errors");
                std::process::exit(1);
            }
        }
    }
}

fn print_report(name: &str, doc: &Document) {
    println!("== {name} ==");
    for diagnostic in doc.diagnostics.all() {
        println!("{}", format_diagnostic(doc, diagnostic));
    }
    println!(
        "flags: strict_invariants={} stops_clock={} urgent_transition={} strict_lower_bound={} guard_on_recv_broadcast={}",
        doc.flags.has_strict_invariants,
        doc.flags.stops_clock,
        doc.flags.has_urgent_transition,
        doc.flags.has_strict_lower_bound_on_controllable_edges,
        doc.flags.has_guard_on_recv_broadcast,
    );
}

fn format_diagnostic(doc: &Document, diagnostic: &Diagnostic) -> String {
    let level = match diagnostic.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };
    let params = diagnostic.params.join(", ");
    format!(
        "{level}: {} [{}] at {:?}",
        diagnostic.kind.template_key(),
        params,
        diagnostic.span
    )
}
