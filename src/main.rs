//! policylib CLI binary entry point.
//! Delegates to the library for docs/migrate and prints results.

use clap::Parser;
use policylib::cli::{Cli, Commands};
use policylib::config::{self, Overrides};
use policylib::error::PolicyError;
use policylib::models::policy::LabelOrder;
use policylib::models::MigrateOutcome;
use policylib::output::DocsFileStatus;
use policylib::utils::error_prefix;
use policylib::{extract, migrate, output};
use std::path::Path;

fn main() {
    let cli = Cli::parse();
    policylib::logging::init_logging(cli.verbose);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Docs {
            repo_root,
            policy_dir,
            docs_dir,
            exclude,
            order,
            output: output_mode,
            out,
            check,
        } => {
            let order = match order.as_deref().map(|o| (o, LabelOrder::parse(o))) {
                None => None,
                Some((_, Some(o))) => Some(o),
                Some((raw, None)) => {
                    eprintln!(
                        "{} Unknown order '{}' (expected source|reverse-sorted)",
                        error_prefix(),
                        raw
                    );
                    std::process::exit(2);
                }
            };
            let eff = config::resolve_effective(&Overrides {
                repo_root: repo_root.as_deref(),
                policy_dir: policy_dir.as_deref(),
                docs_dir: docs_dir.as_deref(),
                exclude: Some(&exclude),
                output: output_mode.as_deref(),
                order,
                out: out.as_deref(),
            });
            let Some(mode) = output::OutputMode::parse(&eff.output) else {
                eprintln!(
                    "{} Unknown output '{}' (expected human|json)",
                    error_prefix(),
                    eff.output
                );
                std::process::exit(2);
            };
            if config::load_config(&eff.repo_root).is_none() {
                tracing::debug!("no policylib config found; using defaults");
            }
            let opts = extract::DocsOptions {
                docs_dir: eff.docs_dir.clone(),
                order: eff.order,
            };
            let (docs, errors) = match extract::run_docs(&eff.policy_dir, &eff.exclude, &opts) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{} {}", error_prefix(), e);
                    std::process::exit(2);
                }
            };

            match eff.out.as_deref() {
                None if check => {
                    eprintln!("{} --check needs --out or [docs].out", error_prefix());
                    std::process::exit(2);
                }
                None => output::print_docs(&docs, mode, &errors),
                Some(path) => {
                    output::print_errors(&errors);
                    let contents = output::compose_docs(&docs, &errors, mode);
                    match output::sync_docs_file(path, &contents, check) {
                        Ok(status @ DocsFileStatus::Stale) => {
                            eprintln!("{}", output::docs_file_message(path, status));
                            std::process::exit(1);
                        }
                        Ok(status) => println!("{}", output::docs_file_message(path, status)),
                        Err(e) => {
                            eprintln!("{} {}", error_prefix(), e);
                            std::process::exit(2);
                        }
                    }
                }
            }
            if !errors.is_empty() {
                std::process::exit(2);
            }
        }
        Commands::Migrate {
            input,
            output: out,
            dry_run,
        } => {
            let input = Path::new(&input);
            if dry_run {
                match migrate::plan(input) {
                    Ok(Some(r)) => print!("{}", r.text),
                    Ok(None) => {
                        output::print_migrate(input, input, &MigrateOutcome::AlreadyMigrated)
                    }
                    Err(e) => fail(&e),
                }
                return;
            }
            let Some(out) = out else {
                eprintln!("{} missing output path", error_prefix());
                std::process::exit(2);
            };
            let out = Path::new(&out);
            match migrate::migrate(input, out) {
                Ok(outcome) => output::print_migrate(input, out, &outcome),
                Err(e) => fail(&e),
            }
        }
    }
}

fn fail(e: &PolicyError) -> ! {
    eprintln!("{} {}", error_prefix(), e);
    std::process::exit(if e.is_access_error() { 2 } else { 1 });
}
