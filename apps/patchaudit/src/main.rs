//! Patchaudit CLI binary entry point.
//! Resolves configuration, runs the analysis and prints the report.

use clap::Parser;
use patchaudit::cli::{flag_pair, Cli, Commands};
use patchaudit::config::{self, CliArgs};
use patchaudit::{analyse, logging, output, utils};

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Analyse {
            project,
            patch,
            auto_theme_update,
            sort_by_type,
            vendor_namespaces,
            strict,
            no_strict,
            output,
            verbose,
        } => {
            logging::init(verbose);
            let args = CliArgs {
                project: project.as_deref(),
                patch: patch.as_deref(),
                output: output.as_deref(),
                fuzz: auto_theme_update.as_deref(),
                sort_by_type: if sort_by_type { Some(true) } else { None },
                vendor_namespaces: vendor_namespaces.as_deref(),
                strict: flag_pair(strict, no_strict),
            };
            let result = config::resolve_effective(&args).and_then(|eff| {
                // Friendly note if no patchaudit config was found
                if !eff.config_found && eff.output != "json" {
                    eprintln!(
                        "{} No patchaudit.toml found; using defaults.",
                        utils::note_prefix()
                    );
                }
                let locator = analyse::build_locator(&eff)?;
                let report = analyse::run_analyse(&eff, &locator)?;
                output::print_report(&report, &eff.output);
                Ok(())
            });
            if let Err(e) = result {
                eprintln!("{} {}", utils::error_prefix(), e);
                std::process::exit(e.exit_code());
            }
        }
    }
}
