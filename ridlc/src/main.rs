//
// main.rs
// The RIDL Compiler
//

//! `ridlc` is the command-line driver for the RIDL compiler.
//!
//! ## Basic usage:
//!
//! `ridlc -c project.json src/events.idl src/types.idl`
//!
//! The only mandatory argument is `-c`/`--config`, the main project
//! configuration document (JSON). It declares the project name, the
//! alias map, the defined exclusives, bootstrap enums, and may list
//! further inputs under `includes` and `sources`. Any IDL files
//! given on the command line are compiled between the two lists.
//!
//! With `-o`/`--output`, the populated project graph is written to
//! the given file instead of standard output. The graph is what
//! downstream code generators consume.
//!
//! ## Exit status
//!
//! `ridlc` exits with status `0` on success and a non-zero status
//! after printing a readable diagnostic otherwise.

#![crate_name="ridlc"]
#![crate_type="bin"]

#![deny(missing_debug_implementations, missing_copy_implementations,
        trivial_casts, trivial_numeric_casts,
        unsafe_code,
        unstable_features,
        unused_import_braces, unused_qualifications)]

#[macro_use]
extern crate clap;
extern crate ridl;

use std::fs::File;
use std::io::stderr;
use std::io::prelude::*;
use std::process;
use std::time::Instant;
use ridl::util::{ Diagnostic, DiagnosticKind, PACKAGE_INFO };
use ridl::error::Result;
use ridl::compiler::{ Compiler, Config };


// Reporting elapsed time for each stage of the compiler pipeline
macro_rules! stopwatch {
    ($msg: expr, $code: expr) => ({
        eprint!("    {:.<40}", $msg);
        stderr().flush().expect("Could not flush stderr");
        let t0 = Instant::now();
        let val = $code;
        let t1 = Instant::now();
        let dt = t1 - t0;
        let secs = dt.as_secs() as f64 + f64::from(dt.subsec_nanos()) * 1e-9;
        let message = format!("{:6.1} ms", secs * 1e3);
        eprintln!("{}", Diagnostic::new(message, DiagnosticKind::Info));
        val
    })
}

#[derive(Debug)]
struct CmdArgs {
    config_file: String,
    output_name: String,
    sources: Vec<String>,
}

impl CmdArgs {
    fn new() -> Self {
        let args = clap_app!(ridlc =>
            (name:    PACKAGE_INFO.name)
            (version: PACKAGE_INFO.version)
            (author:  PACKAGE_INFO.authors)
            (about:   PACKAGE_INFO.description)
            (@arg config:  -c --config +takes_value +required "Main project configuration document (JSON)")
            (@arg output:  -o --output +takes_value           "File the project graph is written to")
            (@arg sources: +multiple                          "Zero or more IDL source files")
        ).get_matches();

        CmdArgs {
            config_file: args.value_of("config").unwrap_or_default().to_owned(),
            output_name: args.value_of("output").unwrap_or_default().to_owned(),
            sources:     args.values_of("sources").map_or_else(
                Vec::new,
                |values| values.map(str::to_owned).collect(),
            ),
        }
    }
}

fn ridlc_main(args: &CmdArgs) -> Result<Config> {
    let config = Config {
        config_file:  args.config_file.clone(),
        source_files: args.sources.clone(),
        output_name:  args.output_name.clone(),
        project:      None,
    };

    stopwatch!("Compiling project", Compiler::create(config).process())
}

fn main() {
    eprintln!();
    eprintln!("    The RIDL Compiler, version {}", PACKAGE_INFO.version);
    eprintln!();

    let args = CmdArgs::new();

    let config = ridlc_main(&args).unwrap_or_else(|error| {
        error.pretty_print(&mut stderr()).expect("Could not write to stderr");
        process::exit(1);
    });

    if let Some(ref project) = config.project {
        let rendered = format!("{:#?}", project);

        if config.output_name.is_empty() {
            println!("{}", rendered);
        } else {
            let written = File::create(&config.output_name)
                .and_then(|mut file| file.write_all(rendered.as_bytes()));

            if let Err(error) = written {
                eprintln!("    Could not write {}: {}", config.output_name, error);
                process::exit(1);
            }
        }
    }

    eprintln!();
    eprintln!("    {}", Diagnostic::new("Compilation Successful", DiagnosticKind::Success));
    eprintln!();
}
