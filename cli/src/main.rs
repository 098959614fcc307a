use clap::{Parser, Subcommand};
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, Level};

use proto_source::report::filter_entries;
use proto_source::{
    build_path, comments_to_json, decode_code_generator_request, decode_descriptor_set,
    file_comments, resolve_location, type_name, Descriptor, FileDescriptor, LocateError,
};
use proto_source_locator::{file_enums, file_messages};

#[derive(Parser)]
#[command(name = "protosrc")]
#[command(about = "Inspect the source comments protoc recorded for protobuf descriptors", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the comment report of a descriptor set as JSON
    Comments {
        /// Input file written by `protoc --include_source_info --descriptor_set_out`
        #[arg(short, long)]
        input: PathBuf,

        /// Only report this `.proto` file
        #[arg(short, long)]
        file: Option<String>,

        /// Only keep entries whose derived name matches this regex
        #[arg(long)]
        filter: Option<String>,

        /// Treat the input as a `CodeGeneratorRequest` and report `file_to_generate` only
        #[arg(long)]
        request: bool,
    },

    /// Print the source path and comments of the descriptors with a derived name
    Path {
        /// Input descriptor set
        #[arg(short, long)]
        input: PathBuf,

        /// `.proto` file containing the descriptor
        #[arg(short, long)]
        file: String,

        /// Derived name, e.g. `Outer_Inner` or `Outer_field`
        #[arg(short, long)]
        name: String,
    },
}

fn main() -> Result<(), LocateError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Comments { input, file, filter, request } => {
            let data = fs::read(input).map_err(LocateError::Io)?;
            let files: Vec<FileDescriptor> = if *request {
                let request = decode_code_generator_request(&data)?;
                request.files_to_generate().cloned().collect()
            } else {
                decode_descriptor_set(&data)?.files
            };

            let selected: Vec<&FileDescriptor> = match file {
                Some(name) => {
                    let found = files
                        .iter()
                        .find(|f| &f.name == name)
                        .ok_or_else(|| LocateError::FileNotFound(name.clone()))?;
                    vec![found]
                }
                None => files.iter().collect(),
            };

            let pattern = filter.as_deref().map(Regex::new).transpose()?;

            let mut reports = Vec::with_capacity(selected.len());
            for f in selected {
                let mut report = file_comments(f)?;
                if let Some(pattern) = &pattern {
                    filter_entries(&mut report, pattern);
                }
                reports.push(report);
            }
            println!("{}", comments_to_json(&reports)?);
            Ok(())
        }

        Commands::Path { input, file, name } => {
            let data = fs::read(input).map_err(LocateError::Io)?;
            let set = decode_descriptor_set(&data)?;
            let target = set
                .file(file)
                .ok_or_else(|| LocateError::FileNotFound(file.clone()))?;

            let matches = named_descriptors(target, name);
            debug!(name = %name, matches = matches.len(), "looked up derived name");
            if matches.is_empty() {
                println!("No descriptor named {} in {}", name, file);
            }
            for desc in &matches {
                let path = build_path(desc)?;
                println!("{} {} {}", desc.kind(), type_name(desc), path);
                match resolve_location(desc)? {
                    Some(location) => {
                        for detached in &location.leading_detached_comments {
                            println!("  detached: {:?}", detached);
                        }
                        if let Some(leading) = &location.leading_comments {
                            println!("  leading:  {:?}", leading);
                        }
                        if let Some(trailing) = &location.trailing_comments {
                            println!("  trailing: {:?}", trailing);
                        }
                        println!("  span:     {:?}", location.span);
                    }
                    None => println!("  (no source location)"),
                }
            }
            Ok(())
        }
    }
}

/// Messages, fields, enums and enum values of `file` whose derived name is `name`.
fn named_descriptors<'a>(file: &'a FileDescriptor, name: &str) -> Vec<Descriptor<'a>> {
    let mut found = Vec::new();
    for message in file_messages(file) {
        if type_name(&message) == name {
            found.push(message.clone());
        }
        found.extend(message.fields().filter(|field| type_name(field) == name));
    }
    for enum_ in file_enums(file) {
        if type_name(&enum_) == name {
            found.push(enum_.clone());
        }
        found.extend(enum_.values().filter(|value| type_name(value) == name));
    }
    found
}
