use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{App, Arg};
use subsurface_core::containers::{AttributeTable, StructuredData, UnstructuredData};
use subsurface_io::base::{read_container, Container};

struct Args {
    pub input_file: PathBuf,
    pub detailed: bool,
}

fn get_args() -> Result<Args> {
    let matches = App::new("subsurface info")
        .version("0.1")
        .author("Subsurface developers")
        .about("Prints information about the given container file")
        .arg(
            Arg::with_name("INPUT")
                .short("i")
                .takes_value(true)
                .value_name("INPUT")
                .help("Input container file (.json/.le binary pair or .ssa archive)")
                .required(true),
        )
        .arg(
            Arg::with_name("DETAILED")
                .short("d")
                .long("detailed")
                .help("Output the attribute tables and container attributes"),
        )
        .get_matches();

    let input_file = PathBuf::from(matches.value_of("INPUT").context("missing input file")?);
    let detailed = matches.is_present("DETAILED");

    Ok(Args {
        input_file,
        detailed,
    })
}

fn print_attributes(label: &str, table: &AttributeTable) {
    println!("{}", label);
    for (name, column) in table.columns() {
        println!("\t{:<24}{}", name, column.dtype());
    }
}

fn print_unstructured(data: &UnstructuredData) {
    if let Some(bounds) = data.bounds() {
        let (min, max) = (bounds.min(), bounds.max());
        println!("\tX:                      {}  {}", min.x, max.x);
        println!("\tY:                      {}  {}", min.y, max.y);
        println!("\tZ:                      {}  {}", min.z, max.z);
    }
    print_attributes("Cell attributes", data.cell_attrs());
    print_attributes("Vertex attributes", data.vertex_attrs());
    for (key, value) in data.attrs() {
        println!("\t{}: {}", key, value);
    }
}

fn print_structured(data: &StructuredData) {
    for (dim, extent) in data.dims() {
        println!("\t{:<24}{}", dim, extent);
    }
    for (key, value) in data.attrs() {
        println!("\t{}: {}", key, value);
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = get_args()?;
    let container = read_container(&args.input_file)
        .with_context(|| format!("Could not read container from {}", args.input_file.display()))?;
    println!("subsurface info report for {}", args.input_file.display());
    match &container {
        Container::Unstructured(data) => println!("{}", data),
        Container::Structured(data) => println!("{}", data),
    }
    match container.element() {
        Ok(element) => println!("Element: {}", element),
        Err(err) => log::warn!("Container does not form a known element: {}", err),
    }
    if let Container::Unstructured(data) = &container {
        if let Some(radius_hint) = data.attrs().get("radius_hint").and_then(|value| value.as_f64()) {
            println!("Tube radius hint: {}", radius_hint);
        }
    }

    if args.detailed {
        match &container {
            Container::Unstructured(data) => print_unstructured(data),
            Container::Structured(data) => print_structured(data),
        }
    }

    Ok(())
}
