use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{App, Arg};
use log::info;
use subsurface_algorithms::boreholes::{
    BoreholeAssembler, BoreholeConfig, MismatchPolicy, DEFAULT_RADIUS_HINT, DEFAULT_STEP,
};
use subsurface_io::base::{write_container, Container};
use subsurface_io::tables::{
    read_assays, read_collars, read_lithology, read_survey, DelimitedTableOptions,
};

struct Args {
    pub collars: PathBuf,
    pub survey: PathBuf,
    pub lithology: Option<PathBuf>,
    pub assays: Option<PathBuf>,
    pub output_file: PathBuf,
    pub config: BoreholeConfig,
    pub policy: MismatchPolicy,
    pub delimiter: char,
}

fn get_args() -> Result<Args> {
    let matches = App::new("subsurface boreholes")
        .version("0.1")
        .author("Subsurface developers")
        .about("Assembles collar, survey, lithology and assay tables into a line set container")
        .arg(
            Arg::with_name("COLLARS")
                .long("collars")
                .takes_value(true)
                .value_name("FILE")
                .help("Collar table with well id, x, y and z")
                .required(true),
        )
        .arg(
            Arg::with_name("SURVEY")
                .long("survey")
                .takes_value(true)
                .value_name("FILE")
                .help("Survey table with well id, md, inc and azi (or x, y and z positions)")
                .required(true),
        )
        .arg(
            Arg::with_name("LITH")
                .long("lith")
                .takes_value(true)
                .value_name("FILE")
                .help("Lithology table with well id, top, base and component lithology"),
        )
        .arg(
            Arg::with_name("ASSAYS")
                .long("assays")
                .takes_value(true)
                .value_name("FILE")
                .help("Assay table with well id, depth and one column per channel"),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .short("o")
                .long("out")
                .takes_value(true)
                .value_name("FILE")
                .help("Output container file (.json/.le binary pair or .ssa archive)")
                .required(true),
        )
        .arg(
            Arg::with_name("STEP")
                .long("step")
                .takes_value(true)
                .help("Resampling step along the well paths"),
        )
        .arg(
            Arg::with_name("RADIUS")
                .long("radius")
                .takes_value(true)
                .help("Tube radius hint stored with the line set"),
        )
        .arg(
            Arg::with_name("DELIMITER")
                .long("delimiter")
                .takes_value(true)
                .help("Field delimiter of the input tables"),
        )
        .arg(
            Arg::with_name("INTERSECT")
                .long("intersect")
                .help("Drop wells that are missing from the collar or the survey table instead of failing"),
        )
        .get_matches();

    let parse_f64 = |name: &str, default: f64| -> Result<f64> {
        matches
            .value_of(name)
            .map(|value| {
                value
                    .parse::<f64>()
                    .with_context(|| format!("Invalid value '{}' for {}", value, name))
            })
            .unwrap_or(Ok(default))
    };
    let config = BoreholeConfig::new(parse_f64("STEP", DEFAULT_STEP)?, parse_f64("RADIUS", DEFAULT_RADIUS_HINT)?)?;
    let policy = if matches.is_present("INTERSECT") {
        MismatchPolicy::Intersect
    } else {
        MismatchPolicy::Raise
    };
    let delimiter = match matches.value_of("DELIMITER") {
        None => DelimitedTableOptions::default().delimiter,
        Some(value) => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => anyhow::bail!("Delimiter must be a single character, got '{}'", value),
            }
        }
    };

    Ok(Args {
        collars: PathBuf::from(matches.value_of("COLLARS").context("missing collar table")?),
        survey: PathBuf::from(matches.value_of("SURVEY").context("missing survey table")?),
        lithology: matches.value_of("LITH").map(PathBuf::from),
        assays: matches.value_of("ASSAYS").map(PathBuf::from),
        output_file: PathBuf::from(matches.value_of("OUTPUT").context("missing output file")?),
        config,
        policy,
        delimiter,
    })
}

fn open_table(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Could not open table {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = get_args()?;
    let options = DelimitedTableOptions {
        delimiter: args.delimiter,
    };

    let collars = read_collars(open_table(&args.collars)?, options)
        .with_context(|| format!("Could not read collars from {}", args.collars.display()))?;
    let survey = read_survey(open_table(&args.survey)?, options)
        .with_context(|| format!("Could not read survey from {}", args.survey.display()))?;
    let lithology = args
        .lithology
        .as_deref()
        .map(|path| {
            read_lithology(open_table(path)?, options)
                .with_context(|| format!("Could not read lithology from {}", path.display()))
        })
        .transpose()?;
    let assays = args
        .assays
        .as_deref()
        .map(|path| {
            read_assays(open_table(path)?, options)
                .with_context(|| format!("Could not read assays from {}", path.display()))
        })
        .transpose()?;
    info!(
        "Read {} collars and {} survey stations",
        collars.len(),
        survey.len()
    );

    let boreholes = BoreholeAssembler::new(args.config, args.policy)
        .assemble(&collars, &survey, lithology.as_deref(), assays.as_ref())
        .context("Could not assemble boreholes")?;

    for missed in &boreholes.missed_wells {
        eprintln!("Missed well {}", missed);
    }
    println!(
        "Assembled {} wells with {} segments",
        boreholes.well_names.len(),
        boreholes.data.n_cells()
    );

    write_container(&args.output_file, &Container::Unstructured(boreholes.data))
        .with_context(|| format!("Could not write container to {}", args.output_file.display()))?;

    Ok(())
}
