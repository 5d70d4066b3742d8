use std::{
    collections::{BTreeSet, HashMap},
    fmt::Display,
};

use itertools::Itertools;
use log::{debug, info, warn};
use serde_json::{Map, Value};
use subsurface_core::containers::{AttributeColumn, AttributeTable, Cells, UnstructuredData};
use subsurface_core::elements::LineSet;
use subsurface_core::ndarray::Array2;
use subsurface_core::tables::{AssayRow, AssayTable, Collar, RawLithRow, RawSurveyRow};
use subsurface_core::{Error, ErrorKind, Result};

use super::{
    assay_logs, detect_depth_sign, normalize_survey, normalize_well_lithology, rasterize, resample, BoreholeConfig,
    DepthSign, LithCodes, MismatchPolicy, Station,
};

/// Name of the well index attribute on cells and vertices
pub const WELL_ID_ATTR: &str = "well_id";
/// Name of the lithology code cell attribute
pub const LITH_CODE_ATTR: &str = "lith_code";
/// Container attribute with the code mappings of categorical cell attributes
pub const CELL_ATTR_MAP: &str = "cell_attr_map";
/// Container attribute with the mapping from well names to well indices
pub const WELL_ID_MAP: &str = "well_id_map";
/// Container attribute with the tube radius hint of the line set
pub const RADIUS_HINT_ATTR: &str = "radius_hint";

/// Progress of a single well through the assembly. Wells move forward through the states in declaration order,
/// skipping the lithology states if they have no lithology. A well ends in either `Emitted` or `Dropped`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WellState {
    Uninit,
    HasCollar,
    HasSurvey,
    TrajectoryValid,
    HasLith,
    LithLogged,
    Emitted,
    Dropped,
}

impl Display for WellState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            WellState::Uninit => "UNINIT",
            WellState::HasCollar => "HAS_COLLAR",
            WellState::HasSurvey => "HAS_SURVEY",
            WellState::TrajectoryValid => "TRAJECTORY_VALID",
            WellState::HasLith => "HAS_LITH",
            WellState::LithLogged => "LITH_LOGGED",
            WellState::Emitted => "EMITTED",
            WellState::Dropped => "DROPPED",
        };
        f.write_str(label)
    }
}

/// A well that was dropped during assembly
#[derive(Debug, Clone, PartialEq)]
pub struct MissedWell {
    pub well_id: String,
    /// Last state the well reached before it was dropped
    pub state: WellState,
    pub kind: ErrorKind,
    pub reason: String,
}

impl Display for MissedWell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, reached {}): {}", self.well_id, self.kind, self.state, self.reason)
    }
}

/// Result of the borehole assembly
#[derive(Debug, Clone)]
pub struct Boreholes {
    /// All emitted wells as one container with two-vertex cells
    pub data: UnstructuredData,
    pub radius_hint: f64,
    /// Names of the emitted wells. The `well_id` attribute indexes into this list
    pub well_names: Vec<String>,
    pub missed_wells: Vec<MissedWell>,
    /// Terminal state of every well, in the order the wells were first encountered
    pub well_states: Vec<(String, WellState)>,
}

impl Boreholes {
    /// The wells as a [`LineSet`] with the radius hint of the assembly
    pub fn line_set(&self) -> Result<LineSet<'_>> {
        Ok(LineSet::new(&self.data)?.with_radius(self.radius_hint))
    }
}

/// Everything that the tables say about one well
struct WellRecord<'a> {
    name: String,
    collar: Option<&'a Collar>,
    survey: Vec<&'a RawSurveyRow>,
    lithology: Vec<&'a RawLithRow>,
    assays: Vec<&'a AssayRow>,
}

/// Wells keyed by name, in the order in which they were first encountered
#[derive(Default)]
struct WellRegistry<'a> {
    wells: Vec<WellRecord<'a>>,
    index: HashMap<String, usize>,
}

impl<'a> WellRegistry<'a> {
    fn entry(&mut self, name: &str) -> &mut WellRecord<'a> {
        let idx = match self.index.get(name) {
            Some(idx) => *idx,
            None => {
                self.wells.push(WellRecord {
                    name: name.to_owned(),
                    collar: None,
                    survey: vec![],
                    lithology: vec![],
                    assays: vec![],
                });
                self.index.insert(name.to_owned(), self.wells.len() - 1);
                self.wells.len() - 1
            }
        };
        &mut self.wells[idx]
    }
}

/// A well that made it through all stages
struct EmittedWell<'a> {
    collar: &'a Collar,
    stations: Vec<Station>,
    lith_codes: Vec<i64>,
    assay_logs: Vec<Vec<f64>>,
}

/// Builds one [`LineSet`] from tabular borehole data
#[derive(Debug, Clone, Copy, Default)]
pub struct BoreholeAssembler {
    config: BoreholeConfig,
    policy: MismatchPolicy,
}

impl BoreholeAssembler {
    pub fn new(config: BoreholeConfig, policy: MismatchPolicy) -> Self {
        Self { config, policy }
    }

    /// Assembles the wells of the given tables.
    ///
    /// Fails if the collar and survey tables contain different wells and the policy is [`MismatchPolicy::Raise`], or
    /// if the lithology table mixes depth sign conventions. All other problems are per well: the well is dropped and
    /// reported in [`Boreholes::missed_wells`]
    pub fn assemble(
        &self,
        collars: &[Collar],
        survey: &[RawSurveyRow],
        lithology: Option<&[RawLithRow]>,
        assays: Option<&AssayTable>,
    ) -> Result<Boreholes> {
        let mut registry = WellRegistry::default();
        for collar in collars {
            let well = registry.entry(&collar.well_id);
            if well.collar.is_some() {
                warn!("Well '{}' has more than one collar, using the first one", collar.well_id);
                continue;
            }
            well.collar = Some(collar);
        }
        for row in survey {
            registry.entry(&row.well_id).survey.push(row);
        }
        for row in lithology.unwrap_or_default() {
            registry.entry(&row.well_id).lithology.push(row);
        }
        for row in assays.map(|table| table.rows.as_slice()).unwrap_or_default() {
            registry.entry(&row.well_id).assays.push(row);
        }

        let unmatched = unmatched_wells(&registry);
        if !unmatched.is_empty() {
            match self.policy {
                MismatchPolicy::Raise => return Err(Error::SetMismatch { missing: unmatched }),
                MismatchPolicy::Intersect => info!(
                    "Dropping {} wells that are not in both the collar and the survey table",
                    unmatched.len()
                ),
            }
        }

        let lithology = lithology.unwrap_or_default();
        let depth_sign = detect_depth_sign(lithology)?;
        let lith_codes = LithCodes::from_names(lithology.iter().map(|row| &row.component_lith));
        let n_channels = assays.map_or(0, |table| table.channel_names.len());

        let mut emitted = vec![];
        let mut well_names = vec![];
        let mut missed_wells = vec![];
        let mut well_states = vec![];
        for well in &registry.wells {
            match self.process_well(well, depth_sign, &lith_codes, n_channels) {
                Ok(result) => {
                    debug!("Well '{}' has {} stations", well.name, result.stations.len());
                    well_names.push(well.name.clone());
                    well_states.push((well.name.clone(), WellState::Emitted));
                    emitted.push(result);
                }
                Err((state, err)) => {
                    warn!("Dropping well '{}' in state {}: {}", well.name, state, err);
                    well_states.push((well.name.clone(), WellState::Dropped));
                    missed_wells.push(MissedWell {
                        well_id: well.name.clone(),
                        state,
                        kind: err.kind(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let channel_names = assays.map(|table| table.channel_names.as_slice()).unwrap_or_default();
        let data = build_container(&emitted, &well_names, &lith_codes, channel_names, self.config.radius_hint())?;
        info!(
            "Assembled {} wells ({} segments), dropped {}",
            well_names.len(),
            data.n_cells(),
            missed_wells.len()
        );
        Ok(Boreholes {
            data,
            radius_hint: self.config.radius_hint(),
            well_names,
            missed_wells,
            well_states,
        })
    }

    /// Runs one well through all stages. On failure, returns the last state the well reached
    fn process_well<'a>(
        &self,
        well: &WellRecord<'a>,
        depth_sign: DepthSign,
        lith_codes: &LithCodes,
        n_channels: usize,
    ) -> std::result::Result<EmittedWell<'a>, (WellState, Error)> {
        let mut state = WellState::Uninit;
        let collar = well.collar.ok_or_else(|| {
            (
                state,
                Error::SetMismatch {
                    missing: vec![well.name.clone()],
                },
            )
        })?;
        state = WellState::HasCollar;

        if well.survey.is_empty() {
            return Err((
                state,
                Error::SetMismatch {
                    missing: vec![well.name.clone()],
                },
            ));
        }
        state = WellState::HasSurvey;

        let stations = normalize_survey(&well.name, well.survey.iter().copied())
            .and_then(|survey| resample(&well.name, &survey, self.config.step()))
            .map_err(|err| (state, err))?;
        state = WellState::TrajectoryValid;
        let basis = stations.iter().map(|station| station.md).collect::<Vec<_>>();

        let lith_codes = if well.lithology.is_empty() {
            vec![0; basis.len()]
        } else {
            state = WellState::HasLith;
            let intervals = normalize_well_lithology(&well.name, well.lithology.iter().copied(), depth_sign)
                .map_err(|err| (state, err))?;
            let lith_log = rasterize(&intervals, lith_codes, &basis);
            state = WellState::LithLogged;
            debug!("Well '{}' reached {}", well.name, state);
            lith_log
        };

        Ok(EmittedWell {
            collar,
            assay_logs: assay_logs(well.assays.iter().copied(), n_channels, &basis),
            stations,
            lith_codes,
        })
    }
}

/// Sorted names of all wells that are in only one of the collar and survey tables
fn unmatched_wells(registry: &WellRegistry) -> Vec<String> {
    let with_collar = registry
        .wells
        .iter()
        .filter(|well| well.collar.is_some())
        .map(|well| well.name.as_str())
        .collect::<BTreeSet<_>>();
    let with_survey = registry
        .wells
        .iter()
        .filter(|well| !well.survey.is_empty())
        .map(|well| well.name.as_str())
        .collect::<BTreeSet<_>>();
    with_collar
        .symmetric_difference(&with_survey)
        .map(|name| name.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Concatenates the emitted wells into one container. Cells connect consecutive stations within a well; the cell
/// attributes are taken at the first station of each segment. The radius hint is stored as the container attribute
/// `radius_hint`
fn build_container(
    wells: &[EmittedWell],
    well_names: &[String],
    lith_codes: &LithCodes,
    channel_names: &[String],
    radius_hint: f64,
) -> Result<UnstructuredData> {
    let n_vertices = wells.iter().map(|well| well.stations.len()).sum::<usize>();
    let n_cells = wells.iter().map(|well| well.stations.len() - 1).sum::<usize>();

    let mut vertex = Array2::zeros((n_vertices, 3));
    let mut cells = Array2::zeros((n_cells, 2));
    let mut vertex_well_ids = Vec::with_capacity(n_vertices);
    let mut cell_well_ids = Vec::with_capacity(n_cells);
    let mut cell_lith_codes = Vec::with_capacity(n_cells);
    let mut cell_channels = vec![Vec::with_capacity(n_cells); channel_names.len()];

    let (mut vertex_offset, mut cell_offset) = (0, 0);
    for (well_idx, well) in wells.iter().enumerate() {
        for (idx, station) in well.stations.iter().enumerate() {
            let position = station.position(well.collar);
            vertex[[vertex_offset + idx, 0]] = position.x;
            vertex[[vertex_offset + idx, 1]] = position.y;
            vertex[[vertex_offset + idx, 2]] = position.z;
            vertex_well_ids.push(well_idx as i64);
        }
        let vertex_range = vertex_offset..vertex_offset + well.stations.len();
        for (idx, (start, end)) in vertex_range.tuple_windows().enumerate() {
            cells[[cell_offset + idx, 0]] = start;
            cells[[cell_offset + idx, 1]] = end;
            cell_well_ids.push(well_idx as i64);
            cell_lith_codes.push(well.lith_codes[idx]);
            for (channel, samples) in cell_channels.iter_mut().zip(&well.assay_logs) {
                channel.push(samples[idx]);
            }
        }
        vertex_offset += well.stations.len();
        cell_offset += well.stations.len() - 1;
    }

    let mut cell_attrs = AttributeTable::with_rows(n_cells)
        .with_column(WELL_ID_ATTR, AttributeColumn::Int(cell_well_ids))?
        .with_column(LITH_CODE_ATTR, AttributeColumn::Int(cell_lith_codes))?;
    for (name, values) in channel_names.iter().zip(cell_channels) {
        cell_attrs = cell_attrs.with_column(name.clone(), AttributeColumn::Float(values))?;
    }
    let vertex_attrs =
        AttributeTable::with_rows(n_vertices).with_column(WELL_ID_ATTR, AttributeColumn::Int(vertex_well_ids))?;

    let mut cell_attr_map = Map::new();
    cell_attr_map.insert(LITH_CODE_ATTR.to_owned(), lith_codes.to_json());
    let well_id_map = well_names
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), Value::from(idx)))
        .collect::<Map<_, _>>();
    let mut attrs = Map::new();
    attrs.insert(CELL_ATTR_MAP.to_owned(), Value::Object(cell_attr_map));
    attrs.insert(WELL_ID_MAP.to_owned(), Value::Object(well_id_map));
    attrs.insert(RADIUS_HINT_ATTR.to_owned(), Value::from(radius_hint));

    UnstructuredData::from_arrays(vertex, Cells::Array(cells), Some(cell_attrs), Some(vertex_attrs))?
        .with_attrs(attrs)
}
