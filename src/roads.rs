use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use error_stack::{Report, ResultExt};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use geojson::Value::LineString;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::douglas_peucker::{simplify, Point};
use crate::error::{Result, RoadError};

/// Threshold used when the caller does not pick one, in the units of the
/// road coordinates.
pub const DEFAULT_EPSILON: f64 = 2.0;

/// Simplifies every named road independently. The key set of the result
/// matches the input exactly.
pub fn compress_roads(
    roads: &HashMap<String, Vec<Point>>,
    epsilon: f64
) -> HashMap<String, Vec<Point>> {
    roads.par_iter()
        .map(|(name, points)| {
            let simplified = simplify(points, epsilon);
            log::debug!("{}: {} -> {} points", name, points.len(), simplified.len());
            (name.clone(), simplified)
        })
        .collect()
}

pub fn compress_roads_default(roads: &HashMap<String, Vec<Point>>) -> HashMap<String, Vec<Point>> {
    compress_roads(roads, DEFAULT_EPSILON)
}

/// A road whose points could not be decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadFailure {
    pub name: String,
    pub reason: String,
}

/// Roads decoded from a `{ name: [[x, y], ...] }` payload. Roads that fail
/// to decode are kept aside in `failures` so the rest can still be
/// compressed.
#[derive(Debug, Clone, Default)]
pub struct RoadCollection {
    pub roads: HashMap<String, Vec<Point>>,
    pub failures: Vec<RoadFailure>,
}

impl RoadCollection {

    pub fn from_json_value(value: &Value) -> Result<RoadCollection> {
        let object = value.as_object().ok_or_else(|| {
            Report::new(RoadError::InvalidInput)
                .attach_printable(format!("expected an object of roads, found {}", json_kind(value)))
        })?;

        let mut collection = RoadCollection::default();

        for (name, road) in object {
            match Vec::<Point>::deserialize(road) {
                Ok(points) => {
                    collection.roads.insert(name.clone(), points);
                },
                Err(e) => {
                    log::warn!("road {} skipped: {}", name, e);
                    collection.failures.push(RoadFailure {
                        name: name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        collection.failures.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(collection)
    }

    pub fn from_json_str(json: &str) -> Result<RoadCollection> {
        let value: Value = serde_json::from_str(json)
            .change_context(RoadError::InvalidInput)?;
        RoadCollection::from_json_value(&value)
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<RoadCollection> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .change_context(RoadError::Io)
            .attach_printable_lazy(|| format!("reading {}", path.display()))?;

        RoadCollection::from_json_str(&contents)
            .attach_printable_lazy(|| format!("decoding {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    pub fn total_points(&self) -> usize {
        self.roads.values().map(Vec::len).sum()
    }

    pub fn compress(&self, epsilon: f64) -> CompressedRoads {
        let roads = compress_roads(&self.roads, epsilon);

        let mut summaries: Vec<RoadSummary> = self.roads.iter()
            .map(|(name, points)| {
                let output_points = roads.get(name).map(Vec::len).unwrap_or(0);
                RoadSummary::new(name, points.len(), output_points)
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));

        let compressed = CompressedRoads { roads, summaries };
        log::info!(
            "compressed {} roads: {} -> {} points (epsilon {})",
            compressed.roads.len(), self.total_points(), compressed.total_points(), epsilon
        );
        compressed
    }
}

/// One row of the compression report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadSummary {
    pub name: String,
    pub input_points: usize,
    pub output_points: usize,
    pub retained_ratio: f64,
}

impl RoadSummary {
    fn new(name: &str, input_points: usize, output_points: usize) -> RoadSummary {
        let retained_ratio = if input_points == 0 {
            1.0
        } else {
            output_points as f64 / input_points as f64
        };
        RoadSummary {
            name: name.to_string(),
            input_points,
            output_points,
            retained_ratio,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompressedRoads {
    pub roads: HashMap<String, Vec<Point>>,
    pub summaries: Vec<RoadSummary>,
}

impl CompressedRoads {

    pub fn total_points(&self) -> usize {
        self.roads.values().map(Vec::len).sum()
    }

    fn sorted(&self) -> BTreeMap<&str, &Vec<Point>> {
        self.roads.iter().map(|(name, points)| (name.as_str(), points)).collect()
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.sorted())
            .change_context(RoadError::Serialize)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json_string()?;
        write_file(path.as_ref(), &json)
    }

    pub fn to_geojson(&self) -> FeatureCollection {
        let features: Vec<Feature> = self.sorted().into_iter()
            .map(|(name, points)| {
                let coords: Vec<Vec<f64>> = points.iter().map(|p| vec![p.x, p.y]).collect();

                let mut properties = JsonObject::new();
                properties.insert(String::from("name"), Value::String(name.to_string()));
                properties.insert(String::from("points"), Value::from(points.len()));

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(LineString(coords))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    pub fn write_geojson<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let geojson = serde_json::to_string_pretty(&self.to_geojson())
            .change_context(RoadError::Serialize)?;
        write_file(path.as_ref(), &geojson)
    }

    pub fn write_report_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = csv::Writer::from_path(path)
            .change_context(RoadError::Io)
            .attach_printable_lazy(|| format!("creating {}", path.display()))?;

        for summary in &self.summaries {
            writer.serialize(summary)
                .change_context(RoadError::Serialize)
                .attach_printable_lazy(|| format!("report row for {}", summary.name))?;
        }

        writer.flush()
            .change_context(RoadError::Io)
            .attach_printable_lazy(|| format!("writing {}", path.display()))
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    let mut file = File::create(path)
        .change_context(RoadError::Io)
        .attach_printable_lazy(|| format!("creating {}", path.display()))?;

    file.write_all(contents.as_bytes())
        .change_context(RoadError::Io)
        .attach_printable_lazy(|| format!("writing {}", path.display()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
