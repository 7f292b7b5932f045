use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use kb_core::{Error, RelevanceLabel, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Bundled datasets shown on the landing page, as (file, portal).
pub const BUNDLED_DATASETS: [(&str, &str); 4] = [
    ("detik.csv", "Detik"),
    ("kapanlagi.csv", "Kapanlagi"),
    ("kompas.csv", "Kompas"),
    ("suara.csv", "Suara"),
];

pub const LABEL_COLUMN: &str = "Label";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelDistribution {
    pub dataset: String,
    pub portal: String,
    /// Most frequent label first; ties keep the order labels first appear in
    pub counts: Vec<(RelevanceLabel, usize)>,
}

impl LabelDistribution {
    pub fn from_reader<R: Read>(
        dataset: impl Into<String>,
        portal: impl Into<String>,
        reader: R,
    ) -> Result<Self> {
        let dataset = dataset.into();
        let counts = count_labels(reader).map_err(|e| match e {
            Error::Dataset(msg) => Error::Dataset(format!("{}: {}", dataset, msg)),
            other => other,
        })?;
        Ok(Self {
            dataset,
            portal: portal.into(),
            counts,
        })
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

fn csv_error(e: csv::Error) -> Error {
    Error::Dataset(e.to_string())
}

pub fn count_labels<R: Read>(reader: R) -> Result<Vec<(RelevanceLabel, usize)>> {
    let mut reader = csv::Reader::from_reader(reader);
    let column = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .position(|header| header.trim() == LABEL_COLUMN)
        .ok_or_else(|| Error::Dataset(format!("missing {} column", LABEL_COLUMN)))?;

    let mut counts: Vec<(RelevanceLabel, usize)> = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let raw = record.get(column).unwrap_or("").trim();
        // Blank cells carry no label
        if raw.is_empty() {
            continue;
        }
        let label: RelevanceLabel = raw
            .parse()
            .map_err(|_| Error::Dataset(format!("row {}: unknown label {:?}", row + 2, raw)))?;
        match counts.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }

    // Stable, so equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(counts)
}

/// Load every bundled dataset found in `dir`. Missing files are skipped.
pub fn load_datasets(dir: &Path) -> Result<Vec<LabelDistribution>> {
    let mut distributions = Vec::new();
    for (file, portal) in BUNDLED_DATASETS {
        let path = dir.join(file);
        let handle = match File::open(&path) {
            Ok(handle) => handle,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("⚠️ Dataset {} not found, skipping its chart", path.display());
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let distribution = LabelDistribution::from_reader(file, portal, handle)?;
        debug!("{} rows labelled in {}", distribution.total(), file);
        distributions.push(distribution);
    }
    info!("📊 Loaded {} label distributions", distributions.len());
    Ok(distributions)
}
