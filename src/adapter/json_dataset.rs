use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{City, Pollutant, PollutionRecord};
use crate::error::DatasetError;

/// Station series for every (city, pollutant) pair, loaded once at startup
/// and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct DatasetCatalog {
    series: HashMap<(City, Pollutant), Arc<[PollutionRecord]>>,
}

impl DatasetCatalog {
    /// File holding the series for `city` and `pollutant`, relative to the
    /// data directory.
    #[must_use]
    pub fn file_name(city: City, pollutant: Pollutant) -> String {
        format!(
            "pollution_data_{}{}.json",
            city.data_source().name().to_lowercase(),
            pollutant.file_code()
        )
    }

    /// Loads every series from `dir`. A missing file leaves that series
    /// empty.
    ///
    /// # Errors
    /// Returns [`DatasetError`] when a file exists but cannot be read or
    /// parsed.
    pub fn load_dir(dir: &Path) -> Result<Self, DatasetError> {
        let mut by_file: HashMap<String, Arc<[PollutionRecord]>> = HashMap::new();
        let mut series = HashMap::new();

        for city in City::ALL {
            for pollutant in Pollutant::ALL {
                let file_name = Self::file_name(city, pollutant);
                let records = match by_file.get(&file_name) {
                    Some(records) => Arc::clone(records),
                    None => {
                        let records = load_file(&dir.join(&file_name))?;
                        by_file.insert(file_name, Arc::clone(&records));
                        records
                    }
                };
                series.insert((city, pollutant), records);
            }
        }

        info!(
            dir = %dir.display(),
            files = by_file.len(),
            "pollution datasets loaded"
        );
        Ok(Self { series })
    }

    /// Catalog built from in-memory series, for tests and embedding.
    #[must_use]
    pub fn from_series(
        series: impl IntoIterator<Item = ((City, Pollutant), Vec<PollutionRecord>)>,
    ) -> Self {
        Self {
            series: series
                .into_iter()
                .map(|(key, records)| (key, Arc::from(records)))
                .collect(),
        }
    }

    #[must_use]
    pub fn records(&self, city: City, pollutant: Pollutant) -> Arc<[PollutionRecord]> {
        self.series
            .get(&(city, pollutant))
            .cloned()
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }
}

fn load_file(path: &Path) -> Result<Arc<[PollutionRecord]>, DatasetError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "pollution dataset missing, using empty series");
            return Ok(Arc::from(Vec::new()));
        }
        Err(source) => {
            return Err(DatasetError::Read {
                path: path.display().to_string(),
                source,
            });
        }
    };

    let records: Vec<PollutionRecord> =
        serde_json::from_str(&raw).map_err(|source| DatasetError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Arc::from(records))
}
