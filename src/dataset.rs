use chrono::NaiveDateTime;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Consultation length assumed for a patient the service log has no entry
/// for, in minutes.
pub const DEFAULT_CONSULT_MINUTES: f64 = 15.0;

/// Errors raised while loading the clinic's CSV exports.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("unparseable timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("service for patient {patient_id} ends before it starts")]
    NegativeService { patient_id: String },
}

#[derive(Debug, Deserialize)]
struct PatientRow {
    patient_id: String,
    arrival_time: String,
}

#[derive(Debug, Deserialize)]
struct ServiceRow {
    patient_id: String,
    service_type: String,
    service_start_time: String,
    service_end_time: String,
}

/// One patient due to arrive, as an offset in minutes from the start of the
/// simulated day.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalRecord {
    pub patient_id: String,
    pub arrival_minutes: f64,
}

/// The day's arrivals, normalized to minute offsets from the earliest one
/// and sorted ascending.
#[derive(Debug, Clone, Default)]
pub struct ArrivalSchedule {
    records: Vec<ArrivalRecord>,
}

impl ArrivalSchedule {
    /// Build a schedule from raw records, sorting them by arrival time. The
    /// sort is stable, so records sharing an arrival keep their given order.
    pub fn new(mut records: Vec<ArrivalRecord>) -> Self {
        records.sort_by(|a, b| a.arrival_minutes.total_cmp(&b.arrival_minutes));
        Self { records }
    }

    /// Load a schedule from a `patient_id, arrival_time` CSV export.
    /// Timestamps are converted to minute offsets from the earliest arrival
    /// in the file.
    ///
    /// # Errors
    ///
    /// Returns a [`DatasetError`] if the file cannot be read, a row does not
    /// match the expected shape, or a timestamp fails to parse.
    pub fn from_csv(path: &Path) -> Result<Self, DatasetError> {
        let mut reader = csv::Reader::from_path(path).map_err(|source| DatasetError::Csv {
            path: path.display().to_string(),
            source,
        })?;

        let mut arrivals = Vec::new();
        for row in reader.deserialize() {
            let row: PatientRow = row.map_err(|source| DatasetError::Csv {
                path: path.display().to_string(),
                source,
            })?;
            let timestamp = parse_timestamp(&row.arrival_time)?;
            arrivals.push((row.patient_id, timestamp));
        }

        let records = match arrivals.iter().map(|(_, timestamp)| *timestamp).min() {
            Some(earliest) => arrivals
                .into_iter()
                .map(|(patient_id, timestamp)| ArrivalRecord {
                    patient_id,
                    arrival_minutes: minutes_between(earliest, timestamp),
                })
                .collect(),
            None => Vec::new(),
        };
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[ArrivalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Minute of the earliest scheduled arrival, if any.
    pub fn first_arrival(&self) -> Option<f64> {
        self.records.first().map(|record| record.arrival_minutes)
    }

    /// Minute of the latest scheduled arrival, if any.
    pub fn last_arrival(&self) -> Option<f64> {
        self.records.last().map(|record| record.arrival_minutes)
    }

    /// Double the day's load for the peak scenario: every record appears
    /// twice, and the combined schedule is re-sorted. Each copy keeps its
    /// own patient id together with its arrival time, so a duplicated
    /// patient still looks up the same consultation length.
    pub fn doubled(&self) -> Self {
        let mut records = Vec::with_capacity(self.records.len() * 2);
        records.extend(self.records.iter().cloned());
        records.extend(self.records.iter().cloned());
        Self::new(records)
    }
}

/// Consultation lengths by patient id, derived from the clinic's service
/// log.
#[derive(Debug, Clone, Default)]
pub struct ConsultLookup {
    minutes_by_patient: HashMap<String, f64>,
}

impl ConsultLookup {
    /// Derive consultation lengths from a
    /// `patient_id, service_type, service_start_time, service_end_time` CSV
    /// export. Only rows whose `service_type` is `consultation` contribute;
    /// when a patient has several, the last row wins.
    ///
    /// # Errors
    ///
    /// Returns a [`DatasetError`] if the file cannot be read, a row does not
    /// match the expected shape, a timestamp fails to parse, or a
    /// consultation ends before it starts.
    pub fn from_csv(path: &Path) -> Result<Self, DatasetError> {
        let mut reader = csv::Reader::from_path(path).map_err(|source| DatasetError::Csv {
            path: path.display().to_string(),
            source,
        })?;

        let mut minutes_by_patient = HashMap::new();
        for row in reader.deserialize() {
            let row: ServiceRow = row.map_err(|source| DatasetError::Csv {
                path: path.display().to_string(),
                source,
            })?;
            if row.service_type.trim() != "consultation" {
                continue;
            }

            let start = parse_timestamp(&row.service_start_time)?;
            let end = parse_timestamp(&row.service_end_time)?;
            let minutes = minutes_between(start, end);
            if minutes < 0.0 {
                return Err(DatasetError::NegativeService {
                    patient_id: row.patient_id,
                });
            }
            minutes_by_patient.insert(row.patient_id, minutes);
        }
        Ok(Self { minutes_by_patient })
    }

    /// Consultation length for the given patient, falling back to the
    /// standard slot when the service log has no entry.
    pub fn minutes_for(&self, patient_id: &str) -> f64 {
        match self.minutes_by_patient.get(patient_id) {
            Some(&minutes) => minutes,
            None => {
                debug!(
                    patient_id,
                    fallback = DEFAULT_CONSULT_MINUTES,
                    "no consultation on record, using the standard slot"
                );
                DEFAULT_CONSULT_MINUTES
            }
        }
    }

    pub fn len(&self) -> usize {
        self.minutes_by_patient.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minutes_by_patient.is_empty()
    }
}

impl FromIterator<(String, f64)> for ConsultLookup {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            minutes_by_patient: iter.into_iter().collect(),
        }
    }
}

/// Parse a timestamp in the clinic exports' `2024-03-04 08:00:00` shape,
/// also accepting a `T` separator.
fn parse_timestamp(value: &str) -> Result<NaiveDateTime, DatasetError> {
    let trimmed = value.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|source| DatasetError::Timestamp {
            value: value.to_owned(),
            source,
        })
}

fn minutes_between(earlier: NaiveDateTime, later: NaiveDateTime) -> f64 {
    (later - earlier).num_seconds() as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn record(patient_id: &str, arrival_minutes: f64) -> ArrivalRecord {
        ArrivalRecord {
            patient_id: patient_id.to_owned(),
            arrival_minutes,
        }
    }

    #[test]
    fn schedule_sorts_by_arrival_and_keeps_ties_stable() {
        let schedule = ArrivalSchedule::new(vec![record("late", 30.0), record("a", 5.0), record("b", 5.0)]);

        let ids: Vec<&str> = schedule.records().iter().map(|r| r.patient_id.as_str()).collect();
        assert_eq!(vec!["a", "b", "late"], ids);
        assert_eq!(Some(5.0), schedule.first_arrival());
        assert_eq!(Some(30.0), schedule.last_arrival());
    }

    #[test]
    fn doubling_duplicates_whole_records() {
        let schedule = ArrivalSchedule::new(vec![record("a", 0.0), record("b", 10.0)]);
        let doubled = schedule.doubled();

        assert_eq!(4, doubled.len());
        let pairs: Vec<(&str, f64)> = doubled
            .records()
            .iter()
            .map(|r| (r.patient_id.as_str(), r.arrival_minutes))
            .collect();
        assert_eq!(vec![("a", 0.0), ("a", 0.0), ("b", 10.0), ("b", 10.0)], pairs);
    }

    #[test]
    fn lookup_falls_back_to_standard_slot() {
        let lookup: ConsultLookup = [("known".to_owned(), 25.0)].into_iter().collect();

        assert_eq!(25.0, lookup.minutes_for("known"));
        assert_eq!(DEFAULT_CONSULT_MINUTES, lookup.minutes_for("unknown"));
    }

    #[test]
    fn consultation_ending_before_it_starts_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("services.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "patient_id,service_type,service_start_time,service_end_time").unwrap();
        writeln!(file, "backwards,consultation,2024-03-04 09:30:00,2024-03-04 09:00:00").unwrap();
        file.flush().unwrap();

        let error = ConsultLookup::from_csv(&path).unwrap_err();
        match error {
            DatasetError::NegativeService { patient_id } => assert_eq!("backwards", patient_id),
            other => panic!("expected a negative-service error, got {other}"),
        }
    }

    #[test]
    fn later_consultation_row_replaces_an_earlier_one() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("services.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "patient_id,service_type,service_start_time,service_end_time").unwrap();
        writeln!(file, "repeat,consultation,2024-03-04 09:00:00,2024-03-04 09:10:00").unwrap();
        writeln!(file, "repeat,consultation,2024-03-04 14:00:00,2024-03-04 14:25:00").unwrap();
        file.flush().unwrap();

        let lookup = ConsultLookup::from_csv(&path).unwrap();
        assert_eq!(1, lookup.len());
        assert_eq!(25.0, lookup.minutes_for("repeat"));
    }

    #[test]
    fn timestamps_parse_with_either_separator() {
        let spaced = parse_timestamp("2024-03-04 08:30:00").unwrap();
        let tee = parse_timestamp("2024-03-04T08:30:00").unwrap();
        assert_eq!(spaced, tee);

        assert!(parse_timestamp("not a time").is_err());
    }

    #[test]
    fn minute_spans_keep_second_precision() {
        let start = parse_timestamp("2024-03-04 08:00:00").unwrap();
        let end = parse_timestamp("2024-03-04 08:12:30").unwrap();
        assert_eq!(12.5, minutes_between(start, end));
    }
}
