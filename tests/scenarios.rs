mod util;

use rand::SeedableRng;
use rand_distr::{Distribution, Exp};
use rand_pcg::Pcg64;
use std::num::NonZeroUsize;
use std::path::Path;
use waitingroom::{
    run_load_comparison, ArrivalRecord, ArrivalSchedule, ConsultLookup, QueueSample, Scenario, ScenarioResult,
    DEFAULT_CONSULT_MINUTES, DRAIN_MINUTES,
};

fn schedule_of(arrivals: &[(&str, f64)]) -> ArrivalSchedule {
    ArrivalSchedule::new(
        arrivals
            .iter()
            .map(|&(patient_id, arrival_minutes)| ArrivalRecord {
                patient_id: patient_id.to_owned(),
                arrival_minutes,
            })
            .collect(),
    )
}

fn lookup_of(consults: &[(&str, f64)]) -> ConsultLookup {
    consults
        .iter()
        .map(|&(patient_id, minutes)| (patient_id.to_owned(), minutes))
        .collect()
}

fn run_scenario(label: &str, doctors: usize, schedule: &ArrivalSchedule, consults: &ConsultLookup) -> ScenarioResult {
    Scenario {
        label,
        doctors: NonZeroUsize::new(doctors).expect("test doctor counts are nonzero"),
        schedule,
        consults,
    }
    .run()
    .expect("scenario should complete normally")
}

/// Roll a deterministic day of patients: exponential interarrival gaps with
/// a mean of six minutes and exponential consultations with a mean of four.
fn random_day(seed: u64, patients: usize) -> (ArrivalSchedule, ConsultLookup) {
    let mut rng = Pcg64::seed_from_u64(seed);
    let interarrival = Exp::new(1.0 / 6.0).unwrap();
    let consult = Exp::new(0.25).unwrap();

    let mut records = Vec::with_capacity(patients);
    let mut consults = Vec::with_capacity(patients);
    let mut minute = 0.0;
    for i in 0..patients {
        minute += interarrival.sample(&mut rng);
        let patient_id = format!("patient-{i}");
        records.push(ArrivalRecord {
            patient_id: patient_id.clone(),
            arrival_minutes: minute,
        });
        consults.push((patient_id, consult.sample(&mut rng)));
    }
    (ArrivalSchedule::new(records), consults.into_iter().collect())
}

#[test]
fn single_doctor_serves_simultaneous_arrivals_in_order() {
    let schedule = schedule_of(&[("a", 0.0), ("b", 0.0), ("c", 5.0)]);
    let consults = lookup_of(&[("a", 10.0), ("b", 10.0), ("c", 10.0)]);

    let result = run_scenario("one doctor", 1, &schedule, &consults);

    // waits 0, 10, 15 and sojourns 10, 20, 25
    assert_eq!(3, result.patients_arrived);
    assert_eq!(3, result.patients_served);
    assert_eq!(0.0, result.min_wait, "first arrival should not wait");
    assert_eq!(15.0, result.max_wait, "third arrival waits for both consultations");
    assert_floats_near_equal!(25.0 / 3.0, result.avg_wait, "unexpected mean wait");
    assert_eq!(10.0, result.avg_consult);
    assert_floats_near_equal!(55.0 / 3.0, result.avg_total, "unexpected mean time on site");
    assert_floats_near_equal!(30.0 / 65.0, result.utilization, "unexpected utilization");
}

#[test]
fn two_doctors_split_spaced_arrivals_without_waits() {
    let schedule = schedule_of(&[("a", 0.0), ("b", 10.0)]);
    let consults = lookup_of(&[("a", 10.0), ("b", 10.0)]);

    let result = run_scenario("two doctors", 2, &schedule, &consults);

    assert_eq!(2, result.patients_served);
    assert_eq!(0.0, result.avg_wait, "no arrival should wait");
    assert_eq!(0.0, result.max_wait);
    assert_eq!(10.0, result.avg_total);
    // 20 consultation minutes across 2 doctors over a 70 minute horizon
    assert_floats_near_equal!(20.0 / 140.0, result.utilization, "unexpected utilization");
}

#[test]
fn monitor_samples_every_minute_from_zero() {
    let schedule = schedule_of(&[("a", 0.0), ("b", 0.0), ("c", 5.0)]);
    let consults = lookup_of(&[("a", 10.0), ("b", 10.0), ("c", 10.0)]);

    let result = run_scenario("census", 1, &schedule, &consults);

    // horizon 65 gives readings at minutes 0 through 65
    assert_eq!(66, result.queue_samples.len(), "unexpected number of readings");
    for (i, sample) in result.queue_samples.iter().enumerate() {
        assert_eq!(i as f64, sample.minute, "readings should fall on consecutive minutes");
    }

    // the reading runs ahead of the minute's arrivals: "b" is in line from
    // minute 1, "c" joins after the minute-5 reading and leaves the line at 20
    assert_eq!(0, result.queue_samples[0].waiting);
    assert_eq!(1, result.queue_samples[3].waiting);
    assert_eq!(1, result.queue_samples[5].waiting);
    assert_eq!(2, result.queue_samples[7].waiting);
    assert_eq!(1, result.queue_samples[15].waiting);
    assert_eq!(0, result.queue_samples[25].waiting);
}

#[test]
fn empty_schedule_yields_zeroed_result_with_single_reading() {
    let result = run_scenario("no patients", 2, &ArrivalSchedule::default(), &ConsultLookup::default());

    assert_eq!(0, result.patients_arrived);
    assert_eq!(0, result.patients_served);
    assert_eq!(0.0, result.avg_wait);
    assert_eq!(0.0, result.min_wait);
    assert_eq!(0.0, result.max_wait);
    assert_eq!(0.0, result.avg_total);
    assert_eq!(0.0, result.utilization, "zero horizon must not divide");
    assert_eq!(
        vec![QueueSample {
            minute: 0.0,
            waiting: 0
        }],
        result.queue_samples,
        "an empty day still gets its minute-zero reading"
    );
}

#[test]
fn consultation_overrunning_horizon_counts_as_busy_but_unserved() {
    let schedule = schedule_of(&[("a", 0.0)]);
    let consults = lookup_of(&[("a", 120.0)]);

    let result = run_scenario("overrun", 1, &schedule, &consults);

    assert_eq!(1, result.patients_arrived);
    assert_eq!(0, result.patients_served, "the departure falls past the horizon");
    assert_eq!(120.0, result.avg_consult);
    assert_eq!(0.0, result.avg_total, "no departure was observed");
    // the full consultation is booked at its start, 120 minutes against a
    // 60 minute horizon
    assert_eq!(2.0, result.utilization);
}

#[test]
fn unknown_patients_get_the_standard_slot() {
    let schedule = schedule_of(&[("walk-in", 0.0)]);

    let result = run_scenario("walk-in", 1, &schedule, &ConsultLookup::default());

    assert_eq!(1, result.patients_served);
    assert_eq!(DEFAULT_CONSULT_MINUTES, result.avg_consult);
    assert_eq!(DEFAULT_CONSULT_MINUTES, result.avg_total);
    assert_floats_near_equal!(
        DEFAULT_CONSULT_MINUTES / 60.0,
        result.utilization,
        "unexpected utilization"
    );
}

#[test]
fn load_comparison_covers_the_three_staffing_presets() {
    let (schedule, consults) = random_day(11434450237083315284, 40);

    let results =
        run_load_comparison(&schedule, &consults, NonZeroUsize::new(2).unwrap()).expect("comparison should complete");

    assert_eq!(3, results.len());
    let labels: Vec<&str> = results.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(vec!["Normal Load", "Peak Load", "Improved Peak Load"], labels);
    assert_eq!(vec![2, 2, 4], results.iter().map(|r| r.doctors).collect::<Vec<_>>());
    assert_eq!(
        vec![40, 80, 80],
        results.iter().map(|r| r.patients_arrived).collect::<Vec<_>>()
    );

    let expected_readings = (schedule.last_arrival().unwrap() + DRAIN_MINUTES).floor() as usize + 1;
    for result in &results {
        assert!(
            result.patients_served <= result.patients_arrived,
            "{}: served more than arrived",
            result.label
        );
        assert!(
            result.min_wait <= result.avg_wait + 1e-9 && result.avg_wait <= result.max_wait + 1e-9,
            "{}: wait summary out of order",
            result.label
        );
        assert!(result.utilization >= 0.0, "{}: negative utilization", result.label);
        assert_eq!(
            expected_readings,
            result.queue_samples.len(),
            "{}: unexpected number of queue readings",
            result.label
        );
        if result.patients_served == result.patients_arrived {
            assert_floats_near_equal!(
                result.avg_wait + result.avg_consult,
                result.avg_total,
                "time on site should decompose into wait plus consultation"
            );
        }
    }

    // doubling patients and doctors together should leave the doctors about
    // as loaded as the baseline
    let baseline = &results[0];
    let improved = &results[2];
    assert!(
        (baseline.utilization - improved.utilization).abs() < 0.05,
        "doubled load at doubled capacity drifted from baseline utilization: {} vs {}",
        baseline.utilization,
        improved.utilization
    );
}

#[test]
fn shipped_dataset_loads_and_runs() {
    let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let schedule = ArrivalSchedule::from_csv(&data.join("patients.csv")).expect("patients.csv should load");
    let consults = ConsultLookup::from_csv(&data.join("services.csv")).expect("services.csv should load");

    assert!(!schedule.is_empty());
    assert!(!consults.is_empty());
    assert!(
        consults.len() < schedule.len(),
        "some patients should be missing a consultation record"
    );

    let results =
        run_load_comparison(&schedule, &consults, NonZeroUsize::new(2).unwrap()).expect("comparison should complete");
    assert_eq!(schedule.len(), results[0].patients_arrived);
    assert_eq!(schedule.len() * 2, results[1].patients_arrived);
    for result in &results {
        assert!(result.patients_served <= result.patients_arrived);
        assert!(result.avg_consult > 0.0);
    }
}
