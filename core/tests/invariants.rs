//! Structural invariants of the generated tables, checked across seeds.

use cohort_core::{config::GeneratorConfig, dataset::Dataset, generator::generate};

fn datasets() -> Vec<Dataset> {
    let mut out = Vec::new();
    for seed in [1u64, 7, 42, 123, 0xFEED_BEEF] {
        for p_attend in [0.0, 0.5, 0.8, 1.0] {
            let config = GeneratorConfig {
                p_attend,
                seed,
                ..GeneratorConfig::default_test()
            };
            out.push(generate(&config).unwrap());
        }
    }
    out
}

#[test]
fn row_count_equals_total_scheduled_visits() {
    for ds in datasets() {
        let expected: u64 = ds.profiles.iter().map(|p| p.total_visits as u64).sum();
        assert_eq!(ds.visits.len() as u64, expected);
    }
}

#[test]
fn every_subject_has_at_least_one_visit() {
    for ds in datasets() {
        for p in &ds.profiles {
            assert!(p.total_visits >= 1, "Subject {} has no visits", p.id);
        }
    }
}

#[test]
fn subject_ids_run_from_one_to_n() {
    let config = GeneratorConfig::default_test();
    let ds = generate(&config).unwrap();
    let ids: Vec<u32> = ds.profiles.iter().map(|p| p.id).collect();
    let expected: Vec<u32> = (1..=config.n_subjects as u32).collect();
    assert_eq!(ids, expected);
}

#[test]
fn appointment_index_is_contiguous_per_subject() {
    for ds in datasets() {
        for p in &ds.profiles {
            let indices: Vec<u32> = ds.visits_for(p.id).iter().map(|v| v.appointment_index).collect();
            let expected: Vec<u32> = (1..=p.total_visits).collect();
            assert_eq!(indices, expected, "Subject {} has a broken schedule", p.id);
        }
    }
}

#[test]
fn rows_are_in_subject_then_appointment_order() {
    for ds in datasets() {
        let keys: Vec<(u32, u32)> = ds.visits.iter().map(|v| (v.subject_id, v.appointment_index)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}

#[test]
fn elapsed_day_is_running_sum_of_gaps() {
    for ds in datasets() {
        for p in &ds.profiles {
            let rows = ds.visits_for(p.id);
            let mut running = 0.0;
            let mut previous = 0.0;
            for v in rows {
                assert!(v.gap_days >= 0.0, "Negative gap {}", v.gap_days);
                running += v.gap_days;
                assert_eq!(v.elapsed_day, running);
                assert!(v.elapsed_day >= previous, "elapsed_day decreased for subject {}", p.id);
                previous = v.elapsed_day;
            }
        }
    }
}

#[test]
fn gaps_respect_max_gap() {
    let config = GeneratorConfig::default_test();
    let ds = generate(&config).unwrap();
    for v in &ds.visits {
        assert!(
            v.gap_days >= 0.0 && v.gap_days <= config.max_gap_days,
            "Gap {} outside [0, {}]",
            v.gap_days,
            config.max_gap_days
        );
    }
}

#[test]
fn measured_value_present_iff_attended() {
    for ds in datasets() {
        for v in &ds.visits {
            assert_eq!(
                v.measured_value.is_some(),
                v.attended,
                "Subject {} visit {}: attended={} value={:?}",
                v.subject_id,
                v.appointment_index,
                v.attended,
                v.measured_value
            );
        }
    }
}

#[test]
fn attendance_counts_are_consistent() {
    for ds in datasets() {
        for p in &ds.profiles {
            let rows = ds.visits_for(p.id);
            let total = rows.iter().filter(|v| v.attended).count() as u32;
            let mut previous = 0;
            for v in rows {
                assert_eq!(v.total_attended, total, "total_attended not broadcast");
                assert!(v.attended_count_so_far >= previous);
                assert!(v.attended_count_so_far <= v.total_attended);
                assert!(v.gender == p.gender);
                previous = v.attended_count_so_far;
            }
            let last = rows.last().unwrap();
            assert_eq!(last.attended_count_so_far, last.total_attended);
            assert!(last.total_attended <= p.total_visits);
        }
    }
}

#[test]
fn summaries_agree_with_tables() {
    let ds = generate(&GeneratorConfig::default_test()).unwrap();
    let summary = ds.summary();
    assert_eq!(summary.subjects, ds.profiles.len());
    assert_eq!(summary.visits, ds.visits.len());
    assert_eq!(summary.attended + summary.no_shows, summary.visits);
    assert_eq!(summary.attended, ds.measured_points().len());

    let per_subject = ds.subject_summaries();
    assert_eq!(per_subject.len(), ds.profiles.len());
    let attended_sum: u32 = per_subject.iter().map(|s| s.total_attended).sum();
    assert_eq!(attended_sum as usize, summary.attended);
}
