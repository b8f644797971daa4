//! End-to-end runs of the classic exercise-sheet workloads.

use cpu_sched_sim::experiments::{sweep_exec_time_orderings, workloads};
use cpu_sched_sim::models::{ProcessId, ProcessSpec};
use cpu_sched_sim::scheduler::{ProcessState, Scheduler, SimulationKpi, SimulationRequest, Strategy};
use cpu_sched_sim::SimError;

fn run(strategy: Strategy, cpu_count: usize, specs: &[ProcessSpec]) -> Scheduler {
    let mut scheduler = SimulationRequest::new(strategy)
        .with_cpu_count(cpu_count)
        .with_specs(specs)
        .build()
        .unwrap();
    scheduler.run_to_completion().unwrap();
    scheduler
}

fn completions(scheduler: &Scheduler) -> Vec<(ProcessId, u64)> {
    scheduler
        .outcomes()
        .iter()
        .map(|o| (o.pid, o.completion_time))
        .collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn fcfs_batch() {
    let scheduler = run(Strategy::NpFcfs, 1, &workloads::TEXTBOOK_BATCH);
    assert_close(scheduler.average_turnaround_time().unwrap(), 29.0);
    assert_eq!(scheduler.time(), 40);
    assert_eq!(
        completions(&scheduler),
        vec![(1, 22), (2, 24), (3, 27), (4, 32), (5, 40)]
    );
    assert_eq!(scheduler.preemption_count(), 0);
}

#[test]
fn sjf_batch() {
    let scheduler = run(Strategy::NpSjf, 1, &workloads::TEXTBOOK_BATCH);
    assert_close(scheduler.average_turnaround_time().unwrap(), 15.0);
    assert_eq!(
        completions(&scheduler),
        vec![(1, 40), (2, 2), (3, 5), (4, 10), (5, 18)]
    );
}

#[test]
fn preemptive_sjf_matches_sjf_when_all_ready_at_once() {
    let np = run(Strategy::NpSjf, 1, &workloads::TEXTBOOK_BATCH);
    let p = run(Strategy::PSjf, 1, &workloads::TEXTBOOK_BATCH);
    assert_eq!(completions(&np), completions(&p));
    assert_eq!(p.preemption_count(), 0);
}

#[test]
fn round_robin_batch() {
    let scheduler = run(
        Strategy::RoundRobin { quantum: 3 },
        1,
        &workloads::TEXTBOOK_BATCH,
    );
    // Finish times 40, 5, 8, 19, 27
    assert_close(scheduler.average_turnaround_time().unwrap(), 19.8);
    assert_eq!(scheduler.time(), 40);
    assert_eq!(scheduler.allocation_history().len(), 40);

    let kpi = SimulationKpi::calculate(&scheduler);
    assert_eq!(kpi.makespan, 40);
    assert_close(kpi.avg_utilization, 1.0);
}

#[test]
fn round_robin_ignores_cpu_count() {
    let scheduler = run(
        Strategy::RoundRobin { quantum: 3 },
        4,
        &workloads::TEXTBOOK_BATCH,
    );
    assert_eq!(scheduler.cpus().len(), 1);
    assert_eq!(scheduler.time(), 40);
}

#[test]
fn staggered_arrivals_favor_preemption() {
    let np = run(Strategy::NpSjf, 1, &workloads::TEXTBOOK_STAGGERED);
    let p = run(Strategy::PSjf, 1, &workloads::TEXTBOOK_STAGGERED);
    assert!(p.preemption_count() > 0);
    assert!(p.average_turnaround_time().unwrap() < np.average_turnaround_time().unwrap());
    assert_eq!(np.time(), p.time());
}

#[test]
fn preemptive_edf_on_two_cpus() {
    let scheduler = run(Strategy::PEdf, 2, &workloads::TEXTBOOK_DEADLINES);
    assert_eq!(completions(&scheduler), vec![(1, 4), (2, 5), (3, 12)]);
    assert_close(scheduler.average_turnaround_time().unwrap(), 7.0);
    assert_eq!(scheduler.time(), 12);

    let kpi = SimulationKpi::calculate(&scheduler);
    assert_eq!(kpi.total_tardiness, 2);
}

#[test]
fn non_preemptive_llf_runs_least_slack_first() {
    // Static laxities 5, 4, 2
    let scheduler = run(Strategy::NpLlf, 2, &workloads::TEXTBOOK_DEADLINES);
    assert_eq!(completions(&scheduler), vec![(1, 9), (2, 5), (3, 8)]);
    assert_close(scheduler.average_turnaround_time().unwrap(), 22.0 / 3.0);
}

#[test]
fn every_strategy_finishes_deadline_workload() {
    for strategy in Strategy::all(2) {
        let scheduler = run(strategy, 2, &workloads::TEXTBOOK_DEADLINES_TIGHT);
        assert!(scheduler.is_complete(), "{strategy} did not complete");
        for process in scheduler.processes() {
            assert!(process.is_finished());
            assert_eq!(
                scheduler.process_state(process.id),
                Some(ProcessState::Finished)
            );
        }
    }
}

#[test]
fn identical_runs_produce_identical_logs() {
    for strategy in Strategy::all(3) {
        let a = run(strategy, 2, &workloads::TEXTBOOK_STAGGERED);
        let b = run(strategy, 2, &workloads::TEXTBOOK_STAGGERED);
        assert_eq!(a.log(), b.log());
        assert_eq!(a.allocation_history(), b.allocation_history());
    }
}

#[test]
fn log_is_human_readable() {
    let scheduler = run(Strategy::NpFcfs, 1, &workloads::TEXTBOOK_BATCH);
    let lines: Vec<String> = scheduler.log().iter().map(ToString::to_string).collect();
    assert_eq!(lines[0], "[TIME =  0] Allocated process 1 to CPU #1");
    assert_eq!(
        lines.last().map(String::as_str),
        Some("[TIME = 40] Average turnaround time was 29")
    );
}

#[test]
fn step_after_completion_is_a_no_op() {
    let mut scheduler = run(Strategy::NpFcfs, 1, &workloads::TEXTBOOK_BATCH);
    let log_len = scheduler.log().len();
    assert!(!scheduler.step().unwrap());
    assert_eq!(scheduler.time(), 40);
    assert_eq!(scheduler.log().len(), log_len);
}

#[test]
fn empty_workload_completes_immediately() {
    let mut scheduler = SimulationRequest::new(Strategy::NpFcfs).build().unwrap();
    assert!(!scheduler.step().unwrap());
    assert_eq!(scheduler.time(), 0);
    assert!(matches!(
        scheduler.average_turnaround_time(),
        Err(SimError::EmptyResult)
    ));
}

#[test]
fn invalid_requests_are_rejected() {
    let err = SimulationRequest::new(Strategy::RoundRobin { quantum: 0 })
        .with_specs(&[ProcessSpec::new(0, 0)])
        .build()
        .unwrap_err();
    match err {
        SimError::InvalidConfiguration(errors) => assert_eq!(errors.len(), 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn request_from_json() {
    let json = r#"{
        "strategy": { "kind": "round-robin", "quantum": 3 },
        "processes": [
            { "id": 1, "ready_time": 0, "exec_time": 22 },
            { "id": 2, "ready_time": 0, "exec_time": 2 },
            { "id": 3, "ready_time": 0, "exec_time": 3 },
            { "id": 4, "ready_time": 0, "exec_time": 5 },
            { "id": 5, "ready_time": 0, "exec_time": 8 }
        ]
    }"#;
    let request: SimulationRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.cpu_count, 1);

    let mut scheduler = Scheduler::from_request(&request).unwrap();
    scheduler.run_to_completion().unwrap();
    assert_close(scheduler.average_turnaround_time().unwrap(), 19.8);
}

#[test]
fn strategy_names_parse() {
    let strategy: Strategy = "rr:3".parse().unwrap();
    assert_eq!(strategy, Strategy::RoundRobin { quantum: 3 });
    assert_eq!("p-llf".parse::<Strategy>().unwrap(), Strategy::PLlf);
    assert!("lottery".parse::<Strategy>().is_err());
}

#[test]
fn exec_time_sweep_finds_sjf_order() {
    let ranked =
        sweep_exec_time_orderings(&workloads::TEXTBOOK_BATCH, Strategy::NpFcfs, 1).unwrap();
    assert_eq!(ranked[0].ordering, vec![2, 3, 5, 8, 22]);
    assert_close(ranked[0].average_turnaround, 15.0);
}
