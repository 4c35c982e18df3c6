use std::path::{Path, PathBuf};

use gmx_core::{CpuType, ExperimentConfig, GmxError, Isa, Mode};
use gmx_orch::{
    Disposition, ExitEvent, ExitEventDispatcher, ExperimentRun, Phase, Simulator,
    CHECKPOINT_FAIL_CODE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Dump,
    Reset,
    Checkpoint(PathBuf),
    Schedule(u64),
}

#[derive(Debug, Default)]
struct RecordingSim {
    actions: Vec<Action>,
    exit_code: i64,
}

impl RecordingSim {
    fn checkpoints(&self) -> usize {
        self.actions
            .iter()
            .filter(|action| matches!(action, Action::Checkpoint(_)))
            .count()
    }
}

impl Simulator for RecordingSim {
    fn dump_statistics(&mut self) -> Result<(), GmxError> {
        self.actions.push(Action::Dump);
        Ok(())
    }

    fn reset_statistics(&mut self) -> Result<(), GmxError> {
        self.actions.push(Action::Reset);
        Ok(())
    }

    fn take_checkpoint(&mut self, path: &Path) -> Result<(), GmxError> {
        self.actions.push(Action::Checkpoint(path.to_path_buf()));
        Ok(())
    }

    fn schedule_instruction_stop(&mut self, delta: u64) -> Result<(), GmxError> {
        self.actions.push(Action::Schedule(delta));
        Ok(())
    }

    fn last_exit_code(&self) -> i64 {
        self.exit_code
    }
}

fn config(mode: Mode, delta: u64, ceiling: u64) -> ExperimentConfig {
    ExperimentConfig {
        mode,
        isa: Isa::Arm,
        cpu_type: CpuType::O3,
        workload: "nodeapp".to_string(),
        inst_delta: delta,
        inst_ceiling: ceiling,
        invocations: 10,
        warming: 100,
        checkpoint_root: PathBuf::from("wkdir"),
    }
}

#[test]
fn setup_run_walks_the_full_phase_sequence() {
    let mut sim = RecordingSim::default();
    let run = ExperimentRun::new(&config(Mode::Setup, 100, 1000)).unwrap();
    let mut dispatcher = ExitEventDispatcher::new(run, &mut sim);

    let script = [
        (ExitEvent::Exit, Phase::Booted, Disposition::Continue),
        (ExitEvent::Exit, Phase::ContainerStarted, Disposition::Continue),
        (ExitEvent::Exit, Phase::ContainerPinned, Disposition::Continue),
        (
            ExitEvent::Fail(CHECKPOINT_FAIL_CODE),
            Phase::Checkpointed,
            Disposition::Continue,
        ),
        (ExitEvent::Exit, Phase::Done, Disposition::Terminate),
    ];
    for (event, phase, disposition) in script {
        assert_eq!(dispatcher.dispatch(event).unwrap(), disposition);
        assert_eq!(dispatcher.run().phase(), phase);
    }

    assert_eq!(sim.checkpoints(), 1);
    assert_eq!(
        sim.actions,
        vec![
            Action::Checkpoint(PathBuf::from("wkdir/arm64/checkpoints/nodeapp")),
            Action::Dump,
            Action::Reset,
            Action::Dump,
        ]
    );
}

#[test]
fn checkpoint_request_after_done_is_a_flush_only_noop() {
    let mut sim = RecordingSim::default();
    let run = ExperimentRun::new(&config(Mode::Setup, 100, 1000)).unwrap();
    let mut dispatcher = ExitEventDispatcher::new(run, &mut sim);
    for event in [
        ExitEvent::Exit,
        ExitEvent::Exit,
        ExitEvent::Exit,
        ExitEvent::Fail(CHECKPOINT_FAIL_CODE),
        ExitEvent::Exit,
    ] {
        dispatcher.dispatch(event).unwrap();
    }
    let run = dispatcher.into_run();
    let actions_before = sim.actions.len();

    // A straggler fail(4) after termination must not snapshot again.
    let mut dispatcher = ExitEventDispatcher::new(run, &mut sim);
    assert_eq!(
        dispatcher
            .dispatch(ExitEvent::Fail(CHECKPOINT_FAIL_CODE))
            .unwrap(),
        Disposition::Terminate
    );
    assert_eq!(dispatcher.run().phase(), Phase::Done);
    assert_eq!(sim.checkpoints(), 1);
    assert_eq!(
        sim.actions[actions_before..],
        [Action::Dump, Action::Reset]
    );
}

#[test]
fn eval_run_terminates_when_the_budget_is_exhausted() {
    let mut sim = RecordingSim::default();
    let run = ExperimentRun::new(&config(Mode::Eval, 100, 250)).unwrap();
    let mut dispatcher = ExitEventDispatcher::new(run, &mut sim);

    assert_eq!(
        dispatcher.dispatch(ExitEvent::MaxInstructions).unwrap(),
        Disposition::Continue
    );
    assert_eq!(dispatcher.run().instructions(), 100);
    assert_eq!(
        dispatcher.dispatch(ExitEvent::MaxInstructions).unwrap(),
        Disposition::Continue
    );
    assert_eq!(dispatcher.run().instructions(), 200);
    assert_eq!(
        dispatcher.dispatch(ExitEvent::MaxInstructions).unwrap(),
        Disposition::Terminate
    );
    assert_eq!(dispatcher.run().instructions(), 300);
    assert_eq!(dispatcher.run().phase(), Phase::Done);

    // Every window flushes before resetting, then re-arms the next stop.
    assert_eq!(
        sim.actions,
        vec![
            Action::Dump,
            Action::Reset,
            Action::Schedule(100),
            Action::Dump,
            Action::Reset,
            Action::Schedule(100),
            Action::Dump,
            Action::Reset,
            Action::Schedule(100),
        ]
    );
}

#[test]
fn out_of_order_exit_fails_the_run_hard() {
    let mut sim = RecordingSim::default();
    let run = ExperimentRun::new(&config(Mode::Setup, 100, 1000)).unwrap();
    let mut dispatcher = ExitEventDispatcher::new(run, &mut sim);
    for _ in 0..3 {
        dispatcher.dispatch(ExitEvent::Exit).unwrap();
    }
    // Expected next step is fail(4); a bare exit means the guest diverged.
    let err = dispatcher.dispatch(ExitEvent::Exit).unwrap_err();
    assert_eq!(err.info().code, "protocol-event-order");
    assert_eq!(dispatcher.run().phase(), Phase::Failed);
}

#[test]
fn unexpected_fail_code_fails_an_eval_run() {
    let mut sim = RecordingSim::default();
    let run = ExperimentRun::new(&config(Mode::Eval, 100, 1000)).unwrap();
    let mut dispatcher = ExitEventDispatcher::new(run, &mut sim);
    assert!(dispatcher.dispatch(ExitEvent::Fail(7)).is_err());
    assert_eq!(dispatcher.run().phase(), Phase::Failed);
    assert!(sim.actions.is_empty());
}

#[test]
fn dispatch_fail_reads_the_code_from_the_simulator() {
    let mut sim = RecordingSim {
        exit_code: CHECKPOINT_FAIL_CODE,
        ..RecordingSim::default()
    };
    let run = ExperimentRun::new(&config(Mode::Setup, 100, 1000)).unwrap();
    let mut dispatcher = ExitEventDispatcher::new(run, &mut sim);
    for _ in 0..3 {
        dispatcher.dispatch(ExitEvent::Exit).unwrap();
    }
    assert_eq!(dispatcher.dispatch_fail().unwrap(), Disposition::Continue);
    assert_eq!(dispatcher.run().phase(), Phase::Checkpointed);
    assert!(dispatcher.run().checkpoint_taken());
    assert_eq!(sim.checkpoints(), 1);
}
