//! GaffSearch - 試行錯誤でシーケンスを満たす cycle 列を探す
//!
//! # フロー（attempt 単位）
//! 1. 全 step の StepCondition / DecisionMaker 状態を初期化
//! 2. LogicEngine に 1 cycle 生成させる（保留中の決定は現在 step の DecisionMaker に順に提示）
//! 3. ResultCondition が全て true なら step の結果リストに追加
//! 4. 採否に関係なく StepCondition を評価
//!    - Fail: attempt を破棄して step 0 からやり直し
//!    - 全て Found: step を確定して次へ
//! 5. 最後の step が確定したら成功
//!
//! 予算（attempt 数・cycle 数・期限）が尽きたら `GaffError` で終わる。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::domain::{
    AttemptId, AttemptRecord, CycleResult, Decision, DecisionDefinition, DecisionOutcome,
    DecisionRecord, DeferredDefinition, GaffError, RuleFormat, SearchEvent, SearchId,
    StageGaffResult, StepConditionResult,
};
use crate::impls::TracingEventSink;
use crate::ports::{
    Clock, DecisionOverride, EventSink, IdGenerator, LogicEngine, SystemClock, UlidGenerator,
};
use crate::rules::{DynDecisionMaker, RuleState};

use super::builder::{BoundRule, GaffSequence, GaffStep};

/// Outcome of a successful search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaffReport {
    pub search_id: SearchId,
    pub sequence: String,

    /// Committed results, one entry per step.
    pub stages: Vec<StageGaffResult>,

    /// Every attempt of the search, the successful one last.
    pub attempts: Vec<AttemptRecord>,

    /// Decision maker answers during the successful attempt.
    pub decisions: Vec<DecisionRecord>,
}

impl GaffReport {
    pub fn results(&self) -> impl Iterator<Item = &CycleResult> {
        self.stages.iter().flat_map(|stage| stage.results.iter())
    }

    pub fn total_win(&self) -> u64 {
        self.stages.iter().map(StageGaffResult::total_win).sum()
    }
}

enum AttemptEnd {
    Found(Vec<StageGaffResult>),
    Failed(String),
    Abandoned(String),
}

/// Per-attempt state slots, indexed `[step][rule]`.
struct AttemptSlots {
    step_conditions: Vec<Vec<RuleState>>,
    decision_makers: Vec<Vec<RuleState>>,
}

impl AttemptSlots {
    fn fresh(steps: &[GaffStep]) -> Self {
        Self {
            step_conditions: steps
                .iter()
                .map(|s| s.step_conditions.iter().map(|c| c.rule.new_state()).collect())
                .collect(),
            decision_makers: steps
                .iter()
                .map(|s| s.decision_makers.iter().map(|m| m.rule.new_state()).collect())
                .collect(),
        }
    }
}

/// `create` only runs after `valid` said yes, on the state `valid` left behind.
fn offer(
    maker: &dyn DynDecisionMaker,
    context: &str,
    deferred: &DeferredDefinition<'_>,
    state: &mut RuleState,
) -> Result<Option<DecisionOutcome>, GaffError> {
    if !maker.valid_dyn(context, deferred, state)? {
        return Ok(None);
    }
    maker.create_dyn(deferred.get(), state).map(Some)
}

/// Offers pending engine decisions to the current step's decision makers.
struct MakerOverride<'a> {
    makers: &'a [BoundRule<dyn DynDecisionMaker>],
    states: &'a mut [RuleState],
    attempt_id: AttemptId,
    step_index: usize,
    cycle: u64,
    records: &'a mut Vec<DecisionRecord>,
    sink: &'a dyn EventSink,
    error: Option<GaffError>,
}

impl DecisionOverride for MakerOverride<'_> {
    fn decide(
        &mut self,
        context: &str,
        definition: &dyn Fn() -> DecisionDefinition,
    ) -> Option<Decision> {
        if self.error.is_some() {
            return None;
        }
        let deferred = DeferredDefinition::new(definition);
        let makers = self.makers;

        for (maker, state) in makers.iter().zip(self.states.iter_mut()) {
            let outcome = match offer(maker.rule.as_ref(), context, &deferred, state) {
                Ok(Some(outcome)) => outcome,
                Ok(None) => continue,
                Err(e) => {
                    self.error = Some(e);
                    return None;
                }
            };

            let decision = outcome.decision().copied();
            self.records.push(DecisionRecord {
                attempt_id: self.attempt_id,
                step_index: self.step_index,
                cycle: self.cycle,
                context: context.to_string(),
                maker: maker.rule.describe_dyn(RuleFormat::ScriptLine),
                label: decision.and_then(|d| deferred.get().label(d.selection).map(str::to_string)),
                outcome,
            });

            match decision {
                Some(decision) => {
                    trace!(context, maker = %maker.kind, %decision, "decision forced");
                    self.sink.emit(SearchEvent::DecisionForced {
                        attempt_id: self.attempt_id,
                        context: context.to_string(),
                        selection: decision.selection,
                    });
                    return Some(decision);
                }
                None => {
                    trace!(context, maker = %maker.kind, "decision maker declined");
                }
            }
        }
        None
    }
}

/// GaffSearch は GaffSequence を LogicEngine に対して探索する
///
/// # 使用例
/// ```ignore
/// let search = GaffSearch::new(Arc::new(sequence));
/// let report = search.run(&mut engine)?;
/// ```
///
/// `GaffSearch` 自体は状態を持たないので、同じ sequence で複数の
/// engine を並行に探索できる。
pub struct GaffSearch {
    sequence: Arc<GaffSequence>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    sink: Arc<dyn EventSink>,
}

impl GaffSearch {
    pub fn new(sequence: Arc<GaffSequence>) -> Self {
        Self {
            sequence,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UlidGenerator::new(SystemClock)),
            sink: Arc::new(TracingEventSink),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn sequence(&self) -> &GaffSequence {
        &self.sequence
    }

    pub fn run(&self, engine: &mut dyn LogicEngine) -> Result<GaffReport, GaffError> {
        let search_id = self.ids.generate_search_id();
        let name = self.sequence.name();
        info!(%search_id, sequence = name, "gaff search started");
        self.sink.emit(SearchEvent::SearchStarted {
            search_id,
            sequence: name.to_string(),
        });

        let mut attempts = 0;
        let result = self.search(search_id, engine, &mut attempts);

        let found = result.is_ok();
        self.sink.emit(SearchEvent::SearchFinished {
            search_id,
            attempts,
            found,
        });
        match &result {
            Ok(report) => info!(
                %search_id,
                attempts,
                total_win = report.total_win(),
                "gaff sequence found"
            ),
            Err(e) => warn!(%search_id, attempts, error = %e, "gaff search failed"),
        }
        result
    }

    fn search(
        &self,
        search_id: SearchId,
        engine: &mut dyn LogicEngine,
        played: &mut u32,
    ) -> Result<GaffReport, GaffError> {
        let budget = self.sequence.budget();
        let started = self.clock.now();
        let mut attempts = Vec::new();

        for number in 1..=budget.max_attempts {
            *played = number;
            let attempt_id = self.ids.generate_attempt_id();
            self.sink.emit(SearchEvent::AttemptStarted {
                search_id,
                attempt_id,
                number,
            });
            debug!(%attempt_id, number, "attempt started");

            engine.begin_attempt()?;
            let mut record = AttemptRecord::new(attempt_id, number);
            let mut decisions = Vec::new();
            let end = self.attempt(engine, &mut record, &mut decisions, started)?;

            let reason = match end {
                AttemptEnd::Found(stages) => {
                    record.mark_found();
                    attempts.push(record);
                    self.sink.emit(SearchEvent::AttemptEnded {
                        attempt_id,
                        reason: "found".to_string(),
                    });
                    return Ok(GaffReport {
                        search_id,
                        sequence: self.sequence.name().to_string(),
                        stages,
                        attempts,
                        decisions,
                    });
                }
                AttemptEnd::Failed(reason) => {
                    record.mark_failed(reason.clone());
                    reason
                }
                AttemptEnd::Abandoned(reason) => {
                    record.mark_abandoned(reason.clone());
                    reason
                }
            };
            debug!(%attempt_id, cycles = record.cycles, %reason, "attempt discarded");
            self.sink.emit(SearchEvent::AttemptEnded { attempt_id, reason });
            attempts.push(record);
        }

        Err(GaffError::AttemptsExhausted {
            sequence: self.sequence.name().to_string(),
            attempts: budget.max_attempts,
        })
    }

    fn attempt(
        &self,
        engine: &mut dyn LogicEngine,
        record: &mut AttemptRecord,
        decisions: &mut Vec<DecisionRecord>,
        started: DateTime<Utc>,
    ) -> Result<AttemptEnd, GaffError> {
        let budget = self.sequence.budget();
        let steps = self.sequence.steps();
        let mut slots = AttemptSlots::fresh(steps);
        let mut stages: Vec<StageGaffResult> = Vec::with_capacity(steps.len());
        // committed results of earlier steps, in order
        let mut committed: Vec<CycleResult> = Vec::new();

        for (step_index, step) in steps.iter().enumerate() {
            record.reached_step = step_index;
            let mut stage = StageGaffResult::new(step_index, &step.name);
            let mut initial: Option<CycleResult> = None;

            loop {
                if record.cycles >= budget.max_cycles_per_attempt {
                    return Ok(AttemptEnd::Abandoned(format!(
                        "cycle budget of {} exhausted in step '{}'",
                        budget.max_cycles_per_attempt, step.name
                    )));
                }
                self.check_deadline(started)?;

                let mut overrides = MakerOverride {
                    makers: step.decision_makers.as_slice(),
                    states: slots.decision_makers[step_index].as_mut_slice(),
                    attempt_id: record.attempt_id,
                    step_index,
                    cycle: record.cycles,
                    records: &mut *decisions,
                    sink: self.sink.as_ref(),
                    error: None,
                };
                let played = engine.play_cycle(&mut overrides);
                if let Some(e) = overrides.error.take() {
                    return Err(e);
                }
                let result = played?;
                record.cycles += 1;

                let initial: &CycleResult = initial.get_or_insert_with(|| result.clone());
                let accepted = step
                    .result_conditions
                    .iter()
                    .all(|c| c.rule.check(&result, initial, &committed));

                let mut failed = Vec::new();
                let mut verdicts = Vec::with_capacity(step.step_conditions.len());
                for (condition, state) in step
                    .step_conditions
                    .iter()
                    .zip(slots.step_conditions[step_index].iter_mut())
                {
                    let verdict = condition.rule.check_dyn(&result, initial, &committed, state)?;
                    if verdict == StepConditionResult::Fail {
                        failed.push(condition.kind.as_str());
                    }
                    verdicts.push(verdict);
                }
                let verdict = match (verdicts.is_empty(), accepted) {
                    (true, true) => StepConditionResult::Found,
                    (true, false) => StepConditionResult::KeepSearching,
                    (false, _) => StepConditionResult::combine(verdicts),
                };

                trace!(
                    step = %step.name,
                    cycle = result.index,
                    win = result.win,
                    accepted,
                    ?verdict,
                    "cycle evaluated"
                );
                self.sink.emit(SearchEvent::ResultEvaluated {
                    attempt_id: record.attempt_id,
                    step_index,
                    cycle: result.index,
                    accepted,
                    verdict,
                });

                let cycle = result.index;
                if accepted {
                    stage.push(result);
                }

                match verdict {
                    StepConditionResult::KeepSearching => continue,
                    StepConditionResult::Fail => {
                        return Ok(AttemptEnd::Failed(format!(
                            "step '{}': {} failed at cycle {}",
                            step.name,
                            failed.join(", "),
                            cycle
                        )));
                    }
                    StepConditionResult::Found => break,
                }
            }

            debug!(
                attempt_id = %record.attempt_id,
                step = %step.name,
                results = stage.len(),
                "step completed"
            );
            self.sink.emit(SearchEvent::StepCompleted {
                attempt_id: record.attempt_id,
                step_index,
                step_name: step.name.clone(),
                results: stage.len(),
            });
            committed.extend(stage.results.iter().cloned());
            stages.push(stage);
        }

        Ok(AttemptEnd::Found(stages))
    }

    fn check_deadline(&self, started: DateTime<Utc>) -> Result<(), GaffError> {
        let Some(deadline_ms) = self.sequence.budget().deadline_ms else {
            return Ok(());
        };
        let elapsed = (self.clock.now() - started).num_milliseconds();
        if elapsed >= deadline_ms as i64 {
            return Err(GaffError::DeadlineExceeded {
                sequence: self.sequence.name().to_string(),
                deadline_ms,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicI64, Ordering};

    use chrono::TimeZone;
    use serde_json::json;

    use crate::app::builder::SequenceBuilder;
    use crate::domain::{Budget, EngineError, RuleFormat, SequenceSpec};
    use crate::rules::DecisionMaker;
    use crate::impls::{
        CycleCount, RecordingEventSink, ReelEngineConfig, ReelStripEngine, BONUS_END, BONUS_TRIGGER,
    };
    use crate::rules::ResultCondition;

    /// Replays `script` in a loop; the index restarts with every attempt.
    struct ScriptedEngine {
        script: Vec<CycleResult>,
        pos: usize,
        index: u64,
    }

    impl ScriptedEngine {
        fn new(script: Vec<CycleResult>) -> Self {
            Self {
                script,
                pos: 0,
                index: 0,
            }
        }
    }

    impl LogicEngine for ScriptedEngine {
        fn begin_attempt(&mut self) -> Result<(), EngineError> {
            self.index = 0;
            Ok(())
        }

        fn play_cycle(
            &mut self,
            _overrides: &mut dyn DecisionOverride,
        ) -> Result<CycleResult, EngineError> {
            let mut result = self.script[self.pos % self.script.len()].clone();
            result.index = self.index;
            self.pos += 1;
            self.index += 1;
            Ok(result)
        }
    }

    struct BrokenEngine;

    impl LogicEngine for BrokenEngine {
        fn begin_attempt(&mut self) -> Result<(), EngineError> {
            Ok(())
        }

        fn play_cycle(&mut self, _: &mut dyn DecisionOverride) -> Result<CycleResult, EngineError> {
            Err(EngineError::new("reel set not loaded"))
        }
    }

    /// Moves `step_ms` forward on every `now()`.
    struct TickingClock {
        start: DateTime<Utc>,
        step_ms: i64,
        ticks: AtomicI64,
    }

    impl Clock for TickingClock {
        fn now(&self) -> DateTime<Utc> {
            let n = self.ticks.fetch_add(1, Ordering::SeqCst);
            self.start + chrono::Duration::milliseconds(n * self.step_ms)
        }
    }

    /// Accepts everything and remembers what it was shown.
    #[derive(Default)]
    struct Probe {
        seen: Mutex<Vec<(usize, u64)>>,
    }

    impl ResultCondition for Probe {
        fn check(&self, _result: &CycleResult, initial: &CycleResult, sequence: &[CycleResult]) -> bool {
            self.seen.lock().unwrap().push((sequence.len(), initial.index));
            true
        }

        fn describe(&self, _format: RuleFormat) -> String {
            "probe".to_string()
        }
    }

    /// Forces option 0 on reel 2 and logs every `valid` / `create` call.
    #[derive(Default)]
    struct ReelTwoSpy {
        asked: Mutex<Vec<(String, bool)>>,
        created: Mutex<Vec<String>>,
    }

    impl DecisionMaker for ReelTwoSpy {
        type State = ();

        fn valid(&self, context: &str, _definition: &DeferredDefinition<'_>, _state: &mut ()) -> bool {
            let valid = context == "reel2 spin";
            self.asked.lock().unwrap().push((context.to_string(), valid));
            valid
        }

        fn create(&self, definition: &DecisionDefinition, _state: &()) -> DecisionOutcome {
            self.created.lock().unwrap().push(definition.context.clone());
            DecisionOutcome::succeeded(Decision::select(0))
        }

        fn describe(&self, _format: RuleFormat) -> String {
            "reel_two_spy".to_string()
        }
    }

    fn scatter(n: usize) -> CycleResult {
        let reels = (0..5)
            .map(|i| vec![if i < n { "SC" } else { "A" }.to_string()])
            .collect();
        CycleResult::new(0, "free").with_grid(reels)
    }

    fn build(spec: serde_json::Value) -> Arc<GaffSequence> {
        let spec: SequenceSpec = serde_json::from_value(spec).unwrap();
        Arc::new(SequenceBuilder::new().build(&spec).unwrap())
    }

    fn trigger_then_three_scatters(max_attempts: u32) -> Arc<GaffSequence> {
        build(json!({
            "name": "three-scatter",
            "budget": { "max_attempts": max_attempts },
            "steps": [
                {
                    "name": "trigger",
                    "step_conditions": [
                        { "kind": "marker_reached", "params": { "marker": BONUS_TRIGGER } }
                    ]
                },
                {
                    "name": "free",
                    "step_conditions": [
                        { "kind": "symbol_count", "params": { "symbol": "SC", "target": 3, "terminal_marker": BONUS_END } }
                    ]
                }
            ]
        }))
    }

    #[test]
    fn failed_step_restarts_from_first_step() {
        let trig = CycleResult::new(0, "base").with_marker(BONUS_TRIGGER);
        let mut engine = ScriptedEngine::new(vec![
            trig.clone(),
            scatter(1),
            scatter(0).with_marker(BONUS_END),
            trig,
            scatter(3),
        ]);
        let sink = Arc::new(RecordingEventSink::new());
        let search = GaffSearch::new(trigger_then_three_scatters(10)).with_event_sink(sink.clone());

        let report = search.run(&mut engine).unwrap();

        assert_eq!(report.attempts.len(), 2);
        assert_eq!(report.attempts[0].state, crate::domain::AttemptState::Failed);
        assert_eq!(report.attempts[0].reached_step, 1);
        assert!(report.attempts[0].reason.as_deref().unwrap().contains("symbol_count"));
        assert_eq!(report.attempts[1].state, crate::domain::AttemptState::Found);

        // only the successful attempt's results survive
        assert_eq!(report.stages.len(), 2);
        assert_eq!(report.stages[0].results.len(), 1);
        assert_eq!(report.stages[1].results.len(), 1);
        assert_eq!(report.stages[1].results[0].count_symbol("SC"), 3);
        assert_eq!(report.results().count(), 2);

        let names = sink.names();
        assert_eq!(names.first(), Some(&"search_started"));
        assert_eq!(names.last(), Some(&"search_finished"));
        assert_eq!(names.iter().filter(|n| **n == "attempt_started").count(), 2);
        assert_eq!(names.iter().filter(|n| **n == "step_completed").count(), 3);
    }

    #[test]
    fn scatters_accumulate_across_results_of_a_step() {
        let trig = CycleResult::new(0, "base").with_marker(BONUS_TRIGGER);
        let mut engine = ScriptedEngine::new(vec![trig, scatter(1), scatter(0), scatter(2)]);
        let report = GaffSearch::new(trigger_then_three_scatters(1))
            .run(&mut engine)
            .unwrap();
        assert_eq!(report.stages[1].results.len(), 3);
    }

    #[test]
    fn sequence_up_to_now_holds_only_committed_steps() {
        let probe = Arc::new(Probe::default());
        let sequence = GaffSequence::new(
            "probe",
            Budget::default(),
            vec![
                GaffStep::new("a")
                    .with_result_condition("probe", probe.clone())
                    .with_step_condition("cycle_count", Arc::new(CycleCount { count: 2 })),
                GaffStep::new("b")
                    .with_result_condition("probe", probe.clone())
                    .with_step_condition("cycle_count", Arc::new(CycleCount { count: 1 })),
            ],
        )
        .unwrap();
        let mut engine = ScriptedEngine::new(vec![CycleResult::new(0, "base")]);

        GaffSearch::new(Arc::new(sequence)).run(&mut engine).unwrap();

        // (sequence length, index of the step's initial result)
        assert_eq!(*probe.seen.lock().unwrap(), vec![(0, 0), (0, 0), (2, 2)]);
    }

    #[test]
    fn step_without_step_conditions_completes_on_first_accepted_result() {
        let sequence = build(json!({
            "name": "any-win",
            "steps": [
                {
                    "name": "win",
                    "result_conditions": [ { "kind": "win_amount", "params": { "min": 1 } } ]
                }
            ]
        }));
        let mut engine = ScriptedEngine::new(vec![
            CycleResult::new(0, "base"),
            CycleResult::new(0, "base"),
            CycleResult::new(0, "base").with_win(5),
        ]);
        let report = GaffSearch::new(sequence).run(&mut engine).unwrap();

        assert_eq!(report.stages[0].results.len(), 1);
        assert_eq!(report.stages[0].results[0].win, 5);
        assert_eq!(report.stages[0].results[0].index, 2);
        assert_eq!(report.attempts[0].cycles, 3);
        assert_eq!(report.total_win(), 5);
    }

    #[test]
    fn forced_symbol_lands_on_reel_one() {
        let sequence = build(json!({
            "name": "wild-reel-one",
            "steps": [
                {
                    "name": "spins",
                    "step_conditions": [ { "kind": "cycle_count", "params": { "count": 5 } } ],
                    "decision_makers": [
                        { "kind": "force_symbol", "params": { "context": "reel1 spin", "symbol": "W" } }
                    ]
                }
            ]
        }));
        let mut engine = ReelStripEngine::new(ReelEngineConfig::default(), 42).unwrap();
        let report = GaffSearch::new(sequence).run(&mut engine).unwrap();

        assert_eq!(report.stages[0].results.len(), 5);
        for result in report.results() {
            assert_eq!(result.grid[0][1], "W");
        }
        assert_eq!(report.decisions.len(), 5);
        assert!(report.decisions.iter().all(|d| {
            d.context == "reel1 spin"
                && d.maker == r#"force_symbol {"context":"reel1 spin","symbol":"W"}"#
                && d.label.as_deref() == Some("W")
        }));
    }

    #[test]
    fn failed_outcome_falls_through_to_next_maker() {
        let sequence = build(json!({
            "name": "fallback",
            "steps": [
                {
                    "name": "spin",
                    "decision_makers": [
                        { "kind": "force_symbol", "params": { "context": "reel2 spin", "symbol": "BAR" } },
                        { "kind": "force_symbol", "params": { "context": "reel2 spin", "symbol": "SC" } }
                    ]
                }
            ]
        }));
        let mut engine = ReelStripEngine::new(ReelEngineConfig::default(), 9).unwrap();
        let report = GaffSearch::new(sequence).run(&mut engine).unwrap();

        assert_eq!(report.results().next().unwrap().grid[1][1], "SC");
        assert_eq!(report.decisions.len(), 2);
        assert!(!report.decisions[0].outcome.is_success());
        assert_eq!(report.decisions[0].label, None);
        assert!(report.decisions[1].outcome.is_success());
        assert_eq!(report.decisions[1].label.as_deref(), Some("SC"));
        // both are force_symbol; the recorded description tells them apart
        assert_ne!(report.decisions[0].maker, report.decisions[1].maker);
        assert!(report.decisions[1].maker.contains(r#""symbol":"SC""#));
    }

    #[test]
    fn create_runs_only_after_valid_accepts() {
        let spy = Arc::new(ReelTwoSpy::default());
        let sequence = GaffSequence::new(
            "reel-two",
            Budget::default(),
            vec![
                GaffStep::new("spins")
                    .with_step_condition("cycle_count", Arc::new(CycleCount { count: 3 }))
                    .with_decision_maker("reel_two_spy", spy.clone()),
            ],
        )
        .unwrap();
        let mut engine = ReelStripEngine::new(ReelEngineConfig::default(), 7).unwrap();

        let report = GaffSearch::new(Arc::new(sequence)).run(&mut engine).unwrap();

        let asked = spy.asked.lock().unwrap();
        let created = spy.created.lock().unwrap();
        // 3 cycles x 5 reels
        assert_eq!(asked.len(), 15);
        let accepted: Vec<&str> = asked
            .iter()
            .filter(|(_, valid)| *valid)
            .map(|(context, _)| context.as_str())
            .collect();
        assert_eq!(accepted, vec!["reel2 spin"; 3]);
        assert_eq!(*created, accepted);
        assert_eq!(report.decisions.len(), 3);
    }

    #[test]
    fn exhausted_attempts_are_an_error() {
        let mut engine = ScriptedEngine::new(vec![
            CycleResult::new(0, "base").with_marker(BONUS_TRIGGER),
            scatter(0).with_marker(BONUS_END),
        ]);
        let sink = Arc::new(RecordingEventSink::new());
        let err = GaffSearch::new(trigger_then_three_scatters(3))
            .with_event_sink(sink.clone())
            .run(&mut engine)
            .unwrap_err();

        assert!(matches!(err, GaffError::AttemptsExhausted { attempts: 3, .. }));
        assert!(matches!(
            sink.events().last(),
            Some(SearchEvent::SearchFinished { attempts: 3, found: false, .. })
        ));
    }

    #[test]
    fn cycle_budget_abandons_attempt() {
        let sequence = build(json!({
            "name": "never",
            "budget": { "max_attempts": 2, "max_cycles_per_attempt": 4 },
            "steps": [
                {
                    "name": "jackpot",
                    "step_conditions": [ { "kind": "total_win", "params": { "min": 1000000 } } ]
                }
            ]
        }));
        let sink = Arc::new(RecordingEventSink::new());
        let mut engine = ScriptedEngine::new(vec![CycleResult::new(0, "base")]);
        let err = GaffSearch::new(sequence)
            .with_event_sink(sink.clone())
            .run(&mut engine)
            .unwrap_err();

        assert!(matches!(err, GaffError::AttemptsExhausted { attempts: 2, .. }));
        let reasons: Vec<String> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                SearchEvent::AttemptEnded { reason, .. } => Some(reason),
                _ => None,
            })
            .collect();
        assert_eq!(
            reasons,
            vec!["cycle budget of 4 exhausted in step 'jackpot'"; 2]
        );
    }

    #[test]
    fn deadline_stops_the_search() {
        let sequence = build(json!({
            "name": "slow",
            "budget": { "deadline_ms": 55 },
            "steps": [
                {
                    "name": "free",
                    "step_conditions": [
                        { "kind": "symbol_count", "params": { "symbol": "SC", "target": 3, "terminal_marker": BONUS_END } }
                    ]
                }
            ]
        }));
        let clock = TickingClock {
            start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            step_ms: 10,
            ticks: AtomicI64::new(0),
        };
        // every attempt fails on its first cycle, one deadline check each
        let mut engine = ScriptedEngine::new(vec![scatter(0).with_marker(BONUS_END)]);
        let sink = Arc::new(RecordingEventSink::new());
        let err = GaffSearch::new(sequence)
            .with_clock(Arc::new(clock))
            .with_event_sink(sink.clone())
            .run(&mut engine)
            .unwrap_err();

        assert!(matches!(err, GaffError::DeadlineExceeded { deadline_ms: 55, .. }));
        let started = sink.names().iter().filter(|n| **n == "attempt_started").count();
        assert_eq!(started, 6);
        assert!(matches!(
            sink.events().last(),
            Some(SearchEvent::SearchFinished { attempts: 6, found: false, .. })
        ));
    }

    #[test]
    fn engine_failure_reports_attempts_played() {
        let sink = Arc::new(RecordingEventSink::new());
        let err = GaffSearch::new(trigger_then_three_scatters(5))
            .with_event_sink(sink.clone())
            .run(&mut BrokenEngine)
            .unwrap_err();

        assert!(matches!(err, GaffError::Engine(_)));
        assert!(matches!(
            sink.events().last(),
            Some(SearchEvent::SearchFinished { attempts: 1, found: false, .. })
        ));
    }

    #[test]
    fn engine_failure_propagates() {
        let err = GaffSearch::new(trigger_then_three_scatters(5))
            .run(&mut BrokenEngine)
            .unwrap_err();
        assert_eq!(err.to_string(), "logic engine failure: reel set not loaded");
    }

    #[test]
    fn empty_history_never_panics() {
        // distinct_grid reads the committed sequence; on the first step it is empty
        let sequence = build(json!({
            "name": "distinct",
            "steps": [
                { "name": "first", "result_conditions": [ { "kind": "distinct_grid" } ] }
            ]
        }));
        let mut engine = ScriptedEngine::new(vec![scatter(2)]);
        let report = GaffSearch::new(sequence).run(&mut engine).unwrap();
        assert_eq!(report.stages[0].results.len(), 1);
    }
}
