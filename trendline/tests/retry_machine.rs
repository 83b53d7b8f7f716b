use std::num::NonZeroU32;
use std::time::Duration;

use proptest::prelude::*;
use trendline::retry::{Action, Event, Phase, RetryMachine};
use trendline::{PauseCause, QueryOutcome, TrendError};

fn nz(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

/// Feed `outcomes` to a fresh machine, drawing pause `i` seconds for attempt `i`.
fn simulate(max: u32, outcomes: &[bool]) -> (RetryMachine, Vec<Action<&'static str>>) {
    let mut machine = RetryMachine::new(nz(max));
    let mut all = Vec::new();
    let mut outcomes = outcomes.iter();
    let mut draws = 1u64..;
    while !machine.is_terminal() {
        let pause = Duration::from_secs(draws.next().unwrap());
        let (next, actions) = machine.handle(Event::Begin { pause });
        machine = next;
        assert!(matches!(actions.as_slice(), [Action::Query { .. }]));
        all.extend(actions);

        let ok = *outcomes.next().expect("ran out of scripted outcomes");
        let outcome = if ok {
            QueryOutcome::Success("rows")
        } else {
            QueryOutcome::Failure(TrendError::Other("429".into()))
        };
        let (next, actions) = machine.handle(Event::Outcome(outcome));
        machine = next;
        all.extend(actions);
    }
    (machine, all)
}

fn queries<T>(actions: &[Action<T>]) -> usize {
    actions
        .iter()
        .filter(|a| matches!(a, Action::Query { .. }))
        .count()
}

#[test]
fn always_failing_query_is_attempted_exactly_max_retries_times() {
    let (machine, actions) = simulate(3, &[false, false, false]);
    assert_eq!(queries(&actions), 3);
    assert!(matches!(
        machine.phase(),
        Phase::Exhausted { attempts: 3, last_error: TrendError::Other(_) }
    ));
    let escalations = actions
        .iter()
        .filter(|a| matches!(a, Action::EscalateBackoff))
        .count();
    assert_eq!(escalations, 3);
    let failures = actions
        .iter()
        .filter(|a| matches!(a, Action::RecordFailure))
        .count();
    assert_eq!(failures, 1);
    assert!(!actions.iter().any(|a| matches!(a, Action::Persist(_))));
}

#[test]
fn failure_pause_uses_the_attempts_own_draw() {
    let (_, actions) = simulate(2, &[false, true]);
    let expected: Vec<Action<&str>> = vec![
        Action::Query { attempt: 1 },
        Action::EscalateBackoff,
        Action::Pause {
            duration: Duration::from_secs(1),
            cause: PauseCause::AfterFailure,
        },
        Action::Query { attempt: 2 },
        Action::Persist("rows"),
        Action::Pause {
            duration: Duration::from_secs(2),
            cause: PauseCause::AfterSuccess,
        },
    ];
    assert_eq!(actions, expected);
}

#[test]
fn final_failure_records_before_pausing() {
    let (_, actions) = simulate(1, &[false]);
    assert!(matches!(
        actions.as_slice(),
        [
            Action::Query { attempt: 1 },
            Action::EscalateBackoff,
            Action::RecordFailure,
            Action::Pause { cause: PauseCause::AfterFailure, .. },
        ]
    ));
}

#[test]
fn out_of_order_events_are_ignored() {
    let machine = RetryMachine::new(nz(2));
    let (machine, actions) =
        machine.handle(Event::Outcome(QueryOutcome::Success(())));
    assert!(actions.is_empty());
    assert_eq!(machine.phase(), &Phase::Pending { attempt: 0 });

    let (machine, _) = machine.handle::<()>(Event::Begin { pause: Duration::ZERO });
    let (machine, actions) = machine.handle::<()>(Event::Begin { pause: Duration::ZERO });
    assert!(actions.is_empty());
    assert!(matches!(machine.phase(), Phase::Attempting { attempt: 1, .. }));

    let (done, _) = machine.handle(Event::Outcome(QueryOutcome::Success(())));
    let (after, actions) = done.clone().handle::<()>(Event::Begin { pause: Duration::ZERO });
    assert!(actions.is_empty());
    assert_eq!(after, done);
}

proptest! {
    #[test]
    fn success_on_attempt_k_short_circuits(max in 1u32..8, k_seed in 0u32..8) {
        let k = k_seed % max + 1;
        let script: Vec<bool> = (1..=max).map(|i| i == k).collect();
        let (machine, actions) = simulate(max, &script);
        prop_assert_eq!(queries(&actions), k as usize);
        prop_assert_eq!(machine.phase(), &Phase::Succeeded { attempts: k });
        let persisted = actions.iter().filter(|a| matches!(a, Action::Persist(_))).count();
        prop_assert_eq!(persisted, 1);
        prop_assert!(!actions.iter().any(|a| matches!(a, Action::RecordFailure)));
    }
}
