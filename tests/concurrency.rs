use std::thread;

use globpattern::Pattern;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn pattern_is_send_and_sync() {
    assert_send_sync::<Pattern>();
}

fn candidates() -> Vec<String> {
    let parts = ["", "a", "b", "c", "ab", "xb", "aab", "cc", "é"];
    let mut out = Vec::new();
    for first in parts {
        for second in parts {
            for third in parts {
                out.push(format!("{first}{second}{third}"));
            }
        }
    }
    out
}

#[test]
fn shared_pattern_answers_like_sequential_calls() {
    let pattern = Pattern::new("*a?b*c");
    let inputs = candidates();

    let expected: Vec<(bool, bool, bool)> = inputs
        .iter()
        .map(|s| (pattern.is_match(s), pattern.starts_with(s), pattern.ends_with(s)))
        .collect();
    assert!(expected.iter().any(|r| r.0));
    assert!(expected.iter().any(|r| !r.0));

    thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let pattern = &pattern;
                let inputs = &inputs;
                scope.spawn(move || {
                    // every worker walks the inputs in a different order
                    let mut seen = Vec::with_capacity(inputs.len());
                    for round in 0..inputs.len() {
                        let i = (round * 7 + worker * 13) % inputs.len();
                        let s = &inputs[i];
                        seen.push((
                            i,
                            (pattern.is_match(s), pattern.starts_with(s), pattern.ends_with(s)),
                        ));
                    }
                    seen
                })
            })
            .collect();

        for worker in workers {
            for (i, result) in worker.join().unwrap() {
                assert_eq!(result, expected[i], "input {:?}", inputs[i]);
            }
        }
    });
}
