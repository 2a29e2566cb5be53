#![no_main]

use libfuzzer_sys::fuzz_target;
use weft::ops::{Delete, Insert, Retain};
use weft::{Compose, Delta, Op, Transform};

const LIMIT: usize = 1 << 12;

/// Clamps every operation to a sane length and rebuilds the delta through
/// `push`, so arbitrary input cannot overflow the length sums.
fn clamp(delta: Delta) -> Delta {
    delta
        .into_iter()
        .map(|op| match op {
            Op::Insert(Insert { insert, attributes }) => Op::Insert(Insert {
                insert: insert.slice(0, LIMIT),
                attributes,
            }),
            Op::Retain(Retain { retain, attributes }) => Op::Retain(Retain {
                retain: retain.min(LIMIT),
                attributes,
            }),
            Op::Delete(Delete { delete }) => Op::Delete(Delete {
                delete: delete.min(LIMIT),
            }),
        })
        .collect()
}

/// Slices `delta` down, or pads it out with a trailing retain, so that it
/// consumes exactly `base` units.
fn fit(delta: Delta, base: usize) -> Delta {
    let mut out = Delta::new();
    let mut remaining = base;

    for op in delta {
        match op {
            Op::Insert(_) => out.push(op),
            Op::Retain(Retain { retain, attributes }) => {
                let len = retain.min(remaining);
                remaining -= len;
                out.push(Op::Retain(Retain {
                    retain: len,
                    attributes,
                }));
            }
            Op::Delete(Delete { delete }) => {
                let len = delete.min(remaining);
                remaining -= len;
                out.push(Op::Delete(Delete { delete: len }));
            }
        }
    }

    if remaining > 0 {
        out.push(Op::Retain(Retain {
            retain: remaining,
            attributes: None,
        }));
    }

    out
}

fuzz_target!(|data: (Delta, Delta, Delta)| {
    let before = clamp(data.0);
    let base = before.target_len();

    let alice = fit(clamp(data.1), base);
    let bob = fit(clamp(data.2), base);

    let alice_bob = before
        .clone()
        .compose(alice.clone())
        .unwrap()
        .compose(alice.clone().transform(bob.clone(), true))
        .unwrap();

    let bob_alice = before
        .clone()
        .compose(bob.clone())
        .unwrap()
        .compose(bob.transform(alice, false))
        .unwrap();

    assert_eq!(alice_bob, bob_alice);
});
