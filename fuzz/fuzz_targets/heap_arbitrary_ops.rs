#![no_main]

use heapcache::ds::{Heap, MinFirst};
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on Heap
//
// Tests random sequences of push, pop, remove, in-place edit + fix, and
// repair, checking the heap property and contents against a sorted model.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut heap: Heap<u8, MinFirst> = Heap::new(MinFirst);
    let mut model: Vec<u8> = Vec::new();

    let mut idx = 0;
    while idx + 1 < data.len() {
        let op = data[idx] % 6;
        let arg = data[idx + 1];
        idx += 2;

        match op {
            0 => {
                heap.push(arg);
                model.push(arg);
            }
            1 => {
                let expected = model.iter().min().copied();
                let popped = heap.pop().ok();
                assert_eq!(popped, expected);
                if let Some(value) = popped {
                    let at = model.iter().position(|&v| v == value).unwrap();
                    model.swap_remove(at);
                }
            }
            2 => {
                if heap.is_empty() {
                    assert!(heap.remove(usize::from(arg)).is_err());
                    continue;
                }
                let pos = usize::from(arg) % heap.len();
                let removed = heap.remove(pos).unwrap();
                let at = model.iter().position(|&v| v == removed).unwrap();
                model.swap_remove(at);
            }
            3 => {
                if heap.is_empty() {
                    continue;
                }
                let pos = usize::from(arg) % heap.len();
                let old = heap.as_slice()[pos];
                let new = arg.wrapping_mul(31);
                heap.as_mut_slice()[pos] = new;
                heap.fix(pos).unwrap();
                let at = model.iter().position(|&v| v == old).unwrap();
                model[at] = new;
            }
            4 => {
                heap.repair();
            }
            _ => {
                assert_eq!(heap.peek().copied(), model.iter().min().copied());
            }
        }

        assert_eq!(heap.len(), model.len());
        assert!(heap.check_invariants().is_ok());
    }

    let mut sorted = model;
    sorted.sort_unstable();
    assert_eq!(heap.into_sorted_vec(), sorted);
});
