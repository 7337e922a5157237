// others
use atomic::{Atomic, Ordering};

// parallel.h

/// Which of a node's two children reached it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Arrival {
    First,
    Second,
}

/// One first-arrival flag per internal node, used to combine bounding
/// boxes bottom-up from many leaves at once: the first child to reach
/// a node stops, the second one owns the node from then on.
#[derive(Debug)]
pub struct ArrivalGate {
    flags: Vec<Atomic<bool>>,
}

impl ArrivalGate {
    pub fn new(n: usize) -> ArrivalGate {
        ArrivalGate {
            flags: (0..n).map(|_| Atomic::new(false)).collect(),
        }
    }
    /// Check-and-set for node *i*. Everything the first arrival wrote
    /// before calling this is visible to the second arrival.
    pub fn arrive(&self, i: usize) -> Arrival {
        if self.flags[i].swap(true, Ordering::AcqRel) {
            Arrival::Second
        } else {
            Arrival::First
        }
    }
    pub fn len(&self) -> usize {
        self.flags.len()
    }
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn second_arrival_wins() {
        let gate = ArrivalGate::new(2);
        assert_eq!(gate.arrive(1), Arrival::First);
        assert_eq!(gate.arrive(1), Arrival::Second);
        assert_eq!(gate.arrive(0), Arrival::First);
        assert_eq!(gate.len(), 2);
    }

    #[test]
    fn exactly_one_second_arrival_under_contention() {
        let n: usize = 64;
        let gate = ArrivalGate::new(n);
        let seconds = AtomicUsize::new(0);
        crossbeam::scope(|scope| {
            for _ in 0..2 {
                scope.spawn(|_| {
                    for i in 0..n {
                        if gate.arrive(i) == Arrival::Second {
                            seconds.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                        }
                    }
                });
            }
        })
        .unwrap();
        assert_eq!(seconds.into_inner(), n);
    }
}
