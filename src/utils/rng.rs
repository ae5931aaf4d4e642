use std::cell::Cell;

thread_local! {
    // Seeded from a stack address, which differs per thread and per run.
    static STATE: Cell<u64> = {
        let anchor = 0u8;
        Cell::new(&anchor as *const u8 as u64 | 1)
    };
}

/// Returns a pseudo-random port in `0..ports`.
///
/// Poll passes start at this port so that no port is always polled first.
/// Returns `0` when `ports` is zero.
pub(crate) fn random(ports: usize) -> usize {
    if ports == 0 {
        return 0;
    }
    STATE.with(|state| {
        // xorshift64*
        let mut x = state.get();
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        state.set(x);
        let x = x.wrapping_mul(0x2545_f491_4f6c_dd1d);

        // Multiply-shift range reduction instead of `%`.
        ((u128::from(x >> 32) * ports as u128) >> 32) as usize
    })
}

#[cfg(test)]
mod tests {
    use super::random;

    #[test]
    fn stays_in_range() {
        for ports in [1, 2, 7, 1000] {
            for _ in 0..100 {
                assert!(random(ports) < ports);
            }
        }
    }

    #[test]
    fn no_ports() {
        assert_eq!(random(0), 0);
    }

    #[test]
    fn visits_every_start() {
        let mut seen = [false; 4];
        for _ in 0..1000 {
            seen[random(4)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
