use super::*;

#[test]
fn lock_is_held_while_any_guard_lives() {
    let lock = PageScrollLock::default();
    assert!(!lock.is_locked());

    let first = lock.acquire();
    let second = lock.clone().acquire();
    assert!(lock.is_locked());

    drop(first);
    assert!(lock.is_locked());
    drop(second);
    assert!(!lock.is_locked());
}
