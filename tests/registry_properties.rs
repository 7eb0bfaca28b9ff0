//! Property tests for keybind numbering and visibility.

use pickwire::{Error, KeyRegistry};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add { bind: u8, hidden: bool, exist_ok: bool },
    Unregister { bind: u8 },
    ToggleHidden { restore: bool },
    ToggleAll,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..8, any::<bool>(), any::<bool>())
            .prop_map(|(bind, hidden, exist_ok)| Op::Add { bind, hidden, exist_ok }),
        2 => (0u8..8).prop_map(|bind| Op::Unregister { bind }),
        1 => any::<bool>().prop_map(|restore| Op::ToggleHidden { restore }),
        1 => Just(Op::ToggleAll),
    ]
}

fn bind_name(n: u8) -> String {
    format!("alt-{n}")
}

proptest! {
    #[test]
    fn added_keybinds_get_fresh_ids_and_codes(
        base in 1i32..50,
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let mut reg = KeyRegistry::with_code_base(base);
        let mut max_id = 0u32;
        let mut max_code = base - 1;

        for op in ops {
            match op {
                Op::Add { bind, hidden, exist_ok } => {
                    let name = bind_name(bind);
                    let before = reg.get_by_bind(&name).ok().cloned();
                    match reg.add(&name, "desc", None, hidden, exist_ok) {
                        Ok(key) => {
                            prop_assert!(key.id > max_id);
                            prop_assert!(key.code > max_code);
                            max_id = key.id;
                            max_code = key.code;
                            let stored = reg.get_by_bind(&name).unwrap();
                            prop_assert_eq!(stored, &key);
                        }
                        Err(Error::DuplicateKeybind { .. }) => {
                            prop_assert!(!exist_ok);
                            prop_assert_eq!(reg.get_by_bind(&name).ok().cloned(), before);
                        }
                        Err(other) => prop_assert!(false, "unexpected error: {}", other),
                    }
                }
                Op::Unregister { bind } => {
                    let name = bind_name(bind);
                    let len = reg.len();
                    match reg.unregister(&name) {
                        Ok(key) => prop_assert_eq!(key.bind, name),
                        Err(Error::KeybindNotFound { .. }) => prop_assert_eq!(reg.len(), len),
                        Err(other) => prop_assert!(false, "unexpected error: {}", other),
                    }
                }
                Op::ToggleHidden { restore } => reg.toggle_hidden(restore),
                Op::ToggleAll => reg.toggle_all(),
            }
        }
    }

    #[test]
    fn toggle_then_restore_is_identity(hidden in prop::collection::vec(any::<bool>(), 0..12)) {
        let mut reg = KeyRegistry::new();
        for (i, h) in hidden.iter().enumerate() {
            reg.add(format!("ctrl-{i}"), "", None, *h, false).unwrap();
        }
        let before: Vec<bool> = reg.iter().map(|k| k.hidden).collect();

        reg.toggle_hidden(false);
        prop_assert!(reg.iter().all(|k| k.hidden));
        reg.toggle_hidden(true);

        let after: Vec<bool> = reg.iter().map(|k| k.hidden).collect();
        prop_assert_eq!(after, before);
        prop_assert!(reg.snapshot().is_empty());
    }
}
